pub mod model;

pub use model::ModelCommand;
