//! Model class generator for AndPHP projects.
//!
//! Given a class name such as `Blog/Post`, the generator qualifies it under the
//! application's models namespace, reads the matching table's columns from the
//! MySQL catalog and renders the model stub into `<base>/Models/Blog/Post.php`.

pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod generator;
pub mod utils;

pub use config::GeneratorConfig;
pub use error::{Error, Result};
pub use generator::{GeneratedModel, ModelGenerator, ModelPlan, ModelRequest};
