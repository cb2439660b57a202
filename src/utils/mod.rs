//! Naming and validation helpers shared by the generator

pub mod naming;
pub mod validators;

pub use naming::{class_basename, namespace_of, table_name, to_underscore, NameResolver};
