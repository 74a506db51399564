//! Data module - CSV loading and row validation

mod loader;
mod processor;

pub use loader::DataLoader;
pub use processor::{MalformedRowPolicy, PostRow};
