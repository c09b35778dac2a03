pub mod json;
pub mod loader;

pub(crate) use json::{ValueExt, to_pretty_sorted};
pub(crate) use loader::SchemaLoader;
