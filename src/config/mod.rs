//! Configuration — YAML schema and multi-source loading.

pub mod loader;
pub mod schema;
