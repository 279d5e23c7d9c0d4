//! Configuration management for the projsync CLI

mod paths;
mod profiles;

pub use paths::ConfigPaths;
pub use profiles::{ProfileStore, ServerEntry};
