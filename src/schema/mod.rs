//! Schema module - Configuration and seeding types for Spiralling Cells runs.

mod config;
mod seed;

pub use config::*;
pub use seed::*;
