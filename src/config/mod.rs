//! Configuration management module

pub mod env;
pub mod parser;
pub mod regions;

// Re-export main functionality
pub use env::EnvManager;
pub use parser::{display_config_summary, load_config, ConfigParser};
pub use regions::{apply_test_mode, load_region_map, parse_region_map};

// Re-export from models for convenience
pub use crate::models::Config;
