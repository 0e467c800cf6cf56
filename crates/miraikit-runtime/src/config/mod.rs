//! Configuration module for the miraikit runtime.
//!
//! This module provides layered configuration loading and validation for
//! logging and payload decoding.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{DecodeConfig, LogFormat, LogLevel, LogOutput, LoggingConfig, MiraikitConfig};
pub use validation::validate_config;
