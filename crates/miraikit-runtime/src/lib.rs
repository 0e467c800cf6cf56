//! miraikit runtime - configuration, logging and decoding for gateway tools.
//!
//! This crate provides:
//! - Layered configuration loading (`ConfigLoader`, profiles, env overrides)
//! - Logging configuration (`LoggingBuilder`)
//! - Line decoding of raw gateway payloads (`Decoder`)
//!
//! # Example
//!
//! ```ignore
//! use miraikit_runtime::{Decoder, config::{load_config, validate_config}, logging};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = load_config()?;
//!     validate_config(&config)?;
//!     logging::init_from_config(&config.logging);
//!
//!     let decoder = Decoder::from_config(&config.decode);
//!     for line in std::io::stdin().lines() {
//!         let event = decoder.decode(&line?)?;
//!         println!("{}", decoder.render(&event));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Environment Variables
//!
//! Every configuration key can be overridden with a `MIRAIKIT_` prefixed
//! variable, nested keys separated by `__`:
//!
//! ```text
//! MIRAIKIT_LOGGING__LEVEL=debug
//! MIRAIKIT_DECODE__CLOCK=utc
//! MIRAIKIT_PROFILE=production
//! ```

pub mod config;
pub mod decoder;
pub mod error;
pub mod logging;

pub use config::{ConfigError, ConfigLoader, ConfigResult, MiraikitConfig};
pub use decoder::Decoder;
pub use error::{DecodeError, DecodeResult};
pub use logging::{LoggingBuilder, init_from_config};

// Re-export the message model for convenience
pub use miraikit_mirai;
