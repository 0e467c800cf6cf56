//! # miraikit core
//!
//! Protocol-independent building blocks for the miraikit message model.
//!
//! ## Layout
//!
//! - [`message`]: the [`MessageElement`] and [`ElementChain`] traits that
//!   protocol models implement for their element and chain types
//! - [`error`]: the [`ElementError`] taxonomy for strict element parsing
//! - [`wire`]: lenient lookups over raw wire JSON, where absence and wrong
//!   types both degrade to `None`
//! - [`clock`]: rendering of epoch-second timestamps
//!
//! ## Example
//!
//! ```rust,ignore
//! use miraikit_core::{ElementChain, MessageElement};
//!
//! fn describe<C: ElementChain>(chain: &C) {
//!     println!("{} elements, plain text {:?}", chain.len(), chain.plain_text());
//!     for element in chain.iter() {
//!         println!("- {}: {}", element.element_type(), element.render());
//!     }
//! }
//! ```

pub mod clock;
pub mod error;
pub mod message;
pub mod wire;

pub use clock::{Clock, format_timestamp};
pub use error::{ElementError, ElementResult};
pub use message::{ElementChain, MessageElement};
