//! # miraikit for mirai gateways
//!
//! Typed message chains and events for mirai-api-http style chat gateways.
//!
//! ## Overview
//!
//! The gateway represents a message as a JSON "chain" of heterogeneous
//! elements: text, mentions, stickers, media references, cards. This crate
//! maps those payloads onto strongly-typed values and back:
//!
//! - Element parsing and serialization through a static discriminant
//!   registry
//! - Chain assembly with an all-or-nothing failure policy, reported through
//!   [`ChainStatus`]
//! - Group, friend and temp envelopes sharing one generic [`Envelope`]
//! - Notice and bot status records
//! - Dispatch of whole gateway payloads into [`MiraiEvent`]
//!
//! ## Event Hierarchy
//!
//! ```text
//! MiraiEvent
//! ├── Group / Friend / Temp   (Envelope<K> ──Deref──▶ Message ──▶ MessageChain)
//! ├── Recall / CardChange     (flat notice records)
//! ├── Online / Offline        (status tag only)
//! └── Unknown { tag, raw }
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use miraikit_mirai::{GroupEvent, MiraiEvent, ParseOptions};
//!
//! let payload: serde_json::Value = serde_json::from_str(&line)?;
//! match MiraiEvent::from_value(&payload, &ParseOptions::default()) {
//!     MiraiEvent::Group(msg) => {
//!         println!("{:?} in {:?}: {}", msg.sender_name(), msg.group_id(), msg.text());
//!     }
//!     other => println!("{other}"),
//! }
//! ```
//!
//! ## Outbound Chains
//!
//! ```rust,ignore
//! use miraikit_mirai::MessageChain;
//!
//! let chain = MessageChain::new().text("Hello, ").at(10001000).face(178);
//! let wire = serde_json::to_value(&chain)?;
//! ```

pub mod model;
pub mod traits;

pub use model::*;
pub use miraikit_core::{Clock, ElementChain, ElementError, ElementResult, MessageElement};
pub use traits::{GroupEvent, MemberRole, SenderEvent};
