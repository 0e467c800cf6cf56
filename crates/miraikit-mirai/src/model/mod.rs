//! Data models for the mirai gateway protocol.
//!
//! This module contains the message elements, chains, envelopes and event
//! records exchanged with a mirai-api-http style gateway.

pub mod chain;
pub mod envelope;
pub mod event;
pub mod message;
pub mod registry;
pub mod segment;
pub mod types;

pub use chain::MessageChain;
pub use envelope::{
    Envelope, EnvelopeKind, Friend, FriendMessage, Group, GroupMessage, NoGroup, SenderContext,
    Temp, TempMessage,
};
pub use event::*;
pub use message::{ChainStatus, Message};
pub use segment::{
    App, At, AtAll, Dice, Element, Face, File, FlashImage, Image, ImageRef, Json, Plain, Voice,
    Xml,
};
pub use types::{GroupRef, Nullable, Operator, ParseOptions};
