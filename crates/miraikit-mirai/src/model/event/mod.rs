//! Mirai event dispatch.
//!
//! Every inbound gateway payload carries a top-level `type` tag. The
//! dispatcher reads it and builds the most specific typed event:
//!
//! ```text
//! MiraiEvent
//! ├── Group(GroupMessage)              ← GroupMessage
//! ├── Friend(FriendMessage)            ← FriendMessage
//! ├── Temp(TempMessage)                ← TempMessage
//! ├── Recall(GroupRecallEvent)         ← GroupRecallEvent
//! ├── CardChange(MemberCardChangeEvent)← MemberCardChangeEvent
//! ├── Online(BotOnlineEvent)           ← BotOnlineEvent, BotReloginEvent
//! ├── Offline(BotOfflineEvent)         ← BotOfflineEvent{Active,Force,Dropped}
//! └── Unknown { tag, raw }             ← anything else
//! ```
//!
//! Dispatch never fails: unknown or missing tags yield
//! [`MiraiEvent::Unknown`] with the raw payload attached.

pub mod meta;
pub mod notice;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use miraikit_core::wire;

pub use meta::*;
pub use notice::*;

use super::envelope::{FriendMessage, GroupMessage, TempMessage};
use super::message::Message;
use super::types::ParseOptions;
use crate::traits::GroupEvent;

// ============================================================================
// MiraiEvent
// ============================================================================

/// A dispatched gateway event.
#[derive(Debug, Clone)]
pub enum MiraiEvent {
    /// Group message.
    Group(GroupMessage),
    /// Friend message.
    Friend(FriendMessage),
    /// Temporary message.
    Temp(TempMessage),
    /// Group message recall.
    Recall(GroupRecallEvent),
    /// Member card change.
    CardChange(MemberCardChangeEvent),
    /// Bot online or relogin.
    Online(BotOnlineEvent),
    /// Bot offline, for any reason.
    Offline(BotOfflineEvent),
    /// An event this crate does not model.
    Unknown {
        /// The top-level `type` tag, if any.
        tag: Option<String>,
        /// The raw wire payload.
        raw: Arc<Value>,
    },
}

impl MiraiEvent {
    /// Dispatches a wire payload.
    pub fn from_value(value: &Value, options: &ParseOptions) -> Self {
        Self::from_raw(Arc::new(value.clone()), options)
    }

    /// Dispatches a shared wire payload.
    pub fn from_raw(raw: Arc<Value>, options: &ParseOptions) -> Self {
        let tag = wire::type_tag(&raw).unwrap_or("");

        match tag {
            "GroupMessage" => Self::Group(GroupMessage::from_raw(raw, options)),
            "FriendMessage" => Self::Friend(FriendMessage::from_raw(raw, options)),
            "TempMessage" => Self::Temp(TempMessage::from_raw(raw, options)),
            "GroupRecallEvent" => Self::Recall(GroupRecallEvent::from_raw(raw)),
            "MemberCardChangeEvent" => Self::CardChange(MemberCardChangeEvent::from_raw(raw)),
            "BotOnlineEvent" | "BotReloginEvent" => Self::Online(BotOnlineEvent::from_raw(raw)),
            "BotOfflineEventActive" | "BotOfflineEventForce" | "BotOfflineEventDropped" => {
                Self::Offline(BotOfflineEvent::from_raw(raw))
            }
            _ => {
                let tag = wire::string_field(&raw, "type");
                debug!(tag = ?tag, "unknown gateway event");
                Self::Unknown { tag, raw }
            }
        }
    }

    /// The top-level `type` tag the event was dispatched on.
    pub fn tag(&self) -> Option<&str> {
        wire::type_tag(self.raw())
    }

    /// The raw wire payload.
    pub fn raw(&self) -> &Value {
        match self {
            Self::Group(event) => event.raw(),
            Self::Friend(event) => event.raw(),
            Self::Temp(event) => event.raw(),
            Self::Recall(event) => event.raw(),
            Self::CardChange(event) => event.raw(),
            Self::Online(event) => event.raw(),
            Self::Offline(event) => event.raw(),
            Self::Unknown { raw, .. } => raw.as_ref(),
        }
    }

    /// The assembled message, for message events.
    pub fn message(&self) -> Option<&Message> {
        match self {
            Self::Group(event) => Some(event.message()),
            Self::Friend(event) => Some(event.message()),
            Self::Temp(event) => Some(event.message()),
            _ => None,
        }
    }

    /// The group the event happened in, for group-scoped events.
    pub fn group_id(&self) -> Option<i64> {
        match self {
            Self::Group(event) => event.group_id(),
            Self::Temp(event) => event.group_id(),
            Self::Recall(event) => event.group_id(),
            Self::CardChange(event) => event.group_id(),
            _ => None,
        }
    }

    /// Returns true if the event was not recognized.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown { .. })
    }

    /// The display line, with status events coloured.
    pub fn painted(&self) -> String {
        match self {
            Self::Online(event) => event.painted(),
            Self::Offline(event) => event.painted(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for MiraiEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Group(event) => fmt::Display::fmt(event, f),
            Self::Friend(event) => fmt::Display::fmt(event, f),
            Self::Temp(event) => fmt::Display::fmt(event, f),
            Self::Recall(event) => fmt::Display::fmt(event, f),
            Self::CardChange(event) => fmt::Display::fmt(event, f),
            Self::Online(event) => fmt::Display::fmt(event, f),
            Self::Offline(event) => fmt::Display::fmt(event, f),
            Self::Unknown { tag, .. } => match tag {
                Some(tag) => write!(f, "{tag}"),
                None => f.write_str("<untagged event>"),
            },
        }
    }
}

impl From<GroupMessage> for MiraiEvent {
    fn from(event: GroupMessage) -> Self {
        Self::Group(event)
    }
}

impl From<FriendMessage> for MiraiEvent {
    fn from(event: FriendMessage) -> Self {
        Self::Friend(event)
    }
}

impl From<TempMessage> for MiraiEvent {
    fn from(event: TempMessage) -> Self {
        Self::Temp(event)
    }
}
