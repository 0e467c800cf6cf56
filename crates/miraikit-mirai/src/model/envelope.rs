//! Group, friend and temporary message envelopes.
//!
//! All three message kinds share one generic [`Envelope`], parameterized by
//! an [`EnvelopeKind`] marker that fixes the wire name of the sender's
//! display name and whether the sender carries a group context:
//!
//! ```text
//! Envelope<Group>   sender.{id, memberName, group.{id, name}}
//! Envelope<Friend>  sender.{id, nickname}
//! Envelope<Temp>    sender.{id, memberName, group.{id, name}}
//! ```
//!
//! Envelopes deref to the assembled [`Message`], so chain views are
//! available directly:
//!
//! ```rust,ignore
//! use miraikit_mirai::{GroupMessage, GroupEvent, ParseOptions};
//!
//! let msg = GroupMessage::from_value(&payload, &ParseOptions::default());
//! println!("{:?} in {:?}: {}", msg.sender_name(), msg.group_id(), msg.text());
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::Arc;

use serde_json::Value;

use miraikit_core::wire;

use super::message::Message;
use super::types::{GroupRef, Nullable, ParseOptions};
use crate::traits::{GroupEvent, SenderEvent};

// ============================================================================
// Sender Context
// ============================================================================

/// Extra context an envelope kind projects from the wire `sender` object.
pub trait SenderContext: fmt::Debug + Clone + Default + Send + Sync + 'static {
    /// Projects the context from a wire `sender` object.
    fn project(sender: &Value) -> Self;

    /// Writes the origin part of the display line, including its leading
    /// separator, or nothing.
    fn fmt_origin(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

/// Context of envelopes without a group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoGroup;

impl SenderContext for NoGroup {
    fn project(_sender: &Value) -> Self {
        NoGroup
    }

    fn fmt_origin(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Ok(())
    }
}

impl SenderContext for GroupRef {
    fn project(sender: &Value) -> Self {
        GroupRef::project(wire::field(sender, "group"))
    }

    fn fmt_origin(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " {self}")
    }
}

// ============================================================================
// Envelope Kinds
// ============================================================================

/// Marker for one message kind.
pub trait EnvelopeKind: fmt::Debug + Clone + Copy + Default + Send + Sync + 'static {
    /// Top-level wire `type` of this kind.
    const NAME: &'static str;
    /// Key of the sender's display name in the wire `sender` object.
    const SENDER_NAME_KEY: &'static str;
    /// Context projected from the sender.
    type Context: SenderContext;
}

/// Group message kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Group;

impl EnvelopeKind for Group {
    const NAME: &'static str = "GroupMessage";
    const SENDER_NAME_KEY: &'static str = "memberName";
    type Context = GroupRef;
}

/// Friend (private) message kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Friend;

impl EnvelopeKind for Friend {
    const NAME: &'static str = "FriendMessage";
    const SENDER_NAME_KEY: &'static str = "nickname";
    type Context = NoGroup;
}

/// Temporary (group-initiated private) message kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Temp;

impl EnvelopeKind for Temp {
    const NAME: &'static str = "TempMessage";
    const SENDER_NAME_KEY: &'static str = "memberName";
    type Context = GroupRef;
}

// ============================================================================
// Envelope
// ============================================================================

/// A message together with its sender, and for group and temp messages the
/// group it came from.
///
/// Missing, `null` or mistyped sender fields degrade to `None`.
#[derive(Debug, Clone)]
pub struct Envelope<K: EnvelopeKind> {
    message: Message,
    sender_id: Option<i64>,
    sender_name: Option<String>,
    context: K::Context,
    kind: PhantomData<K>,
}

/// A group message.
pub type GroupMessage = Envelope<Group>;
/// A friend message.
pub type FriendMessage = Envelope<Friend>;
/// A temporary message.
pub type TempMessage = Envelope<Temp>;

impl<K: EnvelopeKind> Envelope<K> {
    /// Parses an envelope from a wire payload.
    pub fn from_value(value: &Value, options: &ParseOptions) -> Self {
        Self::from_raw(Arc::new(value.clone()), options)
    }

    /// Parses an envelope from a shared wire payload.
    pub fn from_raw(raw: Arc<Value>, options: &ParseOptions) -> Self {
        let message = Message::from_raw(raw, options);
        let sender = wire::field(message.raw(), "sender");
        let sender_id = wire::i64_field(sender, "id");
        let sender_name = wire::string_field(sender, K::SENDER_NAME_KEY);
        let context = K::Context::project(sender);

        Self {
            message,
            sender_id,
            sender_name,
            context,
            kind: PhantomData,
        }
    }

    /// Top-level wire `type` of this envelope.
    pub fn kind_name(&self) -> &'static str {
        K::NAME
    }

    /// The assembled message.
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// The projected sender context.
    pub fn context(&self) -> &K::Context {
        &self.context
    }
}

impl<K: EnvelopeKind> Deref for Envelope<K> {
    type Target = Message;

    fn deref(&self) -> &Self::Target {
        &self.message
    }
}

impl<K: EnvelopeKind> SenderEvent for Envelope<K> {
    fn sender_id(&self) -> Option<i64> {
        self.sender_id
    }

    fn sender_name(&self) -> Option<&str> {
        self.sender_name.as_deref()
    }
}

impl<K> GroupEvent for Envelope<K>
where
    K: EnvelopeKind<Context = GroupRef>,
{
    fn group(&self) -> &GroupRef {
        &self.context
    }
}

impl<K: EnvelopeKind> fmt::Display for Envelope<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} #{}",
            Nullable(self.time()),
            K::NAME,
            Nullable(self.id())
        )?;
        self.context.fmt_origin(f)?;
        write!(
            f,
            " - {}({}): {:?}",
            Nullable(self.sender_name.as_deref()),
            Nullable(self.sender_id),
            self.text()
        )
    }
}
