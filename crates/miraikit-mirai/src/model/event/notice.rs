//! Notice events.
//!
//! Flat records projected from their own wire shape, independent of message
//! chains. Every field is nullable; a missing, `null` or non-object nested
//! value degrades to all-`None` fields.
//!
//! ```text
//! GroupRecallEvent       { messageId, authorId, group, operator }
//! MemberCardChangeEvent  { origin, current, member { group }, operator | null }
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use miraikit_core::wire;

use crate::model::types::{GroupRef, Nullable, Operator};
use crate::traits::GroupEvent;

// ============================================================================
// GroupRecallEvent
// ============================================================================

/// A group message was recalled.
#[derive(Debug, Clone)]
pub struct GroupRecallEvent {
    /// Id of the recalled message.
    pub message_id: Option<i64>,
    /// Id of the recalled message's author.
    pub author_id: Option<i64>,
    /// Group the message was sent in.
    pub group: GroupRef,
    /// Member that recalled the message.
    pub operator: Operator,
    raw: Arc<Value>,
}

impl GroupRecallEvent {
    /// Parses the event from a wire payload.
    pub fn from_value(value: &Value) -> Self {
        Self::from_raw(Arc::new(value.clone()))
    }

    /// Parses the event from a shared wire payload.
    pub fn from_raw(raw: Arc<Value>) -> Self {
        Self {
            message_id: wire::i64_field(&raw, "messageId"),
            author_id: wire::i64_field(&raw, "authorId"),
            group: GroupRef::project(wire::field(&raw, "group")),
            operator: Operator::project(wire::field(&raw, "operator")),
            raw,
        }
    }

    /// The raw wire payload.
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

impl GroupEvent for GroupRecallEvent {
    fn group(&self) -> &GroupRef {
        &self.group
    }
}

impl fmt::Display for GroupRecallEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GroupRecallEvent #{} {} - {} recalled a message from {}",
            Nullable(self.message_id),
            self.group,
            self.operator,
            Nullable(self.author_id)
        )
    }
}

// ============================================================================
// MemberCardChangeEvent
// ============================================================================

/// A group member whose card changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Member {
    /// Member id.
    pub id: Option<i64>,
    /// Member name in the group.
    pub name: Option<String>,
    /// Group the member belongs to.
    pub group: GroupRef,
}

impl Member {
    fn project(member: &Value) -> Self {
        Self {
            id: wire::i64_field(member, "id"),
            name: wire::string_field(member, "memberName"),
            group: GroupRef::project(wire::field(member, "group")),
        }
    }
}

/// A member's group card (nickname) changed.
///
/// The gateway sends a `null` operator when the change was made by the
/// member themselves or by the server; the operator fields are then `None`.
#[derive(Debug, Clone)]
pub struct MemberCardChangeEvent {
    /// Card before the change.
    pub origin: Option<String>,
    /// Card after the change.
    pub current: Option<String>,
    /// Member whose card changed.
    pub member: Member,
    /// Member that changed the card.
    pub operator: Operator,
    raw: Arc<Value>,
}

impl MemberCardChangeEvent {
    /// Parses the event from a wire payload.
    pub fn from_value(value: &Value) -> Self {
        Self::from_raw(Arc::new(value.clone()))
    }

    /// Parses the event from a shared wire payload.
    pub fn from_raw(raw: Arc<Value>) -> Self {
        Self {
            origin: wire::string_field(&raw, "origin"),
            current: wire::string_field(&raw, "current"),
            member: Member::project(wire::field(&raw, "member")),
            operator: Operator::project(wire::field(&raw, "operator")),
            raw,
        }
    }

    /// The raw wire payload.
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

impl GroupEvent for MemberCardChangeEvent {
    fn group(&self) -> &GroupRef {
        &self.member.group
    }
}

impl fmt::Display for MemberCardChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MemberCardChangeEvent {} - {}({})'s card was changed from '{}' to '{}' by {}",
            self.member.group,
            Nullable(self.member.name.as_deref()),
            Nullable(self.member.id),
            Nullable(self.origin.as_deref()),
            Nullable(self.current.as_deref()),
            self.operator
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MemberRole;
    use serde_json::json;

    #[test]
    fn test_group_recall() {
        let payload = json!({
            "type": "GroupRecallEvent",
            "authorId": 111,
            "messageId": 42,
            "time": 1700000000,
            "group": {"id": 222, "name": "Rust", "permission": "MEMBER"},
            "operator": {"id": 333, "memberName": "Admin", "permission": "ADMINISTRATOR"},
        });
        let event = GroupRecallEvent::from_value(&payload);

        assert_eq!(event.message_id, Some(42));
        assert_eq!(event.author_id, Some(111));
        assert_eq!(event.group_id(), Some(222));
        assert_eq!(event.operator.permission, Some(MemberRole::Administrator));
        assert_eq!(event.raw(), &payload);
        assert_eq!(
            event.to_string(),
            "GroupRecallEvent #42 Rust(222) - Admin(333) recalled a message from 111"
        );
    }

    #[test]
    fn test_group_recall_missing_objects() {
        let event = GroupRecallEvent::from_value(&json!({"messageId": 1, "group": null}));
        assert_eq!(event.group, GroupRef::default());
        assert_eq!(event.operator, Operator::default());
        assert_eq!(
            event.to_string(),
            "GroupRecallEvent #1 None(None) - None(None) recalled a message from None"
        );
    }

    #[test]
    fn test_member_card_change() {
        let payload = json!({
            "type": "MemberCardChangeEvent",
            "origin": "old",
            "current": "new",
            "member": {
                "id": 111,
                "memberName": "Alice",
                "permission": "MEMBER",
                "group": {"id": 222, "name": "Rust"},
            },
            "operator": {"id": 333, "memberName": "Owner", "permission": "OWNER"},
        });
        let event = MemberCardChangeEvent::from_value(&payload);

        assert_eq!(event.origin.as_deref(), Some("old"));
        assert_eq!(event.member.id, Some(111));
        assert_eq!(event.group_id(), Some(222));
        assert_eq!(event.group_name(), Some("Rust"));
        assert_eq!(event.operator.permission, Some(MemberRole::Owner));
        assert_eq!(
            event.to_string(),
            "MemberCardChangeEvent Rust(222) - Alice(111)'s card was changed from 'old' to 'new' by Owner(333)"
        );
    }

    #[test]
    fn test_member_card_change_null_operator() {
        let payload = json!({
            "origin": "",
            "current": "new",
            "member": {"id": 111, "memberName": "Alice"},
            "operator": null,
        });
        let event = MemberCardChangeEvent::from_value(&payload);

        assert_eq!(event.operator, Operator::default());
        assert_eq!(event.group_id(), None);
        assert_eq!(
            event.to_string(),
            "MemberCardChangeEvent None(None) - Alice(111)'s card was changed from '' to 'new' by None(None)"
        );
    }
}
