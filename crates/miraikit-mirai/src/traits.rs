//! Mirai-specific traits and types.
//!
//! This module provides the member permission type and the traits shared by
//! events that carry a group context or a sender.

use std::fmt;

use crate::model::types::GroupRef;

/// Represents the role or permission level of a group member.
///
/// Parsed from the gateway's `permission` strings; a value the gateway adds
/// later is kept verbatim as [`MemberRole::Other`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum MemberRole {
    /// Regular member with no special permissions.
    #[default]
    Member,
    /// Administrator with elevated permissions.
    Administrator,
    /// Owner/creator of the group with full permissions.
    Owner,
    /// A permission string this crate does not know.
    Other(String),
}

impl MemberRole {
    /// Parses a wire permission string.
    pub fn from_wire(permission: &str) -> Self {
        match permission {
            "MEMBER" => Self::Member,
            "ADMINISTRATOR" => Self::Administrator,
            "OWNER" => Self::Owner,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Returns the wire permission string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Member => "MEMBER",
            Self::Administrator => "ADMINISTRATOR",
            Self::Owner => "OWNER",
            Self::Other(other) => other,
        }
    }

    /// Returns true for administrators and the owner.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Administrator | Self::Owner)
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trait for events that occur within a group context.
pub trait GroupEvent: Send + Sync {
    /// Returns the group the event happened in.
    fn group(&self) -> &GroupRef;

    /// Returns the group id, if known.
    fn group_id(&self) -> Option<i64> {
        self.group().id
    }

    /// Returns the group name, if known.
    fn group_name(&self) -> Option<&str> {
        self.group().name.as_deref()
    }
}

/// A trait for events sent by a single user.
pub trait SenderEvent: Send + Sync {
    /// Returns the sender's id, if known.
    fn sender_id(&self) -> Option<i64>;

    /// Returns the sender's display name, if known.
    fn sender_name(&self) -> Option<&str>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_role_parse() {
        assert_eq!(MemberRole::from_wire("OWNER"), MemberRole::Owner);
        assert_eq!(MemberRole::from_wire("ADMINISTRATOR"), MemberRole::Administrator);
        assert_eq!(MemberRole::from_wire("MEMBER"), MemberRole::Member);
        assert_eq!(
            MemberRole::from_wire("GUEST"),
            MemberRole::Other("GUEST".into())
        );
        assert_eq!(MemberRole::from_wire("GUEST").as_str(), "GUEST");
        assert_eq!(MemberRole::Administrator.to_string(), "ADMINISTRATOR");
    }

    #[test]
    fn test_member_role_admin() {
        assert!(MemberRole::Owner.is_admin());
        assert!(MemberRole::Administrator.is_admin());
        assert!(!MemberRole::Member.is_admin());
        assert!(!MemberRole::Other("owner".into()).is_admin());
    }
}
