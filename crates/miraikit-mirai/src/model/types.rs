//! Common mirai types.
//!
//! This module defines shared types used across mirai messages and events,
//! such as parse options, group references and operator information.

use std::fmt;

use serde_json::Value;

use miraikit_core::{Clock, wire};

use crate::traits::MemberRole;

/// Options that influence how payloads are parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Clock used to format message timestamps.
    pub clock: Clock,
}

impl ParseOptions {
    /// Creates options using `clock`.
    pub fn new(clock: Clock) -> Self {
        Self { clock }
    }
}

/// A group as referenced from a message sender or an event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupRef {
    /// Group id.
    pub id: Option<i64>,
    /// Group name.
    pub name: Option<String>,
}

impl GroupRef {
    /// Projects a wire `group` object; anything else yields an empty ref.
    pub fn project(group: &Value) -> Self {
        Self {
            id: wire::i64_field(group, "id"),
            name: wire::string_field(group, "name"),
        }
    }
}

impl fmt::Display for GroupRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({})",
            Nullable(self.name.as_deref()),
            Nullable(self.id)
        )
    }
}

/// The member that performed an action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Operator {
    /// Member id.
    pub id: Option<i64>,
    /// Member name in the group.
    pub name: Option<String>,
    /// Member permission.
    pub permission: Option<MemberRole>,
}

impl Operator {
    /// Projects a wire `operator` object; anything else yields an empty
    /// operator.
    pub fn project(operator: &Value) -> Self {
        Self {
            id: wire::i64_field(operator, "id"),
            name: wire::string_field(operator, "memberName"),
            permission: wire::str_field(operator, "permission").map(MemberRole::from_wire),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({})",
            Nullable(self.name.as_deref()),
            Nullable(self.id)
        )
    }
}

/// Displays an optional value, rendering `None` for absent values.
pub struct Nullable<T>(pub Option<T>);

impl<T: fmt::Display> fmt::Display for Nullable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(value) => fmt::Display::fmt(value, f),
            None => f.write_str("None"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_group_ref_projection() {
        let group = GroupRef::project(&json!({"id": 12345, "name": "Rustaceans"}));
        assert_eq!(group.id, Some(12345));
        assert_eq!(group.name.as_deref(), Some("Rustaceans"));
        assert_eq!(group.to_string(), "Rustaceans(12345)");

        assert_eq!(GroupRef::project(&Value::Null), GroupRef::default());
        assert_eq!(GroupRef::project(&json!("12345")), GroupRef::default());
        assert_eq!(GroupRef::default().to_string(), "None(None)");
    }

    #[test]
    fn test_operator_projection() {
        let operator = Operator::project(&json!({
            "id": 1,
            "memberName": "Alice",
            "permission": "OWNER",
        }));
        assert_eq!(operator.id, Some(1));
        assert_eq!(operator.name.as_deref(), Some("Alice"));
        assert_eq!(operator.permission, Some(MemberRole::Owner));

        let mistyped = Operator::project(&json!({"id": "1", "permission": 3}));
        assert_eq!(mistyped, Operator::default());
    }
}
