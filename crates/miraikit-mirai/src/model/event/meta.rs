//! Bot status events.
//!
//! Online and offline events carry only their status tag, e.g.
//! `BotReloginEvent` or `BotOfflineEventDropped`. Their display form is the
//! bare tag; [`BotOnlineEvent::painted`] and [`BotOfflineEvent::painted`]
//! wrap it in ANSI colour for terminals.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use miraikit_core::wire;

use crate::model::types::Nullable;

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

// ============================================================================
// BotOnlineEvent
// ============================================================================

/// The bot came online.
#[derive(Debug, Clone)]
pub struct BotOnlineEvent {
    /// Status tag, e.g. `BotOnlineEvent` or `BotReloginEvent`.
    pub kind: Option<String>,
    raw: Arc<Value>,
}

impl BotOnlineEvent {
    /// Parses the event from a wire payload.
    pub fn from_value(value: &Value) -> Self {
        Self::from_raw(Arc::new(value.clone()))
    }

    /// Parses the event from a shared wire payload.
    pub fn from_raw(raw: Arc<Value>) -> Self {
        Self {
            kind: wire::string_field(&raw, "type"),
            raw,
        }
    }

    /// The raw wire payload.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// The status tag in green.
    pub fn painted(&self) -> String {
        format!("{GREEN}{self}{RESET}")
    }
}

impl fmt::Display for BotOnlineEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Nullable(self.kind.as_deref()), f)
    }
}

// ============================================================================
// BotOfflineEvent
// ============================================================================

/// The bot went offline.
#[derive(Debug, Clone)]
pub struct BotOfflineEvent {
    /// Status tag, e.g. `BotOfflineEventActive`.
    pub kind: Option<String>,
    raw: Arc<Value>,
}

impl BotOfflineEvent {
    /// Parses the event from a wire payload.
    pub fn from_value(value: &Value) -> Self {
        Self::from_raw(Arc::new(value.clone()))
    }

    /// Parses the event from a shared wire payload.
    pub fn from_raw(raw: Arc<Value>) -> Self {
        Self {
            kind: wire::string_field(&raw, "type"),
            raw,
        }
    }

    /// The raw wire payload.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// The status tag in red.
    pub fn painted(&self) -> String {
        format!("{RED}{self}{RESET}")
    }
}

impl fmt::Display for BotOfflineEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Nullable(self.kind.as_deref()), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_online_event() {
        let event = BotOnlineEvent::from_value(&json!({"type": "BotReloginEvent", "qq": 1}));
        assert_eq!(event.kind.as_deref(), Some("BotReloginEvent"));
        assert_eq!(event.to_string(), "BotReloginEvent");
        assert_eq!(event.painted(), "\x1b[32mBotReloginEvent\x1b[0m");
    }

    #[test]
    fn test_offline_event() {
        let event = BotOfflineEvent::from_value(&json!({"type": "BotOfflineEventForce"}));
        assert_eq!(event.to_string(), "BotOfflineEventForce");
        assert_eq!(event.painted(), "\x1b[31mBotOfflineEventForce\x1b[0m");
    }

    #[test]
    fn test_missing_tag() {
        let event = BotOfflineEvent::from_value(&json!({}));
        assert_eq!(event.kind, None);
        assert_eq!(event.to_string(), "None");
        assert_eq!(event.raw(), &json!({}));
    }
}
