//! Line decoder for raw gateway traffic.
//!
//! Turns one line of JSON text into a dispatched [`MiraiEvent`] and renders
//! its display line according to the decode configuration.
//!
//! ```rust,ignore
//! use miraikit_runtime::{Decoder, config::load_config};
//!
//! let config = load_config()?;
//! let decoder = Decoder::from_config(&config.decode);
//! let event = decoder.decode(r#"{"type": "BotOnlineEvent", "qq": 1}"#)?;
//! println!("{}", decoder.render(&event));
//! ```

use std::sync::Arc;

use serde_json::Value;
use tracing::trace;

use miraikit_core::Clock;
use miraikit_mirai::{MiraiEvent, ParseOptions};

use crate::config::DecodeConfig;
use crate::error::{DecodeError, DecodeResult};

/// Decodes raw gateway payloads into events.
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    options: ParseOptions,
    color: bool,
    strict_events: bool,
}

impl Decoder {
    /// Creates a decoder with the local clock, no colour and lenient events.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a decoder from the `decode` configuration section.
    pub fn from_config(config: &DecodeConfig) -> Self {
        Self {
            options: config.parse_options(),
            color: config.color,
            strict_events: config.strict_events,
        }
    }

    /// Sets the clock timestamps are rendered in.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.options.clock = clock;
        self
    }

    /// Enables or disables ANSI colour in rendered lines.
    pub fn with_color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    /// Enables or disables rejection of unknown events.
    pub fn strict(mut self, enabled: bool) -> Self {
        self.strict_events = enabled;
        self
    }

    /// The parse options handed to the message layer.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Decodes one line of JSON text.
    pub fn decode(&self, line: &str) -> DecodeResult<MiraiEvent> {
        let value: Value = serde_json::from_str(line)?;
        self.decode_value(value)
    }

    /// Decodes an already parsed JSON value.
    pub fn decode_value(&self, value: Value) -> DecodeResult<MiraiEvent> {
        if !value.is_object() {
            return Err(DecodeError::NotAnObject);
        }

        let event = MiraiEvent::from_raw(Arc::new(value), &self.options);
        if let MiraiEvent::Unknown { tag, .. } = &event {
            if self.strict_events {
                return Err(DecodeError::UnknownEvent(
                    tag.clone().unwrap_or_else(|| "<untagged>".to_owned()),
                ));
            }
        }

        trace!(tag = ?event.tag(), "decoded event");
        Ok(event)
    }

    /// Renders the display line of an event.
    pub fn render(&self, event: &MiraiEvent) -> String {
        if self.color {
            event.painted()
        } else {
            event.to_string()
        }
    }
}
