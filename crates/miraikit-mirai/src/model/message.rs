//! Inbound message base and chain assembly.
//!
//! A wire message carries a `messageChain` array whose first entry is always
//! a metadata object (`{"type": "Source", "id": ..., "time": ...}`); the
//! remaining entries are elements. Assembly turns that array into a
//! [`Message`]:
//!
//! ```text
//! [ {id, time}, {type: Plain}, {type: Poke}, {type: At} ]
//!      │            │              │              │
//!   id, time     parsed        "[Poke]" in      parsed
//!                              text only
//! ```
//!
//! Unknown discriminants, including a `type` that is not a string, are a
//! data condition and only leave a placeholder in the text. A structural
//! error in any element (not an object, no `type` key, a known element with
//! mistyped fields) discards the whole chain;
//! the message then reports [`ChainStatus::Discarded`].

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace, warn};

use miraikit_core::{ElementChain, ElementError, MessageElement, format_timestamp};

use super::chain::MessageChain;
use super::registry;
use super::segment::{Element, File, ImageRef};
use super::types::ParseOptions;

// ============================================================================
// ChainStatus
// ============================================================================

/// The outcome of chain assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainStatus {
    /// The chain was assembled; it may still hold no elements if the
    /// message carried only metadata.
    Assembled,
    /// The payload had no `messageChain`, or it was empty.
    Empty,
    /// A structural error discarded the whole chain.
    Discarded {
        /// Index of the offending entry in the wire `messageChain`.
        index: usize,
        /// Description of the failure.
        reason: String,
    },
}

impl ChainStatus {
    fn discarded(index: usize, error: &ElementError) -> Self {
        Self::Discarded {
            index,
            reason: error.to_string(),
        }
    }
}

// ============================================================================
// Message
// ============================================================================

/// The chain part of an inbound message, shared by every envelope kind.
#[derive(Debug, Clone)]
pub struct Message {
    id: Option<i64>,
    timestamp: Option<i64>,
    time: Option<String>,
    chain: MessageChain,
    text: String,
    unknown_tags: Vec<String>,
    status: ChainStatus,
    raw: Arc<Value>,
}

/// The leading metadata entry of a chain.
#[derive(Deserialize)]
struct Source {
    id: i64,
    time: i64,
}

struct Assembled {
    elements: Vec<Element>,
    text: String,
    unknown_tags: Vec<String>,
}

impl Message {
    /// Assembles a message from a wire payload.
    pub fn from_value(value: &Value, options: &ParseOptions) -> Self {
        Self::from_raw(Arc::new(value.clone()), options)
    }

    /// Assembles a message from a shared wire payload.
    pub fn from_raw(raw: Arc<Value>, options: &ParseOptions) -> Self {
        let mut message = Self {
            id: None,
            timestamp: None,
            time: None,
            chain: MessageChain::new(),
            text: String::new(),
            unknown_tags: Vec::new(),
            status: ChainStatus::Empty,
            raw: Arc::clone(&raw),
        };

        let entries = match raw.get("messageChain") {
            None | Some(Value::Null) => &[][..],
            Some(Value::Array(entries)) => entries.as_slice(),
            Some(_) => {
                let reason = "messageChain is not an array".to_owned();
                warn!(%reason, "discarding message chain");
                message.status = ChainStatus::Discarded { index: 0, reason };
                return message;
            }
        };

        let Some((source, elements)) = entries.split_first() else {
            return message;
        };

        if let Some((id, timestamp, time)) = read_source(source, options) {
            message.id = Some(id);
            message.timestamp = Some(timestamp);
            message.time = Some(time);
        }

        match assemble(elements) {
            Ok(assembled) => {
                message.chain = MessageChain::from_elements(assembled.elements);
                message.text = assembled.text;
                message.unknown_tags = assembled.unknown_tags;
                message.status = ChainStatus::Assembled;
            }
            Err((index, error)) => {
                warn!(index, error = %error, "discarding message chain");
                message.status = ChainStatus::discarded(index, &error);
            }
        }

        message
    }

    // --------------------------------
    // Accessors
    // --------------------------------

    /// Source id of the message.
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// Send time as epoch seconds.
    pub fn timestamp(&self) -> Option<i64> {
        self.timestamp
    }

    /// Send time formatted as `YYYY-MM-DD HH:MM:SS`.
    pub fn time(&self) -> Option<&str> {
        self.time.as_deref()
    }

    /// The assembled chain.
    pub fn chain(&self) -> &MessageChain {
        &self.chain
    }

    /// The rendered text of the chain, unknown placeholders included.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Discriminants that were skipped as unknown, in chain order.
    pub fn unknown_tags(&self) -> &[String] {
        &self.unknown_tags
    }

    /// The outcome of chain assembly.
    pub fn status(&self) -> &ChainStatus {
        &self.status
    }

    /// Returns true if a structural error discarded the chain.
    pub fn is_discarded(&self) -> bool {
        matches!(self.status, ChainStatus::Discarded { .. })
    }

    /// The raw wire payload.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// The raw wire payload, shared.
    pub fn raw_arc(&self) -> &Arc<Value> {
        &self.raw
    }

    // --------------------------------
    // Derived views
    // --------------------------------

    /// Concatenated content of the text elements.
    pub fn plain(&self) -> String {
        self.chain.plain_text()
    }

    /// The first image or flash image.
    pub fn first_image(&self) -> Option<ImageRef<'_>> {
        self.chain.first_image()
    }

    /// Every image and flash image.
    pub fn images(&self) -> Vec<ImageRef<'_>> {
        self.chain.images()
    }

    /// The first attached file.
    pub fn file(&self) -> Option<&File> {
        self.chain.file()
    }
}

/// Reads id and time from the metadata entry. Both are dropped together.
fn read_source(source: &Value, options: &ParseOptions) -> Option<(i64, i64, String)> {
    let Source { id, time } = match Source::deserialize(source) {
        Ok(source) => source,
        Err(e) => {
            debug!(error = %e, "unreadable message source, id and time left empty");
            return None;
        }
    };
    match format_timestamp(time, options.clock) {
        Some(formatted) => Some((id, time, formatted)),
        None => {
            debug!(time, "message time out of range, id and time left empty");
            None
        }
    }
}

/// Maps the element entries through the registry.
///
/// On failure returns the wire index of the offending entry.
fn assemble(elements: &[Value]) -> Result<Assembled, (usize, ElementError)> {
    let mut assembled = Assembled {
        elements: Vec::with_capacity(elements.len()),
        text: String::new(),
        unknown_tags: Vec::new(),
    };

    for (offset, entry) in elements.iter().enumerate() {
        let index = offset + 1;
        let tag = registry::discriminant(entry).map_err(|e| (index, e))?;

        let Some(parse) = registry::lookup(&tag) else {
            trace!(%tag, index, "skipping unknown element discriminant");
            assembled.text.push('[');
            assembled.text.push_str(&tag);
            assembled.text.push(']');
            assembled.unknown_tags.push(tag.into_owned());
            continue;
        };

        let element = parse(entry).map_err(|e| (index, ElementError::malformed(tag, e)))?;
        assembled.text.push_str(&element.render());
        assembled.elements.push(element);
    }

    Ok(assembled)
}
