//! Mirai message chain type.
//!
//! [`MessageChain`] is the ordered element sequence of one message. Inbound
//! chains are produced by message assembly (see [`Message`](super::Message));
//! outbound chains are built with the builder methods and serialized as a
//! JSON array for the transport.
//!
//! # Example
//!
//! ```rust,ignore
//! use miraikit_mirai::MessageChain;
//!
//! let chain = MessageChain::new()
//!     .text("Hello, ")
//!     .at(10001000)
//!     .text("! Look: ")
//!     .image("https://example.com/image.jpg");
//!
//! let wire = serde_json::to_value(&chain)?;
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use miraikit_core::{ElementChain, ElementError, ElementResult, MessageElement};

use super::segment::{At, Dice, Element, Face, File, ImageRef};

// ============================================================================
// MessageChain
// ============================================================================

/// An ordered sequence of mirai message elements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MessageChain {
    elements: Vec<Element>,
}

impl ElementChain for MessageChain {
    type Element = Element;

    fn as_slice(&self) -> &[Self::Element] {
        &self.elements
    }
}

// ============================================================================
// Serialization / Deserialization
// ============================================================================

impl Serialize for MessageChain {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.elements.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MessageChain {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Vec::<Element>::deserialize(deserializer).map(Self::from_elements)
    }
}

// ============================================================================
// Constructors and Builders
// ============================================================================

impl MessageChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a chain from a vector of elements.
    pub fn from_elements(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    /// Creates a chain holding a single text element.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            elements: vec![Element::text(text)],
        }
    }

    /// Parses an outbound wire array strictly.
    ///
    /// Every entry must be a registered element; the first failure aborts
    /// the parse.
    pub fn from_wire_array(wire: &[Value]) -> ElementResult<Self> {
        wire.iter()
            .map(Element::from_wire)
            .collect::<ElementResult<Vec<_>>>()
            .map(Self::from_elements)
    }

    /// Parses an outbound wire value, which must be an array.
    pub fn from_wire(wire: &Value) -> ElementResult<Self> {
        match wire {
            Value::Array(items) => Self::from_wire_array(items),
            _ => Err(ElementError::NotAnArray),
        }
    }

    /// Serializes the chain into a wire array.
    pub fn to_wire(&self) -> Value {
        Value::Array(self.elements.iter().map(Element::to_wire).collect())
    }

    // --------------------------------
    // Builder methods
    // --------------------------------

    /// Adds a text element.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.elements.push(Element::text(text));
        self
    }

    /// Adds a mention of a single member.
    pub fn at(mut self, target: i64) -> Self {
        self.elements.push(Element::at(target));
        self
    }

    /// Adds a mention of every member.
    pub fn at_all(mut self) -> Self {
        self.elements.push(Element::at_all());
        self
    }

    /// Adds a sticker by id.
    pub fn face(mut self, face_id: i64) -> Self {
        self.elements.push(Element::face(face_id));
        self
    }

    /// Adds a sticker by name.
    pub fn face_named(mut self, name: impl Into<String>) -> Self {
        self.elements.push(Face::from_name(name).into());
        self
    }

    /// Adds an image from a remote url.
    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.elements.push(Element::image(url));
        self
    }

    /// Adds a flash image from a remote url.
    pub fn flash_image(mut self, url: impl Into<String>) -> Self {
        self.elements.push(Element::flash_image(url));
        self
    }

    /// Adds a voice clip from a remote url.
    pub fn voice(mut self, url: impl Into<String>) -> Self {
        self.elements.push(Element::voice(url));
        self
    }

    /// Adds an XML card.
    pub fn xml(mut self, xml: impl Into<String>) -> Self {
        self.elements.push(Element::xml(xml));
        self
    }

    /// Adds a JSON card.
    pub fn json(mut self, json: impl Into<Value>) -> Self {
        self.elements.push(Element::json(json));
        self
    }

    /// Adds a mini-app card.
    pub fn app(mut self, content: impl Into<String>) -> Self {
        self.elements.push(Element::app(content));
        self
    }

    /// Adds a dice, e.g. `Dice::roll()` or a validated `Dice::new(4)`.
    pub fn dice(mut self, dice: Dice) -> Self {
        self.elements.push(dice.into());
        self
    }

    /// Adds an arbitrary element.
    pub fn element(mut self, element: impl Into<Element>) -> Self {
        self.elements.push(element.into());
        self
    }

    /// Appends multiple elements.
    pub fn append_elements(mut self, elements: impl IntoIterator<Item = Element>) -> Self {
        self.elements.extend(elements);
        self
    }

    // --------------------------------
    // Mutable builder methods
    // --------------------------------

    /// Adds an element (mutable).
    pub fn push(&mut self, element: impl Into<Element>) -> &mut Self {
        self.elements.push(element.into());
        self
    }

    /// Adds a text element (mutable).
    pub fn push_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.elements.push(Element::text(text));
        self
    }
}

// ============================================================================
// Derived Views
// ============================================================================

impl MessageChain {
    /// Returns the elements as a slice.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Converts the chain into its elements.
    pub fn into_elements(self) -> Vec<Element> {
        self.elements
    }

    /// Returns the first image or flash image.
    pub fn first_image(&self) -> Option<ImageRef<'_>> {
        self.elements.iter().find_map(Element::as_image)
    }

    /// Returns every image and flash image, in chain order.
    pub fn images(&self) -> Vec<ImageRef<'_>> {
        self.elements.iter().filter_map(Element::as_image).collect()
    }

    /// Returns the first attached file.
    pub fn file(&self) -> Option<&File> {
        self.elements.iter().find_map(Element::as_file)
    }

    /// Returns the targets of every single-member mention, in chain order.
    ///
    /// Mentions without a target are skipped.
    pub fn mentions(&self) -> Vec<i64> {
        self.elements
            .iter()
            .filter_map(Element::as_mention)
            .filter_map(|at: &At| at.target)
            .collect()
    }

    /// Returns true if the chain mentions every member.
    pub fn mentions_all(&self) -> bool {
        self.elements
            .iter()
            .any(|element| matches!(element, Element::AtAll(_)))
    }

    /// Returns true if the chain mentions `target`.
    pub fn mentions_target(&self, target: i64) -> bool {
        self.elements
            .iter()
            .filter_map(Element::as_mention)
            .any(|at| at.target == Some(target))
    }
}

// ============================================================================
// From implementations
// ============================================================================

impl From<Vec<Element>> for MessageChain {
    fn from(elements: Vec<Element>) -> Self {
        Self { elements }
    }
}

impl From<Element> for MessageChain {
    fn from(element: Element) -> Self {
        Self {
            elements: vec![element],
        }
    }
}

impl From<&str> for MessageChain {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

impl FromIterator<Element> for MessageChain {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a MessageChain {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
