//! Element and chain traits.
//!
//! The message model is built around two abstractions:
//! - [`MessageElement`]: a single unit of content (text, image, mention, ...)
//! - [`ElementChain`]: an ordered sequence of elements forming one message
//!
//! Protocol models define their own element enum and chain type and
//! implement these traits, which gives them the shared text views for free.

use std::fmt::{Debug, Display};

// ============================================================================
// Message Element Trait
// ============================================================================

/// A single element of a message chain.
///
/// The [`Display`] form of an element is its rendered text, the form that is
/// concatenated into a message's textual summary.
///
/// # Example
///
/// ```rust,ignore
/// use miraikit_core::MessageElement;
///
/// fn process_element<E: MessageElement>(element: &E) {
///     println!("Element type: {}", element.element_type());
///     if let Some(text) = element.as_text() {
///         println!("Text content: {text}");
///     }
/// }
/// ```
pub trait MessageElement: Debug + Clone + Display + Send + Sync + 'static {
    /// Creates a plain text element.
    fn text(text: impl Into<String>) -> Self;

    /// Returns the wire discriminant of this element (e.g. "Plain", "Image").
    fn element_type(&self) -> &'static str;

    /// Returns the text content if this is a plain text element.
    fn as_text(&self) -> Option<&str>;

    /// Returns true if this is a plain text element.
    fn is_text(&self) -> bool {
        self.as_text().is_some()
    }

    /// Renders the element as display text.
    fn render(&self) -> String {
        self.to_string()
    }
}

// ============================================================================
// Element Chain Trait
// ============================================================================

/// An ordered sequence of [`MessageElement`]s.
///
/// Order is significant: rendering and every derived view walk the elements
/// exactly as they were received.
///
/// # Example
///
/// ```rust,ignore
/// use miraikit_core::ElementChain;
///
/// fn process_chain<C: ElementChain>(chain: &C) {
///     println!("Chain has {} elements", chain.len());
///     println!("Plain text: {}", chain.plain_text());
/// }
/// ```
pub trait ElementChain: Debug + Clone + Send + Sync + 'static {
    /// The element type used by this chain.
    type Element: MessageElement;

    /// Returns the elements as a slice.
    fn as_slice(&self) -> &[Self::Element];

    /// Returns an iterator over the elements.
    fn iter(&self) -> std::slice::Iter<'_, Self::Element> {
        self.as_slice().iter()
    }

    /// Returns the number of elements in the chain.
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Returns true if the chain has no elements.
    fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Concatenates the content of every text element, skipping all others.
    fn plain_text(&self) -> String {
        self.iter().filter_map(MessageElement::as_text).collect()
    }

    /// Concatenates the rendered text of every element.
    fn render(&self) -> String {
        self.iter().map(MessageElement::render).collect()
    }

    /// Returns true if the chain contains only text elements.
    fn is_plain_text(&self) -> bool {
        self.iter().all(MessageElement::is_text)
    }
}
