//! Static registry of element discriminants.
//!
//! Maps every wire `type` tag to the parse function of its variant. The
//! table is a plain static array built at compile time; lookups never
//! allocate and the registry cannot be mutated at runtime.

use std::borrow::Cow;

use serde::de::DeserializeOwned;
use serde_json::Value;

use miraikit_core::{ElementError, ElementResult};

use super::segment::{
    App, At, AtAll, Dice, Element, Face, File, FlashImage, Image, Json, Plain, Voice, Xml,
};

/// Parses the wire object of one registered variant.
pub type ParseFn = fn(&Value) -> serde_json::Result<Element>;

fn parse<T>(wire: &Value) -> serde_json::Result<Element>
where
    T: DeserializeOwned + Into<Element>,
{
    T::deserialize(wire).map(Into::into)
}

static REGISTRY: [(&str, ParseFn); 12] = [
    ("Plain", parse::<Plain> as ParseFn),
    ("At", parse::<At> as ParseFn),
    ("AtAll", parse::<AtAll> as ParseFn),
    ("Face", parse::<Face> as ParseFn),
    ("Image", parse::<Image> as ParseFn),
    ("FlashImage", parse::<FlashImage> as ParseFn),
    ("Voice", parse::<Voice> as ParseFn),
    ("Xml", parse::<Xml> as ParseFn),
    ("Json", parse::<Json> as ParseFn),
    ("App", parse::<App> as ParseFn),
    ("Dice", parse::<Dice> as ParseFn),
    ("File", parse::<File> as ParseFn),
];

/// Returns the parse function registered for `tag`.
pub fn lookup(tag: &str) -> Option<ParseFn> {
    REGISTRY
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, parse)| *parse)
}

/// Returns true if `tag` names a known element variant.
pub fn is_registered(tag: &str) -> bool {
    lookup(tag).is_some()
}

/// Iterates over every registered discriminant.
pub fn discriminants() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|(name, _)| *name)
}

/// Reads the discriminant of a wire element.
///
/// Fails if the element is not an object or has no `type` key. A `type`
/// that is not a string is returned as its JSON text, which never names a
/// registered variant.
pub fn discriminant(wire: &Value) -> ElementResult<Cow<'_, str>> {
    let object = wire.as_object().ok_or(ElementError::NotAnObject)?;
    match object.get("type") {
        None => Err(ElementError::MissingType),
        Some(Value::String(tag)) => Ok(Cow::Borrowed(tag)),
        Some(other) => Ok(Cow::Owned(other.to_string())),
    }
}

/// Parses a wire element, failing on unknown discriminants.
pub fn parse_element(wire: &Value) -> ElementResult<Element> {
    let tag = discriminant(wire)?;
    let parse = lookup(&tag).ok_or_else(|| ElementError::UnknownDiscriminant(tag.to_string()))?;
    parse(wire).map_err(|e| ElementError::malformed(tag, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use miraikit_core::MessageElement;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn test_registry_covers_every_variant() {
        let samples = [
            Element::text("a"),
            Element::at(1),
            Element::at_all(),
            Element::face(1),
            Element::image("u"),
            Element::flash_image("u"),
            Element::voice("u"),
            Element::xml("x"),
            Element::json("j"),
            Element::app("c"),
            Element::Dice(Dice::new(1).unwrap()),
            Element::File(File::default()),
        ];

        let tags: HashSet<_> = discriminants().collect();
        assert_eq!(tags.len(), REGISTRY.len());
        for sample in &samples {
            assert!(is_registered(sample.tag()), "{} not registered", sample.tag());
            let parsed = lookup(sample.tag()).unwrap()(&sample.to_wire()).unwrap();
            assert_eq!(parsed.tag(), sample.tag());
        }
        assert_eq!(samples.len(), REGISTRY.len());
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert!(is_registered("AtAll"));
        assert!(!is_registered("atall"));
        assert!(!is_registered("Source"));
        assert!(!is_registered("Quote"));
    }

    #[test]
    fn test_discriminant_errors() {
        assert!(matches!(
            discriminant(&json!("Plain")),
            Err(ElementError::NotAnObject)
        ));
        assert!(matches!(
            discriminant(&json!({"text": "a"})),
            Err(ElementError::MissingType)
        ));
        assert_eq!(discriminant(&json!({"type": 3})).unwrap(), "3");
        assert_eq!(discriminant(&json!({"type": null})).unwrap(), "null");
        assert_eq!(discriminant(&json!({"type": "Poke"})).unwrap(), "Poke");
    }

    #[test]
    fn test_parse_element_errors() {
        let err = parse_element(&json!({"type": "Poke"})).unwrap_err();
        assert!(err.is_unknown_discriminant());

        let err = parse_element(&json!({"type": 3})).unwrap_err();
        assert!(matches!(err, ElementError::UnknownDiscriminant(ref tag) if tag == "3"));

        let err = parse_element(&json!({"type": "At", "target": "abc"})).unwrap_err();
        assert!(matches!(err, ElementError::Malformed { ref tag, .. } if tag == "At"));
        assert!(!err.is_unknown_discriminant());
    }
}
