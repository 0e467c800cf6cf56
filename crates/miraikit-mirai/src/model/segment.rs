//! Message elements of the mirai chain format.
//!
//! A message chain on the wire is a JSON array of objects, each carrying a
//! `type` discriminant plus variant-specific fields:
//!
//! ```text
//! {"type": "Plain", "text": "hello "}
//! {"type": "At", "target": 10001000, "display": "@Alice"}
//! {"type": "Image", "imageId": "{01E9...}.jpg", "url": "https://..."}
//! ```
//!
//! Every variant renders itself as display text (its [`Display`] form),
//! serializes to a wire object ([`Element::to_wire`]) and parses from one
//! ([`Element::from_wire`], dispatched through the static
//! [`registry`](super::registry)).
//!
//! # Equality
//!
//! Equality is per variant and deliberately not structural for every type:
//! a mention compares only its target, media compares only the server
//! assigned id, and a sticker uses the tie-break documented on [`Face`].
//!
//! # Example
//!
//! ```rust,ignore
//! use miraikit_mirai::{Element, Image};
//! use miraikit_core::MessageElement;
//!
//! let hello = Element::text("Hello, ");
//! let at = Element::at(10001000);
//! let image: Element = Image::from_url("https://example.com/a.png").into();
//! ```

use std::fmt;
use std::ops::RangeInclusive;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use miraikit_core::wire::nullable;
use miraikit_core::{ElementResult, MessageElement};

use super::registry;

// ============================================================================
// Element Enum
// ============================================================================

/// A single element of a mirai message chain.
///
/// Variant names are the wire discriminants. Serialization emits the
/// `type` tag followed by the variant's fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Element {
    /// Plain text.
    Plain(Plain),
    /// Mention of a single member.
    At(At),
    /// Mention of every member.
    AtAll(AtAll),
    /// Built-in sticker.
    Face(Face),
    /// Image.
    Image(Image),
    /// Image that expires after being viewed.
    FlashImage(FlashImage),
    /// Voice clip.
    Voice(Voice),
    /// XML card.
    Xml(Xml),
    /// JSON card.
    Json(Json),
    /// Mini-app card.
    App(App),
    /// Dice roll.
    Dice(Dice),
    /// Group file reference.
    File(File),
}

impl Element {
    /// Returns the wire discriminant of this element.
    pub fn tag(&self) -> &'static str {
        match self {
            Element::Plain(_) => "Plain",
            Element::At(_) => "At",
            Element::AtAll(_) => "AtAll",
            Element::Face(_) => "Face",
            Element::Image(_) => "Image",
            Element::FlashImage(_) => "FlashImage",
            Element::Voice(_) => "Voice",
            Element::Xml(_) => "Xml",
            Element::Json(_) => "Json",
            Element::App(_) => "App",
            Element::Dice(_) => "Dice",
            Element::File(_) => "File",
        }
    }

    /// Serializes this element into its wire object.
    pub fn to_wire(&self) -> Value {
        // Every element serializes to a string-keyed map.
        serde_json::to_value(self).unwrap_or_default()
    }

    /// Parses a single wire object through the discriminant registry.
    ///
    /// Unlike chain assembly, an unknown discriminant is an error here.
    pub fn from_wire(wire: &Value) -> ElementResult<Self> {
        registry::parse_element(wire)
    }

    /// Returns the image payload if this is an image or flash image.
    pub fn as_image(&self) -> Option<ImageRef<'_>> {
        match self {
            Element::Image(data) => Some(ImageRef::Normal(data)),
            Element::FlashImage(data) => Some(ImageRef::Flash(data)),
            _ => None,
        }
    }

    /// Returns the file reference if this is a file element.
    pub fn as_file(&self) -> Option<&File> {
        match self {
            Element::File(data) => Some(data),
            _ => None,
        }
    }

    /// Returns the mention target if this is a single-member mention.
    pub fn as_mention(&self) -> Option<&At> {
        match self {
            Element::At(data) => Some(data),
            _ => None,
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Plain(data) => fmt::Display::fmt(data, f),
            Element::At(data) => fmt::Display::fmt(data, f),
            Element::AtAll(data) => fmt::Display::fmt(data, f),
            Element::Face(data) => fmt::Display::fmt(data, f),
            Element::Image(data) => fmt::Display::fmt(data, f),
            Element::FlashImage(data) => fmt::Display::fmt(data, f),
            Element::Voice(data) => fmt::Display::fmt(data, f),
            Element::Xml(data) => fmt::Display::fmt(data, f),
            Element::Json(data) => fmt::Display::fmt(data, f),
            Element::App(data) => fmt::Display::fmt(data, f),
            Element::Dice(data) => fmt::Display::fmt(data, f),
            Element::File(data) => fmt::Display::fmt(data, f),
        }
    }
}

impl MessageElement for Element {
    fn text(text: impl Into<String>) -> Self {
        Element::Plain(Plain::new(text))
    }

    fn element_type(&self) -> &'static str {
        self.tag()
    }

    fn as_text(&self) -> Option<&str> {
        match self {
            Element::Plain(data) => Some(&data.text),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for Element {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = Value::deserialize(deserializer)?;
        Element::from_wire(&wire).map_err(serde::de::Error::custom)
    }
}

macro_rules! element_from {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Element {
                fn from(data: $variant) -> Self {
                    Element::$variant(data)
                }
            }

            impl $variant {
                /// Serializes into a wire object, `type` tag included.
                pub fn to_wire(&self) -> Value {
                    Element::from(self.clone()).to_wire()
                }
            }
        )*
    };
}

element_from!(
    Plain, At, AtAll, Face, Image, FlashImage, Voice, Xml, Json, App, Dice, File,
);

// ============================================================================
// Element Builder Methods
// ============================================================================

impl Element {
    /// Creates a mention of a single member.
    pub fn at(target: i64) -> Self {
        Element::At(At::new(target))
    }

    /// Creates a mention of every member.
    pub fn at_all() -> Self {
        Element::AtAll(AtAll {})
    }

    /// Creates a sticker by its numeric id.
    pub fn face(face_id: i64) -> Self {
        Element::Face(Face::from_id(face_id))
    }

    /// Creates an image from a remote url.
    pub fn image(url: impl Into<String>) -> Self {
        Element::Image(Image::from_url(url))
    }

    /// Creates a flash image from a remote url.
    pub fn flash_image(url: impl Into<String>) -> Self {
        Element::FlashImage(FlashImage::from_url(url))
    }

    /// Creates a voice clip from a remote url.
    pub fn voice(url: impl Into<String>) -> Self {
        Element::Voice(Voice::from_url(url))
    }

    /// Creates an XML card.
    pub fn xml(xml: impl Into<String>) -> Self {
        Element::Xml(Xml { xml: xml.into() })
    }

    /// Creates a JSON card.
    pub fn json(json: impl Into<Value>) -> Self {
        Element::Json(Json { json: json.into() })
    }

    /// Creates a mini-app card.
    pub fn app(content: impl Into<String>) -> Self {
        Element::App(App {
            content: content.into(),
        })
    }

    /// Creates a dice roll with a random value.
    pub fn dice() -> Self {
        Element::Dice(Dice::roll())
    }
}

// ============================================================================
// Element Data Types
// ============================================================================

/// Plain text element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plain {
    /// The text content.
    #[serde(default, deserialize_with = "nullable")]
    pub text: String,
}

impl Plain {
    /// Creates a text element.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl fmt::Display for Plain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Mention of a single member.
///
/// Two mentions are equal iff they target the same id; the display name is
/// receive-only and never serialized.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct At {
    /// Member id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<i64>,
    /// Display name as shown by the client (receive only).
    #[serde(default, skip_serializing)]
    pub display: Option<String>,
}

impl At {
    /// Creates a mention of `target`.
    pub fn new(target: i64) -> Self {
        Self {
            target: Some(target),
            display: None,
        }
    }
}

impl PartialEq for At {
    fn eq(&self, other: &Self) -> bool {
        self.target == other.target
    }
}

impl fmt::Display for At {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match non_empty(&self.display) {
            Some(display) => write!(f, "[At:{} | {display}]", Blank(self.target)),
            None => write!(f, "[At:{}]", Blank(self.target)),
        }
    }
}

/// Mention of every member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtAll {}

impl fmt::Display for AtAll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[AtAll]")
    }
}

/// Built-in sticker, identified by numeric id, by name, or both.
///
/// Equality is a three-way tie-break: if both sides carry an id the ids are
/// compared; otherwise, if both carry a name the names are compared;
/// otherwise the stickers are not equal. A sticker with only an id is never
/// equal to one with only a name, and a sticker with neither is not equal
/// to anything, itself included.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Face {
    /// Numeric sticker id.
    #[serde(default)]
    pub face_id: Option<i64>,
    /// Sticker name.
    #[serde(default)]
    pub name: Option<String>,
}

impl Face {
    /// Creates a sticker by id.
    pub fn from_id(face_id: i64) -> Self {
        Self {
            face_id: Some(face_id),
            name: None,
        }
    }

    /// Creates a sticker by name.
    pub fn from_name(name: impl Into<String>) -> Self {
        Self {
            face_id: None,
            name: Some(name.into()),
        }
    }

}

/// Emits the id if present, else the name; never both.
impl Serialize for Face {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let len = usize::from(self.face_id.is_some() || self.name.is_some());
        let mut state = serializer.serialize_struct("Face", len)?;
        if let Some(face_id) = &self.face_id {
            state.serialize_field("faceId", face_id)?;
        } else if let Some(name) = &self.name {
            state.serialize_field("name", name)?;
        }
        state.end()
    }
}

impl PartialEq for Face {
    fn eq(&self, other: &Self) -> bool {
        if let (Some(a), Some(b)) = (self.face_id, other.face_id) {
            return a == b;
        }
        match (&self.name, &other.name) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.face_id, non_empty(&self.name)) {
            (Some(id), Some(name)) => write!(f, "[Face:{id} | {name}]"),
            (Some(id), None) => write!(f, "[Face:{id}]"),
            (None, Some(name)) => write!(f, "[Face:{name}]"),
            (None, None) => f.write_str("[Face]"),
        }
    }
}

/// Media elements share one payload: a local path to upload, a remote url
/// and the id assigned by the server. On the wire only one source is sent,
/// picked in the order path, url, id.
macro_rules! media_element {
    (
        $(#[$meta:meta])*
        $name:ident {
            tag: $tag:literal,
            label: $label:literal,
            id: $id:ident = $id_key:literal $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, Deserialize)]
        pub struct $name {
            #[serde(default)]
            path: Option<String>,
            #[serde(default)]
            url: Option<String>,
            #[serde(default, rename = $id_key)]
            $id: Option<String>,
        }

        impl $name {
            /// Creates an element uploaded from a local path.
            pub fn from_path(path: impl Into<String>) -> Self {
                Self {
                    path: Some(path.into()),
                    ..Self::default()
                }
            }

            /// Creates an element fetched from a remote url.
            pub fn from_url(url: impl Into<String>) -> Self {
                Self {
                    url: Some(url.into()),
                    ..Self::default()
                }
            }

            /// Creates an element referencing a server-assigned id.
            pub fn from_id(id: impl Into<String>) -> Self {
                Self {
                    $id: Some(id.into()),
                    ..Self::default()
                }
            }

            /// Local path, if any.
            pub fn path(&self) -> Option<&str> {
                self.path.as_deref()
            }

            /// Remote url, if any.
            pub fn url(&self) -> Option<&str> {
                self.url.as_deref()
            }

            /// Server-assigned id, if any.
            pub fn $id(&self) -> Option<&str> {
                self.$id.as_deref()
            }

        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                let source = [
                    ("path", &self.path),
                    ("url", &self.url),
                    ($id_key, &self.$id),
                ]
                .into_iter()
                .find_map(|(key, value)| value.as_ref().map(|value| (key, value)));

                let mut state = serializer.serialize_struct($tag, usize::from(source.is_some()))?;
                if let Some((key, value)) = source {
                    state.serialize_field(key, value)?;
                }
                state.end()
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.$id == other.$id
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let id = Blank(self.$id.as_deref());
                match non_empty(&self.url) {
                    Some(url) => write!(f, "[{}:{id} | {url}]", $label),
                    None => write!(f, "[{}:{id}]", $label),
                }
            }
        }
    };
}

media_element! {
    /// Image element. Equal iff the server-assigned ids are equal.
    Image {
        tag: "Image",
        label: "Image",
        id: image_id = "imageId",
    }
}

media_element! {
    /// Flash image element: an image whose display expires client-side.
    ///
    /// Same payload and text form as [`Image`], different wire tag.
    FlashImage {
        tag: "FlashImage",
        label: "Image",
        id: image_id = "imageId",
    }
}

media_element! {
    /// Voice clip element. Equal iff the server-assigned ids are equal.
    Voice {
        tag: "Voice",
        label: "Voice",
        id: voice_id = "voiceId",
    }
}

impl Image {
    /// Converts into a flash image with the same payload.
    pub fn to_flash(&self) -> FlashImage {
        FlashImage {
            path: self.path.clone(),
            url: self.url.clone(),
            image_id: self.image_id.clone(),
        }
    }
}

impl FlashImage {
    /// Converts into a normal image with the same payload.
    pub fn to_image(&self) -> Image {
        Image {
            path: self.path.clone(),
            url: self.url.clone(),
            image_id: self.image_id.clone(),
        }
    }
}

impl From<FlashImage> for Image {
    fn from(flash: FlashImage) -> Self {
        Image {
            path: flash.path,
            url: flash.url,
            image_id: flash.image_id,
        }
    }
}

impl From<Image> for FlashImage {
    fn from(image: Image) -> Self {
        FlashImage {
            path: image.path,
            url: image.url,
            image_id: image.image_id,
        }
    }
}

/// A borrowed image payload, either a normal image or a flash image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImageRef<'a> {
    /// A normal image.
    Normal(&'a Image),
    /// A flash image.
    Flash(&'a FlashImage),
}

impl<'a> ImageRef<'a> {
    /// Returns true for flash images.
    pub fn is_flash(self) -> bool {
        matches!(self, ImageRef::Flash(_))
    }

    /// Server-assigned id, if any.
    pub fn image_id(self) -> Option<&'a str> {
        match self {
            ImageRef::Normal(image) => image.image_id(),
            ImageRef::Flash(flash) => flash.image_id(),
        }
    }

    /// Remote url, if any.
    pub fn url(self) -> Option<&'a str> {
        match self {
            ImageRef::Normal(image) => image.url(),
            ImageRef::Flash(flash) => flash.url(),
        }
    }

    /// Returns an owned normal image with the same payload.
    pub fn to_image(self) -> Image {
        match self {
            ImageRef::Normal(image) => image.clone(),
            ImageRef::Flash(flash) => flash.to_image(),
        }
    }
}

impl fmt::Display for ImageRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageRef::Normal(image) => fmt::Display::fmt(image, f),
            ImageRef::Flash(flash) => fmt::Display::fmt(flash, f),
        }
    }
}

/// XML card element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Xml {
    /// Raw XML document.
    #[serde(default, deserialize_with = "nullable")]
    pub xml: String,
}

impl fmt::Display for Xml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Xml:{}]", self.xml)
    }
}

/// JSON card element.
///
/// The payload is kept as received: usually a JSON document encoded as a
/// string, occasionally a structured value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Json {
    /// Card payload.
    #[serde(default)]
    pub json: Value,
}

impl fmt::Display for Json {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.json {
            Value::String(payload) => write!(f, "[Json:{payload}]"),
            payload => write!(f, "[Json:{payload}]"),
        }
    }
}

/// Mini-app card element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct App {
    /// Opaque app content.
    #[serde(default, deserialize_with = "nullable")]
    pub content: String,
}

impl fmt::Display for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[App:{}]", self.content)
    }
}

/// Dice roll element.
///
/// The value always lies in [`Dice::FACES`]. A dice parsed without a
/// `value`, or with `0`, rolls one, as does [`Dice::roll`]; any other value
/// outside the faces is malformed. Pass a seeded [`fastrand::Rng`] to
/// [`Dice::roll_with`] for reproducible rolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DiceWire")]
pub struct Dice {
    value: i64,
}

#[derive(Deserialize)]
struct DiceWire {
    #[serde(default)]
    value: Option<i64>,
}

impl TryFrom<DiceWire> for Dice {
    type Error = String;

    fn try_from(wire: DiceWire) -> Result<Self, Self::Error> {
        match wire.value {
            None | Some(0) => Ok(Dice::roll()),
            Some(value) => {
                Dice::new(value).ok_or_else(|| format!("dice value {value} is not in 1..=6"))
            }
        }
    }
}

impl Dice {
    /// The faces of a die.
    pub const FACES: RangeInclusive<i64> = 1..=6;

    /// Creates a dice showing `value`, or `None` if it is not a face.
    pub fn new(value: i64) -> Option<Self> {
        Self::FACES.contains(&value).then_some(Self { value })
    }

    /// Rolls a dice using the thread-local generator.
    pub fn roll() -> Self {
        Self {
            value: fastrand::i64(Self::FACES),
        }
    }

    /// Rolls a dice using the given generator.
    pub fn roll_with(rng: &mut fastrand::Rng) -> Self {
        Self {
            value: rng.i64(Self::FACES),
        }
    }

    /// The value shown.
    pub fn value(&self) -> i64 {
        self.value
    }
}

impl fmt::Display for Dice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Dice:{}]", self.value)
    }
}

/// Group file reference element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    /// File id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Internal numeric id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_id: Option<i64>,
    /// File name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Size in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[File:{} | {}]",
            Blank(self.name.as_deref()),
            Blank(self.id.as_deref())
        )
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Treats an empty string as absent.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

/// Renders an absent value as nothing.
struct Blank<T>(Option<T>);

impl<T: fmt::Display> fmt::Display for Blank<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(value) => fmt::Display::fmt(value, f),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use miraikit_core::ElementError;
    use serde_json::json;

    fn round_trip(element: &Element) -> Element {
        Element::from_wire(&element.to_wire()).unwrap()
    }

    #[test]
    fn test_round_trip_constructible_variants() {
        let elements = vec![
            Element::text("hello"),
            Element::text(""),
            Element::at(10001000),
            Element::at_all(),
            Element::face(178),
            Element::Face(Face::from_name("smile")),
            Element::Face(Face {
                face_id: Some(178),
                name: Some("smile".into()),
            }),
            Image::from_path("/tmp/a.png").into(),
            Image::from_url("https://example.com/a.png").into(),
            Image::from_id("{ABC}.png").into(),
            FlashImage::from_path("/tmp/a.png").into(),
            FlashImage::from_url("https://example.com/a.png").into(),
            FlashImage::from_id("{ABC}.png").into(),
            Voice::from_path("/tmp/a.amr").into(),
            Voice::from_url("https://example.com/a.amr").into(),
            Voice::from_id("{VOICE}.amr").into(),
            Element::xml("<msg/>"),
            Element::json("{\"app\":\"x\"}"),
            Element::json(json!({"app": "x"})),
            Element::app("{\"app\":\"mini\"}"),
            Element::Dice(Dice::new(4).unwrap()),
            Element::File(File {
                id: Some("/abc".into()),
                internal_id: Some(102),
                name: Some("notes.txt".into()),
                size: Some(2048),
            }),
            Element::File(File {
                name: Some("partial.bin".into()),
                ..File::default()
            }),
        ];

        for element in &elements {
            assert_eq!(&round_trip(element), element, "round trip of {element:?}");
        }
    }

    #[test]
    fn test_render_templates() {
        assert_eq!(Element::text("hi ").render(), "hi ");
        assert_eq!(Element::at(111).render(), "[At:111]");
        let at = At {
            target: Some(111),
            display: Some("Bob".into()),
        };
        assert_eq!(at.to_string(), "[At:111 | Bob]");
        assert_eq!(Element::at_all().render(), "[AtAll]");

        assert_eq!(Face::from_id(178).to_string(), "[Face:178]");
        assert_eq!(Face::from_name("smile").to_string(), "[Face:smile]");
        let both = Face {
            face_id: Some(178),
            name: Some("smile".into()),
        };
        assert_eq!(both.to_string(), "[Face:178 | smile]");
        assert_eq!(Face::default().to_string(), "[Face]");

        let received: Image =
            serde_json::from_value(json!({"imageId": "{A}.jpg", "url": "https://x/a.jpg"}))
                .unwrap();
        assert_eq!(received.to_string(), "[Image:{A}.jpg | https://x/a.jpg]");
        assert_eq!(Image::from_id("{A}.jpg").to_string(), "[Image:{A}.jpg]");
        assert_eq!(
            Image::from_id("{A}.jpg").to_flash().to_string(),
            "[Image:{A}.jpg]"
        );
        assert_eq!(Voice::from_id("{V}.amr").to_string(), "[Voice:{V}.amr]");
        assert_eq!(
            Voice::from_url("https://x/v.amr").to_string(),
            "[Voice: | https://x/v.amr]"
        );

        assert_eq!(Element::xml("<a/>").render(), "[Xml:<a/>]");
        assert_eq!(Element::json("{}").render(), "[Json:{}]");
        assert_eq!(Element::json(json!({"k": 1})).render(), "[Json:{\"k\":1}]");
        assert_eq!(Element::app("card").render(), "[App:card]");
        assert_eq!(Element::Dice(Dice::new(3).unwrap()).render(), "[Dice:3]");

        let file = File {
            id: Some("/abc".into()),
            name: Some("notes.txt".into()),
            ..File::default()
        };
        assert_eq!(file.to_string(), "[File:notes.txt | /abc]");
    }

    #[test]
    fn test_render_treats_empty_strings_as_absent() {
        let at = Element::from_wire(&json!({"type": "At", "target": 111, "display": ""})).unwrap();
        assert_eq!(at.render(), "[At:111]");

        let image: Image = serde_json::from_value(json!({"imageId": "{A}.jpg", "url": ""})).unwrap();
        assert_eq!(image.to_string(), "[Image:{A}.jpg]");

        let voice: Voice = serde_json::from_value(json!({"voiceId": "{V}.amr", "url": ""})).unwrap();
        assert_eq!(voice.to_string(), "[Voice:{V}.amr]");

        let face = Face {
            face_id: Some(5),
            name: Some(String::new()),
        };
        assert_eq!(face.to_string(), "[Face:5]");
    }

    #[test]
    fn test_media_serialization_precedence() {
        let all: Image = serde_json::from_value(json!({
            "path": "/tmp/a.png",
            "url": "https://x/a.png",
            "imageId": "{A}.png",
        }))
        .unwrap();
        assert_eq!(all.to_wire(), json!({"type": "Image", "path": "/tmp/a.png"}));

        let url_and_id: Voice =
            serde_json::from_value(json!({"url": "https://x/v.amr", "voiceId": "{V}.amr"}))
                .unwrap();
        assert_eq!(
            url_and_id.to_wire(),
            json!({"type": "Voice", "url": "https://x/v.amr"})
        );
        assert_eq!(url_and_id.voice_id(), Some("{V}.amr"));

        assert_eq!(
            FlashImage::from_id("{A}.png").to_wire(),
            json!({"type": "FlashImage", "imageId": "{A}.png"})
        );
    }

    #[test]
    fn test_face_serializes_id_or_name_never_both() {
        let both = Face {
            face_id: Some(1),
            name: Some("smile".into()),
        };
        assert_eq!(both.to_wire(), json!({"type": "Face", "faceId": 1}));
        assert_eq!(
            Face::from_name("smile").to_wire(),
            json!({"type": "Face", "name": "smile"})
        );
        assert_eq!(Face::from_id(0).to_wire(), json!({"type": "Face", "faceId": 0}));
    }

    #[test]
    fn test_face_equality_tie_break() {
        let by_id = Face::from_id(14);
        let by_name = Face::from_name("smile");
        let both = Face {
            face_id: Some(14),
            name: Some("frown".into()),
        };

        assert_ne!(by_id, by_name);
        assert_ne!(by_name, by_id);
        assert_eq!(by_id, both);
        assert_ne!(by_name, both);
        assert_eq!(
            Face::from_name("smile"),
            Face {
                face_id: Some(1),
                name: Some("smile".into())
            }
        );
        assert_ne!(Face::default(), Face::default());
    }

    #[test]
    fn test_mention_and_media_equality() {
        let plain = At::new(111);
        let displayed = At {
            target: Some(111),
            display: Some("Bob".into()),
        };
        assert_eq!(plain, displayed);
        assert_ne!(At::new(111), At::new(222));

        let received: Image =
            serde_json::from_value(json!({"imageId": "{A}.png", "url": "https://x/a.png"}))
                .unwrap();
        assert_eq!(received, Image::from_id("{A}.png"));
        assert_ne!(Image::from_id("{A}.png"), Image::from_id("{B}.png"));
        assert_ne!(
            Element::Image(Image::from_id("{A}.png")),
            Element::FlashImage(FlashImage::from_id("{A}.png"))
        );
        assert_eq!(Element::at_all(), Element::at_all());
    }

    #[test]
    fn test_flash_conversion_keeps_payload() {
        let image = Image::from_url("https://x/a.png");
        let flash = image.to_flash();
        assert_eq!(flash.url(), Some("https://x/a.png"));
        assert_eq!(flash.to_image().url(), Some("https://x/a.png"));

        let converted: Image = FlashImage::from_id("{A}.png").into();
        assert_eq!(converted.image_id(), Some("{A}.png"));

        let element = Element::FlashImage(flash);
        let view = element.as_image().unwrap();
        assert!(view.is_flash());
        assert_eq!(view.to_image().url(), Some("https://x/a.png"));
    }

    #[test]
    fn test_dice_default_roll() {
        for _ in 0..200 {
            assert!(Dice::FACES.contains(&Dice::roll().value()));
        }

        let parsed = Element::from_wire(&json!({"type": "Dice"})).unwrap();
        let Element::Dice(dice) = parsed else {
            panic!("expected a dice, got {parsed:?}");
        };
        assert!(Dice::FACES.contains(&dice.value()));
    }

    #[test]
    fn test_dice_value_stays_on_faces() {
        assert_eq!(Dice::new(6).map(|dice| dice.value()), Some(6));
        assert!(Dice::new(0).is_none());
        assert!(Dice::new(9).is_none());
        assert!(Dice::new(-1).is_none());

        for value in [json!(0), Value::Null] {
            let parsed = Element::from_wire(&json!({"type": "Dice", "value": value})).unwrap();
            let Element::Dice(dice) = parsed else {
                panic!("expected a dice, got {parsed:?}");
            };
            assert!(Dice::FACES.contains(&dice.value()));
        }

        let err = Element::from_wire(&json!({"type": "Dice", "value": 9})).unwrap_err();
        assert!(matches!(err, ElementError::Malformed { ref tag, .. } if tag == "Dice"));
    }

    #[test]
    fn test_dice_seeded_roll_is_reproducible() {
        let mut first = fastrand::Rng::with_seed(7);
        let mut second = fastrand::Rng::with_seed(7);
        for _ in 0..20 {
            assert_eq!(Dice::roll_with(&mut first), Dice::roll_with(&mut second));
        }
    }

    #[test]
    fn test_deserialize_reads_all_media_fields() {
        let element = Element::from_wire(&json!({
            "type": "Image",
            "imageId": "{A}.png",
            "url": "https://x/a.png",
            "path": null,
        }))
        .unwrap();
        let image = element.as_image().unwrap();
        assert_eq!(image.image_id(), Some("{A}.png"));
        assert_eq!(image.url(), Some("https://x/a.png"));
        assert!(!image.is_flash());
    }

    #[test]
    fn test_absent_and_null_fields_default() {
        let plain = Element::from_wire(&json!({"type": "Plain", "text": null})).unwrap();
        assert_eq!(plain, Element::text(""));

        let at = Element::from_wire(&json!({"type": "At"})).unwrap();
        assert_eq!(at.render(), "[At:]");

        let json_card = Element::from_wire(&json!({"type": "Json"})).unwrap();
        assert_eq!(json_card, Element::json(Value::Null));
    }

    #[test]
    fn test_serde_impls_use_wire_form() {
        let chain = vec![Element::text("a"), Element::at(1), Element::at_all()];
        let json = serde_json::to_string(&chain).unwrap();
        assert_eq!(
            json,
            r#"[{"type":"Plain","text":"a"},{"type":"At","target":1},{"type":"AtAll"}]"#
        );

        let back: Vec<Element> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, chain);

        let file = File {
            name: Some("notes.txt".into()),
            size: Some(12),
            ..File::default()
        };
        assert_eq!(
            serde_json::to_string(&Element::File(file)).unwrap(),
            r#"{"type":"File","name":"notes.txt","size":12}"#
        );
        assert_eq!(
            serde_json::to_string(&Element::from(Image::from_url("https://x/a.png"))).unwrap(),
            r#"{"type":"Image","url":"https://x/a.png"}"#
        );

        let err = serde_json::from_str::<Element>(r#"{"type":"Poke","name":"x"}"#).unwrap_err();
        assert!(err.to_string().contains("Poke"));
    }
}
