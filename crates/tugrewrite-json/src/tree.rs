// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The JSON syntax tree.
//!
//! [`Json`] is a closed sum of reference-counted node structs. Every node
//! carries a [`NodeId`], the [`Space`] that precedes it, and a [`Markers`]
//! set. Lists of members and array values are [`PaddedList`]s: the trivia
//! between an element and the following `,` (or closing bracket) lives in the
//! element's [`RightPadded::after`].
//!
//! ```text
//! { "a" : 1 , }
//! │└┬┘└┬┘└┬┘│││
//! │ │  │  │ ││└ JsonObject close
//! │ │  │  │ │└─ Empty (prefix " ") for the trailing comma
//! │ │  │  │ └── member after: " "
//! │ │  │  └──── Literal 1, prefix " "
//! │ │  └─────── key after: " "
//! │ └────────── Member prefix " ", key Literal "a"
//! └──────────── JsonObject prefix ""
//! ```
//!
//! An empty container (`{ }`, `[]`) holds a single [`Empty`] element whose
//! prefix is the whitespace inside the brackets.
//!
//! # Identity
//!
//! The `with_*` methods take `self: &Arc<Self>` and return the same `Arc`
//! when the new field is identical to the current one, so an unmodified
//! subtree is never reallocated. Every derived node keeps the original id.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tugrewrite_core::{Markers, NodeId, PaddedList, RightPadded, Space, Tree};

// ============================================================================
// Json
// ============================================================================

/// Any JSON tree node.
#[derive(Debug, Clone)]
pub enum Json {
    Document(Arc<Document>),
    Object(Arc<JsonObject>),
    Member(Arc<Member>),
    Array(Arc<JsonArray>),
    Literal(Arc<Literal>),
    Identifier(Arc<Identifier>),
    Empty(Arc<Empty>),
}

/// The variant tag of a [`Json`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonKind {
    Document,
    Object,
    Member,
    Array,
    Literal,
    Identifier,
    Empty,
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JsonKind::Document => "document",
            JsonKind::Object => "object",
            JsonKind::Member => "member",
            JsonKind::Array => "array",
            JsonKind::Literal => "literal",
            JsonKind::Identifier => "identifier",
            JsonKind::Empty => "empty",
        };
        f.write_str(name)
    }
}

macro_rules! each_variant {
    ($value:expr, $node:ident => $body:expr) => {
        match $value {
            Json::Document($node) => $body,
            Json::Object($node) => $body,
            Json::Member($node) => $body,
            Json::Array($node) => $body,
            Json::Literal($node) => $body,
            Json::Identifier($node) => $body,
            Json::Empty($node) => $body,
        }
    };
}

macro_rules! each_variant_rebuild {
    ($value:expr, $node:ident => $body:expr) => {
        match $value {
            Json::Document($node) => Json::Document($body),
            Json::Object($node) => Json::Object($body),
            Json::Member($node) => Json::Member($body),
            Json::Array($node) => Json::Array($body),
            Json::Literal($node) => Json::Literal($body),
            Json::Identifier($node) => Json::Identifier($body),
            Json::Empty($node) => Json::Empty($body),
        }
    };
}

macro_rules! as_variant {
    ($($method:ident => $variant:ident : $node:ty),* $(,)?) => {
        $(
            pub fn $method(&self) -> Option<&Arc<$node>> {
                match self {
                    Json::$variant(node) => Some(node),
                    _ => None,
                }
            }
        )*
    };
}

impl Json {
    pub fn kind(&self) -> JsonKind {
        match self {
            Json::Document(_) => JsonKind::Document,
            Json::Object(_) => JsonKind::Object,
            Json::Member(_) => JsonKind::Member,
            Json::Array(_) => JsonKind::Array,
            Json::Literal(_) => JsonKind::Literal,
            Json::Identifier(_) => JsonKind::Identifier,
            Json::Empty(_) => JsonKind::Empty,
        }
    }

    as_variant! {
        as_document => Document: Document,
        as_object => Object: JsonObject,
        as_member => Member: Member,
        as_array => Array: JsonArray,
        as_literal => Literal: Literal,
        as_identifier => Identifier: Identifier,
    }

    /// True for the placeholder used by empty containers and trailing commas.
    pub fn is_empty(&self) -> bool {
        matches!(self, Json::Empty(_))
    }

    /// True for nodes that may appear as a member key.
    pub fn is_key(&self) -> bool {
        match self {
            Json::Literal(literal) => literal.value().as_str().is_some(),
            Json::Identifier(_) => true,
            _ => false,
        }
    }

    /// The text of a key node: a string literal's value or an identifier's
    /// name. For a member, its key.
    pub fn key_name(&self) -> Option<&str> {
        match self {
            Json::Literal(literal) => literal.value().as_str(),
            Json::Identifier(identifier) => Some(identifier.name()),
            Json::Member(member) => member.key_name(),
            _ => None,
        }
    }

    pub fn literal_value(&self) -> Option<&LiteralValue> {
        self.as_literal().map(|literal| literal.value())
    }

    #[must_use]
    pub fn with_prefix(&self, prefix: Space) -> Json {
        each_variant_rebuild!(self, node => node.with_prefix(prefix))
    }

    #[must_use]
    pub fn with_markers(&self, markers: Markers) -> Json {
        each_variant_rebuild!(self, node => node.with_markers(markers))
    }
}

impl Tree for Json {
    fn id(&self) -> NodeId {
        each_variant!(self, node => node.id())
    }

    fn prefix(&self) -> &Space {
        each_variant!(self, node => node.prefix())
    }

    fn markers(&self) -> &Markers {
        each_variant!(self, node => node.markers())
    }

    fn is_same(&self, other: &Self) -> bool {
        match (self, other) {
            (Json::Document(a), Json::Document(b)) => Arc::ptr_eq(a, b),
            (Json::Object(a), Json::Object(b)) => Arc::ptr_eq(a, b),
            (Json::Member(a), Json::Member(b)) => Arc::ptr_eq(a, b),
            (Json::Array(a), Json::Array(b)) => Arc::ptr_eq(a, b),
            (Json::Literal(a), Json::Literal(b)) => Arc::ptr_eq(a, b),
            (Json::Identifier(a), Json::Identifier(b)) => Arc::ptr_eq(a, b),
            (Json::Empty(a), Json::Empty(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

macro_rules! impl_from_node {
    ($($variant:ident : $node:ty),* $(,)?) => {
        $(
            impl From<Arc<$node>> for Json {
                fn from(node: Arc<$node>) -> Self {
                    Json::$variant(node)
                }
            }

            impl From<$node> for Json {
                fn from(node: $node) -> Self {
                    Json::$variant(Arc::new(node))
                }
            }
        )*
    };
}

impl_from_node! {
    Document: Document,
    Object: JsonObject,
    Member: Member,
    Array: JsonArray,
    Literal: Literal,
    Identifier: Identifier,
    Empty: Empty,
}

// ============================================================================
// Shared node fields
// ============================================================================

/// Accessors and `with_*` updates shared by every node struct.
macro_rules! node_common {
    ($node:ty) => {
        impl $node {
            pub fn id(&self) -> NodeId {
                self.id
            }

            pub fn prefix(&self) -> &Space {
                &self.prefix
            }

            pub fn markers(&self) -> &Markers {
                &self.markers
            }

            #[must_use]
            pub fn with_prefix(self: &Arc<Self>, prefix: Space) -> Arc<Self> {
                if Space::ptr_eq(&self.prefix, &prefix) {
                    return Arc::clone(self);
                }
                Arc::new(Self {
                    prefix,
                    ..(**self).clone()
                })
            }

            #[must_use]
            pub fn with_markers(self: &Arc<Self>, markers: Markers) -> Arc<Self> {
                if Markers::ptr_eq(&self.markers, &markers) {
                    return Arc::clone(self);
                }
                Arc::new(Self {
                    markers,
                    ..(**self).clone()
                })
            }
        }
    };
}

node_common!(Document);
node_common!(JsonObject);
node_common!(Member);
node_common!(JsonArray);
node_common!(Literal);
node_common!(Identifier);
node_common!(Empty);

fn non_empty(list: &PaddedList<Json>) -> impl Iterator<Item = &Json> {
    list.iter()
        .map(RightPadded::element)
        .filter(|element| !element.is_empty())
}

// ============================================================================
// Document
// ============================================================================

/// A whole source file: one top-level value plus the trivia before EOF.
#[derive(Debug, Clone)]
pub struct Document {
    id: NodeId,
    prefix: Space,
    markers: Markers,
    source_path: PathBuf,
    bom: bool,
    value: Json,
    eof: Space,
}

impl Document {
    pub fn new(source_path: impl Into<PathBuf>, bom: bool, value: Json, eof: Space) -> Self {
        Self {
            id: NodeId::next(),
            prefix: Space::empty(),
            markers: Markers::empty(),
            source_path: source_path.into(),
            bom,
            value,
            eof,
        }
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Whether the source began with a UTF-8 byte order mark.
    pub fn has_bom(&self) -> bool {
        self.bom
    }

    pub fn value(&self) -> &Json {
        &self.value
    }

    /// Trivia after the top-level value.
    pub fn eof(&self) -> &Space {
        &self.eof
    }

    #[must_use]
    pub fn with_value(self: &Arc<Self>, value: Json) -> Arc<Self> {
        if self.value.is_same(&value) {
            return Arc::clone(self);
        }
        Arc::new(Self {
            value,
            ..(**self).clone()
        })
    }

    #[must_use]
    pub fn with_eof(self: &Arc<Self>, eof: Space) -> Arc<Self> {
        if Space::ptr_eq(&self.eof, &eof) {
            return Arc::clone(self);
        }
        Arc::new(Self {
            eof,
            ..(**self).clone()
        })
    }

    #[must_use]
    pub fn with_source_path(self: &Arc<Self>, source_path: impl Into<PathBuf>) -> Arc<Self> {
        let source_path = source_path.into();
        if self.source_path == source_path {
            return Arc::clone(self);
        }
        Arc::new(Self {
            source_path,
            ..(**self).clone()
        })
    }
}

// ============================================================================
// Object
// ============================================================================

/// `{ ... }`. Members are [`Member`] nodes, or a single [`Empty`] for `{}`;
/// a trailing comma is followed by an `Empty` element.
#[derive(Debug, Clone)]
pub struct JsonObject {
    id: NodeId,
    prefix: Space,
    markers: Markers,
    members: PaddedList<Json>,
}

impl JsonObject {
    pub fn new(prefix: Space, members: PaddedList<Json>) -> Self {
        Self {
            id: NodeId::next(),
            prefix,
            markers: Markers::empty(),
            members,
        }
    }

    /// Every element, including [`Empty`] placeholders.
    pub fn members(&self) -> Vec<Json> {
        RightPadded::get_elements(&self.members)
    }

    pub fn padded_members(&self) -> &PaddedList<Json> {
        &self.members
    }

    /// The real members, skipping placeholders.
    pub fn member_nodes(&self) -> impl Iterator<Item = &Arc<Member>> {
        non_empty(&self.members).filter_map(Json::as_member)
    }

    /// The first member whose key is `key`.
    pub fn get(&self, key: &str) -> Option<&Arc<Member>> {
        self.member_nodes()
            .find(|member| member.key_name() == Some(key))
    }

    /// Replace the members, keeping each surviving member's padding.
    #[must_use]
    pub fn with_members(self: &Arc<Self>, members: Vec<Json>) -> Arc<Self> {
        self.with_padded_members(RightPadded::with_elements(&self.members, members))
    }

    #[must_use]
    pub fn with_padded_members(self: &Arc<Self>, members: PaddedList<Json>) -> Arc<Self> {
        if Arc::ptr_eq(&self.members, &members) {
            return Arc::clone(self);
        }
        Arc::new(Self {
            members,
            ..(**self).clone()
        })
    }
}

// ============================================================================
// Member
// ============================================================================

/// `key : value`. The key's `after` is the trivia before the colon; the
/// value's prefix is the trivia after it.
#[derive(Debug, Clone)]
pub struct Member {
    id: NodeId,
    prefix: Space,
    markers: Markers,
    key: RightPadded<Json>,
    value: Json,
}

impl Member {
    /// # Panics
    ///
    /// If `key` is not a string literal or identifier.
    pub fn new(prefix: Space, key: RightPadded<Json>, value: Json) -> Self {
        assert_key(key.element());
        Self {
            id: NodeId::next(),
            prefix,
            markers: Markers::empty(),
            key,
            value,
        }
    }

    pub fn key(&self) -> &Json {
        self.key.element()
    }

    pub fn padded_key(&self) -> &RightPadded<Json> {
        &self.key
    }

    pub fn key_name(&self) -> Option<&str> {
        self.key.element().key_name()
    }

    pub fn value(&self) -> &Json {
        &self.value
    }

    /// # Panics
    ///
    /// If `key` is not a string literal or identifier.
    #[must_use]
    pub fn with_key(self: &Arc<Self>, key: Json) -> Arc<Self> {
        self.with_padded_key(self.key.with_element(key))
    }

    /// # Panics
    ///
    /// If the key element is not a string literal or identifier.
    #[must_use]
    pub fn with_padded_key(self: &Arc<Self>, key: RightPadded<Json>) -> Arc<Self> {
        if key.element().is_same(self.key.element()) && Space::ptr_eq(key.after(), self.key.after())
        {
            return Arc::clone(self);
        }
        assert_key(key.element());
        Arc::new(Self {
            key,
            ..(**self).clone()
        })
    }

    #[must_use]
    pub fn with_value(self: &Arc<Self>, value: Json) -> Arc<Self> {
        if self.value.is_same(&value) {
            return Arc::clone(self);
        }
        Arc::new(Self {
            value,
            ..(**self).clone()
        })
    }
}

fn assert_key(key: &Json) {
    assert!(
        key.is_key(),
        "member key must be a string literal or identifier, got {}",
        key.kind()
    );
}

// ============================================================================
// Array
// ============================================================================

/// `[ ... ]`. An empty array holds a single [`Empty`] element.
#[derive(Debug, Clone)]
pub struct JsonArray {
    id: NodeId,
    prefix: Space,
    markers: Markers,
    values: PaddedList<Json>,
}

impl JsonArray {
    pub fn new(prefix: Space, values: PaddedList<Json>) -> Self {
        Self {
            id: NodeId::next(),
            prefix,
            markers: Markers::empty(),
            values,
        }
    }

    /// Every element, including [`Empty`] placeholders.
    pub fn values(&self) -> Vec<Json> {
        RightPadded::get_elements(&self.values)
    }

    pub fn padded_values(&self) -> &PaddedList<Json> {
        &self.values
    }

    /// The real elements, skipping placeholders.
    pub fn elements(&self) -> impl Iterator<Item = &Json> {
        non_empty(&self.values)
    }

    #[must_use]
    pub fn with_values(self: &Arc<Self>, values: Vec<Json>) -> Arc<Self> {
        self.with_padded_values(RightPadded::with_elements(&self.values, values))
    }

    #[must_use]
    pub fn with_padded_values(self: &Arc<Self>, values: PaddedList<Json>) -> Arc<Self> {
        if Arc::ptr_eq(&self.values, &values) {
            return Arc::clone(self);
        }
        Arc::new(Self {
            values,
            ..(**self).clone()
        })
    }
}

// ============================================================================
// Literal
// ============================================================================

/// The decoded value of a [`Literal`].
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Bool(bool),
    Null,
}

impl LiteralValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            LiteralValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            LiteralValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            LiteralValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, LiteralValue::Null)
    }

    /// Canonical JSON source text for this value.
    pub fn to_source(&self) -> String {
        match self {
            LiteralValue::String(value) => quote_string(value, '"'),
            LiteralValue::Number(value) => format_number(*value),
            LiteralValue::Bool(value) => value.to_string(),
            LiteralValue::Null => "null".to_string(),
        }
    }
}

/// Unquoted text: the raw string for strings, source form otherwise.
impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::String(value) => f.write_str(value),
            other => f.write_str(&other.to_source()),
        }
    }
}

/// A string, number, boolean or null, with its exact source text.
#[derive(Debug, Clone)]
pub struct Literal {
    id: NodeId,
    prefix: Space,
    markers: Markers,
    source: String,
    value: LiteralValue,
}

impl Literal {
    pub fn new(prefix: Space, source: impl Into<String>, value: LiteralValue) -> Self {
        Self {
            id: NodeId::next(),
            prefix,
            markers: Markers::empty(),
            source: source.into(),
            value,
        }
    }

    /// A literal whose source is the canonical form of `value`.
    pub fn from_value(prefix: Space, value: LiteralValue) -> Self {
        Self::new(prefix, value.to_source(), value)
    }

    /// A string literal written with `quote` (`"` or `'`).
    pub fn string(prefix: Space, value: &str, quote: char) -> Self {
        Self::new(
            prefix,
            quote_string(value, quote),
            LiteralValue::String(value.to_string()),
        )
    }

    /// The literal exactly as written, including quotes.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn value(&self) -> &LiteralValue {
        &self.value
    }

    /// The quote character of a string literal.
    pub fn quote(&self) -> Option<char> {
        match self.value {
            LiteralValue::String(_) => self.source.chars().next(),
            _ => None,
        }
    }

    /// Replace the value, regenerating the source text.
    #[must_use]
    pub fn with_value(self: &Arc<Self>, value: LiteralValue) -> Arc<Self> {
        if self.value == value {
            return Arc::clone(self);
        }
        let source = match (&value, self.quote()) {
            (LiteralValue::String(text), Some(quote)) => quote_string(text, quote),
            _ => value.to_source(),
        };
        Arc::new(Self {
            source,
            value,
            ..(**self).clone()
        })
    }
}

// ============================================================================
// Identifier and Empty
// ============================================================================

/// An unquoted JSON5 member key.
#[derive(Debug, Clone)]
pub struct Identifier {
    id: NodeId,
    prefix: Space,
    markers: Markers,
    name: String,
}

impl Identifier {
    pub fn new(prefix: Space, name: impl Into<String>) -> Self {
        Self {
            id: NodeId::next(),
            prefix,
            markers: Markers::empty(),
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn with_name(self: &Arc<Self>, name: impl Into<String>) -> Arc<Self> {
        let name = name.into();
        if self.name == name {
            return Arc::clone(self);
        }
        Arc::new(Self {
            name,
            ..(**self).clone()
        })
    }
}

/// Placeholder element carrying the trivia of an empty container or of the
/// space after a trailing comma.
#[derive(Debug, Clone)]
pub struct Empty {
    id: NodeId,
    prefix: Space,
    markers: Markers,
}

impl Empty {
    pub fn new(prefix: Space) -> Self {
        Self {
            id: NodeId::next(),
            prefix,
            markers: Markers::empty(),
        }
    }
}

// ============================================================================
// Source text helpers
// ============================================================================

/// Quote and escape `value` as a JSON (or JSON5 single-quoted) string.
pub fn quote_string(value: &str, quote: char) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Source form of a number: integral values without a fraction, JSON5
/// spellings for the non-finite ones.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let spelled = if value > 0.0 { "Infinity" } else { "-Infinity" };
        spelled.to_string()
    } else if value == 0.0 && value.is_sign_negative() {
        "-0".to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        (value as i64).to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tugrewrite_core::SearchResult;

    fn literal(value: LiteralValue) -> Arc<Literal> {
        Arc::new(Literal::from_value(Space::empty(), value))
    }

    fn member(key: &str, value: Json) -> Arc<Member> {
        let key = Json::from(Literal::string(Space::empty(), key, '"'));
        Arc::new(Member::new(
            Space::single_space(),
            RightPadded::build(key),
            value,
        ))
    }

    #[test]
    fn test_with_prefix_short_circuits_and_keeps_id() {
        let node = literal(LiteralValue::Null);
        let same = node.with_prefix(node.prefix().clone());
        assert!(Arc::ptr_eq(&node, &same));

        let moved = node.with_prefix(Space::build("\n  ", vec![]));
        assert!(!Arc::ptr_eq(&node, &moved));
        assert_eq!(moved.id(), node.id());
    }

    #[test]
    fn test_with_markers_short_circuits_and_keeps_id() {
        let node = literal(LiteralValue::Null);
        let same = node.with_markers(node.markers().clone());
        assert!(Arc::ptr_eq(&node, &same));

        let json = Json::Literal(Arc::clone(&node));
        assert!(json.with_markers(json.markers().clone()).is_same(&json));

        let marked = node.with_markers(SearchResult::found(node.markers(), None));
        assert!(!Arc::ptr_eq(&node, &marked));
        assert_eq!(marked.id(), node.id());
    }

    #[test]
    fn test_is_same_is_identity() {
        let a = Json::Literal(literal(LiteralValue::Bool(true)));
        let b = Json::Literal(literal(LiteralValue::Bool(true)));
        assert!(a.is_same(&a.clone()));
        assert!(!a.is_same(&b));
    }

    #[test]
    fn test_member_key_name() {
        let m = member("name", Json::Literal(literal(LiteralValue::Number(1.0))));
        assert_eq!(m.key_name(), Some("name"));
        assert_eq!(Json::Member(m).key_name(), Some("name"));

        let identifier = Json::from(Identifier::new(Space::empty(), "bare"));
        assert!(identifier.is_key());
        assert_eq!(identifier.key_name(), Some("bare"));
    }

    #[test]
    #[should_panic(expected = "member key must be a string literal or identifier")]
    fn test_member_rejects_non_key() {
        let number = Json::Literal(literal(LiteralValue::Number(3.0)));
        let _ = Member::new(Space::empty(), RightPadded::build(number.clone()), number);
    }

    #[test]
    fn test_object_with_members_noop() {
        let a = member("a", Json::Literal(literal(LiteralValue::Null)));
        let object = Arc::new(JsonObject::new(
            Space::empty(),
            Arc::new(vec![RightPadded::build(Json::Member(a))]),
        ));
        let same = object.with_members(object.members());
        assert!(Arc::ptr_eq(&object, &same));
        assert!(object.get("a").is_some());
        assert!(object.get("b").is_none());
    }

    #[test]
    fn test_literal_with_value_keeps_quote_style() {
        let single = Arc::new(Literal::string(Space::empty(), "it", '\''));
        let changed = single.with_value(LiteralValue::String("it's".to_string()));
        assert_eq!(changed.source(), r"'it\'s'");
        assert_eq!(changed.id(), single.id());

        let number = literal(LiteralValue::Number(1.0));
        assert!(Arc::ptr_eq(
            &number,
            &number.with_value(LiteralValue::Number(1.0))
        ));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(42.0), "42");
        assert_eq!(format_number(-0.5), "-0.5");
        assert_eq!(format_number(-0.0), "-0");
        assert_eq!(format_number(0.0), "0");
        let negative_zero = Literal::from_value(Space::empty(), LiteralValue::Number(-0.0));
        assert_eq!(negative_zero.source(), "-0");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NAN), "NaN");
    }

    #[test]
    fn test_quote_string_escapes() {
        assert_eq!(quote_string("a\"b\n", '"'), r#""a\"b\n""#);
        assert_eq!(quote_string("\u{1}", '"'), r#""\u0001""#);
    }

    #[test]
    fn test_display_for_literal_value() {
        assert_eq!(LiteralValue::String("x".to_string()).to_string(), "x");
        assert_eq!(LiteralValue::Number(2.5).to_string(), "2.5");
        assert_eq!(LiteralValue::Null.to_string(), "null");
    }
}
