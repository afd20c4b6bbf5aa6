// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Recursive-descent parser for JSON and JSON5.
//!
//! Every byte of the input ends up in the tree: trivia is captured into
//! prefixes and paddings with [`parse_trivia`], literals keep their source
//! text, and a leading byte order mark is recorded on the [`Document`].
//! Printing the result reproduces the input exactly.
//!
//! Failures are returned as [`ParseError`] values so a batch of documents
//! can continue past an unparseable one (see [`parse_inputs`]).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};
use tugrewrite_core::{parse_trivia, CommentSyntax, Markers, RightPadded, Space};

use crate::options::ParseOptions;
use crate::tree::{
    Document, Empty, Identifier, Json, JsonArray, JsonObject, Literal, LiteralValue, Member,
};

/// Comment delimiters of JSON5. Strict JSON never produces comments.
pub const COMMENT_SYNTAX: CommentSyntax = CommentSyntax::C_STYLE;

/// A syntax error with its location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}:{}:{}: {}", display_path(.source_path), .line, .column, .message)]
pub struct ParseError {
    pub source_path: PathBuf,
    /// Byte offset into the input.
    pub offset: usize,
    /// 1-based line.
    pub line: usize,
    /// 1-based column, in characters.
    pub column: usize,
    pub message: String,
}

fn display_path(path: &Path) -> String {
    if path.as_os_str().is_empty() {
        "<input>".to_string()
    } else {
        path.display().to_string()
    }
}

/// Parse JSON5 text into a [`Json::Document`].
///
/// # Example
///
/// ```
/// use tugrewrite_json::{parse, print};
///
/// let source = "{ \"a\": [1, 2,], // trailing\n}";
/// let document = parse(source).unwrap();
/// assert_eq!(print(&document), source);
/// ```
pub fn parse(source: &str) -> Result<Json, ParseError> {
    parse_with_options(source, ParseOptions::default())
}

/// Parse with explicit options.
pub fn parse_with_options(source: &str, options: ParseOptions) -> Result<Json, ParseError> {
    let (bom, text) = match source.strip_prefix('\u{feff}') {
        Some(rest) => (true, rest),
        None => (false, source),
    };
    let mut parser = Parser {
        source: text,
        base: source.len() - text.len(),
        pos: 0,
        depth: 0,
        options: &options,
    };
    let value = parser.value()?;
    let eof = parser.space()?;
    if parser.pos < text.len() {
        return Err(parser.error("unexpected content after the top-level value"));
    }
    Ok(Json::from(Document::new(
        options.source_path.clone(),
        bom,
        value,
        eof,
    )))
}

/// Parse a batch of `(source_path, text)` inputs.
///
/// One result per input, in order. A failing input never affects the
/// others.
pub fn parse_inputs<'a, I, P>(inputs: I, options: ParseOptions) -> Vec<Result<Json, ParseError>>
where
    I: IntoIterator<Item = (P, &'a str)>,
    P: Into<PathBuf>,
{
    let results: Vec<Result<Json, ParseError>> = inputs
        .into_iter()
        .map(|(path, text)| parse_with_options(text, options.clone().with_source_path(path)))
        .collect();

    for error in results.iter().filter_map(|result| result.as_ref().err()) {
        warn!(%error, "unparseable document");
    }
    debug!(
        documents = results.len(),
        failed = results.iter().filter(|result| result.is_err()).count(),
        "parsed batch"
    );
    results
}

/// True if `name` can be written as an unquoted JSON5 key.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_identifier_start(first) => chars.all(is_identifier_part),
        _ => false,
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_part(c: char) -> bool {
    is_identifier_start(c) || c.is_alphanumeric()
}

// ============================================================================
// Parser
// ============================================================================

struct Parser<'s> {
    source: &'s str,
    /// Bytes stripped before `source` (a byte order mark).
    base: usize,
    pos: usize,
    depth: usize,
    options: &'s ParseOptions,
}

impl<'s> Parser<'s> {
    fn json5(&self) -> bool {
        self.options.dialect.is_json5()
    }

    fn rest(&self) -> &'s str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn take_while(&mut self, predicate: impl Fn(char) -> bool) -> usize {
        let mut count = 0;
        while let Some(c) = self.peek() {
            if !predicate(c) {
                break;
            }
            self.pos += c.len_utf8();
            count += 1;
        }
        count
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            Ok(())
        } else {
            Err(self.error(format!("expected '{expected}'")))
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        self.error_at(self.pos, message)
    }

    fn error_at(&self, offset: usize, message: impl Into<String>) -> ParseError {
        let before = &self.source[..offset];
        let line = before.matches('\n').count() + 1;
        let column = before.rsplit('\n').next().map_or(0, |line| line.chars().count()) + 1;
        ParseError {
            source_path: self.options.source_path.clone(),
            offset: self.base + offset,
            line,
            column,
            message: message.into(),
        }
    }

    fn is_whitespace(&self, c: char) -> bool {
        if self.json5() {
            c.is_whitespace() || c == '\u{feff}'
        } else {
            matches!(c, ' ' | '\t' | '\n' | '\r')
        }
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            return Err(self.error(format!(
                "nesting deeper than {} levels",
                self.options.max_depth
            )));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    // ------------------------------------------------------------------------
    // Trivia
    // ------------------------------------------------------------------------

    fn space(&mut self) -> Result<Space, ParseError> {
        let start = self.pos;
        loop {
            let rest = self.rest();
            let Some(c) = rest.chars().next() else {
                break;
            };
            if self.is_whitespace(c) {
                self.pos += c.len_utf8();
            } else if self.json5() && rest.starts_with("//") {
                let comment_len = rest.find(['\n', '\r']).unwrap_or(rest.len());
                self.pos += comment_len;
            } else if self.json5() && rest.starts_with("/*") {
                match rest[2..].find("*/") {
                    Some(end) => self.pos += end + 4,
                    None => return Err(self.error("unterminated block comment")),
                }
            } else {
                break;
            }
        }
        Ok(parse_trivia(self.source, start, self.pos, COMMENT_SYNTAX))
    }

    // ------------------------------------------------------------------------
    // Values
    // ------------------------------------------------------------------------

    fn value(&mut self) -> Result<Json, ParseError> {
        let prefix = self.space()?;
        self.value_after(prefix)
    }

    fn value_after(&mut self, prefix: Space) -> Result<Json, ParseError> {
        let json5 = self.json5();
        let Some(c) = self.peek() else {
            return Err(self.error("unexpected end of input, expected a value"));
        };
        match c {
            '{' => self.object(prefix),
            '[' => self.array(prefix),
            '"' => self.string(prefix, '"'),
            '\'' if json5 => self.string(prefix, '\''),
            '-' | '0'..='9' => self.number(prefix),
            '+' | '.' | 'I' | 'N' if json5 => self.number(prefix),
            't' | 'f' | 'n' => self.keyword(prefix),
            c => Err(self.error(format!("unexpected character {c:?}"))),
        }
    }

    fn object(&mut self, prefix: Space) -> Result<Json, ParseError> {
        self.enter()?;
        self.expect('{')?;
        let mut members = Vec::new();
        loop {
            let element_prefix = self.space()?;
            if self.peek() == Some('}') {
                if !members.is_empty() && !self.json5() {
                    return Err(self.error("trailing comma is not allowed in strict JSON"));
                }
                members.push(RightPadded::build(Json::from(Empty::new(element_prefix))));
                break;
            }
            let member = self.member(element_prefix)?;
            let after = self.space()?;
            match self.peek() {
                Some(',') => {
                    self.pos += 1;
                    members.push(RightPadded::new(member, after, Markers::empty()));
                }
                Some('}') => {
                    members.push(RightPadded::new(member, after, Markers::empty()));
                    break;
                }
                _ => return Err(self.error("expected ',' or '}' after object member")),
            }
        }
        self.expect('}')?;
        self.leave();
        Ok(Json::from(JsonObject::new(prefix, Arc::new(members))))
    }

    fn member(&mut self, prefix: Space) -> Result<Json, ParseError> {
        let json5 = self.json5();
        let key = match self.peek() {
            Some('"') => self.string(Space::empty(), '"')?,
            Some('\'') if json5 => self.string(Space::empty(), '\'')?,
            Some(c) if json5 && is_identifier_start(c) => self.identifier(),
            _ => return Err(self.error("expected a member key")),
        };
        let key_after = self.space()?;
        self.expect(':')?;
        let value = self.value()?;
        Ok(Json::from(Member::new(
            prefix,
            RightPadded::new(key, key_after, Markers::empty()),
            value,
        )))
    }

    fn array(&mut self, prefix: Space) -> Result<Json, ParseError> {
        self.enter()?;
        self.expect('[')?;
        let mut values = Vec::new();
        loop {
            let element_prefix = self.space()?;
            if self.peek() == Some(']') {
                if !values.is_empty() && !self.json5() {
                    return Err(self.error("trailing comma is not allowed in strict JSON"));
                }
                values.push(RightPadded::build(Json::from(Empty::new(element_prefix))));
                break;
            }
            let value = self.value_after(element_prefix)?;
            let after = self.space()?;
            match self.peek() {
                Some(',') => {
                    self.pos += 1;
                    values.push(RightPadded::new(value, after, Markers::empty()));
                }
                Some(']') => {
                    values.push(RightPadded::new(value, after, Markers::empty()));
                    break;
                }
                _ => return Err(self.error("expected ',' or ']' after array element")),
            }
        }
        self.expect(']')?;
        self.leave();
        Ok(Json::from(JsonArray::new(prefix, Arc::new(values))))
    }

    fn identifier(&mut self) -> Json {
        let start = self.pos;
        self.take_while(is_identifier_part);
        Json::from(Identifier::new(Space::empty(), &self.source[start..self.pos]))
    }

    fn keyword(&mut self, prefix: Space) -> Result<Json, ParseError> {
        let candidates = [
            ("true", LiteralValue::Bool(true)),
            ("false", LiteralValue::Bool(false)),
            ("null", LiteralValue::Null),
        ];
        for (word, value) in candidates {
            let rest = self.rest();
            if rest.starts_with(word) && !rest[word.len()..].starts_with(is_identifier_part) {
                self.pos += word.len();
                return Ok(Json::from(Literal::new(prefix, word, value)));
            }
        }
        Err(self.error("unexpected word, expected a value"))
    }

    // ------------------------------------------------------------------------
    // Strings
    // ------------------------------------------------------------------------

    fn string(&mut self, prefix: Space, quote: char) -> Result<Json, ParseError> {
        let start = self.pos;
        self.pos += quote.len_utf8();
        let mut value = String::new();
        loop {
            let Some(c) = self.peek() else {
                return Err(self.error_at(start, "unterminated string"));
            };
            self.pos += c.len_utf8();
            match c {
                c if c == quote => break,
                '\\' => self.escape(&mut value)?,
                '\n' | '\r' => {
                    return Err(self.error_at(self.pos - 1, "unescaped line break in string"))
                }
                c if (c as u32) < 0x20 && !self.json5() => {
                    return Err(self.error_at(self.pos - 1, "unescaped control character in string"))
                }
                c => value.push(c),
            }
        }
        let source = &self.source[start..self.pos];
        Ok(Json::from(Literal::new(
            prefix,
            source,
            LiteralValue::String(value),
        )))
    }

    fn escape(&mut self, value: &mut String) -> Result<(), ParseError> {
        let escape_start = self.pos - 1;
        let json5 = self.json5();
        let Some(c) = self.peek() else {
            return Err(self.error("unterminated escape sequence"));
        };
        self.pos += c.len_utf8();
        match c {
            '"' => value.push('"'),
            '\\' => value.push('\\'),
            '/' => value.push('/'),
            'b' => value.push('\u{8}'),
            'f' => value.push('\u{c}'),
            'n' => value.push('\n'),
            'r' => value.push('\r'),
            't' => value.push('\t'),
            'u' => {
                let unit = self.hex_digits(4)?;
                value.push(self.code_point(unit)?);
            }
            '\'' if json5 => value.push('\''),
            'v' if json5 => value.push('\u{b}'),
            'x' if json5 => {
                let unit = self.hex_digits(2)?;
                value.push(char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            '0' if json5 && !self.peek().is_some_and(|next| next.is_ascii_digit()) => {
                value.push('\0')
            }
            // Line continuations.
            '\n' | '\u{2028}' | '\u{2029}' if json5 => {}
            '\r' if json5 => {
                if self.peek() == Some('\n') {
                    self.pos += 1;
                }
            }
            c if json5 && !c.is_ascii_digit() => value.push(c),
            _ => return Err(self.error_at(escape_start, "invalid escape sequence")),
        }
        Ok(())
    }

    fn hex_digits(&mut self, count: usize) -> Result<u32, ParseError> {
        let start = self.pos;
        let digits = self.rest().get(..count).unwrap_or("");
        if digits.len() != count || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(self.error_at(start, "invalid hexadecimal escape"));
        }
        self.pos += count;
        u32::from_str_radix(digits, 16).map_err(|_| self.error_at(start, "invalid hexadecimal escape"))
    }

    /// Combine a `\u` escape with a following low surrogate when present.
    fn code_point(&mut self, unit: u32) -> Result<char, ParseError> {
        if (0xD800..0xDC00).contains(&unit) && self.rest().starts_with("\\u") {
            let checkpoint = self.pos;
            self.pos += 2;
            let low = self.hex_digits(4)?;
            if (0xDC00..0xE000).contains(&low) {
                let combined = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                return Ok(char::from_u32(combined).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            self.pos = checkpoint;
        }
        Ok(char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    // ------------------------------------------------------------------------
    // Numbers
    // ------------------------------------------------------------------------

    fn number(&mut self, prefix: Space) -> Result<Json, ParseError> {
        let start = self.pos;
        let json5 = self.json5();
        let negative = match self.peek() {
            Some('-') => {
                self.pos += 1;
                true
            }
            Some('+') if json5 => {
                self.pos += 1;
                false
            }
            _ => false,
        };

        let rest = self.rest();
        let magnitude = if json5 && rest.starts_with("Infinity") {
            self.pos += "Infinity".len();
            f64::INFINITY
        } else if json5 && rest.starts_with("NaN") {
            self.pos += "NaN".len();
            f64::NAN
        } else if json5 && (rest.starts_with("0x") || rest.starts_with("0X")) {
            self.pos += 2;
            let digits_start = self.pos;
            self.take_while(|c| c.is_ascii_hexdigit());
            let digits = &self.source[digits_start..self.pos];
            u64::from_str_radix(digits, 16)
                .map_err(|_| self.error_at(start, "invalid hexadecimal number"))? as f64
        } else {
            self.decimal(start)?
        };

        if self.peek().is_some_and(is_identifier_part) {
            return Err(self.error("unexpected character after number"));
        }
        let value = if negative { -magnitude } else { magnitude };
        let source = &self.source[start..self.pos];
        Ok(Json::from(Literal::new(
            prefix,
            source,
            LiteralValue::Number(value),
        )))
    }

    fn decimal(&mut self, start: usize) -> Result<f64, ParseError> {
        let digits_start = self.pos;
        let integer_digits = self.take_while(|c| c.is_ascii_digit());
        if integer_digits > 1 && self.source[digits_start..].starts_with('0') {
            return Err(self.error_at(digits_start, "leading zeros are not allowed"));
        }

        let mut fraction_digits = 0;
        let has_point = self.peek() == Some('.');
        if has_point {
            self.pos += 1;
            fraction_digits = self.take_while(|c| c.is_ascii_digit());
        }
        if integer_digits == 0 && fraction_digits == 0 {
            return Err(self.error_at(start, "invalid number"));
        }
        if !self.json5() && (integer_digits == 0 || (has_point && fraction_digits == 0)) {
            return Err(self.error_at(start, "decimal point must be surrounded by digits"));
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            self.pos += 1;
            if matches!(self.peek(), Some('+' | '-')) {
                self.pos += 1;
            }
            if self.take_while(|c| c.is_ascii_digit()) == 0 {
                return Err(self.error("missing exponent digits"));
            }
        }

        self.source[digits_start..self.pos]
            .parse::<f64>()
            .map_err(|err| self.error_at(start, format!("invalid number: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::JsonDialect;
    use crate::printer::print;
    use tugrewrite_core::Tree;

    fn document_value(json: &Json) -> &Json {
        json.as_document().unwrap().value()
    }

    #[test]
    fn test_parse_simple_object() {
        let json = parse(r#"{"a": 1, "b": [true, null]}"#).unwrap();
        let object = document_value(&json).as_object().unwrap();
        let a = object.get("a").unwrap();
        assert_eq!(a.value().literal_value(), Some(&LiteralValue::Number(1.0)));
        let b = object.get("b").unwrap().value().as_array().unwrap();
        let values: Vec<_> = b.elements().filter_map(Json::literal_value).collect();
        assert_eq!(values, vec![&LiteralValue::Bool(true), &LiteralValue::Null]);
    }

    #[test]
    fn test_trivia_placement() {
        let json = parse("{ \"a\" : 1 , }").unwrap();
        let object = document_value(&json).as_object().unwrap();
        let padded = object.padded_members();
        assert_eq!(padded.len(), 2);
        let member = padded[0].element().as_member().unwrap();
        assert_eq!(member.prefix().whitespace(), " ");
        assert_eq!(member.padded_key().after().whitespace(), " ");
        assert_eq!(member.value().prefix().whitespace(), " ");
        assert_eq!(padded[0].after().whitespace(), " ");
        assert!(padded[1].element().is_empty());
        assert_eq!(padded[1].element().prefix().whitespace(), " ");
    }

    #[test]
    fn test_empty_containers() {
        let json = parse("[ {}, [ ] ]").unwrap();
        let array = document_value(&json).as_array().unwrap();
        let elements: Vec<_> = array.elements().collect();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].as_object().unwrap().member_nodes().count(), 0);
        let inner = elements[1].as_array().unwrap();
        assert_eq!(inner.padded_values().len(), 1);
        assert_eq!(inner.values()[0].prefix().whitespace(), " ");
    }

    #[test]
    fn test_json5_syntax() {
        let source = "// header\n{unquoted: 'single', hex: 0xFF, pos: +1, half: .5, inf: -Infinity,}";
        let json = parse(source).unwrap();
        let object = document_value(&json).as_object().unwrap();
        assert_eq!(
            object.get("unquoted").unwrap().value().literal_value(),
            Some(&LiteralValue::String("single".to_string()))
        );
        assert_eq!(
            object.get("hex").unwrap().value().literal_value(),
            Some(&LiteralValue::Number(255.0))
        );
        assert_eq!(
            object.get("half").unwrap().value().literal_value(),
            Some(&LiteralValue::Number(0.5))
        );
        assert_eq!(
            object.get("inf").unwrap().value().literal_value(),
            Some(&LiteralValue::Number(f64::NEG_INFINITY))
        );
        assert!(object.get("unquoted").unwrap().key().as_identifier().is_some());
        assert_eq!(document_value(&json).prefix().comments().len(), 1);
    }

    #[test]
    fn test_strict_rejects_json5() {
        let cases = [
            "{a: 1}",
            "{'a': 1}",
            "[1,]",
            "// c\n1",
            "0x10",
            "+1",
            ".5",
            "1.",
            "NaN",
        ];
        for case in cases {
            let result = parse_with_options(case, ParseOptions::strict());
            assert!(result.is_err(), "strict parse should fail: {case}");
            assert!(parse(case).is_ok(), "json5 parse should succeed: {case}");
        }
    }

    #[test]
    fn test_string_escapes() {
        let json = parse(r#""a\"b\\cé😀\n""#).unwrap();
        assert_eq!(
            document_value(&json).literal_value(),
            Some(&LiteralValue::String("a\"b\\c\u{e9}\u{1F600}\n".to_string()))
        );
        let json = parse(r"'it\'s \x41'").unwrap();
        assert_eq!(
            document_value(&json).literal_value(),
            Some(&LiteralValue::String("it's A".to_string()))
        );
    }

    #[test]
    fn test_error_location() {
        let err = parse_with_options(
            "{\n  \"a\": 1,\n  \"b\" 2\n}",
            ParseOptions::default().with_source_path("conf/app.json"),
        )
        .unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(err.column, 7);
        assert_eq!(err.message, "expected ':'");
        assert_eq!(err.to_string(), "conf/app.json:3:7: expected ':'");
    }

    #[test]
    fn test_errors() {
        for (source, message) in [
            ("", "unexpected end of input, expected a value"),
            ("{\"a\": 1", "expected ',' or '}' after object member"),
            ("\"open", "unterminated string"),
            ("[1 2]", "expected ',' or ']' after array element"),
            ("01", "leading zeros are not allowed"),
            ("1 2", "unexpected content after the top-level value"),
            ("/* never closed", "unterminated block comment"),
            ("truthy", "unexpected word, expected a value"),
        ] {
            let err = parse(source).unwrap_err();
            assert_eq!(err.message, message, "source: {source:?}");
        }
    }

    #[test]
    fn test_max_depth() {
        let deep = format!("{}{}", "[".repeat(20), "]".repeat(20));
        assert!(parse(&deep).is_ok());
        let err =
            parse_with_options(&deep, ParseOptions::default().with_max_depth(10)).unwrap_err();
        assert_eq!(err.message, "nesting deeper than 10 levels");
    }

    #[test]
    fn test_bom_is_preserved() {
        let source = "\u{feff}{\"a\": 1}";
        let json = parse(source).unwrap();
        assert!(json.as_document().unwrap().has_bom());
        assert_eq!(print(&json), source);
        let err = parse("\u{feff}{").unwrap_err();
        assert_eq!(err.offset, 4);
    }

    #[test]
    fn test_parse_inputs_isolates_failures() {
        let results = parse_inputs(
            [("a.json", "{}"), ("b.json", "{"), ("c.json", "[1]")],
            ParseOptions::new(JsonDialect::Strict),
        );
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert_eq!(
            results[1].as_ref().unwrap_err().source_path,
            PathBuf::from("b.json")
        );
        let document = results[2].as_ref().unwrap().as_document().unwrap();
        assert_eq!(document.source_path(), Path::new("c.json"));
    }

    #[test]
    fn test_ids_are_distinct() {
        let json = parse("[1, 1]").unwrap();
        let array = document_value(&json).as_array().unwrap();
        let ids: Vec<_> = array.elements().map(Json::id).collect();
        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("name"));
        assert!(is_identifier("$schema"));
        assert!(is_identifier("_x1"));
        assert!(!is_identifier("1x"));
        assert!(!is_identifier("a-b"));
        assert!(!is_identifier(""));
    }
}
