// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Whitespace and comments attached to tree elements.
//!
//! A [`Space`] is the trivia that precedes a node (its prefix) or sits between
//! an element and the next delimiter (padding). It is split into a leading
//! whitespace run followed by an ordered list of [`Comment`]s, each carrying
//! the line terminator that ended it and the whitespace run that follows it.
//! Re-emitting a `Space` therefore reproduces the original bytes exactly:
//!
//! ```text
//! "  // note\r\n    /* x */ "
//!  ^^                          whitespace
//!    ^^^^^^^ ^^^^^^^^^         Comment { Line, " note", "\r\n", suffix: "    " }
//!                    ^^^^^^^^  Comment { Block, " x ", "", suffix: " " }
//! ```
//!
//! # Canonical values
//!
//! `Space::build("", [])` and `Space::build(" ", [])` always return the same
//! two process-wide instances. [`Space::ptr_eq`] can be used as a cheap
//! "is this the default" check, but equality is always by value.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;

static EMPTY: Lazy<Space> = Lazy::new(|| Space::from_parts(String::new(), Vec::new()));

static SINGLE_SPACE: Lazy<Space> = Lazy::new(|| Space::from_parts(" ".to_string(), Vec::new()));

// ============================================================================
// Comment syntax
// ============================================================================

/// The comment delimiters of a language front-end.
///
/// Trivia scanning and printing are parameterized by this so that the same
/// [`Space`] model serves every language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommentSyntax {
    /// Marker that starts a comment running to end of line.
    pub line: Option<&'static str>,
    /// Open/close markers of a block comment.
    pub block: Option<(&'static str, &'static str)>,
}

impl CommentSyntax {
    /// `// line` and `/* block */` comments (JSON5, JavaScript, Gradle).
    pub const C_STYLE: Self = Self {
        line: Some("//"),
        block: Some(("/*", "*/")),
    };

    /// `# line` comments only (HCL, YAML, properties).
    pub const HASH: Self = Self {
        line: Some("#"),
        block: None,
    };

    /// No comments at all; every character is whitespace.
    pub const NONE: Self = Self {
        line: None,
        block: None,
    };
}

// ============================================================================
// Comment
// ============================================================================

/// Whether a comment runs to end of line or is delimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentKind {
    Line,
    Block,
}

/// A single comment inside a [`Space`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Comment {
    kind: CommentKind,
    text: String,
    line_terminator: String,
    suffix: String,
}

impl Comment {
    /// A line comment. `text` excludes the marker; `line_terminator` is the
    /// `"\n"`, `"\r\n"` or `"\r"` that ended it, or `""` at end of input.
    pub fn line(
        text: impl Into<String>,
        line_terminator: impl Into<String>,
        suffix: impl Into<String>,
    ) -> Self {
        Self {
            kind: CommentKind::Line,
            text: text.into(),
            line_terminator: line_terminator.into(),
            suffix: suffix.into(),
        }
    }

    /// A block comment. `text` excludes the open and close markers.
    pub fn block(text: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            kind: CommentKind::Block,
            text: text.into(),
            line_terminator: String::new(),
            suffix: suffix.into(),
        }
    }

    pub fn kind(&self) -> CommentKind {
        self.kind
    }

    pub fn is_block(&self) -> bool {
        self.kind == CommentKind::Block
    }

    /// The comment body without delimiters.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The line terminator that ended a line comment; empty for block comments.
    pub fn line_terminator(&self) -> &str {
        &self.line_terminator
    }

    /// Whitespace following the comment, up to the next comment or the end
    /// of the trivia region.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..self.clone()
        }
    }

    pub fn with_suffix(&self, suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            ..self.clone()
        }
    }

    /// Append the exact source form of this comment.
    pub fn write_to(&self, out: &mut String, syntax: CommentSyntax) {
        match self.kind {
            CommentKind::Line => {
                out.push_str(syntax.line.unwrap_or("//"));
                out.push_str(&self.text);
                out.push_str(&self.line_terminator);
            }
            CommentKind::Block => {
                let (open, close) = syntax.block.unwrap_or(("/*", "*/"));
                out.push_str(open);
                out.push_str(&self.text);
                out.push_str(close);
            }
        }
        out.push_str(&self.suffix);
    }
}

// ============================================================================
// Space
// ============================================================================

#[derive(PartialEq, Eq, Hash)]
struct SpaceData {
    whitespace: String,
    comments: Vec<Comment>,
}

/// Immutable, cheaply clonable trivia: a whitespace run and the comments after it.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Space(Arc<SpaceData>);

impl Space {
    fn from_parts(whitespace: String, comments: Vec<Comment>) -> Self {
        Self(Arc::new(SpaceData {
            whitespace,
            comments,
        }))
    }

    /// The canonical empty space.
    pub fn empty() -> Self {
        EMPTY.clone()
    }

    /// The canonical single `" "` space with no comments.
    pub fn single_space() -> Self {
        SINGLE_SPACE.clone()
    }

    /// Build a space, collapsing the two common comment-free values to their
    /// canonical instances.
    pub fn build(whitespace: impl Into<String>, comments: Vec<Comment>) -> Self {
        let whitespace = whitespace.into();
        if comments.is_empty() {
            if whitespace.is_empty() {
                return Self::empty();
            }
            if whitespace == " " {
                return Self::single_space();
            }
        }
        Self::from_parts(whitespace, comments)
    }

    /// Scan a whole string of trivia. See [`parse_trivia`].
    pub fn format(text: &str, syntax: CommentSyntax) -> Self {
        parse_trivia(text, 0, text.len(), syntax)
    }

    /// The whitespace that precedes the first comment.
    pub fn whitespace(&self) -> &str {
        &self.0.whitespace
    }

    pub fn comments(&self) -> &[Comment] {
        &self.0.comments
    }

    /// True when this space holds no characters at all.
    pub fn is_empty(&self) -> bool {
        self.0.whitespace.is_empty() && self.0.comments.is_empty()
    }

    /// Identity check against the canonical empty instance.
    pub fn is_canonical_empty(&self) -> bool {
        Self::ptr_eq(self, &EMPTY)
    }

    /// Reference equality.
    pub fn ptr_eq(a: &Space, b: &Space) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    pub fn with_whitespace(&self, whitespace: impl Into<String>) -> Self {
        let whitespace = whitespace.into();
        if whitespace == self.0.whitespace {
            return self.clone();
        }
        Self::build(whitespace, self.0.comments.clone())
    }

    pub fn with_comments(&self, comments: Vec<Comment>) -> Self {
        if comments == self.0.comments {
            return self.clone();
        }
        Self::build(self.0.whitespace.clone(), comments)
    }

    /// The final whitespace run: the suffix of the last comment, or the
    /// leading whitespace when there are no comments.
    pub fn last_whitespace(&self) -> &str {
        self.0
            .comments
            .last()
            .map(Comment::suffix)
            .unwrap_or(&self.0.whitespace)
    }

    /// The indentation of the line the owning element starts on.
    pub fn indent(&self) -> &str {
        let last = self.last_whitespace();
        match last.rfind(['\n', '\r']) {
            Some(pos) => &last[pos + 1..],
            None => last,
        }
    }

    /// Append the exact source form of this space.
    pub fn write_to(&self, out: &mut String, syntax: CommentSyntax) {
        out.push_str(&self.0.whitespace);
        for comment in &self.0.comments {
            comment.write_to(out, syntax);
        }
    }

    pub fn to_source(&self, syntax: CommentSyntax) -> String {
        let mut out = String::new();
        self.write_to(&mut out, syntax);
        out
    }
}

impl Default for Space {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.comments.is_empty() {
            write!(f, "Space({:?})", self.0.whitespace)
        } else {
            f.debug_struct("Space")
                .field("whitespace", &self.0.whitespace)
                .field("comments", &self.0.comments)
                .finish()
        }
    }
}

// ============================================================================
// Scanning
// ============================================================================

/// Split `text[from..to]` into a whitespace run and comments.
///
/// Comments start at the syntax's markers; a line comment extends to end of
/// line and its terminator (with `\r\n` kept as one unit) becomes the
/// comment's `line_terminator`. Anything that is not a well-formed comment,
/// including an unterminated block comment, is kept as whitespace text, so
/// this never fails. Bounds are clamped to the input.
pub fn parse_trivia(text: &str, from: usize, to: usize, syntax: CommentSyntax) -> Space {
    let to = to.min(text.len());
    let from = from.min(to);
    let region = match text.get(from..to) {
        Some(region) => region,
        None => {
            let lossy = String::from_utf8_lossy(&text.as_bytes()[from..to]).into_owned();
            return Space::build(lossy, Vec::new());
        }
    };
    if region.is_empty() {
        return Space::empty();
    }

    let mut whitespace = String::new();
    let mut comments: Vec<Comment> = Vec::new();
    let mut pending = String::new();
    let mut i = 0;

    while i < region.len() {
        let tail = &region[i..];

        if let Some(marker) = syntax.line {
            if tail.starts_with(marker) {
                flush(&mut pending, &mut whitespace, &mut comments);
                let body_start = i + marker.len();
                let body = &region[body_start..];
                let (comment, next) = match body.find(['\n', '\r']) {
                    Some(pos) => {
                        let rest = &body[pos..];
                        let terminator = if rest.starts_with("\r\n") {
                            "\r\n"
                        } else if rest.starts_with('\r') {
                            "\r"
                        } else {
                            "\n"
                        };
                        (
                            Comment::line(&body[..pos], terminator, ""),
                            body_start + pos + terminator.len(),
                        )
                    }
                    None => (Comment::line(body, "", ""), region.len()),
                };
                comments.push(comment);
                i = next;
                continue;
            }
        }

        if let Some((open, close)) = syntax.block {
            if tail.starts_with(open) {
                let body = &tail[open.len()..];
                match body.find(close) {
                    Some(end) => {
                        flush(&mut pending, &mut whitespace, &mut comments);
                        comments.push(Comment::block(&body[..end], ""));
                        i += open.len() + end + close.len();
                        continue;
                    }
                    None => {
                        pending.push_str(tail);
                        break;
                    }
                }
            }
        }

        match tail.chars().next() {
            Some(ch) => {
                pending.push(ch);
                i += ch.len_utf8();
            }
            None => break,
        }
    }
    flush(&mut pending, &mut whitespace, &mut comments);

    Space::build(whitespace, comments)
}

fn flush(pending: &mut String, whitespace: &mut String, comments: &mut [Comment]) {
    if pending.is_empty() {
        return;
    }
    match comments.last_mut() {
        Some(last) => last.suffix.push_str(pending.as_str()),
        None => whitespace.push_str(pending.as_str()),
    }
    pending.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(text: &str, syntax: CommentSyntax) -> Space {
        let space = Space::format(text, syntax);
        assert_eq!(space.to_source(syntax), text);
        space
    }

    #[test]
    fn test_empty_is_canonical() {
        let space = Space::format("", CommentSyntax::C_STYLE);
        assert!(space.is_canonical_empty());
        assert!(Space::ptr_eq(&Space::build("", vec![]), &Space::empty()));
    }

    #[test]
    fn test_single_space_is_canonical() {
        let a = Space::build(" ", vec![]);
        let b = Space::format(" ", CommentSyntax::HASH);
        assert!(Space::ptr_eq(&a, &b));
        assert!(Space::ptr_eq(&a, &Space::single_space()));
    }

    #[test]
    fn test_equality_is_by_value() {
        let a = Space::build("\n  ", vec![]);
        let b = Space::build("\n  ", vec![]);
        assert!(!Space::ptr_eq(&a, &b));
        assert_eq!(a, b);
    }

    #[test]
    fn test_space_with_comments_is_not_canonical() {
        let space = Space::build(" ", vec![Comment::block("x", "")]);
        assert!(!Space::ptr_eq(&space, &Space::single_space()));
    }

    #[test]
    fn test_line_comment_captures_terminator() {
        let space = roundtrip("  // hello\n    ", CommentSyntax::C_STYLE);
        assert_eq!(space.whitespace(), "  ");
        assert_eq!(space.comments().len(), 1);
        let comment = &space.comments()[0];
        assert!(!comment.is_block());
        assert_eq!(comment.text(), " hello");
        assert_eq!(comment.line_terminator(), "\n");
        assert_eq!(comment.suffix(), "    ");
    }

    #[test]
    fn test_crlf_is_one_terminator() {
        let space = roundtrip("# a\r\n# b\r\n", CommentSyntax::HASH);
        assert_eq!(space.comments().len(), 2);
        assert_eq!(space.comments()[0].line_terminator(), "\r\n");
        assert_eq!(space.comments()[0].suffix(), "");
        assert_eq!(space.comments()[1].text(), " b");
        assert_eq!(space.comments()[1].line_terminator(), "\r\n");
    }

    #[test]
    fn test_lone_cr_terminator() {
        let space = roundtrip("# a\r  ", CommentSyntax::HASH);
        assert_eq!(space.comments()[0].line_terminator(), "\r");
        assert_eq!(space.comments()[0].suffix(), "  ");
    }

    #[test]
    fn test_line_comment_at_eof() {
        let space = roundtrip("\n# trailing", CommentSyntax::HASH);
        assert_eq!(space.comments()[0].line_terminator(), "");
    }

    #[test]
    fn test_block_comments_interleaved() {
        let space = roundtrip(" /* a */\n// b\n\t/* c */", CommentSyntax::C_STYLE);
        assert_eq!(space.whitespace(), " ");
        let kinds: Vec<_> = space.comments().iter().map(Comment::kind).collect();
        assert_eq!(
            kinds,
            vec![CommentKind::Block, CommentKind::Line, CommentKind::Block]
        );
        assert_eq!(space.comments()[0].suffix(), "\n");
        assert_eq!(space.comments()[1].suffix(), "\t");
    }

    #[test]
    fn test_unterminated_block_degrades_to_whitespace() {
        let space = roundtrip("  /* never closed", CommentSyntax::C_STYLE);
        assert!(space.comments().is_empty());
        assert_eq!(space.whitespace(), "  /* never closed");
    }

    #[test]
    fn test_foreign_marker_is_whitespace() {
        let space = roundtrip(" // not a hash comment", CommentSyntax::HASH);
        assert!(space.comments().is_empty());
    }

    #[test]
    fn test_sub_range() {
        let text = "abc  # x\ndef";
        let space = parse_trivia(text, 3, 9, CommentSyntax::HASH);
        assert_eq!(space.whitespace(), "  ");
        assert_eq!(space.comments()[0].text(), " x");
        assert_eq!(space.comments()[0].line_terminator(), "\n");
    }

    #[test]
    fn test_out_of_range_bounds_are_clamped() {
        let space = parse_trivia("  ", 1, 100, CommentSyntax::HASH);
        assert!(Space::ptr_eq(&space, &Space::single_space()));
    }

    #[test]
    fn test_indent() {
        let space = Space::format("\n    // c\n  ", CommentSyntax::C_STYLE);
        assert_eq!(space.indent(), "  ");
        assert_eq!(Space::build("\n\t", vec![]).indent(), "\t");
    }

    #[test]
    fn test_with_whitespace_short_circuits() {
        let space = Space::build("\n", vec![]);
        assert!(Space::ptr_eq(&space, &space.with_whitespace("\n")));
        assert!(Space::ptr_eq(
            &space.with_whitespace(""),
            &Space::empty()
        ));
    }
}
