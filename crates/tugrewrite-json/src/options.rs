// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Parser configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which JSON grammar the parser accepts.
///
/// Both dialects produce the same tree shape; [`Strict`](Self::Strict) only
/// rejects syntax that RFC 8259 does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonDialect {
    /// RFC 8259 JSON.
    Strict,

    /// JSON5: comments, trailing commas, single-quoted strings, unquoted
    /// keys, hexadecimal numbers, `Infinity`, `NaN` and explicit `+` signs.
    #[default]
    Json5,
}

impl JsonDialect {
    pub fn is_json5(self) -> bool {
        self == JsonDialect::Json5
    }
}

/// Default bound on nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Configuration options for parsing JSON source.
///
/// # Example
///
/// ```
/// use tugrewrite_json::{JsonDialect, ParseOptions};
///
/// let options = ParseOptions::default();
/// assert_eq!(options.dialect, JsonDialect::Json5);
///
/// let options = ParseOptions::new(JsonDialect::Strict)
///     .with_source_path("config/settings.json");
/// assert_eq!(options.source_path.to_str(), Some("config/settings.json"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub dialect: JsonDialect,

    /// Recorded on the [`Document`](crate::Document) and in parse errors.
    pub source_path: PathBuf,

    /// Deeper nesting is reported as a parse error instead of exhausting
    /// the stack.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            dialect: JsonDialect::default(),
            source_path: PathBuf::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    pub fn new(dialect: JsonDialect) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    /// Options for RFC 8259 JSON.
    pub fn strict() -> Self {
        Self::new(JsonDialect::Strict)
    }

    #[must_use]
    pub fn with_source_path(mut self, source_path: impl Into<PathBuf>) -> Self {
        self.source_path = source_path.into();
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
