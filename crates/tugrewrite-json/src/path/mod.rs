// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! JSONPath-style queries evaluated against a cursor.
//!
//! A [`JsonPathMatcher`] compiles its expression once and then answers two
//! questions for any cursor produced during a traversal:
//!
//! - [`find`](JsonPathMatcher::find): what does the expression denote from
//!   here?
//! - [`matches`](JsonPathMatcher::matches): is the cursor's own node part of
//!   that result?
//!
//! ## Grammar
//!
//! ```text
//! $.a.b             member `b` of member `a` of the root
//! $['a','b']        members `a` and `b`
//! $.arr[*]          every element (objects yield their members)
//! $.arr[0,-1]       first and last element
//! $.arr[1:3]        slice, end exclusive; [:n] and [-n:] also work
//! $.arr[?(@.k)]     elements that have a member `k`
//! $.arr[?(@.k == 'v')], [?(@.k != 3)], [?(@.k =~ /v.*/i)]
//! $..k              leading descent: `k` relative to every ancestor
//! $.a..k            scoped descent: `k` anywhere below `a`
//! .k                relative to the cursor's own node
//! ```
//!
//! `&&` and `||` are accepted by the parser but evaluating an expression
//! that contains them returns [`PathError::Unsupported`].

mod ast;
mod eval;
mod parser;

use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use thiserror::Error;
use tracing::{debug, trace};
use tugrewrite_core::{Cursor, RewriteError, Tree};

pub use ast::{Anchor, CompareOp, FilterExpr, Operand, PathExpr, Step};

use crate::tree::{Json, LiteralValue};

/// Error type for path expression parsing and evaluation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("invalid path expression '{input}': {message}")]
    InvalidExpression { input: String, message: String },

    #[error("invalid regular expression in '{input}': {message}")]
    InvalidRegex { input: String, message: String },

    /// A construct the evaluator refuses to guess at.
    #[error("unsupported construct `{construct}` in '{input}'")]
    Unsupported { input: String, construct: String },
}

impl From<PathError> for RewriteError {
    fn from(err: PathError) -> Self {
        let input = match &err {
            PathError::InvalidExpression { input, .. }
            | PathError::InvalidRegex { input, .. }
            | PathError::Unsupported { input, .. } => input.clone(),
        };
        RewriteError::invalid_option(input, err.to_string())
    }
}

/// Compiled expressions, keyed by source text.
static COMPILED: Lazy<DashMap<String, Arc<PathExpr>>> = Lazy::new(DashMap::new);

/// A compiled path expression.
///
/// # Example
///
/// ```
/// use tugrewrite_core::Cursor;
/// use tugrewrite_json::{parse, JsonPathMatcher};
///
/// let json = parse(r#"{"a": {"b": 1}}"#).unwrap();
/// let root = Cursor::root(&json);
/// let matcher = JsonPathMatcher::new("$.a.b").unwrap();
/// let found = matcher.find(&root).unwrap().unwrap();
/// assert_eq!(found.as_node().and_then(|node| node.key_name()), Some("b"));
/// assert!(!matcher.matches(&root).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct JsonPathMatcher {
    expression: String,
    compiled: Arc<PathExpr>,
}

impl JsonPathMatcher {
    /// Compile `expression`, reusing an earlier compilation of the same text.
    pub fn new(expression: &str) -> Result<Self, PathError> {
        if let Some(compiled) = COMPILED.get(expression) {
            trace!(expression, "path expression cache hit");
            return Ok(Self {
                expression: expression.to_string(),
                compiled: Arc::clone(compiled.value()),
            });
        }

        let compiled = Arc::new(parser::parse_path(expression)?);
        debug!(expression, steps = compiled.steps.len(), "compiled path expression");
        COMPILED.insert(expression.to_string(), Arc::clone(&compiled));
        Ok(Self {
            expression: expression.to_string(),
            compiled,
        })
    }

    /// Drop every cached compilation. Matchers already built keep working.
    pub fn clear_cache() {
        COMPILED.clear();
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn compiled(&self) -> &PathExpr {
        &self.compiled
    }

    /// What the expression denotes from `cursor`, or `None` when nothing
    /// matches.
    pub fn find(&self, cursor: &Cursor<'_, Json>) -> Result<Option<PathValue>, PathError> {
        eval::Evaluator::new(&self.expression, &self.compiled, cursor).find()
    }

    /// Whether the cursor's own node is part of [`find`](Self::find)'s
    /// result.
    pub fn matches(&self, cursor: &Cursor<'_, Json>) -> Result<bool, PathError> {
        Ok(self
            .find(cursor)?
            .is_some_and(|found| found.contains(cursor.value())))
    }
}

/// A non-empty query result.
#[derive(Debug, Clone)]
pub enum PathValue {
    Node(Json),
    Nodes(Vec<Json>),
}

impl PathValue {
    pub fn nodes(&self) -> &[Json] {
        match self {
            PathValue::Node(node) => std::slice::from_ref(node),
            PathValue::Nodes(nodes) => nodes,
        }
    }

    pub fn into_nodes(self) -> Vec<Json> {
        match self {
            PathValue::Node(node) => vec![node],
            PathValue::Nodes(nodes) => nodes,
        }
    }

    /// Membership by node id.
    pub fn contains(&self, node: &Json) -> bool {
        let id = node.id();
        self.nodes().iter().any(|candidate| candidate.id() == id)
    }

    pub fn len(&self) -> usize {
        self.nodes().len()
    }

    /// Always false; an empty result is reported as `None`.
    pub fn is_empty(&self) -> bool {
        self.nodes().is_empty()
    }

    pub fn as_node(&self) -> Option<&Json> {
        match self {
            PathValue::Node(node) => Some(node),
            PathValue::Nodes(_) => None,
        }
    }

    /// The literal value of a single matched member or literal.
    pub fn scalar(&self) -> Option<LiteralValue> {
        match self.as_node()? {
            Json::Member(member) => member.value().literal_value().cloned(),
            Json::Literal(literal) => Some(literal.value().clone()),
            _ => None,
        }
    }
}
