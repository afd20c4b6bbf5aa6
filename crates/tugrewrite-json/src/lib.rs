// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! A lossless JSON and JSON5 syntax tree for tugrewrite.
//!
//! # Overview
//!
//! - **Parsing**: [`parse`] and [`parse_with_options`] build a [`Json`]
//!   tree that keeps every space, comment and literal spelling.
//! - **Code Generation**: [`print`] (or the [`Codegen`] trait) writes the
//!   tree back out; `print(&parse(s)?) == s` for every valid input.
//! - **Rewriting**: [`JsonVisitor`] and [`JsonIsoVisitor`] traverse with a
//!   [`Cursor`](tugrewrite_core::Cursor) and rebuild only what changed.
//! - **Queries**: [`JsonPathMatcher`] evaluates JSONPath-style expressions
//!   against a cursor.
//! - **Recipes**: [`ChangeKey`], [`ChangeValue`], [`DeleteKey`],
//!   [`FindKey`] and [`CopyValue`] run through
//!   [`RecipeRunner`](tugrewrite_core::RecipeRunner).
//!
//! # Quick Start
//!
//! ```
//! use tugrewrite_core::{RecipeRunner, RunOptions};
//! use tugrewrite_json::{parse, print, ChangeKey};
//!
//! let source = "{\n  // the port\n  \"port\": 8080\n}\n";
//! let documents = vec![parse(source).unwrap()];
//!
//! let recipe = ChangeKey::new("$.port", "listen_port").unwrap();
//! let changes = RecipeRunner::new(RunOptions::sequential()).run(&recipe, &documents);
//!
//! assert!(changes[0].is_changed());
//! assert_eq!(
//!     print(&changes[0].after),
//!     "{\n  // the port\n  \"listen_port\": 8080\n}\n"
//! );
//! ```

// ============================================================================
// Public modules and re-exports
// ============================================================================

/// Parser configuration.
pub mod options;
pub use options::{JsonDialect, ParseOptions, DEFAULT_MAX_DEPTH};

/// Node types.
pub mod tree;
pub use tree::{
    format_number, quote_string, Document, Empty, Identifier, Json, JsonArray, JsonKind,
    JsonObject, Literal, LiteralValue, Member,
};

pub mod parser;
pub use parser::{is_identifier, parse, parse_inputs, parse_with_options, ParseError, COMMENT_SYNTAX};

pub mod printer;
pub use printer::{print, Codegen, CodegenState};

/// Rewriting visitors.
pub mod visitor;
pub use visitor::{
    visit_node, walk_array, walk_document, walk_empty, walk_identifier, walk_literal,
    walk_member, walk_object, Iso, JsonIsoVisitor, JsonTreeVisitor, JsonVisitor,
};

/// Path expressions.
pub mod path;
pub use path::{JsonPathMatcher, PathError, PathValue};

pub mod recipes;
pub use recipes::{ChangeKey, ChangeValue, CopyValue, DeleteKey, FindKey};
