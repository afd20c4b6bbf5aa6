// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Language-agnostic core of tugrewrite.
//!
//! This crate holds everything a formatting-preserving front-end shares:
//!
//! - [`trivia`]: whitespace and comments ([`Space`], [`Comment`])
//! - [`markers`]: typed side-channel annotations ([`Markers`])
//! - [`padding`]: delimiter-adjacent trivia ([`RightPadded`], [`LeftPadded`])
//! - [`tree`] and [`id`]: the node contract and stable identity
//! - [`cursor`]: the ancestor path of the node under visitation
//! - [`visitor`], [`context`], [`recipe`]: the rewrite engine
//!
//! Front-ends (see `tugrewrite-json`) define a closed node enum over these
//! pieces, a parser, a printer and a per-variant visitor trait.

pub mod context;
pub mod cursor;
pub mod error;
pub mod id;
pub mod markers;
pub mod padding;
pub mod recipe;
pub mod tree;
pub mod trivia;
pub mod visitor;

pub use context::{Diagnostic, ExecutionContext, Severity};
pub use cursor::Cursor;
pub use error::RewriteError;
pub use id::NodeId;
pub use markers::{Marker, Markers, SearchResult};
pub use padding::{LeftPadded, PaddedList, RightPadded};
pub use recipe::{BoxedVisitor, Change, Recipe, RecipeRunner, RunOptions, ScanningRecipe};
pub use tree::Tree;
pub use trivia::{parse_trivia, Comment, CommentKind, CommentSyntax, Space};
pub use visitor::{TreeVisitor, VisitResult, VisitorChain};
