// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Errors raised while configuring or running a recipe.
//!
//! Front-end errors (parse failures, path-expression errors) have their own
//! types in each front-end crate and are bridged into [`RewriteError`] with
//! `From` impls there.

use thiserror::Error;

/// Recipe-level error.
///
/// During a run these are recorded as diagnostics on the document's
/// [`ExecutionContext`](crate::context::ExecutionContext) rather than
/// returned, so one failing document never aborts the batch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RewriteError {
    /// A recipe option could not be used (bad path expression, empty key).
    #[error("invalid option `{option}`: {message}")]
    InvalidOption { option: String, message: String },

    /// The recipe hit a construct it cannot rewrite.
    #[error("{recipe}: {message}")]
    Recipe { recipe: String, message: String },
}

impl RewriteError {
    pub fn invalid_option(option: impl Into<String>, message: impl Into<String>) -> Self {
        RewriteError::InvalidOption {
            option: option.into(),
            message: message.into(),
        }
    }

    pub fn recipe(recipe: impl Into<String>, message: impl Into<String>) -> Self {
        RewriteError::Recipe {
            recipe: recipe.into(),
            message: message.into(),
        }
    }
}
