// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Source generation.
//!
//! The printer only concatenates what the tree holds: prefixes, literal
//! source text, paddings and the punctuation implied by each node kind. For
//! any parsed input, `print(&parse(text)?) == text`.

use std::fmt;

use tugrewrite_core::{CommentSyntax, RightPadded, Space};

use crate::parser::COMMENT_SYNTAX;
use crate::tree::{Document, Empty, Identifier, Json, JsonArray, JsonObject, Literal, Member};

/// Accumulates generated source text.
#[derive(Debug)]
pub struct CodegenState {
    tokens: String,
    syntax: CommentSyntax,
}

impl Default for CodegenState {
    fn default() -> Self {
        Self {
            tokens: String::new(),
            syntax: COMMENT_SYNTAX,
        }
    }
}

impl CodegenState {
    pub fn add_token(&mut self, token: &str) {
        self.tokens.push_str(token);
    }

    pub fn add_space(&mut self, space: &Space) {
        space.write_to(&mut self.tokens, self.syntax);
    }

    pub fn into_string(self) -> String {
        self.tokens
    }
}

impl fmt::Display for CodegenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens)
    }
}

/// Generate source text for a node.
pub trait Codegen {
    fn codegen(&self, state: &mut CodegenState);
}

/// Print a tree back to source text.
pub fn print(tree: &Json) -> String {
    let mut state = CodegenState::default();
    tree.codegen(&mut state);
    state.into_string()
}

impl fmt::Display for Json {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&print(self))
    }
}

impl Codegen for Json {
    fn codegen(&self, state: &mut CodegenState) {
        match self {
            Json::Document(node) => node.codegen(state),
            Json::Object(node) => node.codegen(state),
            Json::Member(node) => node.codegen(state),
            Json::Array(node) => node.codegen(state),
            Json::Literal(node) => node.codegen(state),
            Json::Identifier(node) => node.codegen(state),
            Json::Empty(node) => node.codegen(state),
        }
    }
}

/// Elements separated by commas; each element's `after` precedes its comma.
fn codegen_padded(list: &[RightPadded<Json>], state: &mut CodegenState) {
    for (index, padded) in list.iter().enumerate() {
        padded.element().codegen(state);
        state.add_space(padded.after());
        if index + 1 < list.len() {
            state.add_token(",");
        }
    }
}

impl Codegen for Document {
    fn codegen(&self, state: &mut CodegenState) {
        if self.has_bom() {
            state.add_token("\u{feff}");
        }
        state.add_space(self.prefix());
        self.value().codegen(state);
        state.add_space(self.eof());
    }
}

impl Codegen for JsonObject {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(self.prefix());
        state.add_token("{");
        codegen_padded(self.padded_members(), state);
        state.add_token("}");
    }
}

impl Codegen for Member {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(self.prefix());
        self.key().codegen(state);
        state.add_space(self.padded_key().after());
        state.add_token(":");
        self.value().codegen(state);
    }
}

impl Codegen for JsonArray {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(self.prefix());
        state.add_token("[");
        codegen_padded(self.padded_values(), state);
        state.add_token("]");
    }
}

impl Codegen for Literal {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(self.prefix());
        state.add_token(self.source());
    }
}

impl Codegen for Identifier {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(self.prefix());
        state.add_token(self.name());
    }
}

impl Codegen for Empty {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_space(self.prefix());
    }
}
