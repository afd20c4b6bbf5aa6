// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Formatting-preserving JSON recipes.
//!
//! Every recipe selects nodes with a [`JsonPathMatcher`] evaluated at each
//! visited cursor. A path evaluation error is recorded once per document on
//! the [`ExecutionContext`] and treated as "no match".
//!
//! | Recipe        | Selects  | Effect                                         |
//! |---------------|----------|------------------------------------------------|
//! | [`ChangeKey`]   | members  | renames the key, keeping its quote style     |
//! | [`ChangeValue`] | members or elements | replaces the value with parsed source |
//! | [`DeleteKey`]   | members  | removes the member and its comma             |
//! | [`FindKey`]     | members  | attaches a [`SearchResult`] marker           |
//! | [`CopyValue`]   | members or elements | copies a value across documents (two-phase) |

use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{trace, warn};
use tugrewrite_core::{
    BoxedVisitor, Cursor, ExecutionContext, Markers, Recipe, RewriteError, RightPadded,
    ScanningRecipe, SearchResult, Space, Tree, VisitResult,
};

use crate::parser::{is_identifier, parse};
use crate::path::JsonPathMatcher;
use crate::printer::print;
use crate::tree::{Empty, Json, JsonObject, Literal, LiteralValue, Member};
use crate::visitor::{
    walk_member, walk_object, Iso, JsonIsoVisitor, JsonTreeVisitor, JsonVisitor,
};

// ============================================================================
// Shared helpers
// ============================================================================

fn compile(option: &str, expression: &str) -> Result<JsonPathMatcher, RewriteError> {
    JsonPathMatcher::new(expression)
        .map_err(|err| RewriteError::invalid_option(option, err.to_string()))
}

/// A matcher that reports its first evaluation error and then stops
/// matching.
struct Query<'r> {
    matcher: &'r JsonPathMatcher,
    failed: bool,
}

impl<'r> Query<'r> {
    fn new(matcher: &'r JsonPathMatcher) -> Self {
        Self {
            matcher,
            failed: false,
        }
    }

    fn matches(&mut self, cursor: &Cursor<'_, Json>, ctx: &mut ExecutionContext) -> bool {
        if self.failed {
            return false;
        }
        match self.matcher.matches(cursor) {
            Ok(matched) => matched,
            Err(err) => {
                warn!(expression = self.matcher.expression(), "path evaluation failed: {err}");
                ctx.on_error(&err);
                self.failed = true;
                false
            }
        }
    }
}

/// True when `document` is a [`Document`](crate::Document) whose source
/// path ends with `path`, or when no path is given.
fn in_file(document: &Json, path: Option<&Path>) -> bool {
    match path {
        None => true,
        Some(path) => document
            .as_document()
            .is_some_and(|document| document.source_path().ends_with(path)),
    }
}

fn is_member_key(cursor: &Cursor<'_, Json>) -> bool {
    cursor
        .parent_value()
        .and_then(Json::as_member)
        .is_some_and(|member| member.key().is_same(cursor.value()))
}

/// Source text of a node without its leading trivia.
fn bare_source(node: &Json) -> String {
    print(&node.with_prefix(Space::empty()))
}

/// A freshly parsed `source` carrying `old`'s prefix, or `None` when it
/// would print the same as `old`.
fn replacement(old: &Json, source: &str, ctx: &mut ExecutionContext) -> Option<Json> {
    let parsed = match parse(source) {
        Ok(parsed) => parsed,
        Err(err) => {
            ctx.on_error(&err);
            return None;
        }
    };
    let value = parsed.as_document()?.value();
    if bare_source(old) == bare_source(value) {
        return None;
    }
    Some(value.with_prefix(old.prefix().clone()))
}

// ============================================================================
// ChangeKey
// ============================================================================

/// Rename the keys of matching members.
///
/// An identifier key stays an identifier when the new name allows it;
/// string keys keep their quote character.
#[derive(Debug, Clone)]
pub struct ChangeKey {
    key_path: JsonPathMatcher,
    new_key: String,
}

impl ChangeKey {
    pub fn new(key_path: &str, new_key: impl Into<String>) -> Result<Self, RewriteError> {
        let new_key = new_key.into();
        if new_key.is_empty() {
            return Err(RewriteError::invalid_option("new_key", "must not be empty"));
        }
        Ok(Self {
            key_path: compile("key_path", key_path)?,
            new_key,
        })
    }
}

impl Recipe<Json> for ChangeKey {
    fn name(&self) -> &str {
        "change-key"
    }

    fn description(&self) -> &str {
        "Rename the key of every member matching a path expression."
    }

    fn visitor(&self) -> BoxedVisitor<'_, Json> {
        Box::new(JsonTreeVisitor::iso(ChangeKeyVisitor {
            new_key: &self.new_key,
            query: Query::new(&self.key_path),
        }))
    }
}

struct ChangeKeyVisitor<'r> {
    new_key: &'r str,
    query: Query<'r>,
}

impl JsonIsoVisitor<ExecutionContext> for ChangeKeyVisitor<'_> {
    fn visit_member(
        &mut self,
        node: &Arc<Member>,
        cursor: &Cursor<'_, Json>,
        ctx: &mut ExecutionContext,
    ) -> Arc<Member> {
        let member = walk_member(&mut Iso(&mut *self), node, cursor, ctx);
        if member.key_name() == Some(self.new_key) || !self.query.matches(cursor, ctx) {
            return member;
        }
        trace!(from = member.key_name(), to = self.new_key, "renaming member key");
        member.with_key(renamed_key(member.key(), self.new_key))
    }
}

fn renamed_key(key: &Json, new_key: &str) -> Json {
    match key {
        Json::Identifier(identifier) if is_identifier(new_key) => {
            Json::from(identifier.with_name(new_key))
        }
        Json::Literal(literal) => {
            Json::from(literal.with_value(LiteralValue::String(new_key.to_string())))
        }
        other => Json::from(Literal::string(other.prefix().clone(), new_key, '"')),
    }
}

// ============================================================================
// ChangeValue
// ============================================================================

/// Replace matching values with `value`, given as JSON source.
///
/// A matching member has its value replaced; any other matching node is
/// replaced itself. The replacement keeps the old node's leading trivia.
#[derive(Debug, Clone)]
pub struct ChangeValue {
    value_path: JsonPathMatcher,
    value: String,
}

impl ChangeValue {
    pub fn new(value_path: &str, value: impl Into<String>) -> Result<Self, RewriteError> {
        let value = value.into();
        parse(&value).map_err(|err| RewriteError::invalid_option("value", err.to_string()))?;
        Ok(Self {
            value_path: compile("value_path", value_path)?,
            value,
        })
    }
}

impl Recipe<Json> for ChangeValue {
    fn name(&self) -> &str {
        "change-value"
    }

    fn description(&self) -> &str {
        "Replace every value matching a path expression."
    }

    fn visitor(&self) -> BoxedVisitor<'_, Json> {
        Box::new(JsonTreeVisitor::new(ChangeValueVisitor {
            source: Some(&self.value),
            file: None,
            query: Query::new(&self.value_path),
        }))
    }
}

/// Shared by [`ChangeValue`] and the transform phase of [`CopyValue`].
struct ChangeValueVisitor<'r> {
    source: Option<&'r str>,
    file: Option<&'r Path>,
    query: Query<'r>,
}

impl JsonVisitor<ExecutionContext> for ChangeValueVisitor<'_> {
    fn is_applicable_to(&mut self, document: &Json, _ctx: &mut ExecutionContext) -> bool {
        self.source.is_some() && in_file(document, self.file)
    }

    fn post_visit(
        &mut self,
        tree: Json,
        cursor: &Cursor<'_, Json>,
        ctx: &mut ExecutionContext,
    ) -> Json {
        let Some(source) = self.source else {
            return tree;
        };
        if is_member_key(cursor) || !self.query.matches(cursor, ctx) {
            return tree;
        }
        let replaced = match &tree {
            Json::Member(member) => replacement(member.value(), source, ctx)
                .map(|value| Json::from(member.with_value(value))),
            Json::Document(_) => None,
            other => replacement(other, source, ctx),
        };
        replaced.unwrap_or(tree)
    }
}

// ============================================================================
// DeleteKey
// ============================================================================

/// Remove matching members from their objects.
///
/// The comma that separated the member goes with it. When the last member
/// is removed, the trivia before the closing brace moves to the new last
/// member; an object left without members keeps that trivia inside `{}`.
/// Removing the first member hands its prefix to the new first member.
#[derive(Debug, Clone)]
pub struct DeleteKey {
    key_path: JsonPathMatcher,
}

impl DeleteKey {
    pub fn new(key_path: &str) -> Result<Self, RewriteError> {
        Ok(Self {
            key_path: compile("key_path", key_path)?,
        })
    }
}

impl Recipe<Json> for DeleteKey {
    fn name(&self) -> &str {
        "delete-key"
    }

    fn description(&self) -> &str {
        "Delete every member matching a path expression."
    }

    fn visitor(&self) -> BoxedVisitor<'_, Json> {
        Box::new(JsonTreeVisitor::iso(DeleteKeyVisitor {
            query: Query::new(&self.key_path),
        }))
    }
}

struct DeleteKeyVisitor<'r> {
    query: Query<'r>,
}

impl JsonIsoVisitor<ExecutionContext> for DeleteKeyVisitor<'_> {
    fn visit_object(
        &mut self,
        node: &Arc<JsonObject>,
        cursor: &Cursor<'_, Json>,
        ctx: &mut ExecutionContext,
    ) -> Arc<JsonObject> {
        let walked = walk_object(&mut Iso(&mut *self), node, cursor, ctx);

        // Decide against the original members so the path sees the tree as
        // it was parsed.
        let removed: Vec<bool> = node
            .padded_members()
            .iter()
            .map(|padded| {
                padded.element().as_member().is_some()
                    && self.query.matches(&cursor.child(padded.element()), ctx)
            })
            .collect();
        if !removed.contains(&true) {
            return walked;
        }

        let members = walked.padded_members();
        let mut kept: Vec<RightPadded<Json>> = members
            .iter()
            .zip(&removed)
            .filter(|(_, removed)| !**removed)
            .map(|(padded, _)| padded.clone())
            .collect();

        if removed.first() == Some(&true) {
            if let (Some(first), Some(original)) = (kept.first_mut(), members.first()) {
                let prefix = original.element().prefix().clone();
                *first = first.with_element(first.element().with_prefix(prefix));
            }
        }

        if let (Some(last), Some(true)) = (members.last(), removed.last()) {
            let after = last.after().clone();
            let tail = match kept.pop() {
                Some(previous) => previous.with_after(after),
                None => RightPadded::new(
                    Json::from(Empty::new(after)),
                    Space::empty(),
                    Markers::empty(),
                ),
            };
            kept.push(tail);
        }

        trace!(
            removed = removed.iter().filter(|removed| **removed).count(),
            "deleting members"
        );
        walked.with_padded_members(Arc::new(kept))
    }
}

// ============================================================================
// FindKey
// ============================================================================

/// Mark matching members with a [`SearchResult`].
#[derive(Debug, Clone)]
pub struct FindKey {
    key_path: JsonPathMatcher,
}

impl FindKey {
    pub fn new(key_path: &str) -> Result<Self, RewriteError> {
        Ok(Self {
            key_path: compile("key_path", key_path)?,
        })
    }
}

impl Recipe<Json> for FindKey {
    fn name(&self) -> &str {
        "find-key"
    }

    fn description(&self) -> &str {
        "Mark every member matching a path expression."
    }

    fn visitor(&self) -> BoxedVisitor<'_, Json> {
        Box::new(JsonTreeVisitor::iso(FindKeyVisitor {
            query: Query::new(&self.key_path),
        }))
    }
}

struct FindKeyVisitor<'r> {
    query: Query<'r>,
}

impl JsonIsoVisitor<ExecutionContext> for FindKeyVisitor<'_> {
    fn visit_member(
        &mut self,
        node: &Arc<Member>,
        cursor: &Cursor<'_, Json>,
        ctx: &mut ExecutionContext,
    ) -> Arc<Member> {
        let member = walk_member(&mut Iso(&mut *self), node, cursor, ctx);
        if member.markers().contains::<SearchResult>() || !self.query.matches(cursor, ctx) {
            return member;
        }
        member.with_markers(SearchResult::found(member.markers(), None))
    }
}

// ============================================================================
// CopyValue
// ============================================================================

/// Copy the value at `old_key_path` to every node matching `new_key_path`.
///
/// The scan phase records the first match across all documents (optionally
/// only documents whose path ends with `old_file_path`); the transform phase
/// then writes it like [`ChangeValue`]. When documents are scanned in
/// parallel and several contain a match, which one wins is unspecified.
#[derive(Debug, Clone)]
pub struct CopyValue {
    old_key_path: JsonPathMatcher,
    old_file_path: Option<PathBuf>,
    new_key_path: JsonPathMatcher,
    new_file_path: Option<PathBuf>,
}

impl CopyValue {
    pub fn new(old_key_path: &str, new_key_path: &str) -> Result<Self, RewriteError> {
        Ok(Self {
            old_key_path: compile("old_key_path", old_key_path)?,
            old_file_path: None,
            new_key_path: compile("new_key_path", new_key_path)?,
            new_file_path: None,
        })
    }

    /// Only read the value from documents whose path ends with `path`.
    #[must_use]
    pub fn with_old_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.old_file_path = Some(path.into());
        self
    }

    /// Only write the value into documents whose path ends with `path`.
    #[must_use]
    pub fn with_new_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.new_file_path = Some(path.into());
        self
    }
}

impl ScanningRecipe<Json> for CopyValue {
    /// Source text of the copied value.
    type Acc = OnceCell<String>;

    fn name(&self) -> &str {
        "copy-value"
    }

    fn description(&self) -> &str {
        "Copy a value from one location to another, possibly across documents."
    }

    fn initial_value(&self) -> Self::Acc {
        OnceCell::new()
    }

    fn scanner<'a>(&'a self, acc: &'a Self::Acc) -> BoxedVisitor<'a, Json> {
        Box::new(JsonTreeVisitor::iso(CopyValueScanner {
            acc,
            file: self.old_file_path.as_deref(),
            query: Query::new(&self.old_key_path),
        }))
    }

    fn visitor<'a>(&'a self, acc: &'a Self::Acc) -> BoxedVisitor<'a, Json> {
        Box::new(JsonTreeVisitor::new(ChangeValueVisitor {
            source: acc.get().map(String::as_str),
            file: self.new_file_path.as_deref(),
            query: Query::new(&self.new_key_path),
        }))
    }
}

struct CopyValueScanner<'r> {
    acc: &'r OnceCell<String>,
    file: Option<&'r Path>,
    query: Query<'r>,
}

impl JsonIsoVisitor<ExecutionContext> for CopyValueScanner<'_> {
    fn is_applicable_to(&mut self, document: &Json, _ctx: &mut ExecutionContext) -> bool {
        self.acc.get().is_none() && in_file(document, self.file)
    }

    fn pre_visit(
        &mut self,
        tree: &Json,
        cursor: &Cursor<'_, Json>,
        ctx: &mut ExecutionContext,
    ) -> VisitResult {
        if self.acc.get().is_some() {
            return VisitResult::SkipChildren;
        }
        if matches!(tree, Json::Document(_)) || is_member_key(cursor) {
            return VisitResult::Continue;
        }
        if self.query.matches(cursor, ctx) {
            let value = match tree {
                Json::Member(member) => member.value(),
                other => other,
            };
            // First match wins; a concurrent scan may already have set it.
            if self.acc.set(bare_source(value)).is_err() {
                trace!("source value already captured");
            }
            return VisitResult::SkipChildren;
        }
        VisitResult::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tugrewrite_core::TreeVisitor;

    fn run(recipe: &dyn Recipe<Json>, source: &str) -> (String, ExecutionContext) {
        let json = parse(source).unwrap();
        let mut ctx = ExecutionContext::new();
        let after = recipe.visitor().visit_if_applicable(&json, &mut ctx);
        (print(&after), ctx)
    }

    #[test]
    fn test_change_key_keeps_quote_style() {
        let recipe = ChangeKey::new("$.a", "b").unwrap();
        assert_eq!(run(&recipe, "{'a': 1}").0, "{'b': 1}");
        assert_eq!(run(&recipe, "{ a : 1}").0, "{ b : 1}");
        let recipe = ChangeKey::new("$.a", "not an identifier").unwrap();
        assert_eq!(run(&recipe, "{a: 1}").0, "{\"not an identifier\": 1}");
    }

    #[test]
    fn test_change_key_rejects_empty_key() {
        let err = ChangeKey::new("$.a", "").unwrap_err();
        assert!(matches!(err, RewriteError::InvalidOption { ref option, .. } if option == "new_key"));
        let err = ChangeKey::new("$.[", "b").unwrap_err();
        assert!(matches!(err, RewriteError::InvalidOption { ref option, .. } if option == "key_path"));
    }

    #[test]
    fn test_change_value_keeps_prefix() {
        let recipe = ChangeValue::new("$.a", "[1, 2]").unwrap();
        assert_eq!(run(&recipe, "{\"a\":   true}").0, "{\"a\":   [1, 2]}");
    }

    #[test]
    fn test_change_value_array_elements() {
        let recipe = ChangeValue::new("$.arr[-1:]", "0").unwrap();
        assert_eq!(run(&recipe, "{\"arr\": [1, 2, 3]}").0, "{\"arr\": [1, 2, 0]}");
    }

    #[test]
    fn test_change_value_rejects_bad_source() {
        let err = ChangeValue::new("$.a", "{").unwrap_err();
        assert!(matches!(err, RewriteError::InvalidOption { ref option, .. } if option == "value"));
    }

    #[test]
    fn test_delete_key_middle_and_last() {
        let recipe = DeleteKey::new("$.b").unwrap();
        assert_eq!(
            run(&recipe, "{\n  \"a\": 1,\n  \"b\": 2,\n  \"c\": 3\n}").0,
            "{\n  \"a\": 1,\n  \"c\": 3\n}"
        );
        assert_eq!(
            run(&recipe, "{\n  \"a\": 1,\n  \"b\": 2\n}").0,
            "{\n  \"a\": 1\n}"
        );
        assert_eq!(run(&recipe, "{\"b\": 2}").0, "{}");
        assert_eq!(
            run(&recipe, "{\"b\": 2, \"c\": 3}").0,
            "{\"c\": 3}"
        );
        assert_eq!(run(&recipe, "{\"a\": 1, \"b\": 2,}").0, "{\"a\": 1,}");
    }

    #[test]
    fn test_find_key_marks_once() {
        let recipe = FindKey::new("$..name").unwrap();
        let json = parse("{\"name\": 1, \"x\": {\"name\": 2}}").unwrap();
        let mut ctx = ExecutionContext::new();
        let once = recipe.visitor().visit_tree(&json, &mut ctx);
        let twice = recipe.visitor().visit_tree(&once, &mut ctx);
        assert!(twice.is_same(&once));
        let object = once.as_document().unwrap().value().as_object().unwrap();
        assert!(object.get("name").unwrap().markers().contains::<SearchResult>());
        let x = object.get("x").unwrap();
        assert!(!x.markers().contains::<SearchResult>());
        let nested = x.value().as_object().unwrap().get("name").unwrap();
        assert!(nested.markers().contains::<SearchResult>());
        assert_eq!(print(&once), print(&json));
    }

    #[test]
    fn test_unsupported_filter_is_reported_once() {
        let recipe = FindKey::new("$.a[?(@.b && @.c)]").unwrap();
        let (printed, ctx) = run(&recipe, "{\"a\": [{\"b\": 1, \"c\": 2}], \"d\": 3}");
        assert_eq!(printed, "{\"a\": [{\"b\": 1, \"c\": 2}], \"d\": 3}");
        assert_eq!(ctx.diagnostics().len(), 1);
        assert!(ctx.diagnostics()[0].message.contains("&&"));
    }

    #[test]
    fn test_in_file() {
        let json = crate::parser::parse_with_options(
            "{}",
            crate::ParseOptions::default().with_source_path("config/app.json"),
        )
        .unwrap();
        assert!(in_file(&json, None));
        assert!(in_file(&json, Some(Path::new("app.json"))));
        assert!(in_file(&json, Some(Path::new("config/app.json"))));
        assert!(!in_file(&json, Some(Path::new("pp.json"))));
    }
}
