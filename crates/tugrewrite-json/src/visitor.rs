// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor traits for rewriting JSON trees.
//!
//! Two disciplines share one set of walkers:
//!
//! - [`JsonVisitor`] (heterogeneous): every `visit_*` method returns a
//!   [`Json`], so a visitor may replace a node with a different variant.
//! - [`JsonIsoVisitor`] (homomorphic): every `visit_*` method returns the
//!   node's own type. [`Iso`] adapts it to [`JsonVisitor`].
//!
//! The `walk_*` functions visit every structural child and rebuild a node
//! only when a child came back as a different allocation, so an unchanged
//! subtree is returned as-is.
//!
//! # Traversal order
//!
//! For each node, [`pre_visit`](JsonVisitor::pre_visit) runs first. If it
//! returns [`VisitResult::SkipChildren`], the node is left untouched and
//! only [`post_visit`](JsonVisitor::post_visit) runs. Otherwise the
//! per-variant method runs, and its result is passed to `post_visit`.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tugrewrite_core::{Cursor, TreeVisitor};
//! use tugrewrite_json::{parse, print, Json, JsonIsoVisitor, JsonTreeVisitor, Literal, LiteralValue};
//!
//! struct Double;
//!
//! impl JsonIsoVisitor<()> for Double {
//!     fn visit_literal(&mut self, node: &Arc<Literal>, _: &Cursor<'_, Json>, _: &mut ()) -> Arc<Literal> {
//!         match node.value().as_f64() {
//!             Some(n) => node.with_value(LiteralValue::Number(n * 2.0)),
//!             None => Arc::clone(node),
//!         }
//!     }
//! }
//!
//! let json = parse("[1, /* two */ 2]").unwrap();
//! let doubled = JsonTreeVisitor::iso(Double).visit_tree(&json, &mut ());
//! assert_eq!(print(&doubled), "[2, /* two */ 4]");
//! ```

use std::sync::Arc;

use tugrewrite_core::{Cursor, PaddedList, Space, Tree, TreeVisitor, VisitResult};

use crate::tree::{Document, Empty, Identifier, Json, JsonArray, JsonObject, Literal, Member};

/// Generates the per-variant `visit_*` methods of [`JsonVisitor`].
macro_rules! visitor_methods {
    ($($base_name:ident : $node_type:ty),* $(,)?) => {
        paste::paste! {
            $(
                #[doc = concat!("Visit a [`", stringify!($node_type), "`] node.")]
                #[doc = ""]
                #[doc = concat!("Defaults to [`walk_", stringify!($base_name), "`].")]
                fn [<visit_ $base_name>](
                    &mut self,
                    node: &Arc<$node_type>,
                    cursor: &Cursor<'_, Json>,
                    ctx: &mut P,
                ) -> Json {
                    Json::from([<walk_ $base_name>](self, node, cursor, ctx))
                }
            )*
        }
    };
}

/// Generates the per-variant `visit_*` methods of [`JsonIsoVisitor`].
macro_rules! iso_visitor_methods {
    ($($base_name:ident : $node_type:ty),* $(,)?) => {
        paste::paste! {
            $(
                #[doc = concat!("Visit a [`", stringify!($node_type), "`] node, returning the same node type.")]
                fn [<visit_ $base_name>](
                    &mut self,
                    node: &Arc<$node_type>,
                    cursor: &Cursor<'_, Json>,
                    ctx: &mut P,
                ) -> Arc<$node_type> {
                    [<walk_ $base_name>](&mut Iso(self), node, cursor, ctx)
                }
            )*
        }
    };
}

/// Forwards the per-variant methods of an iso visitor to another one.
macro_rules! forward_iso_methods {
    ($($base_name:ident : $node_type:ty),* $(,)?) => {
        paste::paste! {
            $(
                fn [<visit_ $base_name>](
                    &mut self,
                    node: &Arc<$node_type>,
                    cursor: &Cursor<'_, Json>,
                    ctx: &mut P,
                ) -> Arc<$node_type> {
                    (**self).[<visit_ $base_name>](node, cursor, ctx)
                }
            )*
        }
    };
}

/// Adapts the per-variant methods of an iso visitor to [`JsonVisitor`].
macro_rules! adapt_iso_methods {
    ($($base_name:ident : $node_type:ty),* $(,)?) => {
        paste::paste! {
            $(
                fn [<visit_ $base_name>](
                    &mut self,
                    node: &Arc<$node_type>,
                    cursor: &Cursor<'_, Json>,
                    ctx: &mut P,
                ) -> Json {
                    Json::from(self.0.[<visit_ $base_name>](node, cursor, ctx))
                }
            )*
        }
    };
}

// ============================================================================
// Heterogeneous visitor
// ============================================================================

/// A rewriting visitor whose methods may return any [`Json`] variant.
///
/// The context `P` is threaded by reference through every call. Member keys
/// are the one constraint: a visitor that turns a key into something other
/// than a string literal or identifier panics in [`walk_member`].
pub trait JsonVisitor<P> {
    /// Cheap document-level precondition, checked by [`JsonTreeVisitor`]
    /// before descending.
    fn is_applicable_to(&mut self, _document: &Json, _ctx: &mut P) -> bool {
        true
    }

    /// Runs before a node is visited.
    fn pre_visit(&mut self, _tree: &Json, _cursor: &Cursor<'_, Json>, _ctx: &mut P) -> VisitResult {
        VisitResult::Continue
    }

    /// Runs after a node is visited, with the visited result.
    fn post_visit(&mut self, tree: Json, _cursor: &Cursor<'_, Json>, _ctx: &mut P) -> Json {
        tree
    }

    /// Visit any node. `parent` is the cursor of the enclosing node, or
    /// `None` at the root of the traversal.
    fn visit(&mut self, tree: &Json, parent: Option<&Cursor<'_, Json>>, ctx: &mut P) -> Json {
        visit_node(self, tree, parent, ctx)
    }

    /// Visit trivia owned by the node at `cursor`.
    fn visit_space(&mut self, space: &Space, _cursor: &Cursor<'_, Json>, _ctx: &mut P) -> Space {
        space.clone()
    }

    visitor_methods! {
        document: Document,
        object: JsonObject,
        member: Member,
        array: JsonArray,
        literal: Literal,
        identifier: Identifier,
        empty: Empty,
    }
}

/// The default body of [`JsonVisitor::visit`]: build the cursor, run the
/// hooks and dispatch on the variant.
pub fn visit_node<P, V: JsonVisitor<P> + ?Sized>(
    v: &mut V,
    tree: &Json,
    parent: Option<&Cursor<'_, Json>>,
    ctx: &mut P,
) -> Json {
    let cursor = match parent {
        Some(parent) => parent.child(tree),
        None => Cursor::root(tree),
    };
    if v.pre_visit(tree, &cursor, ctx) == VisitResult::SkipChildren {
        return v.post_visit(tree.clone(), &cursor, ctx);
    }
    let visited = match tree {
        Json::Document(node) => v.visit_document(node, &cursor, ctx),
        Json::Object(node) => v.visit_object(node, &cursor, ctx),
        Json::Member(node) => v.visit_member(node, &cursor, ctx),
        Json::Array(node) => v.visit_array(node, &cursor, ctx),
        Json::Literal(node) => v.visit_literal(node, &cursor, ctx),
        Json::Identifier(node) => v.visit_identifier(node, &cursor, ctx),
        Json::Empty(node) => v.visit_empty(node, &cursor, ctx),
    };
    v.post_visit(visited, &cursor, ctx)
}

// ============================================================================
// Walkers
// ============================================================================

pub fn walk_document<P, V: JsonVisitor<P> + ?Sized>(
    v: &mut V,
    node: &Arc<Document>,
    cursor: &Cursor<'_, Json>,
    ctx: &mut P,
) -> Arc<Document> {
    let prefix = v.visit_space(node.prefix(), cursor, ctx);
    let value = v.visit(node.value(), Some(cursor), ctx);
    let eof = v.visit_space(node.eof(), cursor, ctx);
    node.with_prefix(prefix).with_value(value).with_eof(eof)
}

pub fn walk_object<P, V: JsonVisitor<P> + ?Sized>(
    v: &mut V,
    node: &Arc<JsonObject>,
    cursor: &Cursor<'_, Json>,
    ctx: &mut P,
) -> Arc<JsonObject> {
    let prefix = v.visit_space(node.prefix(), cursor, ctx);
    let members = walk_padded(v, node.padded_members(), cursor, ctx);
    node.with_prefix(prefix).with_padded_members(members)
}

/// # Panics
///
/// If the visited key is not a string literal or identifier.
pub fn walk_member<P, V: JsonVisitor<P> + ?Sized>(
    v: &mut V,
    node: &Arc<Member>,
    cursor: &Cursor<'_, Json>,
    ctx: &mut P,
) -> Arc<Member> {
    let prefix = v.visit_space(node.prefix(), cursor, ctx);
    let padded_key = node.padded_key();
    let key = v.visit(padded_key.element(), Some(cursor), ctx);
    assert!(
        key.is_key(),
        "visitor replaced member key with {}, expected a string literal or identifier",
        key.kind()
    );
    let after = v.visit_space(padded_key.after(), cursor, ctx);
    let value = v.visit(node.value(), Some(cursor), ctx);
    node.with_prefix(prefix)
        .with_padded_key(padded_key.with_element(key).with_after(after))
        .with_value(value)
}

pub fn walk_array<P, V: JsonVisitor<P> + ?Sized>(
    v: &mut V,
    node: &Arc<JsonArray>,
    cursor: &Cursor<'_, Json>,
    ctx: &mut P,
) -> Arc<JsonArray> {
    let prefix = v.visit_space(node.prefix(), cursor, ctx);
    let values = walk_padded(v, node.padded_values(), cursor, ctx);
    node.with_prefix(prefix).with_padded_values(values)
}

pub fn walk_literal<P, V: JsonVisitor<P> + ?Sized>(
    v: &mut V,
    node: &Arc<Literal>,
    cursor: &Cursor<'_, Json>,
    ctx: &mut P,
) -> Arc<Literal> {
    let prefix = v.visit_space(node.prefix(), cursor, ctx);
    node.with_prefix(prefix)
}

pub fn walk_identifier<P, V: JsonVisitor<P> + ?Sized>(
    v: &mut V,
    node: &Arc<Identifier>,
    cursor: &Cursor<'_, Json>,
    ctx: &mut P,
) -> Arc<Identifier> {
    let prefix = v.visit_space(node.prefix(), cursor, ctx);
    node.with_prefix(prefix)
}

pub fn walk_empty<P, V: JsonVisitor<P> + ?Sized>(
    v: &mut V,
    node: &Arc<Empty>,
    cursor: &Cursor<'_, Json>,
    ctx: &mut P,
) -> Arc<Empty> {
    let prefix = v.visit_space(node.prefix(), cursor, ctx);
    node.with_prefix(prefix)
}

/// Visit each element and its trailing trivia. Returns `list` itself when
/// nothing changed.
fn walk_padded<P, V: JsonVisitor<P> + ?Sized>(
    v: &mut V,
    list: &PaddedList<Json>,
    cursor: &Cursor<'_, Json>,
    ctx: &mut P,
) -> PaddedList<Json> {
    let mut changed = false;
    let mut visited = Vec::with_capacity(list.len());
    for padded in list.iter() {
        let element = v.visit(padded.element(), Some(cursor), ctx);
        let after = v.visit_space(padded.after(), cursor, ctx);
        if !element.is_same(padded.element()) || !Space::ptr_eq(&after, padded.after()) {
            changed = true;
        }
        visited.push(padded.with_element(element).with_after(after));
    }
    if changed {
        Arc::new(visited)
    } else {
        Arc::clone(list)
    }
}

// ============================================================================
// Iso visitor
// ============================================================================

/// A rewriting visitor whose methods return the type they were given.
///
/// Wrap in [`Iso`] (or use [`JsonTreeVisitor::iso`]) to drive it.
pub trait JsonIsoVisitor<P> {
    fn is_applicable_to(&mut self, _document: &Json, _ctx: &mut P) -> bool {
        true
    }

    fn pre_visit(&mut self, _tree: &Json, _cursor: &Cursor<'_, Json>, _ctx: &mut P) -> VisitResult {
        VisitResult::Continue
    }

    fn visit_space(&mut self, space: &Space, _cursor: &Cursor<'_, Json>, _ctx: &mut P) -> Space {
        space.clone()
    }

    iso_visitor_methods! {
        document: Document,
        object: JsonObject,
        member: Member,
        array: JsonArray,
        literal: Literal,
        identifier: Identifier,
        empty: Empty,
    }
}

impl<P, V: JsonIsoVisitor<P> + ?Sized> JsonIsoVisitor<P> for &mut V {
    fn is_applicable_to(&mut self, document: &Json, ctx: &mut P) -> bool {
        (**self).is_applicable_to(document, ctx)
    }

    fn pre_visit(&mut self, tree: &Json, cursor: &Cursor<'_, Json>, ctx: &mut P) -> VisitResult {
        (**self).pre_visit(tree, cursor, ctx)
    }

    fn visit_space(&mut self, space: &Space, cursor: &Cursor<'_, Json>, ctx: &mut P) -> Space {
        (**self).visit_space(space, cursor, ctx)
    }

    forward_iso_methods! {
        document: Document,
        object: JsonObject,
        member: Member,
        array: JsonArray,
        literal: Literal,
        identifier: Identifier,
        empty: Empty,
    }
}

/// Drives a [`JsonIsoVisitor`] as a [`JsonVisitor`].
#[derive(Debug, Clone, Default)]
pub struct Iso<V>(pub V);

impl<P, V: JsonIsoVisitor<P>> JsonVisitor<P> for Iso<V> {
    fn is_applicable_to(&mut self, document: &Json, ctx: &mut P) -> bool {
        self.0.is_applicable_to(document, ctx)
    }

    fn pre_visit(&mut self, tree: &Json, cursor: &Cursor<'_, Json>, ctx: &mut P) -> VisitResult {
        self.0.pre_visit(tree, cursor, ctx)
    }

    fn visit_space(&mut self, space: &Space, cursor: &Cursor<'_, Json>, ctx: &mut P) -> Space {
        self.0.visit_space(space, cursor, ctx)
    }

    adapt_iso_methods! {
        document: Document,
        object: JsonObject,
        member: Member,
        array: JsonArray,
        literal: Literal,
        identifier: Identifier,
        empty: Empty,
    }
}

// ============================================================================
// Document-level adapter
// ============================================================================

/// Adapts a [`JsonVisitor`] to [`TreeVisitor`], so it can be chained and
/// handed to the recipe runner.
#[derive(Debug, Clone, Default)]
pub struct JsonTreeVisitor<V>(pub V);

impl<V> JsonTreeVisitor<V> {
    pub fn new(visitor: V) -> Self {
        Self(visitor)
    }

    pub fn into_inner(self) -> V {
        self.0
    }
}

impl<V> JsonTreeVisitor<Iso<V>> {
    pub fn iso(visitor: V) -> Self {
        Self(Iso(visitor))
    }
}

impl<P, V: JsonVisitor<P>> TreeVisitor<Json, P> for JsonTreeVisitor<V> {
    fn is_applicable_to(&mut self, tree: &Json, ctx: &mut P) -> bool {
        self.0.is_applicable_to(tree, ctx)
    }

    fn visit_tree(&mut self, tree: &Json, ctx: &mut P) -> Json {
        self.0.visit(tree, None, ctx)
    }
}
