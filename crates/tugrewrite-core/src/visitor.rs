// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Language-agnostic visitor contracts.
//!
//! Each language front-end defines its own per-variant visitor trait (see
//! `tugrewrite_json::JsonVisitor`) and adapts it to [`TreeVisitor`], the
//! document-level entry point the recipe runner and [`VisitorChain`] drive.
//!
//! # Traversal discipline
//!
//! - One document, one thread: a visit is synchronous and recursion depth
//!   equals tree depth.
//! - A visitor returns the original value (same allocation) when nothing
//!   changed, and a structurally shared replacement otherwise.
//! - The context `P` is the only mutable state and lives as long as the
//!   outermost visit.

/// Result of a pre-visit hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisitResult {
    /// Descend into the node's children.
    #[default]
    Continue,

    /// Leave the node and its subtree exactly as they are.
    SkipChildren,
}

/// A visitor that can be applied to a whole document.
pub trait TreeVisitor<T, P> {
    /// Cheap precondition; returning `false` skips the document without
    /// descending.
    fn is_applicable_to(&mut self, _tree: &T, _ctx: &mut P) -> bool {
        true
    }

    /// Visit `tree` from its root.
    fn visit_tree(&mut self, tree: &T, ctx: &mut P) -> T;

    /// [`visit_tree`](Self::visit_tree) guarded by
    /// [`is_applicable_to`](Self::is_applicable_to).
    fn visit_if_applicable(&mut self, tree: &T, ctx: &mut P) -> T
    where
        T: Clone,
    {
        if self.is_applicable_to(tree, ctx) {
            self.visit_tree(tree, ctx)
        } else {
            tree.clone()
        }
    }
}

impl<T, P, V: TreeVisitor<T, P> + ?Sized> TreeVisitor<T, P> for Box<V> {
    fn is_applicable_to(&mut self, tree: &T, ctx: &mut P) -> bool {
        (**self).is_applicable_to(tree, ctx)
    }

    fn visit_tree(&mut self, tree: &T, ctx: &mut P) -> T {
        (**self).visit_tree(tree, ctx)
    }
}

/// Visitors applied one after another, each receiving the previous output.
///
/// Application is strictly sequential. A visitor whose
/// [`is_applicable_to`](TreeVisitor::is_applicable_to) declines the current
/// document is skipped.
pub struct VisitorChain<'v, T, P> {
    visitors: Vec<Box<dyn TreeVisitor<T, P> + 'v>>,
}

impl<'v, T, P> VisitorChain<'v, T, P> {
    pub fn new() -> Self {
        Self {
            visitors: Vec::new(),
        }
    }

    /// Append a visitor to the end of the chain.
    #[must_use]
    pub fn then(mut self, visitor: impl TreeVisitor<T, P> + 'v) -> Self {
        self.visitors.push(Box::new(visitor));
        self
    }

    pub fn push(&mut self, visitor: Box<dyn TreeVisitor<T, P> + 'v>) {
        self.visitors.push(visitor);
    }

    pub fn len(&self) -> usize {
        self.visitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visitors.is_empty()
    }
}

impl<T, P> Default for VisitorChain<'_, T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, P> TreeVisitor<T, P> for VisitorChain<'_, T, P> {
    fn visit_tree(&mut self, tree: &T, ctx: &mut P) -> T {
        let mut current = tree.clone();
        for (index, visitor) in self.visitors.iter_mut().enumerate() {
            if visitor.is_applicable_to(&current, ctx) {
                current = visitor.visit_tree(&current, ctx);
            } else {
                tracing::trace!(index, "visitor not applicable, skipping");
            }
        }
        current
    }
}
