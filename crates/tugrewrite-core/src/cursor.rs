// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The ancestor path of the node under visitation.
//!
//! A [`Cursor`] is built on the stack for every descent and borrows its
//! parent frame, so the whole chain lives exactly as long as the traversal
//! call that created it:
//!
//! ```text
//! visit(document)            Cursor { value: document, parent: None }
//!   visit(object)            Cursor { value: object,   parent: ─┘ }
//!     visit(member "a")      Cursor { value: member,   parent: ─┘ }
//! ```
//!
//! Cursors are read-only; mutable traversal state lives in the context
//! object passed alongside.

use std::fmt;

/// A node and a non-owning link to the cursor of its parent.
pub struct Cursor<'a, T> {
    value: &'a T,
    parent: Option<&'a Cursor<'a, T>>,
}

impl<'a, T> Cursor<'a, T> {
    /// A cursor at the root of a tree.
    pub fn root(value: &'a T) -> Self {
        Self {
            value,
            parent: None,
        }
    }

    /// A cursor for `value`, a child of this cursor's value.
    pub fn child<'b>(&'b self, value: &'b T) -> Cursor<'b, T> {
        Cursor {
            value,
            parent: Some(self),
        }
    }

    pub fn value(&self) -> &'a T {
        self.value
    }

    pub fn parent(&self) -> Option<&'a Cursor<'a, T>> {
        self.parent
    }

    pub fn parent_value(&self) -> Option<&'a T> {
        self.parent.map(|parent| parent.value)
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Number of ancestors above this cursor.
    pub fn depth(&self) -> usize {
        self.path().count() - 1
    }

    /// This cursor's value followed by every ancestor, nearest first.
    pub fn path(&self) -> Path<'a, T> {
        Path {
            next: Some(Cursor {
                value: self.value,
                parent: self.parent,
            }),
        }
    }

    /// The nearest value on the path (starting with this cursor's own value)
    /// that satisfies `predicate`.
    pub fn first_enclosing(&self, predicate: impl Fn(&T) -> bool) -> Option<&'a T> {
        self.path().find(|value| predicate(value))
    }

    /// Like [`first_enclosing`](Self::first_enclosing), but starting at the parent.
    pub fn first_ancestor(&self, predicate: impl Fn(&T) -> bool) -> Option<&'a T> {
        self.path().skip(1).find(|value| predicate(value))
    }
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.path()).finish()
    }
}

/// Lazy iterator over a cursor's path, nearest first.
pub struct Path<'a, T> {
    next: Option<Cursor<'a, T>>,
}

impl<'a, T> Iterator for Path<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = current.parent.copied();
        Some(current.value)
    }
}
