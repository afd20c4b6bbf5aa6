// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The contract every language's node type satisfies.

use crate::id::NodeId;
use crate::markers::Markers;
use crate::trivia::Space;

/// An immutable, identity-bearing tree element.
///
/// Implementations are cheap to clone (reference counted) and never mutated
/// in place; every edit yields a new value that keeps the original [`NodeId`].
pub trait Tree: Clone + Send + Sync {
    /// Stable identity, preserved across structural edits.
    fn id(&self) -> NodeId;

    /// Trivia preceding this element.
    fn prefix(&self) -> &Space;

    fn markers(&self) -> &Markers;

    /// Reference identity: true when both values share the same allocation,
    /// meaning no edit happened between them.
    fn is_same(&self, other: &Self) -> bool;
}
