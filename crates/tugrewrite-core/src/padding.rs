// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Padding wrappers that attach delimiter-adjacent trivia to an element.
//!
//! In `[1 , 2]` the space before each comma belongs neither to `1` nor to the
//! comma; it is carried by a [`RightPadded`] around `1`. Keeping it outside
//! the element means an element can be moved or replaced without dragging
//! its neighbour's formatting along.
//!
//! Lists of padded elements are stored as [`PaddedList`], an `Arc<Vec<_>>`,
//! so that [`RightPadded::with_elements`] can hand back the *same* list when
//! nothing changed.

use std::collections::HashMap;
use std::sync::Arc;

use crate::id::NodeId;
use crate::markers::Markers;
use crate::tree::Tree;
use crate::trivia::Space;

/// A shared list of right-padded elements.
pub type PaddedList<T> = Arc<Vec<RightPadded<T>>>;

// ============================================================================
// RightPadded
// ============================================================================

/// An element followed by the trivia that precedes the next token.
#[derive(Debug, Clone)]
pub struct RightPadded<T> {
    element: T,
    after: Space,
    markers: Markers,
}

impl<T> RightPadded<T> {
    pub fn new(element: T, after: Space, markers: Markers) -> Self {
        Self {
            element,
            after,
            markers,
        }
    }

    /// Wrap a freshly synthesized element with empty padding.
    pub fn build(element: T) -> Self {
        Self::new(element, Space::empty(), Markers::empty())
    }

    pub fn element(&self) -> &T {
        &self.element
    }

    pub fn after(&self) -> &Space {
        &self.after
    }

    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    pub fn into_element(self) -> T {
        self.element
    }

    pub fn with_after(&self, after: Space) -> Self
    where
        T: Clone,
    {
        if Space::ptr_eq(&self.after, &after) {
            return self.clone();
        }
        Self {
            after,
            ..self.clone()
        }
    }

    pub fn with_markers(&self, markers: Markers) -> Self
    where
        T: Clone,
    {
        if Markers::ptr_eq(&self.markers, &markers) {
            return self.clone();
        }
        Self {
            markers,
            ..self.clone()
        }
    }
}

impl<T: Tree> RightPadded<T> {
    /// Replace the element, keeping padding and markers.
    pub fn with_element(&self, element: T) -> Self {
        if self.element.is_same(&element) {
            return self.clone();
        }
        Self {
            element,
            after: self.after.clone(),
            markers: self.markers.clone(),
        }
    }

    /// Apply `f` to the element; returns an identical wrapper when `f` does.
    pub fn map(&self, f: impl FnOnce(&T) -> T) -> Self {
        self.with_element(f(&self.element))
    }

    /// Project a padded list to its plain elements.
    pub fn get_elements(list: &[RightPadded<T>]) -> Vec<T> {
        list.iter().map(|padded| padded.element.clone()).collect()
    }

    /// Reconcile a padded list with a new list of plain elements.
    ///
    /// - Elements whose id appears in `before` keep that wrapper's padding
    ///   and markers.
    /// - New elements get empty padding.
    /// - When `elements` is element-for-element identical to `before`, the
    ///   original list is returned (same `Arc`).
    ///
    /// Runs in O(n): one pass to index `before` by id, one over `elements`.
    pub fn with_elements(before: &PaddedList<T>, elements: Vec<T>) -> PaddedList<T> {
        if before.len() == elements.len()
            && before
                .iter()
                .zip(elements.iter())
                .all(|(padded, element)| padded.element.is_same(element))
        {
            return Arc::clone(before);
        }

        let index: HashMap<NodeId, &RightPadded<T>> = before
            .iter()
            .map(|padded| (padded.element.id(), padded))
            .collect();

        let after = elements
            .into_iter()
            .map(|element| match index.get(&element.id()) {
                Some(found) => found.with_element(element),
                None => RightPadded::build(element),
            })
            .collect();
        Arc::new(after)
    }
}

// ============================================================================
// LeftPadded
// ============================================================================

/// An element preceded by the trivia that follows the previous token.
#[derive(Debug, Clone)]
pub struct LeftPadded<T> {
    before: Space,
    element: T,
    markers: Markers,
}

impl<T> LeftPadded<T> {
    pub fn new(before: Space, element: T, markers: Markers) -> Self {
        Self {
            before,
            element,
            markers,
        }
    }

    pub fn build(element: T) -> Self {
        Self::new(Space::empty(), element, Markers::empty())
    }

    pub fn before(&self) -> &Space {
        &self.before
    }

    pub fn element(&self) -> &T {
        &self.element
    }

    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    pub fn with_before(&self, before: Space) -> Self
    where
        T: Clone,
    {
        if Space::ptr_eq(&self.before, &before) {
            return self.clone();
        }
        Self {
            before,
            ..self.clone()
        }
    }
}

impl<T: Tree> LeftPadded<T> {
    pub fn with_element(&self, element: T) -> Self {
        if self.element.is_same(&element) {
            return self.clone();
        }
        Self {
            before: self.before.clone(),
            element,
            markers: self.markers.clone(),
        }
    }

    pub fn map(&self, f: impl FnOnce(&T) -> T) -> Self {
        self.with_element(f(&self.element))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Leaf(Arc<(NodeId, Space, Markers, &'static str)>);

    impl Leaf {
        fn new(text: &'static str) -> Self {
            Self(Arc::new((NodeId::next(), Space::empty(), Markers::empty(), text)))
        }

        fn with_text(&self, text: &'static str) -> Self {
            Self(Arc::new((self.0 .0, self.0 .1.clone(), self.0 .2.clone(), text)))
        }
    }

    impl Tree for Leaf {
        fn id(&self) -> NodeId {
            self.0 .0
        }
        fn prefix(&self) -> &Space {
            &self.0 .1
        }
        fn markers(&self) -> &Markers {
            &self.0 .2
        }
        fn is_same(&self, other: &Self) -> bool {
            Arc::ptr_eq(&self.0, &other.0)
        }
    }

    fn padded(leaves: &[Leaf], pad: &str) -> PaddedList<Leaf> {
        Arc::new(
            leaves
                .iter()
                .map(|leaf| {
                    RightPadded::new(leaf.clone(), Space::build(pad, vec![]), Markers::empty())
                })
                .collect(),
        )
    }

    #[test]
    fn test_with_elements_noop_returns_same_list() {
        let list = padded(&[Leaf::new("a"), Leaf::new("b")], "  ");
        let same = RightPadded::with_elements(&list, RightPadded::get_elements(&list));
        assert!(Arc::ptr_eq(&list, &same));
    }

    #[test]
    fn test_with_elements_noop_on_empty_list() {
        let list: PaddedList<Leaf> = Arc::new(Vec::new());
        let same = RightPadded::with_elements(&list, Vec::new());
        assert!(Arc::ptr_eq(&list, &same));
    }

    #[test]
    fn test_with_elements_keeps_padding_by_id() {
        let a = Leaf::new("a");
        let b = Leaf::new("b");
        let list = padded(&[a.clone(), b.clone()], "\n");

        // reorder and edit `a`; both keep their padding
        let edited_a = a.with_text("A");
        let result = RightPadded::with_elements(&list, vec![b.clone(), edited_a]);
        assert!(!Arc::ptr_eq(&list, &result));
        assert_eq!(result.len(), 2);
        assert!(result[0].element().is_same(&b));
        assert_eq!(result[0].after().whitespace(), "\n");
        assert_eq!(result[1].element().0 .3, "A");
        assert_eq!(result[1].after().whitespace(), "\n");
    }

    #[test]
    fn test_with_elements_new_element_gets_empty_padding() {
        let list = padded(&[Leaf::new("a")], " ");
        let fresh = Leaf::new("fresh");
        let result = RightPadded::with_elements(&list, vec![list[0].element().clone(), fresh]);
        assert_eq!(result.len(), 2);
        assert!(Space::ptr_eq(result[0].after(), &Space::single_space()));
        assert!(result[1].after().is_canonical_empty());
    }

    #[test]
    fn test_with_elements_shorter_list() {
        let list = padded(&[Leaf::new("a"), Leaf::new("b")], " ");
        let result = RightPadded::with_elements(&list, vec![list[1].element().clone()]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].element().0 .3, "b");
    }

    #[test]
    fn test_with_element_short_circuits() {
        let leaf = Leaf::new("x");
        let wrapper = RightPadded::build(leaf.clone());
        let same = wrapper.with_element(leaf);
        assert!(same.element().is_same(wrapper.element()));
        let mapped = wrapper.map(|l| l.clone());
        assert!(mapped.element().is_same(wrapper.element()));
    }

    #[test]
    fn test_with_markers_short_circuits() {
        use crate::markers::SearchResult;

        let wrapper = RightPadded::build(Leaf::new("x"));
        let same = wrapper.with_markers(wrapper.markers().clone());
        assert!(Markers::ptr_eq(same.markers(), wrapper.markers()));
        assert!(same.element().is_same(wrapper.element()));

        let marked = wrapper.with_markers(SearchResult::found(wrapper.markers(), None));
        assert!(!Markers::ptr_eq(marked.markers(), wrapper.markers()));
        assert!(marked.element().is_same(wrapper.element()));
    }

    #[test]
    fn test_left_padded_map() {
        let leaf = Leaf::new("x");
        let wrapper = LeftPadded::new(Space::single_space(), leaf, Markers::empty());
        let mapped = wrapper.map(|l| l.with_text("y"));
        assert_eq!(mapped.element().0 .3, "y");
        assert!(Space::ptr_eq(mapped.before(), wrapper.before()));
    }
}
