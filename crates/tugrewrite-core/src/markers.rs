// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Side-channel annotations attached to tree elements.
//!
//! [`Markers`] is an ordered set holding at most one [`Marker`] per concrete
//! type. Markers record things like search hits ([`SearchResult`]) or source
//! provenance. They never take part in structural comparison; callers only
//! ever ask whether a particular marker kind is present.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::id::NodeId;

static EMPTY: Lazy<Markers> = Lazy::new(|| Markers {
    id: NodeId::next(),
    entries: Arc::new(Vec::new()),
});

/// Upcast helper so marker trait objects can be downcast to their concrete type.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// An opaque annotation keyed by its concrete type.
pub trait Marker: AsAny + fmt::Debug + Send + Sync {
    fn id(&self) -> NodeId;
}

/// An immutable, ordered set of markers.
#[derive(Clone)]
pub struct Markers {
    id: NodeId,
    entries: Arc<Vec<Arc<dyn Marker>>>,
}

impl Markers {
    /// The shared empty marker set.
    pub fn empty() -> Self {
        EMPTY.clone()
    }

    pub fn build(markers: impl IntoIterator<Item = Arc<dyn Marker>>) -> Self {
        let entries: Vec<Arc<dyn Marker>> = markers.into_iter().collect();
        if entries.is_empty() {
            return Self::empty();
        }
        Self {
            id: NodeId::next(),
            entries: Arc::new(entries),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Whether both sets share the same backing storage.
    pub fn ptr_eq(a: &Markers, b: &Markers) -> bool {
        Arc::ptr_eq(&a.entries, &b.entries)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Marker>> {
        self.entries.iter()
    }

    /// Find the marker of type `M`, if present.
    pub fn find<M: Marker + 'static>(&self) -> Option<&M> {
        self.entries
            .iter()
            .find_map(|entry| (**entry).as_any().downcast_ref::<M>())
    }

    pub fn contains<M: Marker + 'static>(&self) -> bool {
        self.find::<M>().is_some()
    }

    /// Add a marker, replacing any existing marker of the same type in place.
    pub fn add<M: Marker + 'static>(&self, marker: M) -> Self {
        let marker: Arc<dyn Marker> = Arc::new(marker);
        let mut entries: Vec<Arc<dyn Marker>> = Vec::with_capacity(self.entries.len() + 1);
        let mut replaced = false;
        for entry in self.entries.iter() {
            if (**entry).as_any().is::<M>() {
                entries.push(Arc::clone(&marker));
                replaced = true;
            } else {
                entries.push(Arc::clone(entry));
            }
        }
        if !replaced {
            entries.push(marker);
        }
        Self {
            id: self.id,
            entries: Arc::new(entries),
        }
    }

    /// Remove the marker of type `M`. Returns `self` unchanged when absent.
    pub fn remove<M: Marker + 'static>(&self) -> Self {
        if !self.contains::<M>() {
            return self.clone();
        }
        let entries: Vec<Arc<dyn Marker>> = self
            .entries
            .iter()
            .filter(|entry| !(***entry).as_any().is::<M>())
            .cloned()
            .collect();
        Self {
            id: self.id,
            entries: Arc::new(entries),
        }
    }
}

impl Default for Markers {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Markers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

// ============================================================================
// Built-in markers
// ============================================================================

/// Tags an element as a search hit, optionally with a description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    id: NodeId,
    description: Option<String>,
}

impl SearchResult {
    pub fn new(description: Option<String>) -> Self {
        Self {
            id: NodeId::next(),
            description,
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Add a search result to `markers`, keeping an existing one untouched.
    pub fn found(markers: &Markers, description: Option<String>) -> Markers {
        if markers.contains::<SearchResult>() {
            return markers.clone();
        }
        markers.add(SearchResult::new(description))
    }
}

impl Marker for SearchResult {
    fn id(&self) -> NodeId {
        self.id
    }
}
