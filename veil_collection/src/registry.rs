// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered collection registry.

use alloc::string::String;
use alloc::vec::Vec;
use hashbrown::HashMap;

use veil_compose::NodeRef;
use veil_dom::{Document, NodeId};

/// Per-item data of list widgets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemData {
    /// Stable identity used for selection.
    pub value: String,
    /// Display text used for typeahead matching.
    pub text: String,
    /// Disabled items are skipped by navigation and select-all.
    pub disabled: bool,
}

impl ItemData {
    /// An enabled item.
    pub fn new(value: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            text: text.into(),
            disabled: false,
        }
    }

    /// Mark the item disabled.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

/// Data that can report whether its item is disabled.
pub trait CollectionData {
    /// Whether the item is disabled.
    fn is_disabled(&self) -> bool;
}

impl CollectionData for ItemData {
    fn is_disabled(&self) -> bool {
        self.disabled
    }
}

/// A registered item resolved against the current document.
#[derive(Debug)]
pub struct CollectionItem<'a, D = ItemData> {
    /// The item's node.
    pub node: NodeId,
    /// Registered data.
    pub data: &'a D,
}

impl<D> Clone for CollectionItem<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for CollectionItem<'_, D> {}

/// Items registered inside a container, read back in document order.
///
/// Registration order never matters. Every read walks the container's current
/// subtree, so items that moved are reported where they are now, and items whose
/// node is gone or outside the container are left out.
#[derive(Clone, Debug)]
pub struct CollectionRegistry<D = ItemData> {
    container: NodeRef,
    items: HashMap<NodeId, D>,
}

impl<D> Default for CollectionRegistry<D> {
    fn default() -> Self {
        Self {
            container: NodeRef::new(),
            items: HashMap::new(),
        }
    }
}

impl<D> CollectionRegistry<D> {
    /// An empty registry without a container.
    pub fn new() -> Self {
        Self::default()
    }

    /// The container ref. Compose it onto the list element.
    pub fn container(&self) -> &NodeRef {
        &self.container
    }

    /// Insert or update an item.
    pub fn register(&mut self, node: NodeId, data: D) {
        self.items.insert(node, data);
    }

    /// Remove an item.
    pub fn unregister(&mut self, node: NodeId) -> Option<D> {
        self.items.remove(&node)
    }

    /// Registered data for `node`.
    pub fn get(&self, node: NodeId) -> Option<&D> {
        self.items.get(&node)
    }

    /// Drop every registration (the owning root remounted).
    pub fn reset(&mut self) {
        tracing::trace!(count = self.items.len(), "collection reset");
        self.items.clear();
    }

    /// Number of registrations, including ones not currently in the container.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Registered items present in the container, in document order.
    ///
    /// Empty when the container ref is unset or stale.
    pub fn ordered_items<'a>(&'a self, doc: &Document) -> Vec<CollectionItem<'a, D>> {
        let Some(root) = self.container.get() else {
            return Vec::new();
        };
        if self.items.is_empty() {
            return Vec::new();
        }
        doc.descendants(root)
            .filter_map(|node| self.items.get(&node).map(|data| CollectionItem { node, data }))
            .collect()
    }
}

impl<D: CollectionData> CollectionRegistry<D> {
    /// [`ordered_items`](Self::ordered_items) without disabled items.
    pub fn enabled_items<'a>(&'a self, doc: &Document) -> Vec<CollectionItem<'a, D>> {
        let mut items = self.ordered_items(doc);
        items.retain(|item| !item.data.is_disabled());
        items
    }
}
