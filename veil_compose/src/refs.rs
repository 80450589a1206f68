// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node refs and multi-consumer ref composition.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;

use veil_dom::NodeId;

/// A shared, nullable handle to a node.
///
/// Clones share the same cell. The ref does not keep the node alive; consumers
/// check liveness through the document before using it.
#[derive(Clone, Debug, Default)]
pub struct NodeRef(Rc<Cell<Option<NodeId>>>);

impl NodeRef {
    /// An empty ref.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current node.
    pub fn get(&self) -> Option<NodeId> {
        self.0.get()
    }

    /// Point the ref at `node` (or clear it).
    pub fn set(&self, node: Option<NodeId>) {
        self.0.set(node);
    }

    /// Whether two refs share the same cell.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

enum Consumer {
    Ref(NodeRef),
    Callback(Box<dyn FnMut(Option<NodeId>)>),
}

/// One "assign node" operation forwarded to several consumers, left to right.
#[derive(Default)]
pub struct ComposedRefs {
    consumers: Vec<Consumer>,
}

impl core::fmt::Debug for ComposedRefs {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ComposedRefs")
            .field("consumers", &self.consumers.len())
            .finish_non_exhaustive()
    }
}

impl ComposedRefs {
    /// No consumers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node ref consumer.
    pub fn with_ref(mut self, node_ref: &NodeRef) -> Self {
        self.push_ref(node_ref);
        self
    }

    /// Add a callback consumer.
    pub fn with_callback(mut self, callback: impl FnMut(Option<NodeId>) + 'static) -> Self {
        self.push_callback(callback);
        self
    }

    /// Add a node ref consumer.
    pub fn push_ref(&mut self, node_ref: &NodeRef) {
        self.consumers.push(Consumer::Ref(node_ref.clone()));
    }

    /// Add a callback consumer.
    pub fn push_callback(&mut self, callback: impl FnMut(Option<NodeId>) + 'static) {
        self.consumers.push(Consumer::Callback(Box::new(callback)));
    }

    /// Number of consumers.
    pub fn len(&self) -> usize {
        self.consumers.len()
    }

    /// Whether there are no consumers.
    pub fn is_empty(&self) -> bool {
        self.consumers.is_empty()
    }

    /// Forward `node` to every consumer in registration order.
    pub fn assign(&mut self, node: Option<NodeId>) {
        for consumer in &mut self.consumers {
            match consumer {
                Consumer::Ref(r) => r.set(node),
                Consumer::Callback(cb) => cb(node),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use core::cell::RefCell;
    use veil_dom::{Document, Element, Tag};

    #[test]
    fn clones_share_the_cell() {
        let a = NodeRef::new();
        let b = a.clone();
        let doc = Document::new();
        a.set(Some(doc.body()));
        assert_eq!(b.get(), Some(doc.body()));
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&NodeRef::new()));
    }

    #[test]
    fn assign_forwards_left_to_right() {
        let mut doc = Document::new();
        let node = doc.create_element(Element::new(Tag::Div));
        let order = Rc::new(RefCell::new(Vec::new()));
        let first = NodeRef::new();
        let (o1, o2) = (Rc::clone(&order), Rc::clone(&order));
        let observed = first.clone();
        let mut refs = ComposedRefs::new()
            .with_callback(move |n| o1.borrow_mut().push(("cb1", n)))
            .with_ref(&first)
            .with_callback(move |n| {
                // The ref registered earlier is already updated.
                assert_eq!(observed.get(), n);
                o2.borrow_mut().push(("cb2", n));
            });
        assert_eq!(refs.len(), 3);

        refs.assign(Some(node));
        assert_eq!(first.get(), Some(node));
        refs.assign(None);
        assert_eq!(first.get(), None);
        assert_eq!(
            *order.borrow(),
            vec![
                ("cb1", Some(node)),
                ("cb2", Some(node)),
                ("cb1", None),
                ("cb2", None)
            ]
        );
    }
}
