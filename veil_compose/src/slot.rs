// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! As-child polymorphism: a part either renders its own element or takes over an
//! element the caller already built.

use veil_dom::{Document, DomError, Element, NodeId, Tag};

/// Where a widget part attaches its behavior.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Slot {
    /// Create this element.
    Element(Element),
    /// Merge behavior onto an existing caller-provided node.
    AsChild(NodeId),
}

impl Slot {
    /// Own element with a bare `tag`.
    pub fn own(tag: Tag) -> Self {
        Self::Element(Element::new(tag))
    }

    /// Whether the slot delegates to a provided node.
    pub fn is_as_child(&self) -> bool {
        matches!(self, Self::AsChild(_))
    }

    /// Produce the concrete node, creating the own element when needed.
    pub fn resolve(self, doc: &mut Document) -> Result<NodeId, DomError> {
        match self {
            Self::Element(element) => Ok(doc.create_element(element)),
            Self::AsChild(node) if doc.is_alive(node) => Ok(node),
            Self::AsChild(node) => Err(DomError::StaleNode(node)),
        }
    }

    /// Resolve and place the node under `parent`.
    ///
    /// A provided node that already has a parent stays where the caller put it.
    pub fn mount(self, doc: &mut Document, parent: NodeId) -> Result<NodeId, DomError> {
        let node = self.resolve(doc)?;
        if doc.parent_of(node).is_none() {
            doc.append_child(parent, node)?;
        }
        Ok(node)
    }
}

impl Default for Slot {
    fn default() -> Self {
        Self::own(Tag::Div)
    }
}
