// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core document implementation: structure, queries, focus.

use alloc::rc::Rc;
use alloc::{vec, vec::Vec};
use core::cell::RefCell;
use core::cmp::Ordering;

use crate::error::DomError;
use crate::event::{FocusEvent, FocusEventKind};
use crate::page::{ListenerId, ListenerKind, Listeners, PointerEventsLock, PointerEventsState};
use crate::types::{Element, ElementFlags, NodeId, Tag};

/// A host-owned element tree with a single focused element.
///
/// The document always has a connected `<body>` root. Other nodes start detached
/// and become connected once appended under the body (directly or through
/// ancestors). Detached subtrees stay alive and keep their structure, which is how
/// "not rendered" content is represented.
///
/// ## Example
///
/// ```rust
/// use veil_dom::{Document, Element, Tag};
///
/// let mut doc = Document::new();
/// let button = doc.create_element(Element::new(Tag::Button));
/// assert!(!doc.is_connected(button));
///
/// doc.append_child(doc.body(), button).unwrap();
/// assert!(doc.focus(button));
/// assert_eq!(doc.active_element(), Some(button));
/// ```
pub struct Document {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    body: NodeId,
    active: Option<NodeId>,
    focus_events: Vec<FocusEvent>,
    listeners: Listeners,
    pointer_events: Rc<RefCell<PointerEventsState>>,
}

impl core::fmt::Debug for Document {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Document")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("active", &self.active)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    element: Element,
}

impl Node {
    fn new(generation: u32, element: Element) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            element,
        }
    }
}

impl Document {
    /// Create a document containing only `<body>`.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            body: NodeId::new(0, 0),
            active: None,
            focus_events: Vec::new(),
            listeners: Listeners::default(),
            pointer_events: Rc::new(RefCell::new(PointerEventsState::default())),
        };
        doc.body = doc.create_element(Element::new(Tag::Body));
        doc
    }

    /// The document root.
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Create a detached element.
    pub fn create_element(&mut self, element: Element) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, element));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId stores 32-bit slot indices."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, element)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId stores 32-bit slot indices."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        NodeId::new(idx, generation)
    }

    /// Append `child` as the last child of `parent`, moving it from any previous parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` under `parent` before `reference`, or last when `reference` is `None`.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), DomError> {
        for id in [parent, child] {
            if !self.is_alive(id) {
                return Err(DomError::StaleNode(id));
            }
        }
        if self.contains(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        if reference == Some(child) {
            return Ok(());
        }
        if let Some(r) = reference
            && self.parent_of(r) != Some(parent)
        {
            return Err(DomError::NotAChild(r));
        }
        self.unlink(child);
        let siblings = &mut self.node_mut(parent).children;
        let pos = reference
            .and_then(|r| siblings.iter().position(|&c| c == r))
            .unwrap_or(siblings.len());
        siblings.insert(pos, child);
        self.node_mut(child).parent = Some(parent);
        Ok(())
    }

    /// Detach `node` (and its subtree) from its parent. The nodes stay alive.
    ///
    /// If the focused element is inside the subtree, the document loses focus
    /// without dispatching focus events, as browsers do for removed elements.
    pub fn detach(&mut self, node: NodeId) {
        if !self.is_alive(node) || node == self.body {
            return;
        }
        if let Some(active) = self.active
            && self.contains(node, active)
        {
            tracing::trace!(?active, "focused element detached");
            self.active = None;
        }
        self.unlink(node);
    }

    /// Destroy `node` and its subtree. Their ids become stale.
    pub fn destroy(&mut self, node: NodeId) {
        if !self.is_alive(node) || node == self.body {
            return;
        }
        self.detach(node);
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            stack.extend(self.node(id).children.iter().copied());
            self.nodes[id.idx()] = None;
            self.free_list.push(id.idx());
        }
    }

    /// Returns true if `id` refers to a live node.
    ///
    /// A `NodeId` is live if its slot exists and its generation matches the
    /// generation currently stored in that slot.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    /// Returns the parent of a node if live, or `None` for detached roots or stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Get the children of a node, or an empty slice if the node is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Element data of a live node.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.node_opt(id).map(|n| &n.element)
    }

    /// Mutable element data of a live node.
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.node_opt_mut(id).map(|n| &mut n.element)
    }

    /// Read a string attribute.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.attribute(name))
    }

    /// Set a string attribute. Returns whether the stored value changed.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> bool {
        self.element_mut(id)
            .is_some_and(|e| e.set_attribute(name, value))
    }

    /// Remove a string attribute. Returns whether it was present.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> bool {
        self.element_mut(id).is_some_and(|e| e.remove_attribute(name))
    }

    /// Set or clear element flags.
    pub fn set_flags(&mut self, id: NodeId, flags: ElementFlags, on: bool) {
        if let Some(e) = self.element_mut(id) {
            e.flags.set(flags, on);
        }
    }

    /// Whether `node` is `ancestor` or one of its descendants (like `Node.contains`).
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        if !self.is_alive(ancestor) || !self.is_alive(node) {
            return false;
        }
        let mut cur = Some(node);
        while let Some(id) = cur {
            if id == ancestor {
                return true;
            }
            cur = self.parent_of(id);
        }
        false
    }

    /// Whether `node` is connected to the document body.
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.contains(self.body, node)
    }

    /// Relative document order of two nodes in the same tree.
    ///
    /// Ancestors precede their descendants. Returns `None` for stale ids or nodes
    /// in different (detached) trees.
    pub fn compare_document_position(&self, a: NodeId, b: NodeId) -> Option<Ordering> {
        let pa = self.ancestry(a)?;
        let pb = self.ancestry(b)?;
        if pa.first() != pb.first() {
            return None;
        }
        for (x, y) in pa.iter().zip(pb.iter()) {
            if x == y {
                continue;
            }
            let parent = self.parent_of(*x)?;
            let siblings = self.children_of(parent);
            let ix = siblings.iter().position(|c| c == x)?;
            let iy = siblings.iter().position(|c| c == y)?;
            return Some(ix.cmp(&iy));
        }
        Some(pa.len().cmp(&pb.len()))
    }

    /// Descendants of `root` in document (pre-)order, excluding `root` itself.
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        let mut stack = Vec::new();
        stack.extend(self.children_of(root).iter().rev().copied());
        Descendants { doc: self, stack }
    }

    /// The focused element, if any.
    pub fn active_element(&self) -> Option<NodeId> {
        self.active.filter(|a| self.is_alive(*a))
    }

    /// Move focus to `node`.
    ///
    /// Ignored for stale, disconnected, or unfocusable nodes. Returns whether `node`
    /// holds focus afterward. A move queues `blur`/`focusout` on the previous
    /// element and `focus`/`focusin` on `node`, each with the other as
    /// `related_target`.
    pub fn focus(&mut self, node: NodeId) -> bool {
        if !self.is_connected(node) {
            return false;
        }
        if !self.element(node).is_some_and(Element::accepts_focus) {
            return false;
        }
        let previous = self.active_element();
        if previous == Some(node) {
            return true;
        }
        if let Some(old) = previous {
            self.focus_events
                .push(FocusEvent::new(FocusEventKind::Blur, old, Some(node)));
            self.focus_events
                .push(FocusEvent::new(FocusEventKind::FocusOut, old, Some(node)));
        }
        self.focus_events
            .push(FocusEvent::new(FocusEventKind::Focus, node, previous));
        self.focus_events
            .push(FocusEvent::new(FocusEventKind::FocusIn, node, previous));
        self.active = Some(node);
        tracing::trace!(?node, ?previous, "focus moved");
        true
    }

    /// Drop focus to the body.
    pub fn blur(&mut self) {
        if let Some(old) = self.active_element() {
            self.focus_events
                .push(FocusEvent::new(FocusEventKind::Blur, old, None));
            self.focus_events
                .push(FocusEvent::new(FocusEventKind::FocusOut, old, None));
        }
        self.active = None;
    }

    /// Drain queued focus events in dispatch order.
    pub fn take_focus_events(&mut self) -> Vec<FocusEvent> {
        core::mem::take(&mut self.focus_events)
    }

    /// Whether focus events are waiting to be drained.
    pub fn has_pending_focus_events(&self) -> bool {
        !self.focus_events.is_empty()
    }

    /// Register a listener.
    pub fn add_listener(&mut self, kind: ListenerKind) -> ListenerId {
        self.listeners.add(kind)
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Whether a listener is still registered.
    pub fn has_listener(&self, id: ListenerId) -> bool {
        self.listeners.contains(id)
    }

    /// Number of live registrations of `kind`.
    pub fn listener_count(&self, kind: ListenerKind) -> usize {
        self.listeners.count(kind)
    }

    /// Number of live registrations of any kind.
    pub fn total_listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Acquire the page-level pointer-events lock.
    pub fn lock_pointer_events(&self) -> PointerEventsLock {
        PointerEventsLock::acquire(&self.pointer_events)
    }

    /// Whether the page currently has `pointer-events: none`.
    pub fn pointer_events_disabled(&self) -> bool {
        self.pointer_events.borrow().disabled
    }

    /// Set the page's own pointer-events value (outside of any lock).
    pub fn set_pointer_events_disabled(&mut self, disabled: bool) {
        self.pointer_events.borrow_mut().disabled = disabled;
    }

    /// Number of outstanding pointer-events locks.
    pub fn pointer_lock_depth(&self) -> usize {
        crate::page::lock_depth(&self.pointer_events)
    }

    /// Resolve the element that receives a pointer event at `hit`.
    ///
    /// While pointer events are disabled, hits outside any
    /// [`ElementFlags::POINTER_EVENTS_AUTO`] subtree land on the body.
    pub fn pointer_target(&self, hit: NodeId) -> NodeId {
        if !self.pointer_events_disabled() {
            return hit;
        }
        let mut cur = Some(hit);
        while let Some(id) = cur {
            if self
                .element(id)
                .is_some_and(|e| e.flags.contains(ElementFlags::POINTER_EVENTS_AUTO))
            {
                return hit;
            }
            cur = self.parent_of(id);
        }
        self.body
    }

    // --- internals ---

    fn ancestry(&self, id: NodeId) -> Option<Vec<NodeId>> {
        if !self.is_alive(id) {
            return None;
        }
        let mut path = vec![id];
        let mut cur = id;
        while let Some(p) = self.parent_of(cur) {
            path.push(p);
            cur = p;
        }
        path.reverse();
        Some(path)
    }

    fn unlink(&mut self, id: NodeId) {
        if let Some(parent) = self.node(id).parent {
            self.node_mut(parent).children.retain(|c| *c != id);
            self.node_mut(id).parent = None;
        }
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    /// Access a node; panics if `id` is stale.
    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    /// Access a node mutably; panics if `id` is stale.
    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }
}

/// Pre-order iterator over a subtree. See [`Document::descendants`].
#[derive(Debug)]
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        // Push children reversed so they come out in document order.
        self.stack
            .extend(self.doc.children_of(id).iter().rev().copied());
        Some(id)
    }
}
