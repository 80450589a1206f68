// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Caller behavior merged onto a widget's parts.

use alloc::vec::Vec;

use veil_compose::{ComposedRefs, HandlerChain, NodeRef};
use veil_dom::{DomEvent, Document, NodeId};

/// Caller handlers per part, and caller refs to the content element.
///
/// Caller handlers on a part run before the widget's own handling of events
/// targeted inside that part. A handler that prevents the default, or stops the
/// chain, keeps the widget from acting on the event. Focus events are
/// notifications and are never vetoed.
#[derive(Debug, Default)]
pub(crate) struct PartBindings {
    handlers: Vec<(NodeId, HandlerChain<DomEvent>)>,
    content_refs: ComposedRefs,
}

impl PartBindings {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_handlers(&mut self, part: NodeId, handlers: HandlerChain<DomEvent>) {
        self.handlers.push((part, handlers));
    }

    pub(crate) fn push_content_ref(&mut self, node_ref: &NodeRef) {
        self.content_refs.push_ref(node_ref);
    }

    pub(crate) fn assign_content(&mut self, node: Option<NodeId>) {
        self.content_refs.assign(node);
    }

    /// Run the caller chains of every part containing the event target, in
    /// registration order. Returns whether the widget should still handle it.
    ///
    /// Only a prevent made by these chains counts; an event that arrives already
    /// prevented is left to the widget's own checks.
    pub(crate) fn run(&mut self, doc: &Document, event: &mut DomEvent) -> bool {
        if matches!(event, DomEvent::Focus(_)) {
            return true;
        }
        let target = event.target();
        let prevented_before = event.is_default_prevented();
        for (part, chain) in &mut self.handlers {
            if !doc.contains(*part, target) {
                continue;
            }
            if let Some(index) = chain.run(event) {
                tracing::trace!(part = ?*part, index, "caller stopped the event");
                return false;
            }
        }
        prevented_before || !event.is_default_prevented()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veil_compose::Outcome;
    use veil_dom::{Cancelable, Element, Key, KeyboardEvent, Tag};

    fn doc_with_part() -> (Document, NodeId, NodeId) {
        let mut doc = Document::new();
        let part = doc.create_element(Element::new(Tag::Div));
        doc.append_child(doc.body(), part).unwrap();
        let inner = doc.create_element(Element::new(Tag::Button));
        doc.append_child(part, inner).unwrap();
        (doc, part, inner)
    }

    #[test]
    fn chains_run_only_for_targets_inside_their_part() {
        let (doc, part, inner) = doc_with_part();
        let mut bindings = PartBindings::new();
        let mut chain = HandlerChain::new();
        chain.push(|e: &mut DomEvent| {
            if let DomEvent::KeyDown(key) = e {
                key.prevent_default();
            }
            Outcome::Continue
        });
        bindings.add_handlers(part, chain);

        let mut inside = DomEvent::KeyDown(KeyboardEvent::new(Key::Enter, inner));
        assert!(!bindings.run(&doc, &mut inside));
        assert!(inside.is_default_prevented());

        let mut outside = DomEvent::KeyDown(KeyboardEvent::new(Key::Enter, doc.body()));
        assert!(bindings.run(&doc, &mut outside));
        assert!(!outside.is_default_prevented());
    }

    #[test]
    fn stop_vetoes_without_preventing() {
        let (doc, part, inner) = doc_with_part();
        let mut bindings = PartBindings::new();
        let mut chain = HandlerChain::new();
        chain.push(|_: &mut DomEvent| Outcome::Stop);
        bindings.add_handlers(part, chain);

        let mut ev = DomEvent::KeyDown(KeyboardEvent::new(Key::Space, inner));
        assert!(!bindings.run(&doc, &mut ev));
        assert!(!ev.is_default_prevented());
    }

    #[test]
    fn events_prevented_upstream_are_not_vetoed() {
        let (doc, part, inner) = doc_with_part();
        let mut bindings = PartBindings::new();
        bindings.add_handlers(part, HandlerChain::new());
        let mut ev = DomEvent::KeyDown(KeyboardEvent::new(Key::Space, inner));
        if let DomEvent::KeyDown(key) = &mut ev {
            key.prevent_default();
        }
        assert!(bindings.run(&doc, &mut ev));
    }

    #[test]
    fn content_refs_follow_assignment() {
        let (_doc, part, _) = doc_with_part();
        let mut bindings = PartBindings::new();
        let mine = NodeRef::new();
        bindings.push_content_ref(&mine);
        bindings.assign_content(Some(part));
        assert_eq!(mine.get(), Some(part));
        bindings.assign_content(None);
        assert_eq!(mine.get(), None);
    }
}
