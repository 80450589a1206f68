// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus-within tracking.

use veil_compose::NodeRef;
use veil_dom::{Document, FocusEvent, FocusEventKind, ListenerId, ListenerKind, NodeId};

/// A transition reported by [`FocusWithin::handle_focus_event`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FocusWithinChange {
    /// Focus moved into the region from outside.
    Entered,
    /// Focus left the region.
    Left,
}

/// Tracks whether focus is inside a region, from bubbling focus events.
///
/// Moves between descendants of the region report nothing; only entering and
/// leaving are reported, once each.
#[derive(Debug, Default)]
pub struct FocusWithin {
    region: NodeRef,
    focused: bool,
    listeners: Option<(ListenerId, ListenerId)>,
}

impl FocusWithin {
    /// An unbound tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// The region ref.
    pub fn region(&self) -> &NodeRef {
        &self.region
    }

    /// Whether focus is currently inside the region.
    pub fn is_focus_within(&self) -> bool {
        self.focused
    }

    /// Bind to `region`, replacing any previous binding.
    pub fn bind(&mut self, doc: &mut Document, region: Option<NodeId>) {
        if region == self.region.get() && (region.is_none() || self.listeners.is_some()) {
            return;
        }
        self.unbind(doc);
        self.region.set(region);
        if let Some(node) = region {
            self.listeners = Some((
                doc.add_listener(ListenerKind::FocusIn(node)),
                doc.add_listener(ListenerKind::FocusOut(node)),
            ));
            self.focused = doc
                .active_element()
                .is_some_and(|active| doc.contains(node, active));
        }
    }

    /// Drop the binding and its listeners.
    pub fn unbind(&mut self, doc: &mut Document) {
        if let Some((focus_in, focus_out)) = self.listeners.take() {
            doc.remove_listener(focus_in);
            doc.remove_listener(focus_out);
        }
        self.region.set(None);
        self.focused = false;
    }

    /// Feed a focus event. Returns the transition it caused, if any.
    pub fn handle_focus_event(
        &mut self,
        doc: &Document,
        event: &FocusEvent,
    ) -> Option<FocusWithinChange> {
        let (focus_in, focus_out) = self.listeners?;
        let region = self.region.get()?;
        if !doc.contains(region, event.target) {
            return None;
        }
        match event.kind {
            FocusEventKind::FocusIn if !self.focused && doc.has_listener(focus_in) => {
                self.focused = true;
                Some(FocusWithinChange::Entered)
            }
            FocusEventKind::FocusOut if self.focused && doc.has_listener(focus_out) => {
                let stays_inside = event
                    .related_target
                    .is_some_and(|related| doc.contains(region, related));
                if stays_inside {
                    return None;
                }
                self.focused = false;
                Some(FocusWithinChange::Left)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use veil_dom::{Element, Tag};

    #[test]
    fn reports_enter_and_leave_once() {
        let mut doc = Document::new();
        let body = doc.body();
        let region = doc.create_element(Element::new(Tag::Div));
        doc.append_child(body, region).unwrap();
        let a = doc.create_element(Element::new(Tag::Button));
        let b = doc.create_element(Element::new(Tag::Button));
        doc.append_child(region, a).unwrap();
        doc.append_child(region, b).unwrap();
        let outside = doc.create_element(Element::new(Tag::Button));
        doc.append_child(body, outside).unwrap();

        let mut within = FocusWithin::new();
        within.bind(&mut doc, Some(region));

        let mut changes = Vec::new();
        for target in [a, b, outside, a] {
            doc.focus(target);
            for ev in doc.take_focus_events() {
                changes.extend(within.handle_focus_event(&doc, &ev));
            }
        }
        assert_eq!(
            changes,
            [
                FocusWithinChange::Entered,
                FocusWithinChange::Left,
                FocusWithinChange::Entered
            ]
        );
        assert!(within.is_focus_within());

        within.unbind(&mut doc);
        assert_eq!(doc.total_listener_count(), 0);
        doc.blur();
        for ev in doc.take_focus_events() {
            assert_eq!(within.handle_focus_event(&doc, &ev), None);
        }
    }

    #[test]
    fn bind_picks_up_existing_focus() {
        let mut doc = Document::new();
        let body = doc.body();
        let region = doc.create_element(Element::new(Tag::Div));
        doc.append_child(body, region).unwrap();
        let input = doc.create_element(Element::new(Tag::Input));
        doc.append_child(region, input).unwrap();
        doc.focus(input);

        let mut within = FocusWithin::new();
        within.bind(&mut doc, Some(region));
        within.bind(&mut doc, Some(region));
        assert!(within.is_focus_within());
        assert_eq!(doc.total_listener_count(), 2);
    }
}
