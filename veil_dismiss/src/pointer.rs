// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer-down-outside detection.

use veil_compose::NodeRef;
use veil_dom::{Document, ListenerId, ListenerKind, PointerEvent, PointerEventsLock};

/// Reports pointer-downs that land outside a region.
///
/// While enabled the detector holds one document-level `pointerdown`
/// registration and, unless built with
/// [`with_pointer_events_lock(false)`](Self::with_pointer_events_lock), a page
/// pointer-events lock so the rest of the page ignores the gesture. Disabling
/// removes both. Dropping an enabled detector releases the lock but leaves the
/// registration behind, so owners disable it on teardown.
#[derive(Debug)]
pub struct PointerDownOutside {
    region: NodeRef,
    listener: Option<ListenerId>,
    lock: Option<PointerEventsLock>,
    lock_pointer_events: bool,
}

impl Default for PointerDownOutside {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerDownOutside {
    /// A disabled detector with no region.
    pub fn new() -> Self {
        Self {
            region: NodeRef::new(),
            listener: None,
            lock: None,
            lock_pointer_events: true,
        }
    }

    /// Whether enabling also takes the page pointer-events lock. Defaults to `true`.
    pub fn with_pointer_events_lock(mut self, lock: bool) -> Self {
        self.lock_pointer_events = lock;
        self
    }

    /// The region ref. Assign the surface element to it.
    pub fn region(&self) -> &NodeRef {
        &self.region
    }

    /// Whether the detector is listening.
    pub fn is_enabled(&self) -> bool {
        self.listener.is_some()
    }

    /// Enable or disable the detector.
    ///
    /// Only an actual transition touches the document, so calling this on every
    /// update with an unchanged flag never re-registers.
    pub fn set_enabled(&mut self, doc: &mut Document, enabled: bool) {
        if enabled == self.is_enabled() {
            return;
        }
        if enabled {
            self.listener = Some(doc.add_listener(ListenerKind::PointerDown));
            if self.lock_pointer_events {
                self.lock = Some(doc.lock_pointer_events());
            }
        } else {
            if let Some(id) = self.listener.take() {
                doc.remove_listener(id);
            }
            self.lock = None;
        }
        tracing::debug!(enabled, region = ?self.region.get(), "pointer-down-outside toggled");
    }

    /// Feed a document `pointerdown`.
    ///
    /// If the detector is live and `event` landed outside the region, runs
    /// `on_outside` with the event and returns `true`. The caller checks
    /// [`is_default_prevented`](veil_dom::Cancelable::is_default_prevented)
    /// afterward to see whether the callback canceled the dismissal.
    pub fn handle_pointer_down(
        &self,
        doc: &Document,
        event: &mut PointerEvent,
        on_outside: impl FnOnce(&mut PointerEvent),
    ) -> bool {
        // A registration removed while this event was in flight must not act.
        if !self.listener.is_some_and(|id| doc.has_listener(id)) {
            return false;
        }
        let Some(region) = self.region.get().filter(|r| doc.is_alive(*r)) else {
            return false;
        };
        if doc.contains(region, event.target) {
            return false;
        }
        tracing::trace!(?region, target = ?event.target, "pointer-down outside");
        on_outside(event);
        true
    }
}
