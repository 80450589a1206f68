// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus trapping: keep Tab traversal inside a region.

use smallvec::SmallVec;
use veil_dom::{
    Cancelable, DomEvent, Document, FocusEvent, FocusEventKind, Key, KeyboardEvent, ListenerId,
    ListenerKind, NodeId,
};
use veil_event_state::deferred::TaskQueue;

use crate::focusable::{get_all_focusable, is_focused_outside};

/// Scope a Tab keydown to `anchor`.
///
/// - With no focusable candidates, the event is default-prevented and focus stays
///   where it is.
/// - When focus is on the boundary candidate for the direction (last for Tab,
///   first for Shift+Tab) or on `anchor` itself, the event is default-prevented and
///   focus wraps to the opposite boundary.
/// - Otherwise the event is left alone so native traversal proceeds.
///
/// Non-Tab keys are ignored. Returns whether the event was default-prevented.
pub fn trap_tab(doc: &mut Document, anchor: NodeId, event: &mut KeyboardEvent) -> bool {
    if event.key != Key::Tab {
        return false;
    }
    let focusable = get_all_focusable(doc, Some(anchor));
    let (Some(&first), Some(&last)) = (focusable.first(), focusable.last()) else {
        event.prevent_default();
        return true;
    };
    let backward = event.shift();
    let boundary = if backward { first } else { last };
    let active = doc.active_element();
    if active != Some(boundary) && active != Some(anchor) {
        return false;
    }
    event.prevent_default();
    let target = if backward { last } else { first };
    tracing::debug!(?anchor, ?target, backward, "focus trap wrapped");
    doc.focus(target);
    true
}

/// Options of a [`FocusTrap`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FocusTrapOptions {
    /// When focus enters the anchor itself from outside, move it to the first
    /// focusable descendant.
    pub auto_focus: bool,
    /// When the trap is unbound, return focus to the element focused before focus
    /// entered the anchor.
    pub restore_focus: bool,
}

impl FocusTrapOptions {
    /// Both behaviors enabled.
    pub const ALL: Self = Self {
        auto_focus: true,
        restore_focus: true,
    };
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct DeferredFocus(NodeId);

/// A focus trap bound to an anchor element.
///
/// Lifecycle:
/// - [`mount`](Self::mount) registers the document-level keydown listener once.
/// - [`set_anchor`](Self::set_anchor) and [`set_options`](Self::set_options) tear
///   down the anchor subscriptions exactly once and set up new ones, only when the
///   anchor or options actually change.
/// - [`unmount`](Self::unmount) removes everything and restores focus if asked to.
///
/// Restoring happens when the anchor is unbound and focus is either inside the
/// anchor or nowhere; focus the user already moved elsewhere is left alone.
#[derive(Debug)]
pub struct FocusTrap {
    anchor: Option<NodeId>,
    options: FocusTrapOptions,
    key_listener: Option<ListenerId>,
    subscriptions: SmallVec<[ListenerId; 3]>,
    restore_to: Option<NodeId>,
    tasks: TaskQueue<DeferredFocus>,
}

impl FocusTrap {
    /// An unmounted trap.
    pub fn new(options: FocusTrapOptions) -> Self {
        Self {
            anchor: None,
            options,
            key_listener: None,
            subscriptions: SmallVec::new(),
            restore_to: None,
            tasks: TaskQueue::new(),
        }
    }

    /// Current anchor.
    pub fn anchor(&self) -> Option<NodeId> {
        self.anchor
    }

    /// Current options.
    pub fn options(&self) -> FocusTrapOptions {
        self.options
    }

    /// Whether the document-level keydown listener is registered.
    pub fn is_mounted(&self) -> bool {
        self.key_listener.is_some()
    }

    /// The element focus will be restored to, if recorded.
    pub fn restore_target(&self) -> Option<NodeId> {
        self.restore_to
    }

    /// Register the keydown listener. Idempotent.
    pub fn mount(&mut self, doc: &mut Document) {
        if self.key_listener.is_none() {
            self.key_listener = Some(doc.add_listener(ListenerKind::KeyDown));
        }
    }

    /// Remove every listener, cancel pending focus moves, and unbind the anchor.
    pub fn unmount(&mut self, doc: &mut Document) {
        if let Some(id) = self.key_listener.take() {
            doc.remove_listener(id);
        }
        self.set_anchor(doc, None);
    }

    /// Bind the trap to `anchor` (or unbind it with `None`).
    ///
    /// Rebinding to the current anchor is a no-op.
    pub fn set_anchor(&mut self, doc: &mut Document, anchor: Option<NodeId>) {
        if anchor == self.anchor {
            return;
        }
        self.teardown(doc);
        self.restore(doc);
        self.anchor = anchor;
        self.setup(doc);
    }

    /// Change options, re-subscribing only if they differ.
    pub fn set_options(&mut self, doc: &mut Document, options: FocusTrapOptions) {
        if options == self.options {
            return;
        }
        self.teardown(doc);
        self.options = options;
        self.setup(doc);
    }

    /// Route a host event to the trap.
    pub fn handle_event(&mut self, doc: &mut Document, event: &mut DomEvent, now: u64) {
        match event {
            DomEvent::KeyDown(key) => {
                self.handle_key_down(doc, key);
            }
            DomEvent::Focus(focus) => self.handle_focus_event(doc, focus, now),
            _ => {}
        }
    }

    /// Handle a document keydown. Returns whether the trap prevented it.
    pub fn handle_key_down(&mut self, doc: &mut Document, event: &mut KeyboardEvent) -> bool {
        if !self.key_listener.is_some_and(|id| doc.has_listener(id)) {
            return false;
        }
        let Some(anchor) = self.anchor else {
            return false;
        };
        if event.key != Key::Tab {
            return false;
        }
        let focus_within = doc
            .active_element()
            .is_some_and(|active| doc.contains(anchor, active));
        if !focus_within {
            return false;
        }
        trap_tab(doc, anchor, event)
    }

    /// Handle a focus event targeted at the anchor.
    pub fn handle_focus_event(&mut self, doc: &mut Document, event: &FocusEvent, now: u64) {
        let Some(anchor) = self.anchor else {
            return;
        };
        if event.kind != FocusEventKind::Focus || event.target != anchor {
            return;
        }
        if !is_focused_outside(doc, anchor, event.related_target) {
            return;
        }
        if self.options.restore_focus && self.subscribed(doc) {
            self.restore_to = event.related_target;
        }
        if self.options.auto_focus
            && self.subscribed(doc)
            && let Some(&first) = get_all_focusable(doc, Some(anchor)).first()
        {
            self.tasks.defer(DeferredFocus(first), now);
        }
    }

    /// Run deferred focus moves that are due.
    pub fn tick(&mut self, doc: &mut Document, now: u64) {
        for DeferredFocus(node) in self.tasks.run_due(now) {
            let inside = self.anchor.is_some_and(|anchor| doc.contains(anchor, node));
            if inside {
                doc.focus(node);
            }
        }
    }

    /// Whether deferred work is pending.
    pub fn has_pending(&self) -> bool {
        !self.tasks.is_empty()
    }

    fn subscribed(&self, doc: &Document) -> bool {
        !self.subscriptions.is_empty() && self.subscriptions.iter().all(|id| doc.has_listener(*id))
    }

    fn setup(&mut self, doc: &mut Document) {
        let Some(anchor) = self.anchor else {
            return;
        };
        if self.options.restore_focus {
            self.subscriptions
                .push(doc.add_listener(ListenerKind::Focus(anchor)));
            self.subscriptions
                .push(doc.add_listener(ListenerKind::FocusOut(anchor)));
        }
        if self.options.auto_focus {
            self.subscriptions
                .push(doc.add_listener(ListenerKind::Focus(anchor)));
        }
        tracing::trace!(?anchor, count = self.subscriptions.len(), "focus trap bound");
    }

    fn teardown(&mut self, doc: &mut Document) {
        for id in self.subscriptions.drain(..) {
            doc.remove_listener(id);
        }
        self.tasks.clear();
    }

    fn restore(&mut self, doc: &mut Document) {
        let Some(anchor) = self.anchor else {
            return;
        };
        let Some(target) = self.restore_to.take() else {
            return;
        };
        if !self.options.restore_focus {
            return;
        }
        let focus_lost = doc
            .active_element()
            .is_none_or(|active| doc.contains(anchor, active));
        if focus_lost {
            tracing::debug!(?anchor, ?target, "restoring focus");
            doc.focus(target);
        }
    }
}
