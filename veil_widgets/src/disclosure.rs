// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Open/close lifecycle shared by the disclosure widgets.

use alloc::boxed::Box;

use smallvec::SmallVec;
use veil_compose::{Handler, NodeRef};
use veil_dom::{
    Cancelable, DomEvent, Document, FocusEvent, Key, KeyboardEvent, NodeId, PointerEvent,
};
use veil_event_state::controllable::ControllableState;
use veil_event_state::deferred::TaskQueue;

/// Work a disclosure defers to the tick after a transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DisclosureTask {
    /// Move focus into the freshly opened content.
    OpenAutoFocus,
    /// Return focus to the trigger after closing.
    CloseAutoFocus,
    /// Start listening for outside interactions. Deferred so the gesture that
    /// opened the surface is not read as an outside one.
    ArmOutside,
}

/// An observed change of the open state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// `closed -> open`
    Opened,
    /// `open -> closed`
    Closed,
}

/// Open state, trigger handle, and deferred focus work of one disclosure root.
///
/// Requests go through [`set_open`](Self::set_open); the owning widget then calls
/// [`reconcile`](Self::reconcile), which compares the observed state with the last
/// reconciled one. In controlled mode a request only notifies the caller, so
/// nothing transitions until the caller syncs a new value in.
#[derive(Debug)]
pub struct Disclosure {
    open: ControllableState<bool>,
    trigger: NodeRef,
    was_open: bool,
    tasks: TaskQueue<DisclosureTask>,
}

impl Disclosure {
    /// A root with the caller's `open` and `default_open` props.
    ///
    /// The first reconcile after construction reports `Opened` if the root starts
    /// open.
    pub fn new(open: Option<bool>, default_open: Option<bool>) -> Self {
        Self {
            open: ControllableState::new(open, Some(default_open.unwrap_or(false))),
            trigger: NodeRef::new(),
            was_open: false,
            tasks: TaskQueue::new(),
        }
    }

    /// Set the `on_open_change` callback.
    pub fn with_on_open_change(mut self, mut on_open_change: impl FnMut(bool) + 'static) -> Self {
        self.open
            .set_on_change(Some(Box::new(move |open: &bool| on_open_change(*open))));
        self
    }

    /// Whether the root is open.
    pub fn is_open(&self) -> bool {
        self.open.get().copied().unwrap_or(false)
    }

    /// Whether the caller owns the open state.
    pub fn is_controlled(&self) -> bool {
        self.open.is_controlled()
    }

    /// Request a new open state. Returns whether it was an accepted transition.
    pub fn set_open(&mut self, open: bool) -> bool {
        self.open.set(open)
    }

    /// Re-render with the caller's current `open` prop.
    pub fn sync_open(&mut self, open: Option<bool>) {
        self.open.sync(open);
    }

    /// The trigger ref.
    pub fn trigger(&self) -> &NodeRef {
        &self.trigger
    }

    /// Observe the open state and schedule the deferred work of a transition.
    ///
    /// Work left over from the previous transition is canceled.
    pub fn reconcile(&mut self, now: u64) -> Option<Transition> {
        let open = self.is_open();
        if open == self.was_open {
            return None;
        }
        self.was_open = open;
        self.tasks.clear();
        if open {
            self.tasks.defer(DisclosureTask::OpenAutoFocus, now);
            self.tasks.defer(DisclosureTask::ArmOutside, now);
            tracing::debug!(trigger = ?self.trigger.get(), "disclosure opened");
            Some(Transition::Opened)
        } else {
            self.tasks.defer(DisclosureTask::CloseAutoFocus, now);
            tracing::debug!(trigger = ?self.trigger.get(), "disclosure closed");
            Some(Transition::Closed)
        }
    }

    /// Take the deferred work due at `now`.
    pub fn run_due(&mut self, now: u64) -> SmallVec<[DisclosureTask; 4]> {
        self.tasks.run_due(now)
    }

    /// When deferred work is next due.
    pub fn next_due(&self) -> Option<u64> {
        self.tasks.next_due()
    }

    /// Drop all deferred work, for teardown.
    pub fn cancel_pending(&mut self) {
        if !self.tasks.is_empty() {
            tracing::trace!(pending = self.tasks.len(), "disclosure work canceled");
        }
        self.tasks.clear();
    }
}

/// Keeps a part attached to its parent while visible and detached otherwise.
///
/// With `force_mount` the part stays attached while hidden, for exit animations.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Presence {
    node: NodeId,
    parent: NodeId,
    force_mount: bool,
}

impl Presence {
    /// Track `node` under `parent`.
    pub fn new(node: NodeId, parent: NodeId, force_mount: bool) -> Self {
        Self {
            node,
            parent,
            force_mount,
        }
    }

    /// The tracked node.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Whether the node is attached to its parent.
    pub fn is_mounted(&self, doc: &Document) -> bool {
        doc.parent_of(self.node) == Some(self.parent)
    }

    /// Attach or detach for `visible`. Returns whether the node is attached afterward.
    pub fn sync(&self, doc: &mut Document, visible: bool) -> bool {
        let wanted = visible || self.force_mount;
        let mounted = self.is_mounted(doc);
        if wanted && !mounted {
            if let Err(err) = doc.append_child(self.parent, self.node) {
                tracing::trace!(%err, node = ?self.node, "part not mounted");
            }
        } else if !wanted && mounted {
            doc.detach(self.node);
        }
        self.is_mounted(doc)
    }
}

/// Whether `event` activates a trigger: Space/Enter keydown or a pointer-down on it.
///
/// A pointer-down is default-prevented so the trigger does not take focus away
/// from the surface it opens.
pub(crate) fn is_trigger_activation(
    doc: &Document,
    trigger: Option<NodeId>,
    event: &mut DomEvent,
) -> bool {
    let Some(trigger) = trigger else {
        return false;
    };
    if event.is_default_prevented() || !doc.contains(trigger, event.target()) {
        return false;
    }
    match event {
        DomEvent::KeyDown(key) => matches!(key.key, Key::Space | Key::Enter),
        DomEvent::PointerDown(pointer) => {
            pointer.prevent_default();
            true
        }
        _ => false,
    }
}

/// Mark `node` as the trigger of a `popup` surface.
pub(crate) fn bind_trigger(doc: &mut Document, disclosure: &Disclosure, node: NodeId, popup: &str) {
    disclosure.trigger().set(Some(node));
    doc.set_attribute(node, "aria-haspopup", popup);
    sync_trigger(doc, disclosure);
}

pub(crate) fn sync_trigger(doc: &mut Document, disclosure: &Disclosure) {
    if let Some(trigger) = disclosure.trigger().get() {
        let open = disclosure.is_open();
        doc.set_attribute(trigger, "aria-expanded", bool_str(open));
        set_data_open(doc, trigger, open);
    }
}

/// Return focus to the trigger after a close.
pub(crate) fn return_focus(doc: &mut Document, trigger: Option<NodeId>) {
    if let Some(trigger) = trigger {
        doc.focus(trigger);
    }
}

pub(crate) fn set_data_open(doc: &mut Document, node: NodeId, open: bool) {
    doc.set_attribute(node, "data-open", bool_str(open));
}

pub(crate) fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Payload of the auto-focus hooks. Prevent it to skip the focus move.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AutoFocusEvent {
    default_prevented: bool,
}

impl AutoFocusEvent {
    /// A fresh, unprevented event.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Cancelable for AutoFocusEvent {
    fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Cancelable callbacks a disclosure consults before its default actions.
///
/// Each hook receives the event that is about to cause a default action (closing,
/// or moving focus). Calling `prevent_default` on it skips that action.
#[derive(Default)]
pub struct DismissHooks {
    on_escape_key_down: Option<Handler<KeyboardEvent>>,
    on_pointer_down_outside: Option<Handler<PointerEvent>>,
    on_blur_outside: Option<Handler<FocusEvent>>,
    on_open_auto_focus: Option<Handler<AutoFocusEvent>>,
    on_close_auto_focus: Option<Handler<AutoFocusEvent>>,
}

impl core::fmt::Debug for DismissHooks {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DismissHooks")
            .field("on_escape_key_down", &self.on_escape_key_down.is_some())
            .field("on_pointer_down_outside", &self.on_pointer_down_outside.is_some())
            .field("on_blur_outside", &self.on_blur_outside.is_some())
            .field("on_open_auto_focus", &self.on_open_auto_focus.is_some())
            .field("on_close_auto_focus", &self.on_close_auto_focus.is_some())
            .finish()
    }
}

impl DismissHooks {
    /// No hooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Called on Escape inside open content.
    pub fn with_on_escape_key_down(mut self, hook: impl FnMut(&mut KeyboardEvent) + 'static) -> Self {
        self.on_escape_key_down = Some(Box::new(hook));
        self
    }

    /// Called on a pointer-down outside open content.
    pub fn with_on_pointer_down_outside(
        mut self,
        hook: impl FnMut(&mut PointerEvent) + 'static,
    ) -> Self {
        self.on_pointer_down_outside = Some(Box::new(hook));
        self
    }

    /// Called when focus leaves open content.
    pub fn with_on_blur_outside(mut self, hook: impl FnMut(&mut FocusEvent) + 'static) -> Self {
        self.on_blur_outside = Some(Box::new(hook));
        self
    }

    /// Called before focus moves into freshly opened content.
    pub fn with_on_open_auto_focus(mut self, hook: impl FnMut(&mut AutoFocusEvent) + 'static) -> Self {
        self.on_open_auto_focus = Some(Box::new(hook));
        self
    }

    /// Called before focus returns to the trigger after closing.
    pub fn with_on_close_auto_focus(
        mut self,
        hook: impl FnMut(&mut AutoFocusEvent) + 'static,
    ) -> Self {
        self.on_close_auto_focus = Some(Box::new(hook));
        self
    }

    pub(crate) fn escape_key_down(&mut self, event: &mut KeyboardEvent) {
        if let Some(hook) = self.on_escape_key_down.as_mut() {
            hook(event);
        }
    }

    pub(crate) fn pointer_down_outside(&mut self, event: &mut PointerEvent) {
        if let Some(hook) = self.on_pointer_down_outside.as_mut() {
            hook(event);
        }
    }

    pub(crate) fn blur_outside(&mut self, event: &mut FocusEvent) {
        if let Some(hook) = self.on_blur_outside.as_mut() {
            hook(event);
        }
    }

    /// Run the open auto-focus hook. Returns whether focus should move.
    pub(crate) fn open_auto_focus(&mut self) -> bool {
        let mut event = AutoFocusEvent::new();
        if let Some(hook) = self.on_open_auto_focus.as_mut() {
            hook(&mut event);
        }
        !event.is_default_prevented()
    }

    /// Run the close auto-focus hook. Returns whether focus should move.
    pub(crate) fn close_auto_focus(&mut self) -> bool {
        let mut event = AutoFocusEvent::new();
        if let Some(hook) = self.on_close_auto_focus.as_mut() {
            hook(&mut event);
        }
        !event.is_default_prevented()
    }
}

/// Options of a content part.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ContentOptions {
    /// Keep the part attached while closed.
    pub force_mount: bool,
}

impl ContentOptions {
    /// Keep the part attached while closed.
    pub fn force_mount() -> Self {
        Self { force_mount: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use veil_dom::{Element, Tag};

    #[test]
    fn transitions_schedule_focus_work_for_the_next_tick() {
        let mut d = Disclosure::new(None, None);
        assert_eq!(d.reconcile(0), None);
        assert!(d.set_open(true));
        assert_eq!(d.reconcile(5), Some(Transition::Opened));
        assert_eq!(d.next_due(), Some(5));
        assert_eq!(
            d.run_due(5).as_slice(),
            [DisclosureTask::OpenAutoFocus, DisclosureTask::ArmOutside]
        );

        assert!(d.set_open(false));
        assert_eq!(d.reconcile(9), Some(Transition::Closed));
        assert_eq!(d.run_due(9).as_slice(), [DisclosureTask::CloseAutoFocus]);
    }

    #[test]
    fn quick_toggle_cancels_stale_work() {
        let mut d = Disclosure::new(None, None);
        d.set_open(true);
        d.reconcile(0);
        d.set_open(false);
        d.reconcile(0);
        assert_eq!(d.run_due(1).as_slice(), [DisclosureTask::CloseAutoFocus]);
    }

    #[test]
    fn controlled_requests_only_notify() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let mut d =
            Disclosure::new(Some(false), None).with_on_open_change(move |open| log.borrow_mut().push(open));
        assert!(d.set_open(true));
        assert_eq!(d.reconcile(0), None);
        assert!(!d.is_open());

        d.sync_open(Some(true));
        assert_eq!(d.reconcile(0), Some(Transition::Opened));
        assert!(!d.set_open(true));
        assert_eq!(*seen.borrow(), [true]);
    }

    #[test]
    fn closing_an_uncontrolled_closed_root_is_silent() {
        let calls = Rc::new(RefCell::new(0));
        let count = Rc::clone(&calls);
        let mut d = Disclosure::new(None, None).with_on_open_change(move |_| *count.borrow_mut() += 1);
        assert!(!d.set_open(false));
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn presence_follows_visibility_unless_forced() {
        let mut doc = Document::new();
        let body = doc.body();
        let node = doc.create_element(Element::new(Tag::Div));
        let shown = Presence::new(node, body, false);
        assert!(shown.sync(&mut doc, true));
        assert!(shown.sync(&mut doc, true));
        assert_eq!(doc.children_of(body).len(), 1);
        assert!(!shown.sync(&mut doc, false));
        assert!(doc.is_alive(node));

        let forced = Presence::new(node, body, true);
        assert!(forced.sync(&mut doc, false));
    }

    #[test]
    fn hooks_can_cancel_auto_focus() {
        let mut hooks = DismissHooks::new().with_on_close_auto_focus(|e| e.prevent_default());
        assert!(hooks.open_auto_focus());
        assert!(!hooks.close_auto_focus());
    }

    #[test]
    fn trigger_activation_keys_and_pointer() {
        let mut doc = Document::new();
        let trigger = doc.create_element(Element::new(Tag::Button));
        doc.append_child(doc.body(), trigger).unwrap();
        let other = doc.create_element(Element::new(Tag::Button));
        doc.append_child(doc.body(), other).unwrap();

        let mut enter = DomEvent::KeyDown(KeyboardEvent::new(Key::Enter, trigger));
        assert!(is_trigger_activation(&doc, Some(trigger), &mut enter));
        let mut letter = DomEvent::KeyDown(KeyboardEvent::new(Key::Character('x'), trigger));
        assert!(!is_trigger_activation(&doc, Some(trigger), &mut letter));

        let mut down = DomEvent::PointerDown(PointerEvent::new(trigger));
        assert!(is_trigger_activation(&doc, Some(trigger), &mut down));
        assert!(down.is_default_prevented());
        let mut elsewhere = DomEvent::PointerDown(PointerEvent::new(other));
        assert!(!is_trigger_activation(&doc, Some(trigger), &mut elsewhere));
        assert!(!is_trigger_activation(&doc, None, &mut elsewhere));
    }

    #[test]
    fn return_focus_takes_focus_back_from_anywhere() {
        let mut doc = Document::new();
        let trigger = doc.create_element(Element::new(Tag::Button));
        doc.append_child(doc.body(), trigger).unwrap();
        let other = doc.create_element(Element::new(Tag::Input));
        doc.append_child(doc.body(), other).unwrap();

        doc.focus(other);
        return_focus(&mut doc, Some(trigger));
        assert_eq!(doc.active_element(), Some(trigger));

        doc.blur();
        return_focus(&mut doc, Some(trigger));
        assert_eq!(doc.active_element(), Some(trigger));

        return_focus(&mut doc, None);
        assert_eq!(doc.active_element(), Some(trigger));
    }

    #[test]
    fn cancel_pending_drops_scheduled_work() {
        let mut d = Disclosure::new(None, None);
        d.set_open(true);
        assert_eq!(d.reconcile(0), Some(Transition::Opened));
        assert_eq!(d.next_due(), Some(0));

        d.cancel_pending();
        assert_eq!(d.next_due(), None);
        assert!(d.run_due(10).is_empty());
        assert!(d.is_open());
    }
}
