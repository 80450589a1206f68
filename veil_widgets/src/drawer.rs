// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Modal side panel.

use core::iter;

use veil_compose::{HandlerChain, NodeRef, Slot};
use veil_dismiss::PointerDownOutside;
use veil_dom::{
    Cancelable, DomError, DomEvent, Document, ElementFlags, Key, KeyboardEvent, NodeId,
    PointerEvent,
};
use veil_focus::{FocusTrap, FocusTrapOptions, get_all_focusable, get_first_focusable};

use crate::Widget;
use crate::parts::PartBindings;
use crate::disclosure::{
    ContentOptions, Disclosure, DisclosureTask, DismissHooks, Presence, Transition, bind_trigger,
    is_trigger_activation, return_focus, set_data_open, sync_trigger,
};

/// A modal drawer: trigger, overlay, content, and close button.
///
/// While open the content traps Tab. Escape inside the content, the close button,
/// or a pointer-down outside the content closes it. The outside detector is armed
/// one tick after opening, together with the initial focus move: the close button
/// if there is one, else the first focusable element, else the content itself.
/// After closing, focus returns to the trigger on the next tick.
#[derive(Debug)]
pub struct Drawer {
    disclosure: Disclosure,
    hooks: DismissHooks,
    overlay: Option<Presence>,
    content: Option<Presence>,
    close: NodeRef,
    trap: FocusTrap,
    outside: PointerDownOutside,
    parts: PartBindings,
    unmounted: bool,
}

impl Drawer {
    /// A drawer with the caller's `open` and `default_open` props.
    pub fn new(open: Option<bool>, default_open: Option<bool>) -> Self {
        Self {
            disclosure: Disclosure::new(open, default_open),
            hooks: DismissHooks::new(),
            overlay: None,
            content: None,
            close: NodeRef::new(),
            trap: FocusTrap::new(FocusTrapOptions::default()),
            outside: PointerDownOutside::new(),
            parts: PartBindings::new(),
            unmounted: false,
        }
    }

    /// Set the `on_open_change` callback.
    pub fn with_on_open_change(mut self, on_open_change: impl FnMut(bool) + 'static) -> Self {
        self.disclosure = self.disclosure.with_on_open_change(on_open_change);
        self
    }

    /// Run `handlers` before the drawer's own handling of events inside `part`.
    ///
    /// A handler that prevents the default, or stops the chain, keeps the drawer
    /// from acting on that event.
    pub fn add_part_handlers(&mut self, part: NodeId, handlers: HandlerChain<DomEvent>) {
        self.parts.add_handlers(part, handlers);
    }

    /// Also assign the content element to `node_ref` when it mounts.
    pub fn with_content_ref(mut self, node_ref: &NodeRef) -> Self {
        self.parts.push_content_ref(node_ref);
        self
    }

    /// Set the dismiss and auto-focus hooks.
    pub fn with_hooks(mut self, hooks: DismissHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Whether the drawer is open.
    pub fn is_open(&self) -> bool {
        self.disclosure.is_open()
    }

    /// Whether the caller owns the open state.
    pub fn is_controlled(&self) -> bool {
        self.disclosure.is_controlled()
    }

    /// The trigger element, once mounted.
    pub fn trigger(&self) -> Option<NodeId> {
        self.disclosure.trigger().get()
    }

    /// The content element, once mounted.
    pub fn content(&self) -> Option<NodeId> {
        self.content.map(|c| c.node())
    }

    /// Mount the trigger.
    pub fn mount_trigger(
        &mut self,
        doc: &mut Document,
        parent: NodeId,
        slot: Slot,
    ) -> Result<NodeId, DomError> {
        let node = slot.mount(doc, parent)?;
        bind_trigger(doc, &self.disclosure, node, "dialog");
        Ok(node)
    }

    /// Mount the overlay. It carries `data-open` and is attached while open.
    pub fn mount_overlay(
        &mut self,
        doc: &mut Document,
        parent: NodeId,
        options: ContentOptions,
    ) -> Result<NodeId, DomError> {
        let node = Slot::default().mount(doc, parent)?;
        self.overlay = Some(Presence::new(node, parent, options.force_mount));
        self.sync_parts(doc);
        Ok(node)
    }

    /// Mount the content surface.
    ///
    /// The surface is focusable by script (`tabindex="-1"`) and keeps receiving
    /// pointer events while the page is locked.
    pub fn mount_content(
        &mut self,
        doc: &mut Document,
        parent: NodeId,
        slot: Slot,
        options: ContentOptions,
    ) -> Result<NodeId, DomError> {
        let node = slot.mount(doc, parent)?;
        let parent = doc.parent_of(node).unwrap_or(parent);
        if let Some(element) = doc.element_mut(node) {
            element.tab_index = Some(-1);
        }
        doc.set_flags(node, ElementFlags::POINTER_EVENTS_AUTO, true);
        doc.set_attribute(node, "role", "dialog");
        self.outside.region().set(Some(node));
        self.content = Some(Presence::new(node, parent, options.force_mount));
        self.parts.assign_content(Some(node));
        self.unmounted = false;
        self.sync_parts(doc);
        Ok(node)
    }

    /// Mount the close button, usually inside the content.
    pub fn mount_close(
        &mut self,
        doc: &mut Document,
        parent: NodeId,
        slot: Slot,
    ) -> Result<NodeId, DomError> {
        let node = slot.mount(doc, parent)?;
        self.close.set(Some(node));
        Ok(node)
    }

    /// Request a new open state, as the trigger or a dismissal would.
    ///
    /// Returns whether the request was accepted. A controlled drawer only notifies.
    pub fn set_open(&mut self, doc: &mut Document, open: bool, now: u64) -> bool {
        let accepted = self.disclosure.set_open(open);
        self.reconcile(doc, now);
        accepted
    }

    /// Re-render with the caller's current `open` prop.
    pub fn sync_open(&mut self, doc: &mut Document, open: Option<bool>, now: u64) {
        self.disclosure.sync_open(open);
        self.reconcile(doc, now);
    }

    /// Tear down document registrations and cancel deferred work. Focus is left
    /// where it is.
    ///
    /// The drawer ignores events and ticks until its content is mounted again.
    pub fn unmount(&mut self, doc: &mut Document) {
        self.unmounted = true;
        self.disclosure.cancel_pending();
        self.outside.set_enabled(doc, false);
        self.trap.unmount(doc);
        self.parts.assign_content(None);
    }

    fn reconcile(&mut self, doc: &mut Document, now: u64) -> Option<Transition> {
        let transition = self.disclosure.reconcile(now);
        if transition == Some(Transition::Closed) {
            self.outside.set_enabled(doc, false);
            self.trap.unmount(doc);
        }
        self.sync_parts(doc);
        transition
    }

    fn sync_parts(&mut self, doc: &mut Document) {
        let open = self.disclosure.is_open();
        sync_trigger(doc, &self.disclosure);
        for part in [self.overlay, self.content].into_iter().flatten() {
            part.sync(doc, open);
            set_data_open(doc, part.node(), open);
        }
        if open && !self.unmounted {
            let content = self.content();
            self.trap.mount(doc);
            self.trap.set_anchor(doc, content);
        }
    }

    fn close(&mut self) {
        self.disclosure.set_open(false);
    }

    fn handle_key_down(&mut self, doc: &mut Document, event: &mut KeyboardEvent) {
        if !event.is_default_prevented() {
            self.trap.handle_key_down(doc, event);
        }
        if event.key != Key::Escape || event.is_default_prevented() || !self.is_open() {
            return;
        }
        let inside = self
            .content()
            .is_some_and(|content| doc.contains(content, event.target));
        if inside {
            self.hooks.escape_key_down(event);
            if !event.is_default_prevented() {
                self.close();
            }
        }
    }

    fn handle_pointer_down(&mut self, doc: &Document, event: &mut PointerEvent) {
        let hooks = &mut self.hooks;
        let outside = self
            .outside
            .handle_pointer_down(doc, event, |e| hooks.pointer_down_outside(e));
        if outside && !event.is_default_prevented() {
            self.close();
        }
    }

    fn focus_content(&self, doc: &mut Document) {
        let content = self.content();
        let focusable = get_all_focusable(doc, content);
        let candidates = iter::once(self.close.get())
            .chain(focusable.into_iter().map(Some))
            .chain(iter::once(content));
        let focused = get_first_focusable(doc, candidates);
        tracing::trace!(?focused, "drawer initial focus");
    }
}

impl Widget for Drawer {
    fn handle_event(&mut self, doc: &mut Document, event: &mut DomEvent, now: u64) {
        if self.unmounted {
            return;
        }
        if !self.parts.run(doc, event) {
            self.reconcile(doc, now);
            return;
        }
        if is_trigger_activation(doc, self.trigger(), event) {
            self.disclosure.set_open(true);
        } else {
            match event {
                DomEvent::KeyDown(key) => self.handle_key_down(doc, key),
                DomEvent::PointerDown(pointer) => self.handle_pointer_down(doc, pointer),
                DomEvent::Click(pointer) => {
                    let on_close = self
                        .close
                        .get()
                        .is_some_and(|close| doc.contains(close, pointer.target));
                    if on_close && !pointer.is_default_prevented() {
                        self.close();
                    }
                }
                DomEvent::Focus(focus) => self.trap.handle_focus_event(doc, focus, now),
                DomEvent::MouseEnter(_) => {}
            }
        }
        self.reconcile(doc, now);
    }

    fn tick(&mut self, doc: &mut Document, now: u64) {
        if self.unmounted {
            return;
        }
        self.trap.tick(doc, now);
        if self.reconcile(doc, now).is_some() {
            return;
        }
        for task in self.disclosure.run_due(now) {
            match task {
                DisclosureTask::OpenAutoFocus => {
                    if self.hooks.open_auto_focus() {
                        self.focus_content(doc);
                    }
                }
                DisclosureTask::CloseAutoFocus => {
                    if self.hooks.close_auto_focus() {
                        return_focus(doc, self.trigger());
                    }
                }
                DisclosureTask::ArmOutside => {
                    let open = self.is_open();
                    self.outside.set_enabled(doc, open);
                }
            }
        }
    }

    fn next_due(&self) -> Option<u64> {
        self.disclosure.next_due()
    }
}
