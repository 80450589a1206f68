// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Multi-selection dropdown: listbox behavior inside a disclosure.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Rect, Size};
use veil_collection::ItemData;
use veil_compose::{HandlerChain, NodeRef, Slot};
use veil_dismiss::PointerDownOutside;
use veil_dom::{
    Cancelable, DomError, DomEvent, Document, ElementFlags, Key, KeyboardEvent, NodeId, Tag,
};
use veil_focus::get_first_focusable;
use veil_position::{FlipSolver, FloatingRequest, Position, PositionSolver};

use crate::Widget;
use crate::disclosure::{
    ContentOptions, Disclosure, DisclosureTask, DismissHooks, Presence, Transition, bind_trigger,
    bool_str, is_trigger_activation, return_focus, set_data_open, sync_trigger,
};
use crate::list::ListCore;
use crate::parts::PartBindings;

/// The values part: where the current selection is shown.
#[derive(Clone, Debug)]
struct ValuesDisplay {
    node: NodeId,
    placeholder: String,
}

/// A multi-select: trigger, values display, content, items, and indicators.
///
/// The trigger opens the content on Space, Enter, or pointer-down unless the root
/// is disabled. Inside the content, items and keys behave as in
/// [`Listbox`](crate::Listbox); Tab is suppressed, and Escape or a pointer-down
/// outside closes. On opening, focus goes to the first selected enabled item, else
/// the first enabled item, else the content itself.
#[derive(Debug)]
pub struct MultiSelect<S = FlipSolver> {
    disclosure: Disclosure,
    list: ListCore,
    hooks: DismissHooks,
    disabled: bool,
    content: Option<Presence>,
    outside: PointerDownOutside,
    display: Option<ValuesDisplay>,
    parts: PartBindings,
    offset: f64,
    solver: S,
    position: Option<Position>,
}

impl MultiSelect {
    /// A multi-select with the caller's `open` and `default_open` props and an
    /// empty uncontrolled selection.
    pub fn new(open: Option<bool>, default_open: Option<bool>) -> Self {
        Self {
            disclosure: Disclosure::new(open, default_open),
            list: ListCore::new(None, None),
            hooks: DismissHooks::new(),
            disabled: false,
            content: None,
            outside: PointerDownOutside::new(),
            display: None,
            parts: PartBindings::new(),
            offset: 0.0,
            solver: FlipSolver::default(),
            position: None,
        }
    }
}

impl<S: PositionSolver> MultiSelect<S> {
    /// Replace the placement solver.
    pub fn with_solver<T: PositionSolver>(self, solver: T) -> MultiSelect<T> {
        MultiSelect {
            disclosure: self.disclosure,
            list: self.list,
            hooks: self.hooks,
            disabled: self.disabled,
            content: self.content,
            outside: self.outside,
            display: self.display,
            parts: self.parts,
            offset: self.offset,
            solver,
            position: None,
        }
    }

    /// Set the `values` and `default_values` props.
    ///
    /// Call before [`with_on_values_change`](Self::with_on_values_change) and before
    /// mounting items: it starts a fresh selection state.
    pub fn with_values(
        mut self,
        values: Option<Vec<String>>,
        default_values: Option<Vec<String>>,
    ) -> Self {
        self.list = ListCore::new(values, default_values);
        self
    }

    /// Set the `on_open_change` callback.
    pub fn with_on_open_change(mut self, on_open_change: impl FnMut(bool) + 'static) -> Self {
        self.disclosure = self.disclosure.with_on_open_change(on_open_change);
        self
    }

    /// Set the `on_values_change` callback.
    pub fn with_on_values_change(mut self, on_change: impl FnMut(&[String]) + 'static) -> Self {
        self.list.set_on_values_change(on_change);
        self
    }

    /// Run `handlers` before the multi-select's own handling of events inside `part`.
    ///
    /// A handler that prevents the default, or stops the chain, keeps the multi-select
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

    /// Disable the root: the trigger no longer opens the content.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// How long typed characters accumulate, in milliseconds.
    pub fn with_typeahead_timeout(mut self, timeout: u64) -> Self {
        self.list.set_typeahead_timeout(timeout);
        self
    }

    /// Gap between trigger and content, in pixels.
    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Whether the content is open.
    pub fn is_open(&self) -> bool {
        self.disclosure.is_open()
    }

    /// Whether the root is disabled.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// The selected values, in selection order.
    pub fn values(&self) -> &[String] {
        self.list.values()
    }

    /// Whether `value` is selected.
    pub fn is_selected(&self, value: &str) -> bool {
        self.list.is_selected(value)
    }

    /// The trigger element, once mounted.
    pub fn trigger(&self) -> Option<NodeId> {
        self.disclosure.trigger().get()
    }

    /// The content element, once mounted.
    pub fn content(&self) -> Option<NodeId> {
        self.content.map(|c| c.node())
    }

    /// The last solved position.
    pub fn position(&self) -> Option<Position> {
        self.position
    }

    /// What the values part shows: the placeholder while nothing is selected,
    /// otherwise the selected values joined with `", "`.
    pub fn values_text(&self) -> String {
        let values = self.values();
        if values.is_empty() {
            return self
                .display
                .as_ref()
                .map(|d| d.placeholder.clone())
                .unwrap_or_default();
        }
        values.join(", ")
    }

    /// Enable or disable the root.
    pub fn set_disabled(&mut self, doc: &mut Document, disabled: bool) {
        self.disabled = disabled;
        self.sync_parts(doc);
    }

    /// Mount the trigger. It is marked disabled while the root is.
    pub fn mount_trigger(
        &mut self,
        doc: &mut Document,
        parent: NodeId,
        slot: Slot,
    ) -> Result<NodeId, DomError> {
        let node = slot.mount(doc, parent)?;
        bind_trigger(doc, &self.disclosure, node, "listbox");
        self.sync_parts(doc);
        Ok(node)
    }

    /// Mount the values part. The host renders [`values_text`](Self::values_text)
    /// into it; `data-placeholder` tells whether that is the placeholder.
    pub fn mount_values(
        &mut self,
        doc: &mut Document,
        parent: NodeId,
        slot: Option<Slot>,
        placeholder: Option<&str>,
    ) -> Result<NodeId, DomError> {
        let node = slot.unwrap_or(Slot::own(Tag::Span)).mount(doc, parent)?;
        self.display = Some(ValuesDisplay {
            node,
            placeholder: placeholder.map(String::from).unwrap_or_default(),
        });
        self.sync_parts(doc);
        Ok(node)
    }

    /// Mount the content surface.
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
        doc.set_attribute(node, "role", "listbox");
        doc.set_attribute(node, "aria-multiselectable", "true");
        self.list.bind_container(node);
        self.outside.region().set(Some(node));
        self.parts.assign_content(Some(node));
        self.content = Some(Presence::new(node, parent, options.force_mount));
        self.sync_parts(doc);
        Ok(node)
    }

    /// Mount an item under `parent` (the content or a group inside it).
    pub fn add_item(
        &mut self,
        doc: &mut Document,
        parent: NodeId,
        slot: Slot,
        data: ItemData,
    ) -> Result<NodeId, DomError> {
        self.list.add_item(doc, parent, slot, data)
    }

    /// Remove and destroy an item.
    pub fn remove_item(&mut self, doc: &mut Document, item: NodeId) {
        self.list.remove_item(doc, item);
    }

    /// Mount a selection indicator inside `item`, attached while it is selected.
    pub fn add_indicator(
        &mut self,
        doc: &mut Document,
        item: NodeId,
        slot: Slot,
    ) -> Result<NodeId, DomError> {
        self.list.add_indicator(doc, item, slot, false)
    }

    /// Request a new open state. Returns whether the request was accepted.
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

    /// Request a new selection. Returns whether it was accepted.
    pub fn set_values(&mut self, doc: &mut Document, values: Vec<String>) -> bool {
        let accepted = self.list.set_values(doc, values);
        self.sync_parts(doc);
        accepted
    }

    /// Re-render with the caller's current `values` prop.
    pub fn sync_values(&mut self, doc: &mut Document, values: Option<Vec<String>>) {
        self.list.sync_values(doc, values);
        self.sync_parts(doc);
    }

    /// Place the content below (or above) `anchor`, at least as wide as it.
    ///
    /// Writes `data-side` on the content. Returns `None` before the content is
    /// mounted.
    pub fn update_position(
        &mut self,
        doc: &mut Document,
        anchor: Rect,
        floating: Size,
        viewport: Rect,
    ) -> Option<Position> {
        let content = self.content()?;
        let request = FloatingRequest::new(anchor, floating, viewport).with_offset(self.offset);
        let position = self.solver.solve(&request);
        doc.set_attribute(content, "data-side", position.placement.side.as_str());
        self.position = Some(position);
        Some(position)
    }

    /// Tear down document registrations and cancel deferred work and pending
    /// typeahead.
    pub fn unmount(&mut self, doc: &mut Document) {
        self.disclosure.cancel_pending();
        self.outside.set_enabled(doc, false);
        self.list.clear_typeahead();
        self.parts.assign_content(None);
    }

    fn reconcile(&mut self, doc: &mut Document, now: u64) -> Option<Transition> {
        let transition = self.disclosure.reconcile(now);
        if transition == Some(Transition::Closed) {
            self.outside.set_enabled(doc, false);
            self.list.clear_typeahead();
        }
        self.sync_parts(doc);
        transition
    }

    fn sync_parts(&self, doc: &mut Document) {
        let open = self.disclosure.is_open();
        sync_trigger(doc, &self.disclosure);
        if let Some(trigger) = self.trigger() {
            doc.set_flags(trigger, ElementFlags::DISABLED, self.disabled);
        }
        if let Some(content) = self.content {
            content.sync(doc, open);
            set_data_open(doc, content.node(), open);
        }
        if let Some(display) = &self.display {
            let empty = self.values().is_empty();
            doc.set_attribute(display.node, "data-placeholder", bool_str(empty));
        }
    }

    fn handle_content_key(&mut self, doc: &mut Document, event: &mut KeyboardEvent, now: u64) {
        if event.is_default_prevented() || !self.is_open() {
            return;
        }
        match event.key {
            Key::Tab => event.prevent_default(),
            Key::Escape => {
                self.hooks.escape_key_down(event);
                if !event.is_default_prevented() {
                    self.disclosure.set_open(false);
                }
            }
            _ => {
                self.list.handle_list_key(doc, event, now);
            }
        }
    }

    fn focus_initial(&self, doc: &mut Document) {
        let content = self.content();
        let target = self.list.initial_focus_target(doc);
        let focused = get_first_focusable(doc, [target, content]);
        tracing::trace!(?focused, "multi-select initial focus");
    }
}

impl<S: PositionSolver> Widget for MultiSelect<S> {
    fn handle_event(&mut self, doc: &mut Document, event: &mut DomEvent, now: u64) {
        if !self.parts.run(doc, event) {
            self.reconcile(doc, now);
            return;
        }
        if is_trigger_activation(doc, self.trigger(), event) {
            if !self.disabled {
                self.disclosure.set_open(true);
            }
            self.reconcile(doc, now);
            return;
        }
        let inside = self
            .content()
            .is_some_and(|content| doc.contains(content, event.target()));
        if inside {
            self.list.handle_item_event(doc, event);
            if let DomEvent::KeyDown(key) = event {
                self.handle_content_key(doc, key, now);
            }
        } else if let DomEvent::PointerDown(pointer) = event {
            let hooks = &mut self.hooks;
            let outside = self
                .outside
                .handle_pointer_down(doc, pointer, |e| hooks.pointer_down_outside(e));
            if outside && !pointer.is_default_prevented() {
                self.disclosure.set_open(false);
            }
        }
        self.reconcile(doc, now);
    }

    fn tick(&mut self, doc: &mut Document, now: u64) {
        self.list.expire_typeahead(now);
        if self.reconcile(doc, now).is_some() {
            return;
        }
        for task in self.disclosure.run_due(now) {
            match task {
                DisclosureTask::OpenAutoFocus => {
                    if self.hooks.open_auto_focus() {
                        self.focus_initial(doc);
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
        [self.disclosure.next_due(), self.list.typeahead_due()]
            .into_iter()
            .flatten()
            .min()
    }
}
