// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Multi-selection list behavior shared by [`Listbox`](crate::Listbox) and
//! [`MultiSelect`](crate::MultiSelect).

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use veil_collection::{
    CollectionRegistry, Direction, ItemData, TypeaheadBuffer, next_item, produce_toggle_value,
    select_all_or_none, typeahead_search,
};
use veil_compose::{NodeRef, Slot};
use veil_dom::{Cancelable, DomError, DomEvent, Document, Key, KeyboardEvent, NodeId};
use veil_event_state::controllable::ControllableState;

use crate::disclosure::{Presence, bool_str};

#[derive(Debug)]
pub(crate) struct ListCore {
    values: ControllableState<Vec<String>>,
    registry: CollectionRegistry,
    typeahead: TypeaheadBuffer,
    indicators: Vec<(NodeId, Presence)>,
}

impl ListCore {
    pub(crate) fn new(values: Option<Vec<String>>, default_values: Option<Vec<String>>) -> Self {
        Self {
            values: ControllableState::new(values, Some(default_values.unwrap_or_default())),
            registry: CollectionRegistry::new(),
            typeahead: TypeaheadBuffer::new(),
            indicators: Vec::new(),
        }
    }

    pub(crate) fn set_on_values_change(&mut self, mut on_change: impl FnMut(&[String]) + 'static) {
        self.values
            .set_on_change(Some(Box::new(move |values: &Vec<String>| on_change(values))));
    }

    pub(crate) fn set_typeahead_timeout(&mut self, timeout: u64) {
        self.typeahead = TypeaheadBuffer::with_timeout(timeout);
    }

    pub(crate) fn values(&self) -> &[String] {
        self.values.get().map(Vec::as_slice).unwrap_or_default()
    }

    pub(crate) fn is_selected(&self, value: &str) -> bool {
        self.values().iter().any(|v| v == value)
    }

    pub(crate) fn container(&self) -> &NodeRef {
        self.registry.container()
    }

    /// Attach the list to its container element, dropping registrations of a
    /// previous container.
    pub(crate) fn bind_container(&mut self, node: NodeId) {
        if self.container().get() != Some(node) {
            self.registry.reset();
            self.indicators.clear();
            self.container().set(Some(node));
        }
    }

    pub(crate) fn sync_values(&mut self, doc: &mut Document, values: Option<Vec<String>>) {
        self.values.sync(values);
        self.sync_items(doc);
    }

    pub(crate) fn set_values(&mut self, doc: &mut Document, next: Vec<String>) -> bool {
        let changed = self.values.set(next);
        if changed {
            tracing::debug!(count = self.values().len(), "selection changed");
        }
        self.sync_items(doc);
        changed
    }

    fn toggle(&mut self, doc: &mut Document, value: &str) {
        let next = produce_toggle_value(self.values(), value);
        self.set_values(doc, next);
    }

    pub(crate) fn add_item(
        &mut self,
        doc: &mut Document,
        parent: NodeId,
        slot: Slot,
        data: ItemData,
    ) -> Result<NodeId, DomError> {
        let node = slot.mount(doc, parent)?;
        if let Some(element) = doc.element_mut(node) {
            element.tab_index = Some(-1);
        }
        doc.set_attribute(node, "role", "option");
        doc.set_attribute(node, "data-disabled", bool_str(data.disabled));
        self.registry.register(node, data);
        self.sync_items(doc);
        Ok(node)
    }

    pub(crate) fn remove_item(&mut self, doc: &mut Document, item: NodeId) {
        if self.registry.unregister(item).is_some() {
            self.indicators.retain(|(owner, _)| *owner != item);
            doc.destroy(item);
        }
    }

    pub(crate) fn add_indicator(
        &mut self,
        doc: &mut Document,
        item: NodeId,
        slot: Slot,
        force_mount: bool,
    ) -> Result<NodeId, DomError> {
        let node = slot.mount(doc, item)?;
        let parent = doc.parent_of(node).unwrap_or(item);
        self.indicators
            .push((item, Presence::new(node, parent, force_mount)));
        self.sync_items(doc);
        Ok(node)
    }

    /// Reflect the selection onto `aria-checked` and indicator presence.
    fn sync_items(&self, doc: &mut Document) {
        let selected: Vec<(NodeId, bool)> = self
            .registry
            .ordered_items(doc)
            .iter()
            .map(|item| (item.node, self.is_selected(&item.data.value)))
            .collect();
        for &(node, on) in &selected {
            doc.set_attribute(node, "aria-checked", bool_str(on));
        }
        for (item, presence) in &self.indicators {
            let on = selected.iter().any(|&(node, on)| node == *item && on);
            presence.sync(doc, on);
        }
    }

    /// The registered item containing `target`, if any.
    pub(crate) fn item_for(&self, doc: &Document, target: NodeId) -> Option<NodeId> {
        let container = self.container().get()?;
        let mut cur = Some(target);
        while let Some(node) = cur {
            if self.registry.get(node).is_some() {
                return Some(node);
            }
            if node == container {
                return None;
            }
            cur = doc.parent_of(node);
        }
        None
    }

    /// Item-level handlers: Space/Enter and pointer-down toggle, mouse-enter focuses.
    ///
    /// Disabled items ignore all three.
    pub(crate) fn handle_item_event(&mut self, doc: &mut Document, event: &mut DomEvent) {
        let Some(item) = self.item_for(doc, event.target()) else {
            return;
        };
        let Some(data) = self.registry.get(item).filter(|d| !d.disabled) else {
            return;
        };
        let value = data.value.clone();
        match event {
            DomEvent::KeyDown(key) if matches!(key.key, Key::Space | Key::Enter) => {
                key.prevent_default();
                self.toggle(doc, &value);
            }
            DomEvent::PointerDown(_) => self.toggle(doc, &value),
            DomEvent::MouseEnter(pointer) if !pointer.is_default_prevented() => {
                doc.focus(item);
            }
            _ => {}
        }
    }

    /// List-level keys: arrows, select-all, typeahead. Returns whether the key was
    /// used.
    pub(crate) fn handle_list_key(
        &mut self,
        doc: &mut Document,
        event: &mut KeyboardEvent,
        now: u64,
    ) -> bool {
        match event.key {
            Key::ArrowDown | Key::ArrowUp => {
                let direction = if event.key == Key::ArrowUp {
                    Direction::Up
                } else {
                    Direction::Down
                };
                let current = self.item_for(doc, event.target).unwrap_or(event.target);
                let next = {
                    let enabled = self.registry.enabled_items(doc);
                    next_item(&enabled, Some(current), direction)
                        .map(|item| (item.node, item.data.value.clone()))
                };
                if let Some((node, value)) = next {
                    doc.focus(node);
                    if event.shift() {
                        self.toggle(doc, &value);
                    }
                }
                true
            }
            Key::Character('a') if event.command() => {
                event.prevent_default();
                let next = {
                    let enabled = self.registry.enabled_items(doc);
                    select_all_or_none(&enabled, self.values())
                };
                self.set_values(doc, next);
                true
            }
            _ if event.command() => false,
            _ => match event.printable() {
                Some(ch) => {
                    self.typeahead(doc, ch, now);
                    true
                }
                None => false,
            },
        }
    }

    fn typeahead(&mut self, doc: &mut Document, ch: char, now: u64) {
        self.typeahead.push(ch, now);
        let target = {
            let items = self.registry.ordered_items(doc);
            let active = doc.active_element();
            let current = items.iter().position(|item| Some(item.node) == active);
            typeahead_search(self.typeahead.as_str(), &items, current, |item| {
                item.data.text.as_str()
            })
            .map(|index| items[index].node)
        };
        tracing::trace!(search = self.typeahead.as_str(), ?target, "typeahead");
        if let Some(node) = target {
            doc.focus(node);
        }
    }

    pub(crate) fn expire_typeahead(&mut self, now: u64) {
        self.typeahead.expire(now);
    }

    pub(crate) fn clear_typeahead(&mut self) {
        self.typeahead.clear();
    }

    pub(crate) fn typeahead_due(&self) -> Option<u64> {
        self.typeahead.expires_at()
    }

    /// First selected enabled item, else the first enabled item.
    pub(crate) fn initial_focus_target(&self, doc: &Document) -> Option<NodeId> {
        let enabled = self.registry.enabled_items(doc);
        enabled
            .iter()
            .find(|item| self.is_selected(&item.data.value))
            .or(enabled.first())
            .map(|item| item.node)
    }
}
