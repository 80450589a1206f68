// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Always-visible multi-selection list.

use alloc::string::String;
use alloc::vec::Vec;

use veil_collection::ItemData;
use veil_compose::{HandlerChain, NodeRef, Slot};
use veil_dom::{Cancelable, DomError, DomEvent, Document, NodeId};

use crate::Widget;
use crate::list::ListCore;
use crate::parts::PartBindings;

/// A listbox: content, items, and per-item indicators.
///
/// Items toggle on Space, Enter, or pointer-down, and take focus on mouse-enter.
/// The content handles ArrowUp/ArrowDown (Shift toggles as it moves), Ctrl/Cmd+A,
/// and typeahead over item texts.
#[derive(Debug)]
pub struct Listbox {
    list: ListCore,
    parts: PartBindings,
}

impl Listbox {
    /// A listbox with the caller's `values` and `default_values` props.
    pub fn new(values: Option<Vec<String>>, default_values: Option<Vec<String>>) -> Self {
        Self {
            list: ListCore::new(values, default_values),
            parts: PartBindings::new(),
        }
    }

    /// Set the `on_values_change` callback.
    pub fn with_on_values_change(mut self, on_change: impl FnMut(&[String]) + 'static) -> Self {
        self.list.set_on_values_change(on_change);
        self
    }

    /// Run `handlers` before the listbox's own handling of events inside `part`.
    ///
    /// A handler that prevents the default, or stops the chain, keeps the listbox
    /// from acting on that event.
    pub fn add_part_handlers(&mut self, part: NodeId, handlers: HandlerChain<DomEvent>) {
        self.parts.add_handlers(part, handlers);
    }

    /// Also assign the content element to `node_ref` when it mounts.
    pub fn with_content_ref(mut self, node_ref: &NodeRef) -> Self {
        self.parts.push_content_ref(node_ref);
        self
    }

    /// How long typed characters accumulate, in milliseconds.
    pub fn with_typeahead_timeout(mut self, timeout: u64) -> Self {
        self.list.set_typeahead_timeout(timeout);
        self
    }

    /// The selected values, in selection order.
    pub fn values(&self) -> &[String] {
        self.list.values()
    }

    /// Whether `value` is selected.
    pub fn is_selected(&self, value: &str) -> bool {
        self.list.is_selected(value)
    }

    /// The content element, once mounted.
    pub fn content(&self) -> Option<NodeId> {
        self.list.container().get()
    }

    /// Mount the content. `label` defaults to "Select values".
    pub fn mount_content(
        &mut self,
        doc: &mut Document,
        parent: NodeId,
        slot: Slot,
        label: Option<&str>,
    ) -> Result<NodeId, DomError> {
        let node = slot.mount(doc, parent)?;
        if let Some(element) = doc.element_mut(node) {
            element.tab_index = Some(0);
        }
        doc.set_attribute(node, "role", "listbox");
        doc.set_attribute(node, "aria-multiselectable", "true");
        doc.set_attribute(node, "aria-label", label.unwrap_or("Select values"));
        self.list.bind_container(node);
        self.parts.assign_content(Some(node));
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

    /// Mount a selection indicator inside `item`. It is attached while the item is
    /// selected, or always with `force_mount`.
    pub fn add_indicator(
        &mut self,
        doc: &mut Document,
        item: NodeId,
        slot: Slot,
        force_mount: bool,
    ) -> Result<NodeId, DomError> {
        self.list.add_indicator(doc, item, slot, force_mount)
    }

    /// Request a new selection. Returns whether it was accepted.
    pub fn set_values(&mut self, doc: &mut Document, values: Vec<String>) -> bool {
        self.list.set_values(doc, values)
    }

    /// Re-render with the caller's current `values` prop.
    pub fn sync_values(&mut self, doc: &mut Document, values: Option<Vec<String>>) {
        self.list.sync_values(doc, values);
    }

    /// Drop any pending typeahead search.
    pub fn unmount(&mut self) {
        self.list.clear_typeahead();
        self.parts.assign_content(None);
    }
}

impl Widget for Listbox {
    fn handle_event(&mut self, doc: &mut Document, event: &mut DomEvent, now: u64) {
        let inside = self
            .content()
            .is_some_and(|content| doc.contains(content, event.target()));
        if !inside || !self.parts.run(doc, event) {
            return;
        }
        self.list.handle_item_event(doc, event);
        if let DomEvent::KeyDown(key) = event
            && !key.is_default_prevented()
        {
            self.list.handle_list_key(doc, key, now);
        }
    }

    fn tick(&mut self, _doc: &mut Document, now: u64) {
        self.list.expire_typeahead(now);
    }

    fn next_due(&self) -> Option<u64> {
        self.list.typeahead_due()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{advance, dispatch};
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;
    use veil_dom::{Key, KeyboardEvent, Modifiers, PointerEvent};

    struct Fixture {
        doc: Document,
        listbox: Listbox,
        content: NodeId,
        items: Vec<NodeId>,
    }

    fn fixture(listbox: Listbox, items: &[ItemData]) -> Fixture {
        let mut doc = Document::new();
        let body = doc.body();
        let mut listbox = listbox;
        let content = listbox
            .mount_content(&mut doc, body, Slot::default(), None)
            .unwrap();
        let items = items
            .iter()
            .map(|data| {
                listbox
                    .add_item(&mut doc, content, Slot::default(), data.clone())
                    .unwrap()
            })
            .collect();
        Fixture {
            doc,
            listbox,
            content,
            items,
        }
    }

    fn fruit() -> Vec<ItemData> {
        vec![
            ItemData::new("apple", "Apple"),
            ItemData::new("banana", "Banana"),
            ItemData::new("blueberry", "Blueberry"),
        ]
    }

    impl Fixture {
        fn send(&mut self, event: DomEvent, now: u64) -> DomEvent {
            dispatch(&mut self.doc, &mut [&mut self.listbox], event, now)
        }

        /// Key down on the focused element, or the content when nothing is focused.
        fn key(&mut self, key: Key, now: u64) -> DomEvent {
            let target = self.doc.active_element().unwrap_or(self.content);
            self.send(DomEvent::KeyDown(KeyboardEvent::new(key, target)), now)
        }
    }

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| String::from(*s)).collect()
    }

    #[test]
    fn content_carries_listbox_semantics() {
        let f = fixture(Listbox::new(None, None), &fruit());
        assert_eq!(f.doc.attribute(f.content, "role"), Some("listbox"));
        assert_eq!(f.doc.attribute(f.content, "aria-label"), Some("Select values"));
        assert_eq!(f.doc.attribute(f.content, "aria-multiselectable"), Some("true"));
        assert_eq!(f.doc.element(f.content).unwrap().tab_index, Some(0));
        assert_eq!(f.doc.attribute(f.items[0], "role"), Some("option"));
        assert_eq!(f.doc.attribute(f.items[0], "aria-checked"), Some("false"));
    }

    #[test]
    fn typeahead_cycles_then_restarts_after_timeout() {
        let mut f = fixture(Listbox::new(None, None), &fruit());
        f.doc.focus(f.items[0]);

        f.key(Key::Character('b'), 0);
        assert_eq!(f.doc.active_element(), Some(f.items[1]));
        f.key(Key::Character('b'), 100);
        assert_eq!(f.doc.active_element(), Some(f.items[2]));

        assert_eq!(f.listbox.next_due(), Some(1100));
        advance(&mut f.doc, &mut [&mut f.listbox], 1100);
        assert_eq!(f.listbox.next_due(), None);

        f.key(Key::Character('b'), 1200);
        assert_eq!(f.doc.active_element(), Some(f.items[1]));
    }

    #[test]
    fn arrows_stop_at_the_edges_and_skip_disabled() {
        let items = [
            ItemData::new("a", "A"),
            ItemData::new("b", "B").disabled(),
            ItemData::new("c", "C"),
        ];
        let mut f = fixture(Listbox::new(None, None), &items);
        f.doc.focus(f.content);

        f.key(Key::ArrowDown, 0);
        assert_eq!(f.doc.active_element(), Some(f.items[0]));
        f.key(Key::ArrowDown, 1);
        assert_eq!(f.doc.active_element(), Some(f.items[2]));
        f.key(Key::ArrowDown, 2);
        assert_eq!(f.doc.active_element(), Some(f.items[2]));
        f.key(Key::ArrowUp, 3);
        assert_eq!(f.doc.active_element(), Some(f.items[0]));
        f.key(Key::ArrowUp, 4);
        assert_eq!(f.doc.active_element(), Some(f.items[0]));
    }

    #[test]
    fn shift_arrow_toggles_the_newly_focused_item() {
        let mut f = fixture(Listbox::new(None, None), &fruit());
        f.doc.focus(f.items[0]);
        let down = KeyboardEvent::new(Key::ArrowDown, f.items[0]).with_modifiers(Modifiers::SHIFT);
        f.send(DomEvent::KeyDown(down), 0);
        assert_eq!(f.doc.active_element(), Some(f.items[1]));
        assert_eq!(f.listbox.values(), strings(&["banana"]));
    }

    #[test]
    fn select_all_then_none_ignores_disabled_items() {
        let items = [
            ItemData::new("a", "A"),
            ItemData::new("b", "B").disabled(),
            ItemData::new("c", "C"),
        ];
        let mut f = fixture(Listbox::new(None, None), &items);
        f.doc.focus(f.content);
        let content = f.content;
        let select_all =
            move || KeyboardEvent::new(Key::Character('a'), content).with_modifiers(Modifiers::CTRL);

        let ev = f.send(DomEvent::KeyDown(select_all()), 0);
        assert!(ev.is_default_prevented());
        assert_eq!(f.listbox.values(), strings(&["a", "c"]));
        f.send(DomEvent::KeyDown(select_all()), 1);
        assert!(f.listbox.values().is_empty());
        // The shortcut is not typed into the typeahead buffer.
        assert_eq!(f.listbox.next_due(), None);
    }

    #[test]
    fn items_toggle_and_drive_indicators() {
        let mut f = fixture(Listbox::new(None, None), &fruit());
        let indicator = f
            .listbox
            .add_indicator(&mut f.doc, f.items[1], Slot::default(), false)
            .unwrap();
        assert!(!f.doc.is_connected(indicator));

        let ev = f.send(DomEvent::KeyDown(KeyboardEvent::new(Key::Space, f.items[1])), 0);
        assert!(ev.is_default_prevented());
        assert_eq!(f.doc.attribute(f.items[1], "aria-checked"), Some("true"));
        assert!(f.doc.is_connected(indicator));

        // A pointer-down toggles it back off and focuses it.
        f.send(DomEvent::PointerDown(PointerEvent::new(f.items[1])), 1);
        assert!(!f.listbox.is_selected("banana"));
        assert!(!f.doc.is_connected(indicator));
        assert_eq!(f.doc.active_element(), Some(f.items[1]));

        f.send(DomEvent::KeyDown(KeyboardEvent::new(Key::Enter, f.items[0])), 2);
        assert_eq!(f.listbox.values(), strings(&["apple"]));
    }

    #[test]
    fn disabled_items_ignore_toggles() {
        let items = [ItemData::new("a", "A").disabled()];
        let mut f = fixture(Listbox::new(None, None), &items);
        assert_eq!(f.doc.attribute(f.items[0], "data-disabled"), Some("true"));
        f.send(DomEvent::PointerDown(PointerEvent::new(f.items[0])), 0);
        f.send(DomEvent::KeyDown(KeyboardEvent::new(Key::Enter, f.items[0])), 1);
        assert!(f.listbox.values().is_empty());
    }

    #[test]
    fn mouse_enter_focuses_unless_prevented() {
        struct Veto;
        impl Widget for Veto {
            fn handle_event(&mut self, _doc: &mut Document, event: &mut DomEvent, _now: u64) {
                if let DomEvent::MouseEnter(pointer) = event {
                    pointer.prevent_default();
                }
            }

            fn tick(&mut self, _doc: &mut Document, _now: u64) {}
        }

        let mut f = fixture(Listbox::new(None, None), &fruit());
        dispatch(
            &mut f.doc,
            &mut [&mut Veto, &mut f.listbox],
            DomEvent::MouseEnter(PointerEvent::new(f.items[2])),
            0,
        );
        assert_eq!(f.doc.active_element(), None);

        f.send(DomEvent::MouseEnter(PointerEvent::new(f.items[2])), 1);
        assert_eq!(f.doc.active_element(), Some(f.items[2]));
    }

    #[test]
    fn item_handlers_run_first_and_can_veto_the_toggle() {
        let content_ref = NodeRef::new();
        let mut f = fixture(Listbox::new(None, None).with_content_ref(&content_ref), &fruit());
        assert_eq!(content_ref.get(), Some(f.content));

        let seen = Rc::new(RefCell::new(0_u32));
        let count = Rc::clone(&seen);
        let mut chain = HandlerChain::new();
        chain.push(move |e: &mut DomEvent| {
            *count.borrow_mut() += 1;
            if let DomEvent::KeyDown(key) = e {
                key.prevent_default();
            }
            veil_compose::Outcome::Continue
        });
        let banana = f.items[1];
        f.listbox.add_part_handlers(banana, chain);

        f.send(DomEvent::KeyDown(KeyboardEvent::new(Key::Space, banana)), 0);
        assert!(!f.listbox.is_selected("banana"));
        // Pointer-downs pass through the caller untouched.
        f.send(DomEvent::PointerDown(PointerEvent::new(banana)), 1);
        assert!(f.listbox.is_selected("banana"));
        // Other items never reach the chain.
        f.send(DomEvent::KeyDown(KeyboardEvent::new(Key::Space, f.items[0])), 2);
        assert!(f.listbox.is_selected("apple"));
        assert_eq!(*seen.borrow(), 2);

        f.listbox.unmount();
        assert_eq!(content_ref.get(), None);
    }

    #[test]
    fn controlled_values_only_notify() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let listbox = Listbox::new(Some(strings(&["apple"])), None)
            .with_on_values_change(move |values| log.borrow_mut().push(values.to_vec()));
        let mut f = fixture(listbox, &fruit());

        f.send(DomEvent::PointerDown(PointerEvent::new(f.items[1])), 0);
        assert_eq!(f.listbox.values(), strings(&["apple"]));
        assert_eq!(*seen.borrow(), [strings(&["apple", "banana"])]);

        // A prop change alone never notifies.
        f.listbox.sync_values(&mut f.doc, Some(strings(&["banana"])));
        assert_eq!(f.doc.attribute(f.items[1], "aria-checked"), Some("true"));
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn removed_items_leave_the_collection() {
        let mut f = fixture(Listbox::new(None, None), &fruit());
        let banana = f.items[1];
        f.listbox.remove_item(&mut f.doc, banana);
        assert!(!f.doc.is_alive(banana));
        f.doc.focus(f.items[0]);
        f.key(Key::ArrowDown, 0);
        assert_eq!(f.doc.active_element(), Some(f.items[2]));
    }
}
