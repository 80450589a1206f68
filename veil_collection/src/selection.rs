// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Multi-selection helpers shared by list widgets.

use alloc::string::String;
use alloc::vec::Vec;

use veil_dom::NodeId;

use crate::registry::{CollectionItem, ItemData};

/// Remove `value` if selected, else append it.
///
/// The result never holds duplicates of `value`.
pub fn produce_toggle_value(values: &[String], value: &str) -> Vec<String> {
    if values.iter().any(|v| v == value) {
        values.iter().filter(|v| *v != value).cloned().collect()
    } else {
        let mut next = values.to_vec();
        next.push(String::from(value));
        next
    }
}

/// Select-all shortcut: clear the selection if it is as large as the enabled set,
/// otherwise select every enabled value.
pub fn select_all_or_none(enabled: &[CollectionItem<'_, ItemData>], selected: &[String]) -> Vec<String> {
    if enabled.len() == selected.len() {
        Vec::new()
    } else {
        enabled.iter().map(|item| item.data.value.clone()).collect()
    }
}

/// Arrow direction for [`next_item`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Toward the end of the list.
    Down,
    /// Toward the start of the list.
    Up,
}

/// The item after `current` in `direction`, without wrapping.
///
/// When `current` is not one of the items, the first item in `direction` is
/// returned.
pub fn next_item<'a, D>(
    items: &[CollectionItem<'a, D>],
    current: Option<NodeId>,
    direction: Direction,
) -> Option<CollectionItem<'a, D>> {
    let position = |node: NodeId| items.iter().position(|item| item.node == node);
    match direction {
        Direction::Down => {
            let start = current.and_then(position).map_or(0, |i| i + 1);
            items.get(start).copied()
        }
        Direction::Up => match current.and_then(position) {
            Some(0) => None,
            Some(i) => items.get(i - 1).copied(),
            None => items.last().copied(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veil_dom::{Document, Element, Tag};

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| String::from(*s)).collect()
    }

    #[test]
    fn toggle_removes_or_appends() {
        assert_eq!(
            produce_toggle_value(&strings(&["a", "b", "c"]), "b"),
            strings(&["a", "c"])
        );
        assert_eq!(
            produce_toggle_value(&strings(&["a", "c"]), "b"),
            strings(&["a", "c", "b"])
        );
    }

    fn items(doc: &mut Document, data: &[ItemData]) -> Vec<NodeId> {
        data.iter()
            .map(|_| doc.create_element(Element::new(Tag::Div)))
            .collect()
    }

    #[test]
    fn select_all_compares_sizes() {
        let mut doc = Document::new();
        let data = [ItemData::new("a", "A"), ItemData::new("b", "B")];
        let nodes = items(&mut doc, &data);
        let enabled: Vec<CollectionItem<'_>> = nodes
            .iter()
            .zip(data.iter())
            .map(|(&node, data)| CollectionItem { node, data })
            .collect();

        assert_eq!(select_all_or_none(&enabled, &[]), strings(&["a", "b"]));
        assert_eq!(select_all_or_none(&enabled, &strings(&["b"])), strings(&["a", "b"]));
        assert!(select_all_or_none(&enabled, &strings(&["b", "a"])).is_empty());
    }

    #[test]
    fn arrows_stop_at_the_ends() {
        let mut doc = Document::new();
        let data = [
            ItemData::new("a", "A"),
            ItemData::new("b", "B"),
            ItemData::new("c", "C"),
        ];
        let nodes = items(&mut doc, &data);
        let list: Vec<CollectionItem<'_>> = nodes
            .iter()
            .zip(data.iter())
            .map(|(&node, data)| CollectionItem { node, data })
            .collect();
        let step = |current, dir| next_item(&list, current, dir).map(|i| i.data.value.as_str());

        assert_eq!(step(Some(nodes[0]), Direction::Down), Some("b"));
        assert_eq!(step(Some(nodes[2]), Direction::Down), None);
        assert_eq!(step(Some(nodes[2]), Direction::Up), Some("b"));
        assert_eq!(step(Some(nodes[0]), Direction::Up), None);
        // From outside the list (the content surface), the first item in that direction.
        assert_eq!(step(None, Direction::Down), Some("a"));
        assert_eq!(step(None, Direction::Up), Some("c"));
    }
}
