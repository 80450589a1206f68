// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focusable-set resolution.

use alloc::vec::Vec;

use veil_dom::{Document, Element, NodeId};

/// All focusable candidates under `root`, in document order.
///
/// A candidate is a descendant matching [`Element::matches_focusable`]. The set is
/// recomputed on every call. A missing or stale root yields an empty set.
pub fn get_all_focusable(doc: &Document, root: Option<NodeId>) -> Vec<NodeId> {
    let Some(root) = root else {
        return Vec::new();
    };
    doc.descendants(root)
        .filter(|&node| doc.element(node).is_some_and(Element::matches_focusable))
        .collect()
}

/// Focus the first candidate that actually takes focus.
///
/// Missing candidates (`None`) are skipped. Reaching the element that was already
/// focused ends the search: nothing before it took focus, and it needs no move.
/// Returns the candidate that received focus.
pub fn get_first_focusable(
    doc: &mut Document,
    candidates: impl IntoIterator<Item = Option<NodeId>>,
) -> Option<NodeId> {
    let previous = doc.active_element();
    for candidate in candidates.into_iter().flatten() {
        if Some(candidate) == previous {
            return None;
        }
        doc.focus(candidate);
        if doc.active_element() != previous {
            return Some(candidate);
        }
    }
    None
}

/// Whether focus moving to `related` leaves `region`.
///
/// Focus going nowhere (`None`) counts as outside. A stale `related` node is not
/// treated as an outside interaction.
pub fn is_focused_outside(doc: &Document, region: NodeId, related: Option<NodeId>) -> bool {
    match related {
        None => true,
        Some(node) if !doc.is_alive(node) => false,
        Some(node) => !doc.contains(region, node),
    }
}
