// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sequential (Tab) navigation.
//!
//! This is the default action a host performs for a Tab keydown nobody
//! default-prevented: positive `tabindex` values first in ascending order, then
//! every other tab stop in document order. Elements with a negative `tabindex` are
//! focusable by script but never tab stops.

use alloc::vec::Vec;
use core::cmp::Ordering;

use veil_dom::{Cancelable, Document, Element, Key, KeyboardEvent, NodeId};

/// Direction of sequential navigation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Navigation {
    /// Tab.
    Next,
    /// Shift+Tab.
    Prev,
}

/// What happens past the last (or before the first) tab stop.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum WrapMode {
    /// Stop at the edges.
    Never,
    /// Wrap around within the scope.
    Scope,
}

/// Tab stops under `scope`, in sequential navigation order.
pub fn tab_order(doc: &Document, scope: NodeId) -> Vec<NodeId> {
    let mut stops: Vec<(NodeId, Option<i32>)> = doc
        .descendants(scope)
        .filter_map(|node| {
            let element = doc.element(node)?;
            is_tab_stop(element).then_some((node, element.tab_index))
        })
        .collect();
    // Stable: ties keep document order.
    stops.sort_by(|a, b| compare_tab_index(a.1, b.1));
    stops.into_iter().map(|(node, _)| node).collect()
}

fn is_tab_stop(element: &Element) -> bool {
    element.matches_focusable() && element.tab_index.is_none_or(|t| t >= 0)
}

fn compare_tab_index(a: Option<i32>, b: Option<i32>) -> Ordering {
    let positive = |t: Option<i32>| t.filter(|&t| t > 0);
    match (positive(a), positive(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// The tab stop after (or before) `origin` within `scope`.
///
/// An `origin` that is not a tab stop itself (nothing focused, or a
/// `tabindex="-1"` element) continues from its document position.
pub fn next_tab_stop(
    doc: &Document,
    scope: NodeId,
    origin: Option<NodeId>,
    navigation: Navigation,
    wrap: WrapMode,
) -> Option<NodeId> {
    let stops = tab_order(doc, scope);
    let (&first, &last) = (stops.first()?, stops.last()?);
    let wrap_to = |node| matches!(wrap, WrapMode::Scope).then_some(node);

    let Some(origin) = origin else {
        return Some(match navigation {
            Navigation::Next => first,
            Navigation::Prev => last,
        });
    };
    if let Some(pos) = stops.iter().position(|&n| n == origin) {
        return match navigation {
            Navigation::Next => stops.get(pos + 1).copied().or_else(|| wrap_to(first)),
            Navigation::Prev if pos > 0 => Some(stops[pos - 1]),
            Navigation::Prev => wrap_to(last),
        };
    }

    // Origin is not a tab stop: continue from its place in document order.
    let after = |node: &NodeId| doc.compare_document_position(origin, *node) == Some(Ordering::Less);
    match navigation {
        Navigation::Next => stops.iter().copied().find(|n| after(n)).or_else(|| wrap_to(first)),
        Navigation::Prev => stops
            .iter()
            .rev()
            .copied()
            .find(|n| !after(n) && *n != origin)
            .or_else(|| wrap_to(last)),
    }
}

/// Perform the browser's default Tab action for `event` over the whole document.
///
/// Does nothing for non-Tab keys or default-prevented events. Returns the newly
/// focused element.
pub fn perform_default_tab(doc: &mut Document, event: &KeyboardEvent) -> Option<NodeId> {
    if event.key != Key::Tab || event.is_default_prevented() {
        return None;
    }
    let navigation = if event.shift() {
        Navigation::Prev
    } else {
        Navigation::Next
    };
    let next = next_tab_stop(
        doc,
        doc.body(),
        doc.active_element(),
        navigation,
        WrapMode::Scope,
    )?;
    doc.focus(next).then_some(next)
}
