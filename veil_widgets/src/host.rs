// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host driver: deliver events to widgets, then run the defaults nobody prevented.
//!
//! Widgets never perform browser default actions themselves. After every widget
//! has seen an event, [`dispatch`] checks the event's `default_prevented` flag and
//! runs the default:
//!
//! - Tab keydown: sequential navigation over the whole document.
//! - Pointer-down: focus the nearest focusable ancestor of the target, or drop
//!   focus to the body.
//!
//! Focus moves queue focus events on the [`Document`]; [`pump`] delivers them until
//! none are left, since handling one may queue more.

use veil_dom::{DomEvent, Document, Element};
use veil_focus::perform_default_tab;

use crate::Widget;

/// Bound on [`pump`] rounds; focus ping-pong between widgets is cut off here.
pub const MAX_PUMP_ROUNDS: usize = 64;

/// Deliver one host event to every widget, run its default action, and pump the
/// focus events that follow. Returns the event as the widgets left it.
///
/// Pointer events are retargeted through
/// [`Document::pointer_target`] first, so a page with pointer events locked
/// delivers outside hits to the body.
pub fn dispatch(
    doc: &mut Document,
    widgets: &mut [&mut dyn Widget],
    mut event: DomEvent,
    now: u64,
) -> DomEvent {
    if let DomEvent::PointerDown(p) | DomEvent::MouseEnter(p) | DomEvent::Click(p) = &mut event {
        p.target = doc.pointer_target(p.target);
    }
    tracing::trace!(?event, "dispatch");
    for widget in widgets.iter_mut() {
        widget.handle_event(doc, &mut event, now);
    }
    default_action(doc, &event);
    pump(doc, widgets, now);
    event
}

/// Run every widget's due work at `now`, then pump focus events.
pub fn advance(doc: &mut Document, widgets: &mut [&mut dyn Widget], now: u64) {
    for widget in widgets.iter_mut() {
        widget.tick(doc, now);
    }
    pump(doc, widgets, now);
}

/// Deliver queued focus events until the document is quiescent.
///
/// Returns the number of events delivered. Stops after [`MAX_PUMP_ROUNDS`]
/// rounds, leaving anything still queued in place.
pub fn pump(doc: &mut Document, widgets: &mut [&mut dyn Widget], now: u64) -> usize {
    let mut delivered = 0;
    for _ in 0..MAX_PUMP_ROUNDS {
        let events = doc.take_focus_events();
        if events.is_empty() {
            return delivered;
        }
        for focus in events {
            let mut event = DomEvent::Focus(focus);
            for widget in widgets.iter_mut() {
                widget.handle_event(doc, &mut event, now);
            }
            delivered += 1;
        }
    }
    if doc.has_pending_focus_events() {
        tracing::warn!(rounds = MAX_PUMP_ROUNDS, "focus events still queued; giving up");
    }
    delivered
}

/// The earliest time any widget has deferred work.
pub fn next_due(widgets: &[&mut dyn Widget]) -> Option<u64> {
    widgets.iter().filter_map(|w| w.next_due()).min()
}

fn default_action(doc: &mut Document, event: &DomEvent) {
    if event.is_default_prevented() {
        return;
    }
    match event {
        DomEvent::KeyDown(key) => {
            perform_default_tab(doc, key);
        }
        DomEvent::PointerDown(pointer) => {
            let mut cur = Some(pointer.target);
            while let Some(node) = cur {
                if doc.element(node).is_some_and(Element::accepts_focus) && doc.focus(node) {
                    return;
                }
                cur = doc.parent_of(node);
            }
            doc.blur();
        }
        _ => {}
    }
}
