// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page-global resources: document-level listener registrations and the
//! pointer-events lock.

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use core::cell::RefCell;

use crate::NodeId;

/// Handle of a registered listener.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct ListenerId(u64);

/// What a listener is registered for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// Document-level `pointerdown`.
    PointerDown,
    /// Document-level `keydown`.
    KeyDown,
    /// `focus` on a specific element.
    Focus(NodeId),
    /// `focusin` on a specific element (bubbles from descendants).
    FocusIn(NodeId),
    /// `focusout` on a specific element.
    FocusOut(NodeId),
}

/// Registration table. Dispatch stays with the host; the table only answers
/// "is this registration still live", which is what detectors check before acting.
#[derive(Clone, Debug, Default)]
pub(crate) struct Listeners {
    next: u64,
    entries: BTreeMap<ListenerId, ListenerKind>,
}

impl Listeners {
    pub(crate) fn add(&mut self, kind: ListenerKind) -> ListenerId {
        self.next += 1;
        let id = ListenerId(self.next);
        self.entries.insert(id, kind);
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        self.entries.remove(&id).is_some()
    }

    pub(crate) fn contains(&self, id: ListenerId) -> bool {
        self.entries.contains_key(&id)
    }

    pub(crate) fn count(&self, kind: ListenerKind) -> usize {
        self.entries.values().filter(|k| **k == kind).count()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug, Default)]
pub(crate) struct PointerEventsState {
    /// Current page value: `true` means `pointer-events: none` on the body.
    pub(crate) disabled: bool,
    depth: usize,
    saved: Option<bool>,
}

/// RAII guard for the page-level pointer-events lock.
///
/// Locks nest. The first lock records the page's prior value and disables pointer
/// events; releasing the last lock restores the recorded value, so an inner
/// surface closing never re-enables the page under a still-open outer surface.
/// Dropping the guard releases it.
#[must_use = "the lock is released when the guard is dropped"]
#[derive(Debug)]
pub struct PointerEventsLock {
    state: Rc<RefCell<PointerEventsState>>,
}

impl PointerEventsLock {
    pub(crate) fn acquire(state: &Rc<RefCell<PointerEventsState>>) -> Self {
        {
            let mut s = state.borrow_mut();
            if s.depth == 0 {
                s.saved = Some(s.disabled);
                s.disabled = true;
                tracing::debug!("pointer-events lock engaged");
            }
            s.depth += 1;
        }
        Self {
            state: Rc::clone(state),
        }
    }
}

impl Drop for PointerEventsLock {
    fn drop(&mut self) {
        let mut s = self.state.borrow_mut();
        s.depth = s.depth.saturating_sub(1);
        if s.depth == 0 {
            s.disabled = s.saved.take().unwrap_or(false);
            tracing::debug!(restored = s.disabled, "pointer-events lock released");
        }
    }
}

pub(crate) fn lock_depth(state: &Rc<RefCell<PointerEventsState>>) -> usize {
    state.borrow().depth
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listener_table_tracks_kinds() {
        let mut l = Listeners::default();
        let a = l.add(ListenerKind::PointerDown);
        let b = l.add(ListenerKind::PointerDown);
        let c = l.add(ListenerKind::KeyDown);
        assert_ne!(a, b);
        assert_eq!(l.count(ListenerKind::PointerDown), 2);
        assert!(l.remove(a));
        assert!(!l.remove(a));
        assert!(!l.contains(a));
        assert!(l.contains(c));
        assert_eq!(l.len(), 2);
    }

    #[test]
    fn nested_locks_restore_prior_value_once() {
        let state = Rc::new(RefCell::new(PointerEventsState::default()));
        let outer = PointerEventsLock::acquire(&state);
        let inner = PointerEventsLock::acquire(&state);
        assert!(state.borrow().disabled);
        drop(inner);
        assert!(state.borrow().disabled, "outer lock still held");
        drop(outer);
        assert!(!state.borrow().disabled);
        assert_eq!(lock_depth(&state), 0);
    }

    #[test]
    fn lock_restores_page_that_was_already_disabled() {
        let state = Rc::new(RefCell::new(PointerEventsState {
            disabled: true,
            ..PointerEventsState::default()
        }));
        drop(PointerEventsLock::acquire(&state));
        assert!(state.borrow().disabled);
    }
}
