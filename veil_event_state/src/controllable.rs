// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Controlled/uncontrolled value reconciliation.
//!
//! A widget root owns its `open` flag and selected values through this type. The
//! caller either supplies the value (controlled) or lets the state keep it
//! internally (uncontrolled), and the widget reads and writes it the same way in
//! both modes.
//!
//! ## Usage
//!
//! ```
//! use veil_event_state::controllable::ControllableState;
//! use std::{cell::RefCell, rc::Rc};
//!
//! let changes = Rc::new(RefCell::new(Vec::new()));
//! let log = Rc::clone(&changes);
//! let mut state = ControllableState::new(Some(20), None)
//!     .with_on_change(move |v: &i32| log.borrow_mut().push(*v));
//! assert_eq!(state.get(), Some(&20));
//!
//! // The caller re-renders with a new value: observed, never reported.
//! state.sync(Some(10));
//! assert_eq!(state.get(), Some(&10));
//! assert!(changes.borrow().is_empty());
//!
//! // A write is reported but does not change what is observed.
//! state.set(30);
//! assert_eq!(state.get(), Some(&10));
//! assert_eq!(*changes.borrow(), vec![30]);
//! ```
//!
//! ## Mode switching
//!
//! Whether the state is controlled is decided by whether a value is supplied.
//! Switching between modes mid-lifecycle (a controlled caller later passing `None`)
//! is not supported: the internal value is whatever it was when control began, and
//! no change notification is produced for the switch.

use alloc::boxed::Box;

/// A value that is either supplied by the caller or owned internally.
pub struct ControllableState<T> {
    controlled: Option<T>,
    uncontrolled: Option<T>,
    on_change: Option<Box<dyn FnMut(&T)>>,
}

impl<T: core::fmt::Debug> core::fmt::Debug for ControllableState<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ControllableState")
            .field("controlled", &self.controlled)
            .field("uncontrolled", &self.uncontrolled)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

impl<T: Clone + PartialEq> ControllableState<T> {
    /// Create the state from the caller's `value` and `default_value`.
    ///
    /// `default_value` only seeds the internal fallback; it is never consulted again.
    pub fn new(value: Option<T>, default_value: Option<T>) -> Self {
        Self {
            controlled: value,
            uncontrolled: default_value,
            on_change: None,
        }
    }

    /// Uncontrolled state starting at `default_value`.
    pub fn uncontrolled(default_value: T) -> Self {
        Self::new(None, Some(default_value))
    }

    /// Controlled state showing `value`.
    pub fn controlled(value: T) -> Self {
        Self::new(Some(value), None)
    }

    /// Set the change callback.
    pub fn with_on_change(mut self, on_change: impl FnMut(&T) + 'static) -> Self {
        self.on_change = Some(Box::new(on_change));
        self
    }

    /// Replace the change callback.
    pub fn set_on_change(&mut self, on_change: Option<Box<dyn FnMut(&T)>>) {
        self.on_change = on_change;
    }

    /// Whether the caller supplies the value.
    pub fn is_controlled(&self) -> bool {
        self.controlled.is_some()
    }

    /// The observed value: the supplied value if controlled, else the internal one.
    pub fn get(&self) -> Option<&T> {
        if self.controlled.is_some() {
            self.controlled.as_ref()
        } else {
            self.uncontrolled.as_ref()
        }
    }

    /// Re-render with the caller's current `value` prop. Never notifies.
    pub fn sync(&mut self, value: Option<T>) {
        self.controlled = value;
    }

    /// Request `next`. Returns whether this was an accepted transition.
    ///
    /// The change callback runs exactly once if `next` differs from the observed
    /// value, and not at all otherwise. Internal state only changes when
    /// uncontrolled.
    pub fn set(&mut self, next: T) -> bool {
        if self.get() == Some(&next) {
            return false;
        }
        if let Some(on_change) = self.on_change.as_mut() {
            on_change(&next);
        }
        if self.controlled.is_none() {
            self.uncontrolled = Some(next);
        }
        true
    }

    /// Request a value computed from the observed one.
    pub fn update(&mut self, f: impl FnOnce(Option<&T>) -> T) -> bool {
        let next = f(self.get());
        self.set(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    fn recorded<T: Clone + PartialEq + 'static>(
        state: ControllableState<T>,
    ) -> (ControllableState<T>, Rc<RefCell<Vec<T>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        (
            state.with_on_change(move |v: &T| sink.borrow_mut().push(v.clone())),
            log,
        )
    }

    #[test]
    fn no_op_writes_never_notify() {
        let (mut state, log) = recorded(ControllableState::uncontrolled(false));
        assert!(!state.set(false));
        assert!(state.set(true));
        assert!(!state.set(true));
        assert_eq!(*log.borrow(), vec![true]);

        let (mut state, log) = recorded(ControllableState::controlled(5));
        assert!(!state.set(5));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn controlled_prop_changes_are_observed_silently() {
        let (mut state, log) = recorded(ControllableState::new(Some(20), None));
        assert_eq!(state.get(), Some(&20));
        state.sync(Some(10));
        assert_eq!(state.get(), Some(&10));
        assert!(log.borrow().is_empty());

        assert!(state.set(20));
        assert_eq!(state.get(), Some(&10), "controlled value is owned by the caller");
        assert_eq!(*log.borrow(), vec![20]);
    }

    #[test]
    fn default_only_seeds() {
        let mut state: ControllableState<u8> = ControllableState::new(None, Some(1));
        assert!(!state.is_controlled());
        state.set(2);
        assert_eq!(state.get(), Some(&2));
    }

    #[test]
    fn updater_sees_previous_value() {
        let (mut state, log) = recorded(ControllableState::uncontrolled(vec!["a"]));
        state.update(|prev| {
            let mut next = prev.cloned().unwrap_or_default();
            next.push("b");
            next
        });
        assert_eq!(state.get(), Some(&vec!["a", "b"]));
        assert_eq!(*log.borrow(), vec![vec!["a", "b"]]);
    }

    #[test]
    fn uncontrolled_without_default_is_empty() {
        let mut state: ControllableState<bool> = ControllableState::new(None, None);
        assert_eq!(state.get(), None);
        assert!(state.set(false));
        assert_eq!(state.get(), Some(&false));
    }
}
