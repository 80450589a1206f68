// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handler chains: several independent handlers on one event.
//!
//! - [`Outcome`] only controls propagation (`Continue` vs `Stop`).
//! - Cancelation lives on the event payload ([`Cancelable`]); it never stops later
//!   handlers from running. Handlers that perform a default action check the flag
//!   first, typically via [`unless_prevented`].
//!
//! ## Example
//!
//! ```
//! use veil_compose::{HandlerChain, Outcome};
//! use veil_dom::{Cancelable, Document, PointerEvent};
//!
//! let doc = Document::new();
//! let mut chain: HandlerChain<PointerEvent> = HandlerChain::new();
//! chain.push(|e| {
//!     e.prevent_default();
//!     Outcome::Continue
//! });
//! chain.push(|e| {
//!     // Still runs; sees the flag.
//!     assert!(e.is_default_prevented());
//!     Outcome::Continue
//! });
//!
//! let mut ev = PointerEvent::new(doc.body());
//! assert_eq!(chain.run(&mut ev), None);
//! assert!(ev.is_default_prevented());
//! ```

use alloc::boxed::Box;
use alloc::vec::Vec;

use veil_dom::Cancelable;

/// Whether to keep invoking the remaining handlers of a chain.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Keep going.
    Continue,
    /// Skip the remaining handlers (`stopImmediatePropagation`).
    Stop,
}

/// A boxed handler without a propagation result.
pub type Handler<E> = Box<dyn FnMut(&mut E)>;

/// Ordered list of handlers for one event type.
pub struct HandlerChain<E> {
    handlers: Vec<Box<dyn FnMut(&mut E) -> Outcome>>,
}

impl<E> core::fmt::Debug for HandlerChain<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HandlerChain")
            .field("len", &self.handlers.len())
            .finish_non_exhaustive()
    }
}

impl<E> Default for HandlerChain<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> HandlerChain<E> {
    /// An empty chain.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Append a handler. Handlers run in registration order.
    pub fn push(&mut self, handler: impl FnMut(&mut E) -> Outcome + 'static) -> &mut Self {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Append a handler that always continues.
    pub fn push_listener(&mut self, mut handler: impl FnMut(&mut E) + 'static) -> &mut Self {
        self.push(move |e| {
            handler(e);
            Outcome::Continue
        })
    }

    /// Number of handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether the chain has no handlers.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Invoke handlers in order.
    ///
    /// Returns the index of the handler that returned [`Outcome::Stop`], or `None`
    /// if every handler ran.
    pub fn run(&mut self, event: &mut E) -> Option<usize> {
        for (i, handler) in self.handlers.iter_mut().enumerate() {
            if handler(event) == Outcome::Stop {
                tracing::trace!(index = i, "handler chain stopped");
                return Some(i);
            }
        }
        None
    }
}

/// Compose optional handlers into one callable that invokes each present handler
/// in argument order.
pub fn compose_event_handlers<E>(
    handlers: impl IntoIterator<Item = Option<Handler<E>>>,
) -> impl FnMut(&mut E) {
    let mut handlers: Vec<Handler<E>> = handlers.into_iter().flatten().collect();
    move |event: &mut E| {
        for handler in &mut handlers {
            handler(event);
        }
    }
}

/// Run `default_action` only if no handler flagged `event`.
///
/// Returns whether the action ran.
pub fn unless_prevented<E: Cancelable + ?Sized>(event: &E, default_action: impl FnOnce()) -> bool {
    if event.is_default_prevented() {
        return false;
    }
    default_action();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;
    use veil_dom::{Document, Key, KeyboardEvent};

    #[test]
    fn handlers_run_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut chain: HandlerChain<u32> = HandlerChain::new();
        for tag in 0..3 {
            let log = Rc::clone(&log);
            chain.push_listener(move |e| {
                *e += 1;
                log.borrow_mut().push(tag);
            });
        }
        let mut count = 0;
        assert_eq!(chain.run(&mut count), None);
        assert_eq!(count, 3);
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn stop_skips_remaining_handlers() {
        let mut chain: HandlerChain<Vec<u8>> = HandlerChain::new();
        chain
            .push(|e| {
                e.push(1);
                Outcome::Continue
            })
            .push(|e| {
                e.push(2);
                Outcome::Stop
            })
            .push(|e| {
                e.push(3);
                Outcome::Continue
            });
        let mut seen = Vec::new();
        assert_eq!(chain.run(&mut seen), Some(1));
        assert_eq!(seen, vec![1, 2]);
    }

    #[test]
    fn composed_handlers_skip_missing_and_see_cancelation() {
        let doc = Document::new();
        let ran_default = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&ran_default);
        let user: Handler<KeyboardEvent> = Box::new(|e: &mut KeyboardEvent| e.prevent_default());
        let internal: Handler<KeyboardEvent> = Box::new(move |e: &mut KeyboardEvent| {
            unless_prevented(e, || *flag.borrow_mut() = true);
        });
        let mut composed = compose_event_handlers([Some(user), None, Some(internal)]);

        let mut ev = KeyboardEvent::new(Key::Escape, doc.body());
        composed(&mut ev);
        assert!(ev.is_default_prevented());
        assert!(!*ran_default.borrow());
    }

    #[test]
    fn unless_prevented_runs_default() {
        let doc = Document::new();
        let ev = KeyboardEvent::new(Key::Enter, doc.body());
        let mut ran = false;
        assert!(unless_prevented(&ev, || ran = true));
        assert!(ran);
    }
}
