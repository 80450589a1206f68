// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Veil Widgets: headless disclosure widgets over a [`veil_dom::Document`].
//!
//! Each widget is a root controller that owns its state (open, selection, item
//! registry) and hands out its parts through `mount_*` methods. A part is mounted
//! from a [`Slot`](veil_compose::Slot): either the widget creates its own element,
//! or it takes over an element the caller built (`as_child`).
//!
//! - [`Drawer`]: modal side panel. Traps Tab, closes on Escape, close button, or a
//!   pointer-down outside.
//! - [`Floating`]: popover anchored to its trigger. Scopes Tab, closes on Escape or
//!   when focus leaves it, and places itself with a
//!   [`PositionSolver`](veil_position::PositionSolver).
//! - [`Listbox`]: always-visible multi-selection list with arrow navigation,
//!   select-all, and typeahead.
//! - [`MultiSelect`]: listbox behavior inside a disclosure, with a values display.
//!
//! Widgets see host events through the [`Widget`] trait. The host routes every
//! event through [`dispatch`], which also runs browser default actions nobody
//! prevented, and calls [`advance`] as time passes so deferred focus moves run.
//!
//! ## Example
//!
//! ```rust
//! use veil_compose::Slot;
//! use veil_dom::{Document, DomEvent, Key, KeyboardEvent, PointerEvent, Tag};
//! use veil_widgets::{ContentOptions, Drawer, advance, dispatch};
//!
//! let mut doc = Document::new();
//! let body = doc.body();
//! let mut drawer = Drawer::new(None, None);
//! let trigger = drawer.mount_trigger(&mut doc, body, Slot::own(Tag::Button)).unwrap();
//! let content = drawer
//!     .mount_content(&mut doc, body, Slot::default(), ContentOptions::default())
//!     .unwrap();
//! let close = drawer.mount_close(&mut doc, content, Slot::own(Tag::Button)).unwrap();
//!
//! dispatch(&mut doc, &mut [&mut drawer], DomEvent::PointerDown(PointerEvent::new(trigger)), 0);
//! assert!(drawer.is_open());
//! // Focus moves in on the next tick.
//! advance(&mut doc, &mut [&mut drawer], 16);
//! assert_eq!(doc.active_element(), Some(close));
//!
//! dispatch(&mut doc, &mut [&mut drawer], DomEvent::KeyDown(KeyboardEvent::new(Key::Escape, close)), 32);
//! advance(&mut doc, &mut [&mut drawer], 48);
//! assert!(!drawer.is_open());
//! assert_eq!(doc.active_element(), Some(trigger));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod disclosure;
mod drawer;
mod floating;
mod host;
mod list;
mod listbox;
mod multi_select;
mod parts;

pub use disclosure::{
    AutoFocusEvent, ContentOptions, Disclosure, DisclosureTask, DismissHooks, Presence, Transition,
};
pub use drawer::Drawer;
pub use floating::{Floating, FloatingOptions};
pub use host::{MAX_PUMP_ROUNDS, advance, dispatch, next_due, pump};
pub use listbox::Listbox;
pub use multi_select::MultiSelect;

use veil_dom::{DomEvent, Document};

/// A widget the host drives.
pub trait Widget {
    /// See one host event. Widgets ignore events outside their parts.
    ///
    /// `now` is the host clock in milliseconds.
    fn handle_event(&mut self, doc: &mut Document, event: &mut DomEvent, now: u64);

    /// Run deferred work due at `now`.
    fn tick(&mut self, doc: &mut Document, now: u64);

    /// When deferred work is next due, if any.
    fn next_due(&self) -> Option<u64> {
        None
    }
}
