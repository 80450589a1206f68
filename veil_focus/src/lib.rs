// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Veil Focus: focus management primitives over a [`veil_dom::Document`].
//!
//! - [`get_all_focusable`]: the live, document-ordered set of focusable candidates
//!   under a root. Never cached.
//! - [`get_first_focusable`]: focus the first candidate that actually takes focus.
//! - [`is_focused_outside`]: whether a focus move's related target leaves a region.
//! - [`trap_tab`] and [`FocusTrap`]: keep Tab traversal cycling inside a region, with
//!   optional auto-focus on entry and focus restoration on unbind.
//! - [`FocusWithin`]: enter/leave transitions of focus inside a region.
//! - [`next_tab_stop`] and [`perform_default_tab`]: the browser's sequential
//!   navigation, for hosts that perform default actions themselves.
//!
//! ## Example
//!
//! ```rust
//! use veil_dom::{Document, Element, Key, KeyboardEvent, Tag};
//! use veil_focus::trap_tab;
//!
//! let mut doc = Document::new();
//! let dialog = doc.create_element(Element::new(Tag::Div));
//! doc.append_child(doc.body(), dialog).unwrap();
//! let ok = doc.create_element(Element::new(Tag::Button));
//! let cancel = doc.create_element(Element::new(Tag::Button));
//! doc.append_child(dialog, ok).unwrap();
//! doc.append_child(dialog, cancel).unwrap();
//!
//! // Tab from the last candidate wraps to the first.
//! doc.focus(cancel);
//! let mut tab = KeyboardEvent::new(Key::Tab, cancel);
//! assert!(trap_tab(&mut doc, dialog, &mut tab));
//! assert_eq!(doc.active_element(), Some(ok));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod focusable;
mod navigation;
mod trap;
mod within;

pub use focusable::{get_all_focusable, get_first_focusable, is_focused_outside};
pub use navigation::{Navigation, WrapMode, next_tab_stop, perform_default_tab, tab_order};
pub use trap::{FocusTrap, FocusTrapOptions, trap_tab};
pub use within::{FocusWithin, FocusWithinChange};
