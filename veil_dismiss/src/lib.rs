// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Veil Dismiss: outside-interaction detectors for dismissible surfaces.
//!
//! - [`PointerDownOutside`]: one document-level `pointerdown` registration while
//!   enabled, plus the page pointer-events lock; reports pointer-downs whose target
//!   is not contained in the region.
//! - [`FocusOutside`]: reports `focusout` events from inside the region whose
//!   related target is missing or outside it.
//!
//! Both hand the event to a callback that may `prevent_default` it. A prevented
//! event is informational: the owning widget checks the flag and skips dismissal.
//!
//! ## Example
//!
//! ```rust
//! use veil_dismiss::PointerDownOutside;
//! use veil_dom::{Cancelable, Document, Element, PointerEvent, Tag};
//!
//! let mut doc = Document::new();
//! let surface = doc.create_element(Element::new(Tag::Div));
//! doc.append_child(doc.body(), surface).unwrap();
//!
//! let mut outside = PointerDownOutside::new();
//! outside.region().set(Some(surface));
//! outside.set_enabled(&mut doc, true);
//!
//! let mut ev = PointerEvent::new(doc.body());
//! let mut dismiss = false;
//! if outside.handle_pointer_down(&doc, &mut ev, |_| {}) && !ev.is_default_prevented() {
//!     dismiss = true;
//! }
//! assert!(dismiss);
//!
//! outside.set_enabled(&mut doc, false);
//! assert!(!doc.pointer_events_disabled());
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod focus;
mod pointer;

pub use focus::FocusOutside;
pub use pointer::PointerDownOutside;
