// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Veil Compose: plumbing for attaching several behaviors to one element.
//!
//! - [`HandlerChain`] and [`compose_event_handlers`]: ordered handlers for one
//!   event. Cancelation is a flag on the event ([`veil_dom::Cancelable`]), checked
//!   by handlers that perform default actions ([`unless_prevented`]).
//! - [`NodeRef`] and [`ComposedRefs`]: a single "assign node" operation forwarded to
//!   every consumer, left to right.
//! - [`Slot`]: a part renders its own element or delegates to a provided one.
//!
//! ## Example
//!
//! ```rust
//! use veil_compose::{ComposedRefs, NodeRef, Slot};
//! use veil_dom::{Document, Tag};
//!
//! let mut doc = Document::new();
//! let body = doc.body();
//! let trigger = NodeRef::new();
//! let user_ref = NodeRef::new();
//! let mut refs = ComposedRefs::new().with_ref(&trigger).with_ref(&user_ref);
//!
//! let node = Slot::own(Tag::Button).mount(&mut doc, body).unwrap();
//! refs.assign(Some(node));
//! assert_eq!(trigger.get(), Some(node));
//! assert_eq!(user_ref.get(), Some(node));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod handlers;
mod refs;
mod slot;

pub use handlers::{Handler, HandlerChain, Outcome, compose_event_handlers, unless_prevented};
pub use refs::{ComposedRefs, NodeRef};
pub use slot::Slot;
