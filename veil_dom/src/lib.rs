// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Veil DOM: a small host element model for headless focus and disclosure behavior.
//!
//! The behavior crates in this workspace never talk to a real browser. They operate
//! on a [`Document`]: a generational element tree with one connected `<body>` root,
//! a single focused element, a document-level listener table, and a page-wide
//! pointer-events lock.
//!
//! - Nodes are created detached and connected by appending them under the body.
//!   Detached subtrees stay alive, which models content that is "not rendered".
//! - [`Document::focus`] only moves focus to connected nodes that accept focus, and
//!   queues `blur`/`focusout`/`focus`/`focusin` events with related targets. Hosts
//!   drain them with [`Document::take_focus_events`] and route them to widgets.
//! - [`Element::matches_focusable`] is the focusable-candidate predicate used by
//!   the focus crate; [`Element::accepts_focus`] is the wider "can receive
//!   programmatic focus" rule.
//! - [`PointerEventsLock`] is a nesting RAII guard over the page's
//!   `pointer-events` value.
//!
//! ## API overview
//!
//! - [`Document`]: tree structure, queries, focus, listeners, pointer events.
//! - [`Element`], [`Tag`], [`ElementFlags`]: per-node element data.
//! - [`NodeId`]: generational handle of a node.
//! - [`KeyboardEvent`], [`PointerEvent`], [`FocusEvent`], [`DomEvent`]: events with a
//!   sticky `default_prevented` flag ([`Cancelable`]).
//!
//! ## Example
//!
//! ```rust
//! use veil_dom::{Document, Element, FocusEventKind, Tag};
//!
//! let mut doc = Document::new();
//! let body = doc.body();
//! let a = doc.create_element(Element::new(Tag::Button));
//! let b = doc.create_element(Element::new(Tag::Input));
//! doc.append_child(body, a).unwrap();
//! doc.append_child(body, b).unwrap();
//!
//! doc.focus(a);
//! doc.take_focus_events();
//! doc.focus(b);
//! let events = doc.take_focus_events();
//! assert_eq!(events[0].kind, FocusEventKind::Blur);
//! assert_eq!(events[0].related_target, Some(b));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod document;
mod error;
mod event;
mod page;
mod types;

pub use document::{Descendants, Document};
pub use error::DomError;
pub use event::{
    Cancelable, DomEvent, FocusEvent, FocusEventKind, Key, KeyboardEvent, Modifiers, PointerEvent,
};
pub use page::{ListenerId, ListenerKind, PointerEventsLock};
pub use types::{Element, ElementFlags, NodeId, Tag};
