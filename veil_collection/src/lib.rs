// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Veil Collection: the item model behind list widgets.
//!
//! - [`CollectionRegistry`]: items register their node and [`ItemData`]; reads walk
//!   the container's current subtree and return present items in document order.
//! - [`TypeaheadBuffer`] and [`typeahead_search`]: focus an item by typing the start of
//!   its text, with repeated-character cycling.
//! - [`produce_toggle_value`], [`select_all_or_none`], [`next_item`]: selection and
//!   arrow-key navigation steps.
//!
//! ## Example
//!
//! ```rust
//! use veil_collection::{CollectionRegistry, ItemData};
//! use veil_dom::{Document, Element, Tag};
//!
//! let mut doc = Document::new();
//! let list = doc.create_element(Element::new(Tag::Div));
//! doc.append_child(doc.body(), list).unwrap();
//! let a = doc.create_element(Element::new(Tag::Div));
//! let b = doc.create_element(Element::new(Tag::Div));
//! doc.append_child(list, a).unwrap();
//! doc.append_child(list, b).unwrap();
//!
//! let mut registry = CollectionRegistry::new();
//! registry.container().set(Some(list));
//! registry.register(b, ItemData::new("b", "Banana"));
//! registry.register(a, ItemData::new("a", "Apple"));
//!
//! let texts: Vec<&str> = registry
//!     .ordered_items(&doc)
//!     .iter()
//!     .map(|item| item.data.text.as_str())
//!     .collect();
//! assert_eq!(texts, ["Apple", "Banana"]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod registry;
mod selection;
mod typeahead;

pub use registry::{CollectionData, CollectionItem, CollectionRegistry, ItemData};
pub use selection::{Direction, next_item, produce_toggle_value, select_all_or_none};
pub use typeahead::{DEFAULT_TYPEAHEAD_TIMEOUT, TypeaheadBuffer, typeahead_search};
