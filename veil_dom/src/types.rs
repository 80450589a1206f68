// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the document: node identifiers, tags, flags, and element data.

use alloc::string::String;
use smallvec::SmallVec;

/// Identifier for a node in the document (generational).
///
/// A `NodeId` is a weak handle: holding one does not keep the node alive, and a
/// destroyed node's id never aliases a node created later in the same slot.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Element tag names the behavior layer distinguishes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    /// `<a>`
    A,
    /// `<area>`
    Area,
    /// `<body>`; the document root.
    Body,
    /// `<button>`
    Button,
    /// `<div>`
    Div,
    /// `<input>`
    Input,
    /// `<select>`
    Select,
    /// `<span>`
    Span,
    /// `<textarea>`
    Textarea,
}

impl Tag {
    /// Form controls that accept focus unless disabled.
    pub const fn is_form_control(self) -> bool {
        matches!(self, Self::Input | Self::Select | Self::Textarea | Self::Button)
    }
}

bitflags::bitflags! {
    /// Boolean element attributes.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ElementFlags: u8 {
        /// The `disabled` attribute.
        const DISABLED = 0b0000_0001;
        /// An `href` attribute is present.
        const HREF = 0b0000_0010;
        /// `pointer-events: auto`; the subtree keeps receiving pointer input while
        /// the page-level pointer-events lock is held.
        const POINTER_EVENTS_AUTO = 0b0000_0100;
    }
}

/// Element data stored per node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    /// Tag name.
    pub tag: Tag,
    /// Boolean attributes.
    pub flags: ElementFlags,
    /// The `tabindex` attribute, if present.
    pub tab_index: Option<i32>,
    /// The `contenteditable` attribute, if present; `Some(false)` is `"false"`.
    pub content_editable: Option<bool>,
    /// Remaining string attributes (`data-*`, `aria-*`, `role`, ...).
    pub attributes: SmallVec<[(String, String); 4]>,
}

impl Element {
    /// A bare element with no attributes.
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            flags: ElementFlags::empty(),
            tab_index: None,
            content_editable: None,
            attributes: SmallVec::new(),
        }
    }

    /// Set the `href` attribute.
    pub fn with_href(mut self) -> Self {
        self.flags |= ElementFlags::HREF;
        self
    }

    /// Set the `disabled` attribute.
    pub fn disabled(mut self) -> Self {
        self.flags |= ElementFlags::DISABLED;
        self
    }

    /// Set the `tabindex` attribute.
    pub fn with_tab_index(mut self, tab_index: i32) -> Self {
        self.tab_index = Some(tab_index);
        self
    }

    /// Set the `contenteditable` attribute.
    pub fn with_content_editable(mut self, editable: bool) -> Self {
        self.content_editable = Some(editable);
        self
    }

    /// Whether the element is disabled.
    pub fn is_disabled(&self) -> bool {
        self.flags.contains(ElementFlags::DISABLED)
    }

    /// Whether the element matches the focusable-candidate predicate:
    ///
    /// - `a[href]`, `area[href]`
    /// - `input`, `select`, `textarea`, `button` without `disabled`
    /// - `[tabindex]` unless `tabindex="-1"`
    /// - `[contenteditable]` unless `contenteditable="false"`
    pub fn matches_focusable(&self) -> bool {
        let link = matches!(self.tag, Tag::A | Tag::Area) && self.flags.contains(ElementFlags::HREF);
        let control = self.tag.is_form_control() && !self.is_disabled();
        let tab_stop = self.tab_index.is_some_and(|t| t != -1);
        let editable = self.content_editable == Some(true);
        link || control || tab_stop || editable
    }

    /// Whether `focus()` on this element moves focus.
    ///
    /// This is wider than [`Element::matches_focusable`]: any `tabindex`, including
    /// `-1`, makes an element programmatically focusable. Disabled form controls
    /// never are.
    pub fn accepts_focus(&self) -> bool {
        if self.tag.is_form_control() && self.is_disabled() {
            return false;
        }
        self.matches_focusable() || self.tab_index.is_some()
    }

    pub(crate) fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub(crate) fn set_attribute(&mut self, name: &str, value: &str) -> bool {
        if let Some((_, v)) = self.attributes.iter_mut().find(|(n, _)| n == name) {
            if v == value {
                return false;
            }
            v.clear();
            v.push_str(value);
        } else {
            self.attributes.push((String::from(name), String::from(value)));
        }
        true
    }

    pub(crate) fn remove_attribute(&mut self, name: &str) -> bool {
        let before = self.attributes.len();
        self.attributes.retain(|(n, _)| n != name);
        before != self.attributes.len()
    }
}
