// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input and focus events delivered by the host.
//!
//! Every event carries a `default_prevented` flag. Handlers flag it through
//! [`Cancelable::prevent_default`]; default actions check it afterward. Setting the
//! flag never stops other handlers from running.

use crate::NodeId;

/// Events whose default action can be canceled.
pub trait Cancelable {
    /// Flag the event as default-prevented.
    fn prevent_default(&mut self);
    /// Whether any handler flagged the event.
    fn is_default_prevented(&self) -> bool;
}

/// A logical key, following `KeyboardEvent.code` for named keys.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// `Tab`
    Tab,
    /// `Escape`
    Escape,
    /// `Enter`
    Enter,
    /// `Space`
    Space,
    /// `ArrowUp`
    ArrowUp,
    /// `ArrowDown`
    ArrowDown,
    /// `ArrowLeft`
    ArrowLeft,
    /// `ArrowRight`
    ArrowRight,
    /// `Home`
    Home,
    /// `End`
    End,
    /// A key producing a single printable character.
    Character(char),
    /// Anything else.
    Unidentified,
}

bitflags::bitflags! {
    /// Keyboard modifiers held during an event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT = 0b0000_0001;
        /// Control.
        const CTRL  = 0b0000_0010;
        /// Alt / Option.
        const ALT   = 0b0000_0100;
        /// Meta / Command.
        const META  = 0b0000_1000;
    }
}

/// A `keydown` event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyboardEvent {
    /// The key pressed.
    pub key: Key,
    /// Modifiers held.
    pub modifiers: Modifiers,
    /// The element the event was dispatched to (normally the focused element).
    pub target: NodeId,
    default_prevented: bool,
}

impl KeyboardEvent {
    /// A keydown of `key` on `target` without modifiers.
    pub fn new(key: Key, target: NodeId) -> Self {
        Self {
            key,
            modifiers: Modifiers::empty(),
            target,
            default_prevented: false,
        }
    }

    /// Add modifiers.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers |= modifiers;
        self
    }

    /// Shift is held.
    pub fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    /// Control or Meta is held.
    pub fn command(&self) -> bool {
        self.modifiers.intersects(Modifiers::CTRL | Modifiers::META)
    }

    /// The single character this key produces, if any.
    ///
    /// `Space` produces `' '`.
    pub fn printable(&self) -> Option<char> {
        match self.key {
            Key::Character(c) => Some(c),
            Key::Space => Some(' '),
            _ => None,
        }
    }
}

impl Cancelable for KeyboardEvent {
    fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// A pointer event (`pointerdown`, `mouseenter`, `click`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PointerEvent {
    /// The element under the pointer, after pointer-events retargeting.
    pub target: NodeId,
    default_prevented: bool,
}

impl PointerEvent {
    /// A pointer event on `target`.
    pub fn new(target: NodeId) -> Self {
        Self {
            target,
            default_prevented: false,
        }
    }
}

impl Cancelable for PointerEvent {
    fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Kind of a focus event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FocusEventKind {
    /// `focus`: the target gained focus. Does not bubble.
    Focus,
    /// `blur`: the target lost focus. Does not bubble.
    Blur,
    /// `focusin`: bubbling counterpart of `focus`.
    FocusIn,
    /// `focusout`: bubbling counterpart of `blur`.
    FocusOut,
}

impl FocusEventKind {
    /// Whether the event propagates to ancestors of its target.
    pub const fn bubbles(self) -> bool {
        matches!(self, Self::FocusIn | Self::FocusOut)
    }
}

/// A focus event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FocusEvent {
    /// Kind of event.
    pub kind: FocusEventKind,
    /// The element gaining or losing focus.
    pub target: NodeId,
    /// For blur/focusout, the element receiving focus; for focus/focusin, the
    /// element losing it. `None` when focus comes from or goes to nowhere.
    pub related_target: Option<NodeId>,
    default_prevented: bool,
}

impl FocusEvent {
    /// A focus event of `kind` on `target`.
    pub fn new(kind: FocusEventKind, target: NodeId, related_target: Option<NodeId>) -> Self {
        Self {
            kind,
            target,
            related_target,
            default_prevented: false,
        }
    }
}

impl Cancelable for FocusEvent {
    fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Envelope for everything a host routes to widgets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomEvent {
    /// `keydown`
    KeyDown(KeyboardEvent),
    /// `pointerdown`
    PointerDown(PointerEvent),
    /// `mouseenter`
    MouseEnter(PointerEvent),
    /// `click`
    Click(PointerEvent),
    /// `focus`, `blur`, `focusin`, `focusout`
    Focus(FocusEvent),
}

impl DomEvent {
    /// The event's target.
    pub fn target(&self) -> NodeId {
        match self {
            Self::KeyDown(e) => e.target,
            Self::PointerDown(e) | Self::MouseEnter(e) | Self::Click(e) => e.target,
            Self::Focus(e) => e.target,
        }
    }

    /// Whether any handler flagged the event.
    pub fn is_default_prevented(&self) -> bool {
        match self {
            Self::KeyDown(e) => e.is_default_prevented(),
            Self::PointerDown(e) | Self::MouseEnter(e) | Self::Click(e) => {
                e.is_default_prevented()
            }
            Self::Focus(e) => e.is_default_prevented(),
        }
    }
}
