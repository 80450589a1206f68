// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Popover anchored to its trigger.

use kurbo::{Rect, Size};
use veil_compose::{HandlerChain, NodeRef, Slot};
use veil_dismiss::FocusOutside;
use veil_dom::{
    Cancelable, DomError, DomEvent, Document, FocusEvent, Key, KeyboardEvent, NodeId,
};
use veil_focus::{get_all_focusable, get_first_focusable, trap_tab};
use veil_position::{FlipSolver, FloatingRequest, Position, PositionSolver};

use crate::Widget;
use crate::parts::PartBindings;
use crate::disclosure::{
    Disclosure, DisclosureTask, DismissHooks, Presence, Transition, bind_trigger,
    is_trigger_activation, return_focus, set_data_open, sync_trigger,
};

/// Options of the [`Floating`] content.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FloatingOptions {
    /// Gap between trigger and content, in pixels.
    pub offset: f64,
    /// Keep the content attached while closed.
    pub force_mount: bool,
    /// Give the content exactly the trigger's width. Otherwise the trigger width
    /// is a minimum.
    pub fit_trigger: bool,
}

impl Default for FloatingOptions {
    fn default() -> Self {
        Self {
            offset: 0.0,
            force_mount: false,
            fit_trigger: true,
        }
    }
}

impl FloatingOptions {
    /// Set the trigger gap.
    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Keep the content attached while closed.
    pub fn with_force_mount(mut self, force_mount: bool) -> Self {
        self.force_mount = force_mount;
        self
    }

    /// Toggle exact trigger width.
    pub fn with_fit_trigger(mut self, fit_trigger: bool) -> Self {
        self.fit_trigger = fit_trigger;
        self
    }
}

/// A non-modal popover: trigger and content.
///
/// Tab is scoped to the content while focus is inside it. Escape closes, and so
/// does focus leaving the content once the popover has settled open. Placement is
/// delegated to a [`PositionSolver`]; the host reports geometry through
/// [`update_position`](Self::update_position) and reads the result back.
#[derive(Debug)]
pub struct Floating<S = FlipSolver> {
    disclosure: Disclosure,
    hooks: DismissHooks,
    options: FloatingOptions,
    content: Option<Presence>,
    blur: FocusOutside,
    armed: bool,
    parts: PartBindings,
    solver: S,
    position: Option<Position>,
}

impl Floating {
    /// A popover with the caller's `open` and `default_open` props, placed by
    /// [`FlipSolver::default`].
    pub fn new(open: Option<bool>, default_open: Option<bool>) -> Self {
        Self {
            disclosure: Disclosure::new(open, default_open),
            hooks: DismissHooks::new(),
            options: FloatingOptions::default(),
            content: None,
            blur: FocusOutside::new(),
            armed: false,
            parts: PartBindings::new(),
            solver: FlipSolver::default(),
            position: None,
        }
    }
}

impl<S: PositionSolver> Floating<S> {
    /// Replace the placement solver.
    pub fn with_solver<T: PositionSolver>(self, solver: T) -> Floating<T> {
        Floating {
            disclosure: self.disclosure,
            hooks: self.hooks,
            options: self.options,
            content: self.content,
            blur: self.blur,
            armed: self.armed,
            parts: self.parts,
            solver,
            position: None,
        }
    }

    /// Set the `on_open_change` callback.
    pub fn with_on_open_change(mut self, on_open_change: impl FnMut(bool) + 'static) -> Self {
        self.disclosure = self.disclosure.with_on_open_change(on_open_change);
        self
    }

    /// Run `handlers` before the popover's own handling of events inside `part`.
    ///
    /// A handler that prevents the default, or stops the chain, keeps the popover
    /// from acting on that event.
    pub fn add_part_handlers(&mut self, part: NodeId, handlers: HandlerChain<DomEvent>) {
        self.parts.add_handlers(part, handlers);
    }

    /// Also assign the content element to `node_ref` when it mounts.
    pub fn with_content_ref(mut self, node_ref: &NodeRef) -> Self {
        self.parts.push_content_ref(node_ref);
        self
    }

    /// Set the dismiss and auto-focus hooks.
    pub fn with_hooks(mut self, hooks: DismissHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Whether the popover is open.
    pub fn is_open(&self) -> bool {
        self.disclosure.is_open()
    }

    /// The trigger element, once mounted.
    pub fn trigger(&self) -> Option<NodeId> {
        self.disclosure.trigger().get()
    }

    /// The content element, once mounted.
    pub fn content(&self) -> Option<NodeId> {
        self.content.map(|c| c.node())
    }

    /// The last solved position.
    pub fn position(&self) -> Option<Position> {
        self.position
    }

    /// Mount the trigger.
    pub fn mount_trigger(
        &mut self,
        doc: &mut Document,
        parent: NodeId,
        slot: Slot,
    ) -> Result<NodeId, DomError> {
        let node = slot.mount(doc, parent)?;
        bind_trigger(doc, &self.disclosure, node, "dialog");
        Ok(node)
    }

    /// Mount the content surface with `options`.
    pub fn mount_content(
        &mut self,
        doc: &mut Document,
        parent: NodeId,
        slot: Slot,
        options: FloatingOptions,
    ) -> Result<NodeId, DomError> {
        let node = slot.mount(doc, parent)?;
        let parent = doc.parent_of(node).unwrap_or(parent);
        if let Some(element) = doc.element_mut(node) {
            element.tab_index = Some(-1);
        }
        self.blur.region().set(Some(node));
        self.parts.assign_content(Some(node));
        self.options = options;
        self.content = Some(Presence::new(node, parent, options.force_mount));
        self.sync_parts(doc);
        Ok(node)
    }

    /// Request a new open state. Returns whether the request was accepted.
    pub fn set_open(&mut self, doc: &mut Document, open: bool, now: u64) -> bool {
        let accepted = self.disclosure.set_open(open);
        self.reconcile(doc, now);
        accepted
    }

    /// Re-render with the caller's current `open` prop.
    pub fn sync_open(&mut self, doc: &mut Document, open: Option<bool>, now: u64) {
        self.disclosure.sync_open(open);
        self.reconcile(doc, now);
    }

    /// Cancel deferred focus work and disarm the blur detector.
    pub fn unmount(&mut self) {
        self.disclosure.cancel_pending();
        self.armed = false;
        self.parts.assign_content(None);
    }

    /// Place the content next to `anchor` (the trigger's rectangle) inside
    /// `viewport`, given the content's natural size.
    ///
    /// Writes `data-side` on the content. Returns `None` before the content is
    /// mounted.
    pub fn update_position(
        &mut self,
        doc: &mut Document,
        anchor: Rect,
        floating: Size,
        viewport: Rect,
    ) -> Option<Position> {
        let content = self.content()?;
        let request = FloatingRequest::new(anchor, floating, viewport)
            .with_offset(self.options.offset)
            .with_fit_anchor(self.options.fit_trigger);
        let position = self.solver.solve(&request);
        doc.set_attribute(content, "data-side", position.placement.side.as_str());
        self.position = Some(position);
        Some(position)
    }

    fn reconcile(&mut self, doc: &mut Document, now: u64) -> Option<Transition> {
        let transition = self.disclosure.reconcile(now);
        if transition == Some(Transition::Closed) {
            self.armed = false;
        }
        self.sync_parts(doc);
        transition
    }

    fn sync_parts(&self, doc: &mut Document) {
        let open = self.disclosure.is_open();
        sync_trigger(doc, &self.disclosure);
        if let Some(content) = self.content {
            content.sync(doc, open);
            set_data_open(doc, content.node(), open);
        }
    }

    fn handle_key_down(&mut self, doc: &mut Document, event: &mut KeyboardEvent) {
        if event.is_default_prevented() || !self.is_open() {
            return;
        }
        let Some(content) = self.content().filter(|c| doc.contains(*c, event.target)) else {
            return;
        };
        match event.key {
            Key::Escape => {
                self.hooks.escape_key_down(event);
                if !event.is_default_prevented() {
                    self.disclosure.set_open(false);
                }
            }
            Key::Tab => {
                trap_tab(doc, content, event);
            }
            _ => {}
        }
    }

    fn handle_focus(&mut self, doc: &Document, event: &mut FocusEvent) {
        if !self.armed || !self.is_open() {
            return;
        }
        let hooks = &mut self.hooks;
        let left = self
            .blur
            .handle_blur(doc, event, |e| hooks.blur_outside(e));
        if left && !event.is_default_prevented() {
            self.disclosure.set_open(false);
        }
    }

    fn focus_content(&self, doc: &mut Document) {
        let content = self.content();
        let first = get_all_focusable(doc, content).first().copied();
        get_first_focusable(doc, [first, content]);
    }
}

impl<S: PositionSolver> Widget for Floating<S> {
    fn handle_event(&mut self, doc: &mut Document, event: &mut DomEvent, now: u64) {
        if !self.parts.run(doc, event) {
            self.reconcile(doc, now);
            return;
        }
        if is_trigger_activation(doc, self.trigger(), event) {
            self.disclosure.set_open(true);
        } else {
            match event {
                DomEvent::KeyDown(key) => self.handle_key_down(doc, key),
                DomEvent::Focus(focus) => self.handle_focus(doc, focus),
                _ => {}
            }
        }
        self.reconcile(doc, now);
    }

    fn tick(&mut self, doc: &mut Document, now: u64) {
        if self.reconcile(doc, now).is_some() {
            return;
        }
        for task in self.disclosure.run_due(now) {
            match task {
                DisclosureTask::OpenAutoFocus => {
                    if self.hooks.open_auto_focus() {
                        self.focus_content(doc);
                    }
                }
                DisclosureTask::CloseAutoFocus => {
                    if self.hooks.close_auto_focus() {
                        return_focus(doc, self.trigger());
                    }
                }
                DisclosureTask::ArmOutside => self.armed = self.is_open(),
            }
        }
    }

    fn next_due(&self) -> Option<u64> {
        self.disclosure.next_due()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{advance, dispatch};
    use veil_dom::{Element, Modifiers, PointerEvent, Tag};
    use veil_position::{Placement, Side};

    struct Fixture<S> {
        doc: Document,
        floating: Floating<S>,
        trigger: NodeId,
        outside: NodeId,
        content: NodeId,
    }

    fn fixture<S: PositionSolver>(mut floating: Floating<S>, options: FloatingOptions) -> Fixture<S> {
        let mut doc = Document::new();
        let body = doc.body();
        let trigger = floating
            .mount_trigger(&mut doc, body, Slot::own(Tag::Button))
            .unwrap();
        let outside = doc.create_element(Element::new(Tag::Input));
        doc.append_child(body, outside).unwrap();
        let content = floating
            .mount_content(&mut doc, body, Slot::default(), options)
            .unwrap();
        Fixture {
            doc,
            floating,
            trigger,
            outside,
            content,
        }
    }

    impl<S: PositionSolver> Fixture<S> {
        fn add_button(&mut self) -> NodeId {
            let b = self.doc.create_element(Element::new(Tag::Button));
            self.doc.append_child(self.content, b).unwrap();
            b
        }

        fn send(&mut self, event: DomEvent, now: u64) {
            dispatch(&mut self.doc, &mut [&mut self.floating], event, now);
        }

        fn tick(&mut self, now: u64) {
            advance(&mut self.doc, &mut [&mut self.floating], now);
        }
    }

    #[test]
    fn enter_on_trigger_opens_and_focuses_first_focusable() {
        let mut f = fixture(Floating::new(None, None), FloatingOptions::default());
        let first = f.add_button();
        f.add_button();

        f.send(DomEvent::KeyDown(KeyboardEvent::new(Key::Enter, f.trigger)), 0);
        assert!(f.floating.is_open());
        assert_eq!(f.doc.attribute(f.content, "data-open"), Some("true"));
        f.tick(1);
        assert_eq!(f.doc.active_element(), Some(first));

        f.send(DomEvent::KeyDown(KeyboardEvent::new(Key::Escape, first)), 2);
        assert!(!f.floating.is_open());
        f.tick(3);
        assert_eq!(f.doc.active_element(), Some(f.trigger));
    }

    #[test]
    fn empty_content_takes_focus_itself_and_swallows_tab() {
        let mut f = fixture(Floating::new(None, None), FloatingOptions::default());
        f.send(DomEvent::PointerDown(PointerEvent::new(f.trigger)), 0);
        f.tick(1);
        assert_eq!(f.doc.active_element(), Some(f.content));

        let back = KeyboardEvent::new(Key::Tab, f.content).with_modifiers(Modifiers::SHIFT);
        f.send(DomEvent::KeyDown(back), 2);
        f.send(DomEvent::KeyDown(KeyboardEvent::new(Key::Tab, f.content)), 3);
        assert_eq!(f.doc.active_element(), Some(f.content));
        assert!(f.floating.is_open());
    }

    #[test]
    fn tab_wraps_between_content_edges() {
        let mut f = fixture(Floating::new(None, None), FloatingOptions::default());
        let first = f.add_button();
        let last = f.add_button();
        f.send(DomEvent::PointerDown(PointerEvent::new(f.trigger)), 0);
        f.tick(1);

        f.send(DomEvent::KeyDown(KeyboardEvent::new(Key::Tab, first)), 2);
        assert_eq!(f.doc.active_element(), Some(last));
        f.send(DomEvent::KeyDown(KeyboardEvent::new(Key::Tab, last)), 3);
        assert_eq!(f.doc.active_element(), Some(first));
        assert!(f.floating.is_open());
    }

    #[test]
    fn focus_leaving_content_closes_and_refocuses_trigger() {
        let mut f = fixture(Floating::new(None, None), FloatingOptions::default());
        f.add_button();
        f.send(DomEvent::KeyDown(KeyboardEvent::new(Key::Enter, f.trigger)), 0);
        f.tick(1);

        f.send(DomEvent::PointerDown(PointerEvent::new(f.outside)), 2);
        assert!(!f.floating.is_open());
        assert!(!f.doc.is_connected(f.content));
        assert_eq!(f.doc.active_element(), Some(f.outside));
        f.tick(3);
        assert_eq!(f.doc.active_element(), Some(f.trigger));
    }

    #[test]
    fn close_auto_focus_hook_leaves_focus_outside() {
        let hooks = DismissHooks::new().with_on_close_auto_focus(|e| e.prevent_default());
        let mut f = fixture(Floating::new(None, None).with_hooks(hooks), FloatingOptions::default());
        f.add_button();
        f.send(DomEvent::PointerDown(PointerEvent::new(f.trigger)), 0);
        f.tick(1);

        f.send(DomEvent::PointerDown(PointerEvent::new(f.outside)), 2);
        assert!(!f.floating.is_open());
        f.tick(3);
        assert_eq!(f.doc.active_element(), Some(f.outside));
    }

    #[test]
    fn unmount_cancels_the_initial_focus_move() {
        let mut f = fixture(Floating::new(None, None), FloatingOptions::default());
        f.add_button();
        f.send(DomEvent::PointerDown(PointerEvent::new(f.trigger)), 0);
        f.floating.unmount();
        assert_eq!(f.floating.next_due(), None);
        f.tick(1);
        assert_eq!(f.doc.active_element(), None);
    }

    #[test]
    fn blur_hook_can_keep_it_open() {
        let hooks = DismissHooks::new().with_on_blur_outside(|e| e.prevent_default());
        let mut f = fixture(Floating::new(None, None).with_hooks(hooks), FloatingOptions::default());
        f.add_button();
        f.send(DomEvent::PointerDown(PointerEvent::new(f.trigger)), 0);
        f.tick(1);

        f.send(DomEvent::PointerDown(PointerEvent::new(f.outside)), 2);
        assert!(f.floating.is_open());
    }

    #[test]
    fn position_flips_and_marks_side() {
        let mut f = fixture(
            Floating::new(None, None),
            FloatingOptions::default().with_offset(4.0),
        );
        let viewport = Rect::new(0.0, 0.0, 400.0, 300.0);
        let anchor = Rect::new(10.0, 260.0, 110.0, 280.0);
        let pos = f
            .floating
            .update_position(&mut f.doc, anchor, Size::new(60.0, 100.0), viewport)
            .unwrap();
        assert_eq!(pos.placement.side, Side::Top);
        assert_eq!(pos.width, 100.0);
        assert_eq!(f.doc.attribute(f.content, "data-side"), Some("top"));
        assert_eq!(f.floating.position(), Some(pos));
    }

    #[derive(Debug)]
    struct AlwaysRight;

    impl PositionSolver for AlwaysRight {
        fn solve(&self, request: &FloatingRequest) -> Position {
            let placement = Placement::new(Side::Right, veil_position::Align::Start);
            Position {
                origin: placement.origin(request.anchor, request.floating, request.offset),
                placement,
                fits: true,
                flipped: false,
                width: request.floating.width,
            }
        }
    }

    #[test]
    fn custom_solver_is_consulted() {
        let floating = Floating::new(None, None).with_solver(AlwaysRight);
        let mut f = fixture(floating, FloatingOptions::default().with_fit_trigger(false));
        let viewport = Rect::new(0.0, 0.0, 400.0, 300.0);
        let anchor = Rect::new(10.0, 10.0, 50.0, 30.0);
        f.floating
            .update_position(&mut f.doc, anchor, Size::new(80.0, 40.0), viewport);
        assert_eq!(f.doc.attribute(f.content, "data-side"), Some("right"));
    }
}
