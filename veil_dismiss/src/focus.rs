// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus-outside (blur-outside) detection.

use veil_compose::NodeRef;
use veil_dom::{Document, FocusEvent, FocusEventKind};
use veil_focus::is_focused_outside;

/// Reports focus leaving a region.
///
/// Feed it the `focusout` events that bubble through the region (the `blur`
/// handler of the region element). A move whose `related_target` is missing or
/// lies outside the region is reported; moves between descendants are not.
#[derive(Clone, Debug, Default)]
pub struct FocusOutside {
    region: NodeRef,
}

impl FocusOutside {
    /// A detector with no region.
    pub fn new() -> Self {
        Self::default()
    }

    /// The region ref.
    pub fn region(&self) -> &NodeRef {
        &self.region
    }

    /// Feed a focus event. Runs `on_blur_outside` and returns `true` when focus left
    /// the region.
    ///
    /// The callback may `prevent_default` the event; the caller treats a prevented
    /// event as informational only.
    pub fn handle_blur(
        &self,
        doc: &Document,
        event: &mut FocusEvent,
        on_blur_outside: impl FnOnce(&mut FocusEvent),
    ) -> bool {
        if event.kind != FocusEventKind::FocusOut {
            return false;
        }
        let Some(region) = self.region.get() else {
            return false;
        };
        if !doc.contains(region, event.target) {
            return false;
        }
        if !is_focused_outside(doc, region, event.related_target) {
            return false;
        }
        tracing::trace!(?region, related = ?event.related_target, "focus left region");
        on_blur_outside(event);
        true
    }
}
