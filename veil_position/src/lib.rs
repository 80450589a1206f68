// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Veil Position: where a floating surface goes relative to its anchor.
//!
//! Widgets treat placement as a collaborator. They describe the situation with a
//! [`FloatingRequest`] (anchor rectangle, floating size, viewport, offset) and get
//! back a [`Position`]: the origin to place the surface at, the resolved
//! [`Placement`], whether it fits the viewport, and whether it had to flip to the
//! other side.
//!
//! [`FlipSolver`] is the default [`PositionSolver`]. It prefers `bottom-start` and
//! falls back through `bottom`, `bottom-end`, `top-start`, `top`, and `top-end`,
//! taking the first placement that fits. The surface is at least as wide as the
//! anchor, or exactly as wide when [`FloatingRequest::fit_anchor`] is set.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Rect, Size};
//! use veil_position::{FloatingRequest, FlipSolver, PositionSolver, Side};
//!
//! let viewport = Rect::new(0.0, 0.0, 400.0, 300.0);
//! let anchor = Rect::new(10.0, 260.0, 110.0, 280.0);
//! let request = FloatingRequest::new(anchor, Size::new(80.0, 100.0), viewport).with_offset(4.0);
//!
//! // No room below: the surface flips above the anchor.
//! let pos = FlipSolver::default().solve(&request);
//! assert_eq!(pos.placement.side, Side::Top);
//! assert!(pos.flipped && pos.fits);
//! assert_eq!(pos.width, 100.0);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

use kurbo::{Point, Rect, Size};
use smallvec::SmallVec;

/// Side of the anchor the surface sits on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Above.
    Top,
    /// To the right.
    Right,
    /// Below.
    Bottom,
    /// To the left.
    Left,
}

impl Side {
    /// The `data-side` attribute value.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }
}

/// Alignment along the anchor edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Align {
    /// Flush with the start edge.
    Start,
    /// Centered.
    Center,
    /// Flush with the end edge.
    End,
}

/// A side plus an alignment, e.g. `bottom-start`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Placement {
    /// Side of the anchor.
    pub side: Side,
    /// Alignment along that side.
    pub align: Align,
}

impl Placement {
    /// `bottom-start`
    pub const BOTTOM_START: Self = Self::new(Side::Bottom, Align::Start);
    /// `bottom`
    pub const BOTTOM: Self = Self::new(Side::Bottom, Align::Center);
    /// `bottom-end`
    pub const BOTTOM_END: Self = Self::new(Side::Bottom, Align::End);
    /// `top-start`
    pub const TOP_START: Self = Self::new(Side::Top, Align::Start);
    /// `top`
    pub const TOP: Self = Self::new(Side::Top, Align::Center);
    /// `top-end`
    pub const TOP_END: Self = Self::new(Side::Top, Align::End);

    /// Build a placement.
    pub const fn new(side: Side, align: Align) -> Self {
        Self { side, align }
    }

    /// Origin of a `size` surface placed this way around `anchor`.
    pub fn origin(self, anchor: Rect, size: Size, offset: f64) -> Point {
        let along = |start: f64, end: f64, extent: f64| match self.align {
            Align::Start => start,
            Align::Center => start + (end - start - extent) / 2.0,
            Align::End => end - extent,
        };
        match self.side {
            Side::Bottom => Point::new(along(anchor.x0, anchor.x1, size.width), anchor.y1 + offset),
            Side::Top => Point::new(
                along(anchor.x0, anchor.x1, size.width),
                anchor.y0 - offset - size.height,
            ),
            Side::Right => Point::new(anchor.x1 + offset, along(anchor.y0, anchor.y1, size.height)),
            Side::Left => Point::new(
                anchor.x0 - offset - size.width,
                along(anchor.y0, anchor.y1, size.height),
            ),
        }
    }
}

/// Inputs of a placement query.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FloatingRequest {
    /// The anchor (trigger) rectangle.
    pub anchor: Rect,
    /// The floating surface's natural size.
    pub floating: Size,
    /// The area the surface should stay inside.
    pub viewport: Rect,
    /// Gap between anchor and surface along the main axis.
    pub offset: f64,
    /// Force the surface to the anchor's width instead of using it as a minimum.
    pub fit_anchor: bool,
}

impl FloatingRequest {
    /// A request with no offset that treats the anchor width as a minimum.
    pub fn new(anchor: Rect, floating: Size, viewport: Rect) -> Self {
        Self {
            anchor,
            floating,
            viewport,
            offset: 0.0,
            fit_anchor: false,
        }
    }

    /// Set the main-axis gap.
    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Force the surface to the anchor's width.
    pub fn with_fit_anchor(mut self, fit: bool) -> Self {
        self.fit_anchor = fit;
        self
    }

    /// The surface size after the width rule is applied.
    pub fn resolved_size(&self) -> Size {
        let width = if self.fit_anchor {
            self.anchor.width()
        } else {
            self.floating.width.max(self.anchor.width())
        };
        Size::new(width, self.floating.height)
    }
}

/// Result of a placement query.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Position {
    /// Top-left corner of the surface.
    pub origin: Point,
    /// The placement that was chosen.
    pub placement: Placement,
    /// Whether the surface lies inside the viewport.
    pub fits: bool,
    /// Whether the chosen side differs from the preferred one.
    pub flipped: bool,
    /// Width to give the surface.
    pub width: f64,
}

impl Position {
    /// The surface rectangle.
    pub fn rect(&self, height: f64) -> Rect {
        Rect::from_origin_size(self.origin, Size::new(self.width, height))
    }
}

/// Computes where a floating surface goes.
pub trait PositionSolver {
    /// Solve `request`.
    fn solve(&self, request: &FloatingRequest) -> Position;
}

/// Try a preferred placement, then each fallback, keeping the first that fits.
///
/// If nothing fits, the preferred placement is returned with `fits == false`.
#[derive(Clone, Debug, PartialEq)]
pub struct FlipSolver {
    preferred: Placement,
    fallbacks: SmallVec<[Placement; 6]>,
}

impl Default for FlipSolver {
    fn default() -> Self {
        Self::new(Placement::BOTTOM_START).with_fallbacks([
            Placement::BOTTOM,
            Placement::BOTTOM_END,
            Placement::TOP_START,
            Placement::TOP,
            Placement::TOP_END,
        ])
    }
}

impl FlipSolver {
    /// A solver with no fallbacks.
    pub fn new(preferred: Placement) -> Self {
        Self {
            preferred,
            fallbacks: SmallVec::new(),
        }
    }

    /// Replace the fallback list.
    pub fn with_fallbacks(mut self, fallbacks: impl IntoIterator<Item = Placement>) -> Self {
        self.fallbacks = fallbacks.into_iter().collect();
        self
    }

    /// The preferred placement.
    pub fn preferred(&self) -> Placement {
        self.preferred
    }
}

impl PositionSolver for FlipSolver {
    fn solve(&self, request: &FloatingRequest) -> Position {
        let size = request.resolved_size();
        let place = |placement: Placement| {
            let origin = placement.origin(request.anchor, size, request.offset);
            let rect = Rect::from_origin_size(origin, size);
            Position {
                origin,
                placement,
                fits: within(request.viewport, rect),
                flipped: placement.side != self.preferred.side,
                width: size.width,
            }
        };
        core::iter::once(self.preferred)
            .chain(self.fallbacks.iter().copied())
            .map(&place)
            .find(|p| p.fits)
            .unwrap_or_else(|| place(self.preferred))
    }
}

fn within(outer: Rect, inner: Rect) -> bool {
    inner.x0 >= outer.x0 && inner.y0 >= outer.y0 && inner.x1 <= outer.x1 && inner.y1 <= outer.y1
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Rect = Rect::new(0.0, 0.0, 400.0, 300.0);

    #[test]
    fn prefers_bottom_start_with_offset() {
        let anchor = Rect::new(20.0, 20.0, 120.0, 40.0);
        let req = FloatingRequest::new(anchor, Size::new(150.0, 60.0), VIEWPORT).with_offset(8.0);
        let pos = FlipSolver::default().solve(&req);
        assert_eq!(pos.placement, Placement::BOTTOM_START);
        assert_eq!(pos.origin, Point::new(20.0, 48.0));
        assert!(pos.fits);
        assert!(!pos.flipped);
        assert_eq!(pos.width, 150.0);
    }

    #[test]
    fn shifts_alignment_before_flipping() {
        // Near the right edge: start alignment overflows, end alignment fits.
        let anchor = Rect::new(330.0, 20.0, 390.0, 40.0);
        let req = FloatingRequest::new(anchor, Size::new(120.0, 60.0), VIEWPORT);
        let pos = FlipSolver::default().solve(&req);
        assert_eq!(pos.placement, Placement::BOTTOM_END);
        assert_eq!(pos.origin.x, 270.0);
        assert!(!pos.flipped);
    }

    #[test]
    fn flips_to_top_when_bottom_has_no_room() {
        let anchor = Rect::new(20.0, 250.0, 120.0, 270.0);
        let req = FloatingRequest::new(anchor, Size::new(100.0, 80.0), VIEWPORT);
        let pos = FlipSolver::default().solve(&req);
        assert_eq!(pos.placement, Placement::TOP_START);
        assert_eq!(pos.origin, Point::new(20.0, 170.0));
        assert!(pos.flipped);
        assert_eq!(pos.rect(80.0).y1, 250.0);
    }

    #[test]
    fn keeps_preferred_when_nothing_fits() {
        let anchor = Rect::new(0.0, 100.0, 50.0, 120.0);
        let req = FloatingRequest::new(anchor, Size::new(500.0, 500.0), VIEWPORT);
        let pos = FlipSolver::default().solve(&req);
        assert_eq!(pos.placement, Placement::BOTTOM_START);
        assert!(!pos.fits);
        assert!(!pos.flipped);
    }

    #[test]
    fn width_follows_the_anchor() {
        let anchor = Rect::new(0.0, 0.0, 200.0, 20.0);
        let narrow = Size::new(80.0, 40.0);
        let wide = Size::new(260.0, 40.0);
        assert_eq!(FloatingRequest::new(anchor, narrow, VIEWPORT).resolved_size().width, 200.0);
        assert_eq!(FloatingRequest::new(anchor, wide, VIEWPORT).resolved_size().width, 260.0);
        let fitted = FloatingRequest::new(anchor, wide, VIEWPORT).with_fit_anchor(true);
        assert_eq!(fitted.resolved_size().width, 200.0);
    }

    #[test]
    fn side_names_match_data_attribute() {
        assert_eq!(Side::Bottom.as_str(), "bottom");
        assert_eq!(Placement::TOP_END.side.as_str(), "top");
    }
}
