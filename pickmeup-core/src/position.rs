//! Placement of a floating widget next to its anchor.

use serde::{Deserialize, Serialize};

use crate::options::Position;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub left: f64,
    pub top: f64,
}

/// Page-relative boxes of the anchor, the widget and the visible viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Geometry {
    pub anchor: Rect,
    pub widget: Rect,
    pub viewport: Rect,
}

/// Place the widget on the requested side, flipping to the opposite side of
/// the anchor on each axis where it would leave the viewport.
#[must_use]
pub fn compute_position(position: Position, geometry: &Geometry) -> Point {
    let Geometry {
        anchor,
        widget,
        viewport,
    } = *geometry;
    let mut top = anchor.top;
    let mut left = anchor.left;
    match position {
        Position::Top => top -= widget.height,
        Position::Left => left -= widget.width,
        Position::Right => left += anchor.width,
        Position::Bottom => top += anchor.height,
    }

    if top + widget.height > viewport.top + viewport.height {
        top = anchor.top - widget.height;
    }
    if top < viewport.top {
        top = anchor.top + anchor.height;
    }
    if left + widget.width > viewport.left + viewport.width {
        left = anchor.left - widget.width;
    }
    if left < viewport.left {
        left = anchor.left + anchor.width;
    }
    Point { left, top }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(anchor_top: f64) -> Geometry {
        Geometry {
            anchor: Rect {
                left: 100.0,
                top: anchor_top,
                width: 120.0,
                height: 20.0,
            },
            widget: Rect {
                width: 250.0,
                height: 200.0,
                ..Rect::default()
            },
            viewport: Rect {
                left: 0.0,
                top: 0.0,
                width: 800.0,
                height: 600.0,
            },
        }
    }

    #[test]
    fn bottom_places_below_anchor() {
        let point = compute_position(Position::Bottom, &geometry(100.0));
        assert_eq!(point, Point { left: 100.0, top: 120.0 });
    }

    #[test]
    fn bottom_flips_above_near_viewport_end() {
        let point = compute_position(Position::Bottom, &geometry(500.0));
        assert_eq!(point.top, 300.0);
    }

    #[test]
    fn top_flips_below_near_viewport_start() {
        let point = compute_position(Position::Top, &geometry(50.0));
        assert_eq!(point.top, 70.0);
    }

    #[test]
    fn left_flips_right_when_clipped() {
        let point = compute_position(Position::Left, &geometry(100.0));
        assert_eq!(point.left, 220.0);
        let point = compute_position(Position::Right, &geometry(100.0));
        assert_eq!(point.left, 220.0);
    }
}
