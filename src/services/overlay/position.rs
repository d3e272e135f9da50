//! Position math for the draggable card.
//!
//! Pure functions over the bounds the presentation layer reports; bounds are
//! re-read on every call because the container can resize at any time.

/// Top-left corner of the card, in container-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// Horizontal offset from the container's left edge.
    pub x: f64,
    /// Vertical offset from the container's top edge.
    pub y: f64,
}

/// Pixel dimensions of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

/// Card and container dimensions at the time of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    /// Current size of the card element.
    pub element: Size,
    /// Current size of the containing surface.
    pub container: Size,
}

/// Clamp a candidate position so the card stays fully inside the container.
///
/// A card larger than its container clamps to the origin on that axis.
pub fn clamp(candidate: Position, layout: Layout) -> Position {
    let max_x = (layout.container.width - layout.element.width).max(0.0);
    let max_y = (layout.container.height - layout.element.height).max(0.0);

    Position {
        x: candidate.x.clamp(0.0, max_x),
        y: candidate.y.clamp(0.0, max_y),
    }
}

/// Position that centers the card within its container.
///
/// Used as the baseline the first time the card is dragged, before any
/// position has been established.
pub fn centered(layout: Layout) -> Position {
    clamp(
        Position {
            x: (layout.container.width - layout.element.width) / 2.0,
            y: (layout.container.height - layout.element.height) / 2.0,
        },
        layout,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> Layout {
        Layout {
            element: Size {
                width: 300.0,
                height: 60.0,
            },
            container: Size {
                width: 1920.0,
                height: 1032.0,
            },
        }
    }

    #[test]
    fn in_bounds_positions_pass_through() {
        let position = clamp(Position { x: 100.0, y: 200.0 }, layout());
        assert_eq!(position, Position { x: 100.0, y: 200.0 });
    }

    #[test]
    fn negative_coordinates_clamp_to_origin() {
        let position = clamp(Position { x: -50.0, y: -1.0 }, layout());
        assert_eq!(position, Position { x: 0.0, y: 0.0 });
    }

    #[test]
    fn overshoot_clamps_to_far_edge() {
        let position = clamp(Position { x: 5000.0, y: 5000.0 }, layout());
        assert_eq!(
            position,
            Position {
                x: 1920.0 - 300.0,
                y: 1032.0 - 60.0
            }
        );
    }

    #[test]
    fn element_larger_than_container_clamps_to_zero() {
        let degenerate = Layout {
            element: Size {
                width: 500.0,
                height: 500.0,
            },
            container: Size {
                width: 300.0,
                height: 200.0,
            },
        };

        let position = clamp(Position { x: 40.0, y: 40.0 }, degenerate);
        assert_eq!(position, Position { x: 0.0, y: 0.0 });
    }

    #[test]
    fn centered_splits_the_remaining_space() {
        let position = centered(layout());
        assert_eq!(
            position,
            Position {
                x: (1920.0 - 300.0) / 2.0,
                y: (1032.0 - 60.0) / 2.0
            }
        );
    }
}
