//! Frame-coalesced drag handling.
//!
//! Pointer-move events arrive far faster than frames render, so moves are
//! buffered in a single latest-sample-wins slot and the position is
//! recomputed at most once per frame. The position is always derived from
//! the fixed pointer-to-origin offset captured at drag start; accumulating
//! deltas would drift.

use super::position::{Layout, Position, centered, clamp};

/// A pointer coordinate in container space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

#[derive(Debug, Clone, Copy)]
struct ActiveDrag {
    /// Pointer position minus card origin, fixed for the whole drag.
    offset: Point,
}

/// Converts pointer events into clamped position updates.
///
/// Owns no shared state; the caller owns the actual position and the frame
/// callback. `pointer_move` only reports whether a frame needs scheduling,
/// `frame` performs the one recomputation for that frame.
#[derive(Debug, Default)]
pub struct DragController {
    active: Option<ActiveDrag>,
    pending: Option<Point>,
}

impl DragController {
    /// Create an idle controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a drag at the given pointer position.
    ///
    /// Returns the baseline position the drag is measured from: the current
    /// position when one is established, otherwise the card is centered
    /// first and that center becomes the baseline.
    pub fn pointer_down(
        &mut self,
        pointer: Point,
        current: Option<Position>,
        layout: Layout,
    ) -> Position {
        let origin = current.unwrap_or_else(|| centered(layout));
        self.active = Some(ActiveDrag {
            offset: Point {
                x: pointer.x - origin.x,
                y: pointer.y - origin.y,
            },
        });
        self.pending = None;
        origin
    }

    /// Record a move sample. The latest sample always wins.
    ///
    /// Returns `true` when the caller must schedule a frame callback, which
    /// is exactly when no sample was already pending.
    pub fn pointer_move(&mut self, pointer: Point) -> bool {
        if self.active.is_none() {
            return false;
        }
        let needs_frame = self.pending.is_none();
        self.pending = Some(pointer);
        needs_frame
    }

    /// Consume the pending sample at the frame boundary.
    ///
    /// Returns the new clamped position, or `None` when no drag is active
    /// or no sample is pending.
    pub fn frame(&mut self, layout: Layout) -> Option<Position> {
        let drag = self.active.as_ref()?;
        let pointer = self.pending.take()?;

        Some(clamp(
            Position {
                x: pointer.x - drag.offset.x,
                y: pointer.y - drag.offset.y,
            },
            layout,
        ))
    }

    /// End the drag, discarding any pending sample so no stale move is
    /// applied after release.
    pub fn pointer_up(&mut self) {
        self.active = None;
        self.pending = None;
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::overlay::position::Size;

    fn layout() -> Layout {
        Layout {
            element: Size {
                width: 100.0,
                height: 50.0,
            },
            container: Size {
                width: 1000.0,
                height: 500.0,
            },
        }
    }

    #[test]
    fn first_drag_centers_the_card() {
        let mut drag = DragController::new();

        let baseline = drag.pointer_down(Point { x: 460.0, y: 235.0 }, None, layout());
        assert_eq!(baseline, Position { x: 450.0, y: 225.0 });
        assert!(drag.is_dragging());
    }

    #[test]
    fn moves_follow_the_captured_offset() {
        let mut drag = DragController::new();
        drag.pointer_down(
            Point { x: 120.0, y: 70.0 },
            Some(Position { x: 100.0, y: 50.0 }),
            layout(),
        );

        assert!(drag.pointer_move(Point { x: 220.0, y: 170.0 }));
        let position = drag.frame(layout());

        // Offset was (20, 20), so the card lands at pointer - offset.
        assert_eq!(position, Some(Position { x: 200.0, y: 150.0 }));
    }

    #[test]
    fn moves_are_coalesced_to_one_frame() {
        let mut drag = DragController::new();
        drag.pointer_down(
            Point { x: 0.0, y: 0.0 },
            Some(Position { x: 0.0, y: 0.0 }),
            layout(),
        );

        assert!(drag.pointer_move(Point { x: 10.0, y: 10.0 }));
        assert!(!drag.pointer_move(Point { x: 20.0, y: 20.0 }));
        assert!(!drag.pointer_move(Point { x: 30.0, y: 30.0 }));

        // One frame applies only the latest sample.
        assert_eq!(drag.frame(layout()), Some(Position { x: 30.0, y: 30.0 }));
        assert_eq!(drag.frame(layout()), None);

        // The slot is empty again, so the next move schedules a new frame.
        assert!(drag.pointer_move(Point { x: 40.0, y: 40.0 }));
    }

    #[test]
    fn release_discards_the_pending_sample() {
        let mut drag = DragController::new();
        drag.pointer_down(
            Point { x: 0.0, y: 0.0 },
            Some(Position { x: 0.0, y: 0.0 }),
            layout(),
        );

        drag.pointer_move(Point { x: 300.0, y: 300.0 });
        drag.pointer_up();

        assert!(!drag.is_dragging());
        assert_eq!(drag.frame(layout()), None);
    }

    #[test]
    fn moves_without_an_active_drag_are_ignored() {
        let mut drag = DragController::new();
        assert!(!drag.pointer_move(Point { x: 5.0, y: 5.0 }));
        assert_eq!(drag.frame(layout()), None);
    }

    #[test]
    fn frame_positions_are_clamped_to_bounds() {
        let mut drag = DragController::new();
        drag.pointer_down(
            Point { x: 0.0, y: 0.0 },
            Some(Position { x: 0.0, y: 0.0 }),
            layout(),
        );

        drag.pointer_move(Point { x: -500.0, y: 9999.0 });
        assert_eq!(drag.frame(layout()), Some(Position { x: 0.0, y: 450.0 }));
    }
}
