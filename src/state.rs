// Interaction state machine: visibility, dragging and click-through.
//
// The machine never touches the OS. It consumes `Event`s produced by the
// message loop and returns the `Action`s the loop has to carry out, in order.

use crate::geometry::{Point, Rect, Size};
use tracing::debug;

/// Where the image sits before the first show.
pub const DEFAULT_POSITION: Point = Point::new(100, 100);

/// Margins of the grab handle around the image center. The handle is smaller
/// than the artwork so its transparent edges don't respond to clicks.
const HANDLE_LEFT: i32 = 16;
const HANDLE_TOP: i32 = 10;
const HANDLE_RIGHT: i32 = 20;
const HANDLE_BOTTOM: i32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Hidden,
    Idle,
    Dragging,
}

/// Input the machine reacts to. Cursor positions are in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    ToggleVisibility { cursor: Point },
    ToggleClickThrough,
    PointerPress { cursor: Point },
    PointerMove { cursor: Point },
    PointerRelease,
}

impl Event {
    /// A move that reports the primary button up means the release went to
    /// some other window (capture was lost), so it ends any drag.
    pub fn pointer_moved(cursor: Point, primary_down: bool) -> Event {
        if primary_down {
            Event::PointerMove { cursor }
        } else {
            Event::PointerRelease
        }
    }
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Render,
    Show,
    Hide,
    SetClickThrough(bool),
    CapturePointer,
    ReleasePointer,
}

#[derive(Debug)]
pub struct OverlayState {
    position: Point,
    size: Size,
    phase: Phase,
    drag_offset: Point,
    click_through: bool,
}

impl OverlayState {
    pub fn new(size: Size) -> Self {
        Self {
            position: DEFAULT_POSITION,
            size,
            phase: Phase::Hidden,
            drag_offset: Point::default(),
            click_through: false,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_visible(&self) -> bool {
        self.phase != Phase::Hidden
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == Phase::Dragging
    }

    pub fn is_click_through(&self) -> bool {
        self.click_through
    }

    pub fn drag_offset(&self) -> Point {
        self.drag_offset
    }

    /// Grab handle in image-local coordinates.
    pub fn handle_rect(size: Size) -> Rect {
        let c = size.center();
        Rect {
            left: c.x - HANDLE_LEFT,
            top: c.y - HANDLE_TOP,
            right: c.x + HANDLE_RIGHT,
            bottom: c.y + HANDLE_BOTTOM,
        }
    }

    /// Grab handle in screen coordinates, derived from the current position.
    pub fn drag_region(&self) -> Rect {
        Self::handle_rect(self.size).offset(self.position)
    }

    /// Apply one event and return the actions to perform, in order.
    pub fn handle(&mut self, event: Event) -> Vec<Action> {
        let from = self.phase;
        let actions = match (self.phase, event) {
            (Phase::Hidden, Event::ToggleVisibility { cursor }) => {
                self.position = cursor - self.size.center();
                self.phase = Phase::Idle;
                vec![Action::Render, Action::Show]
            }
            (Phase::Idle, Event::ToggleVisibility { .. }) => {
                self.phase = Phase::Hidden;
                vec![Action::Hide]
            }
            (Phase::Dragging, Event::ToggleVisibility { .. }) => {
                self.phase = Phase::Hidden;
                vec![Action::ReleasePointer, Action::Hide]
            }
            (Phase::Idle | Phase::Dragging, Event::ToggleClickThrough) => {
                self.click_through = !self.click_through;
                vec![Action::SetClickThrough(self.click_through)]
            }
            (Phase::Idle, Event::PointerPress { cursor }) => {
                if self.drag_region().contains(cursor) {
                    self.drag_offset = cursor - self.position;
                    self.phase = Phase::Dragging;
                    vec![Action::CapturePointer]
                } else {
                    Vec::new()
                }
            }
            (Phase::Dragging, Event::PointerMove { cursor }) => {
                self.position = cursor - self.drag_offset;
                vec![Action::Render]
            }
            (Phase::Dragging, Event::PointerRelease) => {
                self.phase = Phase::Idle;
                vec![Action::ReleasePointer]
            }
            _ => Vec::new(),
        };

        if from != self.phase {
            debug!(?from, to = ?self.phase, position = ?self.position, "overlay transition");
        }
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shown_at(cursor: Point) -> OverlayState {
        let mut state = OverlayState::new(Size::new(64, 64));
        state.handle(Event::ToggleVisibility { cursor });
        state
    }

    #[test]
    fn starts_hidden_at_default_position() {
        let state = OverlayState::new(Size::new(64, 64));
        assert_eq!(state.phase(), Phase::Hidden);
        assert_eq!(state.position(), DEFAULT_POSITION);
        assert!(!state.is_click_through());
    }

    #[test]
    fn show_centers_on_cursor_then_drag_follows() {
        let mut state = OverlayState::new(Size::new(64, 64));

        let actions = state.handle(Event::ToggleVisibility { cursor: Point::new(500, 500) });
        assert_eq!(actions, vec![Action::Render, Action::Show]);
        assert_eq!(state.position(), Point::new(468, 468));
        assert_eq!(state.phase(), Phase::Idle);

        let actions = state.handle(Event::PointerPress { cursor: Point::new(500, 500) });
        assert_eq!(actions, vec![Action::CapturePointer]);
        assert_eq!(state.phase(), Phase::Dragging);
        assert_eq!(state.drag_offset(), Point::new(32, 32));

        let actions = state.handle(Event::PointerMove { cursor: Point::new(600, 600) });
        assert_eq!(actions, vec![Action::Render]);
        assert_eq!(state.position(), Point::new(568, 568));
    }

    #[test]
    fn position_tracks_cursor_minus_fixed_offset() {
        let mut state = shown_at(Point::new(500, 500));
        state.handle(Event::PointerPress { cursor: Point::new(490, 495) });
        let offset = state.drag_offset();
        assert_eq!(offset, Point::new(22, 27));

        for cursor in [
            Point::new(0, 0),
            Point::new(-40, 1200),
            Point::new(1919, 7),
            Point::new(490, 495),
        ] {
            state.handle(Event::PointerMove { cursor });
            assert_eq!(state.position(), cursor - offset);
            assert_eq!(state.drag_offset(), offset);
        }
    }

    #[test]
    fn press_outside_handle_is_ignored() {
        let mut state = shown_at(Point::new(500, 500));
        let region = state.drag_region();

        for cursor in [
            Point::new(region.left - 1, 500),
            Point::new(region.right, 500),
            Point::new(500, region.top - 1),
            Point::new(500, region.bottom),
            // inside the image bounds but outside the handle
            Point::new(470, 470),
        ] {
            assert!(state.handle(Event::PointerPress { cursor }).is_empty());
            assert_eq!(state.phase(), Phase::Idle);
        }
    }

    #[test]
    fn handle_rect_uses_asymmetric_margins() {
        let r = OverlayState::handle_rect(Size::new(64, 64));
        assert_eq!(r, Rect { left: 16, top: 22, right: 52, bottom: 57 });
    }

    #[test]
    fn drag_region_follows_latest_position() {
        let mut state = shown_at(Point::new(500, 500));
        state.handle(Event::PointerPress { cursor: Point::new(500, 500) });
        state.handle(Event::PointerMove { cursor: Point::new(800, 300) });
        state.handle(Event::PointerRelease);
        assert_eq!(state.phase(), Phase::Idle);

        // The old handle location no longer grabs.
        assert!(state.handle(Event::PointerPress { cursor: Point::new(500, 500) }).is_empty());
        assert_eq!(state.phase(), Phase::Idle);

        assert_eq!(
            state.handle(Event::PointerPress { cursor: Point::new(800, 300) }),
            vec![Action::CapturePointer]
        );
        assert!(state.is_dragging());
    }

    #[test]
    fn moves_without_drag_do_nothing() {
        let mut state = shown_at(Point::new(500, 500));
        assert!(state.handle(Event::PointerMove { cursor: Point::new(10, 10) }).is_empty());
        assert!(state.handle(Event::PointerRelease).is_empty());
        assert_eq!(state.position(), Point::new(468, 468));
    }

    #[test]
    fn toggling_visibility_twice_returns_to_hidden() {
        let mut state = OverlayState::new(Size::new(64, 64));
        state.handle(Event::ToggleVisibility { cursor: Point::new(200, 300) });
        let actions = state.handle(Event::ToggleVisibility { cursor: Point::new(900, 900) });
        assert_eq!(actions, vec![Action::Hide]);
        assert_eq!(state.phase(), Phase::Hidden);
        assert_eq!(state.position(), Point::new(168, 268));
    }

    #[test]
    fn hiding_mid_drag_ends_the_drag() {
        let mut state = shown_at(Point::new(500, 500));
        state.handle(Event::PointerPress { cursor: Point::new(500, 500) });
        let actions = state.handle(Event::ToggleVisibility { cursor: Point::new(0, 0) });
        assert_eq!(actions, vec![Action::ReleasePointer, Action::Hide]);
        assert!(!state.is_dragging());
        assert!(!state.is_visible());

        // Pointer events are not deliverable to a hidden window, and are ignored.
        assert!(state.handle(Event::PointerMove { cursor: Point::new(1, 1) }).is_empty());
        assert!(state.handle(Event::PointerPress { cursor: Point::new(500, 500) }).is_empty());
    }

    #[test]
    fn click_through_toggle_is_orthogonal_to_phase() {
        let mut state = shown_at(Point::new(500, 500));
        assert_eq!(state.handle(Event::ToggleClickThrough), vec![Action::SetClickThrough(true)]);
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.handle(Event::ToggleClickThrough), vec![Action::SetClickThrough(false)]);
        assert!(!state.is_click_through());

        state.handle(Event::PointerPress { cursor: Point::new(500, 500) });
        state.handle(Event::ToggleClickThrough);
        assert!(state.is_dragging());
        assert!(state.is_click_through());
        state.handle(Event::ToggleClickThrough);
        assert!(state.is_dragging());
        assert!(!state.is_click_through());
    }

    #[test]
    fn move_with_button_up_ends_the_drag() {
        let mut state = shown_at(Point::new(500, 500));
        state.handle(Event::PointerPress { cursor: Point::new(500, 500) });
        state.handle(Event::pointer_moved(Point::new(520, 510), true));
        assert!(state.is_dragging());
        assert_eq!(state.position(), Point::new(488, 478));

        let actions = state.handle(Event::pointer_moved(Point::new(700, 700), false));
        assert_eq!(actions, vec![Action::ReleasePointer]);
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.position(), Point::new(488, 478));

        // Hovering afterwards no longer drags the overlay along.
        assert!(state.handle(Event::pointer_moved(Point::new(490, 480), false)).is_empty());
        assert_eq!(state.position(), Point::new(488, 478));
    }

    #[test]
    fn pointer_moved_maps_button_state() {
        let cursor = Point::new(3, 4);
        assert_eq!(Event::pointer_moved(cursor, true), Event::PointerMove { cursor });
        assert_eq!(Event::pointer_moved(cursor, false), Event::PointerRelease);
    }

    #[test]
    fn click_through_toggle_while_hidden_is_ignored() {
        let mut state = OverlayState::new(Size::new(64, 64));
        assert!(state.handle(Event::ToggleClickThrough).is_empty());
        assert!(!state.is_click_through());
        assert_eq!(state.phase(), Phase::Hidden);
    }
}
