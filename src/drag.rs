//! Pointer gestures on the lookup table: drag-to-scroll and double tap.
//!
//! A mouse press arms a drag; the drag only starts once the pointer has
//! travelled [`DRAG_THRESHOLD_PX`] along either axis. Until then the press is
//! an ordinary click. A press that turned into a drag suppresses the click
//! (and double click) it would otherwise end with.
//!
//! ```text
//! Idle --down--> Armed --move >= threshold--> Dragging
//!   ^              |                             |
//!   +----- up -----+------------ up / leave -----+
//! ```

use crate::config::{DOUBLE_TAP_MS, DOUBLE_TAP_RADIUS_PX, DRAG_THRESHOLD_PX};
use log::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Scroll offsets of a viewport, in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollOffset {
    pub left: f64,
    pub top: f64,
}

impl ScrollOffset {
    pub fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Pen,
    Touch,
}

impl PointerKind {
    /// Map a DOM `pointerType` string.
    pub fn from_dom(pointer_type: &str) -> Self {
        match pointer_type {
            "mouse" => PointerKind::Mouse,
            "pen" => PointerKind::Pen,
            _ => PointerKind::Touch,
        }
    }
}

/// Everything the state machine needs to know about a `pointerdown`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerDown {
    pub pointer_id: i32,
    pub kind: PointerKind,
    /// DOM button index, 0 is the primary button.
    pub button: i16,
    pub position: Point,
    /// The press landed on a button or other control that handles it itself.
    pub on_control: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Grab {
    pointer_id: i32,
    origin: Point,
    scroll_origin: ScrollOffset,
}

impl Grab {
    fn scroll_for(&self, position: Point) -> ScrollOffset {
        let dx = position.x - self.origin.x;
        let dy = position.y - self.origin.y;
        ScrollOffset {
            left: (self.scroll_origin.left - dx).max(0.0),
            top: (self.scroll_origin.top - dy).max(0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragState {
    Idle,
    Armed(Grab),
    Dragging(Grab),
}

/// Outcome of a `pointermove`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragUpdate {
    /// No press in progress.
    Ignored,
    /// Pressed, but still inside the click threshold.
    Pending,
    /// The threshold was just crossed: capture `pointer_id` and scroll.
    Started { pointer_id: i32, scroll: ScrollOffset },
    /// Dragging continues: scroll the body (and sync the header) to this offset.
    Scrolled(ScrollOffset),
}

/// Outcome of a `pointerup` / `pointerleave`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragEnd {
    pub was_drag: bool,
    /// Pointer capture to release, set only when a drag had captured it.
    pub release_pointer: Option<i32>,
}

/// Drag-to-scroll state machine.
#[derive(Debug, Clone)]
pub struct DragScroll {
    state: DragState,
    threshold: f64,
    suppress_click: bool,
}

impl Default for DragScroll {
    fn default() -> Self {
        Self::new(DRAG_THRESHOLD_PX)
    }
}

impl DragScroll {
    pub fn new(threshold: f64) -> Self {
        Self {
            state: DragState::Idle,
            threshold,
            suppress_click: false,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, DragState::Idle)
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, DragState::Armed(_))
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// True when the last press became a drag, so its click must be ignored.
    pub fn click_suppressed(&self) -> bool {
        self.suppress_click
    }

    /// Arm a drag for a primary-button mouse press. Returns whether it armed.
    pub fn pointer_down(&mut self, down: PointerDown, scroll: ScrollOffset) -> bool {
        self.suppress_click = false;
        if down.button != 0 || down.kind != PointerKind::Mouse || down.on_control {
            return false;
        }
        self.state = DragState::Armed(Grab {
            pointer_id: down.pointer_id,
            origin: down.position,
            scroll_origin: scroll,
        });
        true
    }

    pub fn pointer_move(&mut self, position: Point) -> DragUpdate {
        match self.state {
            DragState::Idle => DragUpdate::Ignored,
            DragState::Armed(grab) => {
                let dx = (position.x - grab.origin.x).abs();
                let dy = (position.y - grab.origin.y).abs();
                if dx < self.threshold && dy < self.threshold {
                    return DragUpdate::Pending;
                }
                debug!("Drag started (pointer {})", grab.pointer_id);
                self.state = DragState::Dragging(grab);
                DragUpdate::Started {
                    pointer_id: grab.pointer_id,
                    scroll: grab.scroll_for(position),
                }
            }
            DragState::Dragging(grab) => DragUpdate::Scrolled(grab.scroll_for(position)),
        }
    }

    pub fn pointer_up(&mut self) -> DragEnd {
        let end = match self.state {
            DragState::Dragging(grab) => DragEnd {
                was_drag: true,
                release_pointer: Some(grab.pointer_id),
            },
            _ => DragEnd::default(),
        };
        if end.was_drag {
            self.suppress_click = true;
        }
        self.state = DragState::Idle;
        end
    }

    /// Leaving the viewport ends the gesture exactly like releasing the button.
    pub fn pointer_leave(&mut self) -> DragEnd {
        self.pointer_up()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Tap<T> {
    target: T,
    at: Point,
    time_ms: f64,
}

/// Detects two taps on the same target within a short time and distance.
#[derive(Debug, Clone)]
pub struct TapTracker<T> {
    window_ms: f64,
    radius_px: f64,
    last: Option<Tap<T>>,
}

impl<T: Copy + PartialEq> Default for TapTracker<T> {
    fn default() -> Self {
        Self::new(DOUBLE_TAP_MS, DOUBLE_TAP_RADIUS_PX)
    }
}

impl<T: Copy + PartialEq> TapTracker<T> {
    pub fn new(window_ms: f64, radius_px: f64) -> Self {
        Self {
            window_ms,
            radius_px,
            last: None,
        }
    }

    /// Record a tap; true when it completes a double tap.
    pub fn register(&mut self, target: T, at: Point, now_ms: f64) -> bool {
        let is_double = self.last.is_some_and(|prev| {
            prev.target == target
                && now_ms - prev.time_ms <= self.window_ms
                && (at.x - prev.at.x).abs() <= self.radius_px
                && (at.y - prev.at.y).abs() <= self.radius_px
        });
        // a completed double tap must not also start the next one
        self.last = if is_double {
            None
        } else {
            Some(Tap {
                target,
                at,
                time_ms: now_ms,
            })
        };
        is_double
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mouse_down(x: f64, y: f64) -> PointerDown {
        PointerDown {
            pointer_id: 1,
            kind: PointerKind::Mouse,
            button: 0,
            position: Point::new(x, y),
            on_control: false,
        }
    }

    #[test]
    fn small_moves_stay_armed() {
        let mut drag = DragScroll::default();
        assert!(drag.pointer_down(mouse_down(100.0, 100.0), ScrollOffset::new(50.0, 50.0)));
        assert!(drag.is_armed());
        assert_eq!(drag.pointer_move(Point::new(104.0, 96.0)), DragUpdate::Pending);
        assert!(drag.is_armed());
    }

    #[test]
    fn crossing_threshold_starts_drag() {
        let mut drag = DragScroll::default();
        drag.pointer_down(mouse_down(100.0, 100.0), ScrollOffset::new(200.0, 80.0));
        assert_eq!(
            drag.pointer_move(Point::new(105.0, 100.0)),
            DragUpdate::Started {
                pointer_id: 1,
                scroll: ScrollOffset::new(195.0, 80.0),
            }
        );
        assert!(drag.is_dragging());
        assert_eq!(
            drag.pointer_move(Point::new(130.0, 60.0)),
            DragUpdate::Scrolled(ScrollOffset::new(170.0, 120.0))
        );
    }

    #[test]
    fn scroll_never_goes_negative() {
        let mut drag = DragScroll::default();
        drag.pointer_down(mouse_down(0.0, 0.0), ScrollOffset::new(10.0, 10.0));
        drag.pointer_move(Point::new(50.0, 50.0));
        assert_eq!(
            drag.pointer_move(Point::new(60.0, 60.0)),
            DragUpdate::Scrolled(ScrollOffset::new(0.0, 0.0))
        );
    }

    #[test]
    fn release_after_drag_suppresses_click() {
        let mut drag = DragScroll::default();
        drag.pointer_down(mouse_down(0.0, 0.0), ScrollOffset::default());
        drag.pointer_move(Point::new(0.0, 12.0));
        let end = drag.pointer_up();
        assert_eq!(
            end,
            DragEnd {
                was_drag: true,
                release_pointer: Some(1),
            }
        );
        assert!(drag.is_idle());
        assert!(drag.click_suppressed());

        // the next press starts clean
        drag.pointer_down(mouse_down(0.0, 0.0), ScrollOffset::default());
        assert!(!drag.click_suppressed());
    }

    #[test]
    fn release_before_threshold_is_a_click() {
        let mut drag = DragScroll::default();
        drag.pointer_down(mouse_down(10.0, 10.0), ScrollOffset::default());
        drag.pointer_move(Point::new(12.0, 11.0));
        assert_eq!(drag.pointer_up(), DragEnd::default());
        assert!(!drag.click_suppressed());
        assert_eq!(drag.pointer_move(Point::new(90.0, 90.0)), DragUpdate::Ignored);
    }

    #[test]
    fn leave_ends_drag() {
        let mut drag = DragScroll::default();
        drag.pointer_down(mouse_down(0.0, 0.0), ScrollOffset::default());
        drag.pointer_move(Point::new(20.0, 0.0));
        assert!(drag.pointer_leave().was_drag);
        assert!(drag.is_idle());
    }

    #[test]
    fn controls_secondary_buttons_and_touch_do_not_arm() {
        let mut drag = DragScroll::default();

        let mut down = mouse_down(0.0, 0.0);
        down.on_control = true;
        assert!(!drag.pointer_down(down, ScrollOffset::default()));

        let mut down = mouse_down(0.0, 0.0);
        down.button = 2;
        assert!(!drag.pointer_down(down, ScrollOffset::default()));

        let mut down = mouse_down(0.0, 0.0);
        down.kind = PointerKind::from_dom("touch");
        assert!(!drag.pointer_down(down, ScrollOffset::default()));

        assert!(drag.is_idle());
    }

    #[test]
    fn double_tap_needs_same_target_time_and_place() {
        let mut taps = TapTracker::<u8>::default();
        assert!(!taps.register(1, Point::new(10.0, 10.0), 1_000.0));
        assert!(taps.register(1, Point::new(15.0, 12.0), 1_200.0));

        // consumed: a third tap starts over
        assert!(!taps.register(1, Point::new(15.0, 12.0), 1_300.0));

        // too slow
        assert!(!taps.register(1, Point::new(15.0, 12.0), 2_000.0));
        // too far
        assert!(!taps.register(1, Point::new(60.0, 12.0), 2_100.0));
        // other target
        assert!(!taps.register(2, Point::new(60.0, 12.0), 2_200.0));
        assert!(taps.register(2, Point::new(61.0, 12.0), 2_300.0));
    }
}
