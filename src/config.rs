//! Application-level configuration constants.

// Storage keys
pub const CALCULATOR_INPUTS_KEY: &str = "pace-calculator-inputs";
pub const CHART_SETTINGS_KEY: &str = "pace-chart-settings";
pub const CHART_HIGHLIGHT_KEY: &str = "pace-chart-highlight";

// Pointer interaction
pub const DRAG_THRESHOLD_PX: f64 = 5.0;
pub const DOUBLE_TAP_MS: f64 = 350.0;
pub const DOUBLE_TAP_RADIUS_PX: f64 = 20.0;
// Presses inside these elements never start a drag (buttons and toggling headers)
pub const NON_DRAG_SELECTOR: &str = "button, th";

// Lookup table geometry
pub const CELL_WIDTH: f64 = 80.0;
pub const CELL_HEIGHT: f64 = 40.0;

// Pace axis bounds, in seconds per unit
pub const MILE_PACE_RANGE_SEC: (u32, u32) = (180, 1800);
pub const KM_PACE_RANGE_SEC: (u32, u32) = (90, 1080);

// Distances are deduplicated at this many decimal places
pub const DISTANCE_PRECISION: i32 = 3;
// Tolerance used when matching a distance against a named race
pub const RACE_MATCH_TOLERANCE: f64 = 0.01;

// Default highlight anchor: 5K at 10:00 per mile
pub const DEFAULT_ANCHOR_DISTANCE_MI: f64 = 3.107;
pub const DEFAULT_ANCHOR_PACE_MIN: f64 = 10.0;
