//! Lookup table state container.
//!
//! `PaceChart` owns the persisted settings, the generated axes, the highlight
//! and the pointer gesture state. The view layer reads from it and forwards
//! DOM events to it; every change to settings or highlight is written to the
//! store straight away.

use crate::config::{
    CELL_HEIGHT, CELL_WIDTH, CHART_HIGHLIGHT_KEY, CHART_SETTINGS_KEY, DEFAULT_ANCHOR_DISTANCE_MI,
    DEFAULT_ANCHOR_PACE_MIN,
};
use crate::drag::{DragEnd, DragScroll, DragUpdate, Point, PointerDown, ScrollOffset, TapTracker};
use crate::grid::{
    distance_label, elapsed_minutes, format_minutes, generate_distance_axis, generate_pace_axis,
    is_race_distance, pace_label, GridSettings, PaceStep, Unit,
};
use crate::highlight::{CellHighlight, GridTarget, Highlight};
use crate::storage::{self, SharedStore};
use log::debug;
use std::rc::Rc;

/// Visible and scrollable size of the table body, in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    pub client_width: f64,
    pub client_height: f64,
    pub scroll_width: f64,
    pub scroll_height: f64,
}

/// Highlight used when nothing is stored: the 5K column at 10:00 per mile,
/// located on the default axes.
pub fn default_highlight() -> Highlight {
    let settings = GridSettings::default();
    let distances = generate_distance_axis(settings.unit);
    let paces = generate_pace_axis(settings.pace_step, settings.unit);
    let col = distances
        .iter()
        .position(|d| (d - DEFAULT_ANCHOR_DISTANCE_MI).abs() < 0.01)
        .unwrap_or(0);
    let row = paces
        .iter()
        .position(|p| (p - DEFAULT_ANCHOR_PACE_MIN).abs() < 1e-6)
        .unwrap_or(0);
    Highlight::new(Some(row), Some(col))
}

pub struct PaceChart {
    store: SharedStore,
    settings: GridSettings,
    distances: Rc<[f64]>,
    paces: Rc<[f64]>,
    highlight: Highlight,
    drag: DragScroll,
    taps: TapTracker<GridTarget>,
}

impl PaceChart {
    /// Restore settings and highlight from `store` and build the axes.
    pub fn new(store: SharedStore) -> Self {
        let settings = storage::load(store.as_ref(), CHART_SETTINGS_KEY, GridSettings::default());
        let highlight = storage::load(store.as_ref(), CHART_HIGHLIGHT_KEY, default_highlight());
        let mut chart = Self {
            store,
            settings,
            distances: Rc::from(Vec::new()),
            paces: Rc::from(Vec::new()),
            highlight,
            drag: DragScroll::default(),
            taps: TapTracker::default(),
        };
        chart.regenerate_axes();
        chart
    }

    pub fn settings(&self) -> GridSettings {
        self.settings
    }

    pub fn distances(&self) -> Rc<[f64]> {
        self.distances.clone()
    }

    pub fn paces(&self) -> Rc<[f64]> {
        self.paces.clone()
    }

    pub fn highlight(&self) -> Highlight {
        self.highlight
    }

    pub fn rows(&self) -> usize {
        self.paces.len()
    }

    pub fn cols(&self) -> usize {
        self.distances.len()
    }

    /// Rebuild both axes and drop highlight indices that fell off the end.
    fn regenerate_axes(&mut self) {
        self.distances = generate_distance_axis(self.settings.unit).into();
        self.paces = generate_pace_axis(self.settings.pace_step, self.settings.unit).into();
        debug!(
            "Axes regenerated: {} paces x {} distances ({})",
            self.paces.len(),
            self.distances.len(),
            self.settings.unit.short()
        );
        if self.highlight.retain_within(self.rows(), self.cols()) {
            debug!("Highlight cleared where it no longer fits the axes");
            self.save_highlight();
        }
    }

    pub fn set_settings(&mut self, settings: GridSettings) {
        if settings == self.settings {
            return;
        }
        self.settings = settings;
        storage::save(self.store.as_ref(), CHART_SETTINGS_KEY, &self.settings);
        self.regenerate_axes();
    }

    pub fn set_unit(&mut self, unit: Unit) {
        self.set_settings(GridSettings {
            unit,
            ..self.settings
        });
    }

    pub fn set_pace_step(&mut self, pace_step: PaceStep) {
        self.set_settings(GridSettings {
            pace_step,
            ..self.settings
        });
    }

    fn save_highlight(&self) {
        storage::save(self.store.as_ref(), CHART_HIGHLIGHT_KEY, &self.highlight);
    }

    fn target_in_range(&self, target: GridTarget) -> bool {
        match target {
            GridTarget::Cell { row, col } => row < self.rows() && col < self.cols(),
            GridTarget::Row(row) => row < self.rows(),
            GridTarget::Column(col) => col < self.cols(),
        }
    }

    /// Apply a highlight toggle. Targets outside the axes are ignored.
    pub fn toggle(&mut self, target: GridTarget) {
        if !self.target_in_range(target) {
            debug!("Ignoring toggle outside the table: {:?}", target);
            return;
        }
        self.highlight.apply(target);
        self.save_highlight();
    }

    pub fn toggle_column(&mut self, col: usize) {
        self.toggle(GridTarget::Column(col));
    }

    pub fn toggle_row(&mut self, row: usize) {
        self.toggle(GridTarget::Row(row));
    }

    pub fn toggle_cell(&mut self, row: usize, col: usize) {
        self.toggle(GridTarget::Cell { row, col });
    }

    pub fn clear_highlight(&mut self) {
        self.highlight.clear();
        self.save_highlight();
    }

    pub fn cell_minutes(&self, row: usize, col: usize) -> Option<f64> {
        let pace = self.paces.get(row)?;
        let distance = self.distances.get(col)?;
        Some(elapsed_minutes(*pace, *distance))
    }

    pub fn cell_text(&self, row: usize, col: usize) -> Option<String> {
        self.cell_minutes(row, col).map(format_minutes)
    }

    pub fn cell_highlight(&self, row: usize, col: usize) -> CellHighlight {
        self.highlight.cell_level(row, col)
    }

    pub fn pace_label(&self, row: usize) -> Option<String> {
        self.paces.get(row).map(|p| pace_label(*p, self.settings.unit))
    }

    pub fn distance_label(&self, col: usize) -> Option<String> {
        self.distances
            .get(col)
            .map(|d| distance_label(*d, self.settings.unit))
    }

    pub fn is_race_column(&self, col: usize) -> bool {
        self.distances
            .get(col)
            .is_some_and(|d| is_race_distance(*d, self.settings.unit))
    }

    pub fn on_pointer_down(&mut self, down: PointerDown, scroll: ScrollOffset) -> bool {
        self.drag.pointer_down(down, scroll)
    }

    pub fn on_pointer_move(&mut self, position: Point) -> DragUpdate {
        self.drag.pointer_move(position)
    }

    pub fn on_pointer_up(&mut self) -> DragEnd {
        self.drag.pointer_up()
    }

    pub fn on_pointer_leave(&mut self) -> DragEnd {
        self.drag.pointer_leave()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Double click on a header or cell. Returns whether it toggled anything.
    pub fn on_double_click(&mut self, target: GridTarget) -> bool {
        if self.drag.click_suppressed() {
            debug!("Double click swallowed after drag");
            return false;
        }
        self.toggle(target);
        true
    }

    /// Tap on a header or cell; the second tap of a double tap toggles.
    pub fn on_tap(&mut self, target: GridTarget, at: Point, now_ms: f64) -> bool {
        if self.drag.click_suppressed() {
            self.taps.reset();
            return false;
        }
        if self.taps.register(target, at, now_ms) {
            self.toggle(target);
            true
        } else {
            false
        }
    }

    /// Scroll offsets that centre the highlighted cell in `viewport`.
    ///
    /// The sticky pace column occupies the first cell width, so columns start
    /// one cell to the right.
    pub fn centre_scroll(&self, viewport: Viewport) -> ScrollOffset {
        let col = self.highlight.col.unwrap_or(0) as f64;
        let row = self.highlight.row.unwrap_or(0) as f64;
        let centre_x = (col + 1.5) * CELL_WIDTH;
        let centre_y = (row + 0.5) * CELL_HEIGHT;
        let max_left = (viewport.scroll_width - viewport.client_width).max(0.0);
        let max_top = (viewport.scroll_height - viewport.client_height).max(0.0);
        ScrollOffset {
            left: (centre_x - viewport.client_width / 2.0).clamp(0.0, max_left),
            top: (centre_y - viewport.client_height / 2.0).clamp(0.0, max_top),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::PointerKind;
    use crate::storage::{KeyValueStore, MemoryStore};

    fn chart() -> (Rc<MemoryStore>, PaceChart) {
        let store = Rc::new(MemoryStore::new());
        let chart = PaceChart::new(store.clone());
        (store, chart)
    }

    fn stored_highlight(store: &MemoryStore) -> Highlight {
        storage::load(store, CHART_HIGHLIGHT_KEY, Highlight::new(Some(9999), Some(9999)))
    }

    fn mouse_down(x: f64, y: f64) -> PointerDown {
        PointerDown {
            pointer_id: 7,
            kind: PointerKind::Mouse,
            button: 0,
            position: Point::new(x, y),
            on_control: false,
        }
    }

    #[test]
    fn defaults_to_5k_at_ten_minute_miles() {
        let (_, chart) = chart();
        assert_eq!(chart.settings(), GridSettings::default());
        let hl = chart.highlight();
        let row = hl.row.unwrap();
        let col = hl.col.unwrap();
        assert_eq!(chart.paces()[row], 10.0);
        assert_eq!(chart.distances()[col], 3.107);
        assert_eq!(chart.cell_text(row, col).as_deref(), Some("31:04"));
    }

    #[test]
    fn highlight_toggles_are_persisted() {
        let (store, mut chart) = chart();
        chart.clear_highlight();
        assert_eq!(stored_highlight(&store), Highlight::default());

        chart.toggle_column(5);
        chart.toggle_row(2);
        assert_eq!(stored_highlight(&store), Highlight::new(Some(2), Some(5)));
        assert_eq!(chart.cell_highlight(2, 5), CellHighlight::Deep);
        assert_eq!(chart.cell_highlight(2, 0), CellHighlight::Line);
        assert_eq!(chart.cell_highlight(9, 5), CellHighlight::Line);
        assert_eq!(chart.cell_highlight(9, 0), CellHighlight::None);

        chart.toggle_cell(2, 5);
        assert_eq!(chart.highlight(), Highlight::default());
    }

    #[test]
    fn toggles_outside_axes_are_ignored() {
        let (_, mut chart) = chart();
        chart.clear_highlight();
        chart.toggle_row(chart.rows());
        chart.toggle_cell(0, chart.cols());
        assert_eq!(chart.highlight(), Highlight::default());
    }

    #[test]
    fn settings_survive_reload() {
        let (store, mut chart) = chart();
        chart.set_unit(Unit::Kilometers);
        chart.set_pace_step(PaceStep::Thirty);

        let reloaded = PaceChart::new(store.clone());
        assert_eq!(reloaded.settings().unit, Unit::Kilometers);
        assert_eq!(reloaded.settings().pace_step, PaceStep::Thirty);
        assert_eq!(reloaded.rows(), 34);
        assert_eq!(reloaded.cols(), 45);
    }

    #[test]
    fn shrinking_axes_clears_stale_indices() {
        let (store, mut chart) = chart();
        chart.clear_highlight();
        chart.toggle_cell(150, 100);
        assert_eq!(chart.highlight(), Highlight::new(Some(150), Some(100)));

        chart.set_unit(Unit::Kilometers);
        assert_eq!(chart.highlight(), Highlight::default());
        assert_eq!(stored_highlight(&store), Highlight::default());
    }

    #[test]
    fn indices_still_in_range_are_kept() {
        let (_, mut chart) = chart();
        chart.clear_highlight();
        chart.toggle_cell(3, 4);
        chart.set_pace_step(PaceStep::Sixty);
        assert_eq!(chart.highlight(), Highlight::new(Some(3), Some(4)));
    }

    #[test]
    fn malformed_storage_falls_back_to_defaults() {
        let store = Rc::new(MemoryStore::new());
        store.set_item(CHART_SETTINGS_KEY, "not json").unwrap();
        store
            .set_item(CHART_HIGHLIGHT_KEY, r#"{"row": "two"}"#)
            .unwrap();
        let chart = PaceChart::new(store);
        assert_eq!(chart.settings(), GridSettings::default());
        assert_eq!(chart.highlight(), default_highlight());
    }

    #[test]
    fn stored_out_of_range_highlight_is_repaired_on_load() {
        let store = Rc::new(MemoryStore::new());
        store
            .set_item(CHART_SETTINGS_KEY, r#"{"unit":"km","paceStepSeconds":60}"#)
            .unwrap();
        store
            .set_item(CHART_HIGHLIGHT_KEY, r#"{"row":100,"col":3}"#)
            .unwrap();
        let chart = PaceChart::new(store);
        assert_eq!(chart.highlight(), Highlight::new(None, Some(3)));
    }

    #[test]
    fn double_click_after_drag_is_swallowed() {
        let (_, mut chart) = chart();
        chart.clear_highlight();

        chart.on_pointer_down(mouse_down(0.0, 0.0), ScrollOffset::default());
        chart.on_pointer_move(Point::new(40.0, 0.0));
        assert!(chart.is_dragging());
        assert!(chart.on_pointer_up().was_drag);
        assert!(!chart.on_double_click(GridTarget::Cell { row: 1, col: 1 }));
        assert_eq!(chart.highlight(), Highlight::default());

        // plain clicks go through
        chart.on_pointer_down(mouse_down(0.0, 0.0), ScrollOffset::default());
        chart.on_pointer_up();
        assert!(chart.on_double_click(GridTarget::Cell { row: 1, col: 1 }));
        assert_eq!(chart.highlight(), Highlight::new(Some(1), Some(1)));
    }

    #[test]
    fn press_on_header_never_turns_into_a_drag() {
        let (_, mut chart) = chart();
        chart.clear_highlight();
        let mut down = mouse_down(0.0, 0.0);
        down.on_control = true;

        chart.on_pointer_down(down, ScrollOffset::default());
        assert_eq!(chart.on_pointer_move(Point::new(6.0, 0.0)), DragUpdate::Ignored);
        assert!(!chart.is_dragging());
        assert!(!chart.on_pointer_up().was_drag);
        assert!(chart.on_double_click(GridTarget::Row(3)));
        assert_eq!(chart.highlight(), Highlight::new(Some(3), None));
    }

    #[test]
    fn leaving_mid_drag_releases_capture() {
        let (_, mut chart) = chart();
        chart.on_pointer_down(mouse_down(0.0, 0.0), ScrollOffset::default());
        chart.on_pointer_move(Point::new(0.0, 30.0));
        let end = chart.on_pointer_leave();
        assert!(end.was_drag);
        assert_eq!(end.release_pointer, Some(7));
        assert!(!chart.is_dragging());
        assert_eq!(chart.on_pointer_leave(), DragEnd::default());
    }

    #[test]
    fn single_tap_does_nothing_double_tap_toggles() {
        let (_, mut chart) = chart();
        chart.clear_highlight();
        let target = GridTarget::Row(4);
        assert!(!chart.on_tap(target, Point::new(5.0, 5.0), 0.0));
        assert_eq!(chart.highlight(), Highlight::default());
        assert!(chart.on_tap(target, Point::new(6.0, 5.0), 250.0));
        assert_eq!(chart.highlight(), Highlight::new(Some(4), None));
    }

    #[test]
    fn centre_scroll_is_clamped() {
        let (_, mut chart) = chart();
        chart.clear_highlight();
        chart.toggle_cell(20, 10);
        let viewport = Viewport {
            client_width: 400.0,
            client_height: 300.0,
            scroll_width: 8_960.0,
            scroll_height: 6_520.0,
        };
        assert_eq!(
            chart.centre_scroll(viewport),
            ScrollOffset::new(11.5 * 80.0 - 200.0, 20.5 * 40.0 - 150.0)
        );

        chart.clear_highlight();
        assert_eq!(chart.centre_scroll(viewport), ScrollOffset::new(0.0, 0.0));
    }

    #[test]
    fn labels_follow_unit() {
        let (_, mut chart) = chart();
        assert_eq!(chart.pace_label(0).as_deref(), Some("03:00 /mi"));
        chart.set_unit(Unit::Kilometers);
        assert_eq!(chart.pace_label(0).as_deref(), Some("01:30 /km"));
        assert_eq!(chart.distance_label(0).as_deref(), Some("100m"));
        assert!(chart.is_race_column(0));
        assert_eq!(chart.distance_label(chart.cols()), None);
    }
}
