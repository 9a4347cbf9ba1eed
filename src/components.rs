//! Yew view components for the calculator, the lookup table and the home page.
//!
//! Components hold no behaviour of their own: they render engine state and
//! forward DOM events to the engines through [`EngineHandle`].

use crate::hooks::EngineHandle;
use gloo_timers::callback::Timeout;
use pacechart::chart::Viewport;
use pacechart::config::NON_DRAG_SELECTOR;
use pacechart::drag::{DragEnd, DragUpdate, Point, PointerDown, PointerKind, ScrollOffset};
use pacechart::{
    Calculator, CellHighlight, Field, GridTarget, InputSlot, PaceChart, PacePart, PaceStep,
    TimePart, Unit,
};
use web_sys::{Element, HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

fn classes_for(level: CellHighlight) -> &'static str {
    match level {
        CellHighlight::Deep => "cell hl-deep",
        CellHighlight::Line => "cell hl-line",
        CellHighlight::None => "cell",
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Home

#[derive(Properties, PartialEq)]
pub struct HomePageProps {
    pub on_open_chart: Callback<()>,
    pub on_open_calculator: Callback<()>,
}

#[function_component(HomePage)]
pub fn home_page(props: &HomePageProps) -> Html {
    html! {
        <div class="home">
            <h1>{ "PaceChart" }</h1>
            <p class="tagline">{ "Pace and time calculations for runners" }</p>
            <div class="home-links">
                <button class="btn-primary" onclick={props.on_open_chart.reform(|_| ())}>
                    { "Distance/Time Chart" }
                </button>
                <button class="btn-primary" onclick={props.on_open_calculator.reform(|_| ())}>
                    { "Pace Calculator" }
                </button>
            </div>
        </div>
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Calculator

#[derive(Properties, PartialEq)]
pub struct ModeSelectorProps {
    pub active: Field,
    pub on_select: Callback<Field>,
}

/// Three cards choosing which field is calculated.
#[function_component(ModeSelector)]
pub fn mode_selector(props: &ModeSelectorProps) -> Html {
    html! {
        <div class="mode-selector">
            { Field::ALL.into_iter().map(|field| {
                let on_select = props.on_select.clone();
                let class = if field == props.active { "mode-card active" } else { "mode-card" };
                html! {
                    <button {class} onclick={Callback::from(move |_: MouseEvent| on_select.emit(field))}>
                        <span class="mode-title">{ field.title() }</span>
                        <span class="mode-subtitle">{ field.subtitle() }</span>
                    </button>
                }
            }).collect::<Html>() }
        </div>
    }
}

fn render_input(calc: &EngineHandle<Calculator>, slot: InputSlot, placeholder: &'static str) -> Html {
    let (value, derived) =
        calc.read(|c| (c.display_value(slot).to_string(), c.is_field_derived(slot.field())));
    let oninput = {
        let calc = calc.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            calc.update(|c| c.update_input(slot, &input.value()));
        })
    };
    html! {
        <input
            type="number"
            min="0"
            class={if derived { "calc-input derived" } else { "calc-input" }}
            {placeholder}
            {value}
            disabled={derived}
            {oninput}
        />
    }
}

#[derive(Properties, PartialEq)]
pub struct CalculatorPageProps {
    pub calculator: EngineHandle<Calculator>,
    pub on_back: Callback<()>,
}

#[function_component(CalculatorPage)]
pub fn calculator_page(props: &CalculatorPageProps) -> Html {
    let calc = &props.calculator;
    let active = calc.read(|c| c.active_field());

    let on_select = {
        let calc = calc.clone();
        Callback::from(move |field: Field| calc.update(|c| c.set_active_field(field)))
    };
    let on_reset = {
        let calc = calc.clone();
        Callback::from(move |_: MouseEvent| calc.update(|c| c.reset()))
    };
    let section_class = |field: Field| {
        if field == active { "calc-section output" } else { "calc-section input" }
    };

    html! {
        <div class="calculator">
            <button class="back-link" onclick={props.on_back.reform(|_| ())}>{ "← Back" }</button>
            <header>
                <h1>{ "Pace Calculator" }</h1>
                <p>{ "Select a calculation, fill the other fields." }</p>
            </header>
            <ModeSelector {active} {on_select} />
            <div class="calc-grid">
                <div class={section_class(Field::Pace)}>
                    <label>{ Field::Pace.label() }</label>
                    <div class="split-input">
                        { render_input(calc, InputSlot::Pace(PacePart::Minutes), "m") }
                        <span class="sep">{ ":" }</span>
                        { render_input(calc, InputSlot::Pace(PacePart::Seconds), "s") }
                    </div>
                </div>
                <div class={section_class(Field::Distance)}>
                    <label>{ Field::Distance.label() }</label>
                    { render_input(calc, InputSlot::Distance, "0.0") }
                </div>
                <div class={section_class(Field::Time)}>
                    <label>{ Field::Time.label() }</label>
                    <div class="split-input">
                        { render_input(calc, InputSlot::Time(TimePart::Hours), "h") }
                        <span class="sep">{ ":" }</span>
                        { render_input(calc, InputSlot::Time(TimePart::Minutes), "m") }
                        <span class="sep">{ ":" }</span>
                        { render_input(calc, InputSlot::Time(TimePart::Seconds), "s") }
                    </div>
                </div>
            </div>
            <div class="calc-actions">
                <button class="btn-secondary" onclick={on_reset}>{ "Reset" }</button>
            </div>
        </div>
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Lookup table

#[derive(Properties, PartialEq)]
pub struct SettingsModalProps {
    pub unit: Unit,
    pub pace_step: PaceStep,
    pub on_unit: Callback<Unit>,
    pub on_pace_step: Callback<PaceStep>,
    pub on_clear_highlight: Callback<()>,
    pub on_close: Callback<()>,
}

#[function_component(SettingsModal)]
pub fn settings_modal(props: &SettingsModalProps) -> Html {
    let on_unit = {
        let cb = props.on_unit.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            if let Some(unit) = Unit::from_short(&select.value()) {
                cb.emit(unit);
            }
        })
    };
    let on_pace_step = {
        let cb = props.on_pace_step.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let step = select
                .value()
                .parse::<u32>()
                .ok()
                .and_then(|s| PaceStep::try_from(s).ok());
            if let Some(step) = step {
                cb.emit(step);
            }
        })
    };

    html! {
        <div class="modal-backdrop">
            <div class="modal">
                <h2>{ "Settings" }</h2>
                <label class="modal-row">
                    <span>{ "Units:" }</span>
                    <select onchange={on_unit}>
                        { Unit::ALL.into_iter().map(|unit| html! {
                            <option value={unit.short()} selected={unit == props.unit}>
                                { unit.name() }
                            </option>
                        }).collect::<Html>() }
                    </select>
                </label>
                <label class="modal-row">
                    <span>{ "Pace interval:" }</span>
                    <select onchange={on_pace_step}>
                        { PaceStep::ALL.into_iter().map(|step| html! {
                            <option value={step.seconds().to_string()} selected={step == props.pace_step}>
                                { format!("{} s", step.seconds()) }
                            </option>
                        }).collect::<Html>() }
                    </select>
                </label>
                <div class="modal-actions">
                    <button class="btn-secondary small" onclick={props.on_clear_highlight.reform(|_| ())}>
                        { "Clear highlight" }
                    </button>
                    <button class="btn-primary" onclick={props.on_close.reform(|_| ())}>
                        { "Close" }
                    </button>
                </div>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ChartPageProps {
    pub chart: EngineHandle<PaceChart>,
    pub on_back: Callback<()>,
}

fn scroll_of(el: &Element) -> ScrollOffset {
    ScrollOffset::new(el.scroll_left() as f64, el.scroll_top() as f64)
}

fn apply_scroll(body: &NodeRef, header: &NodeRef, scroll: ScrollOffset) {
    if let Some(body) = body.cast::<Element>() {
        body.set_scroll_left(scroll.left as i32);
        body.set_scroll_top(scroll.top as i32);
    }
    if let Some(header) = header.cast::<Element>() {
        header.set_scroll_left(scroll.left as i32);
    }
}

fn release_capture(body: &NodeRef, end: DragEnd) {
    if let (Some(id), Some(body)) = (end.release_pointer, body.cast::<Element>()) {
        if body.has_pointer_capture(id) {
            let _ = body.release_pointer_capture(id);
        }
    }
}

/// Tap handler for a header or cell.
fn tap_callback(chart: &EngineHandle<PaceChart>, target: GridTarget) -> Callback<TouchEvent> {
    let chart = chart.clone();
    Callback::from(move |e: TouchEvent| {
        let Some(touch) = e.changed_touches().get(0) else {
            return;
        };
        let at = Point::new(touch.client_x() as f64, touch.client_y() as f64);
        let now = js_sys::Date::now();
        if chart.quietly(|c| c.on_tap(target, at, now)) {
            e.prevent_default();
            chart.refresh();
        }
    })
}

fn double_click_callback(chart: &EngineHandle<PaceChart>, target: GridTarget) -> Callback<MouseEvent> {
    let chart = chart.clone();
    Callback::from(move |e: MouseEvent| {
        e.stop_propagation();
        if chart.quietly(|c| c.on_double_click(target)) {
            chart.refresh();
        }
    })
}

#[function_component(ChartPage)]
pub fn chart_page(props: &ChartPageProps) -> Html {
    let chart = &props.chart;
    let settings_open = use_state(|| false);
    let body_ref = use_node_ref();
    let header_ref = use_node_ref();

    let (settings, header_cells, body_rows) = chart.read(|c| {
        let highlight = c.highlight();
        let header_cells = (0..c.cols())
            .map(|col| {
                let mut class = classes!("col-header");
                if highlight.is_column_selected(col) {
                    class.push("hl-header");
                }
                if c.is_race_column(col) {
                    class.push("race");
                }
                html! {
                    <th {class}
                        ondblclick={double_click_callback(chart, GridTarget::Column(col))}
                        ontouchend={tap_callback(chart, GridTarget::Column(col))}>
                        { c.distance_label(col).unwrap_or_default() }
                    </th>
                }
            })
            .collect::<Html>();
        let body_rows = (0..c.rows())
            .map(|row| {
                let header_class = if highlight.is_row_selected(row) {
                    "row-header hl-header"
                } else {
                    "row-header"
                };
                html! {
                    <tr>
                        <th class={header_class}
                            ondblclick={double_click_callback(chart, GridTarget::Row(row))}
                            ontouchend={tap_callback(chart, GridTarget::Row(row))}>
                            { c.pace_label(row).unwrap_or_default() }
                        </th>
                        { (0..c.cols()).map(|col| {
                            let target = GridTarget::Cell { row, col };
                            let mut class = classes!(classes_for(c.cell_highlight(row, col)));
                            if c.is_race_column(col) {
                                class.push("race");
                            }
                            html! {
                                <td {class}
                                    ondblclick={double_click_callback(chart, target)}
                                    ontouchend={tap_callback(chart, target)}>
                                    { c.cell_text(row, col).unwrap_or_default() }
                                </td>
                            }
                        }).collect::<Html>() }
                    </tr>
                }
            })
            .collect::<Html>();
        (c.settings(), header_cells, body_rows)
    });

    // Centre the highlighted cell once, after the first layout
    {
        let chart = chart.clone();
        let body_ref = body_ref.clone();
        let header_ref = header_ref.clone();
        use_effect_with((), move |_| {
            Timeout::new(0, move || {
                let Some(body) = body_ref.cast::<Element>() else {
                    return;
                };
                let viewport = Viewport {
                    client_width: body.client_width() as f64,
                    client_height: body.client_height() as f64,
                    scroll_width: body.scroll_width() as f64,
                    scroll_height: body.scroll_height() as f64,
                };
                let scroll = chart.read(|c| c.centre_scroll(viewport));
                apply_scroll(&body_ref, &header_ref, scroll);
            })
            .forget();
        });
    }

    let onscroll = {
        let body_ref = body_ref.clone();
        let header_ref = header_ref.clone();
        Callback::from(move |_: Event| {
            if let (Some(body), Some(header)) =
                (body_ref.cast::<Element>(), header_ref.cast::<Element>())
            {
                header.set_scroll_left(body.scroll_left());
            }
        })
    };

    let onpointerdown = {
        let chart = chart.clone();
        let body_ref = body_ref.clone();
        Callback::from(move |e: PointerEvent| {
            let Some(body) = body_ref.cast::<Element>() else {
                return;
            };
            let on_control = e
                .target_dyn_into::<Element>()
                .and_then(|t| t.closest(NON_DRAG_SELECTOR).ok().flatten())
                .is_some();
            let down = PointerDown {
                pointer_id: e.pointer_id(),
                kind: PointerKind::from_dom(&e.pointer_type()),
                button: e.button(),
                position: Point::new(e.client_x() as f64, e.client_y() as f64),
                on_control,
            };
            chart.quietly(|c| c.on_pointer_down(down, scroll_of(&body)));
        })
    };

    let onpointermove = {
        let chart = chart.clone();
        let body_ref = body_ref.clone();
        let header_ref = header_ref.clone();
        Callback::from(move |e: PointerEvent| {
            let position = Point::new(e.client_x() as f64, e.client_y() as f64);
            match chart.quietly(|c| c.on_pointer_move(position)) {
                DragUpdate::Started { pointer_id, scroll } => {
                    e.prevent_default();
                    if let Some(body) = body_ref.cast::<Element>() {
                        let _ = body.set_pointer_capture(pointer_id);
                    }
                    apply_scroll(&body_ref, &header_ref, scroll);
                }
                DragUpdate::Scrolled(scroll) => apply_scroll(&body_ref, &header_ref, scroll),
                DragUpdate::Pending | DragUpdate::Ignored => {}
            }
        })
    };

    let onpointerup = {
        let chart = chart.clone();
        let body_ref = body_ref.clone();
        Callback::from(move |_: PointerEvent| {
            let end = chart.quietly(|c| c.on_pointer_up());
            release_capture(&body_ref, end);
        })
    };

    let onpointerleave = {
        let chart = chart.clone();
        let body_ref = body_ref.clone();
        Callback::from(move |_: PointerEvent| {
            let end = chart.quietly(|c| c.on_pointer_leave());
            release_capture(&body_ref, end);
        })
    };

    let on_unit = {
        let chart = chart.clone();
        Callback::from(move |unit: Unit| chart.update(|c| c.set_unit(unit)))
    };
    let on_pace_step = {
        let chart = chart.clone();
        Callback::from(move |step: PaceStep| chart.update(|c| c.set_pace_step(step)))
    };
    let on_clear_highlight = {
        let chart = chart.clone();
        Callback::from(move |_: ()| chart.update(|c| c.clear_highlight()))
    };
    let on_close = {
        let settings_open = settings_open.clone();
        Callback::from(move |_: ()| settings_open.set(false))
    };
    let open_settings = {
        let settings_open = settings_open.clone();
        Callback::from(move |_: MouseEvent| settings_open.set(true))
    };

    html! {
        <div class="chart">
            <div class="chart-header" ref={header_ref}>
                <table>
                    <thead>
                        <tr>
                            <th class="corner">
                                <button class="settings-button" onclick={open_settings}>{ "⚙" }</button>
                            </th>
                            { header_cells }
                        </tr>
                    </thead>
                </table>
            </div>

            <div class="chart-body" ref={body_ref}
                {onscroll} {onpointerdown} {onpointermove} {onpointerup} {onpointerleave}>
                <table>
                    <tbody>
                        { body_rows }
                    </tbody>
                </table>
            </div>

            if *settings_open {
                <SettingsModal
                    unit={settings.unit}
                    pace_step={settings.pace_step}
                    {on_unit}
                    {on_pace_step}
                    {on_clear_highlight}
                    {on_close}
                />
            }

            <button class="back-link floating" onclick={props.on_back.reform(|_| ())}>{ "← Back" }</button>
        </div>
    }
}
