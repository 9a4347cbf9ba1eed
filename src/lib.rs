//! Pace chart: a pace / distance / time calculator and a pace x distance
//! lookup table for runners.
//!
//! The engines in this crate hold all behaviour and are independent of the
//! UI; the Yew front end in `main.rs` only renders their state and forwards
//! events to them.

use wasm_bindgen::prelude::*;

pub mod calculator;
pub mod chart;
pub mod config;
pub mod drag;
pub mod grid;
pub mod highlight;
pub mod logging;
pub mod storage;
pub mod utils;

pub use calculator::{Calculator, CalculatorValues, Field, InputSlot, PacePart, TimePart};
pub use chart::PaceChart;
pub use grid::{format_minutes, GridSettings, PaceStep, Unit};
pub use highlight::{CellHighlight, GridTarget, Highlight};

/// JS entry point: derive the `active` field ("pace", "distance" or "time")
/// from a `{pace, distance, time}` object.
///
/// Returns the derived values object, or a blank one when the input cannot be
/// read or the calculation fails.
#[wasm_bindgen]
pub fn calculate(active: &str, inputs_js: JsValue) -> JsValue {
    let blank = CalculatorValues::default();
    let Some(field) = Field::from_id(active) else {
        log::warn!("Unknown calculation '{}'", active);
        return serde_wasm_bindgen::to_value(&blank).unwrap_or(JsValue::NULL);
    };

    let inputs: CalculatorValues = match serde_wasm_bindgen::from_value(inputs_js) {
        Ok(v) => v,
        Err(e) => {
            log::warn!("Failed to read calculator inputs: {}", e);
            return serde_wasm_bindgen::to_value(&blank).unwrap_or(JsValue::NULL);
        }
    };

    let derived = calculator::derive(field, &inputs).unwrap_or_else(|e| {
        log::warn!("Calculation error: {}", e);
        blank
    });
    serde_wasm_bindgen::to_value(&derived).unwrap_or(JsValue::NULL)
}

/// JS entry point for the table's cell formatting.
#[wasm_bindgen(js_name = formatMinutes)]
pub fn format_minutes_js(minutes: f64) -> String {
    format_minutes(minutes)
}
