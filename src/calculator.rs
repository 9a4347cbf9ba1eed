//! Pace / distance / time calculator.
//!
//! Exactly one of the three fields is derived from the other two. Every
//! mutating operation ends with a synchronous [`Calculator::recalculate`], so
//! the derived value always matches the current raw inputs.

use crate::config::CALCULATOR_INPUTS_KEY;
use crate::storage::{self, SharedStore};
use crate::utils::{
    pace_from_seconds, pace_seconds_from_parts, parse_float, sanitize_numeric_input,
    time_from_seconds, time_seconds_from_parts, to_fixed, PaceValue, TimeValue,
};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three logical calculator fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Pace,
    Distance,
    Time,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Pace, Field::Distance, Field::Time];

    pub fn id(self) -> &'static str {
        match self {
            Field::Pace => "pace",
            Field::Distance => "distance",
            Field::Time => "time",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Field::ALL.into_iter().find(|f| f.id() == id)
    }

    /// Heading of the mode selector card.
    pub fn title(self) -> &'static str {
        match self {
            Field::Pace => "Calculate Pace",
            Field::Distance => "Calculate Distance",
            Field::Time => "Calculate Time",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            Field::Pace => "Pace from distance & time",
            Field::Distance => "Distance from pace & time",
            Field::Time => "Time from pace & distance",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Pace => "Pace (per mile)",
            Field::Distance => "Distance (miles)",
            Field::Time => "Time",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacePart {
    Minutes,
    Seconds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimePart {
    Hours,
    Minutes,
    Seconds,
}

/// One editable text box of the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSlot {
    Pace(PacePart),
    Distance,
    Time(TimePart),
}

impl InputSlot {
    pub fn field(self) -> Field {
        match self {
            InputSlot::Pace(_) => Field::Pace,
            InputSlot::Distance => Field::Distance,
            InputSlot::Time(_) => Field::Time,
        }
    }
}

/// Values for all three fields. Used both for the raw inputs and the derived output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatorValues {
    pub pace: PaceValue,
    pub distance: String,
    pub time: TimeValue,
}

impl CalculatorValues {
    pub fn get(&self, slot: InputSlot) -> &str {
        match slot {
            InputSlot::Pace(PacePart::Minutes) => &self.pace.minutes,
            InputSlot::Pace(PacePart::Seconds) => &self.pace.seconds,
            InputSlot::Distance => &self.distance,
            InputSlot::Time(TimePart::Hours) => &self.time.hours,
            InputSlot::Time(TimePart::Minutes) => &self.time.minutes,
            InputSlot::Time(TimePart::Seconds) => &self.time.seconds,
        }
    }

    fn slot_mut(&mut self, slot: InputSlot) -> &mut String {
        match slot {
            InputSlot::Pace(PacePart::Minutes) => &mut self.pace.minutes,
            InputSlot::Pace(PacePart::Seconds) => &mut self.pace.seconds,
            InputSlot::Distance => &mut self.distance,
            InputSlot::Time(TimePart::Hours) => &mut self.time.hours,
            InputSlot::Time(TimePart::Minutes) => &mut self.time.minutes,
            InputSlot::Time(TimePart::Seconds) => &mut self.time.seconds,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.pace.is_blank() && self.distance.is_empty() && self.time.is_blank()
    }
}

/// Failure inside a single recalculation pass.
#[derive(Debug, Clone, PartialEq)]
pub enum CalcError {
    /// An intermediate or final value overflowed or became NaN.
    NonFinite(&'static str),
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalcError::NonFinite(what) => write!(f, "Calculated {} is not a finite number", what),
        }
    }
}

impl std::error::Error for CalcError {}

fn finite(value: f64, what: &'static str) -> Result<f64, CalcError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::NonFinite(what))
    }
}

/// Derive the value of `active` from the other two fields of `inputs`.
///
/// Only the entry for `active` is filled in the result; the other two stay
/// blank. When an operand is missing or not positive the derived entry is
/// blank as well.
pub fn derive(active: Field, inputs: &CalculatorValues) -> Result<CalculatorValues, CalcError> {
    let mut out = CalculatorValues::default();
    let pace_seconds = pace_seconds_from_parts(&inputs.pace.minutes, &inputs.pace.seconds);
    let time_seconds =
        time_seconds_from_parts(&inputs.time.hours, &inputs.time.minutes, &inputs.time.seconds);
    let distance = parse_float(&inputs.distance).unwrap_or(f64::NAN);

    match active {
        Field::Distance => {
            if pace_seconds > 0.0 && time_seconds > 0.0 {
                let d = finite(time_seconds / pace_seconds, "distance")?;
                out.distance = to_fixed(d, 2);
            }
        }
        Field::Pace => {
            if distance > 0.0 && time_seconds > 0.0 {
                let p = finite(time_seconds / distance, "pace")?;
                out.pace = pace_from_seconds(p);
            }
        }
        Field::Time => {
            if pace_seconds > 0.0 && distance > 0.0 {
                let t = finite(pace_seconds * distance, "time")?;
                out.time = time_from_seconds(t);
            }
        }
    }
    Ok(out)
}

/// Calculator state container: active field, raw inputs and derived output.
pub struct Calculator {
    store: SharedStore,
    active: Field,
    inputs: CalculatorValues,
    derived: CalculatorValues,
}

impl Calculator {
    /// Restore the last inputs from `store` and derive the default field (pace).
    pub fn new(store: SharedStore) -> Self {
        let inputs = storage::load(store.as_ref(), CALCULATOR_INPUTS_KEY, CalculatorValues::default());
        let mut calc = Self {
            store,
            active: Field::Pace,
            inputs,
            derived: CalculatorValues::default(),
        };
        calc.recalculate();
        calc
    }

    pub fn active_field(&self) -> Field {
        self.active
    }

    pub fn raw_inputs(&self) -> &CalculatorValues {
        &self.inputs
    }

    pub fn derived_values(&self) -> &CalculatorValues {
        &self.derived
    }

    pub fn is_field_derived(&self, field: Field) -> bool {
        self.active == field
    }

    /// Switch the derived field. Raw inputs are kept, including stale ones for
    /// the newly derived field.
    pub fn set_active_field(&mut self, field: Field) {
        if self.active != field {
            debug!("Active field {} -> {}", self.active.id(), field.id());
        }
        self.active = field;
        self.recalculate();
    }

    /// Store sanitized text for one input box, persist, and recalculate.
    pub fn update_input(&mut self, slot: InputSlot, text: &str) {
        *self.inputs.slot_mut(slot) = sanitize_numeric_input(text);
        storage::save(self.store.as_ref(), CALCULATOR_INPUTS_KEY, &self.inputs);
        self.recalculate();
    }

    /// Re-derive the active field. Failures blank every derived value.
    pub fn recalculate(&mut self) {
        match derive(self.active, &self.inputs) {
            Ok(values) => self.derived = values,
            Err(e) => {
                warn!("Calculation error: {}", e);
                self.derived = CalculatorValues::default();
            }
        }
    }

    /// Blank everything and drop the persisted inputs.
    pub fn reset(&mut self) {
        self.inputs = CalculatorValues::default();
        self.derived = CalculatorValues::default();
        storage::clear(self.store.as_ref(), CALCULATOR_INPUTS_KEY);
    }

    /// Text to show in an input box: the derived value for the active field
    /// once there is one, otherwise whatever the user typed.
    pub fn display_value(&self, slot: InputSlot) -> &str {
        let derived = self.derived.get(slot);
        if self.is_field_derived(slot.field()) && !derived.is_empty() {
            derived
        } else {
            self.inputs.get(slot)
        }
    }
}
