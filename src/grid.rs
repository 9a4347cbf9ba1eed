//! Axes, settings and cell text of the pace x distance lookup table.

use crate::config::{
    DISTANCE_PRECISION, KM_PACE_RANGE_SEC, MILE_PACE_RANGE_SEC, RACE_MATCH_TOLERANCE,
};
use crate::utils::to_fixed;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    #[serde(rename = "mi")]
    Miles,
    #[serde(rename = "km")]
    Kilometers,
}

impl Unit {
    pub const ALL: [Unit; 2] = [Unit::Miles, Unit::Kilometers];

    /// Short suffix, also the stored and `<option>` value.
    pub fn short(self) -> &'static str {
        match self {
            Unit::Miles => "mi",
            Unit::Kilometers => "km",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Unit::Miles => "Miles",
            Unit::Kilometers => "Kilometers",
        }
    }

    pub fn from_short(s: &str) -> Option<Self> {
        Unit::ALL.into_iter().find(|u| u.short() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaceStepError(pub u32);

impl fmt::Display for PaceStepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid pace step {}s (expected 10, 15, 30 or 60)", self.0)
    }
}

impl std::error::Error for PaceStepError {}

/// Interval between consecutive pace rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum PaceStep {
    #[default]
    Ten,
    Fifteen,
    Thirty,
    Sixty,
}

impl PaceStep {
    pub const ALL: [PaceStep; 4] = [
        PaceStep::Ten,
        PaceStep::Fifteen,
        PaceStep::Thirty,
        PaceStep::Sixty,
    ];

    pub fn seconds(self) -> u32 {
        match self {
            PaceStep::Ten => 10,
            PaceStep::Fifteen => 15,
            PaceStep::Thirty => 30,
            PaceStep::Sixty => 60,
        }
    }
}

impl TryFrom<u32> for PaceStep {
    type Error = PaceStepError;

    fn try_from(seconds: u32) -> Result<Self, Self::Error> {
        PaceStep::ALL
            .into_iter()
            .find(|step| step.seconds() == seconds)
            .ok_or(PaceStepError(seconds))
    }
}

impl From<PaceStep> for u32 {
    fn from(step: PaceStep) -> u32 {
        step.seconds()
    }
}

/// Persisted view settings of the lookup table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSettings {
    pub unit: Unit,
    #[serde(rename = "paceStepSeconds", alias = "paceStep")]
    pub pace_step: PaceStep,
}

// Distances in miles
const MILE_TRACK: [f64; 4] = [0.062, 0.124, 0.249, 0.497];
const MILE_STANDARD: [f64; 8] = [0.621, 0.932, 1.0, 1.5, 3.107, 6.214, 13.109, 26.219];

// Distances in kilometers
const KM_TRACK: [f64; 4] = [0.1, 0.2, 0.4, 0.8];
const KM_STANDARD: [f64; 7] = [1.0, 1.5, 2.414, 5.0, 10.0, 21.097, 42.195];
const KM_EXTRA: [f64; 34] = [
    2.0, 3.0, 4.0, 6.0, 7.0, 8.0, 9.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0, 17.0, 18.0, 19.0,
    20.0, 22.0, 23.0, 24.0, 25.0, 30.0, 35.0, 40.0, 45.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0,
    120.0, 140.0, 160.934,
];

const RACE_LABELS_MI: [(f64, &str); 11] = [
    (0.062, "100m"),
    (0.124, "200m"),
    (0.249, "400m"),
    (0.497, "800m"),
    (0.621, "1K"),
    (0.932, "1.5K"),
    (1.5, "1.5 Mile"),
    (3.107, "5K"),
    (6.214, "10K"),
    (13.109, "½ M"),
    (26.219, "Marathon"),
];

const RACE_LABELS_KM: [(f64, &str); 11] = [
    (0.1, "100m"),
    (0.2, "200m"),
    (0.4, "400m"),
    (0.8, "800m"),
    (1.0, "1K"),
    (1.5, "1.5K"),
    (2.414, "1.5 Mile"),
    (5.0, "5K"),
    (10.0, "10K"),
    (21.097, "½ M"),
    (42.195, "Marathon"),
];

/// Round to the dedup precision, drop duplicates and sort ascending.
fn unique_sorted(values: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let scale = 10f64.powi(DISTANCE_PRECISION);
    let keys: BTreeSet<i64> = values
        .into_iter()
        .map(|v| (v * scale).round() as i64)
        .collect();
    keys.into_iter().map(|k| k as f64 / scale).collect()
}

/// Column axis: track distances, named races and whole units.
pub fn generate_distance_axis(unit: Unit) -> Vec<f64> {
    match unit {
        Unit::Miles => unique_sorted(
            MILE_TRACK
                .into_iter()
                .chain(MILE_STANDARD)
                .chain((1..=100).map(f64::from)),
        ),
        Unit::Kilometers => {
            unique_sorted(KM_TRACK.into_iter().chain(KM_STANDARD).chain(KM_EXTRA))
        }
    }
}

/// Row axis: paces in minutes per unit, one row per `step`.
pub fn generate_pace_axis(step: PaceStep, unit: Unit) -> Vec<f64> {
    let (lo, hi) = match unit {
        Unit::Miles => MILE_PACE_RANGE_SEC,
        Unit::Kilometers => KM_PACE_RANGE_SEC,
    };
    (lo..=hi)
        .step_by(step.seconds() as usize)
        .map(|sec| f64::from(sec) / 60.0)
        .collect()
}

/// Elapsed minutes for running `distance` units at `pace` minutes per unit.
#[inline]
pub fn elapsed_minutes(pace: f64, distance: f64) -> f64 {
    pace * distance
}

/// Format minutes as `mm:ss`, or `h:mm:ss` from one hour up.
///
/// The value is rounded to whole seconds first, so a remainder of 59.6 s
/// carries into the minute.
///
/// ```
/// use pacechart::grid::format_minutes;
/// assert_eq!(format_minutes(9.25), "09:15");
/// assert_eq!(format_minutes(65.5), "1:05:30");
/// ```
pub fn format_minutes(minutes: f64) -> String {
    let total = if minutes.is_finite() && minutes > 0.0 {
        (minutes * 60.0).round() as u64
    } else {
        0
    };
    let h = total / 3600;
    let mm = (total % 3600) / 60;
    let ss = total % 60;
    if h > 0 {
        format!("{}:{:02}:{:02}", h, mm, ss)
    } else {
        format!("{:02}:{:02}", mm, ss)
    }
}

fn race_labels(unit: Unit) -> &'static [(f64, &'static str)] {
    match unit {
        Unit::Miles => &RACE_LABELS_MI,
        Unit::Kilometers => &RACE_LABELS_KM,
    }
}

/// Name of the race run over `distance`, if it is one.
pub fn race_name(distance: f64, unit: Unit) -> Option<&'static str> {
    race_labels(unit)
        .iter()
        .find(|(d, _)| (d - distance).abs() < RACE_MATCH_TOLERANCE)
        .map(|&(_, label)| label)
}

pub fn is_race_distance(distance: f64, unit: Unit) -> bool {
    race_name(distance, unit).is_some()
}

/// Column header text: the race name, or the distance with its unit.
pub fn distance_label(distance: f64, unit: Unit) -> String {
    if let Some(name) = race_name(distance, unit) {
        return name.to_string();
    }
    let text = if distance < 1.0 {
        to_fixed(distance, 3)
    } else if distance.fract() != 0.0 {
        to_fixed(distance, 1)
    } else {
        format!("{}", distance as i64)
    };
    format!("{} {}", text, unit.short())
}

/// Row header text, e.g. `"08:30 /mi"`.
pub fn pace_label(pace: f64, unit: Unit) -> String {
    format!("{} /{}", format_minutes(pace), unit.short())
}
