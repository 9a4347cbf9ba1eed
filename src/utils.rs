//! Unit conversion helpers shared by the calculator and the lookup table.
//!
//! All values that come from the UI are kept as text. Parsing is permissive on
//! purpose: a half-typed field such as `"12:"` reads as `12`, and anything
//! unreadable reads as `0`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// Longest numeric prefix accepted by the browser's `parseFloat`
static NUMERIC_PREFIX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)").unwrap()
});

/// A pace split into its textual minute and second fields. `""` means unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaceValue {
    pub minutes: String,
    pub seconds: String,
}

/// An elapsed time split into textual hour, minute and second fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeValue {
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
}

impl PaceValue {
    pub fn is_blank(&self) -> bool {
        self.minutes.is_empty() && self.seconds.is_empty()
    }
}

impl TimeValue {
    pub fn is_blank(&self) -> bool {
        self.hours.is_empty() && self.minutes.is_empty() && self.seconds.is_empty()
    }
}

/// Parse the leading number of `input` the way a browser's `parseFloat` does.
///
/// Leading whitespace is skipped and trailing garbage ignored. Returns `None`
/// when there is no numeric prefix at all.
///
/// ```
/// use pacechart::utils::parse_float;
/// assert_eq!(parse_float("12:"), Some(12.0));
/// assert_eq!(parse_float("  .5km"), Some(0.5));
/// assert_eq!(parse_float("abc"), None);
/// ```
pub fn parse_float(input: &str) -> Option<f64> {
    let trimmed = input.trim_start();
    let prefix = NUMERIC_PREFIX_REGEX.find(trimmed)?;
    prefix.as_str().parse::<f64>().ok()
}

/// `parse_float`, with missing or unreadable text treated as zero.
fn number_or_zero(input: &str) -> f64 {
    match parse_float(input) {
        Some(v) if !v.is_nan() => v,
        _ => 0.0,
    }
}

/// Render an integral value without a fractional part.
fn integer_string(value: f64) -> String {
    format!("{}", value as i64)
}

/// Render a number the way the browser's `Number.prototype.toString` does.
///
/// Magnitudes from `1e-6` up to `1e21` print positionally, everything else in
/// exponent form with an explicit sign (`1e+21`, `1.5e-7`).
pub fn number_to_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{}", value);
    }
    let exp = format!("{:e}", value);
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
        _ => exp,
    }
}

/// Total seconds of a `minutes:seconds` pace. Unreadable parts count as zero.
pub fn pace_seconds_from_parts(minutes: &str, seconds: &str) -> f64 {
    number_or_zero(minutes) * 60.0 + number_or_zero(seconds)
}

/// Split a number of seconds into a pace. Non-finite input yields a blank pace.
pub fn pace_from_seconds(total_seconds: f64) -> PaceValue {
    if !total_seconds.is_finite() {
        return PaceValue::default();
    }
    let minutes = (total_seconds / 60.0).floor();
    let seconds = (total_seconds % 60.0).round();
    PaceValue {
        minutes: integer_string(minutes),
        seconds: integer_string(seconds),
    }
}

/// Total seconds of an `hours:minutes:seconds` time. Unreadable parts count as zero.
pub fn time_seconds_from_parts(hours: &str, minutes: &str, seconds: &str) -> f64 {
    number_or_zero(hours) * 3600.0 + number_or_zero(minutes) * 60.0 + number_or_zero(seconds)
}

/// Split a number of seconds into hours, minutes and seconds.
pub fn time_from_seconds(total_seconds: f64) -> TimeValue {
    if !total_seconds.is_finite() {
        return TimeValue::default();
    }
    let hours = (total_seconds / 3600.0).floor();
    let minutes = ((total_seconds % 3600.0) / 60.0).floor();
    let seconds = (total_seconds % 60.0).round();
    TimeValue {
        hours: integer_string(hours),
        minutes: integer_string(minutes),
        seconds: integer_string(seconds),
    }
}

/// Flip negative numbers to their absolute value; leave everything else as typed.
///
/// Non-numeric text passes through untouched, the number input control is the
/// one that rejects it.
pub fn sanitize_numeric_input(text: &str) -> String {
    match parse_float(text) {
        Some(v) if v < 0.0 => number_to_string(v.abs()),
        _ => text.to_string(),
    }
}

/// True when `text` reads as a finite number greater than zero.
pub fn is_valid_positive_number(text: &str) -> bool {
    matches!(parse_float(text), Some(v) if v.is_finite() && v > 0.0)
}

/// Fixed-point formatting that rounds exact ties away from zero.
///
/// `format!("{:.2}", 3.125)` rounds the tie to even and gives `"3.12"`; the
/// calculator needs `"3.13"`, which is what the browser's `toFixed` prints.
/// The decision is taken on the exact decimal expansion of the double, so
/// values like `1.005` (stored slightly below the tie) still round down.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return format!("{}", value);
    }
    let negative = value < 0.0;
    // 1100 places covers the full expansion of any f64
    let exact = format!("{:.1100}", value.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut kept: Vec<u8> = int_part.bytes().chain(frac_part.bytes().take(digits)).collect();
    let round_up = frac_part.as_bytes().get(digits).is_some_and(|&d| d >= b'5');

    if round_up {
        let mut carry = true;
        for digit in kept.iter_mut().rev() {
            if *digit == b'9' {
                *digit = b'0';
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            kept.insert(0, b'1');
        }
    }

    let split = kept.len() - digits;
    let mut out = String::with_capacity(kept.len() + 2);
    if negative {
        out.push('-');
    }
    out.push_str(std::str::from_utf8(&kept[..split]).unwrap_or("0"));
    if digits > 0 {
        out.push('.');
        out.push_str(std::str::from_utf8(&kept[split..]).unwrap_or(""));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_float_reads_numeric_prefix() {
        assert_eq!(parse_float("8"), Some(8.0));
        assert_eq!(parse_float("3.1"), Some(3.1));
        assert_eq!(parse_float("  -2.5e1xyz"), Some(-25.0));
        assert_eq!(parse_float("5."), Some(5.0));
        assert_eq!(parse_float("1e"), Some(1.0));
        assert_eq!(parse_float("Infinity"), Some(f64::INFINITY));
        assert_eq!(parse_float(""), None);
        assert_eq!(parse_float("-"), None);
        assert_eq!(parse_float("x12"), None);
    }

    #[test]
    fn pace_parts_are_permissive() {
        assert_eq!(pace_seconds_from_parts("8", "00"), 480.0);
        assert_eq!(pace_seconds_from_parts("7", "30"), 450.0);
        assert_eq!(pace_seconds_from_parts("", "45"), 45.0);
        assert_eq!(pace_seconds_from_parts("oops", ""), 0.0);
    }

    #[test]
    fn time_parts_are_permissive() {
        assert_eq!(time_seconds_from_parts("0", "25", "0"), 1500.0);
        assert_eq!(time_seconds_from_parts("1", "", "5"), 3605.0);
        assert_eq!(time_seconds_from_parts("", "", ""), 0.0);
    }

    #[test]
    fn pace_from_seconds_splits_and_rounds() {
        let pace = pace_from_seconds(1260.0 / 3.1);
        assert_eq!(pace.minutes, "6");
        assert_eq!(pace.seconds, "46");

        assert_eq!(pace_from_seconds(f64::NAN), PaceValue::default());
        assert_eq!(pace_from_seconds(f64::INFINITY), PaceValue::default());
    }

    #[test]
    fn time_from_seconds_splits_into_three_parts() {
        let time = time_from_seconds(4500.0);
        assert_eq!(time.hours, "1");
        assert_eq!(time.minutes, "15");
        assert_eq!(time.seconds, "0");

        assert!(time_from_seconds(f64::NEG_INFINITY).is_blank());
    }

    #[test]
    fn pace_round_trip_keeps_whole_seconds() {
        for minutes in 0..20 {
            for seconds in 0..60 {
                let total = pace_seconds_from_parts(&minutes.to_string(), &seconds.to_string());
                let pace = pace_from_seconds(total);
                let again = pace_seconds_from_parts(&pace.minutes, &pace.seconds);
                assert_eq!(total, again, "{}:{}", minutes, seconds);
            }
        }
    }

    #[test]
    fn sanitize_only_touches_negative_numbers() {
        assert_eq!(sanitize_numeric_input("-5"), "5");
        assert_eq!(sanitize_numeric_input("-2.5"), "2.5");
        assert_eq!(sanitize_numeric_input("7"), "7");
        assert_eq!(sanitize_numeric_input(""), "");
        assert_eq!(sanitize_numeric_input("abc"), "abc");
    }

    #[test]
    fn sanitize_keeps_overflowing_input_readable() {
        let stored = sanitize_numeric_input("-1e400");
        assert_eq!(stored, "Infinity");
        assert_eq!(parse_float(&stored), Some(f64::INFINITY));
    }

    #[test]
    fn number_to_string_matches_browser_output() {
        assert_eq!(number_to_string(42.0), "42");
        assert_eq!(number_to_string(123.5), "123.5");
        assert_eq!(number_to_string(-0.0), "0");
        assert_eq!(number_to_string(0.000001), "0.000001");
        assert_eq!(number_to_string(1.5e-7), "1.5e-7");
        assert_eq!(number_to_string(1e21), "1e+21");
        assert_eq!(number_to_string(2.5e300), "2.5e+300");
        assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(number_to_string(f64::NAN), "NaN");
    }

    #[test]
    fn positive_number_check() {
        assert!(is_valid_positive_number("0.1"));
        assert!(!is_valid_positive_number("0"));
        assert!(!is_valid_positive_number("-3"));
        assert!(!is_valid_positive_number(""));
        assert!(!is_valid_positive_number("Infinity"));
    }

    #[test]
    fn to_fixed_rounds_ties_up() {
        assert_eq!(to_fixed(3.125, 2), "3.13");
        assert_eq!(to_fixed(1500.0 / 480.0, 2), "3.13");
        assert_eq!(to_fixed(2.5, 0), "3");
        assert_eq!(to_fixed(9.999, 2), "10.00");
        assert_eq!(to_fixed(0.0, 2), "0.00");
        assert_eq!(to_fixed(-1.25, 1), "-1.3");
    }

    #[test]
    fn to_fixed_follows_binary_value() {
        // 1.005 is stored as 1.00499999999999989...
        assert_eq!(to_fixed(1.005, 2), "1.00");
        assert_eq!(to_fixed(1.0 / 3.0, 2), "0.33");
    }
}
