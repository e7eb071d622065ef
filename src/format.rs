//! Display formatting for market values.
//!
//! Every formatter is total: a missing, NaN or infinite input yields
//! [`MISSING`] instead of a panic or a garbage string. Inputs are taken as
//! `impl Into<Option<f64>>`, so both `format_price(1.5)` and
//! `format_price(None)` work.

use serde_json::Value;

/// Sentinel for absent or invalid numbers.
pub const MISSING: &str = "N/A";

const SUFFIXES: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

fn finite<N: Into<Option<f64>>>(value: N) -> Option<f64> {
    value.into().filter(|v| v.is_finite())
}

/// Currency amount with a magnitude suffix: `$1.50B`, `$999.00`.
pub fn format_magnitude<N: Into<Option<f64>>>(value: N) -> String {
    let Some(v) = finite(value) else {
        return MISSING.to_string();
    };
    for (scale, suffix) in SUFFIXES {
        if v >= scale {
            return format!("${:.2}{}", v / scale, suffix);
        }
    }
    format!("${:.2}", v)
}

/// Price with tiered precision: 2 decimals with separators from 1 upward,
/// 4 decimals from 0.01, 8 decimals below that.
pub fn format_price<N: Into<Option<f64>>>(value: N) -> String {
    let Some(v) = finite(value) else {
        return MISSING.to_string();
    };
    if v >= 1.0 {
        format!("${}", with_thousands(&format!("{:.2}", v)))
    } else if v >= 0.01 {
        format!("${:.4}", v)
    } else {
        format!("${:.8}", v)
    }
}

/// `12.35%`.
pub fn format_percent<N: Into<Option<f64>>>(value: N) -> String {
    match finite(value) {
        Some(v) => format!("{:.2}%", v),
        None => MISSING.to_string(),
    }
}

/// Insert `,` every three digits of the integer part of a formatted number.
pub fn with_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let grouped = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(",");

    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

/// Read a number out of loosely typed JSON: numbers and numeric strings.
/// Null, booleans, empty or non-numeric strings give `None`.
pub fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Trend
// ---------------------------------------------------------------------------

/// Visual emphasis for a signed change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Positive,
    Negative,
    Neutral,
}

impl Trend {
    pub fn as_str(self) -> &'static str {
        match self {
            Trend::Positive => "positive",
            Trend::Negative => "negative",
            Trend::Neutral => "neutral",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Trend::Positive => "\u{1F7E2}",
            Trend::Negative => "\u{1F534}",
            Trend::Neutral => "\u{26AA}",
        }
    }
}

/// Zero and missing values are neutral.
pub fn trend<N: Into<Option<f64>>>(value: N) -> Trend {
    match finite(value) {
        Some(v) if v > 0.0 => Trend::Positive,
        Some(v) if v < 0.0 => Trend::Negative,
        _ => Trend::Neutral,
    }
}

/// `"🟢 1.25%"`: trend symbol followed by the formatted percentage.
pub fn format_change<N: Into<Option<f64>>>(value: N) -> String {
    let v = finite(value);
    format!("{} {}", trend(v).symbol(), format_percent(v))
}
