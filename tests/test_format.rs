//! Formatter tests: magnitude, price tiers, percentages and trend selection.

use coinboard::format::{
    format_change, format_magnitude, format_percent, format_price, number, trend, with_thousands,
    Trend, MISSING,
};
use serde_json::json;

// ---------------------------------------------------------------------------
// format_magnitude
// ---------------------------------------------------------------------------

#[test]
fn magnitude_picks_largest_suffix() {
    assert_eq!(format_magnitude(1_500_000_000.0), "$1.50B");
    assert_eq!(format_magnitude(2_340_000_000_000.0), "$2.34T");
    assert_eq!(format_magnitude(7_250_000.0), "$7.25M");
    assert_eq!(format_magnitude(1_000.0), "$1.00K");
}

#[test]
fn magnitude_below_thousand_has_no_suffix() {
    assert_eq!(format_magnitude(999.0), "$999.00");
    assert_eq!(format_magnitude(0.0), "$0.00");
}

#[test]
fn magnitude_missing_is_sentinel() {
    assert_eq!(format_magnitude(None), "N/A");
    assert_eq!(format_magnitude(f64::NAN), MISSING);
    assert_eq!(format_magnitude(f64::INFINITY), MISSING);
}

// ---------------------------------------------------------------------------
// format_price
// ---------------------------------------------------------------------------

#[test]
fn price_tiers() {
    assert_eq!(format_price(0.00012345), "$0.00012345");
    assert_eq!(format_price(1234.5), "$1,234.50");
    assert_eq!(format_price(0.05), "$0.0500");
}

#[test]
fn price_tier_boundaries() {
    assert_eq!(format_price(1.0), "$1.00");
    assert_eq!(format_price(0.01), "$0.0100");
    assert_eq!(format_price(67_123_456.789), "$67,123,456.79");
}

#[test]
fn price_missing_is_sentinel() {
    assert_eq!(format_price(None), "N/A");
    assert_eq!(format_price(f64::NAN), "N/A");
}

// ---------------------------------------------------------------------------
// format_percent / format_change
// ---------------------------------------------------------------------------

#[test]
fn percent_two_decimals() {
    assert_eq!(format_percent(2.5), "2.50%");
    assert_eq!(format_percent(-0.126), "-0.13%");
    assert_eq!(format_percent(None), "N/A");
}

#[test]
fn change_prefixes_trend_symbol() {
    assert_eq!(format_change(1.25), "\u{1F7E2} 1.25%");
    assert_eq!(format_change(-3.0), "\u{1F534} -3.00%");
    assert_eq!(format_change(None), "\u{26AA} N/A");
}

// ---------------------------------------------------------------------------
// trend
// ---------------------------------------------------------------------------

#[test]
fn trend_states() {
    assert_eq!(trend(5.0), Trend::Positive);
    assert_eq!(trend(5.0).as_str(), "positive");
    assert_eq!(trend(-0.01), Trend::Negative);
    assert_eq!(trend(-0.01).as_str(), "negative");
    assert_eq!(trend(0.0), Trend::Neutral);
    assert_eq!(trend(None), Trend::Neutral);
    assert_eq!(trend(f64::NAN), Trend::Neutral);
}

// ---------------------------------------------------------------------------
// helpers
// ---------------------------------------------------------------------------

#[test]
fn thousands_grouping() {
    assert_eq!(with_thousands("1234567.89"), "1,234,567.89");
    assert_eq!(with_thousands("123"), "123");
    assert_eq!(with_thousands("-1234.5"), "-1,234.5");
    assert_eq!(with_thousands("100000"), "100,000");
}

#[test]
fn number_reads_loose_json() {
    assert_eq!(number(&json!(1.5)), Some(1.5));
    assert_eq!(number(&json!(" 42 ")), Some(42.0));
    assert_eq!(number(&json!(null)), None);
    assert_eq!(number(&json!("n/a")), None);
    assert_eq!(number(&json!(true)), None);
}
