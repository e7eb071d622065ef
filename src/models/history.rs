use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

// ---------------------------------------------------------------------------
// HistoricalSeries: time-ordered prices for one asset and one window
// ---------------------------------------------------------------------------

/// Price series ordered by timestamp ascending.
///
/// An empty series means "no data for this window", not an error.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HistoricalSeries {
    points: Vec<PricePoint>,
}

impl HistoricalSeries {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a series, sorting by timestamp (stable for equal timestamps).
    pub fn new(mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.timestamp);
        Self { points }
    }

    /// Convert raw `[epoch_ms, price]` pairs.
    ///
    /// Pairs with a null or non-finite price, or a timestamp outside the
    /// representable range, are skipped.
    pub fn from_millis(pairs: &[(f64, Option<f64>)]) -> Self {
        let points = pairs
            .iter()
            .filter_map(|&(ms, price)| {
                let price = price.filter(|p| p.is_finite())?;
                if !ms.is_finite() {
                    return None;
                }
                let timestamp = DateTime::<Utc>::from_timestamp_millis(ms as i64)?;
                Some(PricePoint { timestamp, price })
            })
            .collect();
        Self::new(points)
    }

    /// Lay out sparkline prices on an hourly grid whose last point is `end`.
    pub fn from_sparkline(prices: &[f64], end: DateTime<Utc>) -> Self {
        let n = prices.len() as i64;
        let points = prices
            .iter()
            .enumerate()
            .map(|(i, &price)| PricePoint {
                timestamp: end - Duration::hours(n - 1 - i as i64),
                price,
            })
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn min_price(&self) -> Option<f64> {
        self.points.iter().map(|p| p.price).reduce(f64::min)
    }

    pub fn max_price(&self) -> Option<f64> {
        self.points.iter().map(|p| p.price).reduce(f64::max)
    }

    /// Percentage change from the first to the last point.
    pub fn change_percent(&self) -> Option<f64> {
        let first = self.first()?.price;
        let last = self.last()?.price;
        if first == 0.0 {
            return None;
        }
        Some((last - first) / first * 100.0)
    }
}

/// Where a chart's series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesSource {
    /// Synthesized from the market record's embedded sparkline; no request made.
    Sparkline,
    /// Fetched from the historical endpoint.
    Fetched,
}
