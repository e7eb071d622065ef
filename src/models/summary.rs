use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::charts::Figure;
use crate::format::{format_change, format_magnitude, format_percent, format_price, MISSING};
use crate::models::market::{column, AssetSnapshot, SnapshotTable};

// ---------------------------------------------------------------------------
// Metric: labelled display value
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<String>,
}

impl Metric {
    pub fn new(label: &str, value: String) -> Self {
        Self {
            label: label.to_string(),
            value,
            delta: None,
        }
    }

    /// A metric whose value is also shown as its delta.
    pub fn with_delta(label: &str, value: String) -> Self {
        Self {
            label: label.to_string(),
            delta: Some(value.clone()),
            value,
        }
    }
}

// ---------------------------------------------------------------------------
// MarketSummary: four headline numbers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSummary {
    pub total_market_cap: f64,
    pub total_volume: f64,
    /// Bitcoin's share of `total_market_cap`, in percent.
    pub btc_dominance: Option<f64>,
    /// Mean 24h change over rows that report one; `None` when the column is
    /// absent or every value is missing.
    pub average_change_24h: Option<f64>,
    has_change_column: bool,
}

impl MarketSummary {
    pub fn from_table(table: &SnapshotTable) -> Self {
        let total_market_cap = if table.has_column(column::MARKET_CAP) {
            sum_present(table.rows().iter().map(|r| r.market_cap))
        } else {
            0.0
        };
        let total_volume = if table.has_column(column::TOTAL_VOLUME) {
            sum_present(table.rows().iter().map(|r| r.total_volume))
        } else {
            0.0
        };

        let btc_dominance = if table.has_column(column::SYMBOL)
            && table.has_column(column::MARKET_CAP)
            && total_market_cap > 0.0
        {
            table
                .rows()
                .iter()
                .find(|r| r.symbol.eq_ignore_ascii_case("btc"))
                .and_then(|r| r.market_cap)
                .filter(|cap| cap.is_finite())
                .map(|cap| cap / total_market_cap * 100.0)
        } else {
            None
        };

        let has_change_column = table.has_column(column::CHANGE_24H);
        let average_change_24h = if has_change_column {
            mean_present(table.rows().iter().map(|r| r.price_change_percentage_24h))
        } else {
            None
        };

        Self {
            total_market_cap,
            total_volume,
            btc_dominance,
            average_change_24h,
            has_change_column,
        }
    }

    /// Total cap, total volume, BTC dominance and average 24h change.
    pub fn metrics(&self) -> Vec<Metric> {
        let dominance = self
            .btc_dominance
            .map(|d| format!("{:.2}%", d))
            .unwrap_or_else(|| MISSING.to_string());
        let average = if self.has_change_column {
            Metric::with_delta("Average 24h Change", format_percent(self.average_change_24h))
        } else {
            Metric::new("Average 24h Change", MISSING.to_string())
        };
        vec![
            Metric::new("Total Market Cap", format_magnitude(self.total_market_cap)),
            Metric::new("Total 24h Volume", format_magnitude(self.total_volume)),
            Metric::new("BTC Dominance", dominance),
            average,
        ]
    }
}

fn sum_present(values: impl Iterator<Item = Option<f64>>) -> f64 {
    values.flatten().filter(|v| v.is_finite()).sum()
}

fn mean_present(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, count) = values
        .flatten()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}

// ---------------------------------------------------------------------------
// RankingRow: one formatted line of the ranking table
// ---------------------------------------------------------------------------

/// Change columns are `None` when the table lacks the underlying field, so
/// the whole column can be hidden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankingRow {
    pub rank: u32,
    pub name: String,
    pub price: String,
    pub change_1h: Option<String>,
    pub change_24h: Option<String>,
    pub change_7d: Option<String>,
    pub volume_24h: String,
    pub market_cap: String,
}

impl RankingRow {
    pub fn from_table(table: &SnapshotTable) -> Vec<RankingRow> {
        let show_1h = table.has_column(column::CHANGE_1H);
        let show_24h = table.has_column(column::CHANGE_24H);
        let show_7d = table.has_column(column::CHANGE_7D);

        table
            .rows()
            .iter()
            .map(|row| RankingRow {
                rank: row.market_cap_rank.unwrap_or(0),
                name: row.display_name(),
                price: format_price(row.current_price),
                change_1h: show_1h.then(|| format_change(row.change_1h)),
                change_24h: show_24h.then(|| format_change(row.price_change_percentage_24h)),
                change_7d: show_7d.then(|| format_change(row.change_7d)),
                volume_24h: format_magnitude(row.total_volume),
                market_cap: format_magnitude(row.market_cap),
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// AssetDetail: per-asset metric columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetDetail {
    pub id: String,
    pub name: String,
    /// Current price, 24h high, 24h low.
    pub prices: Vec<Metric>,
    /// Market cap, 24h volume, rank.
    pub market: Vec<Metric>,
    /// 1h, 24h and 7d change, each with a delta.
    pub changes: Vec<Metric>,
}

impl AssetDetail {
    pub fn from_row(row: &AssetSnapshot) -> Self {
        let rank = row
            .market_cap_rank
            .map(|r| format!("#{}", r))
            .unwrap_or_else(|| MISSING.to_string());
        Self {
            id: row.id.clone(),
            name: row.label(),
            prices: vec![
                Metric::new("Current Price", format_price(row.current_price)),
                Metric::new("24h High", format_price(row.high_24h)),
                Metric::new("24h Low", format_price(row.low_24h)),
            ],
            market: vec![
                Metric::new("Market Cap", format_magnitude(row.market_cap)),
                Metric::new("24h Volume", format_magnitude(row.total_volume)),
                Metric::new("Market Cap Rank", rank),
            ],
            changes: vec![
                Metric::with_delta("1h Change", format_percent(row.change_1h)),
                Metric::with_delta("24h Change", format_percent(row.price_change_percentage_24h)),
                Metric::with_delta("7d Change", format_percent(row.change_7d)),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// MarketOverview: everything one render pass needs from a snapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketOverview {
    pub fetched_at: DateTime<Utc>,
    pub table: SnapshotTable,
    pub summary: MarketSummary,
    pub ranking: Vec<RankingRow>,
    pub ranking_chart: Option<Figure>,
    pub share_chart: Option<Figure>,
}
