use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{DashboardError, Result};
use crate::format;

/// Raw field names of a market record, as the API spells them.
pub mod column {
    pub const ID: &str = "id";
    pub const SYMBOL: &str = "symbol";
    pub const NAME: &str = "name";
    pub const CURRENT_PRICE: &str = "current_price";
    pub const MARKET_CAP: &str = "market_cap";
    pub const TOTAL_VOLUME: &str = "total_volume";
    pub const MARKET_CAP_RANK: &str = "market_cap_rank";
    pub const CHANGE_1H: &str = "price_change_percentage_1h_in_currency";
    pub const CHANGE_24H: &str = "price_change_percentage_24h";
    pub const CHANGE_7D: &str = "price_change_percentage_7d_in_currency";
    pub const CHANGE_30D: &str = "price_change_percentage_30d_in_currency";
    pub const SPARKLINE: &str = "sparkline_in_7d";
}

// ---------------------------------------------------------------------------
// AssetSnapshot: one row of the markets endpoint
// ---------------------------------------------------------------------------

/// One market record.
///
/// Values are read leniently: a null identity field becomes an empty string
/// and a null or malformed number becomes `None`, so one odd record never
/// rejects the batch. Key presence is checked separately by
/// [`SnapshotTable::require_fields`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSnapshot {
    #[serde(default, deserialize_with = "text")]
    pub id: String,
    #[serde(default, deserialize_with = "text")]
    pub symbol: String,
    #[serde(default, deserialize_with = "text")]
    pub name: String,
    #[serde(default, deserialize_with = "number")]
    pub current_price: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub market_cap: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub total_volume: Option<f64>,
    #[serde(default, deserialize_with = "rank")]
    pub market_cap_rank: Option<u32>,
    #[serde(default, deserialize_with = "number")]
    pub high_24h: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub low_24h: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(
        default,
        rename = "price_change_percentage_1h_in_currency",
        deserialize_with = "number"
    )]
    pub change_1h: Option<f64>,
    #[serde(
        default,
        rename = "price_change_percentage_7d_in_currency",
        deserialize_with = "number"
    )]
    pub change_7d: Option<f64>,
    #[serde(
        default,
        rename = "price_change_percentage_30d_in_currency",
        deserialize_with = "number"
    )]
    pub change_30d: Option<f64>,
    #[serde(default, deserialize_with = "sparkline")]
    pub sparkline_in_7d: Option<Sparkline>,
}

/// Hourly prices over the last seven days, embedded in a market record.
///
/// Null or non-numeric entries are dropped.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Sparkline {
    #[serde(default, deserialize_with = "prices")]
    pub price: Vec<f64>,
}

impl AssetSnapshot {
    /// Name to show for this asset: the name, else the upper-cased symbol,
    /// else the id.
    pub fn label(&self) -> String {
        if !self.name.is_empty() {
            self.name.clone()
        } else if !self.symbol.is_empty() {
            self.symbol.to_uppercase()
        } else {
            self.id.clone()
        }
    }

    /// `"Name (SYMBOL)"`, or just the label when the symbol is blank.
    pub fn display_name(&self) -> String {
        if self.symbol.is_empty() {
            self.label()
        } else {
            format!("{} ({})", self.label(), self.symbol.to_uppercase())
        }
    }

    pub fn sparkline_prices(&self) -> Option<&[f64]> {
        self.sparkline_in_7d.as_ref().map(|s| s.price.as_slice())
    }
}

// ---------------------------------------------------------------------------
// SnapshotTable: ordered rows plus the set of columns the response carried
// ---------------------------------------------------------------------------

/// Point-in-time table of market records.
///
/// Either fully populated or empty. Alongside the typed rows it remembers
/// which raw fields appeared in the response, so consumers can tell "column
/// absent" from "value missing".
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SnapshotTable {
    rows: Vec<AssetSnapshot>,
    columns: BTreeSet<String>,
}

impl SnapshotTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table from raw JSON records without checking required fields.
    ///
    /// The column set is the union of keys across all records.
    pub fn from_records(records: Vec<Value>) -> Result<Self> {
        let mut columns = BTreeSet::new();
        let mut rows = Vec::with_capacity(records.len());
        for (i, record) in records.into_iter().enumerate() {
            let obj = record.as_object().ok_or_else(|| {
                DashboardError::UnexpectedShape(format!("market record {} is not an object", i))
            })?;
            columns.extend(obj.keys().cloned());
            rows.push(serde_json::from_value::<AssetSnapshot>(record)?);
        }
        Ok(Self { rows, columns })
    }

    /// Fail with the first of `fields` missing from any record.
    ///
    /// A single incomplete record rejects the whole batch.
    pub fn require_fields(records: &[Value], fields: &[&str]) -> Result<()> {
        for field in fields {
            let present = records
                .iter()
                .all(|r| r.as_object().is_some_and(|obj| obj.contains_key(*field)));
            if !present {
                return Err(DashboardError::MissingField(field.to_string()));
            }
        }
        Ok(())
    }

    pub fn rows(&self) -> &[AssetSnapshot] {
        &self.rows
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.as_str())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains(name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First `n` rows in table order.
    pub fn head(&self, n: usize) -> &[AssetSnapshot] {
        &self.rows[..n.min(self.rows.len())]
    }

    pub fn get_by_name(&self, name: &str) -> Option<&AssetSnapshot> {
        if name.is_empty() {
            return None;
        }
        self.rows.iter().find(|r| r.name == name)
    }

    pub fn get_by_id(&self, id: &str) -> Option<&AssetSnapshot> {
        self.rows.iter().find(|r| r.id == id)
    }

    /// Order by rank ascending (unranked rows last, ties keep upstream order)
    /// and keep at most `limit` rows.
    pub(crate) fn rank_and_truncate(&mut self, limit: usize) {
        self.rows
            .sort_by_key(|r| r.market_cap_rank.unwrap_or(u32::MAX));
        self.rows.truncate(limit);
    }
}

// ---------------------------------------------------------------------------
// Lenient field readers
// ---------------------------------------------------------------------------

fn text<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

fn number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<f64>, D::Error> {
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(format::number))
}

/// Whole, non-negative numbers only; `1.0` reads as rank 1.
fn rank<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<u32>, D::Error> {
    Ok(number(deserializer)?
        .filter(|r| *r >= 0.0 && r.fract() == 0.0 && *r <= f64::from(u32::MAX))
        .map(|r| r as u32))
}

fn prices<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Vec<f64>, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    Ok(raw
        .as_array()
        .map(|items| items.iter().filter_map(format::number).collect())
        .unwrap_or_default())
}

fn sparkline<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<Sparkline>, D::Error> {
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .filter(Value::is_object)
        .and_then(|v| serde_json::from_value(v).ok()))
}
