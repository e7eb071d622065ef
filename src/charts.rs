//! Chart specifications for the dashboard.
//!
//! Builders are pure functions from a [`SnapshotTable`] or
//! [`HistoricalSeries`] to a [`Figure`], which serializes to Plotly-compatible
//! JSON (`{"data": [...], "layout": {...}}`). A builder returns `None` when
//! its input lacks the needed columns or nothing is left after dropping
//! missing values.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::CHART_TOP_N;
use crate::error::Result;
use crate::models::market::column;
use crate::models::{AssetSnapshot, HistoricalSeries, SnapshotTable};

const LINE_COLOR: &str = "#00d4ff";
const FILL_COLOR: &str = "rgba(0, 212, 255, 0.1)";
const PANEL_COLOR: &str = "rgba(0,0,0,0.3)";
const FONT_COLOR: &str = "white";
const CHART_HEIGHT: u32 = 400;

/// Plotly's sequential "Plasma" palette.
const PLASMA: [&str; 10] = [
    "#0d0887", "#46039f", "#7201a8", "#9c179e", "#bd3786", "#d8576b", "#ed7953", "#fb9f3a",
    "#fdca26", "#f0f921",
];

// ---------------------------------------------------------------------------
// Figure model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Scatter(ScatterTrace),
    Pie(PieTrace),
    Bar(BarTrace),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterTrace {
    pub x: Vec<DateTime<Utc>>,
    pub y: Vec<f64>,
    pub mode: String,
    pub name: String,
    pub line: Line,
    pub fill: String,
    pub fillcolor: String,
    pub hovertemplate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub color: String,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieTrace {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub hole: f64,
    pub textposition: String,
    pub textinfo: String,
    pub hovertemplate: String,
    pub marker: PieMarker,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieMarker {
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarTrace {
    pub x: Vec<String>,
    pub y: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<BarMarker>,
    pub hovertemplate: String,
}

/// Continuous colouring of bars by a per-bar value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarMarker {
    pub color: Vec<Option<f64>>,
    pub colorscale: Vec<(f64, String)>,
    pub showscale: bool,
    pub colorbar: ColorBar,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorBar {
    pub title: Title,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickangle: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: Title,
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovermode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    pub paper_bgcolor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_bgcolor: Option<String>,
    pub font: Font,
}

impl Layout {
    fn dark(title: &str) -> Self {
        Self {
            title: Title::new(title),
            height: CHART_HEIGHT,
            hovermode: None,
            xaxis: None,
            yaxis: None,
            paper_bgcolor: PANEL_COLOR.to_string(),
            plot_bgcolor: None,
            font: Font {
                color: FONT_COLOR.to_string(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Filled line of price over time.
pub fn price_history(series: &HistoricalSeries, title: &str) -> Option<Figure> {
    if series.is_empty() {
        return None;
    }
    let (x, y): (Vec<_>, Vec<_>) = series
        .points()
        .iter()
        .map(|p| (p.timestamp, p.price))
        .unzip();

    let trace = ScatterTrace {
        x,
        y,
        mode: "lines".to_string(),
        name: "Price".to_string(),
        line: Line {
            color: LINE_COLOR.to_string(),
            width: 2.0,
        },
        fill: "tozeroy".to_string(),
        fillcolor: FILL_COLOR.to_string(),
        hovertemplate: "<b>Date:</b> %{x|%d/%m/%Y %H:%M}<br><b>Price:</b> $%{y:.2f}<extra></extra>"
            .to_string(),
    };

    let mut layout = Layout::dark(title);
    layout.hovermode = Some("x unified".to_string());
    layout.plot_bgcolor = Some(PANEL_COLOR.to_string());
    layout.xaxis = Some(Axis {
        title: Some(Title::new("Date")),
        tickangle: None,
    });
    layout.yaxis = Some(Axis {
        title: Some(Title::new("Price (USD)")),
        tickangle: None,
    });

    Some(Figure {
        data: vec![Trace::Scatter(trace)],
        layout,
    })
}

/// Donut of market-cap share across the top rows.
pub fn market_cap_share(table: &SnapshotTable) -> Option<Figure> {
    let top = top_by_market_cap(table)?;

    let trace = PieTrace {
        labels: top.iter().map(|(row, _)| row.label()).collect(),
        values: top.iter().map(|(_, cap)| *cap).collect(),
        hole: 0.4,
        textposition: "inside".to_string(),
        textinfo: "percent+label".to_string(),
        hovertemplate:
            "<b>%{label}</b><br>Market Cap: $%{value:,.0f}<br>Share: %{percent}<extra></extra>"
                .to_string(),
        marker: PieMarker {
            colors: PLASMA.iter().take(top.len()).map(|c| c.to_string()).collect(),
        },
    };

    Some(Figure {
        data: vec![Trace::Pie(trace)],
        layout: Layout::dark(&format!("Market Cap Distribution (Top {})", CHART_TOP_N)),
    })
}

/// Bars of market cap across the top rows, coloured red→yellow→green by 24h
/// change when the table has that column.
pub fn market_cap_ranking(table: &SnapshotTable) -> Option<Figure> {
    let top = top_by_market_cap(table)?;
    let colored = table.has_column(column::CHANGE_24H);

    let marker = colored.then(|| BarMarker {
        color: top
            .iter()
            .map(|(row, _)| row.price_change_percentage_24h.filter(|v| v.is_finite()))
            .collect(),
        colorscale: vec![
            (0.0, "red".to_string()),
            (0.5, "yellow".to_string()),
            (1.0, "green".to_string()),
        ],
        showscale: true,
        colorbar: ColorBar {
            title: Title::new("24h Change (%)"),
        },
    });

    let hovertemplate = if colored {
        "<b>%{x}</b><br>Market Cap: $%{y:,.0f}<br>24h Change: %{marker.color:.2f}%<extra></extra>"
    } else {
        "<b>%{x}</b><br>Market Cap: $%{y:,.0f}<extra></extra>"
    };

    let trace = BarTrace {
        x: top.iter().map(|(row, _)| row.label()).collect(),
        y: top.iter().map(|(_, cap)| *cap).collect(),
        marker,
        hovertemplate: hovertemplate.to_string(),
    };

    let mut layout = Layout::dark(&format!(
        "Top {} Cryptocurrencies by Market Cap",
        CHART_TOP_N
    ));
    layout.xaxis = Some(Axis {
        title: Some(Title::new("Cryptocurrency")),
        tickangle: Some(-45),
    });
    layout.yaxis = Some(Axis {
        title: Some(Title::new("Market Cap (USD)")),
        tickangle: None,
    });

    Some(Figure {
        data: vec![Trace::Bar(trace)],
        layout,
    })
}

/// First [`CHART_TOP_N`] rows that carry a market cap, paired with it.
fn top_by_market_cap(table: &SnapshotTable) -> Option<Vec<(&AssetSnapshot, f64)>> {
    if !table.has_column(column::MARKET_CAP) || !table.has_column(column::NAME) {
        return None;
    }
    let top: Vec<_> = table
        .head(CHART_TOP_N)
        .iter()
        .filter_map(|row| {
            row.market_cap
                .filter(|cap| cap.is_finite())
                .map(|cap| (row, cap))
        })
        .collect();
    (!top.is_empty()).then_some(top)
}
