// =============================================================================
// Presentation Adapter — shapes an Analysis for the browser dashboard
// =============================================================================
//
// The page hands `figure.data` and `figure.layout` straight to
// `Plotly.newPlot`, so the field names below follow plotly.js.  Trace values
// use JSON `null` for gaps.  Table and summary readings keep three states
// apart: a number, `null` (not defined yet) and the strings `"NaN"` / `"inf"`
// / `"-inf"` for non-finite results.
// =============================================================================

use serde::{Serialize, Serializer};

use crate::analysis::{Analysis, IndicatorPoint};
use crate::indicators::RsiZone;
use crate::types::Asset;

const TABLE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const PRICE_COLOR: &str = "#1f77ff";
const SMA_COLOR: &str = "#ff3b30";

// =============================================================================
// View types
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub asset: Asset,
    pub asset_name: &'static str,
    pub days: u32,
    pub window: usize,
    pub table: Vec<TableRow>,
    pub figure: Figure,
    pub summary: SummaryView,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub timestamp: String,
    pub price: f64,
    #[serde(serialize_with = "serialize_reading")]
    pub moving_average: Option<f64>,
    #[serde(serialize_with = "serialize_reading")]
    pub rsi: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryView {
    #[serde(serialize_with = "serialize_reading")]
    pub last_rsi: Option<f64>,
    pub last_price: Option<f64>,
    pub rsi_zone: RsiZone,
    pub rsi_text: String,
    pub price_text: String,
}

/// A plotly.js figure: traces plus layout.
#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<LineTrace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineTrace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub mode: &'static str,
    pub name: String,
    pub x: Vec<String>,
    pub y: Vec<Option<f64>>,
    pub line: LineStyle,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineStyle {
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RangeSlider {
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct XAxis {
    pub title: Title,
    pub tickformat: &'static str,
    pub rangeslider: RangeSlider,
}

#[derive(Debug, Clone, Serialize)]
pub struct YAxis {
    pub title: Title,
}

#[derive(Debug, Clone, Serialize)]
pub struct Font {
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub title: Title,
    pub xaxis: XAxis,
    pub yaxis: YAxis,
    pub paper_bgcolor: &'static str,
    pub plot_bgcolor: &'static str,
    pub font: Font,
}

// =============================================================================
// Construction
// =============================================================================

impl DashboardView {
    /// Build the view, keeping the last `table_rows` rows for the table.
    pub fn build(analysis: &Analysis, table_rows: usize) -> Self {
        let asset = analysis.asset;
        let series = &analysis.series;

        let table = series.tail(table_rows).iter().map(TableRow::from).collect();

        let x: Vec<String> = series
            .points
            .iter()
            .map(|p| p.timestamp.format(TABLE_TIME_FORMAT).to_string())
            .collect();
        let price = LineTrace::line(
            format!("{} price", asset.display_name()),
            x.clone(),
            series.points.iter().map(|p| Some(p.price)).collect(),
            PRICE_COLOR,
        );
        let sma = LineTrace::line(
            format!("SMA ({})", series.window),
            x,
            series.points.iter().map(|p| p.moving_average).collect(),
            SMA_COLOR,
        );

        let summary = &analysis.summary;
        let summary = SummaryView {
            last_rsi: summary.last_rsi,
            last_price: summary.last_price,
            rsi_zone: summary.rsi_zone,
            rsi_text: format!(
                "The latest RSI for {} is: {}",
                asset.display_name(),
                format_two_decimals(summary.last_rsi)
            ),
            price_text: format!(
                "The current price of {} is: ${}",
                asset.display_name(),
                format_two_decimals(summary.last_price)
            ),
        };

        Self {
            asset,
            asset_name: asset.display_name(),
            days: analysis.days,
            window: series.window,
            table,
            figure: Figure {
                data: vec![price, sma],
                layout: Layout::dark(asset),
            },
            summary,
        }
    }
}

impl From<&IndicatorPoint> for TableRow {
    fn from(p: &IndicatorPoint) -> Self {
        Self {
            timestamp: p.timestamp.format(TABLE_TIME_FORMAT).to_string(),
            price: p.price,
            moving_average: p.moving_average,
            rsi: p.rsi,
        }
    }
}

impl LineTrace {
    fn line(name: String, x: Vec<String>, y: Vec<Option<f64>>, color: &'static str) -> Self {
        Self {
            kind: "scatter",
            mode: "lines",
            name,
            x,
            y,
            line: LineStyle { color },
        }
    }
}

impl Layout {
    fn dark(asset: Asset) -> Self {
        Self {
            title: Title {
                text: format!("{} price and moving average", asset.display_name()),
            },
            xaxis: XAxis {
                title: Title { text: "Date".into() },
                tickformat: "%Y-%m-%d",
                rangeslider: RangeSlider { visible: true },
            },
            yaxis: YAxis {
                title: Title { text: "Price (USD)".into() },
            },
            paper_bgcolor: "#111111",
            plot_bgcolor: "#111111",
            font: Font { color: "#f2f5fa" },
        }
    }
}

/// Serialise an indicator reading so NaN and infinities stay distinct from a
/// missing value (serde_json would write all three as `null`).
fn serialize_reading<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match *value {
        Some(v) if v.is_nan() => serializer.serialize_str("NaN"),
        Some(v) if v == f64::INFINITY => serializer.serialize_str("inf"),
        Some(v) if v == f64::NEG_INFINITY => serializer.serialize_str("-inf"),
        Some(v) => serializer.serialize_f64(v),
        None => serializer.serialize_none(),
    }
}

/// Two-decimal rendering; `n/a` when the value does not exist at all.
pub fn format_two_decimals(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "n/a".to_string(),
    }
}
