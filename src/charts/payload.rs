//! Chart Payload Module
//! The exact shapes the presentation layer consumes, one per chart.
//! Everything serializes to JSON; non-finite floats come out as `null` and
//! renderers treat them as gaps.

use serde::Serialize;

/// One state's time series for the line chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateTrace {
    pub state: String,
    pub years: Vec<i32>,
    pub values: Vec<f64>,
}

/// One state's joined points for the scatter plot: x is inflation, y is
/// HPI, `years` labels each point for hover text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterTrace {
    pub state: String,
    pub years: Vec<i32>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// Dense year-by-state matrix for the heat map. `None` cells mean "no
/// data", which renderers must keep distinct from `0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapPayload {
    pub rows: Vec<Vec<Option<f64>>>,
    pub row_labels: Vec<i32>,
    pub col_labels: Vec<String>,
}

/// Parallel category/value arrays for a bar chart, already sorted the way
/// the chart displays them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarPayload {
    pub categories: Vec<String>,
    pub values: Vec<f64>,
}

/// Bar chart of HPI increase per state, each bar also carrying the state's
/// population for hover text (`None` when the population source has no
/// matching state).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncreaseBarPayload {
    pub categories: Vec<String>,
    pub values: Vec<f64>,
    pub populations: Vec<Option<i64>>,
}

/// Per-state entry for the choropleth map: HPI growth percent over the
/// state's series, pre-bucketed into the map's color ramp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateGrowth {
    pub state: String,
    pub growth_pct: f64,
    pub fill: String,
    pub population: Option<i64>,
}
