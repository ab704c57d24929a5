//! Dashboard Assembly Module
//! Immutable loaded datasets plus the selection-driven payload build.
//!
//! The datasets are loaded once and never mutated; every payload is
//! recomputed from scratch for a given `Selection`, so there is no cache to
//! invalidate and nothing races.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::charts::{
    average_bar, choropleth, heatmap_matrix, increase_bar, line_series, scatter_series,
};
use crate::charts::{
    BarPayload, HeatmapPayload, IncreaseBarPayload, ScatterTrace, StateGrowth, StateTrace,
};
use crate::data::{
    metric_records, population_records, JoinIndex, MetricRecord, ParseError, PopulationIndex,
    PopulationRecord, RawTables, HPI_COL, INFLATION_COL,
};
use crate::stats::{
    correlation_p_value, describe, pearson_correlation, percent_change_series, PercentChange,
    SeriesStats,
};

/// Endpoint years for the HPI increase chart when no explicit year range
/// is selected.
pub const DEFAULT_BASE_YEAR: i32 = 2014;
pub const DEFAULT_END_YEAR: i32 = 2024;

/// The three datasets, typed and key-normalized, held for the lifetime of
/// the session.
pub struct DashboardData {
    pub hpi: Vec<MetricRecord>,
    pub inflation: Vec<MetricRecord>,
    pub population: Vec<PopulationRecord>,
    /// Distinct states from the HPI dataset, first-seen order.
    pub states: Vec<String>,
}

impl DashboardData {
    /// Type the raw tables into records and derive the state list.
    pub fn from_tables(tables: &RawTables) -> Result<Self, ParseError> {
        let hpi = metric_records(&tables.hpi, HPI_COL)?;
        let inflation = metric_records(&tables.inflation, INFLATION_COL)?;
        let population = population_records(&tables.population)?;

        let mut states: Vec<String> = Vec::new();
        for record in &hpi {
            if !states.contains(&record.state) {
                states.push(record.state.clone());
            }
        }

        Ok(Self {
            hpi,
            inflation,
            population,
            states,
        })
    }
}

/// The user's chart filter, passed explicitly into every recomputation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Selection {
    pub states: Vec<String>,
    /// Inclusive on both endpoints when present.
    pub year_range: Option<(i32, i32)>,
}

impl Selection {
    /// Select every state the HPI dataset knows about.
    pub fn all_states(data: &DashboardData) -> Self {
        Self {
            states: data.states.clone(),
            year_range: None,
        }
    }

    /// An empty selection; every chart comes back empty but well-formed.
    pub fn clear() -> Self {
        Self::default()
    }

    fn admits(&self, year: i32) -> bool {
        match self.year_range {
            Some((from, to)) => (from..=to).contains(&year),
            None => true,
        }
    }
}

/// Per-state summary for the dashboard's narrative section.
#[derive(Debug, Clone, Serialize)]
pub struct StateSummary {
    pub state: String,
    pub population: Option<i64>,
    pub hpi: SeriesStats,
    pub inflation: SeriesStats,
    /// Correlation between the state's aligned HPI and inflation series;
    /// `NaN` (serialized as null) means insufficient data.
    pub hpi_inflation_r: f64,
    pub correlation_p: Option<f64>,
    pub hpi_yoy: Vec<PercentChange>,
}

/// Everything the presentation layer needs for one render pass.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardPayload {
    pub selection: Selection,
    /// All states available for selection, first-seen order.
    pub states: Vec<String>,
    pub inflation_lines: Vec<StateTrace>,
    pub hpi_vs_inflation: Vec<ScatterTrace>,
    pub hpi_heatmap: HeatmapPayload,
    pub average_hpi: BarPayload,
    pub hpi_increase: IncreaseBarPayload,
    pub hpi_growth_map: Vec<StateGrowth>,
    pub summaries: Vec<StateSummary>,
}

/// Build every chart payload for one selection.
pub fn build(data: &DashboardData, selection: &Selection) -> DashboardPayload {
    let hpi: Vec<MetricRecord> = data
        .hpi
        .iter()
        .filter(|r| selection.admits(r.year))
        .cloned()
        .collect();
    let inflation: Vec<MetricRecord> = data
        .inflation
        .iter()
        .filter(|r| selection.admits(r.year))
        .cloned()
        .collect();

    let hpi_index = JoinIndex::new(&hpi);
    let inflation_index = JoinIndex::new(&inflation);
    let population_index = PopulationIndex::new(&data.population);

    let (base_year, end_year) = selection
        .year_range
        .unwrap_or((DEFAULT_BASE_YEAR, DEFAULT_END_YEAR));

    let summaries: Vec<StateSummary> = selection
        .states
        .par_iter()
        .map(|state| {
            let hpi_values: Vec<f64> = hpi_index
                .state_series(state)
                .iter()
                .map(|r| r.value)
                .collect();
            let inflation_values: Vec<f64> = inflation_index
                .state_series(state)
                .iter()
                .map(|r| r.value)
                .collect();

            let pairs = hpi_index.aligned_pairs(&inflation_index, state);
            let (xs, ys): (Vec<f64>, Vec<f64>) =
                pairs.iter().map(|&(_, hpi, infl)| (infl, hpi)).unzip();
            let r = pearson_correlation(&xs, &ys);

            StateSummary {
                state: state.clone(),
                population: population_index.get(state),
                hpi: describe(&hpi_values),
                inflation: describe(&inflation_values),
                hpi_inflation_r: r,
                correlation_p: correlation_p_value(r, xs.len()),
                hpi_yoy: percent_change_series(&hpi, state),
            }
        })
        .collect();

    DashboardPayload {
        selection: selection.clone(),
        states: data.states.clone(),
        inflation_lines: line_series(&inflation_index, &selection.states),
        hpi_vs_inflation: scatter_series(&hpi_index, &inflation_index, &selection.states),
        hpi_heatmap: heatmap_matrix(&hpi_index, &selection.states),
        average_hpi: average_bar(&hpi, &selection.states),
        hpi_increase: increase_bar(
            &hpi,
            &population_index,
            &selection.states,
            base_year,
            end_year,
        ),
        hpi_growth_map: choropleth(&hpi_index, &population_index, &selection.states),
        summaries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(state: &str, year: i32, value: f64) -> MetricRecord {
        MetricRecord {
            state: state.to_string(),
            year,
            value,
        }
    }

    fn sample_data() -> DashboardData {
        DashboardData {
            hpi: vec![
                rec("California", 2014, 400.0),
                rec("California", 2020, 520.0),
                rec("California", 2024, 600.0),
                rec("Texas", 2014, 300.0),
                rec("Texas", 2024, 360.0),
            ],
            inflation: vec![
                rec("California", 2014, 1.5),
                rec("California", 2020, 1.2),
                rec("California", 2024, 3.1),
                rec("Texas", 2014, 1.8),
                rec("Texas", 2024, 2.9),
            ],
            population: vec![PopulationRecord {
                state: "California".to_string(),
                population: 39_500_000,
            }],
            states: vec!["California".to_string(), "Texas".to_string()],
        }
    }

    #[test]
    fn test_build_full_selection() {
        let data = sample_data();
        let selection = Selection::all_states(&data);
        let payload = build(&data, &selection);

        assert_eq!(payload.states, vec!["California", "Texas"]);
        assert_eq!(payload.inflation_lines.len(), 2);
        assert_eq!(payload.hpi_heatmap.row_labels, vec![2014, 2020, 2024]);
        // Increase chart defaults to the 2014-2024 endpoints.
        assert_eq!(payload.hpi_increase.categories[0], "California");
        assert_eq!(payload.hpi_increase.values, vec![200.0, 60.0]);
        assert_eq!(payload.summaries.len(), 2);
    }

    #[test]
    fn test_build_empty_selection() {
        let data = sample_data();
        let payload = build(&data, &Selection::clear());

        assert!(payload.inflation_lines.is_empty());
        assert!(payload.average_hpi.categories.is_empty());
        assert!(payload.summaries.is_empty());
        // The heat map still reports every year as a row, just no columns.
        assert_eq!(payload.hpi_heatmap.row_labels, vec![2014, 2020, 2024]);
    }

    #[test]
    fn test_year_range_is_inclusive() {
        let data = sample_data();
        let selection = Selection {
            states: data.states.clone(),
            year_range: Some((2014, 2020)),
        };
        let payload = build(&data, &selection);

        assert_eq!(payload.hpi_heatmap.row_labels, vec![2014, 2020]);
        // Endpoint years for the increase chart follow the selected range.
        assert_eq!(payload.hpi_increase.categories[0], "California");
        assert_eq!(payload.hpi_increase.values, vec![120.0, 0.0]);
    }

    #[test]
    fn test_summary_correlation_and_population() {
        let data = sample_data();
        let selection = Selection::all_states(&data);
        let payload = build(&data, &selection);

        let california = &payload.summaries[0];
        assert_eq!(california.state, "California");
        assert_eq!(california.population, Some(39_500_000));
        assert_eq!(california.hpi.count, 3);
        assert!(california.hpi_inflation_r.is_finite());
        // Two HPI year-over-year points from three years of data.
        assert_eq!(california.hpi_yoy.len(), 2);
    }
}
