//! Series Shaper Module
//! Converts aggregator output into the ordered arrays each chart needs.
//!
//! Ordering rules are chart-specific: chronological for time series,
//! descending by metric for bar charts, selection order for categorical
//! axes. Every function here is a stateless pure transform.

use crate::charts::payload::{
    BarPayload, HeatmapPayload, IncreaseBarPayload, ScatterTrace, StateGrowth, StateTrace,
};
use crate::data::{JoinIndex, MetricRecord, PopulationIndex};
use crate::stats::{endpoint_delta, mean_by_state};

/// Choropleth color ramp, highest growth bucket first. The fallback shade
/// covers zero and negative growth.
const GROWTH_RAMP: [(f64, &str); 7] = [
    (100.0, "#800026"),
    (75.0, "#BD0026"),
    (50.0, "#E31A1C"),
    (25.0, "#FC4E2A"),
    (10.0, "#FD8D3C"),
    (5.0, "#FEB24C"),
    (0.0, "#FED976"),
];
const GROWTH_FLOOR_COLOR: &str = "#FFEDA0";

/// Map a growth percentage onto the choropleth ramp.
fn growth_color(growth_pct: f64) -> &'static str {
    GROWTH_RAMP
        .iter()
        .find(|(threshold, _)| growth_pct > *threshold)
        .map(|(_, color)| *color)
        .unwrap_or(GROWTH_FLOOR_COLOR)
}

/// Time-series traces, one per selected state, each sorted ascending by
/// year independently - states need not share a year set. `NaN` values are
/// kept and serialize to `null` so the line shows a gap.
pub fn line_series(index: &JoinIndex, states: &[String]) -> Vec<StateTrace> {
    states
        .iter()
        .map(|state| {
            let series = index.state_series(state);
            StateTrace {
                state: state.clone(),
                years: series.iter().map(|r| r.year).collect(),
                values: series.iter().map(|r| r.value).collect(),
            }
        })
        .collect()
}

/// Scatter traces pairing two datasets on `(state, year)`. Years missing
/// from either dataset are silently excluded from the trace.
pub fn scatter_series(
    y_index: &JoinIndex,
    x_index: &JoinIndex,
    states: &[String],
) -> Vec<ScatterTrace> {
    states
        .iter()
        .map(|state| {
            let pairs = y_index.aligned_pairs(x_index, state);
            ScatterTrace {
                state: state.clone(),
                years: pairs.iter().map(|&(year, _, _)| year).collect(),
                x: pairs.iter().map(|&(_, _, x)| x).collect(),
                y: pairs.iter().map(|&(_, y, _)| y).collect(),
            }
        })
        .collect()
}

/// Dense matrix indexed `[year][state]`: rows are every year in the
/// dataset ascending, columns follow selection order, missing cells are
/// `None`.
pub fn heatmap_matrix(index: &JoinIndex, states: &[String]) -> HeatmapPayload {
    let years = index.years();

    let rows = years
        .iter()
        .map(|&year| {
            states
                .iter()
                .map(|state| {
                    index
                        .lookup(state, year)
                        .map(|r| r.value)
                        .filter(|v| v.is_finite())
                })
                .collect()
        })
        .collect();

    HeatmapPayload {
        rows,
        row_labels: years,
        col_labels: states.to_vec(),
    }
}

/// Bar chart of each state's mean metric value, sorted descending.
pub fn average_bar(records: &[MetricRecord], states: &[String]) -> BarPayload {
    let mut entries: Vec<(String, f64)> = states
        .iter()
        .map(|state| (state.clone(), mean_by_state(records, state)))
        .collect();
    entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    BarPayload {
        categories: entries.iter().map(|(state, _)| state.clone()).collect(),
        values: entries.iter().map(|(_, value)| *value).collect(),
    }
}

/// Bar chart of each state's metric increase between two endpoint years,
/// sorted descending, with the state's population attached for hover text.
pub fn increase_bar(
    records: &[MetricRecord],
    population: &PopulationIndex,
    states: &[String],
    year_a: i32,
    year_b: i32,
) -> IncreaseBarPayload {
    let mut entries: Vec<(String, f64, Option<i64>)> = states
        .iter()
        .map(|state| {
            (
                state.clone(),
                endpoint_delta(records, state, year_a, year_b),
                population.get(state),
            )
        })
        .collect();
    entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    IncreaseBarPayload {
        categories: entries.iter().map(|(state, _, _)| state.clone()).collect(),
        values: entries.iter().map(|(_, value, _)| *value).collect(),
        populations: entries.iter().map(|(_, _, pop)| *pop).collect(),
    }
}

/// Choropleth entries: growth percent from the first to the last year of
/// each state's series. States with fewer than two finite values, or a
/// zero starting value, are skipped - the map leaves them uncolored.
pub fn choropleth(
    index: &JoinIndex,
    population: &PopulationIndex,
    states: &[String],
) -> Vec<StateGrowth> {
    states
        .iter()
        .filter_map(|state| {
            let series: Vec<f64> = index
                .state_series(state)
                .iter()
                .map(|r| r.value)
                .filter(|v| v.is_finite())
                .collect();
            let (first, last) = match (series.first(), series.last()) {
                (Some(&first), Some(&last)) if series.len() >= 2 && first != 0.0 => (first, last),
                _ => return None,
            };

            let growth_pct = (last - first) / first * 100.0;
            Some(StateGrowth {
                state: state.clone(),
                growth_pct,
                fill: growth_color(growth_pct).to_string(),
                population: population.get(state),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PopulationRecord;

    fn rec(state: &str, year: i32, value: f64) -> MetricRecord {
        MetricRecord {
            state: state.to_string(),
            year,
            value,
        }
    }

    fn states(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_heatmap_missing_cells_are_null() {
        let records = vec![rec("Alabama", 2014, 210.0), rec("Alaska", 2015, f64::NAN)];
        let index = JoinIndex::new(&records);

        let payload = heatmap_matrix(&index, &states(&["Alabama", "Alaska"]));
        assert_eq!(payload.row_labels, vec![2014, 2015]);
        assert_eq!(payload.col_labels, vec!["Alabama", "Alaska"]);
        // Only (Alabama, 2014) carries data; the NaN cell is also null.
        assert_eq!(
            payload.rows,
            vec![vec![Some(210.0), None], vec![None, None]]
        );
    }

    #[test]
    fn test_average_bar_sorted_descending() {
        let records = vec![
            rec("Iowa", 2014, 100.0),
            rec("Iowa", 2015, 110.0),
            rec("Utah", 2014, 300.0),
            rec("Ohio", 2014, 200.0),
        ];

        let payload = average_bar(&records, &states(&["Iowa", "Ohio", "Utah"]));
        assert_eq!(payload.categories, vec!["Utah", "Ohio", "Iowa"]);
        assert_eq!(payload.values, vec![300.0, 200.0, 105.0]);
    }

    #[test]
    fn test_average_bar_empty_selection() {
        let payload = average_bar(&[], &[]);
        assert!(payload.categories.is_empty());
        assert!(payload.values.is_empty());
    }

    #[test]
    fn test_increase_bar_attaches_population() {
        let records = vec![
            rec("California", 2014, 400.0),
            rec("California", 2024, 600.0),
            rec("Texas", 2014, 300.0),
            rec("Texas", 2024, 350.0),
        ];
        let population = PopulationIndex::new(&[PopulationRecord {
            state: "California".to_string(),
            population: 39_500_000,
        }]);

        let payload = increase_bar(
            &records,
            &population,
            &states(&["Texas", "California"]),
            2014,
            2024,
        );
        assert_eq!(payload.categories, vec!["California", "Texas"]);
        assert_eq!(payload.values, vec![200.0, 50.0]);
        assert_eq!(payload.populations, vec![Some(39_500_000), None]);
    }

    #[test]
    fn test_scatter_excludes_join_misses() {
        let hpi = vec![rec("Texas", 2020, 300.0), rec("Texas", 2021, 310.0)];
        let inflation = vec![rec("Texas", 2020, 2.0)];
        let hpi_index = JoinIndex::new(&hpi);
        let inflation_index = JoinIndex::new(&inflation);

        let traces = scatter_series(&hpi_index, &inflation_index, &states(&["Texas"]));
        assert_eq!(traces.len(), 1);
        assert_eq!(traces[0].years, vec![2020]);
        assert_eq!(traces[0].x, vec![2.0]);
        assert_eq!(traces[0].y, vec![300.0]);
    }

    #[test]
    fn test_line_series_chronological_per_state() {
        let records = vec![
            rec("Ohio", 2016, 3.0),
            rec("Ohio", 2014, 1.0),
            rec("Iowa", 2015, 7.0),
        ];
        let index = JoinIndex::new(&records);

        let traces = line_series(&index, &states(&["Ohio", "Iowa"]));
        assert_eq!(traces[0].years, vec![2014, 2016]);
        assert_eq!(traces[0].values, vec![1.0, 3.0]);
        assert_eq!(traces[1].years, vec![2015]);
    }

    #[test]
    fn test_choropleth_growth_and_ramp() {
        let records = vec![
            rec("California", 2014, 400.0),
            rec("California", 2024, 600.0),
            rec("Maine", 2014, 100.0),
        ];
        let index = JoinIndex::new(&records);
        let population = PopulationIndex::new(&[]);

        let entries = choropleth(&index, &population, &states(&["California", "Maine"]));
        // Maine has a single record and is skipped.
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].state, "California");
        assert_eq!(entries[0].growth_pct, 50.0);
        assert_eq!(entries[0].fill, "#FC4E2A");
    }

    #[test]
    fn test_growth_color_buckets() {
        assert_eq!(growth_color(150.0), "#800026");
        assert_eq!(growth_color(7.5), "#FEB24C");
        assert_eq!(growth_color(0.0), "#FFEDA0");
        assert_eq!(growth_color(-3.0), "#FFEDA0");
    }
}
