//! Typed Records Module
//! Extracts typed, key-normalized records from loaded DataFrames.
//!
//! The three source CSVs are only loosely joined: state names carry stray
//! punctuation in some files ("California*"), years arrive as strings or
//! numbers, and population values use thousands separators. Everything is
//! normalized here so the join layer can work with canonical keys.

use polars::prelude::*;
use serde::Serialize;
use thiserror::Error;

/// Column names as they appear in the source CSV headers.
pub const STATE_COL: &str = "State";
pub const YEAR_COL: &str = "Year";
pub const HPI_COL: &str = "HPI";
pub const INFLATION_COL: &str = "Inflation Rate (%)";
pub const POPULATION_COL: &str = "Population";

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Required column `{0}` is missing")]
    MissingColumn(String),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// One metric observation for a `(state, year)` pair.
///
/// `value` may be `NaN` when the source cell was empty or unparseable; the
/// record is kept so the other fields still reach the charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRecord {
    pub state: String,
    pub year: i32,
    pub value: f64,
}

/// One population figure per state; the source has no year dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationRecord {
    pub state: String,
    pub population: i64,
}

/// Canonicalize a state name: strip everything outside `[A-Za-z ]`, trim.
///
/// Idempotent, so already-clean names pass through unchanged and
/// population-source labels like `"California*"` match `"California"`.
pub fn normalize_state(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphabetic() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Coerce a year cell to a canonical integer.
///
/// Accepts `2014`, `"2014"`, `" 2014 "` and float-typed columns (`2014.0`).
fn coerce_year(raw: &str) -> Option<i32> {
    let trimmed = raw.trim();
    if let Ok(year) = trimmed.parse::<i32>() {
        return Some(year);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(|f| f as i32)
}

/// Parse a population cell, dropping thousands separators and any other
/// non-digit characters (`"39,500,000"` -> `39500000`).
fn parse_population(raw: &str) -> Option<i64> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Render an AnyValue cell as a plain string, or `None` when null/blank.
fn cell_string(value: &AnyValue) -> Option<String> {
    if value.is_null() {
        return None;
    }
    let text = value.to_string().trim_matches('"').trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Extract metric records from a loaded DataFrame.
///
/// Rows without a usable state or year cannot be keyed and are dropped
/// (this also covers fully blank rows); a missing metric cell becomes a
/// `NaN` value on a kept record. A missing required column is fatal for
/// the dataset.
pub fn metric_records(df: &DataFrame, value_col: &str) -> Result<Vec<MetricRecord>, ParseError> {
    let state_series = df
        .column(STATE_COL)
        .map_err(|_| ParseError::MissingColumn(STATE_COL.to_string()))?;
    let year_series = df
        .column(YEAR_COL)
        .map_err(|_| ParseError::MissingColumn(YEAR_COL.to_string()))?;
    let value_series = df
        .column(value_col)
        .map_err(|_| ParseError::MissingColumn(value_col.to_string()))?;
    let value_f64 = value_series.cast(&DataType::Float64)?;
    let value_ca = value_f64.f64()?;

    let mut records = Vec::with_capacity(df.height());
    let mut dropped = 0usize;

    for i in 0..df.height() {
        let (Ok(state_cell), Ok(year_cell)) = (state_series.get(i), year_series.get(i)) else {
            dropped += 1;
            continue;
        };

        let state = match cell_string(&state_cell).map(|s| normalize_state(&s)) {
            Some(s) if !s.is_empty() => s,
            _ => {
                dropped += 1;
                continue;
            }
        };
        let Some(year) = cell_string(&year_cell).and_then(|s| coerce_year(&s)) else {
            dropped += 1;
            continue;
        };

        let value = value_ca.get(i).unwrap_or(f64::NAN);
        records.push(MetricRecord { state, year, value });
    }

    if dropped > 0 {
        log::debug!("{}: dropped {} unusable rows", value_col, dropped);
    }

    Ok(records)
}

/// Extract population records from a loaded DataFrame.
///
/// Rows whose state or population cannot be parsed are dropped; an absent
/// population simply means the state won't match during joins.
pub fn population_records(df: &DataFrame) -> Result<Vec<PopulationRecord>, ParseError> {
    let state_series = df
        .column(STATE_COL)
        .map_err(|_| ParseError::MissingColumn(STATE_COL.to_string()))?;
    let pop_series = df
        .column(POPULATION_COL)
        .map_err(|_| ParseError::MissingColumn(POPULATION_COL.to_string()))?;

    let mut records = Vec::with_capacity(df.height());

    for i in 0..df.height() {
        let (Ok(state_cell), Ok(pop_cell)) = (state_series.get(i), pop_series.get(i)) else {
            continue;
        };

        let state = match cell_string(&state_cell).map(|s| normalize_state(&s)) {
            Some(s) if !s.is_empty() => s,
            _ => continue,
        };
        let Some(population) = cell_string(&pop_cell).and_then(|s| parse_population(&s)) else {
            continue;
        };

        records.push(PopulationRecord { state, population });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_state_strips_punctuation() {
        assert_eq!(normalize_state("California*"), "California");
        assert_eq!(normalize_state("  New York "), "New York");
        assert_eq!(normalize_state("D.C."), "DC");
    }

    #[test]
    fn test_normalize_state_is_idempotent() {
        for raw in ["California*", " Texas ", "North Carolina", ""] {
            let once = normalize_state(raw);
            assert_eq!(normalize_state(&once), once);
        }
    }

    #[test]
    fn test_coerce_year_formats() {
        assert_eq!(coerce_year("2014"), Some(2014));
        assert_eq!(coerce_year(" 2014 "), Some(2014));
        assert_eq!(coerce_year("2014.0"), Some(2014));
        assert_eq!(coerce_year("n/a"), None);
    }

    #[test]
    fn test_parse_population_thousands_separators() {
        assert_eq!(parse_population("39,500,000"), Some(39_500_000));
        assert_eq!(parse_population("512817"), Some(512_817));
        assert_eq!(parse_population("N/A"), None);
    }

    #[test]
    fn test_metric_records_coerces_string_years() {
        let df = df!(
            STATE_COL => &["California", "California"],
            YEAR_COL => &["2014", "2015"],
            HPI_COL => &[400.0, 425.5],
        )
        .unwrap();

        let records = metric_records(&df, HPI_COL).unwrap();
        assert_eq!(
            records,
            vec![
                MetricRecord {
                    state: "California".to_string(),
                    year: 2014,
                    value: 400.0
                },
                MetricRecord {
                    state: "California".to_string(),
                    year: 2015,
                    value: 425.5
                },
            ]
        );
    }

    #[test]
    fn test_metric_records_drops_blank_rows_keeps_nan_values() {
        let df = df!(
            STATE_COL => &[Some("Texas"), None, Some("Texas")],
            YEAR_COL => &[Some(2020i32), None, Some(2021)],
            HPI_COL => &[Some(300.0), None, None],
        )
        .unwrap();

        let records = metric_records(&df, HPI_COL).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].value, 300.0);
        // Missing metric cell on an otherwise keyed row stays as NaN.
        assert_eq!(records[1].year, 2021);
        assert!(records[1].value.is_nan());
    }

    #[test]
    fn test_metric_records_missing_column_is_fatal() {
        let df = df!(
            STATE_COL => &["Texas"],
            YEAR_COL => &[2020i32],
        )
        .unwrap();

        let err = metric_records(&df, HPI_COL).unwrap_err();
        assert!(matches!(err, ParseError::MissingColumn(col) if col == HPI_COL));
    }

    #[test]
    fn test_population_records_normalizes_and_parses() {
        let df = df!(
            STATE_COL => &["California*", "Texas", "???"],
            POPULATION_COL => &["39,500,000", "30,000,000", "1"],
        )
        .unwrap();

        let records = population_records(&df).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].state, "California");
        assert_eq!(records[0].population, 39_500_000);
    }
}
