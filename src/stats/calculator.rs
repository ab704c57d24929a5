//! Statistics Calculator Module
//! Aggregations over metric records: means, endpoint deltas, year-over-year
//! change and correlation.
//!
//! Every function is a stateless transform of its inputs. Degenerate inputs
//! (empty match sets, zero variance, a zero base value) degrade to `0.0`,
//! `NaN` or `None` instead of failing, because a dashboard with one empty
//! chart still has to draw the rest.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::data::{normalize_state, MetricRecord};

/// One year-over-year change entry. `pct` is `None` when the previous value
/// was zero or either side was missing; renderers draw it as a gap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PercentChange {
    pub year: i32,
    pub pct: Option<f64>,
}

/// Descriptive summary of one value series.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for SeriesStats {
    fn default() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            median: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// One state's records sorted ascending by year, first occurrence winning
/// on duplicate years.
fn sorted_series<'a>(records: &'a [MetricRecord], state: &str) -> Vec<&'a MetricRecord> {
    let key = normalize_state(state);
    let mut series: Vec<&MetricRecord> = records.iter().filter(|r| r.state == key).collect();
    series.sort_by_key(|r| r.year);
    series.dedup_by_key(|r| r.year);
    series
}

/// Arithmetic mean of a state's finite values; `0.0` on an empty match set
/// (a bar of height zero, not an error).
pub fn mean_by_state(records: &[MetricRecord], state: &str) -> f64 {
    let key = normalize_state(state);
    let values: Vec<f64> = records
        .iter()
        .filter(|r| r.state == key && r.value.is_finite())
        .map(|r| r.value)
        .collect();

    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// `value(state, year_b) - value(state, year_a)`; `0.0` if either endpoint
/// is missing. Antisymmetric when both endpoints exist.
pub fn endpoint_delta(records: &[MetricRecord], state: &str, year_a: i32, year_b: i32) -> f64 {
    let key = normalize_state(state);
    let value_at = |year: i32| {
        records
            .iter()
            .find(|r| r.state == key && r.year == year)
            .map(|r| r.value)
            .filter(|v| v.is_finite())
    };

    match (value_at(year_a), value_at(year_b)) {
        (Some(a), Some(b)) => b - a,
        _ => 0.0,
    }
}

/// Year-over-year percent change over a state's chronological series.
///
/// The first year has no prior value and is dropped, so the output is one
/// element shorter than the series.
pub fn percent_change_series(records: &[MetricRecord], state: &str) -> Vec<PercentChange> {
    let series = sorted_series(records, state);

    series
        .windows(2)
        .map(|pair| {
            let (prev, current) = (pair[0], pair[1]);
            let pct = (prev.value.is_finite() && prev.value != 0.0 && current.value.is_finite())
                .then(|| (current.value - prev.value) / prev.value * 100.0);
            PercentChange {
                year: current.year,
                pct,
            }
        })
        .collect()
}

/// Product-moment correlation over two aligned sequences.
///
/// `NaN` when fewer than two finite pairs remain or either side has zero
/// variance; callers treat that as "insufficient data", never as a crash.
pub fn pearson_correlation(xs: &[f64], ys: &[f64]) -> f64 {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys.iter())
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(&x, &y)| (x, y))
        .collect();

    let n = pairs.len();
    if n < 2 {
        return f64::NAN;
    }

    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n as f64;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n as f64;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 {
        return f64::NAN;
    }
    covariance / denominator
}

/// Two-tailed significance of a correlation coefficient over `n` pairs,
/// via the exact t-distribution of r under the null hypothesis.
///
/// `None` when the test is undefined: fewer than three pairs, a non-finite
/// r, or |r| = 1 (zero residual variance).
pub fn correlation_p_value(r: f64, n: usize) -> Option<f64> {
    if n <= 2 || !r.is_finite() {
        return None;
    }
    let df = (n - 2) as f64;
    let r_squared = r * r;
    if r_squared >= 1.0 {
        return None;
    }

    let t = r * (df / (1.0 - r_squared)).sqrt();
    let dist = StudentsT::new(0.0, 1.0, df).ok()?;
    Some(2.0 * (1.0 - dist.cdf(t.abs())))
}

/// Compute descriptive statistics for an array of values.
pub fn describe(values: &[f64]) -> SeriesStats {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let n = finite.len();
    if n == 0 {
        return SeriesStats::default();
    }

    let mut sorted = finite.clone();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mean = finite.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let variance = if n > 1 {
        finite.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
    } else {
        0.0
    };

    SeriesStats {
        count: n,
        mean,
        median,
        std: variance.sqrt(),
        min: sorted[0],
        max: sorted[n - 1],
    }
}
