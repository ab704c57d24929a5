//! Statistics module - aggregation and correlation

mod calculator;

pub use calculator::{
    correlation_p_value, describe, endpoint_delta, mean_by_state, pearson_correlation,
    percent_change_series, PercentChange, SeriesStats,
};
