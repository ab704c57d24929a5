//! statedash - State Housing & Inflation Analytics Core
//!
//! Loads three state-level CSV datasets (housing price index, inflation
//! rates, population), joins them on a canonical `(state, year)` key and
//! reshapes them into the exact payloads each dashboard chart consumes.
//! Rendering is left to the presentation layer; everything here is a pure
//! transform of the loaded datasets.

pub mod charts;
pub mod dashboard;
pub mod data;
pub mod stats;

pub use dashboard::{build, DashboardData, DashboardPayload, Selection};
