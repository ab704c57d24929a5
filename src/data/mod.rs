//! Data module - CSV loading, typed records and join indexes

mod join;
mod loader;
mod records;

pub use join::{JoinIndex, PopulationIndex};
pub use loader::{load_all, load_csv, LoaderError, RawTables};
pub use loader::{HPI_FILE, INFLATION_FILE, POPULATION_FILE};
pub use records::{metric_records, normalize_state, population_records};
pub use records::{MetricRecord, ParseError, PopulationRecord};
pub use records::{HPI_COL, INFLATION_COL, POPULATION_COL, STATE_COL, YEAR_COL};
