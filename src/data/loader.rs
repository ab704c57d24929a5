//! CSV Data Loader Module
//! Loads the three source CSVs concurrently using Polars.

use log::debug;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use thiserror::Error;

/// Source file names. `State_poplution.csv` really is spelled that way in
/// the upstream export.
pub const HPI_FILE: &str = "state_hpi.csv";
pub const INFLATION_FILE: &str = "state_inflation_rates.csv";
pub const POPULATION_FILE: &str = "State_poplution.csv";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Dataset loader thread panicked")]
    ThreadPanicked,
}

/// The three raw tables, loaded but not yet typed.
pub struct RawTables {
    pub hpi: DataFrame,
    pub inflation: DataFrame,
    pub population: DataFrame,
}

/// Load a single CSV file using Polars.
pub fn load_csv(path: &Path) -> Result<DataFrame, LoaderError> {
    // Use lazy evaluation for memory efficiency, then collect
    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .finish()?
        .collect()?;

    debug!(
        "{}: {} rows, {} columns",
        path.display(),
        df.height(),
        df.width()
    );
    Ok(df)
}

/// Load all three datasets concurrently and wait for every one of them.
///
/// This is a join-all barrier with no partial-result path: the first failed
/// load is returned and the dashboard never sees an incomplete set. There is
/// no retry; a failed load is terminal for the session.
pub fn load_all(dir: &Path) -> Result<RawTables, LoaderError> {
    let spawn_load = |file: &str| -> JoinHandle<Result<DataFrame, LoaderError>> {
        let path: PathBuf = dir.join(file);
        thread::spawn(move || load_csv(&path))
    };

    let hpi_handle = spawn_load(HPI_FILE);
    let inflation_handle = spawn_load(INFLATION_FILE);
    let population_handle = spawn_load(POPULATION_FILE);

    let join = |handle: JoinHandle<Result<DataFrame, LoaderError>>| {
        handle.join().map_err(|_| LoaderError::ThreadPanicked)?
    };

    // Wait for all three before surfacing any error.
    let hpi = join(hpi_handle);
    let inflation = join(inflation_handle);
    let population = join(population_handle);

    Ok(RawTables {
        hpi: hpi?,
        inflation: inflation?,
        population: population?,
    })
}
