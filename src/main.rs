//! statedash - State Housing & Inflation Analytics
//!
//! Loads the three state-level CSVs, builds every dashboard chart payload
//! for the requested selection and writes the result as JSON for the
//! presentation layer.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{bail, ensure, Context, Result};
use log::{info, warn};

use statedash::dashboard::{self, DashboardData, Selection};
use statedash::data::{self, normalize_state};

const USAGE: &str = "\
Usage: statedash [OPTIONS] [DATA_DIR]

Loads state_hpi.csv, state_inflation_rates.csv and State_poplution.csv from
DATA_DIR (default: data) and writes the dashboard chart payloads as JSON.

Options:
  --states <A,B,..>   Comma-separated state filter (default: every state in the HPI data)
  --years <FROM-TO>   Inclusive year range filter, e.g. 2014-2024
  --out <FILE>        Write JSON to FILE instead of stdout
  -h, --help          Show this help";

struct CliOptions {
    data_dir: PathBuf,
    states: Option<Vec<String>>,
    years: Option<(i32, i32)>,
    out: Option<PathBuf>,
}

impl CliOptions {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut options = CliOptions {
            data_dir: PathBuf::from("data"),
            states: None,
            years: None,
            out: None,
        };
        let mut dir_set = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--states" => {
                    let value = args.next().context("--states needs a value")?;
                    options.states = Some(
                        value
                            .split(',')
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty())
                            .collect(),
                    );
                }
                "--years" => {
                    let value = args.next().context("--years needs a value")?;
                    options.years = Some(parse_year_range(&value)?);
                }
                "--out" => {
                    let value = args.next().context("--out needs a value")?;
                    options.out = Some(PathBuf::from(value));
                }
                "-h" | "--help" => {
                    println!("{USAGE}");
                    process::exit(0);
                }
                other if other.starts_with('-') => bail!("Unknown option `{other}`\n{USAGE}"),
                other => {
                    ensure!(!dir_set, "More than one DATA_DIR given\n{USAGE}");
                    options.data_dir = PathBuf::from(other);
                    dir_set = true;
                }
            }
        }

        Ok(options)
    }
}

fn parse_year_range(raw: &str) -> Result<(i32, i32)> {
    let (from, to) = raw
        .split_once('-')
        .context("Year range must look like 2014-2024")?;
    let from: i32 = from.trim().parse().context("Invalid start year")?;
    let to: i32 = to.trim().parse().context("Invalid end year")?;
    ensure!(from <= to, "Year range start {from} is after end {to}");
    Ok((from, to))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = CliOptions::parse(env::args().skip(1))?;

    let tables = data::load_all(&options.data_dir)
        .with_context(|| format!("Loading datasets from {}", options.data_dir.display()))?;
    let data = DashboardData::from_tables(&tables)?;
    info!(
        "Loaded {} HPI rows, {} inflation rows, {} population rows, {} states",
        data.hpi.len(),
        data.inflation.len(),
        data.population.len(),
        data.states.len()
    );

    let mut selection = match options.states {
        Some(states) => Selection {
            states,
            year_range: None,
        },
        None => Selection::all_states(&data),
    };
    selection.year_range = options.years;

    for state in &selection.states {
        let known = data
            .states
            .iter()
            .any(|s| normalize_state(s) == normalize_state(state));
        if !known {
            warn!("State `{state}` is not present in the HPI data");
        }
    }

    let payload = dashboard::build(&data, &selection);
    let json = serde_json::to_string_pretty(&payload)?;

    match options.out {
        Some(path) => {
            fs::write(&path, json).with_context(|| format!("Writing {}", path.display()))?;
            info!("Dashboard payload written to {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
