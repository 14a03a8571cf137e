//! Command-line interface definitions and argument parsing

use std::path::PathBuf;

use clap::Parser;

use crate::data::cache::DatasetCache;
use crate::data::derive::DEFAULT_GENDER_SEED;

/// Interactive marketing segmentation dashboard
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Semicolon-delimited marketing campaign export
    #[arg(short, long, default_value = "marketing_campaign.csv")]
    pub data: PathBuf,

    /// Seed for synthesizing gender when the file has no Gender column
    #[arg(short, long, default_value_t = DEFAULT_GENDER_SEED)]
    pub seed: u64,

    /// Year used to compute ages (defaults to the current year)
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Print the full-dataset report as JSON and exit instead of opening a window
    #[arg(long)]
    pub report: bool,
}

impl Args {
    /// Dataset cache configured from the arguments.
    pub fn cache(&self) -> DatasetCache {
        match self.year {
            Some(year) => DatasetCache::with_year(self.seed, year),
            None => DatasetCache::new(self.seed),
        }
    }
}
