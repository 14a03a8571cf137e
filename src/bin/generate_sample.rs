use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use segment_lens::data::loader::{DELIMITER, GENDER_COLUMN, REQUIRED_COLUMNS};

/// Write a synthetic marketing campaign export for trying out the dashboard
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Output file
    #[arg(default_value = "marketing_campaign.csv")]
    output: PathBuf,

    /// Number of customers to generate
    #[arg(short, long, default_value_t = 2240)]
    rows: usize,

    /// Leave out the Gender column so the dashboard synthesizes it
    #[arg(long)]
    no_gender: bool,

    /// Generator seed
    #[arg(short, long, default_value_t = 7)]
    seed: u64,
}

const MARITAL_STATUSES: [(&str, f64); 5] = [
    ("Married", 0.39),
    ("Together", 0.26),
    ("Single", 0.21),
    ("Divorced", 0.10),
    ("Widow", 0.04),
];

/// Mean spend per category for a mid-income customer.
const CATEGORY_MEANS: [f64; 6] = [300.0, 26.0, 165.0, 37.0, 27.0, 44.0];

fn pick_status(rng: &mut StdRng) -> &'static str {
    let mut roll: f64 = rng.gen();
    for (status, weight) in MARITAL_STATUSES {
        if roll < weight {
            return status;
        }
        roll -= weight;
    }
    MARITAL_STATUSES[0].0
}

/// One spend cell; about 2% are left blank to exercise missing values.
fn spend_cell(rng: &mut StdRng, mean: f64, factor: f64) -> String {
    if rng.gen_bool(0.02) {
        return String::new();
    }
    let amount = (mean * factor * rng.gen_range(0.0_f64..2.0)).round();
    format!("{amount}")
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = StdRng::seed_from_u64(args.seed);

    let mut writer = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;

    let mut header: Vec<&str> = vec!["ID"];
    header.extend(REQUIRED_COLUMNS);
    if !args.no_gender {
        header.push(GENDER_COLUMN);
    }
    writer.write_record(&header)?;

    for id in 0..args.rows {
        let year_birth = rng.gen_range(1940..2006);
        // Older customers spend a bit more on average.
        let factor = 0.5 + (2006 - year_birth) as f64 / 66.0;

        let mut row = vec![
            (5000 + id).to_string(),
            year_birth.to_string(),
            pick_status(&mut rng).to_string(),
        ];
        row.extend(CATEGORY_MEANS.iter().map(|&m| spend_cell(&mut rng, m, factor)));
        if !args.no_gender {
            let code = if rng.gen_bool(0.5) { "M" } else { "F" };
            row.push(code.to_string());
        }
        writer.write_record(&row)?;
    }
    writer.flush()?;

    println!("Wrote {} customers to {}", args.rows, args.output.display());
    Ok(())
}
