mod app;
mod color;
mod state;
mod ui;

use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;

use app::{SegmentLensApp, APP_NAME};
use segment_lens::cli::Args;
use segment_lens::data::filter::{self, FilterState};
use segment_lens::SegmentReport;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut cache = args.cache();

    if args.report {
        let dataset = cache
            .get_or_load(&args.data)
            .with_context(|| format!("loading {}", args.data.display()))?;
        let subset = filter::apply(&dataset.customers, &FilterState::all(&dataset.options));
        let report = SegmentReport::build(&subset, dataset.len());

        let mut out = std::io::stdout().lock();
        serde_json::to_writer_pretty(&mut out, &report).context("writing report JSON")?;
        writeln!(out)?;
        return Ok(());
    }

    let mut state = AppState::new(cache);
    // A missing default file is not fatal: the error shows in the status line
    // and another file can be opened from the menu.
    state.open(&args.data);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        options,
        Box::new(move |_cc| Ok(Box::new(SegmentLensApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard: {e}"))
}
