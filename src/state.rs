use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use segment_lens::analysis::report::SegmentReport;
use segment_lens::data::cache::DatasetCache;
use segment_lens::data::filter::{self, Dimension, FilterState};
use segment_lens::data::model::{AgeBracket, Dataset, Gender};

use crate::color::Palettes;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Session cache; owns the clock year and the gender seed.
    pub cache: DatasetCache,

    /// Loaded dataset (None until a file loads).
    pub dataset: Option<Arc<Dataset>>,

    /// Per-dimension filter selections.
    pub filters: FilterState,

    /// Report for the current selections (recomputed on every change).
    pub report: Option<SegmentReport>,

    /// Category colours for the loaded dataset.
    pub palettes: Palettes,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(cache: DatasetCache) -> Self {
        Self {
            cache,
            dataset: None,
            filters: FilterState::default(),
            report: None,
            palettes: Palettes::default(),
            status_message: None,
        }
    }

    /// Load `path` through the cache and show it.
    pub fn open(&mut self, path: &Path) {
        let result = self.cache.get_or_load(path);
        self.handle_load(result);
    }

    /// Re-read the current file, bypassing the cache.
    pub fn reload(&mut self) {
        let Some(path) = self.dataset.as_ref().map(|ds| ds.source.clone()) else {
            return;
        };
        let result = self.cache.reload(&path);
        self.handle_load(result);
    }

    fn handle_load(&mut self, result: Result<Arc<Dataset>, segment_lens::DataLoadError>) {
        match result {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load dataset: {e:#}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Ingest a newly loaded dataset, select every option and compute the
    /// first report.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.filters = FilterState::all(&dataset.options);
        self.palettes = Palettes::new(&dataset.options);
        self.status_message = (dataset.skipped_rows > 0)
            .then(|| format!("{} unreadable rows skipped", dataset.skipped_rows));
        self.dataset = Some(dataset);
        self.refilter();
    }

    /// Recompute subset, aggregates and insights after a filter change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            let subset = filter::apply(&ds.customers, &self.filters);
            self.report = Some(SegmentReport::build(&subset, ds.len()));
        }
    }

    pub fn select_all(&mut self, dimension: Dimension) {
        let Some(ds) = self.dataset.clone() else {
            return;
        };
        self.filters.select_all(dimension, &ds.options);
        self.refilter();
    }

    pub fn select_none(&mut self, dimension: Dimension) {
        self.filters.select_none(dimension);
        self.refilter();
    }

    pub fn toggle_marital_status(&mut self, status: &str) {
        filter::toggle(&mut self.filters.marital_statuses, &status.to_string());
        self.refilter();
    }

    pub fn toggle_age_bracket(&mut self, bracket: &AgeBracket) {
        filter::toggle(&mut self.filters.age_brackets, bracket);
        self.refilter();
    }

    pub fn toggle_gender(&mut self, gender: &Gender) {
        filter::toggle(&mut self.filters.genders, gender);
        self.refilter();
    }

    /// Write the current report as pretty JSON.
    pub fn export_report(&self, path: &Path) -> Result<()> {
        let report = self.report.as_ref().context("no report to export")?;
        let file = File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, report).context("writing report JSON")?;
        writer.flush().context("flushing report JSON")?;
        log::info!("Exported segment report to {}", path.display());
        Ok(())
    }
}
