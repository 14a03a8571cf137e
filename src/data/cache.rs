use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::derive::current_year;
use super::loader::load_dataset;
use super::model::Dataset;
use crate::error::DataLoadError;

/// Holds the enriched dataset for the lifetime of a session.
///
/// The entry is keyed by input path: asking for the same path again returns
/// the same `Arc` without touching the file. A different path, [`reload`]
/// or [`invalidate`] are the only ways to read the file again.
///
/// The clock year is read once, on the first load, and reused for every later
/// load so ages stay stable while the session lasts.
///
/// [`reload`]: DatasetCache::reload
/// [`invalidate`]: DatasetCache::invalidate
#[derive(Debug)]
pub struct DatasetCache {
    seed: u64,
    session_year: Option<i32>,
    entry: Option<(PathBuf, Arc<Dataset>)>,
}

impl DatasetCache {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            session_year: None,
            entry: None,
        }
    }

    /// A cache whose session year is fixed instead of read from the clock.
    pub fn with_year(seed: u64, year: i32) -> Self {
        Self {
            seed,
            session_year: Some(year),
            entry: None,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Year used for age derivation, reading the clock on first use.
    pub fn session_year(&mut self) -> i32 {
        *self.session_year.get_or_insert_with(current_year)
    }

    /// Currently cached dataset, if any.
    pub fn current(&self) -> Option<Arc<Dataset>> {
        self.entry.as_ref().map(|(_, ds)| Arc::clone(ds))
    }

    /// Return the cached dataset for `path`, loading it on a miss.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<Dataset>, DataLoadError> {
        if let Some((cached_path, ds)) = &self.entry {
            if cached_path == path {
                log::debug!("Dataset cache hit for {}", path.display());
                return Ok(Arc::clone(ds));
            }
        }
        self.reload(path)
    }

    /// Load `path` unconditionally and replace the cached entry.
    ///
    /// On failure the previous entry is kept.
    pub fn reload(&mut self, path: &Path) -> Result<Arc<Dataset>, DataLoadError> {
        let year = self.session_year();
        let dataset = Arc::new(load_dataset(path, year, self.seed)?);
        self.entry = Some((path.to_path_buf(), Arc::clone(&dataset)));
        Ok(dataset)
    }

    /// Drop the cached entry; the next `get_or_load` reads the file again.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn fixture(rows: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "Year_Birth;Marital_Status;MntWines;MntFruits;MntMeatProducts;MntFishProducts;MntSweetProducts;MntGoldProds"
        )
        .unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        file
    }

    #[test]
    fn same_path_hits_cache() {
        let file = fixture(&["1980;Married;1;2;3;4;5;6"]);
        let mut cache = DatasetCache::with_year(42, 2024);
        let a = cache.get_or_load(file.path()).unwrap();
        let b = cache.get_or_load(file.path()).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.customers[0].age, Some(44));
    }

    #[test]
    fn invalidate_and_path_change_reload() {
        let first = fixture(&["1980;Married;1;2;3;4;5;6"]);
        let second = fixture(&["1990;Single;0;0;0;0;0;0", "1991;Single;0;0;0;0;0;0"]);
        let mut cache = DatasetCache::with_year(42, 2024);

        let a = cache.get_or_load(first.path()).unwrap();
        cache.invalidate();
        assert!(cache.current().is_none());
        let b = cache.get_or_load(first.path()).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));

        let c = cache.get_or_load(second.path()).unwrap();
        assert_eq!(c.len(), 2);
        assert_eq!(c.current_year, 2024);
    }

    #[test]
    fn failed_reload_keeps_previous_entry() {
        let file = fixture(&["1980;Married;1;2;3;4;5;6"]);
        let mut cache = DatasetCache::with_year(42, 2024);
        cache.get_or_load(file.path()).unwrap();
        assert!(cache.get_or_load(Path::new("missing.csv")).is_err());
        assert_eq!(cache.current().unwrap().len(), 1);
    }

    #[test]
    fn session_year_is_read_once() {
        let mut cache = DatasetCache::new(1);
        let first = cache.session_year();
        assert_eq!(cache.session_year(), first);
    }
}
