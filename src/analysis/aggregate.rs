//! Descriptive aggregates over a filtered subset.
//!
//! Everything that needs at least one customer returns
//! [`AnalysisError::EmptyInput`] instead of producing NaN. Modes break ties by
//! the natural ordering of the value domain: the smallest tied value wins
//! (`Hombre` before `Mujer`, marital statuses alphabetically).

use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::filter::Subset;
use crate::data::model::{AgeBracket, Gender};
use crate::error::{AnalysisError, AnalysisResult};

/// Bin count of the age histogram.
pub const DEFAULT_HISTOGRAM_BINS: usize = 25;

fn empty(operation: &'static str) -> AnalysisError {
    AnalysisError::EmptyInput { operation }
}

// ---------------------------------------------------------------------------
// Scalar metrics
// ---------------------------------------------------------------------------

pub fn count(subset: &Subset<'_>) -> usize {
    subset.len()
}

/// Share of `total` customers that made it into the subset, in percent.
pub fn percent_of_total(subset: &Subset<'_>, total: usize) -> AnalysisResult<f64> {
    if total == 0 {
        return Err(empty("percent_of_total"));
    }
    Ok(subset.len() as f64 / total as f64 * 100.0)
}

pub fn mean_total_spend(subset: &Subset<'_>) -> AnalysisResult<f64> {
    if subset.is_empty() {
        return Err(empty("mean_total_spend"));
    }
    let sum: f64 = subset.iter().map(|c| c.total_spend).sum();
    Ok(sum / subset.len() as f64)
}

fn sorted_ages(subset: &Subset<'_>) -> Vec<f64> {
    let mut ages: Vec<f64> = subset.iter().filter_map(|c| c.age).map(f64::from).collect();
    ages.sort_by(f64::total_cmp);
    ages
}

/// Mean age over customers with a known age.
pub fn mean_age(subset: &Subset<'_>) -> AnalysisResult<f64> {
    let ages: Vec<i32> = subset.iter().filter_map(|c| c.age).collect();
    if ages.is_empty() {
        return Err(empty("mean_age"));
    }
    Ok(ages.iter().map(|&a| f64::from(a)).sum::<f64>() / ages.len() as f64)
}

/// Median age; the mean of the two middle values for even counts.
pub fn median_age(subset: &Subset<'_>) -> AnalysisResult<f64> {
    let ages = sorted_ages(subset);
    if ages.is_empty() {
        return Err(empty("median_age"));
    }
    Ok(quantile(&ages, 0.5))
}

/// Most frequent value and its count; the smallest value wins a tie.
fn mode_of<K: Ord>(values: impl Iterator<Item = K>) -> Option<(K, usize)> {
    let mut counts: BTreeMap<K, usize> = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_default() += 1;
    }
    let mut best: Option<(K, usize)> = None;
    for (value, n) in counts {
        if best.as_ref().map_or(true, |(_, top)| n > *top) {
            best = Some((value, n));
        }
    }
    best
}

/// Dominant gender and how many customers carry it.
pub fn mode_gender(subset: &Subset<'_>) -> AnalysisResult<(Gender, usize)> {
    mode_of(subset.iter().map(|c| c.gender)).ok_or_else(|| empty("mode_gender"))
}

/// Most common marital status and its count.
pub fn mode_marital_status(subset: &Subset<'_>) -> AnalysisResult<(String, usize)> {
    mode_of(subset.iter().filter_map(|c| c.marital_status.as_deref()))
        .map(|(s, n)| (s.to_string(), n))
        .ok_or_else(|| empty("mode_marital_status"))
}

// ---------------------------------------------------------------------------
// Age histogram
// ---------------------------------------------------------------------------

/// One histogram bar covering `[low, high)`; the last bin also includes `high`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub low: f64,
    pub high: f64,
    pub count: usize,
}

/// Equal-width bins spanning the observed age range.
pub fn age_histogram(subset: &Subset<'_>, bin_count: usize) -> AnalysisResult<Vec<HistogramBin>> {
    let ages = sorted_ages(subset);
    let (Some(&min), Some(&max)) = (ages.first(), ages.last()) else {
        return Err(empty("age_histogram"));
    };

    if max == min {
        return Ok(vec![HistogramBin {
            low: min,
            high: min + 1.0,
            count: ages.len(),
        }]);
    }

    let n = bin_count.max(1);
    let width = (max - min) / n as f64;
    let mut bins: Vec<HistogramBin> = (0..n)
        .map(|i| HistogramBin {
            low: min + i as f64 * width,
            high: if i + 1 == n { max } else { min + (i + 1) as f64 * width },
            count: 0,
        })
        .collect();

    for age in ages {
        let idx = (((age - min) / width).floor() as usize).min(n - 1);
        bins[idx].count += 1;
    }
    Ok(bins)
}

// ---------------------------------------------------------------------------
// Box plot: age by marital status
// ---------------------------------------------------------------------------

/// Min, quartiles and max of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl FiveNumberSummary {
    /// `sorted` must be ascending. Quartiles interpolate linearly between
    /// closest ranks.
    pub fn from_sorted(sorted: &[f64]) -> Option<Self> {
        let (&min, &max) = (sorted.first()?, sorted.last()?);
        Some(FiveNumberSummary {
            min,
            q1: quantile(sorted, 0.25),
            median: quantile(sorted, 0.5),
            q3: quantile(sorted, 0.75),
            max,
        })
    }
}

fn quantile(sorted: &[f64], p: f64) -> f64 {
    let pos = p * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

pub fn age_by_marital_status(subset: &Subset<'_>) -> BTreeMap<String, FiveNumberSummary> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for c in subset.iter() {
        if let (Some(status), Some(age)) = (c.marital_status.as_deref(), c.age) {
            groups.entry(status).or_default().push(f64::from(age));
        }
    }
    groups
        .into_iter()
        .filter_map(|(status, mut ages)| {
            ages.sort_by(f64::total_cmp);
            FiveNumberSummary::from_sorted(&ages).map(|s| (status.to_string(), s))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Spend per age bracket
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BracketSpend {
    pub bracket: AgeBracket,
    pub mean_total_spend: f64,
}

/// Mean total spend for each bracket present, ascending by bracket.
pub fn mean_spend_by_age_bracket(subset: &Subset<'_>) -> Vec<BracketSpend> {
    let mut sums: BTreeMap<AgeBracket, (f64, usize)> = BTreeMap::new();
    for c in subset.iter() {
        if let Some(bracket) = c.age_bracket {
            let entry = sums.entry(bracket).or_default();
            entry.0 += c.total_spend;
            entry.1 += 1;
        }
    }
    sums.into_iter()
        .map(|(bracket, (sum, n))| BracketSpend {
            bracket,
            mean_total_spend: sum / n as f64,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Gender breakdowns
// ---------------------------------------------------------------------------

/// Customers of each gender at one age.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PyramidRow {
    pub hombre: usize,
    pub mujer: usize,
}

/// Raw, non-negative counts per age. Drawing the male side to the left is
/// left to the chart.
pub fn population_pyramid(subset: &Subset<'_>) -> BTreeMap<i32, PyramidRow> {
    let mut rows: BTreeMap<i32, PyramidRow> = BTreeMap::new();
    for c in subset.iter() {
        let Some(age) = c.age else { continue };
        let row = rows.entry(age).or_default();
        match c.gender {
            Gender::Hombre => row.hombre += 1,
            Gender::Mujer => row.mujer += 1,
        }
    }
    rows
}

pub fn gender_distribution(subset: &Subset<'_>) -> BTreeMap<Gender, usize> {
    let mut counts = BTreeMap::new();
    for c in subset.iter() {
        *counts.entry(c.gender).or_default() += 1;
    }
    counts
}
