use std::collections::BTreeMap;

use serde::Serialize;

use super::aggregate::{
    age_by_marital_status, age_histogram, count, gender_distribution, mean_age,
    mean_spend_by_age_bracket, mean_total_spend, mode_gender, percent_of_total,
    population_pyramid, BracketSpend, FiveNumberSummary, HistogramBin, PyramidRow,
    DEFAULT_HISTOGRAM_BINS,
};
use super::insight::{compose, Insights};
use crate::data::filter::Subset;
use crate::data::model::Gender;

// ---------------------------------------------------------------------------
// Metric tiles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DominantGender {
    pub gender: Gender,
    pub count: usize,
}

/// Headline numbers. `None` means "not applicable" for the current subset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentMetrics {
    pub count: usize,
    pub percent_of_total: Option<f64>,
    pub mean_total_spend: Option<f64>,
    pub mean_age: Option<f64>,
    pub dominant_gender: Option<DominantGender>,
}

impl SegmentMetrics {
    pub fn compute(subset: &Subset<'_>, total: usize) -> Self {
        SegmentMetrics {
            count: count(subset),
            percent_of_total: percent_of_total(subset, total).ok(),
            mean_total_spend: mean_total_spend(subset).ok(),
            mean_age: mean_age(subset).ok(),
            dominant_gender: mode_gender(subset)
                .ok()
                .map(|(gender, count)| DominantGender { gender, count }),
        }
    }
}

/// Display value for a metric that does not apply to the current subset.
pub const NOT_APPLICABLE: &str = "N/A";

fn or_na<T>(value: Option<T>, render: impl FnOnce(T) -> String) -> String {
    value.map(render).unwrap_or_else(|| NOT_APPLICABLE.to_string())
}

impl SegmentMetrics {
    pub fn count_label(&self) -> String {
        self.count.to_string()
    }

    pub fn share_label(&self) -> String {
        or_na(self.percent_of_total, |v| format!("{v:.1}% of total"))
    }

    pub fn spend_label(&self) -> String {
        or_na(self.mean_total_spend, |v| format!("${v:.0}"))
    }

    pub fn age_label(&self) -> String {
        or_na(self.mean_age, |v| format!("{v:.1} years"))
    }

    pub fn gender_label(&self) -> String {
        or_na(self.dominant_gender, |d| d.gender.to_string())
    }

    pub fn gender_count_label(&self) -> Option<String> {
        self.dominant_gender.map(|d| format!("{} customers", d.count))
    }
}

// ---------------------------------------------------------------------------
// Chart data and the full report
// ---------------------------------------------------------------------------

/// Everything the charts draw for one subset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub age_histogram: Vec<HistogramBin>,
    pub age_by_marital_status: BTreeMap<String, FiveNumberSummary>,
    pub mean_spend_by_age_bracket: Vec<BracketSpend>,
    pub population_pyramid: BTreeMap<i32, PyramidRow>,
    pub gender_distribution: BTreeMap<Gender, usize>,
}

/// Output of one recomputation cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SegmentReport {
    /// No customer passes the filters; charts and insights are skipped.
    NoMatches { metrics: SegmentMetrics },
    Populated {
        metrics: SegmentMetrics,
        charts: ChartData,
        insights: Insights,
    },
}

impl SegmentReport {
    /// Compute metrics, then charts and insights unless the subset is empty.
    pub fn build(subset: &Subset<'_>, total: usize) -> Self {
        let metrics = SegmentMetrics::compute(subset, total);
        log::debug!("Recomputing segment report for {} of {total} customers", subset.len());

        if subset.is_empty() {
            return SegmentReport::NoMatches { metrics };
        }

        let spend = mean_spend_by_age_bracket(subset);
        let (Ok(histogram), Ok(insights)) = (
            age_histogram(subset, DEFAULT_HISTOGRAM_BINS),
            compose(subset, &spend),
        ) else {
            // Only reachable when no selected customer has an age.
            return SegmentReport::NoMatches { metrics };
        };

        SegmentReport::Populated {
            metrics,
            charts: ChartData {
                age_histogram: histogram,
                age_by_marital_status: age_by_marital_status(subset),
                mean_spend_by_age_bracket: spend,
                population_pyramid: population_pyramid(subset),
                gender_distribution: gender_distribution(subset),
            },
            insights,
        }
    }

    pub fn metrics(&self) -> &SegmentMetrics {
        match self {
            SegmentReport::NoMatches { metrics } | SegmentReport::Populated { metrics, .. } => {
                metrics
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, SegmentReport::NoMatches { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{AgeBracket, EnrichedCustomerRecord, Spend};

    fn customer(age: i32, gender: Gender) -> EnrichedCustomerRecord {
        EnrichedCustomerRecord {
            year_birth: Some(2024 - age),
            marital_status: Some("Single".into()),
            spend: Spend::default(),
            age: Some(age),
            total_spend: 12.0,
            gender,
            age_bracket: AgeBracket::from_age(age),
        }
    }

    #[test]
    fn empty_subset_reports_no_matches_with_na_metrics() {
        let data: Vec<EnrichedCustomerRecord> = Vec::new();
        let subset: Subset<'_> = data.iter().collect();
        let report = SegmentReport::build(&subset, 40);
        assert!(report.is_empty());
        let m = report.metrics();
        assert_eq!(m.count, 0);
        assert_eq!(m.share_label(), "0.0% of total");
        assert_eq!(m.spend_label(), "N/A");
        assert_eq!(m.age_label(), "N/A");
        assert_eq!(m.gender_label(), "N/A");
        assert_eq!(m.gender_count_label(), None);
    }

    #[test]
    fn populated_report_has_charts_and_insights() {
        let data = vec![customer(30, Gender::Mujer), customer(50, Gender::Hombre)];
        let subset: Subset<'_> = data.iter().collect();
        let SegmentReport::Populated { metrics, charts, insights } = SegmentReport::build(&subset, 4)
        else {
            panic!("expected populated report");
        };
        assert_eq!(metrics.spend_label(), "$12");
        assert_eq!(metrics.share_label(), "50.0% of total");
        assert_eq!(metrics.gender_label(), "Hombre");
        assert_eq!(charts.mean_spend_by_age_bracket.len(), 2);
        assert_eq!(insights.target_age, 40);
    }

    #[test]
    fn report_serializes_with_status_tag() {
        let data: Vec<EnrichedCustomerRecord> = Vec::new();
        let subset: Subset<'_> = data.iter().collect();
        let json = serde_json::to_value(SegmentReport::build(&subset, 1)).unwrap();
        assert_eq!(json["status"], "no_matches");
        assert_eq!(json["metrics"]["mean_age"], serde_json::Value::Null);
    }
}
