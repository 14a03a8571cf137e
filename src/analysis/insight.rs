use serde::Serialize;

use super::aggregate::{median_age, mode_marital_status, BracketSpend};
use crate::data::filter::Subset;
use crate::error::{AnalysisError, AnalysisResult};

/// The three descriptive facts shown under the charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    /// Median age, truncated.
    pub target_age: i64,
    /// Bracket with the highest mean spend.
    pub top_spend: BracketSpend,
    pub dominant_marital_status: String,
}

impl Insights {
    /// Human-readable sentences, one per insight.
    pub fn lines(&self) -> [String; 3] {
        [
            format!("Primary target audience: {} years (median).", self.target_age),
            format!(
                "Highest average spend: {} with ${:.0}.",
                self.top_spend.bracket, self.top_spend.mean_total_spend
            ),
            format!("Most common marital status: {}.", self.dominant_marital_status),
        ]
    }
}

/// Bracket with the maximum mean spend; on a tie the earliest bracket wins.
pub fn top_spend_bracket(spend_by_bracket: &[BracketSpend]) -> Option<BracketSpend> {
    spend_by_bracket.iter().copied().fold(None, |best, entry| match best {
        Some(b) if b.mean_total_spend >= entry.mean_total_spend => Some(b),
        _ => Some(entry),
    })
}

/// Derive the insights from a non-empty subset and its per-bracket spend.
///
/// Callers are expected to short-circuit on an empty subset; doing so here
/// anyway yields [`AnalysisError::InsufficientData`].
pub fn compose(subset: &Subset<'_>, spend_by_bracket: &[BracketSpend]) -> AnalysisResult<Insights> {
    if subset.is_empty() {
        return Err(AnalysisError::InsufficientData);
    }
    let insufficient = |_: AnalysisError| AnalysisError::InsufficientData;

    let target_age = median_age(subset).map_err(insufficient)?.trunc() as i64;
    let top_spend = top_spend_bracket(spend_by_bracket).ok_or(AnalysisError::InsufficientData)?;
    let (dominant_marital_status, _) = mode_marital_status(subset).map_err(insufficient)?;

    Ok(Insights {
        target_age,
        top_spend,
        dominant_marital_status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::aggregate::mean_spend_by_age_bracket;
    use crate::data::model::{AgeBracket, EnrichedCustomerRecord, Gender, Spend};

    fn customer(status: &str, age: i32, spend: f64) -> EnrichedCustomerRecord {
        EnrichedCustomerRecord {
            year_birth: Some(2024 - age),
            marital_status: Some(status.to_string()),
            spend: Spend::default(),
            age: Some(age),
            total_spend: spend,
            gender: Gender::Mujer,
            age_bracket: AgeBracket::from_age(age),
        }
    }

    fn bracket(age: i32, mean: f64) -> BracketSpend {
        BracketSpend {
            bracket: AgeBracket::from_age(age).unwrap(),
            mean_total_spend: mean,
        }
    }

    #[test]
    fn composes_all_three_facts() {
        let data = vec![
            customer("Married", 33, 50.0),
            customer("Single", 48, 900.0),
            customer("Married", 51, 300.0),
            customer("Divorced", 62, 10.0),
        ];
        let subset: Subset<'_> = data.iter().collect();
        let spend = mean_spend_by_age_bracket(&subset);
        let insights = compose(&subset, &spend).unwrap();

        // median of 33, 48, 51, 62 is 49.5
        assert_eq!(insights.target_age, 49);
        assert_eq!(insights.top_spend.bracket.to_string(), "40-49");
        assert_eq!(insights.dominant_marital_status, "Married");
        assert!(insights.lines()[1].contains("40-49 with $900"));
    }

    #[test]
    fn top_spend_tie_keeps_first_bracket() {
        let spend = [bracket(25, 10.0), bracket(35, 40.0), bracket(45, 40.0)];
        assert_eq!(top_spend_bracket(&spend), Some(bracket(35, 40.0)));
        assert_eq!(top_spend_bracket(&[]), None);
    }

    #[test]
    fn empty_subset_is_insufficient() {
        let data: Vec<EnrichedCustomerRecord> = Vec::new();
        let subset: Subset<'_> = data.iter().collect();
        assert_eq!(compose(&subset, &[]), Err(AnalysisError::InsufficientData));
    }
}
