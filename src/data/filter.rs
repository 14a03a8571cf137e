use std::collections::BTreeSet;

use super::model::{AgeBracket, EnrichedCustomerRecord, FilterOptions, Gender};

// ---------------------------------------------------------------------------
// Filter predicate: which values are selected per dimension
// ---------------------------------------------------------------------------

/// Allowed values for each of the three filter dimensions.
///
/// An empty set selects nothing: every record fails that dimension. This
/// mirrors the dashboard's multi-selects, where clearing a control hides all
/// customers rather than disabling the filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub marital_statuses: BTreeSet<String>,
    pub age_brackets: BTreeSet<AgeBracket>,
    pub genders: BTreeSet<Gender>,
}

/// One filter dimension, used by the select-all / select-none controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    MaritalStatus,
    AgeBracket,
    Gender,
}

impl FilterState {
    /// Every available option selected (i.e. show everything).
    pub fn all(options: &FilterOptions) -> Self {
        FilterState {
            marital_statuses: options.marital_statuses.clone(),
            age_brackets: options.age_brackets.clone(),
            genders: options.genders.clone(),
        }
    }

    /// A record passes when all three of its values are selected. Records
    /// without a marital status or age bracket never pass.
    pub fn matches(&self, record: &EnrichedCustomerRecord) -> bool {
        let status_ok = record
            .marital_status
            .as_ref()
            .is_some_and(|s| self.marital_statuses.contains(s));
        let bracket_ok = record
            .age_bracket
            .is_some_and(|b| self.age_brackets.contains(&b));
        status_ok && bracket_ok && self.genders.contains(&record.gender)
    }

    pub fn select_all(&mut self, dimension: Dimension, options: &FilterOptions) {
        match dimension {
            Dimension::MaritalStatus => self.marital_statuses = options.marital_statuses.clone(),
            Dimension::AgeBracket => self.age_brackets = options.age_brackets.clone(),
            Dimension::Gender => self.genders = options.genders.clone(),
        }
    }

    pub fn select_none(&mut self, dimension: Dimension) {
        match dimension {
            Dimension::MaritalStatus => self.marital_statuses.clear(),
            Dimension::AgeBracket => self.age_brackets.clear(),
            Dimension::Gender => self.genders.clear(),
        }
    }
}

/// Insert `value` if absent, remove it otherwise.
pub fn toggle<T: Ord + Clone>(selected: &mut BTreeSet<T>, value: &T) {
    if !selected.remove(value) {
        selected.insert(value.clone());
    }
}

// ---------------------------------------------------------------------------
// Subset – read-only filtered view
// ---------------------------------------------------------------------------

/// Customers passing a filter, in source order. Borrowed from the dataset and
/// never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Subset<'a> {
    records: Vec<&'a EnrichedCustomerRecord>,
}

impl<'a> Subset<'a> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a EnrichedCustomerRecord> + '_ {
        self.records.iter().copied()
    }

    pub fn records(&self) -> &[&'a EnrichedCustomerRecord] {
        &self.records
    }
}

impl<'a> FromIterator<&'a EnrichedCustomerRecord> for Subset<'a> {
    fn from_iter<I: IntoIterator<Item = &'a EnrichedCustomerRecord>>(iter: I) -> Self {
        Subset {
            records: iter.into_iter().collect(),
        }
    }
}

/// Return the records that pass `filters`, preserving order.
pub fn apply<'a, I>(records: I, filters: &FilterState) -> Subset<'a>
where
    I: IntoIterator<Item = &'a EnrichedCustomerRecord>,
{
    records.into_iter().filter(|r| filters.matches(r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Spend;

    fn customer(status: &str, age: i32, gender: Gender) -> EnrichedCustomerRecord {
        EnrichedCustomerRecord {
            year_birth: Some(2024 - age),
            marital_status: Some(status.to_string()),
            spend: Spend::default(),
            age: Some(age),
            total_spend: 0.0,
            gender,
            age_bracket: AgeBracket::from_age(age),
        }
    }

    fn sample() -> Vec<EnrichedCustomerRecord> {
        vec![
            customer("Married", 45, Gender::Hombre),
            customer("Single", 23, Gender::Mujer),
            customer("Together", 67, Gender::Mujer),
            customer("Single", 8, Gender::Hombre),
            customer("Married", 38, Gender::Mujer),
        ]
    }

    #[test]
    fn all_options_keep_every_bracketed_record_in_order() {
        let data = sample();
        let filters = FilterState::all(&FilterOptions::from_customers(&data));
        let subset = apply(&data, &filters);
        // The 8-year-old has no bracket and is never selectable.
        let expected: Vec<&EnrichedCustomerRecord> =
            data.iter().filter(|c| c.age_bracket.is_some()).collect();
        assert_eq!(subset.records(), expected.as_slice());
    }

    #[test]
    fn empty_dimension_excludes_everything() {
        let data = sample();
        let options = FilterOptions::from_customers(&data);
        for dim in [Dimension::MaritalStatus, Dimension::AgeBracket, Dimension::Gender] {
            let mut filters = FilterState::all(&options);
            filters.select_none(dim);
            assert!(apply(&data, &filters).is_empty(), "{dim:?}");
            filters.select_all(dim, &options);
            assert_eq!(apply(&data, &filters).len(), 4);
        }
    }

    #[test]
    fn narrows_by_each_dimension() {
        let data = sample();
        let mut filters = FilterState::all(&FilterOptions::from_customers(&data));
        filters.marital_statuses = BTreeSet::from(["Married".to_string()]);
        filters.genders = BTreeSet::from([Gender::Mujer]);
        let subset = apply(&data, &filters);
        assert_eq!(subset.len(), 1);
        assert_eq!(subset.records()[0].age, Some(38));
    }

    #[test]
    fn filtering_is_idempotent() {
        let data = sample();
        let mut filters = FilterState::all(&FilterOptions::from_customers(&data));
        toggle(&mut filters.age_brackets, &AgeBracket::from_age(45).unwrap());
        let once = apply(&data, &filters);
        let twice = apply(once.iter(), &filters);
        assert_eq!(once, twice);
    }

    #[test]
    fn toggle_flips_membership() {
        let mut set = BTreeSet::from([Gender::Hombre]);
        toggle(&mut set, &Gender::Hombre);
        assert!(set.is_empty());
        toggle(&mut set, &Gender::Mujer);
        assert!(set.contains(&Gender::Mujer));
    }
}
