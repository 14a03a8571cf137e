use chrono::Datelike;
use rand::Rng;

use super::model::{AgeBracket, EnrichedCustomerRecord, Gender, RawCustomerRecord, RawSchema, RawTable};

/// Seed used for gender synthesis unless configured otherwise.
pub const DEFAULT_GENDER_SEED: u64 = 42;

/// Year of the local system clock.
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

// ---------------------------------------------------------------------------
// Gender strategy – chosen once per schema
// ---------------------------------------------------------------------------

/// How the `gender` field is produced for a whole table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenderStrategy {
    /// Map the source `M` / `F` column. Cells that are empty or hold any
    /// other value fall back to a seeded draw.
    MapSourceColumn,
    /// No source column: draw every label uniformly from the seeded RNG.
    Synthesize,
}

impl GenderStrategy {
    pub fn for_schema(schema: &RawSchema) -> Self {
        if schema.has_gender_column {
            GenderStrategy::MapSourceColumn
        } else {
            GenderStrategy::Synthesize
        }
    }

    fn gender_for<R: Rng + ?Sized>(self, raw: &RawCustomerRecord, rng: &mut R) -> Gender {
        match self {
            GenderStrategy::MapSourceColumn => raw
                .gender
                .as_deref()
                .and_then(Gender::from_source_code)
                .unwrap_or_else(|| draw_gender(rng)),
            GenderStrategy::Synthesize => draw_gender(rng),
        }
    }
}

fn draw_gender<R: Rng + ?Sized>(rng: &mut R) -> Gender {
    Gender::ALL[rng.gen_range(0..Gender::ALL.len())]
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// Compute age, total spend, gender and age bracket for every raw row.
///
/// Row order is preserved and the raw table is left untouched. Draws from
/// `rng` happen in row order, so a fixed seed gives a fixed gender sequence.
pub fn derive<R: Rng + ?Sized>(
    raw: &RawTable,
    current_year: i32,
    rng: &mut R,
) -> Vec<EnrichedCustomerRecord> {
    let strategy = GenderStrategy::for_schema(&raw.schema);
    log::debug!("Deriving {} customers with {strategy:?}", raw.records.len());

    raw.records
        .iter()
        .map(|rec| {
            // A birth year too far from the clock to subtract is an unknown age.
            let age = rec.year_birth.and_then(|year| current_year.checked_sub(year));
            EnrichedCustomerRecord {
                year_birth: rec.year_birth,
                marital_status: rec.marital_status.clone(),
                spend: rec.spend.clone(),
                age,
                total_spend: rec.spend.total(),
                gender: strategy.gender_for(rec, rng),
                age_bracket: age.and_then(AgeBracket::from_age),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Spend;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn table(has_gender_column: bool, records: Vec<RawCustomerRecord>) -> RawTable {
        RawTable {
            schema: RawSchema {
                headers: Vec::new(),
                has_gender_column,
            },
            records,
            skipped_rows: 0,
        }
    }

    fn person(year: i32, gender: Option<&str>) -> RawCustomerRecord {
        RawCustomerRecord {
            year_birth: Some(year),
            marital_status: Some("Single".into()),
            gender: gender.map(String::from),
            spend: Spend::default(),
        }
    }

    #[test]
    fn single_record_scenario() {
        let raw = table(false, vec![person(1990, None)]);
        let mut rng = StdRng::seed_from_u64(DEFAULT_GENDER_SEED);
        let out = derive(&raw, 2024, &mut rng);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].age, Some(34));
        assert_eq!(out[0].age_bracket.unwrap().to_string(), "30-39");
        assert_eq!(out[0].total_spend, 0.0);
    }

    #[test]
    fn future_birth_year_passes_through() {
        let raw = table(false, vec![person(2030, None)]);
        let out = derive(&raw, 2024, &mut StdRng::seed_from_u64(1));
        assert_eq!(out[0].age, Some(-6));
        assert_eq!(out[0].age_bracket, None);
    }

    #[test]
    fn unknown_birth_year_has_no_age() {
        let mut rec = person(1990, None);
        rec.year_birth = None;
        let out = derive(&table(false, vec![rec]), 2024, &mut StdRng::seed_from_u64(1));
        assert_eq!(out[0].age, None);
        assert_eq!(out[0].age_bracket, None);
    }

    #[test]
    fn extreme_birth_year_is_unknown_age() {
        let raw = table(false, vec![person(1990, None), person(i32::MIN + 1000, None)]);
        let out = derive(&raw, 2024, &mut StdRng::seed_from_u64(1));
        assert_eq!(out[0].age, Some(34));
        assert_eq!(out[1].age, None);
        assert_eq!(out[1].age_bracket, None);
    }

    #[test]
    fn maps_source_gender() {
        let raw = table(true, vec![person(1980, Some("M")), person(1980, Some("F"))]);
        let out = derive(&raw, 2024, &mut StdRng::seed_from_u64(7));
        assert_eq!(out[0].gender, Gender::Hombre);
        assert_eq!(out[1].gender, Gender::Mujer);
    }

    #[test]
    fn synthesis_is_reproducible() {
        let records: Vec<_> = (0..200).map(|i| person(1950 + i % 50, None)).collect();
        let raw = table(false, records);
        let a = derive(&raw, 2024, &mut StdRng::seed_from_u64(DEFAULT_GENDER_SEED));
        let b = derive(&raw, 2024, &mut StdRng::seed_from_u64(DEFAULT_GENDER_SEED));
        let ga: Vec<Gender> = a.iter().map(|c| c.gender).collect();
        let gb: Vec<Gender> = b.iter().map(|c| c.gender).collect();
        assert_eq!(ga, gb);
        // Uniform draw over 200 rows uses both labels.
        assert!(ga.contains(&Gender::Hombre));
        assert!(ga.contains(&Gender::Mujer));
    }

    #[test]
    fn strategy_follows_schema() {
        assert_eq!(
            GenderStrategy::for_schema(&RawSchema { headers: vec![], has_gender_column: true }),
            GenderStrategy::MapSourceColumn
        );
        assert_eq!(
            GenderStrategy::for_schema(&RawSchema::default()),
            GenderStrategy::Synthesize
        );
    }

    #[test]
    fn raw_table_is_not_mutated() {
        let raw = table(true, vec![person(1980, Some("?"))]);
        let before = raw.records.clone();
        let _ = derive(&raw, 2024, &mut StdRng::seed_from_u64(3));
        assert_eq!(raw.records, before);
    }
}
