use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Gender – always one of two labels after derivation
// ---------------------------------------------------------------------------

/// Customer gender label. The declaration order is the tie-break order used
/// by every mode computation (`Hombre` sorts before `Mujer`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Gender {
    Hombre,
    Mujer,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Hombre, Gender::Mujer];

    /// Map a source `Gender` cell (`M` / `F`) to a label.
    pub fn from_source_code(code: &str) -> Option<Self> {
        match code.trim() {
            c if c.eq_ignore_ascii_case("m") => Some(Gender::Hombre),
            c if c.eq_ignore_ascii_case("f") => Some(Gender::Mujer),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Gender::Hombre => "Hombre",
            Gender::Mujer => "Mujer",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// AgeBracket – decade bucket "10-19" … "90-99"
// ---------------------------------------------------------------------------

/// A decade-wide age bucket covering `[low, low + 10)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AgeBracket {
    low: i32,
}

impl AgeBracket {
    pub const MIN_AGE: i32 = 10;
    pub const MAX_AGE: i32 = 100;

    /// Bucket an age; `None` outside `[10, 100)`.
    pub fn from_age(age: i32) -> Option<Self> {
        if (Self::MIN_AGE..Self::MAX_AGE).contains(&age) {
            Some(AgeBracket {
                low: age.div_euclid(10) * 10,
            })
        } else {
            None
        }
    }

    /// Inclusive lower bound.
    pub fn low(self) -> i32 {
        self.low
    }

    /// Inclusive upper bound (`low + 9`).
    pub fn high(self) -> i32 {
        self.low + 9
    }

    pub fn contains(self, age: i32) -> bool {
        (self.low..self.low + 10).contains(&age)
    }
}

impl fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high())
    }
}

impl Serialize for AgeBracket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// Spend – the six category amounts
// ---------------------------------------------------------------------------

/// Category spend amounts as read from the source; `None` means missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spend {
    pub wines: Option<f64>,
    pub fruits: Option<f64>,
    pub meat_products: Option<f64>,
    pub fish_products: Option<f64>,
    pub sweet_products: Option<f64>,
    pub gold_prods: Option<f64>,
}

impl Spend {
    pub fn amounts(&self) -> [Option<f64>; 6] {
        [
            self.wines,
            self.fruits,
            self.meat_products,
            self.fish_products,
            self.sweet_products,
            self.gold_prods,
        ]
    }

    /// Sum of all categories, missing counted as zero. Negative or
    /// non-finite amounts count as missing so the total is never negative.
    pub fn total(&self) -> f64 {
        self.amounts()
            .into_iter()
            .flatten()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .sum()
    }
}

// ---------------------------------------------------------------------------
// Raw and enriched customer rows
// ---------------------------------------------------------------------------

/// One data row as read from the source file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCustomerRecord {
    pub year_birth: Option<i32>,
    pub marital_status: Option<String>,
    /// Source `Gender` cell; only meaningful when the schema has the column.
    pub gender: Option<String>,
    pub spend: Spend,
}

/// What the header row tells us about the source file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSchema {
    pub headers: Vec<String>,
    pub has_gender_column: bool,
}

/// The loaded rows plus their schema.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub schema: RawSchema,
    pub records: Vec<RawCustomerRecord>,
    /// Rows that could not be decoded at all and were dropped.
    pub skipped_rows: usize,
}

/// A customer with derived demographic attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedCustomerRecord {
    pub year_birth: Option<i32>,
    pub marital_status: Option<String>,
    pub spend: Spend,
    /// `current_year - year_birth`; negative for birth years in the future.
    pub age: Option<i32>,
    pub total_spend: f64,
    pub gender: Gender,
    pub age_bracket: Option<AgeBracket>,
}

// ---------------------------------------------------------------------------
// FilterOptions – selectable values per dimension
// ---------------------------------------------------------------------------

/// Distinct, non-null values per filter dimension, sorted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub marital_statuses: BTreeSet<String>,
    pub age_brackets: BTreeSet<AgeBracket>,
    pub genders: BTreeSet<Gender>,
}

impl FilterOptions {
    pub fn from_customers(customers: &[EnrichedCustomerRecord]) -> Self {
        let mut options = FilterOptions::default();
        for c in customers {
            if let Some(status) = &c.marital_status {
                options.marital_statuses.insert(status.clone());
            }
            if let Some(bracket) = c.age_bracket {
                options.age_brackets.insert(bracket);
            }
            options.genders.insert(c.gender);
        }
        options
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete enriched dataset
// ---------------------------------------------------------------------------

/// The enriched dataset with pre-computed filter options.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// All customers in source row order.
    pub customers: Vec<EnrichedCustomerRecord>,
    pub options: FilterOptions,
    /// File the dataset was loaded from.
    pub source: PathBuf,
    /// Year used to compute ages.
    pub current_year: i32,
    /// Seed used for gender synthesis.
    pub seed: u64,
    pub gender_synthesized: bool,
    pub skipped_rows: usize,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }
}
