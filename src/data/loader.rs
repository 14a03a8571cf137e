use std::fs::File;
use std::io::Read;
use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;

use super::derive::derive;
use super::model::{Dataset, FilterOptions, RawCustomerRecord, RawSchema, RawTable, Spend};
use crate::error::DataLoadError;

/// Field separator of the marketing campaign export.
pub const DELIMITER: u8 = b';';

/// Columns that must be present in the header row.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "Year_Birth",
    "Marital_Status",
    "MntWines",
    "MntFruits",
    "MntMeatProducts",
    "MntFishProducts",
    "MntSweetProducts",
    "MntGoldProds",
];

/// Optional column holding `M` / `F`.
pub const GENDER_COLUMN: &str = "Gender";

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load and enrich a dataset in one step.
///
/// The gender RNG is built here from `seed`, so two calls with the same file
/// and seed produce identical synthesized genders.
pub fn load_dataset(path: &Path, current_year: i32, seed: u64) -> Result<Dataset, DataLoadError> {
    let raw = load_raw(path)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let customers = derive(&raw, current_year, &mut rng);
    let options = FilterOptions::from_customers(&customers);

    log::info!(
        "Loaded {} customers from {} (year {current_year}, gender {})",
        customers.len(),
        path.display(),
        if raw.schema.has_gender_column { "from source" } else { "synthesized" },
    );

    Ok(Dataset {
        customers,
        options,
        source: path.to_path_buf(),
        current_year,
        seed,
        gender_synthesized: !raw.schema.has_gender_column,
        skipped_rows: raw.skipped_rows,
    })
}

/// Read the semicolon-delimited file into raw records, preserving row order.
pub fn load_raw(path: &Path) -> Result<RawTable, DataLoadError> {
    let file = File::open(path).map_err(|source| DataLoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    read_table(file, path)
}

// ---------------------------------------------------------------------------
// CSV decoding
// ---------------------------------------------------------------------------

/// Row layout as deserialized by `csv`. Unparseable numbers become `None`.
#[derive(Debug, Deserialize)]
struct SourceRow {
    #[serde(rename = "Year_Birth", default, deserialize_with = "csv::invalid_option")]
    year_birth: Option<i32>,
    #[serde(rename = "Marital_Status", default)]
    marital_status: Option<String>,
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    #[serde(rename = "MntWines", default, deserialize_with = "csv::invalid_option")]
    wines: Option<f64>,
    #[serde(rename = "MntFruits", default, deserialize_with = "csv::invalid_option")]
    fruits: Option<f64>,
    #[serde(rename = "MntMeatProducts", default, deserialize_with = "csv::invalid_option")]
    meat_products: Option<f64>,
    #[serde(rename = "MntFishProducts", default, deserialize_with = "csv::invalid_option")]
    fish_products: Option<f64>,
    #[serde(rename = "MntSweetProducts", default, deserialize_with = "csv::invalid_option")]
    sweet_products: Option<f64>,
    #[serde(rename = "MntGoldProds", default, deserialize_with = "csv::invalid_option")]
    gold_prods: Option<f64>,
}

impl From<SourceRow> for RawCustomerRecord {
    fn from(row: SourceRow) -> Self {
        RawCustomerRecord {
            year_birth: row.year_birth,
            marital_status: row.marital_status.filter(|s| !s.is_empty()),
            gender: row.gender.filter(|s| !s.is_empty()),
            spend: Spend {
                wines: row.wines,
                fruits: row.fruits,
                meat_products: row.meat_products,
                fish_products: row.fish_products,
                sweet_products: row.sweet_products,
                gold_prods: row.gold_prods,
            },
        }
    }
}

fn read_table<R: Read>(source: R, path: &Path) -> Result<RawTable, DataLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|source| DataLoadError::Header {
            path: path.to_path_buf(),
            source,
        })?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|col| !headers.iter().any(|h| h == *col))
    {
        return Err(DataLoadError::MissingColumn {
            path: path.to_path_buf(),
            column: missing.to_string(),
        });
    }

    let schema = RawSchema {
        has_gender_column: headers.iter().any(|h| h == GENDER_COLUMN),
        headers,
    };

    let mut records = Vec::new();
    let mut skipped_rows = 0;

    for (row_no, result) in reader.deserialize::<SourceRow>().enumerate() {
        match result {
            Ok(row) => records.push(RawCustomerRecord::from(row)),
            Err(e) => {
                log::warn!("{}: skipping data row {}: {e}", path.display(), row_no + 1);
                skipped_rows += 1;
            }
        }
    }

    if records.is_empty() {
        return Err(DataLoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    Ok(RawTable {
        schema,
        records,
        skipped_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "ID;Year_Birth;Marital_Status;MntWines;MntFruits;MntMeatProducts;MntFishProducts;MntSweetProducts;MntGoldProds";

    fn read(text: &str) -> Result<RawTable, DataLoadError> {
        read_table(text.as_bytes(), Path::new("test.csv"))
    }

    #[test]
    fn reads_rows_in_order() {
        let text = format!("{HEADER}\n1;1970;Married;10;0;5;0;0;1\n2;1985;Single;1;2;3;4;5;6\n");
        let table = read(&text).unwrap();
        assert!(!table.schema.has_gender_column);
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[0].year_birth, Some(1970));
        assert_eq!(table.records[0].marital_status.as_deref(), Some("Married"));
        assert_eq!(table.records[1].spend.gold_prods, Some(6.0));
    }

    #[test]
    fn bad_numbers_become_missing() {
        let text = format!("{HEADER}\n1;abc;Single;;x;3.5;;;\n");
        let table = read(&text).unwrap();
        let rec = &table.records[0];
        assert_eq!(rec.year_birth, None);
        assert_eq!(rec.spend.wines, None);
        assert_eq!(rec.spend.fruits, None);
        assert_eq!(rec.spend.meat_products, Some(3.5));
    }

    #[test]
    fn short_rows_fill_missing() {
        let text = format!("{HEADER}\n1;1990;Together;7\n");
        let table = read(&text).unwrap();
        assert_eq!(table.records[0].spend.wines, Some(7.0));
        assert_eq!(table.records[0].spend.gold_prods, None);
    }

    #[test]
    fn detects_gender_column() {
        let text = format!("{HEADER};Gender\n1;1990;Single;0;0;0;0;0;0;F\n2;1991;Single;0;0;0;0;0;0;\n");
        let table = read(&text).unwrap();
        assert!(table.schema.has_gender_column);
        assert_eq!(table.records[0].gender.as_deref(), Some("F"));
        assert_eq!(table.records[1].gender, None);
    }

    #[test]
    fn missing_required_column_fails() {
        let err = read("Year_Birth;Marital_Status;MntWines\n1990;Single;3\n").unwrap_err();
        assert!(matches!(err, DataLoadError::MissingColumn { ref column, .. } if column == "MntFruits"));
    }

    #[test]
    fn header_only_is_empty() {
        let err = read(&format!("{HEADER}\n")).unwrap_err();
        assert!(matches!(err, DataLoadError::Empty { .. }));
    }

    #[test]
    fn unopenable_file_fails() {
        let err = load_raw(Path::new("definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::Open { .. }));
    }
}
