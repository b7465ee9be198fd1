//! CSV loader for financial input records.
//!
//! ## CSV Format
//!
//! One record per row. Headers are [`FinancialInput`] field names, matched
//! case-insensitively, in any order. Any subset of the columns may be present;
//! whether a missing or blank value is acceptable is decided later by the
//! [`ParseMode`](itax_core::ParseMode) used for intake.
//!
//! | Column               | Type    | Notes                                 |
//! |----------------------|---------|---------------------------------------|
//! | `gross_salary`       | decimal | `,` thousands separators are accepted |
//! | `basic_salary`       | decimal |                                       |
//! | `hra_received`       | decimal |                                       |
//! | `rent_paid`          | decimal |                                       |
//! | `deduction_80c`      | decimal |                                       |
//! | `deduction_80d`      | decimal |                                       |
//! | `standard_deduction` | decimal |                                       |
//! | `professional_tax`   | decimal |                                       |
//! | `tds`                | decimal |                                       |
//! | `selected_regime`    | string  | `old` or `new`                        |
//!
//! ### Example
//!
//! ```csv
//! gross_salary,standard_deduction,deduction_80c,selected_regime
//! "12,00,000",50000,150000,old
//! 900000,50000,,new
//! ```

use std::path::Path;

use itax_core::{FieldValue, FinancialInput, RawFinancialInput};

/// Errors that can occur while loading CSV data.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Bad structure: unbalanced quotes, a row with the wrong column count.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("column '{0}' appears more than once")]
    DuplicateColumn(String),
}

fn is_known_column(name: &str) -> bool {
    name == FinancialInput::SELECTED_REGIME_FIELD || FinancialInput::AMOUNT_FIELDS.contains(&name)
}

fn normalized_headers(headers: &csv::StringRecord) -> Result<Vec<String>, CsvLoadError> {
    let mut names: Vec<String> = Vec::with_capacity(headers.len());
    for header in headers {
        let name = header.trim().to_ascii_lowercase();
        if !is_known_column(&name) {
            return Err(CsvLoadError::UnknownColumn(header.to_string()));
        }
        if names.contains(&name) {
            return Err(CsvLoadError::DuplicateColumn(name));
        }
        names.push(name);
    }
    Ok(names)
}

/// Parse CSV text into raw records, in file order. Blank cells are left out
/// of the record so intake sees them as missing.
///
/// # Errors
///
/// * [`CsvLoadError::Parse`] if the CSV is structurally invalid.
/// * [`CsvLoadError::UnknownColumn`] / [`CsvLoadError::DuplicateColumn`] for
///   a bad header row.
pub fn load_from_str(input: &str) -> Result<Vec<RawFinancialInput>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    let headers = normalized_headers(reader.headers()?)?;

    reader
        .records()
        .map(|record| -> Result<RawFinancialInput, CsvLoadError> {
            let record = record?;
            Ok(headers
                .iter()
                .zip(record.iter())
                .filter(|(_, cell)| !cell.is_empty())
                .map(|(name, cell)| (name.clone(), FieldValue::from(cell)))
                .collect())
        })
        .collect()
}

/// Read a file from disk and delegate to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<Vec<RawFinancialInput>, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_from_str(&contents)
}
