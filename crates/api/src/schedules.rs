// Copyright (C) 2026 CALC Data Capture Developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Schedule spreadsheet converters.
//!
//! Each supported procurement schedule has a converter that knows how
//! to glean rows and extraction metadata from an uploaded file. Lookups
//! go through [`ConverterRegistry`]; an unrecognized schedule title is
//! a caller error, not a panic.

use csv::{Reader, StringRecord};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// Errors raised while reading an uploaded spreadsheet.
#[derive(Debug, Error)]
pub enum SpreadsheetError {
    /// The file could not be parsed as CSV at all.
    #[error("Unreadable file: {0}")]
    Csv(#[from] csv::Error),
    /// A required column header is absent.
    #[error("Missing required column: '{name}'")]
    MissingColumn {
        /// The normalized header name that was not found.
        name: String,
    },
    /// The file parsed but contained no data rows.
    #[error("The file contains no data rows")]
    NoDataRows,
    /// A data row was structurally unusable.
    #[error("Row {row_number}: {message}")]
    Row {
        /// The 1-based data row number.
        row_number: usize,
        /// What was wrong with the row.
        message: String,
    },
}

/// One row gleaned from an uploaded spreadsheet, still in raw text.
///
/// Normalization (rate parsing, education code lookup) happens later so
/// a preview can show the submitter exactly what the file said.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GleanedRow {
    /// The 1-based data row number within the file.
    pub row_number: usize,
    /// The labor category text, as uploaded.
    pub labor_category: String,
    /// The human-readable education level, as uploaded.
    pub education_level: String,
    /// The minimum years of experience, as uploaded.
    pub min_years_experience: String,
    /// The price text, as uploaded (may carry `$`, commas, stray marks).
    pub price: String,
    /// The business size code (`O` or `S`), as uploaded.
    pub business_size: String,
}

/// Vendor-level metadata extracted from an uploaded spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadMetadata {
    /// The vendor name found in the file.
    pub vendor_name: String,
    /// The contract number found in the file.
    pub contract_number: String,
    /// How many data rows the file carries.
    pub row_count: usize,
}

/// A converter for one schedule's spreadsheet format.
pub trait SpreadsheetConverter: Send + Sync {
    /// The schedule title submitters select in the wizard.
    fn schedule_title(&self) -> &'static str;

    /// Gleans the data rows from an uploaded file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file is unreadable, a required column
    /// is missing, or it holds no data rows.
    fn glean(&self, file: &[u8]) -> Result<Vec<GleanedRow>, SpreadsheetError>;

    /// Extracts vendor-level metadata without converting any rows.
    ///
    /// # Errors
    ///
    /// Returns an error when the file is unreadable or empty.
    fn metadata(&self, file: &[u8]) -> Result<UploadMetadata, SpreadsheetError>;
}

/// The columns a Region 10 export must carry.
const REGION_10_COLUMNS: &[&str] = &[
    "contract_number",
    "vendor_name",
    "labor_category",
    "education_level",
    "min_years_experience",
    "price",
    "business_size",
];

/// Converter for the Region 10 bulk export format.
///
/// The format is one flat CSV: vendor-level columns repeat on every
/// data row, so metadata extraction reads the first row only.
#[derive(Debug, Default)]
pub struct Region10SpreadsheetConverter;

/// Normalizes a header for case-insensitive, whitespace-tolerant matching.
fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().replace(' ', "_")
}

/// Maps normalized header names to column positions, requiring every
/// column in `required`.
fn column_positions(
    headers: &StringRecord,
    required: &[&str],
) -> Result<HashMap<String, usize>, SpreadsheetError> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    for (idx, header) in headers.iter().enumerate() {
        positions.insert(normalize_header(header), idx);
    }
    for name in required {
        if !positions.contains_key(*name) {
            return Err(SpreadsheetError::MissingColumn {
                name: String::from(*name),
            });
        }
    }
    Ok(positions)
}

/// Reads one named field out of a record.
fn field<'r>(
    record: &'r StringRecord,
    positions: &HashMap<String, usize>,
    name: &str,
) -> &'r str {
    positions
        .get(name)
        .and_then(|idx| record.get(*idx))
        .map_or("", str::trim)
}

impl Region10SpreadsheetConverter {
    fn read_records(
        file: &[u8],
    ) -> Result<(HashMap<String, usize>, Vec<StringRecord>), SpreadsheetError> {
        let mut reader: Reader<&[u8]> = Reader::from_reader(file);
        let positions: HashMap<String, usize> =
            column_positions(reader.headers()?, REGION_10_COLUMNS)?;

        let mut records: Vec<StringRecord> = Vec::new();
        for record in reader.records() {
            records.push(record?);
        }
        if records.is_empty() {
            return Err(SpreadsheetError::NoDataRows);
        }
        Ok((positions, records))
    }
}

impl SpreadsheetConverter for Region10SpreadsheetConverter {
    fn schedule_title(&self) -> &'static str {
        "Region 10"
    }

    fn glean(&self, file: &[u8]) -> Result<Vec<GleanedRow>, SpreadsheetError> {
        let (positions, records) = Self::read_records(file)?;

        let mut rows: Vec<GleanedRow> = Vec::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            let row_number: usize = idx + 1;
            let labor_category: String = String::from(field(record, &positions, "labor_category"));
            if labor_category.is_empty() {
                return Err(SpreadsheetError::Row {
                    row_number,
                    message: String::from("empty labor category"),
                });
            }
            rows.push(GleanedRow {
                row_number,
                labor_category,
                education_level: String::from(field(record, &positions, "education_level")),
                min_years_experience: String::from(field(
                    record,
                    &positions,
                    "min_years_experience",
                )),
                price: String::from(field(record, &positions, "price")),
                business_size: String::from(field(record, &positions, "business_size")),
            });
        }

        debug!(rows = rows.len(), "Gleaned Region 10 spreadsheet");
        Ok(rows)
    }

    fn metadata(&self, file: &[u8]) -> Result<UploadMetadata, SpreadsheetError> {
        let (positions, records) = Self::read_records(file)?;

        // Vendor columns repeat on every row; the first row is canonical.
        let first: &StringRecord = &records[0];
        Ok(UploadMetadata {
            vendor_name: String::from(field(first, &positions, "vendor_name")),
            contract_number: String::from(field(first, &positions, "contract_number")),
            row_count: records.len(),
        })
    }
}

/// The set of known schedule converters.
pub struct ConverterRegistry {
    converters: Vec<Box<dyn SpreadsheetConverter>>,
}

impl ConverterRegistry {
    /// Builds the standard registry with every supported schedule.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            converters: vec![Box::new(Region10SpreadsheetConverter)],
        }
    }

    /// Finds the converter for a schedule title, if one is registered.
    ///
    /// # Arguments
    ///
    /// * `schedule` - The schedule title from the submission
    #[must_use]
    pub fn find(&self, schedule: &str) -> Option<&dyn SpreadsheetConverter> {
        self.converters
            .iter()
            .map(Box::as_ref)
            .find(|converter| converter.schedule_title() == schedule)
    }

    /// Lists the registered schedule titles.
    #[must_use]
    pub fn schedule_titles(&self) -> Vec<&'static str> {
        self.converters
            .iter()
            .map(|converter| converter.schedule_title())
            .collect()
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
