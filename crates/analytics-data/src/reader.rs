//! CSV loading for the employee analytics pipeline.
//!
//! Reads an employee export with a header row into a [`RawTable`], keeping
//! missing values as `None` so the cleaner can apply its repair rules.

use std::io::Read;
use std::path::Path;

use analytics_core::error::{AnalyticsError, Result};
use analytics_core::models::{Column, MissingCounts, RawRecord, RawTable, Schema};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Cell spellings that load as "no value" (the pandas default NA set).
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ── LoadReport ────────────────────────────────────────────────────────────────

/// What the loader saw, before any cleaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadReport {
    pub rows: usize,
    pub columns: usize,
    pub missing: MissingCounts,
    /// Numeric cells that were neither NA tokens nor parseable numbers.
    pub unparseable_numeric: usize,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load the employee CSV at `path`.
pub fn load_employees(path: &Path) -> Result<(RawTable, LoadReport)> {
    let file = std::fs::File::open(path).map_err(|source| AnalyticsError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Loading employee records from {}", path.display());
    read_employees(file)
}

/// Parse employee CSV data from any reader.
///
/// Fails with [`AnalyticsError::MissingColumn`] before reading any row when a
/// required header is absent.
pub fn read_employees<R: Read>(reader: R) -> Result<(RawTable, LoadReport)> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let schema = Schema::from_headers(&headers)?;
    let extra_count = schema.extra_count();

    let mut records = Vec::new();
    let mut unparseable = 0usize;

    for (row_idx, result) in rdr.records().enumerate() {
        let row = result?;
        let mut record = RawRecord {
            department: None,
            salary: None,
            performance_score: None,
            extra: Vec::with_capacity(extra_count),
        };

        for (column, cell) in schema.layout().iter().zip(row.iter()) {
            match column {
                Column::Department => {
                    record.department = (!is_na_token(cell)).then(|| cell.to_string());
                }
                Column::Salary => {
                    record.salary = parse_numeric(cell, row_idx, "Salary", &mut unparseable);
                }
                Column::PerformanceScore => {
                    record.performance_score =
                        parse_numeric(cell, row_idx, "Performance_Score", &mut unparseable);
                }
                Column::Extra(_) => record.extra.push(cell.to_string()),
            }
        }
        records.push(record);
    }

    let table = RawTable { schema, records };
    let (rows, columns) = table.shape();
    let report = LoadReport {
        rows,
        columns,
        missing: table.missing_counts(),
        unparseable_numeric: unparseable,
    };

    debug!(
        "Loaded {} rows x {} columns ({} missing required values, {} unparseable)",
        rows,
        columns,
        report.missing.total(),
        unparseable
    );

    Ok((table, report))
}

/// Returns `true` when `cell` spells a missing value.
pub fn is_na_token(cell: &str) -> bool {
    NA_TOKENS.contains(&cell)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn parse_numeric(cell: &str, row_idx: usize, column: &str, unparseable: &mut usize) -> Option<f64> {
    let cell = cell.trim();
    if is_na_token(cell) {
        return None;
    }
    match cell.parse::<f64>() {
        Ok(v) if v.is_nan() => None,
        Ok(v) => Some(v),
        Err(_) => {
            warn!(
                "Row {}: {} value {:?} is not numeric; treating as missing",
                row_idx + 1,
                column,
                cell
            );
            *unparseable += 1;
            None
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
