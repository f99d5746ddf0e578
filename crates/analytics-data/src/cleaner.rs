//! Row de-duplication and missing-value repair.
//!
//! The cleaner turns a [`RawTable`] into an [`EmployeeTable`]. Salary and
//! Performance_Score follow different "missing" rules: a salary is missing
//! when absent, non-finite or not positive, a performance score only when
//! absent.

use std::collections::HashSet;

use analytics_core::error::{AnalyticsError, Result};
use analytics_core::models::{
    EmployeeRecord, EmployeeTable, MissingCounts, RawRecord, RawTable, PERFORMANCE_COLUMN,
    SALARY_COLUMN, UNKNOWN_DEPARTMENT,
};
use analytics_core::stats;
use serde::Serialize;
use tracing::{debug, info};

use crate::reader::is_na_token;

// ── CleaningReport ────────────────────────────────────────────────────────────

/// Counts and imputation values from one cleaning pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleaningReport {
    pub rows_before: usize,
    pub rows_after: usize,
    pub columns: usize,
    pub duplicates_removed: usize,
    pub departments_filled: usize,
    /// Salaries present but not positive (or not finite), reset to missing.
    pub salaries_invalidated: usize,
    /// Salaries filled with the median, including the invalidated ones.
    pub salaries_imputed: usize,
    pub performance_imputed: usize,
    pub salary_median: f64,
    pub performance_median: f64,
    /// Missing values left after cleaning; always zero by construction.
    pub missing_after: MissingCounts,
}

// ── Cleaner ───────────────────────────────────────────────────────────────────

/// Stateless helper applying the cleaning rules in order.
pub struct Cleaner;

impl Cleaner {
    /// Run every cleaning step over `table`.
    ///
    /// 1. Drop exact duplicate rows, keeping the first occurrence.
    /// 2. Default missing departments to `"Unknown"`.
    /// 3. Invalidate non-positive salaries, then fill every missing salary
    ///    with the median of what remains.
    /// 4. Fill missing performance scores with their median.
    ///
    /// Both medians are taken once, before any fill.
    pub fn clean(table: RawTable) -> Result<(EmployeeTable, CleaningReport)> {
        let RawTable { schema, records } = table;
        if records.is_empty() {
            return Err(AnalyticsError::EmptyTable);
        }
        let rows_before = records.len();

        let (mut records, duplicates_removed) = Self::drop_duplicates(records);
        let departments_filled = Self::fill_departments(&mut records);
        let salaries_invalidated = Self::invalidate_salaries(&mut records);

        let salary_median =
            Self::column_median(records.iter().filter_map(|r| r.salary), SALARY_COLUMN)?;
        let performance_median = Self::column_median(
            records.iter().filter_map(|r| r.performance_score),
            PERFORMANCE_COLUMN,
        )?;
        debug!(
            "Imputation medians: salary={}, performance={}",
            salary_median, performance_median
        );

        let mut salaries_imputed = 0usize;
        let mut performance_imputed = 0usize;
        let cleaned: Vec<EmployeeRecord> = records
            .into_iter()
            .map(|r| {
                let salary = r.salary.unwrap_or_else(|| {
                    salaries_imputed += 1;
                    salary_median
                });
                let performance_score = r.performance_score.unwrap_or_else(|| {
                    performance_imputed += 1;
                    performance_median
                });
                EmployeeRecord {
                    // Filled in step 2.
                    department: r.department.unwrap_or_else(|| UNKNOWN_DEPARTMENT.to_string()),
                    salary,
                    performance_score,
                    extra: r.extra,
                }
            })
            .collect();

        let table = EmployeeTable {
            schema,
            records: cleaned,
        };
        let (rows_after, columns) = table.shape();

        info!(
            "Cleaned {} rows -> {} rows ({} duplicates, {} salaries imputed, {} scores imputed)",
            rows_before, rows_after, duplicates_removed, salaries_imputed, performance_imputed
        );

        let report = CleaningReport {
            rows_before,
            rows_after,
            columns,
            duplicates_removed,
            departments_filled,
            salaries_invalidated,
            salaries_imputed,
            performance_imputed,
            salary_median,
            performance_median,
            missing_after: MissingCounts::default(),
        };
        Ok((table, report))
    }

    /// Remove rows whose every field equals an earlier row's. Two missing
    /// values compare equal. Returns the kept rows and the number removed.
    pub fn drop_duplicates(records: Vec<RawRecord>) -> (Vec<RawRecord>, usize) {
        let before = records.len();
        let mut seen: HashSet<RowKey> = HashSet::with_capacity(before);
        let kept: Vec<RawRecord> = records
            .into_iter()
            .filter(|r| seen.insert(RowKey::of(r)))
            .collect();
        let removed = before - kept.len();
        (kept, removed)
    }

    /// Replace missing departments with `"Unknown"`; returns how many changed.
    pub fn fill_departments(records: &mut [RawRecord]) -> usize {
        let mut filled = 0;
        for r in records.iter_mut().filter(|r| r.department.is_none()) {
            r.department = Some(UNKNOWN_DEPARTMENT.to_string());
            filled += 1;
        }
        filled
    }

    /// Reset every present but invalid salary to missing; returns the count.
    pub fn invalidate_salaries(records: &mut [RawRecord]) -> usize {
        let mut invalidated = 0;
        for r in records.iter_mut() {
            if matches!(r.salary, Some(s) if !is_valid_salary(s)) {
                r.salary = None;
                invalidated += 1;
            }
        }
        invalidated
    }

    /// Median of `values`, or [`AnalyticsError::EmptyColumn`] naming `column`.
    pub fn column_median(values: impl IntoIterator<Item = f64>, column: &str) -> Result<f64> {
        stats::median(values).ok_or_else(|| AnalyticsError::EmptyColumn(column.to_string()))
    }
}

/// A salary counts as valid only when finite and strictly positive.
pub fn is_valid_salary(salary: f64) -> bool {
    salary.is_finite() && salary > 0.0
}

// ── Row identity ──────────────────────────────────────────────────────────────

/// Hashable identity of a raw row; floats compare by bit pattern with
/// `-0.0` folded into `0.0`. Extra cells holding an NA token all key as one
/// missing value.
#[derive(Hash, PartialEq, Eq)]
struct RowKey {
    department: Option<String>,
    salary: Option<u64>,
    performance_score: Option<u64>,
    extra: Vec<Option<String>>,
}

impl RowKey {
    fn of(r: &RawRecord) -> Self {
        Self {
            department: r.department.clone(),
            salary: r.salary.map(float_bits),
            performance_score: r.performance_score.map(float_bits),
            extra: r
                .extra
                .iter()
                .map(|cell| (!is_na_token(cell)).then(|| cell.clone()))
                .collect(),
        }
    }
}

fn float_bits(v: f64) -> u64 {
    if v == 0.0 {
        0.0f64.to_bits()
    } else {
        v.to_bits()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
