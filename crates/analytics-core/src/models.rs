use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};

// ── Column names ──────────────────────────────────────────────────────────────

/// Header of the department column.
pub const DEPARTMENT_COLUMN: &str = "Department";
/// Header of the salary column.
pub const SALARY_COLUMN: &str = "Salary";
/// Header of the performance score column.
pub const PERFORMANCE_COLUMN: &str = "Performance_Score";
/// Header of the derived composite score column.
pub const COMPOSITE_SCORE_COLUMN: &str = "Composite_Score";
/// Header of the derived organisation-wide rank column.
pub const ORG_RANK_COLUMN: &str = "Org_Rank";
/// Header of the derived department-wide rank column.
pub const DEPT_RANK_COLUMN: &str = "Dept_Rank";

/// Placeholder written into missing department cells.
pub const UNKNOWN_DEPARTMENT: &str = "Unknown";

// ── Schema ────────────────────────────────────────────────────────────────────

/// Role of a single CSV column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Column {
    Department,
    Salary,
    PerformanceScore,
    /// A pass-through column; the payload indexes into a record's `extra`.
    Extra(usize),
}

/// Column layout of an employee table, in original header order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    headers: Vec<String>,
    layout: Vec<Column>,
}

impl Schema {
    /// Classify `headers`, failing with [`AnalyticsError::MissingColumn`]
    /// when any of the three required columns is absent.
    ///
    /// When a header is repeated only its first occurrence is treated as the
    /// required column; later copies pass through as extras.
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Result<Self> {
        let mut layout = Vec::with_capacity(headers.len());
        let mut extra = 0usize;
        let (mut dept, mut salary, mut perf) = (false, false, false);

        for header in headers {
            let column = match header.as_ref() {
                DEPARTMENT_COLUMN if !dept => {
                    dept = true;
                    Column::Department
                }
                SALARY_COLUMN if !salary => {
                    salary = true;
                    Column::Salary
                }
                PERFORMANCE_COLUMN if !perf => {
                    perf = true;
                    Column::PerformanceScore
                }
                _ => {
                    extra += 1;
                    Column::Extra(extra - 1)
                }
            };
            layout.push(column);
        }

        for (present, name) in [
            (dept, DEPARTMENT_COLUMN),
            (salary, SALARY_COLUMN),
            (perf, PERFORMANCE_COLUMN),
        ] {
            if !present {
                return Err(AnalyticsError::MissingColumn(name.to_string()));
            }
        }

        Ok(Self {
            headers: headers.iter().map(|h| h.as_ref().to_string()).collect(),
            layout,
        })
    }

    /// Header names in original order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Column roles in original order.
    pub fn layout(&self) -> &[Column] {
        &self.layout
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Number of pass-through columns.
    pub fn extra_count(&self) -> usize {
        self.layout
            .iter()
            .filter(|c| matches!(c, Column::Extra(_)))
            .count()
    }
}

// ── Raw (pre-cleaning) records ────────────────────────────────────────────────

/// One employee row as loaded, before any repair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub department: Option<String>,
    pub salary: Option<f64>,
    pub performance_score: Option<f64>,
    /// Pass-through cells in schema order.
    pub extra: Vec<String>,
}

/// Per-column count of missing values among the required columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingCounts {
    pub department: usize,
    pub salary: usize,
    pub performance_score: usize,
}

impl MissingCounts {
    pub fn total(&self) -> usize {
        self.department + self.salary + self.performance_score
    }
}

/// A loaded table whose required fields may still be missing or invalid.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub schema: Schema,
    pub records: Vec<RawRecord>,
}

impl RawTable {
    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.records.len(), self.schema.column_count())
    }

    /// Count missing values in the three required columns.
    pub fn missing_counts(&self) -> MissingCounts {
        let mut counts = MissingCounts::default();
        for r in &self.records {
            counts.department += usize::from(r.department.is_none());
            counts.salary += usize::from(r.salary.is_none());
            counts.performance_score += usize::from(r.performance_score.is_none());
        }
        counts
    }
}

// ── Cleaned records ───────────────────────────────────────────────────────────

/// An employee row whose required fields have been repaired.
///
/// Department is never missing and Salary is always positive; the types make
/// both guarantees structural.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub department: String,
    pub salary: f64,
    pub performance_score: f64,
    pub extra: Vec<String>,
}

impl From<EmployeeRecord> for RawRecord {
    fn from(r: EmployeeRecord) -> Self {
        RawRecord {
            department: Some(r.department),
            salary: Some(r.salary),
            performance_score: Some(r.performance_score),
            extra: r.extra,
        }
    }
}

/// The cleaned employee table.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeTable {
    pub schema: Schema,
    pub records: Vec<EmployeeRecord>,
}

impl EmployeeTable {
    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.records.len(), self.schema.column_count())
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Largest salary in the table, `None` when empty.
    pub fn max_salary(&self) -> Option<f64> {
        self.records
            .iter()
            .map(|r| r.salary)
            .max_by(|a, b| a.total_cmp(b))
    }

    pub fn salaries(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().map(|r| r.salary)
    }

    pub fn performance_scores(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().map(|r| r.performance_score)
    }

    /// Re-express the table as raw rows, e.g. to feed it back to the cleaner.
    pub fn into_raw(self) -> RawTable {
        RawTable {
            schema: self.schema,
            records: self.records.into_iter().map(RawRecord::from).collect(),
        }
    }
}

// ── Ranked records ────────────────────────────────────────────────────────────

/// A cleaned employee together with its derived score and ranks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRecord {
    pub employee: EmployeeRecord,
    pub composite_score: f64,
    /// 1 = best across the whole organisation.
    pub org_rank: u32,
    /// 1 = best within the employee's department.
    pub dept_rank: u32,
}

/// The cleaned table with derived columns attached.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedTable {
    pub schema: Schema,
    pub records: Vec<RankedRecord>,
}
