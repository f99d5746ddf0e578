//! CSV output for the cleaned table and the top-performer ranking.

use std::path::Path;

use analytics_core::error::{AnalyticsError, Result};
use analytics_core::models::{
    Column, EmployeeRecord, EmployeeTable, RankedRecord, Schema, COMPOSITE_SCORE_COLUMN,
    DEPT_RANK_COLUMN, ORG_RANK_COLUMN,
};
use tracing::info;

/// Write the cleaned table with its original header order.
pub fn write_cleaned(table: &EmployeeTable, path: &Path) -> Result<()> {
    let mut wtr = create(path)?;
    wtr.write_record(table.schema.headers())?;
    for r in &table.records {
        wtr.write_record(employee_cells(&table.schema, r))?;
    }
    finish(wtr, path)?;
    info!("Wrote {} cleaned rows to {}", table.records.len(), path.display());
    Ok(())
}

/// Write ranked rows: original columns followed by the derived score and
/// both ranks.
pub fn write_ranked(schema: &Schema, records: &[RankedRecord], path: &Path) -> Result<()> {
    let mut wtr = create(path)?;

    let mut header: Vec<String> = schema.headers().to_vec();
    header.extend(
        [COMPOSITE_SCORE_COLUMN, ORG_RANK_COLUMN, DEPT_RANK_COLUMN]
            .iter()
            .map(|h| h.to_string()),
    );
    wtr.write_record(&header)?;

    for r in records {
        let mut cells = employee_cells(schema, &r.employee);
        cells.push(r.composite_score.to_string());
        cells.push(r.org_rank.to_string());
        cells.push(r.dept_rank.to_string());
        wtr.write_record(&cells)?;
    }
    finish(wtr, path)?;
    info!("Wrote {} ranked rows to {}", records.len(), path.display());
    Ok(())
}

/// Cells of one record in schema order.
pub fn employee_cells(schema: &Schema, r: &EmployeeRecord) -> Vec<String> {
    schema
        .layout()
        .iter()
        .map(|column| match column {
            Column::Department => r.department.clone(),
            Column::Salary => r.salary.to_string(),
            Column::PerformanceScore => r.performance_score.to_string(),
            Column::Extra(i) => r.extra.get(*i).cloned().unwrap_or_default(),
        })
        .collect()
}

fn create(path: &Path) -> Result<csv::Writer<std::fs::File>> {
    let file = std::fs::File::create(path).map_err(|source| AnalyticsError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(csv::Writer::from_writer(file))
}

fn finish(mut wtr: csv::Writer<std::fs::File>, path: &Path) -> Result<()> {
    wtr.flush().map_err(|source| AnalyticsError::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
