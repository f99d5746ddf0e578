//! Console report for a finished analysis run.
//!
//! Every section is built as a `String` so `main` only has to print it.

use analytics_core::formatting::{format_currency, format_number, format_percent, TextTable};
use analytics_core::models::{Column, MissingCounts, RankedRecord, Schema};
use analytics_data::aggregator::{DepartmentAggregator, DepartmentSummary, SalaryStats};
use analytics_data::analysis::{AnalysisResult, WrittenOutputs};

fn heading(title: &str) -> String {
    format!("{title}\n{}", "=".repeat(title.chars().count()))
}

// ── Sections ───────────────────────────────────────────────────────────────────

pub fn shape_section(result: &AnalysisResult) -> String {
    let c = &result.cleaning;
    format!(
        "{}\nBefore cleaning: {} rows x {} columns\nAfter cleaning:  {} rows x {} columns\n\
         Duplicates removed: {}\nDepartments filled: {}\nSalaries invalidated: {}",
        heading("Data Shape"),
        format_number(c.rows_before as f64, 0),
        c.columns,
        format_number(c.rows_after as f64, 0),
        c.columns,
        c.duplicates_removed,
        c.departments_filled,
        c.salaries_invalidated,
    )
}

pub fn missing_section(before: &MissingCounts, after: &MissingCounts) -> String {
    let mut table = TextTable::new(["Column", "Missing Before", "Missing After"]);
    for (name, b, a) in [
        ("Department", before.department, after.department),
        ("Salary", before.salary, after.salary),
        ("Performance_Score", before.performance_score, after.performance_score),
    ] {
        table.push_row([name.to_string(), b.to_string(), a.to_string()]);
    }
    format!("{}\n{}", heading("Missing Values"), table.render())
}

pub fn salary_stats_section(stats: &[SalaryStats]) -> String {
    let mut table = TextTable::new(["Department", "Count", "Mean", "Median", "Min", "Max", "Sum"]);
    for s in stats {
        table.push_row([
            s.department.clone(),
            s.count.to_string(),
            format_currency(s.mean),
            format_currency(s.median),
            format_currency(s.min),
            format_currency(s.max),
            format_currency(s.sum),
        ]);
    }
    format!("{}\n{}", heading("Salary Statistics by Department"), table.render())
}

pub fn department_summary_section(summaries: &[DepartmentSummary]) -> String {
    let mut table = TextTable::new([
        "Department",
        "Headcount",
        "Avg_Salary",
        "Total_Cost",
        "Avg_Performance",
        "Cost_Contribution",
        "Efficiency_Ratio",
    ]);
    for s in DepartmentAggregator::by_total_cost_desc(summaries) {
        table.push_row([
            s.department.clone(),
            s.headcount.to_string(),
            format_currency(s.avg_salary),
            format_currency(s.total_cost),
            format_number(s.avg_performance, 2),
            format_percent(s.cost_contribution_pct, 1),
            format_number(s.efficiency_ratio, 3),
        ]);
    }
    format!("{}\n{}", heading("Department Summary"), table.render())
}

/// Top performers with their pass-through columns first, then the derived
/// score and ranks.
pub fn top_performers_section(schema: &Schema, top: &[RankedRecord]) -> String {
    let extras: Vec<(usize, &str)> = schema
        .layout()
        .iter()
        .zip(schema.headers())
        .filter_map(|(column, header)| match column {
            Column::Extra(i) => Some((*i, header.as_str())),
            _ => None,
        })
        .collect();

    let mut headers: Vec<String> = vec!["Org_Rank".to_string()];
    headers.extend(extras.iter().map(|(_, h)| h.to_string()));
    headers.extend(
        ["Department", "Salary", "Performance_Score", "Composite_Score", "Dept_Rank"]
            .iter()
            .map(|h| h.to_string()),
    );

    let mut table = TextTable::new(headers);
    for r in top {
        let mut row = vec![r.org_rank.to_string()];
        row.extend(
            extras
                .iter()
                .map(|(i, _)| r.employee.extra.get(*i).cloned().unwrap_or_default()),
        );
        row.push(r.employee.department.clone());
        row.push(format_currency(r.employee.salary));
        row.push(format_number(r.employee.performance_score, 2));
        row.push(format_number(r.composite_score, 3));
        row.push(r.dept_rank.to_string());
        table.push_row(row);
    }
    format!("{}\n{}", heading("Top Performers"), table.render())
}

pub fn narrative_section(result: &AnalysisResult) -> String {
    let mut out = heading("Key Insights");
    for line in result.narrative.lines() {
        out.push('\n');
        out.push_str(&line);
    }
    out
}

pub fn outputs_section(written: &WrittenOutputs) -> String {
    let mut out = heading("Output Files");
    for path in written.files.iter().chain(&written.charts) {
        out.push_str(&format!("\n  {}", path.display()));
    }
    out
}

/// Full report, sections separated by blank lines.
pub fn render(result: &AnalysisResult) -> String {
    [
        shape_section(result),
        missing_section(&result.load.missing, &result.cleaning.missing_after),
        salary_stats_section(&result.salary_stats),
        department_summary_section(&result.summaries),
        top_performers_section(&result.ranked.schema, &result.cohorts.top_performers),
        narrative_section(result),
    ]
    .join("\n\n")
}

// ── Tests ──────────────────────────────────────────────────────────────────────
