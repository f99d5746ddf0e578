//! Chart data series and the renderer seam.
//!
//! Each chart is reduced to a [`ChartData`] numeric table. A
//! [`ChartRenderer`] turns it into an artefact; [`CsvChartRenderer`] writes
//! the table as `<name>.csv` for an external plotting tool.

use std::path::{Path, PathBuf};

use analytics_core::error::{AnalyticsError, Result};
use analytics_core::models::EmployeeTable;
use analytics_core::stats::{self, BoxStats};
use analytics_core::thresholds::AnalysisConfig;
use serde::Serialize;
use tracing::debug;

use crate::aggregator::{DepartmentAggregator, DepartmentSummary};
use crate::reporter::Cohorts;

// ── ChartKind ─────────────────────────────────────────────────────────────────

/// The fixed set of charts produced per run, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChartKind {
    SalaryHistogram,
    DepartmentPayRange,
    HeadcountCostScatter,
    BudgetPie,
    DepartmentEfficiency,
    SalaryRangeFinal,
    PerformanceVsSalary,
    BudgetSharePie,
    TopRankingsBar,
}

impl ChartKind {
    pub const ALL: [ChartKind; 9] = [
        ChartKind::SalaryHistogram,
        ChartKind::DepartmentPayRange,
        ChartKind::HeadcountCostScatter,
        ChartKind::BudgetPie,
        ChartKind::DepartmentEfficiency,
        ChartKind::SalaryRangeFinal,
        ChartKind::PerformanceVsSalary,
        ChartKind::BudgetSharePie,
        ChartKind::TopRankingsBar,
    ];

    /// Stable file stem for the chart.
    pub fn file_stem(&self) -> &'static str {
        match self {
            ChartKind::SalaryHistogram => "salaries_distribution",
            ChartKind::DepartmentPayRange => "department_pay_range",
            ChartKind::HeadcountCostScatter => "dept_analysis_scatter",
            ChartKind::BudgetPie => "budget_pie_chart",
            ChartKind::DepartmentEfficiency => "dept_efficiency",
            ChartKind::SalaryRangeFinal => "salary_distribution_final",
            ChartKind::PerformanceVsSalary => "performance_v_salary",
            ChartKind::BudgetSharePie => "budget_share_pie",
            ChartKind::TopRankingsBar => "top_rankings_bar",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::SalaryHistogram => "Company-Wide Salary Distribution",
            ChartKind::DepartmentPayRange => "Visualizing Pay Gaps by Department",
            ChartKind::HeadcountCostScatter => "Headcount vs. Total Cost",
            ChartKind::BudgetPie => "Budget Distribution by Department",
            ChartKind::DepartmentEfficiency => "Department Efficiency (Performance per $1k Spent)",
            ChartKind::SalaryRangeFinal => "Salary Range and Outliers by Department",
            ChartKind::PerformanceVsSalary => "Performance Score vs. Salary Level",
            ChartKind::BudgetSharePie => "Total Budget Share per Department",
            ChartKind::TopRankingsBar => "Top 10 Employees: Composite Ranking Score",
        }
    }
}

// ── ChartData ─────────────────────────────────────────────────────────────────

/// One labelled row of a chart table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRow {
    pub label: String,
    pub values: Vec<f64>,
}

/// A horizontal or vertical marker drawn over the data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub label: String,
    pub value: f64,
}

/// Numeric table backing a single chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub kind: ChartKind,
    /// Header of the label column.
    pub label_column: String,
    /// Headers of the value columns, matching each row's `values`.
    pub value_columns: Vec<String>,
    pub rows: Vec<ChartRow>,
    pub reference_lines: Vec<ReferenceLine>,
}

impl ChartData {
    fn new(kind: ChartKind, label_column: &str, value_columns: &[&str]) -> Self {
        Self {
            kind,
            label_column: label_column.to_string(),
            value_columns: value_columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
            reference_lines: Vec::new(),
        }
    }

    fn push(&mut self, label: impl Into<String>, values: Vec<f64>) {
        self.rows.push(ChartRow {
            label: label.into(),
            values,
        });
    }
}

// ── Building ──────────────────────────────────────────────────────────────────

/// Build every chart table from the pipeline outputs, in [`ChartKind::ALL`]
/// order.
pub fn build_charts(
    table: &EmployeeTable,
    summaries: &[DepartmentSummary],
    cohorts: &Cohorts,
    config: &AnalysisConfig,
) -> Vec<ChartData> {
    ChartKind::ALL
        .iter()
        .map(|&kind| match kind {
            ChartKind::SalaryHistogram => salary_histogram(table, config.histogram_bins),
            ChartKind::DepartmentPayRange | ChartKind::SalaryRangeFinal => {
                salary_box_stats(kind, table)
            }
            ChartKind::HeadcountCostScatter => headcount_cost_scatter(summaries),
            ChartKind::BudgetPie => budget_pie(summaries),
            ChartKind::DepartmentEfficiency => efficiency_bar(summaries),
            ChartKind::PerformanceVsSalary => performance_vs_salary(table, cohorts.median_salary),
            ChartKind::BudgetSharePie => budget_share_pie(table),
            ChartKind::TopRankingsBar => top_rankings_bar(cohorts),
        })
        .collect()
}

fn salary_histogram(table: &EmployeeTable, bins: usize) -> ChartData {
    let mut chart = ChartData::new(
        ChartKind::SalaryHistogram,
        "Bin",
        &["Bin_Start", "Bin_End", "Employees"],
    );
    let salaries: Vec<f64> = table.salaries().collect();
    for (i, bin) in stats::histogram(&salaries, bins).into_iter().enumerate() {
        chart.push((i + 1).to_string(), vec![bin.start, bin.end, bin.count as f64]);
    }
    chart
}

fn salary_box_stats(kind: ChartKind, table: &EmployeeTable) -> ChartData {
    let mut chart = ChartData::new(kind, "Department", &["Min", "Q1", "Median", "Q3", "Max"]);
    for (dept, members) in DepartmentAggregator::group(table) {
        if let Some(b) = BoxStats::from_values(members.iter().map(|r| r.salary)) {
            chart.push(dept, vec![b.min, b.q1, b.median, b.q3, b.max]);
        }
    }
    chart
}

fn headcount_cost_scatter(summaries: &[DepartmentSummary]) -> ChartData {
    let mut chart = ChartData::new(
        ChartKind::HeadcountCostScatter,
        "Department",
        &["Headcount", "Total_Cost", "Avg_Salary"],
    );
    for d in summaries {
        chart.push(
            d.department.clone(),
            vec![d.headcount as f64, d.total_cost, d.avg_salary],
        );
    }
    chart
}

fn budget_pie(summaries: &[DepartmentSummary]) -> ChartData {
    let mut chart = ChartData::new(
        ChartKind::BudgetPie,
        "Department",
        &["Total_Cost", "Share_Pct"],
    );
    for d in summaries {
        chart.push(d.department.clone(), vec![d.total_cost, d.cost_contribution_pct]);
    }
    chart
}

fn efficiency_bar(summaries: &[DepartmentSummary]) -> ChartData {
    let mut chart = ChartData::new(
        ChartKind::DepartmentEfficiency,
        "Department",
        &["Efficiency_Ratio"],
    );
    for d in DepartmentAggregator::by_efficiency_asc(summaries) {
        chart.push(d.department, vec![d.efficiency_ratio]);
    }
    chart
}

fn performance_vs_salary(table: &EmployeeTable, median_salary: f64) -> ChartData {
    let mut chart = ChartData::new(
        ChartKind::PerformanceVsSalary,
        "Department",
        &["Salary", "Performance_Score"],
    );
    for r in &table.records {
        chart.push(r.department.clone(), vec![r.salary, r.performance_score]);
    }
    chart.reference_lines.push(ReferenceLine {
        label: "Median Salary".to_string(),
        value: median_salary,
    });
    chart
}

fn budget_share_pie(table: &EmployeeTable) -> ChartData {
    let mut chart = ChartData::new(
        ChartKind::BudgetSharePie,
        "Department",
        &["Salary_Sum", "Share_Pct"],
    );
    let payroll = DepartmentAggregator::payroll_by_department(table);
    let total: f64 = payroll.iter().map(|(_, v)| v).sum();
    for (dept, sum) in payroll {
        chart.push(dept, vec![sum, sum / total * 100.0]);
    }
    chart
}

fn top_rankings_bar(cohorts: &Cohorts) -> ChartData {
    let mut chart = ChartData::new(
        ChartKind::TopRankingsBar,
        "Department",
        &["Composite_Score", "Org_Rank"],
    );
    for r in &cohorts.top_chart {
        chart.push(
            r.employee.department.clone(),
            vec![r.composite_score, r.org_rank as f64],
        );
    }
    chart
}

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Turns chart tables into artefacts.
pub trait ChartRenderer {
    /// Render one chart, returning the path of what was written.
    fn render(&mut self, chart: &ChartData) -> Result<PathBuf>;
}

/// Writes each chart's table to `<dir>/<file_stem>.csv`.
///
/// Reference lines are appended as rows labelled `ref:<label>` with the value
/// in the first value column.
pub struct CsvChartRenderer {
    dir: PathBuf,
}

impl CsvChartRenderer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ChartRenderer for CsvChartRenderer {
    fn render(&mut self, chart: &ChartData) -> Result<PathBuf> {
        let path = self.dir.join(format!("{}.csv", chart.kind.file_stem()));
        let file = std::fs::File::create(&path).map_err(|source| AnalyticsError::FileWrite {
            path: path.clone(),
            source,
        })?;
        let mut wtr = csv::Writer::from_writer(file);

        let mut header = vec![chart.label_column.clone()];
        header.extend(chart.value_columns.iter().cloned());
        wtr.write_record(&header)?;

        for row in &chart.rows {
            let mut rec = vec![row.label.clone()];
            rec.extend(row.values.iter().map(f64::to_string));
            wtr.write_record(&rec)?;
        }
        for line in &chart.reference_lines {
            let mut rec = vec![format!("ref:{}", line.label), line.value.to_string()];
            rec.resize(header.len(), String::new());
            wtr.write_record(&rec)?;
        }
        wtr.flush().map_err(|source| AnalyticsError::FileWrite {
            path: path.clone(),
            source,
        })?;

        debug!("Wrote chart data {}", path.display());
        Ok(path)
    }
}

/// Render every chart in order, stopping at the first failure.
pub fn render_all<R: ChartRenderer + ?Sized>(
    renderer: &mut R,
    charts: &[ChartData],
) -> Result<Vec<PathBuf>> {
    charts.iter().map(|c| renderer.render(c)).collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranker::Ranker;
    use crate::reporter::Reporter;
    use analytics_core::models::{EmployeeRecord, Schema};

    fn make_table(rows: &[(&str, f64, f64)]) -> EmployeeTable {
        EmployeeTable {
            schema: Schema::from_headers(&["Department", "Salary", "Performance_Score"]).unwrap(),
            records: rows
                .iter()
                .map(|&(d, s, p)| EmployeeRecord {
                    department: d.to_string(),
                    salary: s,
                    performance_score: p,
                    extra: vec![],
                })
                .collect(),
        }
    }

    fn charts_for(rows: &[(&str, f64, f64)]) -> Vec<ChartData> {
        let cfg = AnalysisConfig::default();
        let table = make_table(rows);
        let summaries = DepartmentAggregator::department_summaries(&table);
        let ranked = Ranker::rank(&table, &cfg);
        let cohorts = Reporter::cohorts(&ranked, &summaries, &cfg).unwrap();
        build_charts(&table, &summaries, &cohorts, &cfg)
    }

    fn sample() -> Vec<(&'static str, f64, f64)> {
        vec![
            ("Eng", 120.0, 8.0),
            ("Eng", 100.0, 9.0),
            ("HR", 50.0, 6.0),
            ("HR", 70.0, 5.0),
            ("Sales", 90.0, 9.5),
        ]
    }

    /// Records each chart instead of writing it.
    struct RecordingRenderer {
        seen: Vec<ChartKind>,
        fail_on: Option<ChartKind>,
    }

    impl ChartRenderer for RecordingRenderer {
        fn render(&mut self, chart: &ChartData) -> Result<PathBuf> {
            if self.fail_on == Some(chart.kind) {
                return Err(AnalyticsError::Config("renderer unavailable".to_string()));
            }
            self.seen.push(chart.kind);
            Ok(PathBuf::from(chart.kind.file_stem()))
        }
    }

    // ── build_charts ──────────────────────────────────────────────────────────

    #[test]
    fn test_build_charts_emits_all_kinds_in_order() {
        let charts = charts_for(&sample());
        let kinds: Vec<ChartKind> = charts.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, ChartKind::ALL.to_vec());
    }

    #[test]
    fn test_histogram_counts_all_employees() {
        let charts = charts_for(&sample());
        let hist = &charts[0];
        assert_eq!(hist.rows.len(), 20);
        let total: f64 = hist.rows.iter().map(|r| r.values[2]).sum();
        assert_eq!(total, 5.0);
    }

    #[test]
    fn test_efficiency_chart_sorted_ascending() {
        let charts = charts_for(&sample());
        let eff = charts
            .iter()
            .find(|c| c.kind == ChartKind::DepartmentEfficiency)
            .unwrap();
        let values: Vec<f64> = eff.rows.iter().map(|r| r.values[0]).collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_box_stats_per_department() {
        let charts = charts_for(&sample());
        let boxes = &charts[1];
        let hr = boxes.rows.iter().find(|r| r.label == "HR").unwrap();
        assert_eq!(hr.values, vec![50.0, 55.0, 60.0, 65.0, 70.0]);
    }

    #[test]
    fn test_performance_scatter_has_median_line() {
        let charts = charts_for(&sample());
        let scatter = &charts[6];
        assert_eq!(scatter.rows.len(), 5);
        assert_eq!(scatter.reference_lines[0].value, 90.0);
    }

    #[test]
    fn test_budget_share_sums_to_hundred() {
        let charts = charts_for(&sample());
        let pie = &charts[7];
        let share: f64 = pie.rows.iter().map(|r| r.values[1]).sum();
        assert!((share - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_top_rankings_bar_uses_top_chart_cohort() {
        let charts = charts_for(&sample());
        let bar = &charts[8];
        assert_eq!(bar.rows.len(), 5);
        assert_eq!(bar.rows[0].label, "Sales");
    }

    // ── renderers ─────────────────────────────────────────────────────────────

    #[test]
    fn test_render_all_visits_every_chart() {
        let charts = charts_for(&sample());
        let mut renderer = RecordingRenderer {
            seen: vec![],
            fail_on: None,
        };
        let paths = render_all(&mut renderer, &charts).unwrap();
        assert_eq!(paths.len(), 9);
        assert_eq!(renderer.seen, ChartKind::ALL.to_vec());
    }

    #[test]
    fn test_render_all_stops_on_failure() {
        let charts = charts_for(&sample());
        let mut renderer = RecordingRenderer {
            seen: vec![],
            fail_on: Some(ChartKind::BudgetPie),
        };
        assert!(render_all(&mut renderer, &charts).is_err());
        assert_eq!(renderer.seen.len(), 3);
    }

    #[test]
    fn test_csv_renderer_writes_table() {
        let dir = tempfile::tempdir().expect("tempdir");
        let charts = charts_for(&sample());
        let mut renderer = CsvChartRenderer::new(dir.path());
        let path = renderer.render(&charts[6]).unwrap();

        assert_eq!(path, dir.path().join("performance_v_salary.csv"));
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "Department,Salary,Performance_Score");
        assert_eq!(lines[1], "Eng,120,8");
        assert_eq!(lines.last().copied(), Some("ref:Median Salary,90,"));
    }

    #[test]
    fn test_csv_renderer_missing_dir_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let charts = charts_for(&sample());
        let mut renderer = CsvChartRenderer::new(dir.path().join("absent"));
        let err = renderer.render(&charts[0]).unwrap_err();
        assert!(matches!(err, AnalyticsError::FileWrite { .. }));
    }
}
