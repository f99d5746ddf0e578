//! Per-department salary statistics and the department summary table.

use std::collections::BTreeMap;

use analytics_core::models::{EmployeeRecord, EmployeeTable};
use analytics_core::stats;
use analytics_core::thresholds::SALARY_UNIT;
use serde::Serialize;

// ── SalaryStats ───────────────────────────────────────────────────────────────

/// Six-statistic salary breakdown for one department.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryStats {
    pub department: String,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub sum: f64,
}

impl SalaryStats {
    fn from_group(department: &str, members: &[&EmployeeRecord]) -> Self {
        let salaries: Vec<f64> = members.iter().map(|r| r.salary).collect();
        let sum: f64 = salaries.iter().sum();
        let count = salaries.len();
        Self {
            department: department.to_string(),
            count,
            mean: sum / count as f64,
            median: stats::median(salaries.iter().copied()).unwrap_or(0.0),
            min: salaries.iter().copied().fold(f64::INFINITY, f64::min),
            max: salaries.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            sum,
        }
    }
}

// ── DepartmentSummary ─────────────────────────────────────────────────────────

/// One row of the department comparison report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentSummary {
    pub department: String,
    pub headcount: usize,
    pub avg_salary: f64,
    pub total_cost: f64,
    pub avg_performance: f64,
    /// Share of company-wide payroll, in percent.
    pub cost_contribution_pct: f64,
    /// Average performance per $1,000 of average salary.
    pub efficiency_ratio: f64,
}

// ── DepartmentAggregator ──────────────────────────────────────────────────────

/// Stateless helper that groups cleaned employees by department.
pub struct DepartmentAggregator;

impl DepartmentAggregator {
    /// Salary statistics per department, sorted by mean salary descending.
    ///
    /// Departments with equal means keep name order.
    pub fn salary_statistics(table: &EmployeeTable) -> Vec<SalaryStats> {
        let mut out: Vec<SalaryStats> = Self::group(table)
            .into_iter()
            .map(|(dept, members)| SalaryStats::from_group(dept, &members))
            .collect();
        out.sort_by(|a, b| b.mean.total_cmp(&a.mean));
        out
    }

    /// The department summary table, in department-name order.
    ///
    /// The efficiency ratio divides by the average salary in thousands with
    /// no guard; cleaned salaries are always positive.
    pub fn department_summaries(table: &EmployeeTable) -> Vec<DepartmentSummary> {
        let groups = Self::group(table);

        let mut out: Vec<DepartmentSummary> = groups
            .into_iter()
            .map(|(dept, members)| {
                let headcount = members.len();
                let total_cost: f64 = members.iter().map(|r| r.salary).sum();
                let total_perf: f64 = members.iter().map(|r| r.performance_score).sum();
                let avg_salary = total_cost / headcount as f64;
                let avg_performance = total_perf / headcount as f64;
                DepartmentSummary {
                    department: dept.to_string(),
                    headcount,
                    avg_salary,
                    total_cost,
                    avg_performance,
                    cost_contribution_pct: 0.0,
                    efficiency_ratio: avg_performance / (avg_salary / SALARY_UNIT),
                }
            })
            .collect();

        let total_budget: f64 = out.iter().map(|d| d.total_cost).sum();
        for d in &mut out {
            d.cost_contribution_pct = d.total_cost / total_budget * 100.0;
        }
        out
    }

    /// Copy of `summaries` ordered by total cost, most expensive first.
    pub fn by_total_cost_desc(summaries: &[DepartmentSummary]) -> Vec<DepartmentSummary> {
        let mut v = summaries.to_vec();
        v.sort_by(|a, b| b.total_cost.total_cmp(&a.total_cost));
        v
    }

    /// Copy of `summaries` ordered by efficiency ratio, least efficient first.
    pub fn by_efficiency_asc(summaries: &[DepartmentSummary]) -> Vec<DepartmentSummary> {
        let mut v = summaries.to_vec();
        v.sort_by(|a, b| a.efficiency_ratio.total_cmp(&b.efficiency_ratio));
        v
    }

    /// Total salary per department, in department-name order.
    pub fn payroll_by_department(table: &EmployeeTable) -> Vec<(String, f64)> {
        Self::group(table)
            .into_iter()
            .map(|(dept, members)| (dept.to_string(), members.iter().map(|r| r.salary).sum()))
            .collect()
    }

    /// Group records by department; `BTreeMap` keeps the keys sorted.
    pub(crate) fn group(table: &EmployeeTable) -> BTreeMap<&str, Vec<&EmployeeRecord>> {
        let mut map: BTreeMap<&str, Vec<&EmployeeRecord>> = BTreeMap::new();
        for r in &table.records {
            map.entry(r.department.as_str()).or_default().push(r);
        }
        map
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use analytics_core::models::Schema;

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

    fn sample() -> EmployeeTable {
        make_table(&[
            ("Eng", 120_000.0, 8.0),
            ("Eng", 100_000.0, 9.0),
            ("Eng", 80_000.0, 7.0),
            ("HR", 50_000.0, 6.0),
            ("HR", 70_000.0, 5.0),
            ("Sales", 90_000.0, 9.5),
        ])
    }

    // ── salary_statistics ─────────────────────────────────────────────────────

    #[test]
    fn test_salary_statistics_values() {
        let stats = DepartmentAggregator::salary_statistics(&sample());
        let eng = stats.iter().find(|s| s.department == "Eng").unwrap();
        assert_eq!(eng.count, 3);
        assert!((eng.mean - 100_000.0).abs() < 1e-9);
        assert_eq!(eng.median, 100_000.0);
        assert_eq!(eng.min, 80_000.0);
        assert_eq!(eng.max, 120_000.0);
        assert_eq!(eng.sum, 300_000.0);
    }

    #[test]
    fn test_salary_statistics_sorted_by_mean_desc() {
        let stats = DepartmentAggregator::salary_statistics(&sample());
        let order: Vec<&str> = stats.iter().map(|s| s.department.as_str()).collect();
        assert_eq!(order, vec!["Eng", "Sales", "HR"]);
    }

    #[test]
    fn test_salary_statistics_single_employee() {
        let stats = DepartmentAggregator::salary_statistics(&sample());
        let sales = stats.iter().find(|s| s.department == "Sales").unwrap();
        assert_eq!(sales.count, 1);
        assert_eq!(sales.min, 90_000.0);
        assert_eq!(sales.max, 90_000.0);
        assert_eq!(sales.mean, 90_000.0);
        assert_eq!(sales.median, 90_000.0);
    }

    #[test]
    fn test_salary_statistics_empty_table() {
        assert!(DepartmentAggregator::salary_statistics(&make_table(&[])).is_empty());
    }

    // ── department_summaries ──────────────────────────────────────────────────

    #[test]
    fn test_department_summaries_name_order() {
        let summaries = DepartmentAggregator::department_summaries(&sample());
        let order: Vec<&str> = summaries.iter().map(|s| s.department.as_str()).collect();
        assert_eq!(order, vec!["Eng", "HR", "Sales"]);
    }

    #[test]
    fn test_department_summaries_metrics() {
        let summaries = DepartmentAggregator::department_summaries(&sample());
        let hr = &summaries[1];
        assert_eq!(hr.headcount, 2);
        assert!((hr.avg_salary - 60_000.0).abs() < 1e-9);
        assert!((hr.total_cost - 120_000.0).abs() < 1e-9);
        assert!((hr.avg_performance - 5.5).abs() < 1e-9);
        // 120k of 510k payroll.
        assert!((hr.cost_contribution_pct - 120.0 / 510.0 * 100.0).abs() < 1e-9);
        // 5.5 / 60
        assert!((hr.efficiency_ratio - 5.5 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_headcount_sums_to_row_count() {
        let table = sample();
        let summaries = DepartmentAggregator::department_summaries(&table);
        let total: usize = summaries.iter().map(|s| s.headcount).sum();
        assert_eq!(total, table.records.len());
    }

    #[test]
    fn test_cost_contribution_sums_to_hundred() {
        let summaries = DepartmentAggregator::department_summaries(&sample());
        let total: f64 = summaries.iter().map(|s| s.cost_contribution_pct).sum();
        assert!((total - 100.0).abs() < 1e-9, "total = {total}");
    }

    // ── orderings ─────────────────────────────────────────────────────────────

    #[test]
    fn test_by_total_cost_desc() {
        let summaries = DepartmentAggregator::department_summaries(&sample());
        let sorted = DepartmentAggregator::by_total_cost_desc(&summaries);
        let order: Vec<&str> = sorted.iter().map(|s| s.department.as_str()).collect();
        assert_eq!(order, vec!["Eng", "HR", "Sales"]);
        // The entity itself is untouched.
        assert_eq!(summaries[2].department, "Sales");
    }

    #[test]
    fn test_by_efficiency_asc() {
        let summaries = DepartmentAggregator::department_summaries(&sample());
        let sorted = DepartmentAggregator::by_efficiency_asc(&summaries);
        let order: Vec<&str> = sorted.iter().map(|s| s.department.as_str()).collect();
        // Eng 8/100 = 0.08, HR 5.5/60 ≈ 0.0917, Sales 9.5/90 ≈ 0.1056
        assert_eq!(order, vec!["Eng", "HR", "Sales"]);
    }

    #[test]
    fn test_payroll_by_department() {
        let payroll = DepartmentAggregator::payroll_by_department(&sample());
        assert_eq!(
            payroll,
            vec![
                ("Eng".to_string(), 300_000.0),
                ("HR".to_string(), 120_000.0),
                ("Sales".to_string(), 90_000.0)
            ]
        );
    }
}
