//! Cohort derivation and the executive insight narrative.

use analytics_core::error::{AnalyticsError, Result};
use analytics_core::models::{RankedRecord, RankedTable, PERFORMANCE_COLUMN, SALARY_COLUMN};
use analytics_core::stats;
use analytics_core::thresholds::AnalysisConfig;
use serde::Serialize;

use crate::aggregator::DepartmentSummary;

/// Fixed closing recommendations of the narrative.
pub const STRATEGIC_RECOMMENDATIONS: [&str; 3] = [
    "Performance-Pay Alignment: Increase the correlation between score and salary.",
    "Resource Reallocation: Move budget from 'High-Cost' to 'High-Value' departments.",
    "Training Focus: Identify the bottom 10% of performers for a 90-day improvement plan.",
];

// ── Cohorts ───────────────────────────────────────────────────────────────────

/// Named employee and department groups derived from a ranked table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cohorts {
    /// Every row with an organisation rank within the cutoff, best first.
    pub top_performers: Vec<RankedRecord>,
    /// Exactly the first `top_chart_size` rows by rank (fewer if the table is
    /// smaller); ties resolved by row order.
    pub top_chart: Vec<RankedRecord>,
    pub underperformers: Vec<RankedRecord>,
    pub underpaid_stars: Vec<RankedRecord>,
    pub at_risk_departments: Vec<DepartmentSummary>,
    /// Performance cut-off below which a row is an underperformer.
    pub underperformer_threshold: f64,
    /// Percentile the cut-off was taken at.
    pub underperformer_percentile: f64,
    pub median_salary: f64,
    pub mean_performance: f64,
}

/// Stateless cohort builder.
pub struct Reporter;

impl Reporter {
    /// Derive every cohort in one pass over the inputs.
    pub fn cohorts(
        ranked: &RankedTable,
        summaries: &[DepartmentSummary],
        config: &AnalysisConfig,
    ) -> Result<Cohorts> {
        let perf_sorted = stats::sorted(ranked.records.iter().map(|r| r.employee.performance_score));
        let underperformer_threshold = stats::percentile(&perf_sorted, config.underperformer_percentile)
            .ok_or_else(|| AnalyticsError::EmptyColumn(PERFORMANCE_COLUMN.to_string()))?;
        let mean_performance = stats::mean(perf_sorted.iter().copied())
            .ok_or_else(|| AnalyticsError::EmptyColumn(PERFORMANCE_COLUMN.to_string()))?;
        let median_salary = stats::median(ranked.records.iter().map(|r| r.employee.salary))
            .ok_or_else(|| AnalyticsError::EmptyColumn(SALARY_COLUMN.to_string()))?;

        Ok(Cohorts {
            top_performers: Self::top_performers(ranked, config.top_rank_cutoff),
            top_chart: Self::top_n(ranked, config.top_chart_size),
            underperformers: Self::underperformers(ranked, underperformer_threshold),
            underpaid_stars: Self::underpaid_stars(
                ranked,
                config.star_performance_threshold,
                median_salary,
            ),
            at_risk_departments: Self::at_risk_departments(
                summaries,
                config.cost_share_threshold_pct,
                mean_performance,
            ),
            underperformer_threshold,
            underperformer_percentile: config.underperformer_percentile,
            median_salary,
            mean_performance,
        })
    }

    /// Rows with `org_rank <= cutoff`, ordered by rank (stable on row order).
    ///
    /// May hold more than `cutoff` rows when ties straddle the boundary.
    pub fn top_performers(ranked: &RankedTable, cutoff: u32) -> Vec<RankedRecord> {
        let mut top: Vec<RankedRecord> = ranked
            .records
            .iter()
            .filter(|r| r.org_rank <= cutoff)
            .cloned()
            .collect();
        top.sort_by_key(|r| r.org_rank);
        top
    }

    /// The `n` best-ranked rows, first occurrence winning ties.
    pub fn top_n(ranked: &RankedTable, n: usize) -> Vec<RankedRecord> {
        let mut all: Vec<&RankedRecord> = ranked.records.iter().collect();
        all.sort_by_key(|r| r.org_rank);
        all.into_iter().take(n).cloned().collect()
    }

    /// Rows whose performance is strictly below `threshold`.
    pub fn underperformers(ranked: &RankedTable, threshold: f64) -> Vec<RankedRecord> {
        ranked
            .records
            .iter()
            .filter(|r| r.employee.performance_score < threshold)
            .cloned()
            .collect()
    }

    /// High performers paid below the median salary.
    pub fn underpaid_stars(
        ranked: &RankedTable,
        performance_threshold: f64,
        median_salary: f64,
    ) -> Vec<RankedRecord> {
        ranked
            .records
            .iter()
            .filter(|r| {
                r.employee.performance_score > performance_threshold
                    && r.employee.salary < median_salary
            })
            .cloned()
            .collect()
    }

    /// Departments taking more than `cost_share_pct` of payroll while
    /// averaging below the company-wide mean performance.
    pub fn at_risk_departments(
        summaries: &[DepartmentSummary],
        cost_share_pct: f64,
        mean_performance: f64,
    ) -> Vec<DepartmentSummary> {
        summaries
            .iter()
            .filter(|d| d.cost_contribution_pct > cost_share_pct && d.avg_performance < mean_performance)
            .cloned()
            .collect()
    }
}

// ── Narrative ─────────────────────────────────────────────────────────────────

/// The executive insight narrative, ready to print.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightNarrative {
    pub underpaid_star_count: usize,
    pub underperformer_count: usize,
    pub underperformer_percentile: f64,
    pub top_performer_count: usize,
    pub at_risk_departments: Vec<String>,
}

impl InsightNarrative {
    pub fn from_cohorts(cohorts: &Cohorts) -> Self {
        Self {
            underpaid_star_count: cohorts.underpaid_stars.len(),
            underperformer_count: cohorts.underperformers.len(),
            underperformer_percentile: cohorts.underperformer_percentile,
            top_performer_count: cohorts.top_performers.len(),
            at_risk_departments: cohorts
                .at_risk_departments
                .iter()
                .map(|d| d.department.clone())
                .collect(),
        }
    }

    /// Narrative text, one entry per printed line.
    pub fn lines(&self) -> Vec<String> {
        let mut out = vec![
            "[RISK: Retention Alert]".to_string(),
            format!(
                "Found {} employees with high performance but below-median pay.",
                self.underpaid_star_count
            ),
            "Recommendation: Review compensation for these individuals to prevent turnover."
                .to_string(),
            String::new(),
            "[OPPORTUNITY: Budget Optimization]".to_string(),
        ];

        if self.at_risk_departments.is_empty() {
            out.push("No immediate departmental budget risks identified.".to_string());
        } else {
            for dept in &self.at_risk_departments {
                out.push(format!(
                    "The '{}' department has high costs but below-average performance.",
                    dept
                ));
            }
            out.push("Recommendation: Audit processes in these departments to improve ROI.".to_string());
        }

        out.push(String::new());
        out.push("[TALENT: Performance Distribution]".to_string());
        out.push(format!(
            "{} top-ranked employees; {} employees fall below the {} performance percentile.",
            self.top_performer_count,
            self.underperformer_count,
            ordinal(self.underperformer_percentile)
        ));

        out.push(String::new());
        out.push("[STRATEGIC RECOMMENDATIONS]".to_string());
        for (i, rec) in STRATEGIC_RECOMMENDATIONS.iter().enumerate() {
            out.push(format!("{}. {}", i + 1, rec));
        }
        out
    }
}

/// `10.0` as `"10th"`, `2.0` as `"2nd"`, `12.5` as `"12.5th"`.
fn ordinal(p: f64) -> String {
    if p.fract() != 0.0 || !p.is_finite() {
        return format!("{p}th");
    }
    let n = p as u64;
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

impl std::fmt::Display for InsightNarrative {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.lines().join("\n"))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::DepartmentAggregator;
    use crate::ranker::Ranker;
    use analytics_core::models::{EmployeeRecord, EmployeeTable, Schema};

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

    fn ranked(rows: &[(&str, f64, f64)]) -> RankedTable {
        Ranker::rank(&make_table(rows), &AnalysisConfig::default())
    }

    fn summary(dept: &str, pct: f64, perf: f64) -> DepartmentSummary {
        DepartmentSummary {
            department: dept.to_string(),
            headcount: 1,
            avg_salary: 1.0,
            total_cost: 1.0,
            avg_performance: perf,
            cost_contribution_pct: pct,
            efficiency_ratio: 1.0,
        }
    }

    // ── top_performers ────────────────────────────────────────────────────────

    #[test]
    fn test_top_performers_sorted_by_rank() {
        let table = ranked(&[("A", 100.0, 1.0), ("A", 100.0, 9.0), ("A", 100.0, 5.0)]);
        let top = Reporter::top_performers(&table, 10);
        let ranks: Vec<u32> = top.iter().map(|r| r.org_rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn test_top_performers_ties_inflate_cohort() {
        // Eleven rows: ten distinct scores then a tie at rank 10.
        let mut rows: Vec<(&str, f64, f64)> = (0..9).map(|i| ("A", 100.0, 10.0 - i as f64)).collect();
        rows.push(("A", 100.0, 1.0));
        rows.push(("A", 100.0, 1.0));
        rows.push(("A", 100.0, 0.5));
        let table = ranked(&rows);

        let top = Reporter::top_performers(&table, 10);
        assert_eq!(top.len(), 11);
        assert!(top.iter().all(|r| r.org_rank <= 10));

        let chart = Reporter::top_n(&table, 10);
        assert_eq!(chart.len(), 10);
    }

    #[test]
    fn test_top_n_smaller_table() {
        let table = ranked(&[("A", 100.0, 1.0), ("B", 100.0, 2.0)]);
        let chart = Reporter::top_n(&table, 10);
        assert_eq!(chart.len(), 2);
        assert_eq!(chart[0].employee.department, "B");
    }

    // ── underperformers ───────────────────────────────────────────────────────

    #[test]
    fn test_underperformers_below_tenth_percentile() {
        // Scores 1..=10: p10 = 1.9 → only score 1 qualifies.
        let rows: Vec<(&str, f64, f64)> = (1..=10).map(|i| ("A", 100.0, i as f64)).collect();
        let table = ranked(&rows);
        let cfg = AnalysisConfig::default();
        let cohorts = Reporter::cohorts(&table, &[], &cfg).unwrap();
        assert!((cohorts.underperformer_threshold - 1.9).abs() < 1e-9);
        assert_eq!(cohorts.underperformers.len(), 1);
        assert_eq!(cohorts.underperformers[0].employee.performance_score, 1.0);
    }

    #[test]
    fn test_underperformers_strict_comparison() {
        let table = ranked(&[("A", 100.0, 5.0), ("A", 100.0, 5.0)]);
        assert!(Reporter::underperformers(&table, 5.0).is_empty());
    }

    // ── underpaid_stars ───────────────────────────────────────────────────────

    #[test]
    fn test_underpaid_star_below_median_included() {
        // Salaries 50, 100, 150 → median 100.
        let table = ranked(&[("A", 50.0, 9.0), ("A", 100.0, 9.0), ("A", 150.0, 2.0)]);
        let stars = Reporter::underpaid_stars(&table, 8.0, 100.0);
        assert_eq!(stars.len(), 1);
        assert_eq!(stars[0].employee.salary, 50.0);
    }

    #[test]
    fn test_underpaid_star_at_median_excluded() {
        let table = ranked(&[("A", 100.0, 9.0)]);
        assert!(Reporter::underpaid_stars(&table, 8.0, 100.0).is_empty());
    }

    #[test]
    fn test_underpaid_star_requires_strictly_above_threshold() {
        let table = ranked(&[("A", 10.0, 8.0), ("A", 200.0, 1.0)]);
        assert!(Reporter::underpaid_stars(&table, 8.0, 105.0).is_empty());
    }

    #[test]
    fn test_cohorts_use_cleaned_median() {
        let table = ranked(&[("A", 40.0, 9.0), ("A", 60.0, 9.5), ("A", 80.0, 3.0)]);
        let cohorts = Reporter::cohorts(&table, &[], &AnalysisConfig::default()).unwrap();
        assert_eq!(cohorts.median_salary, 60.0);
        assert_eq!(cohorts.underpaid_stars.len(), 1);
    }

    // ── at_risk_departments ───────────────────────────────────────────────────

    #[test]
    fn test_at_risk_requires_both_conditions() {
        let summaries = vec![
            summary("HighCostLowPerf", 30.0, 4.0),
            summary("HighCostHighPerf", 30.0, 9.0),
            summary("LowCostLowPerf", 10.0, 4.0),
            summary("Boundary", 20.0, 4.0),
        ];
        let risky = Reporter::at_risk_departments(&summaries, 20.0, 6.0);
        assert_eq!(risky.len(), 1);
        assert_eq!(risky[0].department, "HighCostLowPerf");
    }

    #[test]
    fn test_cohorts_at_risk_end_to_end() {
        let table = make_table(&[
            ("Eng", 200.0, 3.0),
            ("Eng", 200.0, 4.0),
            ("HR", 50.0, 9.0),
            ("Sales", 50.0, 8.0),
        ]);
        let summaries = DepartmentAggregator::department_summaries(&table);
        let ranked = Ranker::rank(&table, &AnalysisConfig::default());
        let cohorts = Reporter::cohorts(&ranked, &summaries, &AnalysisConfig::default()).unwrap();
        let names: Vec<&str> = cohorts
            .at_risk_departments
            .iter()
            .map(|d| d.department.as_str())
            .collect();
        assert_eq!(names, vec!["Eng"]);
    }

    #[test]
    fn test_cohorts_empty_table_fails() {
        let err = Reporter::cohorts(&ranked(&[]), &[], &AnalysisConfig::default()).unwrap_err();
        assert!(matches!(err, AnalyticsError::EmptyColumn(_)));
    }

    // ── InsightNarrative ──────────────────────────────────────────────────────

    #[test]
    fn test_narrative_without_risks() {
        let narrative = InsightNarrative {
            underpaid_star_count: 3,
            underperformer_count: 2,
            underperformer_percentile: 10.0,
            top_performer_count: 10,
            at_risk_departments: vec![],
        };
        let text = narrative.to_string();
        assert!(text.contains("Found 3 employees with high performance"));
        assert!(text.contains("No immediate departmental budget risks identified."));
        assert!(!text.contains("Audit processes"));
        assert!(text.contains("3. Training Focus"));
        assert!(text.contains("2 employees fall below the 10th performance percentile."));
    }

    #[test]
    fn test_narrative_with_risks() {
        let narrative = InsightNarrative {
            underpaid_star_count: 0,
            underperformer_count: 0,
            underperformer_percentile: 10.0,
            top_performer_count: 1,
            at_risk_departments: vec!["Eng".to_string(), "Ops".to_string()],
        };
        let lines = narrative.lines();
        assert!(lines
            .iter()
            .any(|l| l == "The 'Eng' department has high costs but below-average performance."));
        assert!(lines.iter().any(|l| l.contains("'Ops'")));
        assert!(lines
            .iter()
            .any(|l| l == "Recommendation: Audit processes in these departments to improve ROI."));
        assert!(!lines.iter().any(|l| l.contains("No immediate")));
    }

    #[test]
    fn test_narrative_names_configured_percentile() {
        let config = AnalysisConfig {
            underperformer_percentile: 25.0,
            ..AnalysisConfig::default()
        };
        let table = ranked(&[("Eng", 100.0, 9.0), ("Eng", 90.0, 5.0), ("Ops", 80.0, 2.0)]);
        let cohorts = Reporter::cohorts(&table, &[], &config).unwrap();
        assert_eq!(cohorts.underperformer_percentile, 25.0);

        let text = InsightNarrative::from_cohorts(&cohorts).to_string();
        assert!(text.contains("below the 25th performance percentile"), "{text}");
        assert!(!text.contains("10th"));
    }

    #[test]
    fn test_ordinal_suffixes() {
        assert_eq!(ordinal(1.0), "1st");
        assert_eq!(ordinal(2.0), "2nd");
        assert_eq!(ordinal(3.0), "3rd");
        assert_eq!(ordinal(11.0), "11th");
        assert_eq!(ordinal(22.0), "22nd");
        assert_eq!(ordinal(12.5), "12.5th");
    }
}
