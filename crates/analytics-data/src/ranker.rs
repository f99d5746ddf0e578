//! Composite scoring and organisation/department rankings.
//!
//! Scores depend on the table-wide maximum salary, so they are never stored
//! on the cleaned table: [`Ranker::rank`] re-derives every score and rank
//! from the table it is given.

use std::collections::HashMap;

use analytics_core::models::{EmployeeTable, RankedRecord, RankedTable};
use analytics_core::thresholds::AnalysisConfig;
use tracing::debug;

/// Descending "min" ranking of `scores`.
///
/// Each value's rank is one plus the number of values strictly greater than
/// it, so tied values share the best rank of their group and the next
/// distinct value skips ahead: `[10, 10, 8, 5]` ranks as `[1, 1, 3, 4]`.
/// Ranks are returned in input order.
pub fn min_rank_descending(scores: &[f64]) -> Vec<u32> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut ranks = vec![0u32; scores.len()];
    let mut group_rank = 1u32;
    for (pos, &idx) in order.iter().enumerate() {
        if pos > 0 && scores[idx] != scores[order[pos - 1]] {
            group_rank = pos as u32 + 1;
        }
        ranks[idx] = group_rank;
    }
    ranks
}

// ── Ranker ────────────────────────────────────────────────────────────────────

/// Stateless composite-score ranker.
pub struct Ranker;

impl Ranker {
    /// `w_perf × performance + w_salary × (salary / max_salary)`.
    pub fn composite_score(
        performance: f64,
        salary: f64,
        max_salary: f64,
        config: &AnalysisConfig,
    ) -> f64 {
        config.performance_weight * performance + config.salary_weight * (salary / max_salary)
    }

    /// Score every employee and attach organisation and department ranks.
    ///
    /// Row order is preserved. An empty table yields an empty ranking.
    pub fn rank(table: &EmployeeTable, config: &AnalysisConfig) -> RankedTable {
        let max_salary = table.max_salary().unwrap_or(1.0);
        let scores: Vec<f64> = table
            .records
            .iter()
            .map(|r| Self::composite_score(r.performance_score, r.salary, max_salary, config))
            .collect();

        let org_ranks = min_rank_descending(&scores);

        // Department partitions, ranked independently.
        let mut partitions: HashMap<&str, Vec<usize>> = HashMap::new();
        for (i, r) in table.records.iter().enumerate() {
            partitions.entry(r.department.as_str()).or_default().push(i);
        }
        let mut dept_ranks = vec![0u32; scores.len()];
        for members in partitions.values() {
            let part: Vec<f64> = members.iter().map(|&i| scores[i]).collect();
            for (&i, rank) in members.iter().zip(min_rank_descending(&part)) {
                dept_ranks[i] = rank;
            }
        }

        debug!(
            "Ranked {} employees across {} departments (max salary {})",
            scores.len(),
            partitions.len(),
            max_salary
        );

        let records = table
            .records
            .iter()
            .zip(scores)
            .zip(org_ranks.into_iter().zip(dept_ranks))
            .map(|((employee, composite_score), (org_rank, dept_rank))| RankedRecord {
                employee: employee.clone(),
                composite_score,
                org_rank,
                dept_rank,
            })
            .collect();

        RankedTable {
            schema: table.schema.clone(),
            records,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
