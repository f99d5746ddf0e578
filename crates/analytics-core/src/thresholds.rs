use crate::error::{AnalyticsError, Result};
use serde::{Deserialize, Serialize};

// ── Shared constants ──────────────────────────────────────────────────────────

/// Weight of the raw performance score in the composite score.
pub const PERFORMANCE_WEIGHT: f64 = 0.7;

/// Weight of the max-normalised salary in the composite score.
pub const SALARY_WEIGHT: f64 = 0.3;

/// Rows with an organisation rank at or below this value are top performers.
pub const TOP_RANK_CUTOFF: u32 = 10;

/// Number of rows shown in the top-rankings chart.
pub const TOP_CHART_SIZE: usize = 10;

/// Percentile (0–100) of performance below which an employee underperforms.
pub const UNDERPERFORMER_PERCENTILE: f64 = 10.0;

/// Performance score strictly above which an employee counts as a star.
pub const STAR_PERFORMANCE_THRESHOLD: f64 = 8.0;

/// Cost share (percent of payroll) strictly above which a department is
/// considered high-cost.
pub const COST_SHARE_THRESHOLD_PCT: f64 = 20.0;

/// Number of bins in the company-wide salary histogram.
pub const HISTOGRAM_BINS: usize = 20;

/// Salary divisor for the efficiency ratio (performance per $1,000).
pub const SALARY_UNIT: f64 = 1_000.0;

// ── AnalysisConfig ────────────────────────────────────────────────────────────

/// Tunable thresholds for ranking and cohort derivation.
///
/// The defaults reproduce the fixed constants of the reporting job; they are
/// not exposed on the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub performance_weight: f64,
    pub salary_weight: f64,
    pub top_rank_cutoff: u32,
    pub top_chart_size: usize,
    pub underperformer_percentile: f64,
    pub star_performance_threshold: f64,
    pub cost_share_threshold_pct: f64,
    pub histogram_bins: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            performance_weight: PERFORMANCE_WEIGHT,
            salary_weight: SALARY_WEIGHT,
            top_rank_cutoff: TOP_RANK_CUTOFF,
            top_chart_size: TOP_CHART_SIZE,
            underperformer_percentile: UNDERPERFORMER_PERCENTILE,
            star_performance_threshold: STAR_PERFORMANCE_THRESHOLD,
            cost_share_threshold_pct: COST_SHARE_THRESHOLD_PCT,
            histogram_bins: HISTOGRAM_BINS,
        }
    }
}

impl AnalysisConfig {
    /// Reject values that would make the derived metrics meaningless.
    pub fn validate(&self) -> Result<()> {
        if !self.performance_weight.is_finite() || !self.salary_weight.is_finite() {
            return Err(AnalyticsError::Config(
                "composite weights must be finite".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&self.underperformer_percentile) {
            return Err(AnalyticsError::Config(format!(
                "underperformer percentile {} is outside 0-100",
                self.underperformer_percentile
            )));
        }
        if self.top_rank_cutoff == 0 {
            return Err(AnalyticsError::Config(
                "top rank cutoff must be at least 1".to_string(),
            ));
        }
        if self.histogram_bins == 0 {
            return Err(AnalyticsError::Config(
                "histogram needs at least one bin".to_string(),
            ));
        }
        Ok(())
    }
}
