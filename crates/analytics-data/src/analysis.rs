//! Main analysis pipeline.
//!
//! Orchestrates loading, cleaning, aggregation, ranking and cohort
//! derivation, returning an [`AnalysisResult`] for the reporting layer, and
//! writes the run's output files.

use std::path::{Path, PathBuf};

use analytics_core::error::{AnalyticsError, Result};
use analytics_core::models::{EmployeeTable, RankedTable, RawTable};
use analytics_core::thresholds::AnalysisConfig;
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::aggregator::{DepartmentAggregator, DepartmentSummary, SalaryStats};
use crate::charts::{build_charts, render_all, ChartData, ChartRenderer};
use crate::cleaner::{Cleaner, CleaningReport};
use crate::ranker::Ranker;
use crate::reader::{load_employees, LoadReport};
use crate::reporter::{Cohorts, InsightNarrative, Reporter};
use crate::writer::{write_cleaned, write_ranked};

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the analysis result.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisMetadata {
    /// RFC 3339 timestamp when this result was generated.
    pub generated_at: String,
    /// Source file, when the table was loaded from disk.
    pub input_path: Option<PathBuf>,
    pub rows_loaded: usize,
    pub rows_cleaned: usize,
    pub departments: usize,
    /// Wall-clock seconds spent cleaning, aggregating and ranking.
    pub transform_time_seconds: f64,
}

/// The complete output of one pipeline run.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub metadata: AnalysisMetadata,
    pub load: LoadReport,
    pub cleaning: CleaningReport,
    pub table: EmployeeTable,
    /// Salary statistics, mean salary descending.
    pub salary_stats: Vec<SalaryStats>,
    /// Department summary entity, department-name order.
    pub summaries: Vec<DepartmentSummary>,
    pub ranked: RankedTable,
    pub cohorts: Cohorts,
    pub narrative: InsightNarrative,
    pub charts: Vec<ChartData>,
}

/// Cohort sizes recorded in the JSON summary.
#[derive(Debug, Clone, Serialize)]
pub struct CohortSizes {
    pub top_performers: usize,
    pub underperformers: usize,
    pub underpaid_stars: usize,
    pub at_risk_departments: usize,
}

/// Machine-readable summary of a run, written as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary<'a> {
    pub metadata: &'a AnalysisMetadata,
    pub load: &'a LoadReport,
    pub cleaning: &'a CleaningReport,
    pub salary_statistics: &'a [SalaryStats],
    /// Ordered by total cost, most expensive first.
    pub departments: Vec<DepartmentSummary>,
    pub cohort_sizes: CohortSizes,
    pub underperformer_threshold: f64,
    pub median_salary: f64,
    pub mean_performance: f64,
    pub narrative: Vec<String>,
}

impl AnalysisResult {
    pub fn summary(&self) -> AnalysisSummary<'_> {
        AnalysisSummary {
            metadata: &self.metadata,
            load: &self.load,
            cleaning: &self.cleaning,
            salary_statistics: &self.salary_stats,
            departments: DepartmentAggregator::by_total_cost_desc(&self.summaries),
            cohort_sizes: CohortSizes {
                top_performers: self.cohorts.top_performers.len(),
                underperformers: self.cohorts.underperformers.len(),
                underpaid_stars: self.cohorts.underpaid_stars.len(),
                at_risk_departments: self.cohorts.at_risk_departments.len(),
            },
            underperformer_threshold: self.cohorts.underperformer_threshold,
            median_salary: self.cohorts.median_salary,
            mean_performance: self.cohorts.mean_performance,
            narrative: self.narrative.lines(),
        }
    }
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// Load `path` and run the full pipeline over it.
pub fn analyze_file(path: &Path, config: &AnalysisConfig) -> Result<AnalysisResult> {
    let (raw, load) = load_employees(path)?;
    let mut result = analyze_table(raw, load, config)?;
    result.metadata.input_path = Some(path.to_path_buf());
    Ok(result)
}

/// Run the pipeline over an already-loaded table.
///
/// 1. Clean (dedupe, fill departments, repair salary and performance).
/// 2. Aggregate salary statistics and the department summary.
/// 3. Rank employees by composite score.
/// 4. Derive cohorts and the narrative.
/// 5. Build chart tables.
pub fn analyze_table(
    raw: RawTable,
    load: LoadReport,
    config: &AnalysisConfig,
) -> Result<AnalysisResult> {
    config.validate()?;
    let transform_start = std::time::Instant::now();

    // ── Step 1: Clean ─────────────────────────────────────────────────────────
    let (table, cleaning) = Cleaner::clean(raw)?;

    // ── Step 2: Aggregate ─────────────────────────────────────────────────────
    let salary_stats = DepartmentAggregator::salary_statistics(&table);
    let summaries = DepartmentAggregator::department_summaries(&table);
    info!("Aggregated {} departments", summaries.len());

    // ── Step 3: Rank ──────────────────────────────────────────────────────────
    let ranked = Ranker::rank(&table, config);

    // ── Step 4: Cohorts ───────────────────────────────────────────────────────
    let cohorts = Reporter::cohorts(&ranked, &summaries, config)?;
    let narrative = InsightNarrative::from_cohorts(&cohorts);
    info!(
        "Cohorts: {} top performers, {} underperformers, {} underpaid stars, {} at-risk departments",
        cohorts.top_performers.len(),
        cohorts.underperformers.len(),
        cohorts.underpaid_stars.len(),
        cohorts.at_risk_departments.len()
    );

    // ── Step 5: Charts ────────────────────────────────────────────────────────
    let charts = build_charts(&table, &summaries, &cohorts, config);

    let metadata = AnalysisMetadata {
        generated_at: Utc::now().to_rfc3339(),
        input_path: None,
        rows_loaded: load.rows,
        rows_cleaned: table.records.len(),
        departments: summaries.len(),
        transform_time_seconds: transform_start.elapsed().as_secs_f64(),
    };

    Ok(AnalysisResult {
        metadata,
        load,
        cleaning,
        table,
        salary_stats,
        summaries,
        ranked,
        cohorts,
        narrative,
        charts,
    })
}

// ── Output ────────────────────────────────────────────────────────────────────

/// Destinations for the run's files.
#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub cleaned: PathBuf,
    pub top_performers: PathBuf,
    pub summary: PathBuf,
}

/// Paths actually written by [`write_outputs`].
#[derive(Debug, Clone, Default)]
pub struct WrittenOutputs {
    pub files: Vec<PathBuf>,
    pub charts: Vec<PathBuf>,
}

/// Write the cleaned table, top-performer ranking, JSON summary and, when a
/// renderer is supplied, every chart.
pub fn write_outputs(
    result: &AnalysisResult,
    paths: &OutputPaths,
    renderer: Option<&mut dyn ChartRenderer>,
) -> Result<WrittenOutputs> {
    let mut written = WrittenOutputs::default();

    write_cleaned(&result.table, &paths.cleaned)?;
    written.files.push(paths.cleaned.clone());

    write_ranked(
        &result.ranked.schema,
        &result.cohorts.top_performers,
        &paths.top_performers,
    )?;
    written.files.push(paths.top_performers.clone());

    write_summary(result, &paths.summary)?;
    written.files.push(paths.summary.clone());

    if let Some(renderer) = renderer {
        written.charts = render_all(renderer, &result.charts)?;
        info!("Rendered {} charts", written.charts.len());
    }

    Ok(written)
}

/// Serialize [`AnalysisResult::summary`] to pretty JSON at `path`.
pub fn write_summary(result: &AnalysisResult, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&result.summary())?;
    std::fs::write(path, json).map_err(|source| AnalyticsError::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
