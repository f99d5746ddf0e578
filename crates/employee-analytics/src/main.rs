mod bootstrap;
mod report;

use analytics_core::settings::Settings;
use analytics_core::thresholds::AnalysisConfig;
use analytics_data::analysis::{analyze_file, write_outputs, OutputPaths};
use analytics_data::charts::{ChartRenderer, CsvChartRenderer};
use anyhow::{Context, Result};

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    let chart_dir = settings.chart_dir();
    let mut dirs = vec![settings.output_dir.as_path()];
    if !settings.no_charts {
        dirs.push(chart_dir.as_path());
    }
    bootstrap::ensure_directories(dirs)?;

    tracing::info!("Employee Analytics v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Input: {}, output: {}, charts: {}",
        settings.input.display(),
        settings.output_dir.display(),
        if settings.no_charts {
            "disabled".to_string()
        } else {
            chart_dir.display().to_string()
        }
    );

    let config = AnalysisConfig::default();
    let result = analyze_file(&settings.input, &config)
        .with_context(|| format!("analysing {}", settings.input.display()))?;

    println!("{}", report::render(&result));

    let paths = OutputPaths {
        cleaned: settings.cleaned_path(),
        top_performers: settings.top_performers_path(),
        summary: settings.summary_path(),
    };
    let mut renderer = CsvChartRenderer::new(chart_dir.clone());
    let renderer: Option<&mut dyn ChartRenderer> = if settings.no_charts {
        None
    } else {
        Some(&mut renderer)
    };
    let written = write_outputs(&result, &paths, renderer).context("writing outputs")?;

    println!("\n{}", report::outputs_section(&written));
    tracing::info!(
        "Finished: {} files, {} charts",
        written.files.len(),
        written.charts.len()
    );

    Ok(())
}
