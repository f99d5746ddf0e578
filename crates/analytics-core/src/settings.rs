use clap::Parser;
use std::path::PathBuf;

/// Default location of the raw employee export.
pub const DEFAULT_INPUT: &str = "data/employee_analytics_messy_10000.csv";

/// File name of the cleaned table.
pub const CLEANED_FILE: &str = "employee_analytics_cleaned.csv";

/// File name of the top-performer ranking.
pub const TOP_PERFORMERS_FILE: &str = "top_performers_ranking.csv";

/// File name of the machine-readable run summary.
pub const SUMMARY_FILE: &str = "analysis_summary.json";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Clean an employee CSV and report compensation and performance insights
#[derive(Parser, Debug, Clone)]
#[command(
    name = "employee-analytics",
    about = "Clean an employee CSV and report compensation and performance insights",
    version
)]
pub struct Settings {
    /// Raw employee CSV to analyse
    #[arg(long, default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Directory for the cleaned table, rankings and summary
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Directory for chart data files (defaults to the output directory)
    #[arg(long)]
    pub chart_dir: Option<PathBuf>,

    /// Skip writing chart data files
    #[arg(long)]
    pub no_charts: bool,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Log file path (stderr when omitted)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments and apply derived overrides.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] but with an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut settings = Settings::parse_from(args);
        // --debug overrides log level.
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Where chart data files go.
    pub fn chart_dir(&self) -> PathBuf {
        self.chart_dir
            .clone()
            .unwrap_or_else(|| self.output_dir.clone())
    }

    pub fn cleaned_path(&self) -> PathBuf {
        self.output_dir.join(CLEANED_FILE)
    }

    pub fn top_performers_path(&self) -> PathBuf {
        self.output_dir.join(TOP_PERFORMERS_FILE)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.output_dir.join(SUMMARY_FILE)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
