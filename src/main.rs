use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use hpms_reporting::{ReportingConfig, ReportingPeriod, SqliteStore, run_quarterly_reports};

/// Quarterly compliance and census reporting over the enrollment and
/// immunization store
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Quarter to report (1-4); defaults to the most recently completed
    /// quarter
    #[arg(long)]
    quarter: Option<u8>,

    /// Year of the quarter; defaults to the current year
    #[arg(long)]
    year: Option<i32>,

    /// Path to the reporting database
    #[arg(long, default_value = "reporting.db")]
    database: PathBuf,

    /// Root directory for report files
    #[arg(long, default_value = "report_files")]
    output: PathBuf,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => {
            println!("Complete!");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> hpms_reporting::Result<()> {
    let today = chrono::Local::now().date_naive();
    let period = ReportingPeriod::resolve(cli.quarter, cli.year, today)?;
    info!("reporting period: {period}");

    let config = ReportingConfig {
        database_path: cli.database,
        output_root: cli.output,
        ..ReportingConfig::default()
    };

    let store = SqliteStore::open(&config.database_path)?;
    let mut summary = run_quarterly_reports(&store, &config, &period)?;

    for name in &summary.completed {
        info!("{name}: complete");
    }
    // Each failure was already logged by the run wrapper; surface the
    // first one to drive the exit code.
    if let Some((_, err)) = summary.failed.pop() {
        return Err(err);
    }

    Ok(())
}
