//! Command execution for the CLI
//!
//! Sets up logging, layers configuration, runs the conversion and prints
//! the final summary.

use crate::cli::Args;
use crate::config::ConverterConfig;
use crate::models::RunStats;
use crate::processor::RecordTransformer;
use anyhow::{Context, Result};
use colored::*;
use tracing::{debug, info};

/// Main command runner
pub async fn run(args: Args) -> Result<RunStats> {
    setup_logging(&args);

    info!("Starting missing-annotations");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;

    let file_config = ConverterConfig::load(args.config_file.as_deref())
        .context("Failed to load configuration")?;
    let config = args.apply_to(file_config);
    debug!("Effective configuration: {:?}", config);

    let mode = args.run_mode();
    let transformer =
        RecordTransformer::new(args.input_path.clone(), args.output_path.clone(), mode)
            .with_config(config);

    let stats = transformer.run().await.with_context(|| {
        format!(
            "Failed to convert {} to {}",
            args.input_path.display(),
            args.output_path.display()
        )
    })?;

    if !args.quiet {
        print_summary(&transformer, &stats);
    }

    Ok(stats)
}

/// Set up structured logging based on CLI arguments
fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("missing_annotations={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
}

fn print_summary(transformer: &RecordTransformer, stats: &RunStats) {
    println!("\n{}", "Annotation Summary".bright_green().bold());
    println!(
        "  {} {}",
        "Output:".bright_cyan(),
        stats.output_path.display()
    );
    if transformer.mode().is_incremental() {
        println!(
            "  {} {}",
            "Prior rows kept:".bright_cyan(),
            stats.prior_rows_copied.to_string().bright_white()
        );
        println!(
            "  {} {}",
            "Already present:".bright_cyan(),
            stats.records_excluded.to_string().bright_white()
        );
    }
    println!(
        "  {} {}",
        "Records read:".bright_cyan(),
        stats.records_read.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Rows written:".bright_cyan(),
        stats.rows_written.to_string().bright_white().bold()
    );
    if stats.lines_skipped > 0 {
        println!(
            "  {} {}",
            "Lines skipped:".bright_red(),
            stats.lines_skipped.to_string().bright_red().bold()
        );
    }
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.elapsed.as_millis().to_string().bright_white()
    );
}
