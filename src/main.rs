//! placement-stats - cohort placement statistics reports
//!
//! A CLI tool that reads the master and offer details sheets of a
//! graduating cohort, aggregates placement, branch, gender, CTC and
//! company statistics, and writes a Markdown or JSON report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (invalid arguments, fetch, parse, config, write)

mod analysis;
mod cli;
mod config;
mod models;
mod report;
mod source;

use analysis::CohortLayout;
use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE};
use indicatif::{ProgressBar, ProgressStyle};
use models::{CtcStats, PlacementStats, Report, ReportMetadata};
use report::{ReportEntry, ReportHistory};
use source::DataSource;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    let (mut config, config_origin) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    // Initialize logging
    init_logging(&args, config.general.verbose);

    info!("placement-stats v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: {}", config_origin);
    debug!("Arguments: {:?}", args);

    if args.history {
        return match print_history(&config.general.output_dir) {
            Ok(()) => Ok(()),
            Err(e) => {
                eprintln!("\n❌ Error: {:#}", e);
                std::process::exit(1);
            }
        };
    }

    if let Err(e) = run(&args, &config).await {
        error!("Report generation failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .placement-stats.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to set the spreadsheet, branch layout, and report sections.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args, verbose_by_default: bool) {
    let level = args.log_level(verbose_by_default);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load configuration from file or use defaults, returning where it came from.
fn load_config(args: &Args) -> Result<(Config, String)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, config_path.display().to_string()));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, CONFIG_FILE.to_string())),
        Ok(None) => Ok((Config::default(), "built-in defaults".to_string())),
        Err(e) => {
            eprintln!("⚠️  Ignoring {}: {:#}", CONFIG_FILE, e);
            Ok((Config::default(), "built-in defaults".to_string()))
        }
    }
}

/// Spinner shown while a step runs; hidden in quiet mode.
fn spinner(args: &Args, message: &str) -> ProgressBar {
    if args.quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message.to_string());
    pb
}

/// Fetch, aggregate and write one report.
async fn run(args: &Args, config: &Config) -> Result<()> {
    let start_time = Instant::now();

    // Step 1: Pick the data source
    let (data_source, spreadsheet_id) = match (&args.master_csv, &args.offers_csv) {
        (Some(master), Some(offers)) => (
            DataSource::Local {
                master: master.clone(),
                offers: offers.clone(),
            },
            None,
        ),
        _ => (
            DataSource::from_config(&config.source)?,
            Some(config.source.spreadsheet_id.clone()),
        ),
    };
    let source_label = data_source.describe();

    // Step 2: Fetch and parse both sheets
    println!("📥 Loading sheets from {}", source_label);
    let pb = spinner(args, "Fetching master and offer details sheets...");
    let loaded = data_source.load().await;
    pb.finish_and_clear();
    let (students, offers) = loaded?;

    let student_records = students.len();
    let offer_records = offers.len();
    info!(
        "Parsed {} student records and {} offer records",
        student_records, offer_records
    );

    // Step 3: Aggregate
    println!("🔬 Computing statistics...");
    let layout = CohortLayout::from(&config.cohort);
    let (placement, ctc) = analysis::compute_all(students, offers, layout).await?;
    let duration = start_time.elapsed().as_secs_f64();

    if args.dry_run {
        print_summary(&placement, &ctc, duration);
        println!("\n✅ Dry run complete. No files were written.");
        return Ok(());
    }

    // Step 4: Build and write the report
    println!("📝 Generating report...");
    let generated_at = Utc::now();
    let report = Report {
        metadata: ReportMetadata {
            institution: config.cohort.institution.clone(),
            title: config.cohort.report_title.clone(),
            generated_at,
            source: source_label,
            student_records,
            offer_records,
            duration_seconds: duration,
        },
        placement,
        ctc,
    };

    let format = config.general.format;
    let output = match format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report, &config.report),
    };

    let output_dir = &config.general.output_dir;
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    let filename = report::unique_report_filename(output_dir, generated_at, format);
    let output_path = output_dir.join(&filename);
    std::fs::write(&output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;
    info!("Report written to {}", output_path.display());

    // Step 5: Record it in the history index
    if config.general.history {
        let mut history = ReportHistory::load(output_dir)?;
        history.append(ReportEntry::new(
            &report,
            &filename,
            config.report.to_flags(),
            spreadsheet_id,
        ))?;
    } else {
        debug!("History disabled, index not updated");
    }

    print_summary(&report.placement, &report.ctc, duration);
    println!(
        "\n✅ Report complete! Saved to: {}",
        output_path.display()
    );

    Ok(())
}

fn print_summary(placement: &PlacementStats, ctc: &CtcStats, duration: f64) {
    println!("\n📊 Placement Summary:");
    println!(
        "   Placed: {} / {} opted ({:.1}%)",
        placement.placed, placement.opt_placement, placement.overall_placement_percent
    );
    println!(
        "   Offers: {} from {} companies",
        placement.total_offers, placement.total_companies
    );
    for branch in &placement.merged_branches {
        println!(
            "   - {}: {} / {} ({:.1}%)",
            branch.label, branch.placed, branch.opt_placement, branch.placement_percent
        );
    }
    if ctc.count > 0 {
        println!(
            "   CTC: highest {} | median {} | average {}",
            report::format_inr(ctc.highest),
            report::format_inr(ctc.median),
            report::format_inr(ctc.average)
        );
    }
    println!("   Duration: {:.1}s", duration);
}

/// Handle --history: list previously generated reports.
fn print_history(output_dir: &Path) -> Result<()> {
    let history = ReportHistory::load(output_dir)?;

    if history.entries().is_empty() {
        println!("No reports recorded in {}", output_dir.display());
        return Ok(());
    }

    println!(
        "📚 {} report(s) in {}:\n",
        history.entries().len(),
        output_dir.display()
    );
    for entry in history.entries() {
        let flags = if entry.flags.is_empty() {
            "default".to_string()
        } else {
            entry.flags.join(" ")
        };
        println!("   📄 {}  {}", entry.timestamp, entry.filename);
        println!(
            "      Placed {}/{} ({}%) | {} companies | median {} | {}",
            entry.stats.placed,
            entry.stats.opt_placement,
            entry.stats.placement_percent,
            entry.stats.total_companies,
            entry.stats.median_ctc,
            flags
        );
    }

    Ok(())
}
