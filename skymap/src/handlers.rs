use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use colored::Colorize;
use skymap_core::report::{render_report, save_report};
use skymap_core::{
    DiscoveryProgress, InventoryReport, ReportFormat, build_report, execute_discovery,
    run_inventory,
};
use skymap_discovery::{AwsCliSource, SnapshotSource};
use std::path::PathBuf;
use tracing::Level;

/// Where and how a finished report is written.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputOptions {
    pub format: ReportFormat,
    pub output: Option<PathBuf>,
}

/// Install the stderr log subscriber. Repeated calls are ignored.
pub fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Expand a leading `~` and environment variables in a user-supplied path.
pub fn expand_path(raw: &str) -> PathBuf {
    match shellexpand::full(raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(shellexpand::tilde(raw).as_ref()),
    }
}

pub fn output_options(args: &ArgMatches) -> Result<OutputOptions> {
    let format_name = args
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("json");
    let format = ReportFormat::from_str(format_name)
        .ok_or_else(|| anyhow!("Unknown report format '{}'", format_name))?;
    let output = args.get_one::<String>("output").map(|p| expand_path(p));
    Ok(OutputOptions { format, output })
}

pub fn aws_source_from_args(args: &ArgMatches, progress: &DiscoveryProgress) -> AwsCliSource {
    let mut source = AwsCliSource::new().with_progress_callback(progress.callback());
    if let Some(program) = args.get_one::<String>("aws-bin") {
        source = source.with_program(expand_path(program).to_string_lossy());
    }
    if let Some(profile) = args.get_one::<String>("profile") {
        source = source.with_profile(profile);
    }
    if let Some(region) = args.get_one::<String>("region") {
        source = source.with_region(region);
    }
    source
}

/// Render the report and either save it or print it to stdout.
pub fn emit_report(report: &InventoryReport, options: &OutputOptions, quiet: bool) -> Result<()> {
    let content = render_report(report, options.format).context("Failed to render report")?;

    match options.output {
        Some(ref path) => {
            save_report(&content, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            if !quiet {
                eprintln!(
                    "{} Report saved: {}",
                    "✓".green().bold(),
                    path.display().to_string().bright_white()
                );
            }
        }
        None => println!("{}", content),
    }
    Ok(())
}

fn print_summary(report: &InventoryReport) {
    eprintln!(
        "{} {} resources, {} nodes, {} edges",
        "→".blue(),
        report.discovery_summary.resource_count().to_string().cyan(),
        report.graph_structure.node_count().to_string().cyan(),
        report.graph_structure.edge_count().to_string().cyan()
    );
}

pub async fn handle_discover(args: &ArgMatches, quiet: bool) -> Result<()> {
    let options = output_options(args)?;
    let progress = DiscoveryProgress::new(!quiet);
    let source = aws_source_from_args(args, &progress);

    let dataset = execute_discovery(&source, &progress).await?;

    if let Some(snapshot) = args.get_one::<String>("snapshot") {
        let path = expand_path(snapshot);
        let content =
            serde_json::to_string_pretty(&dataset).context("Failed to serialize dataset")?;
        save_report(&content, &path)
            .with_context(|| format!("Failed to write snapshot to {}", path.display()))?;
        if !quiet {
            eprintln!(
                "{} Snapshot saved: {}",
                "✓".green().bold(),
                path.display().to_string().bright_white()
            );
        }
    }

    let report = build_report(dataset)?;
    if !quiet {
        print_summary(&report);
    }
    emit_report(&report, &options, quiet)
}

pub async fn handle_analyze(args: &ArgMatches, quiet: bool) -> Result<()> {
    let options = output_options(args)?;
    let snapshot = args
        .get_one::<String>("SNAPSHOT")
        .ok_or_else(|| anyhow!("A snapshot path is required"))?;
    let source = SnapshotSource::new(expand_path(snapshot));

    let report = run_inventory(&source, &DiscoveryProgress::hidden()).await?;
    if !quiet {
        print_summary(&report);
    }
    emit_report(&report, &options, quiet)
}
