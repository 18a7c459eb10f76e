mod cli;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use env_logger::Env;
use std::process::ExitCode;

use cli::Cli;
use release_tracker::model::{DependencyLayout, ReleaseSnapshot};
use release_tracker::repository::Destination;
use release_tracker::tracker::ReleaseTracker;
use release_tracker::util::{format_share, format_size};

/// Packages listed in the summary
const SUMMARY_PACKAGES: usize = 10;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => err.exit(),
        Err(err) => {
            let _ = err.print();
            return ExitCode::FAILURE;
        }
    };

    let default_filter = if cli.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Unable to track release: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut tracker = if cli.quiet {
        ReleaseTracker::quiet()
    } else {
        ReleaseTracker::new()
    };
    if let Some(prefix) = &cli.dependency_prefix {
        tracker = tracker.with_layout(DependencyLayout::new(prefix.as_str()));
    }

    let snapshot = if cli.dry_run {
        tracker
            .measure(&cli.root)
            .await
            .with_context(|| format!("Could not measure {}", cli.root.display()))?
    } else {
        let store = Destination::connect(&cli.database_url)
            .await
            .with_context(|| format!("Could not open {}", cli.database_url))?;
        let (snapshot, _) = tracker.track(&cli.root, &cli.branch, &store).await?;
        snapshot
    };

    log_summary(&snapshot);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }

    Ok(())
}

fn log_summary(snapshot: &ReleaseSnapshot) {
    log::info!(
        "Total: {}, project: {} ({} files, {}), dependencies: {} ({} packages, {})",
        format_size(snapshot.total_size),
        format_size(snapshot.total_project_size),
        snapshot.project_file_count(),
        format_share(snapshot.total_project_size, snapshot.total_size),
        format_size(snapshot.total_node_module_size),
        snapshot.package_count(),
        format_share(snapshot.total_node_module_size, snapshot.total_size),
    );

    for group in snapshot.largest_packages(SUMMARY_PACKAGES) {
        log::info!(
            "  {:<40} {:>10}  {}",
            group.module_name,
            format_size(group.size),
            format_share(group.size, snapshot.total_size)
        );
    }
}
