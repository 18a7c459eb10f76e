use clap::Parser;
use std::path::PathBuf;

use release_tracker::repository::DEFAULT_DATABASE_URL;
use release_tracker::tracker::DEFAULT_BRANCH;

#[derive(Parser, Debug)]
#[command(name = "release-tracker", about = "Record the size of a release, split by dependency package")]
pub struct Cli {
    /// Release directory to measure
    pub root: PathBuf,

    /// Branch the snapshot is filed under
    #[arg(long, default_value = DEFAULT_BRANCH)]
    pub branch: String,

    /// Database to append to; `sqlite:<path>` writes a local log instead
    #[arg(long, default_value = DEFAULT_DATABASE_URL)]
    pub database_url: String,

    /// Path prefix marking dependency files [default: <ROOT>/node_modules/]
    #[arg(long)]
    pub dependency_prefix: Option<String>,

    /// Measure only, do not publish
    #[arg(long)]
    pub dry_run: bool,

    /// Print the snapshot as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Hide progress bars and the summary
    #[arg(short, long)]
    pub quiet: bool,
}
