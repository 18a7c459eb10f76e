//! Progress reporting abstraction
//!
//! Keeps the walk and stat phases free of terminal concerns (indicatif).

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// A handle to an active progress indicator
pub trait ProgressHandle: Send + Sync {
    fn inc(&self, n: u64);
    fn finish(&self);
}

/// Factory for creating progress handles
pub trait ProgressReporter: Send + Sync {
    /// Bar for a phase with a known number of steps
    fn start(&self, label: &str, total: u64) -> Box<dyn ProgressHandle>;

    /// Spinner for a phase whose size is not known up front (directory walk)
    fn spinner(&self, label: &str) -> Box<dyn ProgressHandle>;
}

/// Indicatif-based progress reporter for CLI usage
pub struct IndicatifProgress;

impl ProgressReporter for IndicatifProgress {
    fn start(&self, label: &str, total: u64) -> Box<dyn ProgressHandle> {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(&format!(
                    "{{spinner:.green}} {}: [{{bar:50.cyan/blue}}] {{pos}}/{{len}} files ({{per_sec}})",
                    label
                ))
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        Box::new(IndicatifHandle(pb))
    }

    fn spinner(&self, label: &str) -> Box<dyn ProgressHandle> {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template(&format!("{{spinner:.green}} {}: {{pos}} entries", label))
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        Box::new(IndicatifHandle(pb))
    }
}

struct IndicatifHandle(ProgressBar);

impl ProgressHandle for IndicatifHandle {
    fn inc(&self, n: u64) {
        self.0.inc(n);
    }

    fn finish(&self) {
        self.0.finish_and_clear();
    }
}

/// No-op progress reporter for benchmarks and quiet mode
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn start(&self, _label: &str, _total: u64) -> Box<dyn ProgressHandle> {
        Box::new(NoopHandle)
    }

    fn spinner(&self, _label: &str) -> Box<dyn ProgressHandle> {
        Box::new(NoopHandle)
    }
}

struct NoopHandle;

impl ProgressHandle for NoopHandle {
    fn inc(&self, _n: u64) {}
    fn finish(&self) {}
}

/// Picks indicatif or no-op output from a verbosity flag
pub fn reporter(verbose: bool) -> Box<dyn ProgressReporter> {
    if verbose {
        Box::new(IndicatifProgress)
    } else {
        Box::new(NoopProgress)
    }
}
