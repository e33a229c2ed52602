use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::{OwoColorize, Stream::Stderr};

use crate::aggregator::Tally;

/// Progress and diagnostics on stderr. Stdout is left for the final result line.
pub struct Reporter {
    bar: ProgressBar,
    quiet: bool,
}

impl Reporter {
    pub fn new(quiet: bool) -> Self {
        if quiet {
            return Reporter::hidden();
        }
        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        bar.set_style(
            ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        Reporter { bar, quiet }
    }

    /// Reporter that prints nothing.
    pub fn hidden() -> Self {
        Reporter {
            bar: ProgressBar::hidden(),
            quiet: true,
        }
    }

    pub fn start(&self, groups: usize) {
        self.bar.set_length(groups as u64);
    }

    pub fn advance(&self, title: &str) {
        self.bar.set_message(title.to_string());
        self.bar.inc(1);
    }

    /// Non-fatal problem with a single work.
    pub fn warn(&self, msg: &str) {
        if self.quiet {
            return;
        }
        self.bar.suspend(|| {
            eprintln!(
                "{} {msg}",
                "warning:".if_supports_color(Stderr, |t| t.yellow())
            )
        });
    }

    pub fn finish(&self, tally: &Tally) {
        self.bar.finish_and_clear();
        if self.quiet {
            return;
        }
        eprint!(
            "{} {}  {} {}",
            "✓".if_supports_color(Stderr, |t| t.green()),
            tally.expanded,
            "✗".if_supports_color(Stderr, |t| t.red()),
            tally.failed,
        );
        if tally.skipped > 0 {
            eprint!("  ({} without put-code)", tally.skipped);
        }
        eprintln!();
    }
}
