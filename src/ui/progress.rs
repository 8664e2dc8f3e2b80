use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use super::Style;
use crate::output;
use crate::status;
use crate::sync::{LanguageReport, SyncProgress};
use crate::translation::Lang;

const TEMPLATE: &str = "{spinner} {msg:24} [{bar:30}] {pos}/{len}";

/// Terminal progress bar for a synchronization run, one pass per language.
///
/// Hidden in quiet mode. Clears itself when dropped.
pub struct SyncProgressBar {
    bar: ProgressBar,
}

impl SyncProgressBar {
    pub fn new() -> Self {
        let bar = if output::is_quiet() {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(0)
        };
        bar.set_style(
            ProgressStyle::with_template(TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        Self { bar }
    }
}

impl Default for SyncProgressBar {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncProgress for SyncProgressBar {
    fn language_started(&self, lang: &Lang, nodes: usize) {
        self.bar.reset();
        self.bar.set_length(nodes as u64);
        self.bar.set_message(lang.display_name.clone());
        self.bar.enable_steady_tick(Duration::from_millis(80));
    }

    fn node_finished(&self, _name: &str) {
        self.bar.inc(1);
    }

    fn language_finished(&self, report: &LanguageReport) {
        self.bar.suspend(|| {
            status!(
                "{} {} {}",
                Style::success("✓"),
                Style::code(&report.lang.code),
                Style::secondary(format!(
                    "{} translated, {} reused, {} skipped -> {}",
                    report.translated,
                    report.reused,
                    report.skipped,
                    report.path.display()
                ))
            );
        });
    }
}

impl Drop for SyncProgressBar {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}
