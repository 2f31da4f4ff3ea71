// file: src/pipeline/progress.rs
// description: progress tracking for concurrent batch execution
// reference: uses indicatif for progress bars

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Tracks per-item completion across the fan-out. Counters are atomic; the
/// item tasks increment them from wherever the runtime schedules them.
pub struct BatchProgress {
    bar: ProgressBar,
    succeeded: AtomicUsize,
    failed: AtomicUsize,
}

impl BatchProgress {
    pub fn new(total_items: usize) -> Self {
        Self::with_color(total_items, true)
    }

    pub fn with_color(total_items: usize, colored: bool) -> Self {
        let bar = ProgressBar::new(total_items as u64);
        let template = if colored {
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}"
        } else {
            "{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({eta}) {msg}"
        };
        bar.set_style(
            ProgressStyle::default_bar()
                .template(template)
                .expect("Failed to create progress bar template")
                .progress_chars("█▓▒░"),
        );

        Self {
            bar,
            succeeded: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
        }
    }

    pub fn item_succeeded(&self) {
        self.succeeded.fetch_add(1, Ordering::SeqCst);
        self.bar.inc(1);
        self.update_message();
    }

    pub fn item_failed(&self) {
        self.failed.fetch_add(1, Ordering::SeqCst);
        self.bar.inc(1);
        self.update_message();
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded.load(Ordering::SeqCst)
    }

    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("Batch complete");
    }

    fn update_message(&self) {
        let message = format!(
            "Success: {} | Errors: {}",
            self.succeeded(),
            self.failed()
        );
        self.bar.set_message(message);
    }
}
