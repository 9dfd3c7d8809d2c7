// src/progress.rs
/// Lightweight progress reporting used by long-running operations (crawl/download).
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the total number of items (if known).
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called when one logical unit completes (e.g., a species page was scraped).
    fn item_done(&mut self, _item: &str) {}

    /// Called when one logical unit was skipped because it failed.
    fn item_failed(&mut self, _item: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// Progress sink for the CLI: every event becomes a log line.
/// Per-item successes are only logged every `every` items to keep the output readable.
pub struct LogProgress {
    done: usize,
    failed: usize,
    total: usize,
    every: usize,
}

impl LogProgress {
    pub fn new(every: usize) -> Self {
        Self { done: 0, failed: 0, total: 0, every: every.max(1) }
    }
}

impl Default for LogProgress {
    fn default() -> Self { Self::new(500) }
}

impl Progress for LogProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        logf!("Starting {total} items");
    }
    fn log(&mut self, msg: &str) {
        logf!("{msg}");
    }
    fn item_done(&mut self, item: &str) {
        self.done += 1;
        if self.done % self.every == 0 || self.done == self.total {
            logf!("Processed {}/{} (last: {item})", self.done, self.total);
        }
    }
    fn item_failed(&mut self, item: &str) {
        self.failed += 1;
        logw!("Skipped {item}");
    }
    fn finish(&mut self) {
        if self.total == 0 {
            logf!("Done");
        } else {
            logf!("Done ({} ok, {} failed, {} total)", self.done, self.failed, self.total);
        }
    }
}
