// file: src/session/progress.rs
// description: progress tracking and statistics for bulk page fetches
// reference: uses indicatif for progress bars and tracks fetch metrics

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Default, Serialize)]
pub struct FetchStats {
    pub pages_fetched: usize,
    pub pages_failed: usize,
    pub total_bytes: u64,
    pub duration_ms: u64,
}

impl FetchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages_per_second(&self) -> f64 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        self.pages_fetched as f64 * 1000.0 / self.duration_ms as f64
    }

    pub fn success_rate(&self) -> f64 {
        let total = self.pages_fetched + self.pages_failed;
        if total == 0 {
            return 0.0;
        }
        (self.pages_fetched as f64 / total as f64) * 100.0
    }

    pub fn summary(&self) -> String {
        format!(
            "{} fetched, {} failed ({:.1}% success, {} KiB)",
            self.pages_fetched.to_string().green(),
            self.pages_failed.to_string().red(),
            self.success_rate(),
            self.total_bytes / 1024
        )
    }
}

pub struct ProgressTracker {
    main_bar: ProgressBar,
    detail_bar: ProgressBar,
    pages_fetched: AtomicUsize,
    pages_failed: AtomicUsize,
    bytes: AtomicU64,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn new(total_pages: usize) -> Self {
        Self::with_target(total_pages, ProgressDrawTarget::stderr(), true)
    }

    pub fn hidden(total_pages: usize) -> Self {
        Self::with_target(total_pages, ProgressDrawTarget::hidden(), false)
    }

    pub fn with_target(total_pages: usize, target: ProgressDrawTarget, colored: bool) -> Self {
        let multi_progress = MultiProgress::with_draw_target(target);

        Self {
            main_bar: create_progress_bar(&multi_progress, total_pages as u64, colored),
            detail_bar: create_detail_bar(&multi_progress),
            pages_fetched: AtomicUsize::new(0),
            pages_failed: AtomicUsize::new(0),
            bytes: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn set_length(&self, total_pages: usize) {
        self.main_bar.set_length(total_pages as u64);
    }

    pub fn length(&self) -> Option<u64> {
        self.main_bar.length()
    }

    pub fn position(&self) -> u64 {
        self.main_bar.position()
    }

    pub fn page_fetched(&self, bytes: u64) {
        self.pages_fetched.fetch_add(1, Ordering::SeqCst);
        self.bytes.fetch_add(bytes, Ordering::SeqCst);
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn page_failed(&self) {
        self.pages_failed.fetch_add(1, Ordering::SeqCst);
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    /// Shows what is being fetched next to the running counts.
    pub fn set_message(&self, message: String) {
        let fetched = self.pages_fetched.load(Ordering::SeqCst);
        let failed = self.pages_failed.load(Ordering::SeqCst);
        self.detail_bar
            .set_message(format!("{} | Pages: {} | Failed: {}", message, fetched, failed));
    }

    pub fn finish(&self) {
        self.main_bar.finish_with_message("Fetch complete");
        self.detail_bar.finish_and_clear();
    }

    pub fn stats(&self) -> FetchStats {
        FetchStats {
            pages_fetched: self.pages_fetched.load(Ordering::SeqCst),
            pages_failed: self.pages_failed.load(Ordering::SeqCst),
            total_bytes: self.bytes.load(Ordering::SeqCst),
            duration_ms: self.start_time.elapsed().as_millis() as u64,
        }
    }

    fn update_detail_bar(&self) {
        let fetched = self.pages_fetched.load(Ordering::SeqCst);
        let failed = self.pages_failed.load(Ordering::SeqCst);
        self.detail_bar
            .set_message(format!("Pages: {} | Failed: {}", fetched, failed));
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

fn create_progress_bar(multi_progress: &MultiProgress, total: u64, colored: bool) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(total));
    let (template, chars) = if colored {
        (
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
            "█▓▒░",
        )
    } else {
        (
            "{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({eta}) {msg}",
            "=>-",
        )
    };

    let style = ProgressStyle::default_bar()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars(chars);
    bar.set_style(style);
    bar
}

fn create_detail_bar(multi_progress: &MultiProgress) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(0));
    let style = ProgressStyle::default_bar()
        .template("{msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_stats_calculations() {
        let stats = FetchStats {
            pages_fetched: 90,
            pages_failed: 10,
            total_bytes: 4096,
            duration_ms: 10_000,
        };

        assert_eq!(stats.pages_per_second(), 9.0);
        assert_eq!(stats.success_rate(), 90.0);
    }

    #[test]
    fn test_fetch_stats_zero() {
        let stats = FetchStats::new();
        assert_eq!(stats.pages_per_second(), 0.0);
        assert_eq!(stats.success_rate(), 0.0);
    }

    #[test]
    fn test_tracker_counts() {
        let tracker = ProgressTracker::hidden(3);

        tracker.page_fetched(100);
        tracker.page_fetched(50);
        tracker.page_failed();

        let stats = tracker.stats();
        assert_eq!(stats.pages_fetched, 2);
        assert_eq!(stats.pages_failed, 1);
        assert_eq!(stats.total_bytes, 150);
        assert_eq!(tracker.position(), 3);
    }

    #[test]
    fn test_tracker_resized_after_listing() {
        let tracker = ProgressTracker::hidden(0);
        tracker.set_length(5);
        tracker.set_message("Fetching users".to_string());
        tracker.page_fetched(10);

        assert_eq!(tracker.length(), Some(5));
        assert_eq!(tracker.position(), 1);
    }
}
