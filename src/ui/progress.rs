use crate::extractor::RunReport;
use crate::ui::output::format_duration;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

pub struct ProgressManager {
    multi_progress: MultiProgress,
    enabled: bool,
}

impl ProgressManager {
    pub fn new(enabled: bool) -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            enabled,
        }
    }

    /// Progress is drawn on stderr, so only bother when it is a terminal.
    pub fn for_terminal(quiet: bool) -> Self {
        Self::new(!quiet && console::Term::stderr().is_term())
    }

    pub fn create_file_progress(&self, total_files: u64) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let pb = self.multi_progress.add(ProgressBar::new(total_files));
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>5}/{len:5} files {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );
        pb.set_message("Extracting...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    pub fn suspend<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if self.enabled {
            self.multi_progress.suspend(f)
        } else {
            f()
        }
    }

    pub fn clear(&self) {
        if self.enabled {
            self.multi_progress.clear().ok();
        }
    }
}

pub fn update_file_progress(pb: &ProgressBar, report: &RunReport) {
    pb.set_position((report.files_processed + report.files_skipped) as u64);

    match report.current_file {
        Some(ref current_file) => pb.set_message(current_file.clone()),
        None => pb.set_message("Extracting..."),
    }
}

pub fn finish_progress_with_summary(pb: &ProgressBar, message: &str, duration: Duration) {
    let final_message = format!("{} (completed in {})", message, format_duration(duration));
    pb.finish_with_message(final_message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_progress_manager_creation() {
        assert!(ProgressManager::new(true).enabled);
        assert!(!ProgressManager::new(false).enabled);
        assert!(!ProgressManager::for_terminal(true).enabled);
    }

    #[test]
    fn test_disabled_progress_bars() {
        let manager = ProgressManager::new(false);
        let file_pb = manager.create_file_progress(100);
        assert!(file_pb.is_hidden());
        assert_eq!(manager.suspend(|| 7), 7);
    }

    #[test]
    fn test_update_file_progress() {
        let pb = ProgressBar::hidden();
        pb.set_length(3);

        let mut report = RunReport::new(3);
        report.files_skipped = 1;
        report.start_file(Path::new("deck.pptx"));
        update_file_progress(&pb, &report);

        assert_eq!(pb.position(), 1);
        assert_eq!(pb.message(), "deck.pptx");
    }
}
