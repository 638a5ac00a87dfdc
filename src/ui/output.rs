use crate::error::{Off2TxtError, UserFriendlyError};
use crate::extractor::{RunReport, RunStatus};
use console::{style, Emoji, Term};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

// Emojis with text fallbacks
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static PAGE: Emoji = Emoji("📄 ", "> ");

pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            OutputMode::Human => Term::stdout().features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    /// Errors are shown even in quiet mode and always go to stderr.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Json => self.print_json_message("info", message),
                OutputMode::Plain => println!("INFO: {}", message),
            }
        }
    }

    pub fn debug(&self, message: &str) {
        if self.should_show_message(2) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("  {}", style(message).dim());
                    } else {
                        println!("  DEBUG: {}", message);
                    }
                }
                OutputMode::Json => self.print_json_message("debug", message),
                OutputMode::Plain => println!("DEBUG: {}", message),
            }
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("{}{}", PAGE, style(operation).bold());
                    } else {
                        println!("> {}", operation);
                    }
                }
                OutputMode::Json => self.print_json_message("operation_start", operation),
                OutputMode::Plain => println!("STARTING: {}", operation),
            }
        }
    }

    /// Report a per-file problem. The suggestion is only shown when verbose.
    pub fn file_error(&self, error: &Off2TxtError) {
        self.error(&error.user_message());
        if let Some(suggestion) = error.suggestion() {
            self.info(&format!("Suggestion: {}", suggestion));
        }
    }

    pub fn print_user_friendly_error(&self, error: &Off2TxtError) {
        self.error(&error.user_message());

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        eprintln!(
                            "{}{}",
                            INFO,
                            style(&format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    self.print_json_object(&serde_json::json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                OutputMode::Plain => eprintln!("SUGGESTION: {}", suggestion),
            }
        }
    }

    /// Print the end-of-run summary. JSON mode always emits the full report.
    pub fn print_run_report(&self, report: &RunReport) {
        match self.mode {
            OutputMode::Json => {
                let json_output =
                    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string());
                println!("{}", json_output);
            }
            _ if self.quiet => {}
            OutputMode::Human => self.print_human_summary(report),
            OutputMode::Plain => self.print_plain_summary(report),
        }
    }

    pub fn print_separator(&self) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}", style("─".repeat(60)).dim());
                } else {
                    println!("{}", "-".repeat(60));
                }
            }
            OutputMode::Plain => println!("{}", "-".repeat(60)),
            OutputMode::Json => {}
        }
    }

    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        #[allow(clippy::type_complexity)]
        let (emoji, color_fn): (Emoji, Box<dyn Fn(&str) -> console::StyledObject<&str>>) =
            match msg_type {
                MessageType::Error => (CROSS, Box::new(|msg| style(msg).red().bold())),
                MessageType::Info => (INFO, Box::new(|msg| style(msg).cyan())),
            };

        if self.use_colors {
            match msg_type {
                MessageType::Error => eprintln!("{}{}", emoji, color_fn(message)),
                _ => println!("{}{}", emoji, color_fn(message)),
            }
        } else {
            match msg_type {
                MessageType::Error => eprintln!("{}", message),
                _ => println!("{}", message),
            }
        }
    }

    fn print_json_message(&self, level: &str, message: &str) {
        let object = serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        });
        if level == "error" {
            eprintln!("{}", object);
        } else {
            self.print_json_object(&object);
        }
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn headline(status: RunStatus) -> &'static str {
        match status {
            RunStatus::Extracted => "Text extraction completed",
            RunStatus::NoExtract => "No text was extracted",
            RunStatus::Error | RunStatus::NotSet => "Extraction finished with errors",
        }
    }

    fn print_human_summary(&self, report: &RunReport) {
        self.print_separator();

        let headline = Self::headline(report.status);
        if self.use_colors {
            let styled = match report.status {
                RunStatus::Extracted => style(headline).green().bold(),
                RunStatus::NoExtract => style(headline).yellow().bold(),
                _ => style(headline).red().bold(),
            };
            println!("{}", styled);
        } else {
            println!("{}", headline);
        }

        let value = |v: String| {
            if self.use_colors {
                style(v).cyan().bold().to_string()
            } else {
                v
            }
        };

        println!("  Files processed: {}", value(report.files_processed.to_string()));
        if report.files_skipped > 0 {
            println!("  Files skipped:   {}", value(report.files_skipped.to_string()));
        }
        println!("  Outputs written: {}", value(report.outputs.len().to_string()));
        println!("  Time taken:      {}", value(format_duration(report.elapsed())));
        if !report.errors.is_empty() {
            println!("  Errors:          {}", report.errors.len());
        }

        if self.verbose_level > 0 {
            for output in &report.outputs {
                println!("    {}", output.display());
            }
        }

        self.print_separator();
    }

    fn print_plain_summary(&self, report: &RunReport) {
        println!("COMPLETED: {}", Self::headline(report.status));
        println!("Files processed: {}", report.files_processed);
        println!("Files skipped: {}", report.files_skipped);
        println!("Outputs written: {}", report.outputs.len());
        println!("Duration: {}", format_duration(report.elapsed()));
        if !report.errors.is_empty() {
            println!("Errors: {}", report.errors.len());
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Error,
    Info,
}

pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}s", secs)
    } else {
        format!("{}ms", duration.as_millis())
    }
}
