pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod reader;
pub mod split;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, OutputConfig, ReportingConfig, SplitConfig};
pub use error::{Off2TxtError, Result, UserFriendlyError};

// Core functionality re-exports
pub use extractor::{FileExtractor, OutputManager, OutputNaming, RunReport, RunStatus, WriteMode};
pub use reader::{DocumentKind, Extraction};
pub use split::{split_lines, split_rows, Partition, Split};
pub use ui::{GracefulShutdown, OutputFormatter, OutputMode, ProgressManager};

use std::path::{Path, PathBuf};

/// Main library interface for off2txt
pub struct Off2Txt {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
    shutdown: GracefulShutdown,
}

impl Off2Txt {
    /// Create a new instance with the provided configuration
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Result<Self> {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::for_terminal(quiet);
        let shutdown = GracefulShutdown::new()?;

        Ok(Self {
            config,
            output_formatter,
            progress_manager,
            shutdown,
        })
    }

    /// Create an instance for testing (no signal handler conflicts)
    #[cfg(test)]
    pub fn new_for_test(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        Self {
            config,
            output_formatter: OutputFormatter::new(output_mode, verbose, quiet),
            progress_manager: ProgressManager::new(false),
            shutdown: GracefulShutdown::new_for_test(),
        }
    }

    /// Create an instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Self::new(config, output_mode, cli_args.verbose, cli_args.quiet)
    }

    /// Extract every input in order and return the finalized run report.
    pub fn run(&self, files: &[PathBuf]) -> RunReport {
        let mut report = RunReport::new(files.len());
        let mut extractor = FileExtractor::new(&self.config);

        if let Err(e) = extractor.prepare() {
            self.report_error(&mut report, &e);
        }

        self.output_formatter
            .start_operation(&format!("Extracting text from {} file(s)", files.len()));
        let file_progress = self.progress_manager.create_file_progress(files.len() as u64);

        for path in files {
            if let Err(e) = self.shutdown.check_shutdown() {
                report.mark_interrupted();
                self.progress_manager
                    .suspend(|| self.output_formatter.error(&e.user_message()));
                break;
            }

            report.start_file(path);
            ui::progress::update_file_progress(&file_progress, &report);
            self.extract_one(&mut extractor, path, &mut report);
            file_progress.inc(1);
        }

        let status = report.finalize();
        ui::progress::finish_progress_with_summary(
            &file_progress,
            &format!("Processed {} files", report.files_processed),
            report.elapsed(),
        );
        self.progress_manager.clear();
        log::debug!("run finished: {:?}, {} outputs", status, report.outputs.len());

        report
    }

    fn extract_one(&self, extractor: &mut FileExtractor, path: &Path, report: &mut RunReport) {
        match extractor.extract_file(path) {
            Ok(outcome) => {
                for failure in &outcome.failures {
                    self.report_error(report, failure);
                }
                if !outcome.extracted {
                    self.output_formatter
                        .debug(&format!("{}: no text found", path.display()));
                }
                for output in &outcome.written {
                    self.progress_manager.suspend(|| {
                        self.output_formatter
                            .debug(&format!("{} -> {}", path.display(), output.display()))
                    });
                }
                report.record_outcome(&outcome);
            }
            Err(e) if e.is_file_access() => {
                report.record_skip();
                log::debug!("skipping {}: {}", path.display(), e);
                if !self.config.reporting.suppress_file_access_errors {
                    self.progress_manager
                        .suspend(|| self.output_formatter.file_error(&e));
                }
            }
            Err(e) => {
                report.record_skip();
                self.report_error(report, &e);
            }
        }
    }

    /// Print `error` and flag the run.
    fn report_error(&self, report: &mut RunReport, error: &Off2TxtError) {
        log::error!("{}", error);
        report.record_error(error);
        self.progress_manager
            .suspend(|| self.output_formatter.file_error(error));
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::ooxml::test_support::build_archive;
    use std::fs;
    use tempfile::TempDir;

    fn write_xlsx(path: &Path) {
        let workbook = r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="S" sheetId="1" r:id="rId1"/></sheets></workbook>"#;
        let rels = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;
        let sheet = r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row r="1"><c r="A1" t="inlineStr"><is><t>plain</t></is></c><c r="B1" t="inlineStr"><is><t>café</t></is></c></row></sheetData></worksheet>"#;
        let archive = build_archive(&[
            ("xl/workbook.xml", workbook),
            ("xl/_rels/workbook.xml.rels", rels),
            ("xl/worksheets/sheet1.xml", sheet),
        ]);
        fs::write(path, archive.into_inner()).unwrap();
    }

    fn quiet_app(config: Config) -> Off2Txt {
        Off2Txt::new_for_test(config, OutputMode::Plain, 0, true)
    }

    #[test]
    fn test_spreadsheet_split_run() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("book.xlsx");
        write_xlsx(&input);

        let mut config = Config::default();
        config.split.enabled = true;
        config.output.directory = Some(temp_dir.path().join("out"));

        let report = quiet_app(config).run(&[input]);
        assert_eq!(report.status, RunStatus::Extracted);

        let out = temp_dir.path().join("out");
        assert_eq!(
            fs::read_to_string(out.join("book-ascii.csv")).unwrap(),
            "plain, \n"
        );
        assert_eq!(
            fs::read_to_string(out.join("book-unicode.csv")).unwrap(),
            ", café\n"
        );
    }

    #[test]
    fn test_access_errors_do_not_flag_run() {
        let report = quiet_app(Config::default()).run(&[PathBuf::from("/nonexistent/a.docx")]);
        assert_eq!(report.files_skipped, 1);
        assert!(report.errors.is_empty());
        assert_eq!(report.status, RunStatus::NoExtract);
    }

    #[test]
    fn test_error_outranks_extraction() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("book.xlsx");
        write_xlsx(&input);
        let unknown = temp_dir.path().join("notes.odt");
        fs::write(&unknown, "x").unwrap();

        let report = quiet_app(Config::default()).run(&[input, unknown]);
        assert!(report.did_extract);
        assert_eq!(report.status, RunStatus::Error);
        assert_eq!(report.exit_code(), 2);
    }

    #[test]
    fn test_interrupted_run_stops() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("book.xlsx");
        write_xlsx(&input);

        let app = quiet_app(Config::default());
        app.shutdown.request_shutdown();
        let report = app.run(&[input.clone()]);

        assert!(report.interrupted);
        assert_eq!(report.files_processed, 0);
        assert_eq!(report.status, RunStatus::Error);
        assert!(!temp_dir.path().join("book.csv").exists());
    }

    #[test]
    fn test_sample_config_generation() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("sample.toml");

        Off2Txt::generate_sample_config(&config_path).unwrap();

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[output]"));
        assert!(content.contains("[split]"));
    }

    #[test]
    fn test_write_failure_does_not_stop_run() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("first.xlsx");
        let second = temp_dir.path().join("second.xlsx");
        write_xlsx(&first);
        write_xlsx(&second);
        // a directory squatting on the output path makes the write fail
        fs::create_dir(temp_dir.path().join("first.csv")).unwrap();

        let report = quiet_app(Config::default()).run(&[first, second]);

        assert_eq!(report.files_processed, 2);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("Exception writing output file"));
        assert_eq!(report.status, RunStatus::Error);
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("second.csv")).unwrap(),
            "plain, café\n"
        );
    }
}
