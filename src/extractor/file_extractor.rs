use crate::config::Config;
use crate::error::{Off2TxtError, Result};
use crate::extractor::output_manager::{OutputManager, OutputNaming, TextRecord};
use crate::reader::{self, DocumentKind, Extraction};
use crate::split::{self, Partition, Split};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Final disposition of a run, mapped directly to the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunStatus {
    NotSet,
    Extracted,
    NoExtract,
    Error,
}

impl RunStatus {
    pub fn exit_code(&self) -> i32 {
        match self {
            RunStatus::NotSet => -1,
            RunStatus::Extracted => 0,
            RunStatus::NoExtract => 1,
            RunStatus::Error => 2,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub files_total: usize,
    pub files_processed: usize,
    pub files_skipped: usize,
    pub outputs: Vec<PathBuf>,
    pub errors: Vec<String>,
    pub did_extract: bool,
    pub interrupted: bool,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u128,
    #[serde(skip)]
    pub current_file: Option<String>,
    #[serde(skip)]
    start_time: Instant,
}

impl RunReport {
    pub fn new(files_total: usize) -> Self {
        Self {
            files_total,
            files_processed: 0,
            files_skipped: 0,
            outputs: Vec::new(),
            errors: Vec::new(),
            did_extract: false,
            interrupted: false,
            status: RunStatus::NotSet,
            started_at: Utc::now(),
            duration_ms: 0,
            current_file: None,
            start_time: Instant::now(),
        }
    }

    pub fn start_file(&mut self, path: &Path) {
        self.current_file = Some(path.display().to_string());
    }

    pub fn record_outcome(&mut self, outcome: &FileOutcome) {
        self.files_processed += 1;
        self.did_extract |= outcome.extracted;
        for output in &outcome.written {
            if !self.outputs.contains(output) {
                self.outputs.push(output.clone());
            }
        }
    }

    pub fn record_skip(&mut self) {
        self.files_skipped += 1;
    }

    /// Record an error that flags the run.
    pub fn record_error(&mut self, error: &Off2TxtError) {
        self.errors.push(error.to_string());
        self.status = RunStatus::Error;
    }

    pub fn mark_interrupted(&mut self) {
        self.interrupted = true;
        self.record_error(&Off2TxtError::Cancelled);
    }

    /// Resolve the final status: error, then nothing extracted, then extracted.
    pub fn finalize(&mut self) -> RunStatus {
        if self.status == RunStatus::NotSet {
            self.status = if self.did_extract {
                RunStatus::Extracted
            } else {
                RunStatus::NoExtract
            };
        }
        self.current_file = None;
        self.duration_ms = self.elapsed().as_millis();
        self.status
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn exit_code(&self) -> i32 {
        self.status.exit_code()
    }
}

/// What happened to a single input file.
#[derive(Debug)]
pub struct FileOutcome {
    pub kind: DocumentKind,
    /// Set when a non-empty record sequence was handed to the writer.
    pub extracted: bool,
    pub written: Vec<PathBuf>,
    /// Write failures; the remaining streams were still attempted.
    pub failures: Vec<Off2TxtError>,
}

impl FileOutcome {
    fn new(kind: DocumentKind) -> Self {
        Self {
            kind,
            extracted: false,
            written: Vec::new(),
            failures: Vec::new(),
        }
    }
}

/// Check that `path` exists, is not a dangling symlink, and can be opened.
pub fn check_file_access(path: &Path) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|_| Off2TxtError::FileNotFound {
        path: path.to_path_buf(),
    })?;

    let metadata = if metadata.file_type().is_symlink() {
        fs::metadata(path).map_err(|_| Off2TxtError::BrokenSymlink {
            path: path.to_path_buf(),
        })?
    } else {
        metadata
    };

    if metadata.is_dir() {
        fs::read_dir(path)
            .map(|_| ())
            .map_err(|e| Off2TxtError::DirectoryUnreadable {
                path: path.to_path_buf(),
                source: e,
            })
    } else {
        fs::File::open(path)
            .map(|_| ())
            .map_err(|e| Off2TxtError::FileUnreadable {
                path: path.to_path_buf(),
                source: e,
            })
    }
}

pub struct FileExtractor {
    naming: OutputNaming,
    output: OutputManager,
    split: bool,
}

impl FileExtractor {
    pub fn new(config: &Config) -> Self {
        Self {
            naming: OutputNaming::from_config(config),
            output: OutputManager::new(config.write_mode()),
            split: config.split.enabled,
        }
    }

    /// Create the target directory before any file is processed.
    pub fn prepare(&self) -> Result<()> {
        match self.naming.target_directory() {
            Some(directory) => OutputManager::ensure_directory(directory),
            None => Ok(()),
        }
    }

    /// Extract `path` and write its text. Errors that prevent extraction are
    /// returned; write failures are collected in the outcome.
    pub fn extract_file(&mut self, path: &Path) -> Result<FileOutcome> {
        check_file_access(path)?;
        let kind = DocumentKind::from_path(path)?;
        let extraction = reader::extract(path, kind)?;

        let mut outcome = FileOutcome::new(kind);
        match extraction {
            Extraction::Lines(lines) if self.split => {
                let streams = split::split_lines(&lines);
                self.write_split(path, &streams, &mut outcome);
            }
            Extraction::Lines(lines) => self.write_stream(path, None, &lines, &mut outcome),
            Extraction::Rows(rows) if self.split => {
                let streams = split::split_rows(&rows);
                self.write_split(path, &streams, &mut outcome);
            }
            Extraction::Rows(rows) => self.write_stream(path, None, &rows, &mut outcome),
        }

        Ok(outcome)
    }

    fn write_split<T: TextRecord>(
        &mut self,
        input: &Path,
        streams: &Split<T>,
        outcome: &mut FileOutcome,
    ) {
        for partition in Partition::ALL {
            self.write_stream(input, Some(partition), streams.partition(partition), outcome);
        }
    }

    fn write_stream<T: TextRecord>(
        &mut self,
        input: &Path,
        partition: Option<Partition>,
        records: &[T],
        outcome: &mut FileOutcome,
    ) {
        if records.is_empty() {
            return;
        }
        outcome.extracted = true;

        let destination = self.naming.output_path(input, outcome.kind, partition);
        match self.output.write(&destination, records) {
            Ok(true) => outcome.written.push(destination),
            Ok(false) => {}
            Err(e) => {
                log::error!("{}", e);
                outcome.failures.push(e);
            }
        }
    }
}
