use crate::config::Config;
use crate::error::{Off2TxtError, Result};
use crate::reader::DocumentKind;
use crate::split::Partition;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    Append,
    Overwrite,
}

/// One unit of output. Lines are written as paragraphs separated by a blank
/// line, rows as `", "`-delimited records.
pub trait TextRecord {
    fn write_record<W: Write>(&self, out: &mut W) -> io::Result<()>;
}

impl TextRecord for String {
    fn write_record<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(self.as_bytes())?;
        out.write_all(b"\n\n")
    }
}

impl TextRecord for Vec<String> {
    fn write_record<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(self.join(", ").as_bytes())?;
        out.write_all(b"\n")
    }
}

/// Derives output file names from input paths.
#[derive(Debug, Clone)]
pub struct OutputNaming {
    output: Option<PathBuf>,
    directory: Option<PathBuf>,
    extension: Option<String>,
    ascii_suffix: String,
    unicode_suffix: String,
}

impl OutputNaming {
    pub fn new<S: Into<String>>(ascii_suffix: S, unicode_suffix: S) -> Self {
        Self {
            output: None,
            directory: None,
            extension: None,
            ascii_suffix: ascii_suffix.into(),
            unicode_suffix: unicode_suffix.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.split.ascii_suffix.clone(),
            config.split.unicode_suffix.clone(),
        )
        .with_output(config.output.file.clone())
        .with_directory(config.output.directory.clone())
        .with_extension(config.output.extension.clone())
    }

    pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
        self.output = output;
        self
    }

    pub fn with_directory(mut self, directory: Option<PathBuf>) -> Self {
        self.directory = directory;
        self
    }

    pub fn with_extension(mut self, extension: Option<String>) -> Self {
        self.extension = extension;
        self
    }

    /// The directory outputs go to, if one applies. An explicit output file
    /// takes precedence over the directory.
    pub fn target_directory(&self) -> Option<&Path> {
        if self.output.is_some() {
            return None;
        }
        self.directory.as_deref()
    }

    fn suffix(&self, partition: Partition) -> &str {
        match partition {
            Partition::Ascii => &self.ascii_suffix,
            Partition::Unicode => &self.unicode_suffix,
        }
    }

    pub fn output_path(
        &self,
        input: &Path,
        kind: DocumentKind,
        partition: Option<Partition>,
    ) -> PathBuf {
        if let Some(ref output) = self.output {
            return match partition {
                Some(partition) => insert_suffix(output, self.suffix(partition)),
                None => output.clone(),
            };
        }

        let mut base = input.with_extension("");
        if let Some(directory) = self.target_directory() {
            base = directory.join(base.file_name().unwrap_or_default());
        }

        let mut name: OsString = base.into_os_string();
        if let Some(partition) = partition {
            name.push("-");
            name.push(self.suffix(partition));
        }

        let extension = self
            .extension
            .as_deref()
            .unwrap_or_else(|| kind.default_output_extension());
        name.push(".");
        name.push(extension);

        PathBuf::from(name)
    }
}

/// `out.txt` + `ascii` -> `out-ascii.txt`
fn insert_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.file_stem().unwrap_or_default());
    name.push("-");
    name.push(suffix);
    if let Some(extension) = path.extension() {
        name.push(".");
        name.push(extension);
    }
    path.with_file_name(name)
}

/// Writes record sequences to disk, remembering which destinations this run
/// has already touched so overwrite mode truncates each file only once.
pub struct OutputManager {
    mode: WriteMode,
    written: HashSet<PathBuf>,
}

impl OutputManager {
    pub fn new(mode: WriteMode) -> Self {
        Self {
            mode,
            written: HashSet::new(),
        }
    }

    /// Create `directory` and any missing parents.
    pub fn ensure_directory(directory: &Path) -> Result<()> {
        if directory.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(directory).map_err(|e| Off2TxtError::CreateDirectory {
            path: directory.to_path_buf(),
            source: e,
        })
    }

    /// Write `records` to `path`. Returns `Ok(false)` without touching the
    /// filesystem when there is nothing to write.
    pub fn write<T: TextRecord>(&mut self, path: &Path, records: &[T]) -> Result<bool> {
        if records.is_empty() {
            return Ok(false);
        }

        let truncate = self.mode == WriteMode::Overwrite && !self.written.contains(path);
        let mut options = OpenOptions::new();
        options.create(true);
        if truncate {
            options.write(true).truncate(true);
        } else {
            options.append(true);
        }

        let to_write_error = |source: io::Error| Off2TxtError::Write {
            path: path.to_path_buf(),
            source,
        };

        let file = options.open(path).map_err(to_write_error)?;
        self.written.insert(path.to_path_buf());

        let mut writer = BufWriter::new(file);
        for record in records {
            record.write_record(&mut writer).map_err(to_write_error)?;
        }
        writer.flush().map_err(to_write_error)?;

        log::debug!(
            "wrote {} records to {} ({})",
            records.len(),
            path.display(),
            if truncate { "truncated" } else { "appended" }
        );
        Ok(true)
    }
}
