use crate::error::{Off2TxtError, Result};
use crate::extractor::WriteMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "off2txt.toml";
const DEFAULT_CONFIG_PATHS: [&str; 2] = [DEFAULT_CONFIG_FILE, ".off2txt.toml"];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub split: SplitConfig,
    pub reporting: ReportingConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory that receives the output files. Ignored when `file` is set.
    pub directory: Option<PathBuf>,
    /// Single file that receives all output.
    pub file: Option<PathBuf>,
    /// Output extension. Unset means `txt`, or `csv` for spreadsheets.
    pub extension: Option<String>,
    pub overwrite: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SplitConfig {
    pub enabled: bool,
    pub ascii_suffix: String,
    pub unicode_suffix: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportingConfig {
    pub suppress_file_access_errors: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            ascii_suffix: "ascii".to_string(),
            unicode_suffix: "unicode".to_string(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(Off2TxtError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| Off2TxtError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        toml::from_str(&content).map_err(|e| Off2TxtError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                for default_path in &DEFAULT_CONFIG_PATHS {
                    if Path::new(default_path).exists() {
                        log::debug!("loading configuration from {}", default_path);
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref directory) = cli_args.directory {
            self.output.directory = Some(directory.clone());
        }

        if let Some(ref file) = cli_args.output_file {
            self.output.file = Some(file.clone());
        }

        if let Some(ref extension) = cli_args.extension {
            self.output.extension = Some(extension.clone());
        }

        if let Some(ref suffix) = cli_args.ascii_suffix {
            self.split.ascii_suffix = suffix.clone();
        }

        if let Some(ref suffix) = cli_args.unicode_suffix {
            self.split.unicode_suffix = suffix.clone();
        }

        // flags switch options on, never off
        if cli_args.split {
            self.split.enabled = true;
        }

        if cli_args.overwrite {
            self.output.overwrite = true;
        }

        if cli_args.suppress_file_access_errors {
            self.reporting.suppress_file_access_errors = true;
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_suffix("ASCII", &self.split.ascii_suffix)?;
        validate_suffix("Unicode", &self.split.unicode_suffix)?;

        if self.split.ascii_suffix == self.split.unicode_suffix {
            return Err(Off2TxtError::Config {
                message: format!(
                    "ASCII and Unicode suffixes must differ (both are '{}')",
                    self.split.ascii_suffix
                ),
            });
        }

        if let Some(ref extension) = self.output.extension {
            if extension.is_empty() {
                return Err(Off2TxtError::Config {
                    message: "Output extension must not be empty".to_string(),
                });
            }
            if extension.starts_with('.') {
                return Err(Off2TxtError::Config {
                    message: format!(
                        "Output extension '{}' must be given without a leading dot",
                        extension
                    ),
                });
            }
            if has_separator(extension) {
                return Err(Off2TxtError::Config {
                    message: format!("Output extension '{}' must not contain a path separator", extension),
                });
            }
        }

        Ok(())
    }

    pub fn write_mode(&self) -> WriteMode {
        if self.output.overwrite {
            WriteMode::Overwrite
        } else {
            WriteMode::Append
        }
    }

    pub fn create_sample_config() -> String {
        let mut sample_config = Self::default();
        sample_config.output.extension = Some("txt".to_string());
        toml::to_string_pretty(&sample_config).unwrap_or_default()
    }
}

fn has_separator(value: &str) -> bool {
    value.contains('/') || value.contains('\\')
}

fn validate_suffix(label: &str, suffix: &str) -> Result<()> {
    if suffix.is_empty() {
        return Err(Off2TxtError::Config {
            message: format!("{} suffix must not be empty", label),
        });
    }
    if has_separator(suffix) {
        return Err(Off2TxtError::Config {
            message: format!("{} suffix '{}' must not contain a path separator", label, suffix),
        });
    }
    Ok(())
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub directory: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
    pub extension: Option<String>,
    pub ascii_suffix: Option<String>,
    pub unicode_suffix: Option<String>,
    pub split: bool,
    pub overwrite: bool,
    pub suppress_file_access_errors: bool,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_directory(mut self, directory: Option<PathBuf>) -> Self {
        self.directory = directory;
        self
    }

    pub fn with_output_file(mut self, file: Option<PathBuf>) -> Self {
        self.output_file = file;
        self
    }

    pub fn with_extension(mut self, extension: Option<String>) -> Self {
        self.extension = extension;
        self
    }

    pub fn with_suffixes(mut self, ascii: Option<String>, unicode: Option<String>) -> Self {
        self.ascii_suffix = ascii;
        self.unicode_suffix = unicode;
        self
    }

    pub fn with_split(mut self, split: bool) -> Self {
        self.split = split;
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_suppress_file_access_errors(mut self, suppress: bool) -> Self {
        self.suppress_file_access_errors = suppress;
        self
    }
}
