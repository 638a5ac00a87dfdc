use crate::config::{CliOverrides, Config, DEFAULT_CONFIG_FILE};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "off2txt")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract text from Office Open XML documents")]
#[command(
    long_about = "off2txt extracts the text of Word (.docx), PowerPoint (.pptx) and Excel (.xlsx) \
                  files into plain-text or CSV files, optionally splitting ASCII and non-ASCII \
                  text into separate outputs."
)]
#[command(after_help = "EXAMPLES:\n  \
    off2txt report.docx\n  \
    off2txt deck.pptx book.xlsx --directory extracted\n  \
    off2txt *.docx --split --ascii en --unicode intl\n  \
    off2txt minutes.docx notes.docx --output all.txt --overwrite-output-files\n\n\
    EXIT STATUS:\n  \
    0 text was extracted, 1 nothing was extracted, 2 an error occurred")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Office files to extract
    #[arg(value_name = "FILE", required_unless_present = "generate_config")]
    pub files: Vec<PathBuf>,

    /// File-name suffix for ASCII output in split mode
    #[arg(short, long, value_name = "SUFFIX")]
    pub ascii: Option<String>,

    /// File-name suffix for Unicode output in split mode
    #[arg(short, long, value_name = "SUFFIX")]
    pub unicode: Option<String>,

    /// Write output files into this directory
    #[arg(short, long, value_name = "DIR", help = "Write outputs into DIR (ignored with --output)")]
    pub directory: Option<PathBuf>,

    /// Output file extension
    #[arg(short, long, value_name = "EXT", help = "Output extension (default txt; csv for spreadsheets)")]
    pub extension: Option<String>,

    /// Write all output to a single file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Split ASCII and Unicode text into separate files
    #[arg(short, long)]
    pub split: bool,

    #[arg(short = 'A', long, help = "Do not report file and directory access errors")]
    pub suppress_file_access_errors: bool,

    #[arg(short = 'X', long, help = "Truncate output files instead of appending")]
    pub overwrite_output_files: bool,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Write debug logging to FILE
    #[arg(long, value_name = "FILE")]
    pub debug_log: Option<PathBuf>,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_directory(self.directory.clone())
            .with_output_file(self.output.clone())
            .with_extension(self.extension.clone())
            .with_suffixes(self.ascii.clone(), self.unicode.clone())
            .with_split(self.split)
            .with_overwrite(self.overwrite_output_files)
            .with_suppress_file_access_errors(self.suppress_file_access_errors)
    }

    /// Where `--generate-config` writes the sample file.
    pub fn sample_config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug || self.debug_log.is_some()
    }
}
