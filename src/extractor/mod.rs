pub mod file_extractor;
pub mod output_manager;

pub use file_extractor::{check_file_access, FileExtractor, FileOutcome, RunReport, RunStatus};
pub use output_manager::{OutputManager, OutputNaming, TextRecord, WriteMode};
