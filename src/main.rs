use anyhow::Context;
use clap::Parser;
use off2txt::{Cli, Off2Txt, Off2TxtError, OutputFormatter, OutputMode, UserFriendlyError};
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::process;

/// Exit status for failures before any file is processed.
const STARTUP_ERROR_CODE: i32 = 2;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    // clap reports usage errors itself, with exit status 2
    let cli = Cli::parse();
    setup_logging(&cli);

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let app = match Off2Txt::from_cli(&cli) {
        Ok(app) => app,
        Err(e) => {
            print_startup_error(&e);
            return STARTUP_ERROR_CODE;
        }
    };

    let report = app.run(&cli.files);
    app.output_formatter().print_run_report(&report);
    report.exit_code()
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli.sample_config_path();

    match Off2Txt::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path.display());
            println!("\nTo use this configuration:");
            println!("  off2txt <FILE>... --config {}", config_path.display());
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            STARTUP_ERROR_CODE
        }
    }
}

fn print_startup_error(error: &Off2TxtError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

fn open_debug_log(path: &Path) -> anyhow::Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open debug log {}", path.display()))
}

/// Silent unless `--debug`/`--debug-log` is given; `RUST_LOG` still wins.
/// Returns false when a logger was already installed.
fn setup_logging(cli: &Cli) -> bool {
    let default_filter = if cli.debug_enabled() { "off2txt=debug" } else { "off" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));

    if let Some(ref path) = cli.debug_log {
        match open_debug_log(path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => eprintln!("Warning: {:#}, logging to stderr", e),
        }
    }

    builder.format_timestamp_millis();
    match builder.try_init() {
        Ok(()) => true,
        Err(e) => {
            eprintln!("Warning: logging disabled: {}", e);
            false
        }
    }
}
