//! Logging initialization for the recap CLI.
//!
//! Rendering owns stdout, so log output goes to `./recap.log` or stderr.

use std::fs::File;
use std::path::PathBuf;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogDestination {
    /// Write to ./recap.log in current directory.
    File,
    /// Write to stderr.
    Terminal,
    /// Write to both file and stderr.
    Both,
    /// No logging.
    Off,
}

/// Initialize the logger with the specified destination.
pub fn initialize(destination: LogDestination, verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let config = build_config();

    let loggers: Vec<Box<dyn SharedLogger>> = match destination {
        LogDestination::Off => return,
        LogDestination::File => match create_file_logger(level, config) {
            Some(file_logger) => vec![file_logger],
            None => return,
        },
        LogDestination::Terminal => vec![create_term_logger(level, config)],
        LogDestination::Both => {
            let mut loggers = vec![create_term_logger(level, config.clone())];
            if let Some(file_logger) = create_file_logger(level, config) {
                loggers.push(file_logger);
            }
            loggers
        }
    };

    let _ = CombinedLogger::init(loggers);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        // HTTP stack internals stay quiet.
        .add_filter_allow_str(recap_logging::TARGET)
        .build()
}

fn create_term_logger(level: LevelFilter, config: Config) -> Box<dyn SharedLogger> {
    TermLogger::new(level, config, TerminalMode::Stderr, ColorChoice::Auto)
}

fn create_file_logger(level: LevelFilter, config: Config) -> Option<Box<dyn SharedLogger>> {
    let log_path = PathBuf::from("./recap.log");
    match File::create(&log_path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", log_path, err);
            None
        }
    }
}
