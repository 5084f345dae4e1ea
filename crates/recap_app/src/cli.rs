use std::path::PathBuf;

use clap::Parser;

use crate::logging::LogDestination;

#[derive(Parser, Debug)]
#[command(name = "recap")]
#[command(version)]
#[command(about = "Summarize a video through a recap server and follow its progress", long_about = None)]
pub struct Args {
    /// Video URL to summarize
    pub video_url: String,

    /// Language of the summary (default: english, or the config file value)
    #[arg(short, long)]
    pub language: Option<String>,

    /// Server base URL, e.g. http://localhost:8000
    #[arg(long)]
    pub server: Option<String>,

    /// RON config file (default: ./recap.ron when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    pub log: LogDestination,

    /// Cancel the job after this many seconds
    #[arg(long)]
    pub deadline: Option<u64>,

    /// Do not print the transcript after the summary
    #[arg(long)]
    pub no_transcript: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
