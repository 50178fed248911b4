use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "text_stats")]
#[command(about = "Generates statistics from a text file through a bounded-buffer pipeline")]
#[command(version)]
pub struct Cli {
    /// Text file on disk, or the name of a bundled sample text
    pub input: String,

    /// Maximum wall-clock runtime in seconds
    #[arg(short = 't', long, default_value = "30")]
    pub max_seconds: u64,

    /// Number of consumer workers (defaults to the CPU count)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Maximum number of items resident in the channel
    #[arg(long, default_value = "1024")]
    pub channel_capacity: usize,

    /// Number of lines batched into one channel item
    #[arg(long, default_value = "256")]
    pub batch_size: usize,

    /// Write the full report as pretty JSON to this path
    #[arg(short, long)]
    pub json: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}
