use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "etude", about = "Compare a performance recording against a benchmark recording")]
pub struct Cli {
    /// Benchmark (reference) recording (WAV, MP3, FLAC, OGG)
    pub benchmark: PathBuf,

    /// Your performance of the same piece
    pub candidate: Option<PathBuf>,

    /// Config file (defaults to ./etude.toml or the user config directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Directory to write benchmark.png and candidate.png waveform plots into
    #[arg(short, long)]
    pub waveforms: Option<PathBuf>,

    /// Skip the FFT-based tonal balance analysis
    #[arg(long)]
    pub no_tonal_balance: bool,

    /// Leave the tempo section out of the report
    #[arg(long)]
    pub no_tempo: bool,

    /// Frequency splitting low from high energy for tonal balance (Hz)
    #[arg(long, default_value_t = 1000.0)]
    pub cutoff_hz: f64,

    /// Waveform plot width in pixels
    #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u32).range(64..=8192))]
    pub width: u32,

    /// Waveform plot height in pixels
    #[arg(long, default_value_t = 240, value_parser = clap::value_parser!(u32).range(64..=8192))]
    pub height: u32,

    /// TrueType font used for plot labels
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Print the extracted features of each recording and exit
    #[arg(long)]
    pub inspect: bool,
}
