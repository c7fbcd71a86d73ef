mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

use cli::{Cli, OutputFormat};
use etude::audio::{AudioFeatures, ExtractOptions, Recording};
use etude::config::{self, Config};
use etude::pipeline;
use etude::render::waveform::{BENCHMARK_COLOR, CANDIDATE_COLOR};
use etude::render::{self, RenderOptions, TextOverlay};
use etude::Side;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut cli = Cli::parse();

    let config = match config::find_config(cli.config.as_deref()) {
        Some(path) => match config::load_config(&path) {
            Some(cfg) => {
                log::info!("Loaded config from {}", path.display());
                cfg
            }
            None => {
                log::warn!("Failed to load config from {}", path.display());
                Config::default()
            }
        },
        None => Config::default(),
    };

    // Config values apply only when the CLI flag is at its default
    if cli.width == 1000 { cli.width = config.render.width; }
    if cli.height == 240 { cli.height = config.render.height; }
    if cli.cutoff_hz == 1000.0 { cli.cutoff_hz = config.analysis.cutoff_hz; }
    if cli.font.is_none() {
        cli.font = config.render.font.clone();
    }

    let mut settings = config.analysis_settings();
    settings.extract.tonal_cutoff_hz = cli.cutoff_hz;
    if cli.no_tonal_balance {
        settings.extract.tonal_balance = false;
    }
    if cli.no_tempo {
        settings.report.include_tempo = false;
    }

    let benchmark_bytes = read_audio(&cli.benchmark)?;
    let candidate_bytes = cli.candidate.as_deref().map(read_audio).transpose()?;

    if cli.inspect {
        inspect(&cli, &benchmark_bytes, candidate_bytes.as_deref(), &settings.extract)?;
        return Ok(());
    }

    let candidate_path = cli
        .candidate
        .as_deref()
        .context("A candidate recording is required unless --inspect is given")?;
    let candidate_bytes = candidate_bytes.context("Candidate recording was not read")?;

    log::info!("Benchmark: {}", cli.benchmark.display());
    log::info!("Candidate: {}", candidate_path.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
    pb.set_message("Analyzing recordings...");
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = pipeline::compare_recordings(
        recording(&benchmark_bytes, &cli.benchmark),
        recording(&candidate_bytes, candidate_path),
        &settings,
    );
    pb.finish_and_clear();
    let comparison = result?;

    match cli.format {
        OutputFormat::Text => println!("{}", comparison.report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&comparison)?),
    }

    if let Some(ref dir) = cli.waveforms {
        write_waveforms(&cli, dir, &comparison.benchmark, &comparison.candidate, config.render.font_size)?;
    }

    Ok(())
}

fn read_audio(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read audio file: {}", path.display()))
}

fn recording<'a>(bytes: &'a [u8], path: &'a Path) -> Recording<'a> {
    let recording = Recording::new(bytes);
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => recording.with_extension(ext),
        None => recording,
    }
}

fn inspect(
    cli: &Cli,
    benchmark: &[u8],
    candidate: Option<&[u8]>,
    options: &ExtractOptions,
) -> Result<()> {
    let mut inputs = vec![(Side::Benchmark, cli.benchmark.as_path(), benchmark)];
    if let (Some(path), Some(bytes)) = (cli.candidate.as_deref(), candidate) {
        inputs.push((Side::Candidate, path, bytes));
    }

    for (side, path, bytes) in inputs {
        let features = pipeline::inspect(recording(bytes, path), side, options)?;
        match cli.format {
            OutputFormat::Text => print_features(side, path, &features),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&features)?),
        }
    }
    Ok(())
}

fn print_features(side: Side, path: &Path, f: &AudioFeatures) {
    println!("{} ({})", side, path.display());
    println!("  sample rate        {} Hz", f.sample_rate);
    println!("  channels           {}", f.channels);
    println!("  duration           {:.3} s", f.duration_seconds);
    println!("  average amplitude  {:.4}", f.average_amplitude);
    println!("  peak amplitude     {:.4}", f.peak_amplitude);
    println!("  dynamic range      {:.4}", f.dynamic_range);
    if let Some(balance) = f.tonal_balance {
        println!("  tonal balance      {:.4}", balance);
    }
}

fn write_waveforms(
    cli: &Cli,
    dir: &Path,
    benchmark: &AudioFeatures,
    candidate: &AudioFeatures,
    font_size: f32,
) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create waveform directory: {}", dir.display()))?;

    let overlay = TextOverlay::discover(cli.font.as_deref(), font_size);
    let plots = [
        (benchmark, "Benchmark Recording", BENCHMARK_COLOR, "benchmark.png"),
        (candidate, "Your Performance", CANDIDATE_COLOR, "candidate.png"),
    ];

    for (features, label, color, file_name) in plots {
        let options = RenderOptions {
            width: cli.width,
            height: cli.height,
            color,
        };
        let image = render::render(features, label, &options, overlay.as_ref());
        let path = dir.join(file_name);
        image
            .write_png(&path)
            .with_context(|| format!("Failed to write waveform: {}", path.display()))?;
        log::info!("Wrote {}", path.display());
    }

    Ok(())
}
