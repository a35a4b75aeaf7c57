use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::Level;
use wave_mfcc::{AppConfig, FeatureVector, FramesCollection, Mfcc, StereoChannel, WaveFile};

#[derive(Parser, Debug)]
#[command(
    name = "mfcc_cli",
    about = "Inspect wave files and extract MFCC feature vectors"
)]
struct Cli {
    /// Log pipeline details to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the header of a wave file as JSON
    Info {
        #[arg(long)]
        input: PathBuf,
    },
    /// Extract feature vectors for every full frame of a file
    Extract {
        #[arg(long)]
        input: PathBuf,
        /// JSON configuration (defaults are used for missing fields)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Channel to analyse in stereo files (overrides the config)
        #[arg(long, value_enum)]
        channel: Option<ChannelArg>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Decode a file part by part and print one JSON line per frame
    Stream {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Decode a file and write the selected channel back as mono PCM
    Resave {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ChannelArg {
    Left,
    Right,
}

impl From<ChannelArg> for StereoChannel {
    fn from(arg: ChannelArg) -> Self {
        match arg {
            ChannelArg::Left => StereoChannel::Left,
            ChannelArg::Right => StereoChannel::Right,
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Info { input } => run_info(&input),
        Commands::Extract {
            input,
            config,
            channel,
            output,
        } => {
            let mut config = load_config(config.as_deref());
            if let Some(channel) = channel {
                config.wave.channel = channel.into();
            }
            run_extract(&input, &config, output)
        }
        Commands::Stream { input, config } => run_stream(&input, &load_config(config.as_deref())),
        Commands::Resave {
            input,
            output,
            config,
        } => run_resave(&input, &output, &load_config(config.as_deref())),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    // stdout carries the JSON reports
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> AppConfig {
    path.map(AppConfig::load_from_file).unwrap_or_default()
}

fn run_info(input: &Path) -> Result<ExitCode> {
    let config = AppConfig::default();
    let wave = WaveFile::open_streaming(input, config.wave.part_size)
        .with_context(|| format!("reading header of {}", input.display()))?;
    let header = wave.header();

    let report = InfoReport {
        file: input.display().to_string(),
        sample_rate: header.sample_rate,
        channels: header.channels,
        bits_per_sample: header.bits_per_sample,
        bytes_per_sec: header.bytes_per_sec,
        block_align: header.block_align,
        wave_size: header.wave_size,
        audio_length_ms: wave.audio_length_ms(),
        num_parts: wave.num_parts(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(ExitCode::from(0))
}

fn run_extract(input: &Path, config: &AppConfig, output_path: Option<PathBuf>) -> Result<ExitCode> {
    let wave = WaveFile::open(input, config.wave.channel)
        .with_context(|| format!("decoding {}", input.display()))?;
    let mfcc = Mfcc::new(wave.header().sample_rate, &config.mfcc)
        .context("building MFCC pipeline")?;
    let frames = FramesCollection::new(&wave, config.mfcc.frame_size, config.mfcc.frame_overlap)
        .context("splitting signal into frames")?;
    let features = mfcc
        .calculate_all(&frames)
        .with_context(|| format!("extracting features from {}", input.display()))?;

    let report = ExtractReport {
        file: input.display().to_string(),
        sample_rate: wave.header().sample_rate,
        frame_size: config.mfcc.frame_size,
        frame_count: features.len(),
        features: &features,
    };
    let json = serde_json::to_string_pretty(&report)?;

    if let Some(path) = output_path {
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    } else {
        println!("{json}");
    }

    Ok(ExitCode::from(0))
}

fn run_stream(input: &Path, config: &AppConfig) -> Result<ExitCode> {
    let mut wave = WaveFile::open_streaming(input, config.wave.part_size)
        .with_context(|| format!("reading header of {}", input.display()))?;
    let mfcc = Mfcc::new(wave.header().sample_rate, &config.mfcc)
        .context("building MFCC pipeline")?;

    let frame_size = config.mfcc.frame_size;
    let hop = frame_size.saturating_sub(config.mfcc.frame_overlap);
    if hop == 0 {
        anyhow::bail!(
            "frame overlap {} must be smaller than frame size {}",
            config.mfcc.frame_overlap,
            frame_size
        );
    }
    let channel_index = match config.wave.channel {
        StereoChannel::Right if wave.is_stereo() => 1,
        _ => 0,
    };

    // samples carried over between parts until a full frame is available
    let mut pending: Vec<f64> = Vec::new();
    let mut frame = 0usize;
    while let Some(mut parts) = wave
        .load_next()
        .with_context(|| format!("decoding {}", input.display()))?
    {
        pending.extend(parts.swap_remove(channel_index).into_samples());

        while pending.len() >= frame_size {
            let features = mfcc.calculate_frame(&pending[..frame_size])?;
            let line = StreamLine {
                frame,
                features: &features,
            };
            println!("{}", serde_json::to_string(&line)?);
            pending.drain(..hop);
            frame += 1;
        }
    }

    tracing::debug!("[mfcc_cli] streamed {} frames", frame);
    Ok(ExitCode::from(0))
}

fn run_resave(input: &Path, output: &Path, config: &AppConfig) -> Result<ExitCode> {
    let wave = WaveFile::open(input, config.wave.channel)
        .with_context(|| format!("decoding {}", input.display()))?;
    let header = WaveFile::save_with(&wave, output, config.wave.eight_bit_packing)
        .with_context(|| format!("writing {}", output.display()))?;

    let report = InfoReport {
        file: output.display().to_string(),
        sample_rate: header.sample_rate,
        channels: header.channels,
        bits_per_sample: header.bits_per_sample,
        bytes_per_sec: header.bytes_per_sec,
        block_align: header.block_align,
        wave_size: header.wave_size,
        audio_length_ms: wave.audio_length_ms(),
        num_parts: header.wave_size / config.wave.part_size.max(1) as u32,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(ExitCode::from(0))
}

#[derive(Serialize)]
struct InfoReport {
    file: String,
    sample_rate: u32,
    channels: u16,
    bits_per_sample: u16,
    bytes_per_sec: u32,
    block_align: u16,
    wave_size: u32,
    audio_length_ms: u32,
    num_parts: u32,
}

#[derive(Serialize)]
struct ExtractReport<'a> {
    file: String,
    sample_rate: u32,
    frame_size: usize,
    frame_count: usize,
    #[serde(skip_serializing_if = "slice_empty")]
    features: &'a [FeatureVector],
}

fn slice_empty(features: &&[FeatureVector]) -> bool {
    features.is_empty()
}

#[derive(Serialize)]
struct StreamLine<'a> {
    frame: usize,
    features: &'a [f64],
}
