use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;

use vocal_note_tagger::{AnalyzerConfig, NoteTagger, PitchConfig, TaggingRequest};

#[derive(Parser)]
#[command(name = "vocal-note-tagger")]
#[command(about = "Tag each word of a word-timed lyric transcript with its sung MIDI note")]
struct Args {
    /// Lyrics JSON with per-word start/end times
    #[arg()]
    json_file: PathBuf,

    /// Audio file to analyze (WAV, MP3, FLAC, OGG, M4A)
    #[arg()]
    audio_file: PathBuf,

    /// Output JSON file with notes added to each word
    #[arg(long, short, default_value = "output_with_notes.json")]
    output: PathBuf,

    /// Detailed per-word analysis log
    #[arg(long, default_value = "pitch_analysis_log.json")]
    log: PathBuf,

    /// Only log warnings and errors
    #[arg(long, short)]
    quiet: bool,

    /// JSON file overriding pitch analysis parameters
    #[arg(long)]
    config: Option<PathBuf>,

    /// Worker threads (0 = one per core)
    #[arg(long, default_value = "0")]
    jobs: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    info!("Starting vocal pitch analysis");
    NoteTagger::check_inputs(&args.json_file, &args.audio_file)?;

    let pitch = match &args.config {
        Some(path) => PitchConfig::load(path)
            .with_context(|| format!("loading pitch config {}", path.display()))?,
        None => PitchConfig::default(),
    };
    let tagger = NoteTagger::new(AnalyzerConfig {
        pitch,
        threads: args.jobs,
    });

    let request = TaggingRequest {
        lyrics_path: args.json_file,
        audio_path: args.audio_file,
        output_path: args.output,
        log_path: args.log,
    };
    tagger
        .run(&request)
        .with_context(|| format!("tagging {}", request.lyrics_path.display()))?;

    Ok(())
}
