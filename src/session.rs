use log::{debug, info};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::analysis::{AnalysisLog, AnalysisSummary, FileInfo, WordAnalyzer, WordReport};
use crate::audio::{load_audio_file, AudioSegment};
use crate::config::AnalyzerConfig;
use crate::error::{InputKind, Result, TaggerError};
use crate::lyrics::Transcript;

/// Input and output locations for one tagging run.
#[derive(Debug, Clone)]
pub struct TaggingRequest {
    pub lyrics_path: PathBuf,
    pub audio_path: PathBuf,
    pub output_path: PathBuf,
    pub log_path: PathBuf,
}

/// Annotated transcript plus its diagnostic log, not yet written anywhere.
#[derive(Debug, Clone)]
pub struct TaggingResult {
    pub transcript: Transcript,
    pub log: AnalysisLog,
}

impl TaggingResult {
    pub fn save<P: AsRef<Path>, Q: AsRef<Path>>(&self, output_path: P, log_path: Q) -> Result<()> {
        self.transcript.save(output_path)?;
        self.log.save(log_path)?;
        Ok(())
    }
}

/// Loads a transcript and its recording, tags every word with a note, and
/// writes the results.
pub struct NoteTagger {
    config: AnalyzerConfig,
}

impl NoteTagger {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Both inputs must exist before anything is decoded or written.
    pub fn check_inputs<P: AsRef<Path>, Q: AsRef<Path>>(lyrics_path: P, audio_path: Q) -> Result<()> {
        for (kind, path) in [
            (InputKind::Lyrics, lyrics_path.as_ref()),
            (InputKind::Audio, audio_path.as_ref()),
        ] {
            if !path.exists() {
                return Err(TaggerError::MissingInput {
                    kind,
                    path: path.to_path_buf(),
                });
            }
        }
        Ok(())
    }

    /// Tag an in-memory transcript against decoded audio.
    pub fn tag(&self, transcript: &mut Transcript, audio: &AudioSegment) -> Result<Vec<WordReport>> {
        let analyzer = WordAnalyzer::new(audio, &self.config)?;
        let mut tokens = transcript.word_tokens();

        info!(
            "Analyzing {} words across {} segments",
            tokens.len(),
            transcript.segments.len()
        );
        let segment_count = transcript.segments.len();
        for (i, segment) in transcript.segments.iter().enumerate() {
            debug!(
                "Segment {}/{} - {} ({} words)",
                i + 1,
                segment_count,
                segment.preview(),
                segment.words.len()
            );
        }
        let reports = analyzer.analyze_words(&mut tokens)?;
        transcript.apply_notes(&tokens);
        Ok(reports)
    }

    /// Load both inputs and tag them, without writing any output.
    pub fn tag_files<P: AsRef<Path>, Q: AsRef<Path>>(&self, lyrics_path: P, audio_path: Q) -> Result<TaggingResult> {
        let lyrics_path = lyrics_path.as_ref();
        let audio_path = audio_path.as_ref();
        Self::check_inputs(lyrics_path, audio_path)?;

        let mut transcript = Transcript::load(lyrics_path)?;
        info!("Loading audio file {}...", audio_path.display());
        let audio = load_audio_file(audio_path)?;

        let word_analysis = self.tag(&mut transcript, &audio)?;
        let log = AnalysisLog {
            file_info: FileInfo {
                audio_file: audio_path.display().to_string(),
                lyrics_file: lyrics_path.display().to_string(),
                duration: audio.duration_seconds(),
                sample_rate: audio.sample_rate,
                total_words: transcript.total_words(),
            },
            word_analysis,
        };

        Ok(TaggingResult { transcript, log })
    }

    /// Full run: check, load, analyze, then write both output files.
    pub fn run(&self, request: &TaggingRequest) -> Result<AnalysisSummary> {
        let started = Instant::now();
        let result = self.tag_files(&request.lyrics_path, &request.audio_path)?;
        result.save(&request.output_path, &request.log_path)?;

        let summary = result.log.summary();
        info!(
            "Analysis complete in {:.2}s: {} pitched, {} unpitched, {} special, {} failed",
            started.elapsed().as_secs_f64(),
            summary.pitched,
            summary.unpitched,
            summary.special,
            summary.failed
        );
        info!("Results saved to {}", request.output_path.display());
        info!("Detailed log saved to {}", request.log_path.display());
        Ok(summary)
    }
}

impl Default for NoteTagger {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}
