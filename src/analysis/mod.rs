pub mod report;

pub use report::{AnalysisLog, AnalysisSummary, FileInfo, WordReport};

use log::{info, warn};
use rayon::prelude::*;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use crate::audio::{AudioSegment, PitchAnalyzer, PitchEstimator, PitchStats};
use crate::config::AnalyzerConfig;
use crate::error::{PitchError, Result, TaggerError};
use crate::lyrics::{is_special_token, WordToken};

pub const OUT_OF_RANGE: &str = "out_of_range";

/// Assigns a note to each word of a transcript against one decoded recording.
///
/// Words are independent: each reads only its own slice of the shared buffer
/// and produces its own report, so batches run on a rayon pool and are
/// collected back in transcript order.
pub struct WordAnalyzer<'a, E: PitchEstimator = PitchAnalyzer> {
    audio: &'a AudioSegment,
    estimator: E,
    threads: usize,
}

impl<'a> WordAnalyzer<'a, PitchAnalyzer> {
    pub fn new(audio: &'a AudioSegment, config: &AnalyzerConfig) -> Result<Self> {
        let estimator =
            PitchAnalyzer::new(audio.sample_rate, config.pitch.clone()).map_err(|e| match e {
                PitchError::InvalidConfig(message) => TaggerError::InvalidConfig(message),
                other => TaggerError::UnsupportedAudio(other.to_string()),
            })?;
        Ok(Self::with_estimator(audio, estimator, config.threads))
    }
}

impl<'a, E: PitchEstimator> WordAnalyzer<'a, E> {
    pub fn with_estimator(audio: &'a AudioSegment, estimator: E, threads: usize) -> Self {
        Self {
            audio,
            estimator,
            threads,
        }
    }

    /// Analyze one word. Never fails: every outcome is folded into the report.
    pub fn analyze_word(&self, token: &WordToken) -> WordReport {
        let mut report = WordReport {
            word: token.text.clone(),
            start_time: token.start_time,
            end_time: token.end_time,
            note: -1,
            is_special: None,
            error: None,
            stats: None,
        };

        if is_special_token(&token.text) {
            report.is_special = Some(true);
            return report;
        }

        let slice = match self.audio.slice_for(token.start_time, token.end_time) {
            Some(slice) => slice,
            None => {
                report.stats = Some(PitchStats::with_reason(OUT_OF_RANGE));
                return report;
            }
        };

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.estimator.estimate(slice)));
        match outcome {
            Ok(Ok(estimate)) => {
                report.note = estimate.midi_note as i32;
                report.stats = Some(estimate.stats);
            }
            Ok(Err(PitchError::NoValidPitch { stats })) => {
                report.stats = Some(stats);
            }
            Ok(Err(e)) => {
                report.error = Some(e.to_string());
                report.stats = Some(self.failure_stats(slice.len(), e.to_string()));
            }
            Err(payload) => {
                let message = format!("analysis panicked: {}", panic_message(payload.as_ref()));
                report.error = Some(message.clone());
                report.stats = Some(self.failure_stats(slice.len(), message));
            }
        }

        if report.note < 0 {
            self.log_unpitched(&report, slice.len());
        }
        report
    }

    /// Analyze every token, fill in its `note`, and return the reports in the
    /// same order.
    pub fn analyze_words(&self, tokens: &mut [WordToken]) -> Result<Vec<WordReport>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
            .map_err(|e| TaggerError::InvalidConfig(format!("worker pool: {}", e)))?;

        let total = tokens.len();
        let processed = AtomicUsize::new(0);
        let started = Instant::now();

        let reports: Vec<WordReport> = pool.install(|| {
            tokens
                .par_iter()
                .map(|token| {
                    let report = self.analyze_word(token);
                    let done = processed.fetch_add(1, Ordering::Relaxed) + 1;
                    if done % 10 == 0 {
                        let elapsed = started.elapsed().as_secs_f64();
                        let remaining = elapsed / done as f64 * total as f64 - elapsed;
                        info!("Progress: {}/{} words - {:.1}s remaining", done, total, remaining);
                    }
                    report
                })
                .collect()
        });

        for (token, report) in tokens.iter_mut().zip(&reports) {
            token.note = report.note;
        }
        Ok(reports)
    }

    fn failure_stats(&self, slice_len: usize, error: String) -> PitchStats {
        let mut stats = PitchStats::with_error(error);
        stats.short_segment = slice_len < self.estimator.min_samples();
        stats
    }

    fn log_unpitched(&self, report: &WordReport, slice_len: usize) {
        let reason = report
            .error
            .as_deref()
            .or_else(|| report.stats.as_ref().and_then(|s| s.reason.as_deref()))
            .unwrap_or("unknown");
        warn!(
            "⚠️  Word '{}' has no note: {:.2}s - {:.2}s ({:.4}s), {} samples (minimum {}), reason: {}",
            report.word,
            report.start_time,
            report.end_time,
            report.end_time - report.start_time,
            slice_len,
            self.estimator.min_samples(),
            reason
        );
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
