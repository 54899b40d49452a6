use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::audio::PitchStats;
use crate::error::Result;
use crate::lyrics::write_json;

/// Diagnostic log written next to the annotated transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisLog {
    pub file_info: FileInfo,
    /// One entry per transcript word, in transcript order.
    pub word_analysis: Vec<WordReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileInfo {
    pub audio_file: String,
    pub lyrics_file: String,
    pub duration: f64,
    pub sample_rate: u32,
    pub total_words: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordReport {
    pub word: String,
    pub start_time: f64,
    pub end_time: f64,
    pub note: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_special: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<PitchStats>,
}

/// Counts per outcome, for the end-of-run summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisSummary {
    pub pitched: usize,
    pub special: usize,
    pub unpitched: usize,
    pub failed: usize,
}

impl WordReport {
    pub fn is_pitched(&self) -> bool {
        self.note >= 0
    }
}

impl AnalysisLog {
    pub fn summary(&self) -> AnalysisSummary {
        let mut summary = AnalysisSummary::default();
        for report in &self.word_analysis {
            if report.is_special == Some(true) {
                summary.special += 1;
            } else if report.is_pitched() {
                summary.pitched += 1;
            } else if report.error.is_some() {
                summary.failed += 1;
            } else {
                summary.unpitched += 1;
            }
        }
        summary
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_json(self, path, "writing analysis log")
    }
}
