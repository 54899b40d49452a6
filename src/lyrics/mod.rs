pub mod tokens;

pub use tokens::is_special_token;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

use crate::error::{Result, TaggerError};

/// Word-timed lyric transcript.
///
/// Only the fields the tagger needs are typed; everything else at each level
/// is kept in `extra` and written back unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub segments: Vec<Segment>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub words: Vec<WordEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Segment {
    /// First 30 characters of the text, for progress lines.
    pub fn preview(&self) -> String {
        self.text.trim().chars().take(30).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordEntry {
    pub word: String,
    pub start: f64,
    pub end: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<i32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One word as the analyzer sees it. `note` is -1 until analyzed and stays -1
/// when no pitch could be determined.
#[derive(Debug, Clone, PartialEq)]
pub struct WordToken {
    pub text: String,
    pub start_time: f64,
    pub end_time: f64,
    pub note: i32,
}

impl WordToken {
    pub fn new(text: impl Into<String>, start_time: f64, end_time: f64) -> Self {
        Self {
            text: text.into(),
            start_time,
            end_time,
            note: -1,
        }
    }
}

impl Transcript {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| TaggerError::io("reading lyrics file", e))?;
        serde_json::from_str(&json).map_err(|e| TaggerError::json("parsing lyrics file", e))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_json(self, path, "writing annotated lyrics")
    }

    pub fn total_words(&self) -> usize {
        self.segments.iter().map(|s| s.words.len()).sum()
    }

    /// All words across segments, in transcript order.
    pub fn word_tokens(&self) -> Vec<WordToken> {
        self.segments
            .iter()
            .flat_map(|s| s.words.iter())
            .map(|w| WordToken::new(w.word.clone(), w.start, w.end))
            .collect()
    }

    /// Write analyzed notes back, in the order `word_tokens` produced them.
    pub fn apply_notes(&mut self, tokens: &[WordToken]) {
        let entries = self.segments.iter_mut().flat_map(|s| s.words.iter_mut());
        for (entry, token) in entries.zip(tokens) {
            entry.note = Some(token.note);
        }
    }
}

/// Pretty JSON with 4-space indentation and raw UTF-8 text.
pub(crate) fn write_json<T: Serialize, P: AsRef<Path>>(
    value: &T,
    path: P,
    context: &'static str,
) -> Result<()> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| TaggerError::json(context, e))?;
    std::fs::write(path, buffer).map_err(|e| TaggerError::io(context, e))
}
