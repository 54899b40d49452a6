//! Vocal note tagging for word-timed lyric transcripts.
//!
//! Given a decoded recording and per-word start/end times, each word gets
//! the MIDI note it is sung at (`-1` when no pitch can be determined),
//! together with a diagnostic record of how that note was reached.
//!
//! The pipeline per word is: slice the shared audio buffer, track the
//! strongest in-band spectral peak per frame, keep confident frames (relaxed
//! for very short words), average them, and quantize the mean to a MIDI note.

pub mod analysis;
pub mod audio;
pub mod config;
pub mod error;
pub mod lyrics;
pub mod session;

pub use analysis::{AnalysisLog, WordAnalyzer, WordReport};
pub use audio::{analyze_pitch, frequency_to_midi, midi_to_note_name, AudioSegment, PitchEstimate, PitchStats};
pub use config::{AnalyzerConfig, PitchConfig};
pub use error::{PitchError, Result, TaggerError};
pub use lyrics::{is_special_token, Transcript, WordToken};
pub use session::{NoteTagger, TaggingRequest, TaggingResult};
