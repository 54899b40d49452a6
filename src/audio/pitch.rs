use log::debug;
use serde::{Deserialize, Serialize};

use super::{aggregate, frequency_to_midi, midi_to_note_name, select_frames, PitchFrame, SpectralPeakTracker};
use crate::config::PitchConfig;
use crate::error::PitchError;

pub const NO_VALID_PITCH: &str = "no valid pitch found";

/// Diagnostics for one analyzed slice.
///
/// `frequencies` and `confidences` hold the frames that fed the mean, in
/// frame order. They are only ever extended together, so their lengths match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PitchStats {
    frequencies: Vec<f32>,
    confidences: Vec<f32>,
    pub stability: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch_std: Option<f32>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub short_segment: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PitchStats {
    pub fn with_reason(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn with_error(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    pub fn frequencies(&self) -> &[f32] {
        &self.frequencies
    }

    pub fn confidences(&self) -> &[f32] {
        &self.confidences
    }

    fn record(&mut self, frame: &PitchFrame) {
        self.frequencies.push(frame.frequency);
        self.confidences.push(frame.magnitude);
    }
}

/// A word-sized slice that produced a note.
#[derive(Debug, Clone, PartialEq)]
pub struct PitchEstimate {
    pub midi_note: u8,
    /// Mean of the accepted frame frequencies, in Hz.
    pub frequency: f32,
    pub stats: PitchStats,
}

impl PitchEstimate {
    pub fn note_name(&self) -> String {
        midi_to_note_name(self.midi_note as i32)
    }
}

/// Pitch pipeline for one sample rate: track, filter, aggregate, quantize.
///
/// Building one per run keeps the FFT plan and window shared across words;
/// `analyze` takes `&self` so the analyzer can be used from many threads.
pub struct PitchAnalyzer {
    tracker: SpectralPeakTracker,
    config: PitchConfig,
}

impl PitchAnalyzer {
    pub fn new(sample_rate: u32, config: PitchConfig) -> Result<Self, PitchError> {
        config.check().map_err(PitchError::InvalidConfig)?;
        let tracker = SpectralPeakTracker::new(sample_rate, &config)?;
        Ok(Self { tracker, config })
    }

    pub fn sample_rate(&self) -> u32 {
        self.tracker.sample_rate()
    }

    /// Smallest slice, in samples, that is not a short segment.
    pub fn min_samples(&self) -> usize {
        (self.sample_rate() / self.config.short_segment_divisor.max(1)) as usize
    }

    pub fn analyze(&self, samples: &[f32]) -> Result<PitchEstimate, PitchError> {
        let min_samples = self.min_samples();
        let short_segment = samples.len() < min_samples;

        let mut stats = PitchStats {
            short_segment,
            ..PitchStats::default()
        };
        if short_segment {
            stats.reason = Some(format!(
                "short segment: {} samples < {} samples",
                samples.len(),
                min_samples
            ));
        }

        let frames = self.tracker.track(samples)?;
        let selection = select_frames(&frames, self.config.confidence_threshold, short_segment);
        for frame in &selection.frames {
            stats.record(frame);
        }

        let summary = match aggregate(&selection.frames, self.config.stability_spread) {
            Some(summary) => summary,
            None => {
                stats.reason = Some(NO_VALID_PITCH.to_string());
                return Err(PitchError::NoValidPitch { stats });
            }
        };

        if selection.relaxed {
            debug!(
                "Relaxed confidence threshold for {}-sample slice ({} frames kept)",
                samples.len(),
                selection.frames.len()
            );
        }
        stats.stability = summary.stability;
        stats.pitch_std = summary.std_dev;

        Ok(PitchEstimate {
            midi_note: frequency_to_midi(summary.mean_frequency),
            frequency: summary.mean_frequency,
            stats,
        })
    }
}

/// One-shot convenience over [`PitchAnalyzer`].
pub fn analyze_pitch(
    samples: &[f32],
    sample_rate: u32,
    config: &PitchConfig,
) -> Result<PitchEstimate, PitchError> {
    PitchAnalyzer::new(sample_rate, config.clone())?.analyze(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sample_rate: u32, len: usize, amplitude: f32) -> Vec<f32> {
        (0..len)
            .map(|i| {
                amplitude * (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin()
            })
            .collect()
    }

    #[test]
    fn test_sustained_a4_one_second() {
        let estimate = analyze_pitch(&sine(440.0, 48000, 48000, 0.5), 48000, &PitchConfig::default()).unwrap();
        assert_eq!(estimate.midi_note, 69);
        assert_eq!(estimate.note_name(), "A4");
        assert!(!estimate.stats.short_segment);
        assert!(estimate.stats.stability > 0.9, "stability {}", estimate.stats.stability);
        assert!(estimate.stats.pitch_std.is_some());
    }

    #[test]
    fn test_sustained_a4_48_ms() {
        // 2304 samples at 48 kHz: a short segment with plenty of signal
        let estimate = analyze_pitch(&sine(440.0, 48000, 2304, 0.5), 48000, &PitchConfig::default()).unwrap();
        assert_eq!(estimate.midi_note, 69);
        assert!(estimate.stats.short_segment);
        assert!(estimate.stats.stability > 0.8, "stability {}", estimate.stats.stability);
    }

    #[test]
    fn test_other_notes() {
        let config = PitchConfig::default();
        for (freq, expected) in [(110.0, 45u8), (261.63, 60), (523.25, 72), (987.77, 83)] {
            let estimate = analyze_pitch(&sine(freq, 44100, 22050, 0.4), 44100, &config).unwrap();
            assert_eq!(estimate.midi_note, expected, "{} Hz", freq);
        }
    }

    #[test]
    fn test_silence_has_no_pitch() {
        let result = analyze_pitch(&vec![0.0; 44100], 44100, &PitchConfig::default());
        match result {
            Err(PitchError::NoValidPitch { stats }) => {
                assert_eq!(stats.reason.as_deref(), Some(NO_VALID_PITCH));
                assert!(stats.frequencies().is_empty());
                assert!(!stats.short_segment);
            }
            other => panic!("expected NoValidPitch, got {:?}", other),
        }
    }

    #[test]
    fn test_quiet_short_slice_uses_relaxed_pass() {
        // Peak magnitudes stay well under 0.02, so only the relaxed pass accepts them
        let quiet = sine(440.0, 44100, 2000, 1.0e-5);
        let estimate = analyze_pitch(&quiet, 44100, &PitchConfig::default()).unwrap();
        assert!(estimate.stats.short_segment);
        assert!(estimate.stats.confidences().iter().all(|&c| c <= 0.02));
        assert_eq!(estimate.midi_note, 69);
        assert_eq!(
            estimate.stats.reason.as_deref(),
            Some("short segment: 2000 samples < 4410 samples")
        );
    }

    #[test]
    fn test_invalid_config_is_an_error_not_a_panic() {
        let tone = sine(440.0, 44100, 44100, 0.5);
        let nan_band = PitchConfig {
            fmin_hz: f32::NAN,
            ..PitchConfig::default()
        };
        assert!(matches!(
            analyze_pitch(&tone, 44100, &nan_band),
            Err(PitchError::InvalidConfig(_))
        ));

        let loose_peaks = PitchConfig {
            peak_threshold: 5.0,
            ..PitchConfig::default()
        };
        assert!(matches!(
            PitchAnalyzer::new(44100, loose_peaks),
            Err(PitchError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_quiet_long_slice_is_unpitched() {
        let quiet = sine(440.0, 44100, 44100, 1.0e-5);
        assert!(matches!(
            analyze_pitch(&quiet, 44100, &PitchConfig::default()),
            Err(PitchError::NoValidPitch { .. })
        ));
    }

    #[test]
    fn test_stats_invariants() {
        let config = PitchConfig::default();
        let inputs = [
            sine(440.0, 44100, 44100, 0.5),
            sine(200.0, 44100, 1000, 0.01),
            sine(1500.0, 22050, 3000, 0.9),
        ];
        for samples in &inputs {
            let stats = match analyze_pitch(samples, 44100, &config) {
                Ok(estimate) => estimate.stats,
                Err(PitchError::NoValidPitch { stats }) => stats,
                Err(e) => panic!("unexpected error {}", e),
            };
            assert_eq!(stats.frequencies().len(), stats.confidences().len());
            assert!((0.0..=1.0).contains(&stats.stability));
        }
    }

    #[test]
    fn test_stats_serialization_skips_absent_fields() {
        let json = serde_json::to_value(PitchStats::with_reason("out_of_range")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "frequencies": [],
                "confidences": [],
                "stability": 0.0,
                "reason": "out_of_range"
            })
        );
    }
}
