pub mod aggregator;
pub mod analysis_interface;
pub mod decoder;
pub mod fft;
pub mod frame_filter;
pub mod note;
pub mod pitch;

pub use aggregator::{aggregate, PitchSummary};
pub use analysis_interface::PitchEstimator;
pub use decoder::load_audio_file;
pub use fft::SpectralPeakTracker;
pub use frame_filter::{select_frames, FrameSelection};
pub use note::{frequency_to_midi, midi_to_note_name};
pub use pitch::{analyze_pitch, PitchAnalyzer, PitchEstimate, PitchStats};

/// Decoded mono audio shared read-only by every word of a run.
#[derive(Debug, Clone)]
pub struct AudioSegment {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// One analysis frame's strongest in-band peak.
///
/// `frequency == 0.0` means the frame had no peak in the vocal band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchFrame {
    pub frequency: f32,
    pub magnitude: f32,
}

impl PitchFrame {
    pub const SILENT: PitchFrame = PitchFrame {
        frequency: 0.0,
        magnitude: 0.0,
    };
}

impl AudioSegment {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Borrow the samples covering `[start_time, end_time)` seconds.
    ///
    /// Times are converted by truncation. Returns `None` when the range starts
    /// at or past the end of the buffer, ends past it, runs backwards, or is
    /// not a finite non-negative time.
    pub fn slice_for(&self, start_time: f64, end_time: f64) -> Option<&[f32]> {
        let start = self.time_to_sample(start_time)?;
        let end = self.time_to_sample(end_time)?;

        if start >= self.samples.len() || end > self.samples.len() || end < start {
            return None;
        }
        Some(&self.samples[start..end])
    }

    fn time_to_sample(&self, time: f64) -> Option<usize> {
        let position = time * self.sample_rate as f64;
        if !position.is_finite() || position < 0.0 {
            return None;
        }
        Some(position as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment() -> AudioSegment {
        AudioSegment::new(vec![0.0; 1000], 100)
    }

    #[test]
    fn test_slice_truncates_times() {
        let audio = segment();
        let slice = audio.slice_for(1.239, 2.5).unwrap();
        assert_eq!(slice.len(), 250 - 123);
    }

    #[test]
    fn test_slice_out_of_range() {
        let audio = segment();
        assert!(audio.slice_for(10.0, 10.5).is_none());
        assert!(audio.slice_for(9.0, 10.01).is_none());
        assert!(audio.slice_for(-1.0, 2.0).is_none());
        assert!(audio.slice_for(5.0, 4.0).is_none());
        assert!(audio.slice_for(f64::NAN, 4.0).is_none());
    }

    #[test]
    fn test_slice_zero_length_in_range() {
        let audio = segment();
        assert_eq!(audio.slice_for(3.0, 3.0).map(|s| s.len()), Some(0));
        // Ending exactly at the buffer end is allowed.
        assert_eq!(audio.slice_for(9.5, 10.0).map(|s| s.len()), Some(50));
    }

    #[test]
    fn test_duration() {
        assert!((segment().duration_seconds() - 10.0).abs() < 1e-12);
    }
}
