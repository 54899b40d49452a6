use super::{PitchAnalyzer, PitchEstimate};
use crate::error::PitchError;

/// Common interface for anything that turns one word's samples into a note.
///
/// The word analyzer only talks to this trait, so the spectral pipeline can
/// be swapped (or stubbed in tests) without touching per-word orchestration.
///
/// # Implementation Requirements
/// - Must be shareable across worker threads (`Sync`); `estimate` takes
///   `&self` and is called concurrently for different words
/// - Must not keep state between calls: the same slice gives the same result
/// - "No pitch" is reported as [`PitchError::NoValidPitch`], not as a note
///
/// # Available Implementations
/// - [`PitchAnalyzer`]: STFT peak tracking with confidence filtering
pub trait PitchEstimator: Sync {
    /// Estimate the note of one slice of mono samples.
    ///
    /// # Errors
    /// `NoValidPitch` when no frame qualifies, or a failure variant for input
    /// the pipeline cannot process (empty slice, non-finite samples).
    fn estimate(&self, samples: &[f32]) -> Result<PitchEstimate, PitchError>;

    /// Slices shorter than this are short segments.
    fn min_samples(&self) -> usize;
}

impl PitchEstimator for PitchAnalyzer {
    fn estimate(&self, samples: &[f32]) -> Result<PitchEstimate, PitchError> {
        self.analyze(samples)
    }

    fn min_samples(&self) -> usize {
        PitchAnalyzer::min_samples(self)
    }
}
