use super::PitchFrame;

/// Mean frequency and spread of the frames accepted for one slice.
#[derive(Debug, Clone, PartialEq)]
pub struct PitchSummary {
    pub mean_frequency: f32,
    /// Population standard deviation; `None` for a single frame.
    pub std_dev: Option<f32>,
    /// 1.0 for a perfectly steady pitch, 0.0 at `stability_spread` relative
    /// deviation or worse.
    pub stability: f32,
}

/// Reduce accepted frames to one representative frequency.
///
/// Returns `None` for an empty set. A single frame gets stability 0 since
/// there is nothing to measure steadiness against.
pub fn aggregate(frames: &[PitchFrame], stability_spread: f32) -> Option<PitchSummary> {
    if frames.is_empty() {
        return None;
    }

    // Accumulate in f64 so long slices don't drift
    let count = frames.len() as f64;
    let mean = frames.iter().map(|f| f.frequency as f64).sum::<f64>() / count;

    if frames.len() == 1 {
        return Some(PitchSummary {
            mean_frequency: mean as f32,
            std_dev: None,
            stability: 0.0,
        });
    }

    let variance = frames
        .iter()
        .map(|f| (f.frequency as f64 - mean).powi(2))
        .sum::<f64>()
        / count;
    let std_dev = variance.sqrt();

    Some(PitchSummary {
        mean_frequency: mean as f32,
        std_dev: Some(std_dev as f32),
        stability: stability_score(std_dev, mean, stability_spread as f64),
    })
}

fn stability_score(std_dev: f64, mean: f64, spread: f64) -> f32 {
    if mean <= 0.0 || spread <= 0.0 {
        return 0.0;
    }
    let score = 1.0 - (std_dev / mean) / spread;
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 1.0) as f32
}
