use super::PitchFrame;

/// Frames accepted for aggregation, and which pass accepted them.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSelection {
    pub frames: Vec<PitchFrame>,
    /// True when the confidence threshold was dropped for a short slice.
    pub relaxed: bool,
}

impl FrameSelection {
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Keep frames with a positive frequency and a magnitude above
/// `confidence_threshold`.
///
/// When nothing qualifies and the slice is a short segment, a second pass
/// keeps every frame with a positive frequency regardless of magnitude.
/// Short words rarely produce confident frames, so without this pass they
/// would systematically come back unpitched.
pub fn select_frames(
    frames: &[PitchFrame],
    confidence_threshold: f32,
    short_segment: bool,
) -> FrameSelection {
    let confident: Vec<PitchFrame> = frames
        .iter()
        .filter(|f| f.frequency > 0.0 && f.magnitude > confidence_threshold)
        .copied()
        .collect();

    if !confident.is_empty() || !short_segment {
        return FrameSelection {
            frames: confident,
            relaxed: false,
        };
    }

    FrameSelection {
        frames: frames.iter().filter(|f| f.frequency > 0.0).copied().collect(),
        relaxed: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(frequency: f32, magnitude: f32) -> PitchFrame {
        PitchFrame {
            frequency,
            magnitude,
        }
    }

    #[test]
    fn test_primary_pass_filters_weak_frames() {
        let frames = [frame(440.0, 0.5), frame(441.0, 0.01), frame(0.0, 0.9)];
        let selection = select_frames(&frames, 0.02, false);
        assert_eq!(selection.frames, vec![frame(440.0, 0.5)]);
        assert!(!selection.relaxed);
    }

    #[test]
    fn test_threshold_is_strict() {
        let selection = select_frames(&[frame(440.0, 0.02)], 0.02, false);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_short_segment_relaxes() {
        let frames = [frame(220.0, 0.01), frame(0.0, 0.0), frame(221.0, 0.005)];
        let selection = select_frames(&frames, 0.02, true);
        assert!(selection.relaxed);
        assert_eq!(selection.frames, vec![frame(220.0, 0.01), frame(221.0, 0.005)]);
    }

    #[test]
    fn test_long_segment_never_relaxes() {
        let frames = [frame(220.0, 0.01)];
        let selection = select_frames(&frames, 0.02, false);
        assert!(selection.is_empty());
        assert!(!selection.relaxed);
    }

    #[test]
    fn test_relaxed_pass_can_still_be_empty() {
        let selection = select_frames(&[PitchFrame::SILENT; 3], 0.02, true);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_confident_frames_skip_relaxed_pass() {
        let frames = [frame(300.0, 0.5), frame(310.0, 0.001)];
        let selection = select_frames(&frames, 0.02, true);
        assert!(!selection.relaxed);
        assert_eq!(selection.frames.len(), 1);
    }
}
