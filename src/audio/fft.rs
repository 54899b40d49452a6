use rustfft::{num_complex::Complex, FftPlanner};
use std::sync::Arc;

use super::PitchFrame;
use crate::config::PitchConfig;
use crate::error::PitchError;

/// Short-time spectral peak tracker restricted to the vocal band.
///
/// The slice is zero-padded by half a frame on each side so frame `t` is
/// centered on sample `t * hop_size`, which gives `1 + len / hop_size`
/// frames for any non-empty slice. Each frame is Hann-windowed, transformed,
/// and reduced to its strongest in-band local maximum, refined with
/// parabolic interpolation.
pub struct SpectralPeakTracker {
    sample_rate: u32,
    frame_size: usize,
    hop_size: usize,
    fft: Arc<dyn rustfft::Fft<f32>>,
    window: Vec<f32>,

    bin_hz: f32,
    fmin: f32,
    fmax: f32,
    peak_threshold: f32,

    // Candidate bins [first_bin, last_bin), each with both neighbours available
    first_bin: usize,
    last_bin: usize,
}

impl SpectralPeakTracker {
    pub fn new(sample_rate: u32, config: &PitchConfig) -> Result<Self, PitchError> {
        if sample_rate == 0 {
            return Err(PitchError::InvalidSampleRate(sample_rate));
        }

        let frame_size = config.frame_size.max(4);
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(frame_size);
        let window = Self::hann_window(frame_size);

        let bin_hz = sample_rate as f32 / frame_size as f32;
        let bin_count = frame_size / 2 + 1;
        let first_bin = ((config.fmin_hz / bin_hz).ceil() as usize).max(1);
        let last_bin = ((config.fmax_hz / bin_hz).ceil() as usize).min(bin_count - 1);

        Ok(Self {
            sample_rate,
            frame_size,
            hop_size: config.hop_size.max(1),
            fft,
            window,
            bin_hz,
            fmin: config.fmin_hz,
            fmax: config.fmax_hz,
            peak_threshold: config.peak_threshold,
            first_bin,
            last_bin,
        })
    }

    // Periodic Hann, the usual choice for STFT analysis
    fn hann_window(size: usize) -> Vec<f32> {
        (0..size)
            .map(|i| {
                let phase = 2.0 * std::f32::consts::PI * i as f32 / size as f32;
                0.5 * (1.0 - phase.cos())
            })
            .collect()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn frame_count(&self, sample_count: usize) -> usize {
        if sample_count == 0 {
            0
        } else {
            1 + sample_count / self.hop_size
        }
    }

    /// Produce one [`PitchFrame`] per analysis frame of `samples`.
    pub fn track(&self, samples: &[f32]) -> Result<Vec<PitchFrame>, PitchError> {
        if samples.is_empty() {
            return Err(PitchError::EmptySegment);
        }
        if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
            return Err(PitchError::NonFiniteSample { index });
        }

        let frame_count = self.frame_count(samples.len());
        let mut buffer = vec![Complex::new(0.0f32, 0.0); self.frame_size];
        let mut scratch = vec![Complex::new(0.0f32, 0.0); self.fft.get_inplace_scratch_len()];
        let mut spectrum = vec![0.0f32; self.frame_size / 2 + 1];

        let frames = (0..frame_count)
            .map(|t| {
                self.load_frame(samples, t, &mut buffer);
                self.fft.process_with_scratch(&mut buffer, &mut scratch);
                for (magnitude, bin) in spectrum.iter_mut().zip(buffer.iter()) {
                    *magnitude = bin.norm();
                }
                self.pick_peak(&spectrum)
            })
            .collect();

        Ok(frames)
    }

    fn load_frame(&self, samples: &[f32], frame_index: usize, buffer: &mut [Complex<f32>]) {
        let center = frame_index * self.hop_size;
        let half = self.frame_size / 2;

        for (i, slot) in buffer.iter_mut().enumerate() {
            // Position relative to the unpadded slice
            let value = (center + i)
                .checked_sub(half)
                .and_then(|pos| samples.get(pos))
                .map_or(0.0, |&s| s * self.window[i]);
            *slot = Complex::new(value, 0.0);
        }
    }

    fn pick_peak(&self, spectrum: &[f32]) -> PitchFrame {
        let frame_max = spectrum.iter().fold(0.0f32, |a, &b| a.max(b));
        let floor = self.peak_threshold * frame_max;

        let mut best = PitchFrame::SILENT;
        for k in self.first_bin..self.last_bin {
            let (prev, current, next) = (spectrum[k - 1], spectrum[k], spectrum[k + 1]);
            if !(current > prev && current >= next && current > floor) {
                continue;
            }

            let slope = 0.5 * (next - prev);
            let curvature = 2.0 * current - prev - next;
            let shift = if curvature > 0.0 {
                (slope / curvature).clamp(-0.5, 0.5)
            } else {
                0.0
            };
            let magnitude = current + 0.5 * slope * shift;

            if magnitude > best.magnitude {
                best = PitchFrame {
                    frequency: ((k as f32 + shift) * self.bin_hz).clamp(self.fmin, self.fmax),
                    magnitude,
                };
            }
        }
        best
    }
}
