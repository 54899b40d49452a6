use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, TaggerError};

/// Tuning constants for the pitch pipeline.
///
/// The defaults are the values every run uses unless a JSON override is
/// supplied with `--config`. Fields missing from the JSON fall back to these
/// defaults.
///
/// # Parameter Groups
/// - **Framing**: `frame_size`, `hop_size` (samples)
/// - **Vocal band**: `fmin_hz`, `fmax_hz`
/// - **Peak picking**: `peak_threshold` (fraction of the frame maximum)
/// - **Frame filter**: `confidence_threshold`, `short_segment_divisor`
/// - **Stability**: `stability_spread` (relative spread mapped to zero)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchConfig {
    pub frame_size: usize,
    pub hop_size: usize,

    pub fmin_hz: f32,
    pub fmax_hz: f32,

    pub peak_threshold: f32,

    pub confidence_threshold: f32,
    /// A slice shorter than `sample_rate / short_segment_divisor` samples is a
    /// short segment (10 = 100 ms).
    pub short_segment_divisor: u32,

    pub stability_spread: f32,
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            frame_size: 2048,
            hop_size: 512,

            fmin_hz: 50.0,
            fmax_hz: 2000.0,

            peak_threshold: 0.1,

            confidence_threshold: 0.02,
            short_segment_divisor: 10,

            stability_spread: 0.1,
        }
    }
}

impl PitchConfig {
    /// Check that the constants describe a usable pipeline.
    pub fn validate(&self) -> Result<()> {
        self.check().map_err(TaggerError::InvalidConfig)
    }

    /// Same checks as [`validate`](Self::validate), with the bare message.
    pub(crate) fn check(&self) -> std::result::Result<(), String> {
        if self.frame_size < 4 {
            return Err(format!("frame_size must be at least 4, got {}", self.frame_size));
        }
        if self.hop_size == 0 {
            return Err("hop_size must be positive".to_string());
        }
        if !(self.fmin_hz >= 0.0 && self.fmin_hz < self.fmax_hz && self.fmax_hz.is_finite()) {
            return Err(format!(
                "vocal band must satisfy 0 <= fmin < fmax < inf, got [{}, {}]",
                self.fmin_hz, self.fmax_hz
            ));
        }
        if !(0.0..=1.0).contains(&self.peak_threshold) {
            return Err(format!(
                "peak_threshold must be in [0, 1], got {}",
                self.peak_threshold
            ));
        }
        if !(self.confidence_threshold >= 0.0 && self.confidence_threshold.is_finite()) {
            return Err(format!(
                "confidence_threshold must be finite and non-negative, got {}",
                self.confidence_threshold
            ));
        }
        if self.short_segment_divisor == 0 {
            return Err("short_segment_divisor must be positive".to_string());
        }
        if !(self.stability_spread > 0.0 && self.stability_spread.is_finite()) {
            return Err(format!(
                "stability_spread must be finite and positive, got {}",
                self.stability_spread
            ));
        }
        Ok(())
    }

    /// Load parameters from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| TaggerError::io("reading pitch config", e))?;
        let config: PitchConfig =
            serde_json::from_str(&json).map_err(|e| TaggerError::json("parsing pitch config", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Save parameters to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| TaggerError::json("serializing pitch config", e))?;
        std::fs::write(path, json).map_err(|e| TaggerError::io("writing pitch config", e))?;
        Ok(())
    }
}

/// Settings for a batch of words.
#[derive(Debug, Clone, Default)]
pub struct AnalyzerConfig {
    pub pitch: PitchConfig,
    /// Worker threads for the per-word pool; 0 uses one per core.
    pub threads: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(PitchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: PitchConfig = serde_json::from_str(r#"{ "hop_size": 256 }"#).unwrap();
        assert_eq!(config.hop_size, 256);
        assert_eq!(config.frame_size, 2048);
        assert_eq!(config.confidence_threshold, 0.02);
    }

    #[test]
    fn test_rejects_inverted_band() {
        let config = PitchConfig {
            fmin_hz: 3000.0,
            ..PitchConfig::default()
        };
        assert!(matches!(config.validate(), Err(TaggerError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_nan_band_edge() {
        let config = PitchConfig {
            fmin_hz: f32::NAN,
            ..PitchConfig::default()
        };
        assert!(matches!(config.validate(), Err(TaggerError::InvalidConfig(_))));

        let config = PitchConfig {
            fmax_hz: f32::INFINITY,
            ..PitchConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_peak_threshold_outside_unit_range() {
        for peak_threshold in [5.0, -0.1, f32::NAN] {
            let config = PitchConfig {
                peak_threshold,
                ..PitchConfig::default()
            };
            assert!(config.validate().is_err(), "accepted {}", peak_threshold);
        }
        let edge = PitchConfig {
            peak_threshold: 1.0,
            ..PitchConfig::default()
        };
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn test_rejects_negative_or_non_finite_confidence_threshold() {
        for confidence_threshold in [-1.0, f32::INFINITY, f32::NAN] {
            let config = PitchConfig {
                confidence_threshold,
                ..PitchConfig::default()
            };
            assert!(config.validate().is_err(), "accepted {}", confidence_threshold);
        }
        let zero = PitchConfig {
            confidence_threshold: 0.0,
            ..PitchConfig::default()
        };
        assert!(zero.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("pitch_config_{}.json", std::process::id()));
        let config = PitchConfig {
            frame_size: 1024,
            ..PitchConfig::default()
        };
        config.save(&path).unwrap();
        let loaded = PitchConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }
}
