//! Counter tuning - every threshold the state machine compares against

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("elbow down threshold {down}° must be below elbow up threshold {up}°")]
    ThresholdOrder { down: f32, up: f32 },
    #[error("{name} must be within [0, 180], got {value}")]
    AngleOutOfRange { name: &'static str, value: f32 },
    #[error("frame threshold must be at least 1")]
    ZeroFrameThreshold,
    #[error("diagnostic sample rate must be within [0, 1], got {0}")]
    SampleRate(f32),
    #[error("invalid counter config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Thresholds and timings for one exercise session.
///
/// Deserializes from a partial camelCase JSON object; missing fields keep
/// their default.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CounterConfig {
    /// Averaged elbow angle below which the arms count as bent (degrees)
    pub elbow_down_threshold: f32,
    /// Averaged elbow angle above which the arms count as extended (degrees)
    pub elbow_up_threshold: f32,
    /// Torso angle at or below this gets a posture warning (degrees)
    pub body_alignment_min: f32,
    /// Consecutive qualifying frames before a transition commits
    pub frame_threshold: u32,
    /// Required swing from the deepest bend to the extended reading (degrees)
    pub min_angle_delta: f32,
    /// Delay before `up` falls back to `ready`
    pub return_delay_ms: u32,
    /// Fraction of frames that get a diagnostic log line
    pub diagnostic_sample_rate: f32,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            elbow_down_threshold: 115.0,
            elbow_up_threshold: 155.0,
            body_alignment_min: 120.0,
            frame_threshold: 3,
            min_angle_delta: 45.0,
            return_delay_ms: 500,
            diagnostic_sample_rate: 0.1,
        }
    }
}

impl CounterConfig {
    /// Deeper bend, fuller lockout, longer debounce
    pub fn strict() -> Self {
        Self {
            elbow_down_threshold: 100.0,
            elbow_up_threshold: 160.0,
            body_alignment_min: 150.0,
            frame_threshold: 4,
            min_angle_delta: 55.0,
            ..Self::default()
        }
    }

    /// Forgiving preset for beginners or noisy cameras
    pub fn lenient() -> Self {
        Self {
            elbow_down_threshold: 125.0,
            elbow_up_threshold: 150.0,
            body_alignment_min: 110.0,
            frame_threshold: 2,
            min_angle_delta: 30.0,
            ..Self::default()
        }
    }

    /// Parse a (possibly partial) JSON object and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let angles = [
            ("elbowDownThreshold", self.elbow_down_threshold),
            ("elbowUpThreshold", self.elbow_up_threshold),
            ("bodyAlignmentMin", self.body_alignment_min),
            ("minAngleDelta", self.min_angle_delta),
        ];
        for (name, value) in angles {
            if !(0.0..=180.0).contains(&value) {
                return Err(ConfigError::AngleOutOfRange { name, value });
            }
        }

        if self.elbow_down_threshold >= self.elbow_up_threshold {
            return Err(ConfigError::ThresholdOrder {
                down: self.elbow_down_threshold,
                up: self.elbow_up_threshold,
            });
        }

        if self.frame_threshold == 0 {
            return Err(ConfigError::ZeroFrameThreshold);
        }

        if !(0.0..=1.0).contains(&self.diagnostic_sample_rate) {
            return Err(ConfigError::SampleRate(self.diagnostic_sample_rate));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for config in [CounterConfig::default(), CounterConfig::strict(), CounterConfig::lenient()] {
            assert!(config.validate().is_ok(), "{config:?}");
        }
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = CounterConfig::from_json(r#"{"frameThreshold": 5, "returnDelayMs": 800}"#).unwrap();
        assert_eq!(config.frame_threshold, 5);
        assert_eq!(config.return_delay_ms, 800);
        assert_eq!(config.elbow_down_threshold, 115.0);
        assert_eq!(config.min_angle_delta, 45.0);
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        let err = CounterConfig::from_json(r#"{"elbowDownThreshold": 160}"#).unwrap_err();
        assert!(matches!(err, ConfigError::ThresholdOrder { .. }));
    }

    #[test]
    fn test_rejects_zero_frame_threshold() {
        let config = CounterConfig {
            frame_threshold: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroFrameThreshold)));
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let config = CounterConfig {
            min_angle_delta: 200.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::AngleOutOfRange { name: "minAngleDelta", .. })
        ));

        let config = CounterConfig {
            elbow_up_threshold: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::AngleOutOfRange { .. })));

        let config = CounterConfig {
            diagnostic_sample_rate: 1.5,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::SampleRate(_))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            CounterConfig::from_json("{frameThreshold: 3"),
            Err(ConfigError::Parse(_))
        ));
    }
}
