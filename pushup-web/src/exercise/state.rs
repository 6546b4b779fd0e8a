//! Repetition phases and elbow-angle zones

use serde::Serialize;

use super::config::CounterConfig;

/// Phase of the current repetition
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RepState {
    /// No rep in progress
    #[default]
    Ready,
    /// Bent-arm phase confirmed
    Down,
    /// Rep just completed, waiting to fall back to `Ready`
    Up,
}

impl RepState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepState::Ready => "ready",
            RepState::Down => "down",
            RepState::Up => "up",
        }
    }
}

/// Where the averaged elbow angle sits relative to the two thresholds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleZone {
    Bent,
    Middle,
    Extended,
}

impl AngleZone {
    pub fn classify(elbow_angle: f32, config: &CounterConfig) -> Self {
        if elbow_angle < config.elbow_down_threshold {
            AngleZone::Bent
        } else if elbow_angle > config.elbow_up_threshold {
            AngleZone::Extended
        } else {
            AngleZone::Middle
        }
    }

    /// Overlay colour for this zone
    pub fn color(&self) -> &'static str {
        match self {
            AngleZone::Bent => "#FF0000",
            AngleZone::Middle => "#FFFF00",
            AngleZone::Extended => "#00FF00",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_boundaries_are_exclusive() {
        let config = CounterConfig::default();
        assert_eq!(AngleZone::classify(114.9, &config), AngleZone::Bent);
        assert_eq!(AngleZone::classify(115.0, &config), AngleZone::Middle);
        assert_eq!(AngleZone::classify(155.0, &config), AngleZone::Middle);
        assert_eq!(AngleZone::classify(155.1, &config), AngleZone::Extended);
    }

    #[test]
    fn test_state_names() {
        assert_eq!(RepState::default(), RepState::Ready);
        assert_eq!(RepState::Down.as_str(), "down");
        assert_eq!(RepState::Up.as_str(), "up");
    }
}
