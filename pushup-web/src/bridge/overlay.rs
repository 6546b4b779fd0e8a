//! Debug overlay text
//!
//! The lines drawn over the video: angles, phase, debounce progress,
//! posture and the target thresholds.

use wasm_bindgen::prelude::*;

use super::session::with_counter;
use crate::exercise::{CounterConfig, CounterSnapshot};

pub(crate) fn format_overlay(snap: &CounterSnapshot, config: &CounterConfig) -> String {
    let posture = match snap.body_aligned {
        Some(true) => "good ✓",
        Some(false) => "needs correction",
        None => "-",
    };

    format!(
        "Elbow: L {:.0}° | R {:.0}° | Avg {:.0}°\n\
         Torso: {:.0}° | State: {}\n\
         DOWN: {}/{} | UP: {}/{}\n\
         Posture: {} ({:.0}° required)\n\
         Target: bend < {:.0}° | extend > {:.0}°",
        snap.left_elbow, snap.right_elbow, snap.avg_elbow,
        snap.torso, snap.state.as_str().to_uppercase(),
        snap.down_frames, config.frame_threshold,
        snap.up_frames, config.frame_threshold,
        posture, config.body_alignment_min,
        config.elbow_down_threshold, config.elbow_up_threshold,
    )
}

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Get formatted overlay text (called from JS each frame)
#[wasm_bindgen]
pub fn get_debug_overlay_text() -> String {
    with_counter(|counter| format_overlay(&counter.snapshot(), counter.config()))
}

/// Colour for the threshold line: red = bent, yellow = between, green = extended
#[wasm_bindgen]
pub fn get_zone_color() -> String {
    with_counter(|counter| {
        counter
            .snapshot()
            .zone
            .map_or("#FFFFFF", |zone| zone.color())
            .to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::RepCounter;
    use crate::pose::JointAngles;

    #[test]
    fn test_overlay_before_first_frame() {
        let counter = RepCounter::default();
        let text = format_overlay(&counter.snapshot(), counter.config());
        assert!(text.contains("State: READY"));
        assert!(text.contains("DOWN: 0/3 | UP: 0/3"));
        assert!(text.contains("Posture: -"));
        assert!(text.contains("bend < 115° | extend > 155°"));
    }

    #[test]
    fn test_overlay_tracks_debounce() {
        let mut counter = RepCounter::default();
        for _ in 0..2 {
            counter.evaluate_angles(JointAngles {
                left_elbow: 100.0,
                right_elbow: 110.0,
                left_body: 100.0,
                right_body: 110.0,
            });
        }
        let text = format_overlay(&counter.snapshot(), counter.config());
        assert!(text.starts_with("Elbow: L 100° | R 110° | Avg 105°"));
        assert!(text.contains("DOWN: 2/3"));
        assert!(text.contains("Posture: needs correction (120° required)"));
    }
}
