//! Joint angle calculation using dot product
//!
//! Every angle here is the interior angle at a vertex joint between the
//! two segments running out to its neighbours (e.g. elbow→shoulder and
//! elbow→wrist).

use super::landmarks::{
    PoseFrame, LEFT_ELBOW, LEFT_HIP, LEFT_KNEE, LEFT_SHOULDER, LEFT_WRIST, RIGHT_ELBOW,
    RIGHT_HIP, RIGHT_KNEE, RIGHT_SHOULDER, RIGHT_WRIST,
};

/// Segments shorter than this (normalized units) have no usable direction
const MIN_SEGMENT_LENGTH: f64 = 0.0001;

/// Interior angle at `vertex` in degrees, in [0, 180].
///
/// Uses dot product formula: cos(θ) = (v1 · v2) / (|v1| × |v2|)
///
/// Computed in f64 on unit vectors, so any finite input gives a finite
/// result. `None` when either segment collapses to a point.
pub fn angle_at(vertex: (f32, f32), a: (f32, f32), b: (f32, f32)) -> Option<f32> {
    let v1 = (f64::from(a.0) - f64::from(vertex.0), f64::from(a.1) - f64::from(vertex.1));
    let v2 = (f64::from(b.0) - f64::from(vertex.0), f64::from(b.1) - f64::from(vertex.1));

    let mag1 = v1.0.hypot(v1.1);
    let mag2 = v2.0.hypot(v2.1);

    if !(mag1 >= MIN_SEGMENT_LENGTH && mag2 >= MIN_SEGMENT_LENGTH) {
        return None;
    }
    if !(mag1.is_finite() && mag2.is_finite()) {
        return None;
    }

    // Unit vectors keep the dot product within ±1 up to rounding
    let u1 = (v1.0 / mag1, v1.1 / mag1);
    let u2 = (v2.0 / mag2, v2.1 / mag2);
    let cos_angle = u1.0 * u2.0 + u1.1 * u2.1;
    if !cos_angle.is_finite() {
        return None;
    }

    Some(cos_angle.clamp(-1.0, 1.0).acos().to_degrees() as f32)
}

/// The four joint angles the push-up check reads from one frame
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct JointAngles {
    /// shoulder–elbow–wrist, 90° = bent, 180° = straight
    pub left_elbow: f32,
    pub right_elbow: f32,
    /// shoulder–hip–knee, 180° = body in a straight line
    pub left_body: f32,
    pub right_body: f32,
}

impl JointAngles {
    /// Compute all four angles, or `None` if any of them is degenerate
    pub fn extract(frame: &PoseFrame) -> Option<Self> {
        let at = |a: usize, vertex: usize, b: usize| {
            angle_at(
                frame.landmark(vertex).xy(),
                frame.landmark(a).xy(),
                frame.landmark(b).xy(),
            )
        };

        Some(Self {
            left_elbow: at(LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST)?,
            right_elbow: at(RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST)?,
            left_body: at(LEFT_SHOULDER, LEFT_HIP, LEFT_KNEE)?,
            right_body: at(RIGHT_SHOULDER, RIGHT_HIP, RIGHT_KNEE)?,
        })
    }

    /// Both elbows averaged; one jittery arm moves this half as much
    pub fn avg_elbow(&self) -> f32 {
        (self.left_elbow + self.right_elbow) / 2.0
    }

    pub fn avg_body(&self) -> f32 {
        (self.left_body + self.right_body) / 2.0
    }

    /// Every angle is a real number within [0, 180]
    pub fn is_valid(&self) -> bool {
        [self.left_elbow, self.right_elbow, self.left_body, self.right_body]
            .iter()
            .all(|a| (0.0..=180.0).contains(a))
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn point(range: std::ops::Range<f32>) -> impl Strategy<Value = (f32, f32)> {
        (range.clone(), range)
    }

    fn any_finite() -> impl Strategy<Value = (f32, f32)> {
        (prop::num::f32::NORMAL | prop::num::f32::ZERO, prop::num::f32::NORMAL | prop::num::f32::ZERO)
    }

    proptest! {
        #[test]
        fn prop_angle_in_range_for_normalized_points(
            v in point(0.0..1.0), a in point(0.0..1.0), b in point(0.0..1.0)
        ) {
            if let Some(angle) = angle_at(v, a, b) {
                prop_assert!((0.0..=180.0).contains(&angle), "{}", angle);
            }
        }

        #[test]
        fn prop_angle_in_range_for_any_finite_points(
            v in any_finite(), a in any_finite(), b in any_finite()
        ) {
            if let Some(angle) = angle_at(v, a, b) {
                prop_assert!((0.0..=180.0).contains(&angle), "{}", angle);
            }
        }

        #[test]
        fn prop_non_degenerate_points_always_give_an_angle(
            v in point(-1e30..1e30), a in point(-1e30..1e30), b in point(-1e30..1e30)
        ) {
            let len = |p: (f32, f32)| {
                (f64::from(p.0) - f64::from(v.0)).hypot(f64::from(p.1) - f64::from(v.1))
            };
            prop_assume!(len(a) >= 1e-3 && len(b) >= 1e-3);
            let angle = angle_at(v, a, b);
            prop_assert!(angle.is_some());
            prop_assert!(angle.is_some_and(|x| (0.0..=180.0).contains(&x)));
        }

        #[test]
        fn prop_endpoint_order_does_not_matter(
            v in any_finite(), a in any_finite(), b in any_finite()
        ) {
            prop_assert_eq!(angle_at(v, a, b), angle_at(v, b, a));
        }

        #[test]
        fn prop_tiny_segments_are_symmetric(
            v in point(0.0..1.0),
            da in point(-1e-3..1e-3),
            db in point(-1e-3..1e-3)
        ) {
            let a = (v.0 + da.0, v.1 + da.1);
            let b = (v.0 + db.0, v.1 + db.1);
            prop_assert_eq!(angle_at(v, a, b), angle_at(v, b, a));
        }
    }
}
