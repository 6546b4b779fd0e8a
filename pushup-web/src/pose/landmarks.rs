//! Pose landmark records and input validation
//!
//! MediaPipe hands us a flat Float32Array per frame. It is checked once
//! here and turned into a fixed-shape `PoseFrame`; nothing downstream
//! re-validates coordinates.

use thiserror::Error;

// ============================================================================
// LANDMARK INDICES (MediaPipe Pose - 33 total)
// ============================================================================

pub const LANDMARK_COUNT: usize = 33;

pub const NOSE: usize = 0;
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_ELBOW: usize = 13;
pub const RIGHT_ELBOW: usize = 14;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;
pub const LEFT_KNEE: usize = 25;
pub const RIGHT_KNEE: usize = 26;
pub const LEFT_ANKLE: usize = 27;
pub const RIGHT_ANKLE: usize = 28;

/// Landmarks the angle extractor reads; these must carry finite coordinates
pub const COUNTED_LANDMARKS: [usize; 10] = [
    LEFT_SHOULDER, RIGHT_SHOULDER,
    LEFT_ELBOW, RIGHT_ELBOW,
    LEFT_WRIST, RIGHT_WRIST,
    LEFT_HIP, RIGHT_HIP,
    LEFT_KNEE, RIGHT_KNEE,
];

/// Landmarks drawn with a larger radius (side-view push-up joints)
pub const HIGHLIGHT_LANDMARKS: [usize; 4] = [LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST, LEFT_HIP];

/// Skeleton connections used by the push-up check (pairs of landmark indices)
pub const PUSHUP_SKELETON: [(usize, usize); 12] = [
    (LEFT_SHOULDER, RIGHT_SHOULDER),
    (LEFT_SHOULDER, LEFT_ELBOW),
    (LEFT_ELBOW, LEFT_WRIST),
    (RIGHT_SHOULDER, RIGHT_ELBOW),
    (RIGHT_ELBOW, RIGHT_WRIST),
    (LEFT_SHOULDER, LEFT_HIP),
    (RIGHT_SHOULDER, RIGHT_HIP),
    (LEFT_HIP, RIGHT_HIP),
    (LEFT_HIP, LEFT_KNEE),
    (RIGHT_HIP, RIGHT_KNEE),
    (LEFT_KNEE, LEFT_ANKLE),
    (RIGHT_KNEE, RIGHT_ANKLE),
];

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// A single landmark point (normalized coordinates)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,  // 0-1 normalized
    pub y: f32,  // 0-1 normalized
    pub z: f32,  // Relative depth
    /// Model confidence, 1.0 when the buffer has none. Carried through
    /// as received; the counter does not gate on it.
    pub visibility: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, visibility: 1.0 }
    }

    /// Image-plane position, the only part the angle math uses
    pub fn xy(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// How many floats describe one landmark in the incoming buffer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameLayout {
    /// x, y, z
    Xyz,
    /// x, y, z, visibility
    XyzVisibility,
}

impl FrameLayout {
    pub fn values_per_landmark(self) -> usize {
        match self {
            FrameLayout::Xyz => 3,
            FrameLayout::XyzVisibility => 4,
        }
    }

    /// Floats needed for one detected body
    pub fn stride(self) -> usize {
        LANDMARK_COUNT * self.values_per_landmark()
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum FrameError {
    #[error("invalid landmark data length: {len} (expected a multiple of {stride})")]
    BadLength { len: usize, stride: usize },
    #[error("landmark {index} has non-finite coordinates")]
    NonFinite { index: usize },
}

/// One validated body: all 33 landmarks of the first detected pose
#[derive(Clone, Debug, PartialEq)]
pub struct PoseFrame {
    landmarks: [Landmark; LANDMARK_COUNT],
}

impl PoseFrame {
    pub fn from_landmarks(landmarks: [Landmark; LANDMARK_COUNT]) -> Result<Self, FrameError> {
        if let Some(&index) = COUNTED_LANDMARKS.iter().find(|&&i| !landmarks[i].is_finite()) {
            return Err(FrameError::NonFinite { index });
        }
        Ok(Self { landmarks })
    }

    /// Parse a flat buffer of zero or more bodies.
    ///
    /// An empty buffer means the model saw nobody and yields `Ok(None)`.
    /// When several bodies are batched only the first one is kept.
    pub fn from_flat(data: &[f32], layout: FrameLayout) -> Result<Option<Self>, FrameError> {
        if data.is_empty() {
            return Ok(None);
        }

        let stride = layout.stride();
        if data.len() % stride != 0 {
            return Err(FrameError::BadLength { len: data.len(), stride });
        }

        let per = layout.values_per_landmark();
        let mut landmarks = [Landmark::default(); LANDMARK_COUNT];
        for (i, chunk) in data[..stride].chunks_exact(per).enumerate() {
            landmarks[i] = Landmark {
                x: chunk[0],
                y: chunk[1],
                z: chunk[2],
                visibility: if per == 4 { chunk[3] } else { 1.0 },
            };
        }

        Self::from_landmarks(landmarks).map(Some)
    }

    pub fn landmark(&self, index: usize) -> Landmark {
        self.landmarks[index]
    }

    pub fn landmarks(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.landmarks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_body(offset: f32) -> Vec<f32> {
        (0..LANDMARK_COUNT)
            .flat_map(|i| [offset + i as f32 * 0.01, 0.5, 0.0])
            .collect()
    }

    #[test]
    fn test_empty_buffer_is_no_body() {
        assert_eq!(PoseFrame::from_flat(&[], FrameLayout::Xyz), Ok(None));
    }

    #[test]
    fn test_parses_single_body() {
        let frame = PoseFrame::from_flat(&flat_body(0.0), FrameLayout::Xyz)
            .unwrap()
            .unwrap();
        let elbow = frame.landmark(LEFT_ELBOW);
        assert!((elbow.x - 0.13).abs() < 1e-6);
        assert_eq!(elbow.visibility, 1.0);
    }

    #[test]
    fn test_batch_keeps_first_body() {
        let mut data = flat_body(0.0);
        data.extend(flat_body(0.4));
        let frame = PoseFrame::from_flat(&data, FrameLayout::Xyz).unwrap().unwrap();
        assert!((frame.landmark(NOSE).x - 0.0).abs() < 1e-6);
    }

    #[test]
    fn test_visibility_layout() {
        let data: Vec<f32> = (0..LANDMARK_COUNT).flat_map(|_| [0.1, 0.2, 0.3, 0.7]).collect();
        let frame = PoseFrame::from_flat(&data, FrameLayout::XyzVisibility)
            .unwrap()
            .unwrap();
        assert_eq!(frame.landmark(RIGHT_KNEE).visibility, 0.7);
    }

    #[test]
    fn test_rejects_bad_length() {
        let err = PoseFrame::from_flat(&[0.0; 98], FrameLayout::Xyz).unwrap_err();
        assert_eq!(err, FrameError::BadLength { len: 98, stride: 99 });
    }

    #[test]
    fn test_rejects_non_finite_counted_landmark() {
        let mut data = flat_body(0.0);
        data[RIGHT_WRIST * 3 + 1] = f32::NAN;
        let err = PoseFrame::from_flat(&data, FrameLayout::Xyz).unwrap_err();
        assert_eq!(err, FrameError::NonFinite { index: RIGHT_WRIST });
    }

    #[test]
    fn test_ignores_non_finite_unused_landmark() {
        let mut data = flat_body(0.0);
        data[NOSE * 3] = f32::INFINITY;
        assert!(PoseFrame::from_flat(&data, FrameLayout::Xyz).unwrap().is_some());
    }
}
