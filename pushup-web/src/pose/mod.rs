//! Pose module - landmark validation and joint angles
//!
//! Re-exports only. All logic in submodules.

mod angles;
mod landmarks;

pub use angles::{angle_at, JointAngles};
pub use landmarks::{
    FrameError, FrameLayout, Landmark, PoseFrame,
    // Constants
    LANDMARK_COUNT, COUNTED_LANDMARKS, HIGHLIGHT_LANDMARKS, PUSHUP_SKELETON,
    NOSE, LEFT_SHOULDER, RIGHT_SHOULDER, LEFT_ELBOW, RIGHT_ELBOW, LEFT_WRIST, RIGHT_WRIST,
    LEFT_HIP, RIGHT_HIP, LEFT_KNEE, RIGHT_KNEE, LEFT_ANKLE, RIGHT_ANKLE,
};

#[cfg(test)]
pub(crate) use angles::tests::pose_with_angles;
