//! User-facing feedback messages
//!
//! The state machine picks a `Feedback` variant; the text is only produced
//! when the UI asks for it.

use std::fmt;

/// Failures of the collaborators that feed the counter.
///
/// These never reach the state machine's phase logic; they only replace the
/// feedback line so the user knows why nothing is being counted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollaboratorFailure {
    /// Pose model failed to load
    ModelInitialization,
    /// Camera missing or permission denied
    CameraPermission,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Feedback {
    #[default]
    None,
    /// Bending, but not yet confirmed as `down`
    GoLower { angle: f32 },
    RiseNow,
    KeepRising { angle: f32 },
    /// Arms extended without enough swing from the deepest bend
    InsufficientRange { change: f32, required: f32 },
    RepCompleted,
    StraightenBody,
    AssumePosition,
    BodyNotVisible,
    ModelUnavailable,
    CameraUnavailable,
}

impl From<CollaboratorFailure> for Feedback {
    fn from(failure: CollaboratorFailure) -> Self {
        match failure {
            CollaboratorFailure::ModelInitialization => Feedback::ModelUnavailable,
            CollaboratorFailure::CameraPermission => Feedback::CameraUnavailable,
        }
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::None => Ok(()),
            Feedback::GoLower { angle } => write!(f, "Go lower ({angle:.0}°)"),
            Feedback::RiseNow => f.write_str("💪 Good! Now push back up"),
            Feedback::KeepRising { angle } => write!(f, "Keep rising ({angle:.0}°)"),
            Feedback::InsufficientRange { change, required } => {
                write!(f, "Not enough range of motion ({change:.0}° / {required:.0}° needed)")
            }
            Feedback::RepCompleted => f.write_str("🎉 Perfect!"),
            Feedback::StraightenBody => f.write_str("⚠️ Keep your body in a straight line"),
            Feedback::AssumePosition => f.write_str("Get into push-up position"),
            Feedback::BodyNotVisible => {
                f.write_str("Make sure your whole body is visible (side view)")
            }
            Feedback::ModelUnavailable => f.write_str("Failed to load the pose model"),
            Feedback::CameraUnavailable => f.write_str("Camera permission is required"),
        }
    }
}
