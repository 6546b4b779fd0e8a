//! Push-up repetition state machine
//!
//! Turns the averaged elbow and torso angles of each frame into a debounced
//! phase and a rep count. One call per video frame, nothing blocks.

use serde::Serialize;

use super::config::CounterConfig;
use super::feedback::{CollaboratorFailure, Feedback};
use super::schedule::{PendingReturn, ReturnTicket, ScheduledReturn};
use super::state::{AngleZone, RepState};
use crate::pose::{JointAngles, PoseFrame};

/// What happened to a single frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Counter is stopped; nothing was touched
    Stopped,
    /// No body in the frame; state frozen
    NoBody,
    /// A joint collapsed to a point; the frame's angles were discarded
    Degenerate,
    Evaluated,
}

/// Result of one `evaluate` call, including timer work for the driver
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Evaluation {
    pub outcome: FrameOutcome,
    pub rep_completed: bool,
    /// Arm a timer that redeems this ticket
    pub scheduled: Option<ScheduledReturn>,
    /// Clear the timer holding this ticket; it will no longer be honoured
    pub superseded: Option<ReturnTicket>,
}

impl Evaluation {
    fn new(outcome: FrameOutcome) -> Self {
        Self {
            outcome,
            rep_completed: false,
            scheduled: None,
            superseded: None,
        }
    }
}

/// Everything the UI shows after a frame
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterSnapshot {
    pub count: u32,
    pub state: RepState,
    pub feedback: String,
    pub left_elbow: f32,
    pub right_elbow: f32,
    pub avg_elbow: f32,
    pub torso: f32,
    /// `None` until the first evaluable frame
    pub zone: Option<AngleZone>,
    pub body_aligned: Option<bool>,
    pub down_frames: u32,
    pub up_frames: u32,
    pub extremum: f32,
    pub return_pending: bool,
    pub running: bool,
}

pub struct RepCounter {
    config: CounterConfig,
    state: RepState,
    /// Completed reps since the last reset
    count: u32,
    /// Consecutive frames below the down threshold
    down_frames: u32,
    /// Consecutive frames above the up threshold while `Down`
    up_frames: u32,
    /// Deepest elbow angle since entering `Down`, 0 otherwise
    extremum: f32,
    feedback: Feedback,
    /// Last non-degenerate angles, kept for display
    angles: Option<JointAngles>,
    running: bool,
    pending: PendingReturn,
}

impl RepCounter {
    pub fn new(config: CounterConfig) -> Self {
        Self {
            config,
            state: RepState::Ready,
            count: 0,
            down_frames: 0,
            up_frames: 0,
            extremum: 0.0,
            feedback: Feedback::None,
            angles: None,
            running: true,
            pending: PendingReturn::default(),
        }
    }

    /// Evaluate one frame from the pose model (`None` = nobody detected)
    pub fn evaluate(&mut self, frame: Option<&PoseFrame>) -> Evaluation {
        if !self.running {
            return Evaluation::new(FrameOutcome::Stopped);
        }

        let Some(frame) = frame else {
            self.feedback = Feedback::BodyNotVisible;
            return Evaluation::new(FrameOutcome::NoBody);
        };

        match JointAngles::extract(frame) {
            Some(angles) => self.checked_step(angles),
            None => {
                log::debug!("Skipping frame with degenerate joint geometry");
                Evaluation::new(FrameOutcome::Degenerate)
            }
        }
    }

    /// Evaluate angles computed elsewhere
    pub fn evaluate_angles(&mut self, angles: JointAngles) -> Evaluation {
        if !self.running {
            return Evaluation::new(FrameOutcome::Stopped);
        }
        self.checked_step(angles)
    }

    /// NaN or out-of-range angles are treated like a collapsed joint
    fn checked_step(&mut self, angles: JointAngles) -> Evaluation {
        if !angles.is_valid() {
            log::debug!("Skipping frame with invalid angles: {:?}", angles);
            return Evaluation::new(FrameOutcome::Degenerate);
        }
        self.step(angles)
    }

    fn step(&mut self, angles: JointAngles) -> Evaluation {
        let mut eval = Evaluation::new(FrameOutcome::Evaluated);
        self.angles = Some(angles);

        let elbow = angles.avg_elbow();
        let body = angles.avg_body();
        let threshold = self.config.frame_threshold;

        if elbow < self.config.elbow_down_threshold {
            self.down_frames = self.down_frames.saturating_add(1);
            self.up_frames = 0;

            if self.state == RepState::Down {
                self.extremum = self.extremum.min(elbow);
            }

            if self.down_frames >= threshold && self.state != RepState::Down {
                // Leaving `Up` early: the pending return must not land on `Down`
                eval.superseded = self.pending.cancel();
                self.state = RepState::Down;
                self.extremum = elbow;
                self.feedback = Feedback::RiseNow;
                log::info!("✅ DOWN at {:.1}°", elbow);
            } else if self.state == RepState::Down {
                self.feedback = Feedback::RiseNow;
            } else {
                self.feedback = Feedback::GoLower { angle: elbow };
            }
        } else if elbow > self.config.elbow_up_threshold && self.state == RepState::Down {
            let change = elbow - self.extremum;
            self.up_frames = self.up_frames.saturating_add(1);
            self.down_frames = 0;

            if self.up_frames >= threshold && change >= self.config.min_angle_delta {
                self.count = self.count.saturating_add(1);
                self.state = RepState::Up;
                self.feedback = Feedback::RepCompleted;
                log::info!(
                    "✅ Rep {} complete: {:.1}° → {:.1}° ({:.1}°)",
                    self.count,
                    self.extremum,
                    elbow,
                    change
                );

                self.down_frames = 0;
                self.up_frames = 0;
                self.extremum = 0.0;

                eval.rep_completed = true;
                eval.scheduled = Some(ScheduledReturn {
                    ticket: self.pending.arm(),
                    delay_ms: self.config.return_delay_ms,
                });
            } else if change < self.config.min_angle_delta {
                log::debug!(
                    "Rep rejected: swing {:.1}° below {:.1}°",
                    change,
                    self.config.min_angle_delta
                );
                self.feedback = Feedback::InsufficientRange {
                    change,
                    required: self.config.min_angle_delta,
                };
            } else {
                self.feedback = Feedback::KeepRising { angle: elbow };
            }
        } else {
            // A `Down` streak survives one ambiguous reading; an up streak never does
            if self.state != RepState::Down {
                self.down_frames = 0;
            }
            self.up_frames = 0;

            self.feedback = match self.state {
                RepState::Ready | RepState::Up => {
                    if body > self.config.body_alignment_min {
                        Feedback::AssumePosition
                    } else {
                        Feedback::StraightenBody
                    }
                }
                RepState::Down => Feedback::KeepRising { angle: elbow },
            };
        }

        eval
    }

    /// Redeem a scheduled return. Stale or cancelled tickets are ignored.
    pub fn complete_return(&mut self, ticket: ReturnTicket) -> bool {
        if !self.pending.redeem(ticket) || self.state != RepState::Up {
            return false;
        }
        self.state = RepState::Ready;
        log::debug!("Returned to READY");
        true
    }

    /// Clear count, phase, counters and feedback.
    ///
    /// Returns the cancelled return ticket, if one was outstanding, so the
    /// driver can clear the matching timer.
    pub fn reset(&mut self) -> Option<ReturnTicket> {
        self.count = 0;
        self.state = RepState::Ready;
        self.down_frames = 0;
        self.up_frames = 0;
        self.extremum = 0.0;
        self.feedback = Feedback::None;
        self.pending.cancel()
    }

    /// Swap in new thresholds; the session starts over
    pub fn reconfigure(&mut self, config: CounterConfig) -> Option<ReturnTicket> {
        self.config = config;
        self.reset()
    }

    /// Surface a pose-model or camera failure to the user
    pub fn report_failure(&mut self, failure: CollaboratorFailure) {
        log::error!("Collaborator failure: {:?}", failure);
        self.feedback = failure.into();
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn state(&self) -> RepState {
        self.state
    }

    pub fn feedback(&self) -> Feedback {
        self.feedback
    }

    pub fn angles(&self) -> Option<JointAngles> {
        self.angles
    }

    pub fn config(&self) -> &CounterConfig {
        &self.config
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        let angles = self.angles.unwrap_or_default();
        CounterSnapshot {
            count: self.count,
            state: self.state,
            feedback: self.feedback.to_string(),
            left_elbow: angles.left_elbow,
            right_elbow: angles.right_elbow,
            avg_elbow: angles.avg_elbow(),
            torso: angles.avg_body(),
            zone: self
                .angles
                .map(|a| AngleZone::classify(a.avg_elbow(), &self.config)),
            body_aligned: self
                .angles
                .map(|a| a.avg_body() > self.config.body_alignment_min),
            down_frames: self.down_frames,
            up_frames: self.up_frames,
            extremum: self.extremum,
            return_pending: self.pending.is_pending(),
            running: self.running,
        }
    }
}

impl Default for RepCounter {
    fn default() -> Self {
        Self::new(CounterConfig::default())
    }
}
