//! Session state and control entry points
//!
//! One counter per page. The render loop feeds it through
//! `update_landmarks`; the UI reads it back through the getters here.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use super::timer::ReturnTimer;
use crate::exercise::{
    CollaboratorFailure, ConfigError, CounterConfig, CounterSnapshot, Evaluation, FrameOutcome,
    RepCounter, ReturnTicket, ScheduledReturn,
};
use crate::pose::PoseFrame;

impl From<ConfigError> for JsValue {
    fn from(err: ConfigError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

#[derive(Default)]
struct Session {
    counter: RepCounter,
    timer: ReturnTimer,
    /// `currentTime` of the last frame handed to the counter
    last_video_time: Option<f64>,
}

impl Session {
    fn apply(&mut self, eval: Evaluation) {
        if let Some(ticket) = eval.superseded {
            self.timer.cancel(ticket);
        }
        if let Some(scheduled) = eval.scheduled {
            self.arm_return(scheduled);
        }
    }

    fn arm_return(&mut self, scheduled: ScheduledReturn) {
        let ticket = scheduled.ticket;
        let callback: Closure<dyn FnMut()> = Closure::once(move || finish_return(ticket));
        if let Err(err) = self.timer.arm(ticket, scheduled.delay_ms, callback) {
            log::warn!("Could not schedule return to READY ({:?}); returning now", err);
            self.counter.complete_return(ticket);
        }
    }

    fn reset(&mut self) {
        if let Some(ticket) = self.counter.reset() {
            self.timer.cancel(ticket);
        }
    }
}

// Thread-local storage (WASM is single-threaded)
thread_local! {
    static SESSION: RefCell<Session> = RefCell::new(Session::default());
}

fn finish_return(ticket: ReturnTicket) {
    SESSION.with(|cell| {
        let mut session = cell.borrow_mut();
        session.timer.retire(ticket);
        session.counter.complete_return(ticket);
    });
}

fn log_diagnostics(counter: &RepCounter) {
    let rate = f64::from(counter.config().diagnostic_sample_rate);
    if js_sys::Math::random() >= rate {
        return;
    }

    let config = counter.config();
    let snap = counter.snapshot();
    log::debug!(
        "Elbow L {:.1}° R {:.1}° Avg {:.1}° | Torso {:.1}° (straight: {}) | {} | DOWN {}/{} UP {}/{} | thresholds {}°/{}°",
        snap.left_elbow,
        snap.right_elbow,
        snap.avg_elbow,
        snap.torso,
        snap.body_aligned.unwrap_or(false),
        snap.state.as_str(),
        snap.down_frames,
        config.frame_threshold,
        snap.up_frames,
        config.frame_threshold,
        config.elbow_down_threshold,
        config.elbow_up_threshold,
    );
}

// ============================================================================
// INTERNAL API (no wasm_bindgen)
// ============================================================================

/// Run one frame through the counter
pub(crate) fn process_frame(frame: Option<PoseFrame>, video_time: f64) {
    SESSION.with(|cell| {
        let mut guard = cell.borrow_mut();
        let session = &mut *guard;
        if session.last_video_time == Some(video_time) {
            return;
        }
        session.last_video_time = Some(video_time);

        let eval = session.counter.evaluate(frame.as_ref());
        session.apply(eval);

        if eval.outcome == FrameOutcome::Evaluated {
            log_diagnostics(&session.counter);
        }
    });
}

/// Read-only access to the counter (for the overlay)
pub(crate) fn with_counter<R>(f: impl FnOnce(&RepCounter) -> R) -> R {
    SESSION.with(|cell| f(&cell.borrow().counter))
}

fn snapshot() -> CounterSnapshot {
    with_counter(RepCounter::snapshot)
}

// ============================================================================
// WASM-BINDGEN ENTRY POINTS
// ============================================================================

#[wasm_bindgen]
pub fn start_counting() {
    SESSION.with(|cell| cell.borrow_mut().counter.start());
    log::info!("▶️ Counting started");
}

#[wasm_bindgen]
pub fn stop_counting() {
    SESSION.with(|cell| cell.borrow_mut().counter.stop());
    log::info!("⏸️ Counting stopped");
}

/// Zero the count and return to READY; safe to call at any time
#[wasm_bindgen]
pub fn reset_counter() {
    SESSION.with(|cell| cell.borrow_mut().reset());
    log::info!("🔄 Counter reset");
}

/// Tear down: cancel timers, clear state and stop counting
#[wasm_bindgen]
pub fn dispose_session() {
    SESSION.with(|cell| {
        let mut session = cell.borrow_mut();
        session.timer.cancel_all();
        session.counter.reset();
        session.counter.stop();
        session.last_video_time = None;
    });
}

/// Replace the thresholds with a (partial) camelCase JSON object.
/// Starts the session over.
#[wasm_bindgen]
pub fn configure(json: &str) -> Result<(), JsValue> {
    let config = CounterConfig::from_json(json)?;
    apply_config(config);
    Ok(())
}

/// Switch to a named preset: "default", "strict" or "lenient"
#[wasm_bindgen]
pub fn configure_preset(name: &str) -> Result<(), JsValue> {
    let config = match name.to_lowercase().as_str() {
        "default" => CounterConfig::default(),
        "strict" => CounterConfig::strict(),
        "lenient" => CounterConfig::lenient(),
        other => return Err(JsValue::from_str(&format!("Unknown preset: {}", other))),
    };
    apply_config(config);
    Ok(())
}

fn apply_config(config: CounterConfig) {
    log::info!("Counter configured: {:?}", config);
    SESSION.with(|cell| {
        let mut session = cell.borrow_mut();
        session.timer.cancel_all();
        session.counter.reconfigure(config);
    });
}

/// Called from JS when the pose model fails to load
#[wasm_bindgen]
pub fn report_model_failure(message: &str) {
    log::error!("Pose model initialization failed: {}", message);
    SESSION.with(|cell| {
        cell.borrow_mut()
            .counter
            .report_failure(CollaboratorFailure::ModelInitialization)
    });
}

/// Called from JS when the camera is unavailable or permission is denied
#[wasm_bindgen]
pub fn report_camera_failure(message: &str) {
    log::error!("Camera unavailable: {}", message);
    SESSION.with(|cell| {
        cell.borrow_mut()
            .counter
            .report_failure(CollaboratorFailure::CameraPermission)
    });
}

#[wasm_bindgen]
pub fn get_rep_count() -> u32 {
    with_counter(RepCounter::count)
}

/// "ready", "down" or "up"
#[wasm_bindgen]
pub fn get_state() -> String {
    with_counter(|c| c.state().as_str().to_string())
}

#[wasm_bindgen]
pub fn get_feedback() -> String {
    with_counter(|c| c.feedback().to_string())
}

/// [left elbow, right elbow, torso] in degrees, or None before the first body
#[wasm_bindgen]
pub fn get_angles() -> Option<Vec<f32>> {
    with_counter(|c| {
        c.angles()
            .map(|a| vec![a.left_elbow, a.right_elbow, a.avg_body()])
    })
}

/// Everything at once as a plain JS object
#[wasm_bindgen]
pub fn get_snapshot() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&snapshot()).map_err(Into::into)
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use crate::pose::pose_with_angles;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn flat(elbow: f32, body: f32) -> Vec<f32> {
        pose_with_angles(elbow, body)
            .landmarks()
            .iter()
            .flat_map(|l| [l.x, l.y, l.z])
            .collect()
    }

    fn fresh_session() {
        dispose_session();
        configure_preset("default").unwrap();
        start_counting();
    }

    #[wasm_bindgen_test]
    fn test_counts_rep_through_bridge() {
        fresh_session();
        let (bottom, top) = (flat(88.0, 165.0), flat(170.0, 170.0));
        let mut t = 0.0;
        for data in [&bottom, &bottom, &bottom, &top, &top, &top] {
            t += 0.033;
            crate::bridge::update_landmarks(data, t);
        }
        assert_eq!(get_rep_count(), 1);
        assert_eq!(get_state(), "up");
        assert!(snapshot().return_pending);

        reset_counter();
        assert_eq!(get_rep_count(), 0);
        assert_eq!(get_state(), "ready");
        assert!(!snapshot().return_pending);
    }

    #[wasm_bindgen_test]
    fn test_repeated_video_time_is_skipped() {
        fresh_session();
        let bottom = flat(88.0, 165.0);
        for _ in 0..5 {
            crate::bridge::update_landmarks(&bottom, 1.0);
        }
        assert_eq!(snapshot().down_frames, 1);
    }

    #[wasm_bindgen_test]
    fn test_empty_frame_reports_not_visible() {
        fresh_session();
        let before = get_angles();
        crate::bridge::update_landmarks(&[], 0.5);
        assert_eq!(get_state(), "ready");
        assert!(get_feedback().contains("visible"));
        assert_eq!(get_angles(), before);
    }

    #[wasm_bindgen_test]
    fn test_stopped_session_ignores_frames() {
        fresh_session();
        stop_counting();
        crate::bridge::update_landmarks(&flat(88.0, 165.0), 0.1);
        assert_eq!(snapshot().down_frames, 0);
    }

    #[wasm_bindgen_test]
    fn test_invalid_config_is_rejected() {
        fresh_session();
        assert!(configure(r#"{"frameThreshold": 0}"#).is_err());
        assert!(configure_preset("extreme").is_err());
        assert!(configure(r#"{"frameThreshold": 1}"#).is_ok());
        assert_eq!(with_counter(|c| c.config().frame_threshold), 1);
    }

    #[wasm_bindgen_test]
    fn test_failures_surface_as_feedback() {
        fresh_session();
        report_camera_failure("NotAllowedError");
        assert_eq!(get_feedback(), "Camera permission is required");
        assert_eq!(get_rep_count(), 0);
    }
}
