//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod landmarks;
mod overlay;
mod session;
mod timer;

pub use landmarks::{
    update_landmarks,
    update_landmarks_with_visibility,
    get_highlight_landmarks,
    get_skeleton_connections,
};

pub use overlay::{get_debug_overlay_text, get_zone_color};

pub use session::{
    // Control
    start_counting,
    stop_counting,
    reset_counter,
    dispose_session,
    configure,
    configure_preset,
    report_model_failure,
    report_camera_failure,
    // Output
    get_rep_count,
    get_state,
    get_feedback,
    get_angles,
    get_snapshot,
};
