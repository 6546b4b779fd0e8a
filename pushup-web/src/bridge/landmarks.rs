//! Landmark intake from JavaScript
//!
//! Receives MediaPipe pose landmarks once per video frame and hands the
//! first detected body to the session's counter.

use wasm_bindgen::prelude::*;

use super::session;
use crate::pose::{FrameLayout, PoseFrame, HIGHLIGHT_LANDMARKS, PUSHUP_SKELETON};

// ============================================================================
// WASM-BINDGEN ENTRY POINTS
// ============================================================================

/// Called from JavaScript with a flat Float32Array of 99 values per body
/// (33 landmarks × x, y, z). Pass an empty array when no body was found.
///
/// `video_time` is the video element's `currentTime`; a frame whose time
/// matches the previous one is skipped.
#[wasm_bindgen]
pub fn update_landmarks(data: &[f32], video_time: f64) {
    ingest(data, FrameLayout::Xyz, video_time);
}

/// Same as `update_landmarks` with 132 values per body (x, y, z, visibility)
#[wasm_bindgen]
pub fn update_landmarks_with_visibility(data: &[f32], video_time: f64) {
    ingest(data, FrameLayout::XyzVisibility, video_time);
}

/// Landmark indices to draw with a larger radius
#[wasm_bindgen]
pub fn get_highlight_landmarks() -> Vec<u32> {
    HIGHLIGHT_LANDMARKS.iter().map(|&i| i as u32).collect()
}

/// Skeleton connections as flat index pairs [a0, b0, a1, b1, ...]
#[wasm_bindgen]
pub fn get_skeleton_connections() -> Vec<u32> {
    PUSHUP_SKELETON
        .iter()
        .flat_map(|&(a, b)| [a as u32, b as u32])
        .collect()
}

// ============================================================================
// INTERNAL
// ============================================================================

fn ingest(data: &[f32], layout: FrameLayout, video_time: f64) {
    match PoseFrame::from_flat(data, layout) {
        Ok(frame) => session::process_frame(frame, video_time),
        Err(err) => log::warn!("Dropping landmark frame: {}", err),
    }
}
