//! Push-up Web - browser push-up repetition counter
//!
//! MediaPipe runs in JavaScript and hands us pose landmarks every video
//! frame; this module turns them into joint angles, a debounced
//! down/up phase and a rep count.
//!
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - wasm_bindgen entry points that delegate to submodules

pub mod exercise;
pub mod pose;
mod bridge;

use wasm_bindgen::prelude::*;

// Re-export wasm_bindgen functions for JS access
pub use bridge::*;

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Send this crate's `log` records to the browser console.
///
/// `level` is parsed case-insensitively ("debug", "WARN", ...). An empty or
/// unknown name keeps info. Per-frame diagnostics only show at debug, and
/// records from other crates are filtered out.
#[wasm_bindgen]
pub fn init_logging(level: &str) {
    let log_level = parse_level(level);
    wasm_logger::init(wasm_logger::Config::new(log_level).module_prefix(env!("CARGO_CRATE_NAME")));
    log::info!("Push-up counter logging at {}", log_level);
}

fn parse_level(level: &str) -> log::Level {
    level.trim().parse().unwrap_or(log::Level::Info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), log::Level::Debug);
        assert_eq!(parse_level(" WARN "), log::Level::Warn);
        assert_eq!(parse_level("Trace"), log::Level::Trace);
        assert_eq!(parse_level(""), log::Level::Info);
        assert_eq!(parse_level("verbose"), log::Level::Info);
    }
}
