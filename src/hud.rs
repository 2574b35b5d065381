//! HUD text
//!
//! Strings for the presses / timer / rate readouts, computed from the session
//! so the host only has to copy them into its elements.

use serde::Serialize;

use crate::sim::SessionState;

/// Format milliseconds as `MM:SS.t`
pub fn format_time(ms: f64) -> String {
    let ms = ms.max(0.0) as u64;
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1000;
    let tenths = (ms % 1000) / 100;
    format!("{:02}:{:02}.{}", minutes, seconds, tenths)
}

/// One frame's worth of HUD text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HudReadout {
    pub presses: String,
    pub time: String,
    pub rate: String,
}

impl HudReadout {
    pub fn new(state: &SessionState, rate: f64) -> Self {
        Self {
            presses: state.hit_count.to_string(),
            time: format_time(state.elapsed_ms),
            rate: format!("{:.2}", rate),
        }
    }
}
