//! Engine Configuration

use serde::{Deserialize, Serialize};

/// Tunable engine parameters. Defaults match the production stylesheet
/// and page markup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Delay before the loader overlay is hidden after load, in ms
    pub loader_hide_delay_ms: u64,
    /// Delay before an add-to-cart button reverts to its label, in ms
    pub cart_reset_delay_ms: u64,
    /// Lifetime of a button ripple element, in ms
    pub ripple_lifetime_ms: u64,
    /// Slider step in px (card width plus margin)
    pub slide_width_px: f64,
    /// Resize debounce window, in ms
    pub resize_debounce_ms: u64,
    /// Viewport width at or below which hover effects are suppressed
    pub hover_suppress_width_px: f64,
    /// Delay before the render-blocking resource audit runs, in ms
    pub resource_audit_delay_ms: u64,
    /// Initial viewport width in px
    pub viewport_width: f64,
    /// Initial viewport height in px
    pub viewport_height: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            loader_hide_delay_ms: 1500,
            cart_reset_delay_ms: 2000,
            ripple_lifetime_ms: 600,
            // 300px card + 32px margin
            slide_width_px: 332.0,
            resize_debounce_ms: 250,
            hover_suppress_width_px: 768.0,
            resource_audit_delay_ms: 1000,
            viewport_width: 1280.0,
            viewport_height: 800.0,
        }
    }
}
