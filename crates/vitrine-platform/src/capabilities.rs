//! Capability Flags
//!
//! Presence of optional platform services, resolved once at startup. The
//! pipelines branch on these flags instead of re-probing per call; an
//! absent capability is a silent feature-skip, never an error.

/// Platform feature presence + preference flags
#[derive(Debug, Clone)]
pub struct Capabilities {
    /// Viewport intersection observation
    pub viewport_observer: bool,
    /// Animation timeline library (hero entrance, hover tweens)
    pub animation_timeline: bool,
    /// Scroll-trigger extension of the timeline library
    pub scroll_trigger: bool,
    /// Network information (effective connection type + change events)
    pub network_info: bool,
    /// Performance observation (long tasks, layout shifts, resource timing)
    pub performance_observer: bool,
    /// Tilt-effect library
    pub tilt: bool,
    /// WebP rendering support
    pub webp: bool,
    /// Reduced-motion user preference, evaluated once at load
    pub reduced_motion: bool,
}

impl Capabilities {
    /// Everything present, no reduced-motion preference
    pub fn full() -> Self {
        Self {
            viewport_observer: true,
            animation_timeline: true,
            scroll_trigger: true,
            network_info: true,
            performance_observer: true,
            tilt: true,
            webp: true,
            reduced_motion: false,
        }
    }

    /// Nothing optional present
    pub fn bare() -> Self {
        Self {
            viewport_observer: false,
            animation_timeline: false,
            scroll_trigger: false,
            network_info: false,
            performance_observer: false,
            tilt: false,
            webp: false,
            reduced_motion: false,
        }
    }

    pub fn with_viewport_observer(mut self, present: bool) -> Self {
        self.viewport_observer = present;
        self
    }

    pub fn with_animation_timeline(mut self, present: bool) -> Self {
        self.animation_timeline = present;
        self.scroll_trigger = self.scroll_trigger && present;
        self
    }

    pub fn with_network_info(mut self, present: bool) -> Self {
        self.network_info = present;
        self
    }

    pub fn with_webp(mut self, supported: bool) -> Self {
        self.webp = supported;
        self
    }

    pub fn with_reduced_motion(mut self, preferred: bool) -> Self {
        self.reduced_motion = preferred;
        self
    }

    pub fn with_tilt(mut self, present: bool) -> Self {
        self.tilt = present;
        self
    }

    pub fn with_performance_observer(mut self, present: bool) -> Self {
        self.performance_observer = present;
        self
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let caps = Capabilities::full()
            .with_viewport_observer(false)
            .with_reduced_motion(true);
        assert!(!caps.viewport_observer);
        assert!(caps.reduced_motion);
        assert!(caps.webp);
    }

    #[test]
    fn test_scroll_trigger_requires_timeline() {
        let caps = Capabilities::full().with_animation_timeline(false);
        assert!(!caps.scroll_trigger);
    }
}
