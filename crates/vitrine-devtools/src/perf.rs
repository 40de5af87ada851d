//! Performance Monitoring
//!
//! Long-task and layout-shift observation plus a render-blocking resource
//! audit. Significant entries are logged; nothing is acted upon.

/// Tasks over this duration are reported
pub const LONG_TASK_THRESHOLD_MS: f64 = 50.0;

/// Layout shifts over this score are reported
pub const LAYOUT_SHIFT_THRESHOLD: f64 = 0.1;

/// Top-N resources listed by the render-blocking audit
pub const RENDER_BLOCKING_REPORT_LIMIT: usize = 5;

/// Watches for main-thread tasks long enough to cause jank
#[derive(Debug, Default)]
pub struct LongTaskMonitor {
    entries: Vec<(String, f64)>,
}

impl LongTaskMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed task; entries over the threshold are kept and
    /// logged
    pub fn record(&mut self, name: &str, duration_ms: f64) {
        if duration_ms > LONG_TASK_THRESHOLD_MS {
            tracing::warn!(name, duration_ms, "long task detected");
            self.entries.push((name.to_string(), duration_ms));
        }
    }

    pub fn long_task_count(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }
}

/// Watches cumulative-layout-shift style scores
#[derive(Debug, Default)]
pub struct LayoutShiftMonitor {
    shifts: Vec<f64>,
}

impl LayoutShiftMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a shift score; only significant shifts are kept and logged
    pub fn record(&mut self, value: f64) {
        if value > LAYOUT_SHIFT_THRESHOLD {
            tracing::warn!(value, "layout shift detected");
            self.shifts.push(value);
        }
    }

    pub fn significant_shift_count(&self) -> usize {
        self.shifts.len()
    }
}

/// What initiated a resource fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitiatorType {
    Script,
    Css,
    Link,
    Img,
    Other,
}

/// One resource-timing entry
#[derive(Debug, Clone)]
pub struct ResourceTiming {
    pub name: String,
    pub initiator: InitiatorType,
    pub duration_ms: f64,
}

impl ResourceTiming {
    pub fn new(name: &str, initiator: InitiatorType, duration_ms: f64) -> Self {
        Self {
            name: name.to_string(),
            initiator,
            duration_ms,
        }
    }
}

/// Potentially render-blocking resources, slowest first, capped at the
/// report limit
pub fn render_blocking(resources: &[ResourceTiming]) -> Vec<ResourceTiming> {
    let mut blocking: Vec<ResourceTiming> = resources
        .iter()
        .filter(|r| {
            matches!(
                r.initiator,
                InitiatorType::Script | InitiatorType::Css | InitiatorType::Link
            )
        })
        .cloned()
        .collect();

    blocking.sort_by(|a, b| b.duration_ms.total_cmp(&a.duration_ms));
    blocking.truncate(RENDER_BLOCKING_REPORT_LIMIT);

    for r in &blocking {
        tracing::info!(name = %r.name, duration_ms = r.duration_ms, "render-blocking resource");
    }
    blocking
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_task_threshold() {
        let mut monitor = LongTaskMonitor::new();
        monitor.record("layout", 20.0);
        monitor.record("script", 80.0);
        assert_eq!(monitor.long_task_count(), 1);
        assert_eq!(monitor.entries()[0].0, "script");
    }

    #[test]
    fn test_layout_shift_threshold() {
        let mut monitor = LayoutShiftMonitor::new();
        monitor.record(0.05);
        monitor.record(0.3);
        assert_eq!(monitor.significant_shift_count(), 1);
    }

    #[test]
    fn test_render_blocking_sort_and_cap() {
        let mut resources = vec![
            ResourceTiming::new("hero.jpg", InitiatorType::Img, 900.0),
        ];
        for i in 0..7 {
            resources.push(ResourceTiming::new(
                &format!("script-{}.js", i),
                InitiatorType::Script,
                100.0 * (i + 1) as f64,
            ));
        }

        let blocking = render_blocking(&resources);
        assert_eq!(blocking.len(), RENDER_BLOCKING_REPORT_LIMIT);
        assert_eq!(blocking[0].name, "script-6.js");
        assert!(blocking.iter().all(|r| r.initiator == InitiatorType::Script));
        assert!(blocking
            .windows(2)
            .all(|w| w[0].duration_ms >= w[1].duration_ms));
    }
}
