//! Viewport Observation
//!
//! Intersection testing between observed elements and the (margin-adjusted)
//! viewport. Each observer instance is shared by one pipeline; one-shot
//! semantics live with the caller, which unobserves an element in the same
//! turn its trigger is handled.

use vitrine_dom::{DomRect, DomTree, NodeId};

/// Visible region of the page in page coordinates
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    /// Horizontal scroll offset
    pub x: f64,
    /// Vertical scroll offset
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { x: 0.0, y: 0.0, width, height }
    }

    /// Viewport after scrolling to a vertical offset
    pub fn at_scroll(&self, y: f64) -> Self {
        Self { y, ..*self }
    }

    /// The viewport as a page-coordinate rect
    pub fn to_rect(&self) -> DomRect {
        DomRect::from_xywh(self.x, self.y, self.width, self.height)
    }

    /// Margin-adjusted root rect. Positive margins grow the region
    /// (pre-loading before elements enter view); negative margins shrink it
    /// (triggering only once an element is well inside).
    pub fn root_rect(&self, margin_top: f64, margin_bottom: f64) -> DomRect {
        DomRect::from_xywh(
            self.x,
            self.y - margin_top,
            self.width,
            (self.height + margin_top + margin_bottom).max(0.0),
        )
    }
}

/// Observer configuration
#[derive(Debug, Clone, Copy)]
pub struct ObserverConfig {
    /// Margin added above the viewport, in px
    pub margin_top: f64,
    /// Margin added below the viewport, in px (negative shrinks)
    pub margin_bottom: f64,
    /// Minimum visible fraction of the element to count as intersecting
    pub threshold: f64,
}

/// Shared viewport observer for one pipeline
#[derive(Debug)]
pub struct ViewportObserver {
    config: ObserverConfig,
    /// Observation-insertion order; scan results follow this order, which
    /// is not DOM order. Consumers must not rely on it.
    observed: Vec<NodeId>,
}

impl ViewportObserver {
    pub fn new(config: ObserverConfig) -> Self {
        Self {
            config,
            observed: Vec::new(),
        }
    }

    pub fn config(&self) -> ObserverConfig {
        self.config
    }

    /// Start observing an element. Observing twice is a no-op.
    pub fn observe(&mut self, id: NodeId) {
        if !self.observed.contains(&id) {
            self.observed.push(id);
        }
    }

    /// Stop observing an element
    pub fn unobserve(&mut self, id: NodeId) {
        self.observed.retain(|&o| o != id);
    }

    pub fn is_observing(&self, id: NodeId) -> bool {
        self.observed.contains(&id)
    }

    pub fn observed_count(&self) -> usize {
        self.observed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    /// Elements currently intersecting the margin-adjusted viewport.
    /// Does not unobserve; the caller owns one-shot teardown.
    pub fn scan(&self, tree: &DomTree, viewport: Viewport) -> Vec<NodeId> {
        let root = viewport.root_rect(self.config.margin_top, self.config.margin_bottom);
        let mut hits = Vec::new();

        for &id in &self.observed {
            let bounds = tree.bounds(id);
            if Self::intersection_ratio(&bounds, &root) >= self.config.threshold {
                hits.push(id);
            }
        }

        if !hits.is_empty() {
            tracing::trace!(count = hits.len(), "viewport intersections");
        }
        hits
    }

    /// Visible fraction of an element within the root rect. Zero-area
    /// elements count as fully visible when their origin is inside.
    fn intersection_ratio(bounds: &DomRect, root: &DomRect) -> f64 {
        let area = bounds.area();
        if area <= 0.0 {
            let inside = bounds.x >= root.x
                && bounds.x <= root.right()
                && bounds.y >= root.y
                && bounds.y <= root.bottom();
            return if inside { 1.0 } else { 0.0 };
        }

        match bounds.intersection(root) {
            Some(overlap) => overlap.area() / area,
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with_element(y: f64, height: f64) -> (DomTree, NodeId) {
        let mut tree = DomTree::new();
        let el = tree.create_element("div");
        let root = tree.root();
        tree.append_child(root, el);
        tree.set_bounds(el, DomRect::from_xywh(0.0, y, 800.0, height));
        (tree, el)
    }

    fn observer(margin_bottom: f64, threshold: f64) -> ViewportObserver {
        ViewportObserver::new(ObserverConfig {
            margin_top: 0.0,
            margin_bottom,
            threshold,
        })
    }

    #[test]
    fn test_observe_is_idempotent() {
        let (_, el) = tree_with_element(0.0, 100.0);
        let mut obs = observer(0.0, 0.1);
        obs.observe(el);
        obs.observe(el);
        assert_eq!(obs.observed_count(), 1);
    }

    #[test]
    fn test_scan_hits_visible_element() {
        let (tree, el) = tree_with_element(100.0, 100.0);
        let mut obs = observer(0.0, 0.1);
        obs.observe(el);

        let hits = obs.scan(&tree, Viewport::new(800.0, 600.0));
        assert_eq!(hits, vec![el]);
    }

    #[test]
    fn test_negative_bottom_margin_delays_trigger() {
        // Element occupying the last 100px of a 600px viewport
        let (tree, el) = tree_with_element(500.0, 100.0);
        let mut obs = observer(-100.0, 0.1);
        obs.observe(el);

        // With the bottom edge pulled up 100px the element is outside
        assert!(obs.scan(&tree, Viewport::new(800.0, 600.0)).is_empty());

        // Scrolling 50px down brings half of it into the shrunk root
        let hits = obs.scan(&tree, Viewport::new(800.0, 600.0).at_scroll(50.0));
        assert_eq!(hits, vec![el]);
    }

    #[test]
    fn test_positive_margin_preloads_early() {
        // Element 400px below the fold
        let (tree, el) = tree_with_element(1000.0, 200.0);
        let mut obs = observer(500.0, 0.001);
        obs.observe(el);

        let hits = obs.scan(&tree, Viewport::new(800.0, 600.0));
        assert_eq!(hits, vec![el]);

        // Without the margin it stays out of view
        let tight = observer(0.0, 0.001);
        assert!(tight.scan(&tree, Viewport::new(800.0, 600.0)).is_empty());
    }

    #[test]
    fn test_threshold_fraction() {
        // 100px element with only 5px visible: 5% < 10% threshold
        let (tree, el) = tree_with_element(595.0, 100.0);
        let mut obs = observer(0.0, 0.1);
        obs.observe(el);
        assert!(obs.scan(&tree, Viewport::new(800.0, 600.0)).is_empty());

        // 15px visible clears the threshold
        let hits = obs.scan(&tree, Viewport::new(800.0, 600.0).at_scroll(10.0));
        assert_eq!(hits, vec![el]);
    }

    #[test]
    fn test_unobserve_removes_from_scan() {
        let (tree, el) = tree_with_element(100.0, 100.0);
        let mut obs = observer(0.0, 0.1);
        obs.observe(el);
        obs.unobserve(el);
        assert!(obs.scan(&tree, Viewport::new(800.0, 600.0)).is_empty());
        assert!(obs.is_empty());
    }
}
