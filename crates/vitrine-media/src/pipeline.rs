//! Image Delivery Pipeline
//!
//! Watches deferred images (`data-src`), resolves each one on viewport
//! proximity through the preload cache, and retrofits responsive hints
//! onto images that loaded eagerly.
//!
//! Preloads are driven externally: the pipeline emits [`PreloadRequest`]s
//! and the caller reports completion via [`ImagePipeline::finish_preload`].
//! While a URL's preload is in flight, further images with the same URL
//! join the in-flight set instead of starting a second preload.

use std::collections::HashMap;

use vitrine_dom::{DomTree, NodeId};
use vitrine_platform::{ConnectionClass, ObserverConfig, Viewport, ViewportObserver};

use crate::{optimized_src, responsive_srcset, ImageCache, RESPONSIVE_SIZES};

/// Attribute marking a deferred image; presence = pending, removal = resolved
pub const DEFERRED_ATTR: &str = "data-src";

/// Pre-load margin for capable devices
const DESKTOP_MARGIN_PX: f64 = 500.0;
/// Tighter pre-load margin for mobile-class devices
const MOBILE_MARGIN_PX: f64 = 300.0;

const DESKTOP_THRESHOLD: f64 = 0.001;
const MOBILE_THRESHOLD: f64 = 0.01;

/// Preload start delay on slow connections, so visible content wins
/// bandwidth contention first
pub const SLOW_PRELOAD_DELAY_MS: u64 = 100;

/// Grace delay before below-the-fold images are observed on slow
/// connections
pub const BELOW_FOLD_DELAY_MS: u64 = 500;

/// Deferred image lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageState {
    /// Marker present, not yet near the viewport
    Pending,
    /// Preload in flight
    Resolving,
    /// Final source applied, marker removed
    Resolved,
}

/// A preload the caller must run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreloadRequest {
    pub node: NodeId,
    pub src: String,
    /// Start delay in ms (non-zero on slow connections)
    pub delay_ms: u64,
}

/// Outcome of pipeline startup
#[derive(Debug, Default)]
pub struct PipelineStart {
    /// Images to observe only after the grace delay (slow connections)
    pub below_fold: Vec<NodeId>,
}

/// Viewport-driven deferred image resolver
pub struct ImagePipeline {
    observer: ViewportObserver,
    cache: ImageCache,
    states: HashMap<NodeId, ImageState>,
    /// In-flight URL -> images waiting on that preload
    resolving: HashMap<String, Vec<NodeId>>,
    /// Retrofitted images awaiting load completion for their fade-in
    fade_pending: Vec<NodeId>,
    observer_available: bool,
}

impl ImagePipeline {
    /// Create the pipeline. `mobile` picks the device-class margin; the
    /// load-early direction is the invariant, the exact margin is not.
    pub fn new(mobile: bool, observer_available: bool) -> Self {
        let config = if mobile {
            ObserverConfig {
                margin_top: MOBILE_MARGIN_PX,
                margin_bottom: MOBILE_MARGIN_PX,
                threshold: MOBILE_THRESHOLD,
            }
        } else {
            ObserverConfig {
                margin_top: DESKTOP_MARGIN_PX,
                margin_bottom: DESKTOP_MARGIN_PX,
                threshold: DESKTOP_THRESHOLD,
            }
        };

        Self {
            observer: ViewportObserver::new(config),
            cache: ImageCache::new(),
            states: HashMap::new(),
            resolving: HashMap::new(),
            fade_pending: Vec::new(),
            observer_available,
        }
    }

    /// Collect and observe deferred images.
    ///
    /// Without the observer capability every deferred image resolves
    /// synchronously to its raw source, with no optimization transform.
    /// On slow connections only in-viewport images are observed now;
    /// the returned below-fold group is observed after the grace delay.
    pub fn begin(
        &mut self,
        tree: &mut DomTree,
        root: NodeId,
        connection: ConnectionClass,
        viewport: Viewport,
    ) -> PipelineStart {
        let deferred: Vec<NodeId> = tree
            .elements_by_tag(root, "img")
            .into_iter()
            .filter(|&id| tree.get_attr(id, DEFERRED_ATTR).is_some())
            .collect();

        if !self.observer_available {
            tracing::info!(
                count = deferred.len(),
                "viewport observation unavailable, resolving deferred images eagerly"
            );
            for id in deferred {
                self.resolve_raw(tree, id);
            }
            return PipelineStart::default();
        }

        for &id in &deferred {
            self.states.insert(id, ImageState::Pending);
        }

        if connection.is_slow() {
            let fold = viewport.y + viewport.height;
            let mut below_fold = Vec::new();

            for id in deferred {
                if tree.bounds(id).top() < fold {
                    self.observer.observe(id);
                } else {
                    below_fold.push(id);
                }
            }

            tracing::debug!(
                deferred = self.observer.observed_count(),
                below_fold = below_fold.len(),
                connection = connection.as_str(),
                "prioritizing in-viewport images"
            );
            PipelineStart { below_fold }
        } else {
            for id in deferred {
                self.observer.observe(id);
            }
            PipelineStart::default()
        }
    }

    /// Observe the below-fold group once the grace delay has elapsed
    pub fn observe_deferred(&mut self, nodes: &[NodeId]) {
        for &id in nodes {
            self.observer.observe(id);
        }
    }

    /// Images currently intersecting the margin-adjusted viewport
    pub fn check_viewport(&self, tree: &DomTree, viewport: Viewport) -> Vec<NodeId> {
        self.observer.scan(tree, viewport)
    }

    /// Handle newly-intersecting images. Cache hits resolve synchronously;
    /// misses produce preload requests (or join an in-flight preload).
    /// Every hit is unobserved in this same turn.
    pub fn on_intersections(
        &mut self,
        tree: &mut DomTree,
        connection: ConnectionClass,
        hits: &[NodeId],
    ) -> Vec<PreloadRequest> {
        let mut requests = Vec::new();

        for &id in hits {
            self.observer.unobserve(id);

            let src = match tree.get_attr(id, DEFERRED_ATTR) {
                Some(s) => s,
                None => continue,
            };

            if self.cache.contains(&src) {
                // No re-fetch: apply the cached source directly
                self.apply_source(tree, id, &src);
                continue;
            }

            if let Some(waiters) = self.resolving.get_mut(&src) {
                waiters.push(id);
                self.states.insert(id, ImageState::Resolving);
                continue;
            }

            self.resolving.insert(src.clone(), vec![id]);
            self.states.insert(id, ImageState::Resolving);

            let delay_ms = if connection.is_slow() {
                SLOW_PRELOAD_DELAY_MS
            } else {
                0
            };
            requests.push(PreloadRequest { node: id, src, delay_ms });
        }

        requests
    }

    /// Complete a preload. Success caches the URL and applies the
    /// optimized source to every image waiting on it; failure falls back
    /// to the raw source so no image stays pending.
    pub fn finish_preload(
        &mut self,
        tree: &mut DomTree,
        src: &str,
        ok: bool,
        connection: ConnectionClass,
        webp: bool,
    ) {
        let waiters = match self.resolving.remove(src) {
            Some(w) => w,
            None => return,
        };

        if ok {
            self.cache.insert(src);
            let optimized = optimized_src(src, connection, webp);
            for id in waiters {
                self.apply_source(tree, id, &optimized);
            }
        } else {
            tracing::warn!(src, "image preload failed, falling back to raw source");
            for id in waiters {
                self.apply_source(tree, id, src);
            }
        }
    }

    fn apply_source(&mut self, tree: &mut DomTree, id: NodeId, src: &str) {
        tree.set_attr(id, "src", src);
        tree.remove_attr(id, DEFERRED_ATTR);
        tree.add_class(id, "loaded");
        self.states.insert(id, ImageState::Resolved);
    }

    fn resolve_raw(&mut self, tree: &mut DomTree, id: NodeId) {
        if let Some(src) = tree.get_attr(id, DEFERRED_ATTR) {
            tree.set_attr(id, "src", &src);
            tree.remove_attr(id, DEFERRED_ATTR);
            self.states.insert(id, ImageState::Resolved);
        }
    }

    /// Retrofit responsive hints onto images that loaded eagerly: a
    /// three-tier srcset, lazy/async loading hints, and an opacity
    /// fade-in completed on load (or immediately if the image already
    /// finished decoding by the time this pass runs).
    pub fn retrofit_loaded(&mut self, tree: &mut DomTree, root: NodeId, webp: bool) {
        let loaded: Vec<NodeId> = tree
            .elements_by_tag(root, "img")
            .into_iter()
            .filter(|&id| tree.get_attr(id, DEFERRED_ATTR).is_none())
            .collect();

        for id in loaded {
            let src = match tree.get_attr(id, "src") {
                Some(s) => s,
                None => continue,
            };

            if tree.get_attr(id, "srcset").is_none() {
                tree.set_attr(id, "srcset", &responsive_srcset(&src, webp));
                tree.set_attr(id, "sizes", RESPONSIVE_SIZES);
            }
            if tree.get_attr(id, "loading").is_none() {
                tree.set_attr(id, "loading", "lazy");
            }
            if tree.get_attr(id, "decoding").is_none() {
                tree.set_attr(id, "decoding", "async");
            }

            if let Some(el) = tree.element_mut(id) {
                el.set_style("opacity", "0");
                el.set_style("transition", "opacity 0.3s ease-in-out");
                // Already complete: apply the final state now instead of
                // waiting for a load event that will never fire
                if el.has_attr("complete") {
                    el.set_style("opacity", "1");
                } else {
                    self.fade_pending.push(id);
                }
            }
        }
    }

    /// Load-completion callback for retrofitted images
    pub fn notify_loaded(&mut self, tree: &mut DomTree, id: NodeId) {
        if let Some(pos) = self.fade_pending.iter().position(|&p| p == id) {
            self.fade_pending.swap_remove(pos);
            if let Some(el) = tree.element_mut(id) {
                el.set_style("opacity", "1");
            }
        }
    }

    /// Lifecycle state of a deferred image
    pub fn state(&self, id: NodeId) -> Option<ImageState> {
        self.states.get(&id).copied()
    }

    pub fn is_observing(&self, id: NodeId) -> bool {
        self.observer.is_observing(id)
    }

    pub fn observed_count(&self) -> usize {
        self.observer.observed_count()
    }

    pub fn cache(&self) -> &ImageCache {
        &self.cache
    }
}
