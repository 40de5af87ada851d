//! Reveal Scheduler
//!
//! Walks sections in fixed-size batches, tagging a bounded subset of
//! elements as animatable and observing them for viewport proximity.
//! Every tagged element transitions to `active` exactly once; cards past
//! the per-section caps are marked active immediately and never observed.

use std::collections::HashMap;

use vitrine_dom::{DomTree, NodeId};
use vitrine_platform::{ObserverConfig, Viewport, ViewportObserver};

/// Class token applied when a reveal transition fires
pub const ACTIVE_CLASS: &str = "active";

/// Sections processed per scheduling turn
pub const SECTION_BATCH_SIZE: usize = 2;

/// Animated product cards per section; the rest activate immediately
pub const MAX_ANIMATED_PRODUCT_CARDS: usize = 3;

/// Animated category cards per section
pub const MAX_ANIMATED_CATEGORY_CARDS: usize = 2;

/// Delay before full initialization, letting above-the-fold content paint
pub const INIT_DELAY_MS: u64 = 100;

/// Trigger once 10% of the element is visible
const THRESHOLD: f64 = 0.1;

/// Negative bottom margin: elements trigger slightly before reaching the
/// viewport's bottom edge
const BOTTOM_MARGIN_PX: f64 = -100.0;

/// Reveal transition variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealClass {
    FadeIn,
    FadeInLeft,
    FadeInRight,
}

impl RevealClass {
    /// Stylesheet class token
    pub fn as_token(&self) -> &'static str {
        match self {
            RevealClass::FadeIn => "fade-in",
            RevealClass::FadeInLeft => "fade-in-left",
            RevealClass::FadeInRight => "fade-in-right",
        }
    }

    /// All reveal tokens, for bulk queries
    pub fn tokens() -> [&'static str; 3] {
        ["fade-in", "fade-in-left", "fade-in-right"]
    }
}

/// Per-element observation state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    /// Tagged and registered with the observer
    Observing,
    /// Transition fired; the observer no longer holds this element
    Triggered,
}

/// Viewport-driven reveal scheduler
pub struct RevealScheduler {
    observer: ViewportObserver,
    records: HashMap<NodeId, RevealState>,
    batch_turns: usize,
}

impl RevealScheduler {
    pub fn new() -> Self {
        Self {
            observer: ViewportObserver::new(ObserverConfig {
                margin_top: 0.0,
                margin_bottom: BOTTOM_MARGIN_PX,
                threshold: THRESHOLD,
            }),
            records: HashMap::new(),
            batch_turns: 0,
        }
    }

    /// Process one batch of sections starting at `start`. Returns the next
    /// start index when more sections remain; the caller yields one
    /// animation-frame interval between turns.
    pub fn tag_batch(
        &mut self,
        tree: &mut DomTree,
        sections: &[NodeId],
        start: usize,
    ) -> Option<usize> {
        let end = (start + SECTION_BATCH_SIZE).min(sections.len());
        self.batch_turns += 1;

        for &section in &sections[start..end] {
            self.tag_section(tree, section);
        }

        tracing::debug!(start, end, total = sections.len(), "tagged section batch");

        if end < sections.len() {
            Some(end)
        } else {
            None
        }
    }

    fn tag_section(&mut self, tree: &mut DomTree, section: NodeId) {
        if let Some(title) = tree.first_by_class(section, "section-title") {
            self.tag(tree, title, RevealClass::FadeIn);
        }

        let product_cards = tree.elements_by_class(section, "product-card");
        self.tag_capped(tree, &product_cards, MAX_ANIMATED_PRODUCT_CARDS);

        let category_cards = tree.elements_by_class(section, "category-card");
        self.tag_capped(tree, &category_cards, MAX_ANIMATED_CATEGORY_CARDS);

        if let Some(form) = tree.first_by_class(section, "newsletter-form") {
            self.tag(tree, form, RevealClass::FadeIn);
        }
    }

    /// Tag the first `cap` cards as animatable; the rest become active
    /// immediately and are never observed
    fn tag_capped(&mut self, tree: &mut DomTree, cards: &[NodeId], cap: usize) {
        for &card in cards.iter().take(cap) {
            self.tag(tree, card, RevealClass::FadeIn);
        }
        for &card in cards.iter().skip(cap) {
            tree.add_class(card, ACTIVE_CLASS);
        }
    }

    /// Tag a single element as animatable and observe it
    pub fn tag(&mut self, tree: &mut DomTree, id: NodeId, class: RevealClass) {
        tree.add_class(id, class.as_token());
        self.records.insert(id, RevealState::Observing);
        self.observer.observe(id);
    }

    /// Observed elements currently intersecting the viewport
    pub fn check_viewport(&self, tree: &DomTree, viewport: Viewport) -> Vec<NodeId> {
        self.observer.scan(tree, viewport)
    }

    /// Handle newly-intersecting elements: mark each triggered and tear
    /// down its observer registration in this same turn. Returns the
    /// elements whose active-class transition the caller should apply on
    /// the next animation frame. Re-delivery of an already-triggered
    /// element is a no-op.
    pub fn on_intersections(&mut self, hits: &[NodeId]) -> Vec<NodeId> {
        let mut to_activate = Vec::new();

        for &id in hits {
            match self.records.get(&id) {
                Some(RevealState::Observing) => {
                    self.records.insert(id, RevealState::Triggered);
                    self.observer.unobserve(id);
                    to_activate.push(id);
                }
                _ => {
                    // One-shot semantics: never re-trigger
                    self.observer.unobserve(id);
                }
            }
        }

        to_activate
    }

    /// Apply the active transition (scheduled by the caller to batch with
    /// the next paint)
    pub fn apply_active(tree: &mut DomTree, id: NodeId) {
        tree.add_class(id, ACTIVE_CLASS);
    }

    /// Reduced-motion override: everything already tagged becomes active
    /// with transitions disabled, and nothing is ever observed.
    pub fn apply_all_immediately(&mut self, tree: &mut DomTree, root: NodeId) {
        for token in RevealClass::tokens() {
            for id in tree.elements_by_class(root, token) {
                tree.add_class(id, ACTIVE_CLASS);
                if let Some(el) = tree.element_mut(id) {
                    el.set_style("transition", "none");
                }
                self.observer.unobserve(id);
                self.records.insert(id, RevealState::Triggered);
            }
        }
    }

    /// Low-end degraded path: tag the same candidate sets but mark them
    /// active in the same step. No observer is created on this path.
    pub fn apply_degraded(&mut self, tree: &mut DomTree, sections: &[NodeId]) {
        for &section in sections {
            let mut targets = Vec::new();

            if let Some(title) = tree.first_by_class(section, "section-title") {
                targets.push(title);
            }
            targets.extend(tree.elements_by_class(section, "product-card"));
            targets.extend(tree.elements_by_class(section, "category-card"));
            if let Some(form) = tree.first_by_class(section, "newsletter-form") {
                targets.push(form);
            }

            for id in targets {
                tree.add_class(id, RevealClass::FadeIn.as_token());
                tree.add_class(id, ACTIVE_CLASS);
            }
        }

        tracing::debug!(sections = sections.len(), "degraded reveal path, no observers");
    }

    /// Observation state for an element
    pub fn state(&self, id: NodeId) -> Option<RevealState> {
        self.records.get(&id).copied()
    }

    pub fn is_observing(&self, id: NodeId) -> bool {
        self.observer.is_observing(id)
    }

    pub fn observed_count(&self) -> usize {
        self.observer.observed_count()
    }

    /// True when no element is registered with the observer
    pub fn observer_is_empty(&self) -> bool {
        self.observer.observed_count() == 0
    }

    /// Scheduling turns consumed by batch tagging so far
    pub fn batch_turns(&self) -> usize {
        self.batch_turns
    }
}

impl Default for RevealScheduler {
    fn default() -> Self {
        Self::new()
    }
}
