//! Engine Tasks
//!
//! Every deferred piece of work flows through one task enum on the
//! virtual-time queue, so a session is a deterministic sequence of task
//! turns.

use vitrine_dom::NodeId;

/// One unit of deferred work
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineTask {
    /// Hide the loader overlay and restore body scrolling
    HideLoader,
    /// Tag one batch of sections, starting at this index
    RevealBatch { start: usize },
    /// Apply the active reveal class (next-frame after the trigger)
    ApplyReveal { node: NodeId },
    /// Observe below-the-fold deferred images (slow-connection grace)
    ObserveBelowFold,
    /// Start a deferred image preload
    StartPreload { node: NodeId, src: String },
    /// Remove a spent button ripple and release the hover guard
    RemoveRipple { button: NodeId, ripple: NodeId },
    /// Restore an add-to-cart button to its resting label
    ResetCartButton { button: NodeId, label: String },
    /// Release a product-image hover guard once its tween settles
    FinishImageHover { image: NodeId },
    /// Refresh scroll-driven animations after a resize settles
    RefreshScrollTrigger { epoch: u64 },
    /// Run the render-blocking resource audit
    AuditResources,
}
