//! vitrine Media
//!
//! The image delivery pipeline: defers off-screen image loads behind a
//! viewport observer, resolves each deferred image to a
//! connection-appropriate source exactly once, and never re-requests the
//! same URL within the session.
//!
//! The `data-src` attribute is the deferral protocol: presence means
//! pending, removal means resolved. The `loaded` class token signals the
//! accompanying stylesheet.

mod cache;
mod optimizer;
mod pipeline;

pub use cache::ImageCache;
pub use optimizer::{optimized_src, responsive_srcset, RESPONSIVE_SIZES};
pub use pipeline::{
    ImagePipeline, ImageState, PipelineStart, PreloadRequest, BELOW_FOLD_DELAY_MS,
    DEFERRED_ATTR, SLOW_PRELOAD_DELAY_MS,
};
