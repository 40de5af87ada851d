//! vitrine Engine
//!
//! Behavior engine for the storefront page: boot sequence, reveal and
//! image pipelines wired to scroll events, and the interactive page
//! behaviors (theme, mobile menu, slider, newsletter, cart, hover
//! effects). Deterministic by construction: all deferred work runs on a
//! single virtual-time task queue.
//!
//! # Example
//! ```rust,ignore
//! use vitrine_engine::{Config, Engine, Session};
//!
//! let mut engine = Engine::new(document, Config::default(), Session::default());
//! engine.dispatch_content_loaded();
//! engine.dispatch_load();
//! engine.run_until_idle();
//! engine.scroll_to(800.0);
//! engine.run_until_idle();
//! ```

mod behaviors;
mod config;
mod engine;
mod task;

pub use behaviors::{HEADER_HIDE_PX, HEADER_SCROLLED_PX};
pub use config::Config;
pub use engine::{Engine, EngineError, Session, TiltSettings};
pub use task::EngineTask;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
