//! vitrine Platform
//!
//! The capability surface the page pipelines run against: device profile,
//! connection class, feature-presence flags, the session key-value store,
//! a single-threaded virtual-time task queue, and viewport observation.
//!
//! Everything here models a browser-provided service. Presence is resolved
//! once at startup into [`Capabilities`]; absent capabilities are skipped
//! by consumers, never re-probed per call.

mod capabilities;
mod connection;
mod profile;
mod queue;
mod store;
mod timeline;
mod viewport;

pub use capabilities::Capabilities;
pub use connection::ConnectionClass;
pub use profile::DeviceProfile;
pub use queue::{TaskQueue, TimeMs, FRAME_MS};
pub use store::LocalStore;
pub use timeline::{Timeline, Tween, TweenDefaults, TweenKind};
pub use viewport::{ObserverConfig, Viewport, ViewportObserver};
