//! vitrine Reveal
//!
//! The reveal scheduler: classifies page sections, tags a bounded subset
//! of their children as animatable, and fires each element's reveal
//! transition exactly once on viewport proximity.
//!
//! Class tokens (`fade-in`, `fade-in-left`, `fade-in-right`, `active`)
//! form the state protocol consumed by the accompanying stylesheet.

mod guard;
mod scheduler;

pub use guard::SingleFlight;
pub use scheduler::{
    RevealClass, RevealScheduler, RevealState, ACTIVE_CLASS, INIT_DELAY_MS,
    MAX_ANIMATED_CATEGORY_CARDS, MAX_ANIMATED_PRODUCT_CARDS, SECTION_BATCH_SIZE,
};
