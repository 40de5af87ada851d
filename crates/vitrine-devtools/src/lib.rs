//! vitrine Devtools
//!
//! Ad-hoc error and performance diagnostics. Everything here is
//! log-and-count: captured failures are reported to the tracing
//! subscriber and tallied, with no recovery action and no user-facing
//! surfacing.

mod diagnostics;
mod perf;

pub use diagnostics::{DiagnosticsHub, ScriptError};
pub use perf::{
    LayoutShiftMonitor, LongTaskMonitor, ResourceTiming, render_blocking, InitiatorType,
    LAYOUT_SHIFT_THRESHOLD, LONG_TASK_THRESHOLD_MS, RENDER_BLOCKING_REPORT_LIMIT,
};
