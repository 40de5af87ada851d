//! Error Tracking
//!
//! Page-wide capture of runtime errors and unhandled asynchronous
//! rejections. Policy: log and count, never recover or re-raise.

/// A captured script error
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message} ({source_file}:{line}:{column})")]
pub struct ScriptError {
    pub message: String,
    pub source_file: String,
    pub line: u32,
    pub column: u32,
}

impl ScriptError {
    pub fn new(message: &str, source_file: &str, line: u32, column: u32) -> Self {
        Self {
            message: message.to_string(),
            source_file: source_file.to_string(),
            line,
            column,
        }
    }
}

/// Sink for captured errors and rejections
#[derive(Debug, Default)]
pub struct DiagnosticsHub {
    errors: Vec<ScriptError>,
    rejections: Vec<String>,
}

impl DiagnosticsHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a runtime error
    pub fn report_error(&mut self, error: ScriptError) {
        tracing::error!(
            message = %error.message,
            source = %error.source_file,
            line = error.line,
            column = error.column,
            "script error"
        );
        self.errors.push(error);
    }

    /// Record an unhandled asynchronous rejection
    pub fn report_rejection(&mut self, reason: &str) {
        tracing::error!(reason, "unhandled rejection");
        self.rejections.push(reason.to_string());
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn rejection_count(&self) -> usize {
        self.rejections.len()
    }

    pub fn errors(&self) -> &[ScriptError] {
        &self.errors
    }
}
