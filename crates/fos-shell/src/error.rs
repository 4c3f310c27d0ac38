//! Errors reported by page-side calls.

/// Why a page-side call produced no usable result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PageError {
    #[error("No page view attached")]
    Unavailable,

    #[error("Script transport error: {0}")]
    Transport(String),

    #[error("Malformed script result: {0}")]
    Malformed(String),

    #[error("Page script failed: {reason}")]
    Script {
        reason: String,
        stack: Option<String>,
    },
}

impl PageError {
    pub fn script(reason: impl Into<String>) -> Self {
        Self::Script {
            reason: reason.into(),
            stack: None,
        }
    }
}
