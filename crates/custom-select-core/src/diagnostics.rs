//! Developer-facing diagnostics emitted by the controller.

use crate::error::BindError;
use serde::Serialize;

/// Console level a diagnostic is written at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// `console.warn`
    Warn,
    /// `console.log`
    Info,
}

/// Payload logged whenever a selection changes through the custom widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionChange {
    /// Widget name attribute (`null` when the container has none)
    pub name: Option<String>,
    /// New value token
    pub value: String,
    /// Label copied into the value display
    pub text: String,
}

/// A diagnostic the host writes to its console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A container was skipped during binding
    IncompleteMarkup {
        /// Why it was skipped
        error: BindError,
    },
    /// A user picked an option
    SelectionChanged(SelectionChange),
}

impl Diagnostic {
    /// Console level for this diagnostic.
    #[must_use]
    pub const fn level(&self) -> Level {
        match self {
            Self::IncompleteMarkup { .. } => Level::Warn,
            Self::SelectionChanged(_) => Level::Info,
        }
    }

    /// Single-line console message.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::IncompleteMarkup { error } => error.to_string(),
            Self::SelectionChanged(change) => {
                let payload = serde_json::to_string(change).unwrap_or_default();
                format!("Dropdown selection changed: {payload}")
            }
        }
    }
}

impl From<BindError> for Diagnostic {
    fn from(error: BindError) -> Self {
        Self::IncompleteMarkup { error }
    }
}
