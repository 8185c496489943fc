//! Error types for binding and configuration.

use crate::widget::WidgetPart;
use serde::Serialize;
use thiserror::Error;

/// Failure to wire a discovered widget container.
///
/// Never fatal: the controller skips the widget, reports the error as a
/// warning diagnostic and continues with the next container.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum BindError {
    /// One or more required sub-elements are absent from the container.
    #[error("custom dropdown {} missing required elements: {}", display_name(.name), join_parts(.missing))]
    IncompleteWidgetMarkup {
        /// Value of the container's name attribute, if any
        name: Option<String>,
        /// Every part that could not be resolved, in lookup order
        missing: Vec<WidgetPart>,
    },
}

fn display_name(name: &Option<String>) -> String {
    match name {
        Some(name) => format!("'{name}'"),
        None => "<unnamed>".to_string(),
    }
}

fn join_parts(parts: &[WidgetPart]) -> String {
    parts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Invalid or unparsable [`SelectConfig`](crate::SelectConfig).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// TOML parse failure
    #[error("invalid TOML config: {0}")]
    Toml(String),
    /// YAML parse failure
    #[error("invalid YAML config: {0}")]
    Yaml(String),
    /// JSON parse failure
    #[error("invalid JSON config: {0}")]
    Json(String),
    /// A class or attribute name that cannot be used in a CSS selector
    #[error("invalid {field} '{value}': expected a non-empty identifier")]
    InvalidName {
        /// Config field holding the bad value
        field: &'static str,
        /// The rejected value
        value: String,
    },
}
