#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_const_for_fn)]
//! Core types for custom select widgets.
//!
//! A custom select is a styled dropdown that mirrors a hidden native
//! `<select>` so surrounding form logic keeps working. This crate holds
//! everything that does not depend on a real browser:
//! - Host abstraction: [`DomHost`], [`Binding`], [`Propagation`]
//! - Markup configuration: [`SelectConfig`]
//! - Widget resolution and registry: [`Widget`], [`WidgetId`]
//! - Behaviour: [`DropdownController`]
//! - Diagnostics: [`Diagnostic`], [`SelectionChange`]
//! - An in-memory document for native tests: [`MemoryDom`]

mod config;
mod controller;
mod diagnostics;
mod error;
mod host;
pub mod memory;
mod widget;

pub use config::SelectConfig;
pub use controller::{BindReport, DropdownController, InitTiming};
pub use diagnostics::{Diagnostic, Level, SelectionChange};
pub use error::{BindError, ConfigError};
pub use host::{Binding, DomHost, Propagation, ReadyState};
pub use memory::{DispatchedEvent, MemoryDom, NodeId};
pub use widget::{Widget, WidgetId, WidgetPart};
