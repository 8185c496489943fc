//! Browser runtime for custom select widgets.
//!
//! Bridges the host-independent controller to the real DOM through
//! `web-sys`.

// WASM-only modules
#[cfg(target_arch = "wasm32")]
pub mod app;
#[cfg(target_arch = "wasm32")]
pub mod dom;

#[cfg(target_arch = "wasm32")]
pub use app::{configure, rebind};
#[cfg(target_arch = "wasm32")]
pub use dom::{SharedController, WebDom};
