//! Custom select widgets for the browser.
//!
//! Styled dropdowns that keep a hidden native `<select>` in sync so
//! existing form code keeps working. The module binds itself on load and
//! exposes `window.initCustomDropdowns()` for markup injected later.
//!
//! # Browser Usage (WASM)
//!
//! ```javascript
//! import init, { rebind, configure } from './custom_select.js';
//!
//! async function main() {
//!     await init();                 // binds every .bm-custom-select on the page
//!     const panel = document.querySelector('#filters');
//!     panel.innerHTML = renderFilters();
//!     rebind(panel);                // or window.initCustomDropdowns()
//! }
//! ```

#![allow(clippy::doc_markdown)]

pub use custom_select_core::*;

pub mod browser;

#[cfg(target_arch = "wasm32")]
pub use browser::{configure, rebind, WebDom};
