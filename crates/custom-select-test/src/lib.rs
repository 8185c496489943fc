#![allow(clippy::missing_const_for_fn)]
//! Testing harness for custom select widgets.
//!
//! Runs the real [`DropdownController`](custom_select_core::DropdownController)
//! against an in-memory document, so page scenarios can be tested natively.
//!
//! ```
//! use custom_select_test::{fixture::sort_order, Harness};
//!
//! let mut harness = Harness::new();
//! harness.add_widget(&sort_order());
//! harness.load();
//!
//! harness.open("sortOrder");
//! harness.assert_open(".bm-custom-select");
//!
//! harness.choose("sortOrder", "desc");
//! harness
//!     .assert_closed(".bm-custom-select")
//!     .assert_text(".bm-custom-select-value", "Descending")
//!     .assert_value("select", "desc");
//! ```

pub mod fixture;
mod harness;
pub mod selector;

pub use fixture::{BuiltWidget, OptionSpec, WidgetFixture};
pub use harness::Harness;
pub use selector::{Selector, SelectorError, SelectorParser};
