//! Test harness for custom select pages.
//!
//! Owns a [`MemoryDom`] and a [`DropdownController`] bound to it, and
//! simulates clicks the way a browser delivers them: listeners on the
//! target fire first, then each ancestor, then the document, until a
//! listener stops propagation.

use crate::fixture::{BuiltWidget, WidgetFixture};
use crate::selector::Selector;
use custom_select_core::{
    BindError, BindReport, Diagnostic, DomHost, DropdownController, InitTiming, MemoryDom, NodeId,
    Propagation, ReadyState, SelectConfig, SelectionChange,
};

/// Test harness for interacting with custom select widgets.
pub struct Harness {
    dom: MemoryDom,
    controller: DropdownController<MemoryDom>,
    deferred: bool,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    /// Create a harness over an empty, fully loaded document.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SelectConfig::default())
    }

    /// Create a harness whose controller uses `config`.
    #[must_use]
    pub fn with_config(config: SelectConfig) -> Self {
        Self {
            dom: MemoryDom::new(),
            controller: DropdownController::new(config),
            deferred: false,
        }
    }

    /// Underlying document.
    pub const fn dom(&self) -> &MemoryDom {
        &self.dom
    }

    /// Underlying controller.
    pub const fn controller(&self) -> &DropdownController<MemoryDom> {
        &self.controller
    }

    // === Markup ===

    /// Append a widget to the document body.
    pub fn add_widget(&self, fixture: &WidgetFixture) -> BuiltWidget {
        fixture.build(&self.dom, self.dom.root())
    }

    /// Append a plain element to the document body.
    pub fn add_element(&self, tag: &str, id: &str) -> NodeId {
        let node = self.dom.create_element(tag);
        self.dom.set_attribute(node, "id", id);
        self.dom.append_child(self.dom.root(), node);
        node
    }

    // === Lifecycle ===

    /// Run page start-up: bind now, or wait for [`Self::content_loaded`]
    /// while the document is still loading.
    pub fn load(&mut self) -> Option<BindReport> {
        match InitTiming::for_state(self.dom.ready_state()) {
            InitTiming::Immediate => Some(self.controller.init(&self.dom)),
            InitTiming::OnContentLoaded => {
                self.deferred = true;
                None
            }
        }
    }

    /// Finish parsing and fire `DOMContentLoaded`.
    pub fn content_loaded(&mut self) -> Option<BindReport> {
        self.dom.set_ready_state(ReadyState::Interactive);
        if std::mem::take(&mut self.deferred) {
            Some(self.controller.init(&self.dom))
        } else {
            None
        }
    }

    /// Manual re-initialization over the whole document.
    pub fn init(&mut self) -> BindReport {
        self.controller.init(&self.dom)
    }

    /// Re-initialization scoped to `scope`.
    pub fn rebind(&mut self, scope: NodeId) -> BindReport {
        self.controller.rebind(&self.dom, &scope)
    }

    // === Event Simulation ===

    /// Simulate a click on the first element matching the selector.
    /// Does nothing when no element matches.
    pub fn click(&mut self, selector: &str) -> &mut Self {
        if let Some(node) = self.query(selector) {
            self.click_node(node);
        }
        self
    }

    /// Simulate a click on `target`.
    pub fn click_node(&mut self, target: NodeId) -> &mut Self {
        for node in self.dom.ancestors_inclusive(target) {
            let mut stopped = false;
            for binding in self.dom.bindings(node) {
                if self.controller.handle(&self.dom, binding) == Propagation::Stop {
                    stopped = true;
                }
            }
            if stopped {
                return self;
            }
        }
        if self.dom.is_connected(&target) {
            for binding in self.dom.document_bindings() {
                self.controller.handle(&self.dom, binding);
            }
        }
        self
    }

    /// Click the trigger of the widget named `name`.
    pub fn open(&mut self, name: &str) -> &mut Self {
        let selector = format!(
            "[{}='{name}'] .{}",
            self.controller.config().name_attribute,
            self.controller.config().trigger_class
        );
        self.click(&selector)
    }

    /// Click the option carrying `value` in the widget named `name`.
    pub fn choose(&mut self, name: &str, value: &str) -> &mut Self {
        let config = self.controller.config();
        let selector = format!(
            "[{}='{name}'] .{}[{}='{value}']",
            config.name_attribute, config.option_class, config.value_attribute
        );
        self.click(&selector)
    }

    // === Queries ===

    /// First element matching the selector.
    #[must_use]
    pub fn query(&self, selector: &str) -> Option<NodeId> {
        self.query_all(selector).into_iter().next()
    }

    /// All elements matching the selector.
    #[must_use]
    pub fn query_all(&self, selector: &str) -> Vec<NodeId> {
        Selector::parse(selector)
            .map(|sel| sel.query_all(&self.dom))
            .unwrap_or_default()
    }

    /// Check if an element exists.
    #[must_use]
    pub fn exists(&self, selector: &str) -> bool {
        self.query(selector).is_some()
    }

    /// Text content of the first match, empty if none.
    #[must_use]
    pub fn text(&self, selector: &str) -> String {
        self.query(selector)
            .map(|n| self.dom.text_content(&n))
            .unwrap_or_default()
    }

    /// Native control value of the first match, empty if none.
    #[must_use]
    pub fn value(&self, selector: &str) -> String {
        self.query(selector)
            .map(|n| self.dom.control_value(&n))
            .unwrap_or_default()
    }

    /// Whether the first match carries the configured open class.
    #[must_use]
    pub fn is_open(&self, selector: &str) -> bool {
        self.query(selector)
            .is_some_and(|n| self.dom.has_class(&n, &self.controller.config().open_class))
    }

    /// Number of `change` events observed by a listener on the first match.
    #[must_use]
    pub fn change_events(&self, selector: &str) -> usize {
        self.query(selector)
            .map_or(0, |n| self.dom.observed_at(n, "change"))
    }

    /// Selection changes logged so far.
    #[must_use]
    pub fn selections(&self) -> Vec<SelectionChange> {
        self.dom
            .diagnostics()
            .into_iter()
            .filter_map(|d| match d {
                Diagnostic::SelectionChanged(change) => Some(change),
                Diagnostic::IncompleteMarkup { .. } => None,
            })
            .collect()
    }

    /// Binding warnings logged so far.
    #[must_use]
    pub fn warnings(&self) -> Vec<BindError> {
        self.dom
            .diagnostics()
            .into_iter()
            .filter_map(|d| match d {
                Diagnostic::IncompleteMarkup { error } => Some(error),
                Diagnostic::SelectionChanged(_) => None,
            })
            .collect()
    }

    // === Assertions ===

    /// Assert that the first match is open.
    ///
    /// # Panics
    ///
    /// Panics if no element matches or it is closed.
    pub fn assert_open(&self, selector: &str) -> &Self {
        assert!(self.is_open(selector), "Expected '{selector}' to be open");
        self
    }

    /// Assert that the first match is closed.
    ///
    /// # Panics
    ///
    /// Panics if no element matches or it is open.
    pub fn assert_closed(&self, selector: &str) -> &Self {
        assert!(self.exists(selector), "Expected '{selector}' to exist");
        assert!(!self.is_open(selector), "Expected '{selector}' to be closed");
        self
    }

    /// Assert the number of open widgets.
    ///
    /// # Panics
    ///
    /// Panics if the count does not match.
    pub fn assert_open_count(&self, expected: usize) -> &Self {
        let actual = self.controller.open_widgets(&self.dom).len();
        assert_eq!(
            actual, expected,
            "Expected {expected} open widgets but found {actual}"
        );
        self
    }

    /// Assert that text matches exactly.
    ///
    /// # Panics
    ///
    /// Panics if the text does not match.
    pub fn assert_text(&self, selector: &str, expected: &str) -> &Self {
        let actual = self.text(selector);
        assert_eq!(
            actual, expected,
            "Expected text '{expected}' but got '{actual}' for '{selector}'"
        );
        self
    }

    /// Assert a native control's value.
    ///
    /// # Panics
    ///
    /// Panics if the value does not match.
    pub fn assert_value(&self, selector: &str, expected: &str) -> &Self {
        let actual = self.value(selector);
        assert_eq!(
            actual, expected,
            "Expected value '{expected}' but got '{actual}' for '{selector}'"
        );
        self
    }

    /// Assert the count of matching elements.
    ///
    /// # Panics
    ///
    /// Panics if the count does not match.
    pub fn assert_count(&self, selector: &str, expected: usize) -> &Self {
        let actual = self.query_all(selector).len();
        assert_eq!(
            actual, expected,
            "Expected {expected} elements matching '{selector}' but found {actual}"
        );
        self
    }
}
