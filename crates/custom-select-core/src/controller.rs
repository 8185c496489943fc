//! Dropdown controller: binding, open/close and selection.
//!
//! The controller owns an ordered registry of bound widgets. Hosts attach
//! the listeners it asks for and route every click back through
//! [`DropdownController::handle`].

use crate::config::SelectConfig;
use crate::diagnostics::{Diagnostic, SelectionChange};
use crate::error::BindError;
use crate::host::{Binding, DomHost, Propagation, ReadyState};
use crate::widget::{Widget, WidgetId};
use std::collections::BTreeMap;

/// When initial binding should run for a given ready state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitTiming {
    /// Bind now
    Immediate,
    /// Bind on `DOMContentLoaded`
    OnContentLoaded,
}

impl InitTiming {
    /// Defer while the document is still loading, bind immediately otherwise.
    #[must_use]
    pub const fn for_state(state: ReadyState) -> Self {
        if state.is_loading() {
            Self::OnContentLoaded
        } else {
            Self::Immediate
        }
    }
}

/// Outcome of a bind pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindReport {
    /// Widgets wired during this pass
    pub bound: Vec<WidgetId>,
    /// Containers skipped for incomplete markup
    pub skipped: Vec<BindError>,
    /// Containers found that were already registered
    pub already_bound: usize,
    /// Registered widgets dropped because they left the document
    pub pruned: usize,
    /// Option entries newly wired on already registered widgets
    pub adopted_options: usize,
}

/// Binds widget markup and maintains the open-set and selection invariants.
pub struct DropdownController<D: DomHost> {
    config: SelectConfig,
    widgets: BTreeMap<WidgetId, Widget<D::Node>>,
    next_id: u64,
    document_listener: bool,
}

impl<D: DomHost> Default for DropdownController<D> {
    fn default() -> Self {
        Self::new(SelectConfig::default())
    }
}

impl<D: DomHost> DropdownController<D> {
    /// Create a controller with no widgets registered.
    #[must_use]
    pub fn new(config: SelectConfig) -> Self {
        Self {
            config,
            widgets: BTreeMap::new(),
            next_id: 0,
            document_listener: false,
        }
    }

    /// Active configuration.
    pub const fn config(&self) -> &SelectConfig {
        &self.config
    }

    /// Replace the configuration. Already bound widgets keep the parts they
    /// were resolved with; class names used for open and selected state
    /// change immediately.
    pub fn set_config(&mut self, config: SelectConfig) {
        self.config = config;
    }

    // === Binding ===

    /// Bind every widget in the document.
    pub fn init(&mut self, dom: &D) -> BindReport {
        let root = dom.root();
        self.rebind(dom, &root)
    }

    /// Bind every widget container in `scope` (inclusive) that is not
    /// already registered.
    ///
    /// Safe to call repeatedly: registered containers are not bound again,
    /// so no listener is ever attached twice, and the document-level
    /// listener is attached on the first call only. Option entries added to
    /// a registered widget since its last scan are wired. Registered widgets
    /// whose container has left the document are pruned first, releasing
    /// their listeners.
    pub fn rebind(&mut self, dom: &D, scope: &D::Node) -> BindReport {
        let mut report = BindReport {
            pruned: self.prune(dom),
            ..BindReport::default()
        };

        if !self.document_listener {
            dom.listen_document(Binding::Outside);
            self.document_listener = true;
        }

        let class = &self.config.container_class;
        let mut containers = Vec::new();
        if dom.has_class(scope, class) {
            containers.push(scope.clone());
        }
        containers.extend(dom.find_all_by_class(scope, class));

        for container in containers {
            if let Some(id) = self.widget_for(&container) {
                report.already_bound += 1;
                if let Some(widget) = self.widgets.get_mut(&id) {
                    for index in widget.adopt_options(dom, &self.config) {
                        if let Some(option) = widget.option(index) {
                            dom.listen(option, Binding::Option { widget: id, index });
                            report.adopted_options += 1;
                        }
                    }
                }
                continue;
            }
            let id = WidgetId(self.next_id);
            match Widget::resolve(dom, &self.config, container, id) {
                Ok(widget) => {
                    self.next_id += 1;
                    Self::wire(dom, &widget);
                    self.widgets.insert(id, widget);
                    report.bound.push(id);
                }
                Err(err) => {
                    dom.report(&Diagnostic::from(err.clone()));
                    report.skipped.push(err);
                }
            }
        }

        report
    }

    fn wire(dom: &D, widget: &Widget<D::Node>) {
        let id = widget.id();
        dom.listen(widget.trigger(), Binding::Trigger(id));
        for (index, option) in widget.options().iter().enumerate() {
            dom.listen(option, Binding::Option { widget: id, index });
        }
    }

    fn prune(&mut self, dom: &D) -> usize {
        let detached: Vec<WidgetId> = self
            .widgets
            .values()
            .filter(|w| !dom.is_connected(w.container()))
            .map(Widget::id)
            .collect();
        for id in &detached {
            self.widgets.remove(id);
            dom.unlisten(*id);
        }
        detached.len()
    }

    // === Event handling ===

    /// Run the behaviour for a click routed through `binding`.
    ///
    /// Bindings that refer to a widget no longer registered are ignored.
    pub fn handle(&self, dom: &D, binding: Binding) -> Propagation {
        match binding {
            Binding::Trigger(id) => {
                if self.widgets.contains_key(&id) {
                    self.close_all_except(dom, Some(id));
                    self.toggle(dom, id);
                    Propagation::Stop
                } else {
                    Propagation::Continue
                }
            }
            Binding::Option { widget, index } => {
                if self.select(dom, widget, index).is_some() {
                    Propagation::Stop
                } else {
                    Propagation::Continue
                }
            }
            Binding::Outside => {
                self.close_all(dom);
                Propagation::Continue
            }
        }
    }

    /// Toggle one widget, returning its new open state.
    pub fn toggle(&self, dom: &D, id: WidgetId) -> Option<bool> {
        let widget = self.widgets.get(&id)?;
        Some(dom.toggle_class(widget.container(), &self.config.open_class))
    }

    /// Close every registered widget except `keep`.
    pub fn close_all_except(&self, dom: &D, keep: Option<WidgetId>) {
        let open = &self.config.open_class;
        for widget in self.widgets.values() {
            if Some(widget.id()) != keep && dom.has_class(widget.container(), open) {
                dom.remove_class(widget.container(), open);
            }
        }
    }

    /// Close every registered widget.
    pub fn close_all(&self, dom: &D) {
        self.close_all_except(dom, None);
    }

    /// Select option `index` of widget `id`.
    ///
    /// Moves the selected marker, copies the label into the value display,
    /// assigns the native control, dispatches a bubbling `change` on it,
    /// closes the widget and logs the change.
    pub fn select(&self, dom: &D, id: WidgetId, index: usize) -> Option<SelectionChange> {
        let widget = self.widgets.get(&id)?;
        let option = widget.option(index)?;
        let config = &self.config;

        for sibling in dom.find_all_by_class(widget.options_list(), &config.option_class) {
            dom.remove_class(&sibling, &config.selected_class);
        }
        dom.add_class(option, &config.selected_class);

        let text = dom.text_content(option);
        dom.set_text_content(widget.value_display(), &text);

        let value = dom
            .attribute(option, &config.value_attribute)
            .unwrap_or_default();
        dom.set_control_value(widget.native(), &value);
        dom.dispatch_change(widget.native());

        dom.remove_class(widget.container(), &config.open_class);

        let change = SelectionChange {
            name: widget.name().map(str::to_string),
            value,
            text,
        };
        dom.report(&Diagnostic::SelectionChanged(change.clone()));
        Some(change)
    }

    // === Queries ===

    /// Whether widget `id` is open.
    pub fn is_open(&self, dom: &D, id: WidgetId) -> bool {
        self.widgets
            .get(&id)
            .is_some_and(|w| dom.has_class(w.container(), &self.config.open_class))
    }

    /// Ids of every open widget, in registry order.
    pub fn open_widgets(&self, dom: &D) -> Vec<WidgetId> {
        self.widgets
            .keys()
            .copied()
            .filter(|&id| self.is_open(dom, id))
            .collect()
    }

    /// Registered widget by id.
    pub fn widget(&self, id: WidgetId) -> Option<&Widget<D::Node>> {
        self.widgets.get(&id)
    }

    /// Id of the widget registered for `container`.
    pub fn widget_for(&self, container: &D::Node) -> Option<WidgetId> {
        self.widgets
            .values()
            .find(|w| w.container() == container)
            .map(Widget::id)
    }

    /// Registered widgets in discovery order.
    pub fn widgets(&self) -> impl Iterator<Item = &Widget<D::Node>> {
        self.widgets.values()
    }

    /// Number of registered widgets.
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    /// Whether no widget is registered.
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}
