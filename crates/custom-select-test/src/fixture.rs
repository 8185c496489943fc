//! Markup fixtures for custom select widgets.
//!
//! # Example
//!
//! ```
//! use custom_select_core::{DomHost, MemoryDom};
//! use custom_select_test::fixture::WidgetFixture;
//!
//! let dom = MemoryDom::new();
//! let built = WidgetFixture::new("sortOrder")
//!     .selected_option("asc", "Ascending")
//!     .option("desc", "Descending")
//!     .build(&dom, dom.root());
//! assert_eq!(built.options.len(), 2);
//! ```

use custom_select_core::{DomHost, MemoryDom, NodeId, SelectConfig, WidgetPart};

/// One option entry, mirrored into the native control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    /// Value token
    pub value: String,
    /// Display label
    pub label: String,
    /// Initially selected
    pub selected: bool,
}

/// Element handles of a built widget. Omitted parts are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltWidget {
    /// Container element
    pub container: NodeId,
    /// Trigger region
    pub trigger: Option<NodeId>,
    /// Value display inside the trigger
    pub value_display: Option<NodeId>,
    /// Options list
    pub options_list: Option<NodeId>,
    /// Native `<select>`
    pub native: Option<NodeId>,
    /// Custom option entries, in order
    pub options: Vec<NodeId>,
}

/// Builder for the widget markup contract.
#[derive(Debug, Clone, Default)]
pub struct WidgetFixture {
    name: Option<String>,
    options: Vec<OptionSpec>,
    omit: Vec<WidgetPart>,
    config: SelectConfig,
}

impl WidgetFixture {
    /// Widget carrying `name` in its name attribute.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Widget without a name attribute.
    #[must_use]
    pub fn unnamed() -> Self {
        Self::default()
    }

    /// Build with non-default class names.
    #[must_use]
    pub fn config(mut self, config: SelectConfig) -> Self {
        self.config = config;
        self
    }

    /// Add an option.
    #[must_use]
    pub fn option(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.options.push(OptionSpec {
            value: value.into(),
            label: label.into(),
            selected: false,
        });
        self
    }

    /// Add the initially selected option.
    #[must_use]
    pub fn selected_option(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.options.push(OptionSpec {
            value: value.into(),
            label: label.into(),
            selected: true,
        });
        self
    }

    /// Leave a required part out of the markup.
    #[must_use]
    pub fn without(mut self, part: WidgetPart) -> Self {
        self.omit.push(part);
        self
    }

    fn includes(&self, part: WidgetPart) -> bool {
        !self.omit.contains(&part)
    }

    fn initial_label(&self) -> String {
        self.options
            .iter()
            .find(|o| o.selected)
            .or_else(|| self.options.first())
            .map(|o| o.label.clone())
            .unwrap_or_default()
    }

    /// Build the markup under `parent`.
    pub fn build(&self, dom: &MemoryDom, parent: NodeId) -> BuiltWidget {
        let config = &self.config;
        let container = child(dom, parent, "div", &config.container_class);
        if let Some(name) = &self.name {
            dom.set_attribute(container, &config.name_attribute, name);
        }

        let trigger = self
            .includes(WidgetPart::Trigger)
            .then(|| child(dom, container, "div", &config.trigger_class));
        let value_display = self.includes(WidgetPart::ValueDisplay).then(|| {
            let holder = trigger.unwrap_or(container);
            let value = child(dom, holder, "span", &config.value_class);
            dom.set_text_content(&value, &self.initial_label());
            value
        });
        if let Some(trigger) = trigger {
            child(dom, trigger, "span", "bm-custom-select-arrow");
        }

        let options_list = self
            .includes(WidgetPart::Options)
            .then(|| child(dom, container, "div", &config.options_class));
        let mut options = Vec::new();
        if let Some(list) = options_list {
            for spec in &self.options {
                let entry = child(dom, list, "div", &config.option_class);
                if spec.selected {
                    dom.add_class(&entry, &config.selected_class);
                }
                dom.set_attribute(entry, &config.value_attribute, &spec.value);
                dom.set_text_content(&entry, &spec.label);
                options.push(entry);
            }
        }

        let native = self.includes(WidgetPart::NativeControl).then(|| {
            let select = child(dom, container, &config.native_tag, "");
            if let Some(name) = &self.name {
                dom.set_attribute(select, "name", name);
            }
            for spec in &self.options {
                let option = child(dom, select, "option", "");
                dom.set_attribute(option, "value", &spec.value);
                if spec.selected {
                    dom.set_attribute(option, "selected", "");
                }
                dom.set_text_content(&option, &spec.label);
            }
            select
        });

        BuiltWidget {
            container,
            trigger,
            value_display,
            options_list,
            native,
            options,
        }
    }
}

fn child(dom: &MemoryDom, parent: NodeId, tag: &str, class: &str) -> NodeId {
    let node = dom.create_element(tag);
    if !class.is_empty() {
        dom.add_class(&node, class);
    }
    dom.append_child(parent, node);
    node
}

/// The two-option widget used throughout the scenarios.
#[must_use]
pub fn sort_order() -> WidgetFixture {
    WidgetFixture::new("sortOrder")
        .selected_option("asc", "Ascending")
        .option("desc", "Descending")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_full_widget() {
        let dom = MemoryDom::new();
        let built = sort_order().build(&dom, dom.root());

        assert_eq!(dom.attribute(&built.container, "data-name").as_deref(), Some("sortOrder"));
        let value = built.value_display.unwrap();
        assert_eq!(dom.text_content(&value), "Ascending");
        assert_eq!(dom.parent(value), built.trigger);
        assert_eq!(built.options.len(), 2);
        assert!(dom.has_class(&built.options[0], "selected"));
        assert!(!dom.has_class(&built.options[1], "selected"));
        assert_eq!(dom.control_value(&built.native.unwrap()), "asc");
    }

    #[test]
    fn test_build_without_part() {
        let dom = MemoryDom::new();
        let built = sort_order()
            .without(WidgetPart::ValueDisplay)
            .build(&dom, dom.root());
        assert!(built.value_display.is_none());
        assert!(built.trigger.is_some());
        assert_eq!(dom.find_by_class(&built.container, "bm-custom-select-value"), None);
    }

    #[test]
    fn test_build_without_trigger_keeps_value_display() {
        let dom = MemoryDom::new();
        let built = sort_order().without(WidgetPart::Trigger).build(&dom, dom.root());
        assert_eq!(dom.parent(built.value_display.unwrap()), Some(built.container));
    }

    #[test]
    fn test_unnamed_widget() {
        let dom = MemoryDom::new();
        let built = WidgetFixture::unnamed().option("x", "X").build(&dom, dom.root());
        assert_eq!(dom.attribute(&built.container, "data-name"), None);
        assert_eq!(dom.text_content(&built.value_display.unwrap()), "X");
    }
}
