//! Widget instances resolved from markup.

use crate::config::SelectConfig;
use crate::error::BindError;
use crate::host::DomHost;
use serde::Serialize;
use std::fmt;

/// Registry handle for a bound widget. Assigned in discovery order and
/// never reused by the same controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WidgetId(pub u64);

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "widget#{}", self.0)
    }
}

/// A required sub-element of a widget container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetPart {
    /// Clickable region toggling the widget
    Trigger,
    /// Element holding the option entries
    Options,
    /// Element showing the selected label
    ValueDisplay,
    /// Paired native form control
    NativeControl,
}

impl fmt::Display for WidgetPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Trigger => "trigger",
            Self::Options => "options list",
            Self::ValueDisplay => "value display",
            Self::NativeControl => "native control",
        };
        f.write_str(label)
    }
}

/// A fully resolved widget instance.
#[derive(Debug, Clone)]
pub struct Widget<N> {
    id: WidgetId,
    name: Option<String>,
    container: N,
    trigger: N,
    options_list: N,
    value_display: N,
    native: N,
    options: Vec<N>,
}

impl<N: Clone + PartialEq> Widget<N> {
    /// Resolve the sub-elements of `container`.
    ///
    /// All four parts are looked up before failing, so the error names
    /// every missing one.
    pub fn resolve<D>(
        dom: &D,
        config: &SelectConfig,
        container: N,
        id: WidgetId,
    ) -> Result<Self, BindError>
    where
        D: DomHost<Node = N>,
    {
        let name = dom.attribute(&container, &config.name_attribute);
        let trigger = dom.find_by_class(&container, &config.trigger_class);
        let options_list = dom.find_by_class(&container, &config.options_class);
        let value_display = dom.find_by_class(&container, &config.value_class);
        let native = dom.find_by_tag(&container, &config.native_tag);

        match (trigger, options_list, value_display, native) {
            (Some(trigger), Some(options_list), Some(value_display), Some(native)) => {
                let options = dom.find_all_by_class(&options_list, &config.option_class);
                Ok(Self {
                    id,
                    name,
                    container,
                    trigger,
                    options_list,
                    value_display,
                    native,
                    options,
                })
            }
            (trigger, options_list, value_display, native) => {
                let missing = [
                    (trigger.is_none(), WidgetPart::Trigger),
                    (options_list.is_none(), WidgetPart::Options),
                    (value_display.is_none(), WidgetPart::ValueDisplay),
                    (native.is_none(), WidgetPart::NativeControl),
                ]
                .into_iter()
                .filter_map(|(absent, part)| absent.then_some(part))
                .collect();
                Err(BindError::IncompleteWidgetMarkup { name, missing })
            }
        }
    }

    /// Registry handle.
    pub const fn id(&self) -> WidgetId {
        self.id
    }

    /// Name attribute captured at bind time.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Container element.
    pub const fn container(&self) -> &N {
        &self.container
    }

    /// Trigger element.
    pub const fn trigger(&self) -> &N {
        &self.trigger
    }

    /// Options list element.
    pub const fn options_list(&self) -> &N {
        &self.options_list
    }

    /// Value display element.
    pub const fn value_display(&self) -> &N {
        &self.value_display
    }

    /// Native form control.
    pub const fn native(&self) -> &N {
        &self.native
    }

    /// Option entries adopted so far, in discovery order. Indices are
    /// stable for the widget's lifetime.
    pub fn options(&self) -> &[N] {
        &self.options
    }

    /// Adopt option entries added to the options list since the last scan.
    ///
    /// Known entries keep their index, so listeners bound to them stay
    /// valid. Returns the indices of the newly adopted entries.
    pub fn adopt_options<D>(&mut self, dom: &D, config: &SelectConfig) -> Vec<usize>
    where
        D: DomHost<Node = N>,
    {
        let start = self.options.len();
        for option in dom.find_all_by_class(&self.options_list, &config.option_class) {
            if !self.options.contains(&option) {
                self.options.push(option);
            }
        }
        (start..self.options.len()).collect()
    }

    /// Option entry at `index`.
    pub fn option(&self, index: usize) -> Option<&N> {
        self.options.get(index)
    }
}
