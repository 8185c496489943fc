//! Host document abstraction.
//!
//! The controller never touches a browser directly. It talks to a
//! [`DomHost`], which the browser crate implements over `web-sys` and
//! [`MemoryDom`](crate::MemoryDom) implements in memory for native tests.

use crate::diagnostics::Diagnostic;
use crate::widget::WidgetId;
use std::fmt;

/// A click listener described as data.
///
/// Hosts attach one listener per binding and route the click back into
/// [`DropdownController::handle`](crate::DropdownController::handle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    /// Click on a widget's trigger region
    Trigger(WidgetId),
    /// Click on one of a widget's option entries
    Option {
        /// Owning widget
        widget: WidgetId,
        /// Position of the option within the widget's options list
        index: usize,
    },
    /// Click that reached the document-level listener
    Outside,
}

impl Binding {
    /// Widget this binding belongs to, `None` for the document listener.
    #[must_use]
    pub const fn widget(self) -> Option<WidgetId> {
        match self {
            Self::Trigger(id) | Self::Option { widget: id, .. } => Some(id),
            Self::Outside => None,
        }
    }
}

/// Whether a handled click may keep bubbling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// Keep bubbling
    Continue,
    /// Equivalent of `event.stopPropagation()`
    Stop,
}

/// `document.readyState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadyState {
    /// Still parsing
    Loading,
    /// Parsed, subresources may still load
    Interactive,
    /// Fully loaded
    #[default]
    Complete,
}

impl ReadyState {
    /// Parse the string reported by the browser. Unknown values are
    /// treated as already parsed.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "loading" => Self::Loading,
            "interactive" => Self::Interactive,
            _ => Self::Complete,
        }
    }

    /// Whether structural content is still being parsed.
    #[must_use]
    pub const fn is_loading(self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Operations the controller needs from the host document.
///
/// Every method takes `&self`: hosts mutate through the browser or through
/// interior mutability, matching how `web-sys` handles are used.
pub trait DomHost {
    /// Element handle. Equality must be node identity.
    type Node: Clone + PartialEq + fmt::Debug;

    /// The document's root element.
    fn root(&self) -> Self::Node;

    /// Descendants of `root` carrying `class`, in document order.
    fn find_all_by_class(&self, root: &Self::Node, class: &str) -> Vec<Self::Node>;

    /// First descendant of `root` carrying `class`.
    fn find_by_class(&self, root: &Self::Node, class: &str) -> Option<Self::Node>;

    /// First descendant of `root` with tag name `tag`.
    fn find_by_tag(&self, root: &Self::Node, tag: &str) -> Option<Self::Node>;

    /// Whether `node` carries `class`.
    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    /// Add `class` to `node`.
    fn add_class(&self, node: &Self::Node, class: &str);

    /// Remove `class` from `node`.
    fn remove_class(&self, node: &Self::Node, class: &str);

    /// Toggle `class` on `node`, returning whether it is now present.
    fn toggle_class(&self, node: &Self::Node, class: &str) -> bool {
        if self.has_class(node, class) {
            self.remove_class(node, class);
            false
        } else {
            self.add_class(node, class);
            true
        }
    }

    /// Attribute value, `None` when absent.
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// `node.textContent`.
    fn text_content(&self, node: &Self::Node) -> String;

    /// Replace `node.textContent`.
    fn set_text_content(&self, node: &Self::Node, text: &str);

    /// Current value of a native form control.
    fn control_value(&self, node: &Self::Node) -> String;

    /// Assign the value of a native form control.
    fn set_control_value(&self, node: &Self::Node, value: &str);

    /// Dispatch a bubbling `change` event on `node`.
    fn dispatch_change(&self, node: &Self::Node);

    /// Attach a click listener for `binding` on `node`.
    fn listen(&self, node: &Self::Node, binding: Binding);

    /// Attach a click listener for `binding` on the document itself.
    fn listen_document(&self, binding: Binding);

    /// Detach and release every listener attached for `widget`.
    fn unlisten(&self, widget: WidgetId);

    /// Whether `node` is still attached to the document.
    fn is_connected(&self, node: &Self::Node) -> bool;

    /// Current `document.readyState`.
    fn ready_state(&self) -> ReadyState;

    /// Emit a diagnostic to the host's console.
    fn report(&self, diagnostic: &Diagnostic);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_state_parse() {
        assert_eq!(ReadyState::parse("loading"), ReadyState::Loading);
        assert_eq!(ReadyState::parse("interactive"), ReadyState::Interactive);
        assert_eq!(ReadyState::parse("complete"), ReadyState::Complete);
        assert_eq!(ReadyState::parse("bogus"), ReadyState::Complete);
    }

    #[test]
    fn test_binding_widget() {
        assert_eq!(Binding::Trigger(WidgetId(2)).widget(), Some(WidgetId(2)));
        assert_eq!(
            Binding::Option { widget: WidgetId(4), index: 1 }.widget(),
            Some(WidgetId(4))
        );
        assert_eq!(Binding::Outside.widget(), None);
    }

    #[test]
    fn test_ready_state_is_loading() {
        assert!(ReadyState::Loading.is_loading());
        assert!(!ReadyState::Interactive.is_loading());
        assert!(!ReadyState::Complete.is_loading());
    }
}
