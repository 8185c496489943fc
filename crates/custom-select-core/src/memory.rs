//! In-memory document for native builds and tests.
//!
//! Models just enough of the DOM for the controller: an element tree with
//! tags, classes, attributes and text, native `<select>` value semantics,
//! click listeners recorded as [`Binding`]s, dispatched events, and the
//! diagnostics the browser would write to its console.
//!
//! # Example
//!
//! ```
//! use custom_select_core::{DomHost, MemoryDom};
//!
//! let dom = MemoryDom::new();
//! let div = dom.create_element("div");
//! dom.add_class(&div, "open");
//! dom.append_child(dom.root(), div);
//! assert!(dom.has_class(&div, "open"));
//! assert!(dom.is_connected(&div));
//! ```

use crate::diagnostics::Diagnostic;
use crate::host::{Binding, DomHost, ReadyState};
use crate::widget::WidgetId;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// Handle to an element in a [`MemoryDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Index into the document's node arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// An event dispatched on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchedEvent {
    /// Event type, e.g. `"change"`
    pub name: String,
    /// Dispatch target
    pub target: NodeId,
    /// Whether the event bubbles to ancestors
    pub bubbles: bool,
}

#[derive(Debug, Default)]
struct NodeData {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    text: String,
    value: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    bindings: Vec<Binding>,
}

/// Element tree held in memory.
#[derive(Debug)]
pub struct MemoryDom {
    nodes: RefCell<Vec<NodeData>>,
    document_bindings: RefCell<Vec<Binding>>,
    events: RefCell<Vec<DispatchedEvent>>,
    diagnostics: RefCell<Vec<Diagnostic>>,
    ready_state: Cell<ReadyState>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

const ROOT: NodeId = NodeId(0);

impl MemoryDom {
    /// Create a fully loaded document holding only its root element.
    #[must_use]
    pub fn new() -> Self {
        let root = NodeData {
            tag: "html".to_string(),
            ..NodeData::default()
        };
        Self {
            nodes: RefCell::new(vec![root]),
            document_bindings: RefCell::new(Vec::new()),
            events: RefCell::new(Vec::new()),
            diagnostics: RefCell::new(Vec::new()),
            ready_state: Cell::new(ReadyState::Complete),
        }
    }

    // === Tree construction ===

    /// Create a detached element.
    pub fn create_element(&self, tag: &str) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(NodeData {
            tag: tag.to_ascii_lowercase(),
            ..NodeData::default()
        });
        NodeId(nodes.len() - 1)
    }

    /// Append `child` to `parent`, moving it if it already has a parent.
    pub fn append_child(&self, parent: NodeId, child: NodeId) {
        self.detach(child);
        let mut nodes = self.nodes.borrow_mut();
        nodes[child.0].parent = Some(parent);
        nodes[parent.0].children.push(child);
    }

    /// Detach `node` (and its subtree) from its parent.
    pub fn remove(&self, node: NodeId) {
        self.detach(node);
    }

    fn detach(&self, node: NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(parent) = nodes[node.0].parent.take() {
            nodes[parent.0].children.retain(|&c| c != node);
        }
    }

    /// Set an attribute. `class` replaces the class list.
    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let data = &mut nodes[node.0];
        if name == "class" {
            data.classes = value.split_whitespace().map(str::to_string).collect();
        } else {
            data.attributes.insert(name.to_string(), value.to_string());
        }
    }

    /// Remove an attribute.
    pub fn remove_attribute(&self, node: NodeId, name: &str) {
        let mut nodes = self.nodes.borrow_mut();
        if name == "class" {
            nodes[node.0].classes.clear();
        } else {
            nodes[node.0].attributes.remove(name);
        }
    }

    /// Set the document's ready state.
    pub fn set_ready_state(&self, state: ReadyState) {
        self.ready_state.set(state);
    }

    // === Inspection ===

    /// Lowercase tag name.
    #[must_use]
    pub fn tag(&self, node: NodeId) -> String {
        self.nodes.borrow()[node.0].tag.clone()
    }

    /// Class list in insertion order.
    #[must_use]
    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.nodes.borrow()[node.0].classes.clone()
    }

    /// Parent element.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.borrow()[node.0].parent
    }

    /// Child elements.
    #[must_use]
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes.borrow()[node.0].children.clone()
    }

    /// Descendants of `root` in document order, excluding `root`.
    #[must_use]
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let nodes = self.nodes.borrow();
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = nodes[root.0].children.iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(nodes[node.0].children.iter().rev().copied());
        }
        out
    }

    /// `node` followed by its ancestors up to the root.
    #[must_use]
    pub fn ancestors_inclusive(&self, node: NodeId) -> Vec<NodeId> {
        let nodes = self.nodes.borrow();
        let mut path = vec![node];
        let mut current = node;
        while let Some(parent) = nodes[current.0].parent {
            path.push(parent);
            current = parent;
        }
        path
    }

    /// Whether `ancestor` contains `node` (inclusive).
    #[must_use]
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors_inclusive(node).contains(&ancestor)
    }

    /// Click bindings attached to `node`, in attachment order.
    #[must_use]
    pub fn bindings(&self, node: NodeId) -> Vec<Binding> {
        self.nodes.borrow()[node.0].bindings.clone()
    }

    /// Click bindings attached to the document.
    #[must_use]
    pub fn document_bindings(&self) -> Vec<Binding> {
        self.document_bindings.borrow().clone()
    }

    /// Total number of click listeners in the document.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        let on_nodes: usize = self.nodes.borrow().iter().map(|n| n.bindings.len()).sum();
        on_nodes + self.document_bindings.borrow().len()
    }

    /// Every event dispatched so far.
    #[must_use]
    pub fn events(&self) -> Vec<DispatchedEvent> {
        self.events.borrow().clone()
    }

    /// Number of `name` events a listener on `node` would have observed,
    /// either as target or through bubbling.
    #[must_use]
    pub fn observed_at(&self, node: NodeId, name: &str) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.name == name)
            .filter(|e| e.target == node || (e.bubbles && self.contains(node, e.target)))
            .count()
    }

    /// Diagnostics reported so far.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Drain reported diagnostics.
    pub fn take_diagnostics(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diagnostics.borrow_mut())
    }

    fn option_values(&self, select: NodeId) -> Vec<(String, bool)> {
        self.descendants(select)
            .into_iter()
            .filter(|&n| self.tag(n) == "option")
            .map(|n| {
                let value = self
                    .attribute(&n, "value")
                    .unwrap_or_else(|| self.text_content(&n));
                let selected = self.attribute(&n, "selected").is_some();
                (value, selected)
            })
            .collect()
    }
}

impl DomHost for MemoryDom {
    type Node = NodeId;

    fn root(&self) -> NodeId {
        ROOT
    }

    fn find_all_by_class(&self, root: &NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(*root)
            .into_iter()
            .filter(|n| self.has_class(n, class))
            .collect()
    }

    fn find_by_class(&self, root: &NodeId, class: &str) -> Option<NodeId> {
        self.descendants(*root)
            .into_iter()
            .find(|n| self.has_class(n, class))
    }

    fn find_by_tag(&self, root: &NodeId, tag: &str) -> Option<NodeId> {
        let tag = tag.to_ascii_lowercase();
        self.descendants(*root)
            .into_iter()
            .find(|&n| self.tag(n) == tag)
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.nodes.borrow()[node.0].classes.iter().any(|c| c == class)
    }

    fn add_class(&self, node: &NodeId, class: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let classes = &mut nodes[node.0].classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    fn remove_class(&self, node: &NodeId, class: &str) {
        self.nodes.borrow_mut()[node.0].classes.retain(|c| c != class);
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        let nodes = self.nodes.borrow();
        let data = &nodes[node.0];
        if name == "class" {
            return (!data.classes.is_empty()).then(|| data.classes.join(" "));
        }
        data.attributes.get(name).cloned()
    }

    fn text_content(&self, node: &NodeId) -> String {
        let mut text = self.nodes.borrow()[node.0].text.clone();
        for child in self.children(*node) {
            text.push_str(&self.text_content(&child));
        }
        text
    }

    fn set_text_content(&self, node: &NodeId, text: &str) {
        for child in self.children(*node) {
            self.detach(child);
        }
        self.nodes.borrow_mut()[node.0].text = text.to_string();
    }

    fn control_value(&self, node: &NodeId) -> String {
        if let Some(value) = self.nodes.borrow()[node.0].value.clone() {
            return value;
        }
        if self.tag(*node) != "select" {
            return self.attribute(node, "value").unwrap_or_default();
        }
        let options = self.option_values(*node);
        options
            .iter()
            .find(|(_, selected)| *selected)
            .or_else(|| options.first())
            .map(|(value, _)| value.clone())
            .unwrap_or_default()
    }

    fn set_control_value(&self, node: &NodeId, value: &str) {
        let stored = if self.tag(*node) == "select" {
            // A select with no matching option reports an empty value.
            let matches = self.option_values(*node).iter().any(|(v, _)| v == value);
            if matches {
                value.to_string()
            } else {
                String::new()
            }
        } else {
            value.to_string()
        };
        self.nodes.borrow_mut()[node.0].value = Some(stored);
    }

    fn dispatch_change(&self, node: &NodeId) {
        self.events.borrow_mut().push(DispatchedEvent {
            name: "change".to_string(),
            target: *node,
            bubbles: true,
        });
    }

    fn listen(&self, node: &NodeId, binding: Binding) {
        self.nodes.borrow_mut()[node.0].bindings.push(binding);
    }

    fn listen_document(&self, binding: Binding) {
        self.document_bindings.borrow_mut().push(binding);
    }

    fn unlisten(&self, widget: WidgetId) {
        for node in self.nodes.borrow_mut().iter_mut() {
            node.bindings.retain(|b| b.widget() != Some(widget));
        }
    }

    fn is_connected(&self, node: &NodeId) -> bool {
        self.ancestors_inclusive(*node).last() == Some(&ROOT)
    }

    fn ready_state(&self) -> ReadyState {
        self.ready_state.get()
    }

    fn report(&self, diagnostic: &Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn select_with(dom: &MemoryDom, values: &[(&str, bool)]) -> NodeId {
        let select = dom.create_element("select");
        for (value, selected) in values {
            let option = dom.create_element("option");
            dom.set_attribute(option, "value", value);
            if *selected {
                dom.set_attribute(option, "selected", "");
            }
            dom.append_child(select, option);
        }
        dom.append_child(dom.root(), select);
        select
    }

    #[test]
    fn test_descendants_document_order() {
        let dom = MemoryDom::new();
        let a = dom.create_element("div");
        let b = dom.create_element("span");
        let c = dom.create_element("div");
        dom.append_child(dom.root(), a);
        dom.append_child(a, b);
        dom.append_child(dom.root(), c);
        assert_eq!(dom.descendants(dom.root()), vec![a, b, c]);
    }

    #[test]
    fn test_class_operations() {
        let dom = MemoryDom::new();
        let node = dom.create_element("div");
        dom.add_class(&node, "open");
        dom.add_class(&node, "open");
        assert_eq!(dom.classes(node), vec!["open".to_string()]);
        assert!(!dom.toggle_class(&node, "open"));
        assert!(!dom.has_class(&node, "open"));
        assert!(dom.toggle_class(&node, "open"));
        assert!(dom.has_class(&node, "open"));
    }

    #[test]
    fn test_class_attribute_roundtrip() {
        let dom = MemoryDom::new();
        let node = dom.create_element("div");
        dom.set_attribute(node, "class", "a  b");
        assert!(dom.has_class(&node, "b"));
        assert_eq!(dom.attribute(&node, "class").as_deref(), Some("a b"));
        dom.remove_attribute(node, "class");
        assert_eq!(dom.attribute(&node, "class"), None);
    }

    #[test]
    fn test_text_content_concatenates_children() {
        let dom = MemoryDom::new();
        let parent = dom.create_element("div");
        let left = dom.create_element("span");
        let right = dom.create_element("span");
        dom.set_text_content(&left, "Hello, ");
        dom.set_text_content(&right, "world");
        dom.append_child(parent, left);
        dom.append_child(parent, right);
        assert_eq!(dom.text_content(&parent), "Hello, world");

        dom.set_text_content(&parent, "Replaced");
        assert_eq!(dom.text_content(&parent), "Replaced");
        assert!(dom.children(parent).is_empty());
    }

    #[test]
    fn test_select_value_defaults_to_selected_option() {
        let dom = MemoryDom::new();
        let select = select_with(&dom, &[("asc", false), ("desc", true)]);
        assert_eq!(dom.control_value(&select), "desc");
    }

    #[test]
    fn test_select_value_defaults_to_first_option() {
        let dom = MemoryDom::new();
        let select = select_with(&dom, &[("asc", false), ("desc", false)]);
        assert_eq!(dom.control_value(&select), "asc");
    }

    #[test]
    fn test_select_value_unknown_becomes_empty() {
        let dom = MemoryDom::new();
        let select = select_with(&dom, &[("asc", true)]);
        dom.set_control_value(&select, "nope");
        assert_eq!(dom.control_value(&select), "");
        dom.set_control_value(&select, "asc");
        assert_eq!(dom.control_value(&select), "asc");
    }

    #[test]
    fn test_option_without_value_uses_text() {
        let dom = MemoryDom::new();
        let select = dom.create_element("select");
        let option = dom.create_element("option");
        dom.set_text_content(&option, "Plain");
        dom.append_child(select, option);
        assert_eq!(dom.control_value(&select), "Plain");
    }

    #[test]
    fn test_change_observed_through_bubbling() {
        let dom = MemoryDom::new();
        let form = dom.create_element("form");
        dom.append_child(dom.root(), form);
        let select = select_with(&dom, &[("a", true)]);
        dom.append_child(form, select);
        let sibling = dom.create_element("div");
        dom.append_child(dom.root(), sibling);

        dom.dispatch_change(&select);
        assert_eq!(dom.observed_at(select, "change"), 1);
        assert_eq!(dom.observed_at(form, "change"), 1);
        assert_eq!(dom.observed_at(dom.root(), "change"), 1);
        assert_eq!(dom.observed_at(sibling, "change"), 0);
        assert_eq!(dom.observed_at(select, "input"), 0);
    }

    #[test]
    fn test_connection_tracking() {
        let dom = MemoryDom::new();
        let node = dom.create_element("div");
        assert!(!dom.is_connected(&node));
        dom.append_child(dom.root(), node);
        assert!(dom.is_connected(&node));
        dom.remove(node);
        assert!(!dom.is_connected(&node));
        assert!(dom.is_connected(&dom.root()));
    }

    #[test]
    fn test_listeners_recorded() {
        let dom = MemoryDom::new();
        let node = dom.create_element("div");
        dom.listen(&node, Binding::Outside);
        dom.listen_document(Binding::Outside);
        assert_eq!(dom.bindings(node), vec![Binding::Outside]);
        assert_eq!(dom.document_bindings(), vec![Binding::Outside]);
        assert_eq!(dom.listener_count(), 2);
    }

    #[test]
    fn test_unlisten_releases_only_that_widget() {
        let dom = MemoryDom::new();
        let a = dom.create_element("div");
        let b = dom.create_element("div");
        dom.listen(&a, Binding::Trigger(WidgetId(0)));
        dom.listen(&a, Binding::Option { widget: WidgetId(0), index: 0 });
        dom.listen(&b, Binding::Trigger(WidgetId(1)));
        dom.listen_document(Binding::Outside);

        dom.unlisten(WidgetId(0));

        assert!(dom.bindings(a).is_empty());
        assert_eq!(dom.bindings(b), vec![Binding::Trigger(WidgetId(1))]);
        assert_eq!(dom.document_bindings(), vec![Binding::Outside]);
        assert_eq!(dom.listener_count(), 2);
    }

    #[test]
    fn test_find_by_tag_case_insensitive() {
        let dom = MemoryDom::new();
        let select = select_with(&dom, &[("a", true)]);
        assert_eq!(dom.find_by_tag(&dom.root(), "SELECT"), Some(select));
    }
}
