//! `web-sys` implementation of [`DomHost`].

use custom_select_core::{
    Binding, Diagnostic, DomHost, DropdownController, Level, Propagation, ReadyState, WidgetId,
};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventInit, EventTarget, HtmlSelectElement};

/// Controller shared between the runtime and every click closure.
pub type SharedController = Rc<RefCell<DropdownController<WebDom>>>;

/// A registered click listener and the closure backing it.
struct Listener {
    target: EventTarget,
    binding: Binding,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn detach(&self) {
        self.target
            .remove_event_listener_with_callback("click", self.closure.as_ref().unchecked_ref())
            .ok();
    }
}

struct Inner {
    document: Document,
    root: Element,
    controller: RefCell<Weak<RefCell<DropdownController<WebDom>>>>,
    listeners: RefCell<Vec<Listener>>,
    // Set while a click is routed through the controller.
    handling: Cell<bool>,
    pending_changes: RefCell<Vec<Element>>,
}

/// Handle to the page document.
///
/// Cheap to clone. Click closures attached through [`DomHost::listen`]
/// are owned here until [`DomHost::unlisten`] releases their widget.
///
/// `change` events requested while a click is being handled are
/// dispatched once the controller has been released, so `change`
/// listeners may call back into `initCustomDropdowns`.
#[derive(Clone)]
pub struct WebDom {
    inner: Rc<Inner>,
}

impl WebDom {
    /// Wrap `document`.
    pub fn new(document: Document) -> Result<Self, JsValue> {
        let root = document
            .document_element()
            .ok_or("Document has no root element")?;
        Ok(Self {
            inner: Rc::new(Inner {
                document,
                root,
                controller: RefCell::new(Weak::new()),
                listeners: RefCell::new(Vec::new()),
                handling: Cell::new(false),
                pending_changes: RefCell::new(Vec::new()),
            }),
        })
    }

    /// Wrap the current window's document.
    pub fn from_window() -> Result<Self, JsValue> {
        let document = web_sys::window()
            .ok_or("No window")?
            .document()
            .ok_or("No document")?;
        Self::new(document)
    }

    /// The wrapped document.
    pub fn document(&self) -> &Document {
        &self.inner.document
    }

    /// Route clicks from listeners attached after this call to `controller`.
    pub fn attach(&self, controller: &SharedController) {
        *self.inner.controller.borrow_mut() = Rc::downgrade(controller);
    }

    /// Number of click listeners currently attached.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    fn fire_change(node: &Element) {
        let init = EventInit::new();
        init.set_bubbles(true);
        match Event::new_with_event_init_dict("change", &init) {
            Ok(event) => {
                node.dispatch_event(&event).ok();
            }
            Err(err) => web_sys::console::error_1(&err),
        }
    }

    fn flush_changes(&self) {
        let pending = std::mem::take(&mut *self.inner.pending_changes.borrow_mut());
        for node in &pending {
            Self::fire_change(node);
        }
    }

    fn add_click(&self, target: &EventTarget, binding: Binding) {
        let controller = self.inner.controller.borrow().clone();
        let dom = Rc::downgrade(&self.inner);
        let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let (Some(controller), Some(inner)) = (controller.upgrade(), dom.upgrade()) else {
                return;
            };
            let dom = WebDom { inner };
            let propagation = {
                let Ok(controller) = controller.try_borrow() else {
                    web_sys::console::warn_1(&JsValue::from_str(
                        "custom dropdown: click ignored during re-initialization",
                    ));
                    return;
                };
                dom.inner.handling.set(true);
                let propagation = controller.handle(&dom, binding);
                dom.inner.handling.set(false);
                propagation
            };
            if propagation == Propagation::Stop {
                event.stop_propagation();
            }
            dom.flush_changes();
        });
        if target
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
            .is_err()
        {
            web_sys::console::warn_1(&JsValue::from_str(&format!(
                "custom dropdown: failed to attach click listener for {binding:?}"
            )));
            return;
        }
        self.inner.listeners.borrow_mut().push(Listener {
            target: target.clone(),
            binding,
            closure,
        });
    }
}

fn class_selector(class: &str) -> String {
    format!(".{class}")
}

impl DomHost for WebDom {
    type Node = Element;

    fn root(&self) -> Element {
        self.inner.root.clone()
    }

    fn find_all_by_class(&self, root: &Element, class: &str) -> Vec<Element> {
        let Ok(list) = root.query_selector_all(&class_selector(class)) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn find_by_class(&self, root: &Element, class: &str) -> Option<Element> {
        root.query_selector(&class_selector(class)).ok().flatten()
    }

    fn find_by_tag(&self, root: &Element, tag: &str) -> Option<Element> {
        root.query_selector(tag).ok().flatten()
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&self, node: &Element, class: &str) {
        node.class_list().add_1(class).ok();
    }

    fn remove_class(&self, node: &Element, class: &str) {
        node.class_list().remove_1(class).ok();
    }

    fn toggle_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().toggle(class).unwrap_or(false)
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn text_content(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn set_text_content(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn control_value(&self, node: &Element) -> String {
        match node.dyn_ref::<HtmlSelectElement>() {
            Some(select) => select.value(),
            None => node.get_attribute("value").unwrap_or_default(),
        }
    }

    fn set_control_value(&self, node: &Element, value: &str) {
        match node.dyn_ref::<HtmlSelectElement>() {
            Some(select) => select.set_value(value),
            None => {
                node.set_attribute("value", value).ok();
            }
        }
    }

    fn dispatch_change(&self, node: &Element) {
        if self.inner.handling.get() {
            self.inner.pending_changes.borrow_mut().push(node.clone());
        } else {
            Self::fire_change(node);
        }
    }

    fn listen(&self, node: &Element, binding: Binding) {
        self.add_click(node, binding);
    }

    fn listen_document(&self, binding: Binding) {
        self.add_click(&self.inner.document, binding);
    }

    fn unlisten(&self, widget: WidgetId) {
        let released: Vec<Listener> = {
            let mut listeners = self.inner.listeners.borrow_mut();
            let (released, kept) = std::mem::take(&mut *listeners)
                .into_iter()
                .partition(|l| l.binding.widget() == Some(widget));
            *listeners = kept;
            released
        };
        for listener in &released {
            listener.detach();
        }
    }

    fn is_connected(&self, node: &Element) -> bool {
        node.is_connected()
    }

    fn ready_state(&self) -> ReadyState {
        ReadyState::parse(&self.inner.document.ready_state())
    }

    fn report(&self, diagnostic: &Diagnostic) {
        let message = JsValue::from_str(&diagnostic.message());
        match diagnostic.level() {
            Level::Warn => web_sys::console::warn_1(&message),
            Level::Info => web_sys::console::log_1(&message),
        }
    }
}
