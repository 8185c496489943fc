//! WASM browser tests - run with `wasm-pack test --headless --chrome`

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use custom_select::{DomHost, DropdownController, Propagation, WebDom};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, EventInit, HtmlSelectElement};

const SORT_ORDER: &str = r#"
<div class="bm-custom-select" data-name="sortOrder">
  <div class="bm-custom-select-trigger">
    <span class="bm-custom-select-value">Ascending</span>
    <span class="bm-custom-select-arrow"></span>
  </div>
  <div class="bm-custom-select-options">
    <div class="bm-custom-select-option selected" data-value="asc">Ascending</div>
    <div class="bm-custom-select-option" data-value="desc">Descending</div>
  </div>
  <select name="sortOrder">
    <option value="asc" selected>Ascending</option>
    <option value="desc">Descending</option>
  </select>
</div>
"#;

fn mount(html: &str) -> Element {
    let document = web_sys::window().unwrap().document().unwrap();
    let host = document.create_element("div").unwrap();
    host.set_inner_html(html);
    document.body().unwrap().append_child(&host).unwrap();
    host
}

fn bound_page(host: &Element) -> (WebDom, Rc<RefCell<DropdownController<WebDom>>>) {
    let dom = WebDom::from_window().unwrap();
    let controller = Rc::new(RefCell::new(DropdownController::default()));
    dom.attach(&controller);
    controller.borrow_mut().rebind(&dom, host);
    // Listeners stay registered on the shared document after the test.
    std::mem::forget(dom.clone());
    (dom, controller)
}

fn click(host: &Element, selector: &str) {
    let init = EventInit::new();
    init.set_bubbles(true);
    let event = Event::new_with_event_init_dict("click", &init).unwrap();
    host.query_selector(selector)
        .unwrap()
        .unwrap()
        .dispatch_event(&event)
        .unwrap();
}

fn is_open(host: &Element) -> bool {
    host.query_selector(".bm-custom-select")
        .unwrap()
        .unwrap()
        .class_list()
        .contains("open")
}

#[wasm_bindgen_test]
fn test_trigger_opens_and_survives_document_listener() {
    let host = mount(SORT_ORDER);
    let _page = bound_page(&host);

    click(&host, ".bm-custom-select-trigger");
    assert!(is_open(&host));

    click(&host, ".bm-custom-select-trigger");
    assert!(!is_open(&host));
}

#[wasm_bindgen_test]
fn test_outside_click_closes() {
    let host = mount(&format!("{SORT_ORDER}<p id=\"outside\">x</p>"));
    let _page = bound_page(&host);

    click(&host, ".bm-custom-select-trigger");
    click(&host, "#outside");
    assert!(!is_open(&host));
}

#[wasm_bindgen_test]
fn test_selection_updates_native_and_bubbles_change() {
    let host = mount(SORT_ORDER);
    let _page = bound_page(&host);

    let seen = Rc::new(Cell::new(0));
    let counter = seen.clone();
    let listener = Closure::<dyn FnMut(Event)>::new(move |_: Event| counter.set(counter.get() + 1));
    host.add_event_listener_with_callback("change", listener.as_ref().unchecked_ref())
        .unwrap();

    click(&host, ".bm-custom-select-trigger");
    click(&host, ".bm-custom-select-option[data-value='desc']");

    let select: HtmlSelectElement = host.query_selector("select").unwrap().unwrap().dyn_into().unwrap();
    assert_eq!(select.value(), "desc");
    let value = host.query_selector(".bm-custom-select-value").unwrap().unwrap();
    assert_eq!(value.text_content().unwrap(), "Descending");
    assert_eq!(seen.get(), 1);
    assert!(!is_open(&host));
    drop(listener);
}

#[wasm_bindgen_test]
fn test_rebind_skips_bound_widgets() {
    let host = mount(SORT_ORDER);
    let (dom, controller) = bound_page(&host);
    let listeners = dom.listener_count();

    let report = controller.borrow_mut().rebind(&dom, &host);

    assert!(report.bound.is_empty());
    assert_eq!(report.already_bound, 1);
    assert_eq!(dom.listener_count(), listeners);
}

#[wasm_bindgen_test]
fn test_rerendered_markup_releases_listeners() {
    let host = mount(SORT_ORDER);
    let (dom, controller) = bound_page(&host);
    let listeners = dom.listener_count();

    for _ in 0..10 {
        host.set_inner_html(SORT_ORDER);
        let report = controller.borrow_mut().rebind(&dom, &host);
        assert_eq!((report.bound.len(), report.pruned), (1, 1));
        assert_eq!(dom.listener_count(), listeners);
    }

    click(&host, ".bm-custom-select-trigger");
    assert!(is_open(&host));
}

#[wasm_bindgen_test]
fn test_change_listener_can_reinitialize() {
    let host = mount(SORT_ORDER);
    assert_eq!(custom_select::rebind(Some(host.clone())).unwrap(), 1);

    let outcome: Rc<RefCell<Option<Result<u32, JsValue>>>> = Rc::new(RefCell::new(None));
    let slot = outcome.clone();
    let page = host.clone();
    let listener = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
        let late = SORT_ORDER.replace("sortOrder", "late");
        page.insert_adjacent_html("beforeend", &late).unwrap();
        *slot.borrow_mut() = Some(custom_select::rebind(None));
    });
    host.add_event_listener_with_callback("change", listener.as_ref().unchecked_ref())
        .unwrap();

    click(&host, "[data-name='sortOrder'] .bm-custom-select-trigger");
    click(&host, "[data-name='sortOrder'] .bm-custom-select-option[data-value='desc']");

    let bound = outcome.borrow_mut().take().unwrap().unwrap();
    assert!(bound >= 1);
    click(&host, "[data-name='late'] .bm-custom-select-trigger");
    let late = host.query_selector("[data-name='late']").unwrap().unwrap();
    assert!(late.class_list().contains("open"));
    drop(listener);
}

#[wasm_bindgen_test]
fn test_incomplete_widget_is_skipped() {
    let host = mount(r#"<div class="bm-custom-select" data-name="broken"><select></select></div>"#);
    let (_dom, controller) = bound_page(&host);

    assert!(controller.borrow().is_empty());
}

#[wasm_bindgen_test]
fn test_handle_outside_continues() {
    let host = mount(SORT_ORDER);
    let (dom, controller) = bound_page(&host);
    assert_eq!(
        controller.borrow().handle(&dom, custom_select::Binding::Outside),
        Propagation::Continue
    );
    assert!(dom.is_connected(&host));
}

#[wasm_bindgen_test]
fn test_exported_rebind_counts_new_widgets() {
    let host = mount(SORT_ORDER);
    assert_eq!(custom_select::rebind(Some(host.clone())).unwrap(), 1);
    assert_eq!(custom_select::rebind(Some(host)).unwrap(), 0);
}

#[wasm_bindgen_test]
fn test_configure_rejects_bad_json() {
    assert!(custom_select::configure("{oops").is_err());
    assert!(custom_select::configure(r#"{"open_class": "has space"}"#).is_err());
}
