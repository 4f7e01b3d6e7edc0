#![cfg(target_arch = "wasm32")]

use pickmeup_web::dom;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;
use web_sys::{HtmlElement, HtmlInputElement};

wasm_bindgen_test_configure!(run_in_browser);

fn input(value: &str) -> HtmlInputElement {
    let doc = dom::document().unwrap();
    let input: HtmlInputElement = doc.create_element("input").unwrap().dyn_into().unwrap();
    input.set_value(value);
    doc.body().unwrap().append_child(&input).unwrap();
    input
}

fn options(json: &str) -> JsValue {
    js_sys::JSON::parse(json).unwrap()
}

fn with_hook(options: &JsValue, key: &str, args: &str, body: &str) {
    let hook = js_sys::Function::new_with_args(args, body);
    js_sys::Reflect::set(options, &JsValue::from_str(key), &hook).unwrap();
}

#[wasm_bindgen_test]
fn attach_writes_the_date_and_stays_hidden() {
    let anchor = input("");
    let picker =
        pickmeup_web::attach(anchor.clone().into(), options(r#"{"date": "15-06-2023"}"#)).unwrap();
    let text = picker.get_date(JsValue::TRUE).as_string().unwrap();
    assert_eq!(text, "15-06-2023");
    assert_eq!(anchor.value(), "15-06-2023");
    let doc = dom::document().unwrap();
    let root = doc.query_selector(".pickmeup.pmu-hidden").unwrap();
    assert!(root.is_some());
    picker.destroy();
    assert!(anchor.get_attribute("data-pmu-id").is_none());
}

#[wasm_bindgen_test]
fn attaching_twice_reuses_the_picker() {
    let anchor = input("");
    let first = pickmeup_web::attach(anchor.clone().into(), JsValue::UNDEFINED).unwrap();
    let id = anchor.get_attribute("data-pmu-id").unwrap();
    let second = pickmeup_web::attach(anchor.clone().into(), JsValue::UNDEFINED).unwrap();
    assert_eq!(anchor.get_attribute("data-pmu-id").unwrap(), id);
    first.destroy();
    assert!(second.get_date(JsValue::TRUE).is_undefined());
}

#[wasm_bindgen_test]
fn clicking_a_day_commits_it_to_the_input() {
    let anchor = input("");
    let picker = pickmeup_web::attach(
        anchor.clone().into(),
        options(r#"{"date": "10-06-2023", "hideOnSelect": true}"#),
    )
    .unwrap();
    picker.show(None);
    let doc = dom::document().unwrap();
    let cell: HtmlElement = doc
        .query_selector(".pickmeup .pmu-days .pmu-button:not(.pmu-not-in-month)")
        .unwrap()
        .unwrap()
        .dyn_into()
        .unwrap();
    cell.click();
    assert_eq!(anchor.value(), "01-06-2023");
    assert!(doc.query_selector(".pickmeup.pmu-hidden").unwrap().is_some());
    picker.destroy();
}

#[wasm_bindgen_test]
fn flat_pickers_render_inside_the_anchor() {
    let doc = dom::document().unwrap();
    let host = doc.create_element("div").unwrap();
    doc.body().unwrap().append_child(&host).unwrap();
    let picker = pickmeup_web::attach(
        host.clone().into(),
        options(r#"{"flat": true, "date": "20-06-2023", "calendars": 2}"#),
    )
    .unwrap();
    assert_eq!(host.query_selector_all(".pmu-instance").unwrap().length(), 2);
    assert!(host.query_selector(".pmu-flat").unwrap().is_some());
    picker.destroy();
    assert!(host.query_selector(".pickmeup").unwrap().is_none());
}

#[wasm_bindgen_test]
fn content_template_wraps_the_cells() {
    let anchor = input("");
    let opts = options(r#"{"date": "10-06-2023", "hideOnSelect": true}"#);
    with_hook(
        &opts,
        "instanceContentTemplate",
        "cells, cls",
        "var ul = document.createElement('ul'); ul.className = cls + ' custom'; \
         cells.forEach(function (c) { ul.appendChild(c); }); return ul;",
    );
    let picker = pickmeup_web::attach(anchor.clone().into(), opts).unwrap();
    picker.show(None);
    let doc = dom::document().unwrap();
    let list = doc.query_selector("ul.custom.pmu-days").unwrap().unwrap();
    assert_eq!(list.child_element_count(), 42);

    let cell: HtmlElement = list
        .query_selector(".pmu-button:not(.pmu-not-in-month)")
        .unwrap()
        .unwrap()
        .dyn_into()
        .unwrap();
    cell.click();
    assert_eq!(anchor.value(), "01-06-2023");
    picker.destroy();
    assert!(doc.query_selector("ul.custom").unwrap().is_none());
}

#[wasm_bindgen_test]
fn shell_template_markup_gets_the_header() {
    let doc = dom::document().unwrap();
    let host = doc.create_element("div").unwrap();
    doc.body().unwrap().append_child(&host).unwrap();
    let opts = options(r#"{"flat": true, "date": "20-06-2023"}"#);
    with_hook(
        &opts,
        "instance_template",
        "ctx",
        "return '<section class=\"shell-' + ctx.level + '\"><div class=\"pmu-prev\">' \
         + ctx.prev + '</div><b class=\"pmu-month\"></b><div class=\"pmu-next\">' \
         + ctx.next + '</div></section>';",
    );
    let picker = pickmeup_web::attach(host.clone().into(), opts).unwrap();
    let shell = host.query_selector("section.shell-days.pmu-instance").unwrap().unwrap();
    let header = shell.query_selector("b.pmu-month").unwrap().unwrap();
    assert_eq!(header.text_content().as_deref(), Some("June, 2023"));
    assert_eq!(shell.query_selector_all(".pmu-days > div").unwrap().length(), 42);
    picker.destroy();
}

#[wasm_bindgen_test]
fn destroying_from_a_change_listener_cleans_up() {
    let anchor = input("");
    let picker = pickmeup_web::attach(
        anchor.clone().into(),
        options(r#"{"date": "10-06-2023"}"#),
    )
    .unwrap();
    let on_change = wasm_bindgen::closure::Closure::<dyn FnMut()>::new(move || {
        picker.destroy();
    });
    anchor
        .add_event_listener_with_callback("pickmeup-change", on_change.as_ref().unchecked_ref())
        .unwrap();
    let again = pickmeup_web::attach(anchor.clone().into(), JsValue::UNDEFINED).unwrap();
    again.show(None);
    let doc = dom::document().unwrap();
    let widgets = doc.query_selector_all(".pickmeup").unwrap().length();
    let cell: HtmlElement = doc
        .query_selector(".pickmeup:not(.pmu-hidden) .pmu-days .pmu-button:not(.pmu-not-in-month)")
        .unwrap()
        .unwrap()
        .dyn_into()
        .unwrap();
    cell.click();
    assert!(anchor.get_attribute("data-pmu-id").is_none());
    assert_eq!(doc.query_selector_all(".pickmeup").unwrap().length(), widgets - 1);
    assert!(again.get_date(JsValue::TRUE).is_undefined());
    on_change.forget();
}
