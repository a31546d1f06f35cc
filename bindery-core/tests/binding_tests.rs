//! End-to-end binding tests against the in-memory document

use bindery_core::{paint, BindError, BinderConfig, Directive, DirectiveTable, Instance};
use bindery_dom::{Document, DomError, MarkupTree};
use bindery_reactive::{ReactiveError, Value};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

fn mount(markup: &str, data: serde_json::Value) -> (Rc<RefCell<Document>>, Instance<Document>) {
    let doc = Rc::new(RefCell::new(Document::parse(markup).unwrap()));
    let vm = Instance::mount(Rc::clone(&doc), data, &BinderConfig::default()).unwrap();
    (doc, vm)
}

fn text_of(doc: &Rc<RefCell<Document>>, selector: &str) -> String {
    let doc = doc.borrow();
    let node = doc.query_selector(selector).unwrap();
    doc.text_content(node)
}

#[test]
fn test_counter_round_trip() {
    let (doc, vm) = mount(
        r#"<div id="app"><p id="out">{{counter}}</p></div>"#,
        json!({"counter": 1}),
    );
    assert_eq!(text_of(&doc, "#out"), "1");

    vm.set("counter", 5).unwrap();
    assert_eq!(text_of(&doc, "#out"), "5");
    assert_eq!(vm.bindings().len(), 1);
}

#[test]
fn test_html_directive_and_unknown_directive() {
    let (doc, _vm) = mount(
        r#"<div id="app"><div id="h" v-html="msg"></div><div id="f" v-foo="msg">same</div></div>"#,
        json!({"msg": "<b>hi</b>"}),
    );
    let doc = doc.borrow();

    let h = doc.query_selector("#h").unwrap();
    assert_eq!(doc.inner_html(h), "<b>hi</b>");

    let f = doc.query_selector("#f").unwrap();
    assert_eq!(doc.outer_html(f), r#"<div id="f" v-foo="msg">same</div>"#);
}

#[test]
fn test_multiple_bindings_on_one_key() {
    let (doc, vm) = mount(
        r#"<div id="app"><p id="a">{{counter}}</p><p id="b">{{counter}}</p></div>"#,
        json!({"counter": 0}),
    );
    assert_eq!(vm.data().subscriber_count("counter"), 2);

    vm.set("counter", 3).unwrap();
    assert_eq!(text_of(&doc, "#a"), "3");
    assert_eq!(text_of(&doc, "#b"), "3");
}

#[test]
fn test_nested_record_replacement() {
    let (doc, vm) = mount(
        r#"<div id="app"><pre id="u" v-text="user"></pre><p id="n">{{user.name}}</p></div>"#,
        json!({"user": {"name": "a"}}),
    );
    assert_eq!(text_of(&doc, "#u"), r#"{"name":"a"}"#);
    assert_eq!(text_of(&doc, "#n"), "a");

    vm.set("user", json!({"name": "b"})).unwrap();
    assert_eq!(text_of(&doc, "#u"), r#"{"name":"b"}"#);
    assert_eq!(text_of(&doc, "#n"), "b");

    // The dotted binding follows writes into the replacement record
    let user = vm.get("user").unwrap();
    let user = user.as_record().unwrap();
    user.set("name", "c").unwrap();
    assert_eq!(text_of(&doc, "#n"), "c");
    assert_eq!(vm.data().to_plain(), json!({"user": {"name": "c"}}));
}

#[test]
fn test_repaint_happens_even_when_rendered_text_is_unchanged() {
    let (doc, vm) = mount(
        r#"<div id="app"><p id="out">{{flag}}</p></div>"#,
        json!({"flag": "true"}),
    );

    // Hand-edit the node; a write that renders the same text still repaints
    {
        let mut doc = doc.borrow_mut();
        let p = doc.query_selector("#out").unwrap();
        doc.set_text_content(p, "edited").unwrap();
    }
    vm.set("flag", true).unwrap();
    assert_eq!(text_of(&doc, "#out"), "true");
}

#[test]
fn test_identical_write_does_not_repaint() {
    let (doc, vm) = mount(
        r#"<div id="app"><p id="out">{{counter}}</p></div>"#,
        json!({"counter": 1}),
    );
    {
        let mut doc = doc.borrow_mut();
        let p = doc.query_selector("#out").unwrap();
        doc.set_text_content(p, "edited").unwrap();
    }

    vm.set("counter", 1).unwrap();
    assert_eq!(text_of(&doc, "#out"), "edited");
}

#[test]
fn test_write_while_tree_borrowed_reports_error() {
    let (doc, vm) = mount(
        r#"<div id="app"><p>{{counter}}</p></div>"#,
        json!({"counter": 1}),
    );

    let held = doc.borrow();
    let result = vm.set("counter", 2);
    drop(held);

    match result {
        Err(BindError::Reactive(ReactiveError::Callback(message))) => {
            assert_eq!(message, "Markup tree is already borrowed");
        }
        other => panic!("unexpected result: {:?}", other),
    }
    // The value landed even though the view did not
    assert_eq!(vm.get("counter").unwrap(), Value::from(2));
}

#[test]
fn test_invalid_html_value_surfaces_from_write() {
    let (_doc, vm) = mount(
        r#"<div id="app"><div v-html="body"></div></div>"#,
        json!({"body": "<p>ok</p>"}),
    );

    let result = vm.set("body", "<p>");
    assert!(matches!(
        result,
        Err(BindError::Reactive(ReactiveError::Callback(_)))
    ));
}

#[test]
fn test_custom_prefix_and_alias() {
    let doc = Rc::new(RefCell::new(
        Document::parse(r#"<main><span x-markup="m"></span><span v-text="m"></span></main>"#)
            .unwrap(),
    ));
    let mut table = DirectiveTable::default();
    table.register("markup", Directive::Html);
    let config = BinderConfig::default()
        .with_selector("main")
        .with_directive_prefix("x-");

    let vm = Instance::mount_with(Rc::clone(&doc), json!({"m": "<i>z</i>"}), &config, &table)
        .unwrap();

    assert_eq!(vm.bindings().len(), 1);
    assert_eq!(vm.bindings()[0].directive(), Directive::Html);
    assert_eq!(
        doc.borrow().to_html(),
        r#"<main><span x-markup="m"><i>z</i></span><span v-text="m"></span></main>"#
    );
}

#[test]
fn test_bound_update_writing_back_is_bounded() {
    let doc = Rc::new(RefCell::new(
        Document::parse(r#"<div id="app"><p>{{n}}</p></div>"#).unwrap(),
    ));
    let config = BinderConfig::default().with_max_notify_depth(4);
    let vm = Instance::mount(Rc::clone(&doc), json!({"n": 0}), &config).unwrap();

    let data = vm.data().clone();
    let writer = data.clone();
    let _echo = bindery_reactive::Subscriber::new(
        &data,
        bindery_reactive::KeyPath::single("n"),
        move |v: &Value| match v {
            Value::Number(n) => writer.set("n", n + 1.0),
            _ => Ok(()),
        },
    )
    .unwrap();

    let result = vm.set("n", 1);
    assert!(matches!(
        result,
        Err(BindError::Reactive(ReactiveError::NotifyDepthExceeded { limit: 4, .. }))
    ));
}

#[test]
fn test_rendered_document_snapshot() {
    let (doc, vm) = mount(
        r#"<div id="app"><h1 v-text="title"></h1><ul><li>{{first}}</li><li>{{second}}</li></ul><section v-html="body"></section></div>"#,
        json!({"title": "Todo", "first": "write", "second": "test", "body": "<em>done</em>"}),
    );
    vm.set("second", "ship").unwrap();

    insta::assert_snapshot!(
        doc.borrow().to_html(),
        @r#"<div id="app"><h1 v-text="title">Todo</h1><ul><li>write</li><li>ship</li></ul><section v-html="body"><em>done</em></section></div>"#
    );
}

#[test]
fn test_bound_values_render_literally() {
    let (doc, vm) = mount(
        r#"<div id="app"><p id="t" v-text="msg"></p><div id="h" v-html="body"></div></div>"#,
        json!({"msg": "{{secret}}", "body": "<i>{{secret}}</i>", "secret": "hunter2"}),
    );
    assert_eq!(vm.bindings().len(), 2);
    assert_eq!(text_of(&doc, "#t"), "{{secret}}");
    assert_eq!(text_of(&doc, "#h"), "{{secret}}");

    // Braces naming a key that does not exist do not break the mount
    let (doc, _vm) = mount(
        r#"<div id="app"><p id="t" v-text="msg"></p></div>"#,
        json!({"msg": "{{nope}}"}),
    );
    assert_eq!(text_of(&doc, "#t"), "{{nope}}");
}

#[test]
fn test_html_repaint_is_not_compiled() {
    let (doc, vm) = mount(
        r#"<div id="app"><div id="h" v-html="body"></div></div>"#,
        json!({"body": "<b>{{secret}}</b>", "secret": "hunter2"}),
    );

    vm.set("body", r#"<em v-text="secret">{{secret}}</em>"#).unwrap();
    assert_eq!(vm.bindings().len(), 1);
    assert_eq!(vm.data().subscriber_count("secret"), 0);

    let doc = doc.borrow();
    let h = doc.query_selector("#h").unwrap();
    assert_eq!(doc.inner_html(h), r#"<em v-text="secret">{{secret}}</em>"#);
}

#[test]
fn test_children_of_bound_element_are_not_bound() {
    let (doc, vm) = mount(
        r#"<div id="app"><div id="o" v-text="outer"><p>{{inner}}</p></div></div>"#,
        json!({"outer": "x", "inner": "y"}),
    );
    assert_eq!(vm.bindings().len(), 1);
    assert_eq!(vm.data().subscriber_count("inner"), 0);

    vm.set("inner", "z").unwrap();
    vm.set("outer", "w").unwrap();
    assert_eq!(text_of(&doc, "#o"), "w");
}

#[test]
fn test_painting_a_detached_node_is_an_error() {
    let (doc, vm) = mount(
        r#"<div id="app"><section id="s"><p id="p">{{a}}</p></section></div>"#,
        json!({"a": 1}),
    );
    let text = vm.bindings()[0].node();

    {
        let mut tree = doc.borrow_mut();
        let section = tree.query_selector("#s").unwrap();
        tree.set_text_content(section, "gone").unwrap();
    }

    let direct = paint(&doc, text, Directive::Text, &Value::from(2));
    assert!(matches!(
        direct,
        Err(BindError::Dom(DomError::UnknownNode(node))) if node == text
    ));

    let result = vm.set("a", 3);
    assert!(matches!(
        result,
        Err(BindError::Reactive(ReactiveError::Callback(_)))
    ));
    assert_eq!(text_of(&doc, "#s"), "gone");
}

#[test]
fn test_notify_depth_is_per_instance() {
    fn echo_until(data: &bindery_reactive::Record, stop: f64) -> bindery_reactive::Subscriber {
        let writer = data.clone();
        bindery_reactive::Subscriber::new(
            data,
            bindery_reactive::KeyPath::single("n"),
            move |v: &Value| match v {
                Value::Number(n) if *n < stop => writer.set("n", n + 1.0),
                _ => Ok(()),
            },
        )
        .unwrap()
    }

    let tight = BinderConfig::default().with_max_notify_depth(3);
    let first = Instance::mount(
        Rc::new(RefCell::new(Document::parse(r#"<div id="app">{{n}}</div>"#).unwrap())),
        json!({"n": 0}),
        &tight,
    )
    .unwrap();
    let second = Instance::mount(
        Rc::new(RefCell::new(Document::parse(r#"<div id="app">{{n}}</div>"#).unwrap())),
        json!({"n": 0}),
        &BinderConfig::default(),
    )
    .unwrap();

    let _a = echo_until(first.data(), 10.0);
    let _b = echo_until(second.data(), 10.0);

    assert!(matches!(
        first.set("n", 1),
        Err(BindError::Reactive(ReactiveError::NotifyDepthExceeded { limit: 3, .. }))
    ));
    second.set("n", 1).unwrap();
    assert_eq!(second.get("n").unwrap(), Value::from(10));
    assert_eq!(
        bindery_reactive::max_notify_depth(),
        bindery_reactive::DEFAULT_MAX_NOTIFY_DEPTH
    );
}
