//! End-to-end binding scenarios: mount, paint, write, click.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::json;
use spark_bind::{
    dispatch_click, BindError, ConfigError, DirectiveIssue, DirectiveSyntax, Document, Engine,
    NodeId, Options, SharedDocument, ShowKind, SyncPolicy, PLACEHOLDER_TEXT,
};

fn setup(markup: &str) -> SharedDocument {
    Document::parse(markup).unwrap().into_shared()
}

fn find(document: &SharedDocument, selector: &str) -> NodeId {
    document.borrow().query_selector(selector).unwrap().unwrap()
}

// =============================================================================
// Conditional rendering
// =============================================================================

#[test]
fn test_conditional_hidden_then_restored() {
    let document = setup(r#"<div id="app"><h1>t</h1><p conditional-render="flag">x</p><span></span></div>"#);
    let app = find(&document, "#app");
    let p = find(&document, "p");

    let engine = Engine::mount(Options::new("#app").data("flag", false), &document).unwrap();

    {
        let doc = document.borrow();
        assert!(!doc.is_connected(p));
        let slot = doc.children(app)[1];
        assert!(doc.is_comment(slot));
        assert_eq!(doc.text_content(slot), PLACEHOLDER_TEXT);
        assert_eq!(
            doc.inner_html(app),
            "<h1>t</h1><!--conditional-render--><span></span>"
        );
    }

    engine.set("flag", true);

    let doc = document.borrow();
    assert_eq!(doc.index_in_parent(p), Some(1));
    assert_eq!(doc.parent(p), Some(app));
    assert_eq!(
        doc.inner_html(app),
        r#"<h1>t</h1><p conditional-render="flag">x</p><span></span>"#
    );
}

#[test]
fn test_conditional_starting_visible_hides_on_first_write() {
    let document = setup(r#"<div id="app"><p conditional-render="flag">x</p></div>"#);
    let p = find(&document, "p");

    let engine = Engine::mount(Options::new("#app").data("flag", true), &document).unwrap();
    assert_eq!(engine.report().painted, 0);
    assert_eq!(engine.show_entry(p).unwrap().placeholder, None);

    engine.set("flag", false);
    let entry = engine.show_entry(p).unwrap();
    assert!(!entry.visible);
    assert!(entry.placeholder.is_some());
    assert!(!document.borrow().is_connected(p));
}

// =============================================================================
// Toggle visibility
// =============================================================================

#[test]
fn test_toggle_suppress_and_restore() {
    let document = setup(r#"<div id="app"><p toggle-visible="on">x</p></div>"#);
    let p = find(&document, "p");
    let before = document.borrow().outer_html(document.borrow().root());

    let engine = Engine::mount(Options::new("#app").data("on", true), &document).unwrap();
    assert_eq!(engine.report().painted, 0);
    assert_eq!(document.borrow().outer_html(document.borrow().root()), before);

    engine.set("on", false);
    assert_eq!(document.borrow().style(p, "display"), Some("none"));
    assert!(document.borrow().is_connected(p));

    engine.set("on", true);
    assert_eq!(document.borrow().style(p, "display"), None);
    assert_eq!(document.borrow().outer_html(document.borrow().root()), before);
}

#[test]
fn test_toggle_initially_hidden_is_painted() {
    let document = setup(r#"<div id="app"><p toggle-visible="on" style="color: red">x</p></div>"#);
    let p = find(&document, "p");

    let engine = Engine::mount(Options::new("#app"), &document).unwrap();
    assert_eq!(engine.report().painted, 1);
    assert_eq!(
        document.borrow().outer_html(p),
        r#"<p toggle-visible="on" style="color: red; display: none">x</p>"#
    );
}

// =============================================================================
// Click binding
// =============================================================================

#[test]
fn test_click_calls_method_with_engine() {
    let document = setup(r#"<div id="app"><button on-click="save">s</button></div>"#);
    let button = find(&document, "button");
    let seen: Rc<RefCell<Vec<NodeId>>> = Rc::default();
    let log = seen.clone();

    let engine = Engine::mount(
        Options::new("#app").data("saved", 0).method("save", move |engine, event| {
            log.borrow_mut().push(event.target());
            let saved = engine.get("saved").and_then(|v| v.as_i64()).unwrap_or(0);
            engine.set("saved", saved + 1);
        }),
        &document,
    )
    .unwrap();

    dispatch_click(&document, button);
    dispatch_click(&document, button);

    assert_eq!(*seen.borrow(), vec![button, button]);
    assert_eq!(engine.get("saved"), Some(json!(2)));
}

#[test]
fn test_click_handler_drives_sync() {
    let document = setup(concat!(
        r#"<div id="app">"#,
        r#"<button on-click="toggle">t</button>"#,
        r#"<p conditional-render="open">details</p>"#,
        r#"</div>"#,
    ));
    let button = find(&document, "button");
    let p = find(&document, "p");

    let _engine = Engine::mount(
        Options::new("#app").data("open", false).method("toggle", |engine, _| {
            let open = engine.is_truthy("open");
            engine.set("open", !open);
        }),
        &document,
    )
    .unwrap();
    assert!(!document.borrow().is_connected(p));

    dispatch_click(&document, button);
    assert!(document.borrow().is_connected(p));

    dispatch_click(&document, button);
    assert!(!document.borrow().is_connected(p));
}

#[test]
fn test_click_bubbles_to_bound_ancestor() {
    let document = setup(r#"<div id="app"><section on-click="hit"><em>deep</em></section></div>"#);
    let section = find(&document, "section");
    let em = find(&document, "em");
    let hits = Rc::new(Cell::new(0));
    let counter = hits.clone();

    let _engine = Engine::mount(
        Options::new("#app").method("hit", move |_, event| {
            assert_eq!(event.target(), em);
            assert_eq!(event.current_target(), section);
            counter.set(counter.get() + 1);
        }),
        &document,
    )
    .unwrap();

    assert!(dispatch_click(&document, em));
    assert_eq!(hits.get(), 1);
}

#[test]
fn test_missing_method_is_reported_and_others_still_bound() {
    let document = setup(concat!(
        r#"<div id="app">"#,
        r#"<button id="a" on-click="missing">a</button>"#,
        r#"<button id="b" on-click="save">b</button>"#,
        r#"</div>"#,
    ));
    let a = find(&document, "#a");
    let b = find(&document, "#b");
    let saves = Rc::new(Cell::new(0));
    let counter = saves.clone();

    let engine = Engine::mount(
        Options::new("#app").method("save", move |_, _| counter.set(counter.get() + 1)),
        &document,
    )
    .unwrap();

    assert_eq!(
        engine.issues(),
        vec![DirectiveIssue::LookupMiss {
            node: a,
            method: "missing".into()
        }]
    );
    assert_eq!(engine.report().listeners, 1);

    // Nothing is listening on the unresolved button
    assert!(!dispatch_click(&document, a));
    assert_eq!(saves.get(), 0);

    assert!(dispatch_click(&document, b));
    assert_eq!(saves.get(), 1);
}

// =============================================================================
// Writes
// =============================================================================

#[test]
fn test_unbound_write_changes_nothing() {
    let document = setup(r#"<div id="app"><p conditional-render="flag">x</p></div>"#);

    let engine = Engine::mount(Options::new("#app").data("flag", true), &document).unwrap();
    let entries = engine.show_entries();
    let html = document.borrow().outer_html(document.borrow().root());

    assert_eq!(engine.set("unrelated", 1), None);
    assert!(engine.contains_key("unrelated"));
    assert_eq!(engine.keys(), vec!["flag", "unrelated"]);
    assert_eq!(engine.show_entries(), entries);
    assert_eq!(document.borrow().outer_html(document.borrow().root()), html);
}

#[test]
fn test_key_first_set_after_mount_drives_entry() {
    let document = setup(r#"<div id="app"><p toggle-visible="later">x</p></div>"#);
    let p = find(&document, "p");

    let engine = Engine::mount(Options::new("#app"), &document).unwrap();
    assert_eq!(document.borrow().style(p, "display"), Some("none"));

    engine.set("later", true);
    assert_eq!(document.borrow().style(p, "display"), None);
}

#[test]
fn test_every_write_flips_by_default() {
    let document = setup(r#"<div id="app"><p toggle-visible="on">x</p></div>"#);
    let p = find(&document, "p");

    let engine = Engine::mount(Options::new("#app").data("on", true), &document).unwrap();
    engine.set("on", true);
    assert_eq!(document.borrow().style(p, "display"), Some("none"));
}

#[test]
fn test_mirror_policy_follows_value() {
    let document = setup(r#"<div id="app"><p toggle-visible="on">x</p></div>"#);
    let p = find(&document, "p");

    let engine = Engine::mount(
        Options::new("#app").data("on", true).sync(SyncPolicy::Mirror),
        &document,
    )
    .unwrap();
    engine.set("on", true);
    assert_eq!(document.borrow().style(p, "display"), None);
    engine.set("on", json!([]));
    assert_eq!(document.borrow().style(p, "display"), None);
    engine.set("on", json!(null));
    assert_eq!(document.borrow().style(p, "display"), Some("none"));
}

#[test]
fn test_shared_key_updates_every_entry() {
    let document = setup(concat!(
        r#"<div id="app">"#,
        r#"<p id="c" conditional-render="k">c</p>"#,
        r#"<p id="t" toggle-visible="k">t</p>"#,
        r#"</div>"#,
    ));
    let c = find(&document, "#c");
    let t = find(&document, "#t");

    let engine = Engine::mount(Options::new("#app").data("k", 1), &document).unwrap();
    engine.set("k", 0);

    assert!(!document.borrow().is_connected(c));
    assert_eq!(document.borrow().style(t, "display"), Some("none"));
    let kinds: Vec<_> = engine.show_entries().iter().map(|entry| entry.kind).collect();
    assert_eq!(kinds, vec![ShowKind::Conditional, ShowKind::Toggle]);
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_root_not_found() {
    let document = setup(r#"<div id="app"></div>"#);
    let err = Engine::mount(Options::new(".missing"), &document).unwrap_err();
    assert!(matches!(
        err,
        BindError::Configuration(ConfigError::RootNotFound { .. })
    ));
    assert_eq!(err.to_string(), r#"configuration error: root selector ".missing" matched no element"#);
}

#[test]
fn test_options_from_json_with_vue_syntax() {
    let document = setup(concat!(
        r#"<div class="app">"#,
        r#"<p v-if="open">a</p>"#,
        r#"<p v-show="open">b</p>"#,
        r#"<button @click="close">x</button>"#,
        r#"</div>"#,
    ));
    let button = find(&document, "button");

    let options = Options::from_json(
        r#"{
            "el": ".app",
            "data": { "open": true },
            "directives": { "conditional": "v-if", "toggle": "v-show", "click": "@click" }
        }"#,
    )
    .unwrap()
    .method("close", |engine, _| {
        engine.set("open", false);
    });
    assert_eq!(options.directives, DirectiveSyntax::vue());

    let engine = Engine::mount(options, &document).unwrap();
    assert_eq!(engine.report().show_entries, 2);

    dispatch_click(&document, button);
    assert_eq!(
        document.borrow().inner_html(engine.root()),
        concat!(
            r#"<!--conditional-render-->"#,
            r#"<p v-show="open" style="display: none">b</p>"#,
            r#"<button @click="close">x</button>"#,
        )
    );
}

#[test]
fn test_two_engines_on_disjoint_subtrees() {
    let document = setup(concat!(
        r#"<main>"#,
        r#"<div id="left"><p toggle-visible="on">l</p></div>"#,
        r#"<div id="right"><p toggle-visible="on">r</p></div>"#,
        r#"</main>"#,
    ));
    let left_p = find(&document, "#left p");
    let right_p = find(&document, "#right p");

    let left = Engine::mount(Options::new("#left").data("on", true), &document).unwrap();
    let right = Engine::mount(Options::new("#right").data("on", true), &document).unwrap();
    assert!(!left.ptr_eq(&right));

    left.set("on", false);
    assert_eq!(document.borrow().style(left_p, "display"), Some("none"));
    assert_eq!(document.borrow().style(right_p, "display"), None);
}
