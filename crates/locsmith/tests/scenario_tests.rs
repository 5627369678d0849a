//! End-to-end scenarios over small documents.

#![allow(clippy::unwrap_used, clippy::unreachable)]

use locsmith::prelude::*;
use pretty_assertions::assert_eq;

fn document(body: ElementSpec) -> Document {
    Document::from_spec(ElementSpec::new("html").child(body))
}

// ============================================================================
// Synthesis scenarios
// ============================================================================

#[test]
fn email_input_uses_id_and_falls_back_without_accessible_name() {
    let doc = document(
        ElementSpec::new("body").child(ElementSpec::new("input").id("email").attr("type", "email")),
    );
    let input = doc.element_by_id("email").unwrap();

    let locator = synthesize(&doc, input).unwrap();
    assert_eq!(locator.as_str(), "#email");
    assert_eq!(doc.query_selector_all("#email").unwrap(), vec![input]);

    let formatter = SnippetFormatter::default();
    assert_eq!(
        formatter.strategy(locator.as_str(), Dialect::PlaywrightRole, &doc, Some(input)),
        "await page.locator('#email').click();"
    );
    let descriptor = describe(&doc, input, locator.as_str()).unwrap();
    assert_eq!(descriptor.role, "textbox");
    assert_eq!(descriptor.input_type, "email");
}

#[test]
fn sibling_buttons_differ_by_ordinal() {
    let doc = document(
        ElementSpec::new("body")
            .child(ElementSpec::new("button").class("btn").text("Cancel"))
            .child(ElementSpec::new("button").class("btn").text("Save")),
    );
    let buttons = doc.query_selector_all("button").unwrap();

    let first = synthesize(&doc, buttons[0]).unwrap();
    let second = synthesize(&doc, buttons[1]).unwrap();
    assert_eq!(first.as_str(), "button.btn:nth-of-type(1)");
    assert_eq!(second.as_str(), "button.btn:nth-of-type(2)");
    assert!(first.is_unique() && second.is_unique());
    assert_eq!(doc.query_selector_all(second.as_str()).unwrap(), vec![buttons[1]]);
}

#[test]
fn element_inside_titled_frame() {
    let doc = document(
        ElementSpec::new("body").child(ElementSpec::new("button").attr("name", "pay").text("Pay")),
    )
    .with_frame_host(FrameHost::new().attr("title", "checkout"));
    let button = doc.query_selector("button").unwrap().unwrap();

    let locator = synthesize(&doc, button).unwrap();
    assert_eq!(locator.as_str(), "button[name=\"pay\"]");
    assert_eq!(frame_locator(&doc), "iframe[title=\"checkout\"]");

    let descriptor = describe(&doc, button, locator.as_str()).unwrap();
    assert_eq!(descriptor.frame, "iframe[title=\"checkout\"]");

    let formatter = SnippetFormatter::default();
    assert_eq!(
        formatter.strategy(locator.as_str(), Dialect::PlaywrightFrame, &doc, Some(button)),
        "await page.frameLocator('iframe[title=\"checkout\"]').locator('button[name=\"pay\"]').click();"
    );
}

#[test]
fn unique_id_resolves_to_its_element() {
    let doc = document(
        ElementSpec::new("body")
            .child(ElementSpec::new("div").id("app").child(ElementSpec::new("a").id("home")))
            .child(ElementSpec::new("a")),
    );
    for id in ["app", "home"] {
        let node = doc.element_by_id(id).unwrap();
        let locator = synthesize(&doc, node).unwrap();
        assert_eq!(locator.as_str(), format!("#{id}"));
        assert_eq!(doc.query_selector_all(locator.as_str()).unwrap(), vec![node]);
    }
}

#[test]
fn absolute_path_anchors_at_unique_id() {
    let doc = document(
        ElementSpec::new("body").child(
            ElementSpec::new("main")
                .id("content")
                .child(ElementSpec::new("p"))
                .child(ElementSpec::new("p").child(ElementSpec::new("span"))),
        ),
    );
    let span = doc.query_selector("span").unwrap().unwrap();
    assert_eq!(
        absolute_path(&doc, span).unwrap().as_str(),
        "//*[@id=\"content\"]/p[2]/span[1]"
    );
}

// ============================================================================
// Preview and picking scenarios
// ============================================================================

#[test]
fn hovering_the_same_element_twice_emits_one_frame() {
    let mut doc = document(ElementSpec::new("body").child(ElementSpec::new("button").id("go")));
    let button = doc.element_by_id("go").unwrap();
    let mut session = Session::new(EngineConfig::default(), EventLog::new());
    session.handle(&mut doc, Request::StartLivePreview);

    for _ in 0..2 {
        let ticket = session.on_pointer_move(&mut doc, button).unwrap();
        session.on_animation_frame(&doc, ticket);
    }

    let events = session.observer().events();
    assert_eq!(events.len(), 1);
    let EngineEvent::LivePreviewUpdate { preview } = &events[0] else {
        unreachable!("only preview events were produced");
    };
    assert_eq!(preview.locator, "#go");
    assert_eq!(preview.preview.len(), Dialect::ALL.len());
}

#[test]
fn burst_of_moves_yields_latest_element_only() {
    let mut doc = document(
        ElementSpec::new("body")
            .child(ElementSpec::new("a").id("first"))
            .child(ElementSpec::new("a").id("second"))
            .child(ElementSpec::new("a").id("third")),
    );
    let ids: Vec<NodeId> = ["first", "second", "third"]
        .iter()
        .map(|id| doc.element_by_id(id).unwrap())
        .collect();
    let mut session = Session::new(EngineConfig::default(), EventLog::new());
    session.handle(&mut doc, Request::StartLivePreview);

    let tickets: Vec<FrameTicket> = ids
        .iter()
        .map(|node| session.on_pointer_move(&mut doc, *node).unwrap())
        .collect();
    for ticket in tickets {
        session.on_animation_frame(&doc, ticket);
    }

    let events = session.observer().events();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        EngineEvent::LivePreviewUpdate { preview } if preview.locator == "#third"
    ));
}

#[test]
fn pick_restores_page_outlines() {
    let mut doc = document(
        ElementSpec::new("body")
            .child(ElementSpec::new("a").attr("href", "/a").text("A"))
            .child(ElementSpec::new("a").attr("href", "/b").text("B")),
    );
    let links = doc.query_selector_all("a").unwrap();
    doc.set_outline(links[0], "1px dashed red");

    let mut session =
        Session::new(EngineConfig::default(), EventLog::new()).with_clipboard(MemoryClipboard::new());
    session.handle(&mut doc, Request::StartPickSelector);
    session.on_pointer_move(&mut doc, links[0]);
    session.on_pointer_move(&mut doc, links[1]);
    assert_eq!(doc.outline(links[0]).as_deref(), Some("1px dashed red"));

    let mut click = ClickEvent::new(links[1]);
    let picked = session.on_click(&mut doc, &mut click).unwrap();
    assert_eq!(picked.result.locator, "a:nth-of-type(2)");
    assert!(picked.delivered && picked.copied);
    assert!(click.default_prevented());
    assert_eq!(doc.outline(links[0]).as_deref(), Some("1px dashed red"));
    assert_eq!(doc.outline(links[1]), None);
}

// ============================================================================
// Fixture and request scenarios
// ============================================================================

#[test]
fn json_fixture_drives_a_snippet_request() {
    let json = r#"{
        "url": "https://shop.example/checkout",
        "active": "input[name=\"email\"]",
        "root": {
            "tag": "html",
            "children": [{
                "tag": "body",
                "children": [{
                    "tag": "form",
                    "children": [
                        {"tag": "input", "attrs": {"name": "email", "type": "email"}},
                        {"tag": "button", "attrs": {"type": "submit"}, "children": ["Pay"]}
                    ]
                }]
            }]
        }
    }"#;
    let mut doc = Document::from_json_str(json).unwrap();
    let mut session = Session::new(EngineConfig::default(), EventLog::new());
    let response = session.handle(
        &mut doc,
        Request::CopyActionSnippet {
            selector: None,
            dialect: "cypress".to_string(),
            action: ActionVerb::Type,
        },
    );
    let Response::Snippet { snippet, .. } = response else {
        unreachable!("snippet requests answer with a snippet");
    };
    assert!(snippet.starts_with("cy.get('input[name=\"email\"]')"));
}

#[test]
fn scan_and_export_checkout_form() {
    let doc = document(
        ElementSpec::new("body").child(
            ElementSpec::new("form")
                .id("checkout")
                .child(ElementSpec::new("input").id("card").attr("required", "")),
        ),
    );
    let cases = scan_page(&doc);
    let titles: Vec<&str> = cases.iter().map(|case| case.title.as_str()).collect();
    assert_eq!(titles, ["Form 1 validation", "Required field enforcement"]);

    let markdown = ExportFormat::Markdown.render(&cases).unwrap();
    assert!(markdown.contains("Form 1 validation"));
    assert!(markdown.contains("#card"));
    let json: serde_json::Value =
        serde_json::from_str(&ExportFormat::Json.render(&cases).unwrap()).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 2);
}
