// Browser tests; run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use mr_lucky::error::GameError;
use mr_lucky::feedback::Presenter;
use mr_lucky::web::dom;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn require_reports_the_missing_id() {
    let doc = dom::document().expect("document");
    match dom::require(&doc, "noSuchNode") {
        Err(GameError::MissingElement(id)) => assert_eq!(id, "noSuchNode"),
        other => panic!("unexpected: {:?}", other.map(|_| ())),
    }
}

#[wasm_bindgen_test]
fn start_fails_fast_without_the_overlay_markup() {
    assert!(matches!(
        mr_lucky::web::start(),
        Err(GameError::MissingElement(_))
    ));
}

#[wasm_bindgen_test]
fn listeners_detach_on_clear() {
    let doc = dom::document().expect("document");
    let body = doc.body().expect("body");
    let mut listeners = dom::Listeners::new();
    listeners
        .on_each(&body, &["click", "touchstart"], |_| {})
        .expect("bind");
    assert_eq!(listeners.len(), 2);
    listeners.clear();
    assert!(listeners.is_empty());
}

#[wasm_bindgen_test]
fn banner_wears_the_offer_class_only_while_offered() {
    let doc = dom::document().expect("document");
    let banner = doc.create_element("div").expect("div");
    banner.set_id("streakBannerTest");
    doc.body().expect("body").append_child(&banner).expect("append");

    let mut presenter = dom::DomPresenter::new(doc.clone());
    presenter.show_banner("streakBannerTest", "Double or nothing?", true);
    assert!(banner.class_list().contains("double-or-nothing"));
    assert_eq!(banner.text_content().as_deref(), Some("Double or nothing?"));

    presenter.show_banner("streakBannerTest", "Goal: 10", false);
    assert!(!banner.class_list().contains("double-or-nothing"));
    banner.remove();
}
