//! Integration tests - Full page sessions from boot to interaction
//!
//! Each test drives the engine the way the host would: structural-ready
//! and load dispatches, scroll turns, preload completions, and input
//! events, with the virtual clock advanced by `run_until_idle`.

use vitrine_devtools::{InitiatorType, ResourceTiming, ScriptError};
use vitrine_dom::{Document, DomRect, NodeId};
use vitrine_engine::{Config, Engine, Session};
use vitrine_media::{optimized_src, ImageState, DEFERRED_ATTR};
use vitrine_platform::{Capabilities, ConnectionClass, DeviceProfile, LocalStore};
use vitrine_reveal::{RevealState, ACTIVE_CLASS, MAX_ANIMATED_PRODUCT_CARDS};

// ============================================================================
// FIXTURES
// ============================================================================

/// Build a storefront page: loader, header with nav, `n` sections of
/// product cards, a trending slider, and a newsletter form in the last
/// section. Bounds are laid out vertically, one 700px section per row.
fn storefront(n: usize, cards_per_section: usize) -> Document {
    let mut doc = Document::new();
    let body = doc.body();
    let tree = doc.tree_mut();

    let loader = tree.create_element("div");
    tree.add_class(loader, "loader");
    tree.append_child(body, loader);

    let header = tree.create_element("header");
    tree.append_child(body, header);
    let hamburger = tree.create_element("div");
    tree.add_class(hamburger, "hamburger");
    tree.append_child(header, hamburger);
    let nav = tree.create_element("ul");
    tree.add_class(nav, "nav-links");
    tree.append_child(header, nav);
    for (href, label) in [("#home", "Home"), ("#shop", "Shop"), ("#contact", "Contact")] {
        let li = tree.create_element("li");
        let a = tree.create_element("a");
        tree.set_attr(a, "href", href);
        let text = tree.create_text(label);
        tree.append_child(a, text);
        tree.append_child(li, a);
        tree.append_child(nav, li);
    }

    for s in 0..n {
        let section = tree.create_element("section");
        tree.append_child(body, section);
        let y = 700.0 * s as f64;
        tree.set_bounds(section, DomRect::from_xywh(0.0, y, 1280.0, 700.0));

        let title = tree.create_element("h2");
        tree.add_class(title, "section-title");
        tree.append_child(section, title);
        tree.set_bounds(title, DomRect::from_xywh(0.0, y, 1280.0, 60.0));

        for c in 0..cards_per_section {
            let card = tree.create_element("div");
            tree.add_class(card, "product-card");
            tree.append_child(section, card);
            tree.set_bounds(
                card,
                DomRect::from_xywh(250.0 * c as f64, y + 100.0, 220.0, 320.0),
            );

            let name = tree.create_element("h3");
            let text = tree.create_text(&format!("Product {s}-{c}"));
            tree.append_child(name, text);
            tree.append_child(card, name);

            let button = tree.create_element("button");
            tree.add_class(button, "add-to-cart");
            let label = tree.create_text("Add to Cart");
            tree.append_child(button, label);
            tree.append_child(card, button);
        }

        if s == n - 1 {
            let form = tree.create_element("form");
            tree.add_class(form, "newsletter-form");
            tree.append_child(section, form);
            tree.set_bounds(form, DomRect::from_xywh(0.0, y + 500.0, 1280.0, 120.0));
        }
    }

    let slider = tree.create_element("div");
    tree.add_class(slider, "trending-slider");
    tree.append_child(body, slider);
    for _ in 0..5 {
        let slide = tree.create_element("div");
        tree.add_class(slide, "trending-slide");
        tree.append_child(slider, slide);
    }

    doc
}

/// Add a deferred image at a vertical offset
fn add_deferred_image(doc: &mut Document, y: f64, src: &str) -> NodeId {
    let body = doc.body();
    let tree = doc.tree_mut();
    let img = tree.create_element("img");
    tree.set_attr(img, DEFERRED_ATTR, src);
    tree.set_bounds(img, DomRect::from_xywh(0.0, y, 400.0, 300.0));
    tree.append_child(body, img);
    img
}

fn engine_with(doc: Document, session: Session) -> Engine {
    Engine::new(doc, Config::default(), session)
}

fn boot(engine: &mut Engine) {
    engine.dispatch_content_loaded();
    engine.dispatch_load();
    engine.run_until_idle();
}

// ============================================================================
// BOOT SEQUENCE
// ============================================================================

#[test]
fn test_loader_hidden_after_delay() {
    let mut engine = engine_with(storefront(2, 2), Session::default());
    boot(&mut engine);

    assert!(engine.now() >= 1500);
    let doc = engine.document();
    let loader = doc.first_by_class("loader").unwrap();
    let el = doc.tree().element(loader).unwrap();
    assert_eq!(el.style("opacity"), Some("0"));
    assert_eq!(el.style("visibility"), Some("hidden"));
    let body = doc.tree().element(doc.body()).unwrap();
    assert_eq!(body.style("overflow"), Some("visible"));
}

#[test]
fn test_theme_restored_from_store() {
    let mut store = LocalStore::new();
    store.set("darkMode", "true");
    let session = Session {
        store,
        ..Session::default()
    };

    let mut engine = engine_with(storefront(1, 1), session);
    engine.dispatch_content_loaded();

    let doc = engine.document();
    assert!(doc.tree().has_class(doc.body(), "dark-mode"));
}

#[test]
fn test_theme_toggle_persists() {
    let mut engine = engine_with(storefront(1, 1), Session::default());
    assert!(engine.toggle_theme());
    assert_eq!(engine.store().get("darkMode"), Some("true"));
    assert!(!engine.toggle_theme());
    assert_eq!(engine.store().get("darkMode"), Some("false"));
}

#[test]
fn test_full_path_records_hero_and_floating_timelines() {
    let mut engine = engine_with(storefront(2, 2), Session::default());
    boot(&mut engine);

    let timelines = engine.timelines();
    assert_eq!(timelines.len(), 2);
    assert_eq!(timelines[0].steps().len(), 3);
    assert_eq!(timelines[0].steps()[0].target, ".hero-content h1");
    assert!(timelines[1].steps()[0].yoyo_repeat);
}

#[test]
fn test_tilt_targets_collected_when_capability_present() {
    let mut doc = storefront(1, 1);
    let body = doc.body();
    let card = doc.tree_mut().create_element("div");
    doc.tree_mut().set_attr(card, "data-tilt", "");
    doc.tree_mut().append_child(body, card);

    let mut engine = engine_with(doc, Session::default());
    boot(&mut engine);
    assert_eq!(engine.tilt_targets(), &[card]);
    assert_eq!(engine.tilt_settings().max_tilt_deg, 15.0);

    let session = Session {
        capabilities: Capabilities::full().with_tilt(false),
        ..Session::default()
    };
    let mut engine = engine_with(storefront(1, 1), session);
    boot(&mut engine);
    assert!(engine.tilt_targets().is_empty());
}

// ============================================================================
// REVEAL PIPELINE
// ============================================================================

#[test]
fn test_visible_title_activates_after_boot() {
    let mut engine = engine_with(storefront(3, 2), Session::default());
    boot(&mut engine);

    let doc = engine.document();
    let titles = doc.elements_by_class("section-title");
    // First section title is inside the initial viewport
    assert!(doc.tree().has_class(titles[0], ACTIVE_CLASS));
    // Third section (y = 1400) is past the shrunk viewport bottom
    assert!(!doc.tree().has_class(titles[2], ACTIVE_CLASS));
    assert_eq!(engine.reveal().state(titles[2]), Some(RevealState::Observing));
}

#[test]
fn test_scrolling_reveals_lower_sections_once() {
    let mut engine = engine_with(storefront(3, 2), Session::default());
    boot(&mut engine);

    engine.scroll_to(1400.0);
    engine.run_until_idle();

    let doc = engine.document();
    let titles = doc.elements_by_class("section-title");
    assert!(doc.tree().has_class(titles[2], ACTIVE_CLASS));
    assert_eq!(engine.reveal().state(titles[2]), Some(RevealState::Triggered));
    assert!(!engine.reveal().is_observing(titles[2]));

    // Scrolling away and back never re-triggers
    engine.scroll_to(0.0);
    engine.scroll_to(1400.0);
    engine.run_until_idle();
    assert_eq!(engine.reveal().state(titles[2]), Some(RevealState::Triggered));
}

#[test]
fn test_batch_turns_scale_with_section_count() {
    for (n, expected) in [(2usize, 1usize), (5, 3), (7, 4)] {
        let mut engine = engine_with(storefront(n, 1), Session::default());
        boot(&mut engine);
        assert_eq!(engine.reveal().batch_turns(), expected, "n = {n}");
    }
}

#[test]
fn test_cards_past_cap_are_active_without_observation() {
    let mut engine = engine_with(storefront(1, 5), Session::default());
    boot(&mut engine);

    let doc = engine.document();
    let cards = doc.elements_by_class("product-card");
    for &card in &cards[MAX_ANIMATED_PRODUCT_CARDS..] {
        assert!(doc.tree().has_class(card, ACTIVE_CLASS));
        assert!(engine.reveal().state(card).is_none());
    }
}

#[test]
fn test_reduced_motion_disables_all_animation() {
    let session = Session {
        capabilities: Capabilities::full().with_reduced_motion(true),
        ..Session::default()
    };
    let mut engine = engine_with(storefront(3, 3), session);
    boot(&mut engine);

    assert!(engine.reveal().observer_is_empty());
    assert!(engine.timelines().is_empty());

    let doc = engine.document();
    for card in doc.elements_by_class("product-card") {
        assert!(doc.tree().has_class(card, ACTIVE_CLASS));
        assert_eq!(doc.tree().element(card).unwrap().style("transition"), Some("none"));
    }
}

#[test]
fn test_low_end_device_takes_degraded_path() {
    let session = Session {
        profile: DeviceProfile::detect(Some(2.0), Some(2), "Mozilla/5.0 (X11; Linux x86_64)"),
        ..Session::default()
    };
    let mut engine = engine_with(storefront(3, 3), session);
    boot(&mut engine);

    assert!(engine.reveal().observer_is_empty());
    assert_eq!(engine.reveal().batch_turns(), 0);

    let doc = engine.document();
    for card in doc.elements_by_class("product-card") {
        assert!(doc.tree().has_class(card, ACTIVE_CLASS));
    }

    // Hero still gets its single lightweight entrance
    assert_eq!(engine.timelines().len(), 1);
    assert_eq!(engine.timelines()[0].defaults.duration_ms, 600);
}

// ============================================================================
// IMAGE PIPELINE
// ============================================================================

#[test]
fn test_deferred_image_resolves_to_optimized_source() {
    let mut doc = storefront(1, 1);
    let img = add_deferred_image(&mut doc, 100.0, "products/shoe.jpg?v=2");
    let mut engine = engine_with(doc, Session::default());
    boot(&mut engine);

    assert_eq!(engine.started_preloads(), ["products/shoe.jpg?v=2"]);
    engine.preload_finished("products/shoe.jpg?v=2", true);

    let doc = engine.document();
    assert_eq!(
        doc.tree().get_attr(img, "src").unwrap(),
        optimized_src("products/shoe.jpg?v=2", ConnectionClass::FourG, true)
    );
    assert!(doc.tree().get_attr(img, DEFERRED_ATTR).is_none());
    assert!(doc.tree().has_class(img, "loaded"));
    assert_eq!(engine.pipeline().state(img), Some(ImageState::Resolved));
}

#[test]
fn test_same_url_preloads_once() {
    let mut doc = storefront(1, 1);
    let first = add_deferred_image(&mut doc, 0.0, "hero.jpg");
    let second = add_deferred_image(&mut doc, 3000.0, "hero.jpg");
    let mut engine = engine_with(doc, Session::default());
    boot(&mut engine);

    engine.preload_finished("hero.jpg", true);
    assert_eq!(engine.pipeline().state(first), Some(ImageState::Resolved));

    // Second image scrolls into view after the cache is warm: no preload
    engine.scroll_to(2800.0);
    engine.run_until_idle();
    assert!(engine.started_preloads().is_empty());
    assert_eq!(engine.pipeline().state(second), Some(ImageState::Resolved));
    // Cache hits apply the raw source directly
    assert_eq!(engine.document().tree().get_attr(second, "src").unwrap(), "hero.jpg");
}

#[test]
fn test_slow_connection_defers_below_fold_and_preload_start() {
    let mut doc = storefront(1, 1);
    let near = add_deferred_image(&mut doc, 100.0, "near.jpg");
    let far = add_deferred_image(&mut doc, 3000.0, "far.jpg");
    let session = Session {
        connection: ConnectionClass::TwoG,
        ..Session::default()
    };
    let mut engine = engine_with(doc, session);
    engine.dispatch_content_loaded();

    // Below-fold image is not observed until the grace delay elapses,
    // and the near image's preload start is still queued
    assert!(!engine.pipeline().is_observing(far));
    assert!(engine.started_preloads().is_empty());

    engine.run_until_idle();
    assert!(engine.pipeline().is_observing(far));
    // The near image's preload started after the slow-start delay
    assert_eq!(engine.started_preloads(), ["near.jpg"]);
    assert!(engine.now() >= 100);

    // Quality drops to 3 on the slow class
    engine.preload_finished("near.jpg", true);
    let src = engine.document().tree().get_attr(near, "src").unwrap();
    assert!(src.contains("quality=3&"), "src = {src}");
}

#[test]
fn test_preload_failure_falls_back_to_raw() {
    let mut doc = storefront(1, 1);
    let img = add_deferred_image(&mut doc, 100.0, "broken.jpg");
    let mut engine = engine_with(doc, Session::default());
    boot(&mut engine);

    engine.preload_finished("broken.jpg", false);
    let doc = engine.document();
    assert_eq!(doc.tree().get_attr(img, "src").unwrap(), "broken.jpg");
    assert_eq!(engine.pipeline().state(img), Some(ImageState::Resolved));
    assert!(!engine.pipeline().cache().contains("broken.jpg"));
}

#[test]
fn test_missing_observer_resolves_raw_and_eager() {
    let mut doc = storefront(1, 1);
    let img = add_deferred_image(&mut doc, 5000.0, "deep.jpg");
    let session = Session {
        capabilities: Capabilities::full().with_viewport_observer(false),
        ..Session::default()
    };
    let mut engine = engine_with(doc, session);
    boot(&mut engine);

    let doc = engine.document();
    assert_eq!(doc.tree().get_attr(img, "src").unwrap(), "deep.jpg");
    assert!(doc.tree().get_attr(img, DEFERRED_ATTR).is_none());
    assert!(engine.started_preloads().is_empty());
}

#[test]
fn test_connection_change_affects_future_resolutions_only() {
    let mut doc = storefront(1, 1);
    let first = add_deferred_image(&mut doc, 100.0, "a.jpg");
    let second = add_deferred_image(&mut doc, 3000.0, "b.jpg");
    let mut engine = engine_with(doc, Session::default());
    boot(&mut engine);
    engine.preload_finished("a.jpg", true);

    engine.connection_changed("2g");
    assert_eq!(engine.connection(), ConnectionClass::TwoG);

    engine.scroll_to(2800.0);
    engine.run_until_idle();
    engine.preload_finished("b.jpg", true);

    let doc = engine.document();
    // Resolved before the change: high quality, untouched after it
    assert!(doc.tree().get_attr(first, "src").unwrap().contains("quality=15&"));
    assert!(doc.tree().get_attr(second, "src").unwrap().contains("quality=3&"));
}

#[test]
fn test_connection_change_ignored_without_capability() {
    let session = Session {
        capabilities: Capabilities::full().with_network_info(false),
        ..Session::default()
    };
    let mut engine = engine_with(storefront(1, 1), session);
    engine.connection_changed("2g");
    assert_eq!(engine.connection(), ConnectionClass::FourG);
}

// ============================================================================
// INTERACTIVE BEHAVIORS
// ============================================================================

#[test]
fn test_header_scroll_classes() {
    let mut engine = engine_with(storefront(2, 1), Session::default());
    boot(&mut engine);
    let header = engine.document().elements_by_tag("header")[0];

    engine.scroll_to(100.0);
    assert!(engine.document().tree().has_class(header, "navbar-scrolled"));
    assert!(!engine.document().tree().has_class(header, "navbar-hidden"));

    engine.scroll_to(500.0);
    assert!(engine.document().tree().has_class(header, "navbar-hidden"));

    engine.scroll_to(450.0);
    assert!(!engine.document().tree().has_class(header, "navbar-hidden"));
    engine.run_until_idle();
}

#[test]
fn test_slider_clamps_both_ends() {
    let mut engine = engine_with(storefront(1, 1), Session::default());

    // 5 slides: reachable indices are 0..=3
    assert_eq!(engine.slider_prev().unwrap(), 0);
    for expected in [1, 2, 3, 3] {
        assert_eq!(engine.slider_next().unwrap(), expected);
    }

    let doc = engine.document();
    let slider = doc.first_by_class("trending-slider").unwrap();
    assert_eq!(
        doc.tree().element(slider).unwrap().style("transform"),
        Some("translateX(-996px)")
    );
}

#[test]
fn test_mobile_menu_built_once_and_toggled() {
    let mut engine = engine_with(storefront(1, 1), Session::default());

    engine.toggle_mobile_menu().unwrap();
    let doc = engine.document();
    let menu = doc.first_by_class("mobile-menu").unwrap();
    let hamburger = doc.first_by_class("hamburger").unwrap();
    assert!(doc.tree().has_class(menu, "active"));
    assert!(doc.tree().has_class(hamburger, "active"));
    assert_eq!(doc.elements_by_class("mobile-nav-link").len(), 3);

    // Second toggle reuses the built menu and closes it
    engine.toggle_mobile_menu().unwrap();
    let doc = engine.document();
    assert_eq!(doc.elements_by_class("mobile-menu").len(), 1);
    assert!(!doc.tree().has_class(menu, "active"));

    engine.toggle_mobile_menu().unwrap();
    engine.close_mobile_menu();
    let doc = engine.document();
    assert!(!doc.tree().has_class(menu, "active"));
    assert!(!doc.tree().has_class(hamburger, "active"));
}

#[test]
fn test_newsletter_submit() {
    let mut engine = engine_with(storefront(1, 1), Session::default());

    assert!(!engine.submit_newsletter(""));
    assert!(engine.submit_newsletter("ada@example.com"));

    let doc = engine.document();
    let form = doc.first_by_class("newsletter-form").unwrap();
    let p = doc.tree().elements_by_tag(form, "p")[0];
    assert_eq!(doc.tree().text_content(p), "Thank you for subscribing!");
}

#[test]
fn test_add_to_cart_feedback_and_reset() {
    let mut engine = engine_with(storefront(1, 1), Session::default());
    boot(&mut engine);

    let button = engine.document().elements_by_class("add-to-cart")[0];
    engine.add_to_cart(button).unwrap();

    let doc = engine.document();
    assert_eq!(doc.tree().text_content(button), "Added to Cart!");
    assert_eq!(
        doc.tree().element(button).unwrap().style("background-color"),
        Some("#2ecc71")
    );

    engine.run_until_idle();
    let doc = engine.document();
    assert_eq!(doc.tree().text_content(button), "Add to Cart");
    assert!(doc.tree().element(button).unwrap().style("background-color").is_none());
}

#[test]
fn test_ripple_is_single_flight_globally() {
    let mut engine = engine_with(storefront(1, 2), Session::default());
    boot(&mut engine);
    let buttons = engine.document().elements_by_class("add-to-cart");

    let ripple = engine.hover_button(buttons[0], 10.0, 12.0).unwrap();
    assert!(engine.document().tree().has_class(ripple, "ripple"));
    assert_eq!(
        engine.document().tree().element(ripple).unwrap().style("left"),
        Some("10px")
    );
    // A second hover anywhere on the page is swallowed
    assert!(engine.hover_button(buttons[1], 0.0, 0.0).is_none());

    // After the ripple lifetime the element is gone and the guard is free
    engine.run_until_idle();
    assert!(!engine.document().tree().get(ripple).unwrap().parent.is_valid());
    assert!(engine.hover_button(buttons[1], 0.0, 0.0).is_some());
}

#[test]
fn test_image_hover_guarded_and_suppressed_when_narrow() {
    let mut doc = storefront(1, 1);
    let body = doc.body();
    let image = doc.tree_mut().create_element("div");
    doc.tree_mut().add_class(image, "product-image");
    doc.tree_mut().append_child(body, image);

    let mut engine = engine_with(doc, Session::default());
    assert!(engine.hover_product_image(image));
    // Guard holds until the tween settles
    assert!(!engine.hover_product_image(image));
    engine.run_until_idle();
    assert!(engine.hover_product_image(image));
    engine.leave_product_image(image);
    assert_eq!(engine.hover_timeline().steps().last().unwrap().props[0].1, 1.0);

    // Narrow viewport suppresses the effect entirely
    engine.resize(600.0, 800.0);
    engine.run_until_idle();
    assert!(!engine.hover_product_image(image));
}

#[test]
fn test_anchor_scroll_resolves_fragment() {
    let mut doc = storefront(3, 1);
    let body = doc.body();
    let target = doc.tree_mut().create_element("div");
    doc.tree_mut().set_attr(target, "id", "contact");
    doc.tree_mut().set_bounds(target, DomRect::from_xywh(0.0, 1900.0, 1280.0, 100.0));
    doc.tree_mut().append_child(body, target);

    let mut engine = engine_with(doc, Session::default());
    boot(&mut engine);

    engine.scroll_to_fragment("#contact");
    let header = engine.document().elements_by_tag("header")[0];
    assert!(engine.document().tree().has_class(header, "navbar-scrolled"));

    // Unknown fragment is a silent no-op
    engine.scroll_to_fragment("#nowhere");
}

#[test]
fn test_resize_debounce_collapses_bursts() {
    let mut engine = engine_with(storefront(1, 1), Session::default());
    engine.resize(1100.0, 700.0);
    engine.resize(1000.0, 700.0);
    engine.resize(900.0, 700.0);
    engine.run_until_idle();
    // Only the last resize in the burst refreshes
    assert_eq!(engine.scroll_refreshes(), 1);
}

// ============================================================================
// DIAGNOSTICS
// ============================================================================

#[test]
fn test_resource_audit_reports_blocking_resources() {
    let mut engine = engine_with(storefront(1, 1), Session::default());
    engine.record_resource(ResourceTiming::new("app.js", InitiatorType::Script, 420.0));
    engine.record_resource(ResourceTiming::new("style.css", InitiatorType::Css, 180.0));
    engine.record_resource(ResourceTiming::new("hero.jpg", InitiatorType::Img, 900.0));
    boot(&mut engine);

    let report = engine.blocking_report();
    assert_eq!(report.len(), 2);
    assert_eq!(report[0].name, "app.js");
}

#[test]
fn test_error_and_perf_reporting() {
    let mut engine = engine_with(storefront(1, 1), Session::default());
    engine.report_error(ScriptError::new("x is undefined", "main.js", 3, 7));
    engine.report_rejection("fetch aborted");
    engine.record_long_task("layout", 80.0);
    engine.record_long_task("paint", 10.0);
    engine.record_layout_shift(0.25);

    assert_eq!(engine.diagnostics().error_count(), 1);
    assert_eq!(engine.diagnostics().rejection_count(), 1);
    assert_eq!(engine.long_tasks().long_task_count(), 1);
    assert_eq!(engine.layout_shifts().significant_shift_count(), 1);
}
