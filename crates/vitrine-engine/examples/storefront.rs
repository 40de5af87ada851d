//! Drives a full storefront session: boot, scroll, image resolution,
//! and a few interactions, with tracing output on stderr.
//!
//! Run with: cargo run --example storefront

use anyhow::Result;
use vitrine_dom::{Document, DomRect};
use vitrine_engine::{Config, Engine, Session};
use vitrine_media::DEFERRED_ATTR;

fn build_page() -> Document {
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
    for (href, label) in [("#home", "Home"), ("#shop", "Shop")] {
        let li = tree.create_element("li");
        let a = tree.create_element("a");
        tree.set_attr(a, "href", href);
        let text = tree.create_text(label);
        tree.append_child(a, text);
        tree.append_child(li, a);
        tree.append_child(nav, li);
    }

    for s in 0..4 {
        let section = tree.create_element("section");
        tree.append_child(body, section);
        let y = 700.0 * s as f64;
        tree.set_bounds(section, DomRect::from_xywh(0.0, y, 1280.0, 700.0));

        let title = tree.create_element("h2");
        tree.add_class(title, "section-title");
        tree.append_child(section, title);
        tree.set_bounds(title, DomRect::from_xywh(0.0, y, 1280.0, 60.0));

        for c in 0..4 {
            let card = tree.create_element("div");
            tree.add_class(card, "product-card");
            tree.append_child(section, card);
            tree.set_bounds(
                card,
                DomRect::from_xywh(300.0 * c as f64, y + 100.0, 260.0, 360.0),
            );

            let img = tree.create_element("img");
            tree.set_attr(img, DEFERRED_ATTR, &format!("products/item-{s}-{c}.jpg"));
            tree.set_bounds(img, DomRect::from_xywh(300.0 * c as f64, y + 100.0, 260.0, 200.0));
            tree.append_child(card, img);
        }
    }

    doc
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    let mut engine = Engine::new(build_page(), Config::default(), Session::default());

    engine.dispatch_content_loaded();
    engine.dispatch_load();
    engine.run_until_idle();

    // Resolve whatever the initial viewport requested
    for src in engine.started_preloads().to_vec() {
        engine.preload_finished(&src, true);
    }

    // Scroll through the page, resolving preloads as they start
    for y in [700.0, 1400.0, 2100.0] {
        engine.scroll_to(y);
        engine.run_until_idle();
        for src in engine.started_preloads().to_vec() {
            engine.preload_finished(&src, true);
        }
    }

    engine.toggle_theme();
    engine.toggle_mobile_menu()?;
    engine.run_until_idle();

    let doc = engine.document();
    let active = doc.elements_by_class("active").len();
    let loaded = doc.elements_by_class("loaded").len();
    tracing::info!(active, loaded, clock_ms = engine.now(), "session finished");

    Ok(())
}
