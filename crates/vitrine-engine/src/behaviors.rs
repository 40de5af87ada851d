//! Page Behaviors
//!
//! DOM-only pieces of the page behaviors: header scroll classes, the
//! lazily-built mobile menu, the trending-slider transform, and the
//! newsletter success swap. Scheduling and persistence stay in the
//! engine; everything here is a plain tree mutation.

use vitrine_dom::{DomTree, NodeId};

/// Header gets a compact style once scrolled past this offset
pub const HEADER_SCROLLED_PX: f64 = 50.0;

/// Header hides on downward scroll past this offset
pub const HEADER_HIDE_PX: f64 = 300.0;

/// Replace an element's children with a single text node
pub fn set_text(tree: &mut DomTree, id: NodeId, text: &str) {
    tree.clear_children(id);
    let node = tree.create_text(text);
    tree.append_child(id, node);
}

/// Apply the header scroll classes for a scroll position
pub fn header_on_scroll(tree: &mut DomTree, header: NodeId, scroll_top: f64, last_scroll_top: f64) {
    if scroll_top > HEADER_SCROLLED_PX {
        tree.add_class(header, "navbar-scrolled");
    } else {
        tree.remove_class(header, "navbar-scrolled");
    }

    // Hide only while scrolling down, and only once well past the top
    if scroll_top > last_scroll_top && scroll_top > HEADER_HIDE_PX {
        tree.add_class(header, "navbar-hidden");
    } else {
        tree.remove_class(header, "navbar-hidden");
    }
}

/// Build the mobile menu from the nav links: a close button plus one
/// mobile link per nav item, appended to the body. Returns the menu node.
pub fn build_mobile_menu(tree: &mut DomTree, body: NodeId, nav_links: NodeId) -> NodeId {
    let menu = tree.create_element("div");
    tree.add_class(menu, "mobile-menu");

    let close = tree.create_element("div");
    tree.add_class(close, "mobile-menu-close");
    tree.append_child(menu, close);

    let list = tree.create_element("ul");
    tree.add_class(list, "mobile-nav-links");

    for item in tree.elements_by_tag(nav_links, "li") {
        let link = match tree.elements_by_tag(item, "a").into_iter().next() {
            Some(a) => a,
            None => continue,
        };
        let href = tree.get_attr(link, "href").unwrap_or_default();
        let label = tree.text_content(link);

        let mobile_item = tree.create_element("li");
        let mobile_link = tree.create_element("a");
        tree.add_class(mobile_link, "mobile-nav-link");
        tree.set_attr(mobile_link, "href", &href);
        set_text(tree, mobile_link, &label);

        tree.append_child(mobile_item, mobile_link);
        tree.append_child(list, mobile_item);
    }

    tree.append_child(menu, list);
    tree.append_child(body, menu);
    menu
}

/// Clamp a slider index to the reachable range for a slide count
pub fn clamp_slide_index(index: i64, slide_count: usize) -> usize {
    let max = slide_count.saturating_sub(2) as i64;
    index.clamp(0, max) as usize
}

/// Apply the slider transform for an index
pub fn apply_slide_transform(tree: &mut DomTree, container: NodeId, index: usize, slide_width: f64) {
    let offset = index as f64 * slide_width;
    if let Some(el) = tree.element_mut(container) {
        el.set_style("transform", &format!("translateX(-{offset}px)"));
    }
}

/// Swap a newsletter form's contents for the success message
pub fn newsletter_success(tree: &mut DomTree, form: NodeId) {
    tree.clear_children(form);

    let message = tree.create_element("p");
    set_text(tree, message, "Thank you for subscribing!");
    if let Some(el) = tree.element_mut(message) {
        el.set_style("color", "var(--primary-color)");
        el.set_style("margin-top", "1rem");
    }
    tree.append_child(form, message);
}
