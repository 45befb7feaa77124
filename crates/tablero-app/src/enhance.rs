// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! The enhancement behaviors. Each one is a pure function over the page tree:
//! it takes the elements it needs explicitly, mutates the tree, and reports
//! what it did. Absent optional elements make a behavior inert, never an
//! error.

use std::time::Duration;

use crate::ids::{
    ATTR_HREF, ATTR_TITLE, CLASS_ACTIVE, CLASS_BTN, CLASS_BTN_ICON, CLASS_COLLAPSED,
    CLASS_CONTENT_WRAPPER, CLASS_HIDDEN, CLASS_ITEM_NAME, CLASS_LIFTED, CLASS_LOADING,
    CLASS_MENU_CATEGORY, CLASS_MENU_ITEM, CLASS_MENU_ITEMS, CLASS_MOBILE_TOGGLE, CLASS_NO_RESULTS,
    CLASS_RIPPLE, CLASS_SCROLL_TOP, CLASS_SCROLL_WRAPPER, CLASS_SHOW, CLASS_TABLE, NodeId,
    REFRESH_TITLE, SIDEBAR_ID, SIDEBAR_TOGGLE_ID,
};
use crate::page::{Animation, AnimationName, Page, Rect, Tag};

pub const MOBILE_BREAKPOINT_PX: u32 = 768;
pub const SCROLL_TOP_THRESHOLD_PX: u32 = 300;
pub const DEFAULT_RESCAN_DELAY: Duration = Duration::from_millis(500);
pub const RIPPLE_LIFETIME: Duration = Duration::from_millis(600);
pub const ROW_STAGGER_STEP_MS: u64 = 20;
pub const ROW_FADE_DURATION_MS: u64 = 300;
pub const NO_RESULTS_TEXT: &str = "No tables found";

/// Wraps every table in a horizontally scrolling block container, inserted
/// where the table sat so sibling order is preserved. Idempotent: a table
/// whose parent already carries the wrapper marker is skipped, so the delayed
/// re-scan never nests or duplicates wrappers.
pub fn wrap_tables(page: &mut Page) -> usize {
    let mut wrapped = 0;
    for table in page.all_by_tag(Tag::Table) {
        let already = page
            .parent(table)
            .is_some_and(|parent| page.has_class(parent, CLASS_SCROLL_WRAPPER));
        if already {
            continue;
        }

        let wrapper = page.create(Tag::Div);
        page.add_class(wrapper, CLASS_SCROLL_WRAPPER);
        page.insert_before(wrapper, table);
        page.append_child(wrapper, table);
        wrapped += 1;
    }
    wrapped
}

/// Applies the persisted collapsed state before first paint. Only an explicit
/// stored `true` collapses; anything else leaves the sidebar expanded.
pub fn restore_sidebar(page: &mut Page, collapsed: bool) -> bool {
    if !collapsed {
        return false;
    }
    let Some(sidebar) = page.by_id(SIDEBAR_ID) else {
        return false;
    };
    page.add_class(sidebar, CLASS_COLLAPSED);
    true
}

/// Flips the sidebar collapsed state; the caller persists the new flag.
/// Wired only when both the sidebar and its toggle control exist; a page
/// missing either leaves the feature inert.
pub fn toggle_sidebar(page: &mut Page) -> Option<bool> {
    page.by_id(SIDEBAR_TOGGLE_ID)?;
    let sidebar = page.by_id(SIDEBAR_ID)?;
    Some(page.toggle_class(sidebar, CLASS_COLLAPSED))
}

pub fn sidebar_collapsed(page: &Page) -> bool {
    page.by_id(SIDEBAR_ID)
        .is_some_and(|sidebar| page.has_class(sidebar, CLASS_COLLAPSED))
}

/// Toggles the category container enclosing a clicked header. Categories are
/// independent; any number may be open at once and nothing is persisted.
/// Returns the container and its resulting collapsed state.
pub fn toggle_category(page: &mut Page, header: NodeId) -> Option<(NodeId, bool)> {
    let category = page.parent(header)?;
    let collapsed = page.toggle_class(category, CLASS_COLLAPSED);
    Some((category, collapsed))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOutcome {
    pub visible: usize,
    pub total: usize,
}

/// Case-insensitive substring filter over menu item labels. Items without a
/// label span keep their current visibility. Maintains the singleton
/// "no results" node: present exactly when nothing is visible and the query
/// is non-empty.
pub fn apply_search(page: &mut Page, query: &str) -> FilterOutcome {
    let needle = query.to_lowercase();
    let items = page.all_by_class(CLASS_MENU_ITEM);
    let total = items.len();

    for item in &items {
        let Some(label) = page.descendant_by_class(*item, CLASS_ITEM_NAME) else {
            continue;
        };
        let text = page.node(label).text.to_lowercase();
        if text.contains(&needle) {
            page.remove_class(*item, CLASS_HIDDEN);
        } else {
            page.add_class(*item, CLASS_HIDDEN);
        }
    }

    let visible = items
        .iter()
        .filter(|item| !page.has_class(**item, CLASS_HIDDEN))
        .count();

    if visible == 0 && !needle.is_empty() {
        show_no_results(page);
    } else {
        hide_no_results(page);
    }

    FilterOutcome { visible, total }
}

fn show_no_results(page: &mut Page) {
    if page.first_by_class(CLASS_NO_RESULTS).is_some() {
        return;
    }
    let Some(container) = page.first_by_class(CLASS_MENU_ITEMS) else {
        return;
    };
    let message = page.create(Tag::Div);
    page.add_class(message, CLASS_NO_RESULTS);
    page.node_mut(message).text = NO_RESULTS_TEXT.to_owned();
    page.append_child(container, message);
}

fn hide_no_results(page: &mut Page) {
    for message in page.all_by_class(CLASS_NO_RESULTS) {
        page.remove(message);
    }
}

/// Marks every menu item whose link target equals the current path and
/// force-expands its enclosing category so the active entry is visible
/// without user action.
pub fn highlight_active(page: &mut Page, current_path: &str) -> usize {
    let mut marked = 0;
    for item in page.all_by_class(CLASS_MENU_ITEM) {
        let Some(anchor) = page.descendant_by_tag(item, Tag::Anchor) else {
            continue;
        };
        if page.attr(anchor, ATTR_HREF) != Some(current_path) {
            continue;
        }
        page.add_class(item, CLASS_ACTIVE);
        marked += 1;
        if let Some(category) = page.closest_with_class(item, CLASS_MENU_CATEGORY) {
            page.remove_class(category, CLASS_COLLAPSED);
        }
    }
    marked
}

/// Marks the refresh icon button as loading. The caller triggers the reload;
/// a second press before it lands is a no-op because the reload was already
/// requested.
pub fn press_refresh(page: &mut Page) -> bool {
    let Some(button) = page
        .all_by_class(CLASS_BTN_ICON)
        .into_iter()
        .find(|button| page.attr(*button, ATTR_TITLE) == Some(REFRESH_TITLE))
    else {
        return false;
    };
    page.add_class(button, CLASS_LOADING);
    true
}

/// Injects the floating mobile menu button when the viewport is at or under
/// the breakpoint. Evaluated once at load; resizing afterwards does not
/// install or remove the button (known limitation, kept on purpose).
pub fn install_mobile_menu(page: &mut Page, viewport_width: u32, breakpoint: u32) -> bool {
    if viewport_width > breakpoint {
        return false;
    }
    if page.first_by_class(CLASS_MOBILE_TOGGLE).is_some() {
        return false;
    }
    let toggle = page.create(Tag::Button);
    page.add_class(toggle, CLASS_MOBILE_TOGGLE);
    let root = page.root();
    page.append_child(root, toggle);
    true
}

pub fn toggle_mobile_menu(page: &mut Page) -> Option<bool> {
    let sidebar = page.by_id(SIDEBAR_ID)?;
    Some(page.toggle_class(sidebar, CLASS_SHOW))
}

/// Click-outside-to-close: removes the `show` state only when it is present.
pub fn close_mobile_menu(page: &mut Page) -> bool {
    let Some(sidebar) = page.by_id(SIDEBAR_ID) else {
        return false;
    };
    if !page.has_class(sidebar, CLASS_SHOW) {
        return false;
    }
    page.remove_class(sidebar, CLASS_SHOW);
    true
}

/// Injects the floating scroll-to-top button, hidden by default. Requires the
/// content wrapper; pages without one get no button.
pub fn install_scroll_top(page: &mut Page) -> Option<NodeId> {
    page.first_by_class(CLASS_CONTENT_WRAPPER)?;
    if let Some(existing) = page.first_by_class(CLASS_SCROLL_TOP) {
        return Some(existing);
    }
    let button = page.create(Tag::Button);
    page.add_class(button, CLASS_SCROLL_TOP);
    page.add_class(button, CLASS_HIDDEN);
    let root = page.root();
    page.append_child(root, button);
    Some(button)
}

/// Re-evaluated on every scroll event, unthrottled: visible strictly above
/// the threshold, hidden at or below it.
pub fn update_scroll_top(page: &mut Page, offset: u32, threshold: u32) -> Option<bool> {
    let button = page.first_by_class(CLASS_SCROLL_TOP)?;
    let visible = offset > threshold;
    if visible {
        page.remove_class(button, CLASS_HIDDEN);
    } else {
        page.add_class(button, CLASS_HIDDEN);
    }
    Some(visible)
}

/// Hover lift on the scroll-to-top button. Purely visual.
pub fn set_scroll_top_hover(page: &mut Page, hovered: bool) -> bool {
    let Some(button) = page.first_by_class(CLASS_SCROLL_TOP) else {
        return false;
    };
    if hovered {
        page.add_class(button, CLASS_LIFTED);
    } else {
        page.remove_class(button, CLASS_LIFTED);
    }
    true
}

/// While the sidebar is collapsed, every menu anchor carries its label text
/// as a native tooltip so labels stay discoverable. Re-run after each toggle.
pub fn apply_tooltips(page: &mut Page) -> usize {
    if !sidebar_collapsed(page) {
        return 0;
    }
    let mut applied = 0;
    for item in page.all_by_class(CLASS_MENU_ITEM) {
        let Some(anchor) = page.descendant_by_tag(item, Tag::Anchor) else {
            continue;
        };
        let Some(label) = page.descendant_by_tag(item, Tag::Span) else {
            continue;
        };
        let text = page.node(label).text.clone();
        page.set_attr(anchor, ATTR_TITLE, text);
        applied += 1;
    }
    applied
}

/// Staggered fade-in over body rows of styled tables: each row starts
/// `index * 20ms` after the previous cascade step.
pub fn stagger_rows(page: &mut Page) -> usize {
    let mut animated = 0;
    for table in page.all_by_class(CLASS_TABLE) {
        let Some(body) = page.descendant_by_tag(table, Tag::TableBody) else {
            continue;
        };
        let rows: Vec<NodeId> = page
            .children(body)
            .iter()
            .copied()
            .filter(|row| page.node(*row).tag == Tag::TableRow)
            .collect();
        for (index, row) in rows.into_iter().enumerate() {
            page.node_mut(row).animation = Some(Animation {
                name: AnimationName::FadeIn,
                delay_ms: index as u64 * ROW_STAGGER_STEP_MS,
                duration_ms: ROW_FADE_DURATION_MS,
            });
            animated += 1;
        }
    }
    animated
}

/// Spawns the short-lived ripple overlay inside a pressed button: a circle
/// sized to the larger button dimension, centered on the click point. The
/// host removes it after [`RIPPLE_LIFETIME`].
pub fn spawn_ripple(page: &mut Page, button: NodeId, x: i32, y: i32) -> Option<NodeId> {
    if !page.has_class(button, CLASS_BTN) {
        return None;
    }
    let rect = page.node(button).rect?;
    let size = rect.width.max(rect.height);
    let half = size as i32 / 2;

    let ripple = page.create(Tag::Span);
    page.add_class(ripple, CLASS_RIPPLE);
    page.node_mut(ripple).rect = Some(Rect {
        x: x - half,
        y: y - half,
        width: size,
        height: size,
    });
    page.node_mut(ripple).animation = Some(Animation {
        name: AnimationName::Ripple,
        delay_ms: 0,
        duration_ms: RIPPLE_LIFETIME.as_millis() as u64,
    });
    page.append_child(button, ripple);
    Some(ripple)
}

pub fn remove_ripple(page: &mut Page, ripple: NodeId) -> bool {
    if !page.is_attached(ripple) || !page.has_class(ripple, CLASS_RIPPLE) {
        return false;
    }
    page.remove(ripple);
    true
}

/// The two keyframe animations plus the clipping base rule for buttons.
/// Injected once at enhancer construction, independent of the load pass.
pub fn inject_global_styles(page: &mut Page) {
    let rules = [
        (
            "ripple",
            "to { transform: scale(4); opacity: 0; }",
        ),
        (
            "fadeIn",
            "from { opacity: 0; transform: translateY(10px); } to { opacity: 1; transform: translateY(0); }",
        ),
        ("btn", "position: relative; overflow: hidden;"),
    ];
    for (name, body) in rules {
        if !page.stylesheet.has_rule(name) {
            page.stylesheet.push_rule(name, body);
        }
    }
}
