// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Deterministic page builders for tests: known menu layouts, known table
//! shapes, and enhancers pre-driven through the load pass.

use tablero_app::state::{EnhanceOptions, Enhancer, EnhancerCommand, LoadContext};
use tablero_app::template::{MenuCategory, MenuEntry, TableSpec, TemplateSpec, build_page};
use tablero_app::{Page, Tag};

pub const MENU_LABELS: [&str; 6] = [
    "Users",
    "Groups",
    "Permissions",
    "Orders",
    "Products",
    "Invoices",
];

pub const WIDE_COLUMNS: [&str; 9] = [
    "id",
    "name",
    "email",
    "role",
    "status",
    "created_at",
    "updated_at",
    "last_login",
    "notes",
];

/// A page with a single expanded category holding the given menu labels and
/// no content area.
pub fn menu_page(labels: &[&str]) -> Page {
    let spec = TemplateSpec {
        categories: vec![MenuCategory {
            label: "Tables".to_owned(),
            entries: labels.iter().map(|label| MenuEntry::for_table(label)).collect(),
            collapsed: false,
        }],
        tables: Vec::new(),
        actions: Vec::new(),
    };
    build_page(&spec)
}

/// A page whose content area holds `tables` styled tables of `rows` body
/// rows each, wide enough to exercise horizontal scrolling.
pub fn table_page(tables: usize, rows: usize) -> Page {
    let spec = TemplateSpec {
        categories: vec![MenuCategory {
            label: "Tables".to_owned(),
            entries: vec![MenuEntry::for_table("Users")],
            collapsed: false,
        }],
        tables: (0..tables)
            .map(|index| TableSpec {
                title: format!("table-{index}"),
                columns: WIDE_COLUMNS.iter().map(|c| (*c).to_owned()).collect(),
                rows: (1..=rows)
                    .map(|id| WIDE_COLUMNS.iter().map(|c| format!("{c}-{id}")).collect())
                    .collect(),
            })
            .collect(),
        actions: vec!["Add".to_owned()],
    };
    build_page(&spec)
}

/// An enhancer over the sample template, already driven through the load
/// pass with the given environment.
pub fn loaded_enhancer(viewport_width: u32, current_path: &str) -> Enhancer {
    let mut enhancer = Enhancer::new(
        build_page(&TemplateSpec::sample()),
        EnhanceOptions::default(),
    );
    enhancer.dispatch(EnhancerCommand::Load(LoadContext {
        restore_collapsed: false,
        viewport_width,
        current_path: current_path.to_owned(),
    }));
    enhancer
}

/// Appends a bare (unstyled, unwrapped) table to the page root, standing in
/// for content rendered after the initial load pass.
pub fn append_late_table(page: &mut Page) {
    let table = page.create(Tag::Table);
    let body = page.create(Tag::TableBody);
    let row = page.create(Tag::TableRow);
    let root = page.root();
    page.append_child(root, table);
    page.append_child(table, body);
    page.append_child(body, row);
}

#[cfg(test)]
mod tests {
    use super::{loaded_enhancer, menu_page, table_page};
    use tablero_app::ids::{CLASS_MENU_ITEM, CLASS_SCROLL_WRAPPER};
    use tablero_app::Tag;

    #[test]
    fn menu_page_exposes_requested_labels() {
        let page = menu_page(&["Users", "Orders"]);
        assert_eq!(page.all_by_class(CLASS_MENU_ITEM).len(), 2);
    }

    #[test]
    fn table_page_sizes_to_request() {
        let page = table_page(2, 5);
        assert_eq!(page.all_by_tag(Tag::Table).len(), 2);
    }

    #[test]
    fn loaded_enhancer_has_wrapped_tables() {
        let enhancer = loaded_enhancer(1280, "/admin/users");
        assert_eq!(enhancer.page().all_by_class(CLASS_SCROLL_WRAPPER).len(), 1);
    }
}
