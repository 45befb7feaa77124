// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Builds the admin page tree the enhancer contracts with. In production the
//! document comes from the server template; the preview rebuilds it from a
//! [`TemplateSpec`] so reloads and tests control the content.

use serde::{Deserialize, Serialize};

use crate::ids::{
    ATTR_HREF, ATTR_TITLE, CLASS_BTN, CLASS_BTN_ICON, CLASS_CATEGORY_HEADER, CLASS_COLLAPSED,
    CLASS_CONTENT_WRAPPER, CLASS_ITEM_NAME, CLASS_MENU_CATEGORY, CLASS_MENU_ITEM, CLASS_MENU_ITEMS,
    CLASS_TABLE, MAIN_CONTENT_ID, REFRESH_TITLE, SEARCH_INPUT_ID, SIDEBAR_ID, SIDEBAR_TOGGLE_ID,
};
use crate::page::{Page, Rect, Tag};

const ACTION_BUTTON_WIDTH: u32 = 96;
const ACTION_BUTTON_HEIGHT: u32 = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub label: String,
    pub href: String,
}

impl MenuEntry {
    pub fn for_table(label: &str) -> Self {
        Self {
            label: label.to_owned(),
            href: format!("/admin/{}", label.to_lowercase()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuCategory {
    pub label: String,
    pub entries: Vec<MenuEntry>,
    pub collapsed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSpec {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSpec {
    pub categories: Vec<MenuCategory>,
    pub tables: Vec<TableSpec>,
    pub actions: Vec<String>,
}

impl TemplateSpec {
    /// The default preview content: a small menu and one table per entry of
    /// the first category.
    pub fn sample() -> Self {
        Self {
            categories: vec![
                MenuCategory {
                    label: "Core".to_owned(),
                    entries: vec![
                        MenuEntry::for_table("Users"),
                        MenuEntry::for_table("Groups"),
                        MenuEntry::for_table("Permissions"),
                    ],
                    collapsed: false,
                },
                MenuCategory {
                    label: "Commerce".to_owned(),
                    entries: vec![
                        MenuEntry::for_table("Orders"),
                        MenuEntry::for_table("Products"),
                        MenuEntry::for_table("Invoices"),
                    ],
                    collapsed: true,
                },
            ],
            tables: vec![TableSpec {
                title: "Users".to_owned(),
                columns: vec!["id".to_owned(), "name".to_owned(), "email".to_owned()],
                rows: (1..=8)
                    .map(|id| {
                        vec![
                            id.to_string(),
                            format!("user-{id}"),
                            format!("user-{id}@example.com"),
                        ]
                    })
                    .collect(),
            }],
            actions: vec!["Add".to_owned(), "Export".to_owned(), "Delete".to_owned()],
        }
    }

    /// Seeded demo content: every table listed in the menu rendered with
    /// deterministic rows, sized to make the scroll and stagger behaviors
    /// visible.
    pub fn demo() -> Self {
        let mut spec = Self::sample();
        spec.categories.push(MenuCategory {
            label: "Content".to_owned(),
            entries: vec![
                MenuEntry::for_table("Pages"),
                MenuEntry::for_table("Media"),
                MenuEntry::for_table("Comments"),
            ],
            collapsed: true,
        });
        spec.tables = DEMO_TABLES
            .iter()
            .map(|(title, columns)| TableSpec {
                title: (*title).to_owned(),
                columns: columns.iter().map(|c| (*c).to_owned()).collect(),
                rows: (1..=24)
                    .map(|id| {
                        columns
                            .iter()
                            .enumerate()
                            .map(|(index, column)| {
                                if index == 0 {
                                    id.to_string()
                                } else {
                                    format!("{column}-{id}")
                                }
                            })
                            .collect()
                    })
                    .collect(),
            })
            .collect();
        spec
    }
}

const DEMO_TABLES: [(&str, &[&str]); 3] = [
    ("Users", &["id", "name", "email", "created_at", "last_login"]),
    (
        "Orders",
        &["id", "user", "total", "status", "placed_at", "shipped_at"],
    ),
    ("Products", &["id", "sku", "title", "price", "stock"]),
];

pub fn build_page(spec: &TemplateSpec) -> Page {
    let mut page = Page::new();
    let root = page.root();

    let sidebar = page.create(Tag::Div);
    page.node_mut(sidebar).element_id = Some(SIDEBAR_ID.to_owned());
    page.append_child(root, sidebar);

    let toggle = page.create(Tag::Button);
    page.node_mut(toggle).element_id = Some(SIDEBAR_TOGGLE_ID.to_owned());
    page.append_child(sidebar, toggle);

    let search = page.create(Tag::Input);
    page.node_mut(search).element_id = Some(SEARCH_INPUT_ID.to_owned());
    page.append_child(sidebar, search);

    for category_spec in &spec.categories {
        let category = page.create(Tag::Div);
        page.add_class(category, CLASS_MENU_CATEGORY);
        if category_spec.collapsed {
            page.add_class(category, CLASS_COLLAPSED);
        }
        page.append_child(sidebar, category);

        let header = page.create(Tag::Div);
        page.add_class(header, CLASS_CATEGORY_HEADER);
        page.node_mut(header).text = category_spec.label.clone();
        page.append_child(category, header);

        let container = page.create(Tag::Div);
        page.add_class(container, CLASS_MENU_ITEMS);
        page.append_child(category, container);

        for entry in &category_spec.entries {
            let item = page.create(Tag::Div);
            page.add_class(item, CLASS_MENU_ITEM);
            page.append_child(container, item);

            let anchor = page.create(Tag::Anchor);
            page.set_attr(anchor, ATTR_HREF, entry.href.clone());
            page.append_child(item, anchor);

            let name = page.create(Tag::Span);
            page.add_class(name, CLASS_ITEM_NAME);
            page.node_mut(name).text = entry.label.clone();
            page.append_child(anchor, name);
        }
    }

    let main = page.create(Tag::Div);
    page.node_mut(main).element_id = Some(MAIN_CONTENT_ID.to_owned());
    page.append_child(root, main);

    let wrapper = page.create(Tag::Div);
    page.add_class(wrapper, CLASS_CONTENT_WRAPPER);
    page.append_child(main, wrapper);

    let refresh = page.create(Tag::Button);
    page.add_class(refresh, CLASS_BTN_ICON);
    page.set_attr(refresh, ATTR_TITLE, REFRESH_TITLE);
    page.append_child(wrapper, refresh);

    for (index, label) in spec.actions.iter().enumerate() {
        let action = page.create(Tag::Button);
        page.add_class(action, CLASS_BTN);
        page.node_mut(action).text = label.clone();
        page.node_mut(action).rect = Some(Rect {
            x: (index as u32 * (ACTION_BUTTON_WIDTH + 8)) as i32,
            y: 0,
            width: ACTION_BUTTON_WIDTH,
            height: ACTION_BUTTON_HEIGHT,
        });
        page.append_child(wrapper, action);
    }

    for table_spec in &spec.tables {
        let table = page.create(Tag::Table);
        page.add_class(table, CLASS_TABLE);
        page.set_attr(table, ATTR_TITLE, table_spec.title.clone());
        page.append_child(wrapper, table);

        let header_row = page.create(Tag::TableRow);
        page.node_mut(header_row).text = table_spec.columns.join(" | ");
        page.append_child(table, header_row);

        let body = page.create(Tag::TableBody);
        page.append_child(table, body);
        for cells in &table_spec.rows {
            let row = page.create(Tag::TableRow);
            page.node_mut(row).text = cells.join(" | ");
            page.append_child(body, row);
        }
    }

    page
}

#[cfg(test)]
mod tests {
    use super::{TemplateSpec, build_page};
    use crate::ids::{
        CLASS_BTN, CLASS_CATEGORY_HEADER, CLASS_MENU_ITEM, SEARCH_INPUT_ID, SIDEBAR_ID,
        SIDEBAR_TOGGLE_ID,
    };
    use crate::page::Tag;

    #[test]
    fn sample_page_exposes_the_enhancer_contract() {
        let page = build_page(&TemplateSpec::sample());

        assert!(page.by_id(SIDEBAR_ID).is_some());
        assert!(page.by_id(SIDEBAR_TOGGLE_ID).is_some());
        assert!(page.by_id(SEARCH_INPUT_ID).is_some());
        assert_eq!(page.all_by_class(CLASS_MENU_ITEM).len(), 6);
        assert_eq!(page.all_by_class(CLASS_CATEGORY_HEADER).len(), 2);
        assert_eq!(page.all_by_tag(Tag::Table).len(), 1);
        assert_eq!(page.all_by_class(CLASS_BTN).len(), 3);
        for button in page.all_by_class(CLASS_BTN) {
            assert!(page.node(button).rect.is_some());
        }
    }
}
