// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

macro_rules! arena_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(usize);

        impl $name {
            pub const fn new(value: usize) -> Self {
                Self(value)
            }

            pub const fn get(self) -> usize {
                self.0
            }
        }

        impl From<usize> for $name {
            fn from(value: usize) -> Self {
                Self(value)
            }
        }
    };
}

arena_id!(NodeId);

// Element ids the page template publishes. The enhancer contracts with these
// by name; a missing element makes the matching behavior inert, never an error.
pub const SIDEBAR_ID: &str = "sidebar";
pub const SIDEBAR_TOGGLE_ID: &str = "sidebarToggle";
pub const MAIN_CONTENT_ID: &str = "mainContent";
pub const SEARCH_INPUT_ID: &str = "searchTables";

// Marker classes shared between the template, the behaviors, and the preview.
pub const CLASS_SCROLL_WRAPPER: &str = "table-scroll-wrapper";
pub const CLASS_CATEGORY_HEADER: &str = "category-header";
pub const CLASS_MENU_CATEGORY: &str = "menu-category";
pub const CLASS_MENU_ITEMS: &str = "menu-items";
pub const CLASS_MENU_ITEM: &str = "menu-item";
pub const CLASS_ITEM_NAME: &str = "item-name";
pub const CLASS_CONTENT_WRAPPER: &str = "content-wrapper";
pub const CLASS_TABLE: &str = "table";
pub const CLASS_HIDDEN: &str = "hidden";
pub const CLASS_COLLAPSED: &str = "collapsed";
pub const CLASS_ACTIVE: &str = "active";
pub const CLASS_SHOW: &str = "show";
pub const CLASS_LOADING: &str = "loading";
pub const CLASS_BTN: &str = "btn";
pub const CLASS_BTN_ICON: &str = "btn-icon";
pub const CLASS_RIPPLE: &str = "ripple";
pub const CLASS_NO_RESULTS: &str = "no-results-message";
pub const CLASS_MOBILE_TOGGLE: &str = "mobile-menu-toggle";
pub const CLASS_SCROLL_TOP: &str = "scroll-to-top";
pub const CLASS_LIFTED: &str = "lifted";

pub const ATTR_TITLE: &str = "title";
pub const ATTR_HREF: &str = "href";
pub const REFRESH_TITLE: &str = "Refresh";
