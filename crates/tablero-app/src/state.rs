// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::time::Duration;

use crate::enhance::{
    self, DEFAULT_RESCAN_DELAY, FilterOutcome, MOBILE_BREAKPOINT_PX, RIPPLE_LIFETIME,
    SCROLL_TOP_THRESHOLD_PX,
};
use crate::ids::{CLASS_MOBILE_TOGGLE, NodeId};
use crate::page::Page;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnhanceOptions {
    pub rescan_delay: Duration,
    pub mobile_breakpoint: u32,
    pub scroll_threshold: u32,
    pub ripple_lifetime: Duration,
}

impl Default for EnhanceOptions {
    fn default() -> Self {
        Self {
            rescan_delay: DEFAULT_RESCAN_DELAY,
            mobile_breakpoint: MOBILE_BREAKPOINT_PX,
            scroll_threshold: SCROLL_TOP_THRESHOLD_PX,
            ripple_lifetime: RIPPLE_LIFETIME,
        }
    }
}

/// Environment read once at load time: viewport width for the responsive
/// breakpoint and the current route for active-link matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadContext {
    pub restore_collapsed: bool,
    pub viewport_width: u32,
    pub current_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnhancerCommand {
    Load(LoadContext),
    RescanTables,
    ToggleSidebar,
    ToggleCategory(NodeId),
    SearchChanged(String),
    PressRefresh,
    ToggleMobileMenu,
    ContentClicked,
    Scrolled(u32),
    ScrollTopClicked,
    ScrollTopHover(bool),
    ButtonPressed { button: NodeId, x: i32, y: i32 },
    RemoveRipple(NodeId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    TablesWrapped(usize),
    SidebarRestored,
    SidebarToggled { collapsed: bool },
    CategoryToggled { category: NodeId, collapsed: bool },
    FilterApplied { visible: usize, total: usize },
    ReloadRequested,
    MobileMenuInstalled,
    MobileMenuToggled { shown: bool },
    ScrollTopInstalled,
    ScrollTopVisibility(bool),
    ScrolledToTop,
    RippleSpawned(NodeId),
    RippleRemoved(NodeId),
    ActiveMarked(usize),
    TooltipsApplied(usize),
    RowsAnimated(usize),
    StatusUpdated(String),
}

/// Owns the page tree and applies the enhancement behaviors in response to
/// host commands. Clock-free: timed effects (delayed re-scan, ripple expiry)
/// are scheduled by the host, which sends the follow-up command later.
/// Persistence is host-side too; `SidebarToggled` carries the flag to store.
#[derive(Debug, Clone, PartialEq)]
pub struct Enhancer {
    page: Page,
    options: EnhanceOptions,
    query: String,
    scroll_offset: u32,
}

impl Enhancer {
    pub fn new(mut page: Page, options: EnhanceOptions) -> Self {
        // Keyframes land at construction, independent of the load pass.
        enhance::inject_global_styles(&mut page);
        Self {
            page,
            options,
            query: String::new(),
            scroll_offset: 0,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub const fn options(&self) -> EnhanceOptions {
        self.options
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub const fn scroll_offset(&self) -> u32 {
        self.scroll_offset
    }

    /// Swaps in a freshly rendered page after a reload, resetting transient
    /// state the way a real navigation would.
    pub fn replace_page(&mut self, mut page: Page) {
        enhance::inject_global_styles(&mut page);
        self.page = page;
        self.query.clear();
        self.scroll_offset = 0;
    }

    pub fn dispatch(&mut self, command: EnhancerCommand) -> Vec<UiEvent> {
        match command {
            EnhancerCommand::Load(context) => self.load(&context),
            EnhancerCommand::RescanTables => {
                vec![UiEvent::TablesWrapped(enhance::wrap_tables(&mut self.page))]
            }
            EnhancerCommand::ToggleSidebar => self.toggle_sidebar(),
            EnhancerCommand::ToggleCategory(header) => {
                match enhance::toggle_category(&mut self.page, header) {
                    Some((category, collapsed)) => {
                        vec![UiEvent::CategoryToggled {
                            category,
                            collapsed,
                        }]
                    }
                    None => Vec::new(),
                }
            }
            EnhancerCommand::SearchChanged(query) => {
                let FilterOutcome { visible, total } =
                    enhance::apply_search(&mut self.page, &query);
                self.query = query;
                vec![UiEvent::FilterApplied { visible, total }]
            }
            EnhancerCommand::PressRefresh => {
                if enhance::press_refresh(&mut self.page) {
                    vec![UiEvent::ReloadRequested]
                } else {
                    Vec::new()
                }
            }
            EnhancerCommand::ToggleMobileMenu => {
                if self.page.first_by_class(CLASS_MOBILE_TOGGLE).is_none() {
                    return Vec::new();
                }
                match enhance::toggle_mobile_menu(&mut self.page) {
                    Some(shown) => vec![UiEvent::MobileMenuToggled { shown }],
                    None => Vec::new(),
                }
            }
            EnhancerCommand::ContentClicked => {
                if enhance::close_mobile_menu(&mut self.page) {
                    vec![UiEvent::MobileMenuToggled { shown: false }]
                } else {
                    Vec::new()
                }
            }
            EnhancerCommand::Scrolled(offset) => {
                self.scroll_offset = offset;
                match enhance::update_scroll_top(
                    &mut self.page,
                    offset,
                    self.options.scroll_threshold,
                ) {
                    Some(visible) => vec![UiEvent::ScrollTopVisibility(visible)],
                    None => Vec::new(),
                }
            }
            EnhancerCommand::ScrollTopClicked => {
                self.scroll_offset = 0;
                match enhance::update_scroll_top(&mut self.page, 0, self.options.scroll_threshold)
                {
                    Some(_) => vec![UiEvent::ScrolledToTop, UiEvent::ScrollTopVisibility(false)],
                    None => Vec::new(),
                }
            }
            EnhancerCommand::ScrollTopHover(hovered) => {
                // Visual lift only; no functional effect to report.
                enhance::set_scroll_top_hover(&mut self.page, hovered);
                Vec::new()
            }
            EnhancerCommand::ButtonPressed { button, x, y } => {
                match enhance::spawn_ripple(&mut self.page, button, x, y) {
                    Some(ripple) => vec![UiEvent::RippleSpawned(ripple)],
                    None => Vec::new(),
                }
            }
            EnhancerCommand::RemoveRipple(ripple) => {
                if enhance::remove_ripple(&mut self.page, ripple) {
                    vec![UiEvent::RippleRemoved(ripple)]
                } else {
                    Vec::new()
                }
            }
        }
    }

    fn load(&mut self, context: &LoadContext) -> Vec<UiEvent> {
        let mut events = Vec::new();

        events.push(UiEvent::TablesWrapped(enhance::wrap_tables(&mut self.page)));

        if enhance::restore_sidebar(&mut self.page, context.restore_collapsed) {
            events.push(UiEvent::SidebarRestored);
        }

        let marked = enhance::highlight_active(&mut self.page, &context.current_path);
        if marked > 0 {
            events.push(UiEvent::ActiveMarked(marked));
        }

        if enhance::install_mobile_menu(
            &mut self.page,
            context.viewport_width,
            self.options.mobile_breakpoint,
        ) {
            events.push(UiEvent::MobileMenuInstalled);
        }

        if enhance::install_scroll_top(&mut self.page).is_some() {
            events.push(UiEvent::ScrollTopInstalled);
        }

        let tooltips = enhance::apply_tooltips(&mut self.page);
        if tooltips > 0 {
            events.push(UiEvent::TooltipsApplied(tooltips));
        }

        let animated = enhance::stagger_rows(&mut self.page);
        if animated > 0 {
            events.push(UiEvent::RowsAnimated(animated));
        }

        events.push(UiEvent::StatusUpdated("page enhanced".to_owned()));
        events
    }

    fn toggle_sidebar(&mut self) -> Vec<UiEvent> {
        let Some(collapsed) = enhance::toggle_sidebar(&mut self.page) else {
            return Vec::new();
        };
        let mut events = vec![UiEvent::SidebarToggled { collapsed }];
        let tooltips = enhance::apply_tooltips(&mut self.page);
        if tooltips > 0 {
            events.push(UiEvent::TooltipsApplied(tooltips));
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::{EnhanceOptions, Enhancer, EnhancerCommand, LoadContext, UiEvent};
    use crate::ids::{
        ATTR_HREF, CLASS_BTN, CLASS_CATEGORY_HEADER, CLASS_COLLAPSED, CLASS_CONTENT_WRAPPER,
        CLASS_HIDDEN, CLASS_ITEM_NAME, CLASS_MENU_CATEGORY, CLASS_MENU_ITEM, CLASS_MENU_ITEMS,
        CLASS_MOBILE_TOGGLE, CLASS_NO_RESULTS, CLASS_RIPPLE, CLASS_SCROLL_TOP,
        CLASS_SCROLL_WRAPPER, CLASS_SHOW, NodeId, SIDEBAR_ID, SIDEBAR_TOGGLE_ID,
    };
    use crate::page::{Page, Rect, Tag};

    fn sample_page() -> Page {
        let mut page = Page::new();
        let root = page.root();

        let sidebar = page.create(Tag::Div);
        page.node_mut(sidebar).element_id = Some(SIDEBAR_ID.to_owned());
        page.append_child(root, sidebar);

        let toggle = page.create(Tag::Button);
        page.node_mut(toggle).element_id = Some(SIDEBAR_TOGGLE_ID.to_owned());
        page.append_child(sidebar, toggle);

        let category = page.create(Tag::Div);
        page.add_class(category, CLASS_MENU_CATEGORY);
        page.add_class(category, CLASS_COLLAPSED);
        page.append_child(sidebar, category);
        let header = page.create(Tag::Div);
        page.add_class(header, CLASS_CATEGORY_HEADER);
        page.append_child(category, header);

        let container = page.create(Tag::Div);
        page.add_class(container, CLASS_MENU_ITEMS);
        page.append_child(category, container);
        for label in ["Users", "Orders", "Products"] {
            let item = page.create(Tag::Div);
            page.add_class(item, CLASS_MENU_ITEM);
            let anchor = page.create(Tag::Anchor);
            page.set_attr(anchor, ATTR_HREF, format!("/admin/{}", label.to_lowercase()));
            let name = page.create(Tag::Span);
            page.add_class(name, CLASS_ITEM_NAME);
            page.node_mut(name).text = label.to_owned();
            page.append_child(container, item);
            page.append_child(item, anchor);
            page.append_child(anchor, name);
        }

        let content = page.create(Tag::Div);
        page.add_class(content, CLASS_CONTENT_WRAPPER);
        page.append_child(root, content);

        let table = page.create(Tag::Table);
        page.append_child(content, table);

        let button = page.create(Tag::Button);
        page.add_class(button, CLASS_BTN);
        page.node_mut(button).rect = Some(Rect {
            x: 0,
            y: 0,
            width: 80,
            height: 30,
        });
        page.append_child(content, button);

        page
    }

    fn load_context() -> LoadContext {
        LoadContext {
            restore_collapsed: false,
            viewport_width: 1280,
            current_path: "/admin/orders".to_owned(),
        }
    }

    fn loaded_enhancer() -> Enhancer {
        let mut enhancer = Enhancer::new(sample_page(), EnhanceOptions::default());
        enhancer.dispatch(EnhancerCommand::Load(load_context()));
        enhancer
    }

    #[test]
    fn load_wraps_tables_and_marks_active() {
        let mut enhancer = Enhancer::new(sample_page(), EnhanceOptions::default());
        let events = enhancer.dispatch(EnhancerCommand::Load(load_context()));

        assert!(events.contains(&UiEvent::TablesWrapped(1)));
        assert!(events.contains(&UiEvent::ActiveMarked(1)));
        assert!(events.contains(&UiEvent::ScrollTopInstalled));
        assert!(
            events
                .iter()
                .any(|event| matches!(event, UiEvent::StatusUpdated(_)))
        );

        // The active item's category was force-expanded.
        let category = enhancer.page().first_by_class(CLASS_MENU_CATEGORY).unwrap();
        assert!(!enhancer.page().has_class(category, CLASS_COLLAPSED));
    }

    #[test]
    fn rescan_after_load_wraps_nothing_new() {
        let mut enhancer = loaded_enhancer();
        let events = enhancer.dispatch(EnhancerCommand::RescanTables);
        assert_eq!(events, vec![UiEvent::TablesWrapped(0)]);
        assert_eq!(
            enhancer.page().all_by_class(CLASS_SCROLL_WRAPPER).len(),
            1
        );
    }

    #[test]
    fn rescan_catches_late_rendered_tables() {
        let mut enhancer = loaded_enhancer();
        // A table rendered after the load pass, before the delayed re-scan.
        let mut page = enhancer.page().clone();
        let late = page.create(Tag::Table);
        let root = page.root();
        page.append_child(root, late);
        enhancer.replace_page(page);

        let events = enhancer.dispatch(EnhancerCommand::RescanTables);
        assert_eq!(events, vec![UiEvent::TablesWrapped(1)]);
        assert_eq!(
            enhancer.page().all_by_class(CLASS_SCROLL_WRAPPER).len(),
            2
        );
    }

    #[test]
    fn sidebar_toggle_reports_flag_for_persistence() {
        let mut enhancer = loaded_enhancer();
        let events = enhancer.dispatch(EnhancerCommand::ToggleSidebar);
        assert_eq!(events[0], UiEvent::SidebarToggled { collapsed: true });
        // Collapsed sidebar picks up tooltips in the same dispatch.
        assert!(events.contains(&UiEvent::TooltipsApplied(3)));

        let events = enhancer.dispatch(EnhancerCommand::ToggleSidebar);
        assert_eq!(events, vec![UiEvent::SidebarToggled { collapsed: false }]);
    }

    #[test]
    fn restore_collapsed_applies_before_interaction() {
        let mut enhancer = Enhancer::new(sample_page(), EnhanceOptions::default());
        let events = enhancer.dispatch(EnhancerCommand::Load(LoadContext {
            restore_collapsed: true,
            ..load_context()
        }));
        assert!(events.contains(&UiEvent::SidebarRestored));
        assert!(events.contains(&UiEvent::TooltipsApplied(3)));

        let sidebar = enhancer.page().by_id(SIDEBAR_ID).unwrap();
        assert!(enhancer.page().has_class(sidebar, CLASS_COLLAPSED));
    }

    #[test]
    fn search_filters_and_maintains_no_results_singleton() {
        let mut enhancer = loaded_enhancer();

        let events = enhancer.dispatch(EnhancerCommand::SearchChanged("or".to_owned()));
        assert_eq!(
            events,
            vec![UiEvent::FilterApplied {
                visible: 1,
                total: 3
            }]
        );
        assert!(enhancer.page().first_by_class(CLASS_NO_RESULTS).is_none());

        let events = enhancer.dispatch(EnhancerCommand::SearchChanged("zzz".to_owned()));
        assert_eq!(
            events,
            vec![UiEvent::FilterApplied {
                visible: 0,
                total: 3
            }]
        );
        assert_eq!(enhancer.page().all_by_class(CLASS_NO_RESULTS).len(), 1);

        let events = enhancer.dispatch(EnhancerCommand::SearchChanged(String::new()));
        assert_eq!(
            events,
            vec![UiEvent::FilterApplied {
                visible: 3,
                total: 3
            }]
        );
        assert!(enhancer.page().first_by_class(CLASS_NO_RESULTS).is_none());
        assert!(
            enhancer
                .page()
                .all_by_class(CLASS_MENU_ITEM)
                .iter()
                .all(|item| !enhancer.page().has_class(*item, CLASS_HIDDEN))
        );
    }

    #[test]
    fn mobile_menu_scenario_at_narrow_viewport() {
        let mut enhancer = Enhancer::new(sample_page(), EnhanceOptions::default());
        let events = enhancer.dispatch(EnhancerCommand::Load(LoadContext {
            viewport_width: 500,
            ..load_context()
        }));
        assert!(events.contains(&UiEvent::MobileMenuInstalled));
        assert!(
            enhancer
                .page()
                .first_by_class(CLASS_MOBILE_TOGGLE)
                .is_some()
        );

        let sidebar = enhancer.page().by_id(SIDEBAR_ID).unwrap();
        assert!(!enhancer.page().has_class(sidebar, CLASS_SHOW));

        let events = enhancer.dispatch(EnhancerCommand::ToggleMobileMenu);
        assert_eq!(events, vec![UiEvent::MobileMenuToggled { shown: true }]);
        let events = enhancer.dispatch(EnhancerCommand::ContentClicked);
        assert_eq!(events, vec![UiEvent::MobileMenuToggled { shown: false }]);
        let events = enhancer.dispatch(EnhancerCommand::ContentClicked);
        assert!(events.is_empty());
    }

    #[test]
    fn mobile_toggle_is_inert_at_wide_viewport() {
        let mut enhancer = loaded_enhancer();
        assert!(
            enhancer
                .page()
                .first_by_class(CLASS_MOBILE_TOGGLE)
                .is_none()
        );
        assert!(enhancer.dispatch(EnhancerCommand::ToggleMobileMenu).is_empty());
    }

    #[test]
    fn scroll_visibility_round_trip() {
        let mut enhancer = loaded_enhancer();

        let events = enhancer.dispatch(EnhancerCommand::Scrolled(400));
        assert_eq!(events, vec![UiEvent::ScrollTopVisibility(true)]);
        let events = enhancer.dispatch(EnhancerCommand::Scrolled(0));
        assert_eq!(events, vec![UiEvent::ScrollTopVisibility(false)]);

        enhancer.dispatch(EnhancerCommand::Scrolled(400));
        let events = enhancer.dispatch(EnhancerCommand::ScrollTopClicked);
        assert_eq!(
            events,
            vec![UiEvent::ScrolledToTop, UiEvent::ScrollTopVisibility(false)]
        );
        assert_eq!(enhancer.scroll_offset(), 0);
    }

    #[test]
    fn ripple_lifecycle_spawn_then_host_removal() {
        let mut enhancer = loaded_enhancer();
        let button = enhancer.page().first_by_class(CLASS_BTN).unwrap();

        let events = enhancer.dispatch(EnhancerCommand::ButtonPressed { button, x: 40, y: 15 });
        let [UiEvent::RippleSpawned(ripple)] = events.as_slice() else {
            panic!("expected ripple spawn, got {events:?}");
        };
        let ripple = *ripple;
        let rect = enhancer.page().node(ripple).rect.unwrap();
        assert_eq!(rect.width, 80);
        assert_eq!(rect.x, 0);

        let events = enhancer.dispatch(EnhancerCommand::RemoveRipple(ripple));
        assert_eq!(events, vec![UiEvent::RippleRemoved(ripple)]);
        assert!(enhancer.page().all_by_class(CLASS_RIPPLE).is_empty());

        // Expiry for an already-removed ripple is silent.
        assert!(enhancer.dispatch(EnhancerCommand::RemoveRipple(ripple)).is_empty());
    }

    #[test]
    fn ripple_expiry_after_reload_is_silent() {
        let mut enhancer = loaded_enhancer();
        let button = enhancer.page().first_by_class(CLASS_BTN).unwrap();
        let events = enhancer.dispatch(EnhancerCommand::ButtonPressed { button, x: 40, y: 15 });
        let [UiEvent::RippleSpawned(stale)] = events.as_slice() else {
            panic!("expected ripple spawn, got {events:?}");
        };
        let stale = *stale;

        // The page reloads before the 600ms expiry lands; the rebuilt arena
        // may be smaller than the stale id.
        enhancer.replace_page(sample_page());
        enhancer.dispatch(EnhancerCommand::Load(load_context()));

        assert!(enhancer.dispatch(EnhancerCommand::RemoveRipple(stale)).is_empty());
    }

    #[test]
    fn refresh_requests_reload_once_pressed() {
        // The sample page has no refresh button, so the command is inert.
        let mut enhancer = loaded_enhancer();
        assert!(enhancer.dispatch(EnhancerCommand::PressRefresh).is_empty());
    }

    #[test]
    fn commands_against_missing_elements_are_silent() {
        let mut enhancer = Enhancer::new(Page::new(), EnhanceOptions::default());
        enhancer.dispatch(EnhancerCommand::Load(load_context()));

        assert!(enhancer.dispatch(EnhancerCommand::ToggleSidebar).is_empty());
        assert!(
            enhancer
                .dispatch(EnhancerCommand::ToggleCategory(NodeId::new(0)))
                .is_empty()
        );
        assert!(enhancer.dispatch(EnhancerCommand::Scrolled(500)).is_empty());
        assert!(enhancer.dispatch(EnhancerCommand::ScrollTopClicked).is_empty());
        assert!(enhancer.dispatch(EnhancerCommand::ContentClicked).is_empty());
        assert!(enhancer.page().first_by_class(CLASS_SCROLL_TOP).is_none());
    }
}
