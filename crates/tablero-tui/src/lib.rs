// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Terminal preview of the admin page enhancement layer. The shell plays the
//! browser's part: it rebuilds the page through the host, feeds clicks,
//! keystrokes, scrolling, and timers into the enhancer, and renders the
//! resulting tree.

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use tablero_app::enhance::sidebar_collapsed;
use tablero_app::ids::{
    ATTR_TITLE, CLASS_ACTIVE, CLASS_BTN, CLASS_BTN_ICON, CLASS_CATEGORY_HEADER, CLASS_COLLAPSED,
    CLASS_HIDDEN, CLASS_ITEM_NAME, CLASS_LOADING, CLASS_MENU_CATEGORY, CLASS_MENU_ITEM,
    CLASS_MOBILE_TOGGLE, CLASS_NO_RESULTS, CLASS_RIPPLE, CLASS_SCROLL_TOP, CLASS_SCROLL_WRAPPER,
    CLASS_SHOW, NodeId, REFRESH_TITLE, SIDEBAR_ID,
};
use tablero_app::page::{Page, Tag};
use tablero_app::state::{EnhanceOptions, Enhancer, EnhancerCommand, LoadContext, UiEvent};

// The template measures in logical pixels; the terminal measures in cells.
const CELL_WIDTH_PX: u32 = 8;
const CELL_HEIGHT_PX: u32 = 16;

const SIDEBAR_WIDTH: u16 = 26;
const SIDEBAR_WIDTH_COLLAPSED: u16 = 8;
const SCROLL_TOP_LABEL: &str = "[ ^ top ]";
const MOBILE_TOGGLE_LABEL: &str = "[=]";
const STATUS_HINT: &str = "ctrl+q quit | / search | t sidebar | r refresh | g top";

/// Seam between the preview and its surroundings: the persisted flag and the
/// server-rendered document source.
pub trait PageHost {
    fn load_sidebar_collapsed(&mut self) -> Result<Option<bool>>;
    fn store_sidebar_collapsed(&mut self, collapsed: bool) -> Result<()>;
    fn render_page(&mut self) -> Result<Page>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewEnv {
    pub current_path: String,
    pub viewport_width: Option<u32>,
    pub options: EnhanceOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
    RescanDue { token: u64 },
    RippleExpired(NodeId),
}

#[derive(Debug)]
struct View {
    status_line: Option<String>,
    status_token: u64,
    rescan_token: u64,
    search_focused: bool,
    scroll_cells: u16,
    h_scroll: u16,
    hovering_scroll_top: bool,
    loaded_at: Instant,
    area: Rect,
}

impl View {
    fn new() -> Self {
        Self {
            status_line: None,
            status_token: 0,
            rescan_token: 0,
            search_focused: false,
            scroll_cells: 0,
            h_scroll: 0,
            hovering_scroll_top: false,
            loaded_at: Instant::now(),
            area: Rect::new(0, 0, 80, 24),
        }
    }
}

pub fn run_app<H: PageHost>(host: &mut H, env: &PreviewEnv) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        terminal::EnterAlternateScreen,
        event::EnableMouseCapture
    )
    .context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view = View::new();
    let (internal_tx, internal_rx) = mpsc::channel();

    let size = terminal.size().context("query terminal size")?;
    view.area = Rect::new(0, 0, size.width, size.height);
    let viewport_width = env
        .viewport_width
        .unwrap_or(u32::from(size.width) * CELL_WIDTH_PX);

    let page = host.render_page().context("render initial page")?;
    let mut enhancer = Enhancer::new(page, env.options);
    perform_load(&mut enhancer, host, &mut view, &internal_tx, env, viewport_width)?;

    let mut result = Ok(());
    loop {
        if let Err(error) =
            process_internal_events(&mut enhancer, host, &mut view, &internal_tx, env, &internal_rx)
        {
            result = Err(error);
            break;
        }

        if let Err(error) = terminal.draw(|frame| render(frame, &enhancer, &view)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    match handle_key_event(&mut enhancer, host, &mut view, &internal_tx, env, key) {
                        Ok(true) => break,
                        Ok(false) => {}
                        Err(error) => {
                            result = Err(error);
                            break;
                        }
                    }
                }
                Event::Mouse(mouse) => {
                    if let Err(error) =
                        handle_mouse_event(&mut enhancer, host, &mut view, &internal_tx, env, mouse)
                    {
                        result = Err(error);
                        break;
                    }
                }
                // The breakpoint is evaluated once at load; resizing the
                // terminal afterwards does not install or remove the mobile
                // toggle.
                Event::Resize(width, height) => {
                    view.area = Rect::new(0, 0, width, height);
                }
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(
        io::stdout(),
        terminal::LeaveAlternateScreen,
        event::DisableMouseCapture
    )
    .context("leave alternate screen")?;
    result
}

fn perform_load<H: PageHost>(
    enhancer: &mut Enhancer,
    host: &mut H,
    view: &mut View,
    internal_tx: &Sender<InternalEvent>,
    env: &PreviewEnv,
    viewport_width: u32,
) -> Result<()> {
    let restore_collapsed = match host.load_sidebar_collapsed() {
        Ok(stored) => stored.unwrap_or(false),
        Err(error) => {
            set_status(view, internal_tx, format!("prefs load failed: {error}"));
            false
        }
    };

    let events = enhancer.dispatch(EnhancerCommand::Load(LoadContext {
        restore_collapsed,
        viewport_width,
        current_path: env.current_path.clone(),
    }));
    view.loaded_at = Instant::now();
    view.scroll_cells = 0;
    view.h_scroll = 0;
    apply_events(enhancer, host, view, internal_tx, env, events)?;

    view.rescan_token = view.rescan_token.wrapping_add(1);
    schedule_rescan(internal_tx, view.rescan_token, enhancer.options().rescan_delay);
    Ok(())
}

fn process_internal_events<H: PageHost>(
    enhancer: &mut Enhancer,
    host: &mut H,
    view: &mut View,
    tx: &Sender<InternalEvent>,
    env: &PreviewEnv,
    rx: &Receiver<InternalEvent>,
) -> Result<()> {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view.status_token => {
                view.status_line = None;
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::RescanDue { token } if token == view.rescan_token => {
                let events = enhancer.dispatch(EnhancerCommand::RescanTables);
                apply_events(enhancer, host, view, tx, env, events)?;
            }
            InternalEvent::RescanDue { .. } => {}
            InternalEvent::RippleExpired(ripple) => {
                let events = enhancer.dispatch(EnhancerCommand::RemoveRipple(ripple));
                apply_events(enhancer, host, view, tx, env, events)?;
            }
        }
    }
    Ok(())
}

fn apply_events<H: PageHost>(
    enhancer: &mut Enhancer,
    host: &mut H,
    view: &mut View,
    tx: &Sender<InternalEvent>,
    env: &PreviewEnv,
    events: Vec<UiEvent>,
) -> Result<()> {
    for event in events {
        match event {
            UiEvent::SidebarToggled { collapsed } => {
                if let Err(error) = host.store_sidebar_collapsed(collapsed) {
                    set_status(view, tx, format!("prefs write failed: {error}"));
                } else {
                    let label = if collapsed { "sidebar collapsed" } else { "sidebar expanded" };
                    set_status(view, tx, label);
                }
            }
            UiEvent::ReloadRequested => {
                let page = host.render_page().context("render page for reload")?;
                enhancer.replace_page(page);
                let viewport_width = env
                    .viewport_width
                    .unwrap_or(u32::from(view.area.width) * CELL_WIDTH_PX);
                perform_load(enhancer, host, view, tx, env, viewport_width)?;
                set_status(view, tx, "page reloaded");
            }
            UiEvent::RippleSpawned(ripple) => {
                schedule_ripple_expiry(tx, ripple, enhancer.options().ripple_lifetime);
            }
            UiEvent::TablesWrapped(count) if count > 0 => {
                set_status(view, tx, format!("{count} tables wrapped"));
            }
            UiEvent::FilterApplied { visible, total } => {
                set_status(view, tx, format!("{visible} of {total} tables shown"));
            }
            UiEvent::ScrolledToTop => {
                view.scroll_cells = 0;
            }
            UiEvent::StatusUpdated(message) => {
                set_status(view, tx, message);
            }
            _ => {}
        }
    }
    Ok(())
}

fn schedule_rescan(internal_tx: &Sender<InternalEvent>, token: u64, delay: Duration) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(delay);
        let _ = sender.send(InternalEvent::RescanDue { token });
    });
}

fn schedule_ripple_expiry(internal_tx: &Sender<InternalEvent>, ripple: NodeId, lifetime: Duration) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(lifetime);
        let _ = sender.send(InternalEvent::RippleExpired(ripple));
    });
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(4));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn set_status(view: &mut View, internal_tx: &Sender<InternalEvent>, message: impl Into<String>) {
    view.status_line = Some(message.into());
    view.status_token = view.status_token.wrapping_add(1);
    schedule_status_clear(internal_tx, view.status_token);
}

fn handle_key_event<H: PageHost>(
    enhancer: &mut Enhancer,
    host: &mut H,
    view: &mut View,
    tx: &Sender<InternalEvent>,
    env: &PreviewEnv,
    key: KeyEvent,
) -> Result<bool> {
    match key_action(key, view.search_focused, enhancer.query()) {
        KeyAction::Quit => return Ok(true),
        KeyAction::FocusSearch => view.search_focused = true,
        KeyAction::BlurSearch => view.search_focused = false,
        KeyAction::ScrollBy(delta) => {
            scroll_by(enhancer, host, view, tx, env, delta)?;
        }
        KeyAction::HScrollBy(delta) => {
            let next = i32::from(view.h_scroll).saturating_add(delta).max(0);
            view.h_scroll = u16::try_from(next).unwrap_or(u16::MAX);
        }
        KeyAction::Command(command) => {
            if matches!(command, EnhancerCommand::ScrollTopClicked) {
                view.scroll_cells = 0;
            }
            let events = enhancer.dispatch(command);
            apply_events(enhancer, host, view, tx, env, events)?;
        }
        KeyAction::None => {}
    }
    Ok(false)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum KeyAction {
    Quit,
    FocusSearch,
    BlurSearch,
    ScrollBy(i32),
    HScrollBy(i32),
    Command(EnhancerCommand),
    None,
}

fn key_action(key: KeyEvent, search_focused: bool, query: &str) -> KeyAction {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return KeyAction::Quit;
    }

    if search_focused {
        return match key.code {
            KeyCode::Esc | KeyCode::Enter => KeyAction::BlurSearch,
            KeyCode::Backspace => {
                let mut next = query.to_owned();
                next.pop();
                KeyAction::Command(EnhancerCommand::SearchChanged(next))
            }
            KeyCode::Char(ch) => {
                let mut next = query.to_owned();
                next.push(ch);
                KeyAction::Command(EnhancerCommand::SearchChanged(next))
            }
            _ => KeyAction::None,
        };
    }

    match key.code {
        KeyCode::Char('/') => KeyAction::FocusSearch,
        KeyCode::Char('t') => KeyAction::Command(EnhancerCommand::ToggleSidebar),
        KeyCode::Char('r') => KeyAction::Command(EnhancerCommand::PressRefresh),
        KeyCode::Char('m') => KeyAction::Command(EnhancerCommand::ToggleMobileMenu),
        KeyCode::Char('g') => KeyAction::Command(EnhancerCommand::ScrollTopClicked),
        KeyCode::Up => KeyAction::ScrollBy(-1),
        KeyCode::Down => KeyAction::ScrollBy(1),
        KeyCode::PageUp => KeyAction::ScrollBy(-10),
        KeyCode::PageDown => KeyAction::ScrollBy(10),
        KeyCode::Left => KeyAction::HScrollBy(-2),
        KeyCode::Right => KeyAction::HScrollBy(2),
        _ => KeyAction::None,
    }
}

fn scroll_by<H: PageHost>(
    enhancer: &mut Enhancer,
    host: &mut H,
    view: &mut View,
    tx: &Sender<InternalEvent>,
    env: &PreviewEnv,
    delta: i32,
) -> Result<()> {
    let next = i32::from(view.scroll_cells).saturating_add(delta).max(0);
    view.scroll_cells = u16::try_from(next).unwrap_or(u16::MAX);
    let offset_px = u32::from(view.scroll_cells) * CELL_HEIGHT_PX;
    let events = enhancer.dispatch(EnhancerCommand::Scrolled(offset_px));
    apply_events(enhancer, host, view, tx, env, events)
}

fn handle_mouse_event<H: PageHost>(
    enhancer: &mut Enhancer,
    host: &mut H,
    view: &mut View,
    tx: &Sender<InternalEvent>,
    env: &PreviewEnv,
    mouse: MouseEvent,
) -> Result<()> {
    match mouse.kind {
        MouseEventKind::ScrollDown => return scroll_by(enhancer, host, view, tx, env, 1),
        MouseEventKind::ScrollUp => return scroll_by(enhancer, host, view, tx, env, -1),
        MouseEventKind::Moved => {
            let over = matches!(
                hit_test(enhancer, view, mouse.column, mouse.row),
                Some(HitTarget::ScrollTop)
            );
            if over != view.hovering_scroll_top {
                view.hovering_scroll_top = over;
                let events = enhancer.dispatch(EnhancerCommand::ScrollTopHover(over));
                apply_events(enhancer, host, view, tx, env, events)?;
            }
            return Ok(());
        }
        MouseEventKind::Down(_) => {}
        _ => return Ok(()),
    }

    let Some(target) = hit_test(enhancer, view, mouse.column, mouse.row) else {
        return Ok(());
    };
    let command = match target {
        HitTarget::ToggleSidebar => EnhancerCommand::ToggleSidebar,
        HitTarget::Search => {
            view.search_focused = true;
            return Ok(());
        }
        HitTarget::Category(header) => EnhancerCommand::ToggleCategory(header),
        HitTarget::Item(item) => {
            let label = item_label(enhancer.page(), item);
            set_status(view, tx, format!("navigate {label}"));
            return Ok(());
        }
        HitTarget::Refresh => EnhancerCommand::PressRefresh,
        HitTarget::ActionButton { button, span_start } => {
            let (x, y) = click_point(enhancer.page(), button, mouse.column, span_start);
            EnhancerCommand::ButtonPressed { button, x, y }
        }
        HitTarget::ScrollTop => {
            view.scroll_cells = 0;
            EnhancerCommand::ScrollTopClicked
        }
        HitTarget::MobileToggle => EnhancerCommand::ToggleMobileMenu,
        HitTarget::Content => EnhancerCommand::ContentClicked,
    };

    let events = enhancer.dispatch(command);
    apply_events(enhancer, host, view, tx, env, events)
}

/// Maps a click column inside a rendered button span back to logical pixel
/// coordinates within the button's layout rect.
fn click_point(page: &Page, button: NodeId, column: u16, span_start: u16) -> (i32, i32) {
    let Some(rect) = page.node(button).rect else {
        return (0, 0);
    };
    let rel_cells = u32::from(column.saturating_sub(span_start));
    let x = (rel_cells * CELL_WIDTH_PX + CELL_WIDTH_PX / 2).min(rect.width.saturating_sub(1));
    let y = rect.height / 2;
    (x as i32, y as i32)
}

fn item_label(page: &Page, item: NodeId) -> String {
    page.descendant_by_class(item, CLASS_ITEM_NAME)
        .map(|label| page.node(label).text.clone())
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HitTarget {
    ToggleSidebar,
    Search,
    Category(NodeId),
    Item(NodeId),
    Refresh,
    ActionButton { button: NodeId, span_start: u16 },
    ScrollTop,
    MobileToggle,
    Content,
}

#[derive(Debug, Clone)]
struct SidebarLine {
    text: String,
    style: Style,
    target: Option<HitTarget>,
}

fn sidebar_lines(enhancer: &Enhancer) -> Vec<SidebarLine> {
    let page = enhancer.page();
    let mut lines = Vec::new();
    let Some(sidebar) = page.by_id(SIDEBAR_ID) else {
        return lines;
    };
    let collapsed = sidebar_collapsed(page);

    lines.push(SidebarLine {
        text: if collapsed { "[>]".to_owned() } else { "[<] tablero".to_owned() },
        style: Style::default().add_modifier(Modifier::BOLD),
        target: Some(HitTarget::ToggleSidebar),
    });
    if !collapsed {
        lines.push(SidebarLine {
            text: format!("search: {}", enhancer.query()),
            style: Style::default(),
            target: Some(HitTarget::Search),
        });
    }

    for category in page.all_by_class(CLASS_MENU_CATEGORY) {
        let Some(header) = page.descendant_by_class(category, CLASS_CATEGORY_HEADER) else {
            continue;
        };
        let category_collapsed = page.has_class(category, CLASS_COLLAPSED);
        let mark = if category_collapsed { ">" } else { "v" };
        let label = if collapsed {
            mark.to_owned()
        } else {
            format!("{mark} {}", page.node(header).text)
        };
        lines.push(SidebarLine {
            text: label,
            style: Style::default().fg(Color::Cyan),
            target: Some(HitTarget::Category(header)),
        });
        if category_collapsed {
            continue;
        }

        for item in page.all_by_class(CLASS_MENU_ITEM) {
            if page.closest_with_class(item, CLASS_MENU_CATEGORY) != Some(category) {
                continue;
            }
            if page.has_class(item, CLASS_HIDDEN) {
                continue;
            }
            let label = item_label(page, item);
            let text = if collapsed {
                label.chars().next().map(|ch| ch.to_string()).unwrap_or_default()
            } else {
                format!("  {label}")
            };
            let style = if page.has_class(item, CLASS_ACTIVE) {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            lines.push(SidebarLine {
                text,
                style,
                target: Some(HitTarget::Item(item)),
            });
        }
    }

    for message in page.all_by_class(CLASS_NO_RESULTS) {
        lines.push(SidebarLine {
            text: page.node(message).text.clone(),
            style: Style::default().fg(Color::DarkGray),
            target: None,
        });
    }

    lines
}

/// Header segments of the content pane: the refresh control and every action
/// button, with the column span each occupies.
fn content_header(page: &Page) -> (String, Vec<(u16, u16, HitTarget)>) {
    let mut text = String::new();
    let mut spans = Vec::new();

    let refresh = page
        .all_by_class(CLASS_BTN_ICON)
        .into_iter()
        .find(|button| page.attr(*button, ATTR_TITLE) == Some(REFRESH_TITLE));
    if let Some(refresh) = refresh {
        let label = if page.has_class(refresh, CLASS_LOADING) {
            "[~ Refresh]"
        } else {
            "[@ Refresh]"
        };
        spans.push((0, label.len() as u16, HitTarget::Refresh));
        text.push_str(label);
    }

    for button in page.all_by_class(CLASS_BTN) {
        if !text.is_empty() {
            text.push_str("  ");
        }
        let start = text.len() as u16;
        let rippling = page
            .children(button)
            .iter()
            .any(|child| page.has_class(*child, CLASS_RIPPLE));
        let label = if rippling {
            format!("[*{}*]", page.node(button).text)
        } else {
            format!("[ {} ]", page.node(button).text)
        };
        spans.push((
            start,
            label.len() as u16,
            HitTarget::ActionButton { button, span_start: start },
        ));
        text.push_str(&label);
    }

    (text, spans)
}

fn sidebar_width(enhancer: &Enhancer) -> u16 {
    let page = enhancer.page();
    let Some(sidebar) = page.by_id(SIDEBAR_ID) else {
        return 0;
    };
    let mobile = page.first_by_class(CLASS_MOBILE_TOGGLE).is_some();
    if mobile && !page.has_class(sidebar, CLASS_SHOW) {
        return 0;
    }
    if page.has_class(sidebar, CLASS_COLLAPSED) {
        SIDEBAR_WIDTH_COLLAPSED
    } else {
        SIDEBAR_WIDTH
    }
}

fn body_area(view: &View) -> Rect {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(view.area);
    layout[1]
}

fn scroll_top_rect(enhancer: &Enhancer, view: &View) -> Option<Rect> {
    let page = enhancer.page();
    let button = page.first_by_class(CLASS_SCROLL_TOP)?;
    if page.has_class(button, CLASS_HIDDEN) {
        return None;
    }
    let body = body_area(view);
    let width = SCROLL_TOP_LABEL.len() as u16;
    if body.width < width + 2 || body.height < 2 {
        return None;
    }
    Some(Rect::new(
        body.x + body.width - width - 1,
        body.y + body.height - 2,
        width,
        1,
    ))
}

fn mobile_toggle_rect(enhancer: &Enhancer, view: &View) -> Option<Rect> {
    enhancer.page().first_by_class(CLASS_MOBILE_TOGGLE)?;
    let body = body_area(view);
    Some(Rect::new(body.x, body.y, MOBILE_TOGGLE_LABEL.len() as u16, 1))
}

fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x + rect.width
        && row >= rect.y
        && row < rect.y + rect.height
}

fn hit_test(enhancer: &Enhancer, view: &View, column: u16, row: u16) -> Option<HitTarget> {
    // Floating controls sit on top of everything else.
    if let Some(rect) = scroll_top_rect(enhancer, view)
        && contains(rect, column, row)
    {
        return Some(HitTarget::ScrollTop);
    }
    if let Some(rect) = mobile_toggle_rect(enhancer, view)
        && contains(rect, column, row)
    {
        return Some(HitTarget::MobileToggle);
    }

    let body = body_area(view);
    if !contains(body, column, row) {
        return None;
    }

    let split = sidebar_width(enhancer);
    if column < body.x + split {
        // Inside the sidebar block: first border row and column offset by 1.
        let line = usize::from(row.checked_sub(body.y + 1)?);
        return sidebar_lines(enhancer).get(line).and_then(|l| l.target);
    }

    let content_x = body.x + split;
    let (_, spans) = content_header(enhancer.page());
    // Content header is the first row inside the content border.
    if row == body.y + 1 {
        let rel = column.checked_sub(content_x + 1)?;
        for (start, len, target) in spans {
            if rel >= start && rel < start + len {
                return Some(match target {
                    HitTarget::ActionButton { button, span_start } => HitTarget::ActionButton {
                        button,
                        span_start: span_start + content_x + 1,
                    },
                    other => other,
                });
            }
        }
    }
    Some(HitTarget::Content)
}

fn content_lines(enhancer: &Enhancer, view: &View) -> Vec<Line<'static>> {
    let page = enhancer.page();
    let mut lines = Vec::new();

    let (header, _) = content_header(page);
    lines.push(Line::styled(
        header,
        Style::default().add_modifier(Modifier::BOLD),
    ));
    lines.push(Line::raw(String::new()));

    let elapsed_ms = view.loaded_at.elapsed().as_millis() as u64;
    for table in page.all_by_tag(Tag::Table) {
        let title = page.attr(table, ATTR_TITLE).unwrap_or("table").to_owned();
        let wrapped = page
            .parent(table)
            .is_some_and(|parent| page.has_class(parent, CLASS_SCROLL_WRAPPER));
        let marker = if wrapped { "<->" } else { "   " };
        lines.push(Line::styled(
            format!("{marker} {title}"),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));

        for row in page.all_by_tag(Tag::TableRow) {
            if !is_within(page, row, table) {
                continue;
            }
            let text = clipped(&page.node(row).text, view.h_scroll);
            match page.node(row).animation {
                Some(animation) if elapsed_ms < animation.delay_ms => {
                    // Not yet started; the stagger reveals it on a later frame.
                    lines.push(Line::raw(String::new()));
                }
                Some(animation) if elapsed_ms < animation.delay_ms + animation.duration_ms => {
                    lines.push(Line::styled(text, Style::default().fg(Color::DarkGray)));
                }
                _ => lines.push(Line::raw(text)),
            }
        }
        lines.push(Line::raw(String::new()));
    }

    lines
}

fn clipped(text: &str, h_scroll: u16) -> String {
    text.chars().skip(usize::from(h_scroll)).collect()
}

fn is_within(page: &Page, node: NodeId, ancestor: NodeId) -> bool {
    let mut cursor = Some(node);
    while let Some(current) = cursor {
        if current == ancestor {
            return true;
        }
        cursor = page.parent(current);
    }
    false
}

fn render(frame: &mut ratatui::Frame<'_>, enhancer: &Enhancer, view: &View) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.area());

    let title = Paragraph::new("admin preview")
        .block(Block::default().title("tablero").borders(Borders::ALL));
    frame.render_widget(title, layout[0]);

    let split = sidebar_width(enhancer);
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(split), Constraint::Min(1)])
        .split(layout[1]);

    if split > 0 {
        let lines: Vec<Line<'static>> = sidebar_lines(enhancer)
            .into_iter()
            .map(|line| Line::styled(line.text, line.style))
            .collect();
        let sidebar = Paragraph::new(lines)
            .block(Block::default().title("menu").borders(Borders::ALL));
        frame.render_widget(sidebar, body[0]);
    }

    let content = Paragraph::new(content_lines(enhancer, view))
        .scroll((view.scroll_cells, 0))
        .block(Block::default().title("content").borders(Borders::ALL));
    frame.render_widget(content, body[1]);

    let status = view
        .status_line
        .clone()
        .unwrap_or_else(|| STATUS_HINT.to_owned());
    let status_widget = Paragraph::new(status)
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, layout[2]);

    if let Some(rect) = mobile_toggle_rect(enhancer, view) {
        frame.render_widget(Clear, rect);
        let toggle = Paragraph::new(MOBILE_TOGGLE_LABEL)
            .style(Style::default().fg(Color::Black).bg(Color::Cyan));
        frame.render_widget(toggle, rect);
    }

    if let Some(rect) = scroll_top_rect(enhancer, view) {
        frame.render_widget(Clear, rect);
        let style = if view.hovering_scroll_top {
            Style::default().fg(Color::Black).bg(Color::White)
        } else {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        };
        frame.render_widget(Paragraph::new(SCROLL_TOP_LABEL).style(style), rect);
    }
}
