use std::io::{self, Stdout};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use postboard_core::{
    FileSlot, MessagePersistence, MessageStore, log_debug, write_text_atomic, xdg_state_dir,
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

mod app_lifecycle_mod;
mod board_actions_mod;
mod cli;
mod config_mod;
mod detail_mod;
mod input_main_mod;
mod intake_mod;
mod list_render_mod;
mod text_input_mod;
mod ui_theme_mod;

use crate::app_lifecycle_mod::AppSlot;
use crate::cli::Cli;
use crate::config_mod::{load_storage_config, load_ui_config};
use crate::detail_mod::{DetailViewer, render_detail_overlay};
use crate::intake_mod::{IntakeForm, render_intake_form};
use crate::list_render_mod::{ListRenderer, render_message_list};

const TICK_RATE: Duration = Duration::from_millis(200);
const CONFIG_FILE_NAME: &str = "postboard.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Board,
    Detail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Form,
    List,
}

struct App {
    mode: Mode,
    focus: Focus,
    store: MessageStore,
    persistence: MessagePersistence<AppSlot>,
    list: ListRenderer,
    detail: DetailViewer,
    form: IntakeForm,
    ui_theme: UiTheme,
    form_width_pct: u16,
    storage_label: String,
    status_message: Option<String>,
    status_set_at: Option<Instant>,
    show_help: bool,
    last_tick: Instant,
    last_list_area: Option<Rect>,
    last_form_area: Option<Rect>,
}

#[derive(Debug, Clone)]
struct StorageConfig {
    path: PathBuf,
    key: String,
}

#[derive(Debug, Clone)]
struct UiConfig {
    theme: String,
    form_width_pct: u16,
    preview_cols: usize,
    mouse: bool,
}

#[derive(Debug, Clone)]
struct UiTheme {
    base: Style,
    border: Style,
    border_focus: Style,
    bar: Style,
    focus_bg: Style,
    label: Style,
    label_focus: Style,
    error: Style,
    card_unread: Style,
    card_read: Style,
    button: Style,
    muted: Style,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.config.is_none() {
        if let Err(err) = ensure_default_config_exists() {
            log_debug(&format!("config bootstrap failed: {}", err));
        }
    }
    let config_text = load_config_text(cli.config.as_deref());
    let mut storage = load_storage_config(config_text.as_deref());
    let mut ui_config = load_ui_config(config_text.as_deref());
    if let Some(path) = cli.storage.as_ref() {
        storage.path = path.clone();
    }
    if let Some(key) = cli.key.as_ref() {
        storage.key = key.clone();
    }
    if let Some(theme) = cli.theme.as_deref() {
        ui_config.theme = normalize_ui_theme(theme);
    }
    if cli.no_mouse {
        ui_config.mouse = false;
    }

    let (slot, storage_label) = if cli.memory {
        (AppSlot::memory(), "memory".to_string())
    } else {
        let path = resolve_storage_path(&storage.path);
        let label = path.display().to_string();
        (AppSlot::File(FileSlot::new(path)), label)
    };
    let persistence = MessagePersistence::with_key(slot, storage.key.clone());
    let store = persistence.hydrate();
    log_debug(&format!(
        "startup storage={} key={} records={}",
        storage_label,
        storage.key,
        store.len()
    ));

    let app = App::new(store, persistence, &ui_config, storage_label);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if ui_config.mouse {
        execute!(stdout, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    disable_raw_mode()?;
    if ui_config.mouse {
        execute!(terminal.backend_mut(), DisableMouseCapture)?;
    }
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    if let Err(err) = &res {
        log_debug(&format!("exit with error: {}", err));
    }
    res
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|frame| ui(frame, &mut app))?;

        let timeout = TICK_RATE.saturating_sub(app.last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if app.on_key(key) {
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => app.on_mouse(mouse),
                _ => {}
            }
        }

        if app.last_tick.elapsed() >= TICK_RATE {
            app.last_tick = Instant::now();
            app.on_tick();
        }
    }
}

fn ui(frame: &mut ratatui::Frame, app: &mut App) {
    let area = frame.area();
    frame.render_widget(Block::default().style(app.ui_theme.base), area);
    let help_height = if app.show_help { 2 } else { 1 };
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(help_height),
        ])
        .split(area);

    render_status_bar(frame, layout[0], app);
    render_main(frame, layout[1], app);
    render_help_bar(frame, layout[2], app);

    if app.mode == Mode::Detail {
        render_detail_overlay(frame, area, &mut app.detail, &app.ui_theme);
    }
}

fn render_status_bar(frame: &mut ratatui::Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::raw(" postboard "),
        Span::raw(format!(
            " messages: {} (unread {}) ",
            app.store.len(),
            app.store.unread_count()
        )),
        Span::styled(format!(" store: {} ", app.storage_label), app.ui_theme.muted),
    ];
    if let Some(msg) = &app.status_message {
        spans.push(Span::raw(format!(" | {}", msg)));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(app.ui_theme.bar),
        area,
    );
}

fn render_main(frame: &mut ratatui::Frame, area: Rect, app: &mut App) {
    let form_pct = app.form_width_pct.clamp(20, 80);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(form_pct),
            Constraint::Percentage(100 - form_pct),
        ])
        .split(area);

    app.last_form_area = Some(columns[0]);
    app.last_list_area = Some(columns[1]);
    let form_focused = app.focus == Focus::Form && app.mode == Mode::Board;
    let list_focused = app.focus == Focus::List && app.mode == Mode::Board;
    render_intake_form(frame, columns[0], &mut app.form, &app.ui_theme, form_focused);
    render_message_list(frame, columns[1], &mut app.list, &app.ui_theme, list_focused);
}

fn render_help_bar(frame: &mut ratatui::Frame, area: Rect, app: &App) {
    let help = match (app.mode, app.focus, app.show_help) {
        (Mode::Detail, _, _) => "Esc/q/Enter close  j/k scroll",
        (Mode::Board, Focus::Form, false) => {
            "Tab/Up/Down field  Enter next  Ctrl+S send  Esc list  F1 help"
        }
        (Mode::Board, Focus::List, false) => {
            "j/k move  Enter open  r read/unread  d delete  i/Tab form  ? help  q quit"
        }
        (Mode::Board, _, true) => {
            "Form: Tab/Shift+Tab/Up/Down change field, Enter next (newline in message), Ctrl+S send, Esc to list\n\
List: j/k move, Enter or click open, r or [mark as ...] toggle read, d or [delete] delete, i/n/Tab form, q quit"
        }
    };
    frame.render_widget(Paragraph::new(help).style(app.ui_theme.bar), area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn rect_contains(rect: Rect, col: u16, row: u16) -> bool {
    col >= rect.x
        && row >= rect.y
        && col < rect.x.saturating_add(rect.width)
        && row < rect.y.saturating_add(rect.height)
}

fn bordered(title: &str, theme: &UiTheme, focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
        .style(theme.base)
        .border_style(if focused {
            theme.border_focus
        } else {
            theme.border
        })
}

fn xdg_config_dir() -> PathBuf {
    std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
        .unwrap_or_else(|| PathBuf::from("/tmp"))
}

fn config_path_candidates() -> Vec<PathBuf> {
    vec![
        PathBuf::from(CONFIG_FILE_NAME),
        xdg_config_dir().join("postboard").join(CONFIG_FILE_NAME),
    ]
}

fn load_config_text(explicit: Option<&Path>) -> Option<String> {
    if let Some(path) = explicit {
        return match std::fs::read_to_string(path) {
            Ok(content) => Some(content),
            Err(err) => {
                log_debug(&format!(
                    "config warn cannot read {}: {}",
                    path.display(),
                    err
                ));
                None
            }
        };
    }
    for path in config_path_candidates() {
        if let Ok(content) = std::fs::read_to_string(&path) {
            return Some(content);
        }
    }
    None
}

fn default_config_template() -> &'static str {
    r#"# Auto-generated by postboard on first run.

[storage]
# Relative paths live under $XDG_STATE_HOME/postboard.
path = "postboard.json"
key = "messages"

[ui]
# default | nord | gruvbox
theme = "default"
form_width_pct = 40
preview_cols = 60
mouse = true
"#
}

fn ensure_default_config_exists() -> Result<()> {
    if load_config_text(None).is_some() {
        return Ok(());
    }
    let path = xdg_config_dir().join("postboard").join(CONFIG_FILE_NAME);
    write_text_atomic(&path, default_config_template())
}

fn resolve_storage_path(raw: &Path) -> PathBuf {
    if raw.is_absolute() {
        raw.to_path_buf()
    } else {
        xdg_state_dir().join("postboard").join(raw)
    }
}

fn normalize_ui_theme(raw: &str) -> String {
    let lowered = raw.trim().to_ascii_lowercase();
    match lowered.as_str() {
        "" => "default".to_string(),
        "default" | "nord" | "gruvbox" => lowered,
        _ => {
            log_debug(&format!(
                "config warn unknown ui theme='{}', using default",
                raw
            ));
            "default".to_string()
        }
    }
}

fn style_with_colors(
    fg: Option<ratatui::style::Color>,
    bg: Option<ratatui::style::Color>,
) -> Style {
    let mut style = Style::default();
    if let Some(fg) = fg {
        style = style.fg(fg);
    }
    if let Some(bg) = bg {
        style = style.bg(bg);
    }
    style
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use ratatui::layout::Rect;

    use crate::{centered_rect, normalize_ui_theme, rect_contains, resolve_storage_path};

    #[test]
    fn theme_names_are_normalized() {
        assert_eq!(normalize_ui_theme(" Nord "), "nord");
        assert_eq!(normalize_ui_theme(""), "default");
        assert_eq!(normalize_ui_theme("solarized"), "default");
    }

    #[test]
    fn absolute_storage_path_is_kept() {
        let path = resolve_storage_path(Path::new("/var/tmp/board.json"));
        assert_eq!(path, Path::new("/var/tmp/board.json"));
        let relative = resolve_storage_path(Path::new("board.json"));
        assert!(relative.ends_with("postboard/board.json"));
    }

    #[test]
    fn rect_contains_is_half_open() {
        let rect = Rect::new(2, 3, 4, 2);
        assert!(rect_contains(rect, 2, 3));
        assert!(rect_contains(rect, 5, 4));
        assert!(!rect_contains(rect, 6, 4));
        assert!(!rect_contains(rect, 5, 5));
        assert!(!rect_contains(rect, 1, 3));
    }

    #[test]
    fn centered_rect_stays_inside() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(60, 50, area);
        assert!(popup.x >= area.x && popup.right() <= area.right());
        assert!(popup.y >= area.y && popup.bottom() <= area.bottom());
        assert_eq!(popup.width, 60);
    }
}
