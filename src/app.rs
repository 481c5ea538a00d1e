use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use peoplelink::host::{ResourceCreator, RosterEvent, RosterEventKind};
use peoplelink::model::buffer::Buffer;
use peoplelink::model::config::AppConfig;
use peoplelink::model::mode::Mode;
use peoplelink::suggest::{
    CreationEvent, Diagnostic, Modifiers, PeopleSuggest, Selection, Suggestion, spawn_creation,
};
use peoplelink::vault::{VaultCreator, VaultRoster};

use crate::msg::Msg;
use crate::workspace::{Workspace, same_file_path};

const MAX_NOTIFICATIONS: usize = 8;

/// Suggestion popup state for the active trigger session.
#[derive(Default)]
struct SuggestPopup {
    items: Vec<Suggestion>,
    selected: usize,
}

impl SuggestPopup {
    fn is_open(&self) -> bool {
        !self.items.is_empty()
    }

    fn set(&mut self, items: Vec<Suggestion>) {
        self.items = items;
        self.selected = self.selected.min(self.items.len().saturating_sub(1));
    }

    fn close(&mut self) {
        self.items.clear();
        self.selected = 0;
    }

    fn step(&mut self, delta: isize) {
        if self.items.is_empty() {
            return;
        }
        let len = self.items.len() as isize;
        self.selected = (self.selected as isize + delta).rem_euclid(len) as usize;
    }

    fn current(&self) -> Option<&Suggestion> {
        self.items.get(self.selected)
    }
}

pub struct App {
    pub mode: Mode,
    workspace: Workspace,
    pub config: AppConfig,
    people: PeopleSuggest,
    roster: Arc<VaultRoster>,
    creator: Arc<dyn ResourceCreator>,
    popup: SuggestPopup,
    diagnostic: Option<Diagnostic>,
    command_input: String,
    pub should_quit: bool,
    event_tx: mpsc::Sender<Msg>,
    notifications: VecDeque<String>,
    last_saved_file: Option<(PathBuf, Instant)>,
}

impl App {
    pub fn new(config: AppConfig, event_tx: mpsc::Sender<Msg>) -> Result<Self> {
        let vault_path = config.vault_path();
        std::fs::create_dir_all(&vault_path)?;

        let scratch_path = config.scratch_path();

        let buffer = if scratch_path.exists() {
            Buffer::from_file(scratch_path)?
        } else {
            if let Some(parent) = scratch_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let mut buf = Buffer::new();
            buf.path = Some(scratch_path);
            buf
        };

        let roster = Arc::new(VaultRoster::new(&vault_path));
        let creator: Arc<dyn ResourceCreator> = Arc::new(VaultCreator::new(&vault_path));
        let people = PeopleSuggest::with_defaults(config.people.clone(), roster.clone());

        Ok(Self {
            mode: Mode::Normal,
            workspace: Workspace::new(buffer, config.editor.scroll_off),
            config,
            people,
            roster,
            creator,
            popup: SuggestPopup::default(),
            diagnostic: None,
            command_input: String::new(),
            should_quit: false,
            event_tx,
            notifications: VecDeque::new(),
            last_saved_file: None,
        })
    }

    // ── MVU: Update ──────────────────────────────────────────────

    pub fn update(&mut self, msg: Msg) -> Result<()> {
        match msg {
            Msg::Key(key) => self.handle_key(key)?,
            Msg::SaveAllBuffers => self.save_all_buffers(),
            Msg::FileChanged(path) => self.handle_file_changed(path),
            Msg::Roster(event) => self.handle_roster_event(event),
            Msg::Creation(event) => self.handle_creation_event(event),
            Msg::Tick => self.handle_tick(),
            Msg::Resize(_w, h) => {
                self.workspace.buffer.viewport.height = h.saturating_sub(2); // tab + status bar
            }
        }
        Ok(())
    }

    fn push_notification(&mut self, message: String) {
        self.notifications.push_back(message);
        while self.notifications.len() > MAX_NOTIFICATIONS {
            self.notifications.pop_front();
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.mode {
            Mode::Normal => self.handle_key_normal(key),
            Mode::Insert => self.handle_key_insert(key),
            Mode::Command => self.handle_key_command(key),
            Mode::Diagnostic => {
                self.handle_key_diagnostic(key);
                Ok(())
            }
        }
    }

    fn handle_key_normal(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('q') => {
                self.save_all_buffers();
                self.should_quit = true;
            }
            KeyCode::Char('i') => self.mode = Mode::Insert,
            KeyCode::Char(':') => {
                self.mode = Mode::Command;
                self.command_input.clear();
            }
            KeyCode::Char('n') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.workspace.switch_tab_relative(1)?;
            }
            KeyCode::Char('p') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.workspace.switch_tab_relative(-1)?;
            }
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.save_buffer();
            }
            KeyCode::Char('h') | KeyCode::Left => self.workspace.buffer.move_left(),
            KeyCode::Char('j') | KeyCode::Down => self.workspace.buffer.move_vertical(1),
            KeyCode::Char('k') | KeyCode::Up => self.workspace.buffer.move_vertical(-1),
            KeyCode::Char('l') | KeyCode::Right => self.workspace.buffer.move_right(),
            _ => {}
        }
        self.workspace.buffer.scroll_to_cursor();
        Ok(())
    }

    fn handle_key_command(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                self.command_input.clear();
            }
            KeyCode::Enter => {
                let command = self.command_input.trim().to_string();
                self.mode = Mode::Normal;
                self.command_input.clear();

                if !command.is_empty() {
                    self.run_command(&command)?;
                }
            }
            KeyCode::Backspace => {
                self.command_input.pop();
            }
            KeyCode::Char(ch)
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT =>
            {
                self.command_input.push(ch);
            }
            _ => {}
        }

        Ok(())
    }

    fn handle_key_insert(&mut self, key: KeyEvent) -> Result<()> {
        if self.popup.is_open() && self.handle_key_popup(key) {
            return Ok(());
        }

        let buffer = &mut self.workspace.buffer;
        let edited = match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                self.people.cancel();
                self.popup.close();
                return Ok(());
            }
            KeyCode::Enter => {
                buffer.insert_newline();
                true
            }
            KeyCode::Backspace => {
                buffer.delete_char_before();
                true
            }
            KeyCode::Char(ch) => {
                buffer.insert_char(ch);
                true
            }
            KeyCode::Left => {
                buffer.move_left();
                false
            }
            KeyCode::Right => {
                buffer.move_right();
                false
            }
            KeyCode::Up => {
                buffer.move_vertical(-1);
                false
            }
            KeyCode::Down => {
                buffer.move_vertical(1);
                false
            }
            _ => return Ok(()),
        };
        self.workspace.buffer.scroll_to_cursor();

        if edited {
            self.schedule_auto_save();
        }
        self.refresh_suggestions();
        Ok(())
    }

    /// Keys the suggestion popup consumes. Returns false to fall through to
    /// normal editing.
    fn handle_key_popup(&mut self, key: KeyEvent) -> bool {
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Up => self.popup.step(-1),
            KeyCode::Down => self.popup.step(1),
            KeyCode::Char('p') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.popup.step(-1)
            }
            KeyCode::Char('n') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.popup.step(1)
            }
            KeyCode::Enter | KeyCode::Tab => self.accept_suggestion(Modifiers { raw: shift }),
            KeyCode::BackTab => self.accept_suggestion(Modifiers::RAW),
            KeyCode::Esc => {
                self.people.cancel();
                self.popup.close();
            }
            _ => return false,
        }
        true
    }

    fn handle_key_diagnostic(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
            self.diagnostic = None;
            self.mode = Mode::Insert;
        }
    }

    // ── People suggestions ───────────────────────────────────────

    fn refresh_suggestions(&mut self) {
        if self.people.on_text_changed(&self.workspace.buffer).is_some() {
            let items = self.people.suggestions();
            self.popup.set(items);
        } else {
            self.popup.close();
        }
    }

    fn accept_suggestion(&mut self, modifiers: Modifiers) {
        let Some(suggestion) = self.popup.current().cloned() else {
            return;
        };

        match self
            .people
            .select(&suggestion, modifiers, &mut self.workspace.buffer)
        {
            Selection::Ignored => {}
            Selection::ShowDiagnostic(diagnostic) => {
                self.diagnostic = Some(diagnostic);
                self.mode = Mode::Diagnostic;
            }
            Selection::Inserted(request) => {
                self.workspace.buffer.scroll_to_cursor();
                self.schedule_auto_save();
                if let Some(request) = request {
                    let tx = self.event_tx.clone();
                    spawn_creation(self.creator.clone(), request, move |event| {
                        let _ = tx.send(Msg::Creation(event));
                    });
                }
            }
        }
        self.popup.close();
    }

    fn handle_creation_event(&mut self, event: CreationEvent) {
        let created = match &event {
            CreationEvent::Created { resource, .. } => Some(resource.stem()),
            CreationEvent::Failed { .. } => None,
        };

        match self.people.on_creation_event(event, &mut self.workspace) {
            Some(notice) => self.push_notification(notice),
            None => {
                if let Some(name) = created {
                    self.push_notification(format!("Created {name}"));
                }
            }
        }
    }

    fn handle_roster_event(&mut self, event: RosterEvent) {
        match event.kind {
            RosterEventKind::Delete => self.workspace.forget(&event.resource.path),
            RosterEventKind::Rename => {
                if let Some(old) = &event.old_path {
                    self.workspace.forget(old);
                }
            }
            RosterEventKind::Update => {}
        }
        self.roster.dispatch(&event);
    }

    // ── Commands ─────────────────────────────────────────────────

    fn run_command(&mut self, command: &str) -> Result<()> {
        let mut parts = command.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or_default();
        let rest = parts.next().unwrap_or_default().trim();

        match name {
            "w" => self.save_buffer(),
            "q" => {
                self.save_all_buffers();
                self.should_quit = true;
            }
            "wq" | "x" => {
                self.save_all_buffers();
                self.should_quit = true;
            }
            "e" | "edit" if !rest.is_empty() => {
                let path = self.config.vault_path().join(rest);
                if let Err(err) = self.workspace.activate_tab(path) {
                    self.push_notification(format!("Cannot open {rest}: {err}"));
                }
            }
            "set" => self.run_set(rest),
            _ => self.push_notification(format!("Unknown command: {command}")),
        }
        Ok(())
    }

    fn run_set(&mut self, args: &str) {
        let Some((key, value)) = args.split_once(char::is_whitespace) else {
            let settings = self.people.settings();
            self.push_notification(format!(
                "people: prefix={} source={:?} limit={} create={} location={:?}",
                settings.trigger_prefix,
                settings.entity_source,
                settings.suggestions_limit,
                settings.create_if_not_exists,
                settings.new_person_location,
            ));
            return;
        };

        let mut settings = self.people.settings().clone();
        match settings.set(key, value.trim()) {
            Ok(()) => {
                tracing::info!("set {key} = {}", value.trim());
                self.config.people = settings.clone();
                self.people.update_settings(settings);
                self.popup.close();
            }
            Err(err) => self.push_notification(err.to_string()),
        }
    }

    // ── Saving ───────────────────────────────────────────────────

    fn schedule_auto_save(&mut self) {
        let debounce_ms = self.config.general.auto_save_debounce_ms;
        self.workspace.buffer.save_debounce =
            Some(Instant::now() + Duration::from_millis(debounce_ms));
    }

    fn handle_tick(&mut self) {
        let now = Instant::now();

        if let Some(deadline) = self.workspace.buffer.save_debounce
            && now >= deadline
        {
            self.save_buffer();
        }

        // Notes pushed aside by a tab switch or a new person view keep
        // their deadlines.
        for path in self.workspace.inactive_to_save(Some(now)) {
            self.save_inactive_buffer(&path);
        }
    }

    fn save_buffer(&mut self) {
        let buffer = &mut self.workspace.buffer;
        let Some(path) = buffer.path.clone() else {
            return;
        };

        buffer.save_debounce = None;
        buffer.dirty = false;
        self.last_saved_file = Some((path.clone(), Instant::now()));
        spawn_buffer_save(path, buffer.rope.clone());
    }

    fn save_all_buffers(&mut self) {
        if self.workspace.buffer.dirty || self.workspace.buffer.save_debounce.is_some() {
            self.save_buffer();
        }

        for path in self.workspace.inactive_to_save(None) {
            self.save_inactive_buffer(&path);
        }
    }

    fn save_inactive_buffer(&mut self, path: &Path) {
        let Some(buffer) = self.workspace.inactive_mut(path) else {
            return;
        };

        buffer.save_debounce = None;
        buffer.dirty = false;
        spawn_buffer_save(path.to_path_buf(), buffer.rope.clone());
    }

    fn handle_file_changed(&mut self, path: PathBuf) {
        if !self.should_reload_active(&path) {
            return;
        }

        let buffer = &self.workspace.buffer;
        let old_cursor = buffer.cursor.clone();
        let old_viewport = buffer.viewport.clone();

        if let Ok(mut reloaded) = Buffer::from_file(path) {
            reloaded.cursor = old_cursor;
            reloaded.viewport = old_viewport;
            reloaded.clamp_cursor();
            reloaded.scroll_to_cursor();
            self.workspace.buffer = reloaded;
            self.people.cancel();
            self.popup.close();
        }
    }

    fn should_reload_active(&self, path: &PathBuf) -> bool {
        let buffer = &self.workspace.buffer;
        let Some(active) = buffer.path.as_ref() else {
            return false;
        };

        if !same_file_path(active, path) || buffer.dirty || !path.exists() {
            return false;
        }

        if let Some((saved_path, saved_at)) = &self.last_saved_file {
            let recently_saved =
                Instant::now().duration_since(*saved_at) <= Duration::from_millis(1200);
            if recently_saved && same_file_path(saved_path, path) {
                return false;
            }
        }

        true
    }

    // ── MVU: View ────────────────────────────────────────────────

    pub fn view(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // tab bar
                Constraint::Min(1),    // body
                Constraint::Length(1), // status bar
            ])
            .split(frame.area());

        self.render_tab_bar(frame, chunks[0]);

        let editor_area = match self.workspace.split_buffer() {
            Some(split) => {
                let body = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                    .split(chunks[1]);
                render_split(frame, body[0], split);
                self.render_editor(frame, body[1]);
                body[1]
            }
            None => {
                self.render_editor(frame, chunks[1]);
                chunks[1]
            }
        };

        let buffer = &self.workspace.buffer;
        let line = buffer.line_text(buffer.cursor.row).unwrap_or_default();
        let col = buffer.cursor.col.min(line.len());
        let cursor_x = line.get(..col).map_or(col, |s| s.chars().count()) as u16 + editor_area.x;
        let cursor_y =
            buffer.cursor.row.saturating_sub(buffer.viewport.top_line) as u16 + editor_area.y;
        let cursor_visible = cursor_y < editor_area.y + editor_area.height;

        self.render_status_bar(frame, chunks[2]);

        match self.mode {
            Mode::Command => self.render_command_overlay(frame),
            Mode::Diagnostic => self.render_diagnostic_overlay(frame),
            _ => {
                if cursor_visible {
                    frame.set_cursor_position((cursor_x, cursor_y));
                    if self.popup.is_open() {
                        self.render_popup(frame, editor_area, cursor_x, cursor_y);
                    }
                }
            }
        }
    }

    fn render_editor(&self, frame: &mut Frame, area: Rect) {
        let buffer = &self.workspace.buffer;
        let top = buffer.viewport.top_line;
        let bottom = (top + area.height as usize).min(buffer.line_count());

        let lines: Vec<Line> = (top..bottom)
            .map(|i| Line::from(buffer.line_text(i).unwrap_or_default()))
            .collect();
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_popup(&self, frame: &mut Frame, editor: Rect, cursor_x: u16, cursor_y: u16) {
        let create = self.people.settings().create_if_not_exists;
        let rows: Vec<Line> = self
            .popup
            .items
            .iter()
            .enumerate()
            .map(|(i, suggestion)| {
                let (text, base) = match suggestion {
                    Suggestion::Existing(record) => {
                        (format!(" {} ", record.label), Style::default().fg(Color::White))
                    }
                    Suggestion::NewEntity { label } => {
                        let hint = if create { "create" } else { "insert" };
                        (
                            format!(" + {label} ({hint}) "),
                            Style::default().fg(Color::Green),
                        )
                    }
                    Suggestion::Diagnostic(diagnostic) => (
                        format!(" ! {} ", diagnostic.summary),
                        Style::default().fg(Color::Red),
                    ),
                };
                let style = if i == self.popup.selected {
                    base.bg(Color::Rgb(40, 40, 70)).add_modifier(Modifier::BOLD)
                } else {
                    base
                };
                Line::from(Span::styled(text, style))
            })
            .collect();

        let width = rows
            .iter()
            .map(|row| row.width() as u16)
            .max()
            .unwrap_or(0)
            .saturating_add(2)
            .min(editor.width);
        let height = (rows.len() as u16 + 2).min(editor.height);

        let below = cursor_y + 1;
        let y = if below + height <= editor.y + editor.height {
            below
        } else {
            cursor_y.saturating_sub(height).max(editor.y)
        };
        let x = cursor_x.min((editor.x + editor.width).saturating_sub(width));
        let area = Rect::new(x, y, width, height);

        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(rows).block(
                Block::default()
                    .borders(Borders::ALL)
                    .style(Style::default().bg(Color::Rgb(15, 15, 24))),
            ),
            area,
        );
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let mode_style = match self.mode {
            Mode::Normal => Style::default()
                .fg(Color::Black)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            Mode::Insert => Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            Mode::Diagnostic => Style::default()
                .fg(Color::Black)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
            Mode::Command => Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        };

        let mode_span = Span::styled(format!(" {} ", self.mode.label()), mode_style);

        let buffer = &self.workspace.buffer;
        let file_name = buffer
            .path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "[scratch]".to_string());

        let dirty_marker = if buffer.dirty { " [+]" } else { "" };

        let mut suffix = String::new();
        if let Some(session) = self.people.session() {
            let prefix = &self.people.settings().trigger_prefix;
            suffix.push_str(&format!(" | {prefix}{}", session.query));
        }
        let pending = self.workspace.pending_write_count();
        if pending > 0 {
            suffix.push_str(&format!(" | {pending} pending"));
        }
        if let Some(note) = self.notifications.back() {
            suffix.push_str(&format!(" | {note}"));
        }

        let info = Span::styled(
            format!(
                " {file_name}{dirty_marker}  {}:{}{} ",
                buffer.cursor.row + 1,
                buffer.cursor.col + 1,
                suffix
            ),
            Style::default().fg(Color::Gray).bg(Color::DarkGray),
        );

        let bar = Line::from(vec![mode_span, info]);
        let status = Paragraph::new(bar).style(Style::default().bg(Color::DarkGray));
        frame.render_widget(status, area);
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let buffer = &self.workspace.buffer;
        let active_path = buffer.path.as_ref();
        let mut spans = Vec::new();

        for tab_path in &self.workspace.open_tabs {
            let name = tab_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "[note]".to_string());

            let is_active = active_path.is_some_and(|p| same_file_path(p, tab_path));
            let label = if is_active && buffer.dirty {
                format!(" {name} ● ")
            } else {
                format!(" {name} ")
            };

            let style = if is_active {
                Style::default()
                    .bg(Color::Rgb(30, 30, 45))
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().bg(Color::Rgb(18, 18, 28)).fg(Color::Gray)
            };

            spans.push(Span::styled(label, style));
        }

        spans.push(Span::styled(
            format!(
                "  Ctrl+N/P: Tabs  i: Insert  {}: People  Tab: Link  Shift+Tab: Plain  :set people.<key>  q: Save+Quit ",
                self.people.settings().trigger_prefix
            ),
            Style::default()
                .bg(Color::Rgb(20, 20, 30))
                .fg(Color::DarkGray),
        ));

        frame.render_widget(
            Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Rgb(20, 20, 30))),
            area,
        );
    }

    fn render_command_overlay(&self, frame: &mut Frame) {
        let area = centered_rect(70, 20, frame.area());
        frame.render_widget(Clear, area);

        let prompt = Paragraph::new(format!(":{}", self.command_input)).block(
            Block::default()
                .title(" Command ")
                .borders(Borders::ALL)
                .style(Style::default().bg(Color::Rgb(15, 15, 24))),
        );
        frame.render_widget(prompt, area);

        let cursor_x = area.x + 2 + self.command_input.chars().count() as u16;
        let cursor_y = area.y + 1;
        frame.set_cursor_position((cursor_x, cursor_y));
    }

    fn render_diagnostic_overlay(&self, frame: &mut Frame) {
        let Some(diagnostic) = &self.diagnostic else {
            return;
        };

        let area = centered_rect(60, 40, frame.area());
        frame.render_widget(Clear, area);

        let body = Paragraph::new(vec![
            Line::from(Span::styled(
                diagnostic.summary.clone(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(diagnostic.details.clone()),
        ])
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" People ")
                .borders(Borders::ALL)
                .style(Style::default().bg(Color::Rgb(15, 15, 24))),
        );
        frame.render_widget(body, area);
    }
}

fn render_split(frame: &mut Frame, area: Rect, buffer: &Buffer) {
    let name = buffer
        .path
        .as_ref()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let top = buffer.viewport.top_line;
    let lines: Vec<Line> = (top..buffer.line_count())
        .take(area.height as usize)
        .map(|i| Line::from(buffer.line_text(i).unwrap_or_default()))
        .collect();

    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .title(format!(" {name} "))
                .borders(Borders::RIGHT)
                .style(Style::default().fg(Color::Gray)),
        ),
        area,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn spawn_buffer_save(path: PathBuf, rope: ropey::Rope) {
    std::thread::spawn(move || {
        use std::io::Write;
        let result = (|| -> Result<()> {
            let tmp = path.with_extension("tmp");
            let file = std::fs::File::create(&tmp)?;
            let mut writer = std::io::BufWriter::new(file);
            for chunk in rope.chunks() {
                writer.write_all(chunk.as_bytes())?;
            }
            writer.flush()?;
            std::fs::rename(&tmp, &path)?;
            Ok(())
        })();

        if let Err(e) = result {
            tracing::error!("save failed for {}: {e}", path.display());
        }
    });
}
