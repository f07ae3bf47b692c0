use std::io;
use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::debug;

use crate::clipboard::Clipboard;
use crate::command::Command;
use crate::config::AppConfig;
use crate::input::{KeyBuffer, KeyBufferResult, NavigationHandler, SequenceAction};
use crate::mode::prompt::{PromptHandler, PromptResult};
use crate::mode::Mode;
use crate::model::TableModel;
use crate::notify::Notifications;
use crate::style::{resolve_theme, Style, Theme};
use crate::table::Value;
use crate::tableview::TableView;
use crate::ui;
use crate::util::{parse_jump_target, JumpTarget};

pub struct App {
    pub model: TableModel,
    pub view: TableView,
    pub style: Style,
    pub config: AppConfig,
    pub mode: Mode,
    pub notifications: Notifications,
    pub clipboard: Clipboard,
    pub should_quit: bool,
    // Mode handlers
    prompt: PromptHandler,
    key_buffer: KeyBuffer,
    nav_handler: NavigationHandler,
}

impl App {
    pub fn new(model: TableModel, style: Style, config: AppConfig) -> Self {
        let mut notifications = Notifications::new(config.notification_timeout());
        for warning in model.load_warnings() {
            notifications.warning(warning.clone());
        }

        Self {
            key_buffer: KeyBuffer::new(config.commands.clone()),
            model,
            view: TableView::new(),
            style,
            config,
            mode: Mode::Normal,
            notifications,
            clipboard: Clipboard::new(),
            should_quit: false,
            prompt: PromptHandler::new(),
            nav_handler: NavigationHandler::new(),
        }
    }

    // Accessor methods for UI
    pub fn prompt_buffer(&self) -> &str {
        &self.prompt.buffer
    }

    pub fn prompt_cursor(&self) -> usize {
        self.prompt.cursor
    }

    pub fn key_buffer_display(&self) -> String {
        self.key_buffer.display()
    }

    /// Display text of the cell under the cursor (empty for null)
    pub fn current_cell_text(&self) -> String {
        let (row, col) = self.view.cursor_index();
        self.model
            .get_value(row, col)
            .map(|v| v.to_string())
            .unwrap_or_default()
    }

    pub fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
        while !self.should_quit {
            self.notifications.prune();

            terminal.draw(|f| ui::render(f, self))?;

            if poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.mode.is_prompt() {
            self.handle_prompt_mode(key);
        } else {
            self.handle_normal_mode(key);
        }
    }

    fn handle_normal_mode(&mut self, key: KeyEvent) {
        // Process through key buffer for sequences
        match self.key_buffer.process(key) {
            KeyBufferResult::Action(action, count) => self.execute_sequence_action(action, count),
            KeyBufferResult::Pending => {}
            KeyBufferResult::Fallthrough(key, count) => self.handle_normal_key(key, count),
        }
    }

    fn execute_sequence_action(&mut self, action: SequenceAction, count: usize) {
        match action {
            SequenceAction::DeleteRow => {
                let (row, _) = self.view.cursor_index();
                if self.notifications.report(self.model.delete_row(row)).is_some() {
                    self.view.clamp_cursor(&self.model);
                    self.notifications.info("Row deleted");
                }
            }
            SequenceAction::DeleteCol => {
                let (_, col) = self.view.cursor_index();
                if self.notifications.report(self.model.delete_column(col)).is_some() {
                    self.view.clamp_cursor(&self.model);
                    self.notifications.info("Column deleted");
                }
            }
            motion => {
                self.nav_handler.handle_sequence(motion, count, &mut self.view, &self.model);
            }
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent, _count: usize) {
        if self.nav_handler.handle(key, &mut self.view, &self.model) {
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let (row, col) = self.view.cursor_index();

        match key.code {
            KeyCode::Char('s') if ctrl => {
                self.save();
            }
            KeyCode::Char('g') if ctrl => self.open_prompt(Mode::Jump, String::new()),
            _ if ctrl => {}
            KeyCode::Tab => {
                let text = self.current_cell_text();
                self.open_prompt(Mode::FormulaBar, text);
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                let text = self.current_cell_text();
                self.open_prompt(Mode::EditCell, text);
            }
            KeyCode::Char(':') => self.open_prompt(Mode::Command, String::new()),
            KeyCode::Char('o') => {
                // A header-only table has no row to go below, so the first row is appended
                let empty = self.model.row_count() == 0;
                let at = if empty { 0 } else { row + 1 };
                if self.notifications.report(self.model.insert_row(at, None)).is_some() {
                    if !empty {
                        self.view.move_down(&self.model);
                    }
                    self.notifications.info("Row added");
                }
            }
            KeyCode::Char('O') => {
                if self.notifications.report(self.model.insert_row(row, None)).is_some() {
                    self.notifications.info("Row added");
                }
            }
            KeyCode::Char('a') => {
                self.add_column(col, None);
            }
            KeyCode::Char('A') => {
                if self.add_column(col + 1, None) {
                    self.view.move_right(&self.model);
                }
            }
            KeyCode::Char('x') => {
                self.notifications.report(self.model.set_cell(row, col, Value::Null));
            }
            KeyCode::Char('y') => {
                let text = self.current_cell_text();
                match self.clipboard.yank(&text) {
                    Ok(msg) => self.notifications.info(msg),
                    Err(msg) => self.notifications.warning(msg),
                }
            }
            KeyCode::Char('p') => match self.clipboard.paste() {
                Ok(text) => self.commit_cell(text),
                Err(msg) => self.notifications.error(msg),
            },
            KeyCode::Char('s') => {
                self.save();
            }
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('q') => self.quit(),
            _ => {}
        }
    }

    fn open_prompt(&mut self, mode: Mode, initial: String) {
        self.key_buffer.clear();
        self.prompt.start(initial);
        self.mode = mode;
    }

    fn handle_prompt_mode(&mut self, key: KeyEvent) {
        let result = self.prompt.handle_key(key);
        let mode = self.mode;

        match result {
            PromptResult::Continue => {}
            PromptResult::Cancel => self.mode = Mode::Normal,
            PromptResult::Submit(text) => {
                self.mode = Mode::Normal;
                match mode {
                    Mode::EditCell | Mode::FormulaBar => self.commit_cell(text),
                    Mode::Jump => self.jump_to(&text),
                    Mode::Command => {
                        if let Some(cmd) = Command::parse(&text) {
                            self.execute_command(cmd);
                        }
                    }
                    Mode::Normal => {}
                }
            }
        }
    }

    /// Write typed text into the cursor cell; empty text clears it
    fn commit_cell(&mut self, text: String) {
        let (row, col) = self.view.cursor_index();
        let value = if text.is_empty() { Value::Null } else { Value::Text(text) };
        self.notifications.report(self.model.set_cell(row, col, value));
    }

    fn jump_to(&mut self, text: &str) {
        match parse_jump_target(text) {
            Some(JumpTarget::Row(row)) => self.view.goto_row(row, &self.model),
            Some(JumpTarget::Cell(cell)) => self.view.goto_cell(cell, &self.model),
            None => self.notifications.error(format!("Invalid cell reference: {}", text.trim())),
        }
    }

    fn add_column(&mut self, at: isize, name: Option<&str>) -> bool {
        match self.notifications.report(self.model.insert_column(at, name)) {
            Some(name) => {
                self.notifications.info(format!("Added column '{}'", name));
                true
            }
            None => false,
        }
    }

    fn save(&mut self) -> bool {
        let saved = self.notifications.report(self.model.save()).is_some();
        if saved {
            self.notifications.info(format!("Saved {}", self.model.display_name()));
        }
        saved
    }

    fn reload(&mut self) {
        if self.notifications.report(self.model.reload()).is_some() {
            self.view.clamp_cursor(&self.model);
            self.notifications.info("Reloaded from disk");
            let warnings = self.model.load_warnings().to_vec();
            for warning in warnings {
                self.notifications.warning(warning);
            }
        }
    }

    fn quit(&mut self) {
        if self.model.is_modified() && self.config.confirm_quit {
            self.notifications.warning("Unsaved changes! Use :q! to force quit");
        } else {
            self.should_quit = true;
        }
    }

    fn execute_command(&mut self, cmd: Command) {
        debug!(?cmd, "command");
        let (_, col) = self.view.cursor_index();

        match cmd {
            Command::Write => {
                self.save();
            }
            Command::Quit => self.quit(),
            Command::ForceQuit => self.should_quit = true,
            Command::WriteQuit => {
                if self.save() {
                    self.should_quit = true;
                }
            }
            Command::Reload => self.reload(),
            Command::AddColumn(name) => {
                if self.add_column(col + 1, name.as_deref()) {
                    self.view.move_right(&self.model);
                }
            }
            Command::DeleteColumn => self.execute_sequence_action(SequenceAction::DeleteCol, 1),
            Command::Rename(name) => {
                if self.notifications.report(self.model.rename_column(col, &name)).is_some() {
                    self.notifications.info(format!("Renamed column to '{}'", name));
                }
            }
            Command::Theme(name) => match resolve_theme(Some(&name)) {
                Ok(theme) => {
                    self.notifications.info(format!("Theme: {}", theme.name));
                    self.style.set_theme(theme);
                }
                Err(e) => self.notifications.error(e.to_string()),
            },
            Command::ThemeList => {
                self.notifications
                    .info(format!("Themes: {}", Theme::builtin_names().join(", ")));
            }
            Command::NavigateRow(row) => self.view.goto_row(row, &self.model),
            Command::NavigateCell(cell) => self.view.goto_cell(cell, &self.model),
            Command::Unknown(s) => {
                if !s.is_empty() {
                    self.notifications.error(format!("Unknown command: {}", s));
                }
            }
        }
    }
}
