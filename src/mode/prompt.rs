use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::input::is_escape;
use crate::util::{char_count, insert_char_at, remove_char_at};

#[derive(Debug, PartialEq)]
pub enum PromptResult {
    Continue,
    Submit(String),
    Cancel,
}

/// Single-line text input shared by the dialogs, the command line and the formula bar.
/// Note: cursor is a CHARACTER index, not a byte index
#[derive(Debug, Default)]
pub struct PromptHandler {
    pub buffer: String,
    pub cursor: usize,
}

impl PromptHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, initial: String) {
        self.cursor = char_count(&initial);
        self.buffer = initial;
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PromptResult {
        if is_escape(key) {
            self.clear();
            return PromptResult::Cancel;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Enter => {
                let submitted = std::mem::take(&mut self.buffer);
                self.cursor = 0;
                return PromptResult::Submit(submitted);
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    remove_char_at(&mut self.buffer, self.cursor);
                }
            }
            KeyCode::Delete => {
                remove_char_at(&mut self.buffer, self.cursor);
            }
            KeyCode::Char('u') if ctrl => {
                self.clear();
            }
            KeyCode::Char(c) if !ctrl => {
                insert_char_at(&mut self.buffer, self.cursor, c);
                self.cursor += 1;
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(char_count(&self.buffer));
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = char_count(&self.buffer),
            _ => {}
        }

        PromptResult::Continue
    }
}
