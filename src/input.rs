use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::CommandTable;
use crate::model::TableModel;
use crate::tableview::TableView;

/// Check for escape key (Esc or Ctrl+[)
pub fn is_escape(key: KeyEvent) -> bool {
    key.code == KeyCode::Esc
        || (key.code == KeyCode::Char('[') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Actions resulting from key sequences
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequenceAction {
    MoveToTop,   // gg
    DeleteRow,   // dr
    DeleteCol,   // dc
    // Motion actions (can have count)
    MoveDown,    // j
    MoveUp,      // k
    MoveLeft,    // h
    MoveRight,   // l
}

/// Result of processing a key through the buffer
#[derive(Debug, PartialEq)]
pub enum KeyBufferResult {
    /// A sequence matched, execute this action with optional count
    Action(SequenceAction, usize),
    /// Waiting for more keys (buffer is a valid prefix)
    Pending,
    /// No sequence matched, process this key normally (with optional count)
    Fallthrough(KeyEvent, usize),
}

/// Buffer for accumulating multi-key sequences with optional count prefix
pub struct KeyBuffer {
    keys: Vec<char>,
    count: Option<usize>,
    last_key_time: Instant,
    timeout: Duration,
    commands: CommandTable,
}

impl KeyBuffer {
    pub fn new(commands: CommandTable) -> Self {
        Self {
            keys: Vec::new(),
            count: None,
            last_key_time: Instant::now(),
            timeout: Duration::from_millis(1000),
            commands,
        }
    }

    /// Process a key event, returning what action to take
    pub fn process(&mut self, key: KeyEvent) -> KeyBufferResult {
        // Clear buffer if too much time has passed since last key
        if self.last_key_time.elapsed() > self.timeout {
            self.clear();
        }

        // Only buffer character keys (no modifiers except shift)
        let c = match key.code {
            KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => c,
            _ => {
                // Non-char key breaks any sequence
                let count = self.take_count();
                self.keys.clear();
                return KeyBufferResult::Fallthrough(key, count);
            }
        };

        self.last_key_time = Instant::now();

        // Accumulate digits as count prefix (but not '0' at start - that's a motion)
        if self.keys.is_empty() {
            if let Some(digit) = c.to_digit(10) {
                if self.count.is_some() || digit != 0 {
                    self.count = Some(self.count.unwrap_or(0).saturating_mul(10).saturating_add(digit as usize));
                    return KeyBufferResult::Pending;
                }
            }
        }

        self.keys.push(c);

        // Try to match a complete sequence
        if let Some(action) = self.commands.match_sequence(&self.keys) {
            let count = self.take_count();
            self.keys.clear();
            return KeyBufferResult::Action(action, count);
        }

        // Check if current buffer could be a prefix of any sequence
        if self.commands.is_prefix(&self.keys) {
            return KeyBufferResult::Pending;
        }

        // No match and not a valid prefix - clear and fall through
        let count = self.take_count();
        self.keys.clear();
        KeyBufferResult::Fallthrough(key, count)
    }

    /// Clear the buffer (e.g., on mode change)
    pub fn clear(&mut self) {
        self.keys.clear();
        self.count = None;
    }

    fn take_count(&mut self) -> usize {
        self.count.take().unwrap_or(1)
    }

    pub fn display(&self) -> String {
        let mut s = self.count.map(|c| c.to_string()).unwrap_or_default();
        s.extend(self.keys.iter());
        s
    }
}

/// Navigation handler for the grid cursor
pub struct NavigationHandler;

impl NavigationHandler {
    pub fn new() -> Self {
        Self
    }

    /// Execute a motion sequence with a count
    pub fn handle_sequence(&self, action: SequenceAction, count: usize, view: &mut TableView, model: &TableModel) {
        match action {
            SequenceAction::MoveToTop => view.move_to_top(),
            SequenceAction::MoveDown => view.move_down_n(count, model),
            SequenceAction::MoveUp => view.move_up_n(count),
            SequenceAction::MoveLeft => view.move_left_n(count),
            SequenceAction::MoveRight => view.move_right_n(count, model),
            SequenceAction::DeleteRow | SequenceAction::DeleteCol => {}
        }
    }

    /// Handle navigation keys, returns true if the key was handled
    pub fn handle(&self, key: KeyEvent, view: &mut TableView, model: &TableModel) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Left => { view.move_left(); true }
            KeyCode::Right => { view.move_right(model); true }
            KeyCode::Up => { view.move_up(); true }
            KeyCode::Down => { view.move_down(model); true }
            KeyCode::Home => { view.move_to_first_col(); true }
            KeyCode::End => { view.move_to_last_col(model); true }
            KeyCode::PageDown => { view.page_down(model); true }
            KeyCode::PageUp => { view.page_up(); true }
            KeyCode::Char('d') if ctrl => { view.half_page_down(model); true }
            KeyCode::Char('u') if ctrl => { view.half_page_up(); true }
            KeyCode::Char('G') => { view.move_to_bottom(model); true }
            KeyCode::Char('0') | KeyCode::Char('^') => { view.move_to_first_col(); true }
            KeyCode::Char('$') => { view.move_to_last_col(model); true }
            _ => false,
        }
    }
}

impl Default for NavigationHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn test_single_key_motion() {
        let mut buf = KeyBuffer::new(CommandTable::default());
        assert_eq!(buf.process(key('j')), KeyBufferResult::Action(SequenceAction::MoveDown, 1));
    }

    #[test]
    fn test_two_key_sequence() {
        let mut buf = KeyBuffer::new(CommandTable::default());
        assert_eq!(buf.process(key('d')), KeyBufferResult::Pending);
        assert_eq!(buf.display(), "d");
        assert_eq!(buf.process(key('r')), KeyBufferResult::Action(SequenceAction::DeleteRow, 1));
        assert_eq!(buf.display(), "");
    }

    #[test]
    fn test_count_prefix() {
        let mut buf = KeyBuffer::new(CommandTable::default());
        assert_eq!(buf.process(key('1')), KeyBufferResult::Pending);
        assert_eq!(buf.process(key('2')), KeyBufferResult::Pending);
        assert_eq!(buf.process(key('k')), KeyBufferResult::Action(SequenceAction::MoveUp, 12));
    }

    #[test]
    fn test_zero_is_a_motion_key() {
        let mut buf = KeyBuffer::new(CommandTable::default());
        assert_eq!(buf.process(key('0')), KeyBufferResult::Fallthrough(key('0'), 1));
    }

    #[test]
    fn test_unknown_sequence_falls_through() {
        let mut buf = KeyBuffer::new(CommandTable::default());
        assert_eq!(buf.process(key('d')), KeyBufferResult::Pending);
        assert_eq!(buf.process(key('x')), KeyBufferResult::Fallthrough(key('x'), 1));

        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(buf.process(enter), KeyBufferResult::Fallthrough(enter, 1));
    }

    #[test]
    fn test_escape_detection() {
        assert!(is_escape(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(is_escape(KeyEvent::new(KeyCode::Char('['), KeyModifiers::CONTROL)));
        assert!(!is_escape(key('[')));
    }
}
