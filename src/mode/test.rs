use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::prompt::*;
use super::Mode;

fn press(prompt: &mut PromptHandler, code: KeyCode) -> PromptResult {
    prompt.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn type_str(prompt: &mut PromptHandler, s: &str) {
    for c in s.chars() {
        assert_eq!(press(prompt, KeyCode::Char(c)), PromptResult::Continue);
    }
}

#[test]
fn test_mode_names() {
    assert_eq!(Mode::default(), Mode::Normal);
    assert_eq!(Mode::Normal.display_name(), "NORMAL");
    assert_eq!(Mode::FormulaBar.display_name(), "FORMULA");
    assert!(!Mode::Normal.is_prompt());
    assert!(Mode::Jump.is_prompt());
}

#[test]
fn test_typing_and_submit() {
    let mut prompt = PromptHandler::new();
    type_str(&mut prompt, "Alice");
    assert_eq!(prompt.cursor, 5);
    assert_eq!(press(&mut prompt, KeyCode::Enter), PromptResult::Submit("Alice".to_string()));
    assert!(prompt.buffer.is_empty());
    assert_eq!(prompt.cursor, 0);
}

#[test]
fn test_start_places_cursor_at_end() {
    let mut prompt = PromptHandler::new();
    prompt.start("日本".to_string());
    assert_eq!(prompt.cursor, 2);
    press(&mut prompt, KeyCode::Backspace);
    assert_eq!(prompt.buffer, "日");
}

#[test]
fn test_cursor_movement_and_mid_insert() {
    let mut prompt = PromptHandler::new();
    prompt.start("ac".to_string());
    press(&mut prompt, KeyCode::Left);
    type_str(&mut prompt, "b");
    assert_eq!(prompt.buffer, "abc");

    press(&mut prompt, KeyCode::Home);
    press(&mut prompt, KeyCode::Delete);
    assert_eq!(prompt.buffer, "bc");

    press(&mut prompt, KeyCode::End);
    press(&mut prompt, KeyCode::Right);
    assert_eq!(prompt.cursor, 2);
}

#[test]
fn test_escape_cancels() {
    let mut prompt = PromptHandler::new();
    prompt.start("draft".to_string());
    assert_eq!(press(&mut prompt, KeyCode::Esc), PromptResult::Cancel);
    assert!(prompt.buffer.is_empty());
}

#[test]
fn test_backspace_at_start_is_noop() {
    let mut prompt = PromptHandler::new();
    prompt.start("x".to_string());
    press(&mut prompt, KeyCode::Home);
    press(&mut prompt, KeyCode::Backspace);
    assert_eq!(prompt.buffer, "x");
}
