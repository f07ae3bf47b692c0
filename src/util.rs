use regex::Regex;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Spreadsheet notation: column letters followed by the 1-based row
    pub fn label(&self) -> String {
        format!("{}{}", letters_from_col(self.col), self.row + 1)
    }
}

/// Terminal display width of a string
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

pub fn char_count(s: &str) -> usize {
    s.chars().count()
}

/// Byte offset of the character at `char_idx` (or the end of the string)
fn byte_offset(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map(|(i, _)| i).unwrap_or(s.len())
}

pub fn insert_char_at(s: &mut String, char_idx: usize, c: char) {
    let at = byte_offset(s, char_idx);
    s.insert(at, c);
}

pub fn remove_char_at(s: &mut String, char_idx: usize) -> Option<char> {
    if char_idx >= char_count(s) {
        return None;
    }
    let at = byte_offset(s, char_idx);
    Some(s.remove(at))
}

/// Parse column letters to 0-indexed column number (A=0, B=1, ..., Z=25, AA=26, etc.)
pub fn col_from_letters(letters: &str) -> Option<usize> {
    if letters.is_empty() || !letters.bytes().all(|b| b.is_ascii_uppercase()) {
        return None;
    }
    let mut result = 0usize;
    for c in letters.bytes() {
        result = result.checked_mul(26)?.checked_add((c - b'A') as usize + 1)?;
    }
    Some(result - 1)
}

/// Convert a column index to Excel-style letters (0 -> A, 25 -> Z, 26 -> AA, etc.)
pub fn letters_from_col(mut col: usize) -> String {
    col += 1;
    let mut buf = Vec::new();
    while col > 0 {
        col -= 1;
        let rem = (col % 26) as u8;
        buf.push((b'A' + rem) as char);
        col /= 26;
    }
    buf.into_iter().rev().collect()
}

/// Parse a cell reference like "A1" or "aa123"
pub fn parse_cell_ref(s: &str) -> Option<CellRef> {
    let s = s.trim().to_uppercase();
    let re = Regex::new(r"^([A-Z]+)(\d+)$").ok()?;
    let caps = re.captures(&s)?;

    let col_str = caps.get(1)?.as_str();
    let row_str = caps.get(2)?.as_str();

    let row: usize = row_str.parse().ok()?;
    if row == 0 {
        return None; // Rows are 1-indexed in user notation
    }

    let col = col_from_letters(col_str)?;
    Some(CellRef { row: row - 1, col })
}

/// Jump target typed by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpTarget {
    /// 0-indexed data row, typed as a 1-based number ("3")
    Row(usize),
    /// A cell in spreadsheet notation ("B3")
    Cell(CellRef),
}

pub fn parse_jump_target(s: &str) -> Option<JumpTarget> {
    let trimmed = s.trim();
    if let Ok(row) = trimmed.parse::<usize>() {
        return row.checked_sub(1).map(JumpTarget::Row);
    }
    parse_cell_ref(trimmed).map(JumpTarget::Cell)
}
