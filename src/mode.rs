pub mod prompt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    /// Edit-cell dialog
    EditCell,
    /// Jump-to-cell dialog
    Jump,
    Command,
    /// Typing directly into the formula bar
    FormulaBar,
}

impl Mode {
    pub fn display_name(&self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::EditCell => "EDIT",
            Mode::Jump => "JUMP",
            Mode::Command => "COMMAND",
            Mode::FormulaBar => "FORMULA",
        }
    }

    /// Modes in which keystrokes go to a text prompt rather than the grid
    pub fn is_prompt(&self) -> bool {
        !matches!(self, Mode::Normal)
    }
}

#[cfg(test)]
mod test;
