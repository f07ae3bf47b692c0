use crate::util::{parse_jump_target, CellRef, JumpTarget};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Write,
    Quit,
    ForceQuit,
    WriteQuit,
    Reload,
    AddColumn(Option<String>),  // addcol [name]
    DeleteColumn,
    Rename(String),             // rename <name>
    Theme(String),              // Set theme by name
    ThemeList,                  // List available themes
    NavigateRow(usize),
    NavigateCell(CellRef),
    Unknown(String),
}

impl Command {
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();

        if let Some(target) = parse_jump_target(trimmed) {
            return Some(match target {
                JumpTarget::Row(row) => Command::NavigateRow(row),
                JumpTarget::Cell(cell) => Command::NavigateCell(cell),
            });
        }

        let (name, arg) = match trimmed.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, Some(arg.trim()).filter(|a| !a.is_empty())),
            None => (trimmed, None),
        };

        match (name, arg) {
            ("w", None) => Some(Command::Write),
            ("q", None) => Some(Command::Quit),
            ("q!", None) => Some(Command::ForceQuit),
            ("wq" | "x", None) => Some(Command::WriteQuit),
            ("e" | "e!" | "reload", None) => Some(Command::Reload),
            ("addcol", arg) => Some(Command::AddColumn(arg.map(str::to_string))),
            ("delcol", None) => Some(Command::DeleteColumn),
            ("rename", Some(new_name)) => Some(Command::Rename(new_name.to_string())),
            ("theme", Some(theme)) => Some(Command::Theme(theme.to_string())),
            ("theme" | "themes", None) => Some(Command::ThemeList),
            _ => Some(Command::Unknown(trimmed.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_commands() {
        assert_eq!(Command::parse("w"), Some(Command::Write));
        assert_eq!(Command::parse("q"), Some(Command::Quit));
        assert_eq!(Command::parse("q!"), Some(Command::ForceQuit));
        assert_eq!(Command::parse("wq"), Some(Command::WriteQuit));
        assert_eq!(Command::parse("e"), Some(Command::Reload));
        assert_eq!(Command::parse("reload"), Some(Command::Reload));
        assert_eq!(Command::parse("delcol"), Some(Command::DeleteColumn));
    }

    #[test]
    fn test_parse_commands_with_arguments() {
        assert_eq!(Command::parse("addcol"), Some(Command::AddColumn(None)));
        assert_eq!(
            Command::parse("addcol  email "),
            Some(Command::AddColumn(Some("email".to_string())))
        );
        assert_eq!(
            Command::parse("rename full name"),
            Some(Command::Rename("full name".to_string()))
        );
        assert_eq!(Command::parse("theme nord"), Some(Command::Theme("nord".to_string())));
        assert_eq!(Command::parse("theme"), Some(Command::ThemeList));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            Command::parse("foobar"),
            Some(Command::Unknown("foobar".to_string()))
        );
        // rename needs a name
        assert_eq!(
            Command::parse("rename"),
            Some(Command::Unknown("rename".to_string()))
        );
        assert_eq!(
            Command::parse("w extra"),
            Some(Command::Unknown("w extra".to_string()))
        );
    }

    #[test]
    fn test_parse_with_whitespace() {
        assert_eq!(Command::parse("  w  "), Some(Command::Write));
        assert_eq!(Command::parse("\tq\n"), Some(Command::Quit));
        assert_eq!(Command::parse("  q!  "), Some(Command::ForceQuit));
    }

    #[test]
    fn test_parse_row_navigation() {
        assert_eq!(Command::parse("1"), Some(Command::NavigateRow(0)));
        assert_eq!(Command::parse("10"), Some(Command::NavigateRow(9)));
    }

    #[test]
    fn test_parse_cell_navigation() {
        assert_eq!(Command::parse("A1"), Some(Command::NavigateCell(CellRef::new(0, 0))));
        assert_eq!(Command::parse("b5"), Some(Command::NavigateCell(CellRef::new(4, 1))));
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Command::parse(""), Some(Command::Unknown(String::new())));
    }
}
