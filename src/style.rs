use ratatui::style::{Color, Modifier, Style as RatStyle};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Color that can be serialized/deserialized
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThemeColor {
    /// Named color: "red", "blue", "cyan", etc.
    Named(NamedColor),
    /// RGB color: [255, 128, 0]
    Rgb([u8; 3]),
    /// 256-color index: 42
    Indexed(u8),
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    Gray,
    DarkGray,
    LightRed,
    LightGreen,
    LightYellow,
    LightBlue,
    LightMagenta,
    LightCyan,
    White,
    Reset,
}

impl From<ThemeColor> for Color {
    fn from(tc: ThemeColor) -> Color {
        match tc {
            ThemeColor::Named(n) => match n {
                NamedColor::Black => Color::Black,
                NamedColor::Red => Color::Red,
                NamedColor::Green => Color::Green,
                NamedColor::Yellow => Color::Yellow,
                NamedColor::Blue => Color::Blue,
                NamedColor::Magenta => Color::Magenta,
                NamedColor::Cyan => Color::Cyan,
                NamedColor::Gray => Color::Gray,
                NamedColor::DarkGray => Color::DarkGray,
                NamedColor::LightRed => Color::LightRed,
                NamedColor::LightGreen => Color::LightGreen,
                NamedColor::LightYellow => Color::LightYellow,
                NamedColor::LightBlue => Color::LightBlue,
                NamedColor::LightMagenta => Color::LightMagenta,
                NamedColor::LightCyan => Color::LightCyan,
                NamedColor::White => Color::White,
                NamedColor::Reset => Color::Reset,
            },
            ThemeColor::Rgb([r, g, b]) => Color::Rgb(r, g, b),
            ThemeColor::Indexed(i) => Color::Indexed(i),
        }
    }
}

/// Style definition for a single element
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ElementStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fg: Option<ThemeColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg: Option<ThemeColor>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub dim: bool,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            fg: None,
            bg: None,
            bold: false,
            italic: false,
            underline: false,
            dim: false,
        }
    }
}

impl ElementStyle {
    pub fn fg(color: ThemeColor) -> Self {
        Self { fg: Some(color), ..Default::default() }
    }

    pub fn with_bg(mut self, color: ThemeColor) -> Self {
        self.bg = Some(color);
        self
    }

    pub fn with_bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn with_dim(mut self) -> Self {
        self.dim = true;
        self
    }

    pub fn to_ratatui(&self) -> RatStyle {
        let mut style = RatStyle::default();
        if let Some(fg) = self.fg {
            style = style.fg(fg.into());
        }
        if let Some(bg) = self.bg {
            style = style.bg(bg.into());
        }
        if self.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.italic {
            style = style.add_modifier(Modifier::ITALIC);
        }
        if self.underline {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        if self.dim {
            style = style.add_modifier(Modifier::DIM);
        }
        style
    }
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("Theme '{name}' not found")]
    Unknown { name: String },

    #[error("Failed to read theme file {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },

    #[error("Failed to parse theme file {}: {source}", path.display())]
    Parse { path: PathBuf, source: toml::de::Error },
}

/// Complete theme configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,

    // Background color for the entire UI
    #[serde(default)]
    pub background: Option<ThemeColor>,

    // Table cells
    pub cell: ElementStyle,
    pub cell_cursor: ElementStyle,

    // Column letters, column names, row gutter
    pub index_row: ElementStyle,
    pub index_row_cursor: ElementStyle,
    pub header: ElementStyle,
    pub row_number: ElementStyle,
    pub row_number_cursor: ElementStyle,

    // Formula bar
    pub formula_label: ElementStyle,
    pub formula_bar: ElementStyle,
    pub formula_bar_focus: ElementStyle,

    // Status bar
    pub status_bar: ElementStyle,
    pub status_mode_normal: ElementStyle,
    pub status_mode_edit: ElementStyle,
    pub status_mode_command: ElementStyle,
    pub status_modified: ElementStyle,

    // Messages
    pub message_info: ElementStyle,
    pub message_warning: ElementStyle,
    pub message_error: ElementStyle,

    // Command line
    pub command_line: ElementStyle,
    pub command_prompt: ElementStyle,

    // Modal dialogs
    pub dialog: ElementStyle,
    pub dialog_border: ElementStyle,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme with black background (default)
    pub fn dark() -> Self {
        use NamedColor::*;
        Self {
            name: "dark".to_string(),
            background: Some(ThemeColor::Named(Black)),
            cell: ElementStyle::fg(ThemeColor::Named(White)),
            cell_cursor: ElementStyle::fg(ThemeColor::Named(Black))
                .with_bg(ThemeColor::Named(LightCyan))
                .with_bold(),
            index_row: ElementStyle::fg(ThemeColor::Named(Gray)).with_dim(),
            index_row_cursor: ElementStyle::fg(ThemeColor::Named(LightYellow)).with_bold(),
            header: ElementStyle::fg(ThemeColor::Named(LightGreen)).with_bold(),
            row_number: ElementStyle::fg(ThemeColor::Named(Gray)),
            row_number_cursor: ElementStyle::fg(ThemeColor::Named(LightYellow)).with_bold(),
            formula_label: ElementStyle::fg(ThemeColor::Named(LightCyan)).with_bold(),
            formula_bar: ElementStyle::fg(ThemeColor::Named(White)),
            formula_bar_focus: ElementStyle::fg(ThemeColor::Named(White))
                .with_bg(ThemeColor::Named(DarkGray)),
            status_bar: ElementStyle::fg(ThemeColor::Named(White))
                .with_bg(ThemeColor::Named(DarkGray)),
            status_mode_normal: ElementStyle::fg(ThemeColor::Named(Black))
                .with_bg(ThemeColor::Named(LightBlue))
                .with_bold(),
            status_mode_edit: ElementStyle::fg(ThemeColor::Named(Black))
                .with_bg(ThemeColor::Named(LightGreen))
                .with_bold(),
            status_mode_command: ElementStyle::fg(ThemeColor::Named(Black))
                .with_bg(ThemeColor::Named(LightYellow))
                .with_bold(),
            status_modified: ElementStyle::fg(ThemeColor::Named(LightRed))
                .with_bg(ThemeColor::Named(DarkGray))
                .with_bold(),
            message_info: ElementStyle::fg(ThemeColor::Named(White)),
            message_warning: ElementStyle::fg(ThemeColor::Named(LightYellow)),
            message_error: ElementStyle::fg(ThemeColor::Named(LightRed)).with_bold(),
            command_line: ElementStyle::fg(ThemeColor::Named(White)),
            command_prompt: ElementStyle::fg(ThemeColor::Named(LightCyan)),
            dialog: ElementStyle::fg(ThemeColor::Named(White)).with_bg(ThemeColor::Named(Black)),
            dialog_border: ElementStyle::fg(ThemeColor::Named(LightCyan)),
        }
    }

    pub fn light() -> Self {
        use NamedColor::*;
        Self {
            name: "light".to_string(),
            background: None, // Use terminal default
            cell: ElementStyle::fg(ThemeColor::Named(Black)),
            cell_cursor: ElementStyle::fg(ThemeColor::Named(White))
                .with_bg(ThemeColor::Named(Blue))
                .with_bold(),
            index_row: ElementStyle::fg(ThemeColor::Named(Gray)),
            index_row_cursor: ElementStyle::fg(ThemeColor::Named(Blue)).with_bold(),
            header: ElementStyle::fg(ThemeColor::Named(Blue)).with_bold(),
            row_number: ElementStyle::fg(ThemeColor::Named(Gray)),
            row_number_cursor: ElementStyle::fg(ThemeColor::Named(Blue)).with_bold(),
            formula_label: ElementStyle::fg(ThemeColor::Named(Blue)).with_bold(),
            formula_bar: ElementStyle::fg(ThemeColor::Named(Black)),
            formula_bar_focus: ElementStyle::fg(ThemeColor::Named(Black))
                .with_bg(ThemeColor::Named(LightCyan)),
            status_bar: ElementStyle::fg(ThemeColor::Named(Black))
                .with_bg(ThemeColor::Named(Gray)),
            status_mode_normal: ElementStyle::fg(ThemeColor::Named(White))
                .with_bg(ThemeColor::Named(Blue))
                .with_bold(),
            status_mode_edit: ElementStyle::fg(ThemeColor::Named(White))
                .with_bg(ThemeColor::Named(Green))
                .with_bold(),
            status_mode_command: ElementStyle::fg(ThemeColor::Named(Black))
                .with_bg(ThemeColor::Named(Yellow))
                .with_bold(),
            status_modified: ElementStyle::fg(ThemeColor::Named(Red))
                .with_bg(ThemeColor::Named(Gray))
                .with_bold(),
            message_info: ElementStyle::fg(ThemeColor::Named(Black)),
            message_warning: ElementStyle::fg(ThemeColor::Named(Yellow)),
            message_error: ElementStyle::fg(ThemeColor::Named(Red)).with_bold(),
            command_line: ElementStyle::fg(ThemeColor::Named(Black)),
            command_prompt: ElementStyle::fg(ThemeColor::Named(Blue)),
            dialog: ElementStyle::fg(ThemeColor::Named(Black)).with_bg(ThemeColor::Named(White)),
            dialog_border: ElementStyle::fg(ThemeColor::Named(Blue)),
        }
    }

    /// Build a theme from a palette of RGB colors shared by the dark truecolor themes
    fn from_palette(name: &str, p: Palette) -> Self {
        Self {
            name: name.to_string(),
            background: Some(p.bg),
            cell: ElementStyle::fg(p.fg),
            cell_cursor: ElementStyle::fg(p.bg).with_bg(p.accent).with_bold(),
            index_row: ElementStyle::fg(p.muted),
            index_row_cursor: ElementStyle::fg(p.highlight).with_bold(),
            header: ElementStyle::fg(p.header).with_bold(),
            row_number: ElementStyle::fg(p.muted),
            row_number_cursor: ElementStyle::fg(p.highlight).with_bold(),
            formula_label: ElementStyle::fg(p.accent).with_bold(),
            formula_bar: ElementStyle::fg(p.fg),
            formula_bar_focus: ElementStyle::fg(p.fg).with_bg(p.panel),
            status_bar: ElementStyle::fg(p.fg).with_bg(p.panel),
            status_mode_normal: ElementStyle::fg(p.bg).with_bg(p.accent).with_bold(),
            status_mode_edit: ElementStyle::fg(p.bg).with_bg(p.header).with_bold(),
            status_mode_command: ElementStyle::fg(p.bg).with_bg(p.highlight).with_bold(),
            status_modified: ElementStyle::fg(p.error).with_bg(p.panel).with_bold(),
            message_info: ElementStyle::fg(p.fg),
            message_warning: ElementStyle::fg(p.warning),
            message_error: ElementStyle::fg(p.error).with_bold(),
            command_line: ElementStyle::fg(p.fg),
            command_prompt: ElementStyle::fg(p.accent),
            dialog: ElementStyle::fg(p.fg).with_bg(p.panel),
            dialog_border: ElementStyle::fg(p.accent),
        }
    }

    pub fn solarized_dark() -> Self {
        Self::from_palette("solarized-dark", Palette {
            bg: ThemeColor::Rgb([0, 43, 54]),        // base03
            panel: ThemeColor::Rgb([7, 54, 66]),     // base02
            muted: ThemeColor::Rgb([88, 110, 117]),  // base01
            fg: ThemeColor::Rgb([131, 148, 150]),    // base0
            accent: ThemeColor::Rgb([38, 139, 210]), // blue
            header: ThemeColor::Rgb([133, 153, 0]),  // green
            highlight: ThemeColor::Rgb([181, 137, 0]),
            warning: ThemeColor::Rgb([203, 75, 22]),
            error: ThemeColor::Rgb([220, 50, 47]),
        })
    }

    pub fn nord() -> Self {
        Self::from_palette("nord", Palette {
            bg: ThemeColor::Rgb([46, 52, 64]),
            panel: ThemeColor::Rgb([59, 66, 82]),
            muted: ThemeColor::Rgb([76, 86, 106]),
            fg: ThemeColor::Rgb([216, 222, 233]),
            accent: ThemeColor::Rgb([136, 192, 208]),
            header: ThemeColor::Rgb([163, 190, 140]),
            highlight: ThemeColor::Rgb([235, 203, 139]),
            warning: ThemeColor::Rgb([208, 135, 112]),
            error: ThemeColor::Rgb([191, 97, 106]),
        })
    }

    pub fn dracula() -> Self {
        Self::from_palette("dracula", Palette {
            bg: ThemeColor::Rgb([40, 42, 54]),
            panel: ThemeColor::Rgb([68, 71, 90]),
            muted: ThemeColor::Rgb([98, 114, 164]),
            fg: ThemeColor::Rgb([248, 248, 242]),
            accent: ThemeColor::Rgb([189, 147, 249]),
            header: ThemeColor::Rgb([80, 250, 123]),
            highlight: ThemeColor::Rgb([241, 250, 140]),
            warning: ThemeColor::Rgb([255, 184, 108]),
            error: ThemeColor::Rgb([255, 85, 85]),
        })
    }

    /// Load theme from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ThemeError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| ThemeError::Read { path: path.to_path_buf(), source })?;
        toml::from_str(&content)
            .map_err(|source| ThemeError::Parse { path: path.to_path_buf(), source })
    }

    /// Get theme by name (case-insensitive)
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "dark" => Some(Self::dark()),
            "light" => Some(Self::light()),
            "solarized" | "solarized-dark" => Some(Self::solarized_dark()),
            "nord" => Some(Self::nord()),
            "dracula" => Some(Self::dracula()),
            _ => None,
        }
    }

    /// List available built-in themes
    pub fn builtin_names() -> &'static [&'static str] {
        &["dark", "light", "solarized-dark", "nord", "dracula"]
    }
}

/// Colors a truecolor theme is derived from
struct Palette {
    bg: ThemeColor,
    panel: ThemeColor,
    muted: ThemeColor,
    fg: ThemeColor,
    accent: ThemeColor,
    header: ThemeColor,
    highlight: ThemeColor,
    warning: ThemeColor,
    error: ThemeColor,
}

/// Resolve a theme argument: no argument gives the default dark theme, a built-in
/// name selects that theme, and a path to an existing `.toml` file is loaded.
pub fn resolve_theme(arg: Option<&str>) -> Result<Theme, ThemeError> {
    let Some(name) = arg else {
        return Ok(Theme::default());
    };

    if let Some(theme) = Theme::by_name(name.trim()) {
        return Ok(theme);
    }

    let path = Path::new(name);
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    if is_toml && path.is_file() {
        return Theme::from_file(path);
    }

    Err(ThemeError::Unknown { name: name.to_string() })
}

/// Runtime style manager
pub struct Style {
    pub theme: Theme,
}

impl Style {
    pub fn new() -> Self {
        Self {
            theme: Theme::default(),
        }
    }

    pub fn with_theme(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    // Convenience accessors that return ratatui styles
    pub fn cell(&self) -> RatStyle {
        self.theme.cell.to_ratatui()
    }

    pub fn cell_cursor(&self) -> RatStyle {
        self.theme.cell_cursor.to_ratatui()
    }

    pub fn index_row(&self) -> RatStyle {
        self.theme.index_row.to_ratatui()
    }

    pub fn index_row_cursor(&self) -> RatStyle {
        self.theme.index_row_cursor.to_ratatui()
    }

    pub fn header(&self) -> RatStyle {
        self.theme.header.to_ratatui()
    }

    pub fn row_number(&self) -> RatStyle {
        self.theme.row_number.to_ratatui()
    }

    pub fn row_number_cursor(&self) -> RatStyle {
        self.theme.row_number_cursor.to_ratatui()
    }

    pub fn formula_label(&self) -> RatStyle {
        self.theme.formula_label.to_ratatui()
    }

    pub fn formula_bar(&self, focused: bool) -> RatStyle {
        if focused {
            self.theme.formula_bar_focus.to_ratatui()
        } else {
            self.theme.formula_bar.to_ratatui()
        }
    }

    pub fn status_bar(&self) -> RatStyle {
        self.theme.status_bar.to_ratatui()
    }

    pub fn status_mode(&self, mode: &crate::mode::Mode) -> RatStyle {
        use crate::mode::Mode;
        match mode {
            Mode::Normal => self.theme.status_mode_normal.to_ratatui(),
            Mode::EditCell | Mode::FormulaBar => self.theme.status_mode_edit.to_ratatui(),
            Mode::Command | Mode::Jump => self.theme.status_mode_command.to_ratatui(),
        }
    }

    pub fn status_modified(&self) -> RatStyle {
        self.theme.status_modified.to_ratatui()
    }

    pub fn message(&self, severity: crate::notify::Severity) -> RatStyle {
        use crate::notify::Severity;
        match severity {
            Severity::Info => self.theme.message_info.to_ratatui(),
            Severity::Warning => self.theme.message_warning.to_ratatui(),
            Severity::Error => self.theme.message_error.to_ratatui(),
        }
    }

    pub fn command_line(&self) -> RatStyle {
        self.theme.command_line.to_ratatui()
    }

    pub fn command_prompt(&self) -> RatStyle {
        self.theme.command_prompt.to_ratatui()
    }

    pub fn dialog(&self) -> RatStyle {
        self.theme.dialog.to_ratatui()
    }

    pub fn dialog_border(&self) -> RatStyle {
        self.theme.dialog_border.to_ratatui()
    }

    pub fn background(&self) -> Option<Color> {
        self.theme.background.map(|c| c.into())
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_resolve_default_is_dark() {
        assert_eq!(resolve_theme(None).unwrap().name, "dark");
    }

    #[test]
    fn test_resolve_names_case_insensitive() {
        assert_eq!(resolve_theme(Some("Dark")).unwrap().name, "dark");
        assert_eq!(resolve_theme(Some("LIGHT")).unwrap().name, "light");
        assert_eq!(resolve_theme(Some("Nord")).unwrap().name, "nord");
        assert_eq!(resolve_theme(Some("solarized")).unwrap().name, "solarized-dark");
    }

    #[test]
    fn test_every_builtin_resolves() {
        for name in Theme::builtin_names() {
            assert_eq!(resolve_theme(Some(name)).unwrap().name, *name);
        }
    }

    #[test]
    fn test_resolve_unknown() {
        let err = resolve_theme(Some("invalid-theme")).unwrap_err();
        assert!(matches!(err, ThemeError::Unknown { .. }));
        assert_eq!(err.to_string(), "Theme 'invalid-theme' not found");
    }

    #[test]
    fn test_theme_file_round_trip() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        let mut theme = Theme::nord();
        theme.name = "custom".to_string();
        write!(file, "{}", toml::to_string(&theme).unwrap()).unwrap();

        let path = file.path().to_string_lossy().to_string();
        let loaded = resolve_theme(Some(&path)).unwrap();
        assert_eq!(loaded.name, "custom");
    }

    #[test]
    fn test_theme_file_parse_error() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        write!(file, "name = 3").unwrap();
        let path = file.path().to_string_lossy().to_string();
        assert!(matches!(resolve_theme(Some(&path)), Err(ThemeError::Parse { .. })));
    }

    #[test]
    fn test_color_conversion() {
        assert_eq!(Color::from(ThemeColor::Named(NamedColor::Red)), Color::Red);
        assert_eq!(Color::from(ThemeColor::Rgb([1, 2, 3])), Color::Rgb(1, 2, 3));
        assert_eq!(Color::from(ThemeColor::Indexed(42)), Color::Indexed(42));
    }

    #[test]
    fn test_element_style_modifiers() {
        let style = ElementStyle::fg(ThemeColor::Named(NamedColor::Blue)).with_bold().to_ratatui();
        assert_eq!(style.fg, Some(Color::Blue));
        assert!(style.add_modifier.contains(Modifier::BOLD));
    }
}
