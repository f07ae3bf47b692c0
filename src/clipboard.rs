/// Cell clipboard: an in-process register mirrored to the system clipboard.
/// The register keeps `y`/`p` working in sessions without a clipboard (ssh, CI).
pub struct Clipboard {
    register: Option<String>,
    use_system: bool,
}

impl Clipboard {
    pub fn new() -> Self {
        Self {
            register: None,
            use_system: true,
        }
    }

    /// Register only; never touches the system clipboard
    pub fn local() -> Self {
        Self {
            register: None,
            use_system: false,
        }
    }

    /// Copy a cell's text. The register is always updated; the error reports
    /// only a failure to reach the system clipboard.
    pub fn yank(&mut self, text: &str) -> Result<String, String> {
        self.register = Some(text.to_string());

        if self.use_system {
            copy_to_system_clipboard(text)
                .map_err(|e| format!("Copied locally only: {}", e))?;
        }

        Ok(format!("Copied '{}'", preview(text)))
    }

    /// Text to paste into a cell: the system clipboard when readable, else the register.
    /// Only the first line of multi-line clipboard text is used.
    pub fn paste(&self) -> Result<String, String> {
        let text = if self.use_system {
            paste_from_system_clipboard()
                .ok()
                .or_else(|| self.register.clone())
        } else {
            self.register.clone()
        };

        let text = text.ok_or_else(|| "Nothing to paste".to_string())?;
        Ok(first_line(&text).to_string())
    }
}

impl Default for Clipboard {
    fn default() -> Self {
        Self::new()
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}

/// Short form of `text` for notifications
fn preview(text: &str) -> String {
    const MAX: usize = 20;
    if text.chars().count() > MAX {
        let cut: String = text.chars().take(MAX).collect();
        format!("{}…", cut)
    } else {
        text.to_string()
    }
}

/// Copy text to system clipboard, falling back to command-line tools on Linux
fn copy_to_system_clipboard(text: &str) -> Result<(), String> {
    let arboard_err = match arboard::Clipboard::new().and_then(|mut c| c.set_text(text)) {
        Ok(()) => return Ok(()),
        Err(e) => format!("Clipboard error: {}", e),
    };

    #[cfg(target_os = "linux")]
    {
        use std::io::Write;
        use std::process::{Command, Stdio};

        // Try wl-copy (Wayland) first, then xclip (X11)
        let commands = [
            ("wl-copy", vec![]),
            ("xclip", vec!["-selection", "clipboard"]),
            ("xsel", vec!["--clipboard", "--input"]),
        ];

        for (cmd, args) in commands {
            if let Ok(mut child) = Command::new(cmd)
                .args(&args)
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
            {
                if let Some(mut stdin) = child.stdin.take() {
                    if stdin.write_all(text.as_bytes()).is_ok() {
                        drop(stdin);
                        if child.wait().map(|s| s.success()).unwrap_or(false) {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }

    Err(arboard_err)
}

/// Read text from system clipboard, falling back to command-line tools on Linux
fn paste_from_system_clipboard() -> Result<String, String> {
    let arboard_err = match arboard::Clipboard::new().and_then(|mut c| c.get_text()) {
        Ok(text) => return Ok(text),
        Err(e) => format!("Clipboard error: {}", e),
    };

    #[cfg(target_os = "linux")]
    {
        use std::process::Command;

        let commands = [
            ("wl-paste", vec!["--no-newline"]),
            ("xclip", vec!["-selection", "clipboard", "-o"]),
            ("xsel", vec!["--clipboard", "--output"]),
        ];

        for (cmd, args) in commands {
            if let Ok(output) = Command::new(cmd).args(&args).output() {
                if output.status.success() {
                    return String::from_utf8(output.stdout)
                        .map_err(|_| "Clipboard contains invalid UTF-8".to_string());
                }
            }
        }
    }

    Err(arboard_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paste_empty_register() {
        let clipboard = Clipboard::local();
        assert_eq!(clipboard.paste(), Err("Nothing to paste".to_string()));
    }

    #[test]
    fn test_yank_then_paste() {
        let mut clipboard = Clipboard::local();
        assert_eq!(clipboard.yank("Alice"), Ok("Copied 'Alice'".to_string()));
        assert_eq!(clipboard.paste(), Ok("Alice".to_string()));
    }

    #[test]
    fn test_paste_uses_first_line() {
        let mut clipboard = Clipboard::local();
        clipboard.yank("one\ntwo").unwrap();
        assert_eq!(clipboard.paste(), Ok("one".to_string()));
    }

    #[test]
    fn test_preview_truncates() {
        assert_eq!(preview("short"), "short");
        assert_eq!(preview(&"x".repeat(25)), format!("{}…", "x".repeat(20)));
    }
}
