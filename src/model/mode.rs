/// Application interaction modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Navigation and commands.
    #[default]
    Normal,
    /// Text editing; people suggestions pop up here.
    Insert,
    /// Command line (`:` prefix).
    Command,
    /// Full-screen explanation of a diagnostic suggestion.
    Diagnostic,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Insert => "INSERT",
            Mode::Command => "COMMAND",
            Mode::Diagnostic => "ERROR",
        }
    }
}
