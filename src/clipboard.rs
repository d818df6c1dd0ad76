// Clipboard seam
// The editor never talks to a system clipboard directly; hosts plug one in

/// Why a clipboard write failed. Both cases leave the editing session intact
/// and the user can simply try again.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClipboardError {
    #[error("clipboard access denied: {0}")]
    Denied(String),
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
}

impl ClipboardError {
    pub fn is_retryable(&self) -> bool {
        match self {
            ClipboardError::Denied(_) | ClipboardError::Unavailable(_) => true,
        }
    }

    /// Message shown to the user next to the copy button
    pub fn user_message(&self) -> &'static str {
        "Could not copy. Select the output and copy it manually (Ctrl+C)."
    }
}

pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// In-process clipboard, handy for tests and headless hosts
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}
