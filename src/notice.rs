use rfd::{MessageButtons, MessageDialog, MessageLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Modal message shown to the user at the end of an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub title: &'static str,
    pub message: String,
}

impl Notice {
    pub fn info(title: &'static str, message: impl Into<String>) -> Self {
        Notice { severity: Severity::Info, title, message: message.into() }
    }

    pub fn warning(title: &'static str, message: impl Into<String>) -> Self {
        Notice { severity: Severity::Warning, title, message: message.into() }
    }

    pub fn error(title: &'static str, message: impl Into<String>) -> Self {
        Notice { severity: Severity::Error, title, message: message.into() }
    }

    pub fn no_region() -> Self {
        Notice::warning("Warning", "No region selected.")
    }

    /// Blocks until the user dismisses it.
    pub fn show(&self) {
        let level = match self.severity {
            Severity::Info => MessageLevel::Info,
            Severity::Warning => MessageLevel::Warning,
            Severity::Error => MessageLevel::Error,
        };
        MessageDialog::new()
            .set_level(level)
            .set_title(self.title)
            .set_description(&self.message)
            .set_buttons(MessageButtons::Ok)
            .show();
    }
}
