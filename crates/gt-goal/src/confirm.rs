// confirm.rs — ConfirmationChannel: yes/no prompt before destructive actions.
//
// The store never deletes a goal on its own say-so. It asks a
// ConfirmationChannel, which may be a terminal prompt, a dialog in some
// other front end, or a fixed answer in tests.

/// Errors from a ConfirmationChannel.
#[derive(Debug, thiserror::Error)]
pub enum ConfirmError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("channel closed")]
    ChannelClosed,
}

/// What to ask the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub title: String,
    pub message: String,
}

impl ConfirmPrompt {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    /// Prompt shown before a goal is deleted.
    pub fn delete_goal() -> Self {
        Self::new("Delete Goal", "Are you sure you want to delete this goal?")
    }
}

/// A medium that can put a yes/no question to the user.
pub trait ConfirmationChannel: Send + Sync {
    /// Ask the question and wait for the answer. `Ok(true)` means proceed.
    fn confirm(&self, prompt: &ConfirmPrompt) -> Result<bool, ConfirmError>;
}

/// A channel that always gives the same answer without asking anyone.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl AutoConfirm {
    pub fn yes() -> Self {
        Self(true)
    }

    pub fn no() -> Self {
        Self(false)
    }
}

impl ConfirmationChannel for AutoConfirm {
    fn confirm(&self, _prompt: &ConfirmPrompt) -> Result<bool, ConfirmError> {
        Ok(self.0)
    }
}
