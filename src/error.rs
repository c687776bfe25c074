// ============================================================================
// Error Types
// ============================================================================

/// Errors raised inside the shell.
///
/// None of these cross the bridge: the page only ever sees a transient notice
/// or nothing at all. They exist so the host side can log what happened.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShellError {
    /// Configuration failed validation
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The hosted address could not be parsed
    #[error("invalid hosted url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The UI task queue has no consumer anymore
    #[error("ui task queue is closed")]
    QueueClosed,

    /// Notification channel or notification could not be posted
    #[error("notification error: {0}")]
    Notification(String),

    /// Platform permission service could not be reached
    #[error("permission error: {0}")]
    Permission(String),

    /// Webview history could not be driven
    #[error("navigation error: {0}")]
    Navigation(String),

    /// Main window could not be created or reached
    #[error("window error: {0}")]
    Window(String),
}

impl ShellError {
    /// Text shown to the user when the failure surfaces as a notice
    pub fn user_message(&self) -> String {
        match self {
            ShellError::Notification(_) => "Notification could not be shown".to_string(),
            ShellError::Navigation(_) => "Could not go back".to_string(),
            ShellError::Permission(_) => "Permission could not be requested".to_string(),
            ShellError::InvalidConfig(err) => format!("Invalid configuration: {}", err),
            ShellError::InvalidUrl { url, .. } => format!("Cannot open {}", url),
            ShellError::QueueClosed | ShellError::Window(_) => {
                "The application is shutting down.".to_string()
            }
        }
    }
}

impl From<ShellError> for String {
    fn from(err: ShellError) -> Self {
        err.to_string()
    }
}
