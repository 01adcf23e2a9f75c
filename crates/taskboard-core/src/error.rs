use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskboardError {
    /// Drag ended without a usable drop target, or was dropped onto itself.
    #[error("Invalid gesture: {0}")]
    InvalidGesture(String),

    #[error("Task {task_id} changed since the drag started")]
    StaleSnapshot { task_id: String },

    #[error("Task {task_id} already has a move in flight")]
    MoveInFlight { task_id: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TaskboardError {
    /// Whether the failure should reach the notification sink.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, Self::InvalidGesture(_))
    }

    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}
