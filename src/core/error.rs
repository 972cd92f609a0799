use thiserror::Error;

use crate::features::categories::models::CategoryLevel;

/// The remote call an error belongs to; picks the banner shown for transport failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::Fetch => "Failed to fetch categories. Please try again.",
            Operation::Create | Operation::Update => "Failed to save category. Please try again.",
            Operation::Delete => "Failed to delete category. Please try again.",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Fetch => "fetch",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

/// Problems caught locally, before anything is sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Category name is required")]
    EmptyName,

    #[error("Category name must not exceed {max} characters")]
    NameTooLong { max: usize },

    #[error("A {level} category requires a parent category")]
    MissingParent { level: CategoryLevel },

    #[error("Parent category '{0}' does not exist")]
    ParentNotFound(String),

    #[error("Parent of a {level} category must be a {expected} category, got {actual}")]
    ParentLevelMismatch {
        level: CategoryLevel,
        expected: CategoryLevel,
        actual: CategoryLevel,
    },

    #[error("Cannot delete category that has subcategories. Please delete subcategories first.")]
    HasChildren { count: usize },

    #[error("Category '{0}' not found")]
    NotFound(String),

    #[error("Invalid category level: {0}")]
    InvalidLevel(u8),

    #[error("Invalid category: {0}")]
    InvalidPayload(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{}", .operation.failure_message())]
    Transport { operation: Operation, detail: String },

    #[error("{message}")]
    Backend { status: u16, message: String },

    #[error("{message}")]
    Auth { status: u16, message: String },
}

impl AppError {
    pub fn transport(operation: Operation, detail: impl Into<String>) -> Self {
        AppError::Transport {
            operation,
            detail: detail.into(),
        }
    }

    /// True when the error was raised without touching the network.
    pub fn is_local(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Backend { status, .. } | AppError::Auth { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
