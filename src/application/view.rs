//! Shared view states for list and detail screens.
//!
//! Every screen renders one of four mutually exclusive states. Loaders build
//! a [`ViewState`] from their fetch result instead of propagating errors, and
//! one-shot commands report a [`Notice`].

use serde::Serialize;

use crate::error::Result;
use crate::port::Page;

/// What a screen shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum ViewState<T> {
    Loading,
    Failed { message: String },
    Empty { hint: String },
    Ready(T),
}

impl<T> ViewState<T> {
    /// Failed with the error's display text, or Ready.
    pub fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(err) => Self::Failed {
                message: err.display_message(),
            },
        }
    }

    /// Like [`ViewState::from_result`], but an empty collection becomes
    /// `Empty` with the given hint.
    pub fn from_list(result: Result<T>, is_empty: impl FnOnce(&T) -> bool, hint: &str) -> Self {
        match result {
            Ok(value) if is_empty(&value) => Self::Empty {
                hint: hint.to_string(),
            },
            other => Self::from_result(other),
        }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    #[must_use]
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ViewState<U> {
        match self {
            Self::Loading => ViewState::Loading,
            Self::Failed { message } => ViewState::Failed { message },
            Self::Empty { hint } => ViewState::Empty { hint },
            Self::Ready(value) => ViewState::Ready(f(value)),
        }
    }
}

impl<T> ViewState<Page<T>> {
    /// Build from a page fetch; no rows means `Empty`.
    pub fn from_page(result: Result<Page<T>>, hint: &str) -> Self {
        Self::from_list(result, Page::is_empty, hint)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient outcome of a command, shown once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Success with the backend's message, falling back to `done`.
    pub fn from_result<T>(
        result: Result<T>,
        done: &str,
        message_of: impl FnOnce(&T) -> Option<String>,
    ) -> Self {
        match result {
            Ok(value) => Self::success(message_of(&value).unwrap_or_else(|| done.to_string())),
            Err(err) => Self::error(err.display_message()),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.level == NoticeLevel::Success
    }
}
