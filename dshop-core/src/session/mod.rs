//! Authentication state.
//!
//! The signed-in user and their bearer token live in an explicit
//! [`AuthContext`] that is created once at startup from persisted storage
//! and handed to every component that needs it.

mod context;
mod storage;

pub use context::{AuthContext, SessionWatcher};
pub use storage::{FileSessionStorage, MemorySessionStorage, SessionStorage};

use dshop_sdk::client::ClientError;
use dshop_sdk::objects::{Role, User};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validation::ValidationError;

/// Persisted authentication state: the token plus minimal user info.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub email: String,
    #[serde(default)]
    pub user: Option<User>,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.role == Role::Admin)
    }

    pub fn display_name(&self) -> &str {
        self.user
            .as_ref()
            .map(User::display_name)
            .unwrap_or("Customer")
    }
}

/// Errors produced by the auth context.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("request failed: {0}")]
    Client(#[from] ClientError),

    #[error("session storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt session file: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("you need to be logged in")]
    NotAuthenticated,

    #[error("administrator access required")]
    NotAdmin,
}

impl SessionError {
    /// Inline or banner text for the login/register forms.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            SessionError::Validation(e) => e.to_string(),
            SessionError::Client(e) => e.banner_message(fallback),
            SessionError::NotAuthenticated | SessionError::NotAdmin => self.to_string(),
            SessionError::Io(_) | SessionError::Corrupt(_) => fallback.to_owned(),
        }
    }
}
