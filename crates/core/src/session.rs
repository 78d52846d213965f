//! Authenticated-actor types.
//!
//! [`Session`] is the persisted, loosely-typed shape (every field optional,
//! camelCase on the wire) and [`AuthState`] is the explicit in-memory state
//! the session store works with. Converting a stored `Session` into an
//! `AuthState` applies the hydration policy: a session counts as logged in
//! only when it carries a non-empty token **and** a user.

use serde::{Deserialize, Serialize};

use crate::roles::Role;

/// Minimal identity attached to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

impl SessionUser {
    pub fn new(email: impl Into<String>, role: Role) -> Self {
        Self {
            email: email.into(),
            role,
        }
    }
}

/// Persisted session record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<SessionUser>,
}

impl Session {
    /// The cleared session written on logout.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Apply the hydration policy and produce the tagged state.
    pub fn into_state(self) -> AuthState {
        match (self.token, self.user) {
            (Some(token), Some(user)) if !token.is_empty() => AuthState::LoggedIn {
                token,
                refresh_token: self.refresh_token.filter(|t| !t.is_empty()),
                user,
            },
            _ => AuthState::LoggedOut,
        }
    }
}

/// Explicit authentication state held by the session store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    #[default]
    LoggedOut,
    LoggedIn {
        token: String,
        refresh_token: Option<String>,
        user: SessionUser,
    },
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::LoggedIn { .. })
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            Self::LoggedIn { token, .. } => Some(token),
            Self::LoggedOut => None,
        }
    }

    pub fn user(&self) -> Option<&SessionUser> {
        match self {
            Self::LoggedIn { user, .. } => Some(user),
            Self::LoggedOut => None,
        }
    }

    /// Persistable form of this state. `LoggedOut` yields an empty session.
    pub fn to_session(&self) -> Session {
        match self {
            Self::LoggedOut => Session::empty(),
            Self::LoggedIn {
                token,
                refresh_token,
                user,
            } => Session {
                token: Some(token.clone()),
                refresh_token: refresh_token.clone(),
                user: Some(user.clone()),
            },
        }
    }
}
