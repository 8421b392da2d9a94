//! Use-case services behind each screen.
//!
//! # Responsibility
//! - Validate form input locally before any network call.
//! - Orchestrate gateway calls into one use-case per entry point.
//! - Return the navigation event the caller should dispatch next.
//!
//! # Invariants
//! - Validation failures never reach the gateway.
//! - Services never navigate; they only report `NavEvent`s.

pub mod auth_service;
pub mod compatibility_service;
pub mod friend_service;
pub mod profile_service;

use crate::gateway::ApiError;
use crate::model::friend::FriendId;
use crate::model::ValidationError;
use crate::navigation::NavEvent;
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// User-initiated action a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Login,
    Register,
    GoogleSignIn,
    CreateProfile,
    UpdateProfile,
    LoadFriend,
    SaveFriend,
    DeleteFriend,
    LoadDashboard,
    LoadCompatibility,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Register => "register",
            Self::GoogleSignIn => "google_sign_in",
            Self::CreateProfile => "create_profile",
            Self::UpdateProfile => "update_profile",
            Self::LoadFriend => "load_friend",
            Self::SaveFriend => "save_friend",
            Self::DeleteFriend => "delete_friend",
            Self::LoadDashboard => "load_dashboard",
            Self::LoadCompatibility => "load_compatibility",
        }
    }

    /// Alert shown when a form for this action has empty fields.
    fn validation_message(self) -> &'static str {
        match self {
            Self::SaveFriend | Self::LoadFriend => "Please fill in all required fields",
            _ => "Please fill in all fields",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            Self::Login => "Invalid email or password",
            Self::Register => "Registration failed",
            Self::GoogleSignIn => "Google sign-in failed",
            Self::CreateProfile => "Failed to create profile",
            Self::UpdateProfile => "Failed to update profile",
            Self::LoadFriend => "Failed to load friend data",
            Self::SaveFriend => "Failed to save friend",
            Self::DeleteFriend => "Failed to delete friend",
            Self::LoadDashboard => "Failed to load data",
            Self::LoadCompatibility => "Failed to load compatibility",
        }
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{} rejected: {source}", .action.as_str())]
    Validation {
        action: Action,
        #[source]
        source: ValidationError,
    },
    #[error("{} failed: {source}", .action.as_str())]
    Api {
        action: Action,
        #[source]
        source: ApiError,
    },
    #[error("friend not found: {0}")]
    FriendNotFound(FriendId),
}

impl ServiceError {
    pub(crate) fn invalid(action: Action) -> impl FnOnce(ValidationError) -> Self {
        move |source| Self::Validation { action, source }
    }

    pub(crate) fn api(action: Action) -> impl FnOnce(ApiError) -> Self {
        move |source| Self::Api { action, source }
    }

    /// Message suitable for an alert; never includes backend detail.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Validation { action, .. } => action.validation_message(),
            Self::Api {
                action: Action::Login,
                ..
            } => Action::Login.failure_message(),
            Self::Api {
                source: ApiError::Unauthorized,
                ..
            } => "Invalid credentials. Please sign in again.",
            Self::Api { action, .. } => action.failure_message(),
            Self::FriendNotFound(_) => Action::LoadFriend.failure_message(),
        }
    }

    /// Event to dispatch when the failure ended the session.
    pub fn nav_event(&self) -> Option<NavEvent> {
        match self {
            Self::Api {
                action,
                source: ApiError::Unauthorized,
            } if *action != Action::Login => Some(NavEvent::SessionExpired),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Action, ServiceError};
    use crate::gateway::ApiError;
    use crate::model::ValidationError;
    use crate::navigation::NavEvent;

    #[test]
    fn user_messages_follow_error_taxonomy() {
        let missing = ValidationError::MissingField("full_name");
        let profile = ServiceError::invalid(Action::CreateProfile)(missing.clone());
        assert_eq!(profile.user_message(), "Please fill in all fields");
        let login = ServiceError::invalid(Action::Login)(missing.clone());
        assert_eq!(login.user_message(), "Please fill in all fields");
        let friend = ServiceError::invalid(Action::SaveFriend)(missing);
        assert_eq!(friend.user_message(), "Please fill in all required fields");
        assert_eq!(friend.nav_event(), None);

        let login = ServiceError::api(Action::Login)(ApiError::Status { status: 500 });
        assert_eq!(login.user_message(), "Invalid email or password");

        let expired = ServiceError::api(Action::SaveFriend)(ApiError::Unauthorized);
        assert_eq!(
            expired.user_message(),
            "Invalid credentials. Please sign in again."
        );
        assert_eq!(expired.nav_event(), Some(NavEvent::SessionExpired));

        let server = ServiceError::api(Action::CreateProfile)(ApiError::Status { status: 503 });
        assert_eq!(server.user_message(), "Failed to create profile");
        assert_eq!(server.nav_event(), None);
    }
}
