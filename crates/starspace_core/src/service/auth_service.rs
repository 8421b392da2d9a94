//! Sign-in, registration and sign-out use-cases.
//!
//! # Invariants
//! - Successful sign-in always reports whether a profile exists, so the
//!   router can pick ProfileSetup or Dashboard.
//! - Sign-out always succeeds from the caller's point of view.

use super::{Action, ServiceError, ServiceResult};
use crate::gateway::{ApiClient, HttpTransport};
use crate::model::user::{Credentials, GoogleAuthPayload};
use crate::navigation::NavEvent;
use crate::session::CredentialStore;
use log::{info, warn};

pub struct AuthService<'c, T: HttpTransport, S: CredentialStore> {
    client: &'c mut ApiClient<T, S>,
}

impl<'c, T: HttpTransport, S: CredentialStore> AuthService<'c, T, S> {
    pub fn new(client: &'c mut ApiClient<T, S>) -> Self {
        Self { client }
    }

    /// Email/password sign-in followed by a profile existence check.
    pub fn login(&mut self, credentials: &Credentials) -> ServiceResult<NavEvent> {
        credentials
            .validate()
            .map_err(ServiceError::invalid(Action::Login))?;

        self.client
            .login(credentials)
            .map_err(ServiceError::api(Action::Login))?;
        let has_profile = self.profile_exists(Action::Login)?;

        info!("event=login module=auth status=ok has_profile={has_profile}");
        Ok(NavEvent::LoggedIn { has_profile })
    }

    /// Creates an account; a new account never has a profile yet.
    pub fn register(&mut self, credentials: &Credentials) -> ServiceResult<NavEvent> {
        credentials
            .validate()
            .map_err(ServiceError::invalid(Action::Register))?;

        self.client
            .register(credentials)
            .map_err(ServiceError::api(Action::Register))?;

        info!("event=register module=auth status=ok");
        Ok(NavEvent::Registered)
    }

    /// Exchanges provider identity data for a backend credential.
    pub fn google_sign_in(&mut self, payload: &GoogleAuthPayload) -> ServiceResult<NavEvent> {
        self.client
            .google_auth(payload)
            .map_err(ServiceError::api(Action::GoogleSignIn))?;
        let has_profile = self.profile_exists(Action::GoogleSignIn)?;

        info!("event=google_sign_in module=auth status=ok has_profile={has_profile}");
        Ok(NavEvent::LoggedIn { has_profile })
    }

    /// Drops the local credential.
    pub fn logout(&mut self) -> NavEvent {
        if let Err(err) = self.client.logout() {
            warn!("event=logout module=auth status=error error={err}");
        } else {
            info!("event=logout module=auth status=ok");
        }
        NavEvent::LoggedOut
    }

    fn profile_exists(&mut self, action: Action) -> ServiceResult<bool> {
        self.client
            .get_profile()
            .map(|profile| profile.is_some())
            .map_err(ServiceError::api(action))
    }
}
