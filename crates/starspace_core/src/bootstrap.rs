//! Launch-time session bootstrap.
//!
//! # Responsibility
//! - Decide the initial `AuthState` from the persisted credential, the
//!   backend's view of it and the existence of a profile.
//!
//! # Invariants
//! - Never fails: every error resolves to `Unauthenticated`.
//! - No persisted credential means no network traffic.
//! - A credential that fails validation is removed from storage.
//! - `Unauthenticated` always leaves the client without an in-memory
//!   credential, so login screens never send a stale bearer.

use crate::gateway::{ApiClient, HttpTransport};
use crate::navigation::AuthState;
use crate::session::CredentialStore;
use log::{info, warn};
use std::time::Instant;

/// Evaluates the auth state once, at launch.
pub fn bootstrap<T: HttpTransport, S: CredentialStore>(client: &mut ApiClient<T, S>) -> AuthState {
    let started_at = Instant::now();
    info!("event=bootstrap module=bootstrap status=start");

    let state = resolve(client);

    info!(
        "event=bootstrap module=bootstrap status=ok state={} duration_ms={}",
        state.as_str(),
        started_at.elapsed().as_millis()
    );
    state
}

fn resolve<T: HttpTransport, S: CredentialStore>(client: &mut ApiClient<T, S>) -> AuthState {
    if !client.session().is_authenticated() {
        return AuthState::Unauthenticated;
    }

    if let Err(err) = client.me() {
        warn!(
            "event=bootstrap module=bootstrap status=error stage=validate_credential error={err}"
        );
        // A 401 has already cleared the session; other failures have not.
        let _ = client.session_mut().clear();
        return AuthState::Unauthenticated;
    }

    match client.get_profile() {
        Ok(profile) => AuthState::derive(true, profile.is_some()),
        Err(err) => {
            warn!("event=bootstrap module=bootstrap status=error stage=fetch_profile error={err}");
            // The credential itself was accepted; keep it on disk for the next launch.
            client.session_mut().forget();
            AuthState::Unauthenticated
        }
    }
}
