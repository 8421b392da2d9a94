//! Client core for the Starspace compatibility app.
//! Shells (Flutter, web, CLI) render screens; this crate owns the logic.

pub mod bootstrap;
pub mod config;
pub mod date_input;
pub mod db;
pub mod gateway;
pub mod logging;
pub mod model;
pub mod navigation;
pub mod service;
pub mod session;

pub use bootstrap::bootstrap;
pub use config::{ClientConfig, ConfigError};
pub use date_input::{
    parse_text_date, select_from_picker, DateEntry, DateEntryKind, DateField, DateInputError,
    MaximumDate, Platform,
};
pub use gateway::{ApiClient, ApiError, ApiResult, HttpTransport, ReqwestTransport};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::compatibility::{Compatibility, CompatibilityScores, Dimension, Grade};
pub use model::friend::{Friend, FriendDraft, FriendId};
pub use model::personality::{EnneagramType, MbtiType};
pub use model::profile::{Profile, ProfileDraft};
pub use model::user::{Credentials, GoogleAuthPayload, TokenResponse, User};
pub use model::ValidationError;
pub use navigation::{AuthState, NavError, NavEvent, Route, Router};
pub use service::auth_service::AuthService;
pub use service::compatibility_service::{CompatibilityService, Dashboard};
pub use service::friend_service::FriendService;
pub use service::profile_service::ProfileService;
pub use service::{Action, ServiceError, ServiceResult};
pub use session::{
    CredentialStore, MemoryCredentialStore, Session, SqliteCredentialStore, StoreError,
};

/// Production client: `reqwest` transport and SQLite-persisted credential.
pub type AppClient = ApiClient<ReqwestTransport, SqliteCredentialStore>;

/// Builds the production client from configuration, restoring any
/// persisted credential.
pub fn open_client(config: ClientConfig) -> Result<AppClient, String> {
    let transport = ReqwestTransport::new(config.request_timeout)
        .map_err(|err| format!("http client init failed: {err}"))?;
    let store = SqliteCredentialStore::open(&config.db_path)
        .map_err(|err| format!("credential store open failed: {err}"))?;
    Ok(ApiClient::new(config, transport, Session::restore(store)))
}

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
