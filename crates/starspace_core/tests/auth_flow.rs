mod support;

use serde_json::json;
use starspace_core::{
    Action, AuthService, AuthState, CredentialStore, Credentials, GoogleAuthPayload,
    MemoryCredentialStore, NavEvent, ProfileDraft, ProfileService, Route, Router, ServiceError,
    ValidationError,
};
use support::{client, profile_json, FakeTransport};

#[test]
fn empty_login_fields_never_reach_network() {
    let transport = FakeTransport::new();
    let store = MemoryCredentialStore::default();
    let mut client = client(&transport, &store);

    let err = AuthService::new(&mut client)
        .login(&Credentials::new("ada@example.com", " "))
        .expect_err("blank password");
    assert!(matches!(
        err,
        ServiceError::Validation {
            action: Action::Login,
            source: ValidationError::MissingField("password"),
        }
    ));
    assert_eq!(err.user_message(), "Please fill in all fields");
    assert!(transport.sent().is_empty());
}

#[test]
fn login_without_profile_routes_to_profile_setup_then_dashboard() {
    let transport = FakeTransport::new();
    transport
        .reply_json(200, json!({ "access_token": "tok" }))
        .reply_status(404)
        .reply_json(200, profile_json());
    let store = MemoryCredentialStore::default();
    let mut client = client(&transport, &store);
    let mut router = Router::new();
    router
        .dispatch(NavEvent::Bootstrapped(AuthState::Unauthenticated))
        .expect("bootstrap");

    let event = AuthService::new(&mut client)
        .login(&Credentials::new("ada@example.com", "pw"))
        .expect("login");
    assert_eq!(event, NavEvent::LoggedIn { has_profile: false });
    assert_eq!(router.dispatch(event).expect("route"), &Route::ProfileSetup);

    let draft = ProfileDraft {
        full_name: "Ada Lovelace".to_string(),
        place_of_birth: "London".to_string(),
        time_of_birth: "1:00 PM".to_string(),
        ..ProfileDraft::default()
    };
    let event = ProfileService::new(&mut client)
        .create(&draft)
        .expect("create profile");
    assert_eq!(router.dispatch(event).expect("route"), &Route::Dashboard);
    assert_eq!(
        transport.paths(),
        vec!["POST /auth/login", "GET /users/profile", "POST /users/profile"]
    );
}

#[test]
fn failed_login_reports_generic_message() {
    let transport = FakeTransport::new();
    transport.reply_status(400);
    let store = MemoryCredentialStore::default();
    let mut client = client(&transport, &store);

    let err = AuthService::new(&mut client)
        .login(&Credentials::new("ada@example.com", "nope"))
        .expect_err("rejected");
    assert_eq!(err.user_message(), "Invalid email or password");
    assert_eq!(err.nav_event(), None);
}

#[test]
fn google_sign_in_posts_payload_and_checks_profile() {
    let transport = FakeTransport::new();
    transport
        .reply_json(200, json!({ "access_token": "g-tok" }))
        .reply_json(200, profile_json());
    let store = MemoryCredentialStore::default();
    let mut client = client(&transport, &store);

    let payload = GoogleAuthPayload {
        email: "ada@example.com".to_string(),
        google_id: "g-123".to_string(),
        name: Some("Ada".to_string()),
        picture: None,
    };
    let event = AuthService::new(&mut client)
        .google_sign_in(&payload)
        .expect("google");
    assert_eq!(event, NavEvent::LoggedIn { has_profile: true });
    assert_eq!(store.load().expect("load"), Some("g-tok".to_string()));
    assert_eq!(transport.paths()[0], "POST /auth/google");
}

#[test]
fn register_then_logout() {
    let transport = FakeTransport::new();
    transport.reply_json(200, json!({ "access_token": "new" }));
    let store = MemoryCredentialStore::default();
    let mut client = client(&transport, &store);

    let mut auth = AuthService::new(&mut client);
    assert_eq!(
        auth.register(&Credentials::new("new@example.com", "pw"))
            .expect("register"),
        NavEvent::Registered
    );
    assert_eq!(store.load().expect("load"), Some("new".to_string()));

    assert_eq!(auth.logout(), NavEvent::LoggedOut);
    assert_eq!(store.load().expect("load"), None);
}

#[test]
fn profile_validation_blocks_submission() {
    let transport = FakeTransport::new();
    let store = MemoryCredentialStore::with_credential("tok");
    let mut client = client(&transport, &store);

    let err = ProfileService::new(&mut client)
        .create(&ProfileDraft::default())
        .expect_err("empty form");
    assert_eq!(err.user_message(), "Please fill in all fields");
    assert!(transport.sent().is_empty());
}

#[test]
fn profile_load_returns_none_when_missing() {
    let transport = FakeTransport::new();
    transport.reply_status(404).reply_json(200, profile_json());
    let store = MemoryCredentialStore::with_credential("tok");
    let mut client = client(&transport, &store);
    let mut profiles = ProfileService::new(&mut client);

    assert_eq!(profiles.load().expect("missing profile"), None);
    let draft = profiles
        .load_draft()
        .expect("existing profile")
        .expect("draft");
    assert_eq!(draft.full_name, "Ada Lovelace");
    assert_eq!(draft.place_of_birth, "London, UK");
}
