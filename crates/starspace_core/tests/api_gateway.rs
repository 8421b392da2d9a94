mod support;

use serde_json::json;
use starspace_core::gateway::{HttpMethod, RequestBody};
use starspace_core::{
    ApiClient, ApiError, ClientConfig, CredentialStore, Credentials, MemoryCredentialStore,
    Session,
};
use support::{client, compatibility_json, friend_json, user_json, FakeTransport};

#[test]
fn login_posts_form_fields_and_persists_token() {
    let transport = FakeTransport::new();
    transport.reply_json(200, json!({ "access_token": "tok-1", "token_type": "bearer" }));
    let store = MemoryCredentialStore::default();
    let mut client = client(&transport, &store);

    let token = client
        .login(&Credentials::new("ada@example.com", "hunter2"))
        .expect("login");
    assert_eq!(token.access_token, "tok-1");
    assert_eq!(store.load().expect("load"), Some("tok-1".to_string()));

    let (url, request) = &transport.sent()[0];
    assert_eq!(url, "http://api.starspace.test/auth/login");
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.bearer, None);
    assert_eq!(
        request.body,
        RequestBody::Form(vec![
            ("username".to_string(), "ada@example.com".to_string()),
            ("password".to_string(), "hunter2".to_string()),
        ])
    );
}

#[test]
fn login_rejection_is_invalid_credentials_and_keeps_store() {
    let transport = FakeTransport::new();
    transport.reply_status(401);
    let store = MemoryCredentialStore::with_credential("previous");
    let mut client = client(&transport, &store);

    let err = client
        .login(&Credentials::new("ada@example.com", "wrong"))
        .expect_err("login should fail");
    assert!(matches!(err, ApiError::InvalidCredentials));
    assert_eq!(store.load().expect("load"), Some("previous".to_string()));
}

#[test]
fn register_sends_json_and_stores_token() {
    let transport = FakeTransport::new();
    transport.reply_json(201, json!({ "access_token": "fresh" }));
    let store = MemoryCredentialStore::default();
    let mut client = client(&transport, &store);

    let token = client
        .register(&Credentials::new("new@example.com", "pw"))
        .expect("register");
    assert_eq!(token.token_type, "bearer");
    assert_eq!(client.session().credential(), Some("fresh"));

    let (_, request) = &transport.sent()[0];
    assert_eq!(request.path, "/auth/register");
    assert_eq!(
        request.body,
        RequestBody::Json(json!({ "email": "new@example.com", "password": "pw" }))
    );
}

#[test]
fn unauthorized_response_clears_credential_everywhere() {
    let transport = FakeTransport::new();
    transport.reply_status(401);
    let store = MemoryCredentialStore::with_credential("stale");
    let mut client = client(&transport, &store);

    let err = client.list_friends().expect_err("401");
    assert!(matches!(err, ApiError::Unauthorized));
    assert!(err.is_auth_failure());
    assert_eq!(client.session().credential(), None);
    assert_eq!(store.load().expect("load"), None);
}

#[test]
fn other_failures_surface_status_and_keep_credential() {
    let transport = FakeTransport::new();
    transport.reply_status(500).reply_status(403);
    let store = MemoryCredentialStore::with_credential("good");
    let mut client = client(&transport, &store);

    assert!(matches!(
        client.all_compatibilities(),
        Err(ApiError::Status { status: 500 })
    ));
    assert!(matches!(
        client.get_compatibility("f-1"),
        Err(ApiError::Status { status: 403 })
    ));
    assert_eq!(store.load().expect("load"), Some("good".to_string()));
}

#[test]
fn transport_failure_is_reported_without_retry() {
    let transport = FakeTransport::new();
    transport.fail("timed out").reply_json(200, json!([]));
    let store = MemoryCredentialStore::with_credential("good");
    let mut client = client(&transport, &store);

    assert!(matches!(client.list_friends(), Err(ApiError::Transport(_))));
    assert_eq!(transport.sent().len(), 1);
    assert_eq!(transport.remaining(), 1);
}

#[test]
fn friend_crud_uses_resource_paths() {
    let transport = FakeTransport::new();
    transport
        .reply_json(200, json!([friend_json("f-1", "Grace Hopper")]))
        .reply_json(200, friend_json("f-1", "Grace B. Hopper"))
        .reply_status(204);
    let store = MemoryCredentialStore::with_credential("good");
    let mut client = client(&transport, &store);

    let friends = client.list_friends().expect("list");
    assert_eq!(friends.len(), 1);

    let draft = starspace_core::FriendDraft::from(&friends[0]);
    let updated = client
        .update_friend("f-1", &draft.to_payload())
        .expect("update");
    assert_eq!(updated.full_name, "Grace B. Hopper");

    client.delete_friend("f-1").expect("delete with empty body");

    assert_eq!(
        transport.paths(),
        vec!["GET /friends", "PUT /friends/f-1", "DELETE /friends/f-1"]
    );
}

#[test]
fn compatibility_payload_decodes_scores_and_analysis() {
    let transport = FakeTransport::new();
    transport.reply_json(200, compatibility_json("f-9", 86.0));
    let store = MemoryCredentialStore::with_credential("good");
    let mut client = client(&transport, &store);

    let compatibility = client.get_compatibility("f-9").expect("compatibility");
    assert_eq!(compatibility.friend.id, "f-9");
    assert_eq!(compatibility.grade().as_str(), "A");
    assert_eq!(
        compatibility.analysis.as_deref(),
        Some("Strong working partnership.")
    );
    assert_eq!(transport.paths(), vec!["GET /compatibility/f-9"]);
}

#[test]
fn unauthenticated_requests_carry_no_bearer() {
    let transport = FakeTransport::new();
    transport.reply_status(401);
    let store = MemoryCredentialStore::default();
    let mut client = client(&transport, &store);

    assert!(client.me().is_err());
    assert_eq!(transport.sent()[0].1.bearer, None);
}

#[test]
fn friend_ids_are_sent_as_single_encoded_segments() {
    let transport = FakeTransport::new();
    transport.reply_status(204);
    let store = MemoryCredentialStore::with_credential("good");
    let mut client = client(&transport, &store);

    client.delete_friend("a/b c").expect("delete");
    assert_eq!(
        transport.sent()[0].0,
        "http://api.starspace.test/friends/a%2Fb%20c"
    );
    assert_eq!(transport.paths(), vec!["DELETE /friends/a%2Fb%20c"]);
}

#[test]
fn base_url_path_prefixes_every_endpoint() {
    let transport = FakeTransport::new();
    transport.reply_json(200, user_json());
    let store = MemoryCredentialStore::with_credential("good");
    let config = ClientConfig::with_api_url("http://api.starspace.test/v1/").expect("base url");
    let mut client = ApiClient::new(config, transport.clone(), Session::restore(store));

    client.me().expect("me");
    assert_eq!(transport.sent()[0].0, "http://api.starspace.test/v1/auth/me");
}
