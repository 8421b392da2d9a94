mod support;

use serde_json::json;
use starspace_core::gateway::RequestBody;
use starspace_core::{
    CompatibilityService, FriendDraft, FriendService, MemoryCredentialStore, NavEvent,
    ServiceError,
};
use support::{client, compatibility_json, friend_json, FakeTransport};

fn filled_draft() -> FriendDraft {
    FriendDraft {
        full_name: "Alan Turing".to_string(),
        place_of_birth: "London".to_string(),
        time_of_birth: "noon".to_string(),
        notes: "Met at Bletchley".to_string(),
        ..FriendDraft::default()
    }
}

#[test]
fn new_friend_is_created_with_post() {
    let transport = FakeTransport::new();
    transport.reply_json(201, friend_json("f-2", "Alan Turing"));
    let store = MemoryCredentialStore::with_credential("tok");
    let mut client = client(&transport, &store);

    let event = FriendService::new(&mut client)
        .save(None, &filled_draft())
        .expect("create");
    assert_eq!(event, NavEvent::FriendSaved);

    let (_, request) = &transport.sent()[0];
    assert_eq!(request.path, "/friends");
    match &request.body {
        RequestBody::Json(body) => {
            assert_eq!(body["full_name"], "Alan Turing");
            assert_eq!(body["notes"], "Met at Bletchley");
        }
        other => panic!("unexpected body: {other:?}"),
    }
}

#[test]
fn editing_loads_from_list_and_updates_by_id() {
    let transport = FakeTransport::new();
    transport
        .reply_json(
            200,
            json!([
                friend_json("f-1", "Grace Hopper"),
                friend_json("f-2", "Alan Turing")
            ]),
        )
        .reply_json(200, friend_json("f-2", "Alan M. Turing"));
    let store = MemoryCredentialStore::with_credential("tok");
    let mut client = client(&transport, &store);
    let mut friends = FriendService::new(&mut client);

    let (friend, mut draft) = friends.load_for_edit("f-2").expect("load");
    assert_eq!(friend.full_name, "Alan Turing");
    draft.full_name = "Alan M. Turing".to_string();

    friends.save(Some(friend.id.as_str()), &draft).expect("update");
    assert_eq!(transport.paths(), vec!["GET /friends", "PUT /friends/f-2"]);
}

#[test]
fn editing_unknown_friend_is_not_found() {
    let transport = FakeTransport::new();
    transport.reply_json(200, json!([friend_json("f-1", "Grace Hopper")]));
    let store = MemoryCredentialStore::with_credential("tok");
    let mut client = client(&transport, &store);

    let err = FriendService::new(&mut client)
        .load_for_edit("missing")
        .expect_err("not found");
    assert!(matches!(err, ServiceError::FriendNotFound(ref id) if id == "missing"));
    assert_eq!(err.user_message(), "Failed to load friend data");
}

#[test]
fn session_expiry_during_save_requests_login() {
    let transport = FakeTransport::new();
    transport.reply_status(401);
    let store = MemoryCredentialStore::with_credential("tok");
    let mut client = client(&transport, &store);

    let err = FriendService::new(&mut client)
        .save(None, &filled_draft())
        .expect_err("expired");
    assert_eq!(err.nav_event(), Some(NavEvent::SessionExpired));
    assert!(!client.session().is_authenticated());
}

#[test]
fn dashboard_loads_friends_and_ranks_compatibilities() {
    let transport = FakeTransport::new();
    transport
        .reply_json(200, json!([friend_json("f-1", "Grace Hopper")]))
        .reply_json(
            200,
            json!([compatibility_json("f-1", 62.0), compatibility_json("f-2", 91.0)]),
        );
    let store = MemoryCredentialStore::with_credential("tok");
    let mut client = client(&transport, &store);

    let dashboard = CompatibilityService::new(&mut client)
        .load_dashboard()
        .expect("dashboard");
    assert!(!dashboard.is_empty());
    let ranked = dashboard.ranked();
    assert_eq!(ranked[0].friend.id, "f-2");
    assert_eq!(ranked[0].grade().as_str(), "A+");
    assert_eq!(ranked[1].grade().as_str(), "D");
    assert_eq!(
        transport.paths(),
        vec!["GET /friends", "GET /compatibility/all"]
    );
}

#[test]
fn delete_failure_maps_to_friendly_message() {
    let transport = FakeTransport::new();
    transport.reply_status(500);
    let store = MemoryCredentialStore::with_credential("tok");
    let mut client = client(&transport, &store);

    let err = FriendService::new(&mut client)
        .delete("f-1")
        .expect_err("server error");
    assert_eq!(err.user_message(), "Failed to delete friend");
}

#[test]
fn incomplete_friend_form_asks_for_required_fields() {
    let transport = FakeTransport::new();
    let store = MemoryCredentialStore::with_credential("tok");
    let mut client = client(&transport, &store);

    let err = FriendService::new(&mut client)
        .save(None, &FriendDraft::default())
        .expect_err("empty form");
    assert_eq!(err.user_message(), "Please fill in all required fields");
    assert!(transport.sent().is_empty());
}
