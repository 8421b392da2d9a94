//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Own the single process-wide client and router built from environment
//!   config.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Network-bound functions are not `sync`; FRB runs them off the UI thread.
//! - Every navigation outcome goes through the shared `Router`; responses
//!   report the route it shows afterwards.
//! - Failure messages are user-facing and never carry backend detail.

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use log::warn;
use starspace_core::date_input::{format_iso, format_long};
use starspace_core::model::profile::parse_wire_date;
use starspace_core::{
    bootstrap, core_version as core_version_inner, init_logging as init_logging_inner,
    open_client, parse_text_date, ping as ping_inner, select_from_picker, AppClient, AuthService,
    ClientConfig, Compatibility, CompatibilityService, Credentials, DateEntryKind, EnneagramType,
    Friend, FriendDraft, FriendService, GoogleAuthPayload, MbtiType, NavEvent, Platform, Profile,
    ProfileDraft, ProfileService, Route, Router, ServiceError,
};
use std::sync::{Mutex, OnceLock};

static APP: OnceLock<Mutex<Option<AppState>>> = OnceLock::new();

struct AppState {
    client: AppClient,
    router: Router,
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Idempotent for the same `level + log_dir`; reconfiguration is an error.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

// Date entry

/// Date entry modality for `platform` (`ios|android|web`), or for the
/// compiled target when `None` or unrecognized. Returns `picker` or `text`.
#[flutter_rust_bridge::frb(sync)]
pub fn date_entry_mode(platform: Option<String>) -> String {
    let platform = platform
        .as_deref()
        .and_then(Platform::parse)
        .unwrap_or_else(Platform::current);
    DateEntryKind::for_platform(platform).as_str().to_string()
}

/// Result of validating typed date text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParseResponse {
    pub ok: bool,
    /// Local midnight of the accepted day, in epoch milliseconds.
    pub epoch_ms: Option<i64>,
    /// `YYYY-MM-DD`.
    pub iso: Option<String>,
    /// Long form, e.g. `May 15, 2023`.
    pub display: Option<String>,
    pub message: String,
}

impl DateParseResponse {
    fn accepted(date: NaiveDate, epoch_ms: i64) -> Self {
        Self {
            ok: true,
            epoch_ms: Some(epoch_ms),
            iso: Some(format_iso(date)),
            display: Some(format_long(date)),
            message: String::new(),
        }
    }

    fn rejected(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            epoch_ms: None,
            iso: None,
            display: None,
            message: message.into(),
        }
    }
}

/// Validates strict `YYYY-MM-DD` text against an upper bound.
///
/// `maximum_epoch_ms` defaults to the current moment.
///
/// # FFI contract
/// - Sync call, pure computation.
/// - Rejected text never changes caller state; the caller keeps its value.
#[flutter_rust_bridge::frb(sync)]
pub fn date_parse_text(text: String, maximum_epoch_ms: Option<i64>) -> DateParseResponse {
    let maximum = match maximum_epoch_ms {
        Some(ms) => match Local.timestamp_millis_opt(ms).single() {
            Some(maximum) => maximum,
            None => return DateParseResponse::rejected(format!("invalid maximum date: {ms}")),
        },
        None => Local::now(),
    };

    match parse_text_date(&text, maximum) {
        Ok(value) => DateParseResponse::accepted(value.date_naive(), value.timestamp_millis()),
        Err(err) => DateParseResponse::rejected(err.to_string()),
    }
}

// Navigation

/// Visible screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteView {
    /// `Login|Register|ProfileSetup|Dashboard|AddFriend|Compatibility`.
    pub name: String,
    pub title: Option<String>,
    /// Friend being edited or compared, when the screen has one.
    pub friend_id: Option<String>,
}

impl From<&Route> for RouteView {
    fn from(route: &Route) -> Self {
        let friend_id = match route {
            Route::AddFriend { friend_id } => friend_id.clone(),
            Route::Compatibility { friend_id } => Some(friend_id.clone()),
            _ => None,
        };
        Self {
            name: route.name().to_string(),
            title: route.title().map(str::to_string),
            friend_id,
        }
    }
}

/// Outcome of a command that only changes navigation or server state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// Screen to show afterwards.
    pub route: Option<RouteView>,
    pub message: String,
}

impl ActionResponse {
    fn success(route: Option<RouteView>) -> Self {
        Self {
            ok: true,
            route,
            message: String::new(),
        }
    }

    fn failure(route: Option<RouteView>, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            route,
            message: message.into(),
        }
    }
}

/// Screen currently shown by the router; `None` before bootstrap.
pub fn nav_current() -> Option<RouteView> {
    with_app(|app| current_route(&app.router)).unwrap_or_default()
}

/// Login screen to registration screen.
pub fn nav_open_register() -> ActionResponse {
    nav_command(NavEvent::OpenRegister)
}

/// Opens the friend form; `friend_id` selects edit mode.
pub fn nav_open_add_friend(friend_id: Option<String>) -> ActionResponse {
    nav_command(NavEvent::OpenAddFriend { friend_id })
}

pub fn nav_open_compatibility(friend_id: String) -> ActionResponse {
    nav_command(NavEvent::OpenCompatibility { friend_id })
}

pub fn nav_back() -> ActionResponse {
    nav_command(NavEvent::Back)
}

// Session and auth

/// Launch-time auth decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResponse {
    pub ok: bool,
    /// `unauthenticated|awaiting_profile|ready`.
    pub state: String,
    pub route: Option<RouteView>,
    pub message: String,
}

/// Restores the persisted credential, validates it with the backend and
/// starts a fresh router in the resulting state.
///
/// # FFI contract
/// - Async on the Dart side; performs network and storage I/O.
/// - Client setup failures resolve to `Login` with `ok = false`.
pub fn session_bootstrap() -> SessionResponse {
    let outcome = with_app(|app| {
        app.router = Router::new();
        let state = bootstrap(&mut app.client);
        let route = navigate(&mut app.router, NavEvent::Bootstrapped(state));
        (state, route)
    });
    match outcome {
        Ok((state, route)) => SessionResponse {
            ok: true,
            state: state.as_str().to_string(),
            route,
            message: String::new(),
        },
        Err(message) => SessionResponse {
            ok: false,
            state: "unauthenticated".to_string(),
            route: Some(RouteView::from(&Route::Login)),
            message,
        },
    }
}

/// Email/password sign-in.
///
/// # FFI contract
/// - Async on the Dart side; performs network and storage I/O.
/// - Empty fields are rejected locally without a network call.
pub fn auth_login(email: String, password: String) -> ActionResponse {
    let credentials = Credentials::new(email.trim(), password);
    run_action(|app| AuthService::new(&mut app.client).login(&credentials))
}

/// Account creation; a new account continues to profile setup.
pub fn auth_register(email: String, password: String) -> ActionResponse {
    let credentials = Credentials::new(email.trim(), password);
    run_action(|app| AuthService::new(&mut app.client).register(&credentials))
}

/// Exchanges identity data from the platform Google sign-in for a backend
/// credential.
pub fn auth_google_sign_in(
    email: String,
    google_id: String,
    name: Option<String>,
    picture: Option<String>,
) -> ActionResponse {
    let payload = GoogleAuthPayload {
        email: email.trim().to_string(),
        google_id,
        name,
        picture,
    };
    run_action(|app| AuthService::new(&mut app.client).google_sign_in(&payload))
}

/// Drops the persisted credential and returns to the login route.
pub fn auth_logout() -> ActionResponse {
    run_action(|app| Ok(AuthService::new(&mut app.client).logout()))
}

// Profile and friends

/// Form values shared by the profile and friend forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthRecordInput {
    pub full_name: String,
    /// Committed date from the picker or `date_parse_text`, epoch ms.
    pub date_of_birth_epoch_ms: i64,
    pub place_of_birth: String,
    pub time_of_birth: String,
    /// Four-letter code, e.g. `INTJ`.
    pub mbti_type: String,
    /// `1..=9`.
    pub enneagram_type: u8,
    /// Friend forms only; ignored for the own profile.
    pub notes: Option<String>,
}

/// Read model for a profile or friend record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthRecordView {
    pub id: String,
    pub full_name: String,
    pub avatar: Option<String>,
    /// `None` when the backend sent an unreadable date.
    pub date_of_birth_epoch_ms: Option<i64>,
    pub date_of_birth_display: Option<String>,
    pub place_of_birth: String,
    pub time_of_birth: String,
    pub mbti_type: String,
    pub enneagram_type: u8,
    /// e.g. `Type 4`.
    pub enneagram_label: String,
    pub western_zodiac: Option<String>,
    pub chinese_zodiac: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileResponse {
    pub ok: bool,
    pub profile: Option<BirthRecordView>,
    pub route: Option<RouteView>,
    pub message: String,
}

/// The user's own profile; `profile = None` with `ok = true` when none exists.
pub fn profile_load() -> ProfileResponse {
    run_query(
        |app| ProfileService::new(&mut app.client).load(),
        |profile, route| ProfileResponse {
            ok: true,
            profile: profile.as_ref().map(profile_view),
            route,
            message: String::new(),
        },
        |route, message| ProfileResponse {
            ok: false,
            profile: None,
            route,
            message,
        },
    )
}

/// Submits the first profile; on success the router moves to the dashboard.
pub fn profile_create(input: BirthRecordInput) -> ActionResponse {
    let draft = match profile_draft(&input) {
        Ok(draft) => draft,
        Err(message) => return ActionResponse::failure(nav_current(), message),
    };
    run_action(|app| ProfileService::new(&mut app.client).create(&draft))
}

pub fn profile_update(input: BirthRecordInput) -> ProfileResponse {
    let draft = match profile_draft(&input) {
        Ok(draft) => draft,
        Err(message) => {
            return ProfileResponse {
                ok: false,
                profile: None,
                route: nav_current(),
                message,
            }
        }
    };
    run_query(
        |app| ProfileService::new(&mut app.client).update(&draft),
        |profile, route| ProfileResponse {
            ok: true,
            profile: Some(profile_view(&profile)),
            route,
            message: String::new(),
        },
        |route, message| ProfileResponse {
            ok: false,
            profile: None,
            route,
            message,
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriendListResponse {
    pub ok: bool,
    pub friends: Vec<BirthRecordView>,
    pub route: Option<RouteView>,
    pub message: String,
}

pub fn friend_list() -> FriendListResponse {
    run_query(
        |app| FriendService::new(&mut app.client).list(),
        |friends, route| FriendListResponse {
            ok: true,
            friends: friends.iter().map(friend_view).collect(),
            route,
            message: String::new(),
        },
        |route, message| FriendListResponse {
            ok: false,
            friends: Vec::new(),
            route,
            message,
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriendResponse {
    pub ok: bool,
    pub friend: Option<BirthRecordView>,
    pub route: Option<RouteView>,
    pub message: String,
}

/// One friend for the edit form.
pub fn friend_load(friend_id: String) -> FriendResponse {
    run_query(
        |app| FriendService::new(&mut app.client).load_for_edit(&friend_id),
        |(friend, _draft), route| FriendResponse {
            ok: true,
            friend: Some(friend_view(&friend)),
            route,
            message: String::new(),
        },
        |route, message| FriendResponse {
            ok: false,
            friend: None,
            route,
            message,
        },
    )
}

/// Creates a friend, or updates `editing_friend_id` when set. On success the
/// router leaves the friend form.
pub fn friend_save(editing_friend_id: Option<String>, input: BirthRecordInput) -> ActionResponse {
    let draft = match friend_draft(&input) {
        Ok(draft) => draft,
        Err(message) => return ActionResponse::failure(nav_current(), message),
    };
    run_action(|app| {
        FriendService::new(&mut app.client).save(editing_friend_id.as_deref(), &draft)
    })
}

pub fn friend_delete(friend_id: String) -> ActionResponse {
    match with_app(|app| {
        let outcome = FriendService::new(&mut app.client).delete(&friend_id);
        match outcome {
            Ok(()) => ActionResponse::success(current_route(&app.router)),
            Err(err) => {
                let (route, message) = failure_parts(&mut app.router, &err);
                ActionResponse::failure(route, message)
            }
        }
    }) {
        Ok(response) => response,
        Err(message) => ActionResponse::failure(None, message),
    }
}

// Compatibility

#[derive(Debug, Clone, PartialEq)]
pub struct DimensionScore {
    /// Wire key, e.g. `physical_intimacy`.
    pub key: String,
    pub label: String,
    /// `0..=100`.
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompatibilityView {
    pub friend_id: String,
    pub friend_name: String,
    pub overall: f64,
    /// `A+` through `F`.
    pub grade: String,
    /// Display order: love, physical intimacy, work, marriage, friendship.
    pub dimensions: Vec<DimensionScore>,
    pub analysis: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardResponse {
    pub ok: bool,
    pub friends: Vec<BirthRecordView>,
    /// Best match first.
    pub ranked: Vec<CompatibilityView>,
    pub route: Option<RouteView>,
    pub message: String,
}

pub fn dashboard_load() -> DashboardResponse {
    run_query(
        |app| CompatibilityService::new(&mut app.client).load_dashboard(),
        |dashboard, route| DashboardResponse {
            ok: true,
            friends: dashboard.friends.iter().map(friend_view).collect(),
            ranked: dashboard
                .ranked()
                .into_iter()
                .map(compatibility_view)
                .collect(),
            route,
            message: String::new(),
        },
        |route, message| DashboardResponse {
            ok: false,
            friends: Vec::new(),
            ranked: Vec::new(),
            route,
            message,
        },
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompatibilityResponse {
    pub ok: bool,
    pub compatibility: Option<CompatibilityView>,
    pub route: Option<RouteView>,
    pub message: String,
}

pub fn compatibility_load(friend_id: String) -> CompatibilityResponse {
    run_query(
        |app| CompatibilityService::new(&mut app.client).load(&friend_id),
        |compatibility, route| CompatibilityResponse {
            ok: true,
            compatibility: Some(compatibility_view(&compatibility)),
            route,
            message: String::new(),
        },
        |route, message| CompatibilityResponse {
            ok: false,
            compatibility: None,
            route,
            message,
        },
    )
}

// Shared plumbing

/// Runs `f` against the shared state, building the client on first use.
fn with_app<R>(f: impl FnOnce(&mut AppState) -> R) -> Result<R, String> {
    let slot = APP.get_or_init(|| Mutex::new(None));
    let mut guard = slot
        .lock()
        .map_err(|_| "client lock poisoned".to_string())?;

    if guard.is_none() {
        let config = ClientConfig::from_env().map_err(|err| err.to_string())?;
        *guard = Some(AppState {
            client: open_client(config)?,
            router: Router::new(),
        });
    }
    match guard.as_mut() {
        Some(app) => Ok(f(app)),
        None => Err("client unavailable".to_string()),
    }
}

/// Runs a use-case that yields a navigation event and applies it.
fn run_action(
    f: impl FnOnce(&mut AppState) -> Result<NavEvent, ServiceError>,
) -> ActionResponse {
    let outcome = with_app(|app| match f(app) {
        Ok(event) => {
            let route = navigate(&mut app.router, event);
            ActionResponse::success(route)
        }
        Err(err) => {
            let (route, message) = failure_parts(&mut app.router, &err);
            ActionResponse::failure(route, message)
        }
    });
    outcome.unwrap_or_else(|message| ActionResponse::failure(None, message))
}

/// Runs a read use-case and shapes the envelope with `ok` or `failed`.
fn run_query<T, R>(
    f: impl FnOnce(&mut AppState) -> Result<T, ServiceError>,
    ok: impl FnOnce(T, Option<RouteView>) -> R,
    failed: impl Fn(Option<RouteView>, String) -> R,
) -> R {
    let outcome = with_app(|app| match f(app) {
        Ok(value) => Ok(ok(value, current_route(&app.router))),
        Err(err) => Err(failure_parts(&mut app.router, &err)),
    });
    match outcome {
        Ok(Ok(response)) => response,
        Ok(Err((route, message))) => failed(route, message),
        Err(message) => failed(None, message),
    }
}

fn nav_command(event: NavEvent) -> ActionResponse {
    let outcome = with_app(|app| {
        let result = app.router.dispatch(event).map(|_| ());
        let route = current_route(&app.router);
        match result {
            Ok(()) => ActionResponse::success(route),
            Err(err) => ActionResponse::failure(route, err.to_string()),
        }
    });
    outcome.unwrap_or_else(|message| ActionResponse::failure(None, message))
}

/// Applies `event`; a rejected transition leaves the current screen in place.
fn navigate(router: &mut Router, event: NavEvent) -> Option<RouteView> {
    if let Err(err) = router.dispatch(event) {
        warn!("event=navigate module=ffi status=error error={err}");
    }
    current_route(router)
}

fn current_route(router: &Router) -> Option<RouteView> {
    router.current().map(RouteView::from)
}

/// User message plus the route to show; session expiry moves to login.
fn failure_parts(router: &mut Router, err: &ServiceError) -> (Option<RouteView>, String) {
    let route = match err.nav_event() {
        Some(event) => navigate(router, event),
        None => current_route(router),
    };
    (route, err.user_message().to_string())
}

fn birth_date(epoch_ms: i64) -> Result<DateTime<Local>, String> {
    Local
        .timestamp_millis_opt(epoch_ms)
        .single()
        .map(|moment| select_from_picker(moment.date_naive()))
        .ok_or_else(|| format!("invalid date of birth: {epoch_ms}"))
}

fn personality(input: &BirthRecordInput) -> Result<(MbtiType, EnneagramType), String> {
    let mbti = input
        .mbti_type
        .parse::<MbtiType>()
        .map_err(|err| err.to_string())?;
    let enneagram = EnneagramType::from_number(input.enneagram_type)
        .ok_or_else(|| format!("unknown enneagram type: {}", input.enneagram_type))?;
    Ok((mbti, enneagram))
}

fn profile_draft(input: &BirthRecordInput) -> Result<ProfileDraft, String> {
    let (mbti_type, enneagram_type) = personality(input)?;
    Ok(ProfileDraft {
        full_name: input.full_name.clone(),
        date_of_birth: birth_date(input.date_of_birth_epoch_ms)?,
        place_of_birth: input.place_of_birth.clone(),
        time_of_birth: input.time_of_birth.clone(),
        mbti_type,
        enneagram_type,
    })
}

fn friend_draft(input: &BirthRecordInput) -> Result<FriendDraft, String> {
    let (mbti_type, enneagram_type) = personality(input)?;
    Ok(FriendDraft {
        full_name: input.full_name.clone(),
        date_of_birth: birth_date(input.date_of_birth_epoch_ms)?,
        place_of_birth: input.place_of_birth.clone(),
        time_of_birth: input.time_of_birth.clone(),
        mbti_type,
        enneagram_type,
        notes: input.notes.clone().unwrap_or_default(),
    })
}

fn profile_view(profile: &Profile) -> BirthRecordView {
    let date = parse_wire_date(&profile.date_of_birth);
    BirthRecordView {
        id: profile.id.clone(),
        full_name: profile.full_name.clone(),
        avatar: profile.avatar.clone(),
        date_of_birth_epoch_ms: date.map(|value| value.timestamp_millis()),
        date_of_birth_display: date.map(|value| format_long(value.date_naive())),
        place_of_birth: profile.place_of_birth.clone(),
        time_of_birth: profile.time_of_birth.clone(),
        mbti_type: profile.mbti_type.code().to_string(),
        enneagram_type: profile.enneagram_type.number(),
        enneagram_label: profile.enneagram_type.label(),
        western_zodiac: profile.western_zodiac.clone(),
        chinese_zodiac: profile.chinese_zodiac.clone(),
        notes: None,
    }
}

fn friend_view(friend: &Friend) -> BirthRecordView {
    let date = parse_wire_date(&friend.date_of_birth);
    BirthRecordView {
        id: friend.id.clone(),
        full_name: friend.full_name.clone(),
        avatar: friend.avatar.clone(),
        date_of_birth_epoch_ms: date.map(|value| value.timestamp_millis()),
        date_of_birth_display: date.map(|value| format_long(value.date_naive())),
        place_of_birth: friend.place_of_birth.clone(),
        time_of_birth: friend.time_of_birth.clone(),
        mbti_type: friend.mbti_type.code().to_string(),
        enneagram_type: friend.enneagram_type.number(),
        enneagram_label: friend.enneagram_type.label(),
        western_zodiac: friend.western_zodiac.clone(),
        chinese_zodiac: friend.chinese_zodiac.clone(),
        notes: friend.notes.clone(),
    }
}

fn compatibility_view(compatibility: &Compatibility) -> CompatibilityView {
    CompatibilityView {
        friend_id: compatibility.friend.id.clone(),
        friend_name: compatibility.friend.full_name.clone(),
        overall: compatibility.scores.overall(),
        grade: compatibility.grade().as_str().to_string(),
        dimensions: compatibility
            .scores
            .dimensions()
            .map(|(dimension, score)| DimensionScore {
                key: dimension.key().to_string(),
                label: dimension.label().to_string(),
                score,
            })
            .collect(),
        analysis: compatibility.analysis.clone(),
    }
}
