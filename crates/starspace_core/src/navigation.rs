//! Auth-gated navigation state machine.
//!
//! # Responsibility
//! - Derive the auth state from (session present, profile present).
//! - Map each auth state to its entry route.
//! - Own the route stack and apply navigation events in one place.
//!
//! # Invariants
//! - The bottom of a non-empty stack is always the entry route of `state`.
//! - Auth transitions replace the whole stack.
//! - Rejected events leave state and stack unchanged.

use crate::model::friend::FriendId;
use log::info;
use thiserror::Error;

/// Where the user stands with respect to authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Loading,
    Unauthenticated,
    AwaitingProfile,
    Ready,
}

impl AuthState {
    /// Pure mapping from session/profile presence.
    pub fn derive(has_session: bool, has_profile: bool) -> Self {
        match (has_session, has_profile) {
            (false, _) => Self::Unauthenticated,
            (true, false) => Self::AwaitingProfile,
            (true, true) => Self::Ready,
        }
    }

    /// `None` while loading; the shell shows nothing yet.
    pub fn entry_route(self) -> Option<Route> {
        match self {
            Self::Loading => None,
            Self::Unauthenticated => Some(Route::Login),
            Self::AwaitingProfile => Some(Route::ProfileSetup),
            Self::Ready => Some(Route::Dashboard),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Unauthenticated => "unauthenticated",
            Self::AwaitingProfile => "awaiting_profile",
            Self::Ready => "ready",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    ProfileSetup,
    Dashboard,
    /// `friend_id` is set when editing an existing friend.
    AddFriend { friend_id: Option<FriendId> },
    Compatibility { friend_id: FriendId },
}

impl Route {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Register => "Register",
            Self::ProfileSetup => "ProfileSetup",
            Self::Dashboard => "Dashboard",
            Self::AddFriend { .. } => "AddFriend",
            Self::Compatibility { .. } => "Compatibility",
        }
    }

    pub fn title(&self) -> Option<&'static str> {
        match self {
            Self::Login | Self::Register => None,
            Self::ProfileSetup => Some("Create Your Profile"),
            Self::Dashboard => Some("Starspace"),
            Self::AddFriend { .. } => Some("Add Friend"),
            Self::Compatibility { .. } => Some("Compatibility Analysis"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
    /// Outcome of the launch-time bootstrap.
    Bootstrapped(AuthState),
    LoggedIn { has_profile: bool },
    Registered,
    ProfileCreated,
    LoggedOut,
    /// Backend rejected the credential mid-session.
    SessionExpired,
    OpenRegister,
    OpenAddFriend { friend_id: Option<FriendId> },
    OpenCompatibility { friend_id: FriendId },
    FriendSaved,
    Back,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    #[error("event {event:?} is not valid in state `{}`", .state.as_str())]
    InvalidTransition { state: AuthState, event: NavEvent },
    #[error("nothing to go back to from `{0}`")]
    AtRoot(&'static str),
}

/// Single router mapping auth states and events to the visible route.
#[derive(Debug, Clone)]
pub struct Router {
    state: AuthState,
    stack: Vec<Route>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Self {
            state: AuthState::Loading,
            stack: Vec::new(),
        }
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    pub fn current(&self) -> Option<&Route> {
        self.stack.last()
    }

    pub fn stack(&self) -> &[Route] {
        &self.stack
    }

    /// Applies one event and returns the resulting visible route.
    pub fn dispatch(&mut self, event: NavEvent) -> Result<&Route, NavError> {
        use AuthState::{AwaitingProfile, Loading, Ready, Unauthenticated};

        let invalid = |state: AuthState, event: NavEvent| NavError::InvalidTransition { state, event };

        match (&event, self.state) {
            (NavEvent::Bootstrapped(next), Loading) if *next != Loading => self.reset(*next),
            (NavEvent::LoggedIn { has_profile }, Unauthenticated) => {
                self.reset(AuthState::derive(true, *has_profile))
            }
            (NavEvent::Registered, Unauthenticated) => self.reset(AwaitingProfile),
            (NavEvent::ProfileCreated, AwaitingProfile) => self.reset(Ready),
            (NavEvent::LoggedOut, AwaitingProfile | Ready) => self.reset(Unauthenticated),
            (NavEvent::SessionExpired, AwaitingProfile | Ready) => self.reset(Unauthenticated),
            (NavEvent::OpenRegister, Unauthenticated) if self.current() == Some(&Route::Login) => {
                self.stack.push(Route::Register)
            }
            (NavEvent::OpenAddFriend { friend_id }, Ready) => self.stack.push(Route::AddFriend {
                friend_id: friend_id.clone(),
            }),
            (NavEvent::OpenCompatibility { friend_id }, Ready) => {
                self.stack.push(Route::Compatibility {
                    friend_id: friend_id.clone(),
                })
            }
            (NavEvent::FriendSaved, Ready)
                if matches!(self.current(), Some(Route::AddFriend { .. })) =>
            {
                self.stack.pop();
            }
            (NavEvent::Back, state) if state != Loading => {
                if self.stack.len() <= 1 {
                    let name = self.current().map_or("nothing", Route::name);
                    return Err(NavError::AtRoot(name));
                }
                self.stack.pop();
            }
            (_, state) => return Err(invalid(state, event.clone())),
        }

        let route = self
            .stack
            .last()
            .ok_or_else(|| invalid(self.state, NavEvent::Back))?;
        info!(
            "event=navigate module=navigation status=ok state={} route={} depth={}",
            self.state.as_str(),
            route.name(),
            self.stack.len()
        );
        Ok(route)
    }

    fn reset(&mut self, state: AuthState) {
        self.state = state;
        self.stack.clear();
        self.stack.extend(state.entry_route());
    }
}
