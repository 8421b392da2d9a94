//! Dashboard and compatibility detail loading.

use super::{Action, ServiceError, ServiceResult};
use crate::gateway::{ApiClient, HttpTransport};
use crate::model::compatibility::Compatibility;
use crate::model::friend::Friend;
use crate::session::CredentialStore;

/// Everything the dashboard renders.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dashboard {
    pub friends: Vec<Friend>,
    pub compatibilities: Vec<Compatibility>,
}

impl Dashboard {
    pub fn is_empty(&self) -> bool {
        self.friends.is_empty()
    }

    /// Compatibility entries ordered by overall score, best first.
    pub fn ranked(&self) -> Vec<&Compatibility> {
        let mut ranked: Vec<&Compatibility> = self.compatibilities.iter().collect();
        ranked.sort_by(|a, b| b.scores.overall().total_cmp(&a.scores.overall()));
        ranked
    }
}

pub struct CompatibilityService<'c, T: HttpTransport, S: CredentialStore> {
    client: &'c mut ApiClient<T, S>,
}

impl<'c, T: HttpTransport, S: CredentialStore> CompatibilityService<'c, T, S> {
    pub fn new(client: &'c mut ApiClient<T, S>) -> Self {
        Self { client }
    }

    pub fn load_dashboard(&mut self) -> ServiceResult<Dashboard> {
        let friends = self
            .client
            .list_friends()
            .map_err(ServiceError::api(Action::LoadDashboard))?;
        let compatibilities = self
            .client
            .all_compatibilities()
            .map_err(ServiceError::api(Action::LoadDashboard))?;
        Ok(Dashboard {
            friends,
            compatibilities,
        })
    }

    pub fn load(&mut self, friend_id: &str) -> ServiceResult<Compatibility> {
        self.client
            .get_compatibility(friend_id)
            .map_err(ServiceError::api(Action::LoadCompatibility))
    }
}
