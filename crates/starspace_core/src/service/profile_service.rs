//! Own-profile use-cases.

use super::{Action, ServiceError, ServiceResult};
use crate::gateway::{ApiClient, HttpTransport};
use crate::model::profile::{Profile, ProfileDraft};
use crate::navigation::NavEvent;
use crate::session::CredentialStore;
use log::info;

pub struct ProfileService<'c, T: HttpTransport, S: CredentialStore> {
    client: &'c mut ApiClient<T, S>,
}

impl<'c, T: HttpTransport, S: CredentialStore> ProfileService<'c, T, S> {
    pub fn new(client: &'c mut ApiClient<T, S>) -> Self {
        Self { client }
    }

    /// Validates and submits the first profile; the user then lands on the
    /// dashboard.
    pub fn create(&mut self, draft: &ProfileDraft) -> ServiceResult<NavEvent> {
        draft
            .validate()
            .map_err(ServiceError::invalid(Action::CreateProfile))?;
        let profile = self
            .client
            .create_profile(&draft.to_payload())
            .map_err(ServiceError::api(Action::CreateProfile))?;

        info!(
            "event=profile_create module=profile status=ok profile_id={}",
            profile.id
        );
        Ok(NavEvent::ProfileCreated)
    }

    pub fn update(&mut self, draft: &ProfileDraft) -> ServiceResult<Profile> {
        draft
            .validate()
            .map_err(ServiceError::invalid(Action::UpdateProfile))?;
        self.client
            .update_profile(&draft.to_payload())
            .map_err(ServiceError::api(Action::UpdateProfile))
    }

    /// The user's own profile, if one exists.
    pub fn load(&mut self) -> ServiceResult<Option<Profile>> {
        self.client
            .get_profile()
            .map_err(ServiceError::api(Action::UpdateProfile))
    }

    /// Current profile prefilled into an editable draft, if one exists.
    pub fn load_draft(&mut self) -> ServiceResult<Option<ProfileDraft>> {
        Ok(self.load()?.as_ref().map(ProfileDraft::from))
    }
}
