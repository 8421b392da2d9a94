//! Friend add/edit/delete use-cases.
//!
//! # Invariants
//! - Editing targets exactly the friend id the form was opened with.

use super::{Action, ServiceError, ServiceResult};
use crate::gateway::{ApiClient, HttpTransport};
use crate::model::friend::{Friend, FriendDraft};
use crate::navigation::NavEvent;
use crate::session::CredentialStore;
use log::info;

pub struct FriendService<'c, T: HttpTransport, S: CredentialStore> {
    client: &'c mut ApiClient<T, S>,
}

impl<'c, T: HttpTransport, S: CredentialStore> FriendService<'c, T, S> {
    pub fn new(client: &'c mut ApiClient<T, S>) -> Self {
        Self { client }
    }

    pub fn list(&mut self) -> ServiceResult<Vec<Friend>> {
        self.client
            .list_friends()
            .map_err(ServiceError::api(Action::LoadFriend))
    }

    /// Finds one friend in the friend list for the edit form.
    pub fn load_for_edit(&mut self, friend_id: &str) -> ServiceResult<(Friend, FriendDraft)> {
        let friend = self
            .list()?
            .into_iter()
            .find(|friend| friend.id == friend_id)
            .ok_or_else(|| ServiceError::FriendNotFound(friend_id.to_string()))?;
        let draft = FriendDraft::from(&friend);
        Ok((friend, draft))
    }

    /// Creates a friend, or updates `editing` when set.
    pub fn save(&mut self, editing: Option<&str>, draft: &FriendDraft) -> ServiceResult<NavEvent> {
        draft
            .validate()
            .map_err(ServiceError::invalid(Action::SaveFriend))?;
        let payload = draft.to_payload();

        let saved = match editing {
            Some(friend_id) => self.client.update_friend(friend_id, &payload),
            None => self.client.create_friend(&payload),
        }
        .map_err(ServiceError::api(Action::SaveFriend))?;

        info!(
            "event=friend_save module=friend status=ok mode={} friend_id={}",
            if editing.is_some() { "update" } else { "create" },
            saved.id
        );
        Ok(NavEvent::FriendSaved)
    }

    pub fn delete(&mut self, friend_id: &str) -> ServiceResult<()> {
        self.client
            .delete_friend(friend_id)
            .map_err(ServiceError::api(Action::DeleteFriend))?;
        info!("event=friend_delete module=friend status=ok friend_id={friend_id}");
        Ok(())
    }
}
