//! Friend records and the add/edit friend form draft.

use super::personality::{EnneagramType, MbtiType};
use super::profile::{parse_wire_date, validate_birth_fields};
use super::ValidationError;
use crate::date_input::default_birth_date;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Opaque backend identifier of a friend.
pub type FriendId = String;

/// A peer's personality/birth record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Friend {
    pub id: FriendId,
    pub user_id: String,
    pub full_name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    pub date_of_birth: String,
    pub place_of_birth: String,
    pub time_of_birth: String,
    pub mbti_type: MbtiType,
    pub enneagram_type: EnneagramType,
    #[serde(default)]
    pub western_zodiac: Option<String>,
    #[serde(default)]
    pub chinese_zodiac: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Editable friend form state. `notes` is the only optional input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriendDraft {
    pub full_name: String,
    pub date_of_birth: DateTime<Local>,
    pub place_of_birth: String,
    pub time_of_birth: String,
    pub mbti_type: MbtiType,
    pub enneagram_type: EnneagramType,
    pub notes: String,
}

impl Default for FriendDraft {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            date_of_birth: default_birth_date(),
            place_of_birth: String::new(),
            time_of_birth: String::new(),
            mbti_type: MbtiType::default(),
            enneagram_type: EnneagramType::default(),
            notes: String::new(),
        }
    }
}

impl FriendDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_birth_fields(&self.full_name, &self.place_of_birth, &self.time_of_birth)
    }

    /// Blank notes are omitted from the payload.
    pub fn to_payload(&self) -> FriendPayload {
        let notes = self.notes.trim();
        FriendPayload {
            full_name: self.full_name.trim().to_string(),
            date_of_birth: self.date_of_birth.with_timezone(&Utc),
            place_of_birth: self.place_of_birth.trim().to_string(),
            time_of_birth: self.time_of_birth.trim().to_string(),
            mbti_type: self.mbti_type,
            enneagram_type: self.enneagram_type,
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        }
    }
}

impl From<&Friend> for FriendDraft {
    fn from(friend: &Friend) -> Self {
        Self {
            full_name: friend.full_name.clone(),
            date_of_birth: parse_wire_date(&friend.date_of_birth)
                .unwrap_or_else(default_birth_date),
            place_of_birth: friend.place_of_birth.clone(),
            time_of_birth: friend.time_of_birth.clone(),
            mbti_type: friend.mbti_type,
            enneagram_type: friend.enneagram_type,
            notes: friend.notes.clone().unwrap_or_default(),
        }
    }
}

/// Body of `POST /friends` and `PUT /friends/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FriendPayload {
    pub full_name: String,
    pub date_of_birth: DateTime<Utc>,
    pub place_of_birth: String,
    pub time_of_birth: String,
    pub mbti_type: MbtiType,
    pub enneagram_type: EnneagramType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
