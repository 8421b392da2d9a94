//! User profile records and the profile form draft.

use super::personality::{EnneagramType, MbtiType};
use super::{require, ValidationError};
use crate::date_input::{default_birth_date, local_midnight};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// The signed-in user's own personality/birth record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
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
}

/// Editable profile form state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDraft {
    pub full_name: String,
    pub date_of_birth: DateTime<Local>,
    pub place_of_birth: String,
    pub time_of_birth: String,
    pub mbti_type: MbtiType,
    pub enneagram_type: EnneagramType,
}

impl Default for ProfileDraft {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            date_of_birth: default_birth_date(),
            place_of_birth: String::new(),
            time_of_birth: String::new(),
            mbti_type: MbtiType::default(),
            enneagram_type: EnneagramType::default(),
        }
    }
}

impl ProfileDraft {
    /// Name, place and time of birth are required.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_birth_fields(&self.full_name, &self.place_of_birth, &self.time_of_birth)
    }

    pub fn to_payload(&self) -> ProfilePayload {
        ProfilePayload {
            full_name: self.full_name.trim().to_string(),
            date_of_birth: self.date_of_birth.with_timezone(&Utc),
            place_of_birth: self.place_of_birth.trim().to_string(),
            time_of_birth: self.time_of_birth.trim().to_string(),
            mbti_type: self.mbti_type,
            enneagram_type: self.enneagram_type,
        }
    }
}

impl From<&Profile> for ProfileDraft {
    fn from(profile: &Profile) -> Self {
        Self {
            full_name: profile.full_name.clone(),
            date_of_birth: parse_wire_date(&profile.date_of_birth)
                .unwrap_or_else(default_birth_date),
            place_of_birth: profile.place_of_birth.clone(),
            time_of_birth: profile.time_of_birth.clone(),
            mbti_type: profile.mbti_type,
            enneagram_type: profile.enneagram_type,
        }
    }
}

/// Body of `POST /users/profile` and `PUT /users/profile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfilePayload {
    pub full_name: String,
    pub date_of_birth: DateTime<Utc>,
    pub place_of_birth: String,
    pub time_of_birth: String,
    pub mbti_type: MbtiType,
    pub enneagram_type: EnneagramType,
}

pub(crate) fn validate_birth_fields(
    full_name: &str,
    place_of_birth: &str,
    time_of_birth: &str,
) -> Result<(), ValidationError> {
    require(full_name, "full_name")?;
    require(place_of_birth, "place_of_birth")?;
    require(time_of_birth, "time_of_birth")
}

/// Reads a backend birth date into local midnight of its calendar day.
///
/// Accepts RFC 3339 timestamps (converted to local time first), naive
/// `YYYY-MM-DDTHH:MM:SS[.f]` timestamps and bare `YYYY-MM-DD` dates.
pub fn parse_wire_date(value: &str) -> Option<DateTime<Local>> {
    let value = value.trim();
    let day = if let Ok(moment) = DateTime::parse_from_rfc3339(value) {
        moment.with_timezone(&Local).date_naive()
    } else if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        naive.date()
    } else {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?
    };
    local_midnight(day)
}
