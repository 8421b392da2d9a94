//! Personality typing codes.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} code `{value}`")]
pub struct UnknownTypeCode {
    pub kind: &'static str,
    pub value: String,
}

/// One of the sixteen four-letter MBTI codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MbtiType {
    #[default]
    Intj,
    Intp,
    Entj,
    Entp,
    Infj,
    Infp,
    Enfj,
    Enfp,
    Istj,
    Isfj,
    Estj,
    Esfj,
    Istp,
    Isfp,
    Estp,
    Esfp,
}

impl MbtiType {
    /// Picker order.
    pub const ALL: [MbtiType; 16] = [
        Self::Intj,
        Self::Intp,
        Self::Entj,
        Self::Entp,
        Self::Infj,
        Self::Infp,
        Self::Enfj,
        Self::Enfp,
        Self::Istj,
        Self::Isfj,
        Self::Estj,
        Self::Esfj,
        Self::Istp,
        Self::Isfp,
        Self::Estp,
        Self::Esfp,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::Intj => "INTJ",
            Self::Intp => "INTP",
            Self::Entj => "ENTJ",
            Self::Entp => "ENTP",
            Self::Infj => "INFJ",
            Self::Infp => "INFP",
            Self::Enfj => "ENFJ",
            Self::Enfp => "ENFP",
            Self::Istj => "ISTJ",
            Self::Isfj => "ISFJ",
            Self::Estj => "ESTJ",
            Self::Esfj => "ESFJ",
            Self::Istp => "ISTP",
            Self::Isfp => "ISFP",
            Self::Estp => "ESTP",
            Self::Esfp => "ESFP",
        }
    }
}

impl Display for MbtiType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for MbtiType {
    type Err = UnknownTypeCode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.code() == normalized)
            .ok_or_else(|| UnknownTypeCode {
                kind: "mbti",
                value: value.to_string(),
            })
    }
}

/// Enneagram type, `1` through `9`. Serialized as a one-digit string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EnneagramType {
    #[default]
    #[serde(rename = "1")]
    Reformer,
    #[serde(rename = "2")]
    Helper,
    #[serde(rename = "3")]
    Achiever,
    #[serde(rename = "4")]
    Individualist,
    #[serde(rename = "5")]
    Investigator,
    #[serde(rename = "6")]
    Loyalist,
    #[serde(rename = "7")]
    Enthusiast,
    #[serde(rename = "8")]
    Challenger,
    #[serde(rename = "9")]
    Peacemaker,
}

impl EnneagramType {
    pub const ALL: [EnneagramType; 9] = [
        Self::Reformer,
        Self::Helper,
        Self::Achiever,
        Self::Individualist,
        Self::Investigator,
        Self::Loyalist,
        Self::Enthusiast,
        Self::Challenger,
        Self::Peacemaker,
    ];

    pub fn number(self) -> u8 {
        match self {
            Self::Reformer => 1,
            Self::Helper => 2,
            Self::Achiever => 3,
            Self::Individualist => 4,
            Self::Investigator => 5,
            Self::Loyalist => 6,
            Self::Enthusiast => 7,
            Self::Challenger => 8,
            Self::Peacemaker => 9,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.number() == number)
    }

    /// Picker label, e.g. `Type 4`.
    pub fn label(self) -> String {
        format!("Type {}", self.number())
    }
}

impl Display for EnneagramType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl FromStr for EnneagramType {
    type Err = UnknownTypeCode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value
            .trim()
            .parse::<u8>()
            .ok()
            .and_then(Self::from_number)
            .ok_or_else(|| UnknownTypeCode {
                kind: "enneagram",
                value: value.to_string(),
            })
    }
}
