//! Server-computed compatibility views.

use super::friend::Friend;
use super::profile::Profile;
use serde::{Deserialize, Serialize};

/// Named axis of a pairwise score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Love,
    PhysicalIntimacy,
    Work,
    Marriage,
    Friendship,
}

impl Dimension {
    /// Display order on dashboard cards and the detail screen.
    pub const ALL: [Dimension; 5] = [
        Self::Love,
        Self::PhysicalIntimacy,
        Self::Work,
        Self::Marriage,
        Self::Friendship,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Love => "love",
            Self::PhysicalIntimacy => "physical_intimacy",
            Self::Work => "work",
            Self::Marriage => "marriage",
            Self::Friendship => "friendship",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Love => "Love",
            Self::PhysicalIntimacy => "Physical Intimacy",
            Self::Work => "Work",
            Self::Marriage => "Marriage",
            Self::Friendship => "Friendship",
        }
    }
}

/// Scores are 0-100; values outside that range are clamped on read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityScores {
    pub overall: f64,
    pub love: f64,
    pub physical_intimacy: f64,
    pub work: f64,
    pub marriage: f64,
    pub friendship: f64,
}

impl CompatibilityScores {
    pub fn score(&self, dimension: Dimension) -> f64 {
        let raw = match dimension {
            Dimension::Love => self.love,
            Dimension::PhysicalIntimacy => self.physical_intimacy,
            Dimension::Work => self.work,
            Dimension::Marriage => self.marriage,
            Dimension::Friendship => self.friendship,
        };
        clamp_score(raw)
    }

    pub fn overall(&self) -> f64 {
        clamp_score(self.overall)
    }

    /// Per-dimension scores in display order, excluding `overall`.
    pub fn dimensions(&self) -> impl Iterator<Item = (Dimension, f64)> + '_ {
        Dimension::ALL
            .into_iter()
            .map(|dimension| (dimension, self.score(dimension)))
    }
}

/// Combined view of the user and one friend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compatibility {
    pub user: Profile,
    pub friend: Friend,
    pub scores: CompatibilityScores,
    #[serde(default)]
    pub analysis: Option<String>,
}

impl Compatibility {
    pub fn grade(&self) -> Grade {
        Grade::from_score(self.scores.overall())
    }
}

/// Letter grade derived from a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    APlus,
    A,
    BPlus,
    B,
    CPlus,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 90.0 => Self::APlus,
            s if s >= 85.0 => Self::A,
            s if s >= 80.0 => Self::BPlus,
            s if s >= 75.0 => Self::B,
            s if s >= 70.0 => Self::CPlus,
            s if s >= 65.0 => Self::C,
            s if s >= 60.0 => Self::D,
            _ => Self::F,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::CPlus => "C+",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::{CompatibilityScores, Dimension, Grade};

    #[test]
    fn grade_thresholds_are_inclusive() {
        let cases = [
            (100.0, "A+"),
            (90.0, "A+"),
            (89.9, "A"),
            (85.0, "A"),
            (80.0, "B+"),
            (75.0, "B"),
            (70.0, "C+"),
            (65.0, "C"),
            (60.0, "D"),
            (59.9, "F"),
            (0.0, "F"),
        ];
        for (score, expected) in cases {
            assert_eq!(Grade::from_score(score).as_str(), expected, "score {score}");
        }
    }

    #[test]
    fn dimensions_exclude_overall_and_clamp() {
        let scores = CompatibilityScores {
            overall: 77.0,
            love: 120.0,
            physical_intimacy: -4.0,
            work: 50.0,
            marriage: 61.5,
            friendship: 99.0,
        };
        let listed: Vec<(Dimension, f64)> = scores.dimensions().collect();
        assert_eq!(listed.len(), 5);
        assert_eq!(listed[0], (Dimension::Love, 100.0));
        assert_eq!(listed[1], (Dimension::PhysicalIntimacy, 0.0));
        assert_eq!(Dimension::PhysicalIntimacy.key(), "physical_intimacy");
    }
}
