use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Year;

/// Matches are addressed by key arithmetic instead of object references:
/// match `m` of round `r` is fed by matches `2m - 1` and `2m` of round
/// `r - 1` and feeds match `⌈m / 2⌉` of round `r + 1`.
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct MatchKey {
    pub year: Year,
    pub round: u32,
    pub number: u32,
}

impl MatchKey {
    /// The match this one feeds into, and which slot the winner lands in:
    /// odd match numbers fill `team1`, even ones fill `team2`.
    #[must_use]
    pub fn child(self) -> (Self, Slot) {
        let half = self.number / 2;

        if self.number % 2 == 0 {
            (
                Self {
                    round: self.round + 1,
                    number: half,
                    ..self
                },
                Slot::Team2,
            )
        } else {
            (
                Self {
                    round: self.round + 1,
                    number: half + 1,
                    ..self
                },
                Slot::Team1,
            )
        }
    }

    /// The two matches that feed this one. The keys always compute; in
    /// round 1 they point below the tree and will not be on file.
    #[must_use]
    pub fn parents(self) -> [Self; 2] {
        let double = self.number * 2;

        [
            Self {
                round: self.round.saturating_sub(1),
                number: double - 1,
                ..self
            },
            Self {
                round: self.round.saturating_sub(1),
                number: double,
                ..self
            },
        ]
    }
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Round {} Match {}", self.round, self.number)
    }
}

/// Which side of a match a team occupies.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Slot {
    Team1,
    Team2,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Team1 => write!(f, "team 1"),
            Slot::Team2 => write!(f, "team 2"),
        }
    }
}

/// One match of the bracket. Teams fill in as earlier rounds resolve, so
/// every field starts out empty.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Match {
    #[serde(default)]
    pub team1: Option<String>,
    #[serde(default)]
    pub team2: Option<String>,
    #[serde(default)]
    pub team1_score: Option<u32>,
    #[serde(default)]
    pub team2_score: Option<u32>,
    #[serde(default)]
    pub victor: Option<String>,
    #[serde(default)]
    pub tournament_value: Option<u32>,
}

impl Match {
    pub fn slot_mut(&mut self, slot: Slot) -> &mut Option<String> {
        match slot {
            Slot::Team1 => &mut self.team1,
            Slot::Team2 => &mut self.team2,
        }
    }

    /// Whichever of the two teams is not the victor. `None` until a victor
    /// is set or while the other slot is still open.
    #[must_use]
    pub fn loser(&self) -> Option<&str> {
        let victor = self.victor.as_deref()?;

        if self.team1.as_deref() == Some(victor) {
            self.team2.as_deref()
        } else {
            self.team1.as_deref()
        }
    }

    #[must_use]
    pub fn has_team(&self, team: &str) -> bool {
        self.team1.as_deref() == Some(team) || self.team2.as_deref() == Some(team)
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} v {}",
            self.team1.as_deref().unwrap_or("_"),
            self.team2.as_deref().unwrap_or("_"),
        )
    }
}
