// This file is part of bracket-pool.
//
// bracket-pool is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// bracket-pool is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    io::ErrorKind,
    path::Path,
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    Seed, Year,
    matches::{Match, MatchKey},
    prediction::UserPrediction,
    round::Round,
    tournament::{Group, Tournament, validate_year},
};

#[derive(Debug, Error)]
pub enum Error {
    #[error("no tournament named '{0}' is on file")]
    TournamentNotFound(String),
    #[error("no tournament is on file for {0}")]
    YearNotFound(Year),
    #[error("a tournament already exists for {0}")]
    YearTaken(Year),
    #[error("Round {1} of {0} does not exist")]
    RoundNotFound(Year, u32),
    #[error("{0} does not exist")]
    MatchNotFound(MatchKey),
    #[error("no team named '{0}' is on file")]
    TeamNotFound(String),
    #[error("no group named '{1}' is on file for {0}")]
    GroupNotFound(Year, String),
    #[error("a group named '{1}' already exists for {0}")]
    GroupTaken(Year, String),
    #[error("'{team}' is already ranked for {year}")]
    TeamRanked { year: Year, team: String },
    #[error("seed {seed} is already taken for {year}")]
    SeedTaken { year: Year, seed: Seed },
    #[error("invalid year {0}, the year must be four digits and at least 2000")]
    InvalidYear(Year),
    #[error("round and match numbers start at 1")]
    InvalidNumber,
    #[error("the victor must be one of the teams in the match")]
    VictorNotInMatch,
    #[error("you cannot set or change a prediction after the round has started")]
    RoundStarted,
    #[error("{0} has no first round matches to build from")]
    NoFirstRoundMatches(Year),
    #[error("invalid tournament header '{0}', expected '<name> <year>'")]
    TournamentHeader(String),
}

/// Every entity of the pool, index-addressed: rounds by `(year, number)`,
/// matches by [`MatchKey`], so walking the bracket tree is key arithmetic
/// instead of chasing references.
///
/// Nothing in here is ever deleted; uniqueness of the keys is the only
/// mutual exclusion the engine relies on.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Store {
    #[serde(default)]
    pub teams: BTreeSet<String>,
    #[serde(default)]
    pub ranks: BTreeMap<(Year, String), Seed>,
    #[serde(default)]
    pub tournaments: BTreeMap<Year, Tournament>,
    #[serde(default)]
    pub rounds: BTreeMap<(Year, u32), Round>,
    #[serde(default)]
    pub matches: BTreeMap<MatchKey, Match>,
    #[serde(default)]
    pub predictions: BTreeMap<(String, MatchKey), UserPrediction>,
    #[serde(default)]
    pub groups: BTreeMap<(Year, String), Group>,
}

impl Store {
    /// Reads the data file, or starts fresh if there is none yet.
    ///
    /// # Errors
    ///
    /// If the file cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        match fs::read_to_string(path) {
            Ok(string) => Ok(ron::from_str(string.as_str())?),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => Err(error.into()),
        }
    }

    /// # Errors
    ///
    /// If the file cannot be serialized or written.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        fs::write(path, string)?;
        Ok(())
    }

    // Tournaments.

    #[must_use]
    pub fn tournament(&self, year: Year) -> Option<&Tournament> {
        self.tournaments.get(&year)
    }

    #[must_use]
    pub fn tournament_by_name(&self, name: &str) -> Option<&Tournament> {
        self.tournaments.values().find(|t| t.name == name)
    }

    /// Looks up a tournament by its display key, e.g. `"March Madness 2019"`.
    ///
    /// # Errors
    ///
    /// If the display key is malformed or no such tournament exists.
    pub fn tournament_named(&self, name_year: &str) -> Result<&Tournament, Error> {
        let (name, year) = crate::tournament::split_name_year(name_year)?;

        self.tournaments
            .get(&year)
            .filter(|t| t.name == name)
            .ok_or_else(|| Error::TournamentNotFound(name_year.trim().to_string()))
    }

    /// # Errors
    ///
    /// If the year is invalid, or already belongs to a differently named
    /// tournament.
    pub fn get_or_create_tournament(&mut self, name: &str, year: Year) -> Result<(), Error> {
        if let Some(existing) = self.tournaments.get(&year) {
            if existing.name == name {
                return Ok(());
            }

            return Err(Error::YearTaken(year));
        }

        self.tournaments.insert(year, Tournament::new(name, year)?);
        Ok(())
    }

    // Rounds.

    #[must_use]
    pub fn round(&self, year: Year, number: u32) -> Option<&Round> {
        self.rounds.get(&(year, number))
    }

    pub fn rounds_of(&self, year: Year) -> impl Iterator<Item = &Round> {
        self.rounds
            .range((year, u32::MIN)..=(year, u32::MAX))
            .map(|(_, round)| round)
    }

    #[must_use]
    pub fn first_round_number(&self, year: Year) -> Option<u32> {
        self.rounds_of(year).map(|round| round.number).next()
    }

    /// # Errors
    ///
    /// If the tournament does not exist or the round number is less than 1.
    pub fn get_or_create_round(&mut self, year: Year, number: u32) -> Result<(), Error> {
        if !self.tournaments.contains_key(&year) {
            return Err(Error::YearNotFound(year));
        }

        if self.rounds.contains_key(&(year, number)) {
            return Ok(());
        }

        self.rounds.insert((year, number), Round::new(number)?);
        Ok(())
    }

    /// # Errors
    ///
    /// If the round does not exist.
    pub fn set_round_dates(
        &mut self,
        year: Year,
        number: u32,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<(), Error> {
        let Some(round) = self.rounds.get_mut(&(year, number)) else {
            return Err(Error::RoundNotFound(year, number));
        };

        round.start_date = start_date;
        round.end_date = end_date;
        Ok(())
    }

    // Matches.

    #[must_use]
    pub fn match_at(&self, key: MatchKey) -> Option<&Match> {
        self.matches.get(&key)
    }

    #[must_use]
    pub fn match_at_mut(&mut self, key: MatchKey) -> Option<&mut Match> {
        self.matches.get_mut(&key)
    }

    pub fn matches_in_round(&self, year: Year, round: u32) -> impl Iterator<Item = (&MatchKey, &Match)> {
        let from = MatchKey {
            year,
            round,
            number: u32::MIN,
        };
        let to = MatchKey {
            year,
            round,
            number: u32::MAX,
        };

        self.matches.range(from..=to)
    }

    #[must_use]
    pub fn match_count(&self, year: Year, round: u32) -> usize {
        self.matches_in_round(year, round).count()
    }

    /// Every match of a tournament, in bracket order.
    pub fn matches_of(&self, year: Year) -> impl Iterator<Item = (&MatchKey, &Match)> {
        let from = MatchKey {
            year,
            round: u32::MIN,
            number: u32::MIN,
        };
        let to = MatchKey {
            year,
            round: u32::MAX,
            number: u32::MAX,
        };

        self.matches.range(from..=to)
    }

    /// Every match key of a tournament, in bracket order.
    #[must_use]
    pub fn match_keys(&self, year: Year) -> Vec<MatchKey> {
        self.matches_of(year).map(|(key, _)| *key).collect()
    }

    /// Never overwrites an existing match.
    ///
    /// # Errors
    ///
    /// If the round does not exist or the match number is less than 1.
    pub fn get_or_create_match(&mut self, key: MatchKey) -> Result<(), Error> {
        if !self.rounds.contains_key(&(key.year, key.round)) {
            return Err(Error::RoundNotFound(key.year, key.round));
        }

        if key.number < 1 {
            return Err(Error::InvalidNumber);
        }

        self.matches.entry(key).or_default();
        Ok(())
    }

    /// Commits a final score and victor. Propagation into the next round is
    /// the caller's explicit next step, see [`crate::bracket::on_match_finalized`].
    ///
    /// # Errors
    ///
    /// If the match does not exist or the victor is not one of its teams.
    pub fn record_result(
        &mut self,
        key: MatchKey,
        team1_score: Option<u32>,
        team2_score: Option<u32>,
        victor: &str,
    ) -> Result<(), Error> {
        let Some(game) = self.matches.get_mut(&key) else {
            return Err(Error::MatchNotFound(key));
        };

        if !game.has_team(victor) {
            return Err(Error::VictorNotInMatch);
        }

        game.team1_score = team1_score;
        game.team2_score = team2_score;
        game.victor = Some(victor.to_string());
        Ok(())
    }

    // Teams and seeds.

    pub fn add_team(&mut self, name: &str) {
        if !self.teams.contains(name) {
            self.teams.insert(name.to_string());
        }
    }

    /// Seeds a team for a year. Re-asserting the identical rank is a no-op;
    /// both `(year, team)` and `(year, seed)` are unique within a year.
    ///
    /// # Errors
    ///
    /// If the year is invalid, the team is unknown, or either uniqueness
    /// rule would be violated.
    pub fn set_rank(&mut self, year: Year, team: &str, seed: Seed) -> Result<(), Error> {
        validate_year(year)?;

        if !self.teams.contains(team) {
            return Err(Error::TeamNotFound(team.to_string()));
        }

        if let Some(existing) = self.ranks.get(&(year, team.to_string())) {
            if *existing == seed {
                return Ok(());
            }

            return Err(Error::TeamRanked {
                year,
                team: team.to_string(),
            });
        }

        let taken = self
            .ranks
            .range((year, String::new())..)
            .take_while(|((y, _), _)| *y == year)
            .any(|((_, t), s)| *s == seed && t != team);

        if taken {
            return Err(Error::SeedTaken { year, seed });
        }

        self.ranks.insert((year, team.to_string()), seed);
        Ok(())
    }

    #[must_use]
    pub fn seed(&self, year: Year, team: &str) -> Option<Seed> {
        self.ranks.get(&(year, team.to_string())).copied()
    }

    /// The distinct teams appearing in a tournament's matches, ordered by
    /// seed and then name; unseeded teams sort last.
    #[must_use]
    pub fn teams_of(&self, year: Year) -> Vec<String> {
        let mut teams: BTreeSet<&str> = BTreeSet::new();

        for (_, game) in self.matches_of(year) {
            if let Some(team) = game.team1.as_deref() {
                teams.insert(team);
            }
            if let Some(team) = game.team2.as_deref() {
                teams.insert(team);
            }
        }

        let mut teams: Vec<String> = teams.into_iter().map(str::to_string).collect();
        teams.sort_by_key(|team| (self.seed(year, team).unwrap_or(Seed::MAX), team.clone()));
        teams
    }

    // Predictions.

    #[must_use]
    pub fn prediction(&self, user: &str, key: MatchKey) -> Option<&UserPrediction> {
        self.predictions.get(&(user.to_string(), key))
    }

    /// Creates or updates a user's guess for a match. Rejected once the
    /// owning round's start date is no longer in the future.
    ///
    /// # Errors
    ///
    /// If the match, its round, or the guessed team does not exist, or the
    /// round has started.
    pub fn set_prediction(
        &mut self,
        user: &str,
        key: MatchKey,
        guess: &str,
        team1_score: Option<u32>,
        team2_score: Option<u32>,
        today: NaiveDate,
    ) -> Result<(), Error> {
        if !self.matches.contains_key(&key) {
            return Err(Error::MatchNotFound(key));
        }

        let Some(round) = self.rounds.get(&(key.year, key.round)) else {
            return Err(Error::RoundNotFound(key.year, key.round));
        };

        if round.started(today) {
            return Err(Error::RoundStarted);
        }

        if !self.teams.contains(guess) {
            return Err(Error::TeamNotFound(guess.to_string()));
        }

        self.predictions.insert(
            (user.to_string(), key),
            UserPrediction {
                guess: guess.to_string(),
                team1_score,
                team2_score,
            },
        );
        Ok(())
    }

    /// Everyone who has predicted at least one match of a tournament.
    #[must_use]
    pub fn users_of(&self, year: Year) -> BTreeSet<String> {
        self.predictions
            .iter()
            .filter(|((_, key), _)| key.year == year)
            .map(|((user, _), _)| user.clone())
            .collect()
    }

    // Groups.

    #[must_use]
    pub fn group(&self, year: Year, name: &str) -> Option<&Group> {
        self.groups.get(&(year, name.to_string()))
    }

    pub fn groups_of(&self, year: Year) -> impl Iterator<Item = &Group> {
        self.groups
            .range((year, String::new())..)
            .take_while(move |((y, _), _)| *y == year)
            .map(|(_, group)| group)
    }

    /// # Errors
    ///
    /// If the tournament does not exist or the group name is taken.
    pub fn create_group(&mut self, year: Year, name: &str, captain: &str) -> Result<(), Error> {
        if !self.tournaments.contains_key(&year) {
            return Err(Error::YearNotFound(year));
        }

        if self.groups.contains_key(&(year, name.to_string())) {
            return Err(Error::GroupTaken(year, name.to_string()));
        }

        self.groups.insert(
            (year, name.to_string()),
            Group {
                name: name.to_string(),
                captain: captain.to_string(),
                members: Vec::new(),
            },
        );
        Ok(())
    }

    /// # Errors
    ///
    /// If the group does not exist.
    pub fn join_group(&mut self, year: Year, name: &str, user: &str) -> Result<(), Error> {
        let Some(group) = self.groups.get_mut(&(year, name.to_string())) else {
            return Err(Error::GroupNotFound(year, name.to_string()));
        };

        if !group.members.iter().any(|member| member == user) {
            group.members.push(user.to_string());
        }

        Ok(())
    }
}
