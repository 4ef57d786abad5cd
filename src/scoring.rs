//! Scores predictions and assigns per-match point values.
//!
//! The two computations are independent: the standings page counts one
//! point per correct guess, while each match also carries a value that
//! rewards predicted upsets, scaled by how late in the tournament the
//! match occurs.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::{
    Year,
    matches::MatchKey,
    store::{Error, Store},
};

/// The weight tables for match values: one factor per round number, one
/// per seed pairing written winner first, e.g. `"16 v 1"`. Missing entries
/// count as 1.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Weights {
    pub rounds: FxHashMap<u32, u32>,
    pub seeds: FxHashMap<String, u32>,
}

impl Default for Weights {
    /// The tables the pool has always used: a first round 16 over 1 upset
    /// is worth 2 × 8 = 16 points.
    fn default() -> Self {
        let rounds = [(1, 2), (2, 2), (3, 4), (4, 6), (5, 8), (6, 10)]
            .into_iter()
            .collect();

        let seeds = [
            ("16 v 1", 8),
            ("15 v 2", 7),
            ("14 v 3", 6),
            ("13 v 4", 5),
            ("12 v 5", 4),
            ("11 v 6", 3),
            ("10 v 7", 2),
            ("9 v 8", 1),
        ]
        .into_iter()
        .map(|(pairing, weight)| (pairing.to_string(), weight))
        .collect();

        Self { rounds, seeds }
    }
}

/// How many of a user's finalized predictions in a tournament were right.
/// This is an unweighted count; match values play no part in it.
#[must_use]
pub fn user_score(store: &Store, user: &str, year: Year) -> u32 {
    let correct = store
        .predictions
        .iter()
        .filter(|((owner, key), _)| owner == user && key.year == year)
        .filter_map(|((_, key), prediction)| {
            let game = store.match_at(*key)?;
            prediction.guessed_right(game.victor.as_deref())
        })
        .filter(|right| *right)
        .count();

    u32::try_from(correct).unwrap_or(u32::MAX)
}

/// The sum of the member scores of a group.
///
/// # Errors
///
/// If the group does not exist.
pub fn group_score(store: &Store, year: Year, name: &str) -> Result<u32, Error> {
    let Some(group) = store.group(year, name) else {
        return Err(Error::GroupNotFound(year, name.to_string()));
    };

    Ok(group
        .members
        .iter()
        .map(|member| user_score(store, member, year))
        .sum())
}

/// Assigns a match its point value: round weight times seed weight for the
/// `"{winner seed} v {loser seed}"` pairing. Returns whether a value was
/// written; a match with no victor yet, an open slot, or an unranked team
/// keeps its previous value.
///
/// The loser is whichever of the two teams is not the victor, regardless
/// of which slot the victor sits in.
///
/// # Errors
///
/// If the match does not exist.
pub fn assign_match_value(
    store: &mut Store,
    key: MatchKey,
    weights: &Weights,
) -> Result<bool, Error> {
    let Some(game) = store.match_at(key) else {
        return Err(Error::MatchNotFound(key));
    };

    let Some(victor) = game.victor.clone() else {
        return Ok(false);
    };

    let Some(loser) = game.loser().map(str::to_string) else {
        return Ok(false);
    };

    let (Some(winner_seed), Some(loser_seed)) = (
        store.seed(key.year, victor.as_str()),
        store.seed(key.year, loser.as_str()),
    ) else {
        return Ok(false);
    };

    let pairing = format!("{winner_seed} v {loser_seed}");
    let value = weights.rounds.get(&key.round).copied().unwrap_or(1)
        * weights.seeds.get(pairing.as_str()).copied().unwrap_or(1);

    if let Some(game) = store.match_at_mut(key) {
        game.tournament_value = Some(value);
    }

    Ok(true)
}

/// Runs [`assign_match_value`] over every match of a tournament and
/// returns how many values were written.
///
/// # Errors
///
/// If the tournament does not exist.
pub fn assign_tournament_values(
    store: &mut Store,
    year: Year,
    weights: &Weights,
) -> Result<u32, Error> {
    if store.tournament(year).is_none() {
        return Err(Error::YearNotFound(year));
    }

    let mut assigned = 0;
    for key in store.match_keys(year) {
        if assign_match_value(store, key, weights)? {
            assigned += 1;
        }
    }

    Ok(assigned)
}
