//! Works out which teams a prediction form should offer for a match.
//!
//! A user who already predicted an upstream match sees their own pick
//! carried forward before the real result is known, so they can fill in
//! the deeper rounds of their bracket early.

use crate::{
    matches::MatchKey,
    store::{Error, Store},
};

/// The candidate teams for a match, team 1 side first. With both teams
/// confirmed this is exactly those two; otherwise each side falls back to
/// the user's own upstream pick, the parent's candidates, or the whole
/// team pool. Duplicates across the two sides are kept; the form decides
/// how to render them (a radio pair when there are exactly two).
///
/// # Errors
///
/// If the match does not exist.
pub fn team_choices(store: &Store, key: MatchKey, user: &str) -> Result<Vec<String>, Error> {
    let Some(game) = store.match_at(key) else {
        return Err(Error::MatchNotFound(key));
    };

    if let (Some(team1), Some(team2)) = (&game.team1, &game.team2) {
        return Ok(vec![team1.clone(), team2.clone()]);
    }

    let [parent1, parent2] = key.parents();
    let mut teams = side(store, game.team1.as_ref(), parent1, user);
    teams.extend(side(store, game.team2.as_ref(), parent2, user));

    Ok(teams)
}

fn side(store: &Store, confirmed: Option<&String>, parent: MatchKey, user: &str) -> Vec<String> {
    if let Some(team) = confirmed {
        return vec![team.clone()];
    }

    // No parent match on file means we are at the edge of the tree with no
    // history to narrow things down.
    if store.match_at(parent).is_none() {
        return store.teams.iter().cloned().collect();
    }

    if let Some(prediction) = store.prediction(user, parent) {
        return vec![prediction.guess.clone()];
    }

    team_choices(store, parent, user).unwrap_or_default()
}
