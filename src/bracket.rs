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

//! Builds the rounds after the first and pushes finalized winners forward.

use log::debug;

use crate::{
    Year,
    matches::MatchKey,
    store::{Error, Store},
};

/// How many rounds a bracket with this many first round matches needs.
fn total_rounds(matches: usize) -> u32 {
    matches.next_power_of_two().ilog2() + 1
}

/// Creates every round after the first, and inside each one a match for
/// every consecutive pair of matches in the round before it. Existing
/// rounds and matches are left untouched, so running this again after more
/// results arrive is a no-op. An odd leftover match is not paired.
///
/// # Errors
///
/// If the tournament does not exist or its first round has no matches.
pub fn build_bracket(store: &mut Store, year: Year) -> Result<(), Error> {
    if store.tournament(year).is_none() {
        return Err(Error::YearNotFound(year));
    }

    let Some(first) = store.first_round_number(year) else {
        return Err(Error::NoFirstRoundMatches(year));
    };

    let count = store.match_count(year, first);
    if count == 0 {
        return Err(Error::NoFirstRoundMatches(year));
    }

    let rounds = total_rounds(count);
    debug!("building {rounds} rounds for {year} from {count} matches");

    let mut prev = first;
    for offset in 1..rounds {
        let number = first + offset;
        store.get_or_create_round(year, number)?;

        let pairs = store.match_count(year, prev) / 2;
        for i in 1..=pairs {
            let i = u32::try_from(i).unwrap_or(u32::MAX);
            store.get_or_create_match(MatchKey {
                year,
                round: number,
                number: i,
            })?;
        }

        prev = number;
    }

    Ok(())
}

/// Writes a finalized match's victor into the open slot of its successor.
///
/// Called by the update path right after a victor is committed. Only one
/// level fires per call; deeper rounds fill in as their own results are
/// entered. A missing successor (final match, or a bracket not built that
/// far yet) is skipped silently.
///
/// # Errors
///
/// If the match does not exist.
pub fn on_match_finalized(store: &mut Store, key: MatchKey) -> Result<(), Error> {
    let Some(game) = store.match_at(key) else {
        return Err(Error::MatchNotFound(key));
    };

    let Some(victor) = game.victor.clone() else {
        return Ok(());
    };

    let (child_key, slot) = key.child();
    if let Some(child) = store.match_at_mut(child_key) {
        *child.slot_mut(slot) = Some(victor);
        debug!("{key} finalized, set {slot} of {child_key}");
    } else {
        debug!("{key} finalized, no successor to fill");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(round: u32, number: u32) -> MatchKey {
        MatchKey {
            year: 2019,
            round,
            number,
        }
    }

    fn first_round(matches: u32) -> Store {
        let mut store = Store::default();
        store.get_or_create_tournament("March Madness", 2019).unwrap();
        store.get_or_create_round(2019, 1).unwrap();

        for number in 1..=matches {
            store.get_or_create_match(key(1, number)).unwrap();
        }

        store
    }

    #[test]
    fn eight_matches_make_four_rounds() -> anyhow::Result<()> {
        let mut store = first_round(8);
        build_bracket(&mut store, 2019)?;

        assert_eq!(store.rounds_of(2019).count(), 4);
        assert_eq!(store.match_count(2019, 1), 8);
        assert_eq!(store.match_count(2019, 2), 4);
        assert_eq!(store.match_count(2019, 3), 2);
        assert_eq!(store.match_count(2019, 4), 1);

        Ok(())
    }

    #[test]
    fn building_twice_changes_nothing() -> anyhow::Result<()> {
        let mut store = first_round(8);
        build_bracket(&mut store, 2019)?;

        let before = store.clone();
        build_bracket(&mut store, 2019)?;
        assert_eq!(store, before);

        Ok(())
    }

    #[test]
    fn an_odd_leftover_match_is_not_paired() -> anyhow::Result<()> {
        let mut store = first_round(6);
        build_bracket(&mut store, 2019)?;

        // ceil(log2(6)) + 1
        assert_eq!(store.rounds_of(2019).count(), 4);
        assert_eq!(store.match_count(2019, 2), 3);
        assert_eq!(store.match_count(2019, 3), 1);
        assert_eq!(store.match_count(2019, 4), 0);

        Ok(())
    }

    #[test]
    fn an_empty_first_round_is_an_error() {
        let mut store = first_round(0);

        let result = build_bracket(&mut store, 2019);
        assert_eq!(
            result.unwrap_err().to_string(),
            "2019 has no first round matches to build from"
        );

        assert!(build_bracket(&mut store, 2020).is_err());
    }

    #[test]
    fn builder_never_demotes_existing_matches() -> anyhow::Result<()> {
        let mut store = first_round(4);
        store.get_or_create_round(2019, 2)?;
        store.get_or_create_match(key(2, 1))?;

        store.add_team("Duke");
        if let Some(game) = store.match_at_mut(key(2, 1)) {
            game.team1 = Some("Duke".to_string());
        }

        build_bracket(&mut store, 2019)?;
        assert_eq!(
            store.match_at(key(2, 1)).and_then(|game| game.team1.as_deref()),
            Some("Duke")
        );

        Ok(())
    }

    #[test]
    fn victors_cascade_into_the_right_slots() -> anyhow::Result<()> {
        let mut store = first_round(8);
        build_bracket(&mut store, 2019)?;

        for number in 1..=8 {
            let team = format!("Team {number}");
            store.add_team(team.as_str());

            if let Some(game) = store.match_at_mut(key(1, number)) {
                game.team1 = Some(team.clone());
                game.team2 = Some(team.clone());
            }

            store.record_result(key(1, number), None, None, team.as_str())?;
            on_match_finalized(&mut store, key(1, number))?;
        }

        for number in 1..=4 {
            let game = store.match_at(key(2, number));
            let team1 = game.and_then(|game| game.team1.as_deref());
            let team2 = game.and_then(|game| game.team2.as_deref());

            assert_eq!(team1, Some(format!("Team {}", number * 2 - 1).as_str()));
            assert_eq!(team2, Some(format!("Team {}", number * 2).as_str()));
        }

        Ok(())
    }

    #[test]
    fn the_final_has_no_successor() -> anyhow::Result<()> {
        let mut store = first_round(2);
        build_bracket(&mut store, 2019)?;

        store.add_team("Duke");
        if let Some(game) = store.match_at_mut(key(2, 1)) {
            game.team1 = Some("Duke".to_string());
            game.team2 = Some("Duke".to_string());
        }

        store.record_result(key(2, 1), None, None, "Duke")?;
        on_match_finalized(&mut store, key(2, 1))?;

        assert!(store.match_at(key(3, 1)).is_none());
        Ok(())
    }

    #[test]
    fn propagation_only_fires_one_level() -> anyhow::Result<()> {
        let mut store = first_round(4);
        build_bracket(&mut store, 2019)?;

        store.add_team("Duke");
        if let Some(game) = store.match_at_mut(key(1, 1)) {
            game.team1 = Some("Duke".to_string());
            game.team2 = Some("Duke".to_string());
        }

        store.record_result(key(1, 1), None, None, "Duke")?;
        on_match_finalized(&mut store, key(1, 1))?;

        // The child gained a team but no victor, so the grandchild is
        // untouched even if the child is finalized elsewhere later.
        assert_eq!(
            store.match_at(key(2, 1)).and_then(|game| game.team1.as_deref()),
            Some("Duke")
        );
        assert_eq!(
            store.match_at(key(3, 1)).and_then(|game| game.team1.as_deref()),
            None
        );

        Ok(())
    }
}
