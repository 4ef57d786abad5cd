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

//! Bulk import of a tournament from a tabular file.
//!
//! The first line is the tournament display key, e.g. `"March Madness
//! 2019"`; the second line names the columns; every following row upserts
//! a round, a match, and up to two teams with their seeds. Rows with
//! missing or malformed fields lose only those fields; only a bad header
//! line fails the whole file. The bracket is built once at end of file.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use log::warn;

use crate::{
    Year,
    bracket::build_bracket,
    matches::{MatchKey, Slot},
    store::Store,
    tournament::split_name_year,
};

const YEAR: &str = "Year";
const ROUND: &str = "Round";
const MATCH: &str = "Match";
const TEAM_1: &str = "Team 1";
const TEAM_1_SEED: &str = "Team 1 Seed";
const TEAM_2: &str = "Team 2";
const TEAM_2_SEED: &str = "Team 2 Seed";
const TOURNAMENT_VALUE: &str = "Tournament Value";

/// What an import did, for reporting back to the operator.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Import {
    pub tournament: String,
    pub year: Year,
    pub rows: u32,
    pub skipped: u32,
}

/// # Errors
///
/// If the file cannot be opened or fails [`load_csv_reader`].
pub fn load_csv(store: &mut Store, path: &Path) -> anyhow::Result<Import> {
    let file = File::open(path)?;
    load_csv_reader(store, BufReader::new(file))
}

/// # Errors
///
/// If the tournament header line is missing or malformed, the rows cannot
/// be read at all, or the loaded first round is empty.
pub fn load_csv_reader<R: BufRead>(store: &mut Store, mut reader: R) -> anyhow::Result<Import> {
    let mut header = String::new();
    reader.read_line(&mut header)?;
    let (name, year) = split_name_year(header.as_str())?;
    store.get_or_create_tournament(name, year)?;

    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = Columns::new(rdr.headers()?);

    let mut rows = 0;
    let mut skipped = 0;
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let line = i + 1;

        let round = field(&record, columns.round).and_then(|s| s.parse::<u32>().ok());
        let number = field(&record, columns.match_number).and_then(|s| s.parse::<u32>().ok());

        let (Some(round), Some(number)) = (round, number) else {
            warn!("row {line}: no round or match number, skipping");
            skipped += 1;
            continue;
        };

        let key = MatchKey {
            year,
            round,
            number,
        };

        if let Err(error) = store
            .get_or_create_round(year, round)
            .and_then(|()| store.get_or_create_match(key))
        {
            warn!("row {line}: {error}, skipping");
            skipped += 1;
            continue;
        }

        // Seeds may be ranked for a different year than the tournament's.
        let rank_year = field(&record, columns.year)
            .and_then(|s| s.parse::<Year>().ok())
            .unwrap_or(year);

        for (team, seed, slot) in [
            (columns.team1, columns.team1_seed, Slot::Team1),
            (columns.team2, columns.team2_seed, Slot::Team2),
        ] {
            let Some(team) = field(&record, team) else {
                continue;
            };

            store.add_team(team);
            if let Some(game) = store.match_at_mut(key) {
                *game.slot_mut(slot) = Some(team.to_string());
            }

            if let Some(seed) = field(&record, seed).and_then(|s| s.parse().ok()) {
                if let Err(error) = store.set_rank(rank_year, team, seed) {
                    warn!("row {line}: {error}");
                }
            }
        }

        if let Some(value) = field(&record, columns.value).and_then(|s| s.parse().ok()) {
            if let Some(game) = store.match_at_mut(key) {
                game.tournament_value = Some(value);
            }
        }

        rows += 1;
    }

    build_bracket(store, year)?;

    Ok(Import {
        tournament: name.to_string(),
        year,
        rows,
        skipped,
    })
}

struct Columns {
    year: Option<usize>,
    round: Option<usize>,
    match_number: Option<usize>,
    team1: Option<usize>,
    team1_seed: Option<usize>,
    team2: Option<usize>,
    team2_seed: Option<usize>,
    value: Option<usize>,
}

impl Columns {
    fn new(headers: &csv::StringRecord) -> Self {
        let position = |name: &str| headers.iter().position(|header| header == name);

        Self {
            year: position(YEAR),
            round: position(ROUND),
            match_number: position(MATCH),
            team1: position(TEAM_1),
            team1_seed: position(TEAM_1_SEED),
            team2: position(TEAM_2),
            team2_seed: position(TEAM_2_SEED),
            value: position(TOURNAMENT_VALUE),
        }
    }
}

fn field(record: &csv::StringRecord, index: Option<usize>) -> Option<&str> {
    record
        .get(index?)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
