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

#![deny(clippy::expect_used)]
#![deny(clippy::indexing_slicing)]
#![deny(clippy::panic)]
#![deny(clippy::unwrap_used)]

mod command_line;

use std::fmt::Write as _;
use std::fs;

use bracket_pool::{
    Year, bracket, choices, import,
    matches::MatchKey,
    scoring::{self, Weights},
    store::{Error, Store},
    utils,
};
use clap::Parser;
use log::info;

use crate::command_line::{Args, Command};

#[allow(clippy::too_many_lines)]
fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    utils::init_logger(args.debug);

    if matches!(args.command, Command::Man) {
        return Args::generate_man_page();
    }

    let path = match &args.data_file {
        Some(path) => path.clone(),
        None => utils::data_file()?,
    };

    let mut store = Store::load(&path)?;

    match args.command {
        Command::Import { file } => {
            let import = import::load_csv(&mut store, &file)?;
            store.save(&path)?;

            info!("imported {}", file.display());
            println!(
                "loaded {} rows for {} ({} skipped) and built the bracket",
                import.rows,
                tournament_name(&store, import.year),
                import.skipped,
            );
        }
        Command::Build { tournament, year } => {
            let year = resolve_year(&store, tournament.as_deref(), year)?;
            bracket::build_bracket(&mut store, year)?;
            store.save(&path)?;

            println!("built the bracket for {}", tournament_name(&store, year));
        }
        Command::Record {
            year,
            round,
            match_number,
            victor,
            team1_score,
            team2_score,
        } => {
            let key = MatchKey {
                year,
                round,
                number: match_number,
            };

            store.record_result(key, team1_score, team2_score, victor.as_str())?;
            bracket::on_match_finalized(&mut store, key)?;
            store.save(&path)?;

            println!("{victor} wins {key} of {year}");
        }
        Command::PostPoints {
            tournament,
            weights,
        } => {
            let year = store.tournament_named(tournament.as_str())?.year;

            let weights = match weights {
                Some(file) => ron::from_str(fs::read_to_string(file)?.as_str())?,
                None => Weights::default(),
            };

            let assigned = scoring::assign_tournament_values(&mut store, year, &weights)?;
            store.save(&path)?;

            println!("assigned point values to {assigned} matches");
        }
        Command::Choices {
            year,
            round,
            match_number,
            user,
        } => {
            let key = MatchKey {
                year,
                round,
                number: match_number,
            };

            let teams = choices::team_choices(&store, key, user.as_str())?;
            println!("{key} of {year} offers {user} {} choices:", teams.len());
            for team in &teams {
                println!("{team}");
            }
        }
        Command::Predict {
            year,
            round,
            match_number,
            user,
            team,
            team1_score,
            team2_score,
        } => {
            let key = MatchKey {
                year,
                round,
                number: match_number,
            };

            store.set_prediction(
                user.as_str(),
                key,
                team.as_str(),
                team1_score,
                team2_score,
                utils::today(),
            )?;
            store.save(&path)?;

            println!("{user} picks {team} for {key} of {year}");
        }
        Command::Standings { year } => {
            let year = resolve_year(&store, None, year)?;
            println!("{}", tournament_name(&store, year));

            let mut scores: Vec<(u32, String)> = store
                .users_of(year)
                .into_iter()
                .map(|user| (scoring::user_score(&store, user.as_str(), year), user))
                .collect();
            scores.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

            for (score, user) in &scores {
                println!("{user} {score}");
            }

            for group in store.groups_of(year) {
                let total: u32 = group
                    .members
                    .iter()
                    .map(|member| scoring::user_score(&store, member, year))
                    .sum();
                println!("{group} {total}");
            }
        }
        Command::Show { year } => {
            let year = resolve_year(&store, None, year)?;
            println!("{}", tournament_name(&store, year));

            let field: Vec<String> = store
                .teams_of(year)
                .into_iter()
                .map(|team| team_cell(&store, year, Some(team.as_str())))
                .collect();
            if !field.is_empty() {
                println!("Field: {}", field.join(", "));
            }

            for round in store.rounds_of(year) {
                println!("{round}");

                for (key, game) in store.matches_in_round(year, round.number) {
                    let mut line = format!(
                        "  Match {}: {} v {}",
                        key.number,
                        team_cell(&store, year, game.team1.as_deref()),
                        team_cell(&store, year, game.team2.as_deref()),
                    );

                    if let Some(victor) = game.victor.as_deref() {
                        let _ = write!(line, ", {victor} wins");
                    }
                    if let Some(value) = game.tournament_value {
                        let _ = write!(line, ", worth {value}");
                    }

                    println!("{line}");
                }
            }
        }
        Command::GroupCreate {
            year,
            name,
            captain,
        } => {
            store.create_group(year, name.as_str(), captain.as_str())?;
            store.save(&path)?;

            println!("created group {name} for {}", tournament_name(&store, year));
        }
        Command::GroupJoin { year, name, user } => {
            store.join_group(year, name.as_str(), user.as_str())?;
            store.save(&path)?;

            println!("{user} joined {name}");
        }
        // Handled before the store is opened.
        Command::Man => {}
    }

    Ok(())
}

/// A tournament given by name wins over one given by year; with neither,
/// this year's tournament is assumed.
fn resolve_year(store: &Store, tournament: Option<&str>, year: Option<Year>) -> Result<Year, Error> {
    if let Some(name) = tournament {
        return store
            .tournament_by_name(name)
            .map(|tournament| tournament.year)
            .ok_or_else(|| Error::TournamentNotFound(name.to_string()));
    }

    let year = year.unwrap_or_else(utils::current_year);
    let Some(tournament) = store.tournament(year) else {
        return Err(Error::YearNotFound(year));
    };

    Ok(tournament.year)
}

fn tournament_name(store: &Store, year: Year) -> String {
    store
        .tournament(year)
        .map(ToString::to_string)
        .unwrap_or_else(|| year.to_string())
}

fn team_cell(store: &Store, year: Year, team: Option<&str>) -> String {
    match team {
        Some(team) => match store.seed(year, team) {
            Some(seed) => format!("({seed}) {team}"),
            None => team.to_string(),
        },
        None => "_".to_string(),
    }
}
