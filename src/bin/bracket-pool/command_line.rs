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

use std::{io::Write as _, path::PathBuf};

use bracket_pool::{COPYRIGHT, LONG_VERSION, Year};
use clap::{CommandFactory, Parser, Subcommand};

/// Tournament Prediction Pool
///
/// Tracks a single-elimination tournament and everyone's bracket
/// predictions in a single data file.
#[derive(Parser, Debug)]
#[command(long_version = LONG_VERSION, about = "Tournament prediction pool")]
pub(crate) struct Args {
    /// Whether to log on the debug level
    #[arg(long)]
    pub debug: bool,

    /// Where the pool data file lives
    #[arg(long)]
    pub data_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Load a tournament from a CSV file and build its bracket
    Import {
        /// A header line '<name> <year>', a column line, then one row per
        /// first round match
        file: PathBuf,
    },

    /// Create the later rounds once the first round is fully entered
    Build {
        /// Tournament name to build the bracket for; not needed when
        /// building by year
        #[arg(long, short)]
        tournament: Option<String>,

        /// Year of the tournament; defaults to this year
        #[arg(long, short)]
        year: Option<Year>,
    },

    /// Record a match result and push the victor into the next round
    Record {
        year: Year,
        round: u32,
        match_number: u32,

        /// The winning team
        #[arg(long)]
        victor: String,

        #[arg(long)]
        team1_score: Option<u32>,

        #[arg(long)]
        team2_score: Option<u32>,
    },

    /// Assign every match of a tournament its point value
    PostPoints {
        /// Tournament name with year (EX: 'March Madness 2019')
        tournament: String,

        /// A RON file holding the round and seed weight tables
        #[arg(long)]
        weights: Option<PathBuf>,
    },

    /// Show the teams a prediction form would offer for a match
    Choices {
        year: Year,
        round: u32,
        match_number: u32,

        #[arg(long)]
        user: String,
    },

    /// Guess the winner of a match before its round starts
    Predict {
        year: Year,
        round: u32,
        match_number: u32,

        #[arg(long)]
        user: String,

        /// The guessed team
        #[arg(long)]
        team: String,

        #[arg(long)]
        team1_score: Option<u32>,

        #[arg(long)]
        team2_score: Option<u32>,
    },

    /// Print everyone's scores, group totals included
    Standings {
        /// Year of the tournament; defaults to this year
        #[arg(long, short)]
        year: Option<Year>,
    },

    /// Print a tournament's bracket
    Show {
        /// Year of the tournament; defaults to this year
        #[arg(long, short)]
        year: Option<Year>,
    },

    /// Create a scoring group
    GroupCreate {
        year: Year,
        name: String,

        #[arg(long)]
        captain: String,
    },

    /// Add a user to a scoring group
    GroupJoin {
        year: Year,
        name: String,

        #[arg(long)]
        user: String,
    },

    /// Build the manpage
    Man,
}

impl Args {
    pub(crate) fn generate_man_page() -> anyhow::Result<()> {
        let mut buffer: Vec<u8> = Vec::default();
        let cmd = Self::command().name("bracket-pool").long_version(None);
        let man = clap_mangen::Man::new(cmd).date("2026-02-14");

        man.render(&mut buffer)?;
        write!(buffer, "{COPYRIGHT}")?;

        std::fs::write("bracket-pool.1", buffer)?;
        Ok(())
    }
}
