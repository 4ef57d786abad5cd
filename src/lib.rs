//! A single-elimination tournament prediction pool.
//!
//! Users guess the winners of successive matches. The engine builds the
//! later rounds of a bracket from the first one, pushes finalized winners
//! into the next round, works out which teams a prediction form should
//! offer, and scores predictions with an upset bonus based on seed
//! differential.
//!
//! The [`store::Store`] holds every entity and round-trips through a single
//! RON data file; the `bracket-pool` binary is the command line surface.

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

#![deny(clippy::panic)]

pub mod bracket;
pub mod choices;
pub mod import;
pub mod matches;
pub mod prediction;
pub mod round;
pub mod scoring;
pub mod store;
pub mod tournament;
pub mod utils;

/// A team's rank within one year's bracket, 1 being the favorite.
pub type Seed = u32;
/// Tournament years are four digits, 2000 or later.
pub type Year = u16;

pub const HOME: &str = "bracket-pool";
pub const DATA_FILE: &str = "pool.ron";

pub const COPYRIGHT: &str = r".SH COPYRIGHT
Copyright (C) 2026 Developers of the bracket-pool project

This program is free software: you can redistribute it and/or modify
it under the terms of the GNU Affero General Public License as published by
the Free Software Foundation, either version 3 of the License, or
(at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU Affero General Public License for more details.

You should have received a copy of the GNU Affero General Public License
along with this program.  If not, see <https://www.gnu.org/licenses/>.
";

pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "
Copyright (c) 2026 Developers of the bracket-pool project
Licensed under the AGPLv3"
);
