use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::store::Error;

/// One tier of the elimination tree. Round 1 holds the most matches, the
/// highest round number holds the final.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Round {
    pub number: u32,
    pub name: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl Round {
    /// # Errors
    ///
    /// If the round number is less than 1.
    pub fn new(number: u32) -> Result<Self, Error> {
        if number < 1 {
            return Err(Error::InvalidNumber);
        }

        Ok(Self {
            number,
            name: format!("Round {number}"),
            start_date: None,
            end_date: None,
        })
    }

    /// Predictions lock once the round's start date is no longer in the
    /// future. A round without a start date never locks.
    #[must_use]
    pub fn started(&self, today: NaiveDate) -> bool {
        self.start_date.is_some_and(|date| date <= today)
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
