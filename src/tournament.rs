use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Year, store::Error};

/// One tournament instance, keyed by its year.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Tournament {
    pub name: String,
    pub year: Year,
}

impl Tournament {
    /// # Errors
    ///
    /// If the year is not four digits or is before 2000.
    pub fn new(name: &str, year: Year) -> Result<Self, Error> {
        validate_year(year)?;

        Ok(Self {
            name: name.to_string(),
            year,
        })
    }
}

impl fmt::Display for Tournament {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year = self.year.to_string();
        if self.name.contains(year.as_str()) {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} {year}", self.name)
        }
    }
}

/// A named set of users whose scores are totaled together on the
/// standings page.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Group {
    pub name: String,
    pub captain: String,
    #[serde(default)]
    pub members: Vec<String>,
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (captain {})", self.name, self.captain)
    }
}

/// # Errors
///
/// If the year is not four digits or is before 2000.
pub fn validate_year(year: Year) -> Result<(), Error> {
    if !(2000..=9999).contains(&year) {
        return Err(Error::InvalidYear(year));
    }

    Ok(())
}

/// Splits a display name like `"March Madness 2019"` into the name and
/// the year.
///
/// # Errors
///
/// If there is no trailing year or it fails to parse.
pub fn split_name_year(string: &str) -> Result<(&str, Year), Error> {
    let Some((name, year)) = string.trim().rsplit_once(' ') else {
        return Err(Error::TournamentHeader(string.trim().to_string()));
    };

    let Ok(year) = year.parse::<Year>() else {
        return Err(Error::TournamentHeader(string.trim().to_string()));
    };

    validate_year(year)?;
    Ok((name, year))
}
