use serde::{Deserialize, Serialize};

/// One user's guess for one match, with optional score predictions.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct UserPrediction {
    pub guess: String,
    #[serde(default)]
    pub team1_score: Option<u32>,
    #[serde(default)]
    pub team2_score: Option<u32>,
}

impl UserPrediction {
    /// Whether the guess was correct. `None` while the match has no victor.
    #[must_use]
    pub fn guessed_right(&self, victor: Option<&str>) -> Option<bool> {
        victor.map(|victor| victor == self.guess)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undecided_until_there_is_a_victor() {
        let prediction = UserPrediction {
            guess: "Duke".to_string(),
            team1_score: None,
            team2_score: None,
        };

        assert_eq!(prediction.guessed_right(None), None);
        assert_eq!(prediction.guessed_right(Some("Duke")), Some(true));
        assert_eq!(prediction.guessed_right(Some("UCF")), Some(false));
    }
}
