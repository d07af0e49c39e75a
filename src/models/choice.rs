use crate::error::GameError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One hand in a confrontation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
    Rock,
    Paper,
    Scissors,
}

impl Choice {
    /// The choice this one defeats. The relation is cyclic, not linear.
    pub fn beats(&self) -> Choice {
        match self {
            Choice::Rock => Choice::Scissors,
            Choice::Scissors => Choice::Paper,
            Choice::Paper => Choice::Rock,
        }
    }

    /// The choice that defeats this one.
    pub fn beaten_by(&self) -> Choice {
        match self {
            Choice::Rock => Choice::Paper,
            Choice::Paper => Choice::Scissors,
            Choice::Scissors => Choice::Rock,
        }
    }

    /// Single-character storage form used by the sequence codec.
    pub fn to_char(self) -> char {
        match self {
            Choice::Rock => 'R',
            Choice::Paper => 'P',
            Choice::Scissors => 'S',
        }
    }

    /// Inverse of [`Choice::to_char`].
    pub fn from_char(c: char) -> Result<Choice, GameError> {
        match c {
            'R' => Ok(Choice::Rock),
            'P' => Ok(Choice::Paper),
            'S' => Ok(Choice::Scissors),
            other => Err(GameError::invalid_encoding(format!(
                "unexpected character '{}'",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Choice::Rock => "rock",
            Choice::Paper => "paper",
            Choice::Scissors => "scissors",
        }
    }

    /// Uniform-random choice; gameplay-fair, not cryptographic.
    pub fn random<R: Rng>(rng: &mut R) -> Choice {
        match rng.gen_range(0..3) {
            0 => Choice::Rock,
            1 => Choice::Paper,
            _ => Choice::Scissors,
        }
    }
}

impl FromStr for Choice {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rock" => Ok(Choice::Rock),
            "paper" => Ok(Choice::Paper),
            "scissors" => Ok(Choice::Scissors),
            other => Err(GameError::invalid_choice(other)),
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one confrontation, seen from the player's side.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Lose,
    Draw,
}

/// Resolve a single confrontation. Pure and total over all nine pairs.
pub fn resolve(player: Choice, opponent: Choice) -> Outcome {
    if player == opponent {
        Outcome::Draw
    } else if player.beats() == opponent {
        Outcome::Win
    } else {
        Outcome::Lose
    }
}

/// Generate `len` uniform-random choices for a computer deck or sequence.
pub fn random_sequence(len: usize) -> Vec<Choice> {
    let mut rng = rand::thread_rng();
    (0..len).map(|_| Choice::random(&mut rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rock_beats_scissors() {
        assert_eq!(resolve(Choice::Rock, Choice::Scissors), Outcome::Win);
        assert_eq!(resolve(Choice::Scissors, Choice::Rock), Outcome::Lose);
    }

    #[test]
    fn test_scissors_beats_paper() {
        assert_eq!(resolve(Choice::Scissors, Choice::Paper), Outcome::Win);
        assert_eq!(resolve(Choice::Paper, Choice::Scissors), Outcome::Lose);
    }

    #[test]
    fn test_paper_beats_rock() {
        assert_eq!(resolve(Choice::Paper, Choice::Rock), Outcome::Win);
        assert_eq!(resolve(Choice::Rock, Choice::Paper), Outcome::Lose);
    }

    #[test]
    fn test_same_choice_draws() {
        for choice in [Choice::Rock, Choice::Paper, Choice::Scissors] {
            assert_eq!(resolve(choice, choice), Outcome::Draw);
        }
    }

    #[test]
    fn test_all_nine_pairs() {
        // Each side wins exactly three of the nine pairings.
        let choices = [Choice::Rock, Choice::Paper, Choice::Scissors];
        let mut wins = 0;
        let mut losses = 0;
        let mut draws = 0;

        for a in &choices {
            for b in &choices {
                match resolve(*a, *b) {
                    Outcome::Win => wins += 1,
                    Outcome::Lose => losses += 1,
                    Outcome::Draw => draws += 1,
                }
            }
        }

        assert_eq!(wins, 3);
        assert_eq!(losses, 3);
        assert_eq!(draws, 3);
    }

    #[test]
    fn test_never_both_win() {
        let choices = [Choice::Rock, Choice::Paper, Choice::Scissors];
        for a in &choices {
            for b in &choices {
                let forward = resolve(*a, *b);
                let backward = resolve(*b, *a);
                assert!(!(forward == Outcome::Win && backward == Outcome::Win));
                assert_eq!(forward == Outcome::Draw, backward == Outcome::Draw);
            }
        }
    }

    #[test]
    fn test_beaten_by_inverts_beats() {
        for choice in [Choice::Rock, Choice::Paper, Choice::Scissors] {
            assert_eq!(choice.beaten_by().beats(), choice);
            assert_eq!(resolve(choice.beaten_by(), choice), Outcome::Win);
        }
    }

    #[test]
    fn test_parse_rejects_unknown_choice() {
        assert!(matches!(
            "lizard".parse::<Choice>(),
            Err(GameError::InvalidChoice(_))
        ));
        assert!(matches!(
            "Rock".parse::<Choice>(),
            Err(GameError::InvalidChoice(_))
        ));
    }

    #[test]
    fn test_parse_round_trips_display() {
        for choice in [Choice::Rock, Choice::Paper, Choice::Scissors] {
            assert_eq!(choice.as_str().parse::<Choice>().unwrap(), choice);
        }
    }

    #[test]
    fn test_random_sequence_length_and_domain() {
        let sequence = random_sequence(100);
        assert_eq!(sequence.len(), 100);
    }
}
