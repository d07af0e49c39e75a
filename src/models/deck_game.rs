use crate::error::GameError;
use crate::models::choice::{resolve, Choice, Outcome};
use crate::models::codec;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Aggregate result of a finished deck round.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoundOutcome {
    Win,
    Lose,
    Draw,
}

/// Stored deck round. Only the encoded decks and the aggregate scores are
/// persisted; the per-game breakdown is recomputed from the decks on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckRoundRecord {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub player_deck: String,
    pub computer_deck: String,
    pub player_score: u32,
    pub computer_score: u32,
    pub outcome: RoundOutcome,
    pub played_at: DateTime<Utc>,
}

/// One confrontation inside a deck round.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameResult {
    pub index: u32,
    pub player_choice: Choice,
    pub computer_choice: Choice,
    pub outcome: Outcome,
    pub points_earned: u32,
    pub streak_score: u32,
    pub combo_score: u32,
    pub lose_score: u32,
    pub stack_broken: bool,
}

/// Full scoring breakdown of a deck round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckBreakdown {
    pub games: Vec<GameResult>,
    pub player_score: u32,
    pub computer_score: u32,
    pub max_streak_score: u32,
    pub max_combo_score: u32,
    pub outcome: RoundOutcome,
}

impl DeckBreakdown {
    /// Replay both decks through the resolver.
    ///
    /// Three counters run together and reset together whenever the player
    /// switches choice between positions: `streak_score` counts the
    /// non-loss run, `combo_score` the win-only run (held through draws on
    /// the same choice), `lose_score` the loss run. A win pays the current
    /// combo, so committing to one choice pays 1, 2, 3, ... per win.
    /// Deterministic: the same decks always produce the same breakdown.
    pub fn compute(player_deck: &[Choice], computer_deck: &[Choice]) -> DeckBreakdown {
        let mut games = Vec::with_capacity(player_deck.len());
        let mut player_score = 0u32;
        let mut computer_score = 0u32;
        let mut streak_score = 0u32;
        let mut combo_score = 0u32;
        let mut lose_score = 0u32;
        let mut max_streak_score = 0u32;
        let mut max_combo_score = 0u32;
        let mut previous: Option<Choice> = None;

        for (i, (&player, &computer)) in player_deck.iter().zip(computer_deck.iter()).enumerate() {
            let outcome = resolve(player, computer);
            let choice_changed = previous.map_or(false, |p| p != player);
            let mut stack_broken = false;
            let mut points_earned = 0u32;

            if choice_changed {
                streak_score = 0;
                combo_score = 0;
                lose_score = 0;
                stack_broken = true;
            }

            match outcome {
                Outcome::Win => {
                    streak_score += 1;
                    combo_score += 1;
                    points_earned = combo_score;
                    player_score += points_earned;
                    lose_score = 0;
                }
                Outcome::Draw => {
                    streak_score += 1;
                    // combo only grows on wins; a draw on the same choice keeps it
                    lose_score = 0;
                }
                Outcome::Lose => {
                    streak_score = 0;
                    combo_score = 0;
                    lose_score += 1;
                    computer_score += 1;
                    stack_broken = true;
                }
            }

            max_streak_score = max_streak_score.max(streak_score);
            max_combo_score = max_combo_score.max(combo_score);

            games.push(GameResult {
                index: i as u32,
                player_choice: player,
                computer_choice: computer,
                outcome,
                points_earned,
                streak_score,
                combo_score,
                lose_score,
                stack_broken,
            });

            previous = Some(player);
        }

        let outcome = if player_score > computer_score {
            RoundOutcome::Win
        } else if computer_score > player_score {
            RoundOutcome::Lose
        } else {
            RoundOutcome::Draw
        };

        DeckBreakdown {
            games,
            player_score,
            computer_score,
            max_streak_score,
            max_combo_score,
            outcome,
        }
    }
}

/// Deck submission DTO.
#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct PlayDeckDTO {
    #[validate(length(equal = 10, message = "deck must hold exactly 10 choices"))]
    pub deck: Vec<String>,
}

impl PlayDeckDTO {
    /// Parse the submitted deck into typed choices.
    pub fn parsed_deck(&self) -> Result<Vec<Choice>, GameError> {
        if self.deck.len() != codec::DECK_LEN {
            return Err(GameError::invalid_deck(format!(
                "expected {} choices, got {}",
                codec::DECK_LEN,
                self.deck.len()
            )));
        }
        self.deck
            .iter()
            .map(|raw| {
                raw.parse::<Choice>()
                    .map_err(|_| GameError::invalid_deck(format!("'{}' is not a valid choice", raw)))
            })
            .collect()
    }
}

/// Deck round response DTO.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeckRoundResponse {
    pub round_id: Uuid,
    pub player_deck: Vec<Choice>,
    pub computer_deck: Vec<Choice>,
    pub games: Vec<GameResult>,
    pub player_score: u32,
    pub computer_score: u32,
    pub max_streak_score: u32,
    pub max_combo_score: u32,
    pub outcome: RoundOutcome,
    pub played_at: DateTime<Utc>,
}

/// History entry without the recomputed per-game breakdown.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeckHistoryEntry {
    pub round_id: Uuid,
    pub player_deck: Vec<Choice>,
    pub computer_deck: Vec<Choice>,
    pub player_score: u32,
    pub computer_score: u32,
    pub outcome: RoundOutcome,
    pub played_at: DateTime<Utc>,
}

/// Per-user deck-mode statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeckUserStats {
    pub total_rounds: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub total_player_score: u64,
    pub total_computer_score: u64,
}
