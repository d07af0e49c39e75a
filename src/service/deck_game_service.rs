use crate::config::GameConfig;
use crate::error::GameError;
use crate::models::choice::random_sequence;
use crate::models::codec;
use crate::models::deck_game::{
    DeckBreakdown, DeckHistoryEntry, DeckRoundRecord, DeckRoundResponse, DeckUserStats,
    PlayDeckDTO,
};
use crate::store::{AccountLedger, RoundStore};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

/// Deck mode engine - scores a submitted 10-choice deck against a freshly
/// generated computer deck in a single shot.
///
/// A round is computed fully in memory before anything is written; the
/// stored record holds only the encoded decks and the aggregate scores,
/// and reads reconstruct the breakdown by replaying the resolver.
pub struct DeckGameService {
    rounds: Arc<dyn RoundStore>,
    ledger: Arc<dyn AccountLedger>,
    config: GameConfig,
}

impl DeckGameService {
    pub fn new(
        rounds: Arc<dyn RoundStore>,
        ledger: Arc<dyn AccountLedger>,
        config: GameConfig,
    ) -> Self {
        Self {
            rounds,
            ledger,
            config,
        }
    }

    // =============================================================================
    // PLAY
    // =============================================================================

    /// Play a full deck round: validate, score, persist, credit points.
    pub async fn play_round(
        &self,
        owner_id: Uuid,
        dto: PlayDeckDTO,
    ) -> Result<DeckRoundResponse, GameError> {
        Validate::validate(&dto).map_err(|e| GameError::invalid_deck(e.to_string()))?;
        let player_deck = dto.parsed_deck()?;

        let computer_deck = random_sequence(codec::DECK_LEN);
        let breakdown = DeckBreakdown::compute(&player_deck, &computer_deck);

        info!(
            owner = %owner_id,
            player_score = breakdown.player_score,
            computer_score = breakdown.computer_score,
            outcome = ?breakdown.outcome,
            "Deck round resolved"
        );

        let record = self
            .rounds
            .persist_round(
                owner_id,
                &codec::encode(&player_deck),
                &codec::encode(&computer_deck),
                breakdown.player_score,
                breakdown.computer_score,
                breakdown.outcome,
            )
            .await?;

        if breakdown.player_score > 0 {
            self.ledger
                .add_points(owner_id, breakdown.player_score)
                .await?;
        }

        Ok(Self::to_response(&record, breakdown))
    }

    // =============================================================================
    // QUERY
    // =============================================================================

    /// Reload a stored round and reconstruct its per-game breakdown by
    /// replaying the resolver over the persisted decks.
    pub async fn get_round(
        &self,
        owner_id: Uuid,
        round_id: Uuid,
    ) -> Result<DeckRoundResponse, GameError> {
        let record = self
            .rounds
            .find_round(round_id)
            .await?
            .ok_or(GameError::NotFound)?;

        if record.owner_id != owner_id {
            return Err(GameError::Forbidden);
        }

        let player_deck = codec::decode(&record.player_deck)?;
        let computer_deck = codec::decode(&record.computer_deck)?;
        let breakdown = DeckBreakdown::compute(&player_deck, &computer_deck);

        debug!(round = %round_id, "Replayed stored deck round");

        Ok(Self::to_response(&record, breakdown))
    }

    /// The owner's most recent rounds, newest first.
    pub async fn user_history(
        &self,
        owner_id: Uuid,
        limit: Option<usize>,
    ) -> Result<Vec<DeckHistoryEntry>, GameError> {
        let limit = limit.unwrap_or(self.config.history_page_size);
        let records = self.rounds.find_user_history(owner_id, limit).await?;

        records
            .into_iter()
            .map(|record| {
                Ok(DeckHistoryEntry {
                    round_id: record.id,
                    player_deck: codec::decode(&record.player_deck)?,
                    computer_deck: codec::decode(&record.computer_deck)?,
                    player_score: record.player_score,
                    computer_score: record.computer_score,
                    outcome: record.outcome,
                    played_at: record.played_at,
                })
            })
            .collect()
    }

    pub async fn user_stats(&self, owner_id: Uuid) -> Result<DeckUserStats, GameError> {
        self.rounds.user_stats(owner_id).await
    }

    fn to_response(record: &DeckRoundRecord, breakdown: DeckBreakdown) -> DeckRoundResponse {
        DeckRoundResponse {
            round_id: record.id,
            player_deck: breakdown.games.iter().map(|g| g.player_choice).collect(),
            computer_deck: breakdown.games.iter().map(|g| g.computer_choice).collect(),
            games: breakdown.games,
            player_score: breakdown.player_score,
            computer_score: breakdown.computer_score,
            max_streak_score: breakdown.max_streak_score,
            max_combo_score: breakdown.max_combo_score,
            outcome: breakdown.outcome,
            played_at: record.played_at,
        }
    }
}
