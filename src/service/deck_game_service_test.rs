#[cfg(test)]
mod tests {
    use crate::config::GameConfig;
    use crate::error::GameError;
    use crate::models::choice::Outcome;
    use crate::models::deck_game::PlayDeckDTO;
    use crate::service::deck_game_service::DeckGameService;
    use crate::store::{AccountLedger, InMemoryLedger, InMemoryRoundStore, RoundStore};
    use std::sync::Arc;
    use uuid::Uuid;

    /// Helper to create a test service with shared stores
    fn create_test_service() -> (DeckGameService, Arc<InMemoryRoundStore>, Arc<InMemoryLedger>) {
        let rounds = Arc::new(InMemoryRoundStore::new());
        let ledger = Arc::new(InMemoryLedger::new());
        let service = DeckGameService::new(
            rounds.clone(),
            ledger.clone(),
            GameConfig::default(),
        );
        (service, rounds, ledger)
    }

    fn deck_of(choices: &[&str]) -> PlayDeckDTO {
        PlayDeckDTO {
            deck: choices.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_play_round_scores_and_persists() {
        let (service, rounds, ledger) = create_test_service();
        let owner = Uuid::new_v4();

        let response = service
            .play_round(owner, deck_of(&["rock"; 10]))
            .await
            .unwrap();

        assert_eq!(response.games.len(), 10);
        assert_eq!(response.player_deck.len(), 10);
        assert_eq!(response.computer_deck.len(), 10);

        // Score conservation against the per-game breakdown.
        let points_sum: u32 = response.games.iter().map(|g| g.points_earned).sum();
        assert_eq!(response.player_score, points_sum);
        let losses = response
            .games
            .iter()
            .filter(|g| g.outcome == Outcome::Lose)
            .count() as u32;
        assert_eq!(response.computer_score, losses);

        // Persisted compactly: one character per choice.
        let record = rounds
            .find_round(response.round_id)
            .await
            .unwrap()
            .expect("round should be persisted");
        assert_eq!(record.player_deck, "RRRRRRRRRR");
        assert_eq!(record.computer_deck.len(), 10);

        // Ledger credited with the player score, and only when positive.
        assert_eq!(
            ledger.points(owner).await.unwrap(),
            response.player_score as u64
        );
    }

    #[tokio::test]
    async fn test_play_round_rejects_short_deck() {
        let (service, rounds, ledger) = create_test_service();
        let owner = Uuid::new_v4();

        let result = service.play_round(owner, deck_of(&["rock"; 9])).await;
        assert!(matches!(result, Err(GameError::InvalidDeck(_))));

        // Nothing was persisted or credited.
        assert!(rounds.find_user_history(owner, 10).await.unwrap().is_empty());
        assert_eq!(ledger.points(owner).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_play_round_rejects_bad_element() {
        let (service, rounds, _ledger) = create_test_service();
        let owner = Uuid::new_v4();

        let mut choices = vec!["rock"; 10];
        choices[7] = "dynamite";
        let result = service.play_round(owner, deck_of(&choices)).await;
        assert!(matches!(result, Err(GameError::InvalidDeck(_))));
        assert!(rounds.find_user_history(owner, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_round_replays_identically() {
        let (service, _rounds, _ledger) = create_test_service();
        let owner = Uuid::new_v4();

        let played = service
            .play_round(
                owner,
                deck_of(&[
                    "rock", "rock", "paper", "paper", "scissors", "scissors", "rock", "paper",
                    "scissors", "rock",
                ]),
            )
            .await
            .unwrap();

        let replayed = service.get_round(owner, played.round_id).await.unwrap();

        // The replay reconstructs the stored round exactly - no hidden state.
        assert_eq!(replayed.games, played.games);
        assert_eq!(replayed.player_score, played.player_score);
        assert_eq!(replayed.computer_score, played.computer_score);
        assert_eq!(replayed.outcome, played.outcome);
    }

    #[tokio::test]
    async fn test_get_round_unknown_id() {
        let (service, _rounds, _ledger) = create_test_service();
        let result = service.get_round(Uuid::new_v4(), Uuid::new_v4()).await;
        assert!(matches!(result, Err(GameError::NotFound)));
    }

    #[tokio::test]
    async fn test_get_round_wrong_owner() {
        let (service, _rounds, _ledger) = create_test_service();
        let owner = Uuid::new_v4();

        let played = service
            .play_round(owner, deck_of(&["paper"; 10]))
            .await
            .unwrap();

        let result = service.get_round(Uuid::new_v4(), played.round_id).await;
        assert!(matches!(result, Err(GameError::Forbidden)));
    }

    #[tokio::test]
    async fn test_user_history_and_stats() {
        let (service, _rounds, _ledger) = create_test_service();
        let owner = Uuid::new_v4();

        for _ in 0..3 {
            service
                .play_round(owner, deck_of(&["scissors"; 10]))
                .await
                .unwrap();
        }

        let history = service.user_history(owner, None).await.unwrap();
        assert_eq!(history.len(), 3);

        let limited = service.user_history(owner, Some(2)).await.unwrap();
        assert_eq!(limited.len(), 2);

        let stats = service.user_stats(owner).await.unwrap();
        assert_eq!(stats.total_rounds, 3);
        assert_eq!(
            stats.wins + stats.losses + stats.draws,
            stats.total_rounds
        );
    }
}
