//! In-memory store implementations.
//!
//! Thread-safe map-backed stores used by the test suites and usable as a
//! standalone backend. They enforce the same invariants a relational
//! backend would: one in-progress session per owner, terminal states
//! absorbing, O(1) character append for the player sequence.

use crate::error::GameError;
use crate::models::deck_game::{DeckRoundRecord, DeckUserStats, RoundOutcome};
use crate::models::streak_game::{SessionRecord, SessionStatus, StreakUserStats};
use crate::store::{AccountLedger, RoundStore, SessionStore};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct InMemoryRoundStore {
    rounds: Arc<Mutex<HashMap<Uuid, DeckRoundRecord>>>,
}

impl InMemoryRoundStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoundStore for InMemoryRoundStore {
    async fn persist_round(
        &self,
        owner_id: Uuid,
        player_deck: &str,
        computer_deck: &str,
        player_score: u32,
        computer_score: u32,
        outcome: RoundOutcome,
    ) -> Result<DeckRoundRecord, GameError> {
        let record = DeckRoundRecord {
            id: Uuid::new_v4(),
            owner_id,
            player_deck: player_deck.to_string(),
            computer_deck: computer_deck.to_string(),
            player_score,
            computer_score,
            outcome,
            played_at: Utc::now(),
        };

        self.rounds
            .lock()
            .unwrap()
            .insert(record.id, record.clone());

        Ok(record)
    }

    async fn find_round(&self, round_id: Uuid) -> Result<Option<DeckRoundRecord>, GameError> {
        Ok(self.rounds.lock().unwrap().get(&round_id).cloned())
    }

    async fn find_user_history(
        &self,
        owner_id: Uuid,
        limit: usize,
    ) -> Result<Vec<DeckRoundRecord>, GameError> {
        let mut rounds: Vec<DeckRoundRecord> = self
            .rounds
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect();

        rounds.sort_by(|a, b| b.played_at.cmp(&a.played_at));
        rounds.truncate(limit);
        Ok(rounds)
    }

    async fn user_stats(&self, owner_id: Uuid) -> Result<DeckUserStats, GameError> {
        let rounds = self.rounds.lock().unwrap();
        let mut stats = DeckUserStats::default();

        for round in rounds.values().filter(|r| r.owner_id == owner_id) {
            stats.total_rounds += 1;
            match round.outcome {
                RoundOutcome::Win => stats.wins += 1,
                RoundOutcome::Lose => stats.losses += 1,
                RoundOutcome::Draw => stats.draws += 1,
            }
            stats.total_player_score += round.player_score as u64;
            stats.total_computer_score += round.computer_score as u64;
        }

        Ok(stats)
    }
}

#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, SessionRecord>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create_session(
        &self,
        owner_id: Uuid,
        computer_choices: &str,
        allow_tie: bool,
        shuffle_positions: bool,
    ) -> Result<SessionRecord, GameError> {
        let mut sessions = self.sessions.lock().unwrap();

        // Uniqueness boundary: the check and the insert happen under one
        // lock, matching the transaction a relational backend would use.
        let duplicate = sessions
            .values()
            .any(|s| s.owner_id == owner_id && s.status == SessionStatus::InProgress);
        if duplicate {
            return Err(GameError::conflict(
                "owner already has a session in progress",
            ));
        }

        let record = SessionRecord {
            id: Uuid::new_v4(),
            owner_id,
            computer_choices: computer_choices.to_string(),
            player_choices: String::new(),
            allow_tie,
            shuffle_positions,
            current_round: 0,
            current_streak: 0,
            max_streak: 0,
            total_points: 0,
            status: SessionStatus::InProgress,
            started_at: Utc::now(),
            completed_at: None,
        };

        sessions.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_session(&self, session_id: Uuid) -> Result<Option<SessionRecord>, GameError> {
        Ok(self.sessions.lock().unwrap().get(&session_id).cloned())
    }

    async fn find_in_progress(&self, owner_id: Uuid) -> Result<Option<SessionRecord>, GameError> {
        let sessions = self.sessions.lock().unwrap();
        Ok(sessions
            .values()
            .filter(|s| s.owner_id == owner_id && s.status == SessionStatus::InProgress)
            .max_by_key(|s| s.started_at)
            .cloned())
    }

    async fn append_choice_and_update(
        &self,
        session_id: Uuid,
        player_choice: char,
        current_streak: u32,
        max_streak: u32,
        total_points: u32,
    ) -> Result<(), GameError> {
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions.get_mut(&session_id).ok_or(GameError::NotFound)?;

        session.player_choices.push(player_choice);
        session.current_round += 1;
        session.current_streak = current_streak;
        session.max_streak = max_streak;
        session.total_points = total_points;

        Ok(())
    }

    async fn terminate(&self, session_id: Uuid, status: SessionStatus) -> Result<(), GameError> {
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions.get_mut(&session_id).ok_or(GameError::NotFound)?;

        if !session.status.can_transition_to(&status) {
            return Err(GameError::AlreadyTerminal);
        }

        session.status = status;
        if status.is_terminal() && session.completed_at.is_none() {
            session.completed_at = Some(Utc::now());
        }

        Ok(())
    }

    async fn find_user_history(
        &self,
        owner_id: Uuid,
        limit: usize,
    ) -> Result<Vec<SessionRecord>, GameError> {
        let mut finished: Vec<SessionRecord> = self
            .sessions
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.owner_id == owner_id && s.status.is_terminal())
            .cloned()
            .collect();

        finished.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        finished.truncate(limit);
        Ok(finished)
    }

    async fn user_stats(&self, owner_id: Uuid) -> Result<StreakUserStats, GameError> {
        let sessions = self.sessions.lock().unwrap();
        let mut stats = StreakUserStats::default();

        for session in sessions
            .values()
            .filter(|s| s.owner_id == owner_id && s.status.is_terminal())
        {
            stats.total_sessions += 1;
            match session.status {
                SessionStatus::Completed => stats.completed_sessions += 1,
                SessionStatus::Failed => stats.failed_sessions += 1,
                SessionStatus::InProgress => {}
            }
            stats.best_streak = stats.best_streak.max(session.max_streak);
            stats.total_points_earned += session.total_points as u64;
        }

        Ok(stats)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryLedger {
    balances: Arc<Mutex<HashMap<Uuid, u64>>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountLedger for InMemoryLedger {
    async fn add_points(&self, owner_id: Uuid, amount: u32) -> Result<(), GameError> {
        let mut balances = self.balances.lock().unwrap();
        *balances.entry(owner_id).or_insert(0) += amount as u64;
        Ok(())
    }

    async fn points(&self, owner_id: Uuid) -> Result<u64, GameError> {
        Ok(self
            .balances
            .lock()
            .unwrap()
            .get(&owner_id)
            .copied()
            .unwrap_or(0))
    }
}
