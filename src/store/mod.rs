//! Narrow persistence interfaces consumed by the game engines.
//!
//! Implementations can be:
//! - the in-memory stores in [`memory`] for tests and standalone use
//! - a relational backend in production
//!
//! Engines never persist partial results: every store call happens after
//! the round or session update has been fully computed in memory.

use crate::error::GameError;
use crate::models::deck_game::{DeckRoundRecord, DeckUserStats, RoundOutcome};
use crate::models::streak_game::{SessionRecord, SessionStatus, StreakUserStats};
use async_trait::async_trait;
use uuid::Uuid;

pub mod memory;

pub use memory::{InMemoryLedger, InMemoryRoundStore, InMemorySessionStore};

/// Persistence for finished deck rounds.
#[async_trait]
pub trait RoundStore: Send + Sync {
    /// Persist a fully resolved round; both decks in encoded form.
    async fn persist_round(
        &self,
        owner_id: Uuid,
        player_deck: &str,
        computer_deck: &str,
        player_score: u32,
        computer_score: u32,
        outcome: RoundOutcome,
    ) -> Result<DeckRoundRecord, GameError>;

    async fn find_round(&self, round_id: Uuid) -> Result<Option<DeckRoundRecord>, GameError>;

    /// Most recent rounds first.
    async fn find_user_history(
        &self,
        owner_id: Uuid,
        limit: usize,
    ) -> Result<Vec<DeckRoundRecord>, GameError>;

    async fn user_stats(&self, owner_id: Uuid) -> Result<DeckUserStats, GameError>;
}

/// Persistence for streak sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create a session with zeroed counters.
    ///
    /// At most one in-progress session may exist per owner; the store
    /// enforces the invariant inside its own create boundary and fails
    /// with `Conflict` on violation.
    async fn create_session(
        &self,
        owner_id: Uuid,
        computer_choices: &str,
        allow_tie: bool,
        shuffle_positions: bool,
    ) -> Result<SessionRecord, GameError>;

    async fn find_session(&self, session_id: Uuid) -> Result<Option<SessionRecord>, GameError>;

    async fn find_in_progress(&self, owner_id: Uuid) -> Result<Option<SessionRecord>, GameError>;

    /// Append one player choice and write the updated counters in a single
    /// operation.
    async fn append_choice_and_update(
        &self,
        session_id: Uuid,
        player_choice: char,
        current_streak: u32,
        max_streak: u32,
        total_points: u32,
    ) -> Result<(), GameError>;

    /// Move the session into a terminal state.
    async fn terminate(&self, session_id: Uuid, status: SessionStatus) -> Result<(), GameError>;

    /// Finished sessions, most recent first.
    async fn find_user_history(
        &self,
        owner_id: Uuid,
        limit: usize,
    ) -> Result<Vec<SessionRecord>, GameError>;

    async fn user_stats(&self, owner_id: Uuid) -> Result<StreakUserStats, GameError>;
}

/// Account point balances.
#[async_trait]
pub trait AccountLedger: Send + Sync {
    /// Credit points to an owner. Engines call this once per finished deck
    /// round or terminated streak session, never mid-session.
    async fn add_points(&self, owner_id: Uuid, amount: u32) -> Result<(), GameError>;

    async fn points(&self, owner_id: Uuid) -> Result<u64, GameError>;
}
