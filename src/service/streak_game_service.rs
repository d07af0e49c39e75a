use crate::config::GameConfig;
use crate::error::GameError;
use crate::models::choice::{random_sequence, resolve, Choice, Outcome};
use crate::models::codec;
use crate::models::streak_game::{
    PlayRoundDTO, PlayRoundResponse, QuitResponse, SessionRecord, SessionState, SessionStatus,
    StartSessionDTO, StartSessionResponse, StreakUserStats, TerminationReason,
};
use crate::store::{AccountLedger, SessionStore};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

/// Streak mode engine - survival play, one round at a time, against a
/// computer sequence generated in full when the session starts.
///
/// Progression is append-only: once a round is committed it cannot be
/// replayed, which is why the mode is stateful per round instead of a
/// single batched computation. The authoritative computer choice for every
/// round is the one in the persisted sequence; the client-declared choice
/// is reconciliation input only.
pub struct StreakGameService {
    sessions: Arc<dyn SessionStore>,
    ledger: Arc<dyn AccountLedger>,
    config: GameConfig,
}

impl StreakGameService {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        ledger: Arc<dyn AccountLedger>,
        config: GameConfig,
    ) -> Self {
        Self {
            sessions,
            ledger,
            config,
        }
    }

    // =============================================================================
    // START / RESUME
    // =============================================================================

    /// Start a streak session.
    /// Idempotent: an owner with a session in progress resumes it instead
    /// of creating a second one.
    pub async fn start_game(
        &self,
        owner_id: Uuid,
        dto: StartSessionDTO,
    ) -> Result<StartSessionResponse, GameError> {
        if let Some(existing) = self.sessions.find_in_progress(owner_id).await? {
            let computer_choice =
                codec::choice_at(&existing.computer_choices, existing.current_round as usize)?;

            info!(
                owner = %owner_id,
                session = %existing.id,
                round = existing.current_round,
                "Resuming in-progress streak session"
            );

            return Ok(StartSessionResponse {
                session_id: existing.id,
                state: existing.state(),
                allow_tie: existing.allow_tie,
                shuffle_positions: existing.shuffle_positions,
                computer_choice,
                resumed: true,
            });
        }

        let sequence = random_sequence(codec::STREAK_LEN);
        let session = self
            .sessions
            .create_session(
                owner_id,
                &codec::encode(&sequence),
                dto.allow_tie,
                dto.shuffle_positions,
            )
            .await?;

        info!(
            owner = %owner_id,
            session = %session.id,
            allow_tie = session.allow_tie,
            "Started streak session"
        );

        Ok(StartSessionResponse {
            session_id: session.id,
            state: session.state(),
            allow_tie: session.allow_tie,
            shuffle_positions: session.shuffle_positions,
            computer_choice: sequence[0],
            resumed: false,
        })
    }

    // =============================================================================
    // PLAY
    // =============================================================================

    /// Play one round. Loss, disallowed tie, timeout and sequence
    /// exhaustion all come back as results, not errors.
    pub async fn play_round(
        &self,
        owner_id: Uuid,
        session_id: Uuid,
        dto: PlayRoundDTO,
    ) -> Result<PlayRoundResponse, GameError> {
        Validate::validate(&dto)?;
        let player_choice = Choice::from_str(&dto.player_choice)?;

        let session = self
            .sessions
            .find_session(session_id)
            .await?
            .ok_or(GameError::NotFound)?;

        if session.owner_id != owner_id {
            return Err(GameError::Forbidden);
        }
        if session.status.is_terminal() {
            return Err(GameError::AlreadyTerminal);
        }

        // The budget is cumulative for the whole attempt, not per round.
        if dto.time_taken > self.config.streak_time_budget_secs {
            warn!(
                session = %session.id,
                elapsed = dto.time_taken,
                budget = self.config.streak_time_budget_secs,
                "Session time budget exceeded"
            );
            return self
                .terminate(&session, SessionStatus::Failed, TerminationReason::Timeout)
                .await;
        }

        // Ground truth for scoring is the persisted sequence, never the
        // client echo.
        let computer_choice =
            codec::choice_at(&session.computer_choices, session.current_round as usize)?;
        self.reconcile_declared_choice(&session, &dto, computer_choice);

        let mut outcome = resolve(player_choice, computer_choice);
        let mut current_streak = session.current_streak;
        let mut max_streak = session.max_streak;
        let mut points_earned = 0u32;
        let mut game_over = false;

        match outcome {
            Outcome::Win => {
                current_streak += 1;
                max_streak = max_streak.max(current_streak);
                points_earned = 1;
            }
            Outcome::Draw => {
                if !session.allow_tie {
                    // Disallowed tie counts as a loss.
                    outcome = Outcome::Lose;
                    current_streak = 0;
                    game_over = true;
                }
                // An allowed tie leaves the streak and points untouched.
            }
            Outcome::Lose => {
                current_streak = 0;
                game_over = true;
            }
        }

        let total_points = session.total_points + points_earned;

        // The round is committed either way so the stored playthrough is
        // complete, including the losing choice.
        self.sessions
            .append_choice_and_update(
                session.id,
                player_choice.to_char(),
                current_streak,
                max_streak,
                total_points,
            )
            .await?;

        let current_round = session.current_round + 1;
        let state = SessionState {
            status: SessionStatus::InProgress,
            current_round,
            current_streak,
            max_streak,
            total_points,
        };

        if game_over {
            info!(
                session = %session.id,
                round = current_round,
                max_streak,
                total_points,
                "Streak session failed"
            );
            return self
                .finish(
                    state,
                    SessionStatus::Failed,
                    TerminationReason::Loss,
                    outcome,
                    points_earned,
                    &session,
                )
                .await;
        }

        if current_round as usize >= codec::STREAK_LEN {
            info!(
                session = %session.id,
                max_streak,
                total_points,
                "Computer sequence exhausted, session complete"
            );
            return self
                .finish(
                    state,
                    SessionStatus::Completed,
                    TerminationReason::Exhausted,
                    outcome,
                    points_earned,
                    &session,
                )
                .await;
        }

        let next_computer_choice =
            codec::choice_at(&session.computer_choices, current_round as usize)?;

        Ok(PlayRoundResponse {
            outcome: Some(outcome),
            points_earned,
            state,
            next_computer_choice: Some(next_computer_choice),
            termination: None,
        })
    }

    // =============================================================================
    // QUIT / QUERY
    // =============================================================================

    /// Quit an in-progress session, keeping the points earned so far.
    /// Quitting with zero progress is a clean termination.
    pub async fn quit_game(
        &self,
        owner_id: Uuid,
        session_id: Uuid,
    ) -> Result<QuitResponse, GameError> {
        let session = self
            .sessions
            .find_session(session_id)
            .await?
            .ok_or(GameError::NotFound)?;

        if session.owner_id != owner_id {
            return Err(GameError::Forbidden);
        }
        if session.status.is_terminal() {
            return Err(GameError::AlreadyTerminal);
        }

        self.sessions
            .terminate(session.id, SessionStatus::Completed)
            .await?;
        self.credit(owner_id, session.total_points).await?;

        info!(
            session = %session.id,
            rounds = session.current_round,
            total_points = session.total_points,
            "Streak session quit"
        );

        let mut state = session.state();
        state.status = SessionStatus::Completed;

        Ok(QuitResponse {
            state,
            summary: session.summary(),
        })
    }

    /// The owner's in-progress session, if any.
    pub async fn current_session(
        &self,
        owner_id: Uuid,
    ) -> Result<Option<(Uuid, SessionState)>, GameError> {
        Ok(self
            .sessions
            .find_in_progress(owner_id)
            .await?
            .map(|s| (s.id, s.state())))
    }

    /// Ownership-checked state snapshot of one session.
    pub async fn get_state(
        &self,
        owner_id: Uuid,
        session_id: Uuid,
    ) -> Result<SessionState, GameError> {
        let session = self
            .sessions
            .find_session(session_id)
            .await?
            .ok_or(GameError::NotFound)?;

        if session.owner_id != owner_id {
            return Err(GameError::Forbidden);
        }

        Ok(session.state())
    }

    /// Finished sessions, newest first.
    pub async fn user_history(
        &self,
        owner_id: Uuid,
        limit: Option<usize>,
    ) -> Result<Vec<SessionRecord>, GameError> {
        let limit = limit.unwrap_or(self.config.history_page_size);
        self.sessions.find_user_history(owner_id, limit).await
    }

    pub async fn user_stats(&self, owner_id: Uuid) -> Result<StreakUserStats, GameError> {
        self.sessions.user_stats(owner_id).await
    }

    // =============================================================================
    // HELPERS
    // =============================================================================

    fn reconcile_declared_choice(
        &self,
        session: &SessionRecord,
        dto: &PlayRoundDTO,
        authoritative: Choice,
    ) {
        if let Some(declared) = dto.computer_choice.as_deref() {
            let matches = Choice::from_str(declared)
                .map(|c| c == authoritative)
                .unwrap_or(false);
            if !matches {
                warn!(
                    session = %session.id,
                    round = session.current_round,
                    declared,
                    authoritative = %authoritative,
                    "Client-declared computer choice does not match stored sequence"
                );
            }
        }
    }

    /// Terminate without resolving a round (timeout path).
    async fn terminate(
        &self,
        session: &SessionRecord,
        status: SessionStatus,
        reason: TerminationReason,
    ) -> Result<PlayRoundResponse, GameError> {
        self.sessions.terminate(session.id, status).await?;
        self.credit(session.owner_id, session.total_points).await?;

        let mut state = session.state();
        state.status = status;

        Ok(PlayRoundResponse {
            outcome: None,
            points_earned: 0,
            state,
            next_computer_choice: None,
            termination: Some(reason),
        })
    }

    /// Terminate after a resolved round has been committed.
    async fn finish(
        &self,
        mut state: SessionState,
        status: SessionStatus,
        reason: TerminationReason,
        outcome: Outcome,
        points_earned: u32,
        session: &SessionRecord,
    ) -> Result<PlayRoundResponse, GameError> {
        self.sessions.terminate(session.id, status).await?;
        self.credit(session.owner_id, state.total_points).await?;

        state.status = status;

        Ok(PlayRoundResponse {
            outcome: Some(outcome),
            points_earned,
            state,
            next_computer_choice: None,
            termination: Some(reason),
        })
    }

    async fn credit(&self, owner_id: Uuid, amount: u32) -> Result<(), GameError> {
        if amount > 0 {
            self.ledger.add_points(owner_id, amount).await?;
        }
        Ok(())
    }
}
