use crate::models::choice::{Choice, Outcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Streak session lifecycle - the finite state machine states
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Completed,
    Failed,
}

impl SessionStatus {
    /// Check if transition to another state is valid
    pub fn can_transition_to(&self, to: &SessionStatus) -> bool {
        match (self, to) {
            // IN_PROGRESS -> COMPLETED or FAILED
            (SessionStatus::InProgress, SessionStatus::Completed) => true,
            (SessionStatus::InProgress, SessionStatus::Failed) => true,
            // Same state is allowed (idempotency)
            (a, b) if a == b => true,
            // Terminal states are absorbing
            _ => false,
        }
    }

    /// Check if state is terminal
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Failed)
    }
}

/// Why a session left the in-progress state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    Loss,
    Timeout,
    Exhausted,
    Quit,
}

/// Streak session entity.
///
/// Both choice sequences are stored in the compact one-character-per-choice
/// form: `computer_choices` is generated at full capacity up front,
/// `player_choices` grows by one character per accepted round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub computer_choices: String,
    pub player_choices: String,
    pub allow_tie: bool,
    pub shuffle_positions: bool,
    pub current_round: u32,
    pub current_streak: u32,
    pub max_streak: u32,
    pub total_points: u32,
    pub status: SessionStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl SessionRecord {
    /// Snapshot of the mutable counters.
    pub fn state(&self) -> SessionState {
        SessionState {
            status: self.status,
            current_round: self.current_round,
            current_streak: self.current_streak,
            max_streak: self.max_streak,
            total_points: self.total_points,
        }
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            max_streak: self.max_streak,
            total_points: self.total_points,
            rounds_played: self.current_round,
        }
    }
}

/// Explicit value type for the session counters threaded through results.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionState {
    pub status: SessionStatus,
    pub current_round: u32,
    pub current_streak: u32,
    pub max_streak: u32,
    pub total_points: u32,
}

/// Options for starting a streak session.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct StartSessionDTO {
    #[serde(default)]
    pub allow_tie: bool,
    /// Display-only: the client may shuffle button positions. The engine
    /// stores the flag and ignores it.
    #[serde(default)]
    pub shuffle_positions: bool,
}

/// One streak round submission.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct PlayRoundDTO {
    #[validate(length(min = 4, max = 8))]
    pub player_choice: String,
    /// Echo of the choice the client displayed; reconciliation only, never
    /// trusted for scoring.
    pub computer_choice: Option<String>,
    /// Seconds elapsed since the session started, reported by the caller.
    pub time_taken: u64,
}

/// Response for a started or resumed session.
#[derive(Debug, Serialize, Deserialize)]
pub struct StartSessionResponse {
    pub session_id: Uuid,
    pub state: SessionState,
    pub allow_tie: bool,
    pub shuffle_positions: bool,
    /// The choice the player must beat this round.
    pub computer_choice: Choice,
    pub resumed: bool,
}

/// Response for one played round.
///
/// Loss, timeout and sequence exhaustion are ordinary results carried in
/// `termination`, not errors. `outcome` is absent when the round was never
/// resolved (timeout). `next_computer_choice` is present only while the
/// session continues.
#[derive(Debug, Serialize, Deserialize)]
pub struct PlayRoundResponse {
    pub outcome: Option<Outcome>,
    pub points_earned: u32,
    pub state: SessionState,
    pub next_computer_choice: Option<Choice>,
    pub termination: Option<TerminationReason>,
}

/// Final statistics of a finished session.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionSummary {
    pub max_streak: u32,
    pub total_points: u32,
    pub rounds_played: u32,
}

/// Response for quitting a session.
#[derive(Debug, Serialize, Deserialize)]
pub struct QuitResponse {
    pub state: SessionState,
    pub summary: SessionSummary,
}

/// Per-user streak-mode statistics over finished sessions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreakUserStats {
    pub total_sessions: u32,
    pub completed_sessions: u32,
    pub failed_sessions: u32,
    pub best_streak: u32,
    pub total_points_earned: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_state_transitions() {
        let in_progress = SessionStatus::InProgress;
        let completed = SessionStatus::Completed;
        let failed = SessionStatus::Failed;

        // Valid transitions
        assert!(in_progress.can_transition_to(&completed));
        assert!(in_progress.can_transition_to(&failed));

        // Idempotent (same state)
        assert!(in_progress.can_transition_to(&in_progress));
        assert!(completed.can_transition_to(&completed));

        // Terminal states are absorbing
        assert!(!completed.can_transition_to(&in_progress));
        assert!(!completed.can_transition_to(&failed));
        assert!(!failed.can_transition_to(&in_progress));
        assert!(!failed.can_transition_to(&completed));
    }

    #[test]
    fn test_terminal_state() {
        assert!(!SessionStatus::InProgress.is_terminal());
        assert!(SessionStatus::Completed.is_terminal());
        assert!(SessionStatus::Failed.is_terminal());
    }

    #[test]
    fn test_status_serialization() {
        let status = SessionStatus::InProgress;
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, "\"in_progress\"");

        let deserialized: SessionStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, status);
    }

    #[test]
    fn test_record_state_snapshot() {
        let record = SessionRecord {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            computer_choices: "RPS".repeat(34)[..100].to_string(),
            player_choices: "PP".to_string(),
            allow_tie: true,
            shuffle_positions: false,
            current_round: 2,
            current_streak: 2,
            max_streak: 2,
            total_points: 2,
            status: SessionStatus::InProgress,
            started_at: Utc::now(),
            completed_at: None,
        };

        let state = record.state();
        assert_eq!(state.current_round, 2);
        assert_eq!(state.current_streak, 2);
        assert_eq!(state.status, SessionStatus::InProgress);

        let summary = record.summary();
        assert_eq!(summary.rounds_played, 2);
        assert_eq!(summary.total_points, 2);
    }
}
