//! Tournament, TournamentStatus and TournamentError.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::game::{Match, MatchId, Round};
use crate::models::participant::{Participant, ParticipantId, ParticipantStatus, UserId};

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TournamentError {
    /// Malformed input, rejected before any state is touched.
    #[error("{0}")]
    Validation(String),
    #[error("tournament {0} not found")]
    TournamentNotFound(TournamentId),
    #[error("match {0} not found")]
    MatchNotFound(MatchId),
    #[error("participant {0} not found")]
    ParticipantNotFound(ParticipantId),
    #[error("registration is closed for this tournament")]
    RegistrationClosed,
    #[error("tournament is full ({max} participants)")]
    TournamentFull { max: u32 },
    #[error("user {0} is already registered")]
    AlreadyRegistered(UserId),
    #[error("need at least {required} participants, have {registered}")]
    InsufficientParticipants { required: u32, registered: u32 },
    #[error("match has already been decided")]
    MatchAlreadyDecided,
    #[error("match is a bye and resolves automatically")]
    MatchNotReady,
    #[error("participant {0} is not playing in this match")]
    InvalidWinner(ParticipantId),
    #[error("tournament is not active")]
    TournamentNotActive,
    #[error("cannot {action} a tournament that is {from}")]
    InvalidTransition {
        from: TournamentStatus,
        action: &'static str,
    },
    #[error("{0} cannot be changed once the bracket exists")]
    FieldFrozen(&'static str),
}

/// Coarse class of a [`TournamentError`], used to pick the response status.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Conflict,
}

impl TournamentError {
    /// Machine-readable name carried in error responses.
    pub fn kind(&self) -> &'static str {
        match self {
            TournamentError::Validation(_) => "Validation",
            TournamentError::TournamentNotFound(_) => "TournamentNotFound",
            TournamentError::MatchNotFound(_) => "MatchNotFound",
            TournamentError::ParticipantNotFound(_) => "ParticipantNotFound",
            TournamentError::RegistrationClosed => "RegistrationClosed",
            TournamentError::TournamentFull { .. } => "TournamentFull",
            TournamentError::AlreadyRegistered(_) => "AlreadyRegistered",
            TournamentError::InsufficientParticipants { .. } => "InsufficientParticipants",
            TournamentError::MatchAlreadyDecided => "MatchAlreadyDecided",
            TournamentError::MatchNotReady => "MatchNotReady",
            TournamentError::InvalidWinner(_) => "InvalidWinner",
            TournamentError::TournamentNotActive => "TournamentNotActive",
            TournamentError::InvalidTransition { .. } => "InvalidTransition",
            TournamentError::FieldFrozen(_) => "FieldFrozen",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            TournamentError::Validation(_) => ErrorCategory::Validation,
            TournamentError::TournamentNotFound(_)
            | TournamentError::MatchNotFound(_)
            | TournamentError::ParticipantNotFound(_) => ErrorCategory::NotFound,
            _ => ErrorCategory::Conflict,
        }
    }
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Lifecycle of a tournament.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Accepting registrations; every field editable.
    #[default]
    Upcoming,
    /// Bracket exists; results are being reported.
    Active,
    /// A champion has been determined.
    Completed,
    /// Stopped by the organizer. Rounds are kept for audit only.
    Cancelled,
}

impl TournamentStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TournamentStatus::Completed | TournamentStatus::Cancelled)
    }
}

impl std::fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TournamentStatus::Upcoming => "upcoming",
            TournamentStatus::Active => "active",
            TournamentStatus::Completed => "completed",
            TournamentStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// How the first round is ordered.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedingPolicy {
    /// Seed ascending, unseeded last in join order.
    #[default]
    Seeded,
    /// Seeded participants first, unseeded ones shuffled behind them.
    Random,
}

/// Organizer-supplied fields for a new tournament.
#[derive(Clone, Debug)]
pub struct TournamentDraft {
    pub name: String,
    pub description: String,
    pub format: String,
    pub rules: Option<String>,
    pub organizer_id: UserId,
    pub max_participants: u32,
    pub min_participants: u32,
    pub start_time: DateTime<Utc>,
    pub prize_pool: Option<String>,
    pub seeding: SeedingPolicy,
}

/// Full tournament state: metadata, registrations, and the bracket built so far.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub description: String,
    /// Game format tag, e.g. "standard" or "draft".
    pub format: String,
    pub rules: Option<String>,
    pub organizer_id: UserId,
    pub max_participants: u32,
    /// Fewest registrations `start` accepts.
    pub min_participants: u32,
    pub start_time: DateTime<Utc>,
    pub prize_pool: Option<String>,
    pub seeding: SeedingPolicy,
    pub status: TournamentStatus,
    /// Registration order; withdrawn entries stay in place.
    pub participants: Vec<Participant>,
    /// Ordered by round number.
    pub rounds: Vec<Round>,
    pub champion: Option<ParticipantId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tournament {
    /// Create a new tournament in Upcoming status with no participants.
    pub fn new(draft: TournamentDraft) -> Result<Self, TournamentError> {
        validate_name(&draft.name)?;
        validate_participant_bounds(draft.min_participants, draft.max_participants)?;
        if draft.organizer_id.trim().is_empty() {
            return Err(TournamentError::Validation(
                "organizerId must not be empty".to_string(),
            ));
        }
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name: draft.name.trim().to_string(),
            description: draft.description,
            format: draft.format,
            rules: draft.rules,
            organizer_id: draft.organizer_id,
            max_participants: draft.max_participants,
            min_participants: draft.min_participants,
            start_time: draft.start_time,
            prize_pool: draft.prize_pool,
            seeding: draft.seeding,
            status: TournamentStatus::Upcoming,
            participants: Vec::new(),
            rounds: Vec::new(),
            champion: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Participants that have not withdrawn.
    pub fn active_participants(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(|p| p.is_active())
    }

    /// Number of participants holding a place in the field.
    pub fn participant_count(&self) -> u32 {
        self.active_participants().count() as u32
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn participant_mut(&mut self, id: ParticipantId) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.id == id)
    }

    /// Registration of `user_id`, withdrawn or not.
    pub fn participant_by_user_mut(&mut self, user_id: &str) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.user_id == user_id)
    }

    /// Highest round so far.
    pub fn current_round(&self) -> Option<&Round> {
        self.rounds.last()
    }

    pub fn find_match(&self, match_id: MatchId) -> Option<&Match> {
        self.rounds
            .iter()
            .flat_map(|r| r.matches.iter())
            .find(|m| m.id == match_id)
    }

    pub fn find_match_mut(&mut self, match_id: MatchId) -> Option<&mut Match> {
        self.rounds
            .iter_mut()
            .flat_map(|r| r.matches.iter_mut())
            .find(|m| m.id == match_id)
    }

    /// Ids of every match in the bracket.
    pub fn match_ids(&self) -> impl Iterator<Item = MatchId> + '_ {
        self.rounds
            .iter()
            .flat_map(|r| r.matches.iter().map(|m| m.id))
    }

    /// Mark `participant_id` as knocked out (no-op for unknown ids).
    pub fn eliminate_participant(&mut self, participant_id: ParticipantId) {
        if let Some(p) = self.participant_mut(participant_id) {
            if p.status == ParticipantStatus::Registered {
                p.eliminate();
            }
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

pub(crate) fn validate_name(name: &str) -> Result<(), TournamentError> {
    if name.trim().is_empty() {
        return Err(TournamentError::Validation(
            "name must not be empty".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_participant_bounds(min: u32, max: u32) -> Result<(), TournamentError> {
    if max < 2 {
        return Err(TournamentError::Validation(
            "maxParticipants must be at least 2".to_string(),
        ));
    }
    if min == 0 || min > max {
        return Err(TournamentError::Validation(format!(
            "minParticipants must be between 1 and {max}"
        )));
    }
    Ok(())
}
