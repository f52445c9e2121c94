//! Participant: one user's registration in one tournament.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::tournament::TournamentId;

/// Unique identifier for a participant (used in match slots and lookups).
pub type ParticipantId = Uuid;

/// Opaque user reference issued by the platform's account service.
pub type UserId = String;

/// Registration status of a participant.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantStatus {
    #[default]
    Registered,
    Eliminated,
    Withdrawn,
}

/// A user registered in a tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: ParticipantId,
    pub tournament_id: TournamentId,
    pub user_id: UserId,
    /// Lower is stronger. Unseeded participants are placed after all seeded ones.
    pub seed: Option<u32>,
    pub joined_at: DateTime<Utc>,
    pub status: ParticipantStatus,
}

impl Participant {
    /// Create a new registered participant, joined now.
    pub fn new(tournament_id: TournamentId, user_id: impl Into<UserId>, seed: Option<u32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            user_id: user_id.into(),
            seed,
            joined_at: Utc::now(),
            status: ParticipantStatus::Registered,
        }
    }

    /// Whether the participant counts towards the field (registered or already knocked out).
    pub fn is_active(&self) -> bool {
        self.status != ParticipantStatus::Withdrawn
    }

    pub fn eliminate(&mut self) {
        self.status = ParticipantStatus::Eliminated;
    }

    pub fn withdraw(&mut self) {
        self.status = ParticipantStatus::Withdrawn;
    }

    /// Re-register a withdrawn participant: fresh join time, keeps the same id.
    pub fn rejoin(&mut self, seed: Option<u32>) {
        self.status = ParticipantStatus::Registered;
        self.joined_at = Utc::now();
        self.seed = seed;
    }
}
