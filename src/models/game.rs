//! Match and Round: the nodes and layers of a single-elimination bracket.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::participant::ParticipantId;
use crate::models::tournament::TournamentId;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Unique identifier for a round.
pub type RoundId = Uuid;

/// Where a match stands.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Both slots filled, waiting for a reported winner.
    #[default]
    Pending,
    /// One slot empty; the occupant advances without playing.
    Bye,
    /// Winner reported.
    Decided,
}

/// A single match between the participants in its two slots.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: MatchId,
    pub round_id: RoundId,
    pub round_number: u32,
    /// Index within the round. Matches 2k and 2k+1 feed the same match of the next round.
    pub position: usize,
    /// `None` is an empty slot (bye).
    pub slots: [Option<ParticipantId>; 2],
    pub winner: Option<ParticipantId>,
    pub status: MatchStatus,
    pub decided_at: Option<DateTime<Utc>>,
}

impl Match {
    /// Create a match for the given slots. A match with exactly one occupant is a bye and is
    /// resolved on construction.
    pub fn new(
        round_id: RoundId,
        round_number: u32,
        position: usize,
        slots: [Option<ParticipantId>; 2],
    ) -> Self {
        let (status, winner) = match slots {
            [Some(a), None] | [None, Some(a)] => (MatchStatus::Bye, Some(a)),
            _ => (MatchStatus::Pending, None),
        };
        Self {
            id: Uuid::new_v4(),
            round_id,
            round_number,
            position,
            slots,
            winner,
            status,
            decided_at: None,
        }
    }

    /// Whether `participant_id` occupies one of the slots.
    pub fn has_participant(&self, participant_id: ParticipantId) -> bool {
        self.slots.contains(&Some(participant_id))
    }

    /// The occupant that is not `winner`, if any.
    pub fn loser(&self) -> Option<ParticipantId> {
        let winner = self.winner?;
        self.slots.iter().flatten().copied().find(|&p| p != winner)
    }

    /// Decided or bye: the match no longer blocks its round.
    pub fn is_finished(&self) -> bool {
        matches!(self.status, MatchStatus::Decided | MatchStatus::Bye)
    }
}

/// One layer of the bracket.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub id: RoundId,
    pub tournament_id: TournamentId,
    /// 1-based.
    pub number: u32,
    /// Ordered by `position`.
    pub matches: Vec<Match>,
}

impl Round {
    /// Create an empty round; callers push matches built with [`Round::id`].
    pub fn new(tournament_id: TournamentId, number: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            number,
            matches: Vec::new(),
        }
    }

    /// Every match decided or a bye.
    pub fn is_complete(&self) -> bool {
        self.matches.iter().all(Match::is_finished)
    }

    /// Winners in position order. `None` while any match is still pending.
    pub fn winners(&self) -> Option<Vec<ParticipantId>> {
        self.matches.iter().map(|m| m.winner).collect()
    }

    pub fn byes(&self) -> usize {
        self.matches
            .iter()
            .filter(|m| m.status == MatchStatus::Bye)
            .count()
    }
}
