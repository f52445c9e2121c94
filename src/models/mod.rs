//! Data structures for the bracket engine: tournaments, participants, rounds and matches.

mod game;
mod participant;
mod tournament;

pub use game::{Match, MatchId, MatchStatus, Round, RoundId};
pub use participant::{Participant, ParticipantId, ParticipantStatus, UserId};
pub(crate) use tournament::{validate_name, validate_participant_bounds};
pub use tournament::{
    ErrorCategory, SeedingPolicy, Tournament, TournamentDraft, TournamentError, TournamentId,
    TournamentStatus,
};
