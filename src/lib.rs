//! TCG tournament bracket engine: models, bracket logic, per-tournament store and REST API.

pub mod config;
pub mod http;
pub mod logic;
pub mod models;
pub mod service;
pub mod store;

pub use config::{Config, ConfigError};
pub use logic::{
    bracket_size, build_initial_round, bye_count, cancel_tournament, edit_tournament,
    join_tournament, planned_rounds, record_result, seed_order, set_participant_seed,
    start_tournament, try_advance_round, withdraw_participant, Advance, TournamentPatch,
};
pub use models::{
    ErrorCategory, Match, MatchId, MatchStatus, Participant, ParticipantId, ParticipantStatus,
    Round, RoundId, SeedingPolicy, Tournament, TournamentDraft, TournamentError, TournamentId,
    TournamentStatus, UserId,
};
pub use service::{Registration, TournamentService};
pub use store::TournamentStore;
