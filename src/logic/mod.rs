//! Tournament business logic: registration, bracket building, results, advancement, lifecycle.

mod advance;
mod bracket;
mod lifecycle;
mod results;
mod setup;

pub use advance::{try_advance_round, Advance};
pub use bracket::{build_initial_round, bracket_size, bye_count, planned_rounds, seed_order};
pub use lifecycle::{cancel_tournament, edit_tournament, TournamentPatch};
pub use results::record_result;
pub use setup::{join_tournament, set_participant_seed, start_tournament, withdraw_participant};
