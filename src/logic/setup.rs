//! Registration phase: join, withdraw, reseed, and start (Upcoming -> Active).

use crate::logic::advance::try_advance_round;
use crate::logic::bracket::build_initial_round;
use crate::models::{
    Participant, ParticipantId, ParticipantStatus, Round, Tournament, TournamentError,
    TournamentStatus,
};

fn validate_seed(seed: Option<u32>) -> Result<(), TournamentError> {
    if seed == Some(0) {
        return Err(TournamentError::Validation(
            "seed must be a positive integer".to_string(),
        ));
    }
    Ok(())
}

/// Register `user_id` (Upcoming only). A user who withdrew earlier gets their old registration back.
pub fn join_tournament(
    tournament: &mut Tournament,
    user_id: &str,
    seed: Option<u32>,
) -> Result<ParticipantId, TournamentError> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(TournamentError::Validation(
            "userId must not be empty".to_string(),
        ));
    }
    validate_seed(seed)?;
    if tournament.status != TournamentStatus::Upcoming {
        return Err(TournamentError::RegistrationClosed);
    }

    let already_active = tournament
        .participants
        .iter()
        .any(|p| p.user_id == user_id && p.is_active());
    if already_active {
        return Err(TournamentError::AlreadyRegistered(user_id.to_string()));
    }
    if tournament.participant_count() >= tournament.max_participants {
        return Err(TournamentError::TournamentFull {
            max: tournament.max_participants,
        });
    }

    let id = match tournament.participant_by_user_mut(user_id) {
        Some(p) => {
            p.rejoin(seed);
            p.id
        }
        None => {
            let p = Participant::new(tournament.id, user_id, seed);
            let id = p.id;
            tournament.participants.push(p);
            id
        }
    };
    tournament.touch();
    Ok(id)
}

/// Give up a place in the field (Upcoming only). Withdrawing twice is a no-op.
pub fn withdraw_participant(
    tournament: &mut Tournament,
    participant_id: ParticipantId,
) -> Result<(), TournamentError> {
    if tournament.status != TournamentStatus::Upcoming {
        return Err(TournamentError::RegistrationClosed);
    }
    let p = tournament
        .participant_mut(participant_id)
        .ok_or(TournamentError::ParticipantNotFound(participant_id))?;
    if p.status == ParticipantStatus::Withdrawn {
        return Ok(());
    }
    p.withdraw();
    tournament.touch();
    Ok(())
}

/// Set or clear a participant's seed (Upcoming only).
pub fn set_participant_seed(
    tournament: &mut Tournament,
    participant_id: ParticipantId,
    seed: Option<u32>,
) -> Result<(), TournamentError> {
    validate_seed(seed)?;
    if tournament.status != TournamentStatus::Upcoming {
        return Err(TournamentError::RegistrationClosed);
    }
    let p = tournament
        .participant_mut(participant_id)
        .filter(|p| p.is_active())
        .ok_or(TournamentError::ParticipantNotFound(participant_id))?;
    p.seed = seed;
    tournament.touch();
    Ok(())
}

/// Start the tournament: build round 1 from the registered field and move to Active.
///
/// A field of one resolves as a single bye and completes the tournament on the spot.
pub fn start_tournament(tournament: &mut Tournament) -> Result<Round, TournamentError> {
    if tournament.status != TournamentStatus::Upcoming {
        return Err(TournamentError::InvalidTransition {
            from: tournament.status,
            action: "start",
        });
    }
    let registered = tournament.participant_count();
    let required = tournament.min_participants.max(1);
    if registered < required {
        return Err(TournamentError::InsufficientParticipants {
            required,
            registered,
        });
    }

    let field: Vec<Participant> = tournament.active_participants().cloned().collect();
    let round = build_initial_round(tournament.id, &field, tournament.seeding)?;
    let lone_bye = round.matches.len() == 1 && round.is_complete();

    tournament.rounds.push(round.clone());
    tournament.status = TournamentStatus::Active;
    tournament.touch();
    log::info!(
        "Tournament {} started with {} participants ({} matches in round 1)",
        tournament.id,
        registered,
        round.matches.len()
    );

    if lone_bye {
        try_advance_round(tournament)?;
    }
    Ok(round)
}
