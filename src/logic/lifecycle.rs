//! Organizer actions outside the bracket itself: cancel and edit.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::{
    validate_name, validate_participant_bounds, SeedingPolicy, Tournament, TournamentError,
    TournamentStatus,
};

/// Partial update of a tournament. Absent fields are left alone.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TournamentPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub rules: Option<String>,
    pub prize_pool: Option<String>,
    pub format: Option<String>,
    pub max_participants: Option<u32>,
    pub min_participants: Option<u32>,
    pub start_time: Option<DateTime<Utc>>,
    pub seeding: Option<SeedingPolicy>,
}

impl TournamentPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.rules.is_none()
            && self.prize_pool.is_none()
            && self.format.is_none()
            && self.max_participants.is_none()
            && self.min_participants.is_none()
            && self.start_time.is_none()
            && self.seeding.is_none()
    }

    /// First field that shapes the bracket and would actually change.
    fn frozen_change(&self, t: &Tournament) -> Option<&'static str> {
        fn differs<T: PartialEq>(new: &Option<T>, current: &T) -> bool {
            new.as_ref().is_some_and(|v| v != current)
        }

        if differs(&self.format, &t.format) {
            Some("format")
        } else if differs(&self.max_participants, &t.max_participants) {
            Some("maxParticipants")
        } else if differs(&self.min_participants, &t.min_participants) {
            Some("minParticipants")
        } else if differs(&self.start_time, &t.start_time) {
            Some("startTime")
        } else if differs(&self.seeding, &t.seeding) {
            Some("seeding")
        } else {
            None
        }
    }
}

/// Cancel an upcoming or active tournament. Returns `false` when it was already cancelled.
pub fn cancel_tournament(tournament: &mut Tournament) -> Result<bool, TournamentError> {
    match tournament.status {
        TournamentStatus::Cancelled => Ok(false),
        TournamentStatus::Completed => Err(TournamentError::InvalidTransition {
            from: tournament.status,
            action: "cancel",
        }),
        TournamentStatus::Upcoming | TournamentStatus::Active => {
            let from = tournament.status;
            tournament.status = TournamentStatus::Cancelled;
            tournament.touch();
            log::info!("Tournament {} cancelled (was {})", tournament.id, from);
            Ok(true)
        }
    }
}

/// Apply `patch`. Upcoming tournaments accept every field; active ones only name, description,
/// rules and prize pool. A frozen field resubmitted with its current value is accepted.
pub fn edit_tournament(
    tournament: &mut Tournament,
    patch: TournamentPatch,
) -> Result<(), TournamentError> {
    if tournament.status.is_terminal() {
        return Err(TournamentError::InvalidTransition {
            from: tournament.status,
            action: "edit",
        });
    }
    if patch.is_empty() {
        return Err(TournamentError::Validation(
            "no fields to update".to_string(),
        ));
    }
    if let Some(name) = &patch.name {
        validate_name(name)?;
    }

    if tournament.status == TournamentStatus::Active {
        if let Some(field) = patch.frozen_change(tournament) {
            return Err(TournamentError::FieldFrozen(field));
        }
    } else {
        let max = patch.max_participants.unwrap_or(tournament.max_participants);
        let min = patch.min_participants.unwrap_or(tournament.min_participants);
        validate_participant_bounds(min, max)?;
        let registered = tournament.participant_count();
        if max < registered {
            return Err(TournamentError::Validation(format!(
                "maxParticipants cannot be below the {registered} registered participants"
            )));
        }
    }

    let TournamentPatch {
        name,
        description,
        rules,
        prize_pool,
        format,
        max_participants,
        min_participants,
        start_time,
        seeding,
    } = patch;

    if let Some(name) = name {
        tournament.name = name.trim().to_string();
    }
    if let Some(description) = description {
        tournament.description = description;
    }
    if rules.is_some() {
        tournament.rules = rules;
    }
    if prize_pool.is_some() {
        tournament.prize_pool = prize_pool;
    }
    if let Some(format) = format {
        tournament.format = format;
    }
    if let Some(max) = max_participants {
        tournament.max_participants = max;
    }
    if let Some(min) = min_participants {
        tournament.min_participants = min;
    }
    if let Some(start_time) = start_time {
        tournament.start_time = start_time;
    }
    if let Some(seeding) = seeding {
        tournament.seeding = seeding;
    }
    tournament.touch();
    Ok(())
}
