//! Integration tests for registration, start, cancellation and editing.

mod common;

use chrono::{Duration, TimeZone, Utc};
use common::{draft, started, tournament_with_participants};
use tcg_bracket_web::{
    cancel_tournament, edit_tournament, join_tournament, set_participant_seed, start_tournament,
    withdraw_participant, ParticipantStatus, Tournament, TournamentError, TournamentPatch,
    TournamentStatus,
};

#[test]
fn new_tournament_validates_its_bounds() {
    assert!(matches!(
        Tournament::new(draft(1)),
        Err(TournamentError::Validation(_))
    ));
    let mut d = draft(4);
    d.min_participants = 5;
    assert!(matches!(Tournament::new(d), Err(TournamentError::Validation(_))));
    let mut d = draft(4);
    d.name = "   ".to_string();
    assert!(matches!(Tournament::new(d), Err(TournamentError::Validation(_))));

    let t = Tournament::new(draft(2)).unwrap();
    assert_eq!(t.status, TournamentStatus::Upcoming);
    assert!(t.participants.is_empty());
    assert!(t.rounds.is_empty());
}

#[test]
fn join_stops_at_max_participants() {
    let mut t = Tournament::new(draft(3)).unwrap();
    for user in ["a", "b", "c"] {
        join_tournament(&mut t, user, None).unwrap();
    }
    assert_eq!(
        join_tournament(&mut t, "d", None),
        Err(TournamentError::TournamentFull { max: 3 })
    );
    assert_eq!(t.participant_count(), 3);
}

#[test]
fn a_user_registers_at_most_once() {
    let mut t = Tournament::new(draft(8)).unwrap();
    join_tournament(&mut t, "alice", Some(1)).unwrap();
    assert_eq!(
        join_tournament(&mut t, "alice", None),
        Err(TournamentError::AlreadyRegistered("alice".to_string()))
    );
    assert_eq!(t.participants.len(), 1);
}

#[test]
fn join_rejects_bad_input() {
    let mut t = Tournament::new(draft(8)).unwrap();
    assert!(matches!(
        join_tournament(&mut t, "  ", None),
        Err(TournamentError::Validation(_))
    ));
    assert!(matches!(
        join_tournament(&mut t, "bob", Some(0)),
        Err(TournamentError::Validation(_))
    ));
}

#[test]
fn registration_closes_once_started() {
    let mut t = started(4);
    assert_eq!(
        join_tournament(&mut t, "late", None),
        Err(TournamentError::RegistrationClosed)
    );
    let someone = t.participants[0].id;
    assert_eq!(
        withdraw_participant(&mut t, someone),
        Err(TournamentError::RegistrationClosed)
    );
}

#[test]
fn withdrawn_users_free_their_slot_and_may_rejoin() {
    let mut t = Tournament::new(draft(2)).unwrap();
    let a = join_tournament(&mut t, "a", None).unwrap();
    join_tournament(&mut t, "b", None).unwrap();

    withdraw_participant(&mut t, a).unwrap();
    withdraw_participant(&mut t, a).unwrap();
    assert_eq!(t.participant(a).unwrap().status, ParticipantStatus::Withdrawn);
    assert_eq!(t.participant_count(), 1);

    join_tournament(&mut t, "c", None).unwrap();
    assert_eq!(
        join_tournament(&mut t, "a", None),
        Err(TournamentError::TournamentFull { max: 2 })
    );

    let c = t.participants[2].id;
    withdraw_participant(&mut t, c).unwrap();
    assert_eq!(join_tournament(&mut t, "a", Some(3)), Ok(a));
    assert_eq!(t.participant(a).unwrap().status, ParticipantStatus::Registered);
    assert_eq!(t.participant(a).unwrap().seed, Some(3));
    assert_eq!(t.participants.len(), 3);
}

#[test]
fn withdrawn_participants_are_left_out_of_the_bracket() {
    let mut t = tournament_with_participants(5);
    let gone = t.participants[4].id;
    withdraw_participant(&mut t, gone).unwrap();

    let round = start_tournament(&mut t).unwrap();
    assert_eq!(round.matches.len(), 2);
    assert_eq!(round.byes(), 0);
    assert!(round.matches.iter().all(|m| !m.has_participant(gone)));
}

#[test]
fn seeds_can_change_until_start() {
    let mut t = tournament_with_participants(4);
    let last = t.participants[3].id;
    set_participant_seed(&mut t, last, Some(1)).unwrap();

    let round = start_tournament(&mut t).unwrap();
    assert_eq!(round.matches[0].slots[0], Some(last));
    assert_eq!(
        set_participant_seed(&mut t, last, None),
        Err(TournamentError::RegistrationClosed)
    );
}

#[test]
fn start_needs_enough_participants() {
    let mut t = tournament_with_participants(1);
    assert_eq!(
        start_tournament(&mut t),
        Err(TournamentError::InsufficientParticipants {
            required: 2,
            registered: 1
        })
    );
    assert_eq!(t.status, TournamentStatus::Upcoming);
    assert!(t.rounds.is_empty());
}

#[test]
fn start_only_from_upcoming() {
    let mut t = started(2);
    assert_eq!(
        start_tournament(&mut t),
        Err(TournamentError::InvalidTransition {
            from: TournamentStatus::Active,
            action: "start"
        })
    );
}

#[test]
fn cancel_is_idempotent_but_not_after_completion() {
    let mut t = tournament_with_participants(2);
    assert_eq!(cancel_tournament(&mut t), Ok(true));
    assert_eq!(cancel_tournament(&mut t), Ok(false));
    assert_eq!(t.status, TournamentStatus::Cancelled);
    assert_eq!(
        join_tournament(&mut t, "x", None),
        Err(TournamentError::RegistrationClosed)
    );

    let mut t = started(4);
    assert_eq!(cancel_tournament(&mut t), Ok(true));
    assert_eq!(t.rounds.len(), 1, "rounds are kept for audit");

    let mut d = draft(2);
    d.min_participants = 1;
    let mut t = Tournament::new(d).unwrap();
    join_tournament(&mut t, "solo", None).unwrap();
    start_tournament(&mut t).unwrap();
    assert_eq!(t.status, TournamentStatus::Completed);
    assert!(matches!(
        cancel_tournament(&mut t),
        Err(TournamentError::InvalidTransition { .. })
    ));
}

#[test]
fn upcoming_tournaments_accept_every_field() {
    let mut t = tournament_with_participants(3);
    let start = Utc.with_ymd_and_hms(2026, 12, 1, 10, 0, 0).unwrap();
    edit_tournament(
        &mut t,
        TournamentPatch {
            name: Some("Regional Qualifier".to_string()),
            format: Some("draft".to_string()),
            max_participants: Some(16),
            start_time: Some(start),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(t.name, "Regional Qualifier");
    assert_eq!(t.format, "draft");
    assert_eq!(t.max_participants, 16);
    assert_eq!(t.start_time, start);

    let shrink = TournamentPatch {
        max_participants: Some(2),
        ..Default::default()
    };
    assert!(matches!(
        edit_tournament(&mut t, shrink),
        Err(TournamentError::Validation(_))
    ));
    assert_eq!(t.max_participants, 16);
}

#[test]
fn active_tournaments_freeze_bracket_fields() {
    let mut t = started(4);
    edit_tournament(
        &mut t,
        TournamentPatch {
            name: Some("Renamed".to_string()),
            description: Some("Now streaming".to_string()),
            rules: Some("Best of three".to_string()),
            prize_pool: Some("Playmat".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(t.name, "Renamed");
    assert_eq!(t.rules.as_deref(), Some("Best of three"));

    let frozen = [
        (
            TournamentPatch {
                format: Some("modern".to_string()),
                ..Default::default()
            },
            "format",
        ),
        (
            TournamentPatch {
                max_participants: Some(t.max_participants + 1),
                ..Default::default()
            },
            "maxParticipants",
        ),
        (
            TournamentPatch {
                start_time: Some(t.start_time + Duration::hours(1)),
                ..Default::default()
            },
            "startTime",
        ),
    ];
    for (patch, field) in frozen {
        assert_eq!(
            edit_tournament(&mut t, patch),
            Err(TournamentError::FieldFrozen(field))
        );
    }

    // Resubmitting the current value is harmless.
    let same = TournamentPatch {
        name: Some("Renamed again".to_string()),
        format: Some(t.format.clone()),
        ..Default::default()
    };
    edit_tournament(&mut t, same).unwrap();
    assert_eq!(t.name, "Renamed again");
}

#[test]
fn finished_tournaments_cannot_be_edited() {
    let mut t = tournament_with_participants(2);
    cancel_tournament(&mut t).unwrap();
    let patch = TournamentPatch {
        name: Some("Too late".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        edit_tournament(&mut t, patch),
        Err(TournamentError::InvalidTransition { .. })
    ));
    assert!(matches!(
        edit_tournament(&mut started(2), TournamentPatch::default()),
        Err(TournamentError::Validation(_))
    ));
}
