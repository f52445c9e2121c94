//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use tcg_bracket_web::{
    join_tournament, start_tournament, Participant, ParticipantId, SeedingPolicy, Tournament,
    TournamentDraft, TournamentId,
};
use uuid::Uuid;

pub fn draft(max_participants: u32) -> TournamentDraft {
    TournamentDraft {
        name: "Friday Night Standard".to_string(),
        description: "Weekly store tournament".to_string(),
        format: "standard".to_string(),
        rules: None,
        organizer_id: "organizer-1".to_string(),
        max_participants,
        min_participants: 2,
        start_time: Utc.with_ymd_and_hms(2026, 11, 6, 18, 0, 0).unwrap(),
        prize_pool: Some("Booster box".to_string()),
        seeding: SeedingPolicy::Seeded,
    }
}

/// Upcoming tournament with `n` registered users `u0..u{n-1}`, unseeded, in join order.
pub fn tournament_with_participants(n: usize) -> Tournament {
    let mut t = Tournament::new(draft(64)).unwrap();
    for i in 0..n {
        join_tournament(&mut t, &format!("u{i}"), None).unwrap();
    }
    t
}

pub fn started(n: usize) -> Tournament {
    let mut t = tournament_with_participants(n);
    start_tournament(&mut t).unwrap();
    t
}

/// Participants with explicit seeds, for feeding the bracket builder directly.
pub fn participants(tournament_id: TournamentId, seeds: &[Option<u32>]) -> Vec<Participant> {
    seeds
        .iter()
        .enumerate()
        .map(|(i, &seed)| Participant::new(tournament_id, format!("u{i}"), seed))
        .collect()
}

pub fn other_id() -> ParticipantId {
    Uuid::new_v4()
}
