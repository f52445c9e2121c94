//! Bracket builder: seeds participants into the first round of a single-elimination bracket.

use rand::seq::SliceRandom;

use crate::models::{
    Match, Participant, ParticipantId, Round, SeedingPolicy, TournamentError, TournamentId,
};

/// Smallest power of two that holds `participants` (1 for an empty or single-entry field).
pub fn bracket_size(participants: usize) -> usize {
    participants.max(1).next_power_of_two()
}

/// Rounds a full bracket of this many participants takes: `ceil(log2(n))`.
pub fn planned_rounds(participants: usize) -> u32 {
    bracket_size(participants).trailing_zeros()
}

/// Empty slots needed to fill the bracket.
pub fn bye_count(participants: usize) -> usize {
    bracket_size(participants) - participants
}

/// Standard bracket placement of ranks 1..=size, e.g. `[1, 8, 4, 5, 2, 7, 3, 6]` for 8.
///
/// Consecutive pairs are first round matches. Adjacent matches meet next, so rank 1 and rank 2
/// can only meet in the final.
pub fn seed_order(size: usize) -> Vec<usize> {
    let mut order = vec![1];
    while order.len() < size {
        let len = order.len() * 2;
        order = order.iter().flat_map(|&s| [s, len + 1 - s]).collect();
    }
    order
}

/// Orders participants from strongest to weakest according to `policy`.
///
/// Seeded participants come first by seed ascending; ties and unseeded participants fall back
/// to join time, then to their position in `participants`.
fn rank(participants: &[Participant], policy: SeedingPolicy) -> Vec<ParticipantId> {
    let mut indexed: Vec<(usize, &Participant)> = participants.iter().enumerate().collect();
    indexed.sort_by_key(|(idx, p)| (p.seed.is_none(), p.seed, p.joined_at, *idx));

    match policy {
        SeedingPolicy::Seeded => indexed.into_iter().map(|(_, p)| p.id).collect(),
        SeedingPolicy::Random => {
            let split = indexed.partition_point(|(_, p)| p.seed.is_some());
            let mut unseeded: Vec<ParticipantId> =
                indexed[split..].iter().map(|(_, p)| p.id).collect();
            unseeded.shuffle(&mut rand::thread_rng());
            indexed[..split]
                .iter()
                .map(|(_, p)| p.id)
                .chain(unseeded)
                .collect()
        }
    }
}

/// Build round 1 for `participants`.
///
/// Participant count is padded to the next power of two with empty slots. Empty slots always
/// face the highest seeds, and every such match is created as a resolved bye. Does not touch
/// tournament status.
pub fn build_initial_round(
    tournament_id: TournamentId,
    participants: &[Participant],
    policy: SeedingPolicy,
) -> Result<Round, TournamentError> {
    if participants.is_empty() {
        return Err(TournamentError::InsufficientParticipants {
            required: 1,
            registered: 0,
        });
    }

    let ranked = rank(participants, policy);
    let size = bracket_size(ranked.len());
    let slot = |rank: usize| ranked.get(rank - 1).copied();

    let mut round = Round::new(tournament_id, 1);
    let round_id = round.id;

    if size == 1 {
        round.matches.push(Match::new(round_id, 1, 0, [slot(1), None]));
    } else {
        round.matches = seed_order(size)
            .chunks_exact(2)
            .enumerate()
            .map(|(position, pair)| Match::new(round_id, 1, position, [slot(pair[0]), slot(pair[1])]))
            .collect();
    }

    log::debug!(
        "Built round 1 for tournament {}: {} participants, bracket of {}, {} byes",
        tournament_id,
        ranked.len(),
        size,
        round.byes()
    );

    Ok(round)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_order_keeps_top_seeds_apart() {
        assert_eq!(seed_order(1), vec![1]);
        assert_eq!(seed_order(2), vec![1, 2]);
        assert_eq!(seed_order(4), vec![1, 4, 2, 3]);
        assert_eq!(seed_order(8), vec![1, 8, 4, 5, 2, 7, 3, 6]);
    }

    #[test]
    fn sizes_and_rounds() {
        assert_eq!(bracket_size(0), 1);
        assert_eq!(bracket_size(5), 8);
        assert_eq!(bracket_size(16), 16);
        assert_eq!(planned_rounds(1), 0);
        assert_eq!(planned_rounds(5), 3);
        assert_eq!(planned_rounds(17), 5);
        assert_eq!(bye_count(5), 3);
        assert_eq!(bye_count(8), 0);
    }
}
