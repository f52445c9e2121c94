//! Round advancement: pair the winners of a finished round into the next one.

use crate::models::{
    Match, ParticipantId, Round, Tournament, TournamentError, TournamentStatus,
};

/// Outcome of an advancement attempt.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Advance {
    /// The current round still has pending matches.
    NotReady,
    /// A new round was created.
    NextRound(Round),
    /// The final was decided; the tournament is over.
    Completed { champion: ParticipantId },
}

/// Advance the tournament if every match of the current round is finished.
///
/// Winners of positions 2k and 2k+1 meet at position k of the next round. A round with a single
/// winner completes the tournament instead. Nothing changes when `NotReady` or an error is
/// returned.
pub fn try_advance_round(tournament: &mut Tournament) -> Result<Advance, TournamentError> {
    if tournament.status != TournamentStatus::Active {
        return Err(TournamentError::TournamentNotActive);
    }
    let Some(current) = tournament.current_round() else {
        return Ok(Advance::NotReady);
    };
    let winners = match current.winners() {
        Some(w) if !w.is_empty() => w,
        _ => return Ok(Advance::NotReady),
    };
    let number = current.number + 1;

    if let [champion] = *winners.as_slice() {
        tournament.champion = Some(champion);
        tournament.status = TournamentStatus::Completed;
        tournament.touch();
        log::info!(
            "Tournament {} completed after {} round(s), champion {}",
            tournament.id,
            tournament.rounds.len(),
            champion
        );
        return Ok(Advance::Completed { champion });
    }

    let mut round = Round::new(tournament.id, number);
    let round_id = round.id;
    round.matches = winners
        .chunks(2)
        .enumerate()
        .map(|(position, pair)| {
            Match::new(round_id, number, position, [Some(pair[0]), pair.get(1).copied()])
        })
        .collect();

    tournament.rounds.push(round.clone());
    tournament.touch();
    log::info!(
        "Tournament {} advanced to round {} ({} matches)",
        tournament.id,
        number,
        round.matches.len()
    );
    Ok(Advance::NextRound(round))
}
