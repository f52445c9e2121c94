//! Match result recording.

use chrono::Utc;

use crate::models::{
    Match, MatchId, MatchStatus, ParticipantId, Tournament, TournamentError, TournamentStatus,
};

/// Record `winner` for a pending match and knock out the other occupant.
///
/// Re-reporting the winner already on record returns the match unchanged, even once the
/// tournament has finished, so retried client requests succeed. A different winner on a decided
/// match is rejected.
pub fn record_result(
    tournament: &mut Tournament,
    match_id: MatchId,
    winner: ParticipantId,
) -> Result<Match, TournamentError> {
    let current = tournament
        .find_match(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;

    match current.status {
        MatchStatus::Decided if current.winner == Some(winner) => return Ok(current.clone()),
        MatchStatus::Decided => return Err(TournamentError::MatchAlreadyDecided),
        MatchStatus::Bye => return Err(TournamentError::MatchNotReady),
        MatchStatus::Pending => {}
    }
    if tournament.status != TournamentStatus::Active {
        return Err(TournamentError::TournamentNotActive);
    }
    if !current.has_participant(winner) {
        return Err(TournamentError::InvalidWinner(winner));
    }

    let Some(m) = tournament.find_match_mut(match_id) else {
        return Err(TournamentError::MatchNotFound(match_id));
    };
    m.winner = Some(winner);
    m.status = MatchStatus::Decided;
    m.decided_at = Some(Utc::now());
    let decided = m.clone();

    if let Some(loser) = decided.loser() {
        tournament.eliminate_participant(loser);
    }
    tournament.touch();
    log::debug!(
        "Match {} (round {}) decided for {}",
        match_id,
        decided.round_number,
        winner
    );
    Ok(decided)
}
