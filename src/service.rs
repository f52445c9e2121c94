//! Tournament service: every operation the HTTP layer exposes, applied atomically per tournament.

use std::time::Duration;

use crate::config::Config;
use crate::logic::{
    cancel_tournament, edit_tournament, join_tournament, record_result, set_participant_seed,
    start_tournament, try_advance_round, withdraw_participant, Advance, TournamentPatch,
};
use crate::models::{
    Match, MatchId, Participant, ParticipantId, Round, Tournament, TournamentDraft,
    TournamentError, TournamentId, TournamentStatus,
};
use crate::store::TournamentStore;

/// Result of a successful join.
#[derive(Clone, Debug)]
pub struct Registration {
    pub participant: Participant,
    pub participant_count: u32,
}

pub struct TournamentService {
    store: TournamentStore,
    auto_advance: bool,
}

impl TournamentService {
    pub fn new(auto_advance: bool) -> Self {
        Self {
            store: TournamentStore::new(),
            auto_advance,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.auto_advance)
    }

    pub fn create(&self, draft: TournamentDraft) -> Result<Tournament, TournamentError> {
        let tournament = Tournament::new(draft)?;
        log::info!(
            "Created tournament {} ({:?}, up to {} participants)",
            tournament.id,
            tournament.name,
            tournament.max_participants
        );
        self.store.insert(tournament.clone());
        Ok(tournament)
    }

    pub fn get(&self, id: TournamentId) -> Result<Tournament, TournamentError> {
        self.store.get(id)
    }

    /// All tournaments, optionally restricted to one status, earliest start first.
    pub fn list(&self, status: Option<TournamentStatus>) -> Vec<Tournament> {
        let mut tournaments = self
            .store
            .snapshot(|t| status.map_or(true, |s| t.status == s));
        tournaments.sort_by_key(|t| (t.start_time, t.created_at));
        tournaments
    }

    pub fn join(
        &self,
        id: TournamentId,
        user_id: &str,
        seed: Option<u32>,
    ) -> Result<Registration, TournamentError> {
        self.store
            .transact(id, |t| {
                let participant_id = join_tournament(t, user_id, seed)?;
                let participant = t
                    .participant(participant_id)
                    .cloned()
                    .ok_or(TournamentError::ParticipantNotFound(participant_id))?;
                Ok(Registration {
                    participant,
                    participant_count: t.participant_count(),
                })
            })
            .inspect(|r| {
                log::info!(
                    "User {} joined tournament {} ({} registered)",
                    r.participant.user_id,
                    id,
                    r.participant_count
                )
            })
            .inspect_err(|e| log::debug!("Join of tournament {} rejected: {}", id, e))
    }

    pub fn withdraw(
        &self,
        id: TournamentId,
        participant_id: ParticipantId,
    ) -> Result<Tournament, TournamentError> {
        self.store.transact(id, |t| {
            withdraw_participant(t, participant_id)?;
            Ok(t.clone())
        })
    }

    pub fn set_seed(
        &self,
        id: TournamentId,
        participant_id: ParticipantId,
        seed: Option<u32>,
    ) -> Result<Participant, TournamentError> {
        self.store.transact(id, |t| {
            set_participant_seed(t, participant_id, seed)?;
            t.participant(participant_id)
                .cloned()
                .ok_or(TournamentError::ParticipantNotFound(participant_id))
        })
    }

    /// Build round 1 and activate the tournament.
    pub fn start(&self, id: TournamentId) -> Result<Round, TournamentError> {
        self.store
            .transact(id, start_tournament)
            .inspect_err(|e| log::debug!("Start of tournament {} rejected: {}", id, e))
    }

    /// Record a result. With auto-advance on, a result that finishes its round also creates the
    /// next round (or completes the tournament) before the lock is released.
    pub fn report_result(
        &self,
        match_id: MatchId,
        winner: ParticipantId,
    ) -> Result<Match, TournamentError> {
        let id = self.store.tournament_for_match(match_id)?;
        let auto_advance = self.auto_advance;
        self.store
            .transact(id, |t| {
                let decided = record_result(t, match_id, winner)?;
                if auto_advance && t.status == TournamentStatus::Active {
                    try_advance_round(t)?;
                }
                Ok(decided)
            })
            .inspect_err(|e| log::debug!("Result for match {} rejected: {}", match_id, e))
    }

    pub fn advance(&self, id: TournamentId) -> Result<Advance, TournamentError> {
        self.store.transact(id, try_advance_round)
    }

    /// Cancel. Cancelling twice returns the cancelled tournament again.
    pub fn cancel(&self, id: TournamentId) -> Result<Tournament, TournamentError> {
        self.store.transact(id, |t| {
            cancel_tournament(t)?;
            Ok(t.clone())
        })
    }

    pub fn edit(
        &self,
        id: TournamentId,
        patch: TournamentPatch,
    ) -> Result<Tournament, TournamentError> {
        self.store
            .transact(id, |t| {
                edit_tournament(t, patch)?;
                Ok(t.clone())
            })
            .inspect_err(|e| log::debug!("Edit of tournament {} rejected: {}", id, e))
    }

    pub fn get_match(&self, match_id: MatchId) -> Result<Match, TournamentError> {
        let id = self.store.tournament_for_match(match_id)?;
        self.store
            .get(id)?
            .find_match(match_id)
            .cloned()
            .ok_or(TournamentError::MatchNotFound(match_id))
    }

    /// Drop finished tournaments idle for at least `max_idle`.
    pub fn purge_finished(&self, max_idle: Duration) -> usize {
        let removed = self.store.purge_finished(max_idle);
        if removed > 0 {
            log::info!("Cleaned up {} finished tournament(s)", removed);
        }
        removed
    }
}
