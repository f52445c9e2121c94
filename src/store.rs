//! In-memory tournament store with one lock per tournament.
//!
//! Mutations run through [`TournamentStore::transact`], which holds the tournament's mutex for the
//! whole operation and only commits the working copy when the operation succeeds.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};

use crate::models::{MatchId, Tournament, TournamentError, TournamentId};

/// Per-tournament entry: tournament data + last activity time (for housekeeping).
struct TournamentEntry {
    tournament: Tournament,
    last_activity: Instant,
}

#[derive(Default)]
pub struct TournamentStore {
    tournaments: RwLock<HashMap<TournamentId, Arc<Mutex<TournamentEntry>>>>,
    /// Which tournament owns each match.
    matches: RwLock<HashMap<MatchId, TournamentId>>,
}

impl TournamentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, tournament: Tournament) {
        let id = tournament.id;
        let match_ids: Vec<MatchId> = tournament.match_ids().collect();
        let entry = TournamentEntry {
            tournament,
            last_activity: Instant::now(),
        };
        self.tournaments
            .write()
            .insert(id, Arc::new(Mutex::new(entry)));
        if !match_ids.is_empty() {
            let mut index = self.matches.write();
            for match_id in match_ids {
                index.insert(match_id, id);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.tournaments.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entry(&self, id: TournamentId) -> Result<Arc<Mutex<TournamentEntry>>, TournamentError> {
        self.tournaments
            .read()
            .get(&id)
            .cloned()
            .ok_or(TournamentError::TournamentNotFound(id))
    }

    /// Snapshot of one tournament. Refreshes its activity time.
    pub fn get(&self, id: TournamentId) -> Result<Tournament, TournamentError> {
        let entry = self.entry(id)?;
        let mut guard = entry.lock();
        guard.last_activity = Instant::now();
        Ok(guard.tournament.clone())
    }

    /// Snapshot of every tournament matching `filter`.
    pub fn snapshot<F>(&self, filter: F) -> Vec<Tournament>
    where
        F: Fn(&Tournament) -> bool,
    {
        let entries: Vec<_> = self.tournaments.read().values().cloned().collect();
        entries
            .iter()
            .filter_map(|entry| {
                let guard = entry.lock();
                filter(&guard.tournament).then(|| guard.tournament.clone())
            })
            .collect()
    }

    /// Tournament owning `match_id`.
    pub fn tournament_for_match(&self, match_id: MatchId) -> Result<TournamentId, TournamentError> {
        self.matches
            .read()
            .get(&match_id)
            .copied()
            .ok_or(TournamentError::MatchNotFound(match_id))
    }

    /// Run `f` against tournament `id` under its lock.
    ///
    /// `f` works on a copy; the copy replaces the stored tournament only if `f` returns `Ok`, so a
    /// failed operation leaves no partial changes behind. Matches created by `f` are indexed
    /// before the lock is released.
    pub fn transact<R, F>(&self, id: TournamentId, f: F) -> Result<R, TournamentError>
    where
        F: FnOnce(&mut Tournament) -> Result<R, TournamentError>,
    {
        let entry = self.entry(id)?;
        let mut guard = entry.lock();
        guard.last_activity = Instant::now();

        let mut draft = guard.tournament.clone();
        let result = f(&mut draft)?;

        let known_rounds = guard.tournament.rounds.len();
        let new_matches: Vec<MatchId> = draft
            .rounds
            .iter()
            .skip(known_rounds)
            .flat_map(|r| r.matches.iter().map(|m| m.id))
            .collect();
        guard.tournament = draft;

        if !new_matches.is_empty() {
            let mut index = self.matches.write();
            for match_id in new_matches {
                index.insert(match_id, id);
            }
        }
        Ok(result)
    }

    /// Remove completed and cancelled tournaments idle for at least `max_idle`. Tournaments busy
    /// in another operation are skipped until the next pass.
    pub fn purge_finished(&self, max_idle: Duration) -> usize {
        let mut removed_matches = Vec::new();
        let removed = {
            let mut tournaments = self.tournaments.write();
            let before = tournaments.len();
            tournaments.retain(|_, entry| {
                let Some(guard) = entry.try_lock() else {
                    return true;
                };
                let stale = guard.tournament.status.is_terminal()
                    && guard.last_activity.elapsed() >= max_idle;
                if stale {
                    removed_matches.extend(guard.tournament.match_ids());
                }
                !stale
            });
            before - tournaments.len()
        };

        if !removed_matches.is_empty() {
            let mut index = self.matches.write();
            for match_id in removed_matches {
                index.remove(&match_id);
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::{cancel_tournament, join_tournament, start_tournament};
    use crate::models::{SeedingPolicy, TournamentDraft, TournamentStatus};
    use chrono::Utc;

    fn tournament() -> Tournament {
        Tournament::new(TournamentDraft {
            name: "Store test".to_string(),
            description: String::new(),
            format: "standard".to_string(),
            rules: None,
            organizer_id: "org".to_string(),
            max_participants: 4,
            min_participants: 2,
            start_time: Utc::now(),
            prize_pool: None,
            seeding: SeedingPolicy::Seeded,
        })
        .unwrap()
    }

    #[test]
    fn failed_operation_leaves_no_trace() {
        let store = TournamentStore::new();
        let t = tournament();
        let id = t.id;
        store.insert(t);

        let result: Result<(), _> = store.transact(id, |t| {
            join_tournament(t, "alice", None)?;
            Err(TournamentError::Validation("abort".to_string()))
        });
        assert!(result.is_err());
        assert!(store.get(id).unwrap().participants.is_empty());
    }

    #[test]
    fn new_matches_are_indexed() {
        let store = TournamentStore::new();
        let t = tournament();
        let id = t.id;
        store.insert(t);

        let round = store
            .transact(id, |t| {
                join_tournament(t, "a", None)?;
                join_tournament(t, "b", None)?;
                start_tournament(t)
            })
            .unwrap();
        assert_eq!(store.tournament_for_match(round.matches[0].id), Ok(id));
    }

    #[test]
    fn purge_drops_only_finished_tournaments() {
        let store = TournamentStore::new();
        let upcoming = tournament();
        let cancelled = tournament();
        let cancelled_id = cancelled.id;
        store.insert(upcoming);
        store.insert(cancelled);
        store.transact(cancelled_id, cancel_tournament).unwrap();
        assert_eq!(store.len(), 2);

        assert_eq!(store.purge_finished(Duration::from_secs(3600)), 0);
        assert_eq!(store.purge_finished(Duration::ZERO), 1);
        assert_eq!(store.len(), 1);
        assert!(matches!(
            store.get(cancelled_id),
            Err(TournamentError::TournamentNotFound(_))
        ));
        let remaining = store.snapshot(|t| t.status == TournamentStatus::Upcoming);
        assert_eq!(remaining.len(), 1);
        assert!(!store.is_empty());
    }
}
