//! The command/query surface exposed to presentation collaborators.
//!
//! [`Tracker`] owns the entity store and is the single logical writer:
//! commands take `&mut self`, queries take `&self`. All invariants are
//! enforced here or in the modules this facade delegates to; consumers
//! never reach into the store directly.

use chrono::{NaiveDate, Utc};

use crate::error::Result;
use crate::journal::Memory;
use crate::ledger;
use crate::pledge::{Frequency, Pledge, PledgeStatus, Return};
use crate::repair::{self, advisory_state, AdvisoryState, Repair};
use crate::rhythm::{self, RhythmStatus};
use crate::run::{CheckinEvent, EventKind};
use crate::store::Store;
use crate::user::User;

/// State container driving the pledge ledger for one user.
pub struct Tracker {
    store: Store,
}

impl Tracker {
    /// Create a tracker with a fresh store for `user_name`.
    pub fn new(user_name: impl Into<String>) -> Self {
        Tracker {
            store: Store::new(User::new(user_name)),
        }
    }

    /// Wrap an existing store (e.g. loaded from disk).
    pub fn from_store(store: Store) -> Self {
        Tracker { store }
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Consume the tracker, handing the store back (e.g. to persist it).
    pub fn into_store(self) -> Store {
        self.store
    }

    // === Queries ===

    /// Pledges, optionally filtered by status.
    pub fn fetch_pledges(&self, status: Option<PledgeStatus>) -> Vec<&Pledge> {
        self.store
            .list_pledges()
            .into_iter()
            .filter(|p| status.map_or(true, |s| p.status == s))
            .collect()
    }

    /// A single pledge, or `None` if the id does not resolve.
    pub fn get_pledge_by_id(&self, id: &str) -> Option<&Pledge> {
        self.store.get_pledge(id).ok()
    }

    /// Pledges currently in the slipped advisory state.
    pub fn get_slipped_pledges(&self) -> Vec<&Pledge> {
        self.store
            .list_pledges()
            .into_iter()
            .filter(|p| {
                let repairs = self.store.repairs_for(&p.id);
                advisory_state(p, &repairs) == AdvisoryState::Slipped
            })
            .collect()
    }

    /// Advisory state of one pledge.
    pub fn advisory_state_of(&self, pledge_id: &str) -> Result<AdvisoryState> {
        let pledge = self.store.get_pledge(pledge_id)?;
        let repairs = self.store.repairs_for(pledge_id);
        Ok(advisory_state(pledge, &repairs))
    }

    /// Rhythm status as of today.
    pub fn fetch_rhythm_status(&self) -> RhythmStatus {
        self.fetch_rhythm_status_on(Utc::now().date_naive())
    }

    /// Rhythm status as of an explicit date.
    pub fn fetch_rhythm_status_on(&self, today: NaiveDate) -> RhythmStatus {
        rhythm::compute_rhythm_status(&self.store, today)
    }

    /// Recent memories, newest first, optionally scoped to one pledge.
    pub fn fetch_recent_memories(&self, pledge_id: Option<&str>) -> Vec<&Memory> {
        self.store.memories_for(pledge_id)
    }

    // === Commands ===

    /// Create a new pledge and return it.
    ///
    /// `frequency` is parsed ("daily", "weekdays", "N/week"); malformed
    /// input is a validation error.
    pub fn create_pledge(
        &mut self,
        title: impl Into<String>,
        action: impl Into<String>,
        frequency: &str,
        target_days: u32,
        recurring: bool,
        share_with: Vec<String>,
    ) -> Result<Pledge> {
        let frequency: Frequency = frequency.parse()?;
        let mut pledge = Pledge::new(
            title,
            action,
            frequency,
            target_days,
            Utc::now().date_naive(),
        );
        pledge.recurring = recurring;
        pledge.share_with = share_with;
        self.store.upsert_pledge(pledge.clone());
        Ok(pledge)
    }

    /// Record today's check-in for a pledge.
    pub fn record_checkin(
        &mut self,
        pledge_id: &str,
        kind: EventKind,
        reason: Option<String>,
        note: Option<String>,
    ) -> Result<CheckinEvent> {
        self.record_checkin_on(pledge_id, kind, reason, note, Utc::now().date_naive())
    }

    /// Record a check-in for an explicit date key.
    pub fn record_checkin_on(
        &mut self,
        pledge_id: &str,
        kind: EventKind,
        reason: Option<String>,
        note: Option<String>,
        today: NaiveDate,
    ) -> Result<CheckinEvent> {
        let event = ledger::record_checkin(&mut self.store, pledge_id, kind, reason, note, today)?;
        self.store.user_mut().mark_active(Utc::now());
        Ok(event)
    }

    /// Submit a repair for a slipped pledge.
    pub fn submit_repair(
        &mut self,
        pledge_id: &str,
        cause_tags: Vec<String>,
        situation_note: Option<String>,
        new_rules: Option<String>,
        mission_note: Option<String>,
    ) -> Result<Repair> {
        self.submit_repair_on(
            pledge_id,
            cause_tags,
            situation_note,
            new_rules,
            mission_note,
            Utc::now().date_naive(),
        )
    }

    /// Submit a repair dated to an explicit day.
    pub fn submit_repair_on(
        &mut self,
        pledge_id: &str,
        cause_tags: Vec<String>,
        situation_note: Option<String>,
        new_rules: Option<String>,
        mission_note: Option<String>,
        today: NaiveDate,
    ) -> Result<Repair> {
        repair::submit_repair(
            &mut self.store,
            pledge_id,
            cause_tags,
            situation_note,
            new_rules,
            mission_note,
            today,
        )
    }

    /// Pause an active pledge.
    pub fn pause_pledge(&mut self, pledge_id: &str) -> Result<()> {
        let pledge = self.store.get_pledge_mut(pledge_id)?;
        pledge.transition_to(PledgeStatus::Paused)?;
        Ok(())
    }

    /// Resume a paused or lapsed pledge; returns the return record if the
    /// gap warranted one.
    pub fn resume_pledge(
        &mut self,
        pledge_id: &str,
        reason: Option<String>,
    ) -> Result<Option<Return>> {
        ledger::resume_pledge(
            &mut self.store,
            pledge_id,
            reason,
            Utc::now().date_naive(),
        )
    }

    /// Attach a journal note to a pledge for today.
    pub fn add_memory(&mut self, pledge_id: &str, text: impl Into<String>) -> Result<Memory> {
        // Validate the back-reference before storing.
        self.store.get_pledge(pledge_id)?;
        let memory = Memory::new(pledge_id, Utc::now().date_naive(), text);
        self.store.upsert_memory(memory.clone());
        Ok(memory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn create_pledge_rejects_bad_frequency() {
        let mut tracker = Tracker::new("Mika");
        let err = tracker
            .create_pledge("Walk", "walk 20 min", "fortnightly", 7, true, vec![])
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(tracker.fetch_pledges(None).is_empty());
    }

    #[test]
    fn created_pledge_is_queryable() {
        let mut tracker = Tracker::new("Mika");
        let pledge = tracker
            .create_pledge(
                "Walk",
                "walk 20 min",
                "daily",
                7,
                true,
                vec!["Ana".to_string()],
            )
            .unwrap();

        let fetched = tracker.get_pledge_by_id(&pledge.id).unwrap();
        assert_eq!(fetched.title, "Walk");
        assert_eq!(fetched.share_with, vec!["Ana"]);
        assert_eq!(tracker.fetch_pledges(Some(PledgeStatus::Active)).len(), 1);
        assert!(tracker.fetch_pledges(Some(PledgeStatus::Paused)).is_empty());
    }

    #[test]
    fn memories_require_existing_pledge() {
        let mut tracker = Tracker::new("Mika");
        assert!(tracker.add_memory("missing", "note").is_err());

        let pledge = tracker
            .create_pledge("Walk", "walk 20 min", "daily", 7, true, vec![])
            .unwrap();
        tracker.add_memory(&pledge.id, "good walk today").unwrap();

        assert_eq!(tracker.fetch_recent_memories(None).len(), 1);
        assert_eq!(tracker.fetch_recent_memories(Some(&pledge.id)).len(), 1);
        assert!(tracker.fetch_recent_memories(Some("other")).is_empty());
    }

    #[test]
    fn pause_and_resume_round_trip() {
        let mut tracker = Tracker::new("Mika");
        let pledge = tracker
            .create_pledge("Walk", "walk 20 min", "daily", 7, true, vec![])
            .unwrap();

        tracker.pause_pledge(&pledge.id).unwrap();
        assert_eq!(
            tracker.get_pledge_by_id(&pledge.id).unwrap().status,
            PledgeStatus::Paused
        );

        tracker.resume_pledge(&pledge.id, None).unwrap();
        assert_eq!(
            tracker.get_pledge_by_id(&pledge.id).unwrap().status,
            PledgeStatus::Active
        );
    }
}
