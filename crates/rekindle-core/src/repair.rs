//! Repair workflow: moving a slipped pledge back to good standing.
//!
//! The advisory state is never stored. "Slipped" is the slippage
//! detector's window predicate; "Repaired" means a repair was submitted
//! after the run's last event, so the disruption is acknowledged until
//! the next check-in gives the window fresh data.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::{Result, ValidationError};
use crate::pledge::Pledge;
use crate::slippage::is_slipped;
use crate::store::Store;

/// Structured reflection submitted to resolve a slipped pledge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repair {
    /// Unique identifier
    pub id: String,
    /// Pledge being repaired (back-reference)
    pub pledge_id: String,
    /// Day the repair was submitted
    pub date: NaiveDate,
    /// What caused the slip; never empty
    pub cause_tags: Vec<String>,
    /// What was going on at the time
    pub situation_note: Option<String>,
    /// Adjusted rules going forward
    pub new_rules: Option<String>,
    /// Why this pledge matters
    pub mission_note: Option<String>,
    /// Submission timestamp
    pub submitted_at: DateTime<Utc>,
}

/// Advisory state of a pledge's current disruption episode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AdvisoryState {
    /// No disruption in the recent window
    Active,
    /// Recent window contains a skip and no repair has addressed it
    Slipped,
    /// Recent window contains a skip but a repair postdates the last event
    Repaired,
}

impl fmt::Display for AdvisoryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdvisoryState::Active => write!(f, "active"),
            AdvisoryState::Slipped => write!(f, "slipped"),
            AdvisoryState::Repaired => write!(f, "repaired"),
        }
    }
}

/// Derive the advisory state of `pledge` from the ledger and its repairs.
///
/// `repairs` must be the repairs recorded against this pledge; order does
/// not matter.
pub fn advisory_state(pledge: &Pledge, repairs: &[&Repair]) -> AdvisoryState {
    if !is_slipped(pledge) {
        return AdvisoryState::Active;
    }
    let last_event = pledge.current_run.last_event_date();
    let latest_repair = repairs.iter().map(|r| r.date).max();
    match (last_event, latest_repair) {
        (Some(event), Some(repair)) if repair >= event => AdvisoryState::Repaired,
        _ => AdvisoryState::Slipped,
    }
}

/// Submit a repair for a slipped pledge.
///
/// Fails with a validation error if `cause_tags` is empty or the pledge
/// is not currently in the slipped advisory state (which also rejects
/// redundant submissions). The repair only creates a record; ledger
/// events are never rewritten.
pub fn submit_repair(
    store: &mut Store,
    pledge_id: &str,
    cause_tags: Vec<String>,
    situation_note: Option<String>,
    new_rules: Option<String>,
    mission_note: Option<String>,
    today: NaiveDate,
) -> Result<Repair> {
    if cause_tags.is_empty() {
        return Err(ValidationError::EmptyCauseTags.into());
    }
    let pledge = store.get_pledge(pledge_id)?;
    let repairs = store.repairs_for(pledge_id);
    if advisory_state(pledge, &repairs) != AdvisoryState::Slipped {
        return Err(ValidationError::NotSlipped {
            pledge_id: pledge_id.to_string(),
        }
        .into());
    }

    let repair = Repair {
        id: Uuid::new_v4().to_string(),
        pledge_id: pledge_id.to_string(),
        date: today,
        cause_tags,
        situation_note,
        new_rules,
        mission_note,
        submitted_at: Utc::now(),
    };
    store.upsert_repair(repair.clone());
    Ok(repair)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::ledger::record_checkin;
    use crate::pledge::Frequency;
    use crate::run::EventKind;
    use crate::user::User;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap() + chrono::Days::new(n as u64)
    }

    fn store_with_pledge() -> (Store, String) {
        let mut store = Store::new(User::new("Mika"));
        let pledge = Pledge::new("Walk", "walk 20 min", Frequency::Daily, 30, day(0));
        let id = pledge.id.clone();
        store.upsert_pledge(pledge);
        (store, id)
    }

    fn slip(store: &mut Store, pledge_id: &str, on: NaiveDate) {
        record_checkin(store, pledge_id, EventKind::Skip, None, None, on).unwrap();
    }

    #[test]
    fn repair_requires_cause_tags() {
        let (mut store, id) = store_with_pledge();
        slip(&mut store, &id, day(0));

        let err = submit_repair(&mut store, &id, vec![], None, None, None, day(0)).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::EmptyCauseTags)
        ));
        assert!(store.list_repairs().is_empty());
    }

    #[test]
    fn repair_on_healthy_pledge_is_rejected() {
        let (mut store, id) = store_with_pledge();
        record_checkin(&mut store, &id, EventKind::Success, None, None, day(0)).unwrap();

        let err = submit_repair(
            &mut store,
            &id,
            vec!["tired".to_string()],
            None,
            None,
            None,
            day(0),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::NotSlipped { .. })
        ));
        assert!(store.list_repairs().is_empty());
    }

    #[test]
    fn repair_round_trips_unchanged() {
        let (mut store, id) = store_with_pledge();
        slip(&mut store, &id, day(0));

        let repair = submit_repair(
            &mut store,
            &id,
            vec!["travel".to_string(), "no-plan".to_string()],
            Some("was on the road".to_string()),
            Some("pack shoes the night before".to_string()),
            Some("health over deadlines".to_string()),
            day(1),
        )
        .unwrap();

        let stored = store.get_repair(&repair.id).unwrap();
        assert_eq!(stored.cause_tags, vec!["travel", "no-plan"]);
        assert_eq!(stored.situation_note.as_deref(), Some("was on the road"));
        assert_eq!(
            stored.new_rules.as_deref(),
            Some("pack shoes the night before")
        );
        assert_eq!(stored.mission_note.as_deref(), Some("health over deadlines"));
    }

    #[test]
    fn redundant_repair_is_rejected() {
        let (mut store, id) = store_with_pledge();
        slip(&mut store, &id, day(0));

        submit_repair(
            &mut store,
            &id,
            vec!["tired".to_string()],
            None,
            None,
            None,
            day(1),
        )
        .unwrap();

        // Already repaired; the second submission has nothing to address.
        let err = submit_repair(
            &mut store,
            &id,
            vec!["tired".to_string()],
            None,
            None,
            None,
            day(1),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::NotSlipped { .. })
        ));
        assert_eq!(store.list_repairs().len(), 1);
    }

    #[test]
    fn next_checkin_is_evaluated_fresh_after_repair() {
        let (mut store, id) = store_with_pledge();
        slip(&mut store, &id, day(0));

        submit_repair(
            &mut store,
            &id,
            vec!["tired".to_string()],
            None,
            None,
            None,
            day(1),
        )
        .unwrap();
        {
            let pledge = store.get_pledge(&id).unwrap();
            let repairs = store.repairs_for(&id);
            assert_eq!(advisory_state(pledge, &repairs), AdvisoryState::Repaired);
        }

        // The skip is still in the 3-event window, so the next check-in
        // re-enters the slipped state: the repair did not rewrite events.
        record_checkin(&mut store, &id, EventKind::Success, None, None, day(2)).unwrap();
        let pledge = store.get_pledge(&id).unwrap();
        let repairs = store.repairs_for(&id);
        assert_eq!(advisory_state(pledge, &repairs), AdvisoryState::Slipped);
    }

    #[test]
    fn unknown_pledge_is_not_found() {
        let mut store = Store::new(User::new("Mika"));
        let err = submit_repair(
            &mut store,
            "missing",
            vec!["tired".to_string()],
            None,
            None,
            None,
            day(0),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }
}
