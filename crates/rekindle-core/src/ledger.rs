//! Run & event ledger operations: check-ins, run rollover, returns.
//!
//! All mutations here go through a `&mut Store`, so the duplicate-day
//! check and the append happen under a single mutable borrow: two
//! writers can never both record the same (run, day).

use chrono::NaiveDate;

use crate::error::{CoreError, Result, ValidationError};
use crate::pledge::{PledgeStatus, Return};
use crate::run::{CheckinEvent, EventKind};
use crate::store::Store;

/// A run rollover emits a return record when the gap between the old
/// run's end and the new run's start exceeds this many days.
const RETURN_GAP_DAYS: i64 = 1;

/// Record today's check-in outcome for a pledge.
///
/// Fails with [`CoreError::DuplicateCheckin`] when an event already
/// exists for the current run and `today` — the idempotency boundary is
/// the calendar day, not the call.
///
/// A success that brings `completed_days` up to `target_days` closes the
/// run; a recurring pledge immediately opens the next run, a one-shot
/// pledge completes.
pub fn record_checkin(
    store: &mut Store,
    pledge_id: &str,
    kind: EventKind,
    reason: Option<String>,
    note: Option<String>,
    today: NaiveDate,
) -> Result<CheckinEvent> {
    let pledge = store.get_pledge_mut(pledge_id)?;
    if pledge.status != PledgeStatus::Active {
        return Err(ValidationError::InactivePledge {
            pledge_id: pledge_id.to_string(),
            status: pledge.status.to_string(),
        }
        .into());
    }

    let run = &mut pledge.current_run;
    if run.event_on(today).is_some() {
        return Err(CoreError::DuplicateCheckin {
            run_id: run.id.clone(),
            date: today,
        });
    }

    let event = CheckinEvent::new(run.id.clone(), today, kind, reason, note);
    run.append(event.clone());

    if run.is_complete() {
        if pledge.recurring {
            let end_date = today;
            pledge.roll_over(end_date, today);
            // Immediate rollover has no gap; record_return covers the
            // resume path where one exists.
            maybe_record_return(store, pledge_id, end_date, today, None)?;
        } else {
            pledge.current_run.close(today);
            pledge.transition_to(PledgeStatus::Completed)?;
        }
    }

    Ok(event)
}

/// Resume a paused or lapsed pledge by opening a fresh run.
///
/// The stale run is superseded: it is closed at its last recorded
/// activity and a new run starts `today`. When more than
/// [`RETURN_GAP_DAYS`] elapsed in between, a return record is emitted
/// and the user's return count is bumped.
pub fn resume_pledge(
    store: &mut Store,
    pledge_id: &str,
    reason: Option<String>,
    today: NaiveDate,
) -> Result<Option<Return>> {
    let pledge = store.get_pledge_mut(pledge_id)?;
    match pledge.status {
        PledgeStatus::Completed => {
            return Err(ValidationError::InactivePledge {
                pledge_id: pledge_id.to_string(),
                status: pledge.status.to_string(),
            }
            .into());
        }
        PledgeStatus::Paused => pledge.transition_to(PledgeStatus::Active)?,
        PledgeStatus::Active => {}
    }

    let effective_end = pledge
        .current_run
        .end_date
        .or_else(|| pledge.current_run.last_event_date())
        .unwrap_or(pledge.current_run.start_date);

    if (today - effective_end).num_days() <= RETURN_GAP_DAYS
        && pledge.current_run.is_open()
        && pledge.current_run.events.is_empty()
    {
        // Fresh run with no history yet; nothing to supersede.
        return Ok(None);
    }

    pledge.roll_over(effective_end, today);
    maybe_record_return(store, pledge_id, effective_end, today, reason)
}

/// Record a return when `start` is more than [`RETURN_GAP_DAYS`] after `end`.
fn maybe_record_return(
    store: &mut Store,
    pledge_id: &str,
    end: NaiveDate,
    start: NaiveDate,
    reason: Option<String>,
) -> Result<Option<Return>> {
    let gap = (start - end).num_days();
    if gap <= RETURN_GAP_DAYS {
        return Ok(None);
    }

    let record = Return::new(pledge_id, start, gap as u32, reason);
    let pledge = store.get_pledge_mut(pledge_id)?;
    pledge.return_history.push(record.clone());
    store.upsert_return(record.clone());
    store.user_mut().mark_returning(chrono::Utc::now());
    Ok(Some(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pledge::{Frequency, Pledge};
    use crate::user::{ActivityState, User};

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 1).unwrap() + chrono::Days::new(n as u64)
    }

    fn store_with_pledge(target_days: u32, recurring: bool) -> (Store, String) {
        let mut store = Store::new(User::new("Mika"));
        let mut pledge = Pledge::new("Walk", "walk 20 min", Frequency::Daily, target_days, day(0));
        pledge.recurring = recurring;
        let id = pledge.id.clone();
        store.upsert_pledge(pledge);
        (store, id)
    }

    #[test]
    fn checkin_appends_and_counts() {
        let (mut store, id) = store_with_pledge(7, true);

        let event =
            record_checkin(&mut store, &id, EventKind::Success, None, None, day(0)).unwrap();
        assert_eq!(event.kind, EventKind::Success);

        let pledge = store.get_pledge(&id).unwrap();
        assert_eq!(pledge.current_run.completed_days, 1);
        assert_eq!(pledge.current_run.events.len(), 1);
    }

    #[test]
    fn second_checkin_same_day_is_duplicate() {
        let (mut store, id) = store_with_pledge(7, true);

        record_checkin(&mut store, &id, EventKind::Success, None, None, day(0)).unwrap();
        let err =
            record_checkin(&mut store, &id, EventKind::Skip, None, None, day(0)).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateCheckin { .. }));

        // Ledger grew by exactly one, not two.
        let pledge = store.get_pledge(&id).unwrap();
        assert_eq!(pledge.current_run.events.len(), 1);
        assert_eq!(pledge.current_run.completed_days, 1);
    }

    #[test]
    fn checkin_on_paused_pledge_is_rejected() {
        let (mut store, id) = store_with_pledge(7, true);
        store
            .get_pledge_mut(&id)
            .unwrap()
            .transition_to(PledgeStatus::Paused)
            .unwrap();

        let err =
            record_checkin(&mut store, &id, EventKind::Success, None, None, day(0)).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::InactivePledge { .. })
        ));
    }

    #[test]
    fn checkin_on_unknown_pledge_is_not_found() {
        let mut store = Store::new(User::new("Mika"));
        let err = record_checkin(&mut store, "missing", EventKind::Success, None, None, day(0))
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[test]
    fn recurring_pledge_rolls_over_on_target() {
        let (mut store, id) = store_with_pledge(3, true);

        for n in 0..3 {
            record_checkin(&mut store, &id, EventKind::Success, None, None, day(n)).unwrap();
        }

        let pledge = store.get_pledge(&id).unwrap();
        assert_eq!(pledge.status, PledgeStatus::Active);
        assert_eq!(pledge.current_run.number, 2);
        assert_eq!(pledge.current_run.completed_days, 0);
        assert!(pledge.current_run.events.is_empty());
        // Immediate rollover, no gap, no return record.
        assert!(pledge.return_history.is_empty());
    }

    #[test]
    fn one_shot_pledge_completes_on_target() {
        let (mut store, id) = store_with_pledge(2, false);

        record_checkin(&mut store, &id, EventKind::Success, None, None, day(0)).unwrap();
        record_checkin(&mut store, &id, EventKind::Success, None, None, day(1)).unwrap();

        let pledge = store.get_pledge(&id).unwrap();
        assert_eq!(pledge.status, PledgeStatus::Completed);
        assert_eq!(pledge.current_run.end_date, Some(day(1)));
        assert_eq!(pledge.current_run.number, 1);

        // A completed pledge takes no further check-ins.
        let err =
            record_checkin(&mut store, &id, EventKind::Success, None, None, day(2)).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn skips_do_not_advance_completion() {
        let (mut store, id) = store_with_pledge(2, true);

        record_checkin(&mut store, &id, EventKind::Skip, None, None, day(0)).unwrap();
        record_checkin(&mut store, &id, EventKind::Grace, None, None, day(1)).unwrap();

        let pledge = store.get_pledge(&id).unwrap();
        assert_eq!(pledge.current_run.completed_days, 0);
        assert_eq!(pledge.current_run.number, 1);
    }

    #[test]
    fn resume_after_gap_emits_return() {
        let (mut store, id) = store_with_pledge(30, true);

        record_checkin(&mut store, &id, EventKind::Success, None, None, day(0)).unwrap();
        record_checkin(&mut store, &id, EventKind::Success, None, None, day(1)).unwrap();

        // Five silent days, then the user comes back.
        let record = resume_pledge(&mut store, &id, Some("vacation".to_string()), day(6))
            .unwrap()
            .expect("gap should produce a return record");
        assert_eq!(record.gap_days, 5);
        assert_eq!(record.date, day(6));
        assert_eq!(record.reason.as_deref(), Some("vacation"));

        let pledge = store.get_pledge(&id).unwrap();
        assert_eq!(pledge.current_run.number, 2);
        assert_eq!(pledge.current_run.start_date, day(6));
        assert_eq!(pledge.return_history.len(), 1);
        assert_eq!(store.list_returns().len(), 1);
        assert_eq!(store.user().activity, ActivityState::Returning);
        assert_eq!(store.user().return_count, 1);
    }

    #[test]
    fn resume_paused_pledge_reactivates() {
        let (mut store, id) = store_with_pledge(30, true);
        record_checkin(&mut store, &id, EventKind::Success, None, None, day(0)).unwrap();
        store
            .get_pledge_mut(&id)
            .unwrap()
            .transition_to(PledgeStatus::Paused)
            .unwrap();

        resume_pledge(&mut store, &id, None, day(1)).unwrap();
        assert_eq!(store.get_pledge(&id).unwrap().status, PledgeStatus::Active);
    }

    #[test]
    fn resume_without_gap_or_history_is_a_no_op() {
        let (mut store, id) = store_with_pledge(30, true);
        let record = resume_pledge(&mut store, &id, None, day(0)).unwrap();
        assert!(record.is_none());
        assert_eq!(store.get_pledge(&id).unwrap().current_run.number, 1);
    }

    #[test]
    fn resume_completed_pledge_is_rejected() {
        let (mut store, id) = store_with_pledge(1, false);
        record_checkin(&mut store, &id, EventKind::Success, None, None, day(0)).unwrap();

        let err = resume_pledge(&mut store, &id, None, day(5)).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::InactivePledge { .. })
        ));
    }
}
