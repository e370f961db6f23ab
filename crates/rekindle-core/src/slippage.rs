//! Slippage detection over the recent check-in window.
//!
//! Pure functions of ledger state, recomputed on every read. The window
//! is taken in ledger order, not date order: if events were ever
//! backfilled out of chronological order, insertion order governs.

use crate::pledge::Pledge;
use crate::run::EventKind;

/// How many recent events the detector examines.
pub const SLIP_WINDOW: usize = 3;

/// Whether the pledge's recent events indicate disruption.
///
/// True when at least one of the last [`SLIP_WINDOW`] events of the
/// current run is a skip. With fewer events, the window is whatever
/// exists.
pub fn is_slipped(pledge: &Pledge) -> bool {
    let events = &pledge.current_run.events;
    let start = events.len().saturating_sub(SLIP_WINDOW);
    events[start..].iter().any(|e| e.kind == EventKind::Skip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pledge::Frequency;
    use crate::run::CheckinEvent;
    use chrono::NaiveDate;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 1).unwrap() + chrono::Days::new(n as u64)
    }

    fn pledge_with(kinds: &[EventKind]) -> Pledge {
        let mut pledge = Pledge::new("Walk", "walk 20 min", Frequency::Daily, 30, day(0));
        for (i, kind) in kinds.iter().enumerate() {
            let run_id = pledge.current_run.id.clone();
            pledge
                .current_run
                .append(CheckinEvent::new(run_id, day(i as u32), *kind, None, None));
        }
        pledge
    }

    #[test]
    fn empty_run_is_not_slipped() {
        assert!(!is_slipped(&pledge_with(&[])));
    }

    #[test]
    fn single_skip_is_slipped() {
        assert!(is_slipped(&pledge_with(&[EventKind::Skip])));
    }

    #[test]
    fn grace_and_unknown_do_not_slip() {
        assert!(!is_slipped(&pledge_with(&[
            EventKind::Grace,
            EventKind::Unknown,
            EventKind::Success,
        ])));
    }

    #[test]
    fn skip_outside_window_is_forgotten() {
        assert!(!is_slipped(&pledge_with(&[
            EventKind::Skip,
            EventKind::Success,
            EventKind::Success,
            EventKind::Success,
        ])));
    }

    #[test]
    fn window_slides_over_the_ledger() {
        use EventKind::{Skip, Success};

        // success, success, skip -> slipped (1 skip in last 3)
        assert!(is_slipped(&pledge_with(&[Success, Success, Skip])));
        // window [success, skip, success] -> still slipped
        assert!(is_slipped(&pledge_with(&[Success, Success, Skip, Success])));
        // window [skip, success, success] -> still slipped
        assert!(is_slipped(&pledge_with(&[
            Success, Success, Skip, Success, Success,
        ])));
        // window [success, success, success] -> recovered
        assert!(!is_slipped(&pledge_with(&[
            Success, Success, Skip, Success, Success, Success,
        ])));
    }
}
