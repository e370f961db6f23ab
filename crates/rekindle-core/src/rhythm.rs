//! User-level rhythm status derived from recent ledger state.
//!
//! A pure, idempotent read: two calls without intervening writes yield
//! identical output. Nothing here is ever persisted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::repair::{advisory_state, AdvisoryState};
use crate::run::EventKind;
use crate::store::Store;
use crate::user::ActivityState;

/// Trailing window for the weekly completed count, in days.
pub const WEEKLY_WINDOW_DAYS: i64 = 7;

/// Continuity signal for the user as a whole.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RhythmState {
    /// Checking in, nothing slipped
    Flowing,
    /// At least one pledge is slipped
    Unstable,
    /// No rhythm yet, or finding it again after silence
    Finding,
}

impl fmt::Display for RhythmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RhythmState::Flowing => write!(f, "flowing"),
            RhythmState::Unstable => write!(f, "unstable"),
            RhythmState::Finding => write!(f, "finding"),
        }
    }
}

/// Derived continuity summary. Recomputed on read, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RhythmStatus {
    /// Overall state
    pub state: RhythmState,
    /// Human-readable summary; not load-bearing for logic
    pub message: String,
    /// Success events across all pledges in the trailing week
    pub weekly_completed_count: u32,
    /// Most recent check-in of any kind, if any
    pub last_check_in: Option<NaiveDate>,
}

/// Compute the rhythm status for the store's user as of `today`.
///
/// Precedence: a slipped pledge makes the user unstable regardless of
/// volume; "finding" covers both never-checked-in users and users whose
/// trailing week is empty.
pub fn compute_rhythm_status(store: &Store, today: NaiveDate) -> RhythmStatus {
    let mut weekly_completed_count = 0u32;
    let mut last_check_in: Option<NaiveDate> = None;
    let mut any_events = false;
    let mut any_slipped = false;

    for pledge in store.list_pledges() {
        let repairs = store.repairs_for(&pledge.id);
        if advisory_state(pledge, &repairs) == AdvisoryState::Slipped {
            any_slipped = true;
        }
        for event in &pledge.current_run.events {
            any_events = true;
            if last_check_in.map_or(true, |d| event.date > d) {
                last_check_in = Some(event.date);
            }
            let age = (today - event.date).num_days();
            if event.kind == EventKind::Success && (0..WEEKLY_WINDOW_DAYS).contains(&age) {
                weekly_completed_count += 1;
            }
        }
    }

    let state = if !any_events || store.user().activity == ActivityState::New {
        RhythmState::Finding
    } else if any_slipped {
        RhythmState::Unstable
    } else if weekly_completed_count >= 1 {
        RhythmState::Flowing
    } else {
        // Events exist but the trailing week is silent.
        RhythmState::Finding
    };

    let message = match state {
        RhythmState::Flowing => format!(
            "You're in rhythm: {weekly_completed_count} completed this week. Keep going."
        ),
        RhythmState::Unstable => {
            "Something slipped recently. A small repair gets you back on track.".to_string()
        }
        RhythmState::Finding => "You're finding your rhythm. Start with one check-in.".to_string(),
    };

    RhythmStatus {
        state,
        message,
        weekly_completed_count,
        last_check_in,
    }
}
