//! Runs and their append-only check-in event log.
//!
//! A run is one continuous attempt at a pledge. Its event vec is the
//! ledger: insertion order is chronological order, and `completed_days`
//! is maintained as the count of success events so the two can never
//! drift apart.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ValidationError;

/// Outcome of a single day's check-in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// The pledged action happened
    Success,
    /// The user consciously skipped the day
    Skip,
    /// A pre-agreed exception (travel, illness)
    Grace,
    /// The day passed without a clear outcome
    Unknown,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Success => write!(f, "success"),
            EventKind::Skip => write!(f, "skip"),
            EventKind::Grace => write!(f, "grace"),
            EventKind::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for EventKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(EventKind::Success),
            "skip" => Ok(EventKind::Skip),
            "grace" => Ok(EventKind::Grace),
            "unknown" => Ok(EventKind::Unknown),
            other => Err(ValidationError::InvalidValue {
                field: "kind".to_string(),
                message: format!("'{other}' is not one of success/skip/grace/unknown"),
            }),
        }
    }
}

/// One day's check-in outcome within a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckinEvent {
    /// Unique identifier
    pub id: String,
    /// Owning run
    pub run_id: String,
    /// Calendar day this event accounts for
    pub date: NaiveDate,
    /// Outcome kind
    pub kind: EventKind,
    /// Optional short reason (mostly for skip/grace)
    pub reason: Option<String>,
    /// Optional free-form note
    pub note: Option<String>,
}

impl CheckinEvent {
    /// Create an event for `run_id` on `date`.
    pub fn new(
        run_id: impl Into<String>,
        date: NaiveDate,
        kind: EventKind,
        reason: Option<String>,
        note: Option<String>,
    ) -> Self {
        CheckinEvent {
            id: Uuid::new_v4().to_string(),
            run_id: run_id.into(),
            date,
            kind,
            reason,
            note,
        }
    }
}

/// One continuous attempt at a pledge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    /// Unique identifier
    pub id: String,
    /// Owning pledge
    pub pledge_id: String,
    /// 1-based attempt number, monotonically increasing per pledge
    pub number: u32,
    /// First day of the attempt
    pub start_date: NaiveDate,
    /// Set only when the run is superseded or the pledge completes
    pub end_date: Option<NaiveDate>,
    /// How many success days complete this run
    pub target_days: u32,
    /// Count of success events; maintained by [`Run::append`]
    pub completed_days: u32,
    /// Ordered ledger of check-in events (insertion order = chronological)
    pub events: Vec<CheckinEvent>,
}

impl Run {
    /// Open a new run starting on `start_date`.
    pub fn new(
        pledge_id: impl Into<String>,
        number: u32,
        target_days: u32,
        start_date: NaiveDate,
    ) -> Self {
        Run {
            id: Uuid::new_v4().to_string(),
            pledge_id: pledge_id.into(),
            number,
            start_date,
            end_date: None,
            target_days,
            completed_days: 0,
            events: Vec::new(),
        }
    }

    /// Whether this run is still open.
    pub fn is_open(&self) -> bool {
        self.end_date.is_none()
    }

    /// The event recorded for `date`, if any.
    pub fn event_on(&self, date: NaiveDate) -> Option<&CheckinEvent> {
        self.events.iter().find(|e| e.date == date)
    }

    /// The date of the most recent event in ledger order.
    pub fn last_event_date(&self) -> Option<NaiveDate> {
        self.events.last().map(|e| e.date)
    }

    /// Append an event to the ledger, keeping `completed_days` in sync.
    ///
    /// Callers must have checked the one-event-per-day invariant first;
    /// this method only does the accounting.
    pub fn append(&mut self, event: CheckinEvent) {
        if event.kind == EventKind::Success {
            self.completed_days += 1;
        }
        self.events.push(event);
    }

    /// Whether the run has reached its target.
    pub fn is_complete(&self) -> bool {
        self.completed_days >= self.target_days
    }

    /// Close the run on `date`.
    pub fn close(&mut self, date: NaiveDate) {
        self.end_date = Some(date);
    }
}
