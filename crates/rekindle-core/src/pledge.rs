//! Pledges: standing personal commitments and their lifecycle.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::run::Run;

/// How often the pledged action is meant to happen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    /// Every day
    Daily,
    /// Monday through Friday
    Weekdays,
    /// A target number of days per week (1..=7)
    TimesPerWeek(u8),
}

impl Default for Frequency {
    fn default() -> Self {
        Frequency::Daily
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Daily => write!(f, "daily"),
            Frequency::Weekdays => write!(f, "weekdays"),
            Frequency::TimesPerWeek(n) => write!(f, "{n}/week"),
        }
    }
}

impl FromStr for Frequency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Frequency::Daily),
            "weekdays" => Ok(Frequency::Weekdays),
            other => {
                let n = other
                    .strip_suffix("/week")
                    .and_then(|n| n.parse::<u8>().ok())
                    .filter(|n| (1..=7).contains(n));
                match n {
                    Some(n) => Ok(Frequency::TimesPerWeek(n)),
                    None => Err(ValidationError::InvalidFrequency(other.to_string())),
                }
            }
        }
    }
}

/// Pledge lifecycle state.
///
/// Valid transitions:
/// - ACTIVE → PAUSED (pause)
/// - ACTIVE → COMPLETED (final run reaches its target)
/// - PAUSED → ACTIVE (resume)
/// - COMPLETED is terminal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PledgeStatus {
    /// Being worked on; exactly one open run exists
    Active,
    /// Temporarily set aside
    Paused,
    /// Target reached on a non-recurring pledge (terminal)
    Completed,
}

impl PledgeStatus {
    /// Check if a transition is valid.
    pub fn can_transition_to(&self, to: &PledgeStatus) -> bool {
        match self {
            PledgeStatus::Active => matches!(to, PledgeStatus::Paused | PledgeStatus::Completed),
            PledgeStatus::Paused => matches!(to, PledgeStatus::Active),
            PledgeStatus::Completed => false,
        }
    }
}

impl fmt::Display for PledgeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PledgeStatus::Active => write!(f, "active"),
            PledgeStatus::Paused => write!(f, "paused"),
            PledgeStatus::Completed => write!(f, "completed"),
        }
    }
}

impl Default for PledgeStatus {
    fn default() -> Self {
        PledgeStatus::Active
    }
}

/// Record of resuming a pledge after a gap between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Return {
    /// Unique identifier
    pub id: String,
    /// Owning pledge (back-reference)
    pub pledge_id: String,
    /// Day the new run started
    pub date: NaiveDate,
    /// Days between the prior run's end and the new run's start (>= 1)
    pub gap_days: u32,
    /// Optional reason for the gap
    pub reason: Option<String>,
}

impl Return {
    /// Create a return record for `pledge_id`.
    pub fn new(
        pledge_id: impl Into<String>,
        date: NaiveDate,
        gap_days: u32,
        reason: Option<String>,
    ) -> Self {
        Return {
            id: Uuid::new_v4().to_string(),
            pledge_id: pledge_id.into(),
            date,
            gap_days,
            reason,
        }
    }
}

/// A standing behavioral commitment.
///
/// The pledge exclusively owns its current run (and through it the event
/// ledger) and its return history. Past runs are summarized by the run
/// number; only the current run's ledger is kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pledge {
    /// Unique identifier
    pub id: String,
    /// Short title ("Evening walk")
    pub title: String,
    /// The concrete action pledged ("walk 20 minutes after dinner")
    pub action: String,
    /// Intended cadence
    pub frequency: Frequency,
    /// Names of people this pledge is shared with (empty = private)
    pub share_with: Vec<String>,
    /// Lifecycle status
    pub status: PledgeStatus,
    /// Whether a completed run rolls over into a new one
    pub recurring: bool,
    /// The single open attempt while status is active
    pub current_run: Run,
    /// Returns recorded against this pledge, oldest first
    pub return_history: Vec<Return>,
}

impl Pledge {
    /// Create an active pledge with run number 1 starting on `start_date`.
    pub fn new(
        title: impl Into<String>,
        action: impl Into<String>,
        frequency: Frequency,
        target_days: u32,
        start_date: NaiveDate,
    ) -> Self {
        let id = Uuid::new_v4().to_string();
        let current_run = Run::new(&id, 1, target_days, start_date);
        Pledge {
            id,
            title: title.into(),
            action: action.into(),
            frequency,
            share_with: Vec::new(),
            status: PledgeStatus::Active,
            recurring: true,
            current_run,
            return_history: Vec::new(),
        }
    }

    /// Transition to a new status.
    ///
    /// Returns an error if the transition is invalid.
    pub fn transition_to(&mut self, status: PledgeStatus) -> Result<(), ValidationError> {
        if !self.status.can_transition_to(&status) {
            return Err(ValidationError::InvalidValue {
                field: "status".to_string(),
                message: format!("cannot go from {} to {}", self.status, status),
            });
        }
        self.status = status;
        Ok(())
    }

    /// Close the current run and open the next one starting on `start_date`.
    ///
    /// Returns a mutable reference to the freshly opened run.
    pub fn roll_over(&mut self, end_date: NaiveDate, start_date: NaiveDate) -> &mut Run {
        self.current_run.close(end_date);
        let next = Run::new(
            &self.id,
            self.current_run.number + 1,
            self.current_run.target_days,
            start_date,
        );
        self.current_run = next;
        &mut self.current_run
    }
}
