//! User record and activity state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where the user currently is in their engagement lifecycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActivityState {
    /// Just onboarded, no check-ins yet
    New,
    /// Checking in regularly
    Active,
    /// Came back after a gap between runs
    Returning,
}

impl Default for ActivityState {
    fn default() -> Self {
        ActivityState::New
    }
}

/// The individual owning pledges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Activity state (new/active/returning)
    pub activity: ActivityState,
    /// How many times the user has returned after a gap
    pub return_count: u32,
    /// Timestamp of the last recorded check-in, if any
    pub last_active_at: Option<DateTime<Utc>>,
}

impl User {
    /// Create a new user in the `New` activity state.
    pub fn new(name: impl Into<String>) -> Self {
        User {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            activity: ActivityState::New,
            return_count: 0,
            last_active_at: None,
        }
    }

    /// Mark the user active. Called on every successful check-in.
    pub fn mark_active(&mut self, now: DateTime<Utc>) {
        if self.activity == ActivityState::New {
            self.activity = ActivityState::Active;
        }
        self.last_active_at = Some(now);
    }

    /// Record a return after a gap between runs.
    pub fn mark_returning(&mut self, now: DateTime<Utc>) {
        self.activity = ActivityState::Returning;
        self.return_count += 1;
        self.last_active_at = Some(now);
    }
}
