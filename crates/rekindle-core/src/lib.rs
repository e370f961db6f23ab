//! # Rekindle Core Library
//!
//! This library provides the core domain logic for Rekindle, a personal
//! commitment ("pledge") tracker: the check-in ledger, slippage
//! detection, the repair workflow, and the derived rhythm status. It
//! implements a CLI-first philosophy where all operations are available
//! via a standalone CLI binary, with any GUI being a thin layer over the
//! same command/query surface.
//!
//! ## Architecture
//!
//! - **Entity Store**: canonical in-memory state (user, pledges with
//!   their current run and return history, repairs, memories)
//! - **Ledger**: append-only per-run event log with a one-event-per-day
//!   invariant and completed-day accounting
//! - **Slippage Detector**: pure predicate over the recent event window
//! - **Rhythm Aggregator**: user-level continuity signal derived on read
//! - **Repair Workflow**: validated path from slipped back to active
//! - **Storage**: SQLite snapshot persistence and TOML configuration
//!
//! ## Key Components
//!
//! - [`Tracker`]: the single-writer command/query facade
//! - [`Store`]: entity state container
//! - [`Database`]: snapshot persistence
//! - [`Config`]: application configuration

pub mod error;
pub mod journal;
pub mod ledger;
pub mod pledge;
pub mod repair;
pub mod rhythm;
pub mod run;
pub mod slippage;
pub mod storage;
pub mod store;
pub mod tracker;
pub mod user;

pub use error::{ConfigError, CoreError, DatabaseError, Result, ValidationError};
pub use journal::Memory;
pub use pledge::{Frequency, Pledge, PledgeStatus, Return};
pub use repair::{AdvisoryState, Repair};
pub use rhythm::{RhythmState, RhythmStatus};
pub use run::{CheckinEvent, EventKind, Run};
pub use slippage::{is_slipped, SLIP_WINDOW};
pub use storage::{Config, Database};
pub use store::Store;
pub use tracker::Tracker;
pub use user::{ActivityState, User};
