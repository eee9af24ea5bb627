//! # Task Ledger
//!
//! Immutable, versioned snapshots of all persistent tasks cluster-wide: id,
//! task type, typed parameters, and current node assignment.
//!
//! ## Overview
//!
//! The ledger is produced and distributed by the cluster-state layer; this
//! crate only consumes it. Snapshots are edited through pure operations
//! (add, reassign, remove) that never mutate a prior snapshot - each
//! transition yields a new snapshot with a bumped version. Task ids are
//! globally unique for the lifetime of a task and are never reused.

pub mod change;
pub mod snapshot;

pub use change::LedgerChange;
pub use snapshot::{Assignment, LedgerDiff, LedgerSnapshot, TaskRecord};
