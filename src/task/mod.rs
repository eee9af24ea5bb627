//! # Allocated Tasks
//!
//! The local runtime handle for one executing persistent task instance and
//! its status state machine.
//!
//! ## Overview
//!
//! An [`AllocatedTask`] is created by the coordinator when the ledger
//! assigns a persistent task to the local node and no local instance exists
//! yet. It is destroyed when the task body reports a terminal outcome and
//! the local registry entry is cleared - clearing is triggered by the
//! terminal call, never by ledger state alone. Cancellation is cooperative:
//! the coordinator flips a flag, the task body observes it and finishes.

pub mod allocated;
pub mod states;

pub use allocated::AllocatedTask;
pub use states::{TaskState, TaskStatus};
