//! # Reconciliation Engine
//!
//! The control loop of the coordination core.
//!
//! ## Overview
//!
//! On every ledger update the [`TaskCoordinator`] computes the diff between
//! "tasks the ledger assigns to this node" and "tasks currently running on
//! this node," then issues start and cancel actions. In steady state the set
//! of nodes with a live [`crate::task::AllocatedTask`] for a persistent task
//! id equals that id's ledger assignment; transient mismatches exist only
//! between a ledger change and the next reconciliation pass.
//!
//! ## Concurrency
//!
//! Reconciliation itself is sequential and non-reentrant: ledger updates are
//! serialized before they reach the coordinator. The local registry is the
//! shared resource - the coordinator inserts and marks `PENDING_CANCEL`,
//! executing task bodies remove on terminal transition - so it lives in a
//! sharded concurrent map rather than behind a global mutex.

pub mod local_tasks;
pub mod task_coordinator;

pub use local_tasks::LocalTaskRegistry;
pub use task_coordinator::TaskCoordinator;
