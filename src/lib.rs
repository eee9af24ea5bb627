#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Steward Core
//!
//! Node-side core for persistent task coordination.
//!
//! ## Overview
//!
//! A cluster runs long-lived ("persistent") tasks. A cluster-wide, versioned
//! **ledger** records which tasks exist and which node each one is assigned
//! to. This crate is the per-node reconciliation engine: on every ledger
//! update it diffs "tasks the ledger assigns to this node" against "tasks
//! actually running on this node" and starts, cancels, and tracks completion
//! accordingly.
//!
//! The loop is self-healing: delivery may skip intermediate snapshots under
//! load, and remote acknowledgments may be lost, because every pass acts on
//! the *current* snapshot versus the *current* local registry rather than on
//! a transition history.
//!
//! ## Architecture
//!
//! - **TaskCoordinator**: consumes [`LedgerChange`] events, computes the
//!   assignment diff, and drives the local task lifecycle
//! - **AllocatedTask**: the local runtime handle for one executing task
//!   instance, with cooperative cancellation and an exactly-once terminal
//!   transition
//! - **ExecutorRegistry**: immutable task-type to executor lookup, built once
//!   at startup
//! - **LaneDispatcher**: asynchronous, lane-bounded execution dispatch
//! - **ChannelNotifier**: fire-and-forget lifecycle notifications back to the
//!   ledger owner
//!
//! ## Module Organization
//!
//! - [`ledger`] - Immutable, versioned task ledger snapshots and diffing
//! - [`task`] - Allocated task handle and status state machine
//! - [`registry`] - Executor trait and registry
//! - [`coordinator`] - Reconciliation engine and local task registry
//! - [`dispatch`] - Execution dispatch on concurrency lanes
//! - [`notifier`] - Lifecycle notification boundary
//! - [`config`] - Runtime configuration
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use steward_core::bootstrap::CoordinatorRuntime;
//! use steward_core::config::StewardConfig;
//! use steward_core::ledger::{Assignment, LedgerChange, LedgerSnapshot};
//! use steward_core::registry::TaskExecutor;
//!
//! # fn executors() -> Vec<Arc<dyn TaskExecutor>> { Vec::new() }
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let runtime = CoordinatorRuntime::build(StewardConfig::from_env()?, executors())?;
//!
//! let previous = LedgerSnapshot::empty();
//! let current = previous.add_task(
//!     "task-1",
//!     "indexer",
//!     serde_json::json!({"shard": 3}),
//!     Assignment::to_node(runtime.node_id(), "node has capacity"),
//! )?;
//! runtime.on_ledger_changed(previous, current);
//! # Ok(())
//! # }
//! ```

pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod coordinator;
pub mod dispatch;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod notifier;
pub mod registry;
pub mod task;

pub use bootstrap::CoordinatorRuntime;
pub use config::StewardConfig;
pub use coordinator::{LocalTaskRegistry, TaskCoordinator};
pub use dispatch::{LaneDispatcher, TaskDispatcher};
pub use error::{CoordinationError, Result};
pub use ledger::{Assignment, LedgerChange, LedgerDiff, LedgerSnapshot, TaskRecord};
pub use notifier::{ChannelNotifier, LifecycleNotice, LifecycleNotifier, TaskOutcome};
pub use registry::{ExecutorRegistry, TaskContext, TaskExecutor};
pub use task::{AllocatedTask, TaskState, TaskStatus};
