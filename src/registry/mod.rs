//! # Executor Registry
//!
//! Maps a task-type name to the executor responsible for creating and
//! running that type's task instances, and to the concurrency lane it runs
//! on.
//!
//! ## Overview
//!
//! The registry is populated once at startup from static configuration and
//! is read-only thereafter, so lookups take no locks. A task type appearing
//! in the ledger with no registered executor is a configuration mismatch
//! surfaced to operators; the coordinator skips the task and keeps going.

pub mod executor_registry;

pub use executor_registry::{ExecutorRegistry, TaskContext, TaskExecutor};
