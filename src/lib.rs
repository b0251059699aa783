//! sqlrun: a registry of reusable SQL tasks and an auditable runner for
//! executing them against per-environment MySQL databases.
//!
//! Tasks and runs carry sequential human-readable identifiers
//! (`TSK-000001`, `RUN-000001`) allocated from shared counters. Every
//! execution is recorded as an append-only run with its status, captured
//! rows, timing and, when one can be derived exactly, a rollback script.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage and execution
//! - **Adapters**: Concrete implementations of ports (`PostgreSQL` metadata
//!   store, `MySQL` executor, in-memory doubles)
//!
//! # Modules
//!
//! - [`identifier`]: Sequential identifier allocation
//! - [`task`]: Task registration, updates and listing
//! - [`environment`]: Connection settings per database and environment
//! - [`run`]: Task execution, rollback derivation and run records
//! - [`config`]: Runner settings
//! - [`listing`]: Shared paging and search parameters
//! - [`postgres`]: Metadata database pool and migrations

pub mod config;
pub mod environment;
pub mod identifier;
pub mod listing;
pub mod postgres;
pub mod run;
pub mod task;
