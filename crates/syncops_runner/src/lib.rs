//! Policy storage, asset inventories and execution runs for SyncOps.
//!
//! This crate wires the pure evaluator to the outside world:
//!
//! - [`PolicyStore`] persists policies, in memory or as a directory of YAML
//!   files.
//! - [`Inventory`] loads asset records from JSON or CSV, and
//!   [`FixtureGenerator`] synthesizes realistic ones.
//! - [`StorageBackend`] carries out actions; [`SimulatedBackend`] tracks
//!   tiers, locks and deletions in memory.
//! - [`Runner`] evaluates inventories in parallel and produces
//!   [`PolicyExecutionLog`](lifecycle_policy::PolicyExecutionLog)s for
//!   manual and scheduled runs.
//!
//! # Example
//!
//! ```rust
//! use lifecycle_policy::instantiate;
//! use syncops_runner::{media_library, Runner, SimulatedBackend};
//!
//! let policy = instantiate("archive-idle-media", "org-1", chrono::Utc::now()).unwrap();
//! let inventory = media_library(42, 50);
//! let mut backend = SimulatedBackend::new();
//!
//! let log = Runner::default().run_policy(&policy, inventory.assets(), &mut backend);
//! assert_eq!(log.assets_evaluated, 50);
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod backend;
pub mod error;
pub mod fixtures;
pub mod inventory;
pub mod runner;
pub mod store;

pub use backend::{ActionOutcome, BackendError, SimulatedBackend, StorageBackend};
pub use error::{Error, Result};
pub use fixtures::{media_library, FixtureConfig, FixtureGenerator};
pub use inventory::Inventory;
pub use runner::{decide, summarize, Decision, DecisionSummary, Runner, RunnerConfig};
pub use store::{DirectoryPolicyStore, InMemoryPolicyStore, PolicyStore};
