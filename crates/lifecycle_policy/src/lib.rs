//! Storage lifecycle policy model for SyncOps.
//!
//! This crate provides:
//! - Typed policies, conditions and actions with their wire (camelCase) shape
//! - Asset context records consumed by the evaluator
//! - Execution log records and the run status rule
//! - A canned template library
//! - YAML/JSON loading and serialisation
//!
//! # Example
//!
//! ```rust
//! use lifecycle_policy::parse_policies_yaml;
//!
//! let input = r#"
//! - id: archive-idle
//!   organizationId: org-1
//!   name: Archive idle media
//!   type: ACCESS_BASED
//!   isActive: true
//!   priority: 100
//!   conditions:
//!     - field: daysSinceLastAccess
//!       operator: greaterThan
//!       value: 90
//!   actions:
//!     - type: TRANSITION
//!       targetTier: COLD
//! "#;
//!
//! let policies = parse_policies_yaml(input).unwrap();
//! assert_eq!(policies[0].name, "Archive idle media");
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod asset;
pub mod error;
pub mod execution;
pub mod id;
pub mod io;
pub mod model;
pub mod schedule;
pub mod templates;
pub mod tier;
pub mod value;

pub use asset::AssetContext;
pub use error::{Error, Result};
pub use execution::{ExecutionStatus, PolicyExecutionLog};
pub use io::{parse_policies_json, parse_policies_yaml, to_yaml};
pub use model::{
    ActionType, ConditionField, Operator, PolicyActionConfig, PolicyCondition, PolicyScope,
    PolicyType, StorageLifecyclePolicy, ValueKind,
};
pub use schedule::{PolicySchedule, RunFrequency};
pub use templates::{instantiate, templates, PolicyTemplate};
pub use tier::StorageTier;
pub use value::Value;
