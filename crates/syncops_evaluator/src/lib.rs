//! Storage lifecycle policy evaluator for SyncOps.
//!
//! This crate is **pure and synchronous**:
//! - No I/O
//! - No shared mutable state
//! - Every function is total: malformed input degrades to "does not match"
//!
//! Policies form an ordered rule list. For a given asset the policies are
//! sorted by ascending priority (stable, so ties keep list order) and the
//! first one that matches wins; later matches are ignored. This lets a
//! priority-1 legal-hold lock pre-empt a broader archival policy.
//!
//! # Example
//!
//! ```rust
//! use lifecycle_policy::{
//!     ActionType, AssetContext, ConditionField, Operator, PolicyActionConfig,
//!     PolicyCondition, PolicyType, StorageLifecyclePolicy, StorageTier,
//! };
//! use syncops_evaluator::evaluate_asset_against_policy_set;
//!
//! let hold = StorageLifecyclePolicy::new("hold", PolicyType::LegalHold)
//!     .with_priority(1)
//!     .with_condition(PolicyCondition::new(ConditionField::IsLegalHold, Operator::Equals, true))
//!     .with_action(PolicyActionConfig::simple(ActionType::Lock))
//!     .activate();
//! let archive = StorageLifecyclePolicy::new("archive", PolicyType::AccessBased)
//!     .with_priority(100)
//!     .with_condition(PolicyCondition::new(
//!         ConditionField::DaysSinceLastAccess,
//!         Operator::GreaterThan,
//!         90_i64,
//!     ))
//!     .with_action(PolicyActionConfig::transition(StorageTier::Cold))
//!     .activate();
//!
//! let asset = AssetContext::new("clip-1")
//!     .with(ConditionField::IsLegalHold, true)
//!     .with(ConditionField::DaysSinceLastAccess, 120_i64);
//!
//! let policies = [archive, hold];
//! let actions = evaluate_asset_against_policy_set(&asset, &policies).unwrap();
//! assert_eq!(actions[0].action_type, ActionType::Lock);
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod condition;
pub mod cost;
pub mod error;
pub mod format;
pub mod policy;
pub mod trace;

pub use condition::evaluate_condition;
pub use cost::{calculate_storage_cost_savings, monthly_storage_cost, transition_savings};
pub use error::{Error, Result};
pub use format::{format_storage_currency, format_storage_file_size, parse_storage_currency};
pub use policy::{
    evaluate_asset_against_policy_set, evaluate_policy, in_scope, order_by_priority,
    resolve_first_match, resolve_policy,
};
pub use trace::{explain_asset, PolicyTrace, TraceOutcome};
