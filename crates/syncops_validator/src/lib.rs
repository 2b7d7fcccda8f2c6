//! Policy validation and reporting for SyncOps.
//!
//! The validator is the gate in front of activation: a policy that fails
//! [`validate_storage_policy`] is never saved as active, and a policy set
//! with critical [`lint_policy_set`] findings is never scheduled.
//!
//! # Checks Performed
//!
//! - **Structure**: name, conditions, actions, priority, schedule
//! - **Legal-hold precedence**: legal-hold locks come before everything else
//! - **Priority collisions**: active policies sharing a priority
//! - **Reachability**: policies hidden behind a catch-all
//!
//! # Example
//!
//! ```rust
//! use lifecycle_policy::{PolicyActionConfig, PolicyType, StorageLifecyclePolicy, ActionType};
//! use syncops_validator::validate_storage_policy;
//!
//! let policy = StorageLifecyclePolicy::new("Lock everything", PolicyType::LegalHold)
//!     .unconditional()
//!     .with_action(PolicyActionConfig::simple(ActionType::Lock));
//! assert!(validate_storage_policy(&policy).valid);
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod report;
pub mod result;
pub mod set;
pub mod validate;

pub use report::explain_policy_set;
pub use result::{PolicySetReport, Severity, ValidationReport, Violation, Warning};
pub use set::lint_policy_set;
pub use validate::validate_storage_policy;
