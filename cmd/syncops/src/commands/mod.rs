//! Command implementations and shared policy loading.

pub mod cost;
pub mod evaluate;
pub mod explain;
pub mod init;
pub mod run;
pub mod schema;
pub mod templates;
pub mod validate;

use anyhow::{Context, Result};
use lifecycle_policy::{
    parse_policies_json, parse_policies_yaml, to_yaml, PolicyExecutionLog, StorageLifecyclePolicy,
};
use std::fs;
use std::path::{Path, PathBuf};
use syncops_runner::{DirectoryPolicyStore, PolicyStore};
use tracing::info;

/// Where a policy set is read from and written back to.
pub enum PolicySource {
    /// A single YAML or JSON document.
    File(PathBuf),
    /// A directory with one YAML file per policy.
    Directory(DirectoryPolicyStore),
}

impl PolicySource {
    /// Opens a policy file or directory.
    pub fn open(path: &str) -> Result<Self> {
        let path = Path::new(path);
        if path.is_dir() {
            let store = DirectoryPolicyStore::open(path)
                .with_context(|| format!("Failed to open policy directory: {}", path.display()))?;
            Ok(Self::Directory(store))
        } else {
            Ok(Self::File(path.to_path_buf()))
        }
    }

    /// Loads every policy.
    pub fn load(&self) -> Result<Vec<StorageLifecyclePolicy>> {
        let policies = match self {
            Self::File(path) => {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read policy file: {}", path.display()))?;
                let parsed = if is_json(path) {
                    parse_policies_json(&content)
                } else {
                    parse_policies_yaml(&content)
                };
                parsed
                    .with_context(|| format!("Failed to parse policy file: {}", path.display()))?
            }
            Self::Directory(store) => store.list().with_context(|| {
                format!("Failed to read policy directory: {}", store.root().display())
            })?,
        };
        info!("Loaded {} policies", policies.len());
        Ok(policies)
    }

    /// Persists the schedules of the policies that ran.
    ///
    /// A policy file is rewritten whole. A directory only updates the
    /// schedule of each policy with a log, without counting it as an edit.
    pub fn record_runs(
        &self,
        policies: &[StorageLifecyclePolicy],
        logs: &[PolicyExecutionLog],
    ) -> Result<()> {
        match self {
            Self::File(path) => {
                let content = if is_json(path) {
                    serde_json::to_string_pretty(policies)?
                } else {
                    to_yaml(policies)?
                };
                fs::write(path, content)
                    .with_context(|| format!("Failed to write policy file: {}", path.display()))?;
            }
            Self::Directory(store) => {
                for log in logs {
                    let Some(policy) = policies.iter().find(|p| p.id == log.policy_id) else {
                        continue;
                    };
                    store.update_schedule(&policy.id, policy.schedule).with_context(|| {
                        format!("Failed to record run of policy: {}", policy.name)
                    })?;
                }
            }
        }
        Ok(())
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Loads a policy set from a file or directory.
pub fn load_policies(path: &str) -> Result<Vec<StorageLifecyclePolicy>> {
    PolicySource::open(path)?.load()
}
