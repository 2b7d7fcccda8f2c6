//! Policy persistence.
//!
//! Saving stamps bookkeeping fields: a missing id is derived, `version`
//! increments when an existing record is replaced and `updatedAt` is set.
//! Versioning is optimistic; the last write wins. Recording a run through
//! [`PolicyStore::update_schedule`] is not an edit and leaves both alone.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use lifecycle_policy::id::derive_id;
use lifecycle_policy::{instantiate, PolicySchedule, StorageLifecyclePolicy};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use syncops_validator::validate_storage_policy;
use tracing::{debug, info};

/// Storage for lifecycle policies.
pub trait PolicyStore: Send + Sync {
    /// Lists every stored policy, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn list(&self) -> Result<Vec<StorageLifecyclePolicy>>;

    /// Fetches one policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn get(&self, id: &str) -> Result<Option<StorageLifecyclePolicy>>;

    /// Inserts or replaces a policy and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPolicy`] for an active policy that fails
    /// validation, or an error if the backing storage cannot be written.
    fn save(&self, policy: StorageLifecyclePolicy) -> Result<StorageLifecyclePolicy>;

    /// Replaces the schedule of a stored policy, leaving `version` and
    /// `updatedAt` untouched. Returns false if the policy does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read or written.
    fn update_schedule(&self, id: &str, schedule: PolicySchedule) -> Result<bool>;

    /// Removes a policy. Returns false if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn delete(&self, id: &str) -> Result<bool>;

    /// Lists the active policies.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn list_active(&self) -> Result<Vec<StorageLifecyclePolicy>> {
        Ok(self.list()?.into_iter().filter(|p| p.is_active).collect())
    }

    /// Instantiates a library template for an organization and saves it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Policy`] for an unknown template id, or any error
    /// [`PolicyStore::save`] returns.
    fn install_template(
        &self,
        template_id: &str,
        organization_id: &str,
        now: DateTime<Utc>,
    ) -> Result<StorageLifecyclePolicy> {
        let policy = instantiate(template_id, organization_id, now)?;
        self.save(policy)
    }
}

/// Derives an id for a policy that has none, so the existing record can be
/// looked up before saving.
fn assign_id(mut policy: StorageLifecyclePolicy, now: DateTime<Utc>) -> StorageLifecyclePolicy {
    if policy.id.is_empty() {
        policy.id = derive_id("pol", &[&policy.organization_id, &policy.name], now);
    }
    policy
}

/// Applies the bookkeeping every store performs on save.
fn prepare(
    mut policy: StorageLifecyclePolicy,
    existing: Option<&StorageLifecyclePolicy>,
    now: DateTime<Utc>,
) -> Result<StorageLifecyclePolicy> {
    if policy.is_active {
        let report = validate_storage_policy(&policy);
        if !report.valid {
            return Err(Error::InvalidPolicy {
                name: policy.name,
                errors: report.errors,
            });
        }
    }

    if let Some(previous) = existing {
        policy.version = previous.version.saturating_add(1);
        policy.created_at = previous.created_at.or(policy.created_at);
    } else {
        policy.version = policy.version.max(1);
        policy.created_at = policy.created_at.or(Some(now));
    }
    policy.updated_at = Some(now);
    Ok(policy)
}

/// Policy store held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryPolicyStore {
    policies: RwLock<BTreeMap<String, StorageLifecyclePolicy>>,
}

impl InMemoryPolicyStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn save_at(
        &self,
        policy: StorageLifecyclePolicy,
        now: DateTime<Utc>,
    ) -> Result<StorageLifecyclePolicy> {
        let policy = assign_id(policy, now);
        let mut policies = self.policies.write().unwrap_or_else(PoisonError::into_inner);
        let existing = policies.get(&policy.id);
        let stored = prepare(policy, existing, now)?;
        policies.insert(stored.id.clone(), stored.clone());
        debug!(id = %stored.id, version = stored.version, "saved policy");
        Ok(stored)
    }
}

impl PolicyStore for InMemoryPolicyStore {
    fn list(&self) -> Result<Vec<StorageLifecyclePolicy>> {
        let policies = self.policies.read().unwrap_or_else(PoisonError::into_inner);
        Ok(policies.values().cloned().collect())
    }

    fn get(&self, id: &str) -> Result<Option<StorageLifecyclePolicy>> {
        let policies = self.policies.read().unwrap_or_else(PoisonError::into_inner);
        Ok(policies.get(id).cloned())
    }

    fn save(&self, policy: StorageLifecyclePolicy) -> Result<StorageLifecyclePolicy> {
        self.save_at(policy, Utc::now())
    }

    fn update_schedule(&self, id: &str, schedule: PolicySchedule) -> Result<bool> {
        let mut policies = self.policies.write().unwrap_or_else(PoisonError::into_inner);
        let Some(policy) = policies.get_mut(id) else {
            return Ok(false);
        };
        policy.schedule = schedule;
        Ok(true)
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let mut policies = self.policies.write().unwrap_or_else(PoisonError::into_inner);
        Ok(policies.remove(id).is_some())
    }
}

/// Policy store keeping one YAML file per policy in a directory.
#[derive(Debug, Clone)]
pub struct DirectoryPolicyStore {
    root: PathBuf,
}

impl DirectoryPolicyStore {
    /// Opens a store rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        info!(path = %root.display(), "opened policy directory");
        Ok(Self { root })
    }

    /// Directory the store writes to.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &str) -> Result<PathBuf> {
        let usable = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !id.starts_with('.');
        if usable {
            Ok(self.root.join(format!("{id}.yaml")))
        } else {
            Err(Error::InvalidId(id.to_string()))
        }
    }

    fn read(path: &Path) -> Result<StorageLifecyclePolicy> {
        let content = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }
}

impl PolicyStore for DirectoryPolicyStore {
    fn list(&self) -> Result<Vec<StorageLifecyclePolicy>> {
        let mut paths: Vec<PathBuf> = fs::read_dir(&self.root)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "yaml"))
            .collect();
        paths.sort();
        paths.iter().map(|path| Self::read(path)).collect()
    }

    fn get(&self, id: &str) -> Result<Option<StorageLifecyclePolicy>> {
        let path = self.path_for(id)?;
        if path.exists() {
            Self::read(&path).map(Some)
        } else {
            Ok(None)
        }
    }

    fn save(&self, policy: StorageLifecyclePolicy) -> Result<StorageLifecyclePolicy> {
        let now = Utc::now();
        let policy = assign_id(policy, now);
        let existing = self.get(&policy.id)?;
        let stored = prepare(policy, existing.as_ref(), now)?;
        let path = self.path_for(&stored.id)?;
        fs::write(&path, serde_yaml::to_string(&stored)?)?;
        debug!(path = %path.display(), version = stored.version, "saved policy");
        Ok(stored)
    }

    fn update_schedule(&self, id: &str, schedule: PolicySchedule) -> Result<bool> {
        let path = self.path_for(id)?;
        if !path.exists() {
            return Ok(false);
        }
        let mut policy = Self::read(&path)?;
        policy.schedule = schedule;
        fs::write(&path, serde_yaml::to_string(&policy)?)?;
        debug!(path = %path.display(), "recorded policy run");
        Ok(true)
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let path = self.path_for(id)?;
        if path.exists() {
            fs::remove_file(&path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
