//! Storage backends that carry out policy actions.

use lifecycle_policy::{ActionType, AssetContext, PolicyActionConfig, StorageTier};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::{debug, trace};

/// What a backend did for one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Data moved between tiers.
    Moved {
        /// Tier before the move, if known.
        from: Option<StorageTier>,
        /// Tier after the move.
        to: StorageTier,
    },
    /// The asset was already in the requested state.
    Unchanged,
    /// The asset is now locked against change.
    Locked,
    /// The asset was deleted.
    Deleted,
    /// The listed roles were notified.
    Notified {
        /// Notified roles.
        roles: Vec<String>,
    },
}

/// Why a backend refused an action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// Another session holds the asset.
    #[error("asset {0} is locked by active session")]
    Busy(String),

    /// The asset no longer exists.
    #[error("asset {0} has been deleted")]
    Deleted(String),

    /// The asset is locked and cannot be moved or deleted.
    #[error("asset {0} is under legal hold")]
    LegalHold(String),

    /// The action cannot be carried out.
    #[error("unsupported action {action} for asset {asset}")]
    Unsupported {
        /// Asset id.
        asset: String,
        /// Action name.
        action: String,
    },
}

/// Applies policy actions to stored assets.
pub trait StorageBackend: Send {
    /// Carries out one action for one asset.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the asset cannot be changed.
    fn apply(
        &mut self,
        asset: &AssetContext,
        action: &PolicyActionConfig,
    ) -> Result<ActionOutcome, BackendError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct AssetState {
    tier: Option<StorageTier>,
    locked: bool,
    deleted: bool,
}

impl AssetState {
    fn from_asset(asset: &AssetContext) -> Self {
        Self {
            tier: asset.current_tier(),
            locked: asset.is_legal_hold(),
            deleted: false,
        }
    }
}

/// In-memory backend used for dry runs, demos and tests.
///
/// State for an asset is seeded from its context the first time the asset
/// is touched, then tracked across actions.
#[derive(Debug, Clone, Default)]
pub struct SimulatedBackend {
    states: BTreeMap<String, AssetState>,
    busy: BTreeSet<String>,
    notifications: Vec<(String, Vec<String>)>,
}

impl SimulatedBackend {
    /// Creates a backend with no tracked assets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks assets as held open by an editing session.
    #[must_use]
    pub fn with_busy<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.busy.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Current tier of a tracked asset.
    #[must_use]
    pub fn tier_of(&self, id: &str) -> Option<StorageTier> {
        self.states.get(id).and_then(|s| s.tier)
    }

    /// Returns true if a tracked asset is locked.
    #[must_use]
    pub fn is_locked(&self, id: &str) -> bool {
        self.states.get(id).is_some_and(|s| s.locked)
    }

    /// Returns true if a tracked asset was deleted.
    #[must_use]
    pub fn is_deleted(&self, id: &str) -> bool {
        self.states.get(id).is_some_and(|s| s.deleted)
    }

    /// Notifications sent so far, as `(asset id, roles)`.
    #[must_use]
    pub fn notifications(&self) -> &[(String, Vec<String>)] {
        &self.notifications
    }
}

impl StorageBackend for SimulatedBackend {
    fn apply(
        &mut self,
        asset: &AssetContext,
        action: &PolicyActionConfig,
    ) -> Result<ActionOutcome, BackendError> {
        if self.busy.contains(&asset.id) {
            return Err(BackendError::Busy(asset.id.clone()));
        }
        let state = self
            .states
            .entry(asset.id.clone())
            .or_insert_with(|| AssetState::from_asset(asset));
        if state.deleted {
            return Err(BackendError::Deleted(asset.id.clone()));
        }

        let outcome = match action.action_type {
            ActionType::Lock => {
                state.locked = true;
                ActionOutcome::Locked
            }
            ActionType::Notify => {
                self.notifications
                    .push((asset.id.clone(), action.notify_roles.clone()));
                ActionOutcome::Notified {
                    roles: action.notify_roles.clone(),
                }
            }
            ActionType::Delete => {
                if state.locked {
                    return Err(BackendError::LegalHold(asset.id.clone()));
                }
                state.deleted = true;
                ActionOutcome::Deleted
            }
            ActionType::Transition | ActionType::Archive | ActionType::Restore => {
                let to = action
                    .destination_tier()
                    .ok_or_else(|| unsupported(asset, action))?;
                if state.tier == Some(to) {
                    ActionOutcome::Unchanged
                } else if state.locked {
                    return Err(BackendError::LegalHold(asset.id.clone()));
                } else {
                    let from = state.tier.replace(to);
                    ActionOutcome::Moved { from, to }
                }
            }
            ActionType::Unknown => return Err(unsupported(asset, action)),
        };

        trace!(asset = %asset.id, action = %action, ?outcome, "applied action");
        if let ActionOutcome::Moved { from, to } = &outcome {
            debug!(asset = %asset.id, ?from, %to, "moved asset");
        }
        Ok(outcome)
    }
}

fn unsupported(asset: &AssetContext, action: &PolicyActionConfig) -> BackendError {
    BackendError::Unsupported {
        asset: asset.id.clone(),
        action: action.to_string(),
    }
}
