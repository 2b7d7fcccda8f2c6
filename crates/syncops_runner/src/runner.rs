//! Policy evaluation and execution runs.
//!
//! Evaluation is CPU-bound and side-effect free, so it fans out across
//! blocking tasks. Applying actions goes through a single
//! [`StorageBackend`] in input order.

use crate::backend::{ActionOutcome, StorageBackend};
use crate::error::Result;
use chrono::{DateTime, Utc};
use lifecycle_policy::id::derive_id;
use lifecycle_policy::{
    ActionType, AssetContext, ExecutionStatus, PolicyActionConfig, PolicyExecutionLog,
    StorageLifecyclePolicy, StorageTier,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Instant;
use syncops_evaluator::{calculate_storage_cost_savings, evaluate_policy, resolve_policy};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Runner settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Number of parallel evaluation tasks.
    pub concurrency: usize,
    /// Evaluate and report without touching the backend.
    pub dry_run: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            concurrency: std::thread::available_parallelism().map_or(4, NonZeroUsize::get),
            dry_run: false,
        }
    }
}

impl RunnerConfig {
    /// Sets the evaluation concurrency. Zero is treated as one.
    #[must_use]
    pub const fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Enables or disables dry-run mode.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// The outcome of resolving one asset against a policy set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    /// Asset id.
    pub asset_id: String,
    /// Winning policy id, if any policy matched.
    pub policy_id: Option<String>,
    /// Winning policy name, if any policy matched.
    pub policy_name: Option<String>,
    /// Actions to apply, empty when nothing matched.
    pub actions: Vec<PolicyActionConfig>,
    /// Projected monthly USD savings of the actions.
    pub estimated_savings: f64,
    /// Position of the winning policy in the evaluated slice.
    #[serde(skip)]
    policy_index: Option<usize>,
}

impl Decision {
    /// Returns true if a policy matched the asset.
    #[must_use]
    pub const fn matched(&self) -> bool {
        self.policy_index.is_some()
    }
}

/// Resolves one asset against a policy set.
#[must_use]
pub fn decide(asset: &AssetContext, policies: &[StorageLifecyclePolicy]) -> Decision {
    match resolve_policy(asset, policies) {
        Some(winner) => Decision {
            asset_id: asset.id.clone(),
            policy_id: Some(winner.id.clone()),
            policy_name: Some(winner.name.clone()),
            actions: winner.actions.clone(),
            estimated_savings: projected_savings(asset, &winner.actions),
            policy_index: policies.iter().position(|p| std::ptr::eq(p, winner)),
        },
        None => Decision {
            asset_id: asset.id.clone(),
            policy_id: None,
            policy_name: None,
            actions: Vec::new(),
            estimated_savings: 0.0,
            policy_index: None,
        },
    }
}

/// Aggregate view of a batch of decisions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionSummary {
    /// Assets evaluated.
    pub assets: usize,
    /// Assets some policy matched.
    pub matched: usize,
    /// Matched assets per winning policy name.
    pub by_policy: BTreeMap<String, usize>,
    /// Sum of projected monthly savings.
    pub estimated_savings: f64,
}

/// Summarizes decisions per winning policy.
#[must_use]
pub fn summarize(decisions: &[Decision]) -> DecisionSummary {
    let mut summary = DecisionSummary {
        assets: decisions.len(),
        ..DecisionSummary::default()
    };
    for decision in decisions {
        if let Some(name) = &decision.policy_name {
            summary.matched += 1;
            *summary.by_policy.entry(name.clone()).or_insert(0) += 1;
        }
        summary.estimated_savings += decision.estimated_savings;
    }
    summary
}

/// Executes lifecycle policies against asset inventories.
#[derive(Debug, Clone, Default)]
pub struct Runner {
    config: RunnerConfig,
}

impl Runner {
    /// Creates a runner.
    #[must_use]
    pub const fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Runner settings.
    #[must_use]
    pub const fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Resolves every asset against the policy set.
    ///
    /// Decisions are returned in the same order as `assets`.
    ///
    /// # Errors
    ///
    /// Returns an error if an evaluation task panics or is cancelled.
    pub async fn evaluate(
        &self,
        assets: &[AssetContext],
        policies: &[StorageLifecyclePolicy],
    ) -> Result<Vec<Decision>> {
        if assets.is_empty() {
            return Ok(Vec::new());
        }

        let policies: Arc<[StorageLifecyclePolicy]> = policies.into();
        let chunk_size = assets.len().div_ceil(self.config.concurrency.max(1));

        let mut tasks = JoinSet::new();
        for (index, chunk) in assets.chunks(chunk_size).enumerate() {
            let chunk = chunk.to_vec();
            let policies = Arc::clone(&policies);
            tasks.spawn_blocking(move || {
                let decisions: Vec<Decision> =
                    chunk.iter().map(|asset| decide(asset, &policies)).collect();
                (index, decisions)
            });
        }

        let mut chunks = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            chunks.push(joined?);
        }
        chunks.sort_by_key(|(index, _)| *index);

        let decisions: Vec<Decision> = chunks.into_iter().flat_map(|(_, d)| d).collect();
        debug!(
            assets = decisions.len(),
            matched = decisions.iter().filter(|d| d.matched()).count(),
            chunk_size,
            "evaluated assets"
        );
        Ok(decisions)
    }

    /// Runs one policy now against every asset it matches.
    ///
    /// Failures on individual assets are recorded in the log and never stop
    /// the run.
    pub fn run_policy<B>(
        &self,
        policy: &StorageLifecyclePolicy,
        assets: &[AssetContext],
        backend: &mut B,
    ) -> PolicyExecutionLog
    where
        B: StorageBackend + ?Sized,
    {
        let targets: Vec<&AssetContext> = assets
            .iter()
            .filter(|asset| evaluate_policy(policy, asset))
            .collect();
        self.execute(policy, &targets, assets.len(), backend, Utc::now())
    }

    /// Runs every active policy whose schedule is due at `now`.
    ///
    /// Each asset is handled by the first policy that matches it across the
    /// whole set; a due policy only acts on the assets it wins. Schedules of
    /// the policies that ran are advanced.
    ///
    /// # Errors
    ///
    /// Returns an error if evaluation fails.
    pub async fn run_scheduled<B>(
        &self,
        policies: &mut [StorageLifecyclePolicy],
        assets: &[AssetContext],
        backend: &mut B,
        now: DateTime<Utc>,
    ) -> Result<Vec<PolicyExecutionLog>>
    where
        B: StorageBackend + ?Sized,
    {
        let due: Vec<usize> = policies
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_active && p.schedule.is_due(now))
            .map(|(i, _)| i)
            .collect();
        if due.is_empty() {
            debug!(%now, "no policies due");
            return Ok(Vec::new());
        }

        let decisions = self.evaluate(assets, policies).await?;

        let mut logs = Vec::with_capacity(due.len());
        for index in due {
            let targets: Vec<&AssetContext> = assets
                .iter()
                .zip(&decisions)
                .filter(|(_, decision)| decision.policy_index == Some(index))
                .map(|(asset, _)| asset)
                .collect();
            let policy = &mut policies[index];
            logs.push(self.execute(policy, &targets, assets.len(), backend, now));
            policy.schedule.advance(now);
        }
        Ok(logs)
    }

    fn execute<B>(
        &self,
        policy: &StorageLifecyclePolicy,
        targets: &[&AssetContext],
        evaluated: usize,
        backend: &mut B,
        now: DateTime<Utc>,
    ) -> PolicyExecutionLog
    where
        B: StorageBackend + ?Sized,
    {
        let started = Instant::now();
        let mut errors = Vec::new();
        let mut transitioned = 0;
        let mut savings = 0.0;

        for asset in targets {
            if self.config.dry_run {
                savings += projected_savings(asset, &policy.actions);
                transitioned += 1;
                continue;
            }
            match apply_actions(asset, &policy.actions, backend) {
                Ok(achieved) => {
                    savings += achieved;
                    transitioned += 1;
                }
                Err(message) => {
                    warn!(policy = %policy.name, asset = %asset.id, %message, "action failed");
                    errors.push(message);
                }
            }
        }

        let status = ExecutionStatus::from_outcome(evaluated, transitioned, errors.len());
        let log = PolicyExecutionLog {
            id: derive_id("log", &[&policy.id, &policy.name], now),
            policy_id: policy.id.clone(),
            policy_name: policy.name.clone(),
            organization_id: policy.organization_id.clone(),
            executed_at: now,
            status,
            assets_evaluated: evaluated,
            assets_transitioned: transitioned,
            errors,
            cost_savings_achieved: savings,
            execution_time_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        };
        info!(
            policy = %log.policy_name,
            %status,
            evaluated,
            transitioned,
            errors = log.errors.len(),
            savings = log.cost_savings_achieved,
            dry_run = self.config.dry_run,
            "policy run complete"
        );
        log
    }
}

/// Applies actions in order, stopping at the first failure.
fn apply_actions<B>(
    asset: &AssetContext,
    actions: &[PolicyActionConfig],
    backend: &mut B,
) -> std::result::Result<f64, String>
where
    B: StorageBackend + ?Sized,
{
    let mut achieved = 0.0;
    for action in actions {
        let outcome = backend
            .apply(asset, action)
            .map_err(|err| format!("{}: {err}", asset.id))?;
        if let ActionOutcome::Moved { from: Some(from), to } = outcome {
            achieved += action_savings(action, from, to, asset);
        }
    }
    Ok(achieved)
}

/// Savings the actions would achieve, following the asset's tier through
/// each move.
fn projected_savings(asset: &AssetContext, actions: &[PolicyActionConfig]) -> f64 {
    let mut tier = asset.current_tier();
    let mut total = 0.0;
    for action in actions {
        let Some(to) = action.destination_tier() else {
            continue;
        };
        if let Some(from) = tier {
            total += action_savings(action, from, to, asset);
        }
        tier = Some(to);
    }
    total
}

fn action_savings(
    action: &PolicyActionConfig,
    from: StorageTier,
    to: StorageTier,
    asset: &AssetContext,
) -> f64 {
    let counted = matches!(action.action_type, ActionType::Transition | ActionType::Archive);
    match asset.file_size() {
        Some(bytes) if counted => calculate_storage_cost_savings(from, to, bytes),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::SimulatedBackend;
    use chrono::{Duration, TimeZone};
    use lifecycle_policy::{
        ConditionField, Operator, PolicyCondition, PolicySchedule, PolicyType, RunFrequency,
    };

    fn legal_hold() -> StorageLifecyclePolicy {
        StorageLifecyclePolicy::new("Legal hold", PolicyType::LegalHold)
            .with_id("pol-hold")
            .with_priority(1)
            .with_condition(PolicyCondition::new(
                ConditionField::IsLegalHold,
                Operator::Equals,
                true,
            ))
            .with_action(PolicyActionConfig::simple(ActionType::Lock))
            .activate()
    }

    fn archive_idle() -> StorageLifecyclePolicy {
        StorageLifecyclePolicy::new("Archive idle", PolicyType::AccessBased)
            .with_id("pol-archive")
            .with_organization("org-1")
            .with_priority(100)
            .with_condition(PolicyCondition::new(
                ConditionField::DaysSinceLastAccess,
                Operator::GreaterThan,
                90_i64,
            ))
            .with_action(PolicyActionConfig::transition(StorageTier::Cold))
            .activate()
    }

    fn asset(id: &str, idle_days: i64, legal_hold: bool) -> AssetContext {
        AssetContext::new(id)
            .with(ConditionField::DaysSinceLastAccess, idle_days)
            .with(ConditionField::IsLegalHold, legal_hold)
            .with(ConditionField::CurrentStorageTier, "HOT")
            .with(ConditionField::FileSize, 1_000_000_000_i64)
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn evaluate_preserves_order_across_chunks() {
        let runner = Runner::new(RunnerConfig::default().with_concurrency(3));
        let assets: Vec<AssetContext> = (0..10)
            .map(|i| asset(&format!("a{i}"), i * 30, i == 7))
            .collect();
        let policies = [archive_idle(), legal_hold()];

        let decisions = runner.evaluate(&assets, &policies).await.unwrap();
        let ids: Vec<&str> = decisions.iter().map(|d| d.asset_id.as_str()).collect();
        assert_eq!(ids, ["a0", "a1", "a2", "a3", "a4", "a5", "a6", "a7", "a8", "a9"]);

        assert!(!decisions[3].matched());
        assert_eq!(decisions[4].policy_name.as_deref(), Some("Archive idle"));
        assert_eq!(decisions[7].policy_name.as_deref(), Some("Legal hold"));
        assert!((decisions[4].estimated_savings - 0.019).abs() < 1e-9);
        assert!(decisions[7].estimated_savings.abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn evaluate_matches_sequential_resolution() {
        let assets: Vec<AssetContext> = (0..25)
            .map(|i| asset(&format!("a{i}"), i * 7, i % 5 == 0))
            .collect();
        let policies = [archive_idle(), legal_hold()];
        let sequential: Vec<Decision> = assets.iter().map(|a| decide(a, &policies)).collect();

        for concurrency in [0, 1, 4, 64] {
            let runner = Runner::new(RunnerConfig::default().with_concurrency(concurrency));
            let parallel = runner.evaluate(&assets, &policies).await.unwrap();
            assert_eq!(parallel, sequential);
        }
    }

    #[tokio::test]
    async fn evaluate_empty_inventory() {
        let runner = Runner::default();
        assert!(runner.evaluate(&[], &[archive_idle()]).await.unwrap().is_empty());
    }

    #[test]
    fn run_now_moves_matching_assets() {
        let runner = Runner::default();
        let mut backend = SimulatedBackend::new();
        let assets = [asset("old", 200, false), asset("fresh", 5, false)];

        let log = runner.run_policy(&archive_idle(), &assets, &mut backend);
        assert_eq!(log.status, ExecutionStatus::Success);
        assert_eq!(log.assets_evaluated, 2);
        assert_eq!(log.assets_transitioned, 1);
        assert!(log.id.starts_with("log_"));
        assert_eq!(log.organization_id, "org-1");
        assert!((log.cost_savings_achieved - 0.019).abs() < 1e-9);
        assert_eq!(backend.tier_of("old"), Some(StorageTier::Cold));
        assert_eq!(backend.tier_of("fresh"), None);
    }

    #[test]
    fn busy_asset_makes_run_partial() {
        let runner = Runner::default();
        let mut backend = SimulatedBackend::new().with_busy(["b"]);
        let assets = [asset("a", 200, false), asset("b", 200, false), asset("c", 1, false)];

        let log = runner.run_policy(&archive_idle(), &assets, &mut backend);
        assert_eq!(log.status, ExecutionStatus::Partial);
        assert_eq!(log.assets_transitioned, 1);
        assert_eq!(log.errors, vec!["b: asset b is locked by active session"]);
    }

    #[test]
    fn every_failure_makes_run_failed() {
        let runner = Runner::default();
        let mut backend = SimulatedBackend::new().with_busy(["a"]);
        let log = runner.run_policy(&archive_idle(), &[asset("a", 200, false)], &mut backend);
        assert_eq!(log.status, ExecutionStatus::Failed);
        assert!(log.cost_savings_achieved.abs() < f64::EPSILON);
    }

    #[test]
    fn dry_run_leaves_backend_untouched() {
        let runner = Runner::new(RunnerConfig::default().with_dry_run(true));
        let mut backend = SimulatedBackend::new().with_busy(["a"]);
        let log = runner.run_policy(&archive_idle(), &[asset("a", 200, false)], &mut backend);
        assert_eq!(log.status, ExecutionStatus::Success);
        assert_eq!(log.assets_transitioned, 1);
        assert!((log.cost_savings_achieved - 0.019).abs() < 1e-9);
        assert_eq!(backend.tier_of("a"), None);
    }

    #[test]
    fn inactive_policy_runs_on_nothing() {
        let runner = Runner::default();
        let mut policy = archive_idle();
        policy.is_active = false;
        let log = runner.run_policy(&policy, &[asset("a", 200, false)], &mut SimulatedBackend::new());
        assert_eq!(log.assets_transitioned, 0);
        assert_eq!(log.status, ExecutionStatus::Success);
    }

    #[tokio::test]
    async fn scheduled_run_respects_first_match_and_advances() {
        let runner = Runner::default();
        let mut backend = SimulatedBackend::new();
        let mut policies = vec![archive_idle(), legal_hold()];
        let assets = [asset("held", 400, true), asset("idle", 400, false)];
        let now = noon();

        let logs = runner
            .run_scheduled(&mut policies, &assets, &mut backend, now)
            .await
            .unwrap();
        assert_eq!(logs.len(), 2);

        let archive_log = logs.iter().find(|l| l.policy_id == "pol-archive").unwrap();
        assert_eq!(archive_log.assets_transitioned, 1);
        assert_eq!(archive_log.status, ExecutionStatus::Success);
        let hold_log = logs.iter().find(|l| l.policy_id == "pol-hold").unwrap();
        assert_eq!(hold_log.assets_transitioned, 1);

        assert_eq!(backend.tier_of("held"), Some(StorageTier::Hot));
        assert!(backend.is_locked("held"));
        assert_eq!(backend.tier_of("idle"), Some(StorageTier::Cold));

        for policy in &policies {
            assert_eq!(policy.schedule.last_run_at, Some(now));
            assert_eq!(policy.schedule.next_run_at, Some(now + Duration::days(1)));
        }
    }

    #[tokio::test]
    async fn only_due_policies_run() {
        let runner = Runner::default();
        let now = noon();
        let mut later = archive_idle().with_schedule(PolicySchedule::new(RunFrequency::Weekly));
        later.schedule.next_run_at = Some(now + Duration::hours(1));
        let mut policies = vec![later, legal_hold()];

        let logs = runner
            .run_scheduled(&mut policies, &[asset("idle", 400, false)], &mut SimulatedBackend::new(), now)
            .await
            .unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].policy_id, "pol-hold");
        assert_eq!(logs[0].assets_transitioned, 0);
        assert_eq!(policies[0].schedule.last_run_at, None);
    }

    #[tokio::test]
    async fn recording_runs_keeps_versions_of_idle_policies() {
        use crate::store::{InMemoryPolicyStore, PolicyStore};

        let store = InMemoryPolicyStore::new();
        let mut later = archive_idle().with_schedule(PolicySchedule::new(RunFrequency::Weekly));
        later.schedule.next_run_at = Some(noon() + Duration::hours(1));
        store.save(later).unwrap();
        store.save(legal_hold()).unwrap();
        let before = store.list().unwrap();

        let mut policies = store.list().unwrap();
        let logs = Runner::default()
            .run_scheduled(&mut policies, &[asset("idle", 400, false)], &mut SimulatedBackend::new(), noon())
            .await
            .unwrap();
        for log in &logs {
            let ran = policies.iter().find(|p| p.id == log.policy_id).unwrap();
            store.update_schedule(&ran.id, ran.schedule).unwrap();
        }

        let after = store.list().unwrap();
        for (old, new) in before.iter().zip(&after) {
            assert_eq!(old.version, new.version);
            assert_eq!(old.updated_at, new.updated_at);
        }
        let idle = store.get("pol-archive").unwrap().unwrap();
        assert_eq!(idle.schedule, before.iter().find(|p| p.id == "pol-archive").unwrap().schedule);
        let ran = store.get("pol-hold").unwrap().unwrap();
        assert_eq!(ran.schedule.last_run_at, Some(noon()));
    }

    #[tokio::test]
    async fn nothing_due_runs_nothing() {
        let runner = Runner::default();
        let mut inactive = archive_idle();
        inactive.is_active = false;
        let logs = runner
            .run_scheduled(&mut [inactive], &[asset("a", 400, false)], &mut SimulatedBackend::new(), noon())
            .await
            .unwrap();
        assert!(logs.is_empty());
    }

    #[test]
    fn restore_is_not_counted_as_savings() {
        let restore = [PolicyActionConfig::simple(ActionType::Restore)];
        let cold = AssetContext::new("c")
            .with(ConditionField::CurrentStorageTier, "COLD")
            .with(ConditionField::FileSize, 1_000_000_000_i64);
        assert!(projected_savings(&cold, &restore).abs() < f64::EPSILON);

        let chain = [
            PolicyActionConfig::transition(StorageTier::Warm),
            PolicyActionConfig::simple(ActionType::Archive),
        ];
        let hot = cold.clone().with(ConditionField::CurrentStorageTier, "HOT");
        let expected = StorageTier::Hot.cost_per_gb() - StorageTier::Glacier.cost_per_gb();
        assert!((projected_savings(&hot, &chain) - expected).abs() < 1e-12);
    }

    #[test]
    fn summary_counts_per_policy() {
        let policies = [archive_idle(), legal_hold()];
        let decisions: Vec<Decision> = [asset("a", 400, false), asset("b", 400, true), asset("c", 1, false)]
            .iter()
            .map(|a| decide(a, &policies))
            .collect();
        let summary = summarize(&decisions);
        assert_eq!(summary.assets, 3);
        assert_eq!(summary.matched, 2);
        assert_eq!(summary.by_policy.get("Archive idle"), Some(&1));
        assert_eq!(summary.by_policy.get("Legal hold"), Some(&1));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn run_accounts_for_every_target(
                fleet in prop::collection::vec((0i64..400, any::<bool>()), 0..40)
            ) {
                let assets: Vec<AssetContext> = fleet
                    .iter()
                    .enumerate()
                    .map(|(i, (days, hold))| asset(&format!("a{i}"), *days, *hold))
                    .collect();
                let moved = fleet.iter().filter(|(d, h)| *d > 90 && !*h).count();
                let held = fleet.iter().filter(|(d, h)| *d > 90 && *h).count();

                let mut backend = SimulatedBackend::new();
                let log = Runner::default().run_policy(&archive_idle(), &assets, &mut backend);

                prop_assert_eq!(log.assets_evaluated, assets.len());
                prop_assert_eq!(log.assets_transitioned, moved);
                prop_assert_eq!(log.errors.len(), held);
                for (a, (_, hold)) in assets.iter().zip(&fleet) {
                    if *hold {
                        prop_assert_ne!(backend.tier_of(&a.id), Some(StorageTier::Cold));
                    }
                }
            }
        }
    }
}
