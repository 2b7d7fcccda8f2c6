//! Seeded synthetic asset inventories.
//!
//! The generator mirrors a post-production library: a few huge video and
//! raw camera files, many small images and documents, most projects long
//! finished and a handful of assets under legal hold.

#![allow(clippy::cast_precision_loss)]

use crate::inventory::Inventory;
use lifecycle_policy::{AssetContext, ConditionField, StorageTier};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

const MB: f64 = 1_000_000.0;
const GB: f64 = 1_000_000_000.0;

/// Configuration for fixture generation.
#[derive(Debug, Clone)]
pub struct FixtureConfig {
    /// Random seed for reproducibility.
    pub seed: u64,
    /// Number of assets to generate.
    pub asset_count: usize,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            asset_count: 200,
        }
    }
}

impl FixtureConfig {
    /// Creates a config with the given seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the asset count.
    #[must_use]
    pub const fn with_count(mut self, count: usize) -> Self {
        self.asset_count = count;
        self
    }
}

/// Asset type with its MIME type and size range in bytes.
struct Kind {
    asset_type: &'static str,
    mime_type: &'static str,
    min_bytes: f64,
    max_bytes: f64,
    weight: u32,
}

static KINDS: [Kind; 6] = [
    Kind { asset_type: "video", mime_type: "video/mp4", min_bytes: 500.0 * MB, max_bytes: 80.0 * GB, weight: 20 },
    Kind { asset_type: "raw", mime_type: "video/x-braw", min_bytes: 20.0 * GB, max_bytes: 400.0 * GB, weight: 8 },
    Kind { asset_type: "audio", mime_type: "audio/wav", min_bytes: 5.0 * MB, max_bytes: 2.0 * GB, weight: 15 },
    Kind { asset_type: "image", mime_type: "image/png", min_bytes: 0.2 * MB, max_bytes: 60.0 * MB, weight: 30 },
    Kind { asset_type: "document", mime_type: "application/pdf", min_bytes: 0.05 * MB, max_bytes: 20.0 * MB, weight: 20 },
    Kind { asset_type: "project", mime_type: "application/x-premiere", min_bytes: 1.0 * MB, max_bytes: 500.0 * MB, weight: 7 },
];

const PROJECT_STATUSES: [&str; 5] = ["ACTIVE", "IN_REVIEW", "ON_HOLD", "COMPLETED", "ARCHIVED"];
const APPROVAL_STATUSES: [&str; 3] = ["PENDING", "APPROVED", "REJECTED"];

/// Synthetic inventory generator.
pub struct FixtureGenerator {
    rng: ChaCha8Rng,
    config: FixtureConfig,
}

impl FixtureGenerator {
    /// Creates a new fixture generator.
    #[must_use]
    pub fn new(config: FixtureConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self { rng, config }
    }

    /// Generates a mixed media library.
    #[must_use]
    pub fn media_library(&mut self) -> Inventory {
        let assets = (0..self.config.asset_count)
            .map(|i| self.asset(i))
            .collect();
        Inventory::new(assets)
    }

    fn asset(&mut self, index: usize) -> AssetContext {
        let kind = self.kind();
        let bytes = self.rng.gen_range(kind.min_bytes..kind.max_bytes).round();

        let status = PROJECT_STATUSES[self.rng.gen_range(0..PROJECT_STATUSES.len())];
        let finished = matches!(status, "COMPLETED" | "ARCHIVED");

        let days_since_upload = self.rng.gen_range(0..1500_i64);
        let days_since_access = if finished {
            self.rng.gen_range(0..=days_since_upload)
        } else {
            self.rng.gen_range(0..=days_since_upload.min(30))
        };
        let access_count = if days_since_access > 180 {
            self.rng.gen_range(0..5_i64)
        } else {
            self.rng.gen_range(5..400_i64)
        };

        let tier = self.tier(days_since_access);
        let approval = APPROVAL_STATUSES[self.rng.gen_range(0..APPROVAL_STATUSES.len())];

        let mut asset = AssetContext::new(format!("asset-{index:05}"))
            .with_type(kind.asset_type)
            .with(ConditionField::MimeType, kind.mime_type)
            .with(ConditionField::FileSize, bytes)
            .with(ConditionField::CurrentStorageTier, tier.as_str())
            .with(ConditionField::DaysSinceUpload, days_since_upload)
            .with(ConditionField::DaysSinceLastAccess, days_since_access)
            .with(ConditionField::AccessCount, access_count)
            .with(ConditionField::DownloadCount, access_count / 4)
            .with(ConditionField::ProjectStatus, status)
            .with(ConditionField::ApprovalStatus, approval)
            .with(ConditionField::HasActiveRights, self.rng.gen_bool(0.25))
            .with(ConditionField::IsLegalHold, self.rng.gen_bool(0.02));

        if finished {
            let closed = self.rng.gen_range(0..=days_since_upload);
            asset.set(ConditionField::DaysSinceProjectClose, closed);
        }
        asset
    }

    fn kind(&mut self) -> &'static Kind {
        let total: u32 = KINDS.iter().map(|k| k.weight).sum();
        let mut roll = self.rng.gen_range(0..total);
        for kind in &KINDS {
            if roll < kind.weight {
                return kind;
            }
            roll -= kind.weight;
        }
        &KINDS[0]
    }

    fn tier(&mut self, days_since_access: i64) -> StorageTier {
        // Most libraries lag behind their access patterns.
        if self.rng.gen_bool(0.7) {
            return StorageTier::Hot;
        }
        match days_since_access {
            0..=30 => StorageTier::Hot,
            31..=180 => StorageTier::Warm,
            181..=720 => StorageTier::Cold,
            _ => StorageTier::Glacier,
        }
    }
}

/// Generates a media library inventory from a seed.
#[must_use]
pub fn media_library(seed: u64, count: usize) -> Inventory {
    FixtureGenerator::new(FixtureConfig::default().with_seed(seed).with_count(count)).media_library()
}
