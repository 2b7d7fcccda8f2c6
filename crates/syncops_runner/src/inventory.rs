//! Asset inventory loading from files.

use crate::error::{Error, Result};
use lifecycle_policy::{AssetContext, StorageTier, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

const ID_COLUMN: &str = "id";
const TYPE_COLUMN: &str = "assetType";

/// A set of assets to evaluate policies against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    assets: Vec<AssetContext>,
}

impl Inventory {
    /// Creates an inventory from assets.
    #[must_use]
    pub const fn new(assets: Vec<AssetContext>) -> Self {
        Self { assets }
    }

    /// Loads an inventory, choosing the format from the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownFormat`] for extensions other than `json`
    /// and `csv`, or any error from the format-specific loader.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Self::load_json(path),
            Some("csv") => Self::load_csv(path),
            _ => Err(Error::UnknownFormat(path.display().to_string())),
        }
    }

    /// Loads a JSON array of asset records.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON array of
    /// assets.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let assets: Vec<AssetContext> = serde_json::from_str(&content)?;
        info!(path = %path.display(), count = assets.len(), "loaded JSON inventory");
        Ok(Self::new(assets))
    }

    /// Loads a CSV file whose header row names the fields.
    ///
    /// The `id` column is required and `assetType` sets the scope type.
    /// Empty cells leave the field absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, has no `id` column, or a
    /// row has a blank id.
    pub fn load_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();
        if !headers.iter().any(|h| h.trim() == ID_COLUMN) {
            return Err(Error::parse("csv", "missing id column"));
        }

        let mut assets = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let mut asset = AssetContext::default();
            for (header, cell) in headers.iter().zip(record.iter()) {
                let (header, cell) = (header.trim(), cell.trim());
                if cell.is_empty() {
                    continue;
                }
                match header {
                    ID_COLUMN => asset.id = cell.to_string(),
                    TYPE_COLUMN => asset.asset_type = Some(cell.to_string()),
                    _ => {
                        asset
                            .attributes
                            .insert(header.to_string(), Value::from(cell));
                    }
                }
            }
            if asset.id.is_empty() {
                return Err(Error::parse("csv", format!("row {} has no id", row + 1)));
            }
            assets.push(asset);
        }

        info!(path = %path.display(), count = assets.len(), "loaded CSV inventory");
        Ok(Self::new(assets))
    }

    /// Writes the inventory as a pretty-printed JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, serde_json::to_string_pretty(&self.assets)?)?;
        debug!(path = %path.display(), count = self.assets.len(), "wrote inventory");
        Ok(())
    }

    /// Assets in load order.
    #[must_use]
    pub fn assets(&self) -> &[AssetContext] {
        &self.assets
    }

    /// Consumes the inventory, returning its assets.
    #[must_use]
    pub fn into_assets(self) -> Vec<AssetContext> {
        self.assets
    }

    /// Number of assets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Returns true if there are no assets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Bytes stored per tier. Assets with an unknown tier or size are skipped.
    #[must_use]
    pub fn bytes_by_tier(&self) -> BTreeMap<StorageTier, u64> {
        let mut totals = BTreeMap::new();
        for asset in &self.assets {
            if let (Some(tier), Some(bytes)) = (asset.current_tier(), asset.file_size()) {
                *totals.entry(tier).or_insert(0_u64) += bytes;
            }
        }
        totals
    }
}
