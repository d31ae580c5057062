use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const BUNDLED_DATASET: &str = include_str!("../../assets/fire_points.geojson");

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to read dataset {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Dataset is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The fire detection feature collection shipped with the crate
pub fn default_dataset() -> Result<Value, DatasetError> {
    Ok(serde_json::from_str(BUNDLED_DATASET)?)
}

/// Read a GeoJSON feature collection from disk.
///
/// Only JSON syntax is checked here; the collection's shape is validated when aggregating.
pub fn load_dataset(path: &Path) -> Result<Value, DatasetError> {
    let json = fs::read_to_string(path).map_err(|source| DatasetError::Read {
        path: path.to_owned(),
        source,
    })?;
    log::debug!("Loaded dataset {} ({} bytes)", path.display(), json.len());
    Ok(serde_json::from_str(&json)?)
}
