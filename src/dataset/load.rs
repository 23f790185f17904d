use std::path::Path;

use anyhow::Context as _;

use crate::{
    dataset::model::{Dataset, DatasetDef},
    foundation::error::{RaceError, RaceResult},
};

/// Parse and validate a dataset from JSON text.
pub fn parse_dataset(json: &str) -> RaceResult<Dataset> {
    let def: DatasetDef = serde_json::from_str(json)
        .map_err(|e| RaceError::serde(format!("parse dataset JSON: {e}")))?;
    Dataset::from_def(def)
}

/// Read, parse and validate a dataset file.
#[tracing::instrument]
pub fn load_dataset(path: &Path) -> RaceResult<Dataset> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read dataset '{}'", path.display()))?;
    let dataset = parse_dataset(&text)?;
    tracing::info!(
        participants = dataset.participants().len(),
        rounds = dataset.round_count(),
        max_scale = dataset.max_scale(),
        "dataset loaded"
    );
    Ok(dataset)
}

#[cfg(test)]
#[path = "../../tests/unit/dataset/load.rs"]
mod tests;
