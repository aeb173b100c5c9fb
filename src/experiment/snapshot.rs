//! Persisted experiment snapshots.
//!
//! A snapshot is the JSON form of an [`ExperimentSet`]: for every problem
//! (in registration order) its name, the problem itself, its manual
//! reference and the trial results of every algorithm. Floats are written
//! in round-trip form, so statistics recomputed from a reloaded snapshot
//! are identical to the ones computed before saving.

use super::record::ExperimentSet;
use super::sink::StorageSink;
use crate::error::Result;
use crate::problem::Problem;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Serializes `set` to JSON bytes.
pub fn to_json<P>(set: &ExperimentSet<P>) -> Result<Vec<u8>>
where
    P: Problem + Serialize,
    P::Solution: Serialize,
{
    Ok(serde_json::to_vec(set)?)
}

/// Deserializes an experiment set from JSON bytes.
pub fn from_json<P>(bytes: &[u8]) -> Result<ExperimentSet<P>>
where
    P: Problem + DeserializeOwned,
    P::Solution: DeserializeOwned,
{
    Ok(serde_json::from_slice(bytes)?)
}

/// Saves `set` to `path` through `sink`.
pub fn save<P>(set: &ExperimentSet<P>, path: &Path, sink: &dyn StorageSink) -> Result<()>
where
    P: Problem + Serialize,
    P::Solution: Serialize,
{
    let bytes = to_json(set)?;
    sink.write(path, &bytes)?;
    info!(path = %path.display(), problems = set.len(), "saved experiment snapshot");
    Ok(())
}

/// Loads an experiment set previously written by [`save`].
pub fn load<P>(path: &Path, sink: &dyn StorageSink) -> Result<ExperimentSet<P>>
where
    P: Problem + DeserializeOwned,
    P::Solution: DeserializeOwned,
{
    let bytes = sink.read(path)?;
    let set = from_json(&bytes)?;
    info!(path = %path.display(), "loaded experiment snapshot");
    Ok(set)
}
