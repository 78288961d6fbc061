//! Snapshot representation: a point-in-time field map of one entity.
//!
//! Snapshots are `BTreeMap<String, serde_json::Value>`. The diff engine
//! compares two snapshots of the same entity field by field; any serde
//! serializable record can be lowered into a snapshot.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::{TypeError, TypeResult};

/// A point-in-time record of one entity's field values.
pub type Snapshot = BTreeMap<String, Value>;

/// Lower a serializable record into a [`Snapshot`].
///
/// The record must serialize to a JSON object; anything else (arrays,
/// scalars) is a [`TypeError::Serialization`].
pub fn snapshot_of<T: Serialize>(record: &T) -> TypeResult<Snapshot> {
    match serde_json::to_value(record) {
        Ok(Value::Object(map)) => Ok(map.into_iter().collect()),
        Ok(other) => Err(TypeError::Serialization(format!(
            "expected a JSON object, got {other}"
        ))),
        Err(e) => Err(TypeError::Serialization(e.to_string())),
    }
}
