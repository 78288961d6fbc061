use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Unique identifier for a collection entity (UUID v7 for time-ordering).
///
/// Connections, emitters, folders, and items all share this identifier
/// space. Creation order is recoverable from the id itself, which keeps
/// freshly drafted records sorted without an extra sequence column.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(uuid::Uuid);

impl EntityId {
    /// Generate a new time-ordered entity ID (UUID v7).
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    /// Create from an existing UUID.
    pub fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Parse from the canonical hyphenated string form.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        uuid::Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| TypeError::InvalidId(e.to_string()))
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }

    /// Short representation (first 8 characters of the UUID).
    pub fn short_id(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.short_id())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<uuid::Uuid> for EntityId {
    fn from(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_unique() {
        let a = EntityId::new();
        let b = EntityId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn v7_ids_are_time_ordered() {
        let earlier = EntityId::new();
        let later = EntityId::new();
        assert!(earlier < later);
    }

    #[test]
    fn parse_roundtrip() {
        let id = EntityId::new();
        let parsed = EntityId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn parse_rejects_garbage() {
        let result = EntityId::parse("not-a-uuid");
        assert!(matches!(result, Err(TypeError::InvalidId(_))));
    }

    #[test]
    fn short_id_is_8_chars() {
        let id = EntityId::new();
        assert_eq!(id.short_id().len(), 8);
    }

    #[test]
    fn serde_roundtrip() {
        let id = EntityId::new();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = EntityId::new();
        let json = serde_json::to_value(&id).unwrap();
        assert!(json.is_string());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn any_uuid_roundtrips_through_text(bytes in any::<[u8; 16]>()) {
                let id = EntityId::from_uuid(uuid::Uuid::from_bytes(bytes));
                let parsed = EntityId::parse(&id.to_string()).unwrap();
                prop_assert_eq!(id, parsed);
            }
        }
    }
}
