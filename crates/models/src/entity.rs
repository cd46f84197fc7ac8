//! Entity identity types shared by the alarm model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of platform entity an alarm can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Tenant,
    Customer,
    Device,
    Asset,
    Alarm,
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Tenant => "TENANT",
            Self::Customer => "CUSTOMER",
            Self::Device => "DEVICE",
            Self::Asset => "ASSET",
            Self::Alarm => "ALARM",
        };
        f.write_str(s)
    }
}

/// Reference to a platform entity: its kind plus its identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityId {
    #[serde(rename = "entityType")]
    pub entity_type: EntityType,
    pub id: String,
}

impl EntityId {
    pub fn new(entity_type: EntityType, id: impl Into<String>) -> Self {
        Self {
            entity_type,
            id: id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_type_display_matches_wire_tag() {
        for entity_type in [
            EntityType::Tenant,
            EntityType::Customer,
            EntityType::Device,
            EntityType::Asset,
            EntityType::Alarm,
        ] {
            let wire = serde_json::to_string(&entity_type).unwrap();
            assert_eq!(wire, format!("\"{entity_type}\""));
        }
    }

    #[test]
    fn test_entity_id_serde_shape() {
        let id = EntityId::new(EntityType::Device, "765f0f20");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#"{"entityType":"DEVICE","id":"765f0f20"}"#);
    }
}
