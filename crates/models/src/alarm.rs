//! Alarm entity model and query construction.
//!
//! Responsibilities:
//! - Define alarm severity, lifecycle status, and search-status enums with
//!   their wire tags.
//! - Define the alarm entity and the query type the alarm endpoints take.
//!
//! Does NOT handle:
//! - HTTP calls to the alarm endpoints.
//! - Display labels or severity colors (hosting UI concerns).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;
use crate::page::TimePageLink;

/// Alarm severity, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlarmSeverity {
    Critical,
    Major,
    Minor,
    Warning,
    Indeterminate,
}

impl fmt::Display for AlarmSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Critical => "CRITICAL",
            Self::Major => "MAJOR",
            Self::Minor => "MINOR",
            Self::Warning => "WARNING",
            Self::Indeterminate => "INDETERMINATE",
        };
        f.write_str(s)
    }
}

/// Combined active/cleared and acknowledged/unacknowledged lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlarmStatus {
    ActiveUnack,
    ActiveAck,
    ClearedUnack,
    ClearedAck,
}

impl fmt::Display for AlarmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ActiveUnack => "ACTIVE_UNACK",
            Self::ActiveAck => "ACTIVE_ACK",
            Self::ClearedUnack => "CLEARED_UNACK",
            Self::ClearedAck => "CLEARED_ACK",
        };
        f.write_str(s)
    }
}

/// Coarse status filter used when searching alarms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlarmSearchStatus {
    Any,
    Active,
    Cleared,
    Ack,
    Unack,
}

impl fmt::Display for AlarmSearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Any => "ANY",
            Self::Active => "ACTIVE",
            Self::Cleared => "CLEARED",
            Self::Ack => "ACK",
            Self::Unack => "UNACK",
        };
        f.write_str(s)
    }
}

/// An alarm raised against a platform entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alarm {
    /// Server-assigned identifier; absent before the alarm is persisted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Creation timestamp, epoch millis; server-assigned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_time: Option<i64>,
    pub tenant_id: EntityId,
    /// Alarm type, e.g. "High Temperature".
    #[serde(rename = "type")]
    pub alarm_type: String,
    /// The entity the alarm was raised against.
    pub originator: EntityId,
    pub severity: AlarmSeverity,
    pub status: AlarmStatus,
    /// First occurrence, epoch millis.
    pub start_ts: i64,
    /// Latest occurrence, epoch millis.
    pub end_ts: i64,
    /// Acknowledgement time, epoch millis; zero when unacknowledged.
    pub ack_ts: i64,
    /// Clear time, epoch millis; zero while active.
    pub clear_ts: i64,
    /// Whether the alarm propagates to related entities.
    pub propagate: bool,
    /// Resolved originator display name, present on enriched reads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub originator_name: Option<String>,
    /// Free-form alarm payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// An alarm enriched with its originator's display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmInfo {
    #[serde(flatten)]
    pub alarm: Alarm,
    pub originator_name: String,
}

/// Parameters of an alarm search against one affected entity.
#[derive(Debug, Clone, PartialEq)]
pub struct AlarmQuery {
    pub affected_entity_id: EntityId,
    pub page_link: TimePageLink,
    /// Coarse filter; takes precedence over `status` when both are set.
    pub search_status: Option<AlarmSearchStatus>,
    pub status: Option<AlarmStatus>,
    /// Whether the server should resolve originator names.
    pub fetch_originator: Option<bool>,
}

impl AlarmQuery {
    pub fn new(affected_entity_id: EntityId, page_link: TimePageLink) -> Self {
        Self {
            affected_entity_id,
            page_link,
            search_status: None,
            status: None,
            fetch_originator: None,
        }
    }

    /// Sets the coarse search-status filter.
    pub fn search_status(mut self, search_status: AlarmSearchStatus) -> Self {
        self.search_status = Some(search_status);
        self
    }

    /// Sets the exact status filter.
    pub fn status(mut self, status: AlarmStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Requests originator name resolution.
    pub fn fetch_originator(mut self, fetch_originator: bool) -> Self {
        self.fetch_originator = Some(fetch_originator);
        self
    }

    /// Renders the request path plus query string for the alarm endpoint.
    ///
    /// Shape: `/{entityType}/{id}?limit=...` followed by either
    /// `&searchStatus=` or `&status=` (search status wins when both are
    /// set) and `&fetchOriginator=` when requested.
    pub fn to_query(&self) -> String {
        let mut query = format!(
            "/{}/{}",
            self.affected_entity_id.entity_type, self.affected_entity_id.id
        );
        query.push_str(&self.page_link.to_query());
        if let Some(search_status) = self.search_status {
            query.push_str(&format!("&searchStatus={search_status}"));
        } else if let Some(status) = self.status {
            query.push_str(&format!("&status={status}"));
        }
        if let Some(fetch_originator) = self.fetch_originator {
            query.push_str(&format!("&fetchOriginator={fetch_originator}"));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityType;

    fn device_id() -> EntityId {
        EntityId::new(EntityType::Device, "765f0f20-56ab-11ee-8a0c")
    }

    #[test]
    fn test_minimal_query() {
        let query = AlarmQuery::new(device_id(), TimePageLink::new(20)).to_query();
        assert_eq!(query, "/DEVICE/765f0f20-56ab-11ee-8a0c?limit=20");
    }

    #[test]
    fn test_search_status_wins_over_status() {
        let query = AlarmQuery::new(device_id(), TimePageLink::new(20))
            .search_status(AlarmSearchStatus::Active)
            .status(AlarmStatus::ClearedAck)
            .to_query();
        assert!(query.ends_with("?limit=20&searchStatus=ACTIVE"));
        assert!(!query.contains("status=CLEARED_ACK"));
    }

    #[test]
    fn test_status_used_when_no_search_status() {
        let query = AlarmQuery::new(device_id(), TimePageLink::new(20))
            .status(AlarmStatus::ActiveUnack)
            .fetch_originator(true)
            .to_query();
        assert!(query.ends_with("&status=ACTIVE_UNACK&fetchOriginator=true"));
    }

    #[test]
    fn test_alarm_serde_round_trip() {
        let alarm = Alarm {
            id: Some("a1".to_string()),
            created_time: Some(1_700_000_000_000),
            tenant_id: EntityId::new(EntityType::Tenant, "t1"),
            alarm_type: "High Temperature".to_string(),
            originator: device_id(),
            severity: AlarmSeverity::Critical,
            status: AlarmStatus::ActiveUnack,
            start_ts: 1_700_000_000_000,
            end_ts: 1_700_000_060_000,
            ack_ts: 0,
            clear_ts: 0,
            propagate: true,
            originator_name: None,
            details: Some(serde_json::json!({"temperature": 93.5})),
        };

        let json = serde_json::to_string(&alarm).unwrap();
        assert!(json.contains(r#""type":"High Temperature""#));
        assert!(json.contains(r#""severity":"CRITICAL""#));
        assert!(json.contains(r#""status":"ACTIVE_UNACK""#));

        let back: Alarm = serde_json::from_str(&json).unwrap();
        assert_eq!(back, alarm);
    }

    #[test]
    fn test_alarm_info_flattens_alarm_fields() {
        let json = serde_json::json!({
            "tenantId": {"entityType": "TENANT", "id": "t1"},
            "type": "Offline",
            "originator": {"entityType": "DEVICE", "id": "d1"},
            "severity": "WARNING",
            "status": "CLEARED_ACK",
            "startTs": 1,
            "endTs": 2,
            "ackTs": 3,
            "clearTs": 4,
            "propagate": false,
            "originatorName": "Thermostat A"
        });

        let info: AlarmInfo = serde_json::from_value(json).unwrap();
        assert_eq!(info.originator_name, "Thermostat A");
        assert_eq!(info.alarm.alarm_type, "Offline");
    }
}
