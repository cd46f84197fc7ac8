//! Alarm data model for the gateway console.
//!
//! This crate provides the alarm entity types, their severity and status
//! enums, and the query type the alarm endpoints take, including its
//! query-string rendering.

pub mod alarm;
pub mod entity;
pub mod page;

// Re-export commonly used types at the crate root
pub use alarm::{Alarm, AlarmInfo, AlarmQuery, AlarmSearchStatus, AlarmSeverity, AlarmStatus};
pub use entity::{EntityId, EntityType};
pub use page::TimePageLink;
