//! Time-windowed pagination parameters for entity queries.

use serde::{Deserialize, Serialize};

/// Page link over a time window, rendered into the query string of the
/// endpoints that page through time-ordered entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimePageLink {
    /// Maximum number of entities per page.
    pub limit: usize,
    /// Inclusive window start, epoch millis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    /// Inclusive window end, epoch millis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    /// Ascending instead of the default descending time order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asc_order: Option<bool>,
    /// Identifier of the last entity of the previous page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_offset: Option<String>,
}

impl TimePageLink {
    /// A page link with just a page size.
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            start_time: None,
            end_time: None,
            asc_order: None,
            id_offset: None,
        }
    }

    /// Sets the window start.
    pub fn start_time(mut self, start_time: i64) -> Self {
        self.start_time = Some(start_time);
        self
    }

    /// Sets the window end.
    pub fn end_time(mut self, end_time: i64) -> Self {
        self.end_time = Some(end_time);
        self
    }

    /// Sets the time ordering.
    pub fn asc_order(mut self, asc_order: bool) -> Self {
        self.asc_order = Some(asc_order);
        self
    }

    /// Sets the page offset id.
    pub fn id_offset(mut self, id_offset: impl Into<String>) -> Self {
        self.id_offset = Some(id_offset.into());
        self
    }

    /// Renders the query-string fragment, starting with `?limit=`.
    pub fn to_query(&self) -> String {
        let mut query = format!("?limit={}", self.limit);
        if let Some(start_time) = self.start_time {
            query.push_str(&format!("&startTime={start_time}"));
        }
        if let Some(end_time) = self.end_time {
            query.push_str(&format!("&endTime={end_time}"));
        }
        if let Some(asc_order) = self.asc_order {
            query.push_str(&format!("&ascOrder={asc_order}"));
        }
        if let Some(id_offset) = &self.id_offset {
            query.push_str(&format!("&idOffset={id_offset}"));
        }
        query
    }
}
