use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{CounterField, MalformedRecord},
    protocol::CampaignRow,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignId(pub String);

impl CampaignId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CampaignId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Active,
    Scheduled,
    Draft,
    Completed,
    Failed,
}

impl CampaignStatus {
    pub const ALL: [CampaignStatus; 5] = [
        CampaignStatus::Active,
        CampaignStatus::Scheduled,
        CampaignStatus::Draft,
        CampaignStatus::Completed,
        CampaignStatus::Failed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Scheduled => "scheduled",
            Self::Draft => "draft",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CampaignStatus {
    type Err = MalformedRecord;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| MalformedRecord::UnknownStatus(raw.to_string()))
    }
}

/// A validated campaign record. Read-only from the listing's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub name: String,
    pub status: CampaignStatus,
    pub audience: u64,
    pub delivered: u64,
    pub opened: u64,
    pub created_at: DateTime<Utc>,
}

impl Campaign {
    /// Opened / delivered as a percentage, `None` before anything was delivered.
    pub fn open_rate(&self) -> Option<f64> {
        if self.delivered == 0 {
            return None;
        }
        Some(self.opened as f64 / self.delivered as f64 * 100.0)
    }
}

impl TryFrom<CampaignRow> for Campaign {
    type Error = MalformedRecord;

    fn try_from(row: CampaignRow) -> Result<Self, Self::Error> {
        if row.id.trim().is_empty() {
            return Err(MalformedRecord::MissingId);
        }
        let status = row.status.parse::<CampaignStatus>()?;
        let audience = non_negative(CounterField::Audience, row.audience)?;
        let delivered = non_negative(CounterField::Delivered, row.delivered)?;
        let opened = non_negative(CounterField::Opened, row.opened)?;
        if delivered > audience {
            return Err(MalformedRecord::DeliveredExceedsAudience {
                audience,
                delivered,
            });
        }
        if opened > delivered {
            return Err(MalformedRecord::OpenedExceedsDelivered { delivered, opened });
        }
        let created_at = parse_created_at(&row.createdat)?;

        Ok(Self {
            id: CampaignId(row.id),
            name: row.name,
            status,
            audience,
            delivered,
            opened,
            created_at,
        })
    }
}

fn non_negative(field: CounterField, value: i64) -> Result<u64, MalformedRecord> {
    u64::try_from(value).map_err(|_| MalformedRecord::NegativeCounter { field, value })
}

/// Accepts RFC 3339, Postgres text output (`2024-01-01 10:00:00+00`) and
/// offset-less timestamps, which are taken as UTC.
pub fn parse_created_at(raw: &str) -> Result<DateTime<Utc>, MalformedRecord> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Ok(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }
    Err(MalformedRecord::InvalidTimestamp(raw.to_string()))
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
