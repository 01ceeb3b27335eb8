use serde::{Deserialize, Serialize};

/// One row of the remote `campaigns` collection, exactly as the store returns it.
///
/// Field names are lower-case on the wire (`createdat`). Status, counters and
/// timestamp stay loosely typed here so validation can reject a single row.
/// Payloads are decoded one JSON value per row, so a row that does not even
/// fit this shape is rejected alone too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignRow {
    pub id: String,
    pub name: String,
    pub status: String,
    pub audience: i64,
    pub delivered: i64,
    pub opened: i64,
    pub createdat: String,
}

/// Column the store is asked to order by.
pub const CREATED_AT_COLUMN: &str = "createdat";
