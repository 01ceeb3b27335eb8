use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client};
use serde_json::Value;
use shared::{
    domain::Campaign,
    error::{FetchError, MalformedRecord},
    protocol::{CampaignRow, CREATED_AT_COLUMN},
};
use tracing::{info, warn};
use url::Url;

use crate::config::Settings;

/// Validated campaigns from one fetch, in store order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchedCampaigns {
    pub campaigns: Vec<Campaign>,
    /// Rows dropped by validation.
    pub rejected: usize,
}

#[async_trait]
pub trait CampaignRepository: Send + Sync {
    async fn fetch_all(&self) -> Result<FetchedCampaigns, FetchError>;
}

/// Decodes and validates every row on its own, dropping (and logging) the
/// malformed ones. One bad row never costs the rest of the payload.
pub fn ingest_rows(rows: Vec<Value>) -> FetchedCampaigns {
    let mut fetched = FetchedCampaigns {
        campaigns: Vec::with_capacity(rows.len()),
        rejected: 0,
    };
    for raw in rows {
        let row_id = raw
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or("<missing>")
            .to_string();
        match decode_row(raw) {
            Ok(campaign) => fetched.campaigns.push(campaign),
            Err(err) => {
                warn!(row_id = %row_id, reason = %err, "campaigns: rejected malformed row");
                fetched.rejected += 1;
            }
        }
    }
    fetched
}

fn decode_row(raw: Value) -> Result<Campaign, MalformedRecord> {
    let row: CampaignRow = serde_json::from_value(raw)
        .map_err(|e| MalformedRecord::InvalidShape(e.to_string()))?;
    Campaign::try_from(row)
}

/// Reads the `campaigns` collection from a PostgREST-style HTTP endpoint.
pub struct RestCampaignRepository {
    http: Client,
    endpoint: Url,
    store_key: Option<String>,
}

impl RestCampaignRepository {
    pub fn new(
        store_url: &str,
        collection: &str,
        store_key: Option<String>,
    ) -> Result<Self, FetchError> {
        Ok(Self {
            http: Client::new(),
            endpoint: collection_endpoint(store_url, collection)?,
            store_key,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, FetchError> {
        Self::new(
            &settings.store_url,
            &settings.collection,
            settings.store_key.clone(),
        )
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// `{store_url}/{collection}?select=*&order=createdat.desc`
pub fn collection_endpoint(store_url: &str, collection: &str) -> Result<Url, FetchError> {
    let mut endpoint = Url::parse(store_url.trim())
        .map_err(|e| FetchError::InvalidStoreUrl(format!("{store_url}: {e}")))?;
    endpoint
        .path_segments_mut()
        .map_err(|_| FetchError::InvalidStoreUrl(format!("{store_url}: cannot be a base")))?
        .pop_if_empty()
        .push(collection);
    endpoint
        .query_pairs_mut()
        .clear()
        .append_pair("select", "*")
        .append_pair("order", &format!("{CREATED_AT_COLUMN}.desc"));
    Ok(endpoint)
}

#[async_trait]
impl CampaignRepository for RestCampaignRepository {
    async fn fetch_all(&self) -> Result<FetchedCampaigns, FetchError> {
        let mut request = self
            .http
            .get(self.endpoint.clone())
            .header(ACCEPT, "application/json");
        if let Some(key) = &self.store_key {
            request = request.header("apikey", key).bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let rows: Vec<Value> = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;
        let fetched = ingest_rows(rows);
        info!(
            endpoint = %self.endpoint,
            count = fetched.campaigns.len(),
            rejected = fetched.rejected,
            "campaigns: fetched from store"
        );
        Ok(fetched)
    }
}

/// Serves a fixed set of rows, or a fixed error. Counts how often it was asked.
pub struct StaticCampaignRepository {
    result: Result<Vec<Value>, FetchError>,
    calls: Arc<AtomicUsize>,
}

impl StaticCampaignRepository {
    pub fn from_rows(rows: Vec<CampaignRow>) -> Self {
        Self::from_values(
            rows.into_iter()
                .filter_map(|row| serde_json::to_value(row).ok())
                .collect(),
        )
    }

    /// Untyped rows, validated one by one like a store payload.
    pub fn from_values(rows: Vec<Value>) -> Self {
        Self {
            result: Ok(rows),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(err: FetchError) -> Self {
        Self {
            result: Err(err),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl CampaignRepository for StaticCampaignRepository {
    async fn fetch_all(&self) -> Result<FetchedCampaigns, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone().map(ingest_rows)
    }
}

#[cfg(test)]
#[path = "tests/repository_tests.rs"]
mod tests;
