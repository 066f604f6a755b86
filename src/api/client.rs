use crate::api::error::{ApiError, ApiResult};
use crate::api::query::build_query;
use crate::api::traits::PropertyApi;
use crate::api::types::FilterCriteria;
use crate::config::Config;
use crate::models::{
    DateRange, NearbyResponse, PriceCalculation, PropertyDetail, PropertyId, PropertyListResponse,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

const NO_PARAMS: [(&str, &str); 0] = [];

/// reqwest-backed client for the rental REST API
pub struct RentalApiClient {
    client: Client,
    base_url: String,
}

impl RentalApiClient {
    /// Create a client for the backend named in the config
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self::with_client(client, &config.api_base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json<T, Q>(&self, path: &str, query: &Q) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let url = self.url(path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(ApiError::Network)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("{} returned status: {}", url, status);
            return Err(ApiError::Backend {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(ApiError::Network)?;
        debug!("Downloaded {} bytes from {}", bytes.len(), url);

        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl PropertyApi for RentalApiClient {
    async fn list_properties(&self, criteria: &FilterCriteria) -> ApiResult<PropertyListResponse> {
        self.get_json("properties/", &build_query(criteria)).await
    }

    async fn get_property(&self, id: PropertyId) -> ApiResult<PropertyDetail> {
        self.get_json(&format!("properties/{id}/"), &NO_PARAMS).await
    }

    async fn nearby(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> ApiResult<NearbyResponse> {
        let params = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("radius", radius_km.to_string()),
        ];
        self.get_json("properties/nearby/", &params).await
    }

    async fn availability(&self, id: PropertyId) -> ApiResult<serde_json::Value> {
        self.get_json(&format!("properties/{id}/availability/"), &NO_PARAMS)
            .await
    }

    async fn calculate_price(
        &self,
        id: PropertyId,
        range: DateRange,
    ) -> ApiResult<PriceCalculation> {
        let params = [
            ("check_in", range.check_in.to_string()),
            ("check_out", range.check_out.to_string()),
        ];
        self.get_json(&format!("properties/{id}/calculate_price/"), &params)
            .await
    }
}
