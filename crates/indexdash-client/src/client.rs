use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::schema::{
    HealthEnvelope, HistoryEnvelope, HistoryRecord, IndexName, IndicesEnvelope,
    PredictionRecord, PredictionsEnvelope, DATE_FORMAT,
};
use chrono::NaiveDate;
use reqwest::{Client, Request, Url};
use serde::de::DeserializeOwned;
use std::future::Future;

/// The backend as the dashboard sees it.
///
/// [`IndexClient`] implements this over HTTP; anything else (test fakes, recorded fixtures) can
/// stand in for it.
pub trait IndexApi: Sync {
    /// Every index the backend knows about.
    fn list_indices(&self) -> impl Future<Output = Result<Vec<IndexName>, ApiError>> + Send;

    /// Daily records for `index`, optionally bounded on either side. A response without a `data`
    /// field means no rows.
    fn fetch_history(
        &self,
        index: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> impl Future<Output = Result<Vec<HistoryRecord>, ApiError>> + Send;

    /// Forecast for the next `days` days, failures included.
    fn try_fetch_predictions(
        &self,
        index: &str,
        days: u32,
    ) -> impl Future<Output = Result<Vec<PredictionRecord>, ApiError>> + Send;

    /// Best-effort forecast: any failure is logged and turns into an empty forecast, so a broken
    /// forecaster never blocks the history charts.
    fn fetch_predictions(
        &self,
        index: &str,
        days: u32,
    ) -> impl Future<Output = Vec<PredictionRecord>> + Send {
        async move {
            match self.try_fetch_predictions(index, days).await {
                Ok(predictions) => predictions,
                Err(e) => {
                    log::error!("[{index}] prediction request failed: {e}");
                    vec![]
                }
            }
        }
    }
}

/// HTTP client for the index backend.
#[derive(Debug, Clone)]
pub struct IndexClient {
    http: Client,
    base: Url,
}

impl IndexClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::ClientBuilder::new().user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Self::with_client(builder.build()?, &config.base_url)
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(http: Client, base_url: &str) -> Result<Self, ApiError> {
        let mut base = Url::parse(base_url).map_err(|e| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "not a hierarchical url".to_string(),
            });
        }

        // endpoints are joined relative to the base, so it must look like a directory
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, name: &str) -> Result<Url, ApiError> {
        self.base.join(name).map_err(|e| ApiError::InvalidBaseUrl {
            url: self.base.to_string(),
            reason: e.to_string(),
        })
    }

    pub fn indices_request(&self) -> Result<Request, ApiError> {
        Ok(self.http.get(self.endpoint("indices")?).build()?)
    }

    /// `GET /history`; unset bounds are left out of the query entirely.
    pub fn history_request(
        &self,
        index: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Request, ApiError> {
        let mut params = vec![("index_name", index.to_string())];
        if let Some(start) = start {
            params.push(("start_date", start.format(DATE_FORMAT).to_string()));
        }
        if let Some(end) = end {
            params.push(("end_date", end.format(DATE_FORMAT).to_string()));
        }

        Ok(self
            .http
            .get(self.endpoint("history")?)
            .query(&params)
            .build()?)
    }

    pub fn predictions_request(&self, index: &str, days: u32) -> Result<Request, ApiError> {
        Ok(self
            .http
            .get(self.endpoint("predict")?)
            .query(&[("index_name", index.to_string()), ("days", days.to_string())])
            .build()?)
    }

    pub fn health_request(&self) -> Result<Request, ApiError> {
        Ok(self.http.get(self.endpoint("health")?).build()?)
    }

    /// True when the backend reports `{"status": "ok"}`.
    pub async fn health(&self) -> Result<bool, ApiError> {
        let envelope: HealthEnvelope = self.fetch_de(self.health_request()?).await?;
        Ok(envelope.status.as_deref() == Some("ok"))
    }

    /// Send `request` and deserialize the JSON envelope, rejecting non-success statuses.
    async fn fetch_de<D>(&self, request: Request) -> Result<D, ApiError>
    where
        D: DeserializeOwned,
    {
        let endpoint = request.url().path().to_string();
        log::debug!("GET {}", request.url());

        let response = self.http.execute(request).await.map_err(|e| {
            log::error!("failed fetching response from {endpoint}");
            e
        })?;

        let status = response.status();
        if !status.is_success() {
            log::error!("{endpoint} answered {status}");
            return Err(ApiError::Server { endpoint, status });
        }

        let de: D = response.json().await.map_err(|e| {
            log::error!("failed deserializing from {endpoint}");
            e
        })?;

        Ok(de)
    }
}

impl IndexApi for IndexClient {
    async fn list_indices(&self) -> Result<Vec<IndexName>, ApiError> {
        let envelope: IndicesEnvelope = self.fetch_de(self.indices_request()?).await?;
        log::trace!("{} indices listed", envelope.indices.len());
        Ok(envelope.indices)
    }

    async fn fetch_history(
        &self,
        index: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<HistoryRecord>, ApiError> {
        let request = self.history_request(index, start, end)?;
        let envelope: HistoryEnvelope = self.fetch_de(request).await?;

        if let Some(error) = &envelope.error {
            log::warn!("[{index}] backend reported a history error: {error}");
        }
        if let Some(message) = &envelope.message {
            log::debug!("[{index}] {message}");
        }

        Ok(envelope.data.unwrap_or_default())
    }

    async fn try_fetch_predictions(
        &self,
        index: &str,
        days: u32,
    ) -> Result<Vec<PredictionRecord>, ApiError> {
        let request = self.predictions_request(index, days)?;
        let envelope: PredictionsEnvelope = self.fetch_de(request).await?;
        Ok(envelope.predictions.unwrap_or_default())
    }
}
