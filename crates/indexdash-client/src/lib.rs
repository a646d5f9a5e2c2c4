pub mod client;
pub mod config;
pub mod error;
pub mod schema;

pub mod prelude {
    pub use crate::client::{IndexApi, IndexClient};
    pub use crate::config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_FORECAST_DAYS};
    pub use crate::error::{ApiError, StatusCode};
    pub use crate::schema::{HistoryRecord, IndexName, PredictionRecord};

    pub fn build_client(config: &ClientConfig) -> Result<IndexClient, ApiError> {
        IndexClient::new(config)
    }
}
