//! Backend endpoints.
//!
//! [`Backend`] is the endpoint catalogue; [`ApiClient`] implements it over
//! HTTP. Views hold a [`SharedBackend`] so they can run against any
//! implementation.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;

use crate::{config::CONFIG, error::*, model::*};

mod client;

pub use client::{ApiClient, REQUEST_TIMEOUT_SECS};

pub const DEFAULT_PERIOD: &str = "1y";
pub const DEFAULT_INTRADAY_INTERVAL: &str = "5min";
pub const DEFAULT_NEWS_LIMIT: u32 = 50;
pub const DEFAULT_DAYS_AHEAD: u32 = 30;
pub const DEFAULT_EPOCHS: u32 = 100;

pub type SharedBackend = Arc<dyn Backend>;

/// Messages shown when a call fails and the backend supplied none.
pub mod fallback {
    pub const SEARCH: &str = "Failed to search stocks";
    pub const STOCK_DATA: &str = "Failed to fetch stock data";
    pub const INTRADAY: &str = "Failed to fetch intraday data";
    pub const DAILY: &str = "Failed to fetch daily data";
    pub const QUOTE: &str = "Failed to fetch quote";
    pub const COMPANY_OVERVIEW: &str = "Failed to fetch company overview";
    pub const EARNINGS: &str = "Failed to fetch earnings";
    pub const TECHNICAL_INDICATORS: &str = "Failed to fetch technical indicators";
    pub const NEWS: &str = "Failed to fetch news";
    pub const TOP_MOVERS: &str = "Failed to fetch top gainers and losers";
    pub const MARKET_STATUS: &str = "Failed to fetch market status";
    pub const MARKET_OVERVIEW: &str = "Failed to fetch market overview";
    pub const PREDICT: &str = "Failed to fetch predictions";
    pub const TRAIN: &str = "Failed to train model";
    pub const MODELS_STATUS: &str = "Failed to fetch model status";
    pub const HEALTH: &str = "Backend is not reachable";
}

#[async_trait]
pub trait Backend: Send + Sync {
    /// `GET stock/search`, unwrapped from the `results` envelope.
    async fn search_stocks(&self, query: &str) -> ApiResult<Vec<SearchResult>>;

    /// `GET stock/data`, period defaults to `1y`.
    async fn stock_data(&self, symbol: &str, period: Option<&str>) -> ApiResult<StockData>;

    /// `GET stock/intraday`, interval defaults to `5min`.
    async fn intraday(&self, symbol: &str, interval: Option<&str>) -> ApiResult<IntradaySeries>;

    /// `GET stock/daily`, adjusted by default.
    async fn daily(&self, symbol: &str, adjusted: Option<bool>) -> ApiResult<DailySeries>;

    async fn quote(&self, symbol: &str) -> ApiResult<Quote>;

    async fn company_overview(&self, symbol: &str) -> ApiResult<CompanyOverview>;

    async fn earnings(&self, symbol: &str) -> ApiResult<Earnings>;

    async fn technical_indicator(
        &self,
        symbol: &str,
        query: &IndicatorQuery,
    ) -> ApiResult<TechnicalIndicatorSeries>;

    async fn news(&self, query: &NewsQuery) -> ApiResult<NewsFeed>;

    async fn top_gainers_losers(&self) -> ApiResult<TopMovers>;

    async fn global_market_status(&self) -> ApiResult<GlobalMarketStatus>;

    async fn market_overview(&self) -> ApiResult<MarketOverview>;

    /// `POST stock/predict`, model defaults to ensemble and horizon to 30 days.
    async fn predict(
        &self,
        symbol: &str,
        model_type: Option<ModelType>,
        days_ahead: Option<u32>,
    ) -> ApiResult<PredictionResult>;

    /// `POST models/train`, epochs default to 100.
    async fn train(
        &self,
        symbol: &str,
        model_type: ModelType,
        epochs: Option<u32>,
    ) -> ApiResult<TrainingResult>;

    async fn models_status(&self) -> ApiResult<ModelStatus>;

    async fn health(&self) -> ApiResult<HealthStatus>;
}

static DEFAULT_CLIENT: OnceLock<Arc<ApiClient>> = OnceLock::new();

/// Process-wide client on the configured base URL.
pub fn client() -> SvResult<Arc<ApiClient>> {
    if let Some(client) = DEFAULT_CLIENT.get() {
        return Ok(client.clone());
    }

    let client = Arc::new(ApiClient::new(&CONFIG.api_url)?);
    Ok(DEFAULT_CLIENT.get_or_init(|| client).clone())
}

pub fn shared_backend() -> SvResult<SharedBackend> {
    let backend: SharedBackend = client()?;
    Ok(backend)
}
