//! In-memory [`Backend`] for view tests.

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::time::sleep;

use crate::{
    api::{Backend, SharedBackend},
    error::{ApiError, ApiResult},
    model::*,
};

/// Responses are keyed by `endpoint:arg` first, then by `endpoint`.
/// One-shot responses queued with [`FakeBackend::respond_once`] are consumed in
/// call order before the standing ones.
/// Endpoints without a response fail with a bare status error.
#[derive(Default)]
pub struct FakeBackend {
    responses: Mutex<HashMap<String, Result<Value, ApiError>>>,
    delays: Mutex<HashMap<String, Duration>>,
    once: Mutex<HashMap<String, VecDeque<(Duration, Value)>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn shared(self: &Arc<Self>) -> SharedBackend {
        self.clone()
    }

    pub fn respond(&self, key: &str, value: Value) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .insert(key.to_string(), Ok(value));
        self
    }

    pub fn fail(&self, key: &str, err: ApiError) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .insert(key.to_string(), Err(err));
        self
    }

    pub fn delay(&self, key: &str, delay: Duration) -> &Self {
        self.delays.lock().unwrap().insert(key.to_string(), delay);
        self
    }

    /// Answers the next call of `key` with `value` after `delay`.
    pub fn respond_once(&self, key: &str, delay: Duration, value: Value) -> &Self {
        self.once
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_default()
            .push_back((delay, value));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, endpoint: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.split(':').next() == Some(endpoint))
            .count()
    }

    async fn reply<T: DeserializeOwned>(&self, endpoint: &str, arg: &str) -> ApiResult<T> {
        let key = format!("{endpoint}:{arg}");
        self.calls.lock().unwrap().push(key.clone());

        let once = {
            let mut once = self.once.lock().unwrap();
            match once.get_mut(&key).and_then(VecDeque::pop_front) {
                Some(reply) => Some(reply),
                None => once.get_mut(endpoint).and_then(VecDeque::pop_front),
            }
        };
        if let Some((delay, value)) = once {
            sleep(delay).await;
            return serde_json::from_value(value)
                .map_err(|err| ApiError::transport(err.to_string()));
        }

        let delay = {
            let delays = self.delays.lock().unwrap();
            delays.get(&key).or_else(|| delays.get(endpoint)).copied()
        };
        if let Some(delay) = delay {
            sleep(delay).await;
        }

        let response = {
            let responses = self.responses.lock().unwrap();
            responses
                .get(&key)
                .or_else(|| responses.get(endpoint))
                .cloned()
        };

        match response {
            Some(Ok(value)) => {
                serde_json::from_value(value).map_err(|err| ApiError::transport(err.to_string()))
            }
            Some(Err(err)) => Err(err),
            None => Err(ApiError::status(500, None)),
        }
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn search_stocks(&self, query: &str) -> ApiResult<Vec<SearchResult>> {
        self.reply("search", query).await
    }

    async fn stock_data(&self, symbol: &str, _period: Option<&str>) -> ApiResult<StockData> {
        self.reply("stock_data", symbol).await
    }

    async fn intraday(&self, symbol: &str, _interval: Option<&str>) -> ApiResult<IntradaySeries> {
        self.reply("intraday", symbol).await
    }

    async fn daily(&self, symbol: &str, _adjusted: Option<bool>) -> ApiResult<DailySeries> {
        self.reply("daily", symbol).await
    }

    async fn quote(&self, symbol: &str) -> ApiResult<Quote> {
        self.reply("quote", symbol).await
    }

    async fn company_overview(&self, symbol: &str) -> ApiResult<CompanyOverview> {
        self.reply("company_overview", symbol).await
    }

    async fn earnings(&self, symbol: &str) -> ApiResult<Earnings> {
        self.reply("earnings", symbol).await
    }

    async fn technical_indicator(
        &self,
        symbol: &str,
        query: &IndicatorQuery,
    ) -> ApiResult<TechnicalIndicatorSeries> {
        self.reply(&format!("indicator_{}", query.indicator.to_lowercase()), symbol)
            .await
    }

    async fn news(&self, query: &NewsQuery) -> ApiResult<NewsFeed> {
        self.reply("news", query.tickers.as_deref().unwrap_or_default())
            .await
    }

    async fn top_gainers_losers(&self) -> ApiResult<TopMovers> {
        self.reply("top_movers", "").await
    }

    async fn global_market_status(&self) -> ApiResult<GlobalMarketStatus> {
        self.reply("market_status", "").await
    }

    async fn market_overview(&self) -> ApiResult<MarketOverview> {
        self.reply("market_overview", "").await
    }

    async fn predict(
        &self,
        symbol: &str,
        model_type: Option<ModelType>,
        _days_ahead: Option<u32>,
    ) -> ApiResult<PredictionResult> {
        let model_type = model_type.unwrap_or_default();
        self.reply("predict", &format!("{symbol}/{model_type}"))
            .await
    }

    async fn train(
        &self,
        symbol: &str,
        model_type: ModelType,
        _epochs: Option<u32>,
    ) -> ApiResult<TrainingResult> {
        self.reply("train", &format!("{symbol}/{model_type}")).await
    }

    async fn models_status(&self) -> ApiResult<ModelStatus> {
        self.reply("models_status", "").await
    }

    async fn health(&self) -> ApiResult<HealthStatus> {
        self.reply("health", "").await
    }
}
