use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{
    RequestBuilder,
    header::{CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    api::{
        Backend, DEFAULT_DAYS_AHEAD, DEFAULT_EPOCHS, DEFAULT_INTRADAY_INTERVAL, DEFAULT_NEWS_LIMIT,
        DEFAULT_PERIOD,
    },
    error::{ApiError, ApiResult, SvResult},
    model::*,
    utils::net::{join_url, root_url},
};

pub const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> SvResult<Self> {
        Self::with_timeout(base_url, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    /// Every request, connection included, fails with a transport error after `timeout`.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> SvResult<Self> {
        url::Url::parse(base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|err| ApiError::transport(err.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> ApiResult<T> {
        let url = self.url(path)?;
        self.send(self.http.get(url).query(query)).await
    }

    /// GET on a path of the server origin, outside the API prefix of the base URL.
    async fn get_root<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url =
            root_url(&self.base_url, path).map_err(|err| ApiError::transport(err.to_string()))?;
        self.send(self.http.get(url)).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path)?;
        self.send(self.http.post(url).json(body)).await
    }

    fn url(&self, path: &str) -> ApiResult<String> {
        join_url(&self.base_url, path).map_err(|err| ApiError::transport(err.to_string()))
    }

    async fn send<T: DeserializeOwned>(&self, request_builder: RequestBuilder) -> ApiResult<T> {
        let request = request_builder
            .build()
            .map_err(|err| ApiError::transport(err.to_string()))?;
        let method = request.method().clone();
        let url = request.url().clone();

        debug!("[HTTP Request] {method} {url}");

        let response = match self.http.execute(request).await {
            Ok(response) => response,
            Err(err) => {
                warn!("[HTTP Error] {method} {url} {err}");
                return Err(ApiError::transport(err.to_string()));
            }
        };

        let status = response.status();
        if status.is_success() {
            response.json::<T>().await.map_err(|err| {
                warn!("[HTTP Decode Error] {method} {url} {err}");
                ApiError::transport(err.to_string())
            })
        } else {
            let payload = response.json::<Value>().await.ok();
            warn!(
                "[HTTP Status Error] {method} {url} {status} {}",
                payload.as_ref().map(Value::to_string).unwrap_or_default()
            );

            Err(ApiError::status(
                status.as_u16(),
                payload.as_ref().and_then(backend_message),
            ))
        }
    }
}

#[async_trait]
impl Backend for ApiClient {
    async fn search_stocks(&self, query: &str) -> ApiResult<Vec<SearchResult>> {
        let results: SearchResults = self
            .get("stock/search", &[("q", query.to_string())])
            .await?;
        Ok(results.results)
    }

    async fn stock_data(&self, symbol: &str, period: Option<&str>) -> ApiResult<StockData> {
        self.get(
            "stock/data",
            &[
                ("symbol", symbol.to_string()),
                ("period", period.unwrap_or(DEFAULT_PERIOD).to_string()),
            ],
        )
        .await
    }

    async fn intraday(&self, symbol: &str, interval: Option<&str>) -> ApiResult<IntradaySeries> {
        self.get(
            "stock/intraday",
            &[
                ("symbol", symbol.to_string()),
                (
                    "interval",
                    interval.unwrap_or(DEFAULT_INTRADAY_INTERVAL).to_string(),
                ),
            ],
        )
        .await
    }

    async fn daily(&self, symbol: &str, adjusted: Option<bool>) -> ApiResult<DailySeries> {
        self.get(
            "stock/daily",
            &[
                ("symbol", symbol.to_string()),
                ("adjusted", adjusted.unwrap_or(true).to_string()),
            ],
        )
        .await
    }

    async fn quote(&self, symbol: &str) -> ApiResult<Quote> {
        self.get("stock/quote", &[("symbol", symbol.to_string())]).await
    }

    async fn company_overview(&self, symbol: &str) -> ApiResult<CompanyOverview> {
        self.get("stock/company-overview", &[("symbol", symbol.to_string())]).await
    }

    async fn earnings(&self, symbol: &str) -> ApiResult<Earnings> {
        self.get("stock/earnings", &[("symbol", symbol.to_string())]).await
    }

    async fn technical_indicator(
        &self,
        symbol: &str,
        query: &IndicatorQuery,
    ) -> ApiResult<TechnicalIndicatorSeries> {
        self.get(
            "stock/technical-indicators",
            &[
                ("symbol", symbol.to_string()),
                ("indicator", query.indicator.to_string()),
                ("interval", query.interval.to_string()),
                ("time_period", query.time_period.to_string()),
                ("series_type", query.series_type.to_string()),
            ],
        )
        .await
    }

    async fn news(&self, query: &NewsQuery) -> ApiResult<NewsFeed> {
        let mut params: Vec<(&str, String)> = vec![];
        for (name, value) in [
            ("tickers", &query.tickers),
            ("topics", &query.topics),
            ("time_from", &query.time_from),
            ("time_to", &query.time_to),
        ] {
            if let Some(value) = value {
                params.push((name, value.to_string()));
            }
        }
        params.push((
            "limit",
            query.limit.unwrap_or(DEFAULT_NEWS_LIMIT).to_string(),
        ));

        self.get("market/news", &params).await
    }

    async fn top_gainers_losers(&self) -> ApiResult<TopMovers> {
        self.get("market/top-gainers-losers", &[]).await
    }

    async fn global_market_status(&self) -> ApiResult<GlobalMarketStatus> {
        self.get("market/global-status", &[]).await
    }

    async fn market_overview(&self) -> ApiResult<MarketOverview> {
        self.get("market/overview", &[]).await
    }

    async fn predict(
        &self,
        symbol: &str,
        model_type: Option<ModelType>,
        days_ahead: Option<u32>,
    ) -> ApiResult<PredictionResult> {
        let body = PredictionRequest {
            symbol: symbol.to_string(),
            model_type: model_type.unwrap_or_default(),
            days_ahead: days_ahead.unwrap_or(DEFAULT_DAYS_AHEAD),
        };

        self.post("stock/predict", &body).await
    }

    async fn train(
        &self,
        symbol: &str,
        model_type: ModelType,
        epochs: Option<u32>,
    ) -> ApiResult<TrainingResult> {
        let body = TrainRequest {
            symbol: symbol.to_string(),
            model_type,
            epochs: epochs.unwrap_or(DEFAULT_EPOCHS),
        };

        self.post("models/train", &body).await
    }

    async fn models_status(&self) -> ApiResult<ModelStatus> {
        self.get("models/status", &[]).await
    }

    async fn health(&self) -> ApiResult<HealthStatus> {
        self.get_root("health").await
    }
}

/// The backend reports failures as `{"error": "..."}`.
fn backend_message(payload: &Value) -> Option<String> {
    ["error", "message"]
        .iter()
        .filter_map(|key| payload.get(key).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_backend_message() {
        assert_eq!(
            backend_message(&json!({"error": "Symbol parameter is required"})),
            Some("Symbol parameter is required".to_string())
        );
        assert_eq!(
            backend_message(&json!({"message": "Not found"})),
            Some("Not found".to_string())
        );
        assert_eq!(backend_message(&json!({"error": ""})), None);
        assert_eq!(backend_message(&json!({"error": {"code": 1}})), None);
        assert_eq!(backend_message(&json!("oops")), None);
    }

    #[test]
    fn test_new_rejects_invalid_base_url() {
        assert!(ApiClient::new("not a url").is_err());

        let client = ApiClient::new("http://localhost:5000/api").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000/api");
        assert_eq!(
            client.url("stock/quote").unwrap(),
            "http://localhost:5000/api/stock/quote"
        );
    }

    #[test]
    fn test_request_timeout() {
        assert_eq!(REQUEST_TIMEOUT_SECS, 30);
        assert!(ApiClient::with_timeout("not a url", Duration::from_millis(100)).is_err());
    }
}
