use serde::{Deserialize, Serialize};

use crate::model::{lenient_f64, lenient_string, lenient_vec};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketOverview {
    #[serde(deserialize_with = "lenient_vec")]
    pub indices: Vec<IndexSnapshot>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSnapshot {
    #[serde(deserialize_with = "lenient_string")]
    pub symbol: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub price: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub change: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub change_percent: Option<f64>,
}

/// Filters of the `market/news` endpoint; absent filters are not sent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewsQuery {
    pub tickers: Option<String>,
    pub topics: Option<String>,
    pub time_from: Option<String>,
    pub time_to: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsFeed {
    #[serde(deserialize_with = "lenient_f64")]
    pub items: Option<f64>,
    #[serde(deserialize_with = "lenient_vec")]
    pub feed: Vec<NewsArticle>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsArticle {
    #[serde(deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub url: Option<String>,
    /// e.g. `20240510T143000`
    #[serde(deserialize_with = "lenient_string")]
    pub time_published: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub summary: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub source: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub overall_sentiment_score: Option<f64>,
    #[serde(deserialize_with = "lenient_string")]
    pub overall_sentiment_label: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopMovers {
    #[serde(deserialize_with = "lenient_string")]
    pub last_updated: Option<String>,
    #[serde(deserialize_with = "lenient_vec")]
    pub top_gainers: Vec<Mover>,
    #[serde(deserialize_with = "lenient_vec")]
    pub top_losers: Vec<Mover>,
    #[serde(deserialize_with = "lenient_vec")]
    pub most_actively_traded: Vec<Mover>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mover {
    #[serde(deserialize_with = "lenient_string")]
    pub ticker: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub price: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub change_amount: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub change_percentage: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub volume: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalMarketStatus {
    #[serde(deserialize_with = "lenient_vec")]
    pub markets: Vec<MarketSession>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketSession {
    #[serde(deserialize_with = "lenient_string")]
    pub market_type: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub region: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub primary_exchanges: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub local_open: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub local_close: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub current_status: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub notes: Option<String>,
}

impl MarketSession {
    pub fn is_open(&self) -> bool {
        self.current_status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("open"))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_top_movers() {
        let movers: TopMovers = serde_json::from_value(json!({
            "metadata": "Top gainers, losers, and most actively traded US tickers",
            "last_updated": "2024-05-10 16:15:59 US/Eastern",
            "top_gainers": [{
                "ticker": "ABCD",
                "price": "0.31",
                "change_amount": "0.21",
                "change_percentage": "210.0%",
                "volume": "123456"
            }]
        }))
        .unwrap();

        assert_eq!(movers.top_gainers[0].change_percentage, Some(210.0));
        assert_eq!(movers.top_gainers[0].volume, Some(123456.0));
        assert!(movers.top_losers.is_empty());
        assert!(movers.most_actively_traded.is_empty());
    }

    #[test]
    fn test_market_session() {
        let status: GlobalMarketStatus = serde_json::from_value(json!({
            "endpoint": "Global Market Open & Close Status",
            "markets": [
                {"market_type": "Equity", "region": "United States", "current_status": "open"},
                {"market_type": "Equity", "region": "Japan", "current_status": "closed"},
                {"region": "Mainland China"}
            ]
        }))
        .unwrap();

        assert!(status.markets[0].is_open());
        assert!(!status.markets[1].is_open());
        assert!(!status.markets[2].is_open());
    }

    #[test]
    fn test_market_overview() {
        let overview: MarketOverview = serde_json::from_value(json!({
            "indices": [{"symbol": "^GSPC", "name": "S&P 500", "price": 5222.68, "change": 8.6, "change_percent": 0.16}]
        }))
        .unwrap();
        assert_eq!(overview.indices[0].name.as_deref(), Some("S&P 500"));

        let empty: MarketOverview = serde_json::from_value(json!({})).unwrap();
        assert!(empty.indices.is_empty());

        let empty: MarketOverview = serde_json::from_value(json!({"indices": null})).unwrap();
        assert!(empty.indices.is_empty());
    }

    #[test]
    fn test_null_lists() {
        let feed: NewsFeed = serde_json::from_value(json!({"feed": null})).unwrap();
        assert!(feed.feed.is_empty());

        let movers: TopMovers = serde_json::from_value(json!({
            "top_gainers": null,
            "top_losers": [{"ticker": "XYZ", "price": "1.5"}],
            "most_actively_traded": "unavailable"
        }))
        .unwrap();
        assert!(movers.top_gainers.is_empty());
        assert_eq!(movers.top_losers.len(), 1);
        assert!(movers.most_actively_traded.is_empty());

        let status: GlobalMarketStatus = serde_json::from_value(json!({"markets": null})).unwrap();
        assert!(status.markets.is_empty());
    }
}
