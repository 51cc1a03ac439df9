use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{
    model::{lenient_f64, lenient_string, lenient_vec, value_to_f64},
    utils::datetime::date_from_str,
};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResult {
    #[serde(deserialize_with = "lenient_string")]
    pub symbol: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(rename = "type", deserialize_with = "lenient_string")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub region: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub currency: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResults {
    #[serde(deserialize_with = "lenient_vec")]
    pub results: Vec<SearchResult>,
}

/// Historical prices plus a few headline figures, as returned by `stock/data`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockData {
    #[serde(deserialize_with = "lenient_string")]
    pub symbol: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub current_price: Option<f64>,
    #[serde(deserialize_with = "lenient_string")]
    pub currency: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub market_cap: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub pe_ratio: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub dividend_yield: Option<f64>,
    #[serde(deserialize_with = "lenient_vec")]
    pub historical_data: Vec<HistoricalPoint>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoricalPoint {
    #[serde(deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub open: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub high: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub low: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub close: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub volume: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntradaySeries {
    #[serde(deserialize_with = "lenient_string")]
    pub symbol: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub interval: Option<String>,
    #[serde(deserialize_with = "lenient_vec")]
    pub data: Vec<IntradayPoint>,
    pub metadata: Value,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntradayPoint {
    #[serde(deserialize_with = "lenient_string")]
    pub timestamp: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub open: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub high: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub low: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub close: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub volume: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailySeries {
    #[serde(deserialize_with = "lenient_string")]
    pub symbol: Option<String>,
    pub adjusted: Option<bool>,
    #[serde(deserialize_with = "lenient_vec")]
    pub data: Vec<DailyPoint>,
    pub metadata: Value,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyPoint {
    #[serde(deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub open: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub high: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub low: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub close: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub adjusted_close: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub volume: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub dividend_amount: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub split_coefficient: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Quote {
    #[serde(deserialize_with = "lenient_string")]
    pub symbol: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub open: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub high: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub low: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub price: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub volume: Option<f64>,
    #[serde(deserialize_with = "lenient_string")]
    pub latest_trading_day: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub previous_close: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub change: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub change_percent: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyOverview {
    #[serde(rename = "Symbol", deserialize_with = "lenient_string")]
    pub symbol: Option<String>,
    #[serde(rename = "Name", deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(rename = "Description", deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(rename = "Exchange", deserialize_with = "lenient_string")]
    pub exchange: Option<String>,
    #[serde(rename = "Currency", deserialize_with = "lenient_string")]
    pub currency: Option<String>,
    #[serde(rename = "Sector", deserialize_with = "lenient_string")]
    pub sector: Option<String>,
    #[serde(rename = "Industry", deserialize_with = "lenient_string")]
    pub industry: Option<String>,
    #[serde(rename = "MarketCapitalization", deserialize_with = "lenient_f64")]
    pub market_capitalization: Option<f64>,
    #[serde(rename = "PERatio", deserialize_with = "lenient_f64")]
    pub pe_ratio: Option<f64>,
    #[serde(rename = "EPS", deserialize_with = "lenient_f64")]
    pub eps: Option<f64>,
    /// Fraction, e.g. `0.0044` for 0.44%.
    #[serde(rename = "DividendYield", deserialize_with = "lenient_f64")]
    pub dividend_yield: Option<f64>,
    #[serde(rename = "Beta", deserialize_with = "lenient_f64")]
    pub beta: Option<f64>,
    #[serde(rename = "52WeekHigh", deserialize_with = "lenient_f64")]
    pub week_52_high: Option<f64>,
    #[serde(rename = "52WeekLow", deserialize_with = "lenient_f64")]
    pub week_52_low: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Earnings {
    #[serde(deserialize_with = "lenient_string")]
    pub symbol: Option<String>,
    #[serde(rename = "annualEarnings", deserialize_with = "lenient_vec")]
    pub annual_earnings: Vec<AnnualEarning>,
    /// Most recent first.
    #[serde(rename = "quarterlyEarnings", deserialize_with = "lenient_vec")]
    pub quarterly_earnings: Vec<QuarterlyEarning>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnualEarning {
    #[serde(rename = "fiscalDateEnding", deserialize_with = "lenient_string")]
    pub fiscal_date_ending: Option<String>,
    #[serde(rename = "reportedEPS", deserialize_with = "lenient_f64")]
    pub reported_eps: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuarterlyEarning {
    #[serde(rename = "fiscalDateEnding", deserialize_with = "lenient_string")]
    pub fiscal_date_ending: Option<String>,
    #[serde(rename = "reportedDate", deserialize_with = "lenient_string")]
    pub reported_date: Option<String>,
    #[serde(rename = "reportedEPS", deserialize_with = "lenient_f64")]
    pub reported_eps: Option<f64>,
    #[serde(rename = "estimatedEPS", deserialize_with = "lenient_f64")]
    pub estimated_eps: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub surprise: Option<f64>,
    #[serde(rename = "surprisePercentage", deserialize_with = "lenient_f64")]
    pub surprise_percentage: Option<f64>,
}

/// Query of the `stock/technical-indicators` endpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct IndicatorQuery {
    pub indicator: String,
    pub interval: String,
    pub time_period: u32,
    pub series_type: String,
}

/// An indicator time series: date -> (field -> value).
///
/// Most indicators carry a single field named after themselves (`RSI`,
/// `SMA`), some carry several (`MACD`, `MACD_Signal`, `MACD_Hist`).
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TechnicalIndicatorSeries {
    pub indicator: Option<String>,
    pub metadata: Value,
    pub values: BTreeMap<String, BTreeMap<String, f64>>,
}

impl HistoricalPoint {
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(|s| date_from_str(s).ok())
    }
}

impl StockData {
    /// `current_price` when present, otherwise the close of the last point.
    pub fn latest_price(&self) -> Option<f64> {
        self.current_price.or_else(|| {
            self.historical_data
                .iter()
                .rev()
                .find_map(|point| point.close)
        })
    }
}

impl Default for IndicatorQuery {
    fn default() -> Self {
        Self {
            indicator: "SMA".to_string(),
            interval: "daily".to_string(),
            time_period: 20,
            series_type: "close".to_string(),
        }
    }
}

impl IndicatorQuery {
    pub fn new(indicator: &str, time_period: u32) -> Self {
        Self {
            indicator: indicator.to_uppercase(),
            time_period,
            ..Default::default()
        }
    }
}

impl TechnicalIndicatorSeries {
    pub fn from_json(json: &Value) -> Self {
        let mut series = Self::default();

        if let Some(obj) = json.as_object() {
            for (key, val) in obj {
                if key == "Meta Data" {
                    series.metadata = val.clone();
                } else if let Some(name) = key.strip_prefix("Technical Analysis:") {
                    series.indicator = Some(name.trim().to_uppercase());

                    if let Some(points) = val.as_object() {
                        for (date, fields) in points {
                            if let Some(fields) = fields.as_object() {
                                let values: BTreeMap<String, f64> = fields
                                    .iter()
                                    .filter_map(|(k, v)| {
                                        value_to_f64(v).map(|f| (k.to_string(), f))
                                    })
                                    .collect();

                                if !values.is_empty() {
                                    series.values.insert(date.to_string(), values);
                                }
                            }
                        }
                    }
                }
            }
        }

        series
    }

    /// Date and fields of the most recent point.
    pub fn latest(&self) -> Option<(&str, &BTreeMap<String, f64>)> {
        self.values
            .iter()
            .next_back()
            .map(|(date, fields)| (date.as_str(), fields))
    }

    pub fn latest_field(&self, field: &str) -> Option<f64> {
        self.latest()
            .and_then(|(_, fields)| fields.get(field).copied())
    }

    /// Latest value of the field named after the indicator, or the first field.
    pub fn latest_value(&self) -> Option<f64> {
        let (_, fields) = self.latest()?;

        self.indicator
            .as_ref()
            .and_then(|name| fields.get(name).copied())
            .or_else(|| fields.values().next().copied())
    }
}

impl<'de> Deserialize<'de> for TechnicalIndicatorSeries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let json = Value::deserialize(deserializer)?;
        Ok(Self::from_json(&json))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_stock_data_with_missing_fields() {
        let data: StockData = serde_json::from_value(json!({
            "symbol": "AAPL",
            "current_price": "187.44",
            "pe_ratio": null,
            "historical_data": [
                {"date": "2024-01-02", "open": 187.15, "close": 185.64, "volume": 82488700},
                {"date": "2024-01-03", "close": "184.25"},
                {}
            ]
        }))
        .unwrap();

        assert_eq!(data.symbol.as_deref(), Some("AAPL"));
        assert_eq!(data.current_price, Some(187.44));
        assert_eq!(data.pe_ratio, None);
        assert_eq!(data.market_cap, None);
        assert_eq!(data.historical_data.len(), 3);
        assert_eq!(data.historical_data[1].close, Some(184.25));
        assert_eq!(data.historical_data[1].high, None);
        assert_eq!(data.historical_data[2].parsed_date(), None);
        assert_eq!(
            data.historical_data[0].parsed_date(),
            NaiveDate::from_ymd_opt(2024, 1, 2)
        );
    }

    #[test]
    fn test_latest_price() {
        let data: StockData = serde_json::from_value(json!({
            "historical_data": [{"close": 10.0}, {"close": 11.0}, {"open": 12.0}]
        }))
        .unwrap();
        assert_eq!(data.latest_price(), Some(11.0));

        assert_eq!(StockData::default().latest_price(), None);
    }

    #[test]
    fn test_quote_percent_string() {
        let quote: Quote = serde_json::from_value(json!({
            "symbol": "IBM",
            "price": 172.5,
            "change_percent": "-0.4567%",
            "volume": 3100000,
            "latest_trading_day": "2024-05-10"
        }))
        .unwrap();

        assert_eq!(quote.change_percent, Some(-0.4567));
        assert_eq!(quote.previous_close, None);
    }

    #[test]
    fn test_company_overview_av_fields() {
        let overview: CompanyOverview = serde_json::from_value(json!({
            "Symbol": "IBM",
            "Name": "International Business Machines",
            "Sector": "TECHNOLOGY",
            "MarketCapitalization": "157914300000",
            "PERatio": "None",
            "DividendYield": "0.0386",
            "52WeekHigh": "199.18"
        }))
        .unwrap();

        assert_eq!(overview.market_capitalization, Some(157914300000.0));
        assert_eq!(overview.pe_ratio, None);
        assert_eq!(overview.dividend_yield, Some(0.0386));
        assert_eq!(overview.week_52_high, Some(199.18));
        assert_eq!(overview.industry, None);
    }

    #[test]
    fn test_earnings() {
        let earnings: Earnings = serde_json::from_value(json!({
            "symbol": "IBM",
            "quarterlyEarnings": [
                {"fiscalDateEnding": "2024-03-31", "reportedEPS": "1.68", "estimatedEPS": "1.6"},
                {"fiscalDateEnding": "2023-12-31", "reportedEPS": "None"}
            ]
        }))
        .unwrap();

        assert!(earnings.annual_earnings.is_empty());
        assert_eq!(earnings.quarterly_earnings[0].reported_eps, Some(1.68));
        assert_eq!(earnings.quarterly_earnings[1].reported_eps, None);
    }

    #[test]
    fn test_null_lists() {
        let earnings: Earnings =
            serde_json::from_value(json!({"annualEarnings": null, "quarterlyEarnings": null}))
                .unwrap();
        assert!(earnings.annual_earnings.is_empty());
        assert!(earnings.quarterly_earnings.is_empty());

        let data: StockData =
            serde_json::from_value(json!({"symbol": "AAPL", "historical_data": null})).unwrap();
        assert!(data.historical_data.is_empty());

        let results: SearchResults = serde_json::from_value(json!({"results": null})).unwrap();
        assert!(results.results.is_empty());

        let series: DailySeries = serde_json::from_value(json!({"data": null})).unwrap();
        assert!(series.data.is_empty());
    }

    #[test]
    fn test_technical_indicator_series() {
        let series: TechnicalIndicatorSeries = serde_json::from_value(json!({
            "Meta Data": {"1: Symbol": "IBM", "2: Indicator": "Relative Strength Index (RSI)"},
            "Technical Analysis: RSI": {
                "2024-05-09": {"RSI": "48.1"},
                "2024-05-10": {"RSI": "71.25"},
                "2024-05-08": {"RSI": "None"}
            }
        }))
        .unwrap();

        assert_eq!(series.indicator.as_deref(), Some("RSI"));
        assert_eq!(series.values.len(), 2);
        assert_eq!(series.latest().map(|(date, _)| date), Some("2024-05-10"));
        assert_eq!(series.latest_value(), Some(71.25));
        assert_eq!(series.latest_field("RSI"), Some(71.25));
    }

    #[test]
    fn test_technical_indicator_series_without_data() {
        let series: TechnicalIndicatorSeries =
            serde_json::from_value(json!({"Information": "rate limited"})).unwrap();

        assert_eq!(series.indicator, None);
        assert_eq!(series.latest(), None);
        assert_eq!(series.latest_value(), None);
    }

    #[test]
    fn test_indicator_query() {
        let query = IndicatorQuery::default();
        assert_eq!(query.indicator, "SMA");
        assert_eq!(query.interval, "daily");
        assert_eq!(query.time_period, 20);
        assert_eq!(query.series_type, "close");

        let query = IndicatorQuery::new("rsi", 14);
        assert_eq!(query.indicator, "RSI");
        assert_eq!(query.time_period, 14);
    }
}
