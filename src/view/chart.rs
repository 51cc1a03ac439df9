use chrono::{Days, Local, NaiveDate};

use crate::{
    api::{DEFAULT_DAYS_AHEAD, SharedBackend, fallback},
    error::ApiResult,
    model::{HistoricalPoint, ModelType, PredictionResult, StockData},
    view::{EventQueue, Notices},
};

#[derive(
    Clone, Copy, Debug, Default, Eq, PartialEq, strum::Display, strum::EnumIter, strum::EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum TimeRange {
    #[strum(serialize = "1M")]
    OneMonth,
    #[strum(serialize = "3M")]
    ThreeMonths,
    #[strum(serialize = "6M")]
    SixMonths,
    #[default]
    #[strum(serialize = "1Y")]
    OneYear,
    #[strum(serialize = "2Y")]
    TwoYears,
}

impl TimeRange {
    pub fn days(&self) -> u64 {
        match self {
            TimeRange::OneMonth => 30,
            TimeRange::ThreeMonths => 90,
            TimeRange::SixMonths => 180,
            TimeRange::OneYear => 365,
            TimeRange::TwoYears => 730,
        }
    }
}

/// Points dated on or after `today - range.days()`; undated points are dropped.
pub fn filter_by_range(
    points: &[HistoricalPoint],
    range: TimeRange,
    today: NaiveDate,
) -> Vec<HistoricalPoint> {
    let cutoff = today
        .checked_sub_days(Days::new(range.days()))
        .unwrap_or(NaiveDate::MIN);

    points
        .iter()
        .filter(|point| point.parsed_date().is_some_and(|date| date >= cutoff))
        .cloned()
        .collect()
}

/// `(predicted - current) / current * 100`, or 0 when the current price is 0.
pub fn expected_change_percent(current_price: f64, predicted_price: f64) -> f64 {
    if current_price == 0.0 || !current_price.is_finite() || !predicted_price.is_finite() {
        return 0.0;
    }

    (predicted_price - current_price) / current_price * 100.0
}

pub struct StockChart {
    backend: SharedBackend,

    data: Option<StockData>,
    range: TimeRange,
    show_predictions: bool,
    model: ModelType,
    predictions: Option<PredictionResult>,

    prediction_queue: EventQueue<ApiResult<PredictionResult>>,

    pub notices: Notices,
}

impl StockChart {
    pub fn new(backend: SharedBackend) -> Self {
        Self {
            backend,

            data: None,
            range: TimeRange::default(),
            show_predictions: false,
            model: ModelType::default(),
            predictions: None,

            prediction_queue: EventQueue::new(),

            notices: Notices::default(),
        }
    }

    pub fn data(&self) -> Option<&StockData> {
        self.data.as_ref()
    }

    pub fn range(&self) -> TimeRange {
        self.range
    }

    pub fn model(&self) -> ModelType {
        self.model
    }

    pub fn shows_predictions(&self) -> bool {
        self.show_predictions
    }

    pub fn predictions(&self) -> Option<&PredictionResult> {
        self.predictions.as_ref()
    }

    /// Superseded requests still running do not count.
    pub fn is_loading_predictions(&self) -> bool {
        self.prediction_queue.is_loading()
    }

    pub fn set_data(&mut self, data: StockData) {
        self.data = Some(data);
        self.predictions = None;
        self.prediction_queue.invalidate();

        if self.show_predictions {
            self.fetch_predictions();
        }
    }

    pub fn set_range(&mut self, range: TimeRange) {
        self.range = range;
    }

    pub fn set_show_predictions(&mut self, show: bool) {
        if self.show_predictions == show {
            return;
        }

        self.show_predictions = show;
        if show {
            self.fetch_predictions();
        } else {
            self.prediction_queue.invalidate();
            self.predictions = None;
        }
    }

    pub fn set_model(&mut self, model: ModelType) {
        if self.model == model {
            return;
        }

        self.model = model;
        if self.show_predictions {
            self.fetch_predictions();
        }
    }

    fn fetch_predictions(&mut self) {
        let Some(symbol) = self.data.as_ref().and_then(|data| data.symbol.clone()) else {
            return;
        };

        self.prediction_queue.invalidate();

        let backend = self.backend.clone();
        let model = self.model;
        self.prediction_queue.spawn(async move {
            backend
                .predict(&symbol, Some(model), Some(DEFAULT_DAYS_AHEAD))
                .await
        });
    }

    pub fn pump(&mut self) -> bool {
        let mut changed = false;

        while let Some(result) = self.prediction_queue.try_next() {
            self.apply(result);
            changed = true;
        }

        changed
    }

    pub async fn settle(&mut self) {
        while let Some(result) = self.prediction_queue.next().await {
            self.apply(result);
        }
    }

    fn apply(&mut self, result: ApiResult<PredictionResult>) {
        match result {
            Ok(predictions) => self.predictions = Some(predictions),
            Err(err) => self.notices.push(err.message_or(fallback::PREDICT)),
        }
    }

    pub fn visible_points_at(&self, today: NaiveDate) -> Vec<HistoricalPoint> {
        self.data
            .as_ref()
            .map(|data| filter_by_range(&data.historical_data, self.range, today))
            .unwrap_or_default()
    }

    pub fn visible_points(&self) -> Vec<HistoricalPoint> {
        self.visible_points_at(Local::now().date_naive())
    }

    pub fn current_price(&self) -> Option<f64> {
        self.data.as_ref().and_then(StockData::latest_price)
    }

    /// Expected change to the 30-day prediction, when both prices are known.
    pub fn expected_change(&self) -> Option<f64> {
        let current = self.current_price()?;
        let predicted = self.predictions.as_ref()?.predicted_price_30d?;

        Some(expected_change_percent(current, predicted))
    }
}

#[cfg(test)]
mod tests {
    use std::{str::FromStr, time::Duration};

    use serde_json::json;
    use strum::IntoEnumIterator;

    use super::*;
    use crate::{testing::FakeBackend, utils::format::fmt_percent};

    fn point(date: &str, close: f64) -> HistoricalPoint {
        HistoricalPoint {
            date: Some(date.to_string()),
            close: Some(close),
            ..Default::default()
        }
    }

    fn stock_data(symbol: &str) -> StockData {
        StockData {
            symbol: Some(symbol.to_string()),
            current_price: Some(100.0),
            historical_data: vec![point("2024-05-09", 99.0), point("2024-05-10", 100.0)],
            ..Default::default()
        }
    }

    #[test]
    fn test_time_range() {
        let days: Vec<u64> = TimeRange::iter().map(|r| r.days()).collect();
        assert_eq!(days, vec![30, 90, 180, 365, 730]);
        assert_eq!(TimeRange::from_str("6m").unwrap(), TimeRange::SixMonths);
        assert_eq!(TimeRange::TwoYears.to_string(), "2Y");
        assert_eq!(TimeRange::default(), TimeRange::OneYear);
    }

    #[test]
    fn test_filter_by_range() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 31).unwrap();
        let points = vec![
            point("2022-06-15", 1.0),
            point("2023-06-01", 2.0),
            point("2024-02-01", 3.0),
            point("2024-05-01", 4.0),
            point("2024-05-30", 5.0),
            HistoricalPoint::default(),
            point("garbage", 6.0),
        ];
        let before = points.clone();

        for range in TimeRange::iter() {
            let cutoff = today - Days::new(range.days());
            let filtered = filter_by_range(&points, range, today);
            assert!(
                filtered
                    .iter()
                    .all(|p| p.parsed_date().is_some_and(|d| d >= cutoff))
            );
        }

        let closes = |range| -> Vec<f64> {
            filter_by_range(&points, range, today)
                .iter()
                .filter_map(|p| p.close)
                .collect()
        };
        assert_eq!(closes(TimeRange::OneMonth), vec![4.0, 5.0]);
        assert_eq!(closes(TimeRange::ThreeMonths), vec![4.0, 5.0]);
        assert_eq!(closes(TimeRange::SixMonths), vec![3.0, 4.0, 5.0]);
        assert_eq!(closes(TimeRange::OneYear), vec![2.0, 3.0, 4.0, 5.0]);
        assert_eq!(closes(TimeRange::TwoYears), vec![1.0, 2.0, 3.0, 4.0, 5.0]);

        assert_eq!(points, before);
    }

    #[test]
    fn test_expected_change_percent() {
        assert_eq!(fmt_percent(Some(expected_change_percent(100.0, 110.0))), "+10.00%");
        assert_eq!(fmt_percent(Some(expected_change_percent(200.0, 150.0))), "-25.00%");
        assert_eq!(expected_change_percent(0.0, 110.0), 0.0);
        assert_eq!(expected_change_percent(f64::NAN, 110.0), 0.0);
    }

    #[tokio::test]
    async fn test_predictions_only_fetched_when_toggled_on() {
        let backend = FakeBackend::new();
        backend.respond("predict", json!({"predicted_price_30d": 110.0}));

        let mut chart = StockChart::new(backend.shared());
        chart.set_data(stock_data("AAPL"));
        chart.set_model(ModelType::Lstm);
        chart.settle().await;
        assert_eq!(backend.count("predict"), 0);
        assert_eq!(chart.expected_change(), None);

        chart.set_show_predictions(true);
        chart.settle().await;
        assert_eq!(backend.calls(), vec!["predict:AAPL/lstm".to_string()]);
        assert_eq!(chart.expected_change(), Some(10.0));

        chart.set_model(ModelType::Attention);
        chart.settle().await;
        assert_eq!(backend.count("predict"), 2);

        chart.set_show_predictions(false);
        assert!(chart.predictions().is_none());
        assert_eq!(backend.count("predict"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_predictions_are_dropped() {
        let backend = FakeBackend::new();
        backend
            .respond("predict:AAPL/ensemble", json!({"model_type": "ensemble"}))
            .delay("predict:AAPL/ensemble", Duration::from_secs(5))
            .respond("predict:AAPL/lstm", json!({"model_type": "lstm"}))
            .delay("predict:AAPL/lstm", Duration::from_secs(1));

        let mut chart = StockChart::new(backend.shared());
        chart.set_data(stock_data("AAPL"));
        chart.set_show_predictions(true);
        chart.set_model(ModelType::Lstm);
        assert!(chart.is_loading_predictions());

        chart.settle().await;

        assert_eq!(
            chart.predictions().and_then(|p| p.model_type.as_deref()),
            Some("lstm")
        );
        assert!(!chart.is_loading_predictions());
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggling_predictions_off_stops_loading() {
        let backend = FakeBackend::new();
        backend
            .respond("predict", json!({"predicted_price_30d": 110.0}))
            .delay("predict", Duration::from_secs(5));

        let mut chart = StockChart::new(backend.shared());
        chart.set_data(stock_data("AAPL"));
        chart.set_show_predictions(true);
        assert!(chart.is_loading_predictions());

        chart.set_show_predictions(false);
        assert!(!chart.is_loading_predictions());

        chart.settle().await;
        assert!(!chart.is_loading_predictions());
        assert!(chart.predictions().is_none());
        assert_eq!(chart.expected_change(), None);
    }

    #[tokio::test]
    async fn test_failed_prediction_keeps_chart() {
        let backend = FakeBackend::new();
        let mut chart = StockChart::new(backend.shared());
        chart.set_data(stock_data("AAPL"));
        chart.set_show_predictions(true);
        chart.settle().await;

        assert!(chart.predictions().is_none());
        assert_eq!(chart.notices.take(), vec![fallback::PREDICT.to_string()]);
        assert_eq!(chart.data().and_then(|d| d.symbol.as_deref()), Some("AAPL"));
        assert_eq!(
            chart
                .visible_points_at(NaiveDate::from_ymd_opt(2024, 5, 31).unwrap())
                .len(),
            2
        );
    }
}
