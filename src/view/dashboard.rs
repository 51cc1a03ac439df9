use crate::{
    api::{SharedBackend, fallback},
    error::ApiResult,
    model::{MarketOverview, ModelStatus, SearchResult},
    view::{EventQueue, Notices, chart::StockChart, search::StockSearch},
};

enum DashboardEvent {
    Market(ApiResult<MarketOverview>),
    Models(ApiResult<ModelStatus>),
}

pub struct Dashboard {
    backend: SharedBackend,

    pub search: StockSearch,
    pub chart: StockChart,

    market: Option<MarketOverview>,
    models: Option<ModelStatus>,
    selected: Option<SearchResult>,

    queue: EventQueue<DashboardEvent>,

    pub notices: Notices,
}

impl Dashboard {
    pub fn new(backend: SharedBackend) -> Self {
        Self {
            search: StockSearch::new(backend.clone()),
            chart: StockChart::new(backend.clone()),
            backend,

            market: None,
            models: None,
            selected: None,

            queue: EventQueue::new(),

            notices: Notices::default(),
        }
    }

    pub fn market(&self) -> Option<&MarketOverview> {
        self.market.as_ref()
    }

    pub fn models(&self) -> Option<&ModelStatus> {
        self.models.as_ref()
    }

    pub fn selected(&self) -> Option<&SearchResult> {
        self.selected.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        !self.queue.is_idle()
    }

    pub fn mount(&mut self) {
        self.queue.invalidate();

        let backend = self.backend.clone();
        self.queue
            .spawn(async move { DashboardEvent::Market(backend.market_overview().await) });

        let backend = self.backend.clone();
        self.queue
            .spawn(async move { DashboardEvent::Models(backend.models_status().await) });
    }

    /// Loads `result` into the chart once its history has arrived.
    pub async fn select(&mut self, result: &SearchResult) {
        let chart = &mut self.chart;
        let selected = &mut self.selected;

        self.search
            .select(result, |selection| {
                *selected = Some(selection.result);
                chart.set_data(selection.data);
            })
            .await;
    }

    pub fn pump(&mut self) -> bool {
        let mut changed = self.search.pump();
        changed |= self.chart.pump();

        while let Some(event) = self.queue.try_next() {
            self.apply(event);
            changed = true;
        }

        changed
    }

    pub async fn settle(&mut self) {
        while let Some(event) = self.queue.next().await {
            self.apply(event);
        }
        self.search.settle().await;
        self.chart.settle().await;
    }

    /// Notices of the dashboard and its embedded views.
    pub fn take_notices(&mut self) -> Vec<String> {
        let mut notices = self.notices.take();
        notices.extend(self.search.notices.take());
        notices.extend(self.chart.notices.take());
        notices
    }

    fn apply(&mut self, event: DashboardEvent) {
        match event {
            DashboardEvent::Market(result) => match result {
                Ok(market) => self.market = Some(market),
                Err(err) => self.notices.push(err.message_or(fallback::MARKET_OVERVIEW)),
            },
            DashboardEvent::Models(result) => match result {
                Ok(models) => self.models = Some(models),
                Err(err) => self.notices.push(err.message_or(fallback::MODELS_STATUS)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testing::FakeBackend;

    #[tokio::test]
    async fn test_mount_tolerates_one_failure() {
        let backend = FakeBackend::new();
        backend.respond("models_status", json!({"lstm": {"loaded": true, "accuracy": 0.9}}));

        let mut dashboard = Dashboard::new(backend.shared());
        dashboard.mount();
        dashboard.settle().await;

        assert!(dashboard.market().is_none());
        assert_eq!(
            dashboard.models().and_then(|m| m["lstm"].accuracy),
            Some(0.9)
        );
        assert_eq!(
            dashboard.take_notices(),
            vec![fallback::MARKET_OVERVIEW.to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_then_select_loads_chart() {
        let backend = FakeBackend::new();
        backend
            .respond("search", json!([{"symbol": "NVDA", "name": "NVIDIA Corp"}]))
            .respond(
                "stock_data:NVDA",
                json!({"symbol": "NVDA", "current_price": 900.0, "historical_data": []}),
            )
            .respond("predict", json!({"predicted_price_30d": 990.0}));

        let mut dashboard = Dashboard::new(backend.shared());
        dashboard.chart.set_show_predictions(true);
        dashboard.search.set_query("nvd");
        dashboard.settle().await;

        let result = dashboard.search.results()[0].clone();
        dashboard.select(&result).await;
        dashboard.settle().await;

        assert_eq!(
            dashboard.selected().and_then(|r| r.name.as_deref()),
            Some("NVIDIA Corp")
        );
        assert_eq!(dashboard.chart.current_price(), Some(900.0));
        assert_eq!(dashboard.chart.expected_change(), Some(10.0));
        assert!(dashboard.search.results().is_empty());
    }
}
