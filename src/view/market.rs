use crate::{
    api::{SharedBackend, fallback},
    error::ApiResult,
    model::{GlobalMarketStatus, MarketOverview, NewsFeed, NewsQuery, TopMovers},
    view::{EventQueue, Notices},
};

enum MarketEvent {
    Overview(ApiResult<MarketOverview>),
    Movers(ApiResult<TopMovers>),
    Status(ApiResult<GlobalMarketStatus>),
    News(ApiResult<NewsFeed>),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MarketState {
    pub overview: Option<MarketOverview>,
    pub movers: Option<TopMovers>,
    pub status: Option<GlobalMarketStatus>,
    pub news: Option<NewsFeed>,
}

pub struct MarketOverviewPage {
    backend: SharedBackend,
    news_query: NewsQuery,
    state: MarketState,
    queue: EventQueue<MarketEvent>,

    pub notices: Notices,
}

impl MarketOverviewPage {
    pub fn new(backend: SharedBackend, news_query: NewsQuery) -> Self {
        Self {
            backend,
            news_query,
            state: MarketState::default(),
            queue: EventQueue::new(),

            notices: Notices::default(),
        }
    }

    pub fn state(&self) -> &MarketState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        !self.queue.is_idle()
    }

    pub fn refresh(&mut self) {
        self.queue.invalidate();

        let backend = self.backend.clone();
        self.queue
            .spawn(async move { MarketEvent::Overview(backend.market_overview().await) });

        let backend = self.backend.clone();
        self.queue
            .spawn(async move { MarketEvent::Movers(backend.top_gainers_losers().await) });

        let backend = self.backend.clone();
        self.queue
            .spawn(async move { MarketEvent::Status(backend.global_market_status().await) });

        let backend = self.backend.clone();
        let news_query = self.news_query.clone();
        self.queue
            .spawn(async move { MarketEvent::News(backend.news(&news_query).await) });
    }

    pub fn pump(&mut self) -> bool {
        let mut changed = false;

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
    }

    fn apply(&mut self, event: MarketEvent) {
        match event {
            MarketEvent::Overview(result) => match result {
                Ok(overview) => self.state.overview = Some(overview),
                Err(err) => self.notices.push(err.message_or(fallback::MARKET_OVERVIEW)),
            },
            MarketEvent::Movers(result) => match result {
                Ok(movers) => self.state.movers = Some(movers),
                Err(err) => self.notices.push(err.message_or(fallback::TOP_MOVERS)),
            },
            MarketEvent::Status(result) => match result {
                Ok(status) => self.state.status = Some(status),
                Err(err) => self.notices.push(err.message_or(fallback::MARKET_STATUS)),
            },
            MarketEvent::News(result) => match result {
                Ok(news) => self.state.news = Some(news),
                Err(err) => self.notices.push(err.message_or(fallback::NEWS)),
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
    async fn test_refresh_populates_independent_panels() {
        let backend = FakeBackend::new();
        backend
            .respond(
                "market_overview",
                json!({"indices": [{"symbol": "^DJI", "name": "Dow Jones", "price": 39512.84}]}),
            )
            .respond(
                "market_status",
                json!({"markets": [{"region": "United States", "current_status": "open"}]}),
            )
            .respond(
                "news:AAPL",
                json!({"items": "1", "feed": [{"title": "Apple earnings beat"}]}),
            );

        let mut page = MarketOverviewPage::new(
            backend.shared(),
            NewsQuery {
                tickers: Some("AAPL".to_string()),
                ..Default::default()
            },
        );
        page.refresh();
        page.settle().await;

        let state = page.state();
        assert_eq!(state.overview.as_ref().map(|o| o.indices.len()), Some(1));
        assert!(state.status.as_ref().is_some_and(|s| s.markets[0].is_open()));
        assert_eq!(
            state
                .news
                .as_ref()
                .and_then(|n| n.feed[0].title.as_deref()),
            Some("Apple earnings beat")
        );
        assert!(state.movers.is_none());
        assert_eq!(page.notices.take(), vec![fallback::TOP_MOVERS.to_string()]);
        assert!(!page.is_loading());
    }
}
