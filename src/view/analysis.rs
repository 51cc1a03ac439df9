use crate::{
    api::{SharedBackend, fallback},
    error::ApiResult,
    model::{CompanyOverview, Earnings, IndicatorQuery, Quote, TechnicalIndicatorSeries},
    signal::{IndicatorSignal, indicator_signal},
    view::{EventQueue, Notices},
};

pub const RSI_PERIOD: u32 = 14;
pub const SMA_PERIOD: u32 = 20;

enum AnalysisEvent {
    Overview(ApiResult<CompanyOverview>),
    Earnings(ApiResult<Earnings>),
    Quote(ApiResult<Quote>),
    Rsi(ApiResult<TechnicalIndicatorSeries>),
    Sma(ApiResult<TechnicalIndicatorSeries>),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnalysisState {
    pub symbol: Option<String>,
    pub overview: Option<CompanyOverview>,
    pub earnings: Option<Earnings>,
    pub quote: Option<Quote>,
    pub rsi: Option<TechnicalIndicatorSeries>,
    pub sma: Option<TechnicalIndicatorSeries>,
}

pub struct StockAnalysis {
    backend: SharedBackend,
    state: AnalysisState,
    queue: EventQueue<AnalysisEvent>,

    pub notices: Notices,
}

impl StockAnalysis {
    pub fn new(backend: SharedBackend) -> Self {
        Self {
            backend,
            state: AnalysisState::default(),
            queue: EventQueue::new(),

            notices: Notices::default(),
        }
    }

    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        !self.queue.is_idle()
    }

    /// Fetches every panel for `symbol` concurrently.
    ///
    /// Switching symbols clears the panels; reloading the same symbol keeps
    /// them until fresh data arrives.
    pub fn load(&mut self, symbol: &str) {
        let symbol = symbol.trim().to_uppercase();

        if self.state.symbol.as_deref() != Some(symbol.as_str()) {
            self.state = AnalysisState {
                symbol: Some(symbol.clone()),
                ..Default::default()
            };
        }
        self.queue.invalidate();

        let backend = self.backend.clone();
        let s = symbol.clone();
        self.queue.spawn(async move {
            AnalysisEvent::Overview(backend.company_overview(&s).await)
        });

        let backend = self.backend.clone();
        let s = symbol.clone();
        self.queue
            .spawn(async move { AnalysisEvent::Earnings(backend.earnings(&s).await) });

        let backend = self.backend.clone();
        let s = symbol.clone();
        self.queue
            .spawn(async move { AnalysisEvent::Quote(backend.quote(&s).await) });

        let backend = self.backend.clone();
        let s = symbol.clone();
        self.queue.spawn(async move {
            let query = IndicatorQuery::new("RSI", RSI_PERIOD);
            AnalysisEvent::Rsi(backend.technical_indicator(&s, &query).await)
        });

        let backend = self.backend.clone();
        self.queue.spawn(async move {
            let query = IndicatorQuery::new("SMA", SMA_PERIOD);
            AnalysisEvent::Sma(backend.technical_indicator(&symbol, &query).await)
        });
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

    fn apply(&mut self, event: AnalysisEvent) {
        match event {
            AnalysisEvent::Overview(result) => match result {
                Ok(overview) => self.state.overview = Some(overview),
                Err(err) => self.notices.push(err.message_or(fallback::COMPANY_OVERVIEW)),
            },
            AnalysisEvent::Earnings(result) => match result {
                Ok(earnings) => self.state.earnings = Some(earnings),
                Err(err) => self.notices.push(err.message_or(fallback::EARNINGS)),
            },
            AnalysisEvent::Quote(result) => match result {
                Ok(quote) => self.state.quote = Some(quote),
                Err(err) => self.notices.push(err.message_or(fallback::QUOTE)),
            },
            AnalysisEvent::Rsi(result) => match result {
                Ok(rsi) => self.state.rsi = Some(rsi),
                Err(err) => self
                    .notices
                    .push(err.message_or(fallback::TECHNICAL_INDICATORS)),
            },
            AnalysisEvent::Sma(result) => match result {
                Ok(sma) => self.state.sma = Some(sma),
                Err(err) => self
                    .notices
                    .push(err.message_or(fallback::TECHNICAL_INDICATORS)),
            },
        }
    }
}

impl AnalysisState {
    pub fn price(&self) -> Option<f64> {
        self.quote.as_ref().and_then(|quote| quote.price)
    }

    pub fn rsi_signal(&self) -> IndicatorSignal {
        self.rsi
            .as_ref()
            .map(|series| indicator_signal(series, self.price()))
            .unwrap_or_default()
    }

    pub fn sma_signal(&self) -> IndicatorSignal {
        self.sma
            .as_ref()
            .map(|series| indicator_signal(series, self.price()))
            .unwrap_or_default()
    }
}
