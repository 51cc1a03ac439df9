use std::time::Duration;

use log::debug;
use tokio::sync::mpsc;

use crate::{
    CHANNEL_BUFFER_DEFAULT,
    api::{DEFAULT_PERIOD, SharedBackend, fallback},
    error::ApiResult,
    model::{SearchResult, StockData},
    view::{Notices, RequestSeq, debounce::Debouncer},
};

pub const SEARCH_DEBOUNCE_MS: u64 = 300;
pub const MIN_QUERY_CHARS: usize = 2;

/// A search result together with its one-year history.
#[derive(Clone, Debug, PartialEq)]
pub struct StockSelection {
    pub result: SearchResult,
    pub data: StockData,
}

pub struct StockSearch {
    backend: SharedBackend,

    query: String,
    results: Vec<SearchResult>,
    searching: bool,
    selecting: bool,

    debouncer: Debouncer,
    seq: RequestSeq,
    result_sender: mpsc::Sender<(u64, ApiResult<Vec<SearchResult>>)>,
    result_receiver: mpsc::Receiver<(u64, ApiResult<Vec<SearchResult>>)>,

    pub notices: Notices,
}

impl StockSearch {
    pub fn new(backend: SharedBackend) -> Self {
        let (result_sender, result_receiver) = mpsc::channel(CHANNEL_BUFFER_DEFAULT);

        Self {
            backend,

            query: String::new(),
            results: vec![],
            searching: false,
            selecting: false,

            debouncer: Debouncer::new(Duration::from_millis(SEARCH_DEBOUNCE_MS)),
            seq: RequestSeq::default(),
            result_sender,
            result_receiver,

            notices: Notices::default(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    pub fn is_selecting(&self) -> bool {
        self.selecting
    }

    /// Input change; the search fires once input has been quiet long enough.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        let token = self.seq.advance();

        let query = query.trim().to_string();
        if query.chars().count() < MIN_QUERY_CHARS {
            self.debouncer.cancel();
            self.results.clear();
            self.searching = false;
            return;
        }

        self.searching = true;

        let backend = self.backend.clone();
        let sender = self.result_sender.clone();
        self.debouncer.schedule(async move {
            let result = backend.search_stocks(&query).await;
            let _ = sender.send((token, result)).await;
        });
    }

    /// Applies finished searches; returns whether anything changed.
    pub fn pump(&mut self) -> bool {
        let mut changed = false;

        while let Ok((token, result)) = self.result_receiver.try_recv() {
            if !self.seq.is_current(token) {
                debug!("[Search] Dropped stale results #{token}");
                continue;
            }

            self.searching = false;
            match result {
                Ok(results) => self.results = results,
                Err(err) => self.notices.push(err.message_or(fallback::SEARCH)),
            }
            changed = true;
        }

        changed
    }

    /// Waits for the pending search, then applies it.
    pub async fn settle(&mut self) {
        self.debouncer.flush().await;
        self.pump();
    }

    /// Loads a year of history for `result` and hands it to `on_select`.
    pub async fn select<F>(&mut self, result: &SearchResult, on_select: F)
    where
        F: FnOnce(StockSelection),
    {
        let Some(symbol) = result.symbol.as_deref().map(str::trim).filter(|s| !s.is_empty())
        else {
            self.notices.push(fallback::STOCK_DATA);
            return;
        };

        self.selecting = true;
        let data = self.backend.stock_data(symbol, Some(DEFAULT_PERIOD)).await;
        self.selecting = false;

        match data {
            Ok(data) => {
                self.debouncer.cancel();
                self.seq.advance();
                self.query.clear();
                self.results.clear();
                self.searching = false;

                on_select(StockSelection {
                    result: result.clone(),
                    data,
                });
            }
            Err(err) => self.notices.push(err.message_or(fallback::STOCK_DATA)),
        }
    }
}
