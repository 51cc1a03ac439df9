use std::collections::{BTreeMap, BTreeSet};

use log::info;
use strum::IntoEnumIterator;

use crate::{
    api::{DEFAULT_EPOCHS, SharedBackend, fallback},
    error::ApiResult,
    model::{ModelStatus, ModelType, TrainingResult},
    view::{EventQueue, Notices, RequestSeq},
};

pub const DEFAULT_TRAINING_SYMBOL: &str = "AAPL";

enum TrainingEvent {
    Status(u64, ApiResult<ModelStatus>),
    Trained(ModelType, ApiResult<TrainingResult>),
}

/// Training runs per model type are independent; a model already in flight
/// is never started twice.
pub struct ModelTraining {
    backend: SharedBackend,

    pub symbol: String,
    pub epochs: u32,

    status: Option<ModelStatus>,
    status_seq: RequestSeq,
    in_flight: BTreeSet<ModelType>,
    results: BTreeMap<ModelType, TrainingResult>,
    failures: BTreeMap<ModelType, String>,

    queue: EventQueue<TrainingEvent>,

    pub notices: Notices,
}

impl ModelTraining {
    pub fn new(backend: SharedBackend) -> Self {
        Self {
            backend,

            symbol: DEFAULT_TRAINING_SYMBOL.to_string(),
            epochs: DEFAULT_EPOCHS,

            status: None,
            status_seq: RequestSeq::default(),
            in_flight: BTreeSet::new(),
            results: BTreeMap::new(),
            failures: BTreeMap::new(),

            queue: EventQueue::new(),

            notices: Notices::default(),
        }
    }

    pub fn status(&self) -> Option<&ModelStatus> {
        self.status.as_ref()
    }

    pub fn results(&self) -> &BTreeMap<ModelType, TrainingResult> {
        &self.results
    }

    /// Latest failure message per model, cleared by its next success.
    pub fn failures(&self) -> &BTreeMap<ModelType, String> {
        &self.failures
    }

    pub fn is_training(&self, model: ModelType) -> bool {
        self.in_flight.contains(&model)
    }

    pub fn is_busy(&self) -> bool {
        !self.queue.is_idle()
    }

    pub fn mount(&mut self) {
        self.refresh_status();
    }

    /// Only the latest refresh is applied; older responses arriving later are dropped.
    pub fn refresh_status(&mut self) {
        let token = self.status_seq.advance();
        let backend = self.backend.clone();
        self.queue
            .spawn(async move { TrainingEvent::Status(token, backend.models_status().await) });
    }

    /// Starts training `model`; returns false when it is already in flight.
    pub fn train(&mut self, model: ModelType) -> bool {
        if !self.in_flight.insert(model) {
            return false;
        }

        info!("[Training] {} on {} ({} epochs)", model.title(), self.symbol, self.epochs);

        let backend = self.backend.clone();
        let symbol = self.symbol.trim().to_uppercase();
        let epochs = self.epochs;
        self.queue.spawn(async move {
            TrainingEvent::Trained(model, backend.train(&symbol, model, Some(epochs)).await)
        });

        true
    }

    /// Starts every model not already in flight; returns how many started.
    pub fn train_all(&mut self) -> usize {
        ModelType::iter().filter(|model| self.train(*model)).count()
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

    fn apply(&mut self, event: TrainingEvent) {
        match event {
            TrainingEvent::Status(token, result) => {
                if !self.status_seq.is_current(token) {
                    return;
                }

                match result {
                    Ok(status) => self.status = Some(status),
                    Err(err) => self.notices.push(err.message_or(fallback::MODELS_STATUS)),
                }
            }
            TrainingEvent::Trained(model, result) => {
                self.in_flight.remove(&model);

                match result {
                    Ok(result) => {
                        self.notices.push(result.message.clone().unwrap_or_else(|| {
                            format!("{} model trained successfully", model.title())
                        }));
                        self.results.insert(model, result);
                        self.failures.remove(&model);
                        self.refresh_status();
                    }
                    Err(err) => {
                        let message =
                            err.message_or(&format!("{} ({})", fallback::TRAIN, model.title()));
                        self.notices.push(message.clone());
                        self.failures.insert(model, message);
                    }
                }
            }
        }
    }
}
