use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{ModelType, lenient_f64, lenient_string, lenient_vec};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PredictionRequest {
    pub symbol: String,
    pub model_type: ModelType,
    pub days_ahead: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrainRequest {
    pub symbol: String,
    pub model_type: ModelType,
    pub epochs: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionResult {
    #[serde(deserialize_with = "lenient_string")]
    pub symbol: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub model_type: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub current_price: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub predicted_price_30d: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub price_change: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub price_change_percent: Option<f64>,
    #[serde(deserialize_with = "lenient_vec")]
    pub predictions: Vec<PricePrediction>,
    #[serde(deserialize_with = "lenient_f64")]
    pub model_accuracy: Option<f64>,
    /// `BUY`, `SELL` or `HOLD`
    #[serde(deserialize_with = "lenient_string")]
    pub recommendation: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricePrediction {
    #[serde(deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub predicted_price: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub confidence: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingResult {
    #[serde(deserialize_with = "lenient_string")]
    pub message: Option<String>,
    pub training_history: Value,
    #[serde(deserialize_with = "lenient_f64")]
    pub model_accuracy: Option<f64>,
}

/// Model type name -> state, as returned by `models/status`.
pub type ModelStatus = BTreeMap<String, ModelState>;

/// A `null` or malformed entry decodes as an unknown state instead of failing the whole map.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct ModelState {
    pub loaded: Option<bool>,
    pub accuracy: Option<f64>,
    pub last_trained: Option<String>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct ModelStateFields {
    loaded: Option<bool>,
    #[serde(deserialize_with = "lenient_f64")]
    accuracy: Option<f64>,
    #[serde(deserialize_with = "lenient_string")]
    last_trained: Option<String>,
}

impl From<Value> for ModelState {
    fn from(value: Value) -> Self {
        let fields: ModelStateFields = serde_json::from_value(value).unwrap_or_default();

        Self {
            loaded: fields.loaded,
            accuracy: fields.accuracy,
            last_trained: fields.last_trained,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthStatus {
    #[serde(deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub timestamp: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("healthy"))
    }
}
