use colored::Colorize;
use stockview::{
    api::{DEFAULT_DAYS_AHEAD, fallback},
    model::ModelType,
    utils::format::{fmt_percent, fmt_price, fmt_ratio, fmt_signed, fmt_text},
    view::chart::expected_change_percent,
};

use crate::cli::{backend, header, print_error, print_pairs, print_rows, spinner};

#[derive(clap::Args)]
pub struct PredictCommand {
    #[arg(help = "Stock symbol, e.g. AAPL")]
    symbol: String,

    #[arg(
        short = 'm',
        long = "model",
        default_value_t = ModelType::default(),
        help = "Model type: lstm, attention or ensemble"
    )]
    model: ModelType,

    #[arg(
        short = 'd',
        long = "days",
        default_value_t = DEFAULT_DAYS_AHEAD,
        help = "Days ahead to predict"
    )]
    days_ahead: u32,
}

impl PredictCommand {
    pub async fn exec(&self) {
        let Some(backend) = backend() else {
            return;
        };

        let symbol = self.symbol.trim().to_uppercase();

        let spinner = spinner(&format!("Predicting with {}", self.model.title()));
        let result = backend
            .predict(&symbol, Some(self.model), Some(self.days_ahead))
            .await;
        spinner.finish_and_clear();

        match result {
            Ok(prediction) => {
                let prices = (prediction.current_price, prediction.predicted_price_30d);
                let expected_change = match prices {
                    (Some(current), Some(predicted)) => {
                        Some(expected_change_percent(current, predicted))
                    }
                    _ => prediction.price_change_percent,
                };

                let recommendation = fmt_text(prediction.recommendation.as_deref());
                let recommendation = match recommendation.to_uppercase().as_str() {
                    "BUY" => recommendation.green().to_string(),
                    "SELL" => recommendation.red().to_string(),
                    _ => recommendation,
                };

                print_pairs(
                    Some(&format!("{symbol} ({})", self.model.title())),
                    vec![
                        ("Current Price", fmt_price(prediction.current_price)),
                        ("Predicted (30d)", fmt_price(prediction.predicted_price_30d)),
                        ("Price Change", fmt_signed(prediction.price_change)),
                        ("Expected Change", fmt_percent(expected_change)),
                        ("Model Accuracy", fmt_ratio(prediction.model_accuracy)),
                        ("Recommendation", recommendation),
                    ],
                );

                let mut table_data = vec![header(&["Date", "Predicted", "Confidence"])];
                for p in &prediction.predictions {
                    table_data.push(vec![
                        fmt_text(p.date.as_deref()),
                        fmt_price(p.predicted_price),
                        fmt_ratio(p.confidence),
                    ]);
                }
                print_rows(Some("Predictions"), table_data);
            }
            Err(err) => {
                print_error(err.message_or(fallback::PREDICT));
            }
        }
    }
}
