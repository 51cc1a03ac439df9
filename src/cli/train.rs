use colored::Colorize;
use stockview::{
    api::DEFAULT_EPOCHS,
    model::ModelType,
    utils::format::{fmt_ratio, fmt_text},
    view::training::ModelTraining,
};

use crate::cli::{backend, header, print_rows, spinner};

#[derive(clap::Args)]
pub struct TrainCommand {
    #[arg(help = "Stock symbol to train on, e.g. AAPL")]
    symbol: String,

    #[arg(
        short = 'm',
        long = "model",
        default_value_t = ModelType::default(),
        conflicts_with = "all",
        help = "Model type: lstm, attention or ensemble"
    )]
    model: ModelType,

    #[arg(long = "all", help = "Train every model type concurrently")]
    all: bool,

    #[arg(
        short = 'e',
        long = "epochs",
        default_value_t = DEFAULT_EPOCHS,
        help = "Training epochs"
    )]
    epochs: u32,
}

impl TrainCommand {
    pub async fn exec(&self) {
        let Some(backend) = backend() else {
            return;
        };

        let mut training = ModelTraining::new(backend);
        training.symbol = self.symbol.clone();
        training.epochs = self.epochs;

        if self.all {
            training.train_all();
        } else {
            training.train(self.model);
        }

        let spinner = spinner(&format!(
            "Training on {} ({} epochs)",
            self.symbol.trim().to_uppercase(),
            self.epochs
        ));
        training.settle().await;
        spinner.finish_and_clear();

        training.notices.take();
        for (model, message) in training.failures() {
            println!("[!] {} {}", model.title(), message.red());
        }

        if !training.results().is_empty() {
            let mut table_data = vec![header(&["Model", "Accuracy", "Message"])];
            for (model, result) in training.results() {
                table_data.push(vec![
                    model.title().to_string(),
                    fmt_ratio(result.model_accuracy),
                    fmt_text(result.message.as_deref()),
                ]);
            }
            print_rows(Some("Training Results"), table_data);
        }
    }
}
