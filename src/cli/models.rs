use colored::Colorize;
use stockview::{
    api::fallback,
    utils::format::{fmt_ratio, fmt_text},
};

use crate::cli::{backend, header, print_error, print_rows, spinner};

#[derive(clap::Args)]
pub struct ModelsCommand;

impl ModelsCommand {
    pub async fn exec(&self) {
        let Some(backend) = backend() else {
            return;
        };

        let spinner = spinner("Fetching model status");
        let result = backend.models_status().await;
        spinner.finish_and_clear();

        match result {
            Ok(status) => {
                let mut table_data = vec![header(&["Model", "Loaded", "Accuracy", "Last Trained"])];
                for (name, state) in status {
                    let loaded = match state.loaded {
                        Some(true) => "yes".green().to_string(),
                        Some(false) => "no".bright_black().to_string(),
                        None => fmt_text(None),
                    };

                    table_data.push(vec![
                        name,
                        loaded,
                        fmt_ratio(state.accuracy),
                        fmt_text(state.last_trained.as_deref()),
                    ]);
                }

                print_rows(None, table_data);
            }
            Err(err) => {
                print_error(err.message_or(fallback::MODELS_STATUS));
            }
        }
    }
}
