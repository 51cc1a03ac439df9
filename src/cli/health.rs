use colored::Colorize;
use stockview::{api::fallback, config::CONFIG, utils::format::fmt_text};

use crate::cli::{backend, print_error, print_pairs};

#[derive(clap::Args)]
pub struct HealthCommand;

impl HealthCommand {
    pub async fn exec(&self) {
        let Some(backend) = backend() else {
            return;
        };

        match backend.health().await {
            Ok(health) => {
                let status = fmt_text(health.status.as_deref());
                let status = if health.is_healthy() {
                    status.green().to_string()
                } else {
                    status.yellow().to_string()
                };

                print_pairs(
                    None,
                    vec![
                        ("api_url", CONFIG.api_url.to_string()),
                        ("status", status),
                        ("timestamp", fmt_text(health.timestamp.as_deref())),
                    ],
                );
            }
            Err(err) => {
                print_error(format!(
                    "{} ({})",
                    err.message_or(fallback::HEALTH),
                    CONFIG.api_url
                ));
            }
        }
    }
}
