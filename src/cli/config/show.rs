use std::env;

use colored::Colorize;
use stockview::config::{self, API_URL_ENV, CONFIG};

use crate::cli::{print_error, print_pairs};

#[derive(clap::Args)]
pub struct ConfigShowCommand;

impl ConfigShowCommand {
    pub async fn exec(&self) {
        match config::config_path() {
            Ok(path) => {
                let mut pairs = vec![
                    ("file", path.to_string_lossy().to_string()),
                    ("api_url", CONFIG.api_url.to_string()),
                ];
                if env::var(API_URL_ENV).is_ok() {
                    pairs.push(("overridden_by", API_URL_ENV.yellow().to_string()));
                }

                print_pairs(None, pairs);
            }
            Err(err) => {
                print_error(err);
            }
        }
    }
}
