use stockview::config;

use crate::cli::{print_error, print_pairs};

#[derive(clap::Args)]
pub struct ConfigSetCommand {
    key: String,
    value: String,
}

impl ConfigSetCommand {
    pub async fn exec(&self) {
        match config::set(&self.key, &self.value) {
            Ok(config) => {
                print_pairs(None, vec![("api_url", config.api_url)]);
            }
            Err(err) => {
                print_error(err);
            }
        }
    }
}
