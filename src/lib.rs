//! # stockview lib

use std::env;

pub mod api;
pub mod config;
pub mod error;
pub mod gui;
pub mod model;
pub mod signal;
pub mod utils;
pub mod view;

#[cfg(test)]
mod testing;

pub static CHANNEL_BUFFER_DEFAULT: usize = 64;

pub static VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn init() {
    env_logger::Builder::new()
        .parse_filters(env::var("LOG").as_deref().unwrap_or("off"))
        .init();
}
