use std::fmt::Display;

use clap::Subcommand;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tabled::settings::{
    Alignment, Color, Width,
    measurement::Percent,
    object::{Columns, Object, Rows},
    peaker::Priority,
};
use stockview::api::{self, SharedBackend};
use tokio::time::Duration;

mod analyze;
mod chart;
mod config;
mod daily;
mod health;
mod history;
mod intraday;
mod market;
mod models;
mod news;
mod predict;
mod quote;
mod search;
mod train;

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Show technical and fundamental analysis of a stock")]
    Analyze(Box<analyze::AnalyzeCommand>),

    #[command(about = "Open the price chart window of a stock")]
    Chart(Box<chart::ChartCommand>),

    #[command(subcommand, about = "Show or set configurations")]
    Config(config::ConfigCommand),

    #[command(about = "Show daily time series of a stock")]
    Daily(Box<daily::DailyCommand>),

    #[command(about = "Check whether the backend is reachable")]
    Health(Box<health::HealthCommand>),

    #[command(about = "Show historical prices of a stock")]
    #[clap(visible_aliases = &["hist"])]
    History(Box<history::HistoryCommand>),

    #[command(about = "Show intraday time series of a stock")]
    Intraday(Box<intraday::IntradayCommand>),

    #[command(about = "Show market indices, top movers and trading sessions")]
    Market(Box<market::MarketCommand>),

    #[command(about = "Show status of the prediction models")]
    Models(Box<models::ModelsCommand>),

    #[command(about = "Show news and sentiment")]
    News(Box<news::NewsCommand>),

    #[command(about = "Predict future prices of a stock")]
    Predict(Box<predict::PredictCommand>),

    #[command(about = "Show the real-time quote of a stock")]
    Quote(Box<quote::QuoteCommand>),

    #[command(about = "Search stocks by symbol or company name")]
    #[clap(visible_aliases = &["s"])]
    Search(Box<search::SearchCommand>),

    #[command(about = "Train prediction models on a stock")]
    Train(Box<train::TrainCommand>),
}

impl Commands {
    pub async fn exec(&self) {
        match self {
            Commands::Analyze(cmd) => cmd.exec().await,
            Commands::Chart(cmd) => cmd.exec().await,
            Commands::Config(cmd) => cmd.exec().await,
            Commands::Daily(cmd) => cmd.exec().await,
            Commands::Health(cmd) => cmd.exec().await,
            Commands::History(cmd) => cmd.exec().await,
            Commands::Intraday(cmd) => cmd.exec().await,
            Commands::Market(cmd) => cmd.exec().await,
            Commands::Models(cmd) => cmd.exec().await,
            Commands::News(cmd) => cmd.exec().await,
            Commands::Predict(cmd) => cmd.exec().await,
            Commands::Quote(cmd) => cmd.exec().await,
            Commands::Search(cmd) => cmd.exec().await,
            Commands::Train(cmd) => cmd.exec().await,
        }
    }
}

fn backend() -> Option<SharedBackend> {
    match api::shared_backend() {
        Ok(backend) => Some(backend),
        Err(err) => {
            print_error(err);
            None
        }
    }
}

fn print_error(message: impl Display) {
    println!("[!] {}", message.to_string().red());
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("[{elapsed}] {msg} {spinner:.cyan}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));

    spinner
}

/// Two-column key/value table.
fn print_pairs(title: Option<&str>, pairs: Vec<(&str, String)>) {
    if let Some(title) = title {
        println!("\n{}", title.bold());
    }

    let table_data: Vec<Vec<String>> = pairs
        .into_iter()
        .map(|(key, value)| vec![key.to_string(), value])
        .collect();

    let mut table = tabled::builder::Builder::from_iter(&table_data).build();
    table.modify(Columns::first(), Color::FG_CYAN);
    println!("{table}");
}

/// Table whose first row is a header; every column but the first is right aligned.
fn print_rows(title: Option<&str>, table_data: Vec<Vec<String>>) {
    if let Some(title) = title {
        println!("\n{}", title.bold());
    }

    if table_data.len() <= 1 {
        println!("[!] {}", "No data".yellow());
        return;
    }

    let mut table = tabled::builder::Builder::from_iter(&table_data).build();
    table.modify(Rows::first(), Color::FG_BRIGHT_BLACK);
    table.modify(Columns::first().not(Rows::first()), Color::FG_CYAN);
    table.modify(Columns::new(1..), Alignment::right());
    table.with(Width::wrap(Percent(100)).priority(Priority::max(true)));
    println!("{table}");
}

fn header(titles: &[&str]) -> Vec<String> {
    titles.iter().map(|s| s.to_string()).collect()
}
