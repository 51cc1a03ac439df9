use colored::Colorize;
use stockview::{
    api::{DEFAULT_NEWS_LIMIT, fallback},
    model::NewsQuery,
    utils::format::{fmt_number, fmt_text},
};

use crate::cli::{backend, print_error, spinner};

#[derive(clap::Args)]
pub struct NewsCommand {
    #[arg(short = 't', long = "tickers", help = "Comma separated tickers, e.g. -t AAPL,MSFT")]
    tickers: Option<String>,

    #[arg(long = "topics", help = "Comma separated topics, e.g. --topics technology,earnings")]
    topics: Option<String>,

    #[arg(long = "from", help = "Earliest publish time, e.g. --from 20240410T0130")]
    time_from: Option<String>,

    #[arg(long = "to", help = "Latest publish time, e.g. --to 20240420T0130")]
    time_to: Option<String>,

    #[arg(
        short = 'l',
        long = "limit",
        default_value_t = DEFAULT_NEWS_LIMIT,
        help = "Maximum number of articles"
    )]
    limit: u32,
}

impl NewsCommand {
    pub async fn exec(&self) {
        let Some(backend) = backend() else {
            return;
        };

        let query = NewsQuery {
            tickers: self.tickers.clone(),
            topics: self.topics.clone(),
            time_from: self.time_from.clone(),
            time_to: self.time_to.clone(),
            limit: Some(self.limit),
        };

        let spinner = spinner("Fetching news");
        let result = backend.news(&query).await;
        spinner.finish_and_clear();

        match result {
            Ok(news) => {
                if news.feed.is_empty() {
                    println!("[!] {}", "No news".yellow());
                }

                for article in &news.feed {
                    let sentiment = fmt_text(article.overall_sentiment_label.as_deref());
                    let sentiment = match article.overall_sentiment_score {
                        Some(score) if score > 0.0 => sentiment.green(),
                        Some(score) if score < 0.0 => sentiment.red(),
                        _ => sentiment.bright_black(),
                    };

                    println!("\n{}", fmt_text(article.title.as_deref()).bold());
                    println!(
                        "{} | {} | {} ({})",
                        fmt_text(article.source.as_deref()).cyan(),
                        fmt_text(article.time_published.as_deref()),
                        sentiment,
                        fmt_number(article.overall_sentiment_score, 3)
                    );
                    if let Some(summary) = article.summary.as_deref() {
                        println!("{summary}");
                    }
                    if let Some(url) = article.url.as_deref() {
                        println!("{}", url.bright_black());
                    }
                }
            }
            Err(err) => {
                print_error(err.message_or(fallback::NEWS));
            }
        }
    }
}
