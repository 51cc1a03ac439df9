use colored::Colorize;
use stockview::{
    model::{Mover, NewsQuery},
    utils::format::{fmt_large_number, fmt_number, fmt_percent, fmt_price, fmt_signed, fmt_text},
    view::market::MarketOverviewPage,
};

use crate::cli::{backend, header, print_error, print_rows, spinner};

static MOVERS_SHOWN: usize = 10;
static HEADLINES_SHOWN: usize = 5;

#[derive(clap::Args)]
pub struct MarketCommand;

impl MarketCommand {
    pub async fn exec(&self) {
        let Some(backend) = backend() else {
            return;
        };

        let mut page = MarketOverviewPage::new(backend, NewsQuery::default());
        page.refresh();

        let spinner = spinner("Fetching market data");
        page.settle().await;
        spinner.finish_and_clear();

        for notice in page.notices.take() {
            print_error(notice);
        }

        let state = page.state();

        if let Some(overview) = &state.overview {
            let mut table_data = vec![header(&["Index", "Name", "Price", "Change", "Change %"])];
            for index in &overview.indices {
                table_data.push(vec![
                    fmt_text(index.symbol.as_deref()),
                    fmt_text(index.name.as_deref()),
                    fmt_number(index.price, 2),
                    fmt_signed(index.change),
                    fmt_percent(index.change_percent),
                ]);
            }
            print_rows(Some("Indices"), table_data);
        }

        if let Some(movers) = &state.movers {
            print_rows(Some("Top Gainers"), movers_table(&movers.top_gainers));
            print_rows(Some("Top Losers"), movers_table(&movers.top_losers));
            print_rows(
                Some("Most Actively Traded"),
                movers_table(&movers.most_actively_traded),
            );
        }

        if let Some(status) = &state.status {
            let mut table_data = vec![header(&[
                "Region", "Type", "Exchanges", "Open", "Close", "Status",
            ])];
            for market in &status.markets {
                let current_status = fmt_text(market.current_status.as_deref());
                table_data.push(vec![
                    fmt_text(market.region.as_deref()),
                    fmt_text(market.market_type.as_deref()),
                    fmt_text(market.primary_exchanges.as_deref()),
                    fmt_text(market.local_open.as_deref()),
                    fmt_text(market.local_close.as_deref()),
                    if market.is_open() {
                        current_status.green().to_string()
                    } else {
                        current_status.bright_black().to_string()
                    },
                ]);
            }
            print_rows(Some("Market Sessions"), table_data);
        }

        if let Some(news) = &state.news {
            println!("\n{}", "Headlines".bold());
            for article in news.feed.iter().take(HEADLINES_SHOWN) {
                println!(
                    "{} {}",
                    fmt_text(article.title.as_deref()).bold(),
                    fmt_text(article.source.as_deref()).bright_black()
                );
            }
        }
    }
}

fn movers_table(movers: &[Mover]) -> Vec<Vec<String>> {
    let mut table_data = vec![header(&["Ticker", "Price", "Change", "Change %", "Volume"])];
    for m in movers.iter().take(MOVERS_SHOWN) {
        table_data.push(vec![
            fmt_text(m.ticker.as_deref()),
            fmt_price(m.price),
            fmt_signed(m.change_amount),
            fmt_percent(m.change_percentage),
            fmt_large_number(m.volume),
        ]);
    }

    table_data
}
