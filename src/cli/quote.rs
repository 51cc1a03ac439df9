use stockview::{
    api::fallback,
    utils::format::{fmt_large_number, fmt_percent, fmt_price, fmt_signed, fmt_text},
};

use crate::cli::{backend, print_error, print_pairs, spinner};

#[derive(clap::Args)]
pub struct QuoteCommand {
    #[arg(help = "Stock symbol, e.g. AAPL")]
    symbol: String,
}

impl QuoteCommand {
    pub async fn exec(&self) {
        let Some(backend) = backend() else {
            return;
        };

        let symbol = self.symbol.trim().to_uppercase();

        let spinner = spinner("Fetching quote");
        let result = backend.quote(&symbol).await;
        spinner.finish_and_clear();

        match result {
            Ok(quote) => {
                print_pairs(
                    Some(&symbol),
                    vec![
                        ("Price", fmt_price(quote.price)),
                        ("Change", fmt_signed(quote.change)),
                        ("Change %", fmt_percent(quote.change_percent)),
                        ("Open", fmt_price(quote.open)),
                        ("High", fmt_price(quote.high)),
                        ("Low", fmt_price(quote.low)),
                        ("Previous Close", fmt_price(quote.previous_close)),
                        ("Volume", fmt_large_number(quote.volume)),
                        (
                            "Latest Trading Day",
                            fmt_text(quote.latest_trading_day.as_deref()),
                        ),
                    ],
                );
            }
            Err(err) => {
                print_error(err.message_or(fallback::QUOTE));
            }
        }
    }
}
