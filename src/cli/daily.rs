use stockview::{
    api::fallback,
    utils::format::{fmt_large_number, fmt_number, fmt_price, fmt_text},
};

use crate::cli::{backend, header, print_error, print_rows, spinner};

#[derive(clap::Args)]
pub struct DailyCommand {
    #[arg(help = "Stock symbol, e.g. AAPL")]
    symbol: String,

    #[arg(long = "unadjusted", help = "Fetch prices not adjusted for splits and dividends")]
    unadjusted: bool,
}

impl DailyCommand {
    pub async fn exec(&self) {
        let Some(backend) = backend() else {
            return;
        };

        let symbol = self.symbol.trim().to_uppercase();

        let spinner = spinner("Fetching daily data");
        let result = backend.daily(&symbol, Some(!self.unadjusted)).await;
        spinner.finish_and_clear();

        match result {
            Ok(series) => {
                let adjusted = series.adjusted.unwrap_or(!self.unadjusted);

                let mut table_data = vec![header(&[
                    "Date", "Open", "High", "Low", "Close", "Adj Close", "Volume", "Dividend",
                    "Split",
                ])];
                for p in &series.data {
                    table_data.push(vec![
                        fmt_text(p.date.as_deref()),
                        fmt_price(p.open),
                        fmt_price(p.high),
                        fmt_price(p.low),
                        fmt_price(p.close),
                        fmt_price(p.adjusted_close),
                        fmt_large_number(p.volume),
                        fmt_number(p.dividend_amount, 4),
                        fmt_number(p.split_coefficient, 1),
                    ]);
                }

                let title = if adjusted {
                    format!("{symbol} (adjusted)")
                } else {
                    symbol
                };
                print_rows(Some(&title), table_data);
            }
            Err(err) => {
                print_error(err.message_or(fallback::DAILY));
            }
        }
    }
}
