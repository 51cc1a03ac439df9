use chrono::Local;
use stockview::{
    api::{DEFAULT_PERIOD, fallback},
    utils::format::{fmt_large_number, fmt_number, fmt_price, fmt_ratio, fmt_text},
    view::chart::{TimeRange, filter_by_range},
};

use crate::cli::{backend, header, print_error, print_pairs, print_rows, spinner};

#[derive(clap::Args)]
pub struct HistoryCommand {
    #[arg(help = "Stock symbol, e.g. AAPL")]
    symbol: String,

    #[arg(
        short = 'p',
        long = "period",
        default_value = DEFAULT_PERIOD,
        help = "History period requested from the backend, e.g. -p 2y"
    )]
    period: String,

    #[arg(
        short = 'r',
        long = "range",
        default_value_t = TimeRange::default(),
        help = "Shown time range: 1M, 3M, 6M, 1Y or 2Y"
    )]
    range: TimeRange,
}

impl HistoryCommand {
    pub async fn exec(&self) {
        let Some(backend) = backend() else {
            return;
        };

        let symbol = self.symbol.trim().to_uppercase();

        let spinner = spinner("Fetching history");
        let result = backend.stock_data(&symbol, Some(&self.period)).await;
        spinner.finish_and_clear();

        match result {
            Ok(data) => {
                print_pairs(
                    Some(&symbol),
                    vec![
                        ("Name", fmt_text(data.name.as_deref())),
                        ("Current Price", fmt_price(data.latest_price())),
                        ("Currency", fmt_text(data.currency.as_deref())),
                        ("Market Cap", fmt_large_number(data.market_cap)),
                        ("P/E Ratio", fmt_number(data.pe_ratio, 2)),
                        ("Dividend Yield", fmt_ratio(data.dividend_yield)),
                    ],
                );

                let mut table_data =
                    vec![header(&["Date", "Open", "High", "Low", "Close", "Volume"])];
                let today = Local::now().date_naive();
                for p in filter_by_range(&data.historical_data, self.range, today) {
                    table_data.push(vec![
                        fmt_text(p.date.as_deref()),
                        fmt_price(p.open),
                        fmt_price(p.high),
                        fmt_price(p.low),
                        fmt_price(p.close),
                        fmt_large_number(p.volume),
                    ]);
                }

                print_rows(Some(&format!("History ({})", self.range)), table_data);
            }
            Err(err) => {
                print_error(err.message_or(fallback::STOCK_DATA));
            }
        }
    }
}
