use stockview::{
    api::{DEFAULT_INTRADAY_INTERVAL, fallback},
    utils::format::{fmt_large_number, fmt_price, fmt_text},
};

use crate::cli::{backend, header, print_error, print_rows, spinner};

#[derive(clap::Args)]
pub struct IntradayCommand {
    #[arg(help = "Stock symbol, e.g. AAPL")]
    symbol: String,

    #[arg(
        short = 'i',
        long = "interval",
        default_value = DEFAULT_INTRADAY_INTERVAL,
        help = "Bar interval: 1min, 5min, 15min, 30min or 60min"
    )]
    interval: String,
}

impl IntradayCommand {
    pub async fn exec(&self) {
        let Some(backend) = backend() else {
            return;
        };

        let symbol = self.symbol.trim().to_uppercase();

        let spinner = spinner("Fetching intraday data");
        let result = backend.intraday(&symbol, Some(&self.interval)).await;
        spinner.finish_and_clear();

        match result {
            Ok(series) => {
                let mut table_data =
                    vec![header(&["Time", "Open", "High", "Low", "Close", "Volume"])];
                for p in &series.data {
                    table_data.push(vec![
                        fmt_text(p.timestamp.as_deref()),
                        fmt_price(p.open),
                        fmt_price(p.high),
                        fmt_price(p.low),
                        fmt_price(p.close),
                        fmt_large_number(p.volume),
                    ]);
                }

                let interval = series.interval.as_deref().unwrap_or(&self.interval);
                print_rows(Some(&format!("{symbol} ({interval})")), table_data);
            }
            Err(err) => {
                print_error(err.message_or(fallback::INTRADAY));
            }
        }
    }
}
