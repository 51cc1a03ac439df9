use colored::Colorize;
use stockview::{
    signal::IndicatorSignal,
    utils::{
        datetime::{date_from_str, date_to_fiscal_quarter},
        format::{
            fmt_large_number, fmt_number, fmt_percent, fmt_price, fmt_ratio, fmt_signed, fmt_text,
        },
    },
    view::analysis::{RSI_PERIOD, SMA_PERIOD, StockAnalysis},
};

use crate::cli::{backend, header, print_error, print_pairs, print_rows, spinner};

static EARNINGS_QUARTERS_SHOWN: usize = 8;

#[derive(clap::Args)]
pub struct AnalyzeCommand {
    #[arg(help = "Stock symbol, e.g. AAPL")]
    symbol: String,
}

impl AnalyzeCommand {
    pub async fn exec(&self) {
        let Some(backend) = backend() else {
            return;
        };

        let mut analysis = StockAnalysis::new(backend);
        analysis.load(&self.symbol);

        let spinner = spinner("Analyzing");
        analysis.settle().await;
        spinner.finish_and_clear();

        for notice in analysis.notices.take() {
            print_error(notice);
        }

        let state = analysis.state();

        if let Some(overview) = &state.overview {
            print_pairs(
                Some(&fmt_text(overview.name.as_deref().or(state.symbol.as_deref()))),
                vec![
                    ("Exchange", fmt_text(overview.exchange.as_deref())),
                    ("Sector", fmt_text(overview.sector.as_deref())),
                    ("Industry", fmt_text(overview.industry.as_deref())),
                    ("Market Cap", fmt_large_number(overview.market_capitalization)),
                    ("P/E Ratio", fmt_number(overview.pe_ratio, 2)),
                    ("EPS", fmt_number(overview.eps, 2)),
                    ("Dividend Yield", fmt_ratio(overview.dividend_yield)),
                    ("Beta", fmt_number(overview.beta, 2)),
                    ("52 Week High", fmt_price(overview.week_52_high)),
                    ("52 Week Low", fmt_price(overview.week_52_low)),
                ],
            );
        }

        if let Some(quote) = &state.quote {
            print_pairs(
                Some("Quote"),
                vec![
                    ("Price", fmt_price(quote.price)),
                    ("Change", fmt_signed(quote.change)),
                    ("Change %", fmt_percent(quote.change_percent)),
                    ("Volume", fmt_large_number(quote.volume)),
                ],
            );
        }

        let mut table_data = vec![header(&["Indicator", "Value", "Signal"])];
        if let Some(rsi) = &state.rsi {
            table_data.push(vec![
                format!("RSI ({RSI_PERIOD})"),
                fmt_number(rsi.latest_value(), 2),
                colored_signal(state.rsi_signal()),
            ]);
        }
        if let Some(sma) = &state.sma {
            table_data.push(vec![
                format!("SMA ({SMA_PERIOD})"),
                fmt_price(sma.latest_value()),
                colored_signal(state.sma_signal()),
            ]);
        }
        print_rows(Some("Technical Indicators"), table_data);

        if let Some(earnings) = &state.earnings {
            let mut table_data = vec![header(&[
                "Quarter",
                "Reported",
                "EPS",
                "Estimated",
                "Surprise %",
            ])];
            for e in earnings
                .quarterly_earnings
                .iter()
                .take(EARNINGS_QUARTERS_SHOWN)
            {
                let quarter = e
                    .fiscal_date_ending
                    .as_deref()
                    .and_then(|s| date_from_str(s).ok())
                    .map(|d| date_to_fiscal_quarter(&d).to_string());

                table_data.push(vec![
                    fmt_text(quarter.as_deref()),
                    fmt_text(e.reported_date.as_deref()),
                    fmt_number(e.reported_eps, 2),
                    fmt_number(e.estimated_eps, 2),
                    fmt_percent(e.surprise_percentage),
                ]);
            }

            print_rows(Some("Quarterly Earnings"), table_data);
        }
    }
}

fn colored_signal(signal: IndicatorSignal) -> String {
    match signal {
        IndicatorSignal::Buy => signal.to_string().green().to_string(),
        IndicatorSignal::Sell => signal.to_string().red().to_string(),
        IndicatorSignal::Neutral => signal.to_string().bright_black().to_string(),
    }
}
