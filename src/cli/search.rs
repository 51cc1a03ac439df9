use stockview::{api::fallback, utils::format::fmt_text};

use crate::cli::{backend, header, print_error, print_rows, spinner};

#[derive(clap::Args)]
pub struct SearchCommand {
    #[arg(help = "Symbol or company name, e.g. apple")]
    query: String,
}

impl SearchCommand {
    pub async fn exec(&self) {
        let Some(backend) = backend() else {
            return;
        };

        let spinner = spinner("Searching");
        let result = backend.search_stocks(self.query.trim()).await;
        spinner.finish_and_clear();

        match result {
            Ok(results) => {
                let mut table_data =
                    vec![header(&["Symbol", "Name", "Type", "Region", "Currency"])];
                for r in results {
                    table_data.push(vec![
                        fmt_text(r.symbol.as_deref()),
                        fmt_text(r.name.as_deref()),
                        fmt_text(r.kind.as_deref()),
                        fmt_text(r.region.as_deref()),
                        fmt_text(r.currency.as_deref()),
                    ]);
                }

                print_rows(None, table_data);
            }
            Err(err) => {
                print_error(err.message_or(fallback::SEARCH));
            }
        }
    }
}
