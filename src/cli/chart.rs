use eframe::egui;
use stockview::{
    VERSION,
    api::{DEFAULT_PERIOD, fallback},
    gui::chart_viewer::ChartViewer,
    model::ModelType,
    view::chart::{StockChart, TimeRange},
};

use crate::cli::{backend, print_error, spinner};

#[derive(clap::Args)]
pub struct ChartCommand {
    #[arg(help = "Stock symbol, e.g. AAPL")]
    symbol: String,

    #[arg(
        short = 'm',
        long = "model",
        default_value_t = ModelType::default(),
        help = "Model type used for predictions: lstm, attention or ensemble"
    )]
    model: ModelType,

    #[arg(long = "predict", help = "Overlay price predictions on open")]
    predict: bool,

    #[arg(
        short = 'r',
        long = "range",
        default_value_t = TimeRange::default(),
        help = "Initial time range: 1M, 3M, 6M, 1Y or 2Y"
    )]
    range: TimeRange,
}

impl ChartCommand {
    pub async fn exec(&self) {
        let Some(backend) = backend() else {
            return;
        };

        let symbol = self.symbol.trim().to_uppercase();

        let spinner = spinner("Fetching history");
        let result = backend.stock_data(&symbol, Some(DEFAULT_PERIOD)).await;
        spinner.finish_and_clear();

        let data = match result {
            Ok(data) => data,
            Err(err) => {
                print_error(err.message_or(fallback::STOCK_DATA));
                return;
            }
        };

        let mut chart = StockChart::new(backend);
        chart.set_model(self.model);
        chart.set_range(self.range);
        chart.set_data(data);
        chart.set_show_predictions(self.predict);

        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 720.0]),
            ..Default::default()
        };

        if let Err(err) = eframe::run_native(
            &format!("Stockview {symbol} {VERSION}"),
            options,
            Box::new(|cc| Ok(Box::new(ChartViewer::new(cc, chart)))),
        ) {
            print_error(err);
        }
    }
}
