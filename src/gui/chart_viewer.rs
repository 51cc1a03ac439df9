use std::time::Duration;

use chrono::{Days, NaiveDate};
use eframe::egui;
use egui_plot::{Corner, Legend, Line, Plot, Points};
use strum::IntoEnumIterator;

use crate::{
    gui::series_color,
    model::{HistoricalPoint, ModelType},
    utils::{
        datetime::{date_from_str, date_to_str},
        format::{fmt_percent, fmt_price},
    },
    view::chart::{StockChart, TimeRange},
};

const REPAINT_INTERVAL_MS: u64 = 200;

pub struct ChartViewer {
    chart: StockChart,

    plot_start_date: Option<NaiveDate>,
    warning_message: Option<String>,
}

impl ChartViewer {
    pub fn new(cc: &eframe::CreationContext, chart: StockChart) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        Self {
            chart,

            plot_start_date: None,
            warning_message: None,
        }
    }

    fn title(&self) -> String {
        self.chart
            .data()
            .map(|data| {
                let symbol = data.symbol.as_deref().unwrap_or_default();
                match data.name.as_deref() {
                    Some(name) => format!("{symbol} [{name}]"),
                    None => symbol.to_string(),
                }
            })
            .unwrap_or_default()
    }

    fn price_points(&self, points: &[HistoricalPoint]) -> Vec<[f64; 2]> {
        let Some(plot_start_date) = self.plot_start_date else {
            return vec![];
        };

        points
            .iter()
            .filter_map(|point| {
                let date = point.parsed_date()?;
                let close = point.close?;
                Some([(date - plot_start_date).num_days() as f64, close])
            })
            .collect()
    }

    fn prediction_points(&self) -> Vec<[f64; 2]> {
        let (Some(plot_start_date), Some(predictions)) =
            (self.plot_start_date, self.chart.predictions())
        else {
            return vec![];
        };

        predictions
            .predictions
            .iter()
            .filter_map(|p| {
                let date = date_from_str(p.date.as_deref()?).ok()?;
                let price = p.predicted_price?;
                Some([(date - plot_start_date).num_days() as f64, price])
            })
            .collect()
    }

    fn tools_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_centered(|ui| {
            for range in TimeRange::iter() {
                if ui
                    .selectable_label(self.chart.range() == range, range.to_string())
                    .clicked()
                {
                    self.chart.set_range(range);
                }
            }

            ui.separator();

            let mut show_predictions = self.chart.shows_predictions();
            if ui.checkbox(&mut show_predictions, "Predictions").changed() {
                self.chart.set_show_predictions(show_predictions);
            }

            let mut model = self.chart.model();
            egui::ComboBox::from_id_salt("model_type")
                .selected_text(model.title())
                .show_ui(ui, |ui| {
                    for m in ModelType::iter() {
                        ui.selectable_value(&mut model, m, m.title());
                    }
                });
            self.chart.set_model(model);

            if self.chart.is_loading_predictions() {
                ui.spinner();
            }
        });
    }

    fn status_ui(&self, ui: &mut egui::Ui) {
        ui.horizontal_centered(|ui| {
            ui.label(
                egui::RichText::new(format!(
                    "{}  {}",
                    self.title(),
                    fmt_price(self.chart.current_price())
                ))
                .color(egui::Color32::DARK_GRAY)
                .size(12.0),
            );

            if let Some(change) = self.chart.expected_change() {
                let color = if change >= 0.0 {
                    egui::Color32::DARK_GREEN
                } else {
                    egui::Color32::DARK_RED
                };
                ui.label(
                    egui::RichText::new(format!("30d {}", fmt_percent(Some(change))))
                        .color(color)
                        .size(12.0),
                );
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    egui::RichText::new(
                        self.warning_message
                            .as_ref()
                            .map(|t| format!("⚠ {t}"))
                            .unwrap_or_default(),
                    )
                    .color(egui::Color32::DARK_GRAY)
                    .size(12.0),
                );
            });
        });
    }
}

impl eframe::App for ChartViewer {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        self.chart.pump();
        if let Some(message) = self.chart.notices.take().pop() {
            self.warning_message = Some(message);
        }
        if self.chart.is_loading_predictions() {
            ctx.request_repaint_after(Duration::from_millis(REPAINT_INTERVAL_MS));
        }

        let visible = self.chart.visible_points();
        self.plot_start_date = visible.iter().filter_map(|p| p.parsed_date()).min();
        let price_points = self.price_points(&visible);
        let prediction_points = self.prediction_points();
        let symbol = self.title();

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::TopBottomPanel::top("tools_panel")
                .show_separator_line(false)
                .show_inside(ui, |ui| self.tools_ui(ui));

            egui::TopBottomPanel::bottom("status_panel")
                .show_separator_line(false)
                .show_inside(ui, |ui| self.status_ui(ui));

            egui::CentralPanel::default().show_inside(ui, |ui| {
                let plot_start_date = self.plot_start_date;
                let model = self.chart.model();

                Plot::new("plot")
                    .label_formatter(move |name, point| match plot_start_date {
                        Some(start) if !name.is_empty() && point.x >= 0.0 => format!(
                            "[{}] {} ${:.2}",
                            date_to_str(&(start + Days::new(point.x as u64))),
                            name,
                            point.y
                        ),
                        _ => "".to_string(),
                    })
                    .legend(Legend::default().position(Corner::LeftTop))
                    .show(ui, |plot_ui| {
                        if !price_points.is_empty() {
                            plot_ui.line(
                                Line::new(symbol.as_str(), price_points)
                                    .width(1.2)
                                    .color(series_color(&symbol)),
                            );
                        }

                        if !prediction_points.is_empty() {
                            let name = format!("{} prediction", model.title());
                            let color = series_color(&name);

                            plot_ui.line(
                                Line::new(name.as_str(), prediction_points.clone())
                                    .width(1.2)
                                    .color(color),
                            );
                            plot_ui.points(
                                Points::new(name.as_str(), prediction_points)
                                    .color(color)
                                    .radius(2.0),
                            );
                        }
                    });
            });
        });
    }
}
