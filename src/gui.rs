use std::hash::{Hash, Hasher};

use eframe::egui;

pub mod chart_viewer;

/// Stable color per series name.
pub(crate) fn series_color(name: &str) -> egui::Color32 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    name.hash(&mut hasher);

    let hue = (hasher.finish() % 360) as f64;
    let (r, g, b) = hsv::hsv_to_rgb(hue, 0.8, 1.0);

    egui::Color32::from_rgb(r, g, b)
}
