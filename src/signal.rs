use crate::model::TechnicalIndicatorSeries;

pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const RSI_OVERSOLD: f64 = 30.0;
pub const STOCH_OVERBOUGHT: f64 = 80.0;
pub const STOCH_OVERSOLD: f64 = 20.0;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, strum::Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum IndicatorSignal {
    Buy,
    Sell,
    #[default]
    Neutral,
}

/// Labels the latest point of `series`; moving averages compare against `price`.
pub fn indicator_signal(series: &TechnicalIndicatorSeries, price: Option<f64>) -> IndicatorSignal {
    let Some(indicator) = series.indicator.as_deref() else {
        return IndicatorSignal::Neutral;
    };

    match indicator {
        "RSI" => match series.latest_value() {
            Some(rsi) if rsi > RSI_OVERBOUGHT => IndicatorSignal::Sell,
            Some(rsi) if rsi < RSI_OVERSOLD => IndicatorSignal::Buy,
            _ => IndicatorSignal::Neutral,
        },
        "SMA" | "EMA" | "WMA" | "DEMA" | "TEMA" => {
            match (price, series.latest_value()) {
                (Some(price), Some(average)) if price > average => IndicatorSignal::Buy,
                (Some(price), Some(average)) if price < average => IndicatorSignal::Sell,
                _ => IndicatorSignal::Neutral,
            }
        }
        "MACD" => match (
            series.latest_field("MACD"),
            series.latest_field("MACD_Signal"),
        ) {
            (Some(macd), Some(signal)) if macd > signal => IndicatorSignal::Buy,
            (Some(macd), Some(signal)) if macd < signal => IndicatorSignal::Sell,
            _ => IndicatorSignal::Neutral,
        },
        "STOCH" => match series.latest_field("SlowK") {
            Some(k) if k > STOCH_OVERBOUGHT => IndicatorSignal::Sell,
            Some(k) if k < STOCH_OVERSOLD => IndicatorSignal::Buy,
            _ => IndicatorSignal::Neutral,
        },
        _ => IndicatorSignal::Neutral,
    }
}
