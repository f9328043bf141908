use serde::Serialize;

use crate::models::{Signal, Status};

/// Headline counts for the KPI row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SignalCounts {
    pub total: usize,
    pub pending: usize,
    pub active: usize,
}

/// One point of the price-level overview chart. Unavailable fields are
/// projected to 0.0 here; this shape is for plotting only and loses the
/// unavailable-vs-zero distinction on purpose.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub name: String,
    #[serde(rename = "Entry")]
    pub entry: f64,
    #[serde(rename = "TakeProfit1")]
    pub take_profit_1: f64,
    #[serde(rename = "TakeProfit2")]
    pub take_profit_2: f64,
    #[serde(rename = "StopLoss")]
    pub stop_loss: f64,
}

pub fn summarize(signals: &[Signal]) -> SignalCounts {
    SignalCounts {
        total: signals.len(),
        pending: signals.iter().filter(|s| s.status == Status::Pending).count(),
        active: signals.iter().filter(|s| s.status == Status::Active).count(),
    }
}

pub fn chart_series(signals: &[Signal]) -> Vec<ChartPoint> {
    signals
        .iter()
        .map(|s| ChartPoint {
            name: s.symbol_label().to_string(),
            entry: s.entry.or_zero(),
            take_profit_1: s.tp1.or_zero(),
            take_profit_2: s.tp2.or_zero(),
            stop_loss: s.sl.or_zero(),
        })
        .collect()
}
