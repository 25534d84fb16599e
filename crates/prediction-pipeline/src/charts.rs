//! Chart payloads for the dashboard.
//!
//! Every chart kind renders from the same combined records; the frontend only
//! draws what it gets.

use market_core::CombinedRecord;
use serde_json::{json, Value};

use crate::join::latest_sentiment;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Bar,
    Gauge,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::Gauge => "gauge",
        }
    }
}

pub trait ChartRenderer: Send + Sync {
    fn kind(&self) -> ChartKind;
    fn render(&self, records: &[CombinedRecord]) -> Value;
}

/// Price against the fused prediction over time
pub struct PriceLineChart;

impl ChartRenderer for PriceLineChart {
    fn kind(&self) -> ChartKind {
        ChartKind::Line
    }

    fn render(&self, records: &[CombinedRecord]) -> Value {
        let dates: Vec<String> = records.iter().map(|r| r.date.to_string()).collect();
        let price: Vec<f64> = records.iter().map(|r| r.price).collect();
        let predicted: Vec<f64> = records.iter().map(|r| r.final_prediction).collect();
        json!({
            "type": self.kind().as_str(),
            "labels": dates,
            "series": [
                { "name": "price", "values": price },
                { "name": "finalPrediction", "values": predicted },
            ],
        })
    }
}

/// Daily traded volume
pub struct VolumeBarChart;

impl ChartRenderer for VolumeBarChart {
    fn kind(&self) -> ChartKind {
        ChartKind::Bar
    }

    fn render(&self, records: &[CombinedRecord]) -> Value {
        let dates: Vec<String> = records.iter().map(|r| r.date.to_string()).collect();
        let volume: Vec<i64> = records.iter().map(|r| r.volume).collect();
        json!({
            "type": self.kind().as_str(),
            "labels": dates,
            "series": [{ "name": "volume", "values": volume }],
        })
    }
}

/// Most recent sentiment on a -1..1 dial
pub struct SentimentGauge;

impl ChartRenderer for SentimentGauge {
    fn kind(&self) -> ChartKind {
        ChartKind::Gauge
    }

    fn render(&self, records: &[CombinedRecord]) -> Value {
        json!({
            "type": self.kind().as_str(),
            "value": latest_sentiment(records),
            "min": -1.0,
            "max": 1.0,
        })
    }
}

/// Render every chart kind, keyed by kind name.
pub fn render_dashboard(records: &[CombinedRecord]) -> Value {
    let renderers: [&dyn ChartRenderer; 3] = [&PriceLineChart, &VolumeBarChart, &SentimentGauge];
    let mut charts = serde_json::Map::new();
    for renderer in renderers {
        charts.insert(renderer.kind().as_str().to_string(), renderer.render(records));
    }
    Value::Object(charts)
}
