//! Least-squares fit of price against raw prediction and sentiment.
//!
//! Produces the weights of `price ≈ alpha*raw + beta*normalized_sentiment +
//! intercept`, where sentiment is min-max normalized across the sample. The
//! fit runs on mean-centered columns and takes the minimum-norm solution, so
//! a column that never varies gets a weight of 0.0 instead of failing.

use market_core::CombinedRecord;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Fewest records a fit is attempted on
pub const MIN_SAMPLES: usize = 2;

/// Singular values below this are treated as zero
const SINGULAR_EPS: f64 = 1e-9;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalibrationError {
    #[error("need at least {needed} records, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("regression is degenerate: {0}")]
    Degenerate(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CalibrationReport {
    /// Weight on raw prediction; 0.0 when raw predictions never vary
    pub alpha: f64,
    /// Weight on normalized sentiment; 0.0 when sentiment never varies
    pub beta: f64,
    pub intercept: f64,
    pub samples: usize,
}

/// Rescale to [0, 1]. A constant input maps to all zeros.
pub fn normalize_sentiment(values: &[f64]) -> Vec<f64> {
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if max > min {
        values.iter().map(|v| (v - min) / (max - min)).collect()
    } else {
        vec![0.0; values.len()]
    }
}

fn mean(values: impl Iterator<Item = f64>, n: usize) -> f64 {
    values.sum::<f64>() / n as f64
}

fn varies(mut values: impl Iterator<Item = f64>) -> bool {
    match values.next() {
        Some(first) => values.any(|v| v != first),
        None => false,
    }
}

pub fn calibrate(records: &[CombinedRecord]) -> Result<CalibrationReport, CalibrationError> {
    if records.len() < MIN_SAMPLES {
        return Err(CalibrationError::InsufficientData {
            needed: MIN_SAMPLES,
            got: records.len(),
        });
    }

    let n = records.len();
    let sentiment: Vec<f64> = records.iter().map(|r| r.sentiment).collect();
    let normalized = normalize_sentiment(&sentiment);

    let raw_mean = mean(records.iter().map(|r| r.raw_prediction), n);
    let sentiment_mean = mean(normalized.iter().cloned(), n);
    let price_mean = mean(records.iter().map(|r| r.price), n);

    // Columns: centered raw prediction, centered normalized sentiment
    let design = DMatrix::from_fn(n, 2, |i, j| match j {
        0 => records[i].raw_prediction - raw_mean,
        _ => normalized[i] - sentiment_mean,
    });
    let prices = DVector::from_iterator(n, records.iter().map(|r| r.price - price_mean));

    let solution = design
        .svd(true, true)
        .solve(&prices, SINGULAR_EPS)
        .map_err(|e| CalibrationError::Degenerate(e.to_string()))?;

    // Constant columns get a zero weight
    let alpha = if varies(records.iter().map(|r| r.raw_prediction)) { solution[0] } else { 0.0 };
    let beta = if varies(normalized.iter().cloned()) { solution[1] } else { 0.0 };
    if !alpha.is_finite() || !beta.is_finite() {
        return Err(CalibrationError::Degenerate("non-finite weights".to_string()));
    }

    let report = CalibrationReport {
        alpha,
        beta,
        intercept: price_mean - alpha * raw_mean - beta * sentiment_mean,
        samples: n,
    };

    tracing::debug!(
        alpha = report.alpha,
        beta = report.beta,
        intercept = report.intercept,
        samples = n,
        "calibrated fusion weights"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(day: u32, price: f64, raw: f64, sentiment: f64) -> CombinedRecord {
        CombinedRecord {
            date: NaiveDate::from_ymd_opt(2024, 4, day).unwrap(),
            price,
            symbol: "AAPL".to_string(),
            volume: 1,
            raw_prediction: raw,
            sentiment,
            final_prediction: 0.0,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_normalize_sentiment() {
        assert_eq!(normalize_sentiment(&[-1.0, 0.0, 1.0]), vec![0.0, 0.5, 1.0]);
        assert_eq!(normalize_sentiment(&[0.3, 0.3]), vec![0.0, 0.0]);
    }

    #[test]
    fn test_too_few_records() {
        let err = calibrate(&[record(1, 1.0, 1.0, 0.0)]).unwrap_err();
        assert_eq!(err, CalibrationError::InsufficientData { needed: 2, got: 1 });
    }

    #[test]
    fn test_recovers_exact_linear_relationship() {
        // price = 2*raw + 10*norm + 5, sentiment already spans [0, 1]
        let data = vec![
            record(1, 2.0 * 10.0 + 10.0 * 0.0 + 5.0, 10.0, 0.0),
            record(2, 2.0 * 12.0 + 10.0 * 1.0 + 5.0, 12.0, 1.0),
            record(3, 2.0 * 15.0 + 10.0 * 0.5 + 5.0, 15.0, 0.5),
            record(4, 2.0 * 11.0 + 10.0 * 0.25 + 5.0, 11.0, 0.25),
        ];
        let report = calibrate(&data).unwrap();
        assert!(approx(report.alpha, 2.0), "alpha was {}", report.alpha);
        assert!(approx(report.beta, 10.0), "beta was {}", report.beta);
        assert!(approx(report.intercept, 5.0), "intercept was {}", report.intercept);
        assert_eq!(report.samples, 4);
    }

    #[test]
    fn test_constant_sentiment_fits_without_beta() {
        let data = vec![
            record(1, 21.0, 10.0, 0.4),
            record(2, 25.0, 12.0, 0.4),
            record(3, 31.0, 15.0, 0.4),
        ];
        let report = calibrate(&data).unwrap();
        assert!(approx(report.alpha, 2.0));
        assert_eq!(report.beta, 0.0);
        assert!(approx(report.intercept, 1.0));
    }

    #[test]
    fn test_two_records_are_enough() {
        let data = vec![record(1, 21.0, 10.0, 0.1), record(2, 25.0, 12.0, 0.1)];
        let report = calibrate(&data).unwrap();
        assert!(approx(report.alpha, 2.0));
        assert!(approx(report.intercept, 1.0));
        assert_eq!(report.samples, 2);
    }

    #[test]
    fn test_constant_predictions_fit_without_alpha() {
        // price = 4*norm + 20 with raw fixed at 10
        let data = vec![
            record(1, 20.0, 10.0, -1.0),
            record(2, 24.0, 10.0, 1.0),
            record(3, 22.0, 10.0, 0.0),
        ];
        let report = calibrate(&data).unwrap();
        assert_eq!(report.alpha, 0.0);
        assert!(approx(report.beta, 4.0), "beta was {}", report.beta);
        assert!(approx(report.intercept, 20.0), "intercept was {}", report.intercept);
    }

    #[test]
    fn test_all_constant_inputs_fit_the_mean() {
        let data = vec![
            record(1, 20.0, 10.0, 0.4),
            record(2, 24.0, 10.0, 0.4),
            record(3, 31.0, 10.0, 0.4),
        ];
        let report = calibrate(&data).unwrap();
        assert_eq!(report.alpha, 0.0);
        assert_eq!(report.beta, 0.0);
        assert!(approx(report.intercept, 25.0));
    }
}
