use crate::domain::model::Certificate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

/// Linear-interpolated percentile over an ascending slice. Empty input gives 0.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }

    let index = (sorted.len() - 1) as f64 * p / 100.0;
    let lower = index.floor();
    if index == lower {
        return sorted[index as usize];
    }

    let upper = index.ceil() as usize;
    let weight = index - lower;
    sorted[lower as usize] * (1.0 - weight) + sorted[upper] * weight
}

/// Amount distribution over a set of certificates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CertificateStats {
    pub count: usize,
    pub total_amount: Decimal,
    pub mean_amount: Decimal,
    pub min_amount: Decimal,
    pub max_amount: Decimal,
    /// `mean / limit * 100`
    pub fill_percentage: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
}

impl CertificateStats {
    pub fn from_certificates<'a>(
        certificates: impl IntoIterator<Item = &'a Certificate>,
        limit: Decimal,
    ) -> Self {
        let mut amounts: Vec<Decimal> = certificates.into_iter().map(|c| c.amount()).collect();
        amounts.sort();

        let count = amounts.len();
        let total_amount: Decimal = amounts.iter().sum();
        let mean_amount = if count == 0 {
            Decimal::ZERO
        } else {
            total_amount / Decimal::from(count)
        };
        let fill_percentage = if limit.is_zero() {
            0.0
        } else {
            (mean_amount / limit * Decimal::ONE_HUNDRED)
                .to_f64()
                .unwrap_or(0.0)
        };

        let as_f64: Vec<f64> = amounts.iter().map(|a| a.to_f64().unwrap_or(0.0)).collect();

        Self {
            count,
            total_amount,
            mean_amount,
            min_amount: amounts.first().copied().unwrap_or(Decimal::ZERO),
            max_amount: amounts.last().copied().unwrap_or(Decimal::ZERO),
            fill_percentage,
            p25: percentile(&as_f64, 25.0),
            p50: percentile(&as_f64, 50.0),
            p75: percentile(&as_f64, 75.0),
            p90: percentile(&as_f64, 90.0),
        }
    }
}
