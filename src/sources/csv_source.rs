use crate::domain::model::{MerchantId, Order, OrderId};
use crate::domain::ports::OrderSource;
use crate::utils::error::{PackerError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Deserialize)]
struct OrderRow {
    id: OrderId,
    amount: String,
    merchant_id: MerchantId,
}

/// Orders read from a headed CSV file with columns `id,amount,merchant_id`.
#[derive(Debug, Clone)]
pub struct CsvOrderSource {
    path: PathBuf,
}

impl CsvOrderSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn parse<R: std::io::Read>(reader: R) -> Result<Vec<Order>> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut orders = Vec::new();
        let mut seen = HashSet::new();

        for (index, row) in reader.deserialize::<OrderRow>().enumerate() {
            let row = row?;
            // header is line 1
            let line = index as u64 + 2;

            let amount = Decimal::from_str(&row.amount).map_err(|e| {
                PackerError::InvalidOrderError {
                    line,
                    reason: format!("amount '{}' is not a decimal: {}", row.amount, e),
                }
            })?;
            if amount <= Decimal::ZERO {
                return Err(PackerError::InvalidOrderError {
                    line,
                    reason: format!("amount {} must be positive", amount),
                });
            }
            if amount.normalize().scale() > 2 {
                return Err(PackerError::InvalidOrderError {
                    line,
                    reason: format!("amount {} has more than two decimal places", amount),
                });
            }
            if !seen.insert(row.id) {
                return Err(PackerError::InvalidOrderError {
                    line,
                    reason: format!("duplicate order id {}", row.id),
                });
            }

            orders.push(Order::new(row.id, amount, row.merchant_id));
        }

        if orders.is_empty() {
            return Err(PackerError::EmptyInputError);
        }
        Ok(orders)
    }
}

impl OrderSource for CsvOrderSource {
    fn load(&self) -> Result<Vec<Order>> {
        let file = std::fs::File::open(&self.path)?;
        let orders = Self::parse(std::io::BufReader::new(file))?;
        tracing::info!("Read {} orders from {}", orders.len(), self.path.display());
        Ok(orders)
    }

    fn describe(&self) -> String {
        format!("CSV file {}", self.path.display())
    }
}
