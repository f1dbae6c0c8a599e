use crate::config::GeneratorConfig;
use crate::domain::model::{Order, OrderId};
use crate::domain::ports::OrderSource;
use crate::utils::error::{PackerError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

const PROGRESS_EVERY: u32 = 100;

/// Synthetic orders: `orders_per_merchant` for each merchant, amounts uniform in cents
/// between `min_amount` and `max_amount`, ids sequential from 1.
#[derive(Debug, Clone)]
pub struct RandomOrderSource {
    config: GeneratorConfig,
}

impl RandomOrderSource {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    fn cents(field: &str, amount: Decimal) -> Result<i64> {
        (amount * Decimal::ONE_HUNDRED)
            .trunc()
            .to_i64()
            .ok_or_else(|| PackerError::GenerationError {
                message: format!("{} {} is out of range", field, amount),
            })
    }
}

impl OrderSource for RandomOrderSource {
    fn load(&self) -> Result<Vec<Order>> {
        let config = &self.config;
        let total = config
            .total_orders()
            .ok_or_else(|| PackerError::GenerationError {
                message: format!(
                    "{} merchants x {} orders overflows",
                    config.merchants, config.orders_per_merchant
                ),
            })?;

        let min_cents = Self::cents("min_amount", config.min_amount)?;
        let max_cents = Self::cents("max_amount", config.max_amount)?;
        if min_cents <= 0 || max_cents < min_cents {
            return Err(PackerError::GenerationError {
                message: format!(
                    "amount range {}..={} is empty",
                    config.min_amount, config.max_amount
                ),
            });
        }

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut orders = Vec::with_capacity(total);
        let mut next_id: OrderId = 1;

        for merchant_id in 1..=config.merchants {
            for _ in 0..config.orders_per_merchant {
                let amount = Decimal::new(rng.gen_range(min_cents..=max_cents), 2);
                orders.push(Order::new(next_id, amount, merchant_id));
                next_id += 1;
            }

            if merchant_id % PROGRESS_EVERY == 0 {
                tracing::info!(
                    "Generated {} orders for {} of {} merchants",
                    orders.len(),
                    merchant_id,
                    config.merchants
                );
            }
        }

        Ok(orders)
    }

    fn describe(&self) -> String {
        format!(
            "random generator ({} merchants x {} orders)",
            self.config.merchants, self.config.orders_per_merchant
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(seed: Option<u64>) -> GeneratorConfig {
        GeneratorConfig {
            merchants: 4,
            orders_per_merchant: 25,
            seed,
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn test_generates_expected_shape() {
        let orders = RandomOrderSource::new(small(Some(1))).load().unwrap();

        assert_eq!(orders.len(), 100);
        assert_eq!(orders.first().unwrap().id, 1);
        assert_eq!(orders.last().unwrap().id, 100);
        assert_eq!(orders[0].merchant_id, 1);
        assert_eq!(orders[99].merchant_id, 4);
        assert!(orders[25..50].iter().all(|o| o.merchant_id == 2));
    }

    #[test]
    fn test_amounts_stay_in_range_with_two_decimals() {
        let orders = RandomOrderSource::new(small(Some(2))).load().unwrap();
        for order in orders {
            assert!(order.amount >= Decimal::new(10_00, 2));
            assert!(order.amount <= Decimal::new(999_99, 2));
            assert!(order.amount.scale() <= 2);
        }
    }

    #[test]
    fn test_seed_makes_runs_reproducible() {
        let a = RandomOrderSource::new(small(Some(42))).load().unwrap();
        let b = RandomOrderSource::new(small(Some(42))).load().unwrap();
        let c = RandomOrderSource::new(small(Some(43))).load().unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_fixed_amount_range() {
        let config = GeneratorConfig {
            min_amount: Decimal::new(5, 0),
            max_amount: Decimal::new(5, 0),
            ..small(None)
        };
        let orders = RandomOrderSource::new(config).load().unwrap();
        assert!(orders.iter().all(|o| o.amount == Decimal::new(5, 0)));
    }

    #[test]
    fn test_empty_amount_range_is_generation_error() {
        let config = GeneratorConfig {
            min_amount: Decimal::new(1, 3),
            max_amount: Decimal::new(1, 3),
            ..small(Some(1))
        };
        let err = RandomOrderSource::new(config).load().unwrap_err();
        assert!(matches!(err, PackerError::GenerationError { .. }));
    }
}
