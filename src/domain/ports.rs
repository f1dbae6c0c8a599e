use crate::domain::model::Order;
use crate::utils::error::Result;

/// Anything that can hand the allocator its full, materialized order set.
pub trait OrderSource {
    fn load(&self) -> Result<Vec<Order>>;

    /// Short label used in logs and the report header.
    fn describe(&self) -> String;
}
