pub mod allocator;
pub mod balancer;
pub mod engine;
pub mod packer;
pub mod residual_index;

pub use allocator::{allocate, Allocation};
pub use balancer::{balance, BalancingPolicy};
pub use engine::{AllocationEngine, DryRun};
pub use packer::{pack, PackOutcome, SlotPlan};
