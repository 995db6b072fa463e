//! Spot allocation: picks which free spot an incoming vehicle gets.

pub mod allocator;

pub use allocator::{AllocationResult, FailureReason, Policy, allocate};
