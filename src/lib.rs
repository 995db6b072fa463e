//! Spot allocation for a multi-storey car park.
//!
//! [`allocation::allocate`] is a pure function over a snapshot of spots. The
//! [`facility::Facility`] owns the [`inventory::Inventory`] and applies each
//! decision, so selecting a spot and occupying it cannot interleave.

pub mod allocation;
pub mod facility;
pub mod inventory;
pub mod spot;
pub mod stats;
pub mod time;
pub mod vehicle;
pub mod wire;
