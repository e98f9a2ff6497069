//! Shared simulation bus
//!
//! The vehicle side writes wheel geometry, slip and load into [`SimState`];
//! mechanics models read it back and publish their reactions on the same bus.

mod traits;

pub use traits::*;
