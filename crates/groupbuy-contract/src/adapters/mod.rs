//! # Adapters Layer (Outer Hexagon)
//!
//! Adapters connect the group-buy core to the host.
//!
//! - `bank` - In-memory implementation of the `Bank` port
//! - `codec` - JSON encoding of boundary messages

pub mod bank;
pub mod codec;

pub use bank::*;
pub use codec::*;
