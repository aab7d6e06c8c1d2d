//! # Ports Layer (Middle Hexagon)
//!
//! Trait definitions between the group-buy core and the host.
//!
//! - **Driving Port (Inbound)**: `GroupBuyApi`
//! - **Driven Port (Outbound)**: `Bank`
//! - No concrete implementations in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
