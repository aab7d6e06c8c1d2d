//! # Group-Buy Ledger Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── mod.rs         # Shared fixtures
//!     ├── flows.rs       # End-to-end flows through GroupBuyService
//!     └── properties.rs  # Property tests over random commitment sequences
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p groupbuy-tests
//! cargo test -p groupbuy-tests integration::properties::
//! ```

#![allow(dead_code)]

pub mod integration;
