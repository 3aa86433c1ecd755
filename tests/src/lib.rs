//! # Ledger-Proxy Test Suite
//!
//! Unified test crate for cross-subsystem flows:
//!
//! ```text
//! tests/src/
//! └── integration/      # Admission → scheduling choreography
//!     ├── admission_flow.rs
//!     └── scheduling_flow.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p lp-tests
//! cargo test -p lp-tests integration::
//! ```

#![allow(dead_code)]
