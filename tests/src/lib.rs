//! # Multi-Resource Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── resource_flows.rs   # Catalog -> token -> render scenarios
//!     └── concurrency.rs      # Many threads against one ledger
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p qc-tests
//! cargo test -p qc-tests integration::concurrency
//! ```

#![allow(unused_variables)]
#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;
