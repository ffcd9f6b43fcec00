//! # Integration Tests
//!
//! Flows that cross the catalog, access control and ledger through the
//! public service API.

pub mod concurrency;
pub mod resource_flows;
