//! Inventory Cache Test Suite
//!
//! End-to-end tests of the public `boxcache` API, grouped by area:
//!
//! - **identity**: business-key identity, composite keys, passthrough
//! - **box_list**: paginated box lists per base
//! - **local_fields**: client-only scanned boxes
//! - **preferences**: reactive UI state
//! - **client**: fetch policies, errors, out-of-order completion
//! - **snapshots**: extract/restore and garbage collection
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test inventory_cache
//! ```

mod test_utils;

mod box_list;
mod client;
mod identity;
mod local_fields;
mod preferences;
mod snapshots;
