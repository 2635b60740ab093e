//! Tally Testing Infrastructure
//!
//! Shared helpers for the integration tests of Tally crates: an audit sink that
//! records what it receives, origin proofs that always pass or always fail, a
//! registry fixture and proptest strategies.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
//!
//! # Usage
//!
//! Add this to your crate's `Cargo.toml` dev-dependencies:
//! ```toml
//! [dev-dependencies]
//! tally-testkit = { path = "../tally-testkit" }
//! ```
//!
//! Then in your tests:
//! ```rust,no_run
//! use tally_testkit::*;
//!
//! #[test]
//! fn my_test() {
//!     struct Badge;
//!     let fixture = SupplyFixture::new();
//!     let badges = fixture.create::<Badge>(tally_supply::SupplyOptions::capped(3));
//!     // ... test logic
//! }
//! ```

pub mod fixtures;
pub mod origin;
pub mod sinks;
pub mod strategies;

pub use fixtures::*;
pub use origin::*;
pub use sinks::*;

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Install a test-friendly `tracing` subscriber once per process.
///
/// Honors `RUST_LOG`; defaults to `tally=debug`. Output goes through the test
/// writer so it is captured per test.
pub fn init_test_tracing() {
    TRACING.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tally=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
