//! # Fleet Map Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Shared rosters, configs, and engine setup
//! ├── integration/      # End-to-end engine scenarios on the headless backend
//! └── properties/       # proptest properties over random roster sequences
//!
//! tests/benches/
//! └── reconcile_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p fm-tests
//!
//! # By category
//! cargo test -p fm-tests integration::
//! cargo test -p fm-tests properties::
//!
//! # Benchmarks
//! cargo bench -p fm-tests
//! ```

pub mod fixtures;
pub mod integration;
pub mod properties;
