//! # Integration Tests
//!
//! Drive the full engine (lifecycle, reconciler, overlays, selection) against
//! the headless backend and check what ends up on the surface.

pub mod overlays;
pub mod scenarios;
pub mod selection;
