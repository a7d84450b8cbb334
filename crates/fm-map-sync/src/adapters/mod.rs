//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements the outbound surface ports. Browser or native map engines
//! live in the hosting application; this crate ships the headless backend
//! used by the replay runtime and the test suite.

mod headless;

pub use headless::{
    HeadlessMarker, HeadlessScene, HeadlessSurface, HeadlessSurfaceFactory, MarkerRecord,
};
