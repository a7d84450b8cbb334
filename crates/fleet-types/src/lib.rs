//! # Fleet Types Crate
//!
//! Domain entities consumed by the live fleet map.
//!
//! ## Design Principles
//!
//! - **Feed-owned snapshots**: A [`Unit`] is produced by the upstream roster
//!   feed and treated as an immutable snapshot for one reconciliation pass.
//! - **GeoJSON ordering**: [`Coordinates`] serialize as `[lon, lat]`, the same
//!   ordering the map engine and GeoJSON sources use.
//! - **Validation at the edge**: Types can be decoded from untrusted JSON;
//!   validity is checked explicitly with `validate()` by the consumer.

pub mod entities;
pub mod errors;
pub mod map;

pub use entities::*;
pub use errors::*;
pub use map::*;
