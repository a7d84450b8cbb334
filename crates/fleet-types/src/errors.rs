//! # Error Types
//!
//! Validation errors for feed and configuration data.

use thiserror::Error;

/// A roster or configuration value failed validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Unit was delivered without a position.
    #[error("Missing coordinates")]
    MissingCoordinates,

    /// Longitude or latitude is NaN or infinite.
    #[error("Non-finite coordinates: ({lon}, {lat})")]
    NonFiniteCoordinates { lon: f64, lat: f64 },

    /// Longitude outside [-180, 180].
    #[error("Longitude out of range: {0}")]
    LongitudeOutOfRange(f64),

    /// Latitude outside [-90, 90].
    #[error("Latitude out of range: {0}")]
    LatitudeOutOfRange(f64),

    /// Zoom level outside the engine's supported range.
    #[error("Zoom out of range: {zoom} (must be between {min} and {max})")]
    ZoomOutOfRange { zoom: f64, min: f64, max: f64 },

    /// Malformed JSON input.
    #[error("Decode error: {0}")]
    Decode(String),
}
