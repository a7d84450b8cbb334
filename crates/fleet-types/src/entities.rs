//! # Fleet Entities
//!
//! The unit roster as delivered by the upstream feed.
//!
//! ## Clusters
//!
//! - **Identity**: `UnitId`
//! - **Position**: `Coordinates`
//! - **Roster**: `Unit`, `UnitStatus`

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

// =============================================================================
// IDENTITY
// =============================================================================

/// Stable identifier of a tracked unit (e.g. `ALFA-01`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(pub String);

impl UnitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short marker badge: the id prefix before the first `-`.
    pub fn badge(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UnitId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for UnitId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// =============================================================================
// POSITION
// =============================================================================

/// A WGS84 position. Serialized as `[lon, lat]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinates {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Check that the position is finite and inside WGS84 bounds.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.lon.is_finite() || !self.lat.is_finite() {
            return Err(ValidationError::NonFiniteCoordinates {
                lon: self.lon,
                lat: self.lat,
            });
        }
        if !(-180.0..=180.0).contains(&self.lon) {
            return Err(ValidationError::LongitudeOutOfRange(self.lon));
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(ValidationError::LatitudeOutOfRange(self.lat));
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self { lon, lat }
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(c: Coordinates) -> Self {
        [c.lon, c.lat]
    }
}

impl From<(f64, f64)> for Coordinates {
    fn from((lon, lat): (f64, f64)) -> Self {
        Self { lon, lat }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lon, self.lat)
    }
}

// =============================================================================
// ROSTER
// =============================================================================

/// Operational status of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitStatus {
    /// Free at base or on the road, can take a call.
    Available,
    /// Moving to an incident or to a destination hospital.
    EnRoute,
    /// Attending an incident.
    OnScene,
    /// Out of service (maintenance, crew change).
    Unavailable,
}

impl UnitStatus {
    /// Human-readable status used in popups.
    pub fn label(&self) -> &'static str {
        match self {
            UnitStatus::Available => "available",
            UnitStatus::EnRoute => "en route",
            UnitStatus::OnScene => "on scene",
            UnitStatus::Unavailable => "unavailable",
        }
    }
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A tracked mobile unit (ambulance) as reported by the roster feed.
///
/// `coordinates` is optional because the feed may deliver a unit whose
/// position fix was lost; such units are skipped by the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: UnitId,
    #[serde(alias = "name")]
    pub label: String,
    pub status: UnitStatus,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    /// Pre-rendered freshness label from the feed (e.g. `18s ago`).
    #[serde(default)]
    pub last_update: String,
}

impl Unit {
    pub fn new(id: impl Into<UnitId>, label: impl Into<String>, status: UnitStatus) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            status,
            coordinates: None,
            destination: None,
            last_update: String::new(),
        }
    }

    pub fn at(mut self, lon: f64, lat: f64) -> Self {
        self.coordinates = Some(Coordinates::new(lon, lat));
        self
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn updated(mut self, last_update: impl Into<String>) -> Self {
        self.last_update = last_update.into();
        self
    }

    /// Position of the unit, if present and valid.
    pub fn position(&self) -> Result<Coordinates, ValidationError> {
        let coordinates = self.coordinates.ok_or(ValidationError::MissingCoordinates)?;
        coordinates.validate()?;
        Ok(coordinates)
    }
}

/// Decode a roster snapshot from JSON.
pub fn roster_from_json(json: &str) -> Result<Vec<Unit>, ValidationError> {
    serde_json::from_str(json).map_err(|e| ValidationError::Decode(e.to_string()))
}
