//! # Map Configuration
//!
//! Inputs supplied by the hosting dashboard when the map is mounted.

use std::env;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entities::Coordinates;
use crate::errors::ValidationError;

/// Environment variable consulted for the map engine credential.
pub const CREDENTIAL_ENV_VAR: &str = "FM_MAP_TOKEN";

/// Minimum zoom accepted by the map engine.
pub const MIN_ZOOM: f64 = 0.0;

/// Maximum zoom accepted by the map engine.
pub const MAX_ZOOM: f64 = 22.0;

/// Kind of a configured overlay layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    /// Density heatmap built from unit positions.
    Heatmap,
    /// Contract perimeter. Listed in the legend only.
    Geofence,
    /// Event coverage area. Listed in the legend only.
    Event,
}

/// A layer requested by the dashboard configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayLayerSpec {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    /// CSS colour used as the mid stop of the density ramp.
    pub color: String,
    #[serde(default)]
    pub description: String,
}

impl OverlayLayerSpec {
    pub fn heatmap(id: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: LayerKind::Heatmap,
            color: color.into(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Map mount configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    pub center: Coordinates,
    pub zoom: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
    #[serde(default)]
    pub layers: Vec<OverlayLayerSpec>,
}

impl MapConfig {
    pub fn new(center: Coordinates, zoom: f64) -> Self {
        Self {
            center,
            zoom,
            credential: None,
            layers: Vec::new(),
        }
    }

    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    pub fn with_layer(mut self, layer: OverlayLayerSpec) -> Self {
        self.layers.push(layer);
        self
    }

    /// Fill a missing credential from `FM_MAP_TOKEN`.
    ///
    /// An explicitly configured credential always wins.
    pub fn with_env_credential(mut self) -> Self {
        if self.credential.is_none() {
            if let Ok(token) = env::var(CREDENTIAL_ENV_VAR) {
                debug!(var = CREDENTIAL_ENV_VAR, "Map credential loaded from environment");
                self.credential = Some(token);
            }
        }
        self
    }

    /// Validate the initial viewport (center and zoom).
    pub fn validate_view(&self) -> Result<(), ValidationError> {
        self.center.validate()?;
        if !self.zoom.is_finite() || !(MIN_ZOOM..=MAX_ZOOM).contains(&self.zoom) {
            return Err(ValidationError::ZoomOutOfRange {
                zoom: self.zoom,
                min: MIN_ZOOM,
                max: MAX_ZOOM,
            });
        }
        Ok(())
    }

    /// Decode a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json).map_err(|e| ValidationError::Decode(e.to_string()))
    }
}
