//! Map sync engine configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use fm_map_sync::domain::MapSyncConfigBuilder;
//!
//! let config = MapSyncConfigBuilder::new()
//!     .heatmap_radius(30.0)
//!     .popup_offset(16)
//!     .build()
//!     .expect("Valid config");
//! ```

use serde::{Deserialize, Serialize};

use crate::error::MapSyncError;

/// Default map style
pub const DEFAULT_STYLE_URL: &str = "mapbox://styles/mapbox/dark-v11";

/// Upper bound for the heatmap kernel radius in pixels
pub const MAX_HEATMAP_RADIUS: f64 = 200.0;

/// Upper bound for heatmap intensity
pub const MAX_HEATMAP_INTENSITY: f64 = 5.0;

/// Engine tuning for the live fleet map
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapSyncConfig {
    /// Map style URL passed to the backend
    pub style_url: String,
    /// Require modifier keys for scroll zoom
    pub cooperative_gestures: bool,
    /// Popup offset from the marker anchor, in pixels
    pub popup_offset_px: u16,
    /// Heatmap kernel radius, in pixels
    pub heatmap_radius: f64,
    /// Heatmap intensity multiplier
    pub heatmap_intensity: f64,
    /// Add a fullscreen control to the surface
    pub fullscreen_control: bool,
    /// Add a zoom/rotate control to the surface
    pub navigation_control: bool,
    /// Show pitch on the navigation control compass
    pub visualize_pitch: bool,
}

impl Default for MapSyncConfig {
    fn default() -> Self {
        Self {
            style_url: DEFAULT_STYLE_URL.to_string(),
            cooperative_gestures: true,
            popup_offset_px: 12,
            heatmap_radius: 40.0,
            heatmap_intensity: 0.8,
            fullscreen_control: true,
            navigation_control: true,
            visualize_pitch: true,
        }
    }
}

impl MapSyncConfig {
    pub fn validate(&self) -> Result<(), MapSyncError> {
        if self.style_url.trim().is_empty() {
            return Err(MapSyncError::InvalidConfig(
                "style_url cannot be empty".to_string(),
            ));
        }

        if !self.heatmap_radius.is_finite()
            || self.heatmap_radius <= 0.0
            || self.heatmap_radius > MAX_HEATMAP_RADIUS
        {
            return Err(MapSyncError::InvalidConfig(format!(
                "heatmap_radius must be in (0, {}], got {}",
                MAX_HEATMAP_RADIUS, self.heatmap_radius
            )));
        }

        if !self.heatmap_intensity.is_finite()
            || self.heatmap_intensity <= 0.0
            || self.heatmap_intensity > MAX_HEATMAP_INTENSITY
        {
            return Err(MapSyncError::InvalidConfig(format!(
                "heatmap_intensity must be in (0, {}], got {}",
                MAX_HEATMAP_INTENSITY, self.heatmap_intensity
            )));
        }

        Ok(())
    }
}

/// Builder for MapSyncConfig with validation
#[derive(Default)]
pub struct MapSyncConfigBuilder {
    style_url: Option<String>,
    cooperative_gestures: Option<bool>,
    popup_offset_px: Option<u16>,
    heatmap_radius: Option<f64>,
    heatmap_intensity: Option<f64>,
    fullscreen_control: Option<bool>,
    navigation_control: Option<bool>,
}

impl MapSyncConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn style_url(mut self, url: impl Into<String>) -> Self {
        self.style_url = Some(url.into());
        self
    }

    pub fn cooperative_gestures(mut self, enabled: bool) -> Self {
        self.cooperative_gestures = Some(enabled);
        self
    }

    pub fn popup_offset(mut self, px: u16) -> Self {
        self.popup_offset_px = Some(px);
        self
    }

    pub fn heatmap_radius(mut self, px: f64) -> Self {
        self.heatmap_radius = Some(px);
        self
    }

    pub fn heatmap_intensity(mut self, intensity: f64) -> Self {
        self.heatmap_intensity = Some(intensity);
        self
    }

    pub fn fullscreen_control(mut self, enabled: bool) -> Self {
        self.fullscreen_control = Some(enabled);
        self
    }

    pub fn navigation_control(mut self, enabled: bool) -> Self {
        self.navigation_control = Some(enabled);
        self
    }

    /// Build the config, validating all parameters
    pub fn build(self) -> Result<MapSyncConfig, MapSyncError> {
        let defaults = MapSyncConfig::default();

        let config = MapSyncConfig {
            style_url: self.style_url.unwrap_or(defaults.style_url),
            cooperative_gestures: self
                .cooperative_gestures
                .unwrap_or(defaults.cooperative_gestures),
            popup_offset_px: self.popup_offset_px.unwrap_or(defaults.popup_offset_px),
            heatmap_radius: self.heatmap_radius.unwrap_or(defaults.heatmap_radius),
            heatmap_intensity: self.heatmap_intensity.unwrap_or(defaults.heatmap_intensity),
            fullscreen_control: self
                .fullscreen_control
                .unwrap_or(defaults.fullscreen_control),
            navigation_control: self
                .navigation_control
                .unwrap_or(defaults.navigation_control),
            visualize_pitch: defaults.visualize_pitch,
        };

        config.validate()?;
        Ok(config)
    }
}
