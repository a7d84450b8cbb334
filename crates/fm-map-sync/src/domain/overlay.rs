//! Overlay layer definitions and derived density data

use std::collections::HashSet;

use fleet_types::{Coordinates, LayerKind, OverlayLayerSpec, Unit, UnitId};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::domain::config::MapSyncConfig;

/// Source and layer id used on the surface for a configured layer.
pub fn surface_id(layer_id: &str) -> String {
    format!("layer-{}", layer_id)
}

/// One stop of the density colour ramp.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub density: f64,
    pub color: String,
}

/// Heatmap paint parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeatmapPaint {
    /// Linear interpolation over heatmap density in [0, 1]
    pub color_ramp: Vec<ColorStop>,
    pub radius: f64,
    pub intensity: f64,
}

impl HeatmapPaint {
    /// Transparent blue at zero density, the layer colour at half, red at full.
    pub fn new(mid_color: &str, radius: f64, intensity: f64) -> Self {
        Self {
            color_ramp: vec![
                ColorStop {
                    density: 0.0,
                    color: "rgba(59,130,246,0)".to_string(),
                },
                ColorStop {
                    density: 0.5,
                    color: mid_color.to_string(),
                },
                ColorStop {
                    density: 1.0,
                    color: "rgba(239,68,68,0.8)".to_string(),
                },
            ],
            radius,
            intensity,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PaintParameters {
    Heatmap(HeatmapPaint),
}

/// A layer materialized on a surface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverlayLayer {
    /// Surface-level layer id (`layer-<spec id>`)
    pub id: String,
    pub kind: LayerKind,
    /// Surface-level source id backing this layer
    pub source_ref: String,
    pub paint: PaintParameters,
}

impl OverlayLayer {
    /// Build the surface layer for a spec.
    ///
    /// Returns `None` for kinds that are only listed in the legend.
    pub fn from_spec(spec: &OverlayLayerSpec, config: &MapSyncConfig) -> Option<Self> {
        match spec.kind {
            LayerKind::Heatmap => {
                let id = surface_id(&spec.id);
                Some(Self {
                    source_ref: id.clone(),
                    id,
                    kind: LayerKind::Heatmap,
                    paint: PaintParameters::Heatmap(HeatmapPaint::new(
                        &spec.color,
                        config.heatmap_radius,
                        config.heatmap_intensity,
                    )),
                })
            }
            LayerKind::Geofence | LayerKind::Event => None,
        }
    }
}

/// Point cloud feeding a density layer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DensitySource {
    pub points: Vec<Coordinates>,
}

impl DensitySource {
    /// Collect valid unit positions. Only the first entry of a repeated id
    /// counts, matching the marker registry; units without a usable fix are
    /// left out.
    pub fn from_roster(roster: &[Unit]) -> Self {
        let mut seen: HashSet<&UnitId> = HashSet::with_capacity(roster.len());
        Self {
            points: roster
                .iter()
                .filter(|u| seen.insert(&u.id))
                .filter_map(|u| u.position().ok())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// GeoJSON `FeatureCollection` of points.
    pub fn to_geojson(&self) -> Value {
        let features: Vec<Value> = self
            .points
            .iter()
            .map(|p| {
                json!({
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [p.lon, p.lat] },
                    "properties": {}
                })
            })
            .collect();

        json!({ "type": "FeatureCollection", "features": features })
    }
}
