//! Shared fixtures for the fleet map test suite.

use fleet_types::{Coordinates, LayerKind, MapConfig, OverlayLayerSpec, Unit, UnitStatus};
use fm_map_sync::{HeadlessScene, HeadlessSurfaceFactory, MapSyncApi, MapSyncService};

/// Florianópolis, where the dashboard's default viewport is centered.
pub const CENTER: Coordinates = Coordinates::new(-48.548, -27.594);

pub type HeadlessService = MapSyncService<HeadlessSurfaceFactory>;

pub fn unit(id: &str, lon: f64, lat: f64) -> Unit {
    Unit::new(id, format!("Unit {}", id), UnitStatus::Available).at(lon, lat)
}

/// A unit whose position fix was lost.
pub fn unit_without_fix(id: &str) -> Unit {
    Unit::new(id, format!("Unit {}", id), UnitStatus::Unavailable)
}

/// `n` valid units spread around the default center.
pub fn fleet(n: usize) -> Vec<Unit> {
    let statuses = [
        UnitStatus::Available,
        UnitStatus::EnRoute,
        UnitStatus::OnScene,
        UnitStatus::Unavailable,
    ];
    (0..n)
        .map(|i| {
            let offset = i as f64 * 0.001;
            Unit::new(
                format!("UNIT-{:04}", i),
                format!("Ambulance {}", i),
                statuses[i % statuses.len()],
            )
            .at(CENTER.lon + offset, CENTER.lat - offset)
            .updated(format!("{}s ago", i % 60))
        })
        .collect()
}

/// Mount configuration with a demand heatmap and a legend-only geofence.
pub fn map_config() -> MapConfig {
    MapConfig::new(CENTER, 10.0)
        .with_credential("pk.fleet-test")
        .with_layer(
            OverlayLayerSpec::heatmap("heat-demand", "#ef4444")
                .with_description("Demand over the last 24h"),
        )
        .with_layer(OverlayLayerSpec {
            id: "geofence-floripa".to_string(),
            kind: LayerKind::Geofence,
            color: "#22c55e".to_string(),
            description: "Contract perimeter".to_string(),
        })
}

/// Engine initialized and signalled ready on a fresh headless backend.
pub fn ready_service() -> (HeadlessService, HeadlessScene) {
    let factory = HeadlessSurfaceFactory::new();
    let scene = factory.scene();
    let mut service = MapSyncService::new(factory);
    service.initialize(map_config());
    service.surface_ready();
    (service, scene)
}
