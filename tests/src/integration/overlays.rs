//! # Overlay Integration
//!
//! Heatmap layers are created once per id, wait for the surface ready signal,
//! and follow the roster on every pass.

#[cfg(test)]
mod tests {
    use fleet_types::OverlayLayerSpec;
    use fm_map_sync::domain::PaintParameters;
    use fm_map_sync::{HeadlessSurfaceFactory, MapSyncApi, MapSyncService, OverlayOutcome};

    use crate::fixtures::{fleet, map_config, ready_service};

    #[test]
    fn test_repeated_ensure_yields_one_source_one_layer() {
        let (mut service, scene) = ready_service();
        let spec = OverlayLayerSpec::heatmap("heat-night", "#a855f7");

        let outcomes: Vec<_> = (0..5)
            .map(|_| service.ensure_overlay(&spec).unwrap())
            .collect();

        assert_eq!(outcomes[0], OverlayOutcome::Created);
        assert!(outcomes[1..]
            .iter()
            .all(|o| *o == OverlayOutcome::AlreadyPresent));
        assert!(scene.has_source("layer-heat-night"));
        assert!(scene.has_layer("layer-heat-night"));
        // Configured heat-demand plus heat-night
        assert_eq!(scene.source_count(), 2);
        assert_eq!(scene.layer_count(), 2);
    }

    #[test]
    fn test_requests_before_ready_are_deferred() {
        let factory = HeadlessSurfaceFactory::new();
        let scene = factory.scene();
        let mut service = MapSyncService::new(factory);
        service.initialize(map_config());

        let spec = OverlayLayerSpec::heatmap("heat-night", "#a855f7");
        assert_eq!(service.ensure_overlay(&spec), Ok(OverlayOutcome::Deferred));
        assert_eq!(service.ensure_overlay(&spec), Ok(OverlayOutcome::Deferred));
        service.reconcile(&fleet(4));
        assert_eq!(scene.layer_count(), 0);

        service.surface_ready();

        assert_eq!(scene.layer_count(), 2);
        assert_eq!(scene.source_points("layer-heat-night"), Some(4));
        assert_eq!(service.metrics().overlays_created, 2);
    }

    #[test]
    fn test_heatmap_paint_definition() {
        let (_service, scene) = ready_service();

        let layer = scene.layer("layer-heat-demand").unwrap();
        assert_eq!(layer.source_ref, "layer-heat-demand");
        let PaintParameters::Heatmap(paint) = layer.paint;
        assert_eq!(paint.radius, 40.0);
        assert_eq!(paint.intensity, 0.8);
        let ramp: Vec<_> = paint
            .color_ramp
            .iter()
            .map(|s| (s.density, s.color.as_str()))
            .collect();
        assert_eq!(
            ramp,
            vec![
                (0.0, "rgba(59,130,246,0)"),
                (0.5, "#ef4444"),
                (1.0, "rgba(239,68,68,0.8)"),
            ]
        );
    }

    #[test]
    fn test_geofence_is_legend_only() {
        let (service, scene) = ready_service();

        assert!(!scene.has_layer("layer-geofence-floripa"));
        let legend = service.legend();
        assert_eq!(legend.len(), 2);
        assert_eq!(legend[1].0, "geofence-floripa");
        assert_eq!(legend[1].1, "Contract perimeter");
    }

    #[test]
    fn test_density_recomputed_every_pass() {
        let (mut service, scene) = ready_service();

        service.reconcile(&fleet(12));
        assert_eq!(scene.source_points("layer-heat-demand"), Some(12));

        service.reconcile(&fleet(3));
        assert_eq!(scene.source_points("layer-heat-demand"), Some(3));
        assert_eq!(service.metrics().overlays_created, 1);
    }

    #[test]
    fn test_overlay_requests_after_dispose_are_ignored() {
        let (mut service, scene) = ready_service();
        service.dispose();

        let outcome = service.ensure_overlay(&OverlayLayerSpec::heatmap("late", "#fff"));

        assert_eq!(outcome, Ok(OverlayOutcome::Ignored));
        assert_eq!(scene.layer_count(), 0);
    }
}
