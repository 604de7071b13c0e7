use super::*;
use crate::types::{SeriesPoint, XyPoint};
use crate::utils::{bucket_by_hour, fare_scatter};
use crate::types::TripRecord;

fn trip_volume(pickups: &[&str]) -> Chart {
    let trips: Vec<TripRecord> = pickups
        .iter()
        .map(|p| TripRecord {
            pickup_datetime: Some(p.to_string()),
            ..Default::default()
        })
        .collect();
    let hourly = bucket_by_hour(&trips, |t| t.pickup_datetime.as_deref());
    Chart::categories(
        "Trip Volume by Hour",
        ChartKind::Line,
        vec![Series::new("Trips", hourly, Mark::Line).with_unit("trips")],
    )
}

#[test]
fn test_renderer_selection() {
    assert_eq!(
        renderer_for(RendererKind::Library, ChartTheme::dark()).kind(),
        RendererKind::Library
    );
    assert_eq!(
        renderer_for(RendererKind::Canvas, ChartTheme::light()).kind(),
        RendererKind::Canvas
    );
}

#[test]
fn test_canvas_pipeline_through_surfaces() {
    let chart = trip_volume(&["2024-01-01T08:15:00", "2024-01-01T08:45:00", "2024-01-01T23:00:00"]);
    let mut renderer = renderer_for(RendererKind::Canvas, ChartTheme::dark());
    let mut surfaces = Surfaces::default();
    surfaces.attach(ChartTarget::TripVolume, 640, 320, 2.0);

    assert!(surfaces
        .draw(renderer.as_mut(), ChartTarget::TripVolume, &chart)
        .unwrap());
    let surface = surfaces.get(ChartTarget::TripVolume).unwrap();
    match surface.content() {
        SurfaceContent::Canvas(canvas) => {
            assert_eq!(canvas.backing_size(), (1280, 640));
            assert!(!canvas.ops().is_empty());
        }
        _ => panic!("canvas renderer must present a canvas"),
    }
}

#[test]
fn test_unregistered_target_is_skipped_by_both_renderers() {
    let chart = Chart::scatter("Distance vs Fare", vec![XyPoint { x: 1.0, y: 9.0 }]);
    let mut surfaces = Surfaces::default();
    for kind in [RendererKind::Library, RendererKind::Canvas] {
        let mut renderer = renderer_for(kind, ChartTheme::dark());
        let drawn = surfaces
            .draw(renderer.as_mut(), ChartTarget::DistanceFare, &chart)
            .unwrap();
        assert!(!drawn);
        assert!(renderer.tooltip(ChartTarget::DistanceFare, 0.0, 0.0).is_none());
    }
}

#[test]
fn test_theme_switch_changes_background() {
    let chart = Chart::categories(
        "Empty",
        ChartKind::Bar,
        vec![Series::new("Trips", Vec::<SeriesPoint>::new(), Mark::Bar)],
    );
    let mut renderer = renderer_for(RendererKind::Canvas, ChartTheme::dark());
    let mut surface = Surface::new(200, 100, 1.0);

    let background = |surface: &Surface| match surface.content() {
        SurfaceContent::Canvas(canvas) => canvas.ops().first().cloned(),
        _ => None,
    };

    renderer.render(ChartTarget::TripVolume, &mut surface, &chart).unwrap();
    let dark = background(&surface);
    renderer.set_theme(ChartTheme::light());
    renderer.render(ChartTarget::TripVolume, &mut surface, &chart).unwrap();
    let light = background(&surface);

    assert_ne!(dark, light);
    assert_eq!(surface.revision(), 2);
}

#[test]
fn test_scatter_from_trips() {
    let trips = vec![
        TripRecord {
            trip_miles: Some(3.2),
            base_passenger_fare: Some(17.5),
            ..Default::default()
        },
        TripRecord::default(),
    ];
    let chart = Chart::scatter("Distance vs Fare", fare_scatter(&trips));
    assert!(!chart.is_empty());

    let mut renderer = CanvasRenderer::new(ChartTheme::dark());
    let mut surface = Surface::new(400, 300, 1.0);
    renderer
        .render(ChartTarget::DistanceFare, &mut surface, &chart)
        .unwrap();
    let SurfaceContent::Canvas(canvas) = surface.content() else {
        panic!("expected canvas");
    };
    let markers = canvas
        .ops()
        .iter()
        .filter(|op| matches!(op, canvas::DrawOp::Circle { .. }))
        .count();
    assert_eq!(markers, 1);
}
