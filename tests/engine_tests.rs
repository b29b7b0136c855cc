//! Integration tests driving the engine against the in-memory renderer,
//! the way a host UI loop would.

use beacon_map::prelude::*;
use chrono::{TimeZone, Utc};
use std::cell::RefCell;
use std::rc::Rc;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn incident(id: &str, lat: f64, lng: f64, severity: IncidentSeverity) -> Incident {
    Incident {
        id: id.to_string(),
        latitude: lat,
        longitude: lng,
        timestamp: Utc.with_ymd_and_hms(2023, 4, 15, 14, 30, 0).unwrap(),
        category: IncidentCategory::VerbalHarassment,
        severity,
        description: "Individual was verbally harassed while waiting.".to_string(),
        location_description: None,
    }
}

fn sample_incidents() -> Vec<Incident> {
    vec![
        incident("1", 24.4359, 77.1589, IncidentSeverity::Medium),
        incident("2", 24.4364, 77.16, IncidentSeverity::High),
        incident("3", 24.4384, 77.1782, IncidentSeverity::Low),
    ]
}

struct Harness {
    engine: MapEngine,
    factory: MemoryRendererFactory,
    notifier: MemoryNotifier,
}

fn harness(factory: MemoryRendererFactory) -> Harness {
    init_logging();
    let notifier = MemoryNotifier::new();
    let engine = MapEngine::new(
        EngineConfig::default(),
        Box::new(factory.clone()),
        Box::new(MemoryTokenStore::with_token("pk.test")),
        Box::new(notifier.clone()),
    );
    Harness {
        engine,
        factory,
        notifier,
    }
}

fn attached_harness() -> Harness {
    let mut h = harness(MemoryRendererFactory::new());
    h.engine.attach(Container::new("map", 800, 600));
    h
}

#[test]
fn test_marker_count_matches_incident_collection() {
    let mut h = attached_harness();
    let incidents = sample_incidents();

    h.engine.set_incidents(&incidents);

    let handle = h.factory.last_handle().unwrap();
    assert_eq!(handle.marker_count(), incidents.len());

    // each marker is bound to a distinct incident, in collection order
    let markers = handle.markers();
    for (marker, report) in markers.iter().zip(&incidents) {
        assert_eq!(marker.position, report.position());
    }
}

#[test]
fn test_critical_incident_scenario() {
    let mut h = attached_harness();

    h.engine
        .set_incidents(&[incident("1", 40.715, -74.007, IncidentSeverity::Critical)]);

    let handle = h.factory.last_handle().unwrap();
    let source = handle.source("incidents").unwrap();
    assert_eq!(source.len(), 1);
    assert_eq!(
        source.features[0].properties["intensity"],
        serde_json::json!(1.0)
    );
    let Geometry::Point { coordinates } = &source.features[0].geometry;
    assert_eq!(coordinates, &[-74.007, 40.715]);

    assert_eq!(handle.marker_count(), 1);
    assert_eq!(handle.markers()[0].position, LatLng::new(40.715, -74.007));
}

#[test]
fn test_repeated_sync_is_idempotent() {
    let mut h = attached_harness();
    let incidents = sample_incidents();

    h.engine.set_incidents(&incidents);
    h.engine.set_incidents(&incidents);

    let handle = h.factory.last_handle().unwrap();
    assert_eq!(handle.source_count(), 1);
    assert_eq!(handle.layer_count(), 1);
    assert_eq!(handle.marker_count(), incidents.len());
}

#[test]
fn test_clearing_incidents_removes_markers_but_keeps_heatmap() {
    let mut h = attached_harness();

    h.engine.set_incidents(&sample_incidents());
    h.engine.set_incidents(&[]);

    let handle = h.factory.last_handle().unwrap();
    assert_eq!(handle.marker_count(), 0);
    // the density layer keeps its last non-empty dataset
    assert_eq!(handle.source("incidents").unwrap().len(), 3);
    assert_eq!(handle.layer_count(), 1);
}

#[test]
fn test_sync_is_deferred_until_ready() {
    let mut h = harness(MemoryRendererFactory::deferred());
    h.engine.attach(Container::new("map", 800, 600));

    h.engine.set_incidents(&sample_incidents());
    let handle = h.factory.last_handle().unwrap();
    assert_eq!(handle.marker_count(), 0);
    assert_eq!(handle.source_count(), 0);

    handle.complete_load();
    h.engine.pump();

    assert!(h.engine.is_ready());
    assert_eq!(handle.marker_count(), 3);
    assert_eq!(handle.source("incidents").unwrap().len(), 3);
}

#[test]
fn test_location_pick_flow() {
    let mut h = attached_harness();
    let picks: Rc<RefCell<Vec<LatLng>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&picks);
    h.engine
        .on_location_selected(move |position| sink.borrow_mut().push(position));

    h.engine.set_reporting_mode(true);
    assert_eq!(h.engine.picker_state(), PickerState::Idle);

    // reporting-mode change recreated the renderer
    assert_eq!(h.factory.created_count(), 2);
    let handle = h.factory.last_handle().unwrap();

    handle.click(12.34, 56.78);
    h.engine.pump();

    assert_eq!(h.engine.picker_state(), PickerState::Picked);
    assert_eq!(picks.borrow().as_slice(), &[LatLng::new(12.34, 56.78)]);
    assert_eq!(handle.draggable_markers().len(), 1);

    // a second pick replaces the first marker
    handle.click(1.0, 2.0);
    h.engine.pump();

    assert_eq!(
        picks.borrow().as_slice(),
        &[LatLng::new(12.34, 56.78), LatLng::new(1.0, 2.0)]
    );
    assert_eq!(handle.draggable_markers().len(), 1);
    assert_eq!(h.engine.selection(), Some(LatLng::new(1.0, 2.0)));
}

#[test]
fn test_pick_marker_drag_renotifies() {
    let mut h = attached_harness();
    let picks: Rc<RefCell<Vec<LatLng>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&picks);
    h.engine
        .on_location_selected(move |position| sink.borrow_mut().push(position));

    h.engine.set_reporting_mode(true);
    let handle = h.factory.last_handle().unwrap();

    handle.click(10.0, 20.0);
    h.engine.pump();
    let pick = handle.draggable_markers()[0].id;

    handle.drag_marker(pick, 11.0, 21.0);
    h.engine.pump();

    assert_eq!(h.engine.picker_state(), PickerState::Picked);
    assert_eq!(h.engine.selection(), Some(LatLng::new(11.0, 21.0)));
    assert_eq!(picks.borrow().len(), 2);
    assert_eq!(h.notifier.last().unwrap().title, "Location updated");
}

#[test]
fn test_leaving_reporting_mode_clears_pick() {
    let mut h = attached_harness();

    h.engine.set_reporting_mode(true);
    let handle = h.factory.last_handle().unwrap();
    handle.click(10.0, 20.0);
    h.engine.pump();
    assert!(h.engine.selection().is_some());

    h.engine.set_reporting_mode(false);
    assert_eq!(h.engine.picker_state(), PickerState::Inactive);
    assert_eq!(h.engine.selection(), None);

    // the pick marker died with the replaced renderer instance
    let handle = h.factory.last_handle().unwrap();
    assert_eq!(handle.marker_count(), 0);
}

#[test]
fn test_pick_notices_are_user_visible() {
    let mut h = attached_harness();
    h.engine.set_reporting_mode(true);
    let handle = h.factory.last_handle().unwrap();

    handle.click(12.34, 56.78);
    h.engine.pump();

    let notice = h.notifier.last().unwrap();
    assert_eq!(notice.level, NoticeLevel::Success);
    assert_eq!(notice.title, "Location selected");
    assert_eq!(notice.detail, "Selected position: 12.3400, 56.7800");
}

#[test]
fn test_teardown_disposes_everything() {
    let mut h = attached_harness();
    h.engine.set_incidents(&sample_incidents());

    let handle = h.factory.last_handle().unwrap();
    assert_eq!(handle.marker_count(), 3);

    h.engine.teardown();
    assert!(!h.engine.is_initialized());
    assert!(handle.is_disposed());
    assert_eq!(handle.marker_count(), 0);

    // second teardown is a no-op
    h.engine.teardown();
}

#[test]
fn test_credential_change_recreates_renderer() {
    let mut h = attached_harness();
    h.engine.set_incidents(&sample_incidents());

    h.engine.set_credential("pk.rotated");

    let handles = h.factory.handles();
    assert_eq!(handles.len(), 2);
    assert!(handles[0].is_disposed());
    assert_eq!(handles[1].credential(), "pk.rotated");

    // the fresh instance was synced from the retained collection
    assert_eq!(handles[1].marker_count(), 3);
    assert_eq!(handles[1].layer_count(), 1);
    assert_eq!(
        h.notifier.notices()[0].title,
        "Map token saved"
    );
}

#[test]
fn test_failed_initialization_recovers_to_prompt() {
    let mut h = harness(MemoryRendererFactory::new());
    h.factory.fail_next_create();

    h.engine.attach(Container::new("map", 800, 600));

    assert!(!h.engine.is_initialized());
    assert!(h.engine.needs_credential());
    let notice = h.notifier.last().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.title, "Error initializing map");

    // supplying a token again initializes normally
    h.engine.set_credential("pk.retry");
    assert!(h.engine.is_initialized());
}

#[test]
fn test_engine_without_credential_waits_for_one() {
    init_logging();
    let factory = MemoryRendererFactory::new();
    let notifier = MemoryNotifier::new();
    let mut engine = MapEngine::new(
        EngineConfig::default(),
        Box::new(factory.clone()),
        Box::new(MemoryTokenStore::new()),
        Box::new(notifier.clone()),
    );

    assert!(engine.needs_credential());
    engine.attach(Container::new("map", 800, 600));
    assert!(!engine.is_initialized());
    assert_eq!(factory.created_count(), 0);

    engine.set_credential("pk.fresh");
    assert!(engine.is_initialized());
    assert_eq!(factory.created_count(), 1);
}

#[test]
fn test_visibility_resize_and_resync() {
    init_logging();
    let factory = MemoryRendererFactory::new();
    let config = EngineConfig {
        resize_settle_delay: Duration::from_secs(60),
        ..EngineConfig::default()
    };
    let mut engine = MapEngine::new(
        config,
        Box::new(factory.clone()),
        Box::new(MemoryTokenStore::with_token("pk.test")),
        Box::new(MemoryNotifier::new()),
    );
    engine.attach(Container::new("map", 800, 600));
    engine.set_incidents(&sample_incidents());

    let handle = factory.last_handle().unwrap();
    assert_eq!(handle.resize_count(), 0);

    engine.set_active(true);
    // before the settle delay nothing happens
    engine.tick_at(Instant::now());
    assert_eq!(handle.resize_count(), 0);

    engine.tick_at(Instant::now() + Duration::from_secs(61));
    assert_eq!(handle.resize_count(), 1);
    assert_eq!(handle.source("incidents").unwrap().len(), 3);

    // the deadline was consumed; later ticks do not resize again
    engine.tick_at(Instant::now() + Duration::from_secs(120));
    assert_eq!(handle.resize_count(), 1);
}

#[test]
fn test_visibility_is_noop_while_uninitialized() {
    let mut h = harness(MemoryRendererFactory::new());

    h.engine.set_active(true);
    h.engine.tick_at(Instant::now() + Duration::from_secs(1));

    assert_eq!(h.factory.created_count(), 0);
}

#[test]
fn test_reporting_mode_survives_incident_updates() {
    let mut h = attached_harness();
    h.engine.set_reporting_mode(true);
    let handle = h.factory.last_handle().unwrap();

    handle.click(10.0, 20.0);
    h.engine.pump();

    // an incident append during reporting keeps the pick marker alive
    h.engine.set_incidents(&sample_incidents());
    assert_eq!(h.engine.picker_state(), PickerState::Picked);
    assert_eq!(handle.draggable_markers().len(), 1);
    assert_eq!(handle.marker_count(), 4);
}
