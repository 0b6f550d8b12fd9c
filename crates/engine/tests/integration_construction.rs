//! End-to-end construction flows driven through the event harness.

use glam::DVec3;
use shared::{CutShape, ElementKind, ElementProperties, ToolType};

use archcad_engine::fixtures;
use archcad_engine::harness::TestHarness;

// ── Walls ───────────────────────────────────────────────────────

#[test]
fn wall_two_clicks_create_centered_segment() {
    let mut h = TestHarness::new();
    h.activate(ToolType::Wall);

    h.click_world(DVec3::new(0.0, 0.0, 0.0));
    let r = h.click_world(DVec3::new(5.0, 0.0, 0.0)).unwrap();
    assert!(r.success, "{:?}", r.error);

    assert_eq!(h.model.element_count(), 1);
    let wall = &h.model.elements()[0];
    assert_eq!(wall.kind, ElementKind::Wall);
    assert_eq!(wall.transform.position, [2.5, 1.5, 0.0]);
    assert_eq!(wall.transform.rotation[1], 0.0);
    let ElementProperties::Wall {
        length,
        thickness,
        height,
        ..
    } = &wall.properties
    else {
        panic!("not a wall");
    };
    assert!((length - 5.0).abs() < 1e-9);
    assert_eq!(*thickness, 0.2);
    assert_eq!(*height, 3.0);

    assert_eq!(h.model.history().len(), 1);
    assert!(h.model.preview().is_none());
}

#[test]
fn wall_too_short_fails_and_keeps_pending_start() {
    let mut h = TestHarness::new();
    h.activate(ToolType::Wall);

    h.click_world(DVec3::new(0.0, 0.0, 0.0));
    let r = h.click_world(DVec3::new(0.0, 0.0, 0.0)).unwrap();
    assert!(!r.success);
    assert!(h.model.last_error.as_deref().unwrap().contains("too short"));
    assert_eq!(h.model.element_count(), 0);

    // The start point survived the failure; a valid end point still commits
    let r = h.click_world(DVec3::new(5.0, 0.0, 0.0)).unwrap();
    assert!(r.success, "{:?}", r.error);
    assert_eq!(h.model.element_count(), 1);
    assert!(h.model.last_error.is_none());
}

#[test]
fn wall_chain_mode_builds_connected_segments() {
    let mut h = TestHarness::new();
    h.activate(ToolType::Wall);
    h.key("c");

    h.click_world(DVec3::new(0.0, 0.0, 0.0));
    h.click_world(DVec3::new(4.0, 0.0, 0.0));
    h.click_world(DVec3::new(4.0, 0.0, 3.0));

    assert_eq!(h.model.element_count(), 2);
    let second = &h.model.elements()[1];
    // Second segment runs from (4,0,0) to (4,0,3)
    assert_eq!(second.transform.position, [4.0, 1.5, 1.5]);
}

#[test]
fn wall_escape_discards_pending_segment() {
    let mut h = TestHarness::new();
    h.activate(ToolType::Wall);

    h.click_world(DVec3::new(0.0, 0.0, 0.0));
    h.move_world(DVec3::new(3.0, 0.0, 0.0));
    assert!(h.model.preview().is_some());

    h.key("Escape");
    assert!(h.model.preview().is_none());
    assert_eq!(h.model.element_count(), 0);

    // Escape again falls through to the manager and is a no-op here
    h.key("Escape");
    assert_eq!(h.model.element_count(), 0);
}

// ── Floors ──────────────────────────────────────────────────────

#[test]
fn floor_enter_commits_outline() {
    let mut h = TestHarness::new();
    h.activate(ToolType::Floor);

    for p in [
        DVec3::new(0.0, 0.0, 0.0),
        DVec3::new(4.0, 0.0, 0.0),
        DVec3::new(4.0, 0.0, 3.0),
        DVec3::new(0.0, 0.0, 3.0),
    ] {
        h.click_world(p);
    }
    let r = h.key("Enter").unwrap();
    assert!(r.success, "{:?}", r.error);

    let floor = &h.model.elements()[0];
    assert_eq!(floor.kind, ElementKind::Floor);
    assert_eq!(floor.transform.position, [2.0, 0.0, 1.5]);
    let ElementProperties::Floor { area, points, .. } = &floor.properties else {
        panic!("not a floor");
    };
    assert!((area - 12.0).abs() < 1e-9);
    assert_eq!(points.len(), 4);
    // Outline is stored relative to the centroid
    assert_eq!(points[0], [-2.0, 0.0, -1.5]);
}

#[test]
fn floor_double_click_commits_outline() {
    let mut h = TestHarness::new();
    h.activate(ToolType::Floor);

    h.click_world(DVec3::new(0.0, 0.0, 0.0));
    h.click_world(DVec3::new(4.0, 0.0, 0.0));
    h.click_world(DVec3::new(4.0, 0.0, 3.0));
    let r = h.double_click_world(DVec3::new(0.0, 0.0, 3.0)).unwrap();
    assert!(r.success, "{:?}", r.error);
    assert_eq!(h.model.element_count(), 1);
}

#[test]
fn floor_hole_subtracts_from_area() {
    let mut h = TestHarness::new();
    h.activate(ToolType::Floor);

    for p in [
        DVec3::new(0.0, 0.0, 0.0),
        DVec3::new(4.0, 0.0, 0.0),
        DVec3::new(4.0, 0.0, 3.0),
        DVec3::new(0.0, 0.0, 3.0),
    ] {
        h.click_world(p);
    }
    h.key("h");
    for p in [
        DVec3::new(1.0, 0.0, 1.0),
        DVec3::new(2.0, 0.0, 1.0),
        DVec3::new(2.0, 0.0, 2.0),
        DVec3::new(1.0, 0.0, 2.0),
    ] {
        h.click_world(p);
    }
    h.key("h");
    let r = h.key("Enter").unwrap();
    assert!(r.success, "{:?}", r.error);

    let ElementProperties::Floor { area, holes, .. } = &h.model.elements()[0].properties else {
        panic!("not a floor");
    };
    assert!((area - 11.0).abs() < 1e-9);
    assert_eq!(holes.len(), 1);
}

#[test]
fn floor_too_few_points_fails() {
    let mut h = TestHarness::new();
    h.activate(ToolType::Floor);

    h.click_world(DVec3::new(0.0, 0.0, 0.0));
    h.click_world(DVec3::new(4.0, 0.0, 0.0));
    let r = h.key("Enter").unwrap();
    assert!(!r.success);
    assert!(h.model.last_error.as_deref().unwrap().contains("3 points"));
    assert_eq!(h.model.element_count(), 0);
}

// ── Doors and windows ───────────────────────────────────────────

#[test]
fn door_click_registers_opening_on_wall() {
    let mut h = TestHarness::new();
    h.model
        .add_element(fixtures::wall_element("wall_1", [0.0; 3], [4.0, 0.0, 0.0]));
    h.activate(ToolType::Door);

    let r = h.click_world(DVec3::new(2.0, 0.0, 0.3)).unwrap();
    assert!(r.success, "{:?}", r.error);

    let door = h
        .model
        .elements()
        .iter()
        .find(|e| e.kind == ElementKind::Door)
        .unwrap();
    let pos = DVec3::from_array(door.transform.position);
    assert!((pos - DVec3::new(2.0, 1.05, 0.0)).length() < 1e-6);
    assert_eq!(door.properties.wall_id().map(String::as_str), Some("wall_1"));

    let wall = h.model.get_element("wall_1").unwrap();
    let openings = wall.properties.openings().unwrap();
    assert_eq!(openings.len(), 1);
    assert_eq!(openings[0].id, door.id);
    assert_eq!(h.model.history().len(), 1);
}

#[test]
fn door_without_nearby_wall_fails() {
    let mut h = TestHarness::new();
    h.model
        .add_element(fixtures::wall_element("wall_1", [0.0; 3], [4.0, 0.0, 0.0]));
    h.activate(ToolType::Door);

    let r = h.click_world(DVec3::new(2.0, 0.0, 5.0)).unwrap();
    assert!(!r.success);
    assert!(h.model.last_error.as_deref().unwrap().contains("No wall"));
    assert_eq!(h.model.element_count(), 1);
}

#[test]
fn window_respects_separation_from_existing_opening() {
    let mut h = TestHarness::new();
    h.model
        .add_element(fixtures::wall_element("wall_1", [0.0; 3], [6.0, 0.0, 0.0]));
    h.activate(ToolType::Window);

    let r = h.click_world(DVec3::new(2.0, 0.0, 0.3)).unwrap();
    assert!(r.success, "{:?}", r.error);

    // 0.3 m apart: closer than half the combined widths plus the gap
    let r = h.click_world(DVec3::new(2.3, 0.0, 0.3)).unwrap();
    assert!(!r.success);
    assert!(h
        .model
        .last_error
        .as_deref()
        .unwrap()
        .contains("overlaps"));

    // Far enough along the wall is accepted
    let r = h.click_world(DVec3::new(4.5, 0.0, 0.3)).unwrap();
    assert!(r.success, "{:?}", r.error);

    let wall = h.model.get_element("wall_1").unwrap();
    assert_eq!(wall.properties.openings().unwrap().len(), 2);
}

#[test]
fn window_element_carries_sill_height() {
    let mut h = TestHarness::new();
    h.model
        .add_element(fixtures::wall_element("wall_1", [0.0; 3], [4.0, 0.0, 0.0]));
    h.activate(ToolType::Window);

    let r = h.click_world(DVec3::new(2.0, 0.0, 0.3)).unwrap();
    let window = r.element.unwrap();
    let ElementProperties::Window { sill_height, .. } = window.properties else {
        panic!("not a window");
    };
    assert_eq!(sill_height, 0.9);
    let pos = DVec3::from_array(window.transform.position);
    assert!((pos.y - 1.6).abs() < 1e-9);
}

// ── Cuts ────────────────────────────────────────────────────────

#[test]
fn cut_rectangle_on_floor() {
    let mut h = TestHarness::new();
    h.model.add_element(fixtures::rect_floor("floor_1"));
    h.activate(ToolType::Cut);

    // First click picks the target, the next two span the rectangle
    let r = h.click_world(DVec3::new(2.0, 0.0, 1.5)).unwrap();
    assert!(r.success, "{:?}", r.error);
    h.click_world(DVec3::new(1.0, 0.0, 1.0));
    let r = h.click_world(DVec3::new(2.5, 0.0, 2.5)).unwrap();
    assert!(r.success, "{:?}", r.error);

    let cut = h
        .model
        .elements()
        .iter()
        .find(|e| e.kind == ElementKind::Cut)
        .unwrap();
    let ElementProperties::Cut {
        shape,
        target_id,
        points,
        depth,
    } = &cut.properties
    else {
        panic!("not a cut");
    };
    assert_eq!(*shape, CutShape::Rectangle);
    assert_eq!(target_id, "floor_1");
    assert_eq!(points.len(), 2);
    assert_eq!(*depth, 0.5);
    assert_eq!(h.model.history().len(), 1);
}

#[test]
fn cut_requires_cuttable_target() {
    let mut h = TestHarness::new();
    h.activate(ToolType::Cut);

    let r = h.click_world(DVec3::new(2.0, 0.0, 1.5)).unwrap();
    assert!(!r.success);
    assert!(h
        .model
        .last_error
        .as_deref()
        .unwrap()
        .contains("No cuttable"));
}

#[test]
fn cut_outline_outside_target_fails() {
    let mut h = TestHarness::new();
    h.model.add_element(fixtures::rect_floor("floor_1"));
    h.activate(ToolType::Cut);

    h.click_world(DVec3::new(2.0, 0.0, 1.5));
    h.click_world(DVec3::new(1.0, 0.0, 1.0));
    let r = h.click_world(DVec3::new(9.0, 0.0, 1.0)).unwrap();
    assert!(!r.success);
    assert!(h
        .model
        .last_error
        .as_deref()
        .unwrap()
        .contains("leaves the target"));
}
