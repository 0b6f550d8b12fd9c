//! Manager-level flows: shortcuts, selection editing, history, undo requests.

use glam::DVec3;
use shared::{ElementKind, ToolType};

use archcad_engine::events::Modifiers;
use archcad_engine::fixtures;
use archcad_engine::harness::TestHarness;
use archcad_engine::manager::ManagerAction;

#[test]
fn keyboard_shortcuts_switch_tools() {
    let mut h = TestHarness::new();
    for (key, tool) in [
        ("w", ToolType::Wall),
        ("f", ToolType::Floor),
        ("d", ToolType::Door),
        ("n", ToolType::Window),
        ("k", ToolType::Cut),
        ("m", ToolType::Move),
        ("r", ToolType::Rotate),
        ("s", ToolType::Scale),
        ("v", ToolType::Select),
    ] {
        let r = h.key(key).unwrap();
        assert!(r.success);
        assert_eq!(h.manager.active_tool(), tool, "key {key}");
        assert_eq!(h.model.active_tool, Some(tool));
    }
}

#[test]
fn switching_tools_discards_pending_construction() {
    let mut h = TestHarness::new();
    h.activate(ToolType::Wall);
    h.click_world(DVec3::new(0.0, 0.0, 0.0));
    h.move_world(DVec3::new(3.0, 0.0, 0.0));
    assert!(h.model.preview().is_some());

    h.key("v");
    assert!(h.model.preview().is_none());

    // Returning to the wall tool starts from scratch: the next click seeds a
    // new segment instead of committing one
    h.key("w");
    h.click_world(DVec3::new(1.0, 0.0, 1.0));
    assert_eq!(h.model.element_count(), 0);
}

#[test]
fn select_all_and_clear() {
    let mut h = TestHarness::new();
    h.model
        .add_element(fixtures::wall_element("wall_1", [0.0; 3], [4.0, 0.0, 0.0]));
    h.model.add_element(fixtures::rect_floor("floor_1"));

    let r = h.key_mods("a", Modifiers::ctrl()).unwrap();
    assert!(r.success);
    assert_eq!(h.model.selection.count(), 2);

    h.key("Escape");
    assert_eq!(h.model.selection.count(), 0);
}

#[test]
fn duplicate_offsets_copies_and_reselects() {
    let mut h = TestHarness::new();
    h.model
        .add_element(fixtures::wall_element("wall_1", [0.0; 3], [4.0, 0.0, 0.0]));
    h.model.selection.select("wall_1".to_string());

    let r = h.key_mods("d", Modifiers::ctrl()).unwrap();
    assert!(r.success);
    assert_eq!(h.model.element_count(), 2);

    let copy_id = h.model.selection.primary().unwrap().clone();
    assert_ne!(copy_id, "wall_1");
    let copy = h.model.get_element(&copy_id).unwrap();
    assert_eq!(copy.transform.position, [2.5, 1.5, 0.5]);
    assert!(copy.name.ends_with("copy"));
    assert_eq!(h.model.history().len(), 1);
}

#[test]
fn delete_cascades_from_wall_to_door() {
    let mut h = TestHarness::new();
    let (wall, door) = fixtures::wall_with_door("wall_1", "door_1");
    h.model.add_element(wall);
    h.model.add_element(door);
    h.model.selection.select("wall_1".to_string());

    let r = h.key("Delete").unwrap();
    assert!(r.success);
    assert_eq!(h.model.element_count(), 0);

    let removed = &h.model.history().last().unwrap().element_ids;
    assert!(removed.contains(&"wall_1".to_string()));
    assert!(removed.contains(&"door_1".to_string()));
}

#[test]
fn deleting_door_strips_opening_from_wall() {
    let mut h = TestHarness::new();
    let (wall, door) = fixtures::wall_with_door("wall_1", "door_1");
    h.model.add_element(wall);
    h.model.add_element(door);
    h.model.selection.select("door_1".to_string());

    h.key("Delete");
    let wall = h.model.get_element("wall_1").unwrap();
    assert!(wall.properties.openings().unwrap().is_empty());
}

#[test]
fn undo_redo_requests_reach_the_host() {
    let mut h = TestHarness::new();
    h.key_mods("z", Modifiers::ctrl());
    h.key_mods(
        "z",
        Modifiers {
            ctrl: true,
            shift: true,
            alt: false,
        },
    );

    assert_eq!(
        h.actions(),
        vec![ManagerAction::UndoRequested, ManagerAction::RedoRequested]
    );
    assert!(h.actions().is_empty());
}

#[test]
fn select_tool_click_flow() {
    let mut h = TestHarness::new();
    h.model
        .add_element(fixtures::wall_element("wall_1", [0.0; 3], [4.0, 0.0, 0.0]));
    h.model.add_element(fixtures::wall_element(
        "wall_2",
        [10.0, 0.0, 0.0],
        [14.0, 0.0, 0.0],
    ));
    h.activate(ToolType::Select);

    h.click_world(DVec3::new(2.0, 1.5, 0.0));
    assert!(h.model.selection.is_selected("wall_1"));

    // Ctrl-click adds the second wall
    h.tick(1.0);
    let ndc = h.ndc_of(DVec3::new(12.0, 1.5, 0.0));
    let t = 2.0;
    h.send(
        archcad_engine::events::InputEvent::pointer_down(DVec3::new(ndc.x, ndc.y, 0.0), t)
            .with_modifiers(Modifiers::ctrl()),
    );
    assert_eq!(h.model.selection.count(), 2);

    // Click on empty ground clears everything
    h.click_world(DVec3::new(8.0, 0.0, 8.0));
    assert_eq!(h.model.selection.count(), 0);
}

#[test]
fn successful_commit_clears_previous_error() {
    let mut h = TestHarness::new();
    h.activate(ToolType::Wall);

    h.click_world(DVec3::new(0.0, 0.0, 0.0));
    h.click_world(DVec3::new(0.0, 0.0, 0.0));
    assert!(h.model.last_error.is_some());

    let r = h.click_world(DVec3::new(3.0, 0.0, 0.0)).unwrap();
    assert!(r.success);
    assert!(h.model.last_error.is_none());
    assert_eq!(
        h.model.elements()[0].kind,
        ElementKind::Wall
    );
}
