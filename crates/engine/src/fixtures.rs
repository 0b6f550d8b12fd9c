//! Factory functions for creating test data.
//!
//! Convenient helpers to construct walls, floors and openings used in tests
//! throughout the crate and in the integration suite.

use glam::DVec3;
use shared::{BuildingElement, ElementKind, ElementProperties, Opening, Transform};

use crate::geometry::{centroid, polygon_area};
use crate::model::now_ms;

// ── Wall factories ──────────────────────────────────────────────

/// Wall segment between two ground points, default thickness 0.2 / height 3.0
pub fn wall_element(id: &str, start: [f64; 3], end: [f64; 3]) -> BuildingElement {
    wall_element_sized(id, start, end, 0.2, 3.0)
}

/// Wall segment with explicit thickness and height
pub fn wall_element_sized(
    id: &str,
    start: [f64; 3],
    end: [f64; 3],
    thickness: f64,
    height: f64,
) -> BuildingElement {
    let a = DVec3::from_array(start);
    let b = DVec3::from_array(end);
    let mid = (a + b) / 2.0;
    let d = b - a;
    let length = d.length();
    let ry = (-d.z).atan2(d.x);
    let now = now_ms();

    BuildingElement {
        id: id.to_string(),
        kind: ElementKind::Wall,
        name: "Wall".to_string(),
        transform: Transform {
            position: [mid.x, height / 2.0, mid.z],
            rotation: [0.0, ry, 0.0],
            scale: [1.0, 1.0, 1.0],
        },
        properties: ElementProperties::Wall {
            length,
            thickness,
            height,
            openings: Vec::new(),
        },
        visible: true,
        locked: false,
        created_at: now,
        modified_at: now,
    }
}

/// A 4 m wall along +X with a door registered at its midpoint.
/// Returns (wall, door) ready to be added to a model store.
pub fn wall_with_door(wall_id: &str, door_id: &str) -> (BuildingElement, BuildingElement) {
    let mut wall = wall_element(wall_id, [0.0, 0.0, 0.0], [4.0, 0.0, 0.0]);
    let (width, height) = (0.9, 2.1);
    let center = [2.0, height / 2.0, 0.0];

    if let ElementProperties::Wall { openings, .. } = &mut wall.properties {
        openings.push(Opening {
            id: door_id.to_string(),
            position: center,
            width,
            height,
            sill_height: 0.0,
        });
    }

    let now = now_ms();
    let door = BuildingElement {
        id: door_id.to_string(),
        kind: ElementKind::Door,
        name: "Door".to_string(),
        transform: Transform {
            position: center,
            rotation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
        },
        properties: ElementProperties::Door {
            width,
            height,
            thickness: 0.2,
            wall_id: Some(wall_id.to_string()),
        },
        visible: true,
        locked: false,
        created_at: now,
        modified_at: now,
    };

    (wall, door)
}

// ── Floor factories ─────────────────────────────────────────────

/// Floor slab from absolute outline points (stored relative to the centroid)
pub fn floor_element(id: &str, outline: &[[f64; 3]]) -> BuildingElement {
    let points: Vec<DVec3> = outline.iter().map(|p| DVec3::from_array(*p)).collect();
    let c = centroid(&points);
    let area = polygon_area(&points);
    let now = now_ms();

    BuildingElement {
        id: id.to_string(),
        kind: ElementKind::Floor,
        name: "Floor".to_string(),
        transform: Transform {
            position: [c.x, 0.0, c.z],
            rotation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
        },
        properties: ElementProperties::Floor {
            points: points.iter().map(|p| (*p - c).to_array()).collect(),
            holes: Vec::new(),
            thickness: 0.3,
            area,
        },
        visible: true,
        locked: false,
        created_at: now,
        modified_at: now,
    }
}

/// A 4 x 3 rectangular floor with its corner at the origin
pub fn rect_floor(id: &str) -> BuildingElement {
    floor_element(
        id,
        &[
            [0.0, 0.0, 0.0],
            [4.0, 0.0, 0.0],
            [4.0, 0.0, 3.0],
            [0.0, 0.0, 3.0],
        ],
    )
}

// ── Modifiers ───────────────────────────────────────────────────

/// Mark an element as locked
pub fn locked(mut element: BuildingElement) -> BuildingElement {
    element.locked = true;
    element
}
