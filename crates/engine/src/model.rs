//! Shared model store: elements, selection, preview slot, history, settings.
//!
//! The store is the only thing tools are allowed to mutate, and only through
//! the operations below. Undo/redo stacks live outside this crate and replay
//! their state by re-invoking these same operations.

use glam::DVec3;
use shared::{
    BuildingElement, ElementId, ElementKind, ElementPatch, ElementProperties, ProjectSettings,
    ToolType, Transform,
};

use crate::geometry::Aabb;

/// Milliseconds since the Unix epoch
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// One entry of the human-readable action log
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// Human-readable description of the action
    pub description: String,
    /// Elements the action touched
    pub element_ids: Vec<ElementId>,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
}

/// Element selection state (supports multi-select)
#[derive(Default)]
pub struct SelectionState {
    /// Selected element IDs (in order of selection)
    selected: Vec<ElementId>,
}

impl SelectionState {
    /// Primary (first) selected element
    pub fn primary(&self) -> Option<&ElementId> {
        self.selected.first()
    }

    /// All selected elements
    pub fn all(&self) -> &[ElementId] {
        &self.selected
    }

    /// Check if an element is selected
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s == id)
    }

    /// Select a single element (clears previous selection)
    pub fn select(&mut self, id: ElementId) {
        self.selected.clear();
        self.selected.push(id);
    }

    /// Toggle selection (Ctrl+click behavior)
    pub fn toggle(&mut self, id: ElementId) {
        if let Some(pos) = self.selected.iter().position(|s| s == &id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(id);
        }
    }

    /// Add to selection without clearing
    pub fn add(&mut self, id: ElementId) {
        if !self.is_selected(&id) {
            self.selected.push(id);
        }
    }

    /// Clear all selection
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Number of selected elements
    pub fn count(&self) -> usize {
        self.selected.len()
    }

    /// Drop ids that are no longer present in the model
    fn retain_existing(&mut self, exists: impl Fn(&str) -> bool) {
        self.selected.retain(|id| exists(id));
    }
}

/// The shared mutable model consumed by every tool
#[derive(Default)]
pub struct ModelStore {
    elements: Vec<BuildingElement>,
    /// Element selection
    pub selection: SelectionState,
    /// In-progress preview element, overwritten continuously, never committed
    preview: Option<BuildingElement>,
    /// Currently active tool
    pub active_tool: Option<ToolType>,
    /// Action log consumed by the external history subsystem
    history: Vec<HistoryEntry>,
    /// Last surfaced error, cleared on the next successful action
    pub last_error: Option<String>,
    /// Per-project settings (grid size, snap flag)
    pub settings: ProjectSettings,
    version: u64,
}

impl ModelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Monotonically increasing mutation counter
    pub fn version(&self) -> u64 {
        self.version
    }

    // ── Elements ────────────────────────────────────────────────

    pub fn elements(&self) -> &[BuildingElement] {
        &self.elements
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn get_element(&self, id: &str) -> Option<&BuildingElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn get_element_mut(&mut self, id: &str) -> Option<&mut BuildingElement> {
        self.version += 1;
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// Add a committed element to the model
    pub fn add_element(&mut self, element: BuildingElement) {
        debug_assert!(
            !element.id.starts_with("preview-"),
            "preview elements never enter the element collection"
        );
        self.elements.push(element);
        self.version += 1;
    }

    /// Replace an element's transform, stamping the modification time
    pub fn update_transform(&mut self, id: &str, transform: Transform) {
        let now = now_ms();
        if let Some(e) = self.elements.iter_mut().find(|e| e.id == id) {
            e.transform = transform;
            e.modified_at = now;
            self.version += 1;
        }
    }

    /// Apply a partial patch to an element
    pub fn apply_patch(&mut self, id: &str, patch: ElementPatch) {
        let now = now_ms();
        if let Some(e) = self.elements.iter_mut().find(|e| e.id == id) {
            if let Some(name) = patch.name {
                e.name = name;
            }
            if let Some(transform) = patch.transform {
                e.transform = transform;
            }
            if let Some(properties) = patch.properties {
                e.properties = properties;
            }
            if let Some(visible) = patch.visible {
                e.visible = visible;
            }
            if let Some(locked) = patch.locked {
                e.locked = locked;
            }
            e.modified_at = now;
            self.version += 1;
        }
    }

    /// Remove elements by id, keeping wall/opening records consistent.
    ///
    /// Removing a wall also removes its door/window elements; removing a
    /// door/window strips the matching opening record from its wall. Returns
    /// the ids actually removed.
    pub fn remove_elements(&mut self, ids: &[ElementId]) -> Vec<ElementId> {
        let mut doomed: Vec<ElementId> = ids.to_vec();

        // Walls take their openings with them
        for id in ids {
            if let Some(wall) = self.get_element(id) {
                if let Some(openings) = wall.properties.openings() {
                    for op in openings {
                        if !doomed.contains(&op.id) {
                            doomed.push(op.id.clone());
                        }
                    }
                }
            }
        }

        // Strip opening records of doomed doors/windows from surviving walls
        let opening_ids: Vec<ElementId> = doomed
            .iter()
            .filter(|id| {
                self.get_element(id)
                    .is_some_and(|e| matches!(e.kind, ElementKind::Door | ElementKind::Window))
            })
            .cloned()
            .collect();
        for e in &mut self.elements {
            if let ElementProperties::Wall { openings, .. } = &mut e.properties {
                openings.retain(|op| !opening_ids.contains(&op.id));
            }
        }

        let removed: Vec<ElementId> = doomed
            .iter()
            .filter(|id| self.elements.iter().any(|e| &e.id == *id))
            .cloned()
            .collect();
        let before = self.elements.len();
        self.elements.retain(|e| !doomed.contains(&e.id));
        if self.elements.len() != before {
            self.version += 1;
        }
        self.selection
            .retain_existing(|id| self.elements.iter().any(|e| e.id == id));
        removed
    }

    /// Duplicate the selected elements with fresh ids, offset slightly.
    /// Returns the new ids (the duplicates become the selection).
    pub fn duplicate_selected(&mut self) -> Vec<ElementId> {
        let now = now_ms();
        let mut new_ids = Vec::new();
        let selected: Vec<ElementId> = self.selection.all().to_vec();

        for id in &selected {
            let Some(src) = self.get_element(id) else {
                continue;
            };
            let mut copy = src.clone();
            copy.id = format!("{}_{}", src.kind.label().to_lowercase(), uuid_suffix());
            copy.name = format!("{} copy", src.name);
            copy.transform.position[0] += 0.5;
            copy.transform.position[2] += 0.5;
            copy.created_at = now;
            copy.modified_at = now;
            // Duplicated openings are not re-registered on any wall
            if let ElementProperties::Wall { openings, .. } = &mut copy.properties {
                openings.clear();
            }
            new_ids.push(copy.id.clone());
            self.elements.push(copy);
        }

        if !new_ids.is_empty() {
            self.selection.clear();
            for id in &new_ids {
                self.selection.add(id.clone());
            }
            self.version += 1;
        }
        new_ids
    }

    // ── Walls and openings ──────────────────────────────────────

    /// All wall elements
    pub fn walls(&self) -> impl Iterator<Item = &BuildingElement> {
        self.elements
            .iter()
            .filter(|e| e.kind == ElementKind::Wall)
    }

    /// The wall that owns the opening with the given id, if any
    pub fn wall_of_opening(&self, opening_id: &str) -> Option<&BuildingElement> {
        self.walls().find(|w| {
            w.properties
                .openings()
                .is_some_and(|ops| ops.iter().any(|o| o.id == opening_id))
        })
    }

    // ── Preview slot ────────────────────────────────────────────

    pub fn preview(&self) -> Option<&BuildingElement> {
        self.preview.as_ref()
    }

    pub fn set_preview(&mut self, element: BuildingElement) {
        self.preview = Some(element);
        self.version += 1;
    }

    pub fn clear_preview(&mut self) {
        if self.preview.is_some() {
            self.preview = None;
            self.version += 1;
        }
    }

    // ── History log ─────────────────────────────────────────────

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn push_history(&mut self, description: impl Into<String>, element_ids: Vec<ElementId>) {
        self.history.push(HistoryEntry {
            description: description.into(),
            element_ids,
            timestamp: now_ms(),
        });
        self.version += 1;
    }

    // ── Errors ──────────────────────────────────────────────────

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.last_error = Some(error.into());
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    // ── Picking support ─────────────────────────────────────────

    /// Bounding boxes of all visible elements, for ray picking
    pub fn element_aabbs(&self) -> Vec<(String, Aabb)> {
        self.elements
            .iter()
            .filter(|e| e.visible)
            .map(|e| (e.id.clone(), element_aabb(e)))
            .collect()
    }
}

fn uuid_suffix() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Ground-plane endpoints of a wall segment, derived from its transform.
/// Returns None for non-wall elements.
pub fn wall_endpoints(wall: &BuildingElement) -> Option<(DVec3, DVec3)> {
    let ElementProperties::Wall { length, height, .. } = &wall.properties else {
        return None;
    };
    let pos = DVec3::from_array(wall.transform.position);
    let ry = wall.transform.rotation[1];
    let half = length * wall.transform.scale[0] / 2.0;
    let dir = DVec3::new(ry.cos(), 0.0, -ry.sin());
    let base = DVec3::new(pos.x, pos.y - height * wall.transform.scale[1] / 2.0, pos.z);
    Some((base - dir * half, base + dir * half))
}

/// World-space bounding box of an element, derived from its kind and properties
pub fn element_aabb(e: &BuildingElement) -> Aabb {
    let pos = DVec3::from_array(e.transform.position);
    let scale = DVec3::from_array(e.transform.scale);
    let ry = e.transform.rotation[1];
    let (cos, sin) = (ry.cos().abs(), ry.sin().abs());

    match &e.properties {
        ElementProperties::Wall {
            length,
            thickness,
            height,
            ..
        } => {
            let hl = length * scale.x / 2.0;
            let ht = thickness * scale.z / 2.0;
            let hh = height * scale.y / 2.0;
            Aabb {
                min: pos - DVec3::new(cos * hl + sin * ht, hh, sin * hl + cos * ht),
                max: pos + DVec3::new(cos * hl + sin * ht, hh, sin * hl + cos * ht),
            }
        }
        ElementProperties::Floor {
            points, thickness, ..
        } => {
            let world: Vec<DVec3> = points
                .iter()
                .map(|p| pos + DVec3::from_array(*p))
                .collect();
            let flat = Aabb::from_points(&world)
                .unwrap_or(Aabb::from_center_size(pos, DVec3::splat(0.1)));
            Aabb {
                min: DVec3::new(flat.min.x, pos.y - thickness * scale.y, flat.min.z),
                max: DVec3::new(flat.max.x, pos.y, flat.max.z),
            }
        }
        ElementProperties::Door {
            width,
            height,
            thickness,
            ..
        }
        | ElementProperties::Window {
            width,
            height,
            thickness,
            ..
        } => {
            let hw = width * scale.x / 2.0;
            let ht = thickness * scale.z / 2.0;
            let hh = height * scale.y / 2.0;
            Aabb {
                min: pos - DVec3::new(cos * hw + sin * ht, hh, sin * hw + cos * ht),
                max: pos + DVec3::new(cos * hw + sin * ht, hh, sin * hw + cos * ht),
            }
        }
        ElementProperties::Cut { points, depth, .. } => {
            let world: Vec<DVec3> = points.iter().map(|p| DVec3::from_array(*p)).collect();
            Aabb::from_points(&world)
                .map(|a| a.expanded(depth / 2.0))
                .unwrap_or(Aabb::from_center_size(pos, DVec3::splat(0.1)))
        }
        ElementProperties::Custom { .. } => Aabb::from_center_size(pos, scale),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_selection_basics() {
        let mut s = SelectionState::default();
        assert!(s.primary().is_none());
        s.select("a".into());
        s.toggle("b".into());
        assert_eq!(s.count(), 2);
        assert!(s.is_selected("a"));
        s.toggle("a".into());
        assert!(!s.is_selected("a"));
        s.clear();
        assert_eq!(s.count(), 0);
    }

    #[test]
    fn test_add_and_remove_elements() {
        let mut m = ModelStore::new();
        let wall = fixtures::wall_element("wall_1", [0.0, 0.0, 0.0], [4.0, 0.0, 0.0]);
        m.add_element(wall);
        assert_eq!(m.element_count(), 1);

        let removed = m.remove_elements(&["wall_1".to_string()]);
        assert_eq!(removed, vec!["wall_1".to_string()]);
        assert_eq!(m.element_count(), 0);
    }

    #[test]
    fn test_remove_door_strips_wall_opening() {
        let mut m = ModelStore::new();
        let (wall, door) = fixtures::wall_with_door("wall_1", "door_1");
        m.add_element(wall);
        m.add_element(door);
        assert_eq!(
            m.get_element("wall_1").unwrap().properties.openings().unwrap().len(),
            1
        );

        m.remove_elements(&["door_1".to_string()]);
        assert!(m
            .get_element("wall_1")
            .unwrap()
            .properties
            .openings()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_remove_wall_removes_its_openings() {
        let mut m = ModelStore::new();
        let (wall, door) = fixtures::wall_with_door("wall_1", "door_1");
        m.add_element(wall);
        m.add_element(door);

        let removed = m.remove_elements(&["wall_1".to_string()]);
        assert!(removed.contains(&"wall_1".to_string()));
        assert!(removed.contains(&"door_1".to_string()));
        assert_eq!(m.element_count(), 0);
    }

    #[test]
    fn test_removal_deselects() {
        let mut m = ModelStore::new();
        m.add_element(fixtures::wall_element("wall_1", [0.0; 3], [4.0, 0.0, 0.0]));
        m.selection.select("wall_1".into());
        m.remove_elements(&["wall_1".to_string()]);
        assert_eq!(m.selection.count(), 0);
    }

    #[test]
    fn test_preview_slot_never_commits() {
        let mut m = ModelStore::new();
        let mut p = fixtures::wall_element("preview-wall", [0.0; 3], [1.0, 0.0, 0.0]);
        p.id = "preview-wall".into();
        m.set_preview(p);
        assert!(m.preview().is_some());
        assert_eq!(m.element_count(), 0);
        m.clear_preview();
        assert!(m.preview().is_none());
    }

    #[test]
    fn test_wall_endpoints_roundtrip() {
        let wall = fixtures::wall_element("w", [0.0, 0.0, 0.0], [5.0, 0.0, 0.0]);
        let (a, b) = wall_endpoints(&wall).unwrap();
        assert!((a - DVec3::new(0.0, 0.0, 0.0)).length() < 1e-9);
        assert!((b - DVec3::new(5.0, 0.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn test_duplicate_selected_offsets_and_reselects() {
        let mut m = ModelStore::new();
        m.add_element(fixtures::wall_element("wall_1", [0.0; 3], [4.0, 0.0, 0.0]));
        m.selection.select("wall_1".into());
        let new_ids = m.duplicate_selected();
        assert_eq!(new_ids.len(), 1);
        assert_eq!(m.element_count(), 2);
        assert!(m.selection.is_selected(&new_ids[0]));
        let copy = m.get_element(&new_ids[0]).unwrap();
        // Wall center x = 2.0 plus the duplicate offset
        assert!((copy.transform.position[0] - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_wall_of_opening_lookup() {
        let mut m = ModelStore::new();
        let (wall, door) = fixtures::wall_with_door("wall_1", "door_1");
        m.add_element(wall);
        m.add_element(door);
        assert_eq!(m.wall_of_opening("door_1").map(|w| w.id.as_str()), Some("wall_1"));
        assert!(m.wall_of_opening("nope").is_none());
    }
}
