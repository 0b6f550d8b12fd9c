//! Move, rotate and scale tools.
//!
//! The three tools share one drag model: pointer-down snapshots the unlocked
//! selection and locks in a handle constraint, pointer-moves recompute every
//! element from its snapshot plus the total drag delta, pointer-up commits to
//! the history and Escape restores the snapshots exactly.

mod rotate;
mod scale;
mod translate;

pub use rotate::RotateTool;
pub use scale::ScaleTool;
pub use translate::MoveTool;

use std::collections::HashMap;

use glam::{DVec2, DVec3};
use shared::{ElementId, ElementProperties, Transform};

use crate::gizmo::{GizmoAxis, GizmoDescriptor};
use crate::model::ModelStore;

/// State of one in-flight transform drag
pub struct DragSession {
    /// Transform and properties of every affected element at drag start
    snapshots: HashMap<ElementId, (Transform, ElementProperties)>,
    /// Mean position of the whole selection, locked for the drag
    pub pivot: DVec3,
    /// Handle constraint picked at drag start (None = unconstrained)
    pub axis: Option<GizmoAxis>,
    pub start_ndc: DVec2,
}

impl DragSession {
    /// Snapshot the unlocked part of the selection. Returns None when the
    /// selection holds nothing movable.
    pub fn begin(model: &ModelStore, start_ndc: DVec2, axis: Option<GizmoAxis>) -> Option<Self> {
        let selected: Vec<_> = model
            .elements()
            .iter()
            .filter(|e| model.selection.is_selected(&e.id))
            .collect();

        let snapshots: HashMap<_, _> = selected
            .iter()
            .filter(|e| !e.locked)
            .map(|e| {
                (
                    e.id.clone(),
                    (e.transform.clone(), e.properties.clone()),
                )
            })
            .collect();

        if snapshots.is_empty() {
            return None;
        }

        // The pivot averages over the full selection, locked elements included
        let descriptor = GizmoDescriptor::from_elements(selected.into_iter());
        Some(Self {
            snapshots,
            pivot: descriptor.pivot,
            axis,
            start_ndc,
        })
    }

    /// Snapshot of one element
    pub fn snapshot(&self, id: &str) -> Option<&(Transform, ElementProperties)> {
        self.snapshots.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ElementId, &(Transform, ElementProperties))> {
        self.snapshots.iter()
    }

    /// Affected element ids in deterministic order
    pub fn ids(&self) -> Vec<ElementId> {
        let mut ids: Vec<_> = self.snapshots.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Put every snapshot back, byte for byte
    pub fn restore(&self, model: &mut ModelStore) {
        for (id, (transform, properties)) in &self.snapshots {
            if let Some(e) = model.get_element_mut(id) {
                e.transform = transform.clone();
                e.properties = properties.clone();
            }
        }
    }
}

/// Snap step honoring the fine modifier
pub(crate) fn effective_step(step: f64, fine: bool, fine_factor: f64) -> f64 {
    if fine {
        step * fine_factor
    } else {
        step
    }
}

/// Axis named by a single-letter constraint key
pub(crate) fn axis_from_key(key: &str) -> Option<GizmoAxis> {
    match key {
        "x" => Some(GizmoAxis::X),
        "y" => Some(GizmoAxis::Y),
        "z" => Some(GizmoAxis::Z),
        _ => None,
    }
}

/// Toggle an axis lock: pressing the held axis again clears it. Returns the
/// new lock state.
pub(crate) fn toggle_axis(lock: &mut Option<GizmoAxis>, axis: GizmoAxis) -> Option<GizmoAxis> {
    *lock = if *lock == Some(axis) { None } else { Some(axis) };
    *lock
}
