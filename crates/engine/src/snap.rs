//! Feature snapping: wall endpoints, perpendicular corners, project grid

use glam::DVec3;
use shared::{BuildingElement, ElementProperties, ProjectSettings};

use crate::constraints::WallConstraints;
use crate::geometry::snap_to_grid;
use crate::model::wall_endpoints;

/// What a point snapped to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapKind {
    /// Endpoint of an existing wall
    Endpoint,
    /// Endpoint offset sideways by half the wall thickness (perpendicular corner)
    Corner,
    /// Project grid
    Grid,
    /// No snapping applied
    None,
}

/// A snapped point with its provenance
#[derive(Debug, Clone, Copy)]
pub struct SnapResult {
    pub point: DVec3,
    pub kind: SnapKind,
}

/// Candidate snap targets of one wall: both endpoints plus the four
/// perpendicular corner offsets (endpoint shifted sideways by thickness/2).
fn wall_snap_candidates(wall: &BuildingElement) -> Vec<(DVec3, SnapKind)> {
    let Some((a, b)) = wall_endpoints(wall) else {
        return Vec::new();
    };
    let ElementProperties::Wall { thickness, .. } = &wall.properties else {
        return Vec::new();
    };

    let dir = (b - a).normalize_or_zero();
    let normal = DVec3::new(dir.z, 0.0, -dir.x);
    let offset = normal * (thickness * wall.transform.scale[2] / 2.0);

    vec![
        (a, SnapKind::Endpoint),
        (b, SnapKind::Endpoint),
        (a + offset, SnapKind::Corner),
        (a - offset, SnapKind::Corner),
        (b + offset, SnapKind::Corner),
        (b - offset, SnapKind::Corner),
    ]
}

/// Snap a clicked point for wall construction.
///
/// Order: nearest endpoint/corner of any existing wall within the snap
/// radius, else the project grid when grid snapping is on, else the raw
/// point. Endpoints win over corners at equal distance.
pub fn snap_wall_point<'a>(
    point: DVec3,
    walls: impl Iterator<Item = &'a BuildingElement>,
    wall_cfg: &WallConstraints,
    settings: &ProjectSettings,
) -> SnapResult {
    if wall_cfg.snap_to_endpoints {
        let mut best: Option<(DVec3, SnapKind, f64)> = None;
        for wall in walls {
            for (candidate, kind) in wall_snap_candidates(wall) {
                let dist = (candidate - point).length();
                if dist > wall_cfg.endpoint_snap_radius {
                    continue;
                }
                let better = match &best {
                    None => true,
                    Some((_, best_kind, best_dist)) => {
                        dist < *best_dist
                            || (dist == *best_dist
                                && kind == SnapKind::Endpoint
                                && *best_kind == SnapKind::Corner)
                    }
                };
                if better {
                    best = Some((candidate, kind, dist));
                }
            }
        }
        if let Some((p, kind, _)) = best {
            return SnapResult { point: p, kind };
        }
    }

    if settings.snap_to_grid {
        return SnapResult {
            point: snap_to_grid(point, settings.grid_size),
            kind: SnapKind::Grid,
        };
    }

    SnapResult {
        point,
        kind: SnapKind::None,
    }
}

/// Grid-snap a free construction point when the project asks for it
pub fn snap_construction_point(point: DVec3, settings: &ProjectSettings) -> DVec3 {
    if settings.snap_to_grid {
        snap_to_grid(point, settings.grid_size)
    } else {
        point
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn cfg() -> WallConstraints {
        WallConstraints::default()
    }

    #[test]
    fn test_snaps_to_wall_endpoint() {
        let wall = fixtures::wall_element("w", [0.0; 3], [4.0, 0.0, 0.0]);
        let walls = [wall];
        // On the wall axis: the endpoint is nearer than either corner offset
        let r = snap_wall_point(
            DVec3::new(4.2, 0.0, 0.0),
            walls.iter(),
            &cfg(),
            &ProjectSettings::default(),
        );
        assert_eq!(r.kind, SnapKind::Endpoint);
        assert!((r.point - DVec3::new(4.0, 0.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn test_falls_back_to_grid() {
        let walls: [BuildingElement; 0] = [];
        let r = snap_wall_point(
            DVec3::new(1.3, 0.0, 0.0),
            walls.iter(),
            &cfg(),
            &ProjectSettings::default(),
        );
        assert_eq!(r.kind, SnapKind::Grid);
        assert!((r.point.x - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_no_snap_when_disabled() {
        let walls: [BuildingElement; 0] = [];
        let settings = ProjectSettings {
            snap_to_grid: false,
            ..ProjectSettings::default()
        };
        let r = snap_wall_point(DVec3::new(1.3, 0.0, 0.0), walls.iter(), &cfg(), &settings);
        assert_eq!(r.kind, SnapKind::None);
        assert!((r.point.x - 1.3).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_radius_ignores_endpoint() {
        let wall = fixtures::wall_element("w", [0.0; 3], [4.0, 0.0, 0.0]);
        let walls = [wall];
        let r = snap_wall_point(
            DVec3::new(6.0, 0.0, 0.0),
            walls.iter(),
            &cfg(),
            &ProjectSettings::default(),
        );
        // Too far from the endpoint, grid takes over
        assert_eq!(r.kind, SnapKind::Grid);
    }

    #[test]
    fn test_corner_offset_candidates() {
        let wall = fixtures::wall_element("w", [0.0; 3], [4.0, 0.0, 0.0]);
        let walls = [wall];
        // 0.1 sideways of the endpoint is exactly the corner offset for
        // thickness 0.2; click slightly off it
        let r = snap_wall_point(
            DVec3::new(4.02, 0.0, 0.11),
            walls.iter(),
            &cfg(),
            &ProjectSettings::default(),
        );
        assert_eq!(r.kind, SnapKind::Corner);
        assert!((r.point - DVec3::new(4.0, 0.0, 0.1)).length() < 1e-9);
    }
}
