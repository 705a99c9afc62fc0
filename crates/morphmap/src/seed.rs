//! Seed location: find the starting tetrahedron for one segment's growth.

use crate::geometry::segment_center;
use crate::mesh::TetMesh;
use crate::types::{MorphPoint, TetId};

/// Find a tetrahedron containing a representative point of the segment
/// `p0 -> p1`, or `None` when the segment lies outside the meshed volume.
///
/// Fallback order: the segment midpoint first (geometrically most
/// representative), then each endpoint. Thin or boundary segments can
/// have their midpoint fall between mesh elements even when an endpoint
/// is meshed. A `None` result means the segment is skipped: it claims no
/// tetrahedra, which is non-fatal and surfaced as a diagnostic event.
pub fn locate_seed<M: TetMesh + ?Sized>(
    mesh: &M,
    p0: MorphPoint,
    p1: MorphPoint,
    scale: f64,
) -> Option<TetId> {
    mesh.find_tet_by_point(segment_center(p0, p1, scale))
        .or_else(|| mesh.find_tet_by_point(p0.scaled(scale)))
        .or_else(|| mesh.find_tet_by_point(p1.scaled(scale)))
}
