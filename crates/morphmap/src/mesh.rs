//! The tetrahedral mesh contract consumed by the mapping algorithm.
//!
//! The mesh itself (its data structure, file formats, and geometric query
//! implementation) is an external collaborator. The algorithm only needs
//! the four read-only queries below, so they are expressed as a trait and
//! every phase is generic over it. Nothing in this crate mutates a mesh.

use crate::types::{Point3, TetId};

/// Read-only queries a tetrahedral volume mesh must answer.
///
/// Tetrahedron ids are dense (`0..tet_count()`). Neighbor slots without a
/// face-adjacent tetrahedron (mesh boundary) are `None`.
pub trait TetMesh {
    /// Total number of tetrahedra in the mesh.
    fn tet_count(&self) -> usize;

    /// The tetrahedron containing the given mesh-space point, if any.
    fn find_tet_by_point(&self, point: Point3) -> Option<TetId>;

    /// The up-to-four face-adjacent neighbors of a tetrahedron.
    fn neighbors(&self, tet: TetId) -> [Option<TetId>; 4];

    /// Geometric centroid of a tetrahedron's four vertices.
    fn barycenter(&self, tet: TetId) -> Point3;
}
