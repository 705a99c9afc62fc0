//! Region growing: breadth-first expansion of one segment's cylinder
//! across mesh adjacency, with a closest-distance-wins overwrite rule.

use crate::geometry::cylinder_distance_squared;
use crate::mesh::TetMesh;
use crate::types::{MappingState, MorphPoint, TetId};

/// Counts collected from a single segment's growth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GrowStats {
    /// Number of claims performed (first assignments and overwrites).
    pub claims: usize,
    /// Claims that replaced a different section's label.
    pub overwrites: usize,
}

/// Grow the segment `p0 -> p1` of `section` outward from `seed`.
///
/// The seed is claimed unconditionally at distance 0. Expansion is
/// breadth-first over mesh adjacency: an in-range neighbor (by barycenter
/// cylinder distance) is claimed when it is unassigned or when the new
/// distance is strictly smaller than its stored one. Equal distances never
/// overwrite, so the first claimant wins ties — section and segment
/// processing order is part of the observable contract. A claimed
/// neighbor joins the next frontier only when its label actually changed.
///
/// Runs once per segment, all segments sharing one [`MappingState`].
pub fn grow_region<M: TetMesh + ?Sized>(
    mesh: &M,
    seed: TetId,
    p0: MorphPoint,
    p1: MorphPoint,
    section: u32,
    scale: f64,
    state: &mut MappingState,
) -> GrowStats {
    let mut stats = GrowStats::default();

    let previous = state.labels[seed];
    state.labels[seed] = Some(section);
    state.dsq[seed] = 0.0;
    stats.claims += 1;
    if previous.is_some_and(|label| label != section) {
        stats.overwrites += 1;
    }

    let mut frontier = vec![seed];
    while !frontier.is_empty() {
        let mut next = Vec::new();
        for &tet in &frontier {
            for neighbor in mesh.neighbors(tet).into_iter().flatten() {
                let Some(dsq) =
                    cylinder_distance_squared(p0, p1, mesh.barycenter(neighbor), scale)
                else {
                    continue;
                };
                // Unassigned neighbors hold an infinite distance, so the
                // strict comparison covers both claim cases.
                if dsq < state.dsq[neighbor] {
                    let previous = state.labels[neighbor];
                    state.labels[neighbor] = Some(section);
                    state.dsq[neighbor] = dsq;
                    stats.claims += 1;
                    if previous != Some(section) {
                        if previous.is_some() {
                            stats.overwrites += 1;
                        }
                        next.push(neighbor);
                    }
                }
            }
        }
        frontier = next;
    }

    stats
}
