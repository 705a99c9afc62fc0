//! Unmapped resolution: assign a label to every tetrahedron left
//! unassigned after region growing.

use std::collections::VecDeque;

use crate::mesh::TetMesh;
use crate::types::{MapError, MappingState, TetId};

/// Counts collected from the resolution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    /// Number of connected unassigned islands that were resolved.
    pub islands: usize,
    /// Total tetrahedra labeled by this pass.
    pub tets_resolved: usize,
}

/// Assign a label to every unassigned tetrahedron, flooding outward from
/// each unassigned island until a labeled neighbor is found.
///
/// For each unassigned tetrahedron in id order, a breadth-first search
/// restricted to unassigned tetrahedra collects the connected island. The
/// search stops at the first labeled neighbor encountered in BFS order and
/// the island collected so far takes that neighbor's label; anything the
/// stopped search did not reach is still unassigned and is picked up by a
/// later iteration of the outer scan. The label choice is "first found",
/// not nearest or most common — a recorded design decision, not a tunable.
///
/// Returns the now-dense label table alongside the pass counts.
///
/// # Errors
///
/// Returns [`MapError::UnreachableRegion`] when an island has no labeled
/// neighbor at all: its mesh component contains no traced section, which
/// is a structurally invalid input combination.
pub fn resolve_unmapped<M: TetMesh + ?Sized>(
    mesh: &M,
    state: &mut MappingState,
) -> Result<(Vec<u32>, ResolveStats), MapError> {
    let tet_count = mesh.tet_count();
    let mut stats = ResolveStats::default();

    for start in 0..tet_count {
        if state.labels[start].is_some() {
            continue;
        }

        let mut visited = vec![false; tet_count];
        let mut island: Vec<TetId> = vec![start];
        let mut queue: VecDeque<TetId> = VecDeque::from([start]);
        visited[start] = true;

        let mut found: Option<u32> = None;
        'search: while let Some(tet) = queue.pop_front() {
            for neighbor in mesh.neighbors(tet).into_iter().flatten() {
                if let Some(label) = state.labels[neighbor] {
                    found = Some(label);
                    break 'search;
                }
                if !visited[neighbor] {
                    visited[neighbor] = true;
                    island.push(neighbor);
                    queue.push_back(neighbor);
                }
            }
        }

        let Some(label) = found else {
            island.sort_unstable();
            return Err(MapError::UnreachableRegion { tets: island });
        };

        stats.islands += 1;
        stats.tets_resolved += island.len();
        for tet in island {
            state.labels[tet] = Some(label);
        }
    }

    let mut dense = Vec::with_capacity(tet_count);
    for (tet, label) in state.labels.iter().enumerate() {
        match label {
            Some(idx) => dense.push(*idx),
            None => return Err(MapError::UnreachableRegion { tets: vec![tet] }),
        }
    }
    Ok((dense, stats))
}
