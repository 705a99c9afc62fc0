//! Partition connectivity repair: reassign tetrahedra that ended up with
//! no same-label neighbor after growth and resolution.

use crate::mesh::TetMesh;
use crate::types::{MapError, TetId};

/// One connectivity reassignment performed by the repair pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reassignment {
    /// The reassigned tetrahedron.
    pub tet: TetId,
    /// Section index the tetrahedron held before repair.
    pub from: u32,
    /// Section index it was reassigned to.
    pub to: u32,
    /// Number of distinct neighbor labels that were candidates.
    pub options: usize,
}

/// Reassignments collected from the repair pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairStats {
    /// Every reassignment performed, in tetrahedron-id order.
    pub reassigned: Vec<Reassignment>,
}

/// Ensure every tetrahedron has at least one neighbor sharing its label.
///
/// A single pass in tetrahedron-id order over the fully-labeled table.
/// Whether a tetrahedron needs repair is judged against the pre-repair
/// labeling; the replacement label is the smallest (lexicographically
/// first, since section indices are assigned in sorted name order) among
/// its neighbors' current labels. Reassignments performed by the pass do
/// not trigger re-checking of earlier tetrahedra.
///
/// A mesh consisting of a single tetrahedron is trivially connected and
/// exempt.
///
/// # Errors
///
/// Returns [`MapError::IsolatedTet`] when a tetrahedron has no
/// non-sentinel neighbors at all (and the mesh is larger than one
/// tetrahedron), since connectivity can never be established for it.
pub fn repair_connectivity<M: TetMesh + ?Sized>(
    mesh: &M,
    labels: &mut [u32],
) -> Result<RepairStats, MapError> {
    let before = labels.to_vec();
    let mut stats = RepairStats::default();

    for tet in 0..labels.len() {
        let neighbors = mesh.neighbors(tet);
        let connected = neighbors
            .into_iter()
            .flatten()
            .any(|n| before[n] == before[tet]);
        if connected {
            continue;
        }

        let mut options: Vec<u32> = neighbors.into_iter().flatten().map(|n| labels[n]).collect();
        options.sort_unstable();
        options.dedup();

        let Some(&replacement) = options.first() else {
            if labels.len() == 1 {
                continue;
            }
            return Err(MapError::IsolatedTet { tet });
        };

        // An earlier reassignment in this pass may already have given the
        // tetrahedron a same-label neighbor; only an actual change counts.
        if replacement != labels[tet] {
            stats.reassigned.push(Reassignment {
                tet,
                from: labels[tet],
                to: replacement,
                options: options.len(),
            });
            labels[tet] = replacement;
        }
    }

    Ok(stats)
}
