//! Shared types for the morphology-to-tetmesh mapping algorithm.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Identifies a tetrahedron within a mesh.
///
/// Ids are dense: every id in `0..tet_count()` names a valid tetrahedron.
pub type TetId = usize;

/// A position in mesh coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    /// X coordinate in mesh units.
    pub x: f64,
    /// Y coordinate in mesh units.
    pub y: f64,
    /// Z coordinate in mesh units.
    pub z: f64,
}

impl Point3 {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx.mul_add(dx, dy.mul_add(dy, dz * dz))
    }
}

/// One sample of a morphology reconstruction, in morphology units.
///
/// Consecutive pairs of samples within a section define cylindrical
/// segments. The diameter is carried through from the reconstruction
/// contract but does not participate in the mapping's admission test,
/// which is purely axial (see [`crate::geometry::cylinder_distance_squared`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MorphPoint {
    /// X coordinate in morphology units.
    pub x: f64,
    /// Y coordinate in morphology units.
    pub y: f64,
    /// Z coordinate in morphology units.
    pub z: f64,
    /// Local diameter of the reconstructed neurite at this sample.
    pub diameter: f64,
}

impl MorphPoint {
    /// Create a new morphology sample.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64, diameter: f64) -> Self {
        Self { x, y, z, diameter }
    }

    /// Convert to a mesh-space position by applying the unit scale.
    #[must_use]
    pub fn scaled(self, scale: f64) -> Point3 {
        Point3::new(self.x * scale, self.y * scale, self.z * scale)
    }
}

/// Configuration for a mapping run.
///
/// Fields are public; there are no cross-field invariants to enforce.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Unit-conversion factor from morphology length units to mesh length
    /// units, applied uniformly to every geometric predicate.
    ///
    /// The default of `1e-6` converts micrometers (the usual morphology
    /// reconstruction unit) to meters (the usual mesh unit).
    pub scale: f64,
}

impl MapConfig {
    /// Default morphology-to-mesh unit scale (micrometers to meters).
    pub const DEFAULT_SCALE: f64 = 1e-6;
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            scale: Self::DEFAULT_SCALE,
        }
    }
}

/// The per-tetrahedron section assignment produced by a mapping run.
///
/// Entry `i` names the morphology section owning tetrahedron `i`. Every
/// tetrahedron is assigned; the table is immutable once returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionTable {
    /// Section names, sorted lexicographically. Assignment entries index
    /// into this table, so index order is lexicographic label order.
    sections: Vec<String>,
    /// Per-tetrahedron index into `sections`.
    assigned: Vec<u32>,
}

impl PartitionTable {
    /// Assemble a table from the section-name table and dense assignments.
    ///
    /// Callers guarantee every assignment indexes into `sections`.
    pub(crate) const fn new(sections: Vec<String>, assigned: Vec<u32>) -> Self {
        Self { sections, assigned }
    }

    /// Number of tetrahedra covered by the table.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.assigned.len()
    }

    /// Returns `true` if the table covers no tetrahedra.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }

    /// The section name assigned to the given tetrahedron, or `None` if
    /// the id is out of range.
    #[must_use]
    pub fn section_of(&self, tet: TetId) -> Option<&str> {
        let idx = *self.assigned.get(tet)?;
        self.sections.get(idx as usize).map(String::as_str)
    }

    /// All section names present in the table, lexicographically sorted.
    #[must_use]
    pub fn section_names(&self) -> &[String] {
        &self.sections
    }

    /// Iterate over per-tetrahedron section names in tetrahedron-id order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.assigned
            .iter()
            .filter_map(|&idx| self.sections.get(idx as usize).map(String::as_str))
    }

    /// Consume the table and return one owned section name per tetrahedron.
    ///
    /// This is the downstream consumer contract: an ordered sequence of
    /// length `tet_count()` where entry `i` is the section owning
    /// tetrahedron `i`.
    #[must_use]
    pub fn into_labels(self) -> Vec<String> {
        self.assigned
            .iter()
            .filter_map(|&idx| self.sections.get(idx as usize).cloned())
            .collect()
    }

    /// Group tetrahedra by section label.
    ///
    /// Each entry maps a section name to the ids of the tetrahedra it
    /// owns, in ascending id order.
    #[must_use]
    pub fn partitions(&self) -> BTreeMap<&str, Vec<TetId>> {
        let mut parts: BTreeMap<&str, Vec<TetId>> = BTreeMap::new();
        for (tet, &idx) in self.assigned.iter().enumerate() {
            if let Some(name) = self.sections.get(idx as usize) {
                parts.entry(name.as_str()).or_default().push(tet);
            }
        }
        parts
    }
}

/// Mutable per-run context shared by the mapping phases.
///
/// Owned by the orchestrator and threaded through region growing and
/// unmapped resolution. The label table records the current section index
/// (into the run's sorted section-name table) per tetrahedron; the
/// distance table records the squared distance justifying that label and
/// exists only to decide overwrite eligibility during growth. Stored
/// distances never increase: a label is only replaced by a strictly
/// smaller distance.
#[derive(Debug, Clone)]
pub struct MappingState {
    /// Current section index per tetrahedron, `None` while unassigned.
    pub(crate) labels: Vec<Option<u32>>,
    /// Squared distance justifying the current label, `f64::INFINITY`
    /// while unset.
    pub(crate) dsq: Vec<f64>,
}

impl MappingState {
    /// Create an empty state covering `tet_count` tetrahedra.
    #[must_use]
    pub fn new(tet_count: usize) -> Self {
        Self {
            labels: vec![None; tet_count],
            dsq: vec![f64::INFINITY; tet_count],
        }
    }

    /// The current label table, indexed by tetrahedron id.
    #[must_use]
    pub fn labels(&self) -> &[Option<u32>] {
        &self.labels
    }

    /// The squared distance justifying the given tetrahedron's label, or
    /// `f64::INFINITY` while unset.
    #[must_use]
    pub fn distance_squared(&self, tet: TetId) -> f64 {
        self.dsq.get(tet).copied().unwrap_or(f64::INFINITY)
    }

    /// Number of tetrahedra still unassigned.
    #[must_use]
    pub fn unassigned_count(&self) -> usize {
        self.labels.iter().filter(|l| l.is_none()).count()
    }
}

/// Errors terminating a mapping run.
///
/// Non-fatal events (a skipped segment, a connectivity reassignment) are
/// reported through [`crate::diagnostics`] instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    /// The morphology contains no sections, so nothing can be mapped.
    #[error("morphology contains no sections")]
    EmptyMorphology,

    /// The mesh reports zero tetrahedra.
    #[error("mesh contains no tetrahedra")]
    EmptyMesh,

    /// A connected set of tetrahedra is unreachable from every traced
    /// segment: no flood fill can ever label it. This indicates a
    /// structurally invalid morphology/mesh combination.
    #[error("{} tetrahedra (first id {}) are unreachable from all traced morphology", tets.len(), tets.first().copied().unwrap_or_default())]
    UnreachableRegion {
        /// Ids of the unreachable tetrahedra, in ascending order.
        tets: Vec<TetId>,
    },

    /// A tetrahedron has no non-sentinel neighbors at all, so partition
    /// connectivity can never be established for it.
    #[error("tetrahedron {tet} is isolated: it has no neighbors")]
    IsolatedTet {
        /// Id of the isolated tetrahedron.
        tet: TetId,
    },
}
