//! morphmap: map neuronal morphology sections onto tetrahedral meshes (sans-IO).
//!
//! Given a cell morphology (an ordered tree of named sections, each a
//! polyline of 3D samples) and a tetrahedral volume mesh, produce a
//! per-tetrahedron label identifying which section occupies each
//! tetrahedron. Downstream consumers apply section-specific biophysical
//! parameters to mesh elements using that partition.
//!
//! This crate has **no I/O dependencies** — the mesh is an opaque
//! collaborator behind the [`TetMesh`] trait, the morphology is an
//! in-memory value produced by an external import layer, and the result
//! is structured data. Morphology file parsing and mesh construction live
//! elsewhere.
//!
//! # Phases
//!
//! 1. For every segment of every section (sections in lexicographic name
//!    order, points in index order): locate a seed tetrahedron and grow
//!    the segment's cylinder across mesh adjacency, closest distance
//!    winning and ties keeping the first claim.
//! 2. Resolve tetrahedra left unassigned by flooding each unassigned
//!    island outward until a labeled neighbor is found.
//! 3. Repair partition connectivity: a tetrahedron with no same-label
//!    neighbor is reassigned to the lexicographically smallest label among
//!    its neighbors.
//!
//! Phase order is strict — each phase's invariant is the next one's
//! precondition.

pub mod diagnostics;
pub mod geometry;
pub mod grow;
pub mod mesh;
pub mod morphology;
pub mod repair;
pub mod resolve;
pub mod seed;
pub mod types;

use std::time::Instant;

pub use diagnostics::{MappingDiagnostics, MappingSummary, StageDiagnostics, StageMetrics};
pub use mesh::TetMesh;
pub use morphology::{Morphology, MorphologyError, Section};
pub use types::{MapConfig, MapError, MappingState, MorphPoint, PartitionTable, Point3, TetId};

use diagnostics::{ReassignedTet, SkippedSegment};

/// Map every tetrahedron of `mesh` to a section of `morphology`.
///
/// Returns a complete, connected, tie-broken assignment: every
/// tetrahedron carries exactly one section name, and (except for a
/// single-tetrahedron mesh) every tetrahedron has at least one neighbor
/// sharing its label. Running twice on identical inputs yields identical
/// output.
///
/// # Errors
///
/// Returns [`MapError::EmptyMesh`] or [`MapError::EmptyMorphology`] for
/// degenerate inputs, [`MapError::UnreachableRegion`] when part of the
/// mesh cannot be reached from any traced segment, and
/// [`MapError::IsolatedTet`] when a tetrahedron has no neighbors at all
/// in a multi-tetrahedron mesh.
pub fn map_morphology<M: TetMesh + ?Sized>(
    mesh: &M,
    morphology: &Morphology,
    config: &MapConfig,
) -> Result<PartitionTable, MapError> {
    map_morphology_with_diagnostics(mesh, morphology, config).map(|(table, _)| table)
}

/// Like [`map_morphology`], additionally collecting per-phase
/// [`MappingDiagnostics`]: timings, claim counts, skipped segments, and
/// connectivity reassignments.
///
/// # Errors
///
/// Same conditions as [`map_morphology`].
#[allow(clippy::too_many_lines)]
pub fn map_morphology_with_diagnostics<M: TetMesh + ?Sized>(
    mesh: &M,
    morphology: &Morphology,
    config: &MapConfig,
) -> Result<(PartitionTable, MappingDiagnostics), MapError> {
    let total_start = Instant::now();

    let tet_count = mesh.tet_count();
    if tet_count == 0 {
        return Err(MapError::EmptyMesh);
    }
    if morphology.is_empty() {
        return Err(MapError::EmptyMorphology);
    }

    // Section indices follow lexicographic name order, so smaller index
    // means lexicographically smaller label throughout the phases.
    let section_names = morphology.section_names();
    let mut state = MappingState::new(tet_count);

    // Phase 1: seeding + region growing, one global state across the
    // whole morphology.
    let growth_start = Instant::now();
    let mut skipped = Vec::new();
    let mut segment_count = 0;
    let mut seeded_segments = 0;
    let mut claims = 0;
    let mut overwrites = 0;
    for (section_idx, section) in morphology.sections().enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        let label = section_idx as u32;
        for (segment_idx, pair) in section.points.windows(2).enumerate() {
            let (p0, p1) = (pair[0], pair[1]);
            segment_count += 1;

            let Some(start) = seed::locate_seed(mesh, p0, p1, config.scale) else {
                skipped.push(SkippedSegment {
                    section: section.name.clone(),
                    segment: segment_idx,
                });
                continue;
            };
            seeded_segments += 1;

            let stats = grow::grow_region(mesh, start, p0, p1, label, config.scale, &mut state);
            claims += stats.claims;
            overwrites += stats.overwrites;
        }
    }
    let labeled_tets = tet_count - state.unassigned_count();
    let growth = StageDiagnostics {
        duration: growth_start.elapsed(),
        metrics: StageMetrics::Growth {
            section_count: morphology.len(),
            segment_count,
            seeded_segments,
            claims,
            overwrites,
            labeled_tets,
            skipped,
        },
    };

    // Phase 2: unmapped resolution. The distance table is no longer
    // consulted from here on.
    let resolve_start = Instant::now();
    let (mut dense, resolve_stats) = resolve::resolve_unmapped(mesh, &mut state)?;
    let resolve_diag = StageDiagnostics {
        duration: resolve_start.elapsed(),
        metrics: StageMetrics::Resolve {
            islands: resolve_stats.islands,
            tets_resolved: resolve_stats.tets_resolved,
        },
    };

    // Phase 3: connectivity repair over the fully-labeled table.
    let repair_start = Instant::now();
    let repair_stats = repair::repair_connectivity(mesh, &mut dense)?;
    let reassigned: Vec<ReassignedTet> = repair_stats
        .reassigned
        .iter()
        .map(|r| ReassignedTet {
            tet: r.tet,
            from: section_name(&section_names, r.from),
            to: section_name(&section_names, r.to),
            options: r.options,
        })
        .collect();
    let reassigned_count = reassigned.len();
    let repair_diag = StageDiagnostics {
        duration: repair_start.elapsed(),
        metrics: StageMetrics::Repair { reassigned },
    };

    let table = PartitionTable::new(section_names, dense);
    let summary = MappingSummary {
        tet_count,
        section_count: morphology.len(),
        segment_count,
        partition_count: table.partitions().len(),
        skipped_segment_count: match &growth.metrics {
            StageMetrics::Growth { skipped, .. } => skipped.len(),
            _ => 0,
        },
        reassigned_count,
    };

    let diagnostics = MappingDiagnostics {
        growth,
        resolve: resolve_diag,
        repair: repair_diag,
        total_duration: total_start.elapsed(),
        summary,
    };
    Ok((table, diagnostics))
}

/// Resolve a section index back to its name for reporting.
fn section_name(names: &[String], idx: u32) -> String {
    names
        .get(idx as usize)
        .cloned()
        .unwrap_or_else(|| format!("<section {idx}>"))
}
