//! Mapping diagnostics: timing, counts, and advisory events per phase.
//!
//! These diagnostics are permanent instrumentation for input debugging and
//! algorithm tuning. Every call to
//! [`map_morphology_with_diagnostics`](crate::map_morphology_with_diagnostics)
//! collects them alongside the partition table. Advisory events — a
//! segment skipped because none of its representative points lie in the
//! mesh, a tetrahedron reassigned for connectivity — are structured data
//! here, never part of the partition table itself.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::TetId;

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// A segment that claimed no tetrahedra because none of its representative
/// points (midpoint, then either endpoint) lie inside the mesh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedSegment {
    /// Name of the section the segment belongs to.
    pub section: String,
    /// Zero-based segment index within the section.
    pub segment: usize,
}

/// A tetrahedron reassigned by the connectivity repair pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReassignedTet {
    /// The reassigned tetrahedron.
    pub tet: TetId,
    /// Section name it held before repair.
    pub from: String,
    /// Section name it was reassigned to.
    pub to: String,
    /// Number of distinct neighbor labels that were candidates. More than
    /// one means the lexicographic tie-break decided.
    pub options: usize,
}

/// Diagnostics for a single mapping phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this phase (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Phase-specific metrics.
    pub metrics: StageMetrics,
}

/// Phase-specific metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Region growing metrics (all sections, all segments).
    Growth {
        /// Number of sections processed.
        section_count: usize,
        /// Number of segments across all sections.
        segment_count: usize,
        /// Segments for which a seed tetrahedron was found.
        seeded_segments: usize,
        /// Total claims performed (first assignments and overwrites).
        claims: usize,
        /// Claims that replaced another section's label.
        overwrites: usize,
        /// Tetrahedra carrying a label once growth finished.
        labeled_tets: usize,
        /// Segments skipped because no representative point was meshed.
        skipped: Vec<SkippedSegment>,
    },
    /// Unmapped resolution metrics.
    Resolve {
        /// Connected unassigned islands that were resolved.
        islands: usize,
        /// Tetrahedra labeled by the resolution pass.
        tets_resolved: usize,
    },
    /// Connectivity repair metrics.
    Repair {
        /// Every reassignment performed, in tetrahedron-id order.
        reassigned: Vec<ReassignedTet>,
    },
}

/// High-level summary counts for the entire mapping run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingSummary {
    /// Tetrahedra in the mesh.
    pub tet_count: usize,
    /// Sections in the morphology.
    pub section_count: usize,
    /// Segments across all sections.
    pub segment_count: usize,
    /// Distinct section labels present in the final table.
    pub partition_count: usize,
    /// Segments that contributed no labeling.
    pub skipped_segment_count: usize,
    /// Tetrahedra reassigned by connectivity repair.
    pub reassigned_count: usize,
}

/// Diagnostics collected from a single mapping run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingDiagnostics {
    /// Phase 1: seeding + region growing.
    pub growth: StageDiagnostics,
    /// Phase 2: unmapped resolution.
    pub resolve: StageDiagnostics,
    /// Phase 3: connectivity repair.
    pub repair: StageDiagnostics,
    /// Total wall-clock duration of the run (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Summary counts across all phases.
    pub summary: MappingSummary,
}

impl MappingDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Mapping Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Mesh: {} tetrahedra  |  Morphology: {} sections, {} segments",
            self.summary.tet_count, self.summary.section_count, self.summary.segment_count,
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<16} {:>10} {:>10}  {}",
            "Phase", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(80));

        let total_ms = duration_ms(self.total_duration);
        let stages = [
            ("Growth", &self.growth),
            ("Resolve", &self.resolve),
            ("Repair", &self.repair),
        ];
        for (name, diag) in stages {
            let ms = duration_ms(diag.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&diag.metrics);
            lines.push(format!("{name:<16} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        lines.push(String::new());
        lines.push(format!(
            "Partitions: {}  |  Skipped segments: {}  |  Reassigned: {}",
            self.summary.partition_count,
            self.summary.skipped_segment_count,
            self.summary.reassigned_count,
        ));

        for skipped in self.skipped_segments() {
            lines.push(format!(
                "  segment {} of {} has no representative point in the mesh",
                skipped.segment, skipped.section,
            ));
        }
        for event in self.reassignments() {
            lines.push(format!(
                "  tetrahedron {} had no neighbor in its partition, reassigned {} -> {} ({} options)",
                event.tet, event.from, event.to, event.options,
            ));
        }

        lines.join("\n")
    }

    /// The segments skipped during growth.
    #[must_use]
    pub fn skipped_segments(&self) -> &[SkippedSegment] {
        match &self.growth.metrics {
            StageMetrics::Growth { skipped, .. } => skipped,
            _ => &[],
        }
    }

    /// The reassignments performed by connectivity repair.
    #[must_use]
    pub fn reassignments(&self) -> &[ReassignedTet] {
        match &self.repair.metrics {
            StageMetrics::Repair { reassigned } => reassigned,
            _ => &[],
        }
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Format phase metrics into a compact detail string.
fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::Growth {
            section_count,
            segment_count,
            seeded_segments,
            claims,
            overwrites,
            labeled_tets,
            ..
        } => {
            format!(
                "{section_count} sections, {seeded_segments}/{segment_count} segments seeded, {claims} claims ({overwrites} overwrites), {labeled_tets} tets labeled",
            )
        }
        StageMetrics::Resolve {
            islands,
            tets_resolved,
        } => format!("{islands} islands, {tets_resolved} tets resolved"),
        StageMetrics::Repair { reassigned } => {
            format!("{} tets reassigned", reassigned.len())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_diagnostics() -> MappingDiagnostics {
        MappingDiagnostics {
            growth: StageDiagnostics {
                duration: Duration::from_millis(12),
                metrics: StageMetrics::Growth {
                    section_count: 2,
                    segment_count: 5,
                    seeded_segments: 4,
                    claims: 40,
                    overwrites: 3,
                    labeled_tets: 30,
                    skipped: vec![SkippedSegment {
                        section: "axon_0".to_owned(),
                        segment: 2,
                    }],
                },
            },
            resolve: StageDiagnostics {
                duration: Duration::from_millis(3),
                metrics: StageMetrics::Resolve {
                    islands: 1,
                    tets_resolved: 2,
                },
            },
            repair: StageDiagnostics {
                duration: Duration::from_millis(1),
                metrics: StageMetrics::Repair {
                    reassigned: vec![ReassignedTet {
                        tet: 17,
                        from: "soma".to_owned(),
                        to: "axon_0".to_owned(),
                        options: 2,
                    }],
                },
            },
            total_duration: Duration::from_millis(16),
            summary: MappingSummary {
                tet_count: 32,
                section_count: 2,
                segment_count: 5,
                partition_count: 2,
                skipped_segment_count: 1,
                reassigned_count: 1,
            },
        }
    }

    #[test]
    fn report_names_every_phase() {
        let report = sample_diagnostics().report();
        assert!(report.contains("Growth"));
        assert!(report.contains("Resolve"));
        assert!(report.contains("Repair"));
        assert!(report.contains("reassigned soma -> axon_0"));
        assert!(report.contains("segment 2 of axon_0"));
    }

    #[test]
    fn accessors_surface_events() {
        let diag = sample_diagnostics();
        assert_eq!(diag.skipped_segments().len(), 1);
        assert_eq!(diag.reassignments()[0].tet, 17);
    }

    #[test]
    fn serde_round_trip() {
        let diag = sample_diagnostics();
        let json = serde_json::to_string(&diag).unwrap();
        let deserialized: MappingDiagnostics = serde_json::from_str(&json).unwrap();
        assert_eq!(diag, deserialized);
    }
}
