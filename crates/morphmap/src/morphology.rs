//! Morphology section tree: the read-only input to the mapping algorithm.
//!
//! A morphology is an ordered tree of named sections, each an ordered
//! polyline of 3D samples with diameter. It is produced by an external
//! import collaborator (e.g. a host-simulation reconstruction export);
//! this crate only consumes it. Construction validates the tree's
//! referential integrity so the mapping phases can rely on it.

use std::collections::BTreeMap;

use petgraph::algo::is_cyclic_directed;
use petgraph::graph::DiGraph;
use serde::{Deserialize, Serialize};

use crate::types::MorphPoint;

/// A named polyline section of a cell's morphology tree.
///
/// Consecutive pairs of points define the cylindrical segments that drive
/// region growing. Parent/child links describe the tree topology; they are
/// validated at construction but do not influence the mapping itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Unique section name within the morphology.
    pub name: String,
    /// Name of the parent section, `None` for the root.
    pub parent: Option<String>,
    /// Names of the child sections.
    pub children: Vec<String>,
    /// Ordered samples tracing the section (at least one).
    pub points: Vec<MorphPoint>,
}

impl Section {
    /// Number of cylindrical segments defined by this section's points.
    #[must_use]
    pub const fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }
}

/// Errors rejecting a structurally invalid section tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MorphologyError {
    /// Two sections share the same name.
    #[error("duplicate section name: {name}")]
    Duplicate {
        /// The repeated name.
        name: String,
    },

    /// A section carries no points at all.
    #[error("section {section} has no points")]
    EmptySection {
        /// Name of the offending section.
        section: String,
    },

    /// A section names a parent that does not exist.
    #[error("section {section} references unknown parent {parent}")]
    UnknownParent {
        /// Name of the offending section.
        section: String,
        /// The dangling parent name.
        parent: String,
    },

    /// A section names a child that does not exist.
    #[error("section {section} references unknown child {child}")]
    UnknownChild {
        /// Name of the offending section.
        section: String,
        /// The dangling child name.
        child: String,
    },

    /// Parent links do not form a tree.
    #[error("section parent links form a cycle")]
    Cycle,
}

/// A validated morphology: sections keyed by name.
///
/// Iteration order is lexicographic by section name. This is load-bearing:
/// the mapping's tie-break rule ("first claim wins on equal distance")
/// makes section processing order part of the observable contract, so the
/// tree fixes a deterministic order once at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Morphology {
    sections: BTreeMap<String, Section>,
}

impl Morphology {
    /// Build a morphology from sections, validating the tree.
    ///
    /// # Errors
    ///
    /// Returns [`MorphologyError`] when a section name repeats, a section
    /// has no points, a parent or child reference dangles, or the parent
    /// links contain a cycle.
    pub fn from_sections(
        sections: impl IntoIterator<Item = Section>,
    ) -> Result<Self, MorphologyError> {
        let mut map = BTreeMap::new();
        for section in sections {
            if section.points.is_empty() {
                return Err(MorphologyError::EmptySection {
                    section: section.name,
                });
            }
            let name = section.name.clone();
            if map.insert(name.clone(), section).is_some() {
                return Err(MorphologyError::Duplicate { name });
            }
        }

        validate_tree(&map)?;
        Ok(Self { sections: map })
    }

    /// Number of sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Returns `true` if the morphology has no sections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Look up a section by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Iterate over sections in lexicographic name order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    /// Section names in lexicographic order.
    #[must_use]
    pub fn section_names(&self) -> Vec<String> {
        self.sections.keys().cloned().collect()
    }

    /// Total number of cylindrical segments across all sections.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.sections.values().map(Section::segment_count).sum()
    }
}

/// Check referential integrity and acyclicity of the parent/child links.
fn validate_tree(sections: &BTreeMap<String, Section>) -> Result<(), MorphologyError> {
    // Dangling references first, so the graph below only sees valid names.
    for section in sections.values() {
        if let Some(parent) = &section.parent
            && !sections.contains_key(parent)
        {
            return Err(MorphologyError::UnknownParent {
                section: section.name.clone(),
                parent: parent.clone(),
            });
        }
        for child in &section.children {
            if !sections.contains_key(child) {
                return Err(MorphologyError::UnknownChild {
                    section: section.name.clone(),
                    child: child.clone(),
                });
            }
        }
    }

    // Parent links must form a forest. Model them as directed
    // parent -> child edges and reject any cycle.
    let mut graph = DiGraph::<(), ()>::new();
    let indices: BTreeMap<&str, _> = sections
        .keys()
        .map(|name| (name.as_str(), graph.add_node(())))
        .collect();
    for section in sections.values() {
        if let Some(parent) = &section.parent
            && let (Some(&from), Some(&to)) = (
                indices.get(parent.as_str()),
                indices.get(section.name.as_str()),
            )
        {
            graph.add_edge(from, to, ());
        }
    }
    if is_cyclic_directed(&graph) {
        return Err(MorphologyError::Cycle);
    }

    Ok(())
}

impl Serialize for Morphology {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let sections: Vec<&Section> = self.sections.values().collect();
        sections.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Morphology {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let sections = Vec::<Section>::deserialize(deserializer)?;
        Self::from_sections(sections).map_err(serde::de::Error::custom)
    }
}
