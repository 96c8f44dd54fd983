//! Curriculum catalog: the static concept graph and track subject lists.
//!
//! The catalog is an immutable, load-once registry shared by all learners.
//! Construction validates the prerequisite graph (duplicate ids, dangling
//! references, cycles) so every catalog in circulation is well formed.

use std::collections::HashMap;

use crate::error::{MasteryError, Result};
use crate::types::{ConceptMastery, ConceptNode, Track};

/// Subjects covered by each academic track, in display order.
pub fn subjects_for_track(track: Track) -> &'static [&'static str] {
    match track {
        Track::Science => &["Mathematics", "Physics", "Chemistry", "Biology"],
        Track::Arts => &["English", "History", "Government", "Literature"],
    }
}

/// Immutable concept registry with an id index.
#[derive(Debug, Clone)]
pub struct CurriculumCatalog {
    nodes: Vec<ConceptNode>,
    index: HashMap<String, usize>,
}

impl CurriculumCatalog {
    /// Build a catalog from concept nodes, validating the graph.
    pub fn new(nodes: Vec<ConceptNode>) -> Result<Self> {
        let mut index = HashMap::with_capacity(nodes.len());
        for (pos, node) in nodes.iter().enumerate() {
            if index.insert(node.id.clone(), pos).is_some() {
                return Err(MasteryError::DuplicateConcept {
                    id: node.id.clone(),
                });
            }
        }

        for node in &nodes {
            for prerequisite in &node.prerequisites {
                if !index.contains_key(prerequisite) {
                    return Err(MasteryError::UnknownPrerequisite {
                        id: node.id.clone(),
                        prerequisite: prerequisite.clone(),
                    });
                }
            }
        }

        let catalog = Self { nodes, index };
        catalog.check_acyclic()?;
        Ok(catalog)
    }

    /// Load a catalog from its JSON representation.
    pub fn from_json(content: &str) -> Result<Self> {
        let nodes: Vec<ConceptNode> = serde_json::from_str(content)?;
        Self::new(nodes)
    }

    pub fn get(&self, id: &str) -> Option<&ConceptNode> {
        self.index.get(id).map(|&pos| &self.nodes[pos])
    }

    /// Look up a concept, surfacing a lookup error when absent.
    pub fn require(&self, id: &str) -> Result<&ConceptNode> {
        self.get(id).ok_or_else(|| MasteryError::UnknownConcept {
            id: id.to_string(),
        })
    }

    pub fn nodes(&self) -> &[ConceptNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Concepts whose subject is in the given list, in catalog order.
    pub fn nodes_for_subjects(&self, subjects: &[&str]) -> Vec<&ConceptNode> {
        self.nodes
            .iter()
            .filter(|node| subjects.contains(&node.subject.as_str()))
            .collect()
    }

    /// Concepts belonging to a learner's track.
    pub fn nodes_for_track(&self, track: Track) -> Vec<&ConceptNode> {
        self.nodes_for_subjects(subjects_for_track(track))
    }

    /// Whether a concept is unlockable for a learner: every prerequisite
    /// must have a mastery record with retention at or above `threshold`.
    pub fn is_unlocked(
        &self,
        id: &str,
        mastery: &HashMap<String, ConceptMastery>,
        threshold: f64,
    ) -> Result<bool> {
        let node = self.require(id)?;
        Ok(node.prerequisites.iter().all(|prerequisite| {
            mastery
                .get(prerequisite)
                .is_some_and(|record| record.retention_score >= threshold)
        }))
    }

    /// Reject prerequisite cycles with a three-color depth-first search.
    fn check_acyclic(&self) -> Result<()> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            InProgress,
            Done,
        }

        let mut marks = vec![Mark::Unvisited; self.nodes.len()];

        // Explicit stack; (node, next prerequisite to expand).
        let mut stack: Vec<(usize, usize)> = Vec::new();

        for start in 0..self.nodes.len() {
            if marks[start] != Mark::Unvisited {
                continue;
            }
            marks[start] = Mark::InProgress;
            stack.push((start, 0));

            while let Some(frame) = stack.last_mut() {
                let (pos, edge) = *frame;
                let node = &self.nodes[pos];
                if edge < node.prerequisites.len() {
                    frame.1 += 1;
                    let next_id = &node.prerequisites[edge];
                    let next = self.index[next_id];
                    match marks[next] {
                        Mark::Unvisited => {
                            marks[next] = Mark::InProgress;
                            stack.push((next, 0));
                        }
                        Mark::InProgress => {
                            return Err(MasteryError::PrerequisiteCycle {
                                id: next_id.clone(),
                            });
                        }
                        Mark::Done => {}
                    }
                } else {
                    marks[pos] = Mark::Done;
                    stack.pop();
                }
            }
        }

        Ok(())
    }
}
