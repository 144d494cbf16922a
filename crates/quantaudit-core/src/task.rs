//! Classification tasks — the five binary discrimination problems the
//! simulated classifier trains on.
//!
//! Task indices are stable in [0, 4] and double as keys into the audit
//! ledger and the memory matrix domain slices.

use serde::{Deserialize, Serialize};

use crate::basis::StateFamily;

/// One binary classification task over the 6-qubit state families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskKind {
    GhzVsNonGhz,
    WVsNonW,
    Dicke2VsNonDicke2,
    ClusterVsNonCluster,
    RandomVsNonRandom,
}

impl TaskKind {
    /// All tasks in index order.
    pub fn all() -> [TaskKind; 5] {
        [
            TaskKind::GhzVsNonGhz,
            TaskKind::WVsNonW,
            TaskKind::Dicke2VsNonDicke2,
            TaskKind::ClusterVsNonCluster,
            TaskKind::RandomVsNonRandom,
        ]
    }

    /// Stable task index.
    pub fn index(&self) -> usize {
        match self {
            TaskKind::GhzVsNonGhz => 0,
            TaskKind::WVsNonW => 1,
            TaskKind::Dicke2VsNonDicke2 => 2,
            TaskKind::ClusterVsNonCluster => 3,
            TaskKind::RandomVsNonRandom => 4,
        }
    }

    /// Look up a task by its stable index.
    pub fn from_index(idx: usize) -> Option<TaskKind> {
        TaskKind::all().get(idx).copied()
    }

    /// Human-readable task label.
    pub fn label(&self) -> &'static str {
        match self {
            TaskKind::GhzVsNonGhz => "GHZ vs non-GHZ",
            TaskKind::WVsNonW => "W vs non-W",
            TaskKind::Dicke2VsNonDicke2 => "Dicke2 vs non-Dicke2",
            TaskKind::ClusterVsNonCluster => "Cluster vs non-Cluster",
            TaskKind::RandomVsNonRandom => "Random vs non-Random",
        }
    }

    /// One-line description of what the task discriminates.
    pub fn description(&self) -> &'static str {
        match self {
            TaskKind::GhzVsNonGhz => {
                "Classifies maximally entangled GHZ states against general noisy states."
            }
            TaskKind::WVsNonW => {
                "Detects W-family entanglement characteristics in feature sequences."
            }
            TaskKind::Dicke2VsNonDicke2 => "Identifies Dicke states with k=2 excitations.",
            TaskKind::ClusterVsNonCluster => {
                "Discriminates cluster states used in measurement-based quantum computing."
            }
            TaskKind::RandomVsNonRandom => {
                "Baseline task: Distinguishes Haar-random states from structured ones."
            }
        }
    }

    /// Short machine-friendly name for CLI arguments and directory slugs.
    pub fn short_name(&self) -> &'static str {
        match self {
            TaskKind::GhzVsNonGhz => "ghz",
            TaskKind::WVsNonW => "w",
            TaskKind::Dicke2VsNonDicke2 => "dicke2",
            TaskKind::ClusterVsNonCluster => "cluster",
            TaskKind::RandomVsNonRandom => "random",
        }
    }

    /// The ideal state family this task discriminates for.
    pub fn family(&self) -> StateFamily {
        match self {
            TaskKind::GhzVsNonGhz => StateFamily::Ghz,
            TaskKind::WVsNonW => StateFamily::W,
            TaskKind::Dicke2VsNonDicke2 => StateFamily::Dicke2,
            TaskKind::ClusterVsNonCluster => StateFamily::Cluster,
            TaskKind::RandomVsNonRandom => StateFamily::Random,
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for task in TaskKind::all() {
            assert_eq!(TaskKind::from_index(task.index()), Some(task));
        }
        assert_eq!(TaskKind::from_index(5), None);
    }

    #[test]
    fn test_all_in_index_order() {
        for (i, task) in TaskKind::all().iter().enumerate() {
            assert_eq!(task.index(), i);
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(TaskKind::GhzVsNonGhz.label(), "GHZ vs non-GHZ");
        assert_eq!(TaskKind::WVsNonW.label(), "W vs non-W");
        assert_eq!(TaskKind::Dicke2VsNonDicke2.label(), "Dicke2 vs non-Dicke2");
        assert_eq!(TaskKind::ClusterVsNonCluster.label(), "Cluster vs non-Cluster");
        assert_eq!(TaskKind::RandomVsNonRandom.label(), "Random vs non-Random");
    }

    #[test]
    fn test_display_matches_label() {
        for task in TaskKind::all() {
            assert_eq!(task.to_string(), task.label());
        }
    }

    #[test]
    fn test_family_mapping() {
        assert_eq!(TaskKind::GhzVsNonGhz.family(), StateFamily::Ghz);
        assert_eq!(TaskKind::RandomVsNonRandom.family(), StateFamily::Random);
    }

    #[test]
    fn test_short_names_unique() {
        let names: Vec<&str> = TaskKind::all().iter().map(|t| t.short_name()).collect();
        let mut deduped = names.clone();
        deduped.dedup();
        assert_eq!(names.len(), deduped.len());
    }

    #[test]
    fn test_descriptions_not_empty() {
        for task in TaskKind::all() {
            assert!(!task.description().is_empty());
        }
    }
}
