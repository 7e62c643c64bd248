use std::path::PathBuf;

use crate::checkpoint::CheckpointName;

/// A single proof goal to discharge: the statement of a lemma or theorem
/// and the theory file it is declared in.
///
/// Immutable for the lifetime of one search invocation.
#[derive(Debug, Clone)]
pub struct Obligation {
    /// Human-readable name for logs and reports.
    pub name: String,
    /// Path to the theory file as known to the engine server.
    pub theory_path: PathBuf,
    /// The full lemma/theorem statement as it appears in the theory.
    pub statement: String,
}

/// What the engine reports after advancing to the obligation or applying a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    /// Whether the proof is complete after this transition.
    pub proved: bool,
    /// Pretty-printed description of the remaining goals (empty when proved).
    pub goals: String,
}

/// A node in the search tree.
///
/// Nodes are stored in a flat arena (`Vec<SearchNode>`) and reference
/// parents by index. Each node corresponds to an engine checkpoint reached
/// by applying a proof step to the parent checkpoint.
#[derive(Debug, Clone)]
pub struct SearchNode {
    /// Cumulative path cost from the root (sum of candidate costs).
    pub cost: f64,
    /// The step that produced this checkpoint (the obligation statement for the root).
    pub last_step: String,
    /// Pretty-printed goal state at this checkpoint.
    pub goals: String,
    /// Engine checkpoint to resume from when expanding this node.
    pub checkpoint: CheckpointName,
    /// Index of the parent node in the arena, `None` for the root.
    pub parent: Option<usize>,
}

/// Trace the parent chain from a node back to the root, returning arena
/// indices in root-to-node order.
pub fn extract_path(arena: &[SearchNode], index: usize) -> Vec<usize> {
    let mut path = Vec::new();
    let mut current = Some(index);
    while let Some(idx) = current {
        path.push(idx);
        current = arena[idx].parent;
    }
    path.reverse();
    path
}

/// Extract the sequence of steps applied along the path from root to the
/// given node. The root's `last_step` is the obligation statement itself,
/// not an applied step, so it is skipped.
pub fn extract_step_sequence(arena: &[SearchNode], index: usize) -> Vec<String> {
    extract_path(arena, index)
        .into_iter()
        .filter(|&idx| arena[idx].parent.is_some())
        .map(|idx| arena[idx].last_step.clone())
        .collect()
}
