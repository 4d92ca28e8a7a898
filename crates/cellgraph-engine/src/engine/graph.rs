//! Dependency graph for formula cells.
//!
//! Tracks, for every cell identifier, its upstream links (cells its formula
//! reads) and its downstream links (cells whose formulas read it).
//!
//! # Edge Direction
//!
//! ```text
//! B1 = A1 + 1   =>   upstream[B1] = {A1},  downstream[A1] = {B1}
//! ```
//!
//! "What must be recomputed if A1 changes?" is answered by following
//! downstream links.

use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::warn;

use super::cycle::detect_cycle;
use super::format::format_id_list;
use super::CellId;
use crate::error::CycleError;

/// Bidirectional dependency graph over cell identifiers.
///
/// # Invariants
///
/// 1. **Bidirectional consistency:** `b ∈ upstream[a]` iff `a ∈ downstream[b]`.
/// 2. **Acyclic:** no identifier can reach itself through upstream links.
/// 3. **No dangling entries:** empty sets are removed, not stored.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DepGraph {
    /// Cell -> cells it reads from.
    upstream: HashMap<CellId, HashSet<CellId>>,
    /// Cell -> cells that read from it.
    downstream: HashMap<CellId, HashSet<CellId>>,
}

impl DepGraph {
    /// Create an empty dependency graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cells that `id` depends on. Empty for unknown identifiers.
    pub fn upstream<'a>(&'a self, id: &CellId) -> impl Iterator<Item = &'a CellId> + use<'a> {
        self.upstream.get(id).into_iter().flatten()
    }

    /// Cells that depend on `id`. Empty for unknown identifiers.
    pub fn downstream<'a>(&'a self, id: &CellId) -> impl Iterator<Item = &'a CellId> + use<'a> {
        self.downstream.get(id).into_iter().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.upstream.is_empty()
    }

    /// Replace every upstream link of `id` with `new_upstream`.
    ///
    /// The edit is checked against the graph as it would look afterwards
    /// before anything is changed, so a rejected edit leaves the graph
    /// exactly as it was.
    pub fn set_upstream(
        &mut self,
        id: &CellId,
        new_upstream: HashSet<CellId>,
    ) -> Result<(), CycleError> {
        if let Some(path) = detect_cycle(id, &new_upstream, |node| self.upstream.get(node)) {
            let err = CycleError { path };
            warn!(cell = %id, "{}", err);
            return Err(err);
        }

        self.detach(id);
        self.attach(id, new_upstream);
        Ok(())
    }

    /// Drop the upstream links of `id`. Links pointing into `id` are kept,
    /// so cells that reference it still get notified when it changes.
    pub fn remove(&mut self, id: &CellId) {
        self.detach(id);
    }

    fn detach(&mut self, id: &CellId) {
        let Some(old_upstream) = self.upstream.remove(id) else {
            return;
        };
        for up in old_upstream {
            if let Some(readers) = self.downstream.get_mut(&up) {
                readers.remove(id);
                if readers.is_empty() {
                    self.downstream.remove(&up);
                }
            }
        }
    }

    fn attach(&mut self, id: &CellId, new_upstream: HashSet<CellId>) {
        if new_upstream.is_empty() {
            return;
        }
        for up in &new_upstream {
            self.downstream
                .entry(up.clone())
                .or_default()
                .insert(id.clone());
        }
        self.upstream.insert(id.clone(), new_upstream);
    }

    /// Every cell downstream of `changed`, transitively, in an order where
    /// each cell comes after all of its upstream cells from the same set.
    ///
    /// `changed` itself is not included; each cell appears exactly once.
    pub fn recalc_order(&self, changed: &CellId) -> Vec<CellId> {
        let mut visited: HashSet<&CellId> = HashSet::from([changed]);
        let mut finished: Vec<&CellId> = Vec::new();
        let mut stack = vec![(changed, self.downstream(changed))];

        // Iterative DFS post-order; reversing it gives a topological order.
        while let Some((node, readers)) = stack.last_mut() {
            match readers.next() {
                Some(next) => {
                    if visited.insert(next) {
                        stack.push((next, self.downstream(next)));
                    }
                }
                None => {
                    finished.push(*node);
                    stack.pop();
                }
            }
        }

        finished
            .into_iter()
            .rev()
            .filter(|id| *id != changed)
            .cloned()
            .collect()
    }

    /// Panic if the upstream and downstream maps disagree. Test helper.
    #[doc(hidden)]
    pub fn assert_consistent(&self) {
        for (cell, ups) in &self.upstream {
            assert!(!ups.is_empty(), "empty upstream set stored for {cell}");
            for up in ups {
                assert!(
                    self.downstream.get(up).is_some_and(|d| d.contains(cell)),
                    "{cell} reads {up} but is missing from its downstream set"
                );
            }
        }
        for (cell, downs) in &self.downstream {
            assert!(!downs.is_empty(), "empty downstream set stored for {cell}");
            for down in downs {
                assert!(
                    self.upstream.get(down).is_some_and(|u| u.contains(cell)),
                    "{down} is downstream of {cell} but does not read it"
                );
            }
        }
    }
}

fn write_links(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    links: &HashMap<CellId, HashSet<CellId>>,
) -> fmt::Result {
    writeln!(f, "{}:", title)?;
    let mut cells: Vec<_> = links.iter().collect();
    cells.sort_by(|a, b| a.0.cmp(b.0));
    for (cell, neighbours) in cells {
        let mut neighbours: Vec<_> = neighbours.iter().collect();
        neighbours.sort();
        writeln!(f, "{:>4} : [{}]", cell, format_id_list(neighbours, ", "))?;
    }
    Ok(())
}

impl fmt::Display for DepGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_links(f, "Upstream Links", &self.upstream)?;
        write_links(f, "Downstream Links", &self.downstream)
    }
}
