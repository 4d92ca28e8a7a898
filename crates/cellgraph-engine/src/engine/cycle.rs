//! Circular dependency detection for formula cells.
//!
//! When a formula is entered we must verify it doesn't create a cycle
//! (e.g. A1 references B1, B1 references C1, C1 references A1) before the
//! graph is touched. The search walks upstream links from the edited cell
//! with an explicit stack. Nodes already fully explored are never expanded
//! twice, so graphs with many shared ancestors stay linear.

use std::collections::HashSet;

use super::CellId;

/// Detect whether giving `start` the upstream set `new_upstream` closes a loop.
///
/// `upstream_of` yields the current upstream links of every other cell; the
/// links of `start` itself are taken from `new_upstream`. Returns the cycle
/// path, beginning and ending with `start`, or `None` if the edit is safe.
pub(crate) fn detect_cycle<'a, F>(
    start: &'a CellId,
    new_upstream: &'a HashSet<CellId>,
    upstream_of: F,
) -> Option<Vec<CellId>>
where
    F: Fn(&CellId) -> Option<&'a HashSet<CellId>>,
{
    let neighbours = |node: &CellId| -> Option<&'a HashSet<CellId>> {
        if node == start {
            Some(new_upstream)
        } else {
            upstream_of(node)
        }
    };

    let mut on_path: HashSet<&CellId> = HashSet::from([start]);
    let mut explored: HashSet<&CellId> = HashSet::new();
    let mut path: Vec<&CellId> = vec![start];
    let mut stack = vec![neighbours(start).into_iter().flatten()];

    while let Some(pending) = stack.last_mut() {
        match pending.next() {
            Some(next) if next == start => {
                let mut cycle: Vec<CellId> = path.iter().map(|id| (*id).clone()).collect();
                cycle.push(start.clone());
                return Some(cycle);
            }
            Some(next) => {
                if on_path.contains(next) || explored.contains(next) {
                    continue;
                }
                on_path.insert(next);
                path.push(next);
                stack.push(neighbours(next).into_iter().flatten());
            }
            None => {
                stack.pop();
                if let Some(done) = path.pop() {
                    on_path.remove(done);
                    explored.insert(done);
                }
            }
        }
    }

    None
}
