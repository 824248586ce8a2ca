//! Shortest-path planning over an occupancy grid.
//!
//! [`plan`] runs a uniform-cost best-first search (Dijkstra) over the implicit
//! graph of open cells, where 4-adjacent open cells are joined by weight-1
//! edges. The frontier is a binary heap keyed by accumulated distance, so
//! terrain costs other than 1 can be added by changing [`step_cost`] alone.
//!
//! Ties between equal-distance entries are broken by insertion order (first
//! discovered, first expanded) and neighbours are discovered right, left,
//! down, up. The result is therefore reproducible for a given grid and
//! start/goal pair.
//!
//! An unreachable goal is an explicit [`EngineError::PathNotFound`]; the
//! planner never returns a truncated or single-node stand-in.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use log::trace;
use rustc_hash::FxHashMap;

use crate::error::EngineError;
use crate::resources::grid::{Node, OccupancyGrid};

/// Ordered list of nodes from start to goal, both included.
pub type Path = Vec<Node>;

/// Cost of moving between two adjacent open cells.
fn step_cost(_grid: &OccupancyGrid, _from: Node, _to: Node) -> u32 {
    1
}

/// Compute the shortest path from `start` to `goal`.
///
/// Both endpoints must be in bounds and open, otherwise the request is
/// rejected with [`EngineError::MalformedGrid`] before any search. When
/// `start == goal` the path is `[start]`.
pub fn plan(grid: &OccupancyGrid, start: Node, goal: Node) -> Result<Path, EngineError> {
    grid.check_endpoint(start)?;
    grid.check_endpoint(goal)?;

    // (distance, insertion sequence, node): the sequence makes ties FIFO.
    let mut frontier: BinaryHeap<Reverse<(u32, u64, Node)>> = BinaryHeap::new();
    let mut distances: FxHashMap<Node, u32> = FxHashMap::default();
    let mut parents: FxHashMap<Node, Node> = FxHashMap::default();
    let mut sequence: u64 = 0;

    distances.insert(start, 0);
    frontier.push(Reverse((0, sequence, start)));

    let mut found = false;
    while let Some(Reverse((dist, _, node))) = frontier.pop() {
        if node == goal {
            found = true;
            break;
        }
        if distances.get(&node).is_some_and(|&best| dist > best) {
            continue;
        }
        for neighbour in grid.open_neighbours(node) {
            let candidate = dist + step_cost(grid, node, neighbour);
            let improves = distances
                .get(&neighbour)
                .is_none_or(|&known| candidate < known);
            if improves {
                distances.insert(neighbour, candidate);
                parents.insert(neighbour, node);
                sequence += 1;
                frontier.push(Reverse((candidate, sequence, neighbour)));
            }
        }
    }

    if !found {
        return Err(EngineError::PathNotFound { start, goal });
    }

    let mut path = vec![goal];
    let mut cursor = goal;
    while cursor != start {
        match parents.get(&cursor) {
            Some(&parent) => {
                path.push(parent);
                cursor = parent;
            }
            None => return Err(EngineError::PathNotFound { start, goal }),
        }
    }
    path.reverse();
    trace!("Planned {} steps from {} to {}", path.len() - 1, start, goal);
    Ok(path)
}

/// True when `path` is a valid route on `grid`: non-empty, ends at the given
/// nodes, and every consecutive pair is a 4-adjacent pair of open cells.
pub fn is_valid_path(grid: &OccupancyGrid, path: &[Node], start: Node, goal: Node) -> bool {
    let (Some(first), Some(last)) = (path.first(), path.last()) else {
        return false;
    };
    *first == start
        && *last == goal
        && path.iter().all(|n| grid.is_open(*n))
        && path.windows(2).all(|w| w[0].is_adjacent(&w[1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GridFault;

    fn grid(rows: &[&str]) -> OccupancyGrid {
        OccupancyGrid::parse(rows).unwrap()
    }

    #[test]
    fn test_three_by_three_with_centre_wall() {
        let g = grid(&["...", ".#.", "..."]);
        let path = plan(&g, Node::new(0, 0), Node::new(2, 2)).unwrap();
        assert_eq!(
            path,
            vec![
                Node::new(0, 0),
                Node::new(0, 1),
                Node::new(0, 2),
                Node::new(1, 2),
                Node::new(2, 2)
            ]
        );
    }

    #[test]
    fn test_start_equals_goal() {
        let g = grid(&["..", ".."]);
        let path = plan(&g, Node::new(1, 1), Node::new(1, 1)).unwrap();
        assert_eq!(path, vec![Node::new(1, 1)]);
    }

    #[test]
    fn test_unreachable_goal_fails() {
        let g = grid(&["..#..", "..#..", "..#.."]);
        let err = plan(&g, Node::new(0, 0), Node::new(2, 4)).unwrap_err();
        assert_eq!(
            err,
            EngineError::PathNotFound {
                start: Node::new(0, 0),
                goal: Node::new(2, 4)
            }
        );
    }

    #[test]
    fn test_blocked_endpoint_rejected() {
        let g = grid(&[".#"]);
        assert_eq!(
            plan(&g, Node::new(0, 0), Node::new(0, 1)),
            Err(EngineError::MalformedGrid(GridFault::Blocked(Node::new(0, 1))))
        );
    }

    #[test]
    fn test_out_of_bounds_endpoint_rejected() {
        let g = grid(&[".."]);
        assert!(matches!(
            plan(&g, Node::new(3, 0), Node::new(0, 1)),
            Err(EngineError::MalformedGrid(GridFault::OutOfBounds { .. }))
        ));
    }

    #[test]
    fn test_lesson_grid() {
        let g = grid(&[
            "......", ".####.", "...#..", ".#...#", "...#..", "......",
        ]);
        let start = Node::new(0, 0);
        let goal = Node::new(5, 5);
        let path = plan(&g, start, goal).unwrap();
        assert!(is_valid_path(&g, &path, start, goal));
        assert_eq!(path.len() - 1, 10);
    }

    #[test]
    fn test_deterministic() {
        let g = grid(&["....", "....", "...."]);
        let a = plan(&g, Node::new(0, 0), Node::new(2, 3)).unwrap();
        let b = plan(&g, Node::new(0, 0), Node::new(2, 3)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_is_valid_path_rejects_gaps() {
        let g = grid(&["..."]);
        assert!(!is_valid_path(&g, &[], Node::new(0, 0), Node::new(0, 2)));
        assert!(!is_valid_path(
            &g,
            &[Node::new(0, 0), Node::new(0, 2)],
            Node::new(0, 0),
            Node::new(0, 2)
        ));
    }
}
