use std::collections::VecDeque;

use crate::components::Direction;
use crate::grid::Board;

/// Ordered cells from start to goal inclusive. Each consecutive pair is linked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    cells: Vec<usize>,
}

impl Path {
    pub fn cells(&self) -> &[usize] {
        &self.cells
    }

    pub fn start(&self) -> usize {
        self.cells[0]
    }

    pub fn goal(&self) -> usize {
        self.cells[self.cells.len() - 1]
    }

    /// Number of moves between cells (cell count minus one).
    pub fn len_hops(&self) -> usize {
        self.cells.len() - 1
    }

    pub fn contains(&self, cell: usize) -> bool {
        self.cells.contains(&cell)
    }

    /// Position of `cell` along the path.
    pub fn position(&self, cell: usize) -> Option<usize> {
        self.cells.iter().position(|&c| c == cell)
    }
}

/// Breadth-first search from `start` to `goal` over reciprocally connected cells.
///
/// Neighbours are visited up, right, down, left; a cell's predecessor is fixed on
/// first visit, so the result is a shortest path by hop count and is the same
/// for identical boards. Stops once `goal` is dequeued. `None` means no path,
/// which is a normal board state.
pub fn find_path(board: &Board, start: usize, goal: usize) -> Option<Path> {
    let n = board.len();
    assert!(start < n, "start cell {} outside board of {} cells", start, n);
    assert!(goal < n, "goal cell {} outside board of {} cells", goal, n);

    let mut visited = vec![false; n];
    let mut prev: Vec<Option<usize>> = vec![None; n];
    let mut queue: VecDeque<usize> = VecDeque::with_capacity(n);

    visited[start] = true;
    queue.push_back(start);

    while let Some(cur) = queue.pop_front() {
        if cur == goal {
            break;
        }
        let tile = board.tile(cur);
        for dir in Direction::ALL {
            if !tile.has_connector(dir) {
                continue;
            }
            let Some(next) = board.neighbor(cur, dir) else {
                continue;
            };
            if visited[next] || !board.tile(next).has_connector(dir.opposite()) {
                continue;
            }
            visited[next] = true;
            prev[next] = Some(cur);
            queue.push_back(next);
        }
    }

    if !visited[goal] {
        return None;
    }

    let mut cells = vec![goal];
    let mut cur = goal;
    while let Some(p) = prev[cur] {
        cells.push(p);
        cur = p;
    }
    cells.reverse();
    Some(Path { cells })
}

impl Board {
    /// Path between this board's own start and goal cells.
    pub fn find_path(&self) -> Option<Path> {
        find_path(self, self.start, self.goal)
    }
}
