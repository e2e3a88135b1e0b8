use super::grid::{Direction, Grid, Position};
use super::snake::Snake;
use std::collections::{HashSet, VecDeque};

/// Check whether the snake could still reach its own tail after moving its
/// head to `head`.
///
/// This is a breadth-first flood fill from `head` over free cells.  Every
/// current segment blocks the search except the tail, which only blocks
/// when the move eats food (`would_grow`), since then the tail stays put for
/// one more tick.  The search succeeds only by visiting the tail cell, so a
/// growing move never reports the tail as reachable.
///
/// At most `budget` cells are expanded.  Running out of budget reports the
/// tail as unreachable: long detours may be missed, but a tail reported as
/// reachable always is.
pub(crate) fn tail_reachable(
    grid: Grid,
    head: Position,
    snake: &Snake,
    would_grow: bool,
    budget: usize,
) -> bool {
    let tail = snake.tail();
    let mut blocked = HashSet::<Position>::from_iter(snake.iter().copied());
    if !would_grow {
        blocked.remove(&tail);
    }
    let mut seen = HashSet::from([head]);
    let mut queue = VecDeque::from([head]);
    let mut expanded = 0;
    while expanded < budget {
        let Some(cell) = queue.pop_front() else {
            break;
        };
        expanded += 1;
        if cell == tail {
            return true;
        }
        for next in Direction::ALL.map(|d| cell.step(d)) {
            if grid.contains(next) && !blocked.contains(&next) && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    false
}
