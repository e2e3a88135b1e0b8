use super::grid::Direction;
use super::occupancy::is_cell_safe;
use super::planner::tail_reachable;
use super::state::GameState;
use super::Settings;
use std::cmp::Reverse;

/// Pick a direction for the next tick: head greedily toward the food while
/// avoiding walls, the body, and (if enabled) moves that would cut the snake
/// off from its own tail.
///
/// Moves are chosen in these tiers:
///
/// 1. Among the candidates that do not reverse the snake and do not land on
///    the body or off the grid, take the first that also keeps the tail
///    reachable.
/// 2. If every such candidate would trap the snake, take the first of them
///    anyway.
/// 3. Failing that, take any non-reversing safe direction.
/// 4. Failing that, keep going straight and let the collision happen.
///
/// Candidates are ordered with the food's horizontal axis first, its
/// vertical axis second, and the remaining directions after that, those with
/// more room before the wall first.
///
/// This has no side effects and consumes no randomness, so it can be used
/// as a fallback from anywhere.
pub(crate) fn choose_direction(state: &GameState, settings: &Settings) -> Direction {
    let Some(food) = state.food else {
        return state.direction;
    };
    let grid = settings.grid;
    let snake = &state.snake;
    let head = snake.head();
    let legal =
        |d: Direction| !d.is_opposite(state.direction) && is_cell_safe(grid, head.step(d), snake);

    let mut candidates = Vec::with_capacity(4);
    candidates.extend(Direction::along_x(food.x - head.x));
    candidates.extend(Direction::along_y(food.y - head.y));
    let mut rest = [
        Direction::Up,
        Direction::Left,
        Direction::Down,
        Direction::Right,
    ]
    .into_iter()
    .filter(|d| !candidates.contains(d))
    .collect::<Vec<_>>();
    rest.sort_by_key(|&d| Reverse(grid.room(head, d)));
    candidates.extend(rest);

    let safe = candidates
        .into_iter()
        .filter(|&d| legal(d))
        .collect::<Vec<_>>();
    let chosen = if settings.planner.tail_reachability {
        safe.iter()
            .copied()
            .find(|&d| {
                let next = head.step(d);
                tail_reachable(
                    grid,
                    next,
                    snake,
                    next == food,
                    settings.planner.max_flood_cells,
                )
            })
            .or_else(|| {
                if let Some(&d) = safe.first() {
                    log::debug!("Every safe move traps the snake; going {d:?} anyway");
                }
                safe.first().copied()
            })
    } else {
        safe.first().copied()
    };
    chosen
        .or_else(|| Direction::ALL.into_iter().find(|&d| legal(d)))
        .unwrap_or(state.direction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::grid::{Grid, Position};
    use crate::engine::testing::{cells, settings};
    use crate::engine::ControlMode;
    use rstest::rstest;

    fn state(snake: &[(i32, i32)], direction: Direction, food: Option<(i32, i32)>) -> GameState {
        GameState {
            snake: cells(snake),
            direction,
            pending: direction,
            food: food.map(|(x, y)| Position::new(x, y)),
            score: 0,
            running: true,
            terminal: false,
            mode: ControlMode::Autonomous,
            ticks: 0,
        }
    }

    fn without_planner(cols: u16, rows: u16) -> Settings {
        let mut s = settings(cols, rows);
        s.planner.tail_reachability = false;
        s
    }

    #[rstest]
    #[case((8, 5), Direction::Right)]
    #[case((8, 1), Direction::Right)]
    #[case((4, 1), Direction::Up)]
    #[case((4, 9), Direction::Down)]
    fn heads_for_food(#[case] food: (i32, i32), #[case] expected: Direction) {
        let st = state(&[(2, 6), (3, 6), (4, 6)], Direction::Right, Some(food));
        assert_eq!(choose_direction(&st, &settings(10, 10)), expected);
    }

    #[rstest]
    #[case(&[(5, 7), (6, 7), (7, 7)], Direction::Up)]
    #[case(&[(5, 2), (6, 2), (7, 2)], Direction::Down)]
    fn food_behind_turns_toward_open_side(
        #[case] snake: &[(i32, i32)],
        #[case] expected: Direction,
    ) {
        let head = snake[snake.len() - 1];
        let st = state(snake, Direction::Right, Some((0, head.1)));
        let d = choose_direction(&st, &settings(10, 10));
        assert_ne!(d, Direction::Left);
        assert_eq!(d, expected);
    }

    #[test]
    fn no_food_keeps_direction() {
        let st = state(&[(3, 5), (4, 5), (5, 5)], Direction::Down, None);
        assert_eq!(choose_direction(&st, &settings(10, 10)), Direction::Down);
    }

    #[test]
    fn wall_ahead_food_behind() {
        let st = state(&[(7, 0), (8, 0), (9, 0)], Direction::Right, Some((5, 0)));
        assert_eq!(choose_direction(&st, &settings(10, 10)), Direction::Down);
    }

    #[test]
    fn no_legal_move_keeps_direction() {
        // Boxed into the corner: walls above and to the left, the body to
        // the right and below
        let st = state(
            &[(0, 1), (1, 1), (1, 0), (0, 0)],
            Direction::Left,
            Some((3, 3)),
        );
        assert_eq!(choose_direction(&st, &settings(6, 6)), Direction::Left);
    }

    /// The snake's body walls off the top-left corner; the head sits at
    /// (2, 0) heading up, with the pocket to its left and open space to its
    /// right.
    const CORNER: [(i32, i32); 7] = [(1, 3), (0, 3), (0, 2), (1, 2), (2, 2), (2, 1), (2, 0)];

    #[test]
    fn refuses_to_enter_a_pocket() {
        let st = state(&CORNER, Direction::Up, Some((0, 0)));
        assert_eq!(choose_direction(&st, &settings(6, 6)), Direction::Right);
    }

    #[test]
    fn enters_a_pocket_without_the_planner() {
        let st = state(&CORNER, Direction::Up, Some((0, 0)));
        assert_eq!(
            choose_direction(&st, &without_planner(6, 6)),
            Direction::Left
        );
    }

    #[test]
    fn planner_is_a_soft_veto() {
        // With one more segment the head sits at (1, 0) heading left, and
        // both safe moves lead into the sealed cells
        let mut snake = CORNER.to_vec();
        snake.push((1, 0));
        let st = state(&snake, Direction::Left, Some((5, 5)));
        let d = choose_direction(&st, &settings(6, 6));
        assert_eq!(d, Direction::Down);
        assert!(is_cell_safe(Grid::new(6, 6), st.snake.head().step(d), &st.snake));
    }

    #[test]
    fn only_move_is_kept_despite_the_planner() {
        // Head at (0, 0) heading left: walls above and to the left, the body
        // to the right, and only the sealed cell below
        let mut snake = CORNER.to_vec();
        snake.extend([(1, 0), (0, 0)]);
        let st = state(&snake, Direction::Left, Some((5, 5)));
        let grid = Grid::new(6, 6);
        assert!(!tail_reachable(grid, Position::new(0, 1), &st.snake, false, 220));
        assert_eq!(choose_direction(&st, &settings(6, 6)), Direction::Down);
    }

    #[test]
    fn turns_aside_from_food_that_would_trap_the_tail() {
        // Eating keeps the tail in place, so the planner prefers a move that
        // leaves the tail free to follow
        let st = state(&[(2, 5), (3, 5), (4, 5)], Direction::Right, Some((5, 5)));
        assert_eq!(choose_direction(&st, &settings(10, 10)), Direction::Up);
        assert_eq!(
            choose_direction(&st, &without_planner(10, 10)),
            Direction::Right
        );
    }
}
