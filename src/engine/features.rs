use super::grid::{Direction, Grid, Position};
use super::occupancy::is_cell_safe;
use super::state::GameState;

/// Number of values in an observation vector
pub(crate) const OBSERVATION_LEN: usize = 11;

/// One applied tick: the state before it, the direction that was committed,
/// and the state after it
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Transition {
    pub(crate) previous: GameState,
    pub(crate) action: Direction,
    pub(crate) state: GameState,
    pub(crate) terminal: bool,
}

/// Summarize a game state as the fixed-length vector handed to external
/// learners.
///
/// The values are, in order:
///
/// - head column and row, as fractions of the grid's width and height
/// - horizontal and vertical distance from head to food, likewise scaled
///   (both zero when there is no food)
/// - 1.0 if moving straight ahead, turning right, or turning left
///   (relative to the current direction) would be fatal, else 0.0
/// - one-hot encoding of the current direction in the order up, down,
///   left, right
pub(crate) fn observe(state: &GameState, grid: Grid) -> [f64; OBSERVATION_LEN] {
    let head = state.snake.head();
    let cols = f64::from(grid.cols());
    let rows = f64::from(grid.rows());
    let (food_dx, food_dy) = state
        .food
        .map_or((0.0, 0.0), |f| {
            (f64::from(f.x - head.x) / cols, f64::from(f.y - head.y) / rows)
        });
    let danger = |d: Direction| {
        if is_cell_safe(grid, head.step(d), &state.snake) {
            0.0
        } else {
            1.0
        }
    };
    let heading = |d: Direction| if state.direction == d { 1.0 } else { 0.0 };
    [
        f64::from(head.x) / cols,
        f64::from(head.y) / rows,
        food_dx,
        food_dy,
        danger(state.direction),
        danger(state.direction.turn_right()),
        danger(state.direction.turn_left()),
        heading(Direction::Up),
        heading(Direction::Down),
        heading(Direction::Left),
        heading(Direction::Right),
    ]
}

const REWARD_EAT: f64 = 10.0;
const REWARD_HIT_WALL: f64 = -10.0;
const REWARD_HIT_SELF: f64 = -10.0;
const REWARD_SURVIVE: f64 = 0.1;
const REWARD_APPROACH: f64 = 0.5;

/// Score a transition for an external learner.
///
/// Eating is worth [`REWARD_EAT`].  A fatal move adds the wall or body
/// penalty and nothing else.  Any other move earns [`REWARD_SURVIVE`] plus
/// or minus [`REWARD_APPROACH`] depending on whether the head got closer to
/// the food.
pub(crate) fn reward(transition: &Transition, grid: Grid) -> f64 {
    let before = &transition.previous;
    let after = &transition.state;
    let mut reward = 0.0;
    if after.score > before.score {
        reward += REWARD_EAT;
    }
    let head = after.snake.head();
    if after.snake.head_collides(grid) {
        reward += if grid.contains(head) {
            REWARD_HIT_SELF
        } else {
            REWARD_HIT_WALL
        };
        return reward;
    }
    reward += REWARD_SURVIVE;
    if let (Some(_), Some(food)) = (before.food, after.food) {
        let old = manhattan(before.snake.head(), food);
        let new = manhattan(head, food);
        if new < old {
            reward += REWARD_APPROACH;
        } else if new > old {
            reward -= REWARD_APPROACH;
        }
    }
    reward
}

fn manhattan(a: Position, b: Position) -> u32 {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}
