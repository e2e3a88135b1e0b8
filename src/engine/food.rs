use super::grid::{Grid, Position, Region};
use super::occupancy::is_cell_safe;
use super::snake::Snake;
use rand::Rng;

/// Number of samples drawn from the food region before falling back to the
/// whole grid
pub(crate) const FOOD_REGION_ATTEMPTS: usize = 100;

/// Pick a cell for the next piece of food.
///
/// Cells inside `region` are tried first; once [`FOOD_REGION_ATTEMPTS`]
/// samples there have all landed on the snake, the whole grid is sampled
/// instead.  The snake must not cover the entire grid.
pub(crate) fn place_food<R: Rng>(
    grid: Grid,
    region: Region,
    snake: &Snake,
    rng: &mut R,
) -> Position {
    debug_assert!(
        snake.len() < grid.area(),
        "place_food() called on a full grid"
    );
    let (xs, ys) = region.cells(grid);
    for _ in 0..FOOD_REGION_ATTEMPTS {
        let pos = Position::new(
            rng.random_range(xs.clone()),
            rng.random_range(ys.clone()),
        );
        if is_cell_safe(grid, pos, snake) {
            return pos;
        }
    }
    log::debug!(
        "Food region crowded after {FOOD_REGION_ATTEMPTS} attempts; sampling the whole grid"
    );
    loop {
        let pos = Position::new(
            rng.random_range(0..grid.cols()),
            rng.random_range(0..grid.rows()),
        );
        if is_cell_safe(grid, pos, snake) {
            return pos;
        }
    }
}
