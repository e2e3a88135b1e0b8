use super::grid::{Grid, Position};
use super::snake::Snake;

/// Whether the snake's head could move onto `pos` without hitting a wall or
/// any current segment of `snake`
pub(crate) fn is_cell_safe(grid: Grid, pos: Position, snake: &Snake) -> bool {
    grid.contains(pos) && !snake.contains(pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Position::new(0, 0), true)]
    #[case(Position::new(9, 9), true)]
    #[case(Position::new(-1, 3), false)]
    #[case(Position::new(3, -1), false)]
    #[case(Position::new(10, 3), false)]
    #[case(Position::new(3, 10), false)]
    #[case(Position::new(4, 5), false)]
    #[case(Position::new(5, 5), false)]
    #[case(Position::new(6, 5), true)]
    fn safety(#[case] pos: Position, #[case] safe: bool) {
        let grid = Grid::new(10, 10);
        let snake = Snake::from_segments([Position::new(4, 5), Position::new(5, 5)]);
        assert_eq!(is_cell_safe(grid, pos, &snake), safe);
    }
}
