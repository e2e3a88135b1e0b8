use serde::Deserialize;
use std::ops::RangeInclusive;

/// A cell on the playing field, measured from the top-left corner.
///
/// Coordinates are signed so that a head that has just left the grid can
/// still be represented and reported as a collision.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct Position {
    pub(crate) x: i32,
    pub(crate) y: i32,
}

impl Position {
    pub(crate) const fn new(x: i32, y: i32) -> Position {
        Position { x, y }
    }

    /// Return the neighboring cell in the given direction
    pub(crate) fn step(self, direction: Direction) -> Position {
        let (dx, dy) = direction.delta();
        Position {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All four directions, in the order used when scanning for any legal
    /// move at all
    pub(crate) const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Down,
        Direction::Up,
    ];

    pub(crate) fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub(crate) fn reverse(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub(crate) fn is_opposite(self, other: Direction) -> bool {
        self.reverse() == other
    }

    /// Rotate a quarter turn clockwise
    pub(crate) fn turn_right(self) -> Direction {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    /// Rotate a quarter turn counterclockwise
    pub(crate) fn turn_left(self) -> Direction {
        self.turn_right().reverse()
    }

    /// The horizontal direction whose sign matches `dx`, if any
    pub(crate) fn along_x(dx: i32) -> Option<Direction> {
        match dx.signum() {
            1 => Some(Direction::Right),
            -1 => Some(Direction::Left),
            _ => None,
        }
    }

    /// The vertical direction whose sign matches `dy`, if any
    pub(crate) fn along_y(dy: i32) -> Option<Direction> {
        match dy.signum() {
            1 => Some(Direction::Down),
            -1 => Some(Direction::Up),
            _ => None,
        }
    }

    /// Numeric action code shared with external policies: up 0, down 1,
    /// left 2, right 3.
    pub(crate) fn index(self) -> u8 {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    pub(crate) fn from_index(index: u8) -> Option<Direction> {
        match index {
            0 => Some(Direction::Up),
            1 => Some(Direction::Down),
            2 => Some(Direction::Left),
            3 => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Dimensions of the playing field
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Grid {
    cols: u16,
    rows: u16,
}

impl Grid {
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub(crate) fn new(cols: u16, rows: u16) -> Grid {
        assert!(
            cols > 0 && rows > 0,
            "grid dimensions must be positive, got {cols}x{rows}"
        );
        Grid { cols, rows }
    }

    /// Width and height in cells
    pub(crate) fn dimensions(self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    pub(crate) fn cols(self) -> i32 {
        i32::from(self.cols)
    }

    pub(crate) fn rows(self) -> i32 {
        i32::from(self.rows)
    }

    /// Total number of cells
    pub(crate) fn area(self) -> usize {
        usize::from(self.cols) * usize::from(self.rows)
    }

    pub(crate) fn contains(self, pos: Position) -> bool {
        (0..self.cols()).contains(&pos.x) && (0..self.rows()).contains(&pos.y)
    }

    pub(crate) fn center(self) -> Position {
        Position::new(self.cols() / 2, self.rows() / 2)
    }

    /// Number of in-bounds cells between `pos` and the wall in `direction`
    pub(crate) fn room(self, pos: Position, direction: Direction) -> i32 {
        let room = match direction {
            Direction::Up => pos.y,
            Direction::Down => self.rows() - 1 - pos.y,
            Direction::Left => pos.x,
            Direction::Right => self.cols() - 1 - pos.x,
        };
        room.max(0)
    }
}

/// A rectangular part of the grid given as fractions of its width and
/// height.  Food is preferentially spawned inside it.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct Region {
    pub(crate) x_min: f64,
    pub(crate) x_max: f64,
    pub(crate) y_min: f64,
    pub(crate) y_max: f64,
}

impl Region {
    /// Inclusive column and row ranges covered by the region on `grid`.
    ///
    /// Each range covers at least one cell and lies within the grid, no
    /// matter how degenerate the fractions are.
    pub(crate) fn cells(self, grid: Grid) -> (RangeInclusive<i32>, RangeInclusive<i32>) {
        (
            span(self.x_min, self.x_max, grid.cols()),
            span(self.y_min, self.y_max, grid.rows()),
        )
    }
}

impl Default for Region {
    fn default() -> Region {
        Region {
            x_min: 0.30,
            x_max: 0.70,
            y_min: 0.40,
            y_max: 0.60,
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn span(min: f64, max: f64, len: i32) -> RangeInclusive<i32> {
    let len_f = f64::from(len);
    let lo = ((len_f * min).floor() as i32).clamp(0, len - 1);
    let hi = ((len_f * max).ceil() as i32 - 1).clamp(lo, len - 1);
    lo..=hi
}
