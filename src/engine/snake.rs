use super::grid::{Grid, Position};
use std::collections::VecDeque;

/// The body of the snake, one cell per segment.
///
/// Segments are stored tail first, so the head is always the last element.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Snake {
    segments: VecDeque<Position>,
}

impl Snake {
    /// Create a horizontal snake of `length` cells whose head is at `head`
    /// and whose body trails off to the left.
    ///
    /// # Panics
    ///
    /// Panics if `length` is zero.
    pub(crate) fn new(head: Position, length: usize) -> Snake {
        assert!(length > 0, "a snake needs at least one segment");
        let segments = (0..length)
            .rev()
            .map(|back| {
                let back = i32::try_from(back).expect("snake length should fit in an i32");
                Position::new(head.x - back, head.y)
            })
            .collect();
        Snake { segments }
    }

    /// Build a snake from explicit segments, tail first.
    ///
    /// # Panics
    ///
    /// Panics if `segments` is empty.
    pub(crate) fn from_segments<I: IntoIterator<Item = Position>>(segments: I) -> Snake {
        let segments = VecDeque::from_iter(segments);
        assert!(!segments.is_empty(), "a snake needs at least one segment");
        Snake { segments }
    }

    pub(crate) fn head(&self) -> Position {
        *self
            .segments
            .back()
            .expect("snake should never be empty")
    }

    pub(crate) fn tail(&self) -> Position {
        *self
            .segments
            .front()
            .expect("snake should never be empty")
    }

    pub(crate) fn len(&self) -> usize {
        self.segments.len()
    }

    /// Iterate over the segments from tail to head
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Position> + '_ {
        self.segments.iter()
    }

    pub(crate) fn contains(&self, pos: Position) -> bool {
        self.segments.contains(&pos)
    }

    /// Push a new head and keep the tail
    pub(crate) fn grow(&mut self, head: Position) {
        self.segments.push_back(head);
    }

    /// Push a new head and drop the tail, keeping the length constant
    pub(crate) fn advance(&mut self, head: Position) {
        self.segments.push_back(head);
        let _ = self.segments.pop_front();
    }

    /// Whether the head is off the grid or sits on another segment.  The
    /// head is never compared against itself.
    pub(crate) fn head_collides(&self, grid: Grid) -> bool {
        let head = self.head();
        !grid.contains(head) || self.segments.iter().rev().skip(1).any(|&p| p == head)
    }
}
