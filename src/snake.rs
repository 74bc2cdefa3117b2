use crate::GridPos;
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Offset of one cell of movement in this direction.
    pub fn delta(self) -> (i16, i16) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Up, Down) | (Down, Up) | (Left, Right) | (Right, Left)
        )
    }
}

/// Snake body: head first, tail last. Never empty.
#[derive(Clone, Debug)]
pub struct Snake {
    body: Vec<GridPos>,
    direction: Direction,
}

impl Snake {
    pub fn new(origin: GridPos, direction: Direction) -> Self {
        Snake { body: vec![origin], direction }
    }

    pub fn body(&self) -> &[GridPos] {
        &self.body
    }

    pub fn head(&self) -> GridPos {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// The cell the head would enter on the next step.
    pub fn next_head(&self) -> GridPos {
        let (x, y) = self.head();
        let (dx, dy) = self.direction.delta();
        (x + dx, y + dy)
    }

    /// Whether any segment, tail included, occupies `pos`.
    pub fn occupies(&self, pos: GridPos) -> bool {
        self.body.contains(&pos)
    }

    /// Advance the head into `new_head`. Keeps the tail in place when
    /// `grow` is set, otherwise vacates it.
    pub fn advance(&mut self, new_head: GridPos, grow: bool) {
        self.body.insert(0, new_head);
        if !grow {
            self.body.pop();
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Applies the requested direction, silently ignoring an exact
    /// reversal of the current one.
    pub fn set_direction(&mut self, requested: Direction) {
        if !self.direction.is_opposite(requested) {
            self.direction = requested;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_deltas() {
        assert_eq!(Up.delta(), (0, -1));
        assert_eq!(Down.delta(), (0, 1));
        assert_eq!(Left.delta(), (-1, 0));
        assert_eq!(Right.delta(), (1, 0));
    }

    #[test]
    fn opposite_directions() {
        assert!(Up.is_opposite(Down));
        assert!(Down.is_opposite(Up));
        assert!(Left.is_opposite(Right));
        assert!(Right.is_opposite(Left));

        assert!(!Up.is_opposite(Left));
        assert!(!Right.is_opposite(Down));
        assert!(!Up.is_opposite(Up));
    }

    #[test]
    fn new_snake_is_a_single_segment() {
        let snake = Snake::new((5, 5), Right);
        assert_eq!(snake.body(), &[(5, 5)]);
        assert_eq!(snake.head(), (5, 5));
        assert_eq!(snake.len(), 1);
    }

    #[test]
    fn next_head_follows_direction() {
        let mut snake = Snake::new((5, 5), Right);
        assert_eq!(snake.next_head(), (6, 5));
        snake.set_direction(Up);
        assert_eq!(snake.next_head(), (5, 4));
    }

    #[test]
    fn reversal_is_ignored() {
        let mut snake = Snake::new((5, 5), Right);
        snake.set_direction(Left);
        assert_eq!(snake.direction(), Right);

        snake.set_direction(Down);
        assert_eq!(snake.direction(), Down);
        snake.set_direction(Up);
        assert_eq!(snake.direction(), Down);
    }

    #[test]
    fn rapid_turns_apply_per_call() {
        // Right -> Up is legal, and Up -> Left is legal, so two inputs
        // between ticks may end up reversing the original heading.
        let mut snake = Snake::new((5, 5), Right);
        snake.set_direction(Up);
        snake.set_direction(Left);
        assert_eq!(snake.direction(), Left);
    }

    #[test]
    fn advance_without_growth_keeps_length() {
        let mut snake = Snake::new((5, 5), Right);
        snake.advance((6, 5), false);
        assert_eq!(snake.body(), &[(6, 5)]);

        snake.advance((7, 5), true);
        snake.advance((8, 5), false);
        assert_eq!(snake.body(), &[(8, 5), (7, 5)]);
    }

    #[test]
    fn advance_with_growth_adds_a_segment() {
        let mut snake = Snake::new((5, 5), Right);
        snake.advance((6, 5), true);
        assert_eq!(snake.body(), &[(6, 5), (5, 5)]);
        assert_eq!(snake.len(), 2);
    }

    #[test]
    fn occupies_checks_every_segment() {
        let mut snake = Snake::new((5, 5), Right);
        snake.advance((6, 5), true);
        snake.advance((7, 5), true);

        assert!(snake.occupies((7, 5)));
        assert!(snake.occupies((6, 5)));
        assert!(snake.occupies((5, 5)));
        assert!(!snake.occupies((4, 5)));
    }
}
