use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::snake::{Direction, Snake};
use crate::GridPos;

const DEFAULT_DIRECTION: Direction = Direction::Right;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    Running,
    Over,
}

/// Result of advancing the simulation by one tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The snake moved; `ate_food` is set when it landed on the food.
    Advanced { ate_food: bool },
    /// The snake hit a wall or itself. Terminal.
    Collided,
    /// The last free cell was just consumed, leaving nowhere to place
    /// food. Terminal; the snake fills the entire field.
    BoardFull,
}

/// Read-only view of the game state handed to the renderer.
pub struct Snapshot<'a> {
    pub snake: &'a [GridPos],
    pub food: GridPos,
    pub score: u32,
    pub run_state: RunState,
}

/// The simulation core. Owns the snake, the food, the score and the
/// run state; knows nothing about the terminal or timers.
pub struct Simulation {
    width: i16,
    height: i16,
    snake: Snake,
    food: GridPos,
    score: u32,
    run_state: RunState,
    rng: StdRng,
}

impl Simulation {
    /// The field must be at least 2 cells; `Config` enforces a larger
    /// minimum before a `Simulation` is ever built.
    pub fn new(width: i16, height: i16, rng: StdRng) -> Self {
        let mut sim = Simulation {
            width,
            height,
            snake: Snake::new((width / 2, height / 2), DEFAULT_DIRECTION),
            food: (0, 0),
            score: 0,
            run_state: RunState::NotStarted,
            rng,
        };
        sim.place_food();
        sim
    }

    /// Begins a fresh round: one-segment snake at the origin, default
    /// direction, zero score, freshly placed food. Used for both the
    /// initial start and restarts after a game over.
    pub fn reset(&mut self) {
        self.snake = Snake::new(self.origin(), DEFAULT_DIRECTION);
        self.score = 0;
        self.run_state = RunState::Running;
        self.place_food();
        info!("round started on a {}x{} field", self.width, self.height);
    }

    /// Forwards a direction command to the snake. Ignored outside of a
    /// running round; the anti-reversal rule is applied against the
    /// direction at the time of this call, so rapid inputs between two
    /// ticks coalesce to the last accepted one.
    pub fn set_direction(&mut self, requested: Direction) {
        if self.run_state == RunState::Running {
            self.snake.set_direction(requested);
        }
    }

    /// Advances the simulation by one tick.
    pub fn step(&mut self) -> StepOutcome {
        if self.run_state != RunState::Running {
            // Nothing advances outside of a running round.
            return StepOutcome::Collided;
        }

        let candidate = self.snake.next_head();
        if !self.in_bounds(candidate) || self.snake.occupies(candidate) {
            self.run_state = RunState::Over;
            info!(
                "snake collided at ({}, {}), final score {}",
                candidate.0, candidate.1, self.score
            );
            return StepOutcome::Collided;
        }

        let ate_food = candidate == self.food;
        self.snake.advance(candidate, ate_food);

        if ate_food {
            self.score += 1;
            debug!(
                "ate food at ({}, {}), score {}",
                candidate.0, candidate.1, self.score
            );
            if !self.place_food() {
                self.run_state = RunState::Over;
                info!("board full, final score {}", self.score);
                return StepOutcome::BoardFull;
            }
        }

        StepOutcome::Advanced { ate_food }
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            snake: self.snake.body(),
            food: self.food,
            score: self.score,
            run_state: self.run_state,
        }
    }

    pub fn direction(&self) -> Direction {
        self.snake.direction()
    }

    /// Picks a food cell uniformly among the cells the snake does not
    /// occupy. Returns false when no free cell remains (Board-Full).
    fn place_food(&mut self) -> bool {
        let (w, h) = (self.width, self.height);
        let free: Vec<GridPos> = (0..h)
            .flat_map(|y| (0..w).map(move |x| (x, y)))
            .filter(|&pos| !self.snake.occupies(pos))
            .collect();

        match free.choose(&mut self.rng) {
            Some(&pos) => {
                self.food = pos;
                debug!("food placed at ({}, {})", pos.0, pos.1);
                true
            }
            None => false,
        }
    }

    fn origin(&self) -> GridPos {
        (self.width / 2, self.height / 2)
    }

    fn in_bounds(&self, (x, y): GridPos) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }
}
