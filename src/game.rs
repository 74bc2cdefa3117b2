use std::{cmp::max, thread::sleep, time::Duration};

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::{rngs::StdRng, SeedableRng};

use crate::config::Config;
use crate::sim::{Simulation, StepOutcome};
use crate::snake::Direction::{self, *};
use crate::term::TermManager;
use crate::{Coords, GridPos, TermInt};

/// Input poll granularity; key events are drained this often while the
/// tick countdown runs.
const POLL_INTERVAL_MS: u64 = 5;

const SNAKE_BODY_CHAR: char = '█';
const FOOD_CHAR: char = 'O';
const DEAD_SNAKE_CHAR: char = 'X';

#[derive(Debug, PartialEq, Eq)]
enum KeyInput {
    Dir(Direction),
    Confirm,
    Quit,
    Ignore,
}

enum RoundEnd {
    Restart,
    Quit,
}

/// Presentation adapter: owns the terminal and the simulation, runs
/// the fixed-period tick loop and repaints from snapshots.
pub struct SnakeGame {
    term: TermManager,
    sim: Simulation,
    field: (i16, i16),
    ticks_per_step: u64,
}

impl SnakeGame {
    pub fn new(config: Config) -> Result<Self> {
        let term = TermManager::new()?;
        let (term_w, term_h) = term.size();
        let (field_w, field_h) = config.field_dims(term_w, term_h)?;

        Ok(SnakeGame {
            term,
            sim: Simulation::new(field_w, field_h, StdRng::from_entropy()),
            ticks_per_step: max(1, config.tick_ms / POLL_INTERVAL_MS),
            field: (field_w, field_h),
        })
    }

    pub fn run(&mut self) -> Result<()> {
        self.term.setup()?;
        let result = self.run_rounds();
        let restored = self.term.restore();
        result.and(restored)
    }

    fn run_rounds(&mut self) -> Result<()> {
        if !self.show_intro()? {
            return Ok(());
        }

        loop {
            if let RoundEnd::Quit = self.play_round()? {
                return Ok(());
            }
        }
    }

    /// Waits on the intro overlay for the start command. Returns false
    /// when the player quits instead.
    fn show_intro(&mut self) -> Result<bool> {
        self.term.show_message(&[
            "G R I D S N A K E",
            "",
            "Arrow keys or WASD to move",
            "Enter to start",
            "Q or CTRL+C to quit",
        ])?;

        loop {
            match classify_key(&self.term.read_key_blocking()?) {
                KeyInput::Confirm => return Ok(true),
                KeyInput::Quit => return Ok(false),
                _ => {}
            }
        }
    }

    fn play_round(&mut self) -> Result<RoundEnd> {
        self.sim.reset();

        self.term.clear()?;
        self.term.draw_borders(self.border_size())?;
        self.term.hide_message()?;
        self.draw_field()?;

        let mut countdown = self.ticks_per_step;

        loop {
            sleep(Duration::from_millis(POLL_INTERVAL_MS));

            // Direction commands are applied in arrival order; the
            // last accepted one is in effect when the tick fires.
            for ev in self.term.read_key_events_queue()? {
                match classify_key(&ev) {
                    KeyInput::Dir(dir) => self.sim.set_direction(dir),
                    KeyInput::Quit => return Ok(RoundEnd::Quit),
                    KeyInput::Confirm | KeyInput::Ignore => {}
                }
            }

            countdown -= 1;
            if countdown > 0 {
                continue;
            }
            countdown = self.ticks_per_step;

            // Cells about to be vacated, for the incremental repaint
            let snap = self.sim.snapshot();
            let old_head = snap.snake[0];
            let old_tail = snap.snake.last().copied();

            match self.sim.step() {
                StepOutcome::Advanced { ate_food } => {
                    self.redraw_after_step(old_head, old_tail, ate_food)?;
                }
                StepOutcome::Collided => return self.finish_round(false),
                StepOutcome::BoardFull => return self.finish_round(true),
            }
        }
    }

    /// Full field paint: snake, food, score line.
    fn draw_field(&mut self) -> Result<()> {
        let head_glyph = head_char(self.sim.direction());
        let snap = self.sim.snapshot();

        for (i, &pos) in snap.snake.iter().enumerate() {
            let ch = if i == 0 { head_glyph } else { SNAKE_BODY_CHAR };
            self.term.print_at(cell_to_screen(pos), ch)?;
        }
        self.term.print_at(cell_to_screen(snap.food), FOOD_CHAR)?;

        let score = snap.score;
        self.draw_score(score)?;
        self.term.flush()
    }

    fn redraw_after_step(
        &mut self,
        old_head: GridPos,
        old_tail: Option<GridPos>,
        ate_food: bool,
    ) -> Result<()> {
        let head_glyph = head_char(self.sim.direction());
        let snap = self.sim.snapshot();
        let new_head = snap.snake[0];
        let body_len = snap.snake.len();
        let food = snap.food;
        let score = snap.score;

        if !ate_food {
            if let Some(tail) = old_tail {
                self.term.print_at(cell_to_screen(tail), ' ')?;
            }
        }
        if body_len > 1 {
            self.term.print_at(cell_to_screen(old_head), SNAKE_BODY_CHAR)?;
        }
        self.term.print_at(cell_to_screen(new_head), head_glyph)?;

        if ate_food {
            self.term.print_at(cell_to_screen(food), FOOD_CHAR)?;
            self.draw_score(score)?;
        }

        self.term.flush()
    }

    /// Ends the round with the win/lose overlay and waits for the
    /// restart command.
    fn finish_round(&mut self, win: bool) -> Result<RoundEnd> {
        let score = self.sim.snapshot().score;

        if !win {
            let snap = self.sim.snapshot();
            for &pos in snap.snake {
                self.term.print_at(cell_to_screen(pos), DEAD_SNAKE_CHAR)?;
            }
        }

        let title = if win { "You won!" } else { "Game over!" };
        let score_line = format!("Score: {}", score);
        self.term.show_message(&[
            title,
            &score_line,
            "",
            "Press Enter to play again,",
            "or Q to quit.",
        ])?;

        loop {
            match classify_key(&self.term.read_key_blocking()?) {
                KeyInput::Confirm => return Ok(RoundEnd::Restart),
                KeyInput::Quit => return Ok(RoundEnd::Quit),
                _ => {}
            }
        }
    }

    fn draw_score(&mut self, score: u32) -> Result<()> {
        self.term.print_str((2, 0), &format!(" Score: {} ", score))
    }

    fn border_size(&self) -> Coords {
        ((self.field.0 + 2) as TermInt, (self.field.1 + 2) as TermInt)
    }
}

fn cell_to_screen(pos: GridPos) -> Coords {
    // The field sits inside a one-cell border at the screen origin
    ((pos.0 + 1) as TermInt, (pos.1 + 1) as TermInt)
}

fn head_char(direction: Direction) -> char {
    match direction {
        Up => '^',
        Down => 'v',
        Left => '<',
        Right => '>',
    }
}

fn classify_key(ev: &KeyEvent) -> KeyInput {
    if is_ctrl_c(ev) {
        return KeyInput::Quit;
    }

    match ev.code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => KeyInput::Dir(Up),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => KeyInput::Dir(Left),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => KeyInput::Dir(Down),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => KeyInput::Dir(Right),
        KeyCode::Enter => KeyInput::Confirm,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyInput::Quit,
        _ => KeyInput::Ignore,
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(
        ev,
        KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL
        }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::empty(),
        }
    }

    #[test]
    fn arrows_and_wasd_map_to_directions() {
        assert_eq!(classify_key(&key(KeyCode::Up)), KeyInput::Dir(Up));
        assert_eq!(classify_key(&key(KeyCode::Down)), KeyInput::Dir(Down));
        assert_eq!(classify_key(&key(KeyCode::Left)), KeyInput::Dir(Left));
        assert_eq!(classify_key(&key(KeyCode::Right)), KeyInput::Dir(Right));

        assert_eq!(classify_key(&key(KeyCode::Char('w'))), KeyInput::Dir(Up));
        assert_eq!(classify_key(&key(KeyCode::Char('a'))), KeyInput::Dir(Left));
        assert_eq!(classify_key(&key(KeyCode::Char('s'))), KeyInput::Dir(Down));
        assert_eq!(classify_key(&key(KeyCode::Char('d'))), KeyInput::Dir(Right));
        assert_eq!(classify_key(&key(KeyCode::Char('D'))), KeyInput::Dir(Right));
    }

    #[test]
    fn enter_is_the_start_and_restart_command() {
        assert_eq!(classify_key(&key(KeyCode::Enter)), KeyInput::Confirm);
    }

    #[test]
    fn quit_keys() {
        assert_eq!(classify_key(&key(KeyCode::Char('q'))), KeyInput::Quit);
        assert_eq!(classify_key(&key(KeyCode::Esc)), KeyInput::Quit);

        let ctrl_c = KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
        };
        assert_eq!(classify_key(&ctrl_c), KeyInput::Quit);
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        assert_eq!(classify_key(&key(KeyCode::Char('x'))), KeyInput::Ignore);
        assert_eq!(classify_key(&key(KeyCode::Tab)), KeyInput::Ignore);
    }

    #[test]
    fn head_glyph_tracks_direction() {
        assert_eq!(head_char(Up), '^');
        assert_eq!(head_char(Down), 'v');
        assert_eq!(head_char(Left), '<');
        assert_eq!(head_char(Right), '>');
    }

    #[test]
    fn cells_are_offset_past_the_border() {
        assert_eq!(cell_to_screen((0, 0)), (1, 1));
        assert_eq!(cell_to_screen((5, 3)), (6, 4));
    }
}
