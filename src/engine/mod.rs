//! The simulation proper: game state, tick transitions, food placement and
//! the autopilot.  Nothing in here performs I/O.
mod autopilot;
mod features;
mod food;
mod grid;
mod occupancy;
mod planner;
mod snake;
mod state;
pub(crate) use self::autopilot::choose_direction;
pub(crate) use self::features::{observe, reward, Transition, OBSERVATION_LEN};
pub(crate) use self::grid::{Direction, Grid, Position, Region};
pub(crate) use self::state::{ControlMode, GameState};
use self::food::place_food;
use rand::Rng;
use serde::Deserialize;

/// Parameters fixed for the lifetime of a session
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Settings {
    pub(crate) grid: Grid,
    pub(crate) initial_length: usize,
    pub(crate) food_region: Region,
    pub(crate) planner: PlannerSettings,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct PlannerSettings {
    /// Whether the autopilot prefers moves that keep its tail reachable
    pub(crate) tail_reachability: bool,

    /// Maximum number of cells the flood fill may expand per candidate
    pub(crate) max_flood_cells: usize,
}

impl Default for PlannerSettings {
    fn default() -> PlannerSettings {
        PlannerSettings {
            tail_reachability: true,
            max_flood_cells: 220,
        }
    }
}

/// One game session: the live [`GameState`] plus the settings and random
/// number generator that drive its transitions
#[derive(Clone, Debug)]
pub(crate) struct Session<R = rand::rngs::ThreadRng> {
    rng: R,
    settings: Settings,
    state: GameState,
}

impl Session<rand::rngs::ThreadRng> {
    pub(crate) fn new(settings: Settings, mode: ControlMode) -> Self {
        Session::new_with_rng(settings, mode, rand::rng())
    }
}

impl<R: Rng> Session<R> {
    pub(crate) fn new_with_rng(settings: Settings, mode: ControlMode, mut rng: R) -> Session<R> {
        let state = GameState::new(&settings, mode, &mut rng);
        Session {
            rng,
            settings,
            state,
        }
    }

    /// Start the game.  A finished game is replaced by a fresh one that
    /// keeps the control mode.  Does nothing if the game is already running.
    pub(crate) fn start(&mut self) {
        if self.state.running {
            return;
        }
        if self.state.terminal {
            self.state = GameState::new(&self.settings, self.state.mode, &mut self.rng);
        }
        if self.state.mode == ControlMode::Menu {
            let _ = self.state.set_control_mode(ControlMode::Manual);
        }
        self.state.running = true;
        log::info!("Game started in {} mode", self.state.mode.as_str());
    }

    /// Advance the game by one cell.  Returns the transition that took
    /// place, or `None` if the game is not running.
    pub(crate) fn tick(&mut self) -> Option<Transition> {
        if !self.state.running {
            return None;
        }
        let previous = self.state.clone();
        let Settings {
            grid, food_region, ..
        } = self.settings;
        let state = &mut self.state;
        state.direction = state.pending;
        let head = state.snake.head().step(state.direction);
        if state.food == Some(head) {
            state.snake.grow(head);
            state.score += 1;
            state.food = (state.snake.len() < grid.area())
                .then(|| place_food(grid, food_region, &state.snake, &mut self.rng));
        } else {
            state.snake.advance(head);
        }
        state.ticks += 1;
        if state.snake.head_collides(grid) {
            log::info!(
                "Snake crashed at ({}, {}) after {} ticks; final score {}",
                head.x,
                head.y,
                state.ticks,
                state.score
            );
            state.end();
        } else if state.food.is_none() {
            log::info!("Snake filled the grid; final score {}", state.score);
            state.end();
        }
        Some(Transition {
            previous,
            action: state.direction,
            terminal: state.terminal,
            state: state.clone(),
        })
    }

    /// Request a direction for the next tick; see
    /// [`GameState::set_pending_direction()`]
    pub(crate) fn set_pending_direction(&mut self, direction: Direction) -> bool {
        self.state.set_pending_direction(direction)
    }

    /// Change the control mode; see [`GameState::set_control_mode()`]
    pub(crate) fn set_control_mode(&mut self, mode: ControlMode) -> bool {
        let changed = self.state.set_control_mode(mode);
        if !changed {
            log::debug!("Ignoring switch to {} mode while running", mode.as_str());
        }
        changed
    }

    /// End the game immediately
    pub(crate) fn end(&mut self) {
        self.state.end();
    }
}

impl<R> Session<R> {
    pub(crate) fn state(&self) -> &GameState {
        &self.state
    }

    pub(crate) fn settings(&self) -> &Settings {
        &self.settings
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    pub(crate) const RNG_SEED: u64 = 0x0123456789ABCDEF;

    /// Settings for a `cols`x`rows` grid with a snake of length 4, or as long
    /// as fits on narrower grids
    pub(crate) fn settings(cols: u16, rows: u16) -> Settings {
        Settings {
            grid: Grid::new(cols, rows),
            initial_length: usize::from(cols / 2 + 1).min(4),
            food_region: Region::default(),
            planner: PlannerSettings::default(),
        }
    }

    pub(crate) fn cells(cells: &[(i32, i32)]) -> snake::Snake {
        snake::Snake::from_segments(cells.iter().map(|&(x, y)| Position::new(x, y)))
    }

    /// A running session on a `cols`x`rows` grid with the given snake,
    /// moving in `direction`, and food at `food`
    pub(crate) fn session(
        cols: u16,
        rows: u16,
        snake: &[(i32, i32)],
        direction: Direction,
        food: Option<(i32, i32)>,
    ) -> Session<ChaCha12Rng> {
        let mut session = Session::new_with_rng(
            settings(cols, rows),
            ControlMode::Manual,
            ChaCha12Rng::seed_from_u64(RNG_SEED),
        );
        session.start();
        let state = session.state_mut();
        state.snake = cells(snake);
        state.direction = direction;
        state.pending = direction;
        state.food = food.map(|(x, y)| Position::new(x, y));
        session
    }
}
