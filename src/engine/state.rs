use super::food::place_food;
use super::grid::{Direction, Position};
use super::snake::Snake;
use super::Settings;
use rand::Rng;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Who supplies the desired direction before each tick
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) enum ControlMode {
    /// No mode picked yet; becomes `Manual` when the game starts
    #[default]
    Menu,
    Manual,
    Autonomous,
    ExternalPolicy,
}

impl ControlMode {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            ControlMode::Menu => "menu",
            ControlMode::Manual => "manual",
            ControlMode::Autonomous => "auto",
            ControlMode::ExternalPolicy => "external",
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            ControlMode::Menu => "Menu",
            ControlMode::Manual => "Manual",
            ControlMode::Autonomous => "Autopilot",
            ControlMode::ExternalPolicy => "External policy",
        }
    }
}

impl fmt::Display for ControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for ControlMode {
    type Err = ParseControlModeError;

    fn from_str(s: &str) -> Result<ControlMode, ParseControlModeError> {
        match s {
            "manual" => Ok(ControlMode::Manual),
            "auto" | "autonomous" | "autopilot" => Ok(ControlMode::Autonomous),
            "external" | "external-policy" => Ok(ControlMode::ExternalPolicy),
            _ => Err(ParseControlModeError),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("invalid control mode; expected \"manual\", \"auto\", or \"external\"")]
pub(crate) struct ParseControlModeError;

/// Everything there is to know about one game in progress
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct GameState {
    pub(crate) snake: Snake,

    /// The direction applied on the most recent tick
    pub(crate) direction: Direction,

    /// The direction that the next tick will apply
    pub(crate) pending: Direction,

    /// `None` only before the first placement or once the snake fills the
    /// grid
    pub(crate) food: Option<Position>,

    pub(crate) score: u32,
    pub(crate) running: bool,
    pub(crate) terminal: bool,
    pub(crate) mode: ControlMode,

    /// Number of ticks applied since the game started
    pub(crate) ticks: u64,
}

impl GameState {
    /// Create a game that has not started yet, with the snake centered and
    /// facing right and a piece of food already placed
    ///
    /// # Panics
    ///
    /// Panics if the initial snake would stick out past the left edge of the
    /// grid.
    pub(crate) fn new<R: Rng>(settings: &Settings, mode: ControlMode, rng: &mut R) -> GameState {
        assert!(
            settings.initial_length <= usize::from(settings.grid.dimensions().0 / 2 + 1),
            "initial snake of length {} does not fit on the grid",
            settings.initial_length
        );
        let snake = Snake::new(settings.grid.center(), settings.initial_length);
        let food = (snake.len() < settings.grid.area())
            .then(|| place_food(settings.grid, settings.food_region, &snake, rng));
        GameState {
            snake,
            direction: Direction::Right,
            pending: Direction::Right,
            food,
            score: 0,
            running: false,
            terminal: false,
            mode,
            ticks: 0,
        }
    }

    /// Request a direction for the next tick.  Requests that would reverse
    /// the snake onto itself are ignored.  Returns whether the request was
    /// accepted.
    pub(crate) fn set_pending_direction(&mut self, direction: Direction) -> bool {
        if direction.is_opposite(self.direction) {
            false
        } else {
            self.pending = direction;
            true
        }
    }

    /// Change the control mode.  Not allowed while the game is running.
    pub(crate) fn set_control_mode(&mut self, mode: ControlMode) -> bool {
        if self.running {
            false
        } else {
            self.mode = mode;
            true
        }
    }

    pub(crate) fn end(&mut self) {
        self.running = false;
        self.terminal = true;
    }

    pub(crate) fn started(&self) -> bool {
        self.running || self.terminal
    }
}
