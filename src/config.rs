use crate::consts;
use crate::engine::{Grid, PlannerSettings, Region, Settings};
use ratatui::style::Style;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Program configuration read from a configuration file
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct Config {
    pub(crate) grid: GridConfig,
    pub(crate) game: GameConfig,

    /// Part of the grid in which food is preferably placed
    pub(crate) food_region: Region,

    pub(crate) planner: PlannerSettings,
    pub(crate) telemetry: TelemetryConfig,
    pub(crate) styles: Styles,
}

impl Config {
    /// Return the default configuration file path
    pub(crate) fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_local_dir()
            .map(|p| p.join("autosnake").join("config.toml"))
            .ok_or(ConfigError::NoPath)
    }

    /// Read configuration from a file on disk.  If the file does not exist and
    /// `allow_missing` is true, a default `Config` value is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file could not be read, if the file's contents
    /// could not be deserialized, or if the resulting settings are out of
    /// range.
    pub(crate) fn load(path: &Path, allow_missing: bool) -> Result<Config, ConfigError> {
        let content = match fs_err::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
                log::debug!("No configuration file at {}; using defaults", path.display());
                return Ok(Config::default());
            }
            Err(e) => return Err(ConfigError::Read(e)),
        };
        let config = toml::from_str::<Config>(&content)?;
        config.validate()?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Check that every value is in range
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let GridConfig { cols, rows } = self.grid;
        if !(2..=consts::MAX_GRID_COLS).contains(&cols) {
            return Err(ConfigError::invalid(format!(
                "grid.cols must be between 2 and {}, got {cols}",
                consts::MAX_GRID_COLS
            )));
        }
        if !(2..=consts::MAX_GRID_ROWS).contains(&rows) {
            return Err(ConfigError::invalid(format!(
                "grid.rows must be between 2 and {}, got {rows}",
                consts::MAX_GRID_ROWS
            )));
        }
        let max_length = usize::from(cols / 2 + 1);
        if !(1..=max_length).contains(&self.game.initial_length) {
            return Err(ConfigError::invalid(format!(
                "game.initial-length must be between 1 and {max_length} for a grid {cols} cells wide, got {}",
                self.game.initial_length
            )));
        }
        if self.game.tick_ms == 0 {
            return Err(ConfigError::invalid("game.tick-ms must be positive"));
        }
        let r = self.food_region;
        for (axis, min, max) in [("x", r.x_min, r.x_max), ("y", r.y_min, r.y_max)] {
            if !((0.0..=1.0).contains(&min) && (0.0..=1.0).contains(&max) && min <= max) {
                return Err(ConfigError::invalid(format!(
                    "food-region.{axis}-min and {axis}-max must satisfy 0 <= min <= max <= 1, got {min} and {max}"
                )));
            }
        }
        if self.planner.max_flood_cells == 0 {
            return Err(ConfigError::invalid(
                "planner.max-flood-cells must be positive",
            ));
        }
        if self.telemetry.batch_size == 0 {
            return Err(ConfigError::invalid("telemetry.batch-size must be positive"));
        }
        Ok(())
    }

    /// The engine settings described by this configuration.  The
    /// configuration must have passed [`Config::validate()`].
    pub(crate) fn settings(&self) -> Settings {
        Settings {
            grid: Grid::new(self.grid.cols, self.grid.rows),
            initial_length: self.game.initial_length,
            food_region: self.food_region,
            planner: self.planner,
        }
    }

    pub(crate) fn tick_period(&self) -> Duration {
        Duration::from_millis(self.game.tick_ms)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct GridConfig {
    pub(crate) cols: u16,
    pub(crate) rows: u16,
}

impl Default for GridConfig {
    fn default() -> GridConfig {
        GridConfig { cols: 40, rows: 18 }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct GameConfig {
    /// Milliseconds between movements of the snake
    pub(crate) tick_ms: u64,

    pub(crate) initial_length: usize,
}

impl Default for GameConfig {
    fn default() -> GameConfig {
        GameConfig {
            tick_ms: 120,
            initial_length: 4,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct TelemetryConfig {
    /// Number of transitions to collect before writing them out
    pub(crate) batch_size: usize,
}

impl Default for TelemetryConfig {
    fn default() -> TelemetryConfig {
        TelemetryConfig { batch_size: 50 }
    }
}

/// Styles for drawing the game, given in the configuration file as style
/// strings like `"bold green"` or `"red on white"`
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(try_from = "RawStyles")]
pub(crate) struct Styles {
    pub(crate) snake: Style,
    pub(crate) head: Style,
    pub(crate) food: Style,
    pub(crate) collision: Style,
}

impl Default for Styles {
    fn default() -> Styles {
        Styles {
            snake: consts::SNAKE_STYLE,
            head: consts::SNAKE_STYLE,
            food: consts::FOOD_STYLE,
            collision: consts::COLLISION_STYLE,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
struct RawStyles {
    snake: Option<String>,
    head: Option<String>,
    food: Option<String>,
    collision: Option<String>,
}

impl TryFrom<RawStyles> for Styles {
    type Error = StyleError;

    fn try_from(value: RawStyles) -> Result<Styles, StyleError> {
        let default = Styles::default();
        Ok(Styles {
            snake: style_or_default("snake", value.snake, default.snake)?,
            head: style_or_default("head", value.head, default.head)?,
            food: style_or_default("food", value.food, default.food)?,
            collision: style_or_default("collision", value.collision, default.collision)?,
        })
    }
}

fn style_or_default(
    key: &'static str,
    value: Option<String>,
    default: Style,
) -> Result<Style, StyleError> {
    let Some(value) = value else {
        return Ok(default);
    };
    match value.parse::<parse_style::Style>() {
        Ok(style) => Ok(Style::from(style)),
        Err(e) => Err(StyleError {
            key,
            reason: e.to_string(),
            value,
        }),
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("invalid style {value:?} for styles.{key}: {reason}")]
pub(crate) struct StyleError {
    key: &'static str,
    value: String,
    reason: String,
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to determine path to local configuration directory")]
    NoPath,
    #[error("failed to read configuration file")]
    Read(#[source] std::io::Error),
    #[error("failed to parse configuration file")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    fn invalid<S: Into<String>>(msg: S) -> ConfigError {
        ConfigError::Invalid(msg.into())
    }
}
