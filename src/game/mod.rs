mod paused;
use self::paused::{PauseOpt, Paused};
use crate::app::Screen;
use crate::command::Command;
use crate::consts;
use crate::control::{Controller, Steer};
use crate::engine::{ControlMode, Direction, Position, Session};
use crate::menu::{MainMenu, ModeOpt};
use crate::telemetry::TelemetryWriter;
use crate::util::{center_rect, error_chain, get_display_area, EnumExt, Globals};
use crossterm::event::{poll, read, Event};
use rand::Rng;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Margin, Rect, Size},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Widget},
    Frame,
};
use std::time::Instant;

/// The game screen: one session plus whatever steers it
#[derive(Debug)]
pub(crate) struct Game<R = rand::rngs::ThreadRng> {
    session: Session<R>,
    controller: Controller,
    telemetry: Option<TelemetryWriter>,
    paused: Option<Paused>,
    globals: Globals,
    next_tick: Option<Instant>,
}

impl Game<rand::rngs::ThreadRng> {
    pub(crate) fn new(globals: Globals) -> Self {
        Game::new_with_rng(globals, rand::rng())
    }
}

impl<R: Rng> Game<R> {
    pub(crate) fn new_with_rng(globals: Globals, rng: R) -> Game<R> {
        let settings = globals.config.settings();
        let session = Session::new_with_rng(settings, globals.mode, rng);
        let controller = Controller::for_mode(globals.mode, globals.policy.as_deref());
        let telemetry = globals.telemetry.as_deref().and_then(|path| {
            TelemetryWriter::create(path, settings.grid, globals.config.telemetry.batch_size)
                .inspect_err(|e| log::error!("{}", error_chain(e)))
                .ok()
        });
        Game {
            session,
            controller,
            telemetry,
            paused: None,
            globals,
            next_tick: None,
        }
    }

    pub(crate) fn process_input(&mut self) -> std::io::Result<Option<Screen>> {
        if self.ticking() {
            let period = self.globals.config.tick_period();
            let when = *self
                .next_tick
                .get_or_insert_with(|| Instant::now() + period);
            let wait = when.saturating_duration_since(Instant::now());
            if wait.is_zero() || !poll(wait)? {
                self.advance();
                self.next_tick = None;
                Ok(None)
            } else {
                Ok(self.handle_event(read()?))
            }
        } else {
            Ok(self.handle_event(read()?))
        }
    }

    /// Let the controller pick a direction, then move the snake one cell
    fn advance(&mut self) {
        if let Some(direction) = self
            .controller
            .steer(self.session.state(), self.session.settings())
        {
            self.session.set_pending_direction(direction);
        }
        let Some(transition) = self.session.tick() else {
            return;
        };
        if let Some(telemetry) = self.telemetry.as_mut() {
            if let Err(e) = telemetry.record(&transition) {
                log::error!("{}; no longer recording", error_chain(&e));
                self.telemetry = None;
            }
        }
    }

    fn handle_event(&mut self, event: Event) -> Option<Screen> {
        if let Some(paused) = self.paused.as_mut() {
            match paused.handle_event(event)? {
                PauseOpt::Resume => (),
                PauseOpt::Restart => {
                    self.session.end();
                    self.start();
                }
                PauseOpt::EndGame => {
                    self.session.end();
                    self.flush_telemetry();
                }
                PauseOpt::MainMenu => return Some(self.main_menu()),
                PauseOpt::Quit => return Some(Screen::Quit),
            }
            self.paused = None;
        } else if self.session.state().running {
            if event == Event::FocusLost {
                self.paused = Some(Paused::new());
                return None;
            }
            match Command::from_key_event(event.as_key_press_event()?)? {
                Command::Quit => return Some(Screen::Quit),
                Command::Esc => self.paused = Some(Paused::new()),
                Command::Up => self.turn(Direction::Up),
                Command::Down => self.turn(Direction::Down),
                Command::Left => self.turn(Direction::Left),
                Command::Right => self.turn(Direction::Right),
                _ => (),
            }
        } else {
            match Command::from_key_event(event.as_key_press_event()?)? {
                Command::Space | Command::Enter | Command::P | Command::R => self.start(),
                Command::Next => self.switch_mode(ModeOpt::next, ModeOpt::min),
                Command::Prev => self.switch_mode(ModeOpt::prev, ModeOpt::max),
                Command::M => return Some(self.main_menu()),
                Command::Quit | Command::Q => return Some(Screen::Quit),
                _ => (),
            }
        }
        None
    }

    /// Start the game, or start a new one if the current one is over
    fn start(&mut self) {
        self.flush_telemetry();
        self.session.start();
        self.next_tick = None;
    }

    fn turn(&mut self, direction: Direction) {
        if self.session.state().mode == ControlMode::Manual {
            self.session.set_pending_direction(direction);
        }
    }

    /// Move to the neighboring control mode, wrapping around at either end
    fn switch_mode(&mut self, step: fn(ModeOpt) -> Option<ModeOpt>, wrap: fn() -> ModeOpt) {
        let current = ModeOpt::from(self.session.state().mode);
        let mode = ControlMode::from(step(current).unwrap_or_else(wrap));
        if self.session.set_control_mode(mode) {
            self.controller = Controller::for_mode(mode, self.globals.policy.as_deref());
            self.globals.mode = mode;
        }
    }

    fn flush_telemetry(&mut self) {
        if let Some(telemetry) = self.telemetry.as_mut() {
            if let Err(e) = telemetry.flush() {
                log::error!("{}", error_chain(&e));
            }
        }
    }
}

impl<R> Game<R> {
    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }

    #[cfg(test)]
    pub(crate) fn mode(&self) -> ControlMode {
        self.session.state().mode
    }

    fn ticking(&self) -> bool {
        self.session.state().running && self.paused.is_none()
    }

    fn main_menu(&self) -> Screen {
        let mut globals = self.globals.clone();
        globals.mode = self.session.state().mode;
        Screen::Main(MainMenu::new(globals))
    }
}

impl<R> Widget for &Game<R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let state = self.session.state();
        let grid = self.session.settings().grid;
        let styles = self.globals.config.styles;
        let display = get_display_area(area);
        let [score_area, board_area, msg1_area, msg2_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(display);
        Line::styled(
            format!(" Score: {}   Mode: {}", state.score, state.mode),
            consts::SCORE_BAR_STYLE,
        )
        .render(score_area, buf);

        let (cols, rows) = grid.dimensions();
        let block_area = center_rect(
            board_area,
            Size {
                width: cols.saturating_add(2),
                height: rows.saturating_add(2),
            },
        );
        Block::bordered().render(block_area, buf);

        let mut board = Canvas {
            area: block_area.inner(Margin::new(1, 1)),
            buf,
        };
        for &p in state.snake.iter() {
            board.draw_cell(p, consts::SNAKE_BODY_SYMBOL, styles.snake);
        }
        if let Some(food) = state.food {
            board.draw_cell(food, consts::FOOD_SYMBOL, styles.food);
        }
        // The head goes last so that a collision overwrites whatever was hit
        let crashed = state.terminal && state.snake.head_collides(grid);
        if crashed {
            board.draw_cell(
                state.snake.head(),
                consts::COLLISION_SYMBOL,
                styles.collision,
            );
        } else {
            board.draw_cell(state.snake.head(), head_symbol(state.direction), styles.head);
        }

        if let Some(paused) = self.paused {
            let pause_area = center_rect(
                display,
                Size {
                    width: Paused::WIDTH,
                    height: Paused::HEIGHT,
                },
            );
            paused.render(pause_area, buf);
        } else if state.terminal {
            let msg = if crashed {
                " — GAME OVER —"
            } else {
                " — BOARD CLEARED —"
            };
            Span::from(msg).render(msg1_area, buf);
            choices(("Restart", "r")).render(msg2_area, buf);
        } else if !state.running {
            Span::from(" — READY —").render(msg1_area, buf);
            choices(("Start", "Space")).render(msg2_area, buf);
        }
    }
}

/// The line of key choices shown while the game is not running, led by
/// `first`, a label and its key
fn choices(first: (&'static str, &'static str)) -> Line<'static> {
    let mut line = Line::from(" Choose One: ");
    for (i, (label, key)) in [first, ("Change Mode", "Tab"), ("Main Menu", "m"), ("Quit", "q")]
        .into_iter()
        .enumerate()
    {
        if i > 0 {
            line.push_span(" — ");
        }
        line.push_span(label);
        line.push_span(" (");
        line.push_span(Span::styled(key, consts::KEY_STYLE));
        line.push_span(")");
    }
    line
}

fn head_symbol(direction: Direction) -> char {
    match direction {
        Direction::Up => consts::SNAKE_HEAD_UP_SYMBOL,
        Direction::Down => consts::SNAKE_HEAD_DOWN_SYMBOL,
        Direction::Left => consts::SNAKE_HEAD_LEFT_SYMBOL,
        Direction::Right => consts::SNAKE_HEAD_RIGHT_SYMBOL,
    }
}

/// Draws grid cells into the area inside the board's border.  Cells one step
/// outside the grid land on the border itself.
#[derive(Debug, Eq, PartialEq)]
struct Canvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl Canvas<'_> {
    fn draw_cell(&mut self, pos: Position, symbol: char, style: Style) {
        let Ok(x) = u16::try_from(i32::from(self.area.x) + pos.x) else {
            return;
        };
        let Ok(y) = u16::try_from(i32::from(self.area.y) + pos.y) else {
            return;
        };
        if let Some(cell) = self.buf.cell_mut((x, y)) {
            cell.set_char(symbol);
            cell.set_style(Style::reset().patch(style));
        }
    }
}
