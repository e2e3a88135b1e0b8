use crate::engine::ControlMode;
use crate::game::Game;
use crate::menu::MainMenu;
use crate::util::Globals;
use ratatui::{backend::Backend, Terminal};
use std::io;

#[derive(Debug)]
pub(crate) struct App {
    screen: Screen,
}

impl App {
    /// Start at the main menu, or go straight to the game screen if a
    /// control mode was picked on the command line
    pub(crate) fn new(globals: Globals) -> App {
        let screen = if globals.mode == ControlMode::Menu {
            Screen::Main(MainMenu::new(globals))
        } else {
            Screen::Game(Box::new(Game::new(globals)))
        };
        App { screen }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.process_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> io::Result<()> {
        match self.screen {
            Screen::Main(ref menu) => {
                terminal.draw(|frame| menu.draw(frame))?;
            }
            Screen::Game(ref game) => {
                terminal.draw(|frame| game.draw(frame))?;
            }
            Screen::Quit => (),
        }
        Ok(())
    }

    fn process_input(&mut self) -> io::Result<()> {
        let next = match self.screen {
            Screen::Main(ref mut menu) => menu.process_input()?,
            Screen::Game(ref mut game) => game.process_input()?,
            Screen::Quit => None,
        };
        if let Some(screen) = next {
            self.screen = screen;
        }
        Ok(())
    }

    fn quitting(&self) -> bool {
        matches!(self.screen, Screen::Quit)
    }
}

/// What the application is currently showing
#[derive(Debug)]
pub(crate) enum Screen {
    Main(MainMenu),
    Game(Box<Game>),
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_menu_without_mode() {
        let app = App::new(Globals::default());
        assert!(matches!(app.screen, Screen::Main(_)));
    }

    #[test]
    fn starts_game_with_mode() {
        let globals = Globals {
            mode: ControlMode::Autonomous,
            ..Globals::default()
        };
        let app = App::new(globals);
        assert!(matches!(app.screen, Screen::Game(ref game) if game.mode() == ControlMode::Autonomous));
    }
}
