mod widgets;
use self::widgets::{Instructions, Logo};
use crate::app::Screen;
use crate::command::Command;
use crate::consts;
use crate::engine::ControlMode;
use crate::game::Game;
use crate::util::{get_display_area, EnumExt, Globals};
use crossterm::event::{read, Event};
use enum_map::Enum;
use ratatui::{
    buffer::Buffer,
    layout::{Flex, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{
        block::{Block, Padding},
        Widget,
    },
    Frame,
};

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct MainMenu {
    selection: Selection,
    modes: ModesMenu,
    globals: Globals,
}

impl MainMenu {
    pub(crate) fn new(globals: Globals) -> Self {
        MainMenu {
            selection: Selection::default(),
            modes: ModesMenu::new(ModeOpt::from(globals.mode)),
            globals,
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }

    pub(crate) fn process_input(&mut self) -> std::io::Result<Option<Screen>> {
        Ok(self.handle_event(read()?))
    }

    /// The control mode that a game started now would use
    pub(crate) fn mode(&self) -> ControlMode {
        self.modes.chosen.into()
    }

    fn handle_event(&mut self, event: Event) -> Option<Screen> {
        match (
            self.selection,
            Command::from_key_event(event.as_key_press_event()?)?,
        ) {
            (_, Command::Quit) => return Some(Screen::Quit),
            (_, Command::Home) => self.select(Selection::PlayButton, None),
            (_, Command::End) => self.select(Selection::QuitButton, None),
            (Selection::PlayButton, Command::Enter | Command::Space) | (_, Command::P) => {
                return Some(Screen::Game(Box::new(self.play())))
            }
            (Selection::PlayButton, Command::Prev) => self.select(Selection::QuitButton, None),
            (Selection::PlayButton, Command::Down | Command::Next) => {
                self.select(Selection::Modes, Some(ModeOpt::min()));
            }
            (Selection::Modes, Command::Up | Command::Prev) => {
                if let Some(sel) = self.modes.move_up() {
                    self.select(sel, None);
                }
            }
            (Selection::Modes, Command::Down | Command::Next) => {
                if let Some(sel) = self.modes.move_down() {
                    self.select(sel, None);
                }
            }
            (Selection::Modes, Command::Space | Command::Enter) => self.modes.choose(),
            (Selection::QuitButton, Command::Enter | Command::Space) | (_, Command::Q) => {
                return Some(Screen::Quit);
            }
            (Selection::QuitButton, Command::Next) => self.select(Selection::PlayButton, None),
            (Selection::QuitButton, Command::Up | Command::Prev) => {
                self.select(Selection::Modes, Some(ModeOpt::max()));
            }
            _ => (),
        }
        None
    }

    fn play(&self) -> Game {
        let mut globals = self.globals.clone();
        globals.mode = self.mode();
        Game::new(globals)
    }

    /// Move the selection.  `cursor` is where to put the cursor within the
    /// modes list when moving into it.
    fn select(&mut self, selection: Selection, cursor: Option<ModeOpt>) {
        self.selection = selection;
        self.modes.cursor = if selection == Selection::Modes {
            cursor
        } else {
            None
        };
    }
}

impl Widget for &MainMenu {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let display = get_display_area(area);
        let [logo_area, instructions_area, play_area, modes_area, quit_area] =
            Layout::vertical([
                Logo::HEIGHT,
                Instructions::HEIGHT,
                1,
                ModesMenu::HEIGHT,
                1,
            ])
            .flex(Flex::Start)
            .spacing(1)
            .areas(display);

        let [logo_area] = Layout::horizontal([Logo::WIDTH])
            .flex(Flex::Center)
            .areas(logo_area);
        Logo.render(logo_area, buf);

        let [instructions_area] = Layout::horizontal([Instructions::WIDTH])
            .flex(Flex::Center)
            .areas(instructions_area);
        Instructions.render(instructions_area, buf);

        button("Play", "p", self.selection == Selection::PlayButton).render(play_area, buf);

        let [modes_area] = Layout::horizontal([ModesMenu::WIDTH])
            .flex(Flex::Center)
            .areas(modes_area);
        (&self.modes).render(modes_area, buf);

        button("Quit", "q", self.selection == Selection::QuitButton).render(quit_area, buf);
    }
}

fn button(label: &'static str, key: &'static str, selected: bool) -> Line<'static> {
    let style = if selected {
        consts::MENU_SELECTION_STYLE
    } else {
        Style::new()
    };
    Line::from_iter([
        Span::styled("[", style),
        Span::styled(label, style),
        Span::styled(" (", style),
        Span::styled(key, consts::KEY_STYLE.patch(style)),
        Span::styled(")]", style),
    ])
    .centered()
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
enum Selection {
    #[default]
    PlayButton,
    Modes,
    QuitButton,
}

/// The control modes that can be picked for a game
#[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
pub(crate) enum ModeOpt {
    Manual,
    Autopilot,
    External,
}

impl From<ControlMode> for ModeOpt {
    fn from(mode: ControlMode) -> ModeOpt {
        match mode {
            ControlMode::Menu | ControlMode::Manual => ModeOpt::Manual,
            ControlMode::Autonomous => ModeOpt::Autopilot,
            ControlMode::ExternalPolicy => ModeOpt::External,
        }
    }
}

impl From<ModeOpt> for ControlMode {
    fn from(opt: ModeOpt) -> ControlMode {
        match opt {
            ModeOpt::Manual => ControlMode::Manual,
            ModeOpt::Autopilot => ControlMode::Autonomous,
            ModeOpt::External => ControlMode::ExternalPolicy,
        }
    }
}

/// A radio list of [`ModeOpt`]s
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct ModesMenu {
    /// The highlighted entry, if the main menu's selection is inside this
    /// list
    cursor: Option<ModeOpt>,

    chosen: ModeOpt,
}

impl ModesMenu {
    #[allow(clippy::cast_possible_truncation)]
    const HEIGHT: u16 = (ModeOpt::LENGTH as u16) + 2 /* for border */;
    const HORIZONTAL_PADDING: u16 = 1; // padding on each side
    const POINTER_WIDTH: u16 = 2;
    const LABEL_WIDTH: u16 = 15;
    const LABEL_RADIO_GUTTER: u16 = 2;
    const RADIO_WIDTH: u16 = 3;
    const WIDTH: u16 = 2 /* for border */ + 2 * Self::HORIZONTAL_PADDING + Self::POINTER_WIDTH + Self::LABEL_WIDTH + Self::LABEL_RADIO_GUTTER + Self::RADIO_WIDTH;

    fn new(chosen: ModeOpt) -> Self {
        ModesMenu {
            cursor: None,
            chosen,
        }
    }

    fn move_up(&mut self) -> Option<Selection> {
        self.cursor = self.cursor?.prev();
        self.cursor.is_none().then_some(Selection::PlayButton)
    }

    fn move_down(&mut self) -> Option<Selection> {
        self.cursor = self.cursor?.next();
        self.cursor.is_none().then_some(Selection::QuitButton)
    }

    fn choose(&mut self) {
        if let Some(opt) = self.cursor {
            self.chosen = opt;
        }
    }
}

impl Widget for &ModesMenu {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(" Control: ")
            .padding(Padding::horizontal(ModesMenu::HORIZONTAL_PADDING));
        let menu_area = block.inner(area);
        block.render(area, buf);
        for (opt, row) in ModeOpt::iter().zip(menu_area.rows()) {
            let selected = Some(opt) == self.cursor;
            let style = if selected {
                consts::MENU_SELECTION_STYLE
            } else {
                Style::new()
            };
            let s = format!(
                "{pointer:pwidth$}{label:lwidth$}{space:gutter$}{radio}",
                pointer = if selected { "»" } else { "" },
                pwidth = usize::from(ModesMenu::POINTER_WIDTH),
                label = ControlMode::from(opt).label(),
                lwidth = usize::from(ModesMenu::LABEL_WIDTH),
                space = "",
                gutter = usize::from(ModesMenu::LABEL_RADIO_GUTTER),
                radio = if opt == self.chosen { "(•)" } else { "( )" },
            );
            Span::styled(s, style).render(row, buf);
        }
    }
}
