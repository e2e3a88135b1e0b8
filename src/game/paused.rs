use crate::command::Command;
use crate::consts;
use crate::util::EnumExt;
use crossterm::event::Event;
use enum_map::Enum;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{
        block::{Block, Padding},
        Clear, Widget,
    },
};

/// The pause pop-up, remembering which choice is highlighted
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct Paused {
    selection: PauseOpt,
}

impl Paused {
    #[allow(clippy::cast_possible_truncation)]
    pub(super) const HEIGHT: u16 = PauseOpt::LENGTH as u16 + 2;
    pub(super) const WIDTH: u16 = 19;

    pub(super) fn new() -> Paused {
        Paused {
            selection: PauseOpt::min(),
        }
    }

    /// Handle an input event.  Returns `Some` once a choice has been made.
    pub(super) fn handle_event(&mut self, event: Event) -> Option<PauseOpt> {
        let cmd = Command::from_key_event(event.as_key_press_event()?)?;
        if let Some(opt) = PauseOpt::iter().find(|opt| opt.shortcut() == cmd) {
            return Some(opt);
        }
        match cmd {
            Command::Quit => return Some(PauseOpt::Quit),
            Command::Enter => return Some(self.selection),
            Command::Up => self.selection = self.selection.prev().unwrap_or(self.selection),
            Command::Down => self.selection = self.selection.next().unwrap_or(self.selection),
            Command::Next => self.selection = self.selection.next().unwrap_or_else(PauseOpt::min),
            Command::Prev => self.selection = self.selection.prev().unwrap_or_else(PauseOpt::max),
            Command::Home => self.selection = PauseOpt::min(),
            Command::End => self.selection = PauseOpt::max(),
            _ => (),
        }
        None
    }
}

#[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
pub(super) enum PauseOpt {
    Resume,

    /// Abandon the current game and immediately start a new one
    Restart,

    /// Stop the game where it is and show the game-over screen, from which
    /// the control mode can be changed
    EndGame,

    MainMenu,
    Quit,
}

impl PauseOpt {
    fn label(self) -> &'static str {
        match self {
            PauseOpt::Resume => "Resume",
            PauseOpt::Restart => "Restart",
            PauseOpt::EndGame => "End Game",
            PauseOpt::MainMenu => "Main Menu",
            PauseOpt::Quit => "Quit",
        }
    }

    fn shortcut(self) -> Command {
        match self {
            PauseOpt::Resume => Command::Esc,
            PauseOpt::Restart => Command::R,
            PauseOpt::EndGame => Command::E,
            PauseOpt::MainMenu => Command::M,
            PauseOpt::Quit => Command::Q,
        }
    }

    fn key_name(self) -> &'static str {
        match self {
            PauseOpt::Resume => "Esc",
            PauseOpt::Restart => "r",
            PauseOpt::EndGame => "e",
            PauseOpt::MainMenu => "m",
            PauseOpt::Quit => "q",
        }
    }

    fn to_line(self, selected: bool) -> Line<'static> {
        let line = Line::from_iter([
            Span::raw(if selected { "» " } else { "  " }),
            Span::raw(self.label()),
            Span::raw(" ("),
            Span::styled(self.key_name(), consts::KEY_STYLE),
            Span::raw(")"),
        ]);
        if selected {
            line.style(consts::MENU_SELECTION_STYLE)
        } else {
            line
        }
    }
}

impl Widget for Paused {
    /*
     * ┌──── PAUSED ─────┐
     * │ » Resume (Esc)  │
     * │   Restart (r)   │
     * │   End Game (e)  │
     * │   Main Menu (m) │
     * │   Quit (q)      │
     * └─────────────────┘
     */

    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let block = Block::bordered()
            .title(" PAUSED ")
            .title_alignment(Alignment::Center)
            .padding(Padding::horizontal(1))
            .style(Style::reset());
        let inner = block.inner(area);
        block.render(area, buf);
        for (opt, row) in PauseOpt::iter().zip(inner.rows()) {
            opt.to_line(self.selection == opt).render(row, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn press(paused: &mut Paused, code: KeyCode) -> Option<PauseOpt> {
        paused.handle_event(Event::Key(code.into()))
    }

    #[rstest]
    #[case(KeyCode::Esc, PauseOpt::Resume)]
    #[case(KeyCode::Char('r'), PauseOpt::Restart)]
    #[case(KeyCode::Char('e'), PauseOpt::EndGame)]
    #[case(KeyCode::Char('m'), PauseOpt::MainMenu)]
    #[case(KeyCode::Char('q'), PauseOpt::Quit)]
    fn shortcuts(#[case] code: KeyCode, #[case] opt: PauseOpt) {
        let mut paused = Paused::new();
        assert_eq!(press(&mut paused, code), Some(opt));
    }

    #[test]
    fn navigate() {
        let mut paused = Paused::new();
        assert_eq!(press(&mut paused, KeyCode::Up), None);
        assert_eq!(paused.selection, PauseOpt::Resume);
        assert_eq!(press(&mut paused, KeyCode::Down), None);
        assert_eq!(press(&mut paused, KeyCode::Down), None);
        assert_eq!(press(&mut paused, KeyCode::Enter), Some(PauseOpt::EndGame));
        assert_eq!(press(&mut paused, KeyCode::End), None);
        assert_eq!(press(&mut paused, KeyCode::Down), None);
        assert_eq!(paused.selection, PauseOpt::Quit);
        assert_eq!(press(&mut paused, KeyCode::Tab), None);
        assert_eq!(paused.selection, PauseOpt::Resume);
        assert_eq!(press(&mut paused, KeyCode::BackTab), None);
        assert_eq!(paused.selection, PauseOpt::Quit);
    }

    #[test]
    fn render() {
        let mut paused = Paused::new();
        assert_eq!(press(&mut paused, KeyCode::Down), None);
        let area = Rect::new(0, 0, Paused::WIDTH, Paused::HEIGHT);
        let mut buffer = Buffer::empty(area);
        paused.render(area, &mut buffer);
        let mut expected = Buffer::with_lines([
            "┌──── PAUSED ─────┐",
            "│   Resume (Esc)  │",
            "│ » Restart (r)   │",
            "│   End Game (e)  │",
            "│   Main Menu (m) │",
            "│   Quit (q)      │",
            "└─────────────────┘",
        ]);
        expected.set_style(Rect::new(2, 2, 15, 1), consts::MENU_SELECTION_STYLE);
        expected.set_style(Rect::new(12, 1, 3, 1), consts::KEY_STYLE);
        expected.set_style(Rect::new(13, 2, 1, 1), consts::KEY_STYLE);
        expected.set_style(Rect::new(14, 3, 1, 1), consts::KEY_STYLE);
        expected.set_style(Rect::new(15, 4, 1, 1), consts::KEY_STYLE);
        expected.set_style(Rect::new(10, 5, 1, 1), consts::KEY_STYLE);
        assert_eq!(buffer, expected);
    }
}
