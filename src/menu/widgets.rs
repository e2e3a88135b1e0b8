use crate::consts;
use ratatui::{
    buffer::Buffer,
    layout::{Flex, Layout, Rect},
    text::{Line, Span, Text},
    widgets::Widget,
};

/// The title banner, with a snake closing in on its food underneath
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct Logo;

impl Logo {
    const AUTO_WIDTH: u16 = 24;
    const SNAKE_WIDTH: u16 = 28;
    const TEXT_HEIGHT: u16 = 5;
    const DIAGRAM_BODY_LENGTH: usize = 12;
    pub(super) const HEIGHT: u16 = Self::TEXT_HEIGHT + 2;
    pub(super) const WIDTH: u16 = Self::AUTO_WIDTH + Self::SNAKE_WIDTH;

    #[rustfmt::skip]
    const AUTO: [&'static str; Self::TEXT_HEIGHT as usize] = [
         "    _         _",
        r"   / \  _   _| |_ ___",
        r"  / _ \| | | | __/ _ \",
        r" / ___ \ |_| | || (_) |",
        r"/_/   \_\__,_|\__\___/",
    ];

    #[rustfmt::skip]
    const SNAKE: [&'static str; Self::TEXT_HEIGHT as usize] = [
         " ____              _",
         "/ ___| _ __   __ _| | _____",
        r"\___ \| '_ \ / _` | |/ / _ \",
         " ___) | | | | (_| |   <  __/",
        r"|____/|_| |_|\__,_|_|\_\___|",
    ];
}

impl Widget for Logo {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [area] = Layout::horizontal([Self::WIDTH])
            .flex(Flex::Start)
            .areas(area);
        let [words_area, diagram_area] = Layout::vertical([Self::TEXT_HEIGHT, 1])
            .flex(Flex::Start)
            .spacing(1)
            .areas(area);
        let [auto_area, snake_area] = Layout::horizontal([Self::AUTO_WIDTH, Self::SNAKE_WIDTH])
            .flex(Flex::Start)
            .areas(words_area);
        Text::from_iter(Self::AUTO)
            .style(consts::LOGO_STYLE)
            .render(auto_area, buf);
        Text::from_iter(Self::SNAKE)
            .style(consts::SNAKE_STYLE)
            .render(snake_area, buf);
        let mut snake = consts::SNAKE_BODY_SYMBOL
            .to_string()
            .repeat(Self::DIAGRAM_BODY_LENGTH);
        snake.push(consts::SNAKE_HEAD_RIGHT_SYMBOL);
        Line::from_iter([
            Span::styled(snake, consts::SNAKE_STYLE),
            Span::raw("  "),
            Span::styled(consts::FOOD_SYMBOL.to_string(), consts::FOOD_STYLE),
        ])
        .centered()
        .render(diagram_area, buf);
    }
}

/// How to steer, for those playing by hand
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct Instructions;

impl Instructions {
    pub(super) const HEIGHT: u16 = 5;
    pub(super) const WIDTH: u16 = 22;

    fn keys(lead: &'static str, keys: [&'static str; 4]) -> Line<'static> {
        let mut line = Line::from(lead);
        for (i, k) in keys.into_iter().enumerate() {
            if i > 0 {
                line.push_span(" ");
            }
            line.push_span(Span::styled(k, consts::KEY_STYLE));
        }
        line
    }
}

impl Widget for Instructions {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = Text::from_iter([
            Line::from("Steer the snake with:"),
            Instructions::keys("        ", ["←", "↓", "↑", "→"]),
            Instructions::keys("    or: ", ["h", "j", "k", "l"]),
            Instructions::keys("    or: ", ["a", "s", "w", "d"]),
            Line::from_iter([Span::raw(" Pause: "), Span::styled("Esc", consts::KEY_STYLE)]),
        ]);
        debug_assert_eq!(
            text.height(),
            usize::from(Self::HEIGHT),
            "Instructions::HEIGHT is wrong"
        );
        text.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn logo() {
        let mut buffer = Buffer::empty(Rect::new(0, 0, 56, 9));
        Logo.render(Rect::new(2, 1, Logo::WIDTH, Logo::HEIGHT), &mut buffer);
        #[rustfmt::skip]
        let mut expected = Buffer::with_lines([
             "",
             "      _         _          ____              _          ",
            r"     / \  _   _| |_ ___   / ___| _ __   __ _| | _____   ",
            r"    / _ \| | | | __/ _ \  \___ \| '_ \ / _` | |/ / _ \  ",
            r"   / ___ \ |_| | || (_) |  ___) | | | | (_| |   <  __/  ",
            r"  /_/   \_\__,_|\__\___/  |____/|_| |_|\__,_|_|\_\___|  ",
             "",
             "                    ⚬⚬⚬⚬⚬⚬⚬⚬⚬⚬⚬⚬<  ●",
             "",
        ]);
        expected.set_style(Rect::new(2, 1, 24, 5), consts::LOGO_STYLE);
        expected.set_style(Rect::new(26, 1, 28, 5), consts::SNAKE_STYLE);
        expected.set_style(Rect::new(20, 7, 13, 1), consts::SNAKE_STYLE);
        expected.set_style(Rect::new(35, 7, 1, 1), consts::FOOD_STYLE);
        assert_eq!(buffer, expected);
    }
}
