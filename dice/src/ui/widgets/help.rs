//! Help overlay listing the key bindings

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::ui::theme::DiceTheme;

const BINDINGS: &[(&str, &str)] = &[
    ("r / Space / Enter", "Roll the dice"),
    ("+ / Up / Right", "Add a die"),
    ("- / Down / Left", "Remove a die"),
    ("Mouse", "Click the buttons"),
    ("?", "Toggle this help"),
    ("q / Esc", "Quit"),
];

pub struct HelpWidget<'a> {
    theme: &'a DiceTheme,
}

impl<'a> HelpWidget<'a> {
    pub fn new(theme: &'a DiceTheme) -> Self {
        Self { theme }
    }
}

impl Widget for HelpWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(true));

        let mut lines = vec![
            Line::from(Span::styled(
                "Roll between 1 and 8 dice. Average 3 or more per die to win.",
                self.theme.title_style(),
            )),
            Line::from(""),
        ];
        for (keys, action) in BINDINGS {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{keys:<20}"),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(*action),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press any key to close",
            self.theme.status_style(),
        )));

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
