//! Clickable button widget

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::Line,
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use crate::ui::theme::DiceTheme;

/// A bordered button with an optional icon
pub struct ButtonWidget<'a> {
    label: &'a str,
    icon: Option<&'a str>,
    disabled: bool,
    theme: &'a DiceTheme,
}

impl<'a> ButtonWidget<'a> {
    pub fn new(label: &'a str, theme: &'a DiceTheme) -> Self {
        Self {
            label,
            icon: None,
            disabled: false,
            theme,
        }
    }

    pub fn icon(mut self, icon: &'a str) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    fn text(&self) -> String {
        match self.icon {
            Some(icon) if self.label.is_empty() => icon.to_string(),
            Some(icon) => format!("{icon} {}", self.label),
            None => self.label.to_string(),
        }
    }
}

impl Widget for ButtonWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = self.theme.button_style(self.disabled);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(style);

        let inner = block.inner(area);
        block.render(area, buf);

        Paragraph::new(Line::styled(self.text(), style))
            .alignment(Alignment::Center)
            .render(inner, buf);
    }
}
