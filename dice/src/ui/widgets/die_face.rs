//! Die face widget with a shake animation while rolling

use std::time::Duration;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use dice_core::{DieValue, ShakeParams};

use crate::ui::theme::DiceTheme;

/// Width of one rendered die, borders included
pub const DIE_WIDTH: u16 = 9;
/// Height of one rendered die, borders included
pub const DIE_HEIGHT: u16 = 5;

const PIP: &str = "●";

/// Widget for one die face
pub struct DieFaceWidget<'a> {
    value: DieValue,
    shake: Option<(ShakeParams, Duration)>,
    bounds: Option<Rect>,
    theme: &'a DiceTheme,
}

impl<'a> DieFaceWidget<'a> {
    pub fn new(value: DieValue, theme: &'a DiceTheme) -> Self {
        Self {
            value,
            shake: None,
            bounds: None,
            theme,
        }
    }

    /// Shake with `params`, `elapsed` into the current roll
    pub fn rolling(mut self, params: ShakeParams, elapsed: Duration) -> Self {
        self.shake = Some((params, elapsed));
        self
    }

    /// Keep the shaking die inside `bounds`
    pub fn within(mut self, bounds: Rect) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Where the die actually lands inside its slot, after shaking
    pub fn shaken_area(&self, slot: Rect, bounds: Rect) -> Rect {
        let Some((params, elapsed)) = self.shake else {
            return slot;
        };
        let offset = params.offset_at(elapsed) as i32;
        let min_x = bounds.x as i32;
        let max_x = (bounds.x + bounds.width).saturating_sub(slot.width) as i32;
        let x = (slot.x as i32 + offset).clamp(min_x, max_x.max(min_x));
        Rect { x: x as u16, ..slot }
    }

    fn pip_lines(&self) -> Vec<Line<'static>> {
        let rolling = self.shake.is_some();
        let pip_style = self.theme.pip_style(rolling);
        self.value
            .pips()
            .chunks(3)
            .map(|row| {
                let mut spans = vec![Span::raw(" ")];
                for (i, lit) in row.iter().enumerate() {
                    if i > 0 {
                        spans.push(Span::raw(" "));
                    }
                    if *lit {
                        spans.push(Span::styled(PIP, pip_style));
                    } else {
                        spans.push(Span::raw(" "));
                    }
                }
                Line::from(spans)
            })
            .collect()
    }
}

impl Widget for DieFaceWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rolling = self.shake.is_some();
        let area = self.shaken_area(
            Rect {
                width: DIE_WIDTH.min(area.width),
                height: DIE_HEIGHT.min(area.height),
                ..area
            },
            self.bounds.unwrap_or(buf.area),
        );

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(self.theme.die_style(rolling));

        let inner = block.inner(area);
        let lines = self.pip_lines();
        block.render(area, buf);
        Paragraph::new(lines).render(inner, buf);
    }
}
