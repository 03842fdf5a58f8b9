//! Color theme and styling for the dice TUI

use ratatui::style::{Color, Modifier, Style};

use dice_core::Verdict;

/// Dice UI color theme
#[derive(Debug, Clone)]
pub struct DiceTheme {
    // Base colors
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,

    // Dice colors
    pub die_face: Color,
    pub pip: Color,
    pub rolling: Color,

    // Buttons
    pub button: Color,
    pub button_disabled: Color,

    // Verdict colors
    pub win: Color,
    pub lose: Color,

    pub status_text: Color,
}

impl Default for DiceTheme {
    fn default() -> Self {
        Self {
            foreground: Color::White,
            border: Color::DarkGray,
            border_focused: Color::Cyan,

            die_face: Color::White,
            pip: Color::LightRed,
            rolling: Color::Yellow,

            button: Color::Cyan,
            button_disabled: Color::DarkGray,

            win: Color::Green,
            lose: Color::Red,

            status_text: Color::DarkGray,
        }
    }
}

impl DiceTheme {
    /// Get style for a die outline
    pub fn die_style(&self, rolling: bool) -> Style {
        Style::default().fg(if rolling { self.rolling } else { self.die_face })
    }

    /// Get style for lit pips
    pub fn pip_style(&self, rolling: bool) -> Style {
        let style = Style::default().fg(self.pip);
        if rolling {
            style
        } else {
            style.add_modifier(Modifier::BOLD)
        }
    }

    /// Get style for a button, dimmed when disabled
    pub fn button_style(&self, disabled: bool) -> Style {
        if disabled {
            Style::default()
                .fg(self.button_disabled)
                .add_modifier(Modifier::DIM)
        } else {
            Style::default().fg(self.button).add_modifier(Modifier::BOLD)
        }
    }

    /// Get style for a settled roll's verdict
    pub fn verdict_style(&self, verdict: Verdict) -> Style {
        let color = match verdict {
            Verdict::Win => self.win,
            Verdict::Lose => self.lose,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    /// Get style for status and hint text
    pub fn status_style(&self) -> Style {
        Style::default()
            .fg(self.status_text)
            .add_modifier(Modifier::DIM)
    }

    /// Get border style
    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.border_focused
        } else {
            self.border
        })
    }

    /// Get title style
    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.foreground)
            .add_modifier(Modifier::BOLD)
    }
}
