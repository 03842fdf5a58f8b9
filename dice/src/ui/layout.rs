//! Layout calculations for the dice TUI

use ratatui::layout::{Constraint, Direction, Flex, Layout, Rect};

use crate::ui::widgets::die_face::{DIE_HEIGHT, DIE_WIDTH};

/// Horizontal gap between dice, also absorbs the shake offset.
const DIE_GAP: u16 = 2;

/// Main layout areas
#[derive(Debug, Clone, Copy)]
pub struct AppLayout {
    pub title_area: Rect,
    pub dice_area: Rect,
    pub result_area: Rect,
    pub remove_button: Rect,
    pub count_label: Rect,
    pub add_button: Rect,
    pub roll_button: Rect,
    pub status_bar: Rect,
}

impl AppLayout {
    /// Calculate layout based on terminal size
    pub fn calculate(area: Rect) -> Self {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title bar
                Constraint::Min(DIE_HEIGHT + 2), // Dice table
                Constraint::Length(2), // Result
                Constraint::Length(3), // Controls
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        let controls = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(5),  // [ - ]
                Constraint::Length(12), // Dice: N
                Constraint::Length(5),  // [ + ]
                Constraint::Length(3),
                Constraint::Length(14), // Roll
            ])
            .flex(Flex::Center)
            .split(main_chunks[3]);

        Self {
            title_area: main_chunks[0],
            dice_area: main_chunks[1],
            result_area: main_chunks[2],
            remove_button: controls[0],
            count_label: controls[1],
            add_button: controls[2],
            roll_button: controls[4],
            status_bar: main_chunks[4],
        }
    }
}

/// Which on-screen button a point falls on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonHit {
    Remove,
    Add,
    Roll,
}

impl AppLayout {
    /// Find the button under terminal cell (`column`, `row`)
    pub fn hit_test(&self, column: u16, row: u16) -> Option<ButtonHit> {
        let inside = |r: Rect| {
            column >= r.x && column < r.x + r.width && row >= r.y && row < r.y + r.height
        };
        if inside(self.remove_button) {
            Some(ButtonHit::Remove)
        } else if inside(self.add_button) {
            Some(ButtonHit::Add)
        } else if inside(self.roll_button) {
            Some(ButtonHit::Roll)
        } else {
            None
        }
    }
}

/// Slots for `count` dice inside `area`, wrapping onto extra rows when the
/// table is too narrow. Each slot is one die wide plus room to shake.
///
/// Returns fewer than `count` slots when the rows do not fit vertically.
pub fn dice_slots(count: usize, area: Rect) -> Vec<Rect> {
    if count == 0 || area.width < DIE_WIDTH || area.height < DIE_HEIGHT {
        return Vec::new();
    }

    let slot_width = DIE_WIDTH + DIE_GAP;
    let per_row = ((area.width + DIE_GAP) / slot_width).max(1) as usize;
    let rows = count.div_ceil(per_row);
    let block_height = rows as u16 * DIE_HEIGHT;
    let top = area.y + area.height.saturating_sub(block_height) / 2;

    let mut slots = Vec::with_capacity(count);
    for row in 0..rows {
        let in_row = (count - row * per_row).min(per_row);
        let row_width = in_row as u16 * slot_width - DIE_GAP;
        let left = area.x + area.width.saturating_sub(row_width) / 2;
        let y = top + row as u16 * DIE_HEIGHT;
        if y + DIE_HEIGHT > area.y + area.height {
            break;
        }
        for i in 0..in_row {
            slots.push(Rect::new(
                left + i as u16 * slot_width,
                y,
                DIE_WIDTH,
                DIE_HEIGHT,
            ));
        }
    }
    slots
}

/// Calculate centered popup area
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
