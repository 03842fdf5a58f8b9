//! UI module for the dice TUI

pub mod layout;
pub mod render;
pub mod theme;
pub mod widgets;
