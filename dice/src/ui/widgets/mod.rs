//! TUI widgets for the dice roller

pub mod button;
pub mod die_face;
pub mod help;

pub use button::ButtonWidget;
pub use die_face::DieFaceWidget;
pub use help::HelpWidget;
