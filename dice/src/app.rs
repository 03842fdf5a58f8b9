//! Main application state and logic

use dice_core::{DiceController, TickOutcome, TickToken, Verdict};

use crate::ui::theme::DiceTheme;

/// Main application state
pub struct App {
    pub controller: DiceController,

    // UI state
    pub theme: DiceTheme,
    show_help: bool,

    // Status
    status_message: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(controller: DiceController) -> Self {
        Self {
            controller,
            theme: DiceTheme::default(),
            show_help: false,
            status_message: Some("Press r to roll, ? for help".to_string()),
            should_quit: false,
        }
    }

    /// Start a roll
    pub fn roll(&mut self) {
        if self.controller.is_rolling() {
            return;
        }
        self.controller.roll();
        self.set_status("Rolling...");
    }

    /// Add one die
    pub fn add_die(&mut self) {
        self.adjust(1);
    }

    /// Remove one die
    pub fn remove_die(&mut self) {
        self.adjust(-1);
    }

    fn adjust(&mut self, delta: i32) {
        if !self.controller.can_adjust(delta) {
            return;
        }
        self.controller.adjust(delta);
        self.set_status(format!("{} dice on the table", self.controller.count()));
    }

    /// Feed a timer tick to the controller
    pub fn on_tick(&mut self, token: TickToken) {
        if self.controller.on_tick(token) != TickOutcome::Settle {
            return;
        }
        if let Some(outcome) = self.controller.outcome() {
            let message = match outcome.verdict {
                Verdict::Win => format!("Rolled {}. You win!", outcome.total),
                Verdict::Lose => format!("Rolled {}. Keep trying!", outcome.total),
            };
            self.set_status(message);
        }
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    pub fn showing_help(&self) -> bool {
        self.show_help
    }

    /// Set status message (always overwrites)
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Stop the controller and flag the main loop to exit
    pub fn quit(&mut self) {
        self.controller.shutdown();
        self.should_quit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dice_core::testing::{ManualClock, ManualTimer};
    use dice_core::RollerConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn app() -> (App, ManualTimer, ManualClock) {
        let timer = ManualTimer::new();
        let clock = ManualClock::new();
        let controller = DiceController::new(RollerConfig::default(), Box::new(timer.clone()))
            .with_clock(Box::new(clock.clone()))
            .with_rng(Box::new(StdRng::seed_from_u64(1)));
        (App::new(controller), timer, clock)
    }

    #[test]
    fn test_settled_roll_sets_status() {
        let (mut app, timer, clock) = app();
        app.add_die();
        app.roll();
        assert_eq!(app.status_message(), Some("Rolling..."));

        while let Some((delay, token)) = timer.take() {
            clock.advance(delay);
            app.on_tick(token);
        }

        let total = app.controller.total().unwrap();
        let status = app.status_message().unwrap();
        assert!(status.starts_with(&format!("Rolled {total}.")));
    }

    #[test]
    fn test_count_status_only_on_change() {
        let (mut app, _, _) = app();
        app.clear_status();
        app.remove_die();
        assert_eq!(app.status_message(), None);
        app.add_die();
        assert_eq!(app.status_message(), Some("2 dice on the table"));
    }

    #[test]
    fn test_quit_shuts_down_controller() {
        let (mut app, timer, _) = app();
        app.roll();
        app.quit();
        assert!(app.should_quit);
        assert!(app.controller.is_shut_down());
        assert!(timer.pending().is_none());
    }
}
