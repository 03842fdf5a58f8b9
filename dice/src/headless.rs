//! Headless mode for the dice roller.
//!
//! A line-oriented interface for scripts and tests. Each roll prints its
//! shuffle frames as they happen and ends with the settled total.

use dice_core::{DiceController, TickOutcome, TickToken};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;

/// A parsed headless command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Roll,
    More,
    Less,
    Status,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "roll" | "r" => Some(Self::Roll),
            "+" | "more" => Some(Self::More),
            "-" | "less" => Some(Self::Less),
            "status" => Some(Self::Status),
            "help" | "?" => Some(Self::Help),
            "quit" | "exit" | "q" => Some(Self::Quit),
            _ => None,
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  roll       - Roll the dice");
    println!("  + / more   - Add a die");
    println!("  - / less   - Remove a die");
    println!("  status     - Show the table");
    println!("  help       - Show this help");
    println!("  quit       - Exit");
}

fn print_status(controller: &DiceController) {
    println!("[STATUS]");
    println!("  Dice: {}", controller.count());
    println!("  Faces: {}", controller.dice().display());
    match controller.outcome() {
        Some(outcome) => println!("  Total: {} ({})", outcome.total, outcome.verdict),
        None => println!(
            "  Need {} or more to win",
            controller.count().win_threshold()
        ),
    }
    println!("  Rolls: {}", controller.rolls_completed());
}

/// Drive one roll to completion, printing every shuffle.
async fn roll(controller: &mut DiceController, ticks: &mut UnboundedReceiver<TickToken>) {
    controller.roll();
    println!("[ROLLING]");

    while let Some(token) = ticks.recv().await {
        match controller.on_tick(token) {
            TickOutcome::Stale => continue,
            TickOutcome::Shuffle => println!("  {}", controller.dice().display()),
            TickOutcome::Settle => break,
        }
    }

    match controller.outcome() {
        Some(outcome) => println!(
            "[TOTAL] {} = {} ({})",
            controller.dice().display(),
            outcome.total,
            outcome.verdict
        ),
        None => println!("[ERROR] Roll did not settle"),
    }
}

/// Run the roller in headless mode until `quit` or end of input.
pub async fn run_headless(
    mut controller: DiceController,
    mut ticks: UnboundedReceiver<TickToken>,
) -> anyhow::Result<()> {
    println!("=== Dice Roller Headless Mode ===");
    println!(
        "Dice: {} (need {} or more to win)",
        controller.count(),
        controller.count().win_threshold()
    );
    println!();
    print_help();
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        match Command::parse(&line) {
            Some(Command::Roll) => roll(&mut controller, &mut ticks).await,
            Some(cmd @ (Command::More | Command::Less)) => {
                let delta = if cmd == Command::More { 1 } else { -1 };
                if controller.can_adjust(delta) {
                    controller.adjust(delta);
                    println!("[DICE] {}", controller.count());
                } else {
                    println!("[DICE] {} (limit reached)", controller.count());
                }
            }
            Some(Command::Status) => print_status(&controller),
            Some(Command::Help) => print_help(),
            Some(Command::Quit) => {
                println!("Goodbye!");
                break;
            }
            None => println!("[ERROR] Unknown command. Type help for help."),
        }
    }

    controller.shutdown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("roll"), Some(Command::Roll));
        assert_eq!(Command::parse("  + "), Some(Command::More));
        assert_eq!(Command::parse("LESS"), Some(Command::Less));
        assert_eq!(Command::parse("quit"), Some(Command::Quit));
        assert_eq!(Command::parse("throw"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_roll_settles_through_tokio_timer() {
        use dice_core::{RollerConfig, TokioClock, TokioTimer};

        let (timer, mut ticks) = TokioTimer::channel(tokio::runtime::Handle::current());
        let mut controller = DiceController::new(RollerConfig::default(), Box::new(timer))
            .with_clock(Box::new(TokioClock));
        controller.adjust(2);

        roll(&mut controller, &mut ticks).await;

        assert!(!controller.is_rolling());
        assert_eq!(controller.dice().len(), 3);
        assert!(controller.total().is_some());
        assert_eq!(controller.rolls_completed(), 1);
    }
}
