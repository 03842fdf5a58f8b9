//! Terminal dice roller.
//!
//! Pick how many dice to throw, roll them, and watch them rattle before they
//! settle. The total wins if it reaches three per die.
//!
//! # Headless Mode
//!
//! Run with `--headless` for a line-oriented interface suitable for scripts:
//!
//! ```bash
//! echo -e "+\n+\nroll\nquit" | cargo run -p dice -- --headless --mute --quiet
//! ```

mod app;
mod events;
mod headless;
mod platform;
mod ui;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dice_core::{DiceController, DiceCount, RollerConfig, TickToken, TokioClock, TokioTimer};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use app::App;
use events::{handle_event, EventResult};
use ui::render::render;

/// Frame budget for input polling while idle or rolling.
const POLL_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Parser)]
#[command(name = "dice", version, about = "Roll a handful of six-sided dice")]
struct Args {
    /// Dice on the table at startup (1-8)
    #[arg(long, value_name = "N")]
    dice: Option<i64>,

    /// Language tag for the spoken verdict, e.g. en-GB
    #[arg(long, value_name = "TAG")]
    lang: Option<String>,

    /// Disable the rattle sound
    #[arg(long)]
    mute: bool,

    /// Disable the spoken verdict
    #[arg(long)]
    quiet: bool,

    /// JSON config file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Line-oriented mode reading commands from stdin
    #[arg(long)]
    headless: bool,
}

impl Args {
    /// Assemble the config: defaults, then file, then environment, then flags.
    fn roller_config(&self) -> anyhow::Result<RollerConfig> {
        let mut config = match &self.config {
            Some(path) => RollerConfig::load(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => RollerConfig::default(),
        };
        config.apply_env();

        if let Some(n) = self.dice {
            config.initial_dice = DiceCount::clamped(n);
        }
        if let Some(lang) = &self.lang {
            config.speech.lang = lang.clone();
        }
        if self.mute {
            config.audio.enabled = false;
        }
        if self.quiet {
            config.speech.enabled = false;
        }

        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = args.roller_config()?;
    init_tracing();

    let (controller, ticks) = build_controller(config);

    if args.headless {
        return headless::run_headless(controller, ticks).await;
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, App::new(controller), ticks);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        tracing::error!("Terminal loop failed: {e}");
        eprintln!("Error: {e}");
    }

    Ok(())
}

/// Wire the controller to the tokio timer and whatever platform audio and
/// speech this build has.
fn build_controller(config: RollerConfig) -> (DiceController, UnboundedReceiver<TickToken>) {
    let (timer, ticks) = TokioTimer::channel(tokio::runtime::Handle::current());
    let mut controller =
        DiceController::new(config, Box::new(timer)).with_clock(Box::new(TokioClock));

    if let Some(factory) = platform::audio_factory() {
        controller = controller.with_audio(factory);
    }
    if controller.config().speech.enabled {
        if let Some(engine) = platform::speech_engine() {
            controller = controller.with_speech(engine);
        }
    }

    tracing::info!(
        dice = controller.count().get(),
        speech = controller.speech_enabled(),
        "Dice roller ready"
    );
    (controller, ticks)
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    mut ticks: UnboundedReceiver<TickToken>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| render(f, &app))?;

        // Deliver any ticks that fired since the last frame
        while let Ok(token) = ticks.try_recv() {
            app.on_tick(token);
        }

        if event::poll(POLL_INTERVAL)? {
            let ev = event::read()?;
            let size = terminal.size()?;
            let area = Rect::new(0, 0, size.width, size.height);
            if handle_event(&mut app, ev, area) == EventResult::Quit {
                break;
            }
        }

        if app.should_quit {
            break;
        }
    }

    app.quit();
    Ok(())
}

/// Log to a file so the terminal UI is never written over.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let path = std::env::var_os("DICE_LOG_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("dice.log"));

    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
    {
        Ok(file) => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .with(env_filter)
                .init();
            tracing::info!(path = %path.display(), "Logging initialized");
        }
        // No log file means no logs rather than a corrupted screen
        Err(_) => tracing_subscriber::registry().with(env_filter).init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("dice").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = parse(&["--dice", "12", "--lang", "fr-FR", "--mute", "--quiet"])
            .roller_config()
            .unwrap();
        assert_eq!(config.initial_dice.get(), 8);
        assert_eq!(config.speech.lang, "fr-FR");
        assert!(!config.audio.enabled);
        assert!(!config.speech.enabled);
    }

    #[test]
    fn test_negative_dice_clamps() {
        let config = parse(&["--dice=-3"]).roller_config().unwrap();
        assert_eq!(config.initial_dice.get(), 1);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let args = parse(&["--config", "/nonexistent/dice.json"]);
        assert!(args.roller_config().is_err());
    }
}
