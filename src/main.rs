use crossterm::{terminal, tty::IsTty};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use taskmaster::config::{self, Config};
use taskmaster::console::{Console, DEFAULT_WIDTH};
use taskmaster::task_store::TaskStore;
use taskmaster::ui::Session;

const MIN_WIDTH: u16 = 40;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_matches(&config::command().get_matches());

    // Logs go to stderr so they never interleave with the menu on stdout
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_filter().into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let stdout = io::stdout();
    let interactive = stdout.is_tty();
    let width = if interactive {
        terminal::size()
            .map(|(columns, _)| columns.max(MIN_WIDTH))
            .unwrap_or(DEFAULT_WIDTH)
    } else {
        DEFAULT_WIDTH
    };
    let console = Console::new(io::stdin().lock(), stdout.lock())
        .with_color(config.color && interactive)
        .with_width(width);

    let mut store = TaskStore::new();
    let mut session =
        Session::new(&mut store, console).with_default_file(config.default_file.clone());

    if config.load_on_start {
        if let Some(path) = config.default_file.clone().filter(|p| p.exists()) {
            session.load_from(path)?;
        }
    }

    session.run()?;
    Ok(())
}
