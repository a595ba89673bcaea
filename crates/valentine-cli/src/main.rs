//! Valentine — terminal entry point.

use std::error::Error;

use tracing::info;
use tracing_subscriber::EnvFilter;
use valentine_cli::config::Config;
use valentine_cli::input::StdinInput;
use valentine_cli::journey;
use valentine_cli::player::{Session, Sky};
use valentine_cli::terminal::Console;
use valentine_content::loader;
use valentine_core::clock::SystemClock;
use valentine_core::rng::SeededRng;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::from_env()?;
    init_tracing(config.log_json);

    let card = match &config.script {
        Some(path) => loader::load(path)?,
        None => loader::embedded()?,
    };
    info!(
        fingerprint = %card.fingerprint,
        source = ?card.source,
        stages = card.script.stages.len(),
        "card loaded"
    );

    let clock = SystemClock;
    let mut rng = config
        .seed
        .map_or_else(|| SeededRng::from_clock(&clock), SeededRng::new);
    info!(seed = rng.seed(), pace = ?config.pace, "starting journey");

    let mut session = Session {
        clock: &clock,
        rng: &mut rng,
        pace: config.pace,
        viewport: config.viewport,
        sky: Sky::default(),
    };
    let mut input = StdinInput::new();
    let mut console = Console::new(std::io::stdout());

    let report = journey::run(&card.script, &mut session, &mut input, &mut console).await?;
    info!(
        completed = report.completed.len(),
        finished = report.finished,
        "journey ended"
    );

    Ok(())
}
