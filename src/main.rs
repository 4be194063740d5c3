use crossterm::{
    cursor::Show,
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info};
use ratatui::prelude::*;
use simplelog::{Config as LogConfig, LevelFilter, WriteLogger};
use std::fs::File;
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use snekgrid::app::App;
use snekgrid::config::Config;
use snekgrid::error::AppError;

const LOG_FILE: &str = "snekgrid.log";

fn main() -> Result<(), AppError> {
    // Set up logging before anything else; the configured level is applied
    // once the config file has been read.
    WriteLogger::init(LevelFilter::Trace, LogConfig::default(), File::create(LOG_FILE)?)?;

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return Err(e.into());
        }
    };
    log::set_max_level(config.log_level);
    info!("Starting snekgrid with {:?}", config);

    enable_raw_mode()?;
    let result = play(&config);
    // Runs whether or not `play` got the terminal set up.
    restore_terminal()?;

    if let Err(e) = &result {
        error!("Game loop failed: {}", e);
    }
    info!("Exiting snekgrid");
    result
}

fn play(config: &Config) -> Result<(), AppError> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);
    run(&mut terminal, &mut app, config.frame_interval)
}

fn restore_terminal() -> Result<(), AppError> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture, Show)?;
    Ok(())
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    frame_interval: Duration,
) -> Result<(), AppError> {
    let mut last_frame = Instant::now();

    loop {
        terminal.draw(|f| app.render(f))?;

        // Wait up to one frame for input, then drain whatever else is queued.
        let mut timeout = frame_interval;
        while event::poll(timeout)? {
            app.handle_event(event::read()?);
            timeout = Duration::ZERO;
        }

        let now = Instant::now();
        app.update(now - last_frame);
        last_frame = now;

        if app.should_exit() {
            break;
        }
    }

    Ok(())
}
