//! intake - Member Recruitment Application
//!
//! Terminal front end for the application form. Collects the applicant's
//! answers section by section, validates them and submits them to the
//! Application Intake API.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::info;

use intake::application::{App, AppMode, FormStateStore};
use intake::infrastructure::{init_logging, HttpIntakeApi, Settings, ENDPOINT_ENV};
use intake::presentation::{render_ui, InputHandler};

const TICK: Duration = Duration::from_millis(100);

#[derive(Parser)]
#[command(name = "intake")]
#[command(about = "Fill in and submit the member recruitment application", long_about = None)]
struct Cli {
    /// Settings file (default: <config dir>/intake/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Application Intake API endpoint, overriding settings and environment
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Directory for the log file
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

/// Entry point for the application form.
///
/// Resolves settings, starts file logging, sets up the terminal and runs
/// the event loop until the user quits.
///
/// # Errors
///
/// Returns an error if settings cannot be read, the HTTP client cannot be
/// built, or terminal setup fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?
        .with_endpoint(std::env::var(ENDPOINT_ENV).ok())
        .with_endpoint(cli.endpoint);
    if cli.log_dir.is_some() {
        settings.log_dir = cli.log_dir;
    }

    let _log_guard = init_logging(&settings.log_dir())?;

    let api = HttpIntakeApi::new(settings.endpoint.clone(), settings.timeout())?;
    info!(endpoint = %api.endpoint(), "starting intake");
    let mut app = App::new(FormStateStore::new(), Arc::new(api));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

/// Main application event loop.
///
/// Redraws on every tick so a submission finishing in the background shows
/// up without a key press. Quits on 'q' in navigation mode.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        app.poll_submission();
        terminal.draw(|f| render_ui(f, app))?;

        if !event::poll(TICK)? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q') if app.mode == AppMode::Normal => {
                        info!("quitting");
                        return Ok(());
                    }
                    _ => InputHandler::handle_key_event(app, key.code, key.modifiers),
                }
            }
        }
    }
}
