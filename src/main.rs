//! spark-folio binary: the portfolio page in the alternate screen.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::terminal;

use spark_folio::config::FolioConfig;
use spark_folio::contact::{ContactClient, EmailRelay};
use spark_folio::error::FolioError;
use spark_folio::pipeline::mount_with;
use spark_folio::renderer::TerminalRenderer;
use spark_folio::state::input::{self, PageCommand};
use spark_folio::theme::{ColorSchemeQuery, ThemeToggle};
use spark_folio::{logging, portfolio, App};

/// Input poll interval, about one frame at 60 Hz.
const FRAME: Duration = Duration::from_millis(16);

#[derive(Debug, Parser)]
#[command(name = "spark-folio", version, about = "Scroll-reveal portfolio page for the terminal")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write logs to this file instead of stderr.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Run without a mail relay; the contact form cannot send.
    #[arg(long)]
    offline: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let held = match logging::init(cli.log_file.as_deref()) {
        Ok(held) => held,
        Err(err) => {
            eprintln!("spark-folio: cannot open log file: {err}");
            return ExitCode::FAILURE;
        }
    };

    // The terminal session has been restored by the time run returns.
    let result = run(&cli);
    if let Some(held) = &held {
        let _ = held.release();
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if cli.log_file.is_some() {
                log::error!("{err}");
            }
            eprintln!("spark-folio: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), FolioError> {
    let config = FolioConfig::load(cli.config.as_deref(), cli.offline)?;

    let contact = match &config.relay {
        Some(relay) => {
            log::info!("contact relay at {}", relay.endpoint);
            Some(ContactClient::new(Arc::new(EmailRelay::new(relay)?)))
        }
        None => {
            log::info!("running offline, contact form disabled");
            None
        }
    };

    let size = terminal::size()?;
    let start = Instant::now();
    let page = mount_with(portfolio(), size, start.elapsed(), &config.page)?;
    // Read once: a terminal host has no change notification to follow.
    let theme = ThemeToggle::mount(ColorSchemeQuery::from_env());
    let mut app = App::new(page, theme, contact, &config.page);

    let mut session = TerminalSession::enter()?;
    while app.is_running() {
        app.poll_relay();
        if let Some(lines) = app.draw(start.elapsed()) {
            session.renderer.render(&lines)?;
        }

        if let Some(command) = input::poll_command(FRAME, app.mode())? {
            if matches!(command, PageCommand::Resize(..)) {
                session.renderer.invalidate();
            }
            app.handle(command, start.elapsed())?;
        }
    }
    Ok(())
}

/// Raw mode, alternate screen and mouse capture, restored on drop.
struct TerminalSession {
    renderer: TerminalRenderer<io::Stdout>,
}

impl TerminalSession {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut session = Self {
            renderer: TerminalRenderer::stdout(),
        };
        session.renderer.enter_fullscreen()?;
        input::enable_mouse()?;
        Ok(session)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        // Best effort: the terminal must come back even on error.
        let _ = input::disable_mouse();
        let _ = self.renderer.exit_fullscreen();
        let _ = terminal::disable_raw_mode();
    }
}
