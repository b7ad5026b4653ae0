#![forbid(unsafe_code)]

//! `fringe`: double-slit interference in the terminal.
//!
//! # Environment
//!
//! - `FRINGE_MODE`, `FRINGE_WAVELENGTH`, `FRINGE_SLIT_WIDTH`,
//!   `FRINGE_SLIT_DISTANCE`, `FRINGE_SCREEN_DISTANCE`,
//!   `FRINGE_PARTICLE_SPEED`, `FRINGE_THRESHOLD`: initial controls.
//! - `FRINGE_SEED`, `FRINGE_REFRESH_MS`, `FRINGE_EMISSION_PROBABILITY`, ...:
//!   runtime tuning (see `fringe_runtime::config`).
//! - `FRINGE_LOG_FILE`: write logs here (filtered by `FRINGE_LOG`, default
//!   `info`). Without it nothing is logged, so the picture stays intact.

mod controls;
mod presenter;
mod session;

use controls::{InputError, KeyAction, controls_from_lookup, handle_key, status_line};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use fringe_runtime::{AnimationLoop, FrameScheduler, RefreshScheduler, RuntimeConfig, Simulation};
use presenter::TerminalPresenter;
use session::TerminalSession;
use std::fmt;
use std::fs::OpenOptions;
use std::io;
use std::process::ExitCode;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn init_logging() -> Result<(), DemoError> {
    let Some(path) = fringe_runtime::config::env_string(&env_lookup, "FRINGE_LOG_FILE") else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    let filter = EnvFilter::try_from_env("FRINGE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    // A subscriber installed by an embedding process wins.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    tracing::info!(path = %path, "logging started");
    Ok(())
}

fn run() -> Result<(), DemoError> {
    init_logging()?;
    let config = RuntimeConfig::from_env().map_err(InputError::from)?;
    let controls = controls_from_lookup(env_lookup, &config.geometry)?;
    tracing::info!(mode = %controls.mode, seed = ?config.seed, "starting");

    let session = TerminalSession::enter()?;
    let (cols, rows) = session.size()?;
    let presenter = TerminalPresenter::new(io::stdout(), cols, rows.saturating_sub(1));
    let scheduler = RefreshScheduler::new(config.refresh_interval);
    let idle = config.refresh_interval;
    let geometry = config.geometry;
    let mut anim = AnimationLoop::new(Simulation::new(config), scheduler, presenter, controls);
    anim.start();

    loop {
        let timeout = anim.scheduler().time_until_due().unwrap_or(idle);
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if key.modifiers.contains(KeyModifiers::CONTROL)
                        && key.code == KeyCode::Char('c')
                    {
                        break;
                    }
                    match handle_key(anim.controls(), key.code, &geometry) {
                        KeyAction::Quit => break,
                        KeyAction::Update(next) => anim.set_controls(next),
                        KeyAction::Ignore => {}
                    }
                }
                Event::Resize(cols, rows) => {
                    anim.presenter_mut().resize(cols, rows.saturating_sub(1));
                }
                _ => {}
            }
            continue;
        }
        let status = status_line(anim.controls(), anim.simulation().screen().len());
        anim.presenter_mut().set_status(status);
        anim.poll()?;
    }

    anim.stop();
    let totals = anim.simulation().engine().totals();
    tracing::info!(
        frames = anim.presented(),
        emitted = totals.emitted,
        landed = totals.landed,
        "stopped"
    );
    drop(anim);
    drop(session);
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("fringe: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Anything that ends the demo early.
#[derive(Debug)]
enum DemoError {
    Input(InputError),
    Io(io::Error),
}

impl fmt::Display for DemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "terminal error: {err}"),
        }
    }
}

impl std::error::Error for DemoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Input(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<InputError> for DemoError {
    fn from(err: InputError) -> Self {
        Self::Input(err)
    }
}

impl From<io::Error> for DemoError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}
