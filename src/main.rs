//! Terminal runner (default binary).
//!
//! Loads the config, opens the high-score file and drives a [`Session`] from a
//! crossterm event loop at the configured frame period.

mod view;

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use log::info;

use blockfall::config::{config_path, data_dir, Config};
use blockfall::core::{GameSnapshot, GameState};
use blockfall::input::should_quit;
use blockfall::session::Session;
use blockfall::storage::JsonFileStore;

use crate::view::TerminalView;

fn main() -> Result<()> {
    let config = match config_path() {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };
    init_logging();

    let seed = config.seed.unwrap_or_else(clock_seed);
    let high_score_path = config
        .high_score_path()
        .unwrap_or_else(|| PathBuf::from("high_score.json"));
    info!("seed={seed} high_score={}", high_score_path.display());

    let mut session = Session::new(GameState::new(seed), JsonFileStore::new(high_score_path))?;

    let mut view = TerminalView::new();
    view.enter()?;

    let result = run(&mut view, &mut session, &config);

    // Always try to restore terminal state.
    let _ = view.exit();
    result
}

fn run(view: &mut TerminalView, session: &mut Session, config: &Config) -> Result<()> {
    let bindings = config.key_bindings;
    let frame = Duration::from_millis(u64::from(config.frame_ms()));
    let start = Instant::now();
    let mut last_frame = Instant::now();
    let mut snapshot = GameSnapshot::default();
    session.frame(0);

    loop {
        session.snapshot_into(&mut snapshot);
        view.draw(&snapshot)?;

        let timeout = frame
            .checked_sub(last_frame.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(action) = bindings.handle_key_event(key) {
                        session.apply(action);
                    }
                }
                Event::Resize(..) => view.invalidate(),
                _ => {}
            }
        }

        if last_frame.elapsed() >= frame {
            last_frame = Instant::now();
            let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
            session.frame(now_ms);
        }

        for event in session.take_events() {
            view.on_event(event);
        }
    }
}

/// Log to a file in the data directory; stderr belongs to the terminal UI.
fn init_logging() {
    let Some(dir) = data_dir() else {
        return;
    };
    if fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("blockfall.log"))
    else {
        return;
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}
