use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use std::io::{self, Stdout, Write};
use std::process::ExitCode;
use tracing::{error, info};

mod app;
mod config;
mod diff_engine;
mod input;
mod logging;
mod plain;
mod ui;

use crate::{
    app::App,
    config::{Args, Settings},
    diff_engine::DiffSummary,
    input::DiffInput,
    plain::render_plain,
    ui::render_ui::ui,
};

const MOUSE_SCROLL: usize = 3;

fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, &app))?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if !app.handle_key(key.code) {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollDown => app.scroll_down(MOUSE_SCROLL),
                MouseEventKind::ScrollUp => app.scroll_up(MOUSE_SCROLL),
                _ => {}
            },
            _ => {}
        }
    }
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

/// Runs `setup`; if it fails, runs `undo` before returning the setup error.
fn undo_on_error<T>(
    setup: impl FnOnce() -> Result<T>,
    undo: impl FnOnce() -> Result<()>,
) -> Result<T> {
    setup().inspect_err(|err| {
        error!(%err, "terminal setup failed");
        if let Err(undo_err) = undo() {
            error!(%undo_err, "failed to restore terminal");
        }
    })
}

fn run_viewer(input: DiffInput, settings: &Settings) -> Result<()> {
    let app = App::new(input, settings);

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut terminal = undo_on_error(setup_terminal, restore_terminal)
        .context("failed to set up terminal")?;

    let res = run_app(&mut terminal, app);

    restore_terminal()?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(%err, "viewer exited with an error");
    }
    res
}

fn print_diff(input: &DiffInput, settings: &Settings) -> Result<ExitCode> {
    let rows = diff_engine::diff_texts(&input.left, &input.right);
    let summary = DiffSummary::from_rows(&rows);
    info!(rows = rows.len(), %summary, "aligned inputs");

    let output = render_plain(
        &rows,
        settings.only_changes,
        settings.word_highlight,
        settings.width,
    );
    io::stdout()
        .lock()
        .write_all(output.as_bytes())
        .context("failed to write diff")?;

    Ok(if summary.is_identical() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn run(args: Args) -> Result<ExitCode> {
    let settings = Settings::from_args(&args);
    logging::init(args.log_file.as_deref(), !settings.print)?;

    let input = DiffInput::load(settings.left.clone(), settings.right.clone(), settings.policy)
        .inspect_err(|err| error!(%err, "failed to load inputs"))?;

    if settings.print {
        return print_diff(&input, &settings);
    }

    run_viewer(input, &settings)?;
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:?}");
            ExitCode::from(2)
        }
    }
}
