use std::io::{self, Stdout};
use std::time::Instant;

use anyhow::Context;
use client_logging::{client_error, client_info};
use crossterm::event;
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use docchat_core::{update, AppState, Msg};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use super::config::{AppConfig, ConfigError};
use super::effects::EffectRunner;
use super::input::{handle_event, InputOutcome};
use super::ui;
use super::ui::view_state::UiState;

pub fn run_app() -> anyhow::Result<()> {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(ConfigError::Args(err)) => err.exit(),
        Err(err) => return Err(err.into()),
    };

    client_logging::initialize(&config.log_file, config.verbose)
        .with_context(|| format!("cannot open log file {}", config.log_file.display()))?;
    if let Some(path) = &config.config_path {
        client_info!("loaded config from {}", path.display());
    }

    let runner = EffectRunner::new(config.settings.clone()).context("cannot start network engine")?;
    let mut terminal = TerminalGuard::enter().context("cannot set up terminal")?;

    let result = event_loop(terminal.terminal_mut(), &runner);
    runner.shutdown();
    drop(terminal);

    if let Err(err) = &result {
        client_error!("event loop failed: {err:#}");
    }
    client_info!("docchat exiting");
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    runner: &EffectRunner,
) -> anyhow::Result<()> {
    let mut state = AppState::new();
    let mut ui_state = UiState::new();
    let mut needs_redraw = true;

    loop {
        let view = state.view();
        if needs_redraw || view.busy.is_some() {
            terminal.draw(|frame| ui::render::render(frame, &view, &mut ui_state))?;
            needs_redraw = false;
        }

        if event::poll(ui::constants::TICK_INTERVAL)? {
            let terminal_event = event::read()?;
            match handle_event(&terminal_event, &mut ui_state, &view) {
                InputOutcome::Dispatch(msg) => {
                    needs_redraw |= dispatch(&mut state, msg, runner, &mut ui_state);
                }
                InputOutcome::Redraw => needs_redraw = true,
                InputOutcome::Quit => return Ok(()),
                InputOutcome::Ignored => {}
            }
        }

        for msg in runner.drain_events() {
            needs_redraw |= dispatch(&mut state, msg, runner, &mut ui_state);
        }
        needs_redraw |= dispatch(&mut state, Msg::Tick { now: Instant::now() }, runner, &mut ui_state);

        if state.is_busy() {
            ui_state.advance_spinner();
        }
    }
}

/// Run one message through the core; returns whether the view changed.
fn dispatch(state: &mut AppState, msg: Msg, runner: &EffectRunner, ui_state: &mut UiState) -> bool {
    let (next, effects) = update(std::mem::take(state), msg);
    *state = next;
    let picker_was_open = ui_state.picker.open;
    runner.enqueue(effects, ui_state);

    let dirty = state.consume_dirty();
    if dirty {
        ui_state.sync_query(&state.view().input);
    }
    dirty || picker_was_open != ui_state.picker.open
}

/// Raw mode plus alternate screen, restored on drop even when the loop errors.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err);
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }

    fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}
