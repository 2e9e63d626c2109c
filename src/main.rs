//! customers-tui - A terminal dashboard for the customer entries API
//!
//! Fetches the customer list once on start, lets the user filter it by name
//! or mobile number and refresh on demand.

mod action;
mod app;
mod component;
mod components;
mod config;
mod logging;
mod model;
mod services;
mod tui;

use crate::action::Action;
use crate::app::App;
use crate::component::Component;
use crate::config::Config;
use crate::services::HttpEntryFetcher;
use crate::tui::Tui;
use anyhow::Result;
use crossterm::event::Event;
use std::sync::Arc;

fn main() -> Result<()> {
    // Dropped at the end of main, which flushes pending log records
    let _log_guard = Config::config_dir().and_then(|dir| match logging::init(&dir) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("Logging disabled: {err}");
            None
        }
    });

    let config = Config::load();
    let fetcher = HttpEntryFetcher::new(config.entries_url())?;
    tracing::info!(endpoint = fetcher.endpoint(), "starting customers-tui");

    let mut tui = Tui::new()?.with_tick_rate(config.tick_rate());
    tui.enter()?;

    let mut app = App::new(Arc::new(fetcher));
    let result = app.init().and_then(|()| run_app(&mut tui, &mut app));

    tui.exit()?;

    match &result {
        Ok(()) => tracing::info!("customers-tui exited"),
        Err(err) => tracing::error!(error = ?err, "customers-tui crashed"),
    }
    result
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        let mut draw_result = Ok(());
        tui.draw(|frame| {
            let area = frame.area();
            draw_result = app.draw(frame, area);
        })?;
        draw_result?;

        let action = match tui.next_event()? {
            Some(Event::Key(key)) => app.handle_key_event(key)?,
            Some(Event::Resize(w, h)) => Some(Action::Resize(w, h)),
            Some(_) => None,
            None => Some(Action::Tick),
        };

        let mut current_action = action;
        while let Some(a) = current_action {
            current_action = app.update(a)?;
        }
    }

    Ok(())
}
