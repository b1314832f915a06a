use std::time::{Duration, Instant};

use anyhow::Result;
use log::{debug, error};
use ratatui::{Terminal, backend::Backend, layout::Rect};

use crate::event_source::{
    Event, EventSource, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use crate::pdf::{PdfBackend, PdfError};
use crate::viewer::Viewer;
use crate::widget::HudMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Quit,
}

/// Dispatch one terminal event to the viewer
pub fn handle_event<P: PdfBackend>(
    viewer: &mut Viewer<P>,
    event: &Event,
) -> Result<Option<AppAction>, PdfError> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Ok(Some(AppAction::Quit))
            }
            KeyCode::Char('q') | KeyCode::Esc => Ok(Some(AppAction::Quit)),
            KeyCode::Right | KeyCode::Char('l' | 'n') => viewer.next().map(|()| None),
            KeyCode::Left | KeyCode::Char('h' | 'p') => viewer.back().map(|()| None),
            _ => Ok(None),
        },
        Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => viewer
            .on_mouse_down(mouse.column, mouse.row)
            .map(|()| None),
        Event::Resize(width, height) => viewer
            .fit(Rect::new(0, 0, *width, *height))
            .map(|()| None),
        _ => Ok(None),
    }
}

fn report<P: PdfBackend>(viewer: &mut Viewer<P>, err: &PdfError) {
    error!("{err}");
    viewer.show_hud(err.to_string(), HudMode::Error);
}

pub fn run_app_with_event_source<B, P>(
    terminal: &mut Terminal<B>,
    viewer: &mut Viewer<P>,
    event_source: &mut dyn EventSource,
) -> Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
    P: PdfBackend,
{
    let tick_rate = Duration::from_millis(50);
    let mut last_tick = Instant::now();
    let mut first_render = true;

    let size = terminal.size()?;
    if let Err(e) = viewer.fit(Rect::new(0, 0, size.width, size.height)) {
        report(viewer, &e);
    }

    loop {
        let mut events_processed = 0;
        let mut should_quit = false;

        while event_source.poll(Duration::from_millis(0))? && events_processed < 50 {
            let event = event_source.read()?;
            events_processed += 1;

            match handle_event(viewer, &event) {
                Ok(Some(AppAction::Quit)) => {
                    should_quit = true;
                    break;
                }
                Ok(None) => {}
                Err(e) => report(viewer, &e),
            }
        }

        if should_quit {
            debug!("Quit requested");
            return Ok(());
        }

        let mut needs_redraw = events_processed > 0;

        if first_render {
            needs_redraw = true;
            first_render = false;
        }

        if last_tick.elapsed() >= tick_rate {
            if viewer.update_hud_message() {
                needs_redraw = true;
            }
            last_tick = Instant::now();
        }

        if needs_redraw {
            terminal.draw(|f| viewer.draw(f))?;
        }

        // If no events were processed, wait a bit to avoid busy-waiting
        if events_processed == 0 {
            let timeout = tick_rate
                .checked_sub(last_tick.elapsed())
                .unwrap_or_else(|| Duration::from_secs(0));
            let _ = event_source.poll(timeout);
        }
    }
}
