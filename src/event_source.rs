use anyhow::Result;
pub use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use std::time::Duration;

/// Trait for abstracting event sources to enable testing
pub trait EventSource {
    /// Poll for events with a timeout
    fn poll(&mut self, timeout: Duration) -> Result<bool>;

    /// Read the next event
    fn read(&mut self) -> Result<Event>;
}

/// Keyboard and mouse events from the real terminal
pub struct TerminalEventSource;

impl EventSource for TerminalEventSource {
    fn poll(&mut self, timeout: Duration) -> Result<bool> {
        Ok(crossterm::event::poll(timeout)?)
    }

    fn read(&mut self) -> Result<Event> {
        Ok(crossterm::event::read()?)
    }
}

/// Simulated event source for testing
pub struct SimulatedEventSource {
    pub(crate) events: Vec<Event>,
    current_index: usize,
}

impl SimulatedEventSource {
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            events,
            current_index: 0,
        }
    }

    /// Helper method to create a key event
    pub fn key_event(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    /// Helper method to create a simple character key event
    pub fn char_key(c: char) -> Event {
        Self::key_event(KeyCode::Char(c), KeyModifiers::empty())
    }

    /// Helper method to create a Ctrl+char key event
    pub fn ctrl_char_key(c: char) -> Event {
        Self::key_event(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    /// Left button press on a terminal cell
    pub fn left_click(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::empty(),
        })
    }
}

impl EventSource for SimulatedEventSource {
    fn poll(&mut self, _timeout: Duration) -> Result<bool> {
        Ok(self.current_index < self.events.len())
    }

    fn read(&mut self) -> Result<Event> {
        if self.current_index < self.events.len() {
            let event = self.events[self.current_index].clone();
            self.current_index += 1;
            Ok(event)
        } else {
            // Return a quit event if we've exhausted all events
            Ok(SimulatedEventSource::char_key('q'))
        }
    }
}
