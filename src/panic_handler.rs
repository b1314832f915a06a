//! Terminal restore on exit and on panic

use crossterm::{
    cursor,
    event::DisableMouseCapture,
    execute,
    terminal::{LeaveAlternateScreen, disable_raw_mode},
};
use log::error;
use std::io;
use std::panic;

pub fn initialize_panic_handler() {
    better_panic::install();

    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();

        // Also record the panic in the log file.
        error!("Panic: {panic_info}");
        log::logger().flush();

        default_hook(panic_info);
        std::process::exit(1);
    }));
}

/// Leave raw mode and the alternate screen, release the mouse and show the cursor.
///
/// Every step is attempted; the first failure is returned.
pub fn restore_terminal() -> io::Result<()> {
    let raw = disable_raw_mode();
    let screen = execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        cursor::Show
    );
    raw.and(screen)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restoring_without_a_session_is_harmless() {
        assert!(restore_terminal().is_ok());
        assert!(restore_terminal().is_ok());
    }
}
