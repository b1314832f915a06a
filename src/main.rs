use std::{
    fs::File,
    io::{self, BufRead, Write, stdout},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::EnableMouseCapture,
    execute,
    terminal::{EnterAlternateScreen, enable_raw_mode},
};
use log::{LevelFilter, error, info};
use ratatui::{Terminal, backend::CrosstermBackend};
use simplelog::{Config, WriteLogger};

use pagepick::event_source::TerminalEventSource;
use pagepick::panic_handler::{initialize_panic_handler, restore_terminal};
use pagepick::pdf::MupdfBackend;
use pagepick::settings::Settings;
use pagepick::{Viewer, run_app_with_event_source};

/// Show a PDF page in the terminal and report the text line under each click
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Document name without the .pdf extension; prompted for when omitted
    name: Option<String>,

    /// Settings file to use instead of the per-user config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write the log
    #[arg(long, default_value = "pagepick.log")]
    log_file: PathBuf,
}

fn prompt_for_name() -> Result<String> {
    println!("Enter the file name (without the .pdf extension):");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("reading file name")?;
    Ok(line.trim().to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Installed before settings load; the configured level is applied after.
    WriteLogger::init(
        LevelFilter::Trace,
        Config::default(),
        File::create(&cli.log_file)
            .with_context(|| format!("creating log file {}", cli.log_file.display()))?,
    )?;

    let settings = Settings::load(cli.config.as_deref());
    log::set_max_level(settings.level_filter());

    info!("Starting pagepick");

    let name = match cli.name {
        Some(name) => name,
        None => prompt_for_name()?,
    };
    let path = PathBuf::from(format!("{name}.pdf"));

    let backend =
        MupdfBackend::open(&path).with_context(|| format!("opening {}", path.display()))?;
    let title = backend.path().display().to_string();
    let mut viewer = Viewer::new(backend, title, settings)
        .with_context(|| format!("reading {}", path.display()))?;

    initialize_panic_handler();

    // Terminal initialization
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app_with_event_source(&mut terminal, &mut viewer, &mut TerminalEventSource);

    restore_terminal()?;

    if let Err(err) = res {
        error!("Application error: {err:?}");
        return Err(err);
    }

    info!("Shutting down pagepick");
    Ok(())
}
