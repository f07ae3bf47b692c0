mod app;
mod cli;
mod clipboard;
mod command;
mod config;
mod fileio;
mod input;
mod mode;
mod model;
mod notify;
mod style;
mod table;
mod tableview;
mod ui;
mod util;

use std::fs::OpenOptions;
use std::io;
use std::panic;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use app::App;
use cli::CliArgs;
use model::TableModel;
use style::Style;

/// Env var holding the log filter directives
const LOG_ENV: &str = "CSV_VE_LOG";

/// Send tracing output to a file. Nothing is logged when no file is configured,
/// since the terminal belongs to the UI.
fn init_logging(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Handle panics gracefully
fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);

        if let Some(location) = info.location() {
            error!(
                file = location.file(),
                line = location.line(),
                "panic occurred"
            );
        } else {
            error!("panic occurred");
        }

        if let Some(s) = info.payload().downcast_ref::<&str>() {
            error!(message = %s);
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            error!(message = %s);
        }

        default_hook(info);
    }));
}

fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    let startup = args.into_startup()?;

    if let Some(path) = &startup.log_file {
        init_logging(path)?;
    }
    info!(file = %startup.file.display(), theme = %startup.theme.name, "csv-ve started");

    let model = TableModel::open_with_delimiter(&startup.file, startup.delimiter)?;
    info!(delimiter = %model.delimiter_name(), "opened");
    let mut app = App::new(model, Style::with_theme(startup.theme), startup.config);

    install_panic_hook();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("csv-ve exited");
    Ok(result?)
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "fatal");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
