use std::env;
use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::library::{Access, AccessBroker, FsAccess, FsMediaIndex, LibraryEvent, spawn_load};
use crate::logging;

mod event_loop;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, config_problem) = settings::load_settings();
    let log_path = logging::init(&settings.logging);
    if let Some(problem) = config_problem {
        warn!("{problem}");
    }
    info!(log = ?log_path, "starting");

    let root = settings::resolve_root(env::args().nth(1), &settings.library);
    let mut app = App::new(Some(root.display().to_string()));

    let (activate_tx, activate_rx) = mpsc::channel::<usize>();
    app.list.on_activate(move |index| {
        let _ = activate_tx.send(index);
    });

    let (library_tx, library_rx) = mpsc::channel::<LibraryEvent>();
    match FsAccess::new(&root).request_audio_access() {
        Access::Granted => {
            let index = FsMediaIndex::new(&root, settings.library.clone());
            spawn_load(index, library_tx);
        }
        Access::Denied => {
            warn!(root = %root.display(), "audio access denied");
            app.access_denied();
        }
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = event_loop::EventLoopState::default();
    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &library_rx,
        &activate_rx,
        &mut state,
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("shutting down");
    run_result
}
