mod app;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker};
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tui::{Terminal, backend::CrosstermBackend};

const USAGE: &str = "picksheet - weekly pick'em picks sheet for your terminal

Usage:
  picksheet
  picksheet --help
  picksheet --version

Environment:
  PICKSHEET_WEEK_URL     Week document URL or local path (default week.json)
  PICKSHEET_SUBMIT_URL   Picks submission endpoint; unset means the picks
                         go out via your mail app instead
  PICKSHEET_FALLBACK_TO  Recipient of the mail fallback";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if !run_requested() {
        return Ok(());
    }

    better_panic::install();
    install_panic_hook();

    tui_logger::init_logger(log::LevelFilter::Warn)?;
    tui_logger::set_default_level(log::LevelFilter::Warn);

    let app = Arc::new(Mutex::new(App::new()));
    let settings = app.lock().await.settings.clone();

    let (events_tx, events_rx) = mpsc::channel::<UiEvent>(64);
    let (requests_tx, requests_rx) = mpsc::channel::<NetworkRequest>(64);
    let (responses_tx, responses_rx) = mpsc::channel::<NetworkResponse>(64);

    let input_task = tokio::spawn(forward_input_events(events_tx.clone()));
    let worker = NetworkWorker::new(&settings, requests_rx, responses_tx);
    let worker_task = tokio::spawn(worker.run());

    enter_terminal();
    let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    // Kick off the week-document load; the sheet sits behind a loading
    // placeholder until it lands.
    let _ = events_tx.send(UiEvent::AppStarted).await;

    run_event_loop(terminal, app, events_rx, requests_tx, responses_rx).await;

    input_task.abort();
    worker_task.abort();
    restore_terminal();

    Ok(())
}

/// Handle `-h`/`-V` style flags. Returns false when the process should print
/// and exit instead of starting the UI.
fn run_requested() -> bool {
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{USAGE}");
                return false;
            }
            "-V" | "--version" => {
                println!("picksheet {}", env!("CARGO_PKG_VERSION"));
                return false;
            }
            other => {
                eprintln!("Unknown argument: {other}\n\n{USAGE}");
                std::process::exit(2);
            }
        }
    }
    true
}

async fn run_event_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut events: mpsc::Receiver<UiEvent>,
    requests: mpsc::Sender<NetworkRequest>,
    mut responses: mpsc::Receiver<NetworkResponse>,
) {
    let mut loading = LoadingState::default();

    loop {
        let redraw = tokio::select! {
            Some(event) = events.recv() => {
                // While a request is in flight the spinner stream owns the
                // screen; key handling still runs.
                handle_ui_event(event, &app, &requests).await;
                !loading.is_loading
            }
            Some(response) = responses.recv() => {
                apply_network_response(response, &app, &mut loading).await
            }
        };

        if redraw {
            let mut guard = app.lock().await;
            draw::draw(&mut terminal, &mut guard, loading);
        }
    }
}

async fn handle_ui_event(
    event: UiEvent,
    app: &Arc<Mutex<App>>,
    requests: &mpsc::Sender<NetworkRequest>,
) {
    match event {
        UiEvent::AppStarted => {
            let _ = requests.send(NetworkRequest::LoadWeek).await;
        }
        UiEvent::KeyPressed(key) => keys::handle_key_bindings(key, app, requests).await,
        UiEvent::Resize => {}
    }
}

async fn apply_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    loading: &mut LoadingState,
) -> bool {
    match response {
        NetworkResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
            true
        }
        NetworkResponse::WeekLoaded { schedule } => {
            app.lock().await.on_week_loaded(schedule);
            !loading.is_loading
        }
        NetworkResponse::LoadFailed { message } => {
            log::error!("week load failed: {message}");
            app.lock().await.on_load_failed(message);
            !loading.is_loading
        }
        NetworkResponse::SubmitFinished { delivery, composer_opened } => {
            app.lock().await.on_submit_finished(delivery, composer_opened);
            !loading.is_loading
        }
    }
}

/// Blocking crossterm reads, forwarded onto the UI event channel.
async fn forward_input_events(events: mpsc::Sender<UiEvent>) {
    loop {
        let sent = match crossterm_event::read() {
            Ok(Event::Key(key)) => events.send(UiEvent::KeyPressed(key)).await,
            Ok(Event::Resize(..)) => events.send(UiEvent::Resize).await,
            Ok(_) => Ok(()),
            Err(_) => continue,
        };
        if sent.is_err() {
            break;
        }
    }
}

fn enter_terminal() {
    terminal::enable_raw_mode().unwrap();
    execute!(
        io::stdout(),
        terminal::EnterAlternateScreen,
        terminal::Clear(terminal::ClearType::All),
        cursor::Hide
    )
    .unwrap();
}

pub fn restore_terminal() {
    execute!(
        io::stdout(),
        terminal::Clear(terminal::ClearType::All),
        terminal::LeaveAlternateScreen,
        cursor::Show
    )
    .unwrap();
    terminal::disable_raw_mode().unwrap();
}

fn install_panic_hook() {
    panic::set_hook(Box::new(|info| {
        restore_terminal();
        better_panic::Settings::auto().create_panic_handler()(info);
    }));
}
