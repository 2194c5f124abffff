use crate::app::{App, MenuItem};
use crate::state::app_state::Focus;
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pickem_api::Pick;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;

    // Load failure is terminal for the session: only quitting works.
    if guard.state.load_error.is_some() {
        if matches!(
            (key_event.code, key_event.modifiers),
            (Char('q') | KeyCode::Esc, _) | (Char('c'), KeyModifiers::CONTROL)
        ) {
            crate::restore_terminal();
            std::process::exit(0);
        }
        return;
    }

    if key_event.code == Char('c') && key_event.modifiers == KeyModifiers::CONTROL {
        crate::restore_terminal();
        std::process::exit(0);
    }

    // On a text row of the sheet, printable keys edit the field; everything
    // else falls through to the bindings below.
    if guard.state.active_tab == MenuItem::Sheet && guard.state.focus.is_text_entry() {
        match key_event.code {
            Char(c) => {
                guard.type_char(c);
                return;
            }
            KeyCode::Backspace => {
                guard.erase_char();
                return;
            }
            _ => {}
        }
    }

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) => {
            crate::restore_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Sheet),
        (_, Char('2'), _) => guard.update_tab(MenuItem::Review),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Sheet row navigation
        (MenuItem::Sheet, KeyCode::Down | KeyCode::Tab, _) => guard.state.focus_next(),
        (MenuItem::Sheet, KeyCode::Up | KeyCode::BackTab, _) => guard.state.focus_prev(),

        // Picking on a game row
        (MenuItem::Sheet, Char('a') | KeyCode::Left, _) => {
            guard.set_pick_on_focused_game(Pick::Away);
        }
        (MenuItem::Sheet, Char('h') | KeyCode::Right, _) => {
            guard.set_pick_on_focused_game(Pick::Home);
        }
        (MenuItem::Sheet, Char('t'), _) => guard.set_pick_on_focused_game(Pick::Tie),
        (MenuItem::Sheet, Char(' '), _) => guard.cycle_pick_on_focused_game(),
        (MenuItem::Sheet, KeyCode::Delete, _) => guard.clear_pick_on_focused_game(),

        // Enter advances, except on the submit row where it submits.
        (MenuItem::Sheet, KeyCode::Enter, _) => {
            if guard.state.focus == Focus::Submit {
                if let Some((payload, email)) = guard.begin_submit() {
                    drop(guard);
                    let _ = network_requests
                        .send(NetworkRequest::SubmitPicks { payload, email })
                        .await;
                    return;
                }
            } else {
                guard.state.focus_next();
            }
        }

        // Submit from anywhere on the sheet or the review tab
        (MenuItem::Sheet | MenuItem::Review, Char('s'), _) => {
            if let Some((payload, email)) = guard.begin_submit() {
                drop(guard);
                let _ = network_requests
                    .send(NetworkRequest::SubmitPicks { payload, email })
                    .await;
                return;
            }
        }

        // Printable sheet export
        (MenuItem::Sheet | MenuItem::Review, Char('x'), _) => guard.export_sheet(),

        // Global
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }
}
