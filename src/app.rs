use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, Focus, FormState};
use crate::state::validate::{self, Field};
use pickem_api::client::Delivery;
use pickem_api::{Pick, SubmissionPayload, WeekSchedule};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Sheet,
    Review,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new() -> Self {
        let settings = AppSettings::load();

        let app = Self { state: AppState::new(), settings };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    // -----------------------------------------------------------------------
    // Network response handlers — called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_week_loaded(&mut self, schedule: WeekSchedule) {
        self.state.load_error = None;
        self.state.form.bind_tiebreakers(&schedule.tiebreaker_game_ids);
        self.state.focus = Focus::Name;
        self.state.schedule = Some(schedule);
    }

    /// Terminal: the form never appears, only a blocking error screen.
    pub fn on_load_failed(&mut self, message: String) {
        self.state.load_error = Some(message);
    }

    pub fn on_submit_finished(&mut self, delivery: Delivery, composer_opened: bool) {
        self.state.submitting = false;
        self.state.status_line = Some(match delivery {
            Delivery::Remote => "Picks submitted. Good luck this week!".to_owned(),
            Delivery::MailFallback { .. } if composer_opened => {
                "Opened your mail app with the picks instead. Hit send there to finish.".to_owned()
            }
            Delivery::MailFallback { mailto, .. } => {
                format!("No mail app opened. Send the picks yourself: {mailto}")
            }
        });
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // Sheet editing — delegated to FormState based on the focused row
    // -----------------------------------------------------------------------

    pub fn type_char(&mut self, c: char) {
        self.state.status_line = None;
        match self.state.focus {
            Focus::Name => self.state.form.name.push(c),
            Focus::Email => self.state.form.email.push(c),
            Focus::Tiebreaker(i) => self.state.form.type_total(i, c),
            Focus::Game(_) | Focus::Submit => {}
        }
    }

    pub fn erase_char(&mut self) {
        match self.state.focus {
            Focus::Name => {
                self.state.form.name.pop();
            }
            Focus::Email => {
                self.state.form.email.pop();
            }
            Focus::Tiebreaker(i) => self.state.form.erase_total(i),
            Focus::Game(_) | Focus::Submit => {}
        }
    }

    pub fn set_pick_on_focused_game(&mut self, pick: Pick) {
        if let Some(game_id) = self.focused_game_id() {
            self.state.form.set_pick(&game_id, pick);
            // Like ticking a box and dropping down to the next row.
            self.state.focus_next();
        }
    }

    pub fn cycle_pick_on_focused_game(&mut self) {
        if let Some(game_id) = self.focused_game_id() {
            self.state.form.cycle_pick(&game_id);
        }
    }

    pub fn clear_pick_on_focused_game(&mut self) {
        if let Some(game_id) = self.focused_game_id() {
            self.state.form.clear_pick(&game_id);
        }
    }

    fn focused_game_id(&self) -> Option<String> {
        let Focus::Game(i) = self.state.focus else {
            return None;
        };
        let schedule = self.state.schedule.as_ref()?;
        schedule.games.get(i).map(|g| g.id.clone())
    }

    // -----------------------------------------------------------------------
    // Validation, payload, submit gating
    // -----------------------------------------------------------------------

    /// Recomputed from current state on every call; drives the inline error
    /// list and whether the submit action does anything.
    pub fn errors(&self) -> BTreeMap<Field, String> {
        validate::validate(
            &self.state.form.name,
            &self.state.form.email,
            self.state.schedule.as_ref(),
            &self.state.form.picks,
            &self.state.form.tiebreakers,
        )
    }

    pub fn compose_payload(&self) -> Option<SubmissionPayload> {
        let schedule = self.state.schedule.as_ref()?;
        Some(SubmissionPayload::compose(
            schedule,
            &self.state.form.name,
            &self.state.form.email,
            &self.state.form.picks,
            &self.state.form.tiebreakers,
        ))
    }

    /// Gate and start a submission: only with zero validation errors and no
    /// attempt already in flight. Returns what the network worker needs.
    pub fn begin_submit(&mut self) -> Option<(SubmissionPayload, String)> {
        if self.state.submitting || !self.errors().is_empty() {
            return None;
        }
        let payload = self.compose_payload()?;
        self.state.submitting = true;
        self.state.status_line = Some("Submitting picks...".to_owned());
        Some((payload, self.state.form.email.trim().to_owned()))
    }

    // -----------------------------------------------------------------------
    // Printable sheet export
    // -----------------------------------------------------------------------

    /// Render the sheet as flat text and write it next to the user's config,
    /// for printing with their own tooling.
    pub fn export_sheet(&mut self) {
        let Some(schedule) = self.state.schedule.as_ref() else {
            self.state.status_line = Some("Nothing to export until the week loads.".to_owned());
            return;
        };
        let contents = render_printable_sheet(schedule, &self.state.form);
        let path = sheet_export_path(&schedule.week);
        self.state.status_line = Some(match write_sheet(&path, &contents) {
            Ok(()) => format!("Printable sheet written to {}", path.display()),
            Err(e) => format!("Could not write sheet: {e}"),
        });
    }
}

fn write_sheet(path: &Path, contents: &str) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| format!("create dir failed: {e}"))?;
    }
    std::fs::write(path, contents).map_err(|e| format!("write failed: {e}"))
}

fn sheet_export_path(week: &str) -> PathBuf {
    let file = format!("picks_week_{}.txt", pickem_api::team_slug(week));
    if let Ok(config_dir) = std::env::var("XDG_CONFIG_HOME")
        && !config_dir.trim().is_empty()
    {
        return PathBuf::from(config_dir).join("picksheet").join(file);
    }
    if let Ok(home) = std::env::var("HOME")
        && !home.trim().is_empty()
    {
        return PathBuf::from(home).join(".config").join("picksheet").join(file);
    }
    PathBuf::from(file)
}

/// Flat rendering of the whole sheet: header, every matchup with the chosen
/// side, tiebreaker totals, identity footer. Unpicked games stay visible so
/// a printed sheet can be finished by hand.
fn render_printable_sheet(schedule: &WeekSchedule, form: &FormState) -> String {
    use std::fmt::Write as _;

    let mut out = String::new();
    let _ = writeln!(out, "Week {} picks sheet", schedule.week);
    if let Some(deadline) = schedule.deadline {
        let _ = writeln!(out, "Deadline: {}", deadline.format("%a %b %-d %Y, %H:%M UTC"));
    }
    out.push('\n');

    for (n, game) in schedule.games.iter().enumerate() {
        let pick = match form.picks.get(&game.id) {
            Some(p) => p.winner_name(game),
            None => "________",
        };
        let _ = writeln!(out, "{:>3}. {}: {}", n + 1, game.matchup(), pick);
    }

    out.push('\n');
    out.push_str("Tiebreakers (total points):\n");
    for entry in &form.tiebreakers {
        let label = match schedule.find_game(&entry.game_id) {
            Some(game) => game.matchup(),
            None => entry.game_id.clone(),
        };
        let total = if entry.total.is_empty() { "____" } else { entry.total.as_str() };
        let _ = writeln!(out, "  {label}: {total} total");
    }

    out.push('\n');
    let _ = writeln!(out, "Name:  {}", form.name);
    let _ = writeln!(out, "Email: {}", form.email);
    out
}
