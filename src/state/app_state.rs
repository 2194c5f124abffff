use crate::app::MenuItem;
use pickem_api::{Pick, TiebreakerEntry, WeekSchedule};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Form state: identity + picks + tiebreakers
// ---------------------------------------------------------------------------

/// Everything the user types onto the sheet. Created empty, mutated by key
/// handling, discarded when the process exits.
#[derive(Debug, Default)]
pub struct FormState {
    pub name: String,
    pub email: String,
    /// Winner pick per game id; unset games are simply absent.
    pub picks: HashMap<String, Pick>,
    /// Exactly one entry per resolved tiebreaker game, in display order.
    pub tiebreakers: Vec<TiebreakerEntry>,
}

impl FormState {
    /// Bind one empty tiebreaker entry per resolved id, in schedule order.
    pub fn bind_tiebreakers(&mut self, ids: &[String]) {
        self.tiebreakers = ids.iter().map(|id| TiebreakerEntry::bound_to(id)).collect();
    }

    pub fn set_pick(&mut self, game_id: &str, pick: Pick) {
        self.picks.insert(game_id.to_owned(), pick);
    }

    /// Cycle an unset game to Away, then Away → Home → Tie → Away.
    pub fn cycle_pick(&mut self, game_id: &str) {
        let next = match self.picks.get(game_id) {
            None => Pick::Away,
            Some(pick) => pick.cycle(),
        };
        self.picks.insert(game_id.to_owned(), next);
    }

    pub fn clear_pick(&mut self, game_id: &str) {
        self.picks.remove(game_id);
    }

    /// Append one typed character to a tiebreaker total; non-digits are
    /// dropped by the sanitizer.
    pub fn type_total(&mut self, index: usize, c: char) {
        if let Some(entry) = self.tiebreakers.get_mut(index) {
            let raw = format!("{}{}", entry.total, c);
            entry.set_total(&raw);
        }
    }

    pub fn erase_total(&mut self, index: usize) {
        if let Some(entry) = self.tiebreakers.get_mut(index) {
            entry.total.pop();
        }
    }
}

// ---------------------------------------------------------------------------
// Sheet focus
// ---------------------------------------------------------------------------

/// The row the cursor sits on. Ordered top to bottom: name, email, one row
/// per game, one row per tiebreaker, the submit row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Name,
    Email,
    Game(usize),
    Tiebreaker(usize),
    Submit,
}

impl Focus {
    pub fn next(self, game_count: usize, tiebreaker_count: usize) -> Self {
        match self {
            Focus::Name => Focus::Email,
            Focus::Email if game_count > 0 => Focus::Game(0),
            Focus::Email if tiebreaker_count > 0 => Focus::Tiebreaker(0),
            Focus::Email => Focus::Submit,
            Focus::Game(i) if i + 1 < game_count => Focus::Game(i + 1),
            Focus::Game(_) if tiebreaker_count > 0 => Focus::Tiebreaker(0),
            Focus::Game(_) => Focus::Submit,
            Focus::Tiebreaker(i) if i + 1 < tiebreaker_count => Focus::Tiebreaker(i + 1),
            Focus::Tiebreaker(_) => Focus::Submit,
            Focus::Submit => Focus::Name,
        }
    }

    pub fn prev(self, game_count: usize, tiebreaker_count: usize) -> Self {
        match self {
            Focus::Name => Focus::Submit,
            Focus::Email => Focus::Name,
            Focus::Game(0) => Focus::Email,
            Focus::Game(i) => Focus::Game(i - 1),
            Focus::Tiebreaker(0) if game_count > 0 => Focus::Game(game_count - 1),
            Focus::Tiebreaker(0) => Focus::Email,
            Focus::Tiebreaker(i) => Focus::Tiebreaker(i - 1),
            Focus::Submit if tiebreaker_count > 0 => Focus::Tiebreaker(tiebreaker_count - 1),
            Focus::Submit if game_count > 0 => Focus::Game(game_count - 1),
            Focus::Submit => Focus::Email,
        }
    }

    /// Rows where typed characters edit a value instead of being bindings.
    pub fn is_text_entry(self) -> bool {
        matches!(self, Focus::Name | Focus::Email | Focus::Tiebreaker(_))
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    /// Set when the week fetch failed; the session is over apart from quit.
    pub load_error: Option<String>,
    /// Loaded once, read-only afterward.
    pub schedule: Option<WeekSchedule>,
    pub form: FormState,
    pub focus: Focus,
    /// In-flight submission guard; cleared when the delivery outcome lands.
    pub submitting: bool,
    /// One-line feedback under the sheet (delivery outcome, export path).
    pub status_line: Option<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn game_count(&self) -> usize {
        self.schedule.as_ref().map(|s| s.games.len()).unwrap_or(0)
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next(self.game_count(), self.form.tiebreakers.len());
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev(self.game_count(), self.form.tiebreakers.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pickem_api::Game;

    fn form_with_tiebreakers() -> FormState {
        let mut form = FormState::default();
        form.bind_tiebreakers(&["g1".into(), "g2".into(), "g3".into()]);
        form
    }

    #[test]
    fn typed_totals_are_sanitized_to_digits() {
        let mut form = form_with_tiebreakers();
        for c in "12a3".chars() {
            form.type_total(0, c);
        }
        assert_eq!(form.tiebreakers[0].total, "123");
    }

    #[test]
    fn erase_total_pops_one_digit() {
        let mut form = form_with_tiebreakers();
        form.type_total(1, '4');
        form.type_total(1, '5');
        form.erase_total(1);
        assert_eq!(form.tiebreakers[1].total, "4");
    }

    #[test]
    fn cycling_a_pick_walks_away_home_tie() {
        let mut form = FormState::default();
        form.cycle_pick("g1");
        assert_eq!(form.picks.get("g1"), Some(&Pick::Away));
        form.cycle_pick("g1");
        assert_eq!(form.picks.get("g1"), Some(&Pick::Home));
        form.cycle_pick("g1");
        assert_eq!(form.picks.get("g1"), Some(&Pick::Tie));
        form.cycle_pick("g1");
        assert_eq!(form.picks.get("g1"), Some(&Pick::Away));
    }

    #[test]
    fn clearing_a_pick_removes_the_entry() {
        let mut form = FormState::default();
        form.set_pick("g1", Pick::Home);
        form.clear_pick("g1");
        assert!(!form.picks.contains_key("g1"));
    }

    #[test]
    fn focus_walks_the_whole_sheet_and_wraps() {
        let mut focus = Focus::Name;
        let mut seen = vec![focus];
        loop {
            focus = focus.next(2, 3);
            if focus == Focus::Name {
                break;
            }
            seen.push(focus);
        }
        assert_eq!(
            seen,
            vec![
                Focus::Name,
                Focus::Email,
                Focus::Game(0),
                Focus::Game(1),
                Focus::Tiebreaker(0),
                Focus::Tiebreaker(1),
                Focus::Tiebreaker(2),
                Focus::Submit,
            ]
        );
    }

    #[test]
    fn focus_prev_inverts_focus_next() {
        let game_count = 3;
        let tb = 3;
        let rows = [
            Focus::Name,
            Focus::Email,
            Focus::Game(0),
            Focus::Game(2),
            Focus::Tiebreaker(0),
            Focus::Tiebreaker(2),
            Focus::Submit,
        ];
        for row in rows {
            assert_eq!(row.next(game_count, tb).prev(game_count, tb), row);
        }
    }

    #[test]
    fn bind_tiebreakers_creates_empty_entries_in_order() {
        let form = form_with_tiebreakers();
        assert_eq!(form.tiebreakers.len(), 3);
        assert_eq!(form.tiebreakers[0].game_id, "g1");
        assert!(form.tiebreakers.iter().all(|t| t.total.is_empty()));
    }

    #[test]
    fn game_count_tracks_loaded_schedule() {
        let mut state = AppState::new();
        assert_eq!(state.game_count(), 0);
        state.schedule = Some(WeekSchedule {
            games: vec![Game::default(), Game::default()],
            ..Default::default()
        });
        assert_eq!(state.game_count(), 2);
    }
}
