pub mod client;
pub mod mailto;
pub mod wire;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Every week's sheet carries exactly this many tiebreaker games.
pub const TIEBREAKER_COUNT: usize = 3;

// ---------------------------------------------------------------------------
// Domain types — clean model, independent of the week-document wire format
// ---------------------------------------------------------------------------

/// The schedule for one contest week. Loaded once per session from the week
/// document and read-only afterward.
#[derive(Debug, Clone, Default)]
pub struct WeekSchedule {
    pub week: String,
    pub deadline: Option<DateTime<Utc>>,
    pub games: Vec<Game>,
    /// Exactly `TIEBREAKER_COUNT` game ids once at least that many games
    /// exist; resolved by `wire::resolve_tiebreaker_ids`.
    pub tiebreaker_game_ids: Vec<String>,
}

impl WeekSchedule {
    pub fn find_game(&self, game_id: &str) -> Option<&Game> {
        self.games.iter().find(|g| g.id == game_id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Game {
    pub id: String,
    pub away: String,
    pub home: String,
    pub date: Option<String>,
    pub time: Option<String>,
}

impl Game {
    /// "Away @ Home", the matchup label used on the sheet and in payloads.
    pub fn matchup(&self) -> String {
        format!("{} @ {}", self.away, self.home)
    }
}

/// A winner pick for a single game. Unpicked games carry no entry at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick {
    Away,
    Home,
    Tie,
}

impl Pick {
    /// Away → Home → Tie → Away, for cycling through with one key.
    pub fn cycle(self) -> Self {
        match self {
            Pick::Away => Pick::Home,
            Pick::Home => Pick::Tie,
            Pick::Tie => Pick::Away,
        }
    }

    /// Resolve the picked side to a display name for the given game.
    pub fn winner_name<'a>(self, game: &'a Game) -> &'a str {
        match self {
            Pick::Away => game.away.as_str(),
            Pick::Home => game.home.as_str(),
            Pick::Tie => "Tie",
        }
    }
}

/// One of the three predicted-total entries, bound to a designated game.
#[derive(Debug, Clone, Default)]
pub struct TiebreakerEntry {
    pub game_id: String,
    /// Digits only; `set_total` strips everything else.
    pub total: String,
}

impl TiebreakerEntry {
    pub fn bound_to(game_id: &str) -> Self {
        Self { game_id: game_id.to_owned(), total: String::new() }
    }

    /// Store a total, keeping only digit characters ("12a3" becomes "123").
    pub fn set_total(&mut self, raw: &str) {
        self.total = raw.chars().filter(char::is_ascii_digit).collect();
    }

    pub fn is_complete(&self) -> bool {
        !self.game_id.is_empty() && !self.total.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Team slug / logo path convention
// ---------------------------------------------------------------------------

/// Lowercase slug for a team display name: "Green Bay" → "green-bay".
pub fn team_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_dash = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash {
            slug.push('-');
            last_was_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Conventional logo asset path for a team. Consumers are expected to
/// degrade gracefully when the asset does not exist.
pub fn logo_path(name: &str) -> String {
    format!("/logos/{}.png", team_slug(name))
}

// ---------------------------------------------------------------------------
// Concise submission payload
// ---------------------------------------------------------------------------

/// The minimal human-readable submission record. Unpicked games are omitted
/// entirely; internal game ids appear only when a tiebreaker id cannot be
/// resolved against the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionPayload {
    #[serde(rename = "subjectLine")]
    pub subject_line: String,
    #[serde(rename = "picks")]
    pub pick_lines: Vec<String>,
    #[serde(rename = "tiebreakers")]
    pub tiebreaker_lines: Vec<String>,
}

impl SubmissionPayload {
    /// Build the payload from current sheet state. Deterministic: identical
    /// state always yields an identical payload.
    pub fn compose(
        schedule: &WeekSchedule,
        name: &str,
        email: &str,
        picks: &HashMap<String, Pick>,
        tiebreakers: &[TiebreakerEntry],
    ) -> Self {
        let subject_line =
            format!("Week {} — {} ({})", schedule.week, name.trim(), email.trim());

        let pick_lines = schedule
            .games
            .iter()
            .filter_map(|game| {
                picks
                    .get(&game.id)
                    .map(|pick| format!("{} → {}", game.matchup(), pick.winner_name(game)))
            })
            .collect();

        let tiebreaker_lines = tiebreakers
            .iter()
            .map(|entry| match schedule.find_game(&entry.game_id) {
                Some(game) => format!("{}: {} total", game.matchup(), entry.total),
                // Defensive: tiebreaker ids are drawn from the schedule, so
                // this branch is not expected in normal operation.
                None => format!("{}: {} total", entry.game_id, entry.total),
            })
            .collect();

        Self { subject_line, pick_lines, tiebreaker_lines }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule() -> WeekSchedule {
        WeekSchedule {
            week: "10".into(),
            deadline: None,
            games: vec![
                Game {
                    id: "g1".into(),
                    away: "Jets".into(),
                    home: "Bills".into(),
                    date: Some("Nov 9".into()),
                    time: Some("1:00 PM".into()),
                },
                Game { id: "g2".into(), away: "Lions".into(), home: "Bears".into(), ..Default::default() },
                Game { id: "g3".into(), away: "Eagles".into(), home: "Cowboys".into(), ..Default::default() },
            ],
            tiebreaker_game_ids: vec!["g1".into(), "g2".into(), "g3".into()],
        }
    }

    #[test]
    fn payload_resolves_home_and_away_winners() {
        let s = schedule();
        let picks = HashMap::from([
            ("g1".to_string(), Pick::Home),
            ("g2".to_string(), Pick::Away),
            ("g3".to_string(), Pick::Tie),
        ]);
        let payload = SubmissionPayload::compose(&s, "Jane", "jane@example.com", &picks, &[]);
        assert_eq!(payload.pick_lines[0], "Jets @ Bills → Bills");
        assert_eq!(payload.pick_lines[1], "Lions @ Bears → Lions");
        assert_eq!(payload.pick_lines[2], "Eagles @ Cowboys → Tie");
    }

    #[test]
    fn unpicked_games_are_omitted_from_pick_lines() {
        let s = schedule();
        let picks = HashMap::from([("g2".to_string(), Pick::Home)]);
        let payload = SubmissionPayload::compose(&s, "Jane", "jane@example.com", &picks, &[]);
        assert_eq!(payload.pick_lines, vec!["Lions @ Bears → Bears".to_string()]);
    }

    #[test]
    fn subject_line_carries_week_name_and_email() {
        let s = schedule();
        let payload =
            SubmissionPayload::compose(&s, "  Jane Doe ", "jane@example.com", &HashMap::new(), &[]);
        assert_eq!(payload.subject_line, "Week 10 — Jane Doe (jane@example.com)");
    }

    #[test]
    fn tiebreaker_lines_resolve_games_and_fall_back_to_raw_id() {
        let s = schedule();
        let entries = vec![
            TiebreakerEntry { game_id: "g1".into(), total: "45".into() },
            TiebreakerEntry { game_id: "missing".into(), total: "31".into() },
        ];
        let payload =
            SubmissionPayload::compose(&s, "Jane", "jane@example.com", &HashMap::new(), &entries);
        assert_eq!(payload.tiebreaker_lines[0], "Jets @ Bills: 45 total");
        assert_eq!(payload.tiebreaker_lines[1], "missing: 31 total");
    }

    #[test]
    fn payload_is_byte_identical_across_calls() {
        let s = schedule();
        let picks = HashMap::from([
            ("g1".to_string(), Pick::Home),
            ("g3".to_string(), Pick::Away),
        ]);
        let entries = vec![TiebreakerEntry { game_id: "g2".into(), total: "52".into() }];
        let a = SubmissionPayload::compose(&s, "Jane", "jane@example.com", &picks, &entries);
        let b = SubmissionPayload::compose(&s, "Jane", "jane@example.com", &picks, &entries);
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn payload_serializes_with_wire_field_names() {
        let s = schedule();
        let payload = SubmissionPayload::compose(&s, "Jane", "jane@example.com", &HashMap::new(), &[]);
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("subjectLine").is_some());
        assert!(json.get("picks").is_some());
        assert!(json.get("tiebreakers").is_some());
    }

    #[test]
    fn total_input_is_sanitized_to_digits() {
        let mut entry = TiebreakerEntry::bound_to("g1");
        entry.set_total("12a3");
        assert_eq!(entry.total, "123");
        entry.set_total("");
        assert!(!entry.is_complete());
    }

    #[test]
    fn pick_cycle_covers_all_three_states() {
        assert_eq!(Pick::Away.cycle(), Pick::Home);
        assert_eq!(Pick::Home.cycle(), Pick::Tie);
        assert_eq!(Pick::Tie.cycle(), Pick::Away);
    }

    #[test]
    fn team_slugs_follow_the_logo_convention() {
        assert_eq!(team_slug("Green Bay"), "green-bay");
        assert_eq!(team_slug("St. Louis"), "st-louis");
        assert_eq!(team_slug("49ers"), "49ers");
        assert_eq!(logo_path("Green Bay"), "/logos/green-bay.png");
    }
}
