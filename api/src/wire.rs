//! Week-document wire types: serde shapes for the externally supplied
//! schedule, mapped into the clean domain types by `map_week`.

use crate::{Game, TIEBREAKER_COUNT, WeekSchedule};
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WeekDoc {
    pub week: Option<String>,
    /// ISO-8601 / RFC 3339 submission deadline.
    pub deadline: Option<String>,
    pub games: Option<Vec<WireGame>>,
    /// Designated tiebreaker game ids. May be missing or short; see
    /// `resolve_tiebreaker_ids`.
    pub tiebreakers: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireGame {
    pub id: Option<String>,
    pub away: Option<String>,
    pub home: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
}

/// Map a parsed week document into the domain schedule.
pub fn map_week(doc: WeekDoc) -> WeekSchedule {
    let games: Vec<Game> = doc
        .games
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(index, raw)| map_game(index, raw))
        .collect();

    let tiebreaker_game_ids =
        resolve_tiebreaker_ids(doc.tiebreakers.unwrap_or_default(), &games);

    let deadline = doc
        .deadline
        .as_deref()
        .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
        .map(|dt| dt.with_timezone(&Utc));

    WeekSchedule {
        week: doc.week.unwrap_or_default(),
        deadline,
        games,
        tiebreaker_game_ids,
    }
}

fn map_game(index: usize, raw: WireGame) -> Game {
    Game {
        // Ids are unique within a week; synthesize a positional one if the
        // document omits it.
        id: raw
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| format!("game-{}", index + 1)),
        away: raw.away.unwrap_or_default(),
        home: raw.home.unwrap_or_default(),
        date: raw.date,
        time: raw.time,
    }
}

/// Resolve the designated tiebreaker game ids. Supplied ids are preferred in
/// order (deduplicated, capped at `TIEBREAKER_COUNT`); any shortfall is
/// filled with the earliest games in document order not already designated.
pub fn resolve_tiebreaker_ids(supplied: Vec<String>, games: &[Game]) -> Vec<String> {
    let mut ids: Vec<String> = Vec::with_capacity(TIEBREAKER_COUNT);

    for id in supplied {
        if ids.len() == TIEBREAKER_COUNT {
            break;
        }
        if !id.trim().is_empty() && !ids.contains(&id) {
            ids.push(id);
        }
    }

    for game in games {
        if ids.len() == TIEBREAKER_COUNT {
            break;
        }
        if !ids.contains(&game.id) {
            ids.push(game.id.clone());
        }
    }

    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(json: &str) -> WeekDoc {
        serde_json::from_str(json).expect("week document should parse")
    }

    #[test]
    fn full_document_maps_to_schedule() {
        let schedule = map_week(doc(
            r#"{
                "week": "10",
                "deadline": "2025-11-09T18:00:00Z",
                "games": [
                    {"id": "g1", "away": "Jets", "home": "Bills", "date": "Nov 9", "time": "1:00 PM"},
                    {"id": "g2", "away": "Lions", "home": "Bears"}
                ],
                "tiebreakers": ["g2", "g1"]
            }"#,
        ));
        assert_eq!(schedule.week, "10");
        assert!(schedule.deadline.is_some());
        assert_eq!(schedule.games.len(), 2);
        assert_eq!(schedule.games[0].date.as_deref(), Some("Nov 9"));
        assert_eq!(schedule.games[1].time, None);
        assert_eq!(schedule.find_game("g2").unwrap().home, "Bears");
    }

    #[test]
    fn missing_tiebreakers_field_designates_first_three_games() {
        let schedule = map_week(doc(
            r#"{
                "week": "3",
                "games": [
                    {"id": "a", "away": "A1", "home": "A2"},
                    {"id": "b", "away": "B1", "home": "B2"},
                    {"id": "c", "away": "C1", "home": "C2"},
                    {"id": "d", "away": "D1", "home": "D2"}
                ]
            }"#,
        ));
        assert_eq!(schedule.tiebreaker_game_ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn short_tiebreaker_list_is_topped_up_with_earliest_unused_games() {
        let games = vec![
            Game { id: "a".into(), ..Default::default() },
            Game { id: "b".into(), ..Default::default() },
            Game { id: "c".into(), ..Default::default() },
            Game { id: "d".into(), ..Default::default() },
        ];
        let ids = resolve_tiebreaker_ids(vec!["c".into()], &games);
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn supplied_tiebreakers_are_deduplicated_and_capped_at_three() {
        let games = vec![
            Game { id: "a".into(), ..Default::default() },
            Game { id: "b".into(), ..Default::default() },
        ];
        let ids = resolve_tiebreaker_ids(
            vec!["b".into(), "b".into(), "a".into(), "x".into(), "y".into()],
            &games,
        );
        assert_eq!(ids, vec!["b", "a", "x"]);
    }

    #[test]
    fn fewer_than_three_games_binds_what_exists() {
        let games = vec![Game { id: "only".into(), ..Default::default() }];
        let ids = resolve_tiebreaker_ids(Vec::new(), &games);
        assert_eq!(ids, vec!["only"]);
    }

    #[test]
    fn unparseable_deadline_becomes_none() {
        let schedule = map_week(doc(
            r#"{"week": "1", "deadline": "next sunday", "games": []}"#,
        ));
        assert!(schedule.deadline.is_none());
    }

    #[test]
    fn games_without_ids_get_positional_ones() {
        let schedule = map_week(doc(
            r#"{"week": "1", "games": [{"away": "A", "home": "B"}, {"away": "C", "home": "D"}]}"#,
        ));
        assert_eq!(schedule.games[0].id, "game-1");
        assert_eq!(schedule.games[1].id, "game-2");
    }
}
