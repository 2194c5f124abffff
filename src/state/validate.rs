use pickem_api::{Pick, TIEBREAKER_COUNT, TiebreakerEntry, WeekSchedule};
use std::collections::{BTreeMap, HashMap};

/// A field of the sheet that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    Name,
    Email,
    Week,
    Picks,
    Tiebreakers,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Week => "week",
            Field::Picks => "picks",
            Field::Tiebreakers => "tiebreakers",
        }
    }
}

/// Validate the whole sheet. Pure: recomputed from current state after every
/// edit. Every rule is evaluated on every call; an empty map means the sheet
/// can be submitted. Validation never blocks editing.
pub fn validate(
    name: &str,
    email: &str,
    schedule: Option<&WeekSchedule>,
    picks: &HashMap<String, Pick>,
    tiebreakers: &[TiebreakerEntry],
) -> BTreeMap<Field, String> {
    let mut errors = BTreeMap::new();

    if name.trim().is_empty() {
        errors.insert(Field::Name, "Please enter your name.".to_owned());
    }

    if !looks_like_email(email) {
        errors.insert(Field::Email, "Please enter a valid email address.".to_owned());
    }

    let games = schedule.map(|s| s.games.as_slice()).unwrap_or_default();
    if games.is_empty() {
        errors.insert(Field::Week, "No games are loaded for this week.".to_owned());
    }

    if games.iter().any(|g| !picks.contains_key(&g.id)) {
        errors.insert(
            Field::Picks,
            format!("Pick a winner for all {} games.", games.len()),
        );
    }

    let tiebreakers_complete = tiebreakers.len() == TIEBREAKER_COUNT
        && tiebreakers.iter().all(TiebreakerEntry::is_complete);
    if !tiebreakers_complete {
        errors.insert(
            Field::Tiebreakers,
            "Enter a predicted total for all three tiebreaker games.".to_owned(),
        );
    }

    errors
}

/// Loose syntactic check, deliberately not RFC-compliant: some run of
/// non-whitespace containing "@" then later "." with material around each.
fn looks_like_email(value: &str) -> bool {
    value.split_whitespace().any(|token| {
        let Some(at) = token.find('@') else {
            return false;
        };
        let (local, rest) = token.split_at(at);
        let domain = &rest[1..];
        let Some(dot) = domain.rfind('.') else {
            return false;
        };
        !local.is_empty() && dot > 0 && dot + 1 < domain.len()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pickem_api::Game;

    fn schedule(game_ids: &[&str]) -> WeekSchedule {
        WeekSchedule {
            week: "10".into(),
            games: game_ids
                .iter()
                .map(|id| Game { id: (*id).into(), away: "A".into(), home: "B".into(), ..Default::default() })
                .collect(),
            tiebreaker_game_ids: game_ids.iter().take(3).map(|id| (*id).into()).collect(),
            ..Default::default()
        }
    }

    fn complete_tiebreakers() -> Vec<TiebreakerEntry> {
        ["g1", "g2", "g3"]
            .iter()
            .map(|id| TiebreakerEntry { game_id: (*id).into(), total: "40".into() })
            .collect()
    }

    fn all_picked(ids: &[&str]) -> HashMap<String, Pick> {
        ids.iter().map(|id| ((*id).into(), Pick::Home)).collect()
    }

    #[test]
    fn empty_name_is_the_only_error_on_an_otherwise_complete_sheet() {
        let s = schedule(&["g1", "g2", "g3", "g4"]);
        // g4 left unpicked on purpose.
        let picks = all_picked(&["g1", "g2", "g3"]);
        let errors = validate("", "a@b.c", Some(&s), &picks, &complete_tiebreakers());
        assert_eq!(
            errors.keys().copied().collect::<Vec<_>>(),
            vec![Field::Name, Field::Picks]
        );

        // With every game picked, only the name error remains.
        let errors = validate(
            "",
            "a@b.c",
            Some(&s),
            &all_picked(&["g1", "g2", "g3", "g4"]),
            &complete_tiebreakers(),
        );
        assert_eq!(errors.keys().copied().collect::<Vec<_>>(), vec![Field::Name]);
    }

    #[test]
    fn complete_sheet_validates_clean() {
        let s = schedule(&["g1", "g2", "g3"]);
        let errors = validate(
            "Jane",
            "a@b.c",
            Some(&s),
            &all_picked(&["g1", "g2", "g3"]),
            &complete_tiebreakers(),
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn whitespace_only_name_fails() {
        let s = schedule(&["g1"]);
        let errors = validate("   ", "a@b.c", Some(&s), &all_picked(&["g1"]), &complete_tiebreakers());
        assert!(errors.contains_key(&Field::Name));
    }

    #[test]
    fn email_check_is_loose_but_wants_at_and_dot() {
        assert!(looks_like_email("a@b.c"));
        assert!(looks_like_email("first.last@mail.example.com"));
        assert!(!looks_like_email("plainaddress"));
        assert!(!looks_like_email("missing@dot"));
        assert!(!looks_like_email("@example.com"));
        assert!(!looks_like_email("user@.com"));
        assert!(!looks_like_email("user@domain."));
        assert!(!looks_like_email(""));
    }

    #[test]
    fn missing_schedule_reports_week_error_without_picks_error() {
        let errors = validate("Jane", "a@b.c", None, &HashMap::new(), &complete_tiebreakers());
        assert!(errors.contains_key(&Field::Week));
        assert!(!errors.contains_key(&Field::Picks));
    }

    #[test]
    fn picks_error_reports_total_game_count() {
        let s = schedule(&["g1", "g2", "g3", "g4", "g5"]);
        let errors = validate("Jane", "a@b.c", Some(&s), &all_picked(&["g1"]), &complete_tiebreakers());
        assert_eq!(errors.get(&Field::Picks).unwrap(), "Pick a winner for all 5 games.");
    }

    #[test]
    fn tiebreakers_require_exactly_three_complete_entries() {
        let s = schedule(&["g1", "g2", "g3"]);
        let picks = all_picked(&["g1", "g2", "g3"]);

        let mut short = complete_tiebreakers();
        short.pop();
        assert!(validate("J", "a@b.c", Some(&s), &picks, &short).contains_key(&Field::Tiebreakers));

        let mut blank_total = complete_tiebreakers();
        blank_total[1].total.clear();
        assert!(
            validate("J", "a@b.c", Some(&s), &picks, &blank_total)
                .contains_key(&Field::Tiebreakers)
        );

        assert!(
            !validate("J", "a@b.c", Some(&s), &picks, &complete_tiebreakers())
                .contains_key(&Field::Tiebreakers)
        );
    }
}
