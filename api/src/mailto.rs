//! Mail-compose fallback: renders the submission as a mail body and builds
//! the `mailto:` URI handed to the platform opener.

use crate::SubmissionPayload;
use std::fmt::Write as _;

/// Render the payload as the fallback mail body: a numbered picks section,
/// a blank line, then a numbered tiebreakers section.
pub fn render_mail_body(payload: &SubmissionPayload) -> String {
    let mut body = String::from("Picks:\n");
    for (n, line) in payload.pick_lines.iter().enumerate() {
        let _ = writeln!(body, "  {}. {}", n + 1, line);
    }
    body.push('\n');
    body.push_str("Tiebreakers (total points):\n");
    for (n, line) in payload.tiebreaker_lines.iter().enumerate() {
        let _ = writeln!(body, "  {}. {}", n + 1, line);
    }
    body
}

/// Build the compose URI. The user's own address rides along as a cc so they
/// keep a copy without a second compose window.
pub fn compose_uri(to: &str, cc: Option<&str>, subject: &str, body: &str) -> String {
    let mut uri = format!("mailto:{to}?");
    if let Some(cc) = cc.map(str::trim).filter(|cc| !cc.is_empty()) {
        let _ = write!(uri, "cc={}&", urlencoding::encode(cc));
    }
    let _ = write!(
        uri,
        "subject={}&body={}",
        urlencoding::encode(subject),
        urlencoding::encode(body)
    );
    uri
}
