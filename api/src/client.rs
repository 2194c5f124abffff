use crate::wire::{self, WeekDoc};
use crate::{SubmissionPayload, WeekSchedule, mailto};
use reqwest::Client;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

/// Default week-document source; overridable via `PICKSHEET_WEEK_URL`.
pub const DEFAULT_WEEK_SOURCE: &str = "week.json";
/// Fixed fallback recipient for the mail-compose path.
pub const DEFAULT_FALLBACK_TO: &str = "pickem.commissioner@gmail.com";

/// Contest API client: week-document fetch plus dual-channel submission.
#[derive(Debug, Clone)]
pub struct ContestApi {
    client: Client,
    timeout: Duration,
    week_source: String,
    submit_url: Option<String>,
    fallback_to: String,
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(serde_json::Error, String),
    NotFound(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, source) => write!(f, "Network error for {source}: {e}"),
            ApiError::Api(e, source) => write!(f, "API error for {source}: {e}"),
            ApiError::Parsing(e, source) => write!(f, "Invalid week document at {source}: {e}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
        }
    }
}

/// Outcome of a submission attempt. There is no retry and no dedup: every
/// submit produces exactly one of these, and submitting twice produces two
/// independent delivery attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// The configured endpoint accepted the POST.
    Remote,
    /// The endpoint was absent or failed; the picks ride in a compose link.
    /// `remote_error` carries the POST failure for the caller to log.
    MailFallback {
        mailto: String,
        remote_error: Option<String>,
    },
}

impl ContestApi {
    pub fn new(week_source: String, submit_url: Option<String>, fallback_to: String) -> Self {
        Self {
            client: Client::builder()
                .user_agent("picksheet/0.1 (terminal picks sheet)")
                .build()
                .unwrap_or_default(),
            timeout: Duration::from_secs(10),
            week_source,
            submit_url,
            fallback_to,
        }
    }

    /// Fetch and map the week document. The source is either an `http(s)://`
    /// URL (fetched with no-cache headers) or a local file path. Any fetch,
    /// status or parse failure is terminal for the session; the caller shows
    /// a blocking error and offers no retry.
    pub async fn fetch_week(&self) -> ApiResult<WeekSchedule> {
        let text = if is_remote(&self.week_source) {
            let response = self
                .client
                .get(&self.week_source)
                .header("Cache-Control", "no-cache")
                .header("Pragma", "no-cache")
                .timeout(self.timeout)
                .send()
                .await
                .map_err(|e| ApiError::Network(e, self.week_source.clone()))?
                .error_for_status()
                .map_err(|e| ApiError::Api(e, self.week_source.clone()))?;
            response
                .text()
                .await
                .map_err(|e| ApiError::Network(e, self.week_source.clone()))?
        } else {
            std::fs::read_to_string(&self.week_source).map_err(|e| {
                ApiError::NotFound(format!("could not read {}: {e}", self.week_source))
            })?
        };

        let doc: WeekDoc = serde_json::from_str(&text)
            .map_err(|e| ApiError::Parsing(e, self.week_source.clone()))?;
        Ok(wire::map_week(doc))
    }

    /// Single POST of the payload (plus the submitter's raw email address)
    /// to the configured endpoint. Any non-2xx status is an error.
    pub async fn post_picks(
        &self,
        url: &str,
        payload: &SubmissionPayload,
        email: &str,
    ) -> ApiResult<()> {
        #[derive(serde::Serialize)]
        struct Body<'a> {
            #[serde(flatten)]
            payload: &'a SubmissionPayload,
            email: &'a str,
        }

        let response = self
            .client
            .post(url)
            .timeout(self.timeout)
            .json(&Body { payload, email })
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        response
            .error_for_status()
            .map(|_| ())
            .map_err(|e| ApiError::Api(e, url.to_owned()))
    }

    /// Dual-channel delivery: one remote attempt, then the compose link.
    /// Never fails; a missing or broken endpoint degrades to the fallback.
    pub async fn deliver(&self, payload: &SubmissionPayload, email: &str) -> Delivery {
        let remote_error = match &self.submit_url {
            Some(url) => match self.post_picks(url, payload, email).await {
                Ok(()) => return Delivery::Remote,
                Err(e) => Some(e.to_string()),
            },
            None => None,
        };

        let body = mailto::render_mail_body(payload);
        let uri = mailto::compose_uri(
            &self.fallback_to,
            Some(email),
            &payload.subject_line,
            &body,
        );
        Delivery::MailFallback { mailto: uri, remote_error }
    }
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
