use crate::state::app_settings::AppSettings;
use crate::state::messages::{NetworkRequest, NetworkResponse};
use log::{debug, warn};
use pickem_api::SubmissionPayload;
use pickem_api::client::{ContestApi, Delivery};
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠸', '⠴', '⠦', '⠇'];
const SPINNER_TICK: Duration = Duration::from_millis(80);
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner: ' ' }
    }
}

/// Owns the HTTP client and processes requests one at a time; the UI hears
/// back over the response channel. While a request runs, a spawned ticker
/// streams spinner frames so the tab bar stays alive.
pub struct NetworkWorker {
    api: ContestApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    busy: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        settings: &AppSettings,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            api: ContestApi::new(
                settings.week_source.clone(),
                settings.submit_url.clone(),
                settings.fallback_to.clone(),
            ),
            requests,
            responses,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.spin_up();

            let response = match request {
                NetworkRequest::LoadWeek => {
                    debug!("loading week document");
                    match self.api.fetch_week().await {
                        Ok(schedule) => NetworkResponse::WeekLoaded { schedule },
                        Err(err) => NetworkResponse::LoadFailed { message: err.to_string() },
                    }
                }
                NetworkRequest::SubmitPicks { payload, email } => {
                    self.submit(payload, email).await
                }
            };

            let ok = !matches!(response, NetworkResponse::LoadFailed { .. });
            self.spin_down(ok).await;

            if self.responses.send(response).await.is_err() {
                break;
            }
        }
    }

    /// Dual-channel submit. Never an error: a failed POST degrades to the
    /// mail-compose fallback, whose own delivery cannot be observed.
    async fn submit(&self, payload: SubmissionPayload, email: String) -> NetworkResponse {
        debug!("submitting picks");
        let delivery = self.api.deliver(&payload, &email).await;

        let mut composer_opened = false;
        if let Delivery::MailFallback { mailto, remote_error } = &delivery {
            if let Some(err) = remote_error {
                warn!("remote submission failed, using mail fallback: {err}");
            }
            match open_mail_compose(mailto) {
                Ok(()) => composer_opened = true,
                Err(err) => warn!("could not open a mail compose window: {err}"),
            }
        }

        NetworkResponse::SubmitFinished { delivery, composer_opened }
    }

    fn spin_up(&self) {
        self.busy.store(true, Ordering::Relaxed);

        let responses = self.responses.clone();
        let busy = self.busy.clone();
        tokio::spawn(async move {
            let mut ticks = tokio::time::interval(SPINNER_TICK);
            let mut frame = 0usize;
            while busy.load(Ordering::Relaxed) {
                let loading_state =
                    LoadingState { is_loading: true, spinner: SPINNER_FRAMES[frame] };
                if responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await
                    .is_err()
                {
                    break;
                }
                frame = (frame + 1) % SPINNER_FRAMES.len();
                ticks.tick().await;
            }
        });
    }

    async fn spin_down(&self, ok: bool) {
        self.busy.store(false, Ordering::Relaxed);
        // One tick of slack so the ticker sees the flag before the final
        // frame goes out.
        tokio::time::sleep(SPINNER_TICK).await;

        let loading_state =
            LoadingState { is_loading: false, spinner: if ok { ' ' } else { ERROR_CHAR } };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;
    }
}

/// Best-effort launch of the platform opener on the compose URI. Whether a
/// mail was actually sent is outside this program's knowledge.
fn open_mail_compose(uri: &str) -> std::io::Result<()> {
    let status = opener_command(uri)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;
    if status.success() {
        Ok(())
    } else {
        Err(std::io::Error::other(format!("opener exited with {status}")))
    }
}

#[cfg(target_os = "macos")]
fn opener_command(uri: &str) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(uri);
    cmd
}

#[cfg(target_os = "windows")]
fn opener_command(uri: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", "", uri]);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener_command(uri: &str) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(uri);
    cmd
}
