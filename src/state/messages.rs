use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use pickem_api::client::Delivery;
use pickem_api::{SubmissionPayload, WeekSchedule};

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    LoadWeek,
    SubmitPicks { payload: SubmissionPayload, email: String },
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    WeekLoaded { schedule: WeekSchedule },
    /// Terminal for the session: the app shows a blocking error, no retry.
    LoadFailed { message: String },
    SubmitFinished { delivery: Delivery, composer_opened: bool },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
