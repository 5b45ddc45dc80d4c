use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use nba_dfs_api::GameDate;
use nba_dfs_api::slate::{Slate, SlateProgress};

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    LoadSlate { date: GameDate },
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    /// One more box score processed for the slate being loaded.
    SlateProgress { progress: SlateProgress },
    SlateLoaded { slate: Slate },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
