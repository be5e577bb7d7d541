use crate::error::TrackerError;
use crate::github::types::RepoMetadata;
use crossterm::event::KeyEvent;

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    AddFinished(Result<RepoMetadata, TrackerError>),
}
