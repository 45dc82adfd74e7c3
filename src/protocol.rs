use crate::message::ChatMessage;

/// Actions sent from the UI to the Backend
#[derive(Debug, Clone)]
pub enum BackendAction {
    /// Run a poll cycle now instead of waiting for the next tick
    PollNow,
    /// Stop polling and let the backend thread exit
    Shutdown,
}

/// Events sent from the Backend to the UI
#[derive(Debug, Clone)]
pub enum GuiEvent {
    /// The full chat history returned by one successful poll
    History(Vec<ChatMessage>),
    /// A poll cycle failed; polling continues
    PollFailed(String),
    /// The polling loop has exited
    Stopped,
}
