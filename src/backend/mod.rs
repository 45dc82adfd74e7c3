/// Backend submodules for fetching and polling the chat history
///
/// - `fetch`: one HTTP request against the chat endpoint, decoded into messages
/// - `main_loop`: the sequential, cancellable polling loop on its own Tokio runtime
mod fetch;
mod main_loop;

// Re-export the main backend entry points
pub use fetch::{build_client, fetch_history};
pub use main_loop::{poll_once, run_backend};
