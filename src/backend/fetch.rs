use reqwest::Client;

use crate::errors::OverlayError;
use crate::message::{decode_history, ChatMessage, ResponseShape};

/// HTTP client shared by every poll cycle.
pub fn build_client() -> Result<Client, OverlayError> {
    let client = Client::builder()
        .user_agent(concat!("chat-overlay/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// `GET` the chat endpoint and decode the full history.
///
/// Any non-2xx status is an error; the body is not inspected in that case.
pub async fn fetch_history(
    client: &Client,
    endpoint: &str,
    shape: ResponseShape,
) -> Result<Vec<ChatMessage>, OverlayError> {
    let response = client.get(endpoint).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(OverlayError::Status {
            status: status.as_u16(),
        });
    }
    let body = response.bytes().await?;
    decode_history(&body, shape)
}
