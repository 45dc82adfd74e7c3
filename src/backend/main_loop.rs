use crossbeam_channel::{Receiver, Sender, TryRecvError};
use reqwest::Client;
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio::time::{interval, sleep, timeout, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::OverlayConfig;
use crate::errors::OverlayError;
use crate::message::ChatMessage;
use crate::protocol::{BackendAction, GuiEvent};

use super::fetch;

/// How often UI actions are checked while waiting for the next tick
const ACTION_CHECK_INTERVAL: Duration = Duration::from_millis(25);

/// What ended a wait between poll cycles
enum Wake {
    Tick,
    PollNow,
    Stop,
}

/// One poll cycle: fetch the history, bounded by the request timeout.
pub async fn poll_once(client: &Client, config: &OverlayConfig) -> Result<Vec<ChatMessage>, OverlayError> {
    let request = fetch::fetch_history(client, &config.endpoint, config.response_shape);
    match timeout(config.request_timeout(), request).await {
        Ok(result) => result,
        Err(_) => Err(OverlayError::Timeout {
            timeout_ms: config.request_timeout_ms,
        }),
    }
}

/// Drain pending UI actions. Returns the strongest request seen.
fn drain_actions(action_rx: &Receiver<BackendAction>, shutdown: &CancellationToken) -> Option<Wake> {
    let mut wake = None;
    loop {
        match action_rx.try_recv() {
            Ok(BackendAction::PollNow) => {
                wake.get_or_insert(Wake::PollNow);
            }
            Ok(BackendAction::Shutdown) => {
                shutdown.cancel();
                return Some(Wake::Stop);
            }
            Err(TryRecvError::Empty) => return wake,
            Err(TryRecvError::Disconnected) => {
                // The UI is gone
                shutdown.cancel();
                return Some(Wake::Stop);
            }
        }
    }
}

pub fn run_backend(
    config: OverlayConfig,
    action_rx: Receiver<BackendAction>,
    event_tx: Sender<GuiEvent>,
    shutdown: CancellationToken,
) {
    // Create a Tokio runtime for this thread
    let rt = match Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            let err = OverlayError::Runtime { reason: e.to_string() };
            error!(event = "overlay.backend.runtime_failed", error = %err);
            let _ = event_tx.send(GuiEvent::PollFailed(err.to_string()));
            let _ = event_tx.send(GuiEvent::Stopped);
            return;
        }
    };

    rt.block_on(async move {
        let client = match fetch::build_client() {
            Ok(client) => client,
            Err(e) => {
                error!(event = "overlay.backend.client_failed", error = %e);
                let _ = event_tx.send(GuiEvent::PollFailed(e.to_string()));
                let _ = event_tx.send(GuiEvent::Stopped);
                return;
            }
        };

        info!(
            event = "overlay.backend.started",
            endpoint = %config.endpoint,
            poll_interval_ms = config.poll_interval_ms,
        );

        // First tick completes immediately. A slow fetch delays the schedule
        // instead of queueing a burst of catch-up polls.
        let mut ticker = interval(config.poll_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut consecutive_failures: u32 = 0;

        loop {
            let wake = loop {
                if let Some(wake) = drain_actions(&action_rx, &shutdown) {
                    break wake;
                }
                tokio::select! {
                    _ = shutdown.cancelled() => break Wake::Stop,
                    _ = ticker.tick() => break Wake::Tick,
                    _ = sleep(ACTION_CHECK_INTERVAL) => {}
                }
            };

            match wake {
                Wake::Stop => break,
                Wake::PollNow => {
                    debug!(event = "overlay.poll.requested");
                    ticker.reset();
                }
                Wake::Tick => {}
            }

            // The cycle finishes (or times out) before the next one is scheduled
            let result = tokio::select! {
                _ = shutdown.cancelled() => break,
                result = poll_once(&client, &config) => result,
            };

            match result {
                Ok(history) => {
                    if consecutive_failures > 0 {
                        info!(
                            event = "overlay.poll.recovered",
                            failed_cycles = consecutive_failures,
                        );
                        consecutive_failures = 0;
                    }
                    debug!(event = "overlay.poll.completed", history_len = history.len());
                    if event_tx.send(GuiEvent::History(history)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    consecutive_failures += 1;
                    if consecutive_failures == 1 {
                        warn!(event = "overlay.poll.failed", error = %e);
                    } else {
                        debug!(
                            event = "overlay.poll.failed",
                            error = %e,
                            consecutive_failures = consecutive_failures,
                        );
                    }
                    if event_tx.send(GuiEvent::PollFailed(e.to_string())).is_err() {
                        break;
                    }
                }
            }
        }

        info!(event = "overlay.backend.stopped");
        let _ = event_tx.send(GuiEvent::Stopped);
    });
}
