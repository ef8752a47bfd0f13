use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::events::{AppEvent, OutputEvent, event_loop, output_loop, settings_watcher};
use crate::io::watcher_io;
use crate::state::AppState;

/// Centralized channel management
pub struct ChannelSet {
    pub input_to_app: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    pub app_to_output: (AsyncSender<OutputEvent>, AsyncReceiver<OutputEvent>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            input_to_app: kanal::bounded_async(256),  // chat burst capacity
            app_to_output: kanal::bounded_async(256),
        }
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Channels are moved into the tasks so each side closes when its
    /// producers finish.
    pub fn spawn_tasks(&self) -> JoinSet<anyhow::Result<()>> {
        let ChannelSet {
            input_to_app: (input_tx, input_rx),
            app_to_output: (output_tx, output_rx),
        } = ChannelSet::new();

        let mut tasks = JoinSet::new();

        // Event loop
        tasks.spawn(event_loop(
            self.state.clone(),
            input_rx,
            output_tx.clone(),
            self.cancel_token.clone(),
        ));

        // Re-translation on settings changes
        tasks.spawn(settings_watcher(
            self.state.clone(),
            output_tx,
            self.cancel_token.child_token(),
        ));

        // Stdout writer
        tasks.spawn(output_loop(output_rx));

        // Stdin watcher
        tasks.spawn(watcher_io(self.cancel_token.child_token(), input_tx));

        tasks
    }

    pub fn cancelled(&self) -> tokio_util::sync::WaitForCancellationFuture<'_> {
        self.cancel_token.cancelled()
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
