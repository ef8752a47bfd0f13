use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use parley_config::SettingsPatch;
use parley_types::{Message, MessageId};
use serde::Serialize;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

#[derive(Debug, Clone)]
pub enum AppEvent {
    Incoming(Message),
    UpdateSettings(SettingsPatch),
    ClearCache,
    ShowStats,
}

/// Lines written to stdout
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutputEvent {
    Display {
        id: MessageId,
        display: String,
        translation: Option<String>,
    },
    Notice {
        message: String,
    },
}

/// App's main loop. Returns once input is exhausted and every pending
/// translation has been delivered.
pub async fn event_loop(
    state: Arc<AppState>,
    input_rx: AsyncReceiver<AppEvent>,
    output_tx: AsyncSender<OutputEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let mut pending = JoinSet::new();

    tracing::info!("[EVENT_LOOP] Starting main loop, waiting for events");
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = input_rx.recv() => match event {
                Ok(event) => event,
                Err(_) => {
                    tracing::debug!("[EVENT_LOOP] input closed");
                    break;
                }
            },
        };

        handle_event(&state, &output_tx, &mut pending, event).await?;

        // reap finished translations
        while let Some(result) = pending.try_join_next() {
            if let Err(e) = result {
                tracing::error!("translation task panicked: {e}");
            }
        }
    }

    while let Some(result) = pending.join_next().await {
        if let Err(e) = result {
            tracing::error!("translation task panicked: {e}");
        }
    }

    cancel.cancel();
    Ok(())
}

async fn handle_event(
    state: &Arc<AppState>,
    output_tx: &AsyncSender<OutputEvent>,
    pending: &mut JoinSet<()>,
    event: AppEvent,
) -> anyhow::Result<()> {
    match event {
        AppEvent::Incoming(message) => {
            let window = state.config.read().await.visible_window;
            state.remember(message.clone(), window).await;

            let state = state.clone();
            let output_tx = output_tx.clone();
            // each message translates independently of the others
            pending.spawn(async move {
                let translation = state.orchestrator.translate(&message).await;
                send_display(&state, &output_tx, &message, translation).await;
            });
        }
        AppEvent::UpdateSettings(patch) => {
            let notice = match state.orchestrator.update_settings(patch) {
                Ok(Some(change)) => format!(
                    "settings updated: target={} enabled={}",
                    change.current.target_language, change.current.enabled
                ),
                Ok(None) => "settings unchanged".to_string(),
                Err(e) => {
                    tracing::warn!("settings update rejected: {e}");
                    format!("settings update rejected: {e}")
                }
            };
            notify(output_tx, notice).await?;
        }
        AppEvent::ClearCache => {
            let notice = match state.orchestrator.clear_cache() {
                Ok(()) => "cache cleared".to_string(),
                Err(e) => format!("cache cleared in memory only: {e}"),
            };
            notify(output_tx, notice).await?;
        }
        AppEvent::ShowStats => {
            let stats = state.orchestrator.cache_stats();
            notify(
                output_tx,
                format!(
                    "cache entries={} negative={} in_flight={}",
                    stats.entries,
                    stats.negative,
                    state.orchestrator.in_flight()
                ),
            )
            .await?;
        }
    }

    Ok(())
}

/// Re-submit visible messages whenever a settings change calls for it
pub async fn settings_watcher(
    state: Arc<AppState>,
    output_tx: AsyncSender<OutputEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let changes = state.orchestrator.subscribe();

    loop {
        let change = tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            change = changes.recv() => change?,
        };

        if !change.requires_retranslation() {
            continue;
        }

        let visible = state.visible_snapshot().await;
        tracing::info!(
            "Re-translating {} visible messages into {}",
            visible.len(),
            change.current.target_language
        );

        for (message, (_, translation)) in visible
            .iter()
            .zip(state.orchestrator.translate_all(&visible).await)
        {
            send_display(&state, &output_tx, message, translation).await;
        }
    }
}

/// Print output events as JSON lines
pub async fn output_loop(output_rx: AsyncReceiver<OutputEvent>) -> anyhow::Result<()> {
    while let Ok(event) = output_rx.recv().await {
        println!("{}", serde_json::to_string(&event)?);
    }

    Ok(())
}

async fn send_display(
    state: &AppState,
    output_tx: &AsyncSender<OutputEvent>,
    message: &Message,
    translation: Option<String>,
) {
    let event = OutputEvent::Display {
        id: message.id.clone(),
        display: state.orchestrator.render(message, translation.as_deref()),
        translation,
    };

    if let Err(e) = output_tx.send(event).await {
        tracing::error!("Failed to send display event: {}", e);
    }
}

async fn notify(output_tx: &AsyncSender<OutputEvent>, message: String) -> anyhow::Result<()> {
    output_tx.send(OutputEvent::Notice { message }).await?;
    Ok(())
}
