use kanal::AsyncSender;
use parley_config::SettingsPatch;
use parley_types::Message;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

use crate::events::AppEvent;

/// Feed stdin lines to the event loop until EOF or cancellation
pub async fn watcher_io(
    cancel: CancellationToken,
    event_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.next_line() => line?,
        };

        let Some(line) = line else {
            tracing::info!("stdin closed");
            break;
        };

        if let Some(event) = parse_line(&line) {
            event_tx.send(event).await?;
        }
    }

    Ok(())
}

/// One input line: a JSON message, a `/command`, or plain chat text
pub fn parse_line(line: &str) -> Option<AppEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if let Some(command) = line.strip_prefix('/') {
        return parse_command(command);
    }

    if line.starts_with('{') {
        return match serde_json::from_str::<Message>(line) {
            Ok(mut message) => {
                if message.id.0.is_empty() {
                    message.id = new_id().into();
                }
                Some(AppEvent::Incoming(message))
            }
            Err(e) => {
                tracing::warn!("Ignoring malformed message line: {e}");
                None
            }
        };
    }

    Some(AppEvent::Incoming(Message::chat(new_id(), line)))
}

fn parse_command(command: &str) -> Option<AppEvent> {
    let mut parts = command.split_whitespace();
    let name = parts.next()?;
    let arg = parts.next();

    let event = match (name, arg) {
        ("lang", Some(lang)) => AppEvent::UpdateSettings(SettingsPatch::target_language(lang)),
        ("enable", None) => AppEvent::UpdateSettings(SettingsPatch {
            enabled: Some(true),
            ..Default::default()
        }),
        ("disable", None) => AppEvent::UpdateSettings(SettingsPatch {
            enabled: Some(false),
            ..Default::default()
        }),
        ("original", Some(flag)) => AppEvent::UpdateSettings(SettingsPatch {
            show_original: Some(parse_flag(flag)?),
            ..Default::default()
        }),
        ("only", Some(flag)) => AppEvent::UpdateSettings(SettingsPatch {
            show_only_translation: Some(parse_flag(flag)?),
            ..Default::default()
        }),
        ("outgoing", Some(flag)) => AppEvent::UpdateSettings(SettingsPatch {
            translate_outgoing: Some(parse_flag(flag)?),
            ..Default::default()
        }),
        ("clear", None) => AppEvent::ClearCache,
        ("stats", None) => AppEvent::ShowStats,
        _ => {
            tracing::warn!("Unknown command: /{command}");
            return None;
        }
    };

    Some(event)
}

fn parse_flag(flag: &str) -> Option<bool> {
    match flag {
        "on" | "true" | "1" => Some(true),
        "off" | "false" | "0" => Some(false),
        _ => None,
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
