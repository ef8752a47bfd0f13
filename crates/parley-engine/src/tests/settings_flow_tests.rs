use std::time::Duration;

use parley_config::SettingsPatch;
use parley_types::Message;
use tokio::time::timeout;

use super::support::{Scripted, harness};

#[tokio::test]
async fn test_subscriber_retranslates_visible_messages() {
    let provider = Scripted::replying("a", "translated");
    let h = harness(&[provider.clone()], "es");
    let visible = vec![
        Message::chat("1", "hello everyone"),
        Message::chat("2", "good evening friend"),
    ];

    h.orchestrator.translate_all(&visible).await;
    assert_eq!(provider.calls(), 2);

    let changes = h.orchestrator.subscribe();
    h.orchestrator
        .update_settings(SettingsPatch::target_language("de"))
        .unwrap();

    let change = timeout(Duration::from_secs(1), changes.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(change.requires_retranslation());

    let results = h.orchestrator.translate_all(&visible).await;

    assert!(results.iter().all(|(_, text)| text.as_deref() == Some("translated")));
    assert_eq!(provider.calls(), 4);
    assert_eq!(h.orchestrator.cache_stats().entries, 2);
}

#[tokio::test]
async fn test_display_only_change_does_not_require_retranslation() {
    let h = harness(&[], "es");
    let changes = h.orchestrator.subscribe();

    h.orchestrator
        .update_settings(SettingsPatch {
            show_original: Some(false),
            ..Default::default()
        })
        .unwrap();

    let change = changes.recv().await.unwrap();
    assert!(!change.requires_retranslation());
    assert!(!h.orchestrator.settings().show_original);
}

#[tokio::test]
async fn test_reenabling_requires_retranslation() {
    let h = harness(&[], "es");
    let changes = h.orchestrator.subscribe();

    let disable = SettingsPatch {
        enabled: Some(false),
        ..Default::default()
    };
    let enable = SettingsPatch {
        enabled: Some(true),
        ..Default::default()
    };
    h.orchestrator.update_settings(disable).unwrap();
    h.orchestrator.update_settings(enable).unwrap();

    assert!(!changes.recv().await.unwrap().requires_retranslation());
    assert!(changes.recv().await.unwrap().requires_retranslation());
}
