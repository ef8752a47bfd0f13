use std::sync::Arc;
use std::time::Duration;

use parley_config::SettingsPatch;
use parley_types::{Message, MessageId};
use tokio::sync::Notify;
use tokio::time::timeout;

use super::support::{Scripted, harness, harness_with_storage};

#[tokio::test]
async fn test_second_call_is_served_from_cache() {
    let provider = Scripted::replying("a", "hola a todos");
    let h = harness(&[provider.clone()], "es");
    let message = Message::chat("m1", "hello everyone");

    let first = h.orchestrator.translate(&message).await;
    let second = h.orchestrator.translate(&message).await;

    assert_eq!(first.as_deref(), Some("hola a todos"));
    assert_eq!(second, first);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_cache_hit_ignores_case_and_message_id() {
    let provider = Scripted::replying("a", "hola");
    let h = harness(&[provider.clone()], "es");

    h.orchestrator.translate(&Message::chat("m1", "Hello")).await;
    let other = h.orchestrator.translate(&Message::chat("m2", "  hello ")).await;

    assert_eq!(other.as_deref(), Some("hola"));
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_exhausted_chain_is_cached_as_negative() {
    let a = Scripted::failing("a");
    let b = Scripted::failing("b");
    let c = Scripted::failing("c");
    let book = Scripted::failing("book");
    let h = harness(&[a.clone(), b.clone(), c.clone(), book.clone()], "es");
    let message = Message::chat("m1", "hello everyone");

    assert_eq!(h.orchestrator.translate(&message).await, None);
    assert_eq!(h.orchestrator.translate(&message).await, None);

    for provider in [&a, &b, &c, &book] {
        assert_eq!(provider.calls(), 1);
    }

    let entry = h.cache.get("hello everyone", "es").unwrap();
    assert!(entry.is_negative());
    assert_eq!(entry.detected_language, "en");
}

#[tokio::test]
async fn test_concurrent_duplicate_returns_none_without_waiting() {
    let gate = Arc::new(Notify::new());
    let provider = Scripted::gated("a", "buenas noches a todos", gate.clone());
    let h = harness(&[provider.clone()], "es");
    let message = Message::chat("m1", "good evening everyone");

    let first = {
        let orchestrator = h.orchestrator.clone();
        let message = message.clone();
        tokio::spawn(async move { orchestrator.translate(&message).await })
    };

    while h.orchestrator.in_flight() == 0 {
        tokio::task::yield_now().await;
    }

    let second = timeout(Duration::from_millis(200), h.orchestrator.translate(&message))
        .await
        .expect("duplicate call must not wait for the in-flight attempt");
    assert_eq!(second, None);

    gate.notify_one();
    let first = first.await.unwrap();

    assert_eq!(first.as_deref(), Some("buenas noches a todos"));
    assert_eq!(provider.calls(), 1);
    assert_eq!(h.orchestrator.in_flight(), 0);

    // the caller re-observes the cache once the first attempt has landed
    assert_eq!(
        h.orchestrator.translate(&message).await.as_deref(),
        Some("buenas noches a todos")
    );
}

#[tokio::test]
async fn test_guard_released_after_exhaustion() {
    let provider = Scripted::failing("a");
    let h = harness(&[provider], "es");

    h.orchestrator
        .translate(&Message::chat("m1", "hello everyone"))
        .await;

    assert_eq!(h.orchestrator.in_flight(), 0);
}

#[tokio::test]
async fn test_language_change_triggers_fresh_walk() {
    let provider = Scripted::replying("a", "traduction");
    let h = harness(&[provider.clone()], "es");
    let message = Message::chat("m1", "hello everyone");

    h.orchestrator.translate(&message).await;
    assert!(h.cache.get("hello everyone", "es").is_some());

    h.settings
        .set(SettingsPatch::target_language("fr"))
        .unwrap();

    assert!(h.cache.get("hello everyone", "es").is_none());

    let again = h.orchestrator.translate(&message).await;
    assert_eq!(again.as_deref(), Some("traduction"));
    assert_eq!(provider.calls(), 2);
    assert_eq!(h.cache.get("hello everyone", "fr").unwrap().target_language, "fr");
}

#[tokio::test]
async fn test_fallback_order_stops_before_phrasebook() {
    let a = Scripted::failing("a");
    let b = Scripted::failing("b");
    let c = Scripted::replying("c", "bonjour");
    let book = Scripted::replying("book", "salut");
    let h = harness(&[a.clone(), b.clone(), c.clone(), book.clone()], "fr");

    let result = h
        .orchestrator
        .translate(&Message::chat("m1", "hello there friend"))
        .await;

    assert_eq!(result.as_deref(), Some("bonjour"));
    assert_eq!((a.calls(), b.calls(), c.calls()), (1, 1, 1));
    assert_eq!(book.calls(), 0);
}

#[tokio::test]
async fn test_text_already_in_target_language() {
    let provider = Scripted::replying("a", "hello");
    let h = harness(&[provider.clone()], "es");

    let result = h.orchestrator.translate(&Message::chat("m1", "hola")).await;

    assert_eq!(result, None);
    assert_eq!(provider.calls(), 0);
    assert!(h.cache.get("hola", "es").unwrap().is_negative());
}

#[tokio::test]
async fn test_unknown_language_uses_default_source() {
    let provider = Scripted::replying("a", "traducido");
    let h = harness(&[provider.clone()], "es");

    let result = h.orchestrator.translate(&Message::chat("m1", "zzq blorp")).await;

    assert_eq!(result.as_deref(), Some("traducido"));
    assert_eq!(provider.last_from().as_deref(), Some("en"));
    assert_eq!(h.cache.get("zzq blorp", "es").unwrap().detected_language, "unknown");
}

#[tokio::test]
async fn test_ineligible_messages_touch_nothing() {
    let provider = Scripted::replying("a", "x");
    let h = harness(&[provider.clone()], "es");

    let system = Message::chat("s", "user joined the room").with_kind("system");
    let gift = Message::chat("g", "sent a rose").with_kind("gift");
    let blank = Message::chat("b", "   ");
    let outgoing = Message::chat("o", "hello everyone").outgoing();

    for message in [&system, &gift, &blank, &outgoing] {
        assert_eq!(h.orchestrator.translate(message).await, None);
    }

    h.settings
        .set(SettingsPatch {
            enabled: Some(false),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(
        h.orchestrator.translate(&Message::chat("m", "hello everyone")).await,
        None
    );

    assert_eq!(provider.calls(), 0);
    assert!(h.cache.is_empty());
}

#[tokio::test]
async fn test_outgoing_translated_when_enabled() {
    let provider = Scripted::replying("a", "hola a todos");
    let h = harness(&[provider.clone()], "es");
    h.settings
        .set(SettingsPatch {
            translate_outgoing: Some(true),
            ..Default::default()
        })
        .unwrap();

    let result = h
        .orchestrator
        .translate(&Message::chat("o", "hello everyone").outgoing())
        .await;

    assert_eq!(result.as_deref(), Some("hola a todos"));
}

#[tokio::test]
async fn test_result_landing_after_language_switch_is_redone_for_new_target() {
    let gate = Arc::new(Notify::new());
    let provider = Scripted::gated("a", "traduction", gate.clone());
    let h = harness(&[provider.clone()], "es");
    let message = Message::chat("m1", "hello everyone");

    let pending = {
        let orchestrator = h.orchestrator.clone();
        let message = message.clone();
        tokio::spawn(async move { orchestrator.translate(&message).await })
    };

    while h.orchestrator.in_flight() == 0 {
        tokio::task::yield_now().await;
    }

    h.settings
        .set(SettingsPatch::target_language("fr"))
        .unwrap();

    // re-submission under the new target while the old attempt is running
    let rerun = h.orchestrator.translate_all(std::slice::from_ref(&message)).await;
    assert_eq!(rerun, vec![(MessageId::from("m1"), None)]);

    gate.notify_one();

    let late = timeout(Duration::from_secs(1), pending)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(late.as_deref(), Some("traduction"));
    assert_eq!(provider.calls(), 2);
    assert_eq!(provider.last_to().as_deref(), Some("fr"));
    assert!(h.cache.get("hello everyone", "es").is_none());
    assert_eq!(
        h.cache.get("hello everyone", "fr").unwrap().translated_text.as_deref(),
        Some("traduction")
    );
    assert_eq!(h.orchestrator.in_flight(), 0);
}

#[tokio::test]
async fn test_retry_after_switch_reuses_entry_stored_meanwhile() {
    let gate = Arc::new(Notify::new());
    let provider = Scripted::gated("a", "bonjour", gate.clone());
    let h = harness(&[provider.clone()], "es");

    let first = {
        let orchestrator = h.orchestrator.clone();
        tokio::spawn(async move {
            orchestrator
                .translate(&Message::chat("m1", "hello everyone"))
                .await
        })
    };

    while h.orchestrator.in_flight() == 0 {
        tokio::task::yield_now().await;
    }

    h.settings
        .set(SettingsPatch::target_language("fr"))
        .unwrap();

    let same_text = h
        .orchestrator
        .translate(&Message::chat("m2", "hello everyone"))
        .await;
    assert_eq!(same_text.as_deref(), Some("bonjour"));

    gate.notify_one();

    assert_eq!(first.await.unwrap().as_deref(), Some("bonjour"));
    // the held attempt re-checks the cache instead of walking the chain again
    assert_eq!(provider.calls(), 2);
    assert_eq!(h.cache.len(), 1);
}

#[tokio::test]
async fn test_attempt_abandoned_when_disabled_mid_flight() {
    let gate = Arc::new(Notify::new());
    let provider = Scripted::gated("a", "hola a todos", gate.clone());
    let h = harness(&[provider.clone()], "es");

    let pending = {
        let orchestrator = h.orchestrator.clone();
        tokio::spawn(async move {
            orchestrator
                .translate(&Message::chat("m1", "hello everyone"))
                .await
        })
    };

    while h.orchestrator.in_flight() == 0 {
        tokio::task::yield_now().await;
    }

    // clearing bumps the epoch the same way a language switch does
    h.orchestrator.clear_cache().unwrap();
    h.settings
        .set(SettingsPatch {
            enabled: Some(false),
            ..Default::default()
        })
        .unwrap();
    gate.notify_one();

    assert_eq!(pending.await.unwrap(), None);
    assert_eq!(provider.calls(), 1);
    assert!(h.cache.is_empty());
    assert_eq!(h.orchestrator.in_flight(), 0);
}

#[tokio::test]
async fn test_cache_survives_restart() {
    let provider = Scripted::replying("a", "hola a todos");
    let h = harness(&[provider.clone()], "es");
    let message = Message::chat("m1", "hello everyone");
    h.orchestrator.translate(&message).await;

    let restarted = harness_with_storage(&[provider.clone()], "es", h.storage.clone());
    let result = restarted.orchestrator.translate(&message).await;

    assert_eq!(result.as_deref(), Some("hola a todos"));
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_manual_clear_allows_retry() {
    let provider = Scripted::failing("a");
    let h = harness(&[provider.clone()], "es");
    let message = Message::chat("m1", "hello everyone");

    h.orchestrator.translate(&message).await;
    h.orchestrator.clear_cache().unwrap();
    h.orchestrator.translate(&message).await;

    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn test_translate_all_keeps_order() {
    let provider = Scripted::replying("a", "hola");
    let h = harness(&[provider], "es");
    let messages = vec![
        Message::chat("1", "hello"),
        Message::chat("2", "joined").with_kind("system"),
        Message::chat("3", "hola"),
    ];

    let results = h.orchestrator.translate_all(&messages).await;

    assert_eq!(
        results,
        vec![
            (MessageId::from("1"), Some("hola".to_string())),
            (MessageId::from("2"), None),
            (MessageId::from("3"), None),
        ]
    );
}

#[tokio::test]
async fn test_translate_text_without_message() {
    let provider = Scripted::replying("a", "hola a todos");
    let h = harness(&[provider], "es");

    let result = h
        .orchestrator
        .translate_text(&MessageId::from("draft"), "hello everyone")
        .await;

    assert_eq!(result.as_deref(), Some("hola a todos"));
}

#[tokio::test]
async fn test_render_follows_display_mode() {
    let h = harness(&[], "es");
    let message = Message::chat("m1", "hello");

    assert_eq!(h.orchestrator.render(&message, Some("hola")), "hello\nhola");
    assert_eq!(h.orchestrator.render(&message, None), "hello");

    h.settings
        .set(SettingsPatch {
            show_only_translation: Some(true),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(h.orchestrator.render(&message, Some("hola")), "hola");
}
