mod common;

use common::{GREETING, Script, ScriptedBackend, greeting_suggestions};
use datachat_application::Bootstrapper;
use datachat_core::DatachatError;
use datachat_core::backend::GreetResponse;
use datachat_core::suggestion::{DEFAULT_GREETING, default_suggestions};
use std::sync::Arc;
use std::time::Duration;

fn bootstrapper(script: Script) -> Bootstrapper {
    Bootstrapper::new(Arc::new(ScriptedBackend::new(script)), Duration::from_secs(5))
}

#[tokio::test]
async fn greeting_payload_is_used() {
    let report = bootstrapper(Script::default()).run().await;

    assert!(report.healthy);
    assert!(!report.used_fallback);
    assert_eq!(report.greeting, GREETING);
    assert_eq!(report.suggestions, greeting_suggestions());
    assert_eq!(
        report.settings.and_then(|s| s.download_path).as_deref(),
        Some("/tmp/downloads")
    );
}

#[tokio::test]
async fn failed_greeting_uses_builtin_content() {
    let report = bootstrapper(Script {
        greet: Err(DatachatError::transport("connection refused")),
        ..Default::default()
    })
    .run()
    .await;

    assert!(report.used_fallback);
    assert_eq!(report.greeting, DEFAULT_GREETING);
    assert_eq!(report.suggestions, default_suggestions());
}

#[tokio::test]
async fn no_data_hides_suggestions() {
    let report = bootstrapper(Script {
        greet: Ok(GreetResponse {
            message: "Please upload a file first.".into(),
            has_data: false,
            suggestions: greeting_suggestions(),
            show_faqs: None,
        }),
        ..Default::default()
    })
    .run()
    .await;

    assert!(!report.has_data);
    assert!(report.suggestions.is_empty());
    assert_eq!(report.greeting, "Please upload a file first.");
}

#[tokio::test(start_paused = true)]
async fn slow_health_probe_is_not_fatal() {
    let report = bootstrapper(Script {
        health_delay: Duration::from_secs(30),
        ..Default::default()
    })
    .run()
    .await;

    assert!(!report.healthy);
    assert!(!report.used_fallback);
    assert_eq!(report.greeting, GREETING);
}

#[tokio::test]
async fn settings_failure_is_not_fatal() {
    let report = bootstrapper(Script {
        settings: Err(DatachatError::server(Some(500), "settings unavailable")),
        health: Err(DatachatError::transport("down")),
        ..Default::default()
    })
    .run()
    .await;

    assert!(!report.healthy);
    assert!(report.settings.is_none());
    assert_eq!(report.suggestions, greeting_suggestions());
}

#[tokio::test]
async fn empty_suggestions_with_data_use_defaults() {
    let report = bootstrapper(Script {
        greet: Ok(GreetResponse {
            message: String::new(),
            has_data: true,
            suggestions: vec![],
            show_faqs: Some(false),
        }),
        ..Default::default()
    })
    .run()
    .await;

    assert_eq!(report.greeting, DEFAULT_GREETING);
    assert_eq!(report.suggestions, default_suggestions());
    assert!(!report.show_faqs);
}
