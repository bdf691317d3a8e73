//! Tests for exchange assembly, history bounds, and failure atomicity.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::*;
use crate::prompts::{PatientContext, SYSTEM_INSTRUCTION};
use crate::test_support::{sources, ScriptedClient, StaticFetcher};
use crate::{AiError, Message, Role};

fn session_with_sources(n: usize) -> Session {
    Session::new(SessionSettings::default().with_sources(sources(n)))
}

#[tokio::test]
async fn exchange_appends_user_and_assistant_turns() {
    let client = ScriptedClient::new();
    let fetcher = StaticFetcher::new();
    let mut session = session_with_sources(2);
    client.push_ok("Gliomas start in glial cells.");

    let reply = session
        .exchange(&client, &fetcher, "What is a glioma?", None)
        .await
        .unwrap();

    assert_eq!(reply, "Gliomas start in glial cells.");
    assert_eq!(
        session.history(),
        &[
            Message::user("What is a glioma?"),
            Message::assistant("Gliomas start in glial cells."),
        ]
    );
}

#[tokio::test]
async fn request_starts_with_instruction_then_history_then_pending() {
    let client = ScriptedClient::new();
    let fetcher = StaticFetcher::new();
    let mut session = session_with_sources(0);

    session.exchange(&client, &fetcher, "first", None).await.unwrap();
    let patient = PatientContext::new("meningioma");
    session
        .exchange(&client, &fetcher, "second", Some(&patient))
        .await
        .unwrap();

    let request = client.last_request();
    let roles: Vec<Role> = request.messages.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![Role::System, Role::User, Role::Assistant, Role::System, Role::User]
    );
    assert_eq!(request.messages[0].content, SYSTEM_INSTRUCTION);
    assert_eq!(request.messages[1].content, "first");
    assert_eq!(request.messages[2].content, "reply to first");
    assert_eq!(
        request.messages[3].content,
        "Patient Context: The patient has a meningioma tumor"
    );
    assert_eq!(request.messages[4].content, "second");
    assert_eq!(request.model, "command-r-plus");
    assert_eq!(request.max_tokens, 1000);
}

#[tokio::test]
async fn instruction_is_never_stored_in_history() {
    let client = ScriptedClient::new();
    let fetcher = StaticFetcher::new();
    let mut session = session_with_sources(0);

    for i in 0..3 {
        session
            .exchange(&client, &fetcher, format!("q{i}"), None)
            .await
            .unwrap();
    }
    assert!(session
        .history()
        .iter()
        .all(|m| m.content != SYSTEM_INSTRUCTION));
    // Exactly one instruction per request.
    let request = client.last_request();
    let instructions = request
        .messages
        .iter()
        .filter(|m| m.content == SYSTEM_INSTRUCTION)
        .count();
    assert_eq!(instructions, 1);
}

#[tokio::test]
async fn patient_turn_is_committed_before_user_turn() {
    let client = ScriptedClient::new();
    let fetcher = StaticFetcher::new();
    let mut session = session_with_sources(0);
    let patient = PatientContext::from_parts("pituitary", "pituitary fossa", 2.0);

    session
        .exchange(&client, &fetcher, "Symptoms?", Some(&patient))
        .await
        .unwrap();

    let history = session.history();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].role, Role::System);
    assert_eq!(
        history[0].content,
        "Patient Context: The patient has a pituitary tumor in the pituitary fossa region of size 2"
    );
    assert_eq!(history[1], Message::user("Symptoms?"));
    assert_eq!(history[2].role, Role::Assistant);
}

#[tokio::test]
async fn zero_size_patient_context_has_no_size_clause() {
    let client = ScriptedClient::new();
    let fetcher = StaticFetcher::new();
    let mut session = session_with_sources(0);
    let patient = PatientContext {
        tumor_type: "glioma".into(),
        location: None,
        size: Some(0.0),
    };

    session
        .exchange(&client, &fetcher, "Tell me more", Some(&patient))
        .await
        .unwrap();

    let context_turn = &session.history()[0];
    assert_eq!(context_turn.role, Role::System);
    assert!(!context_turn.content.contains("of size"));
}

#[tokio::test]
async fn history_never_exceeds_limit() {
    let client = ScriptedClient::new();
    let fetcher = StaticFetcher::new();
    let mut session = session_with_sources(1);
    let patient = PatientContext::new("glioma");

    for i in 0..12 {
        let ctx = (i % 2 == 0).then_some(&patient);
        session
            .exchange(&client, &fetcher, format!("question {i}"), ctx)
            .await
            .unwrap();
        assert!(session.message_count() <= 10, "after exchange {i}");
    }

    assert_eq!(session.message_count(), 10);
    let last = session.history().last().unwrap();
    assert_eq!(last, &Message::assistant("reply to question 11"));
}

#[tokio::test]
async fn custom_history_limit_is_honoured() {
    let client = ScriptedClient::new();
    let fetcher = StaticFetcher::new();
    let mut session = Session::new(SessionSettings::default().with_history_limit(4));

    for i in 0..5 {
        session
            .exchange(&client, &fetcher, format!("q{i}"), None)
            .await
            .unwrap();
    }
    let contents: Vec<&str> = session.history().iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["q3", "reply to q3", "q4", "reply to q4"]);
}

#[tokio::test]
async fn failed_exchange_leaves_history_unchanged() {
    let client = ScriptedClient::new();
    let fetcher = StaticFetcher::new();
    let mut session = session_with_sources(2);
    session.exchange(&client, &fetcher, "first", None).await.unwrap();
    let before = session.history().to_vec();

    client.push_err(AiError::ApiError("HTTP 500: upstream".into()));
    let patient = PatientContext::new("glioma");
    let err = session
        .exchange(&client, &fetcher, "second", Some(&patient))
        .await
        .unwrap_err();

    assert!(matches!(err, AiError::ApiError(_)));
    assert_eq!(session.history(), before.as_slice());
    assert_eq!(session.tracker().call_count(), 1);
}

#[tokio::test]
async fn failure_on_fresh_session_keeps_it_empty() {
    let client = ScriptedClient::new();
    let fetcher = StaticFetcher::new();
    let mut session = session_with_sources(0);
    client.push_err(AiError::RateLimited);

    let err = session.exchange(&client, &fetcher, "hello", None).await;
    assert!(matches!(err, Err(AiError::RateLimited)));
    assert_eq!(session.message_count(), 0);

    // The next exchange works normally.
    session.exchange(&client, &fetcher, "hello", None).await.unwrap();
    assert_eq!(session.message_count(), 2);
}

#[tokio::test]
async fn one_failing_source_still_yields_reply_and_partial_context() {
    let client = ScriptedClient::new();
    let fetcher = StaticFetcher::new();
    let all = sources(5);
    fetcher.fail(&all[1]);
    let mut session = session_with_sources(5);

    session.exchange(&client, &fetcher, "hi", None).await.unwrap();

    assert_eq!(session.snippets().len(), 4);
    let context = client.last_request().context;
    assert!(!context.contains(&all[1]));
    assert!(context.contains(&format!("Source: {}\nMedical information from {}\n\n", all[0], all[0])));
}

#[tokio::test]
async fn refresh_replaces_previous_snippets() {
    let fetcher = StaticFetcher::new();
    let all = sources(3);
    let mut session = session_with_sources(3);

    fetcher.fail(&all[0]);
    let first = session.refresh_context(&fetcher).await;
    assert_eq!(first.len(), 2);

    fetcher.heal(&all[0]);
    fetcher.fail(&all[2]);
    let second = session.refresh_context(&fetcher).await;
    let names: Vec<&str> = second.iter().map(|s| s.source.as_str()).collect();
    assert_eq!(names, vec![all[0].as_str(), all[1].as_str()]);
    assert_eq!(session.snippets(), second.as_slice());
    assert_eq!(fetcher.calls(), 6);
}

#[tokio::test]
async fn every_exchange_refreshes_references() {
    let client = ScriptedClient::new();
    let fetcher = StaticFetcher::new();
    let mut session = session_with_sources(5);

    session.exchange(&client, &fetcher, "a", None).await.unwrap();
    session.exchange(&client, &fetcher, "b", None).await.unwrap();
    assert_eq!(fetcher.calls(), 10);
}

#[tokio::test]
async fn streaming_exchange_delivers_chunks_and_commits() {
    let client = ScriptedClient::new();
    let fetcher = StaticFetcher::new();
    let mut session = session_with_sources(0);
    client.push_ok("Surgery is often first.");

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let reply = session
        .exchange_streaming(
            &client,
            &fetcher,
            "Treatments?",
            None,
            Box::new(move |chunk| sink.lock().unwrap().push(chunk)),
        )
        .await
        .unwrap();

    assert_eq!(reply, "Surgery is often first.");
    assert_eq!(seen.lock().unwrap().concat(), "Surgery is often first.");
    assert_eq!(session.message_count(), 2);
}

#[tokio::test]
async fn failed_streaming_exchange_leaves_history_unchanged() {
    let client = ScriptedClient::new();
    let fetcher = StaticFetcher::new();
    let mut session = session_with_sources(0);
    client.push_err(AiError::NetworkError("reset".into()));

    let result = session
        .exchange_streaming(&client, &fetcher, "Treatments?", None, Box::new(|_| {}))
        .await;
    assert!(result.is_err());
    assert_eq!(session.message_count(), 0);
}

#[tokio::test]
async fn usage_is_tracked_per_successful_call() {
    let client = ScriptedClient::new();
    let fetcher = StaticFetcher::new();
    let mut session = session_with_sources(0);

    session.exchange(&client, &fetcher, "a", None).await.unwrap();
    session.exchange(&client, &fetcher, "b", None).await.unwrap();

    let tracker = session.tracker();
    assert_eq!(tracker.call_count(), 2);
    // Scripted usage: input = request length (2 then 4), output = 1 each.
    assert_eq!(tracker.for_provider("scripted").unwrap().input_tokens, 6);
    assert_eq!(tracker.total().output_tokens, 2);
}

#[tokio::test]
async fn last_active_is_refreshed_when_an_exchange_completes() {
    let client = ScriptedClient::with_delay(Duration::from_millis(60));
    let fetcher = StaticFetcher::new();
    let mut session = session_with_sources(0);

    let started = Instant::now();
    session.exchange(&client, &fetcher, "slow one", None).await.unwrap();

    assert!(session.last_active() >= started + Duration::from_millis(60));
}

#[tokio::test]
async fn failed_exchange_keeps_start_time() {
    let client = ScriptedClient::with_delay(Duration::from_millis(60));
    let fetcher = StaticFetcher::new();
    let mut session = session_with_sources(0);
    client.push_err(AiError::Timeout);

    let started = Instant::now();
    session.exchange(&client, &fetcher, "slow one", None).await.unwrap_err();

    assert!(session.last_active() >= started);
    assert!(session.last_active() < started + Duration::from_millis(60));
}

#[test]
fn clear_empties_history() {
    let mut session = Session::default();
    session.history.push(Message::user("x"));
    session.clear();
    assert_eq!(session.message_count(), 0);
}
