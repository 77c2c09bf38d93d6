//! Concurrent delivery of reaction events
//!
//! Run with: cargo test -p integration-tests --test concurrency

use std::time::Duration;

use futures::future::join_all;
use integration_tests::*;
use starboard_service::services::AnnouncementAction;
use starboard_service::EngineOutcome;
use tokio::time::Instant;

const LATENCY: Duration = Duration::from_millis(100);

fn created(outcomes: &[EngineOutcome]) -> usize {
    outcomes
        .iter()
        .filter(|o| {
            matches!(
                o,
                EngineOutcome::Tallied {
                    action: AnnouncementAction::Created(_),
                    ..
                }
            )
        })
        .count()
}

#[tokio::test(start_paused = true)]
async fn test_simultaneous_adds_announce_once() {
    let h = Harness::new();
    h.configure(1);
    h.platform.set_latency(LATENCY);
    let message = h.post();
    h.platform.set_count(CHANNEL, &message, 20);

    let outcomes = join_all((1..=20).map(|n| h.engine.handle(add(&message, &user(n))))).await;

    assert_eq!(created(&outcomes), 1);
    assert_eq!(h.platform.sent().len(), 1);
    assert_eq!(h.platform.edits().len(), 19);
    assert_eq!(h.tally(&message).unwrap().raw_reaction_count, 20);
}

#[tokio::test(start_paused = true)]
async fn test_running_counter_loses_no_updates() {
    let h = Harness::with_config(running_config());
    h.configure(5);
    h.platform.set_latency(LATENCY);
    let message = h.post();

    let outcomes = join_all((1..=30).map(|n| h.engine.handle(add(&message, &user(n))))).await;

    assert_eq!(created(&outcomes), 1);
    assert_eq!(h.tally(&message).unwrap().raw_reaction_count, 30);
    assert_eq!(h.platform.sent().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_events_for_one_message_are_serialized() {
    let h = Harness::new();
    h.configure(1);
    h.platform.set_latency(LATENCY);
    let message = h.post();
    h.platform.set_count(CHANNEL, &message, 2);

    let start = Instant::now();
    join_all([
        h.engine.handle(add(&message, &user(1))),
        h.engine.handle(add(&message, &user(2))),
    ])
    .await;

    // fetch + send, then fetch + edit
    assert!(start.elapsed() >= LATENCY * 4);
}

#[tokio::test(start_paused = true)]
async fn test_events_for_different_messages_run_in_parallel() {
    let h = Harness::new();
    h.configure(1);
    h.platform.set_latency(LATENCY);
    let first = h.post();
    let second = h.post();
    h.platform.set_count(CHANNEL, &first, 1);
    h.platform.set_count(CHANNEL, &second, 1);

    let start = Instant::now();
    let outcomes = join_all([
        h.engine.handle(add(&first, &user(1))),
        h.engine.handle(add(&second, &user(1))),
    ])
    .await;

    assert_eq!(created(&outcomes), 2);
    assert!(start.elapsed() < LATENCY * 4);
    assert_eq!(h.engine.in_flight(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_spawned_events_across_threads() {
    let h = Harness::new();
    h.configure(3);
    h.platform.set_latency(Duration::from_millis(2));
    let messages: Vec<String> = (0..5).map(|_| h.post()).collect();
    for message in &messages {
        h.platform.set_count(CHANNEL, message, 10);
    }

    let mut tasks = Vec::new();
    for message in &messages {
        for n in 1..=10 {
            let engine = h.engine.clone();
            let event = add(message, &user(n));
            tasks.push(tokio::spawn(async move { engine.handle(event).await }));
        }
    }
    for task in tasks {
        task.await.unwrap();
    }

    let sent = h.platform.sent();
    assert_eq!(sent.len(), messages.len());
    for message in &messages {
        let tally = h.tally(message).unwrap();
        assert_eq!(tally.raw_reaction_count, 10);
        assert!(tally.is_announced());
    }
    assert_eq!(h.engine.in_flight(), 0);
}
