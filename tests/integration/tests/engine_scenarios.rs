//! End-to-end reaction handling
//!
//! Run with: cargo test -p integration-tests --test engine_scenarios

use integration_tests::*;
use starboard_common::EditMode;
use starboard_core::{EmojiRef, RawReactionEvent, ServerSettings};
use starboard_service::services::AnnouncementAction;
use starboard_service::{EngineConfig, EngineOutcome, SkipReason};

fn action(outcome: EngineOutcome) -> AnnouncementAction {
    match outcome {
        EngineOutcome::Tallied { action, .. } => action,
        other => panic!("expected a tallied event, got {other:?}"),
    }
}

// ============================================================================
// Announcement lifecycle
// ============================================================================

#[tokio::test]
async fn test_announces_once_threshold_is_reached() {
    let h = Harness::new();
    h.configure(3);
    let message = h.post();

    assert_eq!(action(h.react(&message, &user(1)).await), AnnouncementAction::BelowThreshold);
    assert_eq!(action(h.react(&message, &user(2)).await), AnnouncementAction::BelowThreshold);
    assert!(matches!(
        action(h.react(&message, &user(3)).await),
        AnnouncementAction::Created(_)
    ));

    let sent = h.platform.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].channel_id, ANNOUNCE_CHANNEL);
    assert!(sent[0].content.starts_with("by user3000, 3 💖 (original message: <"));
    assert!(!sent[0].content.contains("(self react)"));
    assert!(sent[0]
        .content
        .contains(&format!("https://discord.com/channels/{SERVER}/{CHANNEL}/{message}")));
    assert!(sent[0].content.ends_with("\nlook at this"));

    let tally = h.tally(&message).unwrap();
    assert_eq!(tally.raw_reaction_count, 3);
    assert_eq!(
        tally.announcement.unwrap().message_id,
        sent[0].message_id
    );
}

#[tokio::test]
async fn test_self_reaction_is_excluded_from_displayed_count() {
    let h = Harness::new();
    h.configure(2);
    let message = h.post();

    assert_eq!(action(h.react(&message, AUTHOR).await), AnnouncementAction::BelowThreshold);
    assert_eq!(action(h.react(&message, &user(1)).await), AnnouncementAction::BelowThreshold);
    assert!(matches!(
        action(h.react(&message, &user(2)).await),
        AnnouncementAction::Created(_)
    ));

    let tally = h.tally(&message).unwrap();
    assert!(tally.author_has_reacted);
    assert_eq!(tally.raw_reaction_count, 3);
    assert_eq!(tally.displayed_reaction_count(), 2);

    let sent = h.platform.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].content.contains("2 💖 (self react)"));
}

#[tokio::test]
async fn test_removal_edits_existing_announcement() {
    let h = Harness::new();
    h.configure(3);
    let message = h.post();
    for n in 1..=3 {
        h.react(&message, &user(n)).await;
    }
    let announcement = h.tally(&message).unwrap().announcement.unwrap();

    let outcome = action(h.unreact(&message, &user(1)).await);
    assert_eq!(outcome, AnnouncementAction::Edited(announcement.clone()));

    assert_eq!(h.platform.sent().len(), 1);
    let edits = h.platform.edits();
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].message_id, announcement.message_id);
    assert!(edits[0].content.contains(" 2 💖 "));
    assert_eq!(h.tally(&message).unwrap().announcement, Some(announcement));
}

#[tokio::test]
async fn test_unconfigured_server_never_announces() {
    let h = Harness::new();
    let message = h.post();

    for n in 1..=10 {
        assert_eq!(action(h.react(&message, &user(n)).await), AnnouncementAction::NotConfigured);
    }

    // A default row without a channel behaves the same
    h.settings.insert(ServerSettings::new(SERVER));
    assert_eq!(action(h.react(&message, &user(11)).await), AnnouncementAction::NotConfigured);

    assert!(h.platform.sent().is_empty());
    assert_eq!(h.tally(&message).unwrap().raw_reaction_count, 11);
}

#[tokio::test]
async fn test_zero_threshold_announces_on_first_reaction() {
    let h = Harness::new();
    h.configure(0);
    let message = h.post();

    assert!(matches!(
        action(h.react(&message, &user(1)).await),
        AnnouncementAction::Created(_)
    ));
}

#[tokio::test]
async fn test_announcement_is_never_retracted() {
    let h = Harness::new();
    h.configure(2);
    let message = h.post();
    h.react(&message, &user(1)).await;
    h.react(&message, &user(2)).await;
    let announcement = h.tally(&message).unwrap().announcement.unwrap();

    h.unreact(&message, &user(1)).await;
    let outcome = action(h.unreact(&message, &user(2)).await);

    assert_eq!(outcome, AnnouncementAction::Edited(announcement.clone()));
    assert_eq!(h.tally(&message).unwrap().raw_reaction_count, 0);
    assert_eq!(h.platform.sent().len(), 1);
    assert!(h
        .platform
        .content(ANNOUNCE_CHANNEL, &announcement.message_id)
        .unwrap()
        .contains(" 0 💖 "));

    // Climbing back over the threshold edits, never re-sends
    h.react(&message, &user(3)).await;
    h.react(&message, &user(4)).await;
    assert_eq!(h.platform.sent().len(), 1);
}

#[tokio::test]
async fn test_settings_change_keeps_existing_announcement() {
    let h = Harness::new();
    h.configure(1);
    let message = h.post();
    h.react(&message, &user(1)).await;
    let announcement = h.tally(&message).unwrap().announcement.unwrap();

    h.settings
        .insert(ServerSettings::with_announcements(SERVER, "9001", 50));
    let outcome = action(h.react(&message, &user(2)).await);

    assert_eq!(outcome, AnnouncementAction::Edited(announcement.clone()));
    assert_eq!(h.platform.edits()[0].channel_id, ANNOUNCE_CHANNEL);
}

#[tokio::test]
async fn test_attachments_are_listed() {
    let h = Harness::new();
    h.configure(1);
    let message = h.post();
    h.platform
        .add_attachment(CHANNEL, &message, "https://cdn.example/cat.png");

    h.react(&message, &user(1)).await;

    assert!(h.platform.sent()[0]
        .content
        .ends_with("look at this\nhttps://cdn.example/cat.png"));
}

// ============================================================================
// Counting
// ============================================================================

#[tokio::test]
async fn test_running_counter_clamps_at_zero() {
    let h = Harness::with_config(running_config());
    let message = h.post();

    h.react(&message, &user(1)).await;
    for n in 1..=3 {
        h.engine.handle(remove(&message, &user(n))).await;
    }

    let tally = h.tally(&message).unwrap();
    assert_eq!(tally.raw_reaction_count, 0);
    assert_eq!(tally.displayed_reaction_count(), 0);
}

#[tokio::test]
async fn test_snapshot_absorbs_missed_events() {
    let h = Harness::new();
    let message = h.post();

    // Five reactions happened while the bot saw none of them
    h.platform.set_count(CHANNEL, &message, 5);
    h.engine.handle(add(&message, &user(6))).await;

    assert_eq!(h.tally(&message).unwrap().raw_reaction_count, 5);
}

#[tokio::test]
async fn test_duplicate_delivery_is_idempotent_with_snapshots() {
    let h = Harness::new();
    h.configure(1);
    let message = h.post();

    h.react(&message, &user(1)).await;
    let event = add(&message, &user(1));
    h.engine.handle(event.clone()).await;
    h.engine.handle(event).await;

    assert_eq!(h.tally(&message).unwrap().raw_reaction_count, 1);
    assert_eq!(h.platform.sent().len(), 1);
}

#[tokio::test]
async fn test_remove_on_untracked_message() {
    let h = Harness::new();
    h.configure(0);
    let message = h.post();

    let outcome = h.engine.handle(remove(&message, &user(1))).await;

    assert!(matches!(outcome, EngineOutcome::Untracked));
    assert!(h.tallies.is_empty());
    assert!(h.platform.sent().is_empty());
}

#[tokio::test]
async fn test_author_removing_own_reaction() {
    let h = Harness::new();
    let message = h.post();

    h.react(&message, AUTHOR).await;
    h.react(&message, &user(1)).await;
    assert!(h.tally(&message).unwrap().author_has_reacted);

    h.unreact(&message, AUTHOR).await;
    let tally = h.tally(&message).unwrap();
    assert!(!tally.author_has_reacted);
    assert_eq!(tally.displayed_reaction_count(), 1);
}

// ============================================================================
// Filtering
// ============================================================================

#[tokio::test]
async fn test_other_emoji_is_ignored() {
    let h = Harness::new();
    let message = h.post();
    let event = RawReactionEvent::add(
        Some(SERVER.to_string()),
        CHANNEL,
        &message,
        user(1),
        EmojiRef::unicode("👍"),
    );

    let outcome = h.engine.handle(event).await;

    assert!(matches!(outcome, EngineOutcome::Skipped(SkipReason::EmojiMismatch)));
    assert!(h.tallies.is_empty());
}

#[tokio::test]
async fn test_custom_emoji_matches_by_id() {
    let h = Harness::with_config(custom_emoji_config("<:blob:777>"));
    h.configure(1);
    let message = h.post();
    h.platform.set_count(CHANNEL, &message, 1);

    let event = RawReactionEvent::add(
        Some(SERVER.to_string()),
        CHANNEL,
        &message,
        user(1),
        EmojiRef::custom("777", "blob_renamed"),
    );
    let outcome = action(h.engine.handle(event).await);

    assert!(matches!(outcome, AnnouncementAction::Created(_)));
    assert!(h.platform.sent()[0].content.contains("1 <:blob:777>"));
}

#[tokio::test]
async fn test_direct_message_reaction_is_ignored() {
    let h = Harness::new();
    let message = h.post();
    let event = RawReactionEvent::add(None, CHANNEL, &message, user(1), EmojiRef::unicode(HEART));

    let outcome = h.engine.handle(event).await;

    assert!(matches!(outcome, EngineOutcome::Skipped(SkipReason::OutsideServer)));
}

#[tokio::test]
async fn test_reaction_on_bot_message_is_ignored() {
    let h = Harness::new();
    h.configure(0);
    h.platform.post(CHANNEL, "bot-post", BOT, "an announcement");

    let outcome = h.engine.handle(add("bot-post", &user(1))).await;

    assert!(matches!(outcome, EngineOutcome::Skipped(SkipReason::OwnMessage)));
    assert!(h.tallies.is_empty());
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_fetch_failure_drops_event() {
    let h = Harness::new();
    h.configure(0);
    let message = h.post();
    h.platform.fail_fetch(true);

    let outcome = h.react(&message, &user(1)).await;

    assert!(matches!(outcome, EngineOutcome::Dropped(ref e) if e.is_transient()));
    assert!(h.tally(&message).is_none());
    assert!(h.platform.sent().is_empty());
}

#[tokio::test]
async fn test_deleted_message_drops_event() {
    let h = Harness::new();

    let outcome = h.engine.handle(add("gone", &user(1))).await;

    assert!(matches!(outcome, EngineOutcome::Dropped(_)));
    assert!(h.tallies.is_empty());
}

#[tokio::test]
async fn test_storage_failure_drops_event() {
    let h = Harness::new();
    h.configure(0);
    let message = h.post();
    h.tallies.fail_writes(true);

    let outcome = h.react(&message, &user(1)).await;

    assert!(matches!(outcome, EngineOutcome::Dropped(ref e) if e.is_storage()));
    assert!(h.platform.sent().is_empty());
}

#[tokio::test]
async fn test_failed_send_is_retried_on_next_event() {
    let h = Harness::new();
    h.configure(1);
    let message = h.post();

    h.platform.fail_send(true);
    assert_eq!(action(h.react(&message, &user(1)).await), AnnouncementAction::Failed);
    assert!(!h.tally(&message).unwrap().is_announced());

    h.platform.fail_send(false);
    assert!(matches!(
        action(h.react(&message, &user(2)).await),
        AnnouncementAction::Created(_)
    ));
    assert_eq!(h.platform.sent().len(), 1);
}

#[tokio::test]
async fn test_unrecorded_announcement_is_left_orphaned() {
    let h = Harness::new();
    h.configure(1);
    let message = h.post();
    h.tallies.fail_record_announcement(true);

    let outcome = h.react(&message, &user(1)).await;
    assert_eq!(action(outcome), AnnouncementAction::Failed);
    assert_eq!(h.platform.sent().len(), 1);

    let tally = h.tally(&message).unwrap();
    assert_eq!(tally.raw_reaction_count, 1);
    assert!(!tally.is_announced());

    // The id was never stored, so the next event posts again
    assert_eq!(action(h.react(&message, &user(2)).await), AnnouncementAction::Failed);
    assert_eq!(h.platform.sent().len(), 2);
    assert!(!h.tally(&message).unwrap().is_announced());

    h.tallies.fail_record_announcement(false);
    assert!(matches!(
        action(h.react(&message, &user(3)).await),
        AnnouncementAction::Created(_)
    ));
    assert_eq!(h.platform.sent().len(), 3);
    assert!(h.tally(&message).unwrap().is_announced());
}

#[tokio::test]
async fn test_failed_edit_keeps_announcement() {
    let h = Harness::new();
    h.configure(1);
    let message = h.post();
    h.react(&message, &user(1)).await;

    h.platform.fail_edit(true);
    assert_eq!(action(h.react(&message, &user(2)).await), AnnouncementAction::Failed);

    let tally = h.tally(&message).unwrap();
    assert_eq!(tally.raw_reaction_count, 2);
    assert!(tally.is_announced());
    assert_eq!(h.platform.sent().len(), 1);
}

// ============================================================================
// Edit modes
// ============================================================================

#[tokio::test]
async fn test_splice_edit_only_changes_the_count() {
    let h = Harness::with_config(EngineConfig {
        edit_mode: EditMode::Splice,
        ..EngineConfig::default()
    });
    h.configure(1);
    let message = h.post();
    h.react(&message, &user(1)).await;
    let original = h.platform.sent()[0].content.clone();

    h.react(&message, &user(2)).await;

    let edited = &h.platform.edits()[0].content;
    assert_eq!(edited, &original.replacen(" 1 💖", " 2 💖", 1));
}
