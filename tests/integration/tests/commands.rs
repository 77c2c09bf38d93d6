//! Admin commands and the leaderboard
//!
//! Run with: cargo test -p integration-tests --test commands

use integration_tests::*;
use starboard_core::Permissions;
use starboard_service::services::CommandInvoker;
use starboard_service::{CommandService, EngineConfig};

fn admin() -> CommandInvoker {
    CommandInvoker::new("7000", Permissions::MANAGE_GUILD)
}

fn member() -> CommandInvoker {
    CommandInvoker::new("7001", Permissions::SEND_MESSAGES | Permissions::ADD_REACTIONS)
}

#[tokio::test]
async fn test_text_command_configures_announcements() {
    let h = Harness::new();
    let commands = CommandService::new(h.engine.context());

    let reply = commands
        .handle_text(SERVER, &admin(), "rc!announcements <#9000> 4")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        reply,
        "Announcements will be posted in <#9000> once a message reaches 4 💖"
    );
    let settings = h.settings.get(SERVER).unwrap();
    assert_eq!(settings.announcement_channel(), Some(ANNOUNCE_CHANNEL));
    assert_eq!(settings.threshold(), 4);
}

#[tokio::test]
async fn test_configured_threshold_drives_announcements() {
    let h = Harness::new();
    CommandService::new(h.engine.context())
        .handle_text(SERVER, &admin(), "rc!announcements 9000 2")
        .await
        .unwrap();
    let message = h.post();

    h.react(&message, &user(1)).await;
    assert!(h.platform.sent().is_empty());
    h.react(&message, &user(2)).await;
    assert_eq!(h.platform.sent().len(), 1);
}

#[tokio::test]
async fn test_members_cannot_configure() {
    let h = Harness::new();
    let commands = CommandService::new(h.engine.context());

    let reply = commands
        .handle_text(SERVER, &member(), "rc!announcements 9000 1")
        .await
        .unwrap()
        .unwrap();

    assert!(reply.starts_with("You aren't allowed to use config commands"));
    assert!(h.settings.get(SERVER).is_none());
}

#[tokio::test]
async fn test_bot_owner_can_configure_any_server() {
    let h = Harness::with_config(EngineConfig {
        owner_id: Some("7001".to_string()),
        ..EngineConfig::default()
    });
    let commands = CommandService::new(h.engine.context());

    let reply = commands
        .set_announcements(SERVER, &member(), "9000", 1)
        .await
        .unwrap();

    assert!(reply.starts_with("Announcements will be posted"));
    assert!(h.settings.get(SERVER).unwrap().is_configured());
}

#[tokio::test]
async fn test_invalid_input_is_answered() {
    let h = Harness::new();
    let commands = CommandService::new(h.engine.context());

    let usage = commands
        .handle_text(SERVER, &admin(), "rc!announcements 9000")
        .await
        .unwrap()
        .unwrap();
    assert!(usage.starts_with("This command takes 2 params"));

    let not_a_number = commands
        .handle_text(SERVER, &admin(), "rc!announcements 9000 lots")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(not_a_number, "minimum reactions should be a number");

    let bad_channel = commands
        .handle_text(SERVER, &admin(), "rc!announcements general 3")
        .await
        .unwrap()
        .unwrap();
    assert!(bad_channel.starts_with("Invalid settings:"));

    let negative = commands
        .handle_text(SERVER, &admin(), "rc!announcements 9000 -1")
        .await
        .unwrap()
        .unwrap();
    assert!(negative.starts_with("Invalid settings:"));

    assert!(h.settings.get(SERVER).is_none());
}

#[tokio::test]
async fn test_plain_messages_are_not_commands() {
    let h = Harness::new();
    let reply = CommandService::new(h.engine.context())
        .handle_text(SERVER, &admin(), "announcements 9000 3")
        .await
        .unwrap();
    assert_eq!(reply, None);
}

#[tokio::test]
async fn test_leaderboard_ranks_authors() {
    let h = Harness::new();

    // alice: 3 + 2 over two messages, bob: 1
    let alice = "3100";
    let bob = "3200";
    h.platform.set_member_name(SERVER, alice, "Alice");
    for (author, message_id, reactions) in [(alice, "61", 3), (bob, "62", 1), (alice, "63", 2)] {
        h.platform.post(CHANNEL, message_id, author, "hi");
        for n in 1..=reactions {
            h.react(message_id, &user(n)).await;
        }
    }
    // Only self-reactions: displayed total is zero, so not ranked
    h.platform.post(CHANNEL, "64", "3300", "me");
    h.react("64", "3300").await;

    let reply = CommandService::new(h.engine.context())
        .leaderboard(SERVER, None)
        .await
        .unwrap();

    assert_eq!(
        reply,
        "Leaderboard (💖)\n1. Alice: 5 (2 messages)\n2. <@3200>: 1 (1 message)"
    );
}

#[tokio::test]
async fn test_leaderboard_limit_and_empty() {
    let h = Harness::new();
    let commands = CommandService::new(h.engine.context());
    assert_eq!(commands.leaderboard(SERVER, None).await.unwrap(), "No reactions yet");

    for (author, message_id) in [("3100", "71"), ("3200", "72"), ("3300", "73")] {
        h.platform.post(CHANNEL, message_id, author, "hi");
        h.react(message_id, &user(1)).await;
    }

    let reply = commands.leaderboard(SERVER, Some(2)).await.unwrap();
    assert_eq!(reply.lines().count(), 3);
    assert!(reply.contains("1. <@3100>: 1"));
    assert!(reply.contains("2. <@3200>: 1"));
}
