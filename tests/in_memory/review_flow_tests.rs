//! End-to-end review flows over in-memory adapters.

use std::time::Duration;

use super::helpers::{CHAT, ReviewHarness, create_request, harness, utc};
use eyre::{ensure, eyre};
use revisit::review::{
    domain::{ChatId, MessageId, TaskState},
    ports::ArchiveRepository,
    services::{CreateTaskRequest, ReviewLifecycleError, UpdateTaskRequest},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn remind_then_acknowledge_moves_task_to_archive(
    harness: ReviewHarness,
) -> eyre::Result<()> {
    let created = harness
        .service
        .create_task(create_request("Hiragana", 2.0))
        .await?;

    let report = harness.service.scheduler().sweep(utc(2024, 1, 3, 9)).await?;
    ensure!(report.dispatched == 1, "got {report:?}");

    let sent = harness.gateway.sent();
    let reminder = sent
        .first()
        .ok_or_else(|| eyre!("expected one reminder"))?;
    ensure!(reminder.chat_id == ChatId::new(CHAT));
    ensure!(reminder.text.contains("Hiragana"));

    let archived = harness.service.acknowledge(ChatId::new(CHAT), reminder.message_id).await?;
    ensure!(archived.id() == created.id());
    ensure!(harness.archive.find_by_id(created.id()).await?.is_some());
    ensure!(
        harness
            .service
            .find_task(ChatId::new(CHAT), "Hiragana")
            .await?
            .is_none()
    );
    Ok(())
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn timer_delivers_reminder_on_review_date(harness: ReviewHarness) -> eyre::Result<()> {
    harness
        .service
        .create_task(create_request("Katakana", 2.0))
        .await?;

    // Review date 2024-01-03 is 40 hours after the harness clock.
    tokio::time::sleep(Duration::from_secs(39 * 3600)).await;
    ensure!(harness.gateway.sent().is_empty());

    tokio::time::sleep(Duration::from_secs(2 * 3600)).await;
    let message_id = harness
        .last_reminder_for(CHAT)
        .ok_or_else(|| eyre!("timer did not deliver"))?;

    let task = harness
        .service
        .find_task(ChatId::new(CHAT), "Katakana")
        .await?
        .ok_or_else(|| eyre!("task missing"))?;
    ensure!(task.state() == TaskState::Reminded);
    ensure!(task.message_id() == Some(message_id));
    ensure!(harness.service.scheduler().pending_timers() == 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn second_acknowledgment_is_rejected(harness: ReviewHarness) -> eyre::Result<()> {
    harness
        .service
        .create_task(create_request("Kanji", 1.0))
        .await?;
    harness.service.scheduler().sweep(utc(2024, 1, 2, 9)).await?;
    let message_id = harness
        .last_reminder_for(CHAT)
        .ok_or_else(|| eyre!("expected a reminder"))?;

    harness.service.acknowledge(ChatId::new(CHAT), message_id).await?;
    let again = harness.service.acknowledge(ChatId::new(CHAT), message_id).await;

    ensure!(matches!(again, Err(ReviewLifecycleError::UnknownMessage { .. })));
    ensure!(harness.service.list_archived(ChatId::new(CHAT)).await?.len() == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_after_reminder_restarts_the_cycle(harness: ReviewHarness) -> eyre::Result<()> {
    harness
        .service
        .create_task(create_request("Grammar", 1.0))
        .await?;
    harness.service.scheduler().sweep(utc(2024, 1, 2, 9)).await?;
    let first_message = harness
        .last_reminder_for(CHAT)
        .ok_or_else(|| eyre!("expected a reminder"))?;

    harness.clock.set(utc(2024, 1, 5, 8));
    let updated = harness
        .service
        .update_task(UpdateTaskRequest::new(CHAT, "Grammar", 2.0).with_last_review_date("2024-01-05"))
        .await?;
    ensure!(updated.state() == TaskState::Active);
    ensure!(updated.next_review_date().to_string() == "2024-01-07");

    let stale = harness.service.acknowledge(ChatId::new(CHAT), first_message).await;
    ensure!(matches!(stale, Err(ReviewLifecycleError::UnknownMessage { .. })));

    harness.service.scheduler().sweep(utc(2024, 1, 7, 9)).await?;
    let second_message = harness
        .last_reminder_for(CHAT)
        .ok_or_else(|| eyre!("expected a second reminder"))?;
    ensure!(second_message != first_message);

    let archived = harness.service.acknowledge(ChatId::new(CHAT), second_message).await?;
    ensure!(archived.last_review_date().to_string() == "2024-01-05");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn chats_are_isolated(harness: ReviewHarness) -> eyre::Result<()> {
    let other_chat = CHAT + 1;
    harness
        .service
        .create_task(create_request("Shared name", 1.0))
        .await?;
    harness
        .service
        .create_task(CreateTaskRequest::new(other_chat, "Shared name", "2024-01-01", 1.0))
        .await?;

    harness
        .service
        .delete_task(ChatId::new(other_chat), "Shared name")
        .await?;
    harness.service.scheduler().sweep(utc(2024, 1, 2, 9)).await?;

    let recipients: Vec<ChatId> = harness
        .gateway
        .sent()
        .iter()
        .map(|reminder| reminder.chat_id)
        .collect();
    ensure!(recipients == [ChatId::new(CHAT)], "got {recipients:?}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn archive_lists_completions_in_order(harness: ReviewHarness) -> eyre::Result<()> {
    for name in ["First", "Second"] {
        harness
            .service
            .create_task(create_request(name, 1.0))
            .await?;
    }
    harness.service.scheduler().sweep(utc(2024, 1, 2, 9)).await?;
    let messages: Vec<MessageId> = harness
        .gateway
        .sent()
        .iter()
        .map(|reminder| reminder.message_id)
        .collect();

    for message_id in messages.iter().rev() {
        harness.service.acknowledge(ChatId::new(CHAT), *message_id).await?;
        harness.clock.advance(chrono::Duration::minutes(5));
    }

    let archived = harness.service.list_archived(ChatId::new(CHAT)).await?;
    ensure!(archived.len() == 2);
    ensure!(
        archived
            .windows(2)
            .all(|pair| matches!(pair, [earlier, later] if earlier.archived_at() <= later.archived_at()))
    );
    Ok(())
}
