//! Catch-up sweep and restart behaviour over in-memory adapters.

use std::sync::Arc;

use super::helpers::{CHAT, ReviewHarness, create_request, harness, utc};
use eyre::ensure;
use revisit::review::{
    adapters::memory::{ManualClock, RecordingGateway},
    domain::{ChatId, TaskState},
    services::ReminderScheduler,
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repeated_sweeps_remind_each_task_once(harness: ReviewHarness) -> eyre::Result<()> {
    for (name, rate) in [("Verbs", 1.0), ("Nouns", 2.0), ("Particles", 5.0)] {
        harness
            .service
            .create_task(create_request(name, rate))
            .await?;
    }

    let day_two = harness.service.scheduler().sweep(utc(2024, 1, 2, 9)).await?;
    let day_three = harness.service.scheduler().sweep(utc(2024, 1, 3, 9)).await?;
    let day_three_again = harness.service.scheduler().sweep(utc(2024, 1, 3, 10)).await?;

    ensure!(day_two.dispatched == 1, "got {day_two:?}");
    ensure!(day_three.dispatched == 1, "got {day_three:?}");
    ensure!(day_three_again.examined == 0, "got {day_three_again:?}");
    ensure!(harness.gateway.sent().len() == 2);

    let pending = harness
        .service
        .find_task(ChatId::new(CHAT), "Particles")
        .await?;
    ensure!(pending.is_some_and(|task| task.state() == TaskState::Active));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_delivery_is_retried_by_the_next_sweep(harness: ReviewHarness) -> eyre::Result<()> {
    harness
        .service
        .create_task(create_request("Listening", 1.0))
        .await?;
    harness.gateway.set_rejecting(true);

    let failed = harness.service.scheduler().sweep(utc(2024, 1, 2, 9)).await?;
    ensure!(failed.failed == 1, "got {failed:?}");
    ensure!(harness.gateway.sent().is_empty());

    harness.gateway.set_rejecting(false);
    let retried = harness.service.scheduler().sweep(utc(2024, 1, 3, 9)).await?;
    ensure!(retried.dispatched == 1, "got {retried:?}");
    ensure!(harness.gateway.attempts() == 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn restarted_scheduler_restores_timers_for_active_tasks(
    harness: ReviewHarness,
) -> eyre::Result<()> {
    for name in ["Reading", "Writing", "Speaking"] {
        harness
            .service
            .create_task(create_request(name, 3.0))
            .await?;
    }
    harness.service.scheduler().sweep(utc(2024, 1, 4, 9)).await?;
    harness
        .service
        .create_task(create_request("Pitch accent", 3.0))
        .await?;
    harness.service.scheduler().cancel_all();

    let restarted = ReminderScheduler::new(
        Arc::clone(&harness.repository),
        Arc::new(RecordingGateway::new()),
        Arc::new(ManualClock::new(utc(2024, 1, 1, 8))),
    );
    let restored = restarted.restore().await?;

    ensure!(restored == 1, "only the unreminded task needs a timer");
    ensure!(restarted.pending_timers() == 1);
    restarted.cancel_all();
    Ok(())
}
