//! Then steps for review reminder BDD scenarios.

use super::world::{ReviewWorld, SCENARIO_CHAT, run_async};
use revisit::review::{
    domain::{ChatId, TaskState, parse_review_date},
    services::ReviewLifecycleError,
};
use rstest_bdd_macros::then;

#[then(r#"the task "{name}" is due on "{date}""#)]
fn task_is_due_on(world: &ReviewWorld, name: String, date: String) -> Result<(), eyre::Report> {
    let expected = parse_review_date(&date)?;
    let task = run_async(world.service.find_task(ChatId::new(SCENARIO_CHAT), &name))?
        .ok_or_else(|| eyre::eyre!("task '{name}' not found"))?;

    if task.next_review_date() != expected {
        return Err(eyre::eyre!(
            "expected review on {expected}, found {}",
            task.next_review_date()
        ));
    }
    Ok(())
}

#[then(r#"the task "{name}" is "{state}""#)]
fn task_state_is(world: &ReviewWorld, name: String, state: String) -> Result<(), eyre::Report> {
    let expected = TaskState::try_from(state.as_str())
        .map_err(|err| eyre::eyre!("invalid expected state in scenario: {err}"))?;
    let task = run_async(world.service.find_task(ChatId::new(SCENARIO_CHAT), &name))?
        .ok_or_else(|| eyre::eyre!("task '{name}' not found"))?;

    if task.state() != expected {
        return Err(eyre::eyre!(
            "expected state {}, found {}",
            expected.as_str(),
            task.state().as_str()
        ));
    }
    Ok(())
}

#[then("the gateway has sent {count:usize} reminders")]
fn reminders_sent(world: &ReviewWorld, count: usize) -> Result<(), eyre::Report> {
    let sent = world.gateway.sent().len();
    eyre::ensure!(sent == count, "expected {count} reminders, found {sent}");
    Ok(())
}

#[then(r#"the task "{name}" is archived"#)]
fn task_is_archived(world: &ReviewWorld, name: String) -> Result<(), eyre::Report> {
    let archived = world
        .last_archived
        .as_ref()
        .ok_or_else(|| eyre::eyre!("nothing was archived"))?;
    eyre::ensure!(archived.name().as_str() == name, "archived '{}'", archived.name());

    let active = run_async(world.service.find_task(ChatId::new(SCENARIO_CHAT), &name))?;
    eyre::ensure!(active.is_none(), "task '{name}' is still active");
    Ok(())
}

#[then("the acknowledgment fails as unknown")]
fn acknowledgment_fails(world: &ReviewWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_ack_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing acknowledgment result"))?;

    if !matches!(result, Err(ReviewLifecycleError::UnknownMessage { .. })) {
        return Err(eyre::eyre!("expected UnknownMessage error, got {result:?}"));
    }
    Ok(())
}

#[then("creation fails because the name is taken")]
fn creation_fails_name_taken(world: &ReviewWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_create_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing creation result"))?;

    if !matches!(result, Err(ReviewLifecycleError::NameTaken { .. })) {
        return Err(eyre::eyre!("expected NameTaken error, got {result:?}"));
    }
    Ok(())
}
