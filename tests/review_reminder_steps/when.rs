//! When steps for review reminder BDD scenarios.

use super::world::{ReviewWorld, SCENARIO_CHAT, morning_of, run_async};
use eyre::WrapErr;
use revisit::review::{
    domain::ChatId,
    services::{CreateTaskRequest, UpdateTaskRequest},
};
use rstest_bdd_macros::when;

#[when(r#"the daily sweep runs on "{date}""#)]
fn sweep_runs(world: &mut ReviewWorld, date: String) -> Result<(), eyre::Report> {
    run_async(world.service.scheduler().sweep(morning_of(&date)?)).wrap_err("run sweep")?;
    Ok(())
}

#[when("the latest reminder is acknowledged")]
fn acknowledge_latest(world: &mut ReviewWorld) -> Result<(), eyre::Report> {
    let message_id = world
        .latest_message()
        .ok_or_else(|| eyre::eyre!("no reminder has been sent"))?;
    let result = run_async(
        world
            .service
            .acknowledge(ChatId::new(SCENARIO_CHAT), message_id),
    );
    if let Ok(ref archived) = result {
        world.last_archived = Some(archived.clone());
    }
    world.last_ack_result = Some(result);
    Ok(())
}

#[when(r#"the task "{name}" is updated with acceptance rate {rate:f64}"#)]
fn update_task(world: &mut ReviewWorld, name: String, rate: f64) -> Result<(), eyre::Report> {
    run_async(
        world
            .service
            .update_task(UpdateTaskRequest::new(SCENARIO_CHAT, name, rate)),
    )
    .wrap_err("update task")?;
    Ok(())
}

#[when(r#"the task "{name}" is deleted"#)]
fn delete_task(world: &mut ReviewWorld, name: String) -> Result<(), eyre::Report> {
    run_async(
        world
            .service
            .delete_task(ChatId::new(SCENARIO_CHAT), &name),
    )
    .wrap_err("delete task")?;
    Ok(())
}

#[when(r#"another task "{name}" is created"#)]
fn create_duplicate(world: &mut ReviewWorld, name: String) {
    let request = CreateTaskRequest::new(SCENARIO_CHAT, name, "2024-01-01", 1.0);
    world.last_create_result = Some(run_async(world.service.create_task(request)));
}
