//! Given steps for review reminder BDD scenarios.

use super::world::{ReviewWorld, SCENARIO_CHAT, morning_of, run_async};
use eyre::WrapErr;
use revisit::review::services::CreateTaskRequest;
use rstest_bdd_macros::given;

#[given(r#"today is "{date}""#)]
fn today_is(world: &mut ReviewWorld, date: String) -> Result<(), eyre::Report> {
    world.clock.set(morning_of(&date)?);
    Ok(())
}

#[given(r#"a task "{name}" last reviewed on "{date}" with acceptance rate {rate:f64}"#)]
fn task_exists(
    world: &mut ReviewWorld,
    name: String,
    date: String,
    rate: f64,
) -> Result<(), eyre::Report> {
    let request = CreateTaskRequest::new(SCENARIO_CHAT, name, date, rate);
    run_async(world.service.create_task(request)).wrap_err("create task for scenario setup")?;
    Ok(())
}

#[given(r#"the daily sweep has run on "{date}""#)]
fn sweep_has_run(world: &mut ReviewWorld, date: String) -> Result<(), eyre::Report> {
    let report = run_async(world.service.scheduler().sweep(morning_of(&date)?))
        .wrap_err("sweep in scenario setup")?;
    eyre::ensure!(report.dispatched == 1, "setup sweep sent {report:?}");
    Ok(())
}
