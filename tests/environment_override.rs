// tests/environment_override.rs

mod common;
use crate::common::builders::Recorder;
use crate::common::init_tracing;

use std::error::Error;
use std::sync::Arc;

use taskpipe::environment::{self, Environment, DEVELOPMENT, PRODUCTION};
use taskpipe::task::{series, TaskContext, TaskRegistry};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn resolve_scenarios() {
    assert_eq!(environment::resolve(["--env=production"]), "production");
    assert_eq!(environment::resolve(["--foo"]), DEVELOPMENT);
}

#[tokio::test]
async fn override_task_changes_what_later_tasks_observe() -> TestResult {
    crate::common::with_timeout(async {
        init_tracing();

        let recorder = Recorder::new();
        let mut registry = TaskRegistry::new();

        let before = registry.register_leaf("before", recorder.env_probe("before"))?;
        let force = registry.register_leaf(
            "force-production",
            Arc::new(|ctx| {
                Box::pin(async move {
                    ctx.env().set(PRODUCTION);
                    Ok(())
                })
            }),
        )?;
        let after = registry.register_leaf("after", recorder.env_probe("after"))?;
        let all = registry.register_series("all", vec![before, force, after])?;

        let ctx = TaskContext::new(".", Environment::new(DEVELOPMENT));
        series::run(&all, ctx).await?;

        assert_eq!(
            recorder.executed(),
            vec!["before:development", "after:production"]
        );

        Ok(())
    })
    .await
}

#[tokio::test]
async fn completed_executions_are_unaffected_by_later_overrides() -> TestResult {
    crate::common::with_timeout(async {
        init_tracing();

        let recorder = Recorder::new();
        let mut registry = TaskRegistry::new();
        let probe = registry.register_leaf("probe", recorder.env_probe("probe"))?;

        // First pipeline execution, with its own context.
        let first = TaskContext::new(".", Environment::new(DEVELOPMENT));
        series::run(&probe, first).await?;

        // A fresh execution forcing production does not rewrite history.
        let second = TaskContext::new(".", Environment::new(DEVELOPMENT));
        second.env().set(PRODUCTION);
        series::run(&probe, second).await?;

        assert_eq!(
            recorder.executed(),
            vec!["probe:development", "probe:production"]
        );

        Ok(())
    })
    .await
}
