#![cfg(unix)]

use datapublic_common::{FailurePolicy, StepSpec};
use datapublic_orchestrator::{CommandStep, Runnable, StepFailure, UpdateRunner};

#[tokio::test]
async fn zero_exit_is_success() {
    let step = CommandStep::new("ok", "sh", &["-c", "exit 0"]);
    assert_eq!(step.run().await, Ok(()));
}

#[tokio::test]
async fn non_zero_exit_reports_code() {
    let step = CommandStep::new("bad", "sh", &["-c", "exit 3"]);
    assert_eq!(step.run().await, Err(StepFailure::Exit { code: 3 }));
}

#[tokio::test]
async fn missing_program_is_spawn_failure() {
    let step = CommandStep::new("ghost", "/nonexistent/update_nothing.py", &[]);
    match step.run().await {
        Err(StepFailure::Spawn { message }) => {
            assert!(message.contains("/nonexistent/update_nothing.py"), "{message}")
        }
        other => panic!("expected spawn failure, got {other:?}"),
    }
}

#[tokio::test]
async fn killed_process_is_signal_failure() {
    let step = CommandStep::new("killed", "sh", &["-c", "kill -9 $$"]);
    assert_eq!(step.run().await, Err(StepFailure::Signal));
}

#[tokio::test]
async fn env_and_working_dir_are_applied() {
    let dir = tempfile::tempdir().unwrap();
    let step = CommandStep::new(
        "writer",
        "sh",
        &["-c", "printf '%s' \"$DATA_SOURCE\" > marker.txt"],
    )
    .working_dir(dir.path())
    .env("DATA_SOURCE", "nytimes");

    step.run().await.unwrap();

    let written = std::fs::read_to_string(dir.path().join("marker.txt")).unwrap();
    assert_eq!(written, "nytimes");
}

#[tokio::test]
async fn runner_from_specs_executes_real_processes_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("order.log");
    let append = |name: &str, policy: FailurePolicy, exit: i32| {
        let script = format!("echo {name} >> \"$ORDER_LOG\"; exit {exit}");
        let mut spec = StepSpec::new(name, "sh", &["-c", script.as_str()], policy);
        spec.env
            .insert("ORDER_LOG".to_string(), log.display().to_string());
        spec
    };

    let specs = vec![
        append("first", FailurePolicy::AbortOnFailure, 0),
        append("flaky", FailurePolicy::WarnAndContinue, 1),
        append("fatal", FailurePolicy::AbortOnFailure, 4),
        append("unreached", FailurePolicy::AbortOnFailure, 0),
    ];

    let result = UpdateRunner::from_specs(&specs).run().await;

    assert!(result.is_err());
    let order = std::fs::read_to_string(&log).unwrap();
    assert_eq!(order.lines().collect::<Vec<_>>(), ["first", "flaky", "fatal"]);
}
