//! Contract tests for the session controller

#![cfg(unix)]

#[path = "../test_utils/mod.rs"]
mod test_utils;

use hanlua::{Error, OutputEvent, RunState, Session, StopOutcome};
use std::path::Path;
use test_utils::{stub_interpreter, TestEnv};

/// Stub that records each invocation in `marker` before blocking
fn counting_interpreter(env: &TestEnv, marker: &Path) -> std::path::PathBuf {
    stub_interpreter(
        env.path(),
        "lua",
        &format!(
            "echo run >> '{}'; echo ready; exec sleep 30",
            marker.display()
        ),
    )
}

fn invocations(marker: &Path) -> usize {
    std::fs::read_to_string(marker)
        .map(|s| s.lines().count())
        .unwrap_or(0)
}

#[tokio::test]
async fn test_second_run_rejected_without_spawn() {
    let env = TestEnv::new();
    let marker = env.path().join("invocations");
    let mut session = Session::new(env.config(counting_interpreter(&env, &marker)));

    session.translate("출력(1)");
    let mut events = session.run().unwrap();
    assert_eq!(
        events.recv().await,
        Some(OutputEvent::Stdout("ready\n".to_string()))
    );
    let first_id = session.active_run_id().map(str::to_string);

    assert!(matches!(session.run(), Err(Error::AlreadyRunning)));
    assert_eq!(invocations(&marker), 1);
    assert_eq!(session.active_run_id().map(str::to_string), first_id);

    session.stop();
    events.collect().await;
    assert_eq!(invocations(&marker), 1);
}

#[tokio::test]
async fn test_stop_forwarded_to_active_run() {
    let env = TestEnv::new();
    let marker = env.path().join("invocations");
    let mut session = Session::new(env.config(counting_interpreter(&env, &marker)));

    session.translate("출력(1)");
    let mut events = session.run().unwrap();
    events.recv().await;
    assert_eq!(session.status(), RunState::Running);

    assert_eq!(session.stop(), StopOutcome::Requested);
    assert_eq!(session.wait().await, RunState::Stopped);
    assert_eq!(events.collect().await.last(), Some(&OutputEvent::Completed));
    assert!(session.active_run_id().is_none());
}

#[tokio::test]
async fn test_run_again_after_completion() {
    let env = TestEnv::new();
    let lua = stub_interpreter(env.path(), "lua", "cat \"$1\"");
    let mut session = Session::new(env.config(lua));

    session.translate("출력(참)");
    let first = session.run().unwrap().collect().await;
    assert_eq!(first[0], OutputEvent::Stdout("print(true)".to_string()));

    session.translate("출력(거짓)");
    let second = session.run().unwrap().collect().await;
    assert_eq!(second[0], OutputEvent::Stdout("print(false)".to_string()));
    assert_eq!(session.status(), RunState::Completed);
}

#[tokio::test]
async fn test_run_uses_latest_translation() {
    let env = TestEnv::new();
    let lua = stub_interpreter(env.path(), "lua", "cat \"$1\"");
    let mut session = Session::new(env.config(lua));

    session.translate("출력(1)");
    session.translate("돌려주기 참\n");
    let events = session.run().unwrap().collect().await;

    assert_eq!(events[0], OutputEvent::Stdout("return true\n".to_string()));
}

#[tokio::test]
async fn test_status_transitions() {
    let env = TestEnv::new();
    let lua = stub_interpreter(env.path(), "lua", "exit 0");
    let mut session = Session::new(env.config(lua));
    assert_eq!(session.status(), RunState::Idle);

    session.translate("출력(1)");
    let events = session.run().unwrap();
    assert!(session.status().is_active() || session.status().is_terminal());

    events.collect().await;
    assert_eq!(session.status(), RunState::Completed);
}

#[tokio::test]
async fn test_set_interpreter_applies_to_next_run() {
    let env = TestEnv::new();
    let first = stub_interpreter(env.path(), "first", "echo first");
    let second = stub_interpreter(env.path(), "second", "echo second");
    let mut session = Session::new(env.config(first));

    session.translate("출력(1)");
    let events = session.run().unwrap().collect().await;
    assert_eq!(events[0], OutputEvent::Stdout("first\n".to_string()));

    session.set_interpreter(second);
    let events = session.run().unwrap().collect().await;
    assert_eq!(events[0], OutputEvent::Stdout("second\n".to_string()));
}
