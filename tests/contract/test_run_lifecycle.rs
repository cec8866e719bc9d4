//! Contract tests for a single interpreter run
//!
//! Stub interpreters stand in for Lua so the tests control timing and
//! output exactly.

#![cfg(unix)]

#[path = "../test_utils/mod.rs"]
mod test_utils;

use hanlua::{OutputEvent, RunState, Session, StopOutcome};
use std::time::{Duration, Instant};
use test_utils::{stub_interpreter, TestEnv};

fn stdout(text: &str) -> OutputEvent {
    OutputEvent::Stdout(text.to_string())
}

#[tokio::test]
async fn test_output_delivered_in_order() {
    let env = TestEnv::new();
    let lua = stub_interpreter(env.path(), "lua", "echo A; sleep 0.2; echo B");
    let mut session = Session::new(env.config(lua));

    session.translate("출력(\"A\")");
    let events = session.run().unwrap().collect().await;

    assert_eq!(events, vec![stdout("A\n"), stdout("B\n"), OutputEvent::Completed]);
    assert_eq!(session.status(), RunState::Completed);
}

#[tokio::test]
async fn test_output_arrives_while_running() {
    let env = TestEnv::new();
    let lua = stub_interpreter(env.path(), "lua", "echo A; sleep 1; echo B");
    let mut session = Session::new(env.config(lua));

    session.translate("출력(1)");
    let started = Instant::now();
    let mut events = session.run().unwrap();

    assert_eq!(events.recv().await, Some(stdout("A\n")));
    assert!(started.elapsed() < Duration::from_millis(900));
    assert_eq!(session.status(), RunState::Running);

    assert_eq!(events.recv().await, Some(stdout("B\n")));
    assert_eq!(events.recv().await, Some(OutputEvent::Completed));
    assert_eq!(events.recv().await, None);
}

#[tokio::test]
async fn test_completed_is_always_last() {
    let env = TestEnv::new();
    let lua = stub_interpreter(env.path(), "lua", "echo out; echo err >&2; exit 3");
    let mut session = Session::new(env.config(lua));

    session.translate("출력(1)");
    let events = session.run().unwrap().collect().await;

    let completed: Vec<_> = events.iter().filter(|e| e.is_completed()).collect();
    assert_eq!(completed.len(), 1);
    assert_eq!(events.last(), Some(&OutputEvent::Completed));
    assert_eq!(events[1], OutputEvent::Stderr("err\n".to_string()));
}

#[tokio::test]
async fn test_script_removed_after_normal_exit() {
    let env = TestEnv::new();
    let lua = stub_interpreter(env.path(), "lua", "cat \"$1\"");
    let mut session = Session::new(env.config(lua));

    session.translate("출력(참)\n");
    let events = session.run().unwrap().collect().await;

    assert_eq!(events[0], stdout("print(true)\n"));
    assert_eq!(env.scripts_left(), 0);
}

#[tokio::test]
async fn test_script_removed_after_stop() {
    let env = TestEnv::new();
    let lua = stub_interpreter(env.path(), "lua", "echo ready; exec sleep 30");
    let mut session = Session::new(env.config(lua));

    session.translate("동안 참 하기 끝");
    let mut events = session.run().unwrap();
    assert_eq!(events.recv().await, Some(stdout("ready\n")));
    assert_eq!(env.scripts_left(), 1);

    assert_eq!(session.stop(), StopOutcome::Requested);
    let rest = tokio::time::timeout(Duration::from_secs(10), events.collect())
        .await
        .expect("stopped run should complete");

    assert_eq!(rest.last(), Some(&OutputEvent::Completed));
    assert_eq!(session.status(), RunState::Stopped);
    assert_eq!(env.scripts_left(), 0);
}

#[tokio::test]
async fn test_script_removed_after_spawn_failure() {
    let env = TestEnv::new();
    let mut session = Session::new(env.config(env.path().join("missing-lua")));

    session.translate("출력(1)");
    let events = session.run().unwrap().collect().await;

    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], OutputEvent::Stderr(_)));
    assert_eq!(session.status(), RunState::Failed);
    assert_eq!(env.scripts_left(), 0);
}

#[tokio::test]
async fn test_stop_twice_is_noop() {
    let env = TestEnv::new();
    let lua = stub_interpreter(env.path(), "lua", "echo ready; exec sleep 30");
    let mut session = Session::new(env.config(lua));

    session.translate("출력(1)");
    let mut events = session.run().unwrap();
    events.recv().await;

    assert_eq!(session.stop(), StopOutcome::Requested);
    assert_eq!(session.stop(), StopOutcome::NothingToStop);

    events.collect().await;
    assert_eq!(session.stop(), StopOutcome::NothingToStop);
}

#[tokio::test]
async fn test_stop_while_starting() {
    let env = TestEnv::new();
    let lua = stub_interpreter(env.path(), "lua", "echo ready; exec sleep 30");
    let mut session = Session::new(env.config(lua));

    session.translate("동안 참 하기 끝");
    let events = session.run().unwrap();
    assert_eq!(session.stop(), StopOutcome::Requested);

    let events = tokio::time::timeout(Duration::from_secs(10), events.collect())
        .await
        .expect("stop requested while starting should still end the run");

    assert_eq!(events.last(), Some(&OutputEvent::Completed));
    assert_eq!(session.status(), RunState::Stopped);
    assert_eq!(env.scripts_left(), 0);
}

#[tokio::test]
async fn test_dropped_session_terminates_interpreter() {
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    let env = TestEnv::new();
    let pid_file = env.path().join("pid");
    let lua = stub_interpreter(
        env.path(),
        "lua",
        &format!("echo $$ > '{}'; echo ready; exec sleep 30", pid_file.display()),
    );
    let mut session = Session::new(env.config(lua));

    session.translate("동안 참 하기 끝");
    let mut events = session.run().unwrap();
    assert_eq!(events.recv().await, Some(stdout("ready\n")));

    let pid: i32 = std::fs::read_to_string(&pid_file)
        .unwrap()
        .trim()
        .parse()
        .unwrap();
    drop(session);
    drop(events);

    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        let alive = kill(Pid::from_raw(pid), None).is_ok();
        if !alive && env.scripts_left() == 0 {
            break;
        }
        assert!(
            Instant::now() < deadline,
            "interpreter alive: {}, scripts left: {}",
            alive,
            env.scripts_left()
        );
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_state_terminal_once_completed_arrives() {
    let env = TestEnv::new();
    let lua = stub_interpreter(env.path(), "lua", "exit 0");
    let mut session = Session::new(env.config(lua));
    session.translate("출력(1)");

    for _ in 0..20 {
        let mut events = session.run().unwrap();
        while let Some(event) = events.recv().await {
            if event.is_completed() {
                assert!(session.status().is_terminal());
            }
        }
    }
}

#[tokio::test]
async fn test_start_time_recorded() {
    let env = TestEnv::new();
    let lua = stub_interpreter(env.path(), "lua", "exit 0");
    let mut session = Session::new(env.config(lua));
    session.translate("출력(1)");

    let before = chrono::Local::now();
    session.run().unwrap().collect().await;
    let started = session.started_at().unwrap();

    assert!(started >= before);
    assert!(started <= chrono::Local::now());
}
