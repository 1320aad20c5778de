#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use aarchup::config::{Config, RunMode};
use aarchup::error::{Error, ExecError, NotifyError};
use aarchup::exec::{CommandRunner, ShellRunner};
use aarchup::notify::{Content, Delivery, NotifyBackend};
use aarchup::scheduler::Scheduler;
use aarchup::types::Urgency;
use tokio::time::{Instant, timeout};

/// Hands out scripted outputs per command and records when each ran.
#[derive(Clone, Default)]
struct Script {
    outputs: Arc<Mutex<VecDeque<&'static str>>>,
    calls: Arc<Mutex<Vec<(String, Instant)>>>,
}

impl Script {
    fn with(outputs: &[&'static str]) -> Self {
        Self {
            outputs: Arc::new(Mutex::new(outputs.iter().copied().collect())),
            calls: Arc::default(),
        }
    }

    fn calls(&self) -> Vec<(String, Instant)> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for Script {
    async fn capture(&self, command: &str) -> Result<String, ExecError> {
        self.calls
            .lock()
            .unwrap()
            .push((command.to_string(), Instant::now()));
        Ok(self
            .outputs
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or("")
            .to_string())
    }
}

/// Backend whose `show` fails according to a script; counts every call.
#[derive(Default)]
struct Recorder {
    initialized: bool,
    show_failures: VecDeque<bool>,
    close_fails: bool,
    log: Vec<&'static str>,
    bodies: Vec<String>,
}

impl NotifyBackend for Recorder {
    type Handle = ();

    fn init(&mut self, _appname: &str) {
        self.initialized = true;
        self.log.push("init");
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn uninit(&mut self) {
        self.initialized = false;
        self.log.push("uninit");
    }

    fn create(&mut self, content: &Content<'_>) -> Self::Handle {
        self.bodies.push(content.body.to_string());
        self.log.push("create");
    }

    fn update(&mut self, _handle: &mut (), content: &Content<'_>) {
        self.bodies.push(content.body.to_string());
        self.log.push("update");
    }

    fn set_timeout(&mut self, _handle: &mut (), _timeout: Duration) {}

    fn set_category(&mut self, _handle: &mut (), _category: &str) {}

    fn set_urgency(&mut self, _handle: &mut (), _urgency: Urgency) {}

    fn show(&mut self, _handle: &mut ()) -> Result<(), NotifyError> {
        self.log.push("show");
        if self.show_failures.pop_front().unwrap_or(false) {
            return Err(NotifyError::Show {
                message: "session bus restarted".to_string(),
            });
        }
        Ok(())
    }

    fn close(&mut self, _handle: &mut ()) -> Result<(), NotifyError> {
        self.log.push("close");
        if self.close_fails {
            return Err(NotifyError::Close {
                message: "notification already gone".to_string(),
            });
        }
        Ok(())
    }
}

fn looping(interval: u64, force_close: Option<u64>) -> Config {
    Config {
        mode: RunMode::Loop {
            interval: Duration::from_secs(interval),
            force_close: force_close.map(Duration::from_secs),
        },
        ..Config::default()
    }
}

fn offsets(calls: &[(String, Instant)]) -> Vec<u64> {
    let start = calls[0].1;
    calls
        .iter()
        .map(|(_, at)| at.duration_since(start).as_secs())
        .collect()
}

#[tokio::test(start_paused = true)]
async fn cycles_start_one_interval_apart_with_force_close() {
    let script = Script::with(&["pkg 1->2\n", "pkg 1->2\n", "pkg 1->2\n"]);
    let mut scheduler =
        Scheduler::new(looping(3600, Some(300)), script.clone(), Recorder::default());

    let ended = timeout(Duration::from_secs(2 * 3600 + 1), scheduler.run()).await;
    assert!(ended.is_err(), "loop mode must keep running");

    assert_eq!(offsets(&script.calls()), [0, 3600, 7200]);
    // The third cycle is still inside its force-close delay when time runs out.
    let log = &scheduler.deliverer().backend().log;
    assert_eq!(log.iter().filter(|c| **c == "close").count(), 2);
}

#[tokio::test(start_paused = true)]
async fn cycles_start_one_interval_apart_without_force_close() {
    let script = Script::with(&["pkg 1->2\n"]);
    let mut scheduler = Scheduler::new(looping(600, None), script.clone(), Recorder::default());

    let _ = timeout(Duration::from_secs(3 * 600 + 1), scheduler.run()).await;

    assert_eq!(offsets(&script.calls()), [0, 600, 1200, 1800]);
}

#[tokio::test(start_paused = true)]
async fn one_shot_runs_a_single_cycle() {
    let script = Script::with(&["pkg 1->2\n"]);
    let mut scheduler = Scheduler::new(Config::default(), script.clone(), Recorder::default());

    scheduler.run().await.unwrap();

    assert_eq!(script.calls().len(), 1);
    assert_eq!(
        scheduler.deliverer().backend().log,
        ["init", "create", "show"]
    );
}

#[tokio::test(start_paused = true)]
async fn one_shot_ends_even_when_delivery_fails() {
    let backend = Recorder {
        show_failures: VecDeque::from([true, true]),
        ..Recorder::default()
    };
    let mut scheduler = Scheduler::new(Config::default(), Script::with(&["pkg\n"]), backend);

    let report = scheduler.run_cycle().await.unwrap();
    assert!(matches!(report.delivery, Delivery::Failed(_)));
    assert_eq!(
        scheduler.deliverer().backend().log,
        ["init", "create", "show", "uninit", "init", "create", "show"]
    );
}

#[tokio::test(start_paused = true)]
async fn failed_delivery_skips_force_close() {
    let backend = Recorder {
        show_failures: VecDeque::from([true, true]),
        ..Recorder::default()
    };
    let mut scheduler =
        Scheduler::new(looping(3600, Some(300)), Script::with(&["pkg\n"]), backend);

    let report = scheduler.run_cycle().await.unwrap();
    assert_eq!(report.offset, Duration::ZERO);
    assert_eq!(
        scheduler.next_sleep(report.offset),
        Some(Duration::from_secs(3600))
    );
    assert!(!scheduler.deliverer().backend().log.contains(&"close"));
}

#[tokio::test(start_paused = true)]
async fn updates_then_none_closes_the_notification() {
    let script = Script::with(&["pkg 1->2\n", ""]);
    let mut scheduler = Scheduler::new(looping(60, None), script, Recorder::default());

    let first = scheduler.run_cycle().await.unwrap();
    let second = scheduler.run_cycle().await.unwrap();
    let third = scheduler.run_cycle().await.unwrap();

    assert_eq!(first.delivery, Delivery::Shown);
    assert_eq!(second.delivery, Delivery::ClosedStale);
    assert_eq!(third.delivery, Delivery::Idle);
    assert!(!scheduler.deliverer().has_handle());
}

#[tokio::test(start_paused = true)]
async fn aur_command_runs_only_when_enabled() {
    let mut config = Config::default();
    config.aur.enabled = true;
    config.aur.command = "auracle sync".to_string();
    let script = Script::with(&["linux 6.1->6.2\n", "yay 12->13\n"]);
    let mut scheduler = Scheduler::new(config, script.clone(), Recorder::default());

    scheduler.run_cycle().await.unwrap();

    let commands: Vec<String> = script.calls().into_iter().map(|(c, _)| c).collect();
    assert_eq!(commands, ["/usr/bin/checkupdates", "auracle sync"]);
    insta::assert_snapshot!(scheduler.deliverer().backend().bodies[0].as_str(), @r"
    There are updates for:
    linux 6.1->6.2
    AUR updates:
    yay 12->13
    ");
}

#[tokio::test(start_paused = true)]
async fn failed_force_close_keeps_the_cycle_timing() {
    let backend = Recorder {
        close_fails: true,
        ..Recorder::default()
    };
    let script = Script::with(&["pkg 1->2\n", "pkg 1->3\n"]);
    let mut scheduler = Scheduler::new(looping(3600, Some(300)), script, backend);

    let first = scheduler.run_cycle().await.unwrap();
    assert_eq!(first.delivery, Delivery::Shown);
    assert_eq!(first.offset, Duration::from_secs(300));
    assert_eq!(
        scheduler.next_sleep(first.offset),
        Some(Duration::from_secs(3300))
    );

    let second = scheduler.run_cycle().await.unwrap();
    assert_eq!(second.delivery, Delivery::Shown);
    assert_eq!(second.offset, Duration::from_secs(300));
    assert_eq!(
        scheduler.deliverer().backend().log,
        ["init", "create", "show", "close", "update", "show", "close"]
    );
}

#[tokio::test]
async fn scheduler_runs_on_its_own_task() {
    let script = Script::with(&["pkg 1->2\n"]);
    let mut scheduler = Scheduler::new(Config::default(), script, Recorder::default());

    let task = tokio::spawn(async move {
        let res = scheduler.run().await;
        (res, scheduler.deliverer().backend().log.clone())
    });
    let (res, log) = task.await.unwrap();
    res.unwrap();
    assert_eq!(log, ["init", "create", "show"]);
}

#[tokio::test]
async fn spawn_failure_ends_the_loop_with_an_error() {
    let config = looping(3600, None);
    let runner = ShellRunner::new("/nonexistent/sh");
    let mut scheduler = Scheduler::new(config, runner, Recorder::default());

    let err = scheduler.run().await.unwrap_err();
    assert!(matches!(err, Error::Exec(ExecError::Spawn { .. })));
    assert!(scheduler.deliverer().backend().log.is_empty());
}

#[tokio::test]
async fn shell_commands_feed_the_digest() {
    let config = Config {
        update_command: "printf 'a 1->2\\nb 1->2\\nc 1->2\\n'; exit 2".to_string(),
        max_lines: 3,
        ..Config::default()
    };
    let mut scheduler = Scheduler::new(config, ShellRunner::default(), Recorder::default());

    let report = scheduler.run_cycle().await.unwrap();
    assert_eq!(report.delivery, Delivery::Shown);
    assert_eq!(
        scheduler.deliverer().backend().bodies,
        ["There are updates for:\na 1->2\nb 1->2"]
    );
}
