//! Async task status checks and polling.
//!
//! The poll loop has three exits that callers report differently:
//! a single check (`poll = false`), a terminal status, and a timeout.
//! A timeout is not a failure; the task is simply still running.

use std::time::{Duration, Instant};

use serde_json::{Map, Value};

use super::client::RpcClient;
use super::protocol::RpcResponse;
use super::transport::{Transport, TransportError};

/// Delay between two status checks.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Default upper bound for a poll loop.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Status values after which polling stops.
pub const TERMINAL_STATUSES: [&str; 4] = ["SUCCESS", "COMPLETED", "FAILED", "ERROR"];

/// Families of asynchronous tasks, each with its own status operation.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TaskFamily {
    /// OTTO SEO tasks
    #[default]
    Otto,
    /// PPC / Google Ads tasks
    Ppc,
}

impl TaskFamily {
    /// Tool owning the task operations for this family.
    pub fn tool(self) -> &'static str {
        match self {
            TaskFamily::Otto => "task_management",
            TaskFamily::Ppc => "task",
        }
    }

    /// `(tool, op)` used to check a task's status.
    pub fn status_call(self) -> (&'static str, &'static str) {
        match self {
            TaskFamily::Otto => ("task_management", "get_otto_task_status"),
            TaskFamily::Ppc => ("task", "get_otto_ppc_task_status"),
        }
    }
}

/// Poll loop configuration.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    pub poll: bool,
    pub timeout: Duration,
    pub interval: Duration,
}

/// How a status check or poll loop ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// Polling disabled: exactly one check, status not inspected for stopping.
    Checked { status: String, calls: usize },
    /// A terminal status was observed.
    Finished { status: String, calls: usize },
    /// Deadline reached while the task was still running.
    TimedOut { last_status: String, calls: usize },
}

impl PollOutcome {
    pub fn calls(&self) -> usize {
        match self {
            PollOutcome::Checked { calls, .. }
            | PollOutcome::Finished { calls, .. }
            | PollOutcome::TimedOut { calls, .. } => *calls,
        }
    }
}

/// Time source and sleeper for the poll loop.
pub trait Pacer {
    fn now(&self) -> Instant;
    fn sleep(&self, dur: Duration);
}

/// Wall clock + `thread::sleep`.
pub struct SystemPacer;

impl Pacer for SystemPacer {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, dur: Duration) {
        std::thread::sleep(dur);
    }
}

/// Extract the normalized (uppercased) task status from a response.
///
/// Reads `result[0].text`, parses it as JSON and takes `status`, falling back
/// to `state`. Anything malformed yields an empty string, which counts as
/// "still running".
pub fn extract_status(resp: &RpcResponse) -> String {
    let Some(text) = resp.first_text() else {
        return String::new();
    };
    let Ok(parsed) = serde_json::from_str::<Value>(text) else {
        return String::new();
    };
    let Some(obj) = parsed.as_object() else {
        return String::new();
    };
    let field = obj
        .get("status")
        .filter(|v| !v.is_null())
        .or_else(|| obj.get("state"));
    match field {
        Some(Value::String(s)) => s.to_uppercase(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string().to_uppercase(),
    }
}

/// Exact, case-insensitive match against the terminal status set.
pub fn is_terminal(status: &str) -> bool {
    TERMINAL_STATUSES
        .iter()
        .any(|t| t.eq_ignore_ascii_case(status))
}

/// Drives status checks for one task.
pub struct TaskPoller<'a, T: Transport, P: Pacer = SystemPacer> {
    client: &'a RpcClient<T>,
    pacer: P,
    family: TaskFamily,
    config: PollConfig,
}

impl<'a, T: Transport> TaskPoller<'a, T, SystemPacer> {
    pub fn new(client: &'a RpcClient<T>, family: TaskFamily, config: PollConfig) -> Self {
        Self::with_pacer(client, family, config, SystemPacer)
    }
}

impl<'a, T: Transport, P: Pacer> TaskPoller<'a, T, P> {
    pub fn with_pacer(
        client: &'a RpcClient<T>,
        family: TaskFamily,
        config: PollConfig,
        pacer: P,
    ) -> Self {
        Self {
            client,
            pacer,
            family,
            config,
        }
    }

    /// Run the check/poll loop for `task_id`.
    ///
    /// `observe` sees every response as it arrives, before the loop decides
    /// whether to continue. `on_wait` is told about each sleep.
    pub fn run(
        &self,
        task_id: &str,
        mut observe: impl FnMut(&RpcResponse),
        mut on_wait: impl FnMut(Duration),
    ) -> Result<PollOutcome, TransportError> {
        let (tool, op) = self.family.status_call();
        let started = self.pacer.now();
        let mut calls = 0usize;

        loop {
            let mut params = Map::new();
            params.insert("task_id".into(), Value::String(task_id.to_string()));
            let resp = self.client.call_tool(tool, op, params)?;
            calls += 1;
            observe(&resp);

            let status = extract_status(&resp);
            tracing::debug!(task_id, status = %status, calls, "task status");

            if !self.config.poll {
                return Ok(PollOutcome::Checked { status, calls });
            }
            if is_terminal(&status) {
                return Ok(PollOutcome::Finished { status, calls });
            }

            let elapsed = self.pacer.now().saturating_duration_since(started);
            let next = elapsed.checked_add(self.config.interval);
            if next.is_none_or(|next| next > self.config.timeout) {
                return Ok(PollOutcome::TimedOut {
                    last_status: status,
                    calls,
                });
            }

            on_wait(self.config.interval);
            self.pacer.sleep(self.config.interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::super::client::testing::{ScriptedTransport, status_response};
    use super::*;
    use serde_json::json;

    /// Virtual clock: `sleep` advances time instantly.
    struct FakePacer {
        base: Instant,
        offset: Cell<Duration>,
    }

    impl FakePacer {
        fn new() -> Self {
            Self {
                base: Instant::now(),
                offset: Cell::new(Duration::ZERO),
            }
        }
    }

    impl Pacer for &FakePacer {
        fn now(&self) -> Instant {
            self.base + self.offset.get()
        }

        fn sleep(&self, dur: Duration) {
            self.offset.set(self.offset.get() + dur);
        }
    }

    fn config(poll: bool, timeout: u64, interval: u64) -> PollConfig {
        PollConfig {
            poll,
            timeout: Duration::from_secs(timeout),
            interval: Duration::from_secs(interval),
        }
    }

    #[test]
    fn single_check_ignores_status() {
        let client = RpcClient::new(ScriptedTransport::new(vec![status_response("RUNNING")]));
        let pacer = FakePacer::new();
        let poller = TaskPoller::with_pacer(&client, TaskFamily::Otto, config(false, 120, 5), &pacer);

        let outcome = poller.run("t-1", |_| {}, |_| {}).unwrap();
        assert_eq!(
            outcome,
            PollOutcome::Checked {
                status: "RUNNING".into(),
                calls: 1
            }
        );
        assert_eq!(client.transport_calls(), 1);
    }

    #[test]
    fn single_check_with_terminal_status_is_still_one_call() {
        let client = RpcClient::new(ScriptedTransport::new(vec![status_response("success")]));
        let pacer = FakePacer::new();
        let poller = TaskPoller::with_pacer(&client, TaskFamily::Ppc, config(false, 120, 5), &pacer);
        let outcome = poller.run("t-1", |_| {}, |_| {}).unwrap();
        assert!(matches!(outcome, PollOutcome::Checked { calls: 1, .. }));
    }

    #[test]
    fn polls_until_terminal_status() {
        let client = RpcClient::new(ScriptedTransport::new(vec![
            status_response("RUNNING"),
            status_response("SUCCESS"),
        ]));
        let pacer = FakePacer::new();
        let poller = TaskPoller::with_pacer(&client, TaskFamily::Otto, config(true, 120, 5), &pacer);

        let mut seen = 0;
        let outcome = poller.run("t-1", |_| seen += 1, |_| {}).unwrap();
        assert_eq!(
            outcome,
            PollOutcome::Finished {
                status: "SUCCESS".into(),
                calls: 2
            }
        );
        assert_eq!(seen, 2, "every response is surfaced");
        assert_eq!(client.transport_calls(), 2);
    }

    #[test]
    fn short_timeout_stops_after_first_check() {
        let client = RpcClient::new(ScriptedTransport::new(vec![status_response("RUNNING")]));
        let pacer = FakePacer::new();
        let poller = TaskPoller::with_pacer(&client, TaskFamily::Otto, config(true, 1, 5), &pacer);

        let outcome = poller.run("t-1", |_| {}, |_| {}).unwrap();
        assert_eq!(
            outcome,
            PollOutcome::TimedOut {
                last_status: "RUNNING".into(),
                calls: 1
            }
        );
        assert_eq!(pacer.offset.get(), Duration::ZERO, "no sleep past the deadline");
    }

    #[test]
    fn timeout_never_overshoots_by_more_than_one_interval() {
        let client = RpcClient::new(ScriptedTransport::new(vec![status_response("PENDING")]));
        let pacer = FakePacer::new();
        let timeout = 23;
        let interval = 5;
        let poller = TaskPoller::with_pacer(
            &client,
            TaskFamily::Otto,
            config(true, timeout, interval),
            &pacer,
        );

        let outcome = poller.run("t-1", |_| {}, |_| {}).unwrap();
        let elapsed = pacer.offset.get();
        assert!(matches!(outcome, PollOutcome::TimedOut { .. }));
        assert!(elapsed <= Duration::from_secs(timeout + interval));
        // checks at 0, 5, 10, 15, 20; a sixth at 25 would pass 23s
        assert_eq!(outcome.calls(), 5);
        assert_eq!(elapsed, Duration::from_secs(20));
    }

    /// Clock that moves forward on every read, like a slow server.
    struct TickPacer {
        base: Instant,
        ticks: Cell<u32>,
    }

    impl Pacer for &TickPacer {
        fn now(&self) -> Instant {
            self.ticks.set(self.ticks.get() + 1);
            self.base + Duration::from_millis(1500) * self.ticks.get()
        }

        fn sleep(&self, _dur: Duration) {}
    }

    #[test]
    fn huge_interval_times_out_instead_of_overflowing() {
        let client = RpcClient::new(ScriptedTransport::new(vec![status_response("RUNNING")]));
        let pacer = TickPacer {
            base: Instant::now(),
            ticks: Cell::new(0),
        };
        let cfg = PollConfig {
            poll: true,
            timeout: Duration::from_secs(120),
            interval: Duration::from_secs(u64::MAX),
        };
        let poller = TaskPoller::with_pacer(&client, TaskFamily::Otto, cfg, &pacer);

        let outcome = poller.run("t-1", |_| {}, |_| {}).unwrap();
        assert!(matches!(outcome, PollOutcome::TimedOut { calls: 1, .. }));
    }

    #[test]
    fn malformed_payload_keeps_polling_until_timeout() {
        let client = RpcClient::new(ScriptedTransport::new(vec![
            json!({"result":[{"text":"not json at all"}]}),
        ]));
        let pacer = FakePacer::new();
        let poller = TaskPoller::with_pacer(&client, TaskFamily::Otto, config(true, 10, 5), &pacer);

        let mut waits = 0;
        let outcome = poller.run("t-1", |_| {}, |_| waits += 1).unwrap();
        assert_eq!(
            outcome,
            PollOutcome::TimedOut {
                last_status: String::new(),
                calls: 3
            }
        );
        assert_eq!(waits, 2);
    }

    #[test]
    fn status_call_uses_family_operation() {
        let client = RpcClient::new(ScriptedTransport::new(vec![status_response("FAILED")]));
        let pacer = FakePacer::new();
        let poller = TaskPoller::with_pacer(&client, TaskFamily::Ppc, config(true, 60, 5), &pacer);
        let outcome = poller.run("abc", |_| {}, |_| {}).unwrap();
        assert!(matches!(outcome, PollOutcome::Finished { ref status, .. } if status == "FAILED"));

        let sent = client.transport_sent();
        assert_eq!(sent[0]["name"], "task");
        assert_eq!(sent[0]["arguments"]["op"], "get_otto_ppc_task_status");
        assert_eq!(sent[0]["arguments"]["params"], json!({"task_id": "abc"}));
    }

    #[test]
    fn extract_status_normalizes_case() {
        let resp: RpcResponse =
            serde_json::from_value(json!({"id":1,"result":[{"text":"{\"status\":\"success\"}"}]}))
                .unwrap();
        assert_eq!(extract_status(&resp), "SUCCESS");
    }

    #[test]
    fn extract_status_falls_back_to_state() {
        let resp: RpcResponse =
            serde_json::from_value(json!({"result":[{"text":"{\"state\":\"completed\"}"}]}))
                .unwrap();
        assert_eq!(extract_status(&resp), "COMPLETED");
    }

    #[test]
    fn extract_status_is_defensive() {
        for body in [
            json!({"result": []}),
            json!({"result": {"status": "SUCCESS"}}),
            json!({"result": [{"text": "SUCCESS"}]}),
            json!({"result": [{"text": "[1,2]"}]}),
            json!({"result": [{"no_text": true}]}),
            json!({"error": {"code": 1, "message": "boom"}}),
        ] {
            let resp: RpcResponse = serde_json::from_value(body).unwrap();
            assert_eq!(extract_status(&resp), "");
        }
    }

    #[test]
    fn terminal_set_is_exact() {
        assert!(is_terminal("SUCCESS"));
        assert!(is_terminal("completed"));
        assert!(is_terminal("Error"));
        assert!(!is_terminal("SUCCESSFUL"));
        assert!(!is_terminal(""));
        assert!(!is_terminal("RUNNING"));
    }
}
