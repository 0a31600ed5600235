// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Shared fakes for runner tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use gantry_runner::{
    Application, LogSink, Reclaim, Request, Resettable, Response, Transport, TransportError,
    WaitOutcome,
};

/// Transport that replays a scripted sequence of wait outcomes. An
/// exhausted script behaves like a closed relay.
pub struct ScriptedTransport {
    script: VecDeque<WaitOutcome>,
    sent: Arc<Mutex<Vec<Response>>>,
    polls: Arc<AtomicUsize>,
    fail_respond: bool,
}

impl ScriptedTransport {
    pub fn new(script: Vec<WaitOutcome>) -> Self {
        Self {
            script: script.into(),
            sent: Arc::new(Mutex::new(Vec::new())),
            polls: Arc::new(AtomicUsize::new(0)),
            fail_respond: false,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn failing_respond(mut self) -> Self {
        self.fail_respond = true;
        self
    }

    /// Handle to the responses transmitted so far.
    pub fn sent(&self) -> Arc<Mutex<Vec<Response>>> {
        self.sent.clone()
    }

    /// Handle to the wait-request call counter.
    pub fn polls(&self) -> Arc<AtomicUsize> {
        self.polls.clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn wait_request(&mut self) -> WaitOutcome {
        self.polls.fetch_add(1, Ordering::SeqCst);
        self.script.pop_front().unwrap_or(WaitOutcome::Closed)
    }

    async fn respond(&mut self, response: &Response) -> Result<(), TransportError> {
        self.sent.lock().unwrap().push(response.clone());
        if self.fail_respond {
            Err(TransportError::Relay("scripted send failure".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Per-request flag a handler sets and the state resetter must clear.
#[derive(Default)]
pub struct RequestFlag {
    pub value: AtomicBool,
}

impl Resettable for RequestFlag {
    fn reset(&self) {
        self.value.store(false, Ordering::SeqCst);
    }
}

/// Resettable probe recording the reclaim counter at each reset, to pin
/// the reset-before-reclaim ordering.
pub struct ResetProbe {
    reclaim: Arc<Reclaim>,
    pub runs_at_reset: Mutex<Vec<u64>>,
}

impl ResetProbe {
    pub fn new(reclaim: Arc<Reclaim>) -> Arc<Self> {
        Arc::new(Self {
            reclaim,
            runs_at_reset: Mutex::new(Vec::new()),
        })
    }
}

impl Resettable for ResetProbe {
    fn reset(&self) {
        self.runs_at_reset
            .lock()
            .unwrap()
            .push(self.reclaim.runs());
    }
}

/// Application fake counting lifecycle calls and recording event order.
///
/// Requests to `/boom` fail in the handler. The flag is set during every
/// dispatch; its value at dispatch entry is recorded so tests can prove
/// state was reset between requests. `after_emit` records the flag and
/// reclaim counter to pin the hook-before-reset-before-reclaim ordering.
pub struct CountingApp {
    pub started: AtomicUsize,
    pub handled: AtomicUsize,
    pub shutdowns: AtomicUsize,
    pub fail_start: AtomicBool,
    pub fail_after_emit: AtomicBool,
    pub events: Mutex<Vec<String>>,
    pub flag_at_dispatch: Mutex<Vec<bool>>,
    pub emit_probe: Mutex<Vec<(bool, u64)>>,
    flag: Arc<RequestFlag>,
    reclaim: Arc<Reclaim>,
}

impl CountingApp {
    pub fn new(flag: Arc<RequestFlag>, reclaim: Arc<Reclaim>) -> Arc<Self> {
        Arc::new(Self {
            started: AtomicUsize::new(0),
            handled: AtomicUsize::new(0),
            shutdowns: AtomicUsize::new(0),
            fail_start: AtomicBool::new(false),
            fail_after_emit: AtomicBool::new(false),
            events: Mutex::new(Vec::new()),
            flag_at_dispatch: Mutex::new(Vec::new()),
            emit_probe: Mutex::new(Vec::new()),
            flag,
            reclaim,
        })
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, event: &str) -> usize {
        self.events().iter().filter(|e| e.as_str() == event).count()
    }
}

#[async_trait]
impl Application for CountingApp {
    async fn start(&self) -> anyhow::Result<()> {
        self.started.fetch_add(1, Ordering::SeqCst);
        self.events.lock().unwrap().push("start".to_string());
        if self.fail_start.load(Ordering::SeqCst) {
            anyhow::bail!("startup hook exploded");
        }
        Ok(())
    }

    async fn handle(&self, request: &Request) -> anyhow::Result<Response> {
        self.handled.fetch_add(1, Ordering::SeqCst);
        self.flag_at_dispatch
            .lock()
            .unwrap()
            .push(self.flag.value.load(Ordering::SeqCst));
        self.flag.value.store(true, Ordering::SeqCst);
        self.events.lock().unwrap().push("handle".to_string());

        if request.uri == "/boom" {
            anyhow::bail!("handler exploded");
        }
        Ok(Response::new(200).with_body(request.uri.clone()))
    }

    async fn after_emit(&self, _response: Option<&Response>) -> anyhow::Result<()> {
        self.emit_probe.lock().unwrap().push((
            self.flag.value.load(Ordering::SeqCst),
            self.reclaim.runs(),
        ));
        self.events.lock().unwrap().push("after_emit".to_string());
        if self.fail_after_emit.load(Ordering::SeqCst) {
            anyhow::bail!("after-emit hook exploded");
        }
        Ok(())
    }

    async fn shutdown(&self) {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
        self.events.lock().unwrap().push("shutdown".to_string());
    }
}

/// In-memory log sink.
pub struct RecordingSink(Mutex<Vec<String>>);

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self(Mutex::new(Vec::new())))
    }

    pub fn lines(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl LogSink for RecordingSink {
    fn write(&self, line: &str) {
        self.0.lock().unwrap().push(line.to_string());
    }
}

/// Write a config group file under `<root>/config/`.
pub fn write_group(root: &std::path::Path, group: &str, contents: &str) {
    let dir = root.join("config");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(format!("{group}.json")), contents).unwrap();
}
