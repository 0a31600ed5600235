// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Process-wide error handling.
//!
//! The runner installs two handlers over a process lifetime. A temporary
//! handler backed by a plain file sink covers container construction,
//! when nothing else can capture failures. Once the container is built,
//! the application's configured handler replaces it. The active handler
//! lives in a single process-wide slot, so exactly one handler is the
//! sink at any time; registering a new one atomically displaces the old.

mod render;
mod sink;

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Once};

use once_cell::sync::Lazy;

use gantry_worker::{Request, Response};

pub use render::{ErrorRenderer, JsonRenderer, PlainTextRenderer};
pub use sink::{FileSink, LogSink, TracingSink};

/// Single process-wide slot for the active handler.
static ACTIVE: Lazy<Mutex<Option<Arc<ErrorHandler>>>> = Lazy::new(|| Mutex::new(None));

/// Panic hook installation guard.
static PANIC_HOOK: Once = Once::new();

/// The currently registered handler, if any.
pub fn active_handler() -> Option<Arc<ErrorHandler>> {
    ACTIVE
        .lock()
        .expect("error handler slot poisoned")
        .clone()
}

fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            if let Some(handler) = active_handler() {
                handler.report_message(&format!("panic: {info}"));
            }
            previous(info);
        }));
    });
}

/// Process-wide failure sink and error-response factory.
pub struct ErrorHandler {
    sink: Arc<dyn LogSink>,
    renderer: Arc<dyn ErrorRenderer>,
    debug: AtomicBool,
}

impl ErrorHandler {
    /// Create a handler over the given sink and renderer.
    pub fn new(sink: Arc<dyn LogSink>, renderer: Arc<dyn ErrorRenderer>) -> Self {
        Self {
            sink,
            renderer,
            debug: AtomicBool::new(false),
        }
    }

    /// The fallback handler used while the container is being built:
    /// a file sink under `<root>/runtime/logs/app.log` and a plain text
    /// renderer.
    pub fn temporary(root_path: &Path) -> Self {
        Self::new(
            Arc::new(FileSink::new(root_path.join("runtime/logs/app.log"))),
            Arc::new(PlainTextRenderer),
        )
    }

    /// Toggle verbose rendering.
    pub fn set_debug(&self, enabled: bool) {
        self.debug.store(enabled, Ordering::Relaxed);
    }

    /// Whether verbose rendering is on.
    pub fn debug_enabled(&self) -> bool {
        self.debug.load(Ordering::Relaxed)
    }

    /// Log a failure without rendering a response.
    pub fn report(&self, error: &anyhow::Error) {
        self.sink.write(&format!("error: {error:#}"));
    }

    /// Log a pre-formatted failure line.
    pub fn report_message(&self, message: &str) {
        self.sink.write(message);
    }

    /// Log a failure and render it into a transmittable response.
    pub fn handle(&self, error: &anyhow::Error, request: Option<&Request>) -> Response {
        match request {
            Some(req) => self
                .sink
                .write(&format!("{} {} failed: {error:#}", req.method, req.uri)),
            None => self.sink.write(&format!("request wait failed: {error:#}")),
        }
        self.renderer.render(error, request, self.debug_enabled())
    }

    /// Install this handler as the process-wide sink, displacing any
    /// previously registered handler.
    pub fn register(self: &Arc<Self>) {
        install_panic_hook();
        *ACTIVE.lock().expect("error handler slot poisoned") = Some(self.clone());
    }

    /// Remove this handler from the process-wide slot. A handler that is
    /// not the active one is left untouched.
    pub fn unregister(self: &Arc<Self>) {
        let mut active = ACTIVE.lock().expect("error handler slot poisoned");
        if active.as_ref().is_some_and(|current| Arc::ptr_eq(current, self)) {
            *active = None;
        }
    }

    /// Whether this handler is the active process-wide sink.
    pub fn is_active(self: &Arc<Self>) -> bool {
        active_handler().is_some_and(|current| Arc::ptr_eq(&current, self))
    }
}
