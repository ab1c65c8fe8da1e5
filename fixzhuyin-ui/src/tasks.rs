//! Background work: host requests and deferred UI callbacks
//!
//! Every request runs as a task on the runtime the [`TaskRunner`] was built
//! on. A failing task never disappears silently; its error goes to the one
//! [`ErrorReporter`] the runner was given.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::error::{Result, UiError};

/// Sink for failures of background tasks
pub trait ErrorReporter: Send + Sync {
    fn report(&self, context: &str, error: &UiError);
}

/// Reports through the `log` facade
#[derive(Debug, Default)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, context: &str, error: &UiError) {
        log::error!("{}: {}", context, error);
    }
}

pub struct TaskRunner {
    handle: Handle,
    reporter: Arc<dyn ErrorReporter>,
    requests: Mutex<Vec<JoinHandle<()>>>,
    timers: Mutex<Vec<JoinHandle<()>>>,
}

impl TaskRunner {
    /// Bind to the current tokio runtime
    pub fn new(reporter: Arc<dyn ErrorReporter>) -> Result<Self> {
        let handle = Handle::try_current()?;
        Ok(Self {
            handle,
            reporter,
            requests: Mutex::new(Vec::new()),
            timers: Mutex::new(Vec::new()),
        })
    }

    pub fn reporter(&self) -> &Arc<dyn ErrorReporter> {
        &self.reporter
    }

    /// Report an error that did not come from a spawned task
    pub fn report(&self, context: &str, error: &UiError) {
        self.reporter.report(context, error);
    }

    /// Run `task` in the background, reporting its error if it fails
    pub fn spawn<F>(&self, context: &'static str, task: F)
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        let reporter = self.reporter.clone();
        let join = self.handle.spawn(async move {
            if let Err(e) = task.await {
                reporter.report(context, &e);
            }
        });
        push(&self.requests, join);
    }

    /// Call `callback` once `delay` has elapsed
    pub fn defer<F>(&self, delay: Duration, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let join = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            callback();
        });
        push(&self.timers, join);
    }

    /// Wait until every spawned request has finished. Deferred callbacks
    /// are not waited for.
    pub async fn idle(&self) {
        loop {
            let pending = std::mem::take(&mut *self.requests.lock().unwrap_or_else(PoisonError::into_inner));
            if pending.is_empty() {
                break;
            }
            for join in pending {
                if let Err(e) = join.await {
                    if e.is_panic() {
                        log::error!("background task panicked: {}", e);
                    }
                }
            }
        }
    }

    /// Abort outstanding requests and timers
    pub fn shutdown(&self) {
        for list in [&self.requests, &self.timers] {
            for join in list.lock().unwrap_or_else(PoisonError::into_inner).drain(..) {
                join.abort();
            }
        }
    }
}

fn push(list: &Mutex<Vec<JoinHandle<()>>>, join: JoinHandle<()>) {
    let mut list = list.lock().unwrap_or_else(PoisonError::into_inner);
    list.retain(|j| !j.is_finished());
    list.push(join);
}
