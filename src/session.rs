//! Hosts one interpreter per worker thread and talks to it over two FIFO
//! channels.
//!
//! The inbound channel carries program text or one of the control tokens
//! `stop`, `reset` and `exit`, each of which ends the worker loop. The
//! outbound channel carries an [`Output`] per program. Cancellation is
//! coarse: [`Session::interrupt`] abandons the running worker and starts a
//! fresh one from the saved baseline.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::ast::Expression;
use crate::interpreter::Interpreter;

/// Stack reserved for each worker; deep programs recurse on it.
const WORKER_STACK_SIZE: usize = 16 * 1024 * 1024;

pub const NOT_RUNNING: &str = "Error: interpreter kernel not running";
pub const INTERRUPTED: &str = "Error: interpreter kernel interrupted";

/// A control token or a program, as read off the inbound channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Stop,
    Reset,
    Exit,
    Eval(String),
}

impl From<&str> for Request {
    fn from(line: &str) -> Self {
        match line {
            "stop" => Request::Stop,
            "reset" => Request::Reset,
            "exit" => Request::Exit,
            other => Request::Eval(other.to_string()),
        }
    }
}

/// One message on the outbound channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Output {
    Result(Expression),
    Error(String),
}

impl Output {
    pub fn is_error(&self) -> bool {
        matches!(self, Output::Error(_))
    }
}

/// The worker loop: parse then evaluate each program until a control token
/// arrives or the host hangs up.
pub fn worker_loop(mut interp: Interpreter, inbound: Receiver<String>, outbound: Sender<Output>) {
    while let Ok(line) = inbound.recv() {
        let source = match Request::from(line.as_str()) {
            Request::Stop | Request::Reset | Request::Exit => {
                debug!(token = %line, "worker received control token");
                break;
            }
            Request::Eval(source) => source,
        };

        let output = match interp.eval_source(&source) {
            Ok(result) => Output::Result(result),
            Err(e) => Output::Error(e.to_string()),
        };
        if outbound.send(output).is_err() {
            break;
        }
    }
}

/// Runs `task` on a thread with the worker stack size and waits for it.
pub fn run_with_worker_stack<T, F>(task: F) -> std::io::Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    thread::Builder::new()
        .name("plotscript-eval".into())
        .stack_size(WORKER_STACK_SIZE)
        .spawn(task)?
        .join()
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::Other, "evaluation thread panicked"))
}

struct Worker {
    inbound: Sender<String>,
    outbound: Receiver<Output>,
    handle: JoinHandle<()>,
}

impl Worker {
    fn spawn(interp: Interpreter) -> std::io::Result<Self> {
        let (to_worker, from_host) = mpsc::channel();
        let (to_host, from_worker) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("plotscript-worker".into())
            .stack_size(WORKER_STACK_SIZE)
            .spawn(move || worker_loop(interp, from_host, to_host))?;
        Ok(Self {
            inbound: to_worker,
            outbound: from_worker,
            handle,
        })
    }

    /// Sends a control token and waits for the thread to finish.
    fn shutdown(self, token: &str) {
        let _ = self.inbound.send(token.to_string());
        if self.handle.join().is_err() {
            warn!("worker thread panicked");
        }
    }
}

/// A host-side handle on one evaluation session.
pub struct Session {
    baseline: Interpreter,
    worker: Option<Worker>,
}

impl Session {
    /// Creates and starts a session whose `reset` restores `baseline`.
    pub fn new(baseline: Interpreter) -> std::io::Result<Self> {
        let mut session = Self {
            baseline,
            worker: None,
        };
        session.start()?;
        Ok(session)
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Starts a worker from the baseline if none is running.
    pub fn start(&mut self) -> std::io::Result<()> {
        if self.worker.is_none() {
            self.worker = Some(Worker::spawn(self.baseline.clone())?);
            info!("session started");
        }
        Ok(())
    }

    /// Stops the worker, discarding its environment.
    pub fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.shutdown("stop");
            info!("session stopped");
        }
    }

    /// Stops the worker and starts a fresh one from the baseline.
    pub fn reset(&mut self) -> std::io::Result<()> {
        if let Some(worker) = self.worker.take() {
            worker.shutdown("reset");
        }
        info!("session reset");
        self.start()
    }

    /// Ends the session for good.
    pub fn exit(mut self) {
        if let Some(worker) = self.worker.take() {
            worker.shutdown("exit");
        }
        info!("session exited");
    }

    /// Queues a program. A control token shuts the worker down instead.
    /// Returns false if no worker is running.
    pub fn submit(&mut self, source: &str) -> bool {
        if !matches!(Request::from(source), Request::Eval(_)) {
            let running = self.worker.is_some();
            self.retire(source);
            return running;
        }
        let sent = match &self.worker {
            Some(worker) => worker.inbound.send(source.to_string()).is_ok(),
            None => false,
        };
        if !sent {
            self.reap();
        }
        sent
    }

    /// Blocks until the next output arrives.
    pub fn recv(&mut self) -> Output {
        let received = match &self.worker {
            Some(worker) => worker.outbound.recv().ok(),
            None => None,
        };
        received.unwrap_or_else(|| {
            self.reap();
            Output::Error(NOT_RUNNING.to_string())
        })
    }

    /// Waits up to `timeout` for the next output.
    pub fn recv_timeout(&mut self, timeout: Duration) -> Option<Output> {
        let worker = self.worker.as_ref()?;
        match worker.outbound.recv_timeout(timeout) {
            Ok(output) => Some(output),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                self.reap();
                Some(Output::Error(NOT_RUNNING.to_string()))
            }
        }
    }

    /// Submits a program and waits for its output. A control token leaves
    /// the session stopped and answers with the not-running message.
    pub fn eval(&mut self, source: &str) -> Output {
        if !self.submit(source) || !self.is_running() {
            return Output::Error(NOT_RUNNING.to_string());
        }
        self.recv()
    }

    /// Shuts the worker down with `token`, if one is running.
    fn retire(&mut self, token: &str) {
        if let Some(worker) = self.worker.take() {
            worker.shutdown(token);
            info!(token, "session stopped by control token");
        }
    }

    /// Joins a worker whose channels have closed.
    fn reap(&mut self) {
        if let Some(worker) = self.worker.take() {
            if worker.handle.join().is_err() {
                warn!("worker thread panicked");
            }
            debug!("reaped finished worker");
        }
    }

    /// Abandons the running worker without waiting for it and starts a
    /// fresh one from the baseline. The abandoned thread finishes its
    /// current program in the background; its output is dropped.
    pub fn interrupt(&mut self) -> std::io::Result<Output> {
        if let Some(worker) = self.worker.take() {
            drop(worker.inbound);
            drop(worker.outbound);
            warn!("session interrupted; worker detached");
        }
        self.start()?;
        Ok(Output::Error(INTERRUPTED.to_string()))
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.shutdown("exit");
        }
    }
}
