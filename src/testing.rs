//! Scripted transport, recording sleeper and log capture for unit tests

use crate::error::{Error, Result};
use crate::fetch::Sleeper;
use crate::http::{PageRequest, RawResponse, Transport};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::subscriber::DefaultGuard;

/// Something that happened during a run, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Send(u32),
    Sleep(Duration),
}

/// Shared, ordered record of sends and sleeps
#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<Event>>>);

impl EventLog {
    fn push(&self, event: Event) {
        self.0.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }

    /// Pages sent, in order, one entry per attempt
    pub fn sends(&self) -> Vec<u32> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Send(page) => Some(page),
                Event::Sleep(_) => None,
            })
            .collect()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Sleep(d) => Some(d),
                Event::Send(_) => None,
            })
            .collect()
    }

    pub fn attempts_for(&self, page: u32) -> usize {
        self.sends().into_iter().filter(|p| *p == page).count()
    }
}

/// One scripted reply
#[derive(Debug, Clone)]
pub enum Step {
    /// 200 with this JSON body
    Json(Value),
    /// Given status and raw body
    Raw(u16, String),
    /// This exact response
    Reply(RawResponse),
    /// Connection-level failure (retryable)
    Timeout,
    /// Failure that retrying cannot cure
    Fatal,
}

impl Step {
    pub fn status(status: u16) -> Self {
        Self::Raw(status, format!("status {status}"))
    }

    pub fn html() -> Self {
        Self::Raw(200, "<html><body>Runtime Error</body></html>".to_string())
    }
}

/// Transport replaying a per-page script.
///
/// Each page has a queue of steps; the last step of a queue repeats forever.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: Mutex<HashMap<u32, VecDeque<Step>>>,
    requests: Mutex<Vec<PageRequest>>,
    log: EventLog,
}

impl ScriptedTransport {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn page(self, page: u32, steps: Vec<Step>) -> Self {
        self.script
            .lock()
            .unwrap()
            .insert(page, steps.into_iter().collect());
        self
    }

    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &PageRequest) -> Result<RawResponse> {
        self.log.push(Event::Send(request.page));
        self.requests.lock().unwrap().push(request.clone());

        let step = {
            let mut script = self.script.lock().unwrap();
            let Some(queue) = script.get_mut(&request.page) else {
                return Err(Error::Other(format!("page {} not scripted", request.page)));
            };
            if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            }
        };

        match step {
            Some(Step::Json(body)) => Ok(RawResponse::new(200, body.to_string())
                .with_header("content-type", "application/json")),
            Some(Step::Raw(status, body)) => {
                Ok(RawResponse::new(status, body).with_header("content-type", "text/html"))
            }
            Some(Step::Reply(response)) => Ok(response),
            Some(Step::Timeout) => Err(Error::Timeout { timeout_ms: 30_000 }),
            Some(Step::Fatal) | None => Err(Error::config("request could not be built")),
        }
    }
}

/// Sleeper that records instead of waiting
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    log: EventLog,
}

impl RecordingSleeper {
    pub fn new(log: EventLog) -> Self {
        Self { log }
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.log.push(Event::Sleep(duration));
    }
}

/// Records `{"id": first..first+count}` as a page body with `total`
pub fn page_body(total: u64, first: u64, count: u64) -> Value {
    json!({
        "total": total,
        "rows": rows(first, count),
    })
}

pub fn rows(first: u64, count: u64) -> Vec<Value> {
    (first..first + count)
        .map(|id| json!({"id": id, "TRANAMT": "-1.50", "MERCNAME": "canteen "}))
        .collect()
}

/// In-memory sink for formatted log lines
#[derive(Debug, Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Route this thread's logs into a buffer until the guard drops
pub fn capture_logs() -> (LogBuffer, DefaultGuard) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    (buffer, tracing::subscriber::set_default(subscriber))
}
