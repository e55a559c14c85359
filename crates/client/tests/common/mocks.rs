use async_trait::async_trait;
use folio_client::transport::{ApiRequest, Method, RawResponse, RequestBody, Transport, TransportError};
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::time::Duration;

/// One request as the transport saw it.
#[derive(Clone, Debug)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    pub bearer: Option<String>,
}

impl RecordedCall {
    #[allow(dead_code)]
    pub fn json_body(&self) -> Option<&Value> {
        match &self.body {
            RequestBody::Json(body) => Some(body),
            _ => None,
        }
    }
}

#[derive(Clone)]
enum Reply {
    Respond(RawResponse),
    Fail(String),
}

#[derive(Clone)]
struct Scripted {
    reply: Reply,
    delay: Option<Duration>,
}

type Route = (Method, String);

/// Transport that replays scripted responses per route.
///
/// Queued responses are used once, in order; after the queue is drained the
/// route's sticky response (if any) answers. Unscripted routes get a 404.
#[derive(Default)]
pub struct ScriptedTransport {
    queued: Mutex<HashMap<Route, VecDeque<Scripted>>>,
    sticky: Mutex<HashMap<Route, Scripted>>,
    calls: Mutex<Vec<RecordedCall>>,
    call_count: AtomicUsize,
}

#[allow(dead_code)]
impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn push(&self, method: Method, path: &str, scripted: Scripted) -> &Self {
        self.queued
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(scripted);
        self
    }

    /// Answer the next matching call once.
    pub fn respond(&self, method: Method, path: &str, status: u16, body: Value) -> &Self {
        self.push(
            method,
            path,
            Scripted {
                reply: Reply::Respond(RawResponse::new(status, body)),
                delay: None,
            },
        )
    }

    /// Answer the next matching call once, after `delay`.
    pub fn respond_after(
        &self,
        delay: Duration,
        method: Method,
        path: &str,
        status: u16,
        body: Value,
    ) -> &Self {
        self.push(
            method,
            path,
            Scripted {
                reply: Reply::Respond(RawResponse::new(status, body)),
                delay: Some(delay),
            },
        )
    }

    /// Fail the next matching call with a network error.
    pub fn fail(&self, method: Method, path: &str, message: &str) -> &Self {
        self.push(
            method,
            path,
            Scripted {
                reply: Reply::Fail(message.to_string()),
                delay: None,
            },
        )
    }

    /// Answer every call once the queue for the route is empty.
    pub fn always(&self, method: Method, path: &str, status: u16, body: Value) -> &Self {
        self.sticky.lock().unwrap().insert(
            (method, path.to_string()),
            Scripted {
                reply: Reply::Respond(RawResponse::new(status, body)),
                delay: None,
            },
        );
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, method: Method, path: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method && c.path == path)
            .collect()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.calls_to(method, path).len()
    }

    pub fn total_calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(
        &self,
        request: &ApiRequest,
        bearer: Option<&str>,
    ) -> Result<RawResponse, TransportError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(RecordedCall {
            method: request.method,
            path: request.path.clone(),
            query: request.query.clone(),
            body: request.body.clone(),
            bearer: bearer.map(str::to_string),
        });

        let route = (request.method, request.path.clone());
        let scripted = {
            let next = self
                .queued
                .lock()
                .unwrap()
                .get_mut(&route)
                .and_then(VecDeque::pop_front);
            next.or_else(|| self.sticky.lock().unwrap().get(&route).cloned())
        };
        let Some(scripted) = scripted else {
            return Ok(RawResponse::new(
                404,
                json!({"message": format!("no scripted response for {request}")}),
            ));
        };
        if let Some(delay) = scripted.delay {
            tokio::time::sleep(delay).await;
        }
        match scripted.reply {
            Reply::Respond(response) => Ok(response),
            Reply::Fail(message) => Err(TransportError(message)),
        }
    }
}
