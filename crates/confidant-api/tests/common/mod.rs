#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

use confidant_api::{build_router, config::Config, AppState};
use confidant_assistants::{
    AssistantsClient, AssistantsError, CreateMessageRequest, CreateRunRequest, ListMessagesQuery,
    ListOrder, MessageContent, MessageRole, Page, Result, Run, RunError, RunStatus, Thread,
    ThreadMessage,
};

/// How fake runs behave once started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunBehavior {
    /// Reply "reply to <text>" and complete
    Complete,
    /// Stay in progress forever
    Stuck,
    /// Fail without replying
    Fail,
    /// Wait for tool outputs that never arrive
    NeedsAction,
}

#[derive(Default)]
struct FakeData {
    threads: HashMap<String, Thread>,
    messages: HashMap<String, Vec<ThreadMessage>>,
    runs: HashMap<String, Run>,
    counter: usize,
}

impl FakeData {
    fn next_id(&mut self, prefix: &str) -> String {
        self.counter += 1;
        format!("{}_{}", prefix, self.counter)
    }
}

/// In-memory stand-in for the remote Assistants API
pub struct FakeAssistants {
    data: Mutex<FakeData>,
    behavior: RunBehavior,
    fail_thread_creation: bool,
    stall: Option<Duration>,
    calls: AtomicUsize,
    cancels: AtomicUsize,
    run_requests: Mutex<Vec<CreateRunRequest>>,
}

impl FakeAssistants {
    pub fn new(behavior: RunBehavior) -> Self {
        Self {
            data: Mutex::new(FakeData::default()),
            behavior,
            fail_thread_creation: false,
            stall: None,
            calls: AtomicUsize::new(0),
            cancels: AtomicUsize::new(0),
            run_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_thread_creation() -> Self {
        Self {
            fail_thread_creation: true,
            ..Self::new(RunBehavior::Complete)
        }
    }

    /// Thread lookups hang for `stall` before answering
    pub fn stalling(stall: Duration) -> Self {
        Self {
            stall: Some(stall),
            ..Self::new(RunBehavior::Complete)
        }
    }

    pub fn cancels(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn run_requests(&self) -> Vec<CreateRunRequest> {
        self.run_requests.lock().unwrap().clone()
    }

    pub fn message_count(&self, thread_id: &str) -> usize {
        self.data
            .lock()
            .unwrap()
            .messages
            .get(thread_id)
            .map(Vec::len)
            .unwrap_or(0)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn not_found(thread_id: &str) -> AssistantsError {
        AssistantsError::NotFound(format!("No thread found with id '{}'.", thread_id))
    }
}

fn text_message(data: &mut FakeData, thread_id: &str, role: MessageRole, text: &str) -> ThreadMessage {
    let created_at = data.counter as i64;
    ThreadMessage {
        id: data.next_id("msg"),
        object: "thread.message".to_string(),
        created_at,
        thread_id: thread_id.to_string(),
        role,
        content: vec![MessageContent::text(text)],
        assistant_id: None,
        run_id: None,
    }
}

#[async_trait]
impl AssistantsClient for FakeAssistants {
    async fn create_thread(&self) -> Result<Thread> {
        self.record_call();
        if self.fail_thread_creation {
            return Err(AssistantsError::Api {
                status: 429,
                message: "You exceeded your current quota".to_string(),
            });
        }

        let mut data = self.data.lock().unwrap();
        let id = data.next_id("thread");
        let thread = Thread {
            id: id.clone(),
            object: "thread".to_string(),
            created_at: 1_700_000_000,
            metadata: Some(HashMap::new()),
            tool_resources: None,
            extra: [("region".to_string(), Value::from("eu"))].into_iter().collect(),
        };
        data.threads.insert(id.clone(), thread.clone());
        data.messages.insert(id, Vec::new());
        Ok(thread)
    }

    async fn retrieve_thread(&self, thread_id: &str) -> Result<Thread> {
        self.record_call();
        if let Some(stall) = self.stall {
            tokio::time::sleep(stall).await;
        }
        self.data
            .lock()
            .unwrap()
            .threads
            .get(thread_id)
            .cloned()
            .ok_or_else(|| Self::not_found(thread_id))
    }

    async fn create_message(
        &self,
        thread_id: &str,
        request: CreateMessageRequest,
    ) -> Result<ThreadMessage> {
        self.record_call();
        let mut data = self.data.lock().unwrap();
        if !data.threads.contains_key(thread_id) {
            return Err(Self::not_found(thread_id));
        }
        let message = text_message(&mut data, thread_id, request.role, &request.content);
        data.messages
            .entry(thread_id.to_string())
            .or_default()
            .push(message.clone());
        Ok(message)
    }

    async fn list_messages(
        &self,
        thread_id: &str,
        query: &ListMessagesQuery,
    ) -> Result<Page<ThreadMessage>> {
        self.record_call();
        let data = self.data.lock().unwrap();
        let mut all = data
            .messages
            .get(thread_id)
            .cloned()
            .ok_or_else(|| Self::not_found(thread_id))?;
        if query.order != Some(ListOrder::Asc) {
            all.reverse();
        }

        let start = match &query.after {
            Some(after) => all
                .iter()
                .position(|m| &m.id == after)
                .map(|i| i + 1)
                .unwrap_or(all.len()),
            None => 0,
        };
        let limit = query.limit.unwrap_or(20) as usize;
        let page: Vec<ThreadMessage> = all.iter().skip(start).take(limit).cloned().collect();
        let has_more = start + page.len() < all.len();
        let first_id = page.first().map(|m| m.id.clone());
        let last_id = page.last().map(|m| m.id.clone());

        Ok(Page::new(page, has_more).with_cursors(first_id, last_id))
    }

    async fn create_run(&self, thread_id: &str, request: CreateRunRequest) -> Result<Run> {
        self.record_call();
        self.run_requests.lock().unwrap().push(request.clone());

        let mut data = self.data.lock().unwrap();
        let id = data.next_id("run");
        let run = Run {
            id: id.clone(),
            object: "thread.run".to_string(),
            created_at: 1_700_000_000,
            thread_id: thread_id.to_string(),
            assistant_id: request.assistant_id,
            status: RunStatus::Queued,
            instructions: request.instructions,
            last_error: None,
        };
        data.runs.insert(id, run.clone());
        Ok(run)
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        self.record_call();
        let mut data = self.data.lock().unwrap();
        let mut run = data
            .runs
            .get(run_id)
            .cloned()
            .ok_or_else(|| AssistantsError::NotFound(run_id.to_string()))?;

        if run.status == RunStatus::Queued {
            match self.behavior {
                RunBehavior::Complete => {
                    let last_user_text = data
                        .messages
                        .get(thread_id)
                        .and_then(|msgs| msgs.iter().rev().find(|m| m.role == MessageRole::User))
                        .and_then(|m| m.first_text())
                        .unwrap_or_default()
                        .to_string();
                    let reply = text_message(
                        &mut data,
                        thread_id,
                        MessageRole::Assistant,
                        &format!("reply to {}", last_user_text),
                    );
                    data.messages
                        .entry(thread_id.to_string())
                        .or_default()
                        .push(reply);
                    run.status = RunStatus::Completed;
                }
                RunBehavior::Stuck => run.status = RunStatus::InProgress,
                RunBehavior::NeedsAction => run.status = RunStatus::RequiresAction,
                RunBehavior::Fail => {
                    run.status = RunStatus::Failed;
                    run.last_error = Some(RunError {
                        code: "server_error".to_string(),
                        message: "Sorry, something went wrong.".to_string(),
                    });
                }
            }
            data.runs.insert(run_id.to_string(), run.clone());
        }

        Ok(run)
    }

    async fn cancel_run(&self, _thread_id: &str, run_id: &str) -> Result<Run> {
        self.record_call();
        self.cancels.fetch_add(1, Ordering::SeqCst);
        let mut data = self.data.lock().unwrap();
        let run = data
            .runs
            .get_mut(run_id)
            .ok_or_else(|| AssistantsError::NotFound(run_id.to_string()))?;
        run.status = RunStatus::Cancelled;
        Ok(run.clone())
    }
}

pub fn test_config(assistant_id: Option<&str>) -> Config {
    let mut config: Config = toml::from_str(
        r#"
        [server]
        host = "127.0.0.1"
        port = 0

        [cors]
        enabled = false
        origins = []

        [assistants]
        base_url = "http://localhost"
        instructions = "Be a helpful therapist"
        poll_interval_ms = 1
        max_poll_attempts = 5
        history_page_size = 2

        [logging]
        level = "debug"
        format = "pretty"
        "#,
    )
    .unwrap();
    config.openai_api_key = "test-key".to_string();
    config.assistant_id = assistant_id.map(str::to_string);
    config
}

pub fn app_with_config(fake: Arc<FakeAssistants>, config: Config) -> Router {
    build_router(Arc::new(AppState::new(config, fake)))
}

pub fn app_with(fake: Arc<FakeAssistants>, assistant_id: Option<&str>) -> Router {
    app_with_config(fake, test_config(assistant_id))
}

pub fn app(fake: Arc<FakeAssistants>) -> Router {
    app_with(fake, Some("asst_test"))
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, bytes) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}
