//! In-process fake of the load testing and operation APIs
//!
//! Serves the same routes as the real service from an axum router on a random
//! local port. Resources move through their states as they are queried, so
//! every wait in the suite is exercised for real over HTTP.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use loadtest_client::LoadTestingClient;
use loadtest_core::domain::agent::{Agent, AgentStatus};
use loadtest_core::domain::config::Config;
use loadtest_core::domain::operation::{Operation, OperationError};
use loadtest_core::domain::report::{Overall, ReportStatus, TableReport};
use loadtest_core::domain::test::{Summary, Test, TestStatus};
use loadtest_core::dto::agent::CreateAgentRequest;
use loadtest_core::dto::config::CreateConfigRequest;
use loadtest_core::dto::test::CreateTestRequest;
use loadtest_e2e::config::AgentSpec;
use loadtest_e2e::{SuiteConfig, Timeouts};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

/// The only token the fake accepts
pub const TOKEN: &str = "t1.fake-token";

const TYPE_PREFIX: &str = "type.googleapis.com/yandex.cloud.loadtesting.api.v1";

/// gRPC status code the fake reports for failed operations
const RESOURCE_EXHAUSTED: i32 = 8;

/// How the fake cloud behaves
#[derive(Debug, Clone)]
pub struct Behavior {
    /// Operation lookups answered "not done" before the operation completes
    pub operation_polls: u32,
    /// Agent lookups answered PROVISIONING before the agent is ready
    pub agent_ready_after: u32,
    /// Test lookups answered RUNNING before the test is finished
    pub test_finished_after: u32,
    /// HTTP codes in the table report
    pub http_codes: BTreeMap<i64, i64>,
    /// Fail every agent create operation with this message
    pub agent_create_error: Option<String>,
    /// Leave deleted agents visible (in DELETING state)
    pub keep_deleted_agents: bool,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            operation_polls: 2,
            agent_ready_after: 3,
            test_finished_after: 3,
            http_codes: BTreeMap::from([(200, 1250), (404, 10)]),
            agent_create_error: None,
            keep_deleted_agents: false,
        }
    }
}

/// Installs a test-friendly subscriber once per test binary
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,loadtest_core=debug,tower_http=warn".into()),
        )
        .with_test_writer()
        .try_init();
}

/// Suite timeouts scaled down for the fake
pub fn fast_timeouts() -> Timeouts {
    Timeouts {
        agent_create: Duration::from_secs(2),
        agent_ready: Duration::from_secs(2),
        agent_ready_interval: Duration::from_millis(10),
        agent_delete: Duration::from_secs(2),
        resource_create: Duration::from_secs(2),
        test_finish: Duration::from_secs(2),
        test_finish_interval: Duration::from_millis(10),
        operation_interval: Duration::from_millis(10),
    }
}

/// A running fake cloud; the server stops when this is dropped
pub struct FakeCloud {
    url: String,
    state: Shared,
    server: JoinHandle<()>,
}

impl FakeCloud {
    pub async fn start(behavior: Behavior) -> Self {
        init_tracing();

        let state: Shared = Arc::new(Mutex::new(Cloud::new(behavior)));
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind fake cloud");
        let addr = listener.local_addr().expect("fake cloud has no address");
        let app = router(state.clone());

        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake cloud stopped");
        });

        Self {
            url: format!("http://{}", addr),
            state,
            server,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Suite configuration pointing at this fake
    pub fn suite_config(&self) -> SuiteConfig {
        SuiteConfig {
            token: TOKEN.to_string(),
            folder_id: "b1gfakefolder".to_string(),
            service_account_id: "ajefakesa".to_string(),
            subnet_id: "e2lfakesubnet".to_string(),
            security_group_id: "enpfakesg".to_string(),
            agent_ssh_keys: "ubuntu:ssh-ed25519 AAAAfake".to_string(),
            target_ip: "192.0.2.10".to_string(),
            zone: "ru-central1-b".to_string(),
            api_url: self.url.clone(),
            operation_url: self.url.clone(),
            agent_name_prefix: "ete-".to_string(),
            agent: AgentSpec::default(),
            timeouts: fast_timeouts(),
        }
    }

    /// Client authenticated against this fake
    pub fn client(&self) -> LoadTestingClient {
        self.suite_config().client()
    }

    /// Agents the fake still knows about
    pub fn agent_count(&self) -> usize {
        lock(&self.state).agents.len()
    }

    /// Number of requests received whose "METHOD /path" starts with `prefix`
    pub fn requests(&self, prefix: &str) -> usize {
        lock(&self.state)
            .requests
            .iter()
            .filter(|r| r.starts_with(prefix))
            .count()
    }

    /// Agent create requests as received
    pub fn agent_requests(&self) -> Vec<CreateAgentRequest> {
        lock(&self.state).agent_requests.clone()
    }

    /// Stored config bodies
    pub fn config_yaml(&self) -> Vec<String> {
        lock(&self.state)
            .configs
            .values()
            .map(|c| c.yaml_string.clone())
            .collect()
    }
}

impl Drop for FakeCloud {
    fn drop(&mut self) {
        self.server.abort();
    }
}

// =============================================================================
// State
// =============================================================================

type Shared = Arc<Mutex<Cloud>>;

struct Tracked<T> {
    resource: T,
    /// Lookups left before the resource advances
    polls_left: u32,
}

struct PendingOperation {
    operation: Operation,
    polls_left: u32,
    outcome: Result<Value, OperationError>,
}

struct Cloud {
    behavior: Behavior,
    next_id: u64,
    agents: HashMap<String, Tracked<Agent>>,
    configs: HashMap<String, Config>,
    tests: HashMap<String, Tracked<Test>>,
    operations: HashMap<String, PendingOperation>,
    agent_requests: Vec<CreateAgentRequest>,
    requests: Vec<String>,
}

impl Cloud {
    fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            next_id: 0,
            agents: HashMap::new(),
            configs: HashMap::new(),
            tests: HashMap::new(),
            operations: HashMap::new(),
            agent_requests: Vec::new(),
            requests: Vec::new(),
        }
    }

    fn record(&mut self, method: &str, path: impl std::fmt::Display) {
        self.requests.push(format!("{} {}", method, path));
    }

    fn next_id(&mut self, kind: &str) -> String {
        self.next_id += 1;
        format!("{}{:05}", kind, self.next_id)
    }

    fn start_operation(
        &mut self,
        description: &str,
        metadata: Value,
        outcome: Result<Value, OperationError>,
    ) -> Operation {
        let id = self.next_id("op");
        let mut operation = Operation {
            id: id.clone(),
            description: description.to_string(),
            created_at: Some(Utc::now()),
            created_by: "ajefakesa".to_string(),
            metadata: Some(metadata),
            ..Default::default()
        };

        if self.behavior.operation_polls == 0 {
            finish(&mut operation, outcome);
            return operation;
        }

        self.operations.insert(
            id,
            PendingOperation {
                operation: operation.clone(),
                polls_left: self.behavior.operation_polls,
                outcome,
            },
        );
        operation
    }

    fn poll_operation(&mut self, id: &str) -> Option<Operation> {
        let pending = self.operations.get_mut(id)?;

        if !pending.operation.done {
            pending.polls_left = pending.polls_left.saturating_sub(1);
            if pending.polls_left == 0 {
                finish(&mut pending.operation, pending.outcome.clone());
            }
        }

        Some(pending.operation.clone())
    }
}

fn finish(operation: &mut Operation, outcome: Result<Value, OperationError>) {
    operation.done = true;
    operation.modified_at = Some(Utc::now());
    match outcome {
        Ok(response) => operation.response = Some(response),
        Err(error) => operation.error = Some(error),
    }
}

/// Adds the `@type` marker the real service puts on operation responses
fn typed(kind: &str, mut value: Value) -> Value {
    value["@type"] = json!(format!("{}.{}", TYPE_PREFIX, kind));
    value
}

fn lock(state: &Shared) -> MutexGuard<'_, Cloud> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// =============================================================================
// Errors
// =============================================================================

enum FakeError {
    Unauthorized,
    NotFound(String),
    BadRequest(String),
}

impl IntoResponse for FakeError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            FakeError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                16,
                "The token is invalid".to_string(),
            ),
            FakeError::NotFound(msg) => (StatusCode::NOT_FOUND, 5, msg),
            FakeError::BadRequest(msg) => (StatusCode::BAD_REQUEST, 3, msg),
        };

        (status, Json(json!({ "code": code, "message": message }))).into_response()
    }
}

type FakeResult<T> = Result<T, FakeError>;

fn authorize(headers: &HeaderMap) -> FakeResult<()> {
    let expected = format!("Bearer {}", TOKEN);
    match headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(FakeError::Unauthorized),
    }
}

// =============================================================================
// Routes
// =============================================================================

fn router(state: Shared) -> Router {
    Router::new()
        .route("/loadtesting/api/v1/agents", post(create_agent))
        .route(
            "/loadtesting/api/v1/agents/{id}",
            get(get_agent).delete(delete_agent),
        )
        .route("/loadtesting/api/v1/configs", post(create_config))
        .route("/loadtesting/api/v1/configs/{id}", get(get_config))
        .route("/loadtesting/api/v1/tests", post(create_test))
        .route("/loadtesting/api/v1/tests/{id}", get(get_test))
        .route("/loadtesting/api/v1/reports/{id}/table", get(get_report))
        .route("/operations/{id}", get(get_operation))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn create_agent(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(req): Json<CreateAgentRequest>,
) -> FakeResult<Json<Operation>> {
    authorize(&headers)?;
    let mut guard = lock(&state);
    let cloud = &mut *guard;
    cloud.record("POST", "/agents");

    if req.name.is_empty() || req.folder_id.is_empty() {
        return Err(FakeError::BadRequest("name and folder_id are required".to_string()));
    }
    cloud.agent_requests.push(req.clone());

    let id = cloud.next_id("agent");
    let metadata = json!({ "agentId": id });

    if let Some(message) = cloud.behavior.agent_create_error.clone() {
        let error = OperationError {
            code: RESOURCE_EXHAUSTED,
            message,
            details: vec![],
        };
        return Ok(Json(cloud.start_operation("Create agent", metadata, Err(error))));
    }

    let agent = Agent {
        id: id.clone(),
        folder_id: req.folder_id,
        name: req.name,
        compute_instance_id: format!("fhm{}", id),
        status: AgentStatus::Provisioning,
        ..Default::default()
    };
    cloud.agents.insert(
        id,
        Tracked {
            resource: agent.clone(),
            polls_left: cloud.behavior.agent_ready_after,
        },
    );

    let response = typed("agent.Agent", json!(agent));
    Ok(Json(cloud.start_operation("Create agent", metadata, Ok(response))))
}

async fn get_agent(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> FakeResult<Json<Agent>> {
    authorize(&headers)?;
    let mut guard = lock(&state);
    let cloud = &mut *guard;
    cloud.record("GET", format!("/agents/{}", id));

    let tracked = cloud
        .agents
        .get_mut(&id)
        .ok_or_else(|| FakeError::NotFound(format!("Agent {} not found", id)))?;

    if tracked.polls_left > 0 {
        tracked.polls_left -= 1;
    } else if tracked.resource.status == AgentStatus::Provisioning {
        tracked.resource.status = AgentStatus::ReadyForTest;
    }

    Ok(Json(tracked.resource.clone()))
}

async fn delete_agent(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> FakeResult<Json<Operation>> {
    authorize(&headers)?;
    let mut guard = lock(&state);
    let cloud = &mut *guard;
    cloud.record("DELETE", format!("/agents/{}", id));

    if cloud.behavior.keep_deleted_agents {
        let tracked = cloud
            .agents
            .get_mut(&id)
            .ok_or_else(|| FakeError::NotFound(format!("Agent {} not found", id)))?;
        tracked.resource.status = AgentStatus::Deleting;
    } else if cloud.agents.remove(&id).is_none() {
        return Err(FakeError::NotFound(format!("Agent {} not found", id)));
    }

    let response = json!({ "@type": "type.googleapis.com/google.protobuf.Empty" });
    Ok(Json(cloud.start_operation(
        "Delete agent",
        json!({ "agentId": id }),
        Ok(response),
    )))
}

async fn create_config(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(req): Json<CreateConfigRequest>,
) -> FakeResult<Json<Operation>> {
    authorize(&headers)?;
    let mut guard = lock(&state);
    let cloud = &mut *guard;
    cloud.record("POST", "/configs");

    if req.yaml_string.trim().is_empty() {
        return Err(FakeError::BadRequest("yaml_string is required".to_string()));
    }

    let config = Config {
        id: cloud.next_id("config"),
        folder_id: req.folder_id,
        yaml_string: req.yaml_string,
        created_at: Some(Utc::now()),
    };
    cloud.configs.insert(config.id.clone(), config.clone());

    let metadata = json!({ "configId": config.id });
    let response = typed("config.Config", json!(config));
    Ok(Json(cloud.start_operation("Create config", metadata, Ok(response))))
}

async fn get_config(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> FakeResult<Json<Config>> {
    authorize(&headers)?;
    let mut guard = lock(&state);
    let cloud = &mut *guard;
    cloud.record("GET", format!("/configs/{}", id));

    cloud
        .configs
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| FakeError::NotFound(format!("Config {} not found", id)))
}

async fn create_test(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(req): Json<CreateTestRequest>,
) -> FakeResult<Json<Operation>> {
    authorize(&headers)?;
    let mut guard = lock(&state);
    let cloud = &mut *guard;
    cloud.record("POST", "/tests");

    if req.configurations.is_empty() {
        return Err(FakeError::BadRequest("configurations are required".to_string()));
    }
    for configuration in &req.configurations {
        if !cloud.configs.contains_key(&configuration.config_id) {
            return Err(FakeError::BadRequest(format!(
                "Unknown config {}",
                configuration.config_id
            )));
        }
        let agent_id = &configuration.agent_selector.agent_id;
        match cloud.agents.get(agent_id) {
            Some(tracked) if tracked.resource.status.is_ready() => {}
            Some(_) => {
                return Err(FakeError::BadRequest(format!(
                    "Agent {} is not ready for test",
                    agent_id
                )));
            }
            None => return Err(FakeError::BadRequest(format!("Unknown agent {}", agent_id))),
        }
    }

    let test = Test {
        id: cloud.next_id("test"),
        configurations: req.configurations,
        details: req.test_details,
        summary: Summary {
            status: TestStatus::Created,
            created_at: Some(Utc::now()),
            ..Default::default()
        },
    };
    cloud.tests.insert(
        test.id.clone(),
        Tracked {
            resource: test.clone(),
            polls_left: cloud.behavior.test_finished_after,
        },
    );

    let metadata = json!({ "testId": test.id });
    let response = typed("test.Test", json!(test));
    Ok(Json(cloud.start_operation("Create test", metadata, Ok(response))))
}

async fn get_test(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> FakeResult<Json<Test>> {
    authorize(&headers)?;
    let mut guard = lock(&state);
    let cloud = &mut *guard;
    cloud.record("GET", format!("/tests/{}", id));

    let tracked = cloud
        .tests
        .get_mut(&id)
        .ok_or_else(|| FakeError::NotFound(format!("Test {} not found", id)))?;
    let summary = &mut tracked.resource.summary;

    if tracked.polls_left > 0 {
        tracked.polls_left -= 1;
        summary.status = TestStatus::Running;
        summary.started_at.get_or_insert_with(Utc::now);
    } else if !summary.is_finished {
        summary.status = TestStatus::Done;
        summary.is_finished = true;
        summary.finished_at = Some(Utc::now());
    }

    Ok(Json(tracked.resource.clone()))
}

async fn get_report(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> FakeResult<Json<TableReport>> {
    authorize(&headers)?;
    let mut guard = lock(&state);
    let cloud = &mut *guard;
    cloud.record("GET", format!("/reports/{}/table", id));

    if !cloud.tests.contains_key(&id) {
        return Err(FakeError::NotFound(format!("Test {} not found", id)));
    }

    let http_codes = cloud.behavior.http_codes.clone();
    let request_count = http_codes.values().sum();
    Ok(Json(TableReport {
        status: ReportStatus::Ready,
        overall: Overall {
            request_count,
            net_codes: BTreeMap::from([(0, request_count)]),
            http_codes,
            ..Default::default()
        },
        ..Default::default()
    }))
}

async fn get_operation(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> FakeResult<Json<Operation>> {
    authorize(&headers)?;
    let mut guard = lock(&state);
    let cloud = &mut *guard;
    cloud.record("GET", format!("/operations/{}", id));

    cloud
        .poll_operation(&id)
        .map(Json)
        .ok_or_else(|| FakeError::NotFound(format!("Operation {} not found", id)))
}
